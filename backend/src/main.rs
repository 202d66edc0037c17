use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};

use nestling_backend::rest::{router, AppState};
use nestling_backend::storage::csv::CsvConnection;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let connection = match std::env::var("NESTLING_DATA_DIR") {
        Ok(dir) => CsvConnection::new(dir)?,
        Err(_) => CsvConnection::new_default()?,
    };
    info!("Data directory: {}", connection.base_directory().display());

    let state = AppState::new(Arc::new(connection));

    // CORS setup to allow a frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = router(state).layer(cors);

    let addr: SocketAddr = match std::env::var("BIND_ADDR") {
        Ok(value) => value.parse()?,
        Err(_) => SocketAddr::from(([127, 0, 0, 1], 3000)),
    };
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
