//! Backend for the nestling child health tracker.
//!
//! Layered the usual way: `domain` holds the models, services, and the
//! daily report engine; `storage` holds the CSV/YAML repositories behind
//! storage traits; `rest` holds the axum surface.

pub mod domain;
pub mod rest;
pub mod storage;
