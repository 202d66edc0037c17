//! CSV/YAML storage backend.
//!
//! Each child gets a directory under the base data directory, named with a
//! filesystem-safe slug of their name, holding a `child.yaml` plus one CSV
//! file per event kind.

pub mod child_repository;
pub mod connection;
pub mod record_repository;

pub use child_repository::ChildRepository;
pub use connection::CsvConnection;
pub use record_repository::{CsvRecord, RecordRepository};
