//! # Storage Traits
//!
//! Abstractions over the storage backend so the domain layer never touches
//! files directly. The report engine in particular only ever sees the read
//! side of these traits, already materialized into collections.

use anyhow::Result;

use crate::domain::models::child::Child as DomainChild;

/// Trait defining the interface for child storage operations
pub trait ChildStorage: Send + Sync {
    /// Store a new child
    fn store_child(&self, child: &DomainChild) -> Result<()>;

    /// Retrieve a specific child by ID
    fn get_child(&self, child_id: &str) -> Result<Option<DomainChild>>;

    /// List all children ordered by name
    fn list_children(&self) -> Result<Vec<DomainChild>>;

    /// Update an existing child
    fn update_child(&self, child: &DomainChild) -> Result<()>;

    /// Delete a child by ID together with all of their event records
    fn delete_child(&self, child_id: &str) -> Result<()>;
}

/// Trait defining the interface for event record storage, generic over the
/// record kind (sleep, feeding, nappy change, medication, temperature,
/// growth).
pub trait RecordStorage<R>: Send + Sync {
    /// Store a new record for a child
    fn store_record(&self, child_id: &str, record: &R) -> Result<()>;

    /// List all records for a child, newest first
    fn list_records(&self, child_id: &str) -> Result<Vec<R>>;

    /// Records whose date field equals `date` exactly
    fn records_on_date(&self, child_id: &str, date: &str) -> Result<Vec<R>>;

    /// Records whose date falls in `[start_date, end_date]`, bounds
    /// inclusive. Comparison is lexicographic over the stored strings,
    /// which is correct because dates are zero-padded ISO 8601.
    fn records_in_range(&self, child_id: &str, start_date: &str, end_date: &str) -> Result<Vec<R>>;

    /// Delete a single record.
    /// Returns true if the record was found and deleted, false otherwise
    fn delete_record(&self, child_id: &str, record_id: &str) -> Result<bool>;
}
