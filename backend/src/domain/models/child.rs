use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Domain model for a child. Event records hang off a child by `child_id`
/// and are deleted together with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub id: String,
    pub name: String,
    pub sex: String,
    pub date_of_birth: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Child {
    /// Generate a unique ID for a child
    pub fn generate_id(timestamp_millis: u64) -> String {
        format!("child::{}", timestamp_millis)
    }

    pub fn to_dto(&self) -> shared::ChildDto {
        shared::ChildDto {
            id: self.id.clone(),
            name: self.name.clone(),
            sex: self.sex.clone(),
            date_of_birth: self.date_of_birth.format("%Y-%m-%d").to_string(),
        }
    }
}
