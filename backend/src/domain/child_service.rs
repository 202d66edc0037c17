use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::models::child::Child;
use crate::storage::csv::{ChildRepository, CsvConnection};
use crate::storage::traits::ChildStorage;
use shared::{CreateChildRequest, UpdateChildRequest};

/// Service for managing children in the tracking system
#[derive(Clone)]
pub struct ChildService {
    child_repository: ChildRepository,
}

impl ChildService {
    /// Create a new ChildService
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        let child_repository = ChildRepository::new(connection);
        Self { child_repository }
    }

    /// Create a new child
    pub fn create_child(&self, request: CreateChildRequest) -> Result<Child> {
        info!(
            "Creating child: name={}, date_of_birth={}",
            request.name, request.date_of_birth
        );

        self.validate_name(&request.name)?;
        self.validate_sex(&request.sex)?;
        let date_of_birth = parse_birthdate(&request.date_of_birth)?;

        let now = Utc::now();
        let child = Child {
            id: Child::generate_id(now.timestamp_millis() as u64),
            name: request.name.trim().to_string(),
            sex: request.sex.trim().to_string(),
            date_of_birth,
            created_at: now,
            updated_at: now,
        };

        self.child_repository.store_child(&child)?;

        info!("Created child: {} with ID: {}", child.name, child.id);

        Ok(child)
    }

    /// Get a child by ID
    pub fn get_child(&self, child_id: &str) -> Result<Option<Child>> {
        let child = self.child_repository.get_child(child_id)?;

        if child.is_none() {
            warn!("Child not found: {}", child_id);
        }

        Ok(child)
    }

    /// List all children
    pub fn list_children(&self) -> Result<Vec<Child>> {
        let children = self.child_repository.list_children()?;
        info!("Found {} children", children.len());
        Ok(children)
    }

    /// Update an existing child
    pub fn update_child(&self, child_id: &str, request: UpdateChildRequest) -> Result<Child> {
        info!("Updating child: {}", child_id);

        let mut child = self
            .child_repository
            .get_child(child_id)?
            .ok_or_else(|| anyhow::anyhow!("Child not found: {}", child_id))?;

        if let Some(ref name) = request.name {
            self.validate_name(name)?;
            child.name = name.trim().to_string();
        }
        if let Some(ref sex) = request.sex {
            self.validate_sex(sex)?;
            child.sex = sex.trim().to_string();
        }
        if let Some(ref date_of_birth) = request.date_of_birth {
            child.date_of_birth = parse_birthdate(date_of_birth)?;
        }

        child.updated_at = Utc::now();

        self.child_repository.update_child(&child)?;

        info!("Updated child: {} with ID: {}", child.name, child.id);

        Ok(child)
    }

    /// Delete a child and all of their records
    pub fn delete_child(&self, child_id: &str) -> Result<()> {
        info!("Deleting child: {}", child_id);

        let child = self
            .child_repository
            .get_child(child_id)?
            .ok_or_else(|| anyhow::anyhow!("Child not found: {}", child_id))?;

        self.child_repository.delete_child(child_id)?;

        info!("Deleted child: {} with ID: {}", child.name, child.id);

        Ok(())
    }

    fn validate_name(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(anyhow::anyhow!("Child name cannot be empty"));
        }
        if name.len() > 100 {
            return Err(anyhow::anyhow!("Child name cannot exceed 100 characters"));
        }
        Ok(())
    }

    fn validate_sex(&self, sex: &str) -> Result<()> {
        if sex.trim().is_empty() {
            return Err(anyhow::anyhow!("Child sex cannot be empty"));
        }
        Ok(())
    }
}

/// Parse a birthdate, insisting on the zero-padded ISO form that the rest
/// of the system's string date comparisons rely on.
fn parse_birthdate(value: &str) -> Result<NaiveDate> {
    let parsed = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date_of_birth '{}'. Use YYYY-MM-DD.", value))?;
    if parsed.format("%Y-%m-%d").to_string() != value {
        return Err(anyhow::anyhow!(
            "Invalid date_of_birth '{}'. Use zero-padded YYYY-MM-DD.",
            value
        ));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn setup_test() -> (ChildService, tempfile::TempDir) {
        let temp_dir = tempdir().unwrap();
        let conn = CsvConnection::new(temp_dir.path()).unwrap();
        (ChildService::new(Arc::new(conn)), temp_dir)
    }

    fn create_request(name: &str, date_of_birth: &str) -> CreateChildRequest {
        CreateChildRequest {
            name: name.to_string(),
            sex: "F".to_string(),
            date_of_birth: date_of_birth.to_string(),
        }
    }

    #[test]
    fn test_create_child() {
        let (service, _temp_dir) = setup_test();

        let child = service
            .create_child(create_request("  Test Child ", "2023-05-15"))
            .unwrap();
        assert_eq!(child.name, "Test Child");
        assert_eq!(child.sex, "F");
        assert_eq!(child.date_of_birth.to_string(), "2023-05-15");
        assert!(child.id.starts_with("child::"));
    }

    #[test]
    fn test_create_child_validation() {
        let (service, _temp_dir) = setup_test();

        assert!(service.create_child(create_request(" ", "2023-01-01")).is_err());
        assert!(service
            .create_child(create_request(&"a".repeat(101), "2023-01-01"))
            .is_err());
        assert!(service
            .create_child(create_request("Bad Date", "2023/01/01"))
            .is_err());
        assert!(service
            .create_child(create_request("Unpadded", "2023-1-1"))
            .is_err());

        let mut no_sex = create_request("No Sex", "2023-01-01");
        no_sex.sex = "".to_string();
        assert!(service.create_child(no_sex).is_err());
    }

    #[test]
    fn test_get_and_list_children() {
        let (service, _temp_dir) = setup_test();

        let created = service
            .create_child(create_request("Alice", "2022-02-02"))
            .unwrap();

        let retrieved = service.get_child(&created.id).unwrap().unwrap();
        assert_eq!(retrieved.id, created.id);
        assert_eq!(retrieved.name, "Alice");

        assert!(service.get_child("non-existent-id").unwrap().is_none());

        service
            .create_child(create_request("Bob", "2021-03-03"))
            .unwrap();
        let children = service.list_children().unwrap();
        assert_eq!(children.len(), 2);
        assert!(children.iter().any(|c| c.name == "Alice"));
        assert!(children.iter().any(|c| c.name == "Bob"));
    }

    #[test]
    fn test_update_child() {
        let (service, _temp_dir) = setup_test();

        let created = service
            .create_child(create_request("Original Name", "2022-01-01"))
            .unwrap();

        let updated = service
            .update_child(
                &created.id,
                UpdateChildRequest {
                    name: Some("  Updated Name  ".to_string()),
                    sex: Some("M".to_string()),
                    date_of_birth: Some("2022-02-02".to_string()),
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Updated Name");
        assert_eq!(updated.sex, "M");
        assert_eq!(updated.date_of_birth.to_string(), "2022-02-02");
        assert!(updated.updated_at >= created.created_at);
    }

    #[test]
    fn test_update_nonexistent_child() {
        let (service, _temp_dir) = setup_test();
        let result = service.update_child(
            "non-existent-id",
            UpdateChildRequest {
                name: Some("New Name".to_string()),
                sex: None,
                date_of_birth: None,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_delete_child() {
        let (service, _temp_dir) = setup_test();

        let created = service
            .create_child(create_request("To Be Deleted", "2022-01-01"))
            .unwrap();

        service.delete_child(&created.id).unwrap();
        assert!(service.get_child(&created.id).unwrap().is_none());

        assert!(service.delete_child("non-existent-id").is_err());
    }
}
