use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::connection::CsvConnection;
use crate::domain::models::child::Child as DomainChild;
use crate::storage::traits::ChildStorage;

/// Intermediate struct for YAML serialization with string date fields
#[derive(Debug, Clone, Serialize, Deserialize)]
struct YamlChild {
    id: String,
    name: String,
    sex: String,
    date_of_birth: String,
    created_at: String,
    updated_at: String,
}

/// YAML-backed child repository using filesystem discovery: every
/// subdirectory of the base directory containing a `child.yaml` is a child.
#[derive(Clone)]
pub struct ChildRepository {
    connection: Arc<CsvConnection>,
}

impl ChildRepository {
    /// Create a new child repository
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self { connection }
    }

    /// Generate a safe filesystem identifier from a child name.
    /// Converts "Emma Smith" -> "emma_smith", "Kid #1" -> "kid_1", etc.
    pub fn safe_directory_name(child_name: &str) -> String {
        let mut result = String::new();
        let mut last_was_underscore = false;

        for c in child_name.chars() {
            if c.is_ascii_alphanumeric() {
                result.push(c.to_ascii_lowercase());
                last_was_underscore = false;
            } else if !last_was_underscore {
                result.push('_');
                last_was_underscore = true;
            }
        }

        result.trim_matches('_').to_string()
    }

    /// Get the path to a child's YAML configuration file
    fn child_yaml_path(&self, directory_name: &str) -> PathBuf {
        self.connection
            .child_directory(directory_name)
            .join("child.yaml")
    }

    /// Discover all children by scanning directories
    fn discover_children(&self) -> Result<Vec<DomainChild>> {
        let base_dir = self.connection.base_directory();

        if !base_dir.exists() {
            debug!("Base directory doesn't exist, returning empty children list");
            return Ok(Vec::new());
        }

        let mut children = Vec::new();

        for entry in fs::read_dir(base_dir)? {
            let entry = entry?;
            let path = entry.path();

            if !path.is_dir() {
                continue;
            }

            let dir_name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => {
                    warn!("Skipping directory with invalid name: {:?}", path);
                    continue;
                }
            };

            match self.load_child_from_directory(dir_name) {
                Ok(Some(child)) => {
                    debug!("Discovered child: {} from directory: {}", child.name, dir_name);
                    children.push(child);
                }
                Ok(None) => {
                    debug!("Directory {} doesn't contain a valid child", dir_name);
                }
                Err(e) => {
                    warn!("Error loading child from directory {}: {}", dir_name, e);
                }
            }
        }

        // Sort children by name for consistent ordering
        children.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(children)
    }

    /// Load a child from a specific directory
    fn load_child_from_directory(&self, directory_name: &str) -> Result<Option<DomainChild>> {
        let yaml_path = self.child_yaml_path(directory_name);

        if !yaml_path.exists() {
            return Ok(None);
        }

        let yaml_content = fs::read_to_string(&yaml_path)?;
        let yaml_child: YamlChild = serde_yaml::from_str(&yaml_content)?;

        let domain_child = DomainChild {
            id: yaml_child.id,
            name: yaml_child.name,
            sex: yaml_child.sex,
            date_of_birth: chrono::NaiveDate::parse_from_str(&yaml_child.date_of_birth, "%Y-%m-%d")
                .map_err(|e| anyhow::anyhow!("Failed to parse date_of_birth: {}", e))?,
            created_at: chrono::DateTime::parse_from_rfc3339(&yaml_child.created_at)
                .map_err(|e| anyhow::anyhow!("Failed to parse created_at: {}", e))?
                .with_timezone(&chrono::Utc),
            updated_at: chrono::DateTime::parse_from_rfc3339(&yaml_child.updated_at)
                .map_err(|e| anyhow::anyhow!("Failed to parse updated_at: {}", e))?
                .with_timezone(&chrono::Utc),
        };

        Ok(Some(domain_child))
    }

    /// Save a child to their directory
    fn save_child_to_directory(&self, child: &DomainChild, directory_name: &str) -> Result<()> {
        let child_dir = self.connection.child_directory(directory_name);
        if !child_dir.exists() {
            fs::create_dir_all(&child_dir)?;
            info!("Created child directory: {:?}", child_dir);
        }

        let yaml_child = YamlChild {
            id: child.id.clone(),
            name: child.name.clone(),
            sex: child.sex.clone(),
            date_of_birth: child.date_of_birth.format("%Y-%m-%d").to_string(),
            created_at: child.created_at.to_rfc3339(),
            updated_at: child.updated_at.to_rfc3339(),
        };

        let yaml_path = self.child_yaml_path(directory_name);
        let yaml_content = serde_yaml::to_string(&yaml_child)?;

        // Atomic write using temp file
        let temp_path = yaml_path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, &yaml_path)?;

        info!("Saved child {} to directory: {}", child.name, directory_name);

        Ok(())
    }

    /// Find the directory holding a child's data by ID. Scans directories
    /// instead of deriving the name from the current slug, so the child
    /// stays reachable even when directory and name disagree.
    pub fn find_directory_by_child_id(&self, child_id: &str) -> Result<Option<String>> {
        let base_dir = self.connection.base_directory();

        if !base_dir.exists() {
            return Ok(None);
        }

        for entry in fs::read_dir(base_dir)? {
            let entry = entry?;
            let path = entry.path();

            if !path.is_dir() {
                continue;
            }

            let dir_name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };

            if let Ok(Some(child)) = self.load_child_from_directory(&dir_name) {
                if child.id == child_id {
                    return Ok(Some(dir_name));
                }
            }
        }

        Ok(None)
    }
}

impl ChildStorage for ChildRepository {
    /// Store a new child
    fn store_child(&self, child: &DomainChild) -> Result<()> {
        let dir_name = Self::safe_directory_name(&child.name);
        self.save_child_to_directory(child, &dir_name)
    }

    /// Retrieve a specific child by ID
    fn get_child(&self, child_id: &str) -> Result<Option<DomainChild>> {
        let children = self.discover_children()?;
        Ok(children.into_iter().find(|c| c.id == child_id))
    }

    /// List all children ordered by name
    fn list_children(&self) -> Result<Vec<DomainChild>> {
        self.discover_children()
    }

    /// Update an existing child. A name change renames the child's
    /// directory first, keeping the record files reachable through the
    /// new slug.
    fn update_child(&self, child: &DomainChild) -> Result<()> {
        let current_dir = match self.find_directory_by_child_id(&child.id)? {
            Some(dir_name) => dir_name,
            None => {
                warn!("Attempted to update a non-existent child: {}", child.id);
                return Err(anyhow::anyhow!("Child not found for update"));
            }
        };

        let new_dir = Self::safe_directory_name(&child.name);
        if new_dir != current_dir {
            let from = self.connection.child_directory(&current_dir);
            let to = self.connection.child_directory(&new_dir);
            if to.exists() {
                return Err(anyhow::anyhow!(
                    "Directory '{}' is already in use by another child",
                    new_dir
                ));
            }
            fs::rename(&from, &to)?;
            info!("Renamed child directory {} -> {}", current_dir, new_dir);
        }

        self.save_child_to_directory(child, &new_dir)
    }

    /// Delete a child by ID. Removing the directory also removes every
    /// record file inside it.
    fn delete_child(&self, child_id: &str) -> Result<()> {
        if let Some(dir_name) = self.find_directory_by_child_id(child_id)? {
            let child_dir = self.connection.child_directory(&dir_name);
            if child_dir.exists() {
                fs::remove_dir_all(&child_dir)?;
                info!("Deleted child directory: {:?}", child_dir);
            }
        } else {
            warn!("Attempted to delete a non-existent child: {}", child_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_repo() -> (ChildRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        let repo = ChildRepository::new(Arc::new(connection));
        (repo, temp_dir)
    }

    fn make_child(id: &str, name: &str) -> DomainChild {
        let now = chrono::Utc::now();
        DomainChild {
            id: id.to_string(),
            name: name.to_string(),
            sex: "F".to_string(),
            date_of_birth: chrono::NaiveDate::from_ymd_opt(2023, 5, 15).unwrap(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_safe_directory_name() {
        assert_eq!(ChildRepository::safe_directory_name("Emma Smith"), "emma_smith");
        assert_eq!(ChildRepository::safe_directory_name("Kid #1"), "kid_1");
        assert_eq!(ChildRepository::safe_directory_name("Test-Child"), "test_child");
        assert_eq!(ChildRepository::safe_directory_name("  Spaced  "), "spaced");
    }

    #[test]
    fn test_store_and_discover_child() {
        let (repo, _temp_dir) = setup_test_repo();

        let child = make_child("child::123", "Test Child");
        repo.store_child(&child).expect("Failed to store child");

        let children = repo.list_children().expect("Failed to list children");
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name, "Test Child");
        assert_eq!(children[0].id, "child::123");

        let retrieved = repo.get_child("child::123").expect("Failed to get child");
        assert!(retrieved.is_some());
        let retrieved = retrieved.unwrap();
        assert_eq!(retrieved.sex, "F");
        assert_eq!(retrieved.date_of_birth.to_string(), "2023-05-15");
    }

    #[test]
    fn test_children_listed_sorted_by_name() {
        let (repo, _temp_dir) = setup_test_repo();

        repo.store_child(&make_child("child::2", "Zoe")).unwrap();
        repo.store_child(&make_child("child::1", "Alice")).unwrap();

        let children = repo.list_children().unwrap();
        assert_eq!(children[0].name, "Alice");
        assert_eq!(children[1].name, "Zoe");
    }

    #[test]
    fn test_delete_child_removes_directory() {
        let (repo, temp_dir) = setup_test_repo();

        let child = make_child("child::9", "Short Lived");
        repo.store_child(&child).unwrap();
        assert!(temp_dir.path().join("short_lived").exists());

        repo.delete_child("child::9").unwrap();
        assert!(!temp_dir.path().join("short_lived").exists());
        assert!(repo.get_child("child::9").unwrap().is_none());
    }

    #[test]
    fn test_rename_moves_directory_with_its_record_files() {
        let (repo, temp_dir) = setup_test_repo();

        let mut child = make_child("child::7", "Old Name");
        repo.store_child(&child).unwrap();
        fs::write(
            temp_dir.path().join("old_name").join("sleep.csv"),
            "id,child_id,sleep_date,sleep_type,start_time,end_time\n",
        )
        .unwrap();

        child.name = "New Name".to_string();
        repo.update_child(&child).unwrap();

        assert!(!temp_dir.path().join("old_name").exists());
        assert!(temp_dir.path().join("new_name").join("sleep.csv").exists());
        assert_eq!(
            repo.find_directory_by_child_id("child::7").unwrap().as_deref(),
            Some("new_name")
        );

        let loaded = repo.get_child("child::7").unwrap().unwrap();
        assert_eq!(loaded.name, "New Name");

        repo.delete_child("child::7").unwrap();
        assert!(!temp_dir.path().join("new_name").exists());
    }

    #[test]
    fn test_rename_onto_another_childs_directory_fails() {
        let (repo, _temp_dir) = setup_test_repo();

        repo.store_child(&make_child("child::1", "Alice")).unwrap();
        repo.store_child(&make_child("child::2", "Bob")).unwrap();

        let mut bob = repo.get_child("child::2").unwrap().unwrap();
        bob.name = "Alice".to_string();
        assert!(repo.update_child(&bob).is_err());
    }

    #[test]
    fn test_update_nonexistent_child_fails() {
        let (repo, _temp_dir) = setup_test_repo();
        let child = make_child("child::404", "Ghost");
        assert!(repo.update_child(&child).is_err());
    }
}
