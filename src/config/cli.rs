use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::Result;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File-backed storage rooted at a data directory; each key is one file.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    pub fn from_config(config: &impl ConfigProvider) -> Self {
        Self::new(config.data_dir().to_string())
    }

    pub fn full_path(&self, path: &str) -> PathBuf {
        Path::new(&self.base_path).join(path)
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let full_path = self.full_path(path);
        match fs::read(&full_path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No stored data at {}", full_path.display());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.full_path(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(&full_path, data).await?;
        tracing::debug!("Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::TomlConfig;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

        let data = tokio_test::block_on(storage.read_file("absent.json")).unwrap();
        assert!(data.is_none());
        assert_eq!(storage.full_path("absent.json"), temp_dir.path().join("absent.json"));
    }

    #[test]
    fn test_from_config_roots_at_data_dir() {
        let config = TomlConfig::from_toml_str(
            r#"
[storage]
data_dir = "/var/lib/teams"
"#,
        )
        .unwrap();

        let storage = LocalStorage::from_config(&config);
        assert_eq!(
            storage.full_path("pokemon-teams.json"),
            Path::new("/var/lib/teams").join("pokemon-teams.json")
        );
    }

    #[tokio::test]
    async fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("nested").join("data");
        let storage = LocalStorage::new(base.to_str().unwrap().to_string());

        storage.write_file("teams.json", b"[]").await.unwrap();

        assert_eq!(
            storage.read_file("teams.json").await.unwrap(),
            Some(b"[]".to_vec())
        );
        assert!(base.join("teams.json").exists());
    }
}
