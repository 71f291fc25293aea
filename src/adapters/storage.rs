use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

/// Filesystem storage rooted at `base_path`. Absolute paths given to
/// `write_file` ignore the base.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    pub fn current_dir() -> Self {
        Self::new(".".to_string())
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // fs::write truncates an existing file.
        fs::write(full_path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

        storage.write_file("reports/steam.txt", b"hello").await.unwrap();

        let written = fs::read(temp_dir.path().join("reports/steam.txt")).unwrap();
        assert_eq!(written, b"hello");
    }

    #[tokio::test]
    async fn test_write_truncates() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

        storage.write_file("out.txt", b"a much longer first version").await.unwrap();
        storage.write_file("out.txt", b"short").await.unwrap();

        let written = fs::read_to_string(temp_dir.path().join("out.txt")).unwrap();
        assert_eq!(written, "short");
    }

    #[tokio::test]
    async fn test_write_to_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::current_dir();

        let result = storage
            .write_file(temp_dir.path().to_str().unwrap(), b"data")
            .await;

        assert!(result.is_err());
    }
}
