//! File-backed storage: one `<key>.json` file per key.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;
use ulid::Ulid;

use crate::error::Result;
use crate::{validate_key, Storage};

const EXTENSION: &str = "json";

/// Storage rooted at a directory on disk.
///
/// ```text
/// data/
///   leads.json
///   leads_custom_fields.json
///   activities.json
/// ```
///
/// The directory is created lazily on first write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create storage rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.{EXTENSION}"))
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        match fs::read_to_string(self.path_for(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        fs::create_dir_all(&self.root).await?;
        let path = self.path_for(key);
        atomic_write(&path, value.as_bytes()).await?;
        debug!(key, bytes = value.len(), "stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        if !self.root.exists() {
            return Ok(keys);
        }
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if !stem.starts_with('.') {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Write to a temp file then rename for atomic persistence.
async fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "no parent dir"))?;
    let tmp = dir.join(format!(".tmp_{}", Ulid::new()));
    if let Err(e) = fs::write(&tmp, data).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn read_missing_key_is_none() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::new(tmp.path().join("data"));
        assert_eq!(storage.read("leads").await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_then_read() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::new(tmp.path().join("data"));

        storage.write("leads", "[1,2,3]").await.unwrap();

        assert_eq!(
            storage.read("leads").await.unwrap().as_deref(),
            Some("[1,2,3]")
        );
        assert!(tmp.path().join("data/leads.json").exists());
    }

    #[tokio::test]
    async fn write_replaces_whole_value() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::new(tmp.path());

        storage.write("k", "a much longer first value").await.unwrap();
        storage.write("k", "short").await.unwrap();

        assert_eq!(storage.read("k").await.unwrap().as_deref(), Some("short"));
    }

    #[tokio::test]
    async fn no_temp_files_left_behind() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::new(tmp.path());

        storage.write("a", "1").await.unwrap();
        storage.write("b", "2").await.unwrap();

        let names: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(names.iter().all(|n| !n.starts_with(".tmp_")), "{names:?}");
        assert_eq!(storage.keys().await.unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn failed_rename_cleans_up_temp_file() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::new(tmp.path());
        std::fs::create_dir_all(tmp.path().join("leads.json/inner")).unwrap();

        assert!(storage.write("leads", "[]").await.is_err());

        let names: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["leads.json"]);
    }

    #[tokio::test]
    async fn remove_reports_existence() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::new(tmp.path());

        storage.write("k", "v").await.unwrap();
        assert!(storage.remove("k").await.unwrap());
        assert!(!storage.remove("k").await.unwrap());
        assert_eq!(storage.read("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn keys_on_missing_root_is_empty() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::new(tmp.path().join("nope"));
        assert!(storage.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_key_rejected_before_io() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::new(tmp.path());
        assert!(storage.write("../escape", "x").await.is_err());
        assert!(storage.read("").await.is_err());
    }
}
