use crate::error::StorageError;
use log::{debug, info};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Image storage used by course and module forms
pub trait FileStorage: Send + Sync {
    /// Stores `bytes` at `path` and returns the URL it can be fetched from
    fn upload(&self, path: &str, bytes: &[u8]) -> Result<String, StorageError>;

    fn delete(&self, path: &str) -> Result<(), StorageError>;
}

pub fn course_image_path(course_id: &str, file_name: &str) -> String {
    format!("courses/{}/{}", course_id, file_name)
}

pub fn module_image_path(course_id: &str, module_id: &str, file_name: &str) -> String {
    format!("courses/{}/modules/{}/{}", course_id, module_id, file_name)
}

/// Keeps files under a root directory and hands out `file://` URLs
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalFileStorage { root: root.into() }
    }

    /// Maps a storage path to a file below the root. Absolute paths and `..` are rejected.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        let plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if path.trim().is_empty() || !plain {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl FileStorage for LocalFileStorage {
    fn upload(&self, path: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, bytes)?;
        info!("Stored {} bytes at {}", bytes.len(), target.display());
        Ok(format!("file://{}", target.display()))
    }

    fn delete(&self, path: &str) -> Result<(), StorageError> {
        let target = self.resolve(path)?;
        if !target.is_file() {
            return Err(StorageError::NotFound(path.to_string()));
        }
        fs::remove_file(&target)?;
        debug!("Removed {}", target.display());
        Ok(())
    }
}
