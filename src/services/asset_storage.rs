use std::path::{Path, PathBuf};
use tokio::fs::{self, File};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid file name: {0}")]
    InvalidFileName(String),
    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

/// The shared public asset directory: upload destination and static root.
///
/// Files keep the name the client sent. Writing a name that already exists
/// replaces the previous file.
#[derive(Debug, Clone)]
pub struct AssetStorage {
    base_dir: PathBuf,
}

impl AssetStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Creates the asset directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_dir).await?;
        Ok(())
    }

    /// Resolves the on-disk location for a client-supplied file name.
    pub fn resolve(&self, original_name: &str) -> Result<PathBuf, StorageError> {
        if original_name.is_empty()
            || original_name == "."
            || original_name == ".."
            || original_name.contains(['/', '\\', '\0'])
        {
            return Err(StorageError::InvalidFileName(original_name.to_string()));
        }

        Ok(self.base_dir.join(original_name))
    }

    /// Opens (truncating) the destination file for `original_name`.
    pub async fn create(&self, original_name: &str) -> Result<(File, PathBuf), StorageError> {
        let path = self.resolve(original_name)?;
        let file = File::create(&path).await?;
        Ok((file, path))
    }
}
