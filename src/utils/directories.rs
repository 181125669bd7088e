use crate::error::Result;
use std::path::Path;
use tracing::debug;

/// Lifecycle of the scratch and warehouse directories of a run.
pub struct StorageDirectories;

impl StorageDirectories {
    /// Remove a directory and everything below it; a missing directory is fine
    pub fn cleanup(path: &Path) -> Result<()> {
        if path.exists() {
            std::fs::remove_dir_all(path)?;
            debug!(path = %path.display(), "removed directory");
        }
        Ok(())
    }

    pub fn create(path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)?;
        Ok(())
    }

    /// Clean then create, leaving an empty directory
    pub fn reset(path: &Path) -> Result<()> {
        Self::cleanup(path)?;
        Self::create(path)
    }
}
