//! Scoped ownership of the generated-source directory.

use std::path::{Path, PathBuf};

use crate::ops::errors::BuildError;
use crate::util::fs::remove_dir_all_if_exists;

/// The temp source directory for one build.
///
/// Acquiring it wipes whatever a previous run left behind and creates a
/// fresh empty directory. It is removed again by [`close`](Self::close) or,
/// on any early return, when the guard is dropped.
#[derive(Debug)]
pub struct TempSourceDir {
    path: PathBuf,
    released: bool,
}

impl TempSourceDir {
    pub fn acquire(path: impl Into<PathBuf>) -> Result<Self, BuildError> {
        let path = path.into();

        remove_dir_all_if_exists(&path).map_err(|e| BuildError::fs("remove stale", &path, e))?;
        std::fs::create_dir_all(&path)
            .map_err(|e| BuildError::fs("create directory", &path, e))?;

        tracing::debug!("created {}", path.display());
        Ok(TempSourceDir {
            path,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the directory, reporting failure.
    pub fn close(mut self) -> Result<(), BuildError> {
        self.released = true;
        remove_dir_all_if_exists(&self.path).map_err(|e| BuildError::fs("remove", &self.path, e))
    }
}

impl Drop for TempSourceDir {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = remove_dir_all_if_exists(&self.path) {
            tracing::warn!("failed to remove {}: {}", self.path.display(), e);
        }
    }
}
