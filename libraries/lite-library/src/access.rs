//! Read-permission gate for music directories

use crate::{LibraryError, Result};
use std::io::ErrorKind;
use std::path::PathBuf;

/// Verify the process may read every configured music directory
///
/// Missing directories pass (they just contribute no tracks). A directory
/// that exists but refuses listing is `LibraryError::PermissionDenied`.
pub fn check_access(directories: &[PathBuf]) -> Result<()> {
    for dir in directories {
        if !dir.exists() {
            tracing::warn!("Music directory {} does not exist", dir.display());
            continue;
        }

        match std::fs::read_dir(dir) {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                return Err(LibraryError::PermissionDenied(dir.clone()));
            }
            Err(e) => {
                tracing::warn!("Cannot list {}: {}", dir.display(), e);
            }
        }
    }

    Ok(())
}
