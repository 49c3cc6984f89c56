//! File operation utilities shared by the fetcher and the text writers

use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::debug;

use crate::error::{FileOperation, Result, SyncError};

/// Remove whatever occupies `path`, file or directory. A vacant path is fine.
pub async fn clear_path(path: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(SyncError::io(path, FileOperation::Read, e)),
    };

    let removed = if metadata.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    };
    removed.map_err(|e| SyncError::io(path, FileOperation::Delete, e))?;
    debug!("Removed existing {}", path.display());
    Ok(())
}

/// Move a staged download over its destination
///
/// Anything already at the destination is removed first. Both paths must be
/// on the same filesystem for the rename to be atomic.
pub async fn atomic_replace(staging: &Path, dest: &Path) -> Result<()> {
    if staging == dest {
        return Ok(());
    }
    clear_path(dest).await?;
    fs::rename(staging, dest)
        .await
        .map_err(|e| SyncError::io(dest, FileOperation::Move, e))?;
    debug!("Atomically renamed {} to {}", staging.display(), dest.display());
    Ok(())
}

/// Create a directory and its parents if missing
pub async fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .map_err(|e| SyncError::io(path, FileOperation::CreateDir, e))
}
