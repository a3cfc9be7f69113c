//! File system utilities for publishing.

use crate::pipeline::error::{ErrorExt, Failure, StageResult};
use std::path::Path;
use tokio::fs;

/// Creates all directories of `path`; succeeds if it already exists.
pub async fn create_dir_all(path: &Path) -> StageResult<()> {
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Copies a regular file, replacing any existing file at `to`.
///
/// Fails with [`Failure::MissingFile`] if `from` is absent or not a regular file.
/// Parent directories of `to` are created as needed.
pub async fn copy_file(from: &Path, to: &Path, what: &'static str) -> StageResult<u64> {
    let is_file = fs::metadata(from)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);
    if !is_file {
        return Err(Failure::MissingFile {
            what,
            path: from.to_path_buf(),
        });
    }

    if let Some(dest_dir) = to.parent() {
        create_dir_all(dest_dir).await?;
    }
    fs::copy(from, to).await.fs_context("copying to", to)
}

/// Renames `from` to `to`, replacing `to` if it exists.
pub async fn rename(from: &Path, to: &Path) -> StageResult<()> {
    fs::rename(from, to).await.fs_context("renaming into", to)
}

/// Best-effort removal of a leftover file.
pub async fn remove_file(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        log::debug!("Could not remove {}: {}", path.display(), e);
    }
}
