//! Artifact publishing.

use super::package::PackagedArtifact;
use crate::pipeline::{
    builder::checksum::calculate_sha256,
    context::BuildContext,
    error::{Failure, StageResult},
    utils::fs,
};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Output of the publish stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedArtifact {
    /// Final location.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// SHA-256 hex digest.
    pub checksum: String,
}

/// Copies the packaged executable into the publish directory.
///
/// Creates the publish directory if needed. The copy is written next to the
/// destination under a staging name, hashed against the source and only then
/// renamed over any earlier copy, so a bad copy never replaces a good one.
pub async fn publish(
    context: &BuildContext,
    packaged: &PackagedArtifact,
) -> StageResult<PublishedArtifact> {
    let publish_dir = context.publish_dir();
    fs::create_dir_all(&publish_dir).await?;

    let destination = context.published_path();
    let staged = staging_path(&destination);
    log::info!(
        "Publishing {} -> {}",
        packaged.path.display(),
        destination.display()
    );
    let size = fs::copy_file(&packaged.path, &staged, "packaged executable").await?;
    let checksum = commit_verified(&packaged.path, &staged, &destination).await?;

    log::debug!("Published artifact sha256 {}", checksum);
    Ok(PublishedArtifact {
        path: destination,
        size,
        checksum,
    })
}

fn staging_path(destination: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(destination.file_name().unwrap_or_default());
    name.push(".partial");
    destination.with_file_name(name)
}

/// Renames `staged` to `destination` if its hash matches `source`'s; removes it otherwise.
async fn commit_verified(source: &Path, staged: &Path, destination: &Path) -> StageResult<String> {
    let verified = verify_and_rename(source, staged, destination).await;
    if verified.is_err() {
        fs::remove_file(staged).await;
    }
    verified
}

async fn verify_and_rename(
    source: &Path,
    staged: &Path,
    destination: &Path,
) -> StageResult<String> {
    let expected = calculate_sha256(source).await?;
    let actual = calculate_sha256(staged).await?;
    if actual != expected {
        return Err(Failure::ChecksumMismatch {
            source_path: source.to_path_buf(),
            destination: destination.to_path_buf(),
            expected,
            actual,
        });
    }
    fs::rename(staged, destination).await?;
    Ok(actual)
}
