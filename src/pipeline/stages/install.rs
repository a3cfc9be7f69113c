//! Dependency installation into the build environment.

use crate::pipeline::{context::BuildContext, error::StageResult, utils::process::ToolCommand};

/// Output of the installation stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackages {
    pub packages: Vec<String>,
}

/// Installs or upgrades the context's package list with the environment's installer.
///
/// Safe to repeat: `--upgrade` converges an existing environment to the latest
/// compatible versions.
pub async fn install(context: &BuildContext) -> StageResult<InstalledPackages> {
    log::info!("Installing {}", context.packages().join(", "));

    ToolCommand::new(context.installer())
        .args(["install", "--upgrade"])
        .args(context.packages())
        .current_dir(context.root())
        .run()
        .await?;

    Ok(InstalledPackages {
        packages: context.packages().to_vec(),
    })
}
