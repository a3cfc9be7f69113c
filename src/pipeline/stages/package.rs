//! Packaging tool invocation.
//!
//! Runs PyInstaller in single-file, console mode. The tool's own output is
//! passed through to the operator untouched; see [`ToolCommand::run`].

use crate::pipeline::{
    context::BuildContext,
    error::{Failure, StageResult},
    utils::process::ToolCommand,
};
use std::path::PathBuf;

/// Output of the packaging stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagedArtifact {
    /// Where the packaging tool writes the executable.
    ///
    /// Not verified here; a missing file is the publish stage's failure.
    pub path: PathBuf,
}

/// Builds the packaging tool command line for `context`.
pub fn packager_command(context: &BuildContext) -> ToolCommand {
    ToolCommand::new(context.packager())
        .args(["--noconfirm", "--onefile", "--console", "--name"])
        .arg(context.app_name())
        .arg("--distpath")
        .arg(context.dist_dir())
        .arg("--workpath")
        .arg(context.work_dir())
        .arg("--specpath")
        .arg(context.root())
        .arg(context.script())
        .current_dir(context.root())
}

/// Packages the application script into a single-file executable.
pub async fn package(context: &BuildContext) -> StageResult<PackagedArtifact> {
    if !context.script().is_file() {
        return Err(Failure::MissingFile {
            what: "application script",
            path: context.script().to_path_buf(),
        });
    }

    log::info!("Packaging {}", context.script().display());
    packager_command(context).run().await?;

    Ok(PackagedArtifact {
        path: context.packaged_path(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::context::BuildContextBuilder;

    #[test]
    fn command_requests_single_file_console_build_with_fixed_name() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = BuildContextBuilder::new().root(dir.path()).build().unwrap();
        let cmd = packager_command(&ctx);
        let args: Vec<String> = cmd
            .arguments()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(cmd.program(), ctx.packager());
        assert!(args.contains(&"--onefile".to_string()));
        assert!(args.contains(&"--console".to_string()));
        let name_at = args.iter().position(|a| a == "--name").unwrap();
        assert_eq!(args[name_at + 1], "video_pillar_crop");
        let dist_at = args.iter().position(|a| a == "--distpath").unwrap();
        assert_eq!(args[dist_at + 1], ctx.dist_dir().display().to_string());
        assert_eq!(args.last().unwrap(), &ctx.script().display().to_string());
    }

    #[tokio::test]
    async fn missing_script_fails_before_spawning() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = BuildContextBuilder::new().root(dir.path()).build().unwrap();

        let err = package(&ctx).await.unwrap_err();

        assert!(matches!(
            err,
            Failure::MissingFile {
                what: "application script",
                ..
            }
        ));
        assert!(!ctx.dist_dir().exists());
    }
}
