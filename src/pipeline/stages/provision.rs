//! Environment provisioning: create the isolated build environment once, reuse it after.

use crate::pipeline::{
    builder::InterpreterLocator,
    context::BuildContext,
    error::{Failure, StageResult},
    utils::process::ToolCommand,
};
use std::path::PathBuf;

/// Output of the provisioning stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedEnvironment {
    /// Interpreter inside the environment.
    pub interpreter: PathBuf,
    /// Whether this run created the environment.
    pub created: bool,
}

/// Ensures the build environment exists.
///
/// If the environment interpreter is already present nothing is run. Otherwise
/// the system interpreter is resolved and `-m venv` creates the environment. No
/// process is spawned and nothing is written when no interpreter resolves.
pub async fn provision(
    context: &BuildContext,
    locator: &dyn InterpreterLocator,
) -> StageResult<ProvisionedEnvironment> {
    let interpreter = context.interpreter();
    if interpreter.is_file() {
        log::info!(
            "Reusing build environment at {}",
            context.env_dir().display()
        );
        return Ok(ProvisionedEnvironment {
            interpreter,
            created: false,
        });
    }

    let system_python = locator
        .resolve_interpreter()
        .ok_or_else(|| Failure::InterpreterNotFound {
            tried: locator.candidates(),
        })?;

    log::info!(
        "Creating build environment at {} with {}",
        context.env_dir().display(),
        system_python.display()
    );
    ToolCommand::new(&system_python)
        .args(["-m", "venv"])
        .arg(context.env_dir())
        .current_dir(context.root())
        .run()
        .await?;

    if !interpreter.is_file() {
        return Err(Failure::MissingFile {
            what: "environment interpreter",
            path: interpreter,
        });
    }

    Ok(ProvisionedEnvironment {
        interpreter,
        created: true,
    })
}
