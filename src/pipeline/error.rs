//! Error types for pipeline stages.
//!
//! Every stage reports a [`Failure`] describing what went wrong. The orchestrator
//! wraps it into the [`Error`] variant that belongs to the failing stage, and the
//! exit code is derived from that variant alone.

use super::stage::Stage;
use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Exit code used when the operator interrupts the pipeline.
pub const EXIT_INTERRUPTED: i32 = 130;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Result type for a single stage, before it is attributed to a [`Stage`].
pub type StageResult<T> = std::result::Result<T, Failure>;

/// Fatal pipeline error, one variant per stage.
#[derive(Error, Debug)]
pub enum Error {
    /// The build environment could not be provisioned.
    #[error("provisioning failed: {0}")]
    Provisioning(Failure),

    /// Build-time packages could not be installed.
    #[error("dependency installation failed: {0}")]
    Install(Failure),

    /// The packaging tool failed to produce an executable.
    #[error("packaging failed: {0}")]
    Packaging(Failure),

    /// The packaged executable could not be published.
    #[error("publishing failed: {0}")]
    Publish(Failure),
}

/// What went wrong inside a stage.
#[derive(Error, Debug)]
pub enum Failure {
    /// No system interpreter could be resolved on the search path.
    #[error("no Python interpreter found on the search path (tried: {})", .tried.join(", "))]
    InterpreterNotFound {
        /// Program names that were searched for
        tried: Vec<String>,
    },

    /// The external process could not be started.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        /// Command line that was attempted
        command: String,
        /// Underlying spawn error
        #[source]
        source: io::Error,
    },

    /// The external process started but could not be waited on.
    #[error("lost track of `{command}` while waiting for it: {source}")]
    Wait {
        /// Command line that was running
        command: String,
        /// Underlying wait error
        #[source]
        source: io::Error,
    },

    /// The external process ran and exited unsuccessfully.
    #[error("`{command}` exited with {}", describe_code(.code))]
    ExitStatus {
        /// Command line that was run
        command: String,
        /// Exit code, `None` if terminated by a signal
        code: Option<i32>,
        /// Tail of the captured standard error output
        diagnostics: Option<String>,
    },

    /// A filesystem operation failed.
    #[error("{context} {}: {source}", .path.display())]
    Io {
        /// Operation being performed
        context: &'static str,
        /// Path the operation was applied to
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// A file the stage depends on does not exist.
    #[error("{what} not found at {}", .path.display())]
    MissingFile {
        /// Human readable description of the file
        what: &'static str,
        /// Expected location
        path: PathBuf,
    },

    /// The published copy differs from its source.
    #[error("published copy {} does not match {} (sha256 {expected} vs {actual})", .destination.display(), .source_path.display())]
    ChecksumMismatch {
        /// Packaged artifact
        source_path: PathBuf,
        /// Published copy
        destination: PathBuf,
        /// Checksum of the packaged artifact
        expected: String,
        /// Checksum of the published copy
        actual: String,
    },

    /// The operator pressed Ctrl-C; any running process was killed.
    #[error("interrupted")]
    Interrupted,
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl Error {
    /// Attributes a stage failure to the stage it happened in.
    pub fn from_stage(stage: Stage, failure: Failure) -> Self {
        match stage {
            Stage::Provision => Self::Provisioning(failure),
            Stage::Install => Self::Install(failure),
            Stage::Package => Self::Packaging(failure),
            Stage::Publish => Self::Publish(failure),
        }
    }

    /// Stage that failed.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Provisioning(_) => Stage::Provision,
            Self::Install(_) => Stage::Install,
            Self::Packaging(_) => Stage::Package,
            Self::Publish(_) => Stage::Publish,
        }
    }

    /// Underlying failure.
    pub fn failure(&self) -> &Failure {
        match self {
            Self::Provisioning(f) | Self::Install(f) | Self::Packaging(f) | Self::Publish(f) => f,
        }
    }

    /// Process exit code for this error.
    ///
    /// Interruption is reported as [`EXIT_INTERRUPTED`] whichever stage was running;
    /// every other failure maps to the code of its stage.
    pub fn exit_code(&self) -> i32 {
        match self.failure() {
            Failure::Interrupted => EXIT_INTERRUPTED,
            _ => self.stage().exit_code(),
        }
    }

    /// Captured diagnostics of the failing external process, if any.
    pub fn diagnostics(&self) -> Option<&str> {
        match self.failure() {
            Failure::ExitStatus { diagnostics, .. } => diagnostics.as_deref(),
            _ => None,
        }
    }

    /// Operator guidance for recovering from this error.
    pub fn recovery_suggestions(&self) -> Vec<String> {
        if let Failure::Interrupted = self.failure() {
            return vec!["Rerun the build; completed stages are reused".to_string()];
        }

        match self.stage() {
            Stage::Provision => vec![
                "Install Python 3 and make sure `python3` or `python` is on PATH".to_string(),
                "Or point --python / PILLAR_BUILD_PYTHON at an interpreter".to_string(),
                "If build_venv is half-created, delete it and rerun".to_string(),
            ],
            Stage::Install => vec![
                "Check network connectivity to the package index".to_string(),
                "Check free disk space".to_string(),
                "The installer output above names the failing package".to_string(),
            ],
            Stage::Package => vec![
                "Check that the application script exists and runs with the build interpreter"
                    .to_string(),
                "The packaging tool output above is reported unchanged".to_string(),
            ],
            Stage::Publish => vec![
                "Check that the packaging tool wrote the executable into dist/".to_string(),
                "Check write permissions on the publish directory".to_string(),
            ],
        }
    }
}

/// Extension trait attaching a description and path to IO errors.
pub trait ErrorExt<T> {
    /// Converts an IO error into [`Failure::Io`] with context.
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> StageResult<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> StageResult<T> {
        self.map_err(|source| Failure::Io {
            context,
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}
