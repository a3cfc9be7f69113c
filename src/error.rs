//! Top-level error type for the CLI.
//!
//! Pipeline failures keep their stage exit code; everything that goes wrong
//! before the first stage starts is a usage error.

use crate::config::ConfigError;
use crate::pipeline::ContextError;
use thiserror::Error;

/// Exit code for usage and configuration errors.
pub const EXIT_USAGE: i32 = 64;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// Config file errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Build context errors
    #[error("Invalid build context: {0}")]
    Context(#[from] ContextError),

    /// Stage failures
    #[error(transparent)]
    Pipeline(#[from] crate::pipeline::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl BundlerError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            BundlerError::Pipeline(e) => e.exit_code(),
            BundlerError::Cli(_)
            | BundlerError::Config(_)
            | BundlerError::Context(_)
            | BundlerError::Io(_) => EXIT_USAGE,
        }
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            BundlerError::Pipeline(e) => e.recovery_suggestions(),
            BundlerError::Config(_) => vec![format!(
                "Fix or remove {}",
                crate::config::CONFIG_FILE_NAME
            )],
            _ => vec!["Run with --help to see the accepted options".to_string()],
        }
    }
}
