//! System interpreter detection.
//!
//! The provisioning stage asks an [`InterpreterLocator`] for the system-wide
//! interpreter instead of consulting `PATH` directly, so the "no interpreter"
//! path can be exercised without touching the real search path.

use std::path::PathBuf;

/// Capability to resolve the system-wide Python interpreter.
pub trait InterpreterLocator: Send + Sync {
    /// Returns the interpreter to create environments with, or `None` if none is usable.
    fn resolve_interpreter(&self) -> Option<PathBuf>;

    /// Program names that were considered, for error messages.
    fn candidates(&self) -> Vec<String>;
}

/// Default interpreter names, searched in order.
#[cfg(windows)]
pub const DEFAULT_CANDIDATES: &[&str] = &["python", "py"];

/// Default interpreter names, searched in order.
#[cfg(not(windows))]
pub const DEFAULT_CANDIDATES: &[&str] = &["python3", "python"];

/// Resolves the interpreter through the process search path.
///
/// Each candidate must be found by `which` and answer `--version` successfully;
/// stub launchers that exist but cannot run are skipped.
#[derive(Debug, Clone)]
pub struct SearchPathLocator {
    candidates: Vec<String>,
}

impl SearchPathLocator {
    /// Searches for the platform's default interpreter names.
    pub fn new() -> Self {
        Self {
            candidates: DEFAULT_CANDIDATES.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Searches only for `program` (a name on the search path or a path).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            candidates: vec![program.into()],
        }
    }
}

impl Default for SearchPathLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl InterpreterLocator for SearchPathLocator {
    fn resolve_interpreter(&self) -> Option<PathBuf> {
        self.candidates.iter().find_map(|name| probe(name))
    }

    fn candidates(&self) -> Vec<String> {
        self.candidates.clone()
    }
}

fn probe(name: &str) -> Option<PathBuf> {
    let path = match which::which(name) {
        Ok(path) => path,
        Err(e) => {
            log::debug!("{} not found in PATH: {}", name, e);
            return None;
        }
    };
    log::debug!("Found {} at: {}", name, path.display());

    match std::process::Command::new(&path).arg("--version").output() {
        Ok(output) if output.status.success() => {
            // Python 2 printed its version on stderr.
            let version = if output.stdout.is_empty() {
                String::from_utf8_lossy(&output.stderr).into_owned()
            } else {
                String::from_utf8_lossy(&output.stdout).into_owned()
            };
            log::info!("✓ Using interpreter {} ({})", path.display(), version.trim());
            Some(path)
        }
        Ok(output) => {
            log::warn!(
                "{} found at {} but --version failed (exit code: {:?}). Stderr: {}",
                name,
                path.display(),
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            None
        }
        Err(e) => {
            log::warn!(
                "{} found at {} but failed to execute: {}. Check file permissions.",
                name,
                path.display(),
                e
            );
            None
        }
    }
}

/// Locator returning a fixed answer.
#[derive(Debug, Clone, Default)]
pub struct FixedLocator {
    interpreter: Option<PathBuf>,
}

impl FixedLocator {
    /// Always resolves to `interpreter`.
    pub fn found(interpreter: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: Some(interpreter.into()),
        }
    }

    /// Never resolves an interpreter.
    pub fn missing() -> Self {
        Self { interpreter: None }
    }
}

impl InterpreterLocator for FixedLocator {
    fn resolve_interpreter(&self) -> Option<PathBuf> {
        self.interpreter.clone()
    }

    fn candidates(&self) -> Vec<String> {
        self.interpreter
            .iter()
            .map(|p| p.display().to_string())
            .collect()
    }
}
