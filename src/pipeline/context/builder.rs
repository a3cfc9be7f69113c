//! Builder for constructing BuildContext.

use super::BuildContext;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default application script, relative to the root.
pub const DEFAULT_SCRIPT: &str = "video_pillar_crop.py";

/// Default name handed to the packaging tool.
pub const DEFAULT_APP_NAME: &str = "video_pillar_crop";

/// Default build-time packages: the installer itself, the packaging tool, and the
/// libraries the application script imports.
pub const DEFAULT_PACKAGES: &[&str] = &["pip", "pyinstaller", "pillow", "numpy"];

/// Errors raised while assembling a [`BuildContext`].
#[derive(Error, Debug)]
pub enum ContextError {
    #[error("root directory {} is not accessible: {source}", .path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("root {} is not a directory", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("invalid application name {0:?}: must be non-empty and contain no path separators")]
    InvalidName(String),

    #[error("package list is empty")]
    NoPackages,
}

/// Builder for constructing [`BuildContext`].
///
/// Unset fields fall back to the defaults above; the root falls back to the
/// current working directory.
#[derive(Default, Debug)]
pub struct BuildContextBuilder {
    root: Option<PathBuf>,
    script: Option<PathBuf>,
    app_name: Option<String>,
    packages: Option<Vec<String>>,
}

impl BuildContextBuilder {
    /// Creates a new context builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the root directory every path is derived from.
    pub fn root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the application script. Relative paths are resolved against the root.
    pub fn script<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.script = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the name handed to the packaging tool.
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    /// Replaces the build-time package list.
    pub fn packages(mut self, packages: Vec<String>) -> Self {
        self.packages = Some(packages);
        self
    }

    /// Builds the context.
    ///
    /// # Errors
    ///
    /// Fails if the root cannot be resolved to an existing directory, if the
    /// application name is not a plain file name, or if the package list is empty.
    pub fn build(self) -> Result<BuildContext, ContextError> {
        let root = match self.root {
            Some(root) => root,
            None => std::env::current_dir().map_err(|source| ContextError::Root {
                path: PathBuf::from("."),
                source,
            })?,
        };
        let root = std::fs::canonicalize(&root).map_err(|source| ContextError::Root {
            path: root.clone(),
            source,
        })?;
        if !root.is_dir() {
            return Err(ContextError::RootNotDirectory(root));
        }

        let app_name = self
            .app_name
            .unwrap_or_else(|| DEFAULT_APP_NAME.to_string());
        if app_name.is_empty() || app_name.contains(['/', '\\']) {
            return Err(ContextError::InvalidName(app_name));
        }

        let script = self
            .script
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRIPT));
        let script = if script.is_absolute() {
            script
        } else {
            root.join(script)
        };

        let packages = self
            .packages
            .unwrap_or_else(|| DEFAULT_PACKAGES.iter().map(|p| p.to_string()).collect());
        if packages.is_empty() {
            return Err(ContextError::NoPackages);
        }

        Ok(BuildContext::new(root, script, app_name, packages))
    }
}
