//! Core BuildContext struct.

use std::path::{Path, PathBuf};

/// Name of the isolated build environment directory under the root.
pub const ENV_DIR_NAME: &str = "build_venv";

/// Packaging tool output directory under the root.
pub const DIST_DIR_NAME: &str = "dist";

/// Packaging tool intermediate directory under the root.
pub const WORK_DIR_NAME: &str = "build";

/// Final publish directory under the root.
pub const PUBLISH_DIR_NAME: &str = "dist_windows";

/// Suffix the published artifact always carries.
pub const ARTIFACT_SUFFIX: &str = ".exe";

/// Immutable description of one build.
///
/// Computed once at startup via [`BuildContextBuilder`](super::BuildContextBuilder)
/// and shared read-only by every stage. All paths are derived from `root`.
///
/// # Examples
///
/// ```no_run
/// use pillar_crop_bundler::pipeline::BuildContextBuilder;
///
/// # fn example() -> Result<(), pillar_crop_bundler::pipeline::ContextError> {
/// let context = BuildContextBuilder::new()
///     .root("/work/pillar")
///     .build()?;
///
/// assert!(context.publish_dir().ends_with("dist_windows"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct BuildContext {
    /// Absolute root directory.
    root: PathBuf,

    /// Application script handed to the packaging tool.
    script: PathBuf,

    /// Name handed to the packaging tool's `--name`.
    app_name: String,

    /// Build-time packages installed into the environment.
    packages: Vec<String>,
}

impl BuildContext {
    /// Creates a new BuildContext (used by BuildContextBuilder).
    pub(super) fn new(
        root: PathBuf,
        script: PathBuf,
        app_name: String,
        packages: Vec<String>,
    ) -> Self {
        Self {
            root,
            script,
            app_name,
            packages,
        }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the isolated build environment directory.
    pub fn env_dir(&self) -> PathBuf {
        self.root.join(ENV_DIR_NAME)
    }

    /// Returns the environment's interpreter.
    pub fn interpreter(&self) -> PathBuf {
        env_executable(&self.env_dir(), "python")
    }

    /// Returns the environment's package installer.
    pub fn installer(&self) -> PathBuf {
        env_executable(&self.env_dir(), "pip")
    }

    /// Returns the environment's packaging tool.
    pub fn packager(&self) -> PathBuf {
        env_executable(&self.env_dir(), "pyinstaller")
    }

    /// Returns the packaging tool's output directory.
    pub fn dist_dir(&self) -> PathBuf {
        self.root.join(DIST_DIR_NAME)
    }

    /// Returns the packaging tool's intermediate build directory.
    pub fn work_dir(&self) -> PathBuf {
        self.root.join(WORK_DIR_NAME)
    }

    /// Returns the final publish directory.
    pub fn publish_dir(&self) -> PathBuf {
        self.root.join(PUBLISH_DIR_NAME)
    }

    /// Returns the application script.
    pub fn script(&self) -> &Path {
        &self.script
    }

    /// Returns the name passed to the packaging tool.
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Returns the file name of the published artifact.
    pub fn artifact_name(&self) -> String {
        format!("{}{}", self.app_name, ARTIFACT_SUFFIX)
    }

    /// Returns where the packaging tool writes the executable.
    ///
    /// The tool appends the host executable suffix itself, so this is `.exe` on
    /// Windows and bare elsewhere.
    pub fn packaged_path(&self) -> PathBuf {
        self.dist_dir()
            .join(format!("{}{}", self.app_name, std::env::consts::EXE_SUFFIX))
    }

    /// Returns the final published artifact path.
    pub fn published_path(&self) -> PathBuf {
        self.publish_dir().join(self.artifact_name())
    }

    /// Returns the build-time packages.
    pub fn packages(&self) -> &[String] {
        &self.packages
    }
}

/// Path of an executable inside a virtual environment.
#[cfg(windows)]
fn env_executable(env_dir: &Path, name: &str) -> PathBuf {
    env_dir.join("Scripts").join(format!("{name}.exe"))
}

/// Path of an executable inside a virtual environment.
#[cfg(not(windows))]
fn env_executable(env_dir: &Path, name: &str) -> PathBuf {
    env_dir.join("bin").join(name)
}
