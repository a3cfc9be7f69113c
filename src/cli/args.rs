//! Command line argument parsing.
//!
//! Every option is optional; with no arguments the build runs against the
//! current directory using the defaults and `pillar-build.toml` if present.

use crate::config::BuildConfig;
use crate::pipeline::{BuildContextBuilder, SearchPathLocator};
use clap::Parser;
use std::path::PathBuf;

/// Builds the video_pillar_crop single-file executable
#[derive(Parser, Debug, Default)]
#[command(
    name = "pillar_crop_bundler",
    version,
    about = "Builds the video_pillar_crop single-file executable",
    long_about = "Creates (or reuses) an isolated Python environment in build_venv/, installs the
build dependencies, packages video_pillar_crop.py with PyInstaller and publishes
the executable to dist_windows/video_pillar_crop.exe.

Exit codes:
  0   success
  1   provisioning the build environment failed
  2   installing build dependencies failed
  3   packaging failed
  4   publishing the artifact failed
  64  invalid arguments or configuration
  130 interrupted"
)]
pub struct Args {
    /// Root directory all build paths are derived from [default: current directory]
    #[arg(long, env = "PILLAR_BUILD_ROOT", value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// System interpreter used to create the environment [default: python3, then python]
    #[arg(long, env = "PILLAR_BUILD_PYTHON", value_name = "PROGRAM")]
    pub python: Option<String>,

    /// Application script to package, relative to the root
    #[arg(long, value_name = "PATH")]
    pub script: Option<PathBuf>,

    /// Name given to the packaging tool; the artifact is published as NAME.exe
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Build-time package to install (repeatable, replaces the default list)
    #[arg(long = "package", value_name = "SPEC")]
    pub packages: Vec<String>,

    /// Show debug logging and extra detail
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Merges arguments over the config file into a context builder.
    pub fn context_builder(&self, config: &BuildConfig) -> BuildContextBuilder {
        let mut builder = BuildContextBuilder::new();
        if let Some(root) = &self.root {
            builder = builder.root(root);
        }
        if let Some(script) = self.script.as_ref().or(config.script.as_ref()) {
            builder = builder.script(script);
        }
        if let Some(name) = self.name.as_ref().or(config.name.as_ref()) {
            builder = builder.app_name(name.clone());
        }
        if !self.packages.is_empty() {
            builder = builder.packages(self.packages.clone());
        } else if let Some(packages) = &config.packages {
            builder = builder.packages(packages.clone());
        }
        builder
    }

    /// Interpreter locator honouring `--python` and the config file.
    pub fn locator(&self, config: &BuildConfig) -> SearchPathLocator {
        match self.python.as_ref().or(config.python.as_ref()) {
            Some(program) => SearchPathLocator::with_program(program.clone()),
            None => SearchPathLocator::new(),
        }
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }
}
