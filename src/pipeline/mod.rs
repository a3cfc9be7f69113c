//! Build pipeline for the single-file executable.
//!
//! # Overview
//!
//! The pipeline:
//! 1. Provisions (or reuses) the isolated build environment under `build_venv/`
//! 2. Installs the build-time packages into it
//! 3. Runs the packaging tool to produce `dist/<name>`
//! 4. Publishes the executable to `dist_windows/<name>.exe`
//!
//! Stages run strictly in that order. The first failure aborts the run and maps
//! to the failing stage's exit code (see [`Stage::exit_code`]). Ctrl-C at any
//! point of a run kills the running tool and ends with [`EXIT_INTERRUPTED`].

pub mod builder;
pub mod context;
pub mod error;
pub mod stage;
pub mod stages;
pub mod utils;

pub use builder::{
    BuildReport, FixedLocator, Interrupt, InterpreterLocator, NoopObserver, Pipeline,
    SearchPathLocator, StageObserver,
};
pub use context::{BuildContext, BuildContextBuilder, ContextError};
pub use error::{EXIT_INTERRUPTED, Error, ErrorExt, Failure, Result};
pub use stage::{PipelineState, Stage};
