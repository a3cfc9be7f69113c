//! Build pipeline for the video_pillar_crop single-file executable.
//!
//! This library provides the stages the `pillar_crop_bundler` binary runs:
//! - provisioning an isolated Python build environment
//! - installing build-time packages into it
//! - packaging the application script with PyInstaller
//! - publishing the executable to a fixed output directory
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
pub use pipeline::{BuildContext, BuildContextBuilder, Pipeline, Stage};
