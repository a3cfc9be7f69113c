//! Pipeline orchestration and coordination.
//!
//! This module provides the main [`Pipeline`] orchestrator that runs the
//! provisioning, installation, packaging and publishing stages.
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 checksum calculation for published artifacts
//! - [`orchestrator`] - Main [`Pipeline`] struct and stage sequencing
//! - [`tool_detection`] - System interpreter discovery

pub mod checksum;
mod orchestrator;
mod tool_detection;

pub use orchestrator::{BuildReport, Interrupt, NoopObserver, Pipeline, StageObserver};
pub use tool_detection::{
    DEFAULT_CANDIDATES, FixedLocator, InterpreterLocator, SearchPathLocator,
};
