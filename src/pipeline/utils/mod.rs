//! Shared helpers for stages: file operations and external process execution.

pub mod fs;
pub mod process;
