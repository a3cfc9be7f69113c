//! Pipeline stages and the state machine that walks through them.

use std::fmt;

/// One ordered phase of the build pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Create or reuse the isolated build environment.
    Provision,
    /// Install build-time packages into the environment.
    Install,
    /// Run the packaging tool against the application script.
    Package,
    /// Copy the packaged executable to the publish directory.
    Publish,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 4] = [Stage::Provision, Stage::Install, Stage::Package, Stage::Publish];

    /// Exit code reported when this stage fails.
    ///
    /// Codes are fixed and distinct per stage; `0` is reserved for success.
    pub const fn exit_code(self) -> i32 {
        match self {
            Stage::Provision => 1,
            Stage::Install => 2,
            Stage::Package => 3,
            Stage::Publish => 4,
        }
    }

    /// Short title used in section headers.
    pub const fn title(self) -> &'static str {
        match self {
            Stage::Provision => "Provisioning build environment",
            Stage::Install => "Installing build dependencies",
            Stage::Package => "Packaging executable",
            Stage::Publish => "Publishing artifact",
        }
    }

    /// State the pipeline is in while this stage runs.
    pub const fn running_state(self) -> PipelineState {
        match self {
            Stage::Provision => PipelineState::Provisioning,
            Stage::Install => PipelineState::Installing,
            Stage::Package => PipelineState::Packaging,
            Stage::Publish => PipelineState::Publishing,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Provision => "provision",
            Stage::Install => "install",
            Stage::Package => "package",
            Stage::Publish => "publish",
        };
        f.write_str(name)
    }
}

/// Position of a pipeline run.
///
/// `Done` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Start,
    Provisioning,
    Installing,
    Packaging,
    Publishing,
    Done,
    Failed { stage: Stage, exit_code: i32 },
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed { .. })
    }
}
