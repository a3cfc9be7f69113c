//! The four pipeline stages.
//!
//! Each stage is a function of the [`BuildContext`](super::BuildContext) and the
//! prior stage's output, returning its own output or a [`Failure`](super::Failure).

pub mod install;
pub mod package;
pub mod provision;
pub mod publish;

pub use install::InstalledPackages;
pub use package::PackagedArtifact;
pub use provision::ProvisionedEnvironment;
pub use publish::PublishedArtifact;
