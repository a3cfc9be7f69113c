//! Build context: the immutable set of paths and names shared by every stage.

mod builder;
mod core;

pub use builder::{BuildContextBuilder, ContextError, DEFAULT_APP_NAME, DEFAULT_PACKAGES, DEFAULT_SCRIPT};
pub use self::core::BuildContext;
