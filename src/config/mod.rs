//! Optional build configuration from `pillar-build.toml` at the root.
//!
//! Every key is optional; values given on the command line (or through their
//! environment variables) take precedence over the file.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the root directory.
pub const CONFIG_FILE_NAME: &str = "pillar-build.toml";

/// Errors while reading the config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Contents of `pillar-build.toml`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Application script, relative to the root.
    pub script: Option<PathBuf>,

    /// Name handed to the packaging tool.
    pub name: Option<String>,

    /// System interpreter used to create the environment.
    pub python: Option<String>,

    /// Build-time packages, replacing the defaults.
    pub packages: Option<Vec<String>>,
}

impl BuildConfig {
    /// Loads `<root>/pillar-build.toml`, or the empty config if the file is absent.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE_NAME);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No {} in {}", CONFIG_FILE_NAME, root.display());
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        let config: Self =
            toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;
        log::debug!("Loaded {}: {:?}", path.display(), config);
        Ok(config)
    }
}
