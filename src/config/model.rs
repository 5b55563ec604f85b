// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::errors::ProcwardenError;
use crate::types::DEFAULT_TIMEOUT_SECS;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// allowed_roots = ["/srv/builds", "~/work"]
/// default_timeout_secs = 120
/// ```
///
/// Everything is optional: roots given on the command line are appended to
/// `allowed_roots`, and the timeout falls back to the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// Directories under which command working directories must resolve.
    #[serde(default)]
    pub allowed_roots: Vec<PathBuf>,

    /// Wall-clock timeout for commands that do not specify one.
    #[serde(default)]
    pub default_timeout_secs: Option<u64>,
}

/// Validated configuration used by the rest of the application.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub allowed_roots: Vec<PathBuf>,
    pub default_timeout_secs: u64,
}

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = ProcwardenError;

    fn try_from(raw: RawConfigFile) -> Result<Self, Self::Error> {
        let default_timeout_secs = raw.default_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if default_timeout_secs == 0 {
            return Err(ProcwardenError::ConfigError(
                "default_timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            allowed_roots: raw.allowed_roots,
            default_timeout_secs,
        })
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            allowed_roots: Vec::new(),
            default_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}
