// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

use crate::registry::ProcessId;

#[derive(Error, Debug)]
pub enum ProcwardenError {
    #[error("working directory {path:?} is outside the allowed roots {roots:?}")]
    DirectoryNotAllowed {
        path: PathBuf,
        roots: Vec<PathBuf>,
    },

    #[error("failed to launch process: {0}")]
    Launch(String),

    #[error("no process with id {0}")]
    ProcessNotFound(ProcessId),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ProcwardenError>;
