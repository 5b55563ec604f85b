// src/wire.rs

//! Line-delimited JSON framing for the two supervision operations.
//!
//! One request per line on stdin, one response per line on stdout. This is
//! deliberately framing only: the enums here carry no semantics, they map
//! one-to-one onto [`crate::engine::SupervisorHandle`] calls.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::ProcwardenError;
use crate::registry::OutputSnapshot;

/// A single caller request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    /// Start a command under a supervised working directory.
    Start {
        command: String,
        #[serde(default)]
        working_dir: Option<PathBuf>,
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
    /// Read the accumulated output of a previously started command.
    Read {
        id: String,
        #[serde(default)]
        clear: bool,
    },
}

/// A single response line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    /// A command was launched; `id` is the caller's handle to it.
    Started { id: String },
    /// Snapshot of a process's accumulated state.
    Output {
        id: String,
        #[serde(flatten)]
        snapshot: OutputSnapshot,
    },
    /// Any failure, as a typed kind plus human-readable message.
    Error { kind: ErrorKind, message: String },
}

/// Failure taxonomy exposed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Working directory resolves outside every allowed root.
    DirectoryNotAllowed,
    /// The OS refused or failed to create the process.
    Launch,
    /// Unknown or already-evicted process id.
    NotFound,
    /// The request line was not a well-formed request.
    BadRequest,
    /// Anything else; nothing in the core is fatal to the host process.
    Internal,
}

impl Response {
    pub fn from_error(err: &ProcwardenError) -> Self {
        let kind = match err {
            ProcwardenError::DirectoryNotAllowed { .. } => ErrorKind::DirectoryNotAllowed,
            ProcwardenError::Launch(_) => ErrorKind::Launch,
            ProcwardenError::ProcessNotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Internal,
        };
        Response::Error {
            kind,
            message: err.to_string(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Response::Error {
            kind: ErrorKind::BadRequest,
            message: message.into(),
        }
    }

    pub fn not_found(id: &str) -> Self {
        Response::Error {
            kind: ErrorKind::NotFound,
            message: format!("no process with id {id}"),
        }
    }
}
