// src/registry/record.rs

//! Per-process record and caller-facing snapshot types.

use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque handle to a launched process.
///
/// Generated at launch; the caller's only way to refer to the process
/// afterwards. Ids are random v4 UUIDs and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessId(Uuid);

impl ProcessId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an id from its string form.
    ///
    /// Returns `None` for anything that is not a well-formed UUID; callers
    /// treat that the same as an id that was never issued.
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s.trim()).ok().map(Self)
    }
}

impl Default for ProcessId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Observable state of one launched command.
///
/// Owned exclusively by [`super::ProcessRegistry`]; the executor side only
/// ever refers to a record by id through supervisor events.
#[derive(Debug, Clone)]
pub struct ProcessRecord {
    pub id: ProcessId,
    /// The command line exactly as submitted, retained for reporting.
    pub command: String,
    /// Absolute, normalized directory the process was launched in.
    pub working_dir: PathBuf,
    /// Monotonic launch timestamp; elapsed runtime is computed against this
    /// at read time.
    pub started_at: Instant,
    /// True from launch until the process exits or is killed by timeout.
    pub running: bool,
    /// Accumulated stdout, append-only while the record exists.
    pub stdout: String,
    /// Accumulated stderr, append-only while the record exists.
    pub stderr: String,
    /// Set only when the process was killed by its timeout; the same text is
    /// appended to `stderr`.
    pub termination_note: Option<String>,
}

impl ProcessRecord {
    pub fn new(id: ProcessId, command: String, working_dir: PathBuf) -> Self {
        Self {
            id,
            command,
            working_dir,
            started_at: Instant::now(),
            running: true,
            stdout: String::new(),
            stderr: String::new(),
            termination_note: None,
        }
    }
}

/// Point-in-time view of a record, as returned to a caller.
///
/// `elapsed_secs` is computed when the snapshot is taken, not frozen at
/// process completion, so repeated reads of a running process show an
/// increasing runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSnapshot {
    pub command: String,
    pub working_dir: PathBuf,
    pub running: bool,
    pub elapsed_secs: f64,
    pub stdout: String,
    pub stderr: String,
}

impl OutputSnapshot {
    pub fn of_record(record: &ProcessRecord) -> Self {
        Self {
            command: record.command.clone(),
            working_dir: record.working_dir.clone(),
            running: record.running,
            elapsed_secs: record.started_at.elapsed().as_secs_f64(),
            stdout: record.stdout.clone(),
            stderr: record.stderr.clone(),
        }
    }
}
