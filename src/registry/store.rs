// src/registry/store.rs

//! The process registry: id -> record, and every state transition on it.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::registry::record::{OutputSnapshot, ProcessId, ProcessRecord};
use crate::types::StreamKind;

/// Owns the mapping from process id to [`ProcessRecord`].
///
/// All mutation goes through this type, and the supervisor loop is its only
/// caller, so interleaved output/timeout/exit events for the same id apply
/// in the order they were observed.
#[derive(Debug, Default)]
pub struct ProcessRegistry {
    records: HashMap<ProcessId, ProcessRecord>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Publish a freshly launched process's record.
    pub fn insert(&mut self, record: ProcessRecord) {
        debug!(
            id = %record.id,
            command = %record.command,
            working_dir = %record.working_dir.display(),
            "process record inserted"
        );
        self.records.insert(record.id, record);
    }

    /// Append a chunk of stream data to the record's matching buffer.
    ///
    /// Returns `false` if the record no longer exists (e.g. it was evicted
    /// while the reader task still had buffered data in flight); the chunk
    /// is dropped in that case.
    pub fn append_output(&mut self, id: ProcessId, stream: StreamKind, chunk: &str) -> bool {
        let Some(record) = self.records.get_mut(&id) else {
            debug!(%id, ?stream, len = chunk.len(), "output chunk for unknown record dropped");
            return false;
        };

        match stream {
            StreamKind::Stdout => record.stdout.push_str(chunk),
            StreamKind::Stderr => record.stderr.push_str(chunk),
        }
        true
    }

    /// Record a timeout kill: flip `running` and append the termination note
    /// to stderr.
    ///
    /// Returns `false` if the record is unknown or already in a terminal
    /// state; `running` transitions false at most once.
    pub fn mark_terminated(&mut self, id: ProcessId, note: &str) -> bool {
        let Some(record) = self.records.get_mut(&id) else {
            warn!(%id, "timeout for unknown record ignored");
            return false;
        };

        if !record.running {
            debug!(%id, "timeout after terminal state ignored");
            return false;
        }

        record.running = false;
        record.termination_note = Some(note.to_string());
        if !record.stderr.is_empty() && !record.stderr.ends_with('\n') {
            record.stderr.push('\n');
        }
        record.stderr.push_str(note);
        record.stderr.push('\n');

        debug!(%id, note, "process marked terminated by timeout");
        true
    }

    /// Record a natural process exit.
    ///
    /// Returns `false` if the record is unknown or `running` was already
    /// cleared by the timeout path.
    pub fn mark_completed(&mut self, id: ProcessId) -> bool {
        let Some(record) = self.records.get_mut(&id) else {
            warn!(%id, "exit for unknown record ignored");
            return false;
        };

        if !record.running {
            debug!(%id, "exit after terminal state ignored");
            return false;
        }

        record.running = false;
        debug!(%id, "process marked completed");
        true
    }

    /// Point-in-time view of a record, or `None` for an unknown id.
    pub fn snapshot(&self, id: ProcessId) -> Option<OutputSnapshot> {
        self.records.get(&id).map(OutputSnapshot::of_record)
    }

    pub fn is_running(&self, id: ProcessId) -> Option<bool> {
        self.records.get(&id).map(|r| r.running)
    }

    /// Evict a record, returning it if it existed.
    pub fn remove(&mut self, id: ProcessId) -> Option<ProcessRecord> {
        let removed = self.records.remove(&id);
        if removed.is_some() {
            debug!(%id, "process record evicted");
        }
        removed
    }
}
