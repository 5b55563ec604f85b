// src/engine/mod.rs

//! Supervision engine.
//!
//! This module ties together:
//! - the process registry (pure state, in [`crate::registry`])
//! - the working-directory allowlist
//! - the main supervisor event loop that reacts to:
//!   - caller requests (start a command, read accumulated output)
//!   - stream chunks from running processes
//!   - timeout expiries
//!   - process exits
//!   - shutdown signals
//!
//! All registry mutation happens on the supervisor task; the executor side
//! in [`crate::exec`] only communicates through [`SupervisorEvent`]s, so
//! events for one process apply in arrival order without locking.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::allowlist::PathAllowlist;
use crate::errors::Result;
use crate::exec::RealExecutorBackend;
use crate::registry::{OutputSnapshot, ProcessId};
use crate::types::StreamKind;

pub mod handle;
pub mod supervisor;

pub use handle::SupervisorHandle;
pub use supervisor::Supervisor;

/// Capacity of the supervisor event channel.
///
/// Executor-side senders block (briefly) when the loop falls behind rather
/// than dropping events.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// A caller's request to start one command.
#[derive(Debug, Clone)]
pub struct StartRequest {
    /// Command line; split on whitespace, no shell semantics.
    pub command: String,
    /// Requested working directory; defaults to the current directory.
    pub working_dir: Option<PathBuf>,
    /// Wall-clock timeout; defaults to the supervisor's configured default.
    pub timeout_secs: Option<u64>,
}

/// Everything the executor needs to launch one process.
///
/// Produced by the supervisor after allowlist validation and command
/// splitting; consumed by an [`crate::exec::ExecutorBackend`].
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    pub id: ProcessId,
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub timeout: Duration,
}

/// Events flowing into the supervisor loop from callers and from
/// executor-side tasks.
#[derive(Debug)]
pub enum SupervisorEvent {
    /// A caller wants to start a command.
    StartRequested {
        request: StartRequest,
        reply: oneshot::Sender<Result<ProcessId>>,
    },
    /// A caller wants the accumulated output of a process.
    ReadRequested {
        id: ProcessId,
        clear: bool,
        reply: oneshot::Sender<Result<OutputSnapshot>>,
    },
    /// A running process produced a chunk of stream data.
    OutputChunk {
        id: ProcessId,
        stream: StreamKind,
        data: String,
    },
    /// A process exited on its own (any exit code).
    ProcessExited {
        id: ProcessId,
        exit_code: Option<i32>,
    },
    /// A process was killed because its timeout expired.
    ProcessTimedOut { id: ProcessId, timeout_secs: u64 },
    /// Graceful shutdown requested (e.g. Ctrl-C or stdin EOF).
    ShutdownRequested,
}

/// Spawn a supervisor with the production executor backend.
///
/// Returns the cloneable caller handle plus the join handle of the loop
/// task. Each call builds a fully independent instance: registry state is
/// owned by the spawned task, never global.
pub fn spawn_supervisor(
    allowlist: PathAllowlist,
    default_timeout_secs: u64,
) -> (SupervisorHandle, JoinHandle<Result<()>>) {
    let (tx, rx) = mpsc::channel::<SupervisorEvent>(EVENT_CHANNEL_CAPACITY);
    let executor = RealExecutorBackend::new(tx.clone());
    let supervisor = Supervisor::new(allowlist, default_timeout_secs, rx, executor);
    let task = tokio::spawn(supervisor.run());
    (SupervisorHandle::new(tx), task)
}
