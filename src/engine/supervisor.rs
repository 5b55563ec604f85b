// src/engine/supervisor.rs

//! The supervisor event loop.

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::allowlist::PathAllowlist;
use crate::errors::{ProcwardenError, Result};
use crate::exec::{split_command, ExecutorBackend};
use crate::registry::{OutputSnapshot, ProcessId, ProcessRecord, ProcessRegistry};

use super::{LaunchSpec, StartRequest, SupervisorEvent};

/// Drives the process registry in response to [`SupervisorEvent`]s and
/// delegates actual process launching to an [`ExecutorBackend`].
///
/// The registry never leaves this struct: callers interact through
/// [`super::SupervisorHandle`], executor tasks through events. Each event is
/// handled to completion before the next is taken, which is what makes the
/// per-record transitions linearizable.
pub struct Supervisor<E: ExecutorBackend> {
    allowlist: PathAllowlist,
    registry: ProcessRegistry,
    default_timeout_secs: u64,
    event_rx: mpsc::Receiver<SupervisorEvent>,
    executor: E,
}

impl<E: ExecutorBackend> fmt::Debug for Supervisor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supervisor")
            .field("registry", &self.registry)
            .field("default_timeout_secs", &self.default_timeout_secs)
            .finish_non_exhaustive()
    }
}

impl<E: ExecutorBackend> Supervisor<E> {
    pub fn new(
        allowlist: PathAllowlist,
        default_timeout_secs: u64,
        event_rx: mpsc::Receiver<SupervisorEvent>,
        executor: E,
    ) -> Self {
        Self {
            allowlist,
            registry: ProcessRegistry::new(),
            default_timeout_secs,
            event_rx,
            executor,
        }
    }

    /// Main event loop.
    ///
    /// Runs until a [`SupervisorEvent::ShutdownRequested`] arrives or every
    /// sender (callers and executor tasks) has gone away.
    pub async fn run(mut self) -> Result<()> {
        info!("supervisor started");

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("supervisor event channel closed; exiting");
                    break;
                }
            };

            match event {
                SupervisorEvent::StartRequested { request, reply } => {
                    let result = self.handle_start(request).await;
                    // The caller may have given up waiting; nothing to do then.
                    let _ = reply.send(result);
                }
                SupervisorEvent::ReadRequested { id, clear, reply } => {
                    let _ = reply.send(self.handle_read(id, clear));
                }
                SupervisorEvent::OutputChunk { id, stream, data } => {
                    self.registry.append_output(id, stream, &data);
                }
                SupervisorEvent::ProcessExited { id, exit_code } => {
                    self.handle_exit(id, exit_code);
                }
                SupervisorEvent::ProcessTimedOut { id, timeout_secs } => {
                    self.handle_timeout(id, timeout_secs);
                }
                SupervisorEvent::ShutdownRequested => {
                    info!(
                        records = self.registry.len(),
                        "shutdown requested; stopping supervisor"
                    );
                    break;
                }
            }
        }

        info!("supervisor exiting");
        Ok(())
    }

    /// Validate, launch and register one command.
    async fn handle_start(&mut self, request: StartRequest) -> Result<ProcessId> {
        let (program, args) = split_command(&request.command)?;
        let working_dir = self.allowlist.resolve(request.working_dir.as_deref())?;
        let timeout_secs = request.timeout_secs.unwrap_or(self.default_timeout_secs);

        let id = ProcessId::new();
        let spec = LaunchSpec {
            id,
            program,
            args,
            working_dir: working_dir.clone(),
            timeout: std::time::Duration::from_secs(timeout_secs),
        };

        info!(
            %id,
            command = %request.command,
            working_dir = %working_dir.display(),
            timeout_secs,
            "starting command"
        );

        self.executor.spawn_process(spec).await?;

        // Published only after the OS process exists, so a launch failure
        // leaves no record behind.
        self.registry
            .insert(ProcessRecord::new(id, request.command, working_dir));

        Ok(id)
    }

    /// Snapshot a record, optionally evicting it once the process is done.
    ///
    /// Read-then-evict: the snapshot is taken before removal so a clearing
    /// caller receives the final state exactly once. Clearing a record whose
    /// process is still running is ignored.
    fn handle_read(&mut self, id: ProcessId, clear: bool) -> Result<OutputSnapshot> {
        let snapshot = self
            .registry
            .snapshot(id)
            .ok_or(ProcwardenError::ProcessNotFound(id))?;

        if clear {
            if snapshot.running {
                debug!(%id, "clear requested for running process; ignored");
            } else {
                self.registry.remove(id);
            }
        }

        Ok(snapshot)
    }

    fn handle_exit(&mut self, id: ProcessId, exit_code: Option<i32>) {
        if self.registry.mark_completed(id) {
            info!(%id, ?exit_code, "process exited");
        }
    }

    fn handle_timeout(&mut self, id: ProcessId, timeout_secs: u64) {
        let note = format!("terminated due to timeout after {timeout_secs}s");
        if self.registry.mark_terminated(id, &note) {
            warn!(%id, timeout_secs, "process killed by timeout");
        }
    }
}
