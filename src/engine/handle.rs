// src/engine/handle.rs

//! Caller-facing handle to a running supervisor.

use anyhow::anyhow;
use tokio::sync::{mpsc, oneshot};

use crate::errors::Result;
use crate::registry::{OutputSnapshot, ProcessId};

use super::{StartRequest, SupervisorEvent};

/// Cloneable handle exposing the two supervision operations.
///
/// Every call is a message to the supervisor loop plus a `oneshot` reply, so
/// requests interleave with process lifecycle events in a single order.
#[derive(Debug, Clone)]
pub struct SupervisorHandle {
    tx: mpsc::Sender<SupervisorEvent>,
}

impl SupervisorHandle {
    pub fn new(tx: mpsc::Sender<SupervisorEvent>) -> Self {
        Self { tx }
    }

    /// Start a command; returns its id as soon as the process is launched
    /// and registered, without waiting for it to finish.
    pub async fn start(&self, request: StartRequest) -> Result<ProcessId> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(SupervisorEvent::StartRequested {
                request,
                reply: reply_tx,
            })
            .await
            .map_err(|_| anyhow!("supervisor is not running"))?;

        reply_rx
            .await
            .map_err(|_| anyhow!("supervisor dropped the request"))?
    }

    /// Read the accumulated output of a process.
    ///
    /// With `clear = true` the record is evicted after the snapshot is taken,
    /// but only once the process is no longer running.
    pub async fn read(&self, id: ProcessId, clear: bool) -> Result<OutputSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(SupervisorEvent::ReadRequested {
                id,
                clear,
                reply: reply_tx,
            })
            .await
            .map_err(|_| anyhow!("supervisor is not running"))?;

        reply_rx
            .await
            .map_err(|_| anyhow!("supervisor dropped the request"))?
    }

    /// Ask the supervisor loop to stop. Best-effort; an already-stopped
    /// supervisor is not an error.
    pub async fn shutdown(&self) {
        let _ = self.tx.send(SupervisorEvent::ShutdownRequested).await;
    }
}
