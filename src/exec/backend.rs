// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The supervisor talks to an `ExecutorBackend` instead of spawning OS
//! processes itself. This keeps the event loop free of process plumbing and
//! makes it easy to swap in a fake executor in tests.
//!
//! - [`RealExecutorBackend`] is the production implementation: it launches
//!   the process described by a [`LaunchSpec`] and wires its lifecycle back
//!   into the supervisor's event channel.
//! - Tests can provide their own `ExecutorBackend` that, for example,
//!   records launch specs and emits scripted output/exit events.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;

use crate::engine::{LaunchSpec, SupervisorEvent};
use crate::errors::Result;

use super::launcher;

/// Trait abstracting how launch specs become running processes.
pub trait ExecutorBackend: Send {
    /// Launch one process.
    ///
    /// Returns once the process exists (or launching failed); stream and
    /// exit reporting continues asynchronously through the event channel.
    fn spawn_process(
        &mut self,
        spec: LaunchSpec,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Real executor backend used in production.
#[derive(Debug, Clone)]
pub struct RealExecutorBackend {
    events: mpsc::Sender<SupervisorEvent>,
}

impl RealExecutorBackend {
    /// Create a backend that reports lifecycle events to the given
    /// supervisor channel.
    pub fn new(events: mpsc::Sender<SupervisorEvent>) -> Self {
        Self { events }
    }
}

impl ExecutorBackend for RealExecutorBackend {
    fn spawn_process(
        &mut self,
        spec: LaunchSpec,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        // Clone the sender so the future doesn't borrow `self` across `await`.
        let events = self.events.clone();

        Box::pin(async move { launcher::launch(spec, events) })
    }
}
