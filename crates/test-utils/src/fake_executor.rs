use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use procwarden::engine::{LaunchSpec, SupervisorEvent};
use procwarden::errors::{ProcwardenError, Result};
use procwarden::exec::ExecutorBackend;
use procwarden::types::StreamKind;

/// What a [`FakeExecutor`] does with each launch it receives.
#[derive(Debug, Clone)]
pub enum FakeBehaviour {
    /// Record the launch and leave the "process" running forever.
    StayRunning,
    /// Emit the scripted chunks, then report a clean exit.
    CompleteImmediately {
        stdout: Vec<String>,
        stderr: Vec<String>,
    },
    /// Refuse the launch as if the OS could not create the process.
    FailLaunch { message: String },
}

/// A fake executor that:
/// - records every [`LaunchSpec`] it was given
/// - plays back a scripted lifecycle instead of spawning real processes.
pub struct FakeExecutor {
    events: mpsc::Sender<SupervisorEvent>,
    launched: Arc<Mutex<Vec<LaunchSpec>>>,
    behaviour: FakeBehaviour,
}

impl FakeExecutor {
    pub fn new(
        events: mpsc::Sender<SupervisorEvent>,
        launched: Arc<Mutex<Vec<LaunchSpec>>>,
        behaviour: FakeBehaviour,
    ) -> Self {
        Self {
            events,
            launched,
            behaviour,
        }
    }
}

impl ExecutorBackend for FakeExecutor {
    fn spawn_process(
        &mut self,
        spec: LaunchSpec,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let events = self.events.clone();
        let launched = Arc::clone(&self.launched);
        let behaviour = self.behaviour.clone();

        Box::pin(async move {
            if let FakeBehaviour::FailLaunch { message } = &behaviour {
                return Err(ProcwardenError::Launch(message.clone()));
            }

            {
                let mut guard = launched.lock().unwrap();
                guard.push(spec.clone());
            }

            if let FakeBehaviour::CompleteImmediately { stdout, stderr } = behaviour {
                for data in stdout {
                    events
                        .send(SupervisorEvent::OutputChunk {
                            id: spec.id,
                            stream: StreamKind::Stdout,
                            data,
                        })
                        .await
                        .map_err(|e| anyhow::anyhow!("event channel closed: {e}"))?;
                }
                for data in stderr {
                    events
                        .send(SupervisorEvent::OutputChunk {
                            id: spec.id,
                            stream: StreamKind::Stderr,
                            data,
                        })
                        .await
                        .map_err(|e| anyhow::anyhow!("event channel closed: {e}"))?;
                }
                events
                    .send(SupervisorEvent::ProcessExited {
                        id: spec.id,
                        exit_code: Some(0),
                    })
                    .await
                    .map_err(|e| anyhow::anyhow!("event channel closed: {e}"))?;
            }

            Ok(())
        })
    }
}
