// src/exec/launcher.rs

//! Individual process launch, stream capture and timeout enforcement.

use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::engine::{LaunchSpec, SupervisorEvent};
use crate::errors::{ProcwardenError, Result};
use crate::registry::ProcessId;
use crate::types::StreamKind;

/// Split a command line into an executable token and argument tokens.
///
/// Whitespace splitting only: no quoting, no operators, no globs. A command
/// with no tokens at all cannot name an executable and fails before any OS
/// call.
pub fn split_command(command: &str) -> Result<(String, Vec<String>)> {
    let mut parts = command.split_whitespace().map(str::to_string);
    let Some(program) = parts.next() else {
        return Err(ProcwardenError::Launch(
            "empty command: no executable token".to_string(),
        ));
    };
    Ok((program, parts.collect()))
}

/// Launch the process described by `spec`.
///
/// On success the process is running with:
/// - one reader task per output stream, forwarding chunks as
///   [`SupervisorEvent::OutputChunk`]s in arrival order;
/// - one waiter task racing `child.wait()` against the timeout. The waiter
///   joins both readers before emitting the terminal event, so every chunk
///   the process produced is enqueued ahead of its exit/timeout event.
///
/// A spawn failure (missing executable, permission denial, ...) is returned
/// as [`ProcwardenError::Launch`] with the OS error text; nothing is left
/// running in that case.
pub fn launch(spec: LaunchSpec, events: mpsc::Sender<SupervisorEvent>) -> Result<()> {
    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .current_dir(&spec.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .map_err(|e| ProcwardenError::Launch(e.to_string()))?;

    info!(
        id = %spec.id,
        program = %spec.program,
        pid = ?child.id(),
        working_dir = %spec.working_dir.display(),
        "process spawned"
    );

    let stdout_task = match child.stdout.take() {
        Some(out) => read_stream(spec.id, StreamKind::Stdout, out, events.clone()),
        None => tokio::spawn(async {}),
    };
    let stderr_task = match child.stderr.take() {
        Some(err) => read_stream(spec.id, StreamKind::Stderr, err, events.clone()),
        None => tokio::spawn(async {}),
    };

    tokio::spawn(supervise_child(
        spec,
        child,
        stdout_task,
        stderr_task,
        events,
    ));

    Ok(())
}

/// Forward one stream's chunks into the supervisor channel until EOF.
fn read_stream(
    id: ProcessId,
    stream: StreamKind,
    mut pipe: impl AsyncRead + Unpin + Send + 'static,
    events: mpsc::Sender<SupervisorEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut buf = [0u8; 8192];
        loop {
            match pipe.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => {
                    let data = String::from_utf8_lossy(&buf[..n]).into_owned();
                    if events
                        .send(SupervisorEvent::OutputChunk { id, stream, data })
                        .await
                        .is_err()
                    {
                        // Supervisor gone; stop draining.
                        break;
                    }
                }
                Err(e) => {
                    debug!(%id, ?stream, error = %e, "stream read error; stopping reader");
                    break;
                }
            }
        }
    })
}

/// Wait for the child to exit, or kill it when the timeout fires.
///
/// Exactly one terminal event is emitted per process: `ProcessExited` for a
/// natural exit (any code), `ProcessTimedOut` when the timeout won the race.
async fn supervise_child(
    spec: LaunchSpec,
    mut child: Child,
    stdout_task: JoinHandle<()>,
    stderr_task: JoinHandle<()>,
    events: mpsc::Sender<SupervisorEvent>,
) {
    let id = spec.id;

    tokio::select! {
        status_res = child.wait() => {
            let exit_code = match status_res {
                Ok(status) => {
                    debug!(%id, code = ?status.code(), success = status.success(), "process exited");
                    status.code()
                }
                Err(e) => {
                    warn!(%id, error = %e, "waiting on process failed");
                    None
                }
            };

            // Readers finish at EOF once the process closed its pipes; join
            // them so all chunks are enqueued before the exit event.
            let _ = stdout_task.await;
            let _ = stderr_task.await;

            let _ = events
                .send(SupervisorEvent::ProcessExited { id, exit_code })
                .await;
        }

        _ = tokio::time::sleep(spec.timeout) => {
            info!(%id, timeout_secs = spec.timeout.as_secs(), "timeout expired; killing process");

            if let Err(e) = child.kill().await {
                warn!(%id, error = %e, "failed to kill timed-out process");
            }

            let _ = stdout_task.await;
            let _ = stderr_task.await;

            let _ = events
                .send(SupervisorEvent::ProcessTimedOut {
                    id,
                    timeout_secs: spec.timeout.as_secs(),
                })
                .await;
        }
    }
}
