// src/lib.rs

pub mod allowlist;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod registry;
pub mod types;
pub mod wire;

use std::path::PathBuf;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use crate::allowlist::PathAllowlist;
use crate::cli::CliArgs;
use crate::config::{load_and_validate, ConfigFile};
use crate::engine::{spawn_supervisor, StartRequest, SupervisorHandle};
use crate::registry::ProcessId;
use crate::wire::{Request, Response};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + CLI merge)
/// - allowlist
/// - supervisor + executor
/// - the stdin/stdout request loop
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = match &args.config {
        Some(path) => load_and_validate(path)?,
        None => ConfigFile::default(),
    };

    let roots = effective_roots(&cfg, &args)?;
    let allowlist = PathAllowlist::new(roots);

    let default_timeout_secs = args
        .default_timeout_secs
        .unwrap_or(cfg.default_timeout_secs);

    info!(
        roots = ?allowlist.roots(),
        default_timeout_secs,
        "procwarden starting"
    );

    let (handle, supervisor_task) = spawn_supervisor(allowlist, default_timeout_secs);

    serve_stdio(&handle).await?;

    handle.shutdown().await;
    supervisor_task.await??;
    Ok(())
}

/// Allowed roots from config file plus CLI, with the documented fallback.
fn effective_roots(cfg: &ConfigFile, args: &CliArgs) -> Result<Vec<PathBuf>> {
    let mut roots = cfg.allowed_roots.clone();
    roots.extend(args.roots.iter().cloned());

    if roots.is_empty() {
        let cwd = std::env::current_dir()?;
        warn!(
            cwd = %cwd.display(),
            "no allowed roots configured; defaulting to the current directory"
        );
        roots.push(cwd);
    }

    Ok(roots)
}

/// Serve line-delimited JSON requests on stdin until EOF or Ctrl-C.
///
/// Every failure becomes an error response line; nothing that happens while
/// serving a request takes the loop down.
async fn serve_stdio(handle: &SupervisorHandle) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("ctrl-c received; shutting down");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("stdin closed; shutting down");
                    break;
                };

                if line.trim().is_empty() {
                    continue;
                }

                let response = dispatch_line(handle, &line).await;
                let mut encoded = serde_json::to_vec(&response)?;
                encoded.push(b'\n');
                stdout.write_all(&encoded).await?;
                stdout.flush().await?;
            }
        }
    }

    Ok(())
}

/// Parse one request line and apply it to the supervisor.
async fn dispatch_line(handle: &SupervisorHandle, line: &str) -> Response {
    let request: Request = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => return Response::bad_request(format!("invalid request: {e}")),
    };

    dispatch(handle, request).await
}

/// Apply one request to the supervisor and shape the outcome for the wire.
pub async fn dispatch(handle: &SupervisorHandle, request: Request) -> Response {
    match request {
        Request::Start {
            command,
            working_dir,
            timeout_secs,
        } => {
            let start = StartRequest {
                command,
                working_dir,
                timeout_secs,
            };
            match handle.start(start).await {
                Ok(id) => Response::Started { id: id.to_string() },
                Err(e) => Response::from_error(&e),
            }
        }
        Request::Read { id, clear } => {
            // A malformed id cannot name any process we issued; treat it the
            // same as an unknown one.
            let Some(parsed) = ProcessId::parse(&id) else {
                return Response::not_found(&id);
            };
            match handle.read(parsed, clear).await {
                Ok(snapshot) => Response::Output { id, snapshot },
                Err(e) => Response::from_error(&e),
            }
        }
    }
}
