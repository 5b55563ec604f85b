use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// Wall-clock timeout applied to a command when the caller does not supply
/// one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Which output stream of a child process a chunk of data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl FromStr for StreamKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stdout" => Ok(StreamKind::Stdout),
            "stderr" => Ok(StreamKind::Stderr),
            other => Err(format!(
                "invalid stream kind: {other} (expected \"stdout\" or \"stderr\")"
            )),
        }
    }
}
