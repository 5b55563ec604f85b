#![allow(dead_code)]

use std::path::{Path, PathBuf};

use procwarden::engine::StartRequest;

/// Builder for `StartRequest` to simplify test setup.
pub struct StartRequestBuilder {
    request: StartRequest,
}

impl StartRequestBuilder {
    pub fn new(command: &str) -> Self {
        Self {
            request: StartRequest {
                command: command.to_string(),
                working_dir: None,
                timeout_secs: None,
            },
        }
    }

    pub fn working_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.request.working_dir = Some(PathBuf::from(dir.as_ref()));
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.request.timeout_secs = Some(secs);
        self
    }

    pub fn build(self) -> StartRequest {
        self.request
    }
}

impl Default for StartRequestBuilder {
    fn default() -> Self {
        Self::new("true")
    }
}
