// src/allowlist.rs

//! Working-directory allowlist.
//!
//! Every command runs inside a directory that must resolve under one of the
//! roots configured at startup. Roots are normalized once when the allowlist
//! is built; candidates are normalized the same way on every check so that
//! `~`, relative segments and symlinked prefixes cannot sneak a process
//! outside the allowed tree.

use std::path::{Path, PathBuf};

use path_clean::PathClean;
use tracing::debug;

use crate::errors::{ProcwardenError, Result};

/// Set of root directories under which command working directories must
/// resolve.
#[derive(Debug, Clone)]
pub struct PathAllowlist {
    roots: Vec<PathBuf>,
}

impl PathAllowlist {
    /// Build an allowlist from the configured roots.
    ///
    /// Each root is normalized up front (tilde expansion, absolutization,
    /// lexical cleaning, canonicalization when it exists on disk).
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        let roots: Vec<PathBuf> = roots.into_iter().map(|r| normalize_path(&r)).collect();
        debug!(?roots, "path allowlist constructed");
        Self { roots }
    }

    /// The normalized allowed roots.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Returns `true` iff the normalized candidate is one of the allowed
    /// roots or a descendant of one.
    ///
    /// `Path::starts_with` compares whole components, so `/a/bc` is not
    /// treated as being under `/a/b`, while `/a/b` itself matches the root
    /// `/a/b`.
    pub fn is_allowed(&self, candidate: &Path) -> bool {
        let candidate = normalize_path(candidate);
        self.roots.iter().any(|root| candidate.starts_with(root))
    }

    /// Resolve a requested working directory against the allowlist.
    ///
    /// - `None` falls back to the process's current directory.
    /// - The returned path is normalized and guaranteed to be allowed;
    ///   otherwise `DirectoryNotAllowed` is returned with the resolved path
    ///   and the configured roots.
    pub fn resolve(&self, requested: Option<&Path>) -> Result<PathBuf> {
        let dir = match requested {
            Some(p) => normalize_path(p),
            None => std::env::current_dir().map(|d| normalize_path(&d))?,
        };

        if self.roots.iter().any(|root| dir.starts_with(root)) {
            Ok(dir)
        } else {
            Err(ProcwardenError::DirectoryNotAllowed {
                path: dir,
                roots: self.roots.clone(),
            })
        }
    }
}

/// Normalize a path for allowlist comparison.
///
/// - `~` and `~/...` expand to the user's home directory.
/// - Relative paths are joined onto the current working directory.
/// - `.` and `..` segments are resolved lexically.
/// - If the result exists, it is canonicalized so symlinked prefixes
///   (e.g. `/var` vs `/private/var` on macOS) compare equal; if it does not
///   exist, the lexically cleaned form is used as-is.
pub fn normalize_path(path: &Path) -> PathBuf {
    let expanded = expand_tilde(path);

    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(expanded),
            Err(_) => expanded,
        }
    };

    let cleaned = absolute.clean();

    match cleaned.canonicalize() {
        Ok(canonical) => canonical,
        Err(_) => cleaned,
    }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    let Some(s) = path.to_str() else {
        return path.to_path_buf();
    };

    if s == "~" {
        return dirs::home_dir().unwrap_or_else(|| path.to_path_buf());
    }

    if let Some(rest) = s.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }

    path.to_path_buf()
}
