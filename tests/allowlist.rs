// tests/allowlist.rs

use std::path::PathBuf;

use tempfile::TempDir;

use procwarden::allowlist::PathAllowlist;
use procwarden::errors::ProcwardenError;

/// Tempdir whose path is pre-canonicalized, so comparisons are not thrown
/// off by symlinked temp locations.
fn canonical_tempdir() -> (TempDir, PathBuf) {
    let td = TempDir::new().expect("create tempdir");
    let canonical = td.path().canonicalize().expect("canonicalize tempdir");
    (td, canonical)
}

#[test]
fn root_itself_is_allowed() {
    let (_td, root) = canonical_tempdir();
    let allowlist = PathAllowlist::new([root.clone()]);

    assert!(allowlist.is_allowed(&root));
}

#[test]
fn existing_child_is_allowed() {
    let (_td, root) = canonical_tempdir();
    let child = root.join("child");
    std::fs::create_dir(&child).expect("create child dir");

    let allowlist = PathAllowlist::new([root]);
    assert!(allowlist.is_allowed(&child));
}

#[test]
fn nonexistent_child_is_allowed_lexically() {
    let (_td, root) = canonical_tempdir();
    let allowlist = PathAllowlist::new([root.clone()]);

    assert!(allowlist.is_allowed(&root.join("does/not/exist/yet")));
}

#[test]
fn sibling_directory_is_rejected() {
    let (_td_a, root) = canonical_tempdir();
    let (_td_b, other) = canonical_tempdir();

    let allowlist = PathAllowlist::new([root]);
    assert!(!allowlist.is_allowed(&other));
}

#[test]
fn dotdot_escape_is_rejected() {
    let (_td, root) = canonical_tempdir();
    let allowlist = PathAllowlist::new([root.clone()]);

    // Cleans to a path outside the root.
    let escape = root.join("sub/../../somewhere-else");
    assert!(!allowlist.is_allowed(&escape));
}

#[test]
fn dotdot_inside_root_is_allowed() {
    let (_td, root) = canonical_tempdir();
    let allowlist = PathAllowlist::new([root.clone()]);

    // Cleans back to a descendant of the root.
    let inside = root.join("a/../b");
    assert!(allowlist.is_allowed(&inside));
}

#[test]
fn component_prefix_is_not_a_match() {
    let (_td, base) = canonical_tempdir();
    let root = base.join("ab");
    let trap = base.join("abc");
    std::fs::create_dir(&root).expect("create root");
    std::fs::create_dir(&trap).expect("create trap");

    let allowlist = PathAllowlist::new([root]);
    assert!(!allowlist.is_allowed(&trap));
}

#[test]
fn any_of_multiple_roots_matches() {
    let (_td_a, root_a) = canonical_tempdir();
    let (_td_b, root_b) = canonical_tempdir();

    let allowlist = PathAllowlist::new([root_a.clone(), root_b.clone()]);
    assert!(allowlist.is_allowed(&root_a.join("x")));
    assert!(allowlist.is_allowed(&root_b.join("y")));
}

#[test]
fn relative_candidate_resolves_against_cwd() {
    let cwd = std::env::current_dir()
        .expect("cwd")
        .canonicalize()
        .expect("canonicalize cwd");
    let allowlist = PathAllowlist::new([cwd]);

    assert!(allowlist.is_allowed(std::path::Path::new(".")));
}

#[test]
fn resolve_defaults_to_cwd() {
    let cwd = std::env::current_dir().expect("cwd");
    let allowlist = PathAllowlist::new([cwd.clone()]);

    let resolved = allowlist.resolve(None).expect("cwd should be allowed");
    assert_eq!(resolved, cwd.canonicalize().expect("canonicalize cwd"));
}

#[test]
fn resolve_rejects_outside_dir_with_context() {
    let (_td_a, root) = canonical_tempdir();
    let (_td_b, other) = canonical_tempdir();

    let allowlist = PathAllowlist::new([root.clone()]);
    let err = allowlist
        .resolve(Some(&other))
        .expect_err("outside dir must be rejected");

    match err {
        ProcwardenError::DirectoryNotAllowed { path, roots } => {
            assert_eq!(path, other);
            assert_eq!(roots, vec![root]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn resolve_returns_normalized_path() {
    let (_td, root) = canonical_tempdir();
    let allowlist = PathAllowlist::new([root.clone()]);

    let resolved = allowlist
        .resolve(Some(&root.join("a/./b/..")))
        .expect("inside dir must be allowed");
    assert_eq!(resolved, root.join("a"));
}
