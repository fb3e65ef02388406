//! Shared test utilities for the notes-manifest test suite.
//!
//! Provides fixture setup, a note writer for ad-hoc vaults, and lookup
//! helpers that fail with the available keys when something is missing.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = build_note_manifest(tmp.path()).unwrap();
//!
//! let entry = find_entry(&manifest, "hello-world");
//! assert_eq!(entry.canonical_route, "hello-world");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::types::{ManifestError, ManifestErrorKind, NoteEntry, NoteManifest};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/vault/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/vault");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_note(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

// =========================================================================
// Lookups
// =========================================================================

/// Find an entry by id. Panics with the available ids if not found.
pub fn find_entry<'a>(manifest: &'a NoteManifest, id: &str) -> &'a NoteEntry {
    manifest
        .entries
        .iter()
        .find(|e| e.id == id)
        .unwrap_or_else(|| {
            panic!(
                "entry '{}' not found. Available: {:?}",
                id,
                entry_ids(manifest)
            )
        })
}

/// Entry ids in manifest order.
pub fn entry_ids(manifest: &NoteManifest) -> Vec<&str> {
    manifest.entries.iter().map(|e| e.id.as_str()).collect()
}

/// Canonical routes in manifest order.
pub fn canonical_routes(manifest: &NoteManifest) -> Vec<&str> {
    manifest
        .entries
        .iter()
        .map(|e| e.canonical_route.as_str())
        .collect()
}

pub fn error_kinds(errors: &[ManifestError]) -> Vec<ManifestErrorKind> {
    errors.iter().map(|e| e.kind).collect()
}
