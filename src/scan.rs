//! Vault scanning and manifest construction.
//!
//! Stage 1 of the notes build. Walks the notes directory, parses every
//! Markdown file, assigns routes and checks the route space for collisions.
//!
//! ## Directory Structure
//!
//! ```text
//! notes/                          # Notes root
//! ├── index.md                    # Section root → ""
//! ├── hello-world.md              # → hello-world
//! ├── DDIA/
//! │   ├── index.md                # Folder landing page → ddia
//! │   └── Concurrency.md          # → ddia/concurrency (+ alias if promoted)
//! ├── assets/                     # Skipped: images, not notes
//! ├── _templates/                 # Skipped: Templater templates
//! ├── Excalidraw/                 # Skipped: drawings
//! └── .obsidian/                  # Skipped: hidden
//! ```
//!
//! ## Passes
//!
//! 1. **Discover + parse**: collect Markdown files in sorted relative-path
//!    order, read them in parallel, derive id, title, slug and routes.
//! 2. **Canonical collisions**: the first note to claim a canonical route
//!    keeps it; later claims are reported.
//! 3. **Alias conflicts**: an alias that is another note's canonical route is
//!    a conflict; otherwise an alias claimed twice is a collision.
//!
//! Conflicts are collected into [`NoteManifest::errors`] rather than failing
//! the scan, so one run reports every problem. Unreadable files are logged
//! and skipped. Only an unlistable root is fatal.

use crate::frontmatter::{self, NoteFrontmatter};
use crate::slug::{self, compute_alias_routes, compute_canonical_route, compute_slug};
use crate::types::{ManifestError, NoteEntry, NoteManifest};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Notes root used when nothing else is configured, relative to the project.
pub const DEFAULT_NOTES_ROOT: &str = "src/content/vault/notes";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the manifest for the notes directory at `root`.
///
/// Fails only if `root` cannot be listed. Given the same directory contents,
/// the result is identical on every call.
pub fn build_note_manifest(root: &Path) -> Result<NoteManifest, ScanError> {
    let root = std::path::absolute(root)?;
    // Fail fast on a missing or unreadable root; nested problems are skipped.
    fs::read_dir(&root)?;

    let files = discover_notes(&root);
    tracing::debug!(root = %root.display(), files = files.len(), "discovered notes");

    let entries: Vec<NoteEntry> = files
        .par_iter()
        .map(|rel| load_entry(&root, rel))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect();

    let errors = detect_collisions(&entries);
    tracing::debug!(
        entries = entries.len(),
        errors = errors.len(),
        "built notes manifest"
    );

    Ok(NoteManifest { entries, errors })
}

/// Whether a path (relative to the notes root) is vault housekeeping rather
/// than a note.
///
/// Excluded:
/// - hidden files and anything under a hidden directory
/// - Excalidraw drawings (`Excalidraw/`, `excalidraw/`, `*.excalidraw*`)
/// - auto-named scratch files (`Untitled`, `Drawing `)
/// - templates (`templates/`, `_templates/`)
/// - asset folders (`assets/`)
pub fn is_system_file(relative_path: &str) -> bool {
    let normalized = relative_path.replace('\\', "/");
    let segments: Vec<&str> = normalized.split('/').collect();
    let directories = &segments[..segments.len() - 1];

    segments.iter().any(|s| s.starts_with('.'))
        || directories.iter().any(|d| {
            matches!(
                *d,
                "Excalidraw" | "excalidraw" | "templates" | "_templates" | "assets"
            )
        })
        || normalized.contains(".excalidraw")
        || normalized.contains("Untitled")
        || normalized.contains("Drawing ")
}

/// Collect Markdown files under `root` as relative paths, sorted by their
/// `/`-joined form. Sorting here is what makes collision winners stable.
///
/// Housekeeping directories are pruned during the walk. Symlinked files are
/// read through the link; symlinked directories are not followed.
fn discover_notes(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_pruned_directory(entry));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        if !is_markdown(entry.path()) {
            continue;
        }
        let is_file = if entry.path_is_symlink() {
            entry.path().is_file()
        } else {
            entry.file_type().is_file()
        };
        if !is_file {
            tracing::debug!(path = %entry.path().display(), "skipping non-file entry");
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let key = relative_key(rel);
        if is_system_file(&key) {
            tracing::debug!(path = %key, "skipping system file");
            continue;
        }
        files.push(rel.to_path_buf());
    }
    files.sort_by_cached_key(|p| relative_key(p));
    files
}

/// Directories whose contents are never notes: hidden ones and the
/// directory names [`is_system_file`] excludes.
fn is_pruned_directory(entry: &walkdir::DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.')
        || matches!(
            name.as_ref(),
            "Excalidraw" | "excalidraw" | "templates" | "_templates" | "assets"
        )
}

/// `.md` only, matched case-sensitively.
fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "md")
}

/// A relative path as a `/`-joined string, independent of platform.
fn relative_key(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Read and parse one note. Returns `None` (after logging) if unreadable.
fn load_entry(root: &Path, rel: &Path) -> Option<NoteEntry> {
    let source_path = root.join(rel);
    let content = match fs::read_to_string(&source_path) {
        Ok(content) => content,
        Err(err) => {
            tracing::warn!(path = %source_path.display(), error = %err, "skipping unreadable note");
            return None;
        }
    };

    let parsed = frontmatter::parse_note(&content, &source_path);
    let fm = parsed.frontmatter;
    let filename = rel
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let slug = compute_slug(&fm, &filename);
    let canonical_route = compute_canonical_route(rel, &slug);
    let alias_routes = compute_alias_routes(&fm, &slug, &canonical_route);
    let id = derive_id(&fm, &relative_key(rel));
    let title = derive_title(&fm, &filename);

    Some(NoteEntry {
        id,
        source_path,
        title,
        slug,
        canonical_route,
        alias_routes,
        frontmatter: fm,
        body: parsed.body,
    })
}

/// Front matter `id` (trimmed), else the normalized relative path without
/// extension. Separators are stripped, so `folder/My Note.md` → `foldermy-note`.
fn derive_id(fm: &NoteFrontmatter, relative_path: &str) -> String {
    match fm.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => id.to_string(),
        None => slug::normalize_slug(slug::strip_markdown_extension(relative_path)),
    }
}

/// Front matter `title` (trimmed), else the filename without extension.
fn derive_title(fm: &NoteFrontmatter, filename: &str) -> Option<String> {
    if let Some(title) = fm.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        return Some(title.to_string());
    }
    let stem = slug::strip_markdown_extension(filename);
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}

/// Passes 2 and 3: canonical collisions, then alias conflicts and collisions.
///
/// Identity is `source_path`; two entries with the same path never conflict.
pub fn detect_collisions(entries: &[NoteEntry]) -> Vec<ManifestError> {
    let mut errors = Vec::new();

    let mut canonical: HashMap<&str, &NoteEntry> = HashMap::new();
    for entry in entries {
        match canonical.get(entry.canonical_route.as_str()) {
            Some(existing) if existing.source_path != entry.source_path => {
                errors.push(ManifestError::canonical_collision(existing, entry));
            }
            Some(_) => {}
            None => {
                canonical.insert(&entry.canonical_route, entry);
            }
        }
    }

    let mut aliases: HashMap<&str, &NoteEntry> = HashMap::new();
    for entry in entries {
        for alias in &entry.alias_routes {
            // A canonical conflict hides any alias collision on the same route.
            if let Some(owner) = canonical.get(alias.as_str())
                && owner.source_path != entry.source_path
            {
                errors.push(ManifestError::alias_canonical_conflict(owner, entry, alias));
                continue;
            }
            if let Some(claimant) = aliases.get(alias.as_str())
                && claimant.source_path != entry.source_path
            {
                errors.push(ManifestError::alias_collision(claimant, entry, alias));
                continue;
            }
            aliases.insert(alias, entry);
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::types::ManifestErrorKind;
    use tempfile::TempDir;

    fn entry(id: &str, source: &str, canonical: &str, aliases: &[&str]) -> NoteEntry {
        NoteEntry {
            id: id.to_string(),
            source_path: PathBuf::from(source),
            title: None,
            slug: id.to_string(),
            canonical_route: canonical.to_string(),
            alias_routes: aliases.iter().map(|a| a.to_string()).collect(),
            frontmatter: NoteFrontmatter::default(),
            body: String::new(),
        }
    }

    // =========================================================================
    // System file exclusion
    // =========================================================================

    #[test]
    fn hidden_paths_are_system_files() {
        assert!(is_system_file(".hidden.md"));
        assert!(is_system_file(".obsidian/workspace.md"));
        assert!(is_system_file("folder/.trash/old.md"));
    }

    #[test]
    fn excalidraw_paths_are_system_files() {
        assert!(is_system_file("Excalidraw/drawing.md"));
        assert!(is_system_file("notes/excalidraw/sketch.md"));
        assert!(is_system_file("Sketch.excalidraw.md"));
        assert!(!is_system_file("EXCALIDRAW/sketch.md"));
    }

    #[test]
    fn scratch_files_are_system_files() {
        assert!(is_system_file("Untitled.md"));
        assert!(is_system_file("folder/Untitled 3.md"));
        assert!(is_system_file("Drawing 2024-01-01.md"));
        assert!(!is_system_file("Drawings.md"));
    }

    #[test]
    fn template_and_asset_folders_are_system_files() {
        assert!(is_system_file("templates/daily.md"));
        assert!(is_system_file("_templates/template.md"));
        assert!(is_system_file("assets/readme.md"));
        assert!(is_system_file("DDIA/assets/figure.md"));
    }

    #[test]
    fn files_named_like_system_folders_are_notes() {
        assert!(!is_system_file("templates.md"));
        assert!(!is_system_file("assets.md"));
        assert!(!is_system_file("Go/templates-in-go.md"));
    }

    #[test]
    fn backslash_separators_are_understood() {
        assert!(is_system_file("DDIA\\assets\\figure.md"));
        assert!(!is_system_file("DDIA\\Concurrency.md"));
    }

    #[test]
    fn ordinary_notes_are_not_system_files() {
        assert!(!is_system_file("valid-note.md"));
        assert!(!is_system_file("DDIA/Concurrency.md"));
    }

    // =========================================================================
    // Manifest building
    // =========================================================================

    #[test]
    fn index_maps_to_folder() {
        let tmp = TempDir::new().unwrap();
        write_note(tmp.path(), "DDIA/index.md", "---\ntitle: DDIA Notes\n---\nContent here");

        let manifest = build_note_manifest(tmp.path()).unwrap();

        assert!(manifest.errors.is_empty());
        assert_eq!(manifest.entries.len(), 1);
        assert_eq!(manifest.entries[0].canonical_route, "ddia");
    }

    #[test]
    fn nested_note_maps_to_folder_and_slug() {
        let tmp = TempDir::new().unwrap();
        write_note(tmp.path(), "DDIA/Concurrency.md", "---\ntitle: Concurrency\n---\nContent");

        let manifest = build_note_manifest(tmp.path()).unwrap();

        assert!(manifest.errors.is_empty());
        assert_eq!(manifest.entries[0].canonical_route, "ddia/concurrency");
    }

    #[test]
    fn promoted_note_gets_alias() {
        let tmp = TempDir::new().unwrap();
        write_note(
            tmp.path(),
            "DDIA/Concurrency.md",
            "---\nid: ddia-concurrency\ntitle: Concurrency\nsurfaces:\n  - notes\n---\nContent",
        );

        let manifest = build_note_manifest(tmp.path()).unwrap();

        assert!(manifest.errors.is_empty());
        assert_eq!(manifest.entries[0].canonical_route, "ddia/concurrency");
        assert_eq!(manifest.entries[0].alias_routes, vec!["ddia-concurrency"]);
    }

    #[test]
    fn canonical_collision_detected() {
        let tmp = TempDir::new().unwrap();
        write_note(tmp.path(), "note-a.md", "---\nslug: duplicate\n---\nContent A");
        write_note(tmp.path(), "note-b.md", "---\nslug: duplicate\n---\nContent B");

        let manifest = build_note_manifest(tmp.path()).unwrap();

        assert_eq!(manifest.errors.len(), 1);
        let err = &manifest.errors[0];
        assert_eq!(err.kind, ManifestErrorKind::CanonicalCollision);
        assert_eq!(err.route, "duplicate");
        assert_eq!(err.files, vec!["note-a", "note-b"]);
    }

    #[test]
    fn alias_collision_detected() {
        let tmp = TempDir::new().unwrap();
        let content = "---\nid: my-alias\nsurfaces:\n  - notes\n---\nContent";
        write_note(tmp.path(), "folder-a/note.md", content);
        write_note(tmp.path(), "folder-b/note.md", content);

        let manifest = build_note_manifest(tmp.path()).unwrap();

        assert_eq!(manifest.errors.len(), 1);
        assert_eq!(manifest.errors[0].kind, ManifestErrorKind::AliasCollision);
        assert_eq!(manifest.errors[0].route, "my-alias");
    }

    #[test]
    fn alias_canonical_conflict_detected() {
        let tmp = TempDir::new().unwrap();
        write_note(tmp.path(), "foo.md", "---\ntitle: Foo\n---\nCanonical foo");
        write_note(
            tmp.path(),
            "nested/bar.md",
            "---\nid: foo\nsurfaces:\n  - notes\n---\nBar with alias foo",
        );

        let manifest = build_note_manifest(tmp.path()).unwrap();

        assert_eq!(manifest.errors.len(), 1);
        let err = &manifest.errors[0];
        assert_eq!(err.kind, ManifestErrorKind::AliasCanonicalConflict);
        assert_eq!(err.route, "foo");
        assert_eq!(err.files, vec!["foo", "foo"]);
    }

    #[test]
    fn unroutable_id_alias_conflicts_with_section_root() {
        let tmp = TempDir::new().unwrap();
        write_note(tmp.path(), "index.md", "---\ntitle: Notes\n---\nRoot");
        write_note(tmp.path(), "x/n.md", "---\nid: '!!!'\nsurfaces: [notes]\n---\nBody");

        let manifest = build_note_manifest(tmp.path()).unwrap();

        assert_eq!(find_entry(&manifest, "!!!").alias_routes, vec![""]);
        assert_eq!(manifest.errors.len(), 1);
        let err = &manifest.errors[0];
        assert_eq!(err.kind, ManifestErrorKind::AliasCanonicalConflict);
        assert_eq!(err.route, "");
        assert_eq!(err.files, vec!["index", "!!!"]);
    }

    #[test]
    fn alias_matching_own_canonical_is_not_an_error() {
        let tmp = TempDir::new().unwrap();
        write_note(tmp.path(), "my-note.md", "---\nid: my-note\nsurfaces:\n  - notes\n---\nContent");

        let manifest = build_note_manifest(tmp.path()).unwrap();

        assert!(manifest.errors.is_empty());
        assert!(manifest.entries[0].alias_routes.is_empty());
    }

    #[test]
    fn system_files_are_skipped() {
        let tmp = TempDir::new().unwrap();
        write_note(tmp.path(), ".hidden.md", "---\n---\nHidden");
        write_note(tmp.path(), "Excalidraw/drawing.md", "---\n---\nDrawing");
        write_note(tmp.path(), "_templates/template.md", "---\n---\nTemplate");
        write_note(tmp.path(), "assets/readme.md", "---\n---\nAsset");
        write_note(tmp.path(), "valid-note.md", "---\n---\nValid");

        let manifest = build_note_manifest(tmp.path()).unwrap();

        assert_eq!(manifest.entries.len(), 1);
        assert_eq!(manifest.entries[0].id, "valid-note");
    }

    #[test]
    fn non_markdown_files_are_ignored() {
        let tmp = TempDir::new().unwrap();
        write_note(tmp.path(), "note.md", "Body");
        write_note(tmp.path(), "image.png", "not a note");
        write_note(tmp.path(), "canvas.canvas", "{}");

        let manifest = build_note_manifest(tmp.path()).unwrap();
        assert_eq!(entry_ids(&manifest), vec!["note"]);
    }

    #[test]
    fn title_from_frontmatter() {
        let tmp = TempDir::new().unwrap();
        write_note(tmp.path(), "note.md", "---\ntitle: '  My Custom Title '\n---\nContent");

        let manifest = build_note_manifest(tmp.path()).unwrap();
        assert_eq!(manifest.entries[0].title.as_deref(), Some("My Custom Title"));
    }

    #[test]
    fn title_falls_back_to_filename() {
        let tmp = TempDir::new().unwrap();
        write_note(tmp.path(), "My Great Note.md", "---\n---\nContent");

        let manifest = build_note_manifest(tmp.path()).unwrap();
        assert_eq!(manifest.entries[0].title.as_deref(), Some("My Great Note"));
    }

    #[test]
    fn id_from_frontmatter_is_trimmed() {
        let tmp = TempDir::new().unwrap();
        write_note(tmp.path(), "note.md", "---\nid: '  custom-id '\n---\nContent");

        let manifest = build_note_manifest(tmp.path()).unwrap();
        assert_eq!(manifest.entries[0].id, "custom-id");
    }

    #[test]
    fn id_derived_from_whole_relative_path() {
        let tmp = TempDir::new().unwrap();
        write_note(tmp.path(), "folder/My Note.md", "---\n---\nContent");

        let manifest = build_note_manifest(tmp.path()).unwrap();
        assert_eq!(manifest.entries[0].id, "foldermy-note");
    }

    #[test]
    fn body_excludes_frontmatter() {
        let tmp = TempDir::new().unwrap();
        write_note(tmp.path(), "note.md", "---\ntitle: T\n---\n# Heading\n\nText");

        let manifest = build_note_manifest(tmp.path()).unwrap();
        assert_eq!(manifest.entries[0].body, "# Heading\n\nText");
    }

    #[test]
    fn bad_frontmatter_does_not_abort_scan() {
        let tmp = TempDir::new().unwrap();
        write_note(tmp.path(), "broken.md", "---\ntitle: [oops\n---\nBody");
        write_note(tmp.path(), "fine.md", "---\ntitle: Fine\n---\nBody");

        let manifest = build_note_manifest(tmp.path()).unwrap();

        assert_eq!(manifest.entries.len(), 2);
        let broken = find_entry(&manifest, "broken");
        assert_eq!(broken.title.as_deref(), Some("broken"));
        assert_eq!(broken.body, "Body");
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_note_is_skipped() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("binary.md"), [0xff, 0xfe, 0x00, 0x80]).unwrap();
        write_note(tmp.path(), "ok.md", "Body");

        let manifest = build_note_manifest(tmp.path()).unwrap();
        assert_eq!(entry_ids(&manifest), vec!["ok"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_note_is_discovered() {
        let tmp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        write_note(tmp.path(), "local.md", "Body");
        write_note(outside.path(), "shared.md", "---\ntitle: Shared\n---\nLinked in");
        write_note(outside.path(), "linked-dir/inner.md", "Not followed");
        std::os::unix::fs::symlink(outside.path().join("shared.md"), tmp.path().join("shared.md"))
            .unwrap();
        std::os::unix::fs::symlink(outside.path().join("linked-dir"), tmp.path().join("linked-dir"))
            .unwrap();
        std::os::unix::fs::symlink(tmp.path().join("missing.md"), tmp.path().join("dangling.md"))
            .unwrap();

        let manifest = build_note_manifest(tmp.path()).unwrap();

        assert_eq!(entry_ids(&manifest), vec!["local", "shared"]);
        let shared = find_entry(&manifest, "shared");
        assert_eq!(shared.title.as_deref(), Some("Shared"));
        assert_eq!(shared.source_path, tmp.path().join("shared.md"));
    }

    #[test]
    fn uppercase_extension_is_not_markdown() {
        let tmp = TempDir::new().unwrap();
        write_note(tmp.path(), "note.md", "Body");
        write_note(tmp.path(), "Shouting.MD", "Body");
        write_note(tmp.path(), "Mixed.Md", "Body");

        let manifest = build_note_manifest(tmp.path()).unwrap();
        assert_eq!(entry_ids(&manifest), vec!["note"]);
    }

    #[test]
    fn housekeeping_directories_are_pruned() {
        let tmp = TempDir::new().unwrap();
        write_note(tmp.path(), ".git/objects/readme.md", "x");
        write_note(tmp.path(), ".obsidian/plugins/plugin/README.md", "x");
        write_note(tmp.path(), "DDIA/assets/deep/figure.md", "x");
        write_note(tmp.path(), "templates/daily.md", "x");
        write_note(tmp.path(), "DDIA/Concurrency.md", "Body");

        let root = std::path::absolute(tmp.path()).unwrap();
        let walked: Vec<String> = WalkDir::new(&root)
            .min_depth(1)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_pruned_directory(e))
            .filter_map(Result::ok)
            .map(|e| relative_key(e.path().strip_prefix(&root).unwrap()))
            .collect();
        assert!(walked.iter().all(|p| !p.contains(".git") && !p.contains("assets")));
        assert!(walked.iter().all(|p| !p.starts_with("templates")));
        assert!(walked.contains(&"DDIA/Concurrency.md".to_string()));

        let manifest = build_note_manifest(tmp.path()).unwrap();
        assert_eq!(canonical_routes(&manifest), vec!["ddia/concurrency"]);
    }

    #[test]
    fn hidden_notes_root_is_still_scanned() {
        let tmp = TempDir::new().unwrap();
        write_note(tmp.path(), ".vault/note.md", "Body");

        let manifest = build_note_manifest(&tmp.path().join(".vault")).unwrap();
        assert_eq!(entry_ids(&manifest), vec!["note"]);
    }

    #[test]
    fn entries_are_sorted_by_relative_path() {
        let tmp = TempDir::new().unwrap();
        write_note(tmp.path(), "zeta.md", "z");
        write_note(tmp.path(), "alpha/beta.md", "b");
        write_note(tmp.path(), "alpha.md", "a");
        write_note(tmp.path(), "Middle/index.md", "m");

        let manifest = build_note_manifest(tmp.path()).unwrap();
        // Byte order: uppercase first, and `.` sorts before `/`.
        assert_eq!(
            canonical_routes(&manifest),
            vec!["middle", "alpha", "alpha/beta", "zeta"]
        );
    }

    #[test]
    fn source_paths_are_absolute() {
        let tmp = TempDir::new().unwrap();
        write_note(tmp.path(), "DDIA/Concurrency.md", "Body");

        let manifest = build_note_manifest(tmp.path()).unwrap();
        let source = &manifest.entries[0].source_path;
        assert!(source.is_absolute());
        assert!(source.ends_with("DDIA/Concurrency.md"));
    }

    #[test]
    fn first_discovered_note_keeps_canonical_claim() {
        let tmp = TempDir::new().unwrap();
        write_note(tmp.path(), "a.md", "---\nslug: shared\n---\n");
        write_note(tmp.path(), "b.md", "---\nslug: shared\n---\n");
        write_note(tmp.path(), "c.md", "---\nslug: shared\n---\n");

        let manifest = build_note_manifest(tmp.path()).unwrap();

        let files: Vec<Vec<&str>> = manifest
            .errors
            .iter()
            .map(|e| e.files.iter().map(String::as_str).collect())
            .collect();
        assert_eq!(files, vec![vec!["a", "b"], vec!["a", "c"]]);
    }

    #[test]
    fn building_twice_is_identical() {
        let tmp = setup_fixtures();
        let first = build_note_manifest(tmp.path()).unwrap();
        let second = build_note_manifest(tmp.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let result = build_note_manifest(&tmp.path().join("does-not-exist"));
        assert!(matches!(result, Err(ScanError::Io(_))));
    }

    #[test]
    fn root_that_is_a_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        write_note(tmp.path(), "note.md", "Body");
        let result = build_note_manifest(&tmp.path().join("note.md"));
        assert!(matches!(result, Err(ScanError::Io(_))));
    }

    #[test]
    fn empty_root_is_an_empty_manifest() {
        let tmp = TempDir::new().unwrap();
        let manifest = build_note_manifest(tmp.path()).unwrap();
        assert!(manifest.entries.is_empty());
        assert!(manifest.is_valid());
    }

    // =========================================================================
    // Collision passes on hand-built entries
    // =========================================================================

    #[test]
    fn same_source_path_never_collides() {
        let a = entry("a", "/notes/a.md", "a", &[]);
        let errors = detect_collisions(&[a.clone(), a]);
        assert!(errors.is_empty());
    }

    #[test]
    fn conflict_takes_precedence_over_alias_collision() {
        let entries = [
            entry("owner", "/notes/x.md", "x", &[]),
            entry("first", "/notes/f.md", "f", &["x"]),
            entry("second", "/notes/s.md", "s", &["x"]),
        ];
        let errors = detect_collisions(&entries);

        assert_eq!(error_kinds(&errors), vec![
            ManifestErrorKind::AliasCanonicalConflict,
            ManifestErrorKind::AliasCanonicalConflict,
        ]);
    }

    #[test]
    fn alias_collision_files_list_earlier_claimant_first() {
        let entries = [
            entry("first", "/notes/f.md", "f", &["shared"]),
            entry("second", "/notes/s.md", "s", &["shared"]),
        ];
        let errors = detect_collisions(&entries);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].files, vec!["first", "second"]);
        assert_eq!(errors[0].message, "Alias collision: 'shared'");
    }

    #[test]
    fn alias_checked_against_later_canonical_routes() {
        // The canonical map is complete before aliases are checked.
        let entries = [
            entry("aliaser", "/notes/a.md", "a", &["late"]),
            entry("late", "/notes/late.md", "late", &[]),
        ];
        let errors = detect_collisions(&entries);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ManifestErrorKind::AliasCanonicalConflict);
        assert_eq!(errors[0].files, vec!["late", "aliaser"]);
    }

    #[test]
    fn colliding_canonical_still_blocks_aliases_to_that_route() {
        let entries = [
            entry("one", "/notes/1.md", "dup", &[]),
            entry("two", "/notes/2.md", "dup", &[]),
            entry("three", "/notes/3.md", "three", &["dup"]),
        ];
        let errors = detect_collisions(&entries);

        assert_eq!(error_kinds(&errors), vec![
            ManifestErrorKind::CanonicalCollision,
            ManifestErrorKind::AliasCanonicalConflict,
        ]);
        assert_eq!(errors[1].files, vec!["one", "three"]);
    }
}
