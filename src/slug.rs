//! Slug normalization and route derivation.
//!
//! Every note gets three route-related values, all derived from its path and
//! front matter:
//!
//! - a **slug**: a URL-safe token from `slug:` in front matter or the filename
//! - a **canonical route**: the single authoritative path for the note
//! - **alias routes**: extra paths that redirect to the canonical one
//!
//! ## Route Format
//!
//! Routes are `/`-joined segments of `[a-z0-9-]`, with no leading or trailing
//! slash. The empty string is the section root (`index.md` at the vault root).
//!
//! ```text
//! index.md                 → ""
//! hello-world.md           → "hello-world"
//! DDIA/index.md            → "ddia"
//! DDIA/Concurrency.md      → "ddia/concurrency"
//! Go Notes/My File.md      → "go-notes/my-file"
//! ```
//!
//! ## Folder-as-Section
//!
//! An `index.md` inside a folder is that folder's landing page, so it
//! contributes no segment of its own. This mirrors how vault-style note
//! systems treat folders.

use crate::frontmatter::NoteFrontmatter;
use std::path::{Component, Path};

/// The surface that promotes a note to a top-level alias route.
pub const NOTES_SURFACE: &str = "notes";

/// Normalize a string into a URL-safe slug.
///
/// - `"Hello World"` → `"hello-world"`
/// - `"hello's world!"` → `"hellos-world"`
/// - `"Go: Understanding & Learning"` → `"go-understanding-learning"`
/// - `"-hello---world-"` → `"hello-world"`
///
/// Output only contains `[a-z0-9-]`, never starts or ends with a hyphen and
/// never has two in a row. Normalizing a normalized slug returns it unchanged.
pub fn normalize_slug(input: &str) -> String {
    let lowered = input.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    // Whitespace and hyphens collapse into one separator, emitted lazily so
    // that leading and trailing runs disappear.
    let mut pending_separator = false;
    for c in lowered.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else if c == '-' || is_separator_space(c) {
            pending_separator = true;
        }
    }
    slug
}

/// Word separators: Unicode `White_Space` plus the byte order mark, minus
/// NEL (U+0085).
fn is_separator_space(c: char) -> bool {
    c == '\u{feff}' || (c.is_whitespace() && c != '\u{85}')
}

/// Strip a trailing `.md` (any case) from a filename.
pub fn strip_markdown_extension(filename: &str) -> &str {
    let cut = filename.len().saturating_sub(3);
    match filename.get(cut..) {
        Some(ext) if ext.eq_ignore_ascii_case(".md") => &filename[..cut],
        _ => filename,
    }
}

/// Compute the slug for a note.
///
/// A non-blank `slug:` in front matter wins; otherwise the filename without
/// its `.md` extension is used. Both are normalized.
pub fn compute_slug(frontmatter: &NoteFrontmatter, filename: &str) -> String {
    match frontmatter.slug.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(slug) => normalize_slug(slug),
        None => normalize_slug(strip_markdown_extension(filename)),
    }
}

/// Compute the canonical route from a path relative to the notes root.
///
/// `index.md` maps to its folder (or to `""` at the root); any other file maps
/// to its normalized folder path plus `slug`. Folder segments that normalize
/// to nothing are dropped.
pub fn compute_canonical_route(relative_path: impl AsRef<Path>, slug: &str) -> String {
    let path = relative_path.as_ref();
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    let stem = strip_markdown_extension(&filename);

    let mut segments = directory_segments(path);
    if !stem.eq_ignore_ascii_case("index") && !slug.is_empty() {
        segments.push(slug.to_string());
    }
    segments.join("/")
}

/// Normalized, non-empty directory segments of a relative path.
fn directory_segments(path: &Path) -> Vec<String> {
    let Some(parent) = path.parent() else {
        return Vec::new();
    };
    parent
        .components()
        .filter_map(|c| match c {
            Component::Normal(segment) => Some(normalize_slug(&segment.to_string_lossy())),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect()
}

/// Compute alias routes for a note.
///
/// Only notes promoted to the `notes` surface get an alias: the normalized
/// front matter `id`, or the slug when there is no id. An alias equal to the
/// canonical route is redundant and dropped. An `id` that normalizes to
/// nothing still yields the alias `""`, which then conflicts with the section
/// root if one exists. At most one alias is produced.
pub fn compute_alias_routes(
    frontmatter: &NoteFrontmatter,
    slug: &str,
    canonical_route: &str,
) -> Vec<String> {
    if !frontmatter.has_surface(NOTES_SURFACE) {
        return Vec::new();
    }

    let alias = match frontmatter.id.as_deref().filter(|id| !id.trim().is_empty()) {
        Some(id) => normalize_slug(id),
        None => slug.to_string(),
    };

    if alias == canonical_route {
        return Vec::new();
    }
    vec![alias]
}
