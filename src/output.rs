//! CLI output formatting for every command.
//!
//! Output is note-centric: each note is shown by its positional index and
//! title, with the source file and routes as indented context lines.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Notes
//! 001 Concurrency
//!     Source: DDIA/Concurrency.md
//!     Route: ddia/concurrency
//!     Aliases: concurrency
//! 002 Notes
//!     Source: index.md
//!     Route: (root)
//!
//! Errors
//! [canonical_collision] Canonical route collision: 'duplicate'
//!     Files: note-a, note-b
//!     Route: duplicate
//!
//! Scanned 2 notes, 1 error
//! ```
//!
//! ## Routes
//!
//! ```text
//! Pages
//! 001 Concurrency → ddia/concurrency
//!     Locks
//!         Two-phase
//!
//! Redirects
//! concurrency → ddia/concurrency
//! ```
//!
//! ## Listing
//!
//! ```text
//! notes (2 notes)
//! 001 Distributed Systems → distributed-systems
//!     2024-02-10 · 3 min read · rust, systems
//!     Distributed systems are hard to reason about...
//! ```
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::export::{ListingItem, RoutesFile};
use crate::toc::TocHeading;
use crate::types::{ManifestError, NoteEntry, NoteManifest};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Index + display name. Untitled notes show their id in parens.
///
/// ```text
/// 001 Concurrency
/// 002 (folder-note)
/// ```
fn entity_header(index: usize, title: Option<&str>, id: &str) -> String {
    match title {
        Some(t) if !t.is_empty() => format!("{} {}", format_index(index), t),
        _ => format!("{} ({})", format_index(index), id),
    }
}

fn display_route(route: &str) -> &str {
    if route.is_empty() { "(root)" } else { route }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn source_line(entry: &NoteEntry, root: &Path) -> String {
    let rel = entry
        .source_path
        .strip_prefix(root)
        .unwrap_or(&entry.source_path);
    format!("{}Source: {}", indent(1), rel.display())
}

// ============================================================================
// Scan
// ============================================================================

/// Format the scan result: notes, then errors, then a summary.
pub fn format_scan_output(manifest: &NoteManifest, root: &Path) -> Vec<String> {
    let mut lines = vec!["Notes".to_string()];

    for (i, entry) in manifest.entries.iter().enumerate() {
        lines.push(entity_header(i + 1, entry.title.as_deref(), &entry.id));
        lines.push(source_line(entry, root));
        lines.push(format!(
            "{}Route: {}",
            indent(1),
            display_route(&entry.canonical_route)
        ));
        if !entry.alias_routes.is_empty() {
            lines.push(format!(
                "{}Aliases: {}",
                indent(1),
                entry.alias_routes.join(", ")
            ));
        }
    }

    if !manifest.errors.is_empty() {
        lines.push(String::new());
        lines.push("Errors".to_string());
        lines.extend(format_errors(&manifest.errors));
    }

    lines.push(String::new());
    lines.push(format!(
        "Scanned {}, {}",
        plural(manifest.entries.len(), "note"),
        plural(manifest.errors.len(), "error")
    ));
    lines
}

pub fn print_scan_output(manifest: &NoteManifest, root: &Path) {
    for line in format_scan_output(manifest, root) {
        println!("{}", line);
    }
}

pub fn format_errors(errors: &[ManifestError]) -> Vec<String> {
    let mut lines = Vec::new();
    for error in errors {
        lines.push(format!("[{}] {}", error.kind, error.message));
        lines.push(format!("{}Files: {}", indent(1), error.files.join(", ")));
        lines.push(format!("{}Route: {}", indent(1), display_route(&error.route)));
    }
    lines
}

// ============================================================================
// Routes
// ============================================================================

pub fn format_routes_output(routes: &RoutesFile) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];
    for (i, page) in routes.pages.iter().enumerate() {
        lines.push(format!(
            "{} → {}",
            entity_header(i + 1, page.title.as_deref(), &page.id),
            display_route(page.path.as_deref().unwrap_or_default())
        ));
        toc_lines(&page.toc, 1, &mut lines);
    }

    if !routes.redirects.is_empty() {
        lines.push(String::new());
        lines.push("Redirects".to_string());
        for redirect in &routes.redirects {
            lines.push(format!("{} → {}", redirect.from, redirect.to));
        }
    }
    lines
}

fn toc_lines(toc: &[TocHeading], depth: usize, lines: &mut Vec<String>) {
    for heading in toc {
        lines.push(format!("{}{}", indent(depth), heading.text));
        toc_lines(&heading.children, depth + 1, lines);
    }
}

pub fn print_routes_output(routes: &RoutesFile) {
    for line in format_routes_output(routes) {
        println!("{}", line);
    }
}

// ============================================================================
// Listing
// ============================================================================

pub fn format_listing_output(surface: &str, items: &[ListingItem]) -> Vec<String> {
    let mut lines = vec![format!("{} ({})", surface, plural(items.len(), "note"))];
    for (i, item) in items.iter().enumerate() {
        lines.push(format!(
            "{} → {}",
            entity_header(i + 1, item.title.as_deref(), &item.id),
            display_route(&item.route)
        ));

        let mut details = vec![
            item.published_at
                .map(|d| d.to_string())
                .unwrap_or_else(|| "draft".to_string()),
            item.reading_time.text.clone(),
        ];
        if !item.tags.is_empty() {
            details.push(item.tags.join(", "));
        }
        lines.push(format!("{}{}", indent(1), details.join(" · ")));

        if !item.excerpt.is_empty() {
            lines.push(format!("{}{}", indent(1), truncate_desc(&item.excerpt, 80)));
        }
    }
    lines
}

pub fn print_listing_output(surface: &str, items: &[ListingItem]) {
    for line in format_listing_output(surface, items) {
        println!("{}", line);
    }
}

// ============================================================================
// Resolve
// ============================================================================

pub fn format_resolve_output(target: &str, route: Option<&str>) -> String {
    match route {
        Some(route) => format!("{} → {}", target, display_route(route)),
        None => format!("{} → (unresolved)", target),
    }
}
