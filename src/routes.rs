//! Queries over a built manifest, and the validation gate.
//!
//! Building a manifest never fails on route conflicts; it records them.
//! [`validate_manifest`] is where recorded conflicts become a hard error, so
//! tooling can choose between build-and-report (`scan`) and build-and-fail
//! (`check`, `build`).

use crate::types::{ManifestError, NoteEntry, NoteManifest};
use chrono::{DateTime, NaiveDate};
use thiserror::Error;

/// Every conflict in a manifest, reported at once.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Notes manifest validation failed:\n\n{}", format_errors(.errors))]
pub struct ValidationError {
    pub errors: Vec<ManifestError>,
}

fn format_errors(errors: &[ManifestError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Fail if the manifest recorded any route conflicts.
pub fn validate_manifest(manifest: &NoteManifest) -> Result<(), ValidationError> {
    if manifest.errors.is_empty() {
        return Ok(());
    }
    Err(ValidationError {
        errors: manifest.errors.clone(),
    })
}

/// A page to generate at a canonical route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanonicalPath<'a> {
    /// Route parameter; `None` for the section root.
    pub path: Option<&'a str>,
    pub entry: &'a NoteEntry,
}

/// A redirect-only route pointing at a canonical route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasPath<'a> {
    pub slug: &'a str,
    pub canonical_route: &'a str,
}

/// One path per entry, in manifest order.
pub fn get_canonical_paths(manifest: &NoteManifest) -> Vec<CanonicalPath<'_>> {
    manifest
        .entries
        .iter()
        .map(|entry| CanonicalPath {
            path: Some(entry.canonical_route.as_str()).filter(|p| !p.is_empty()),
            entry,
        })
        .collect()
}

/// Redirects for every alias that differs from its own canonical route.
pub fn get_alias_paths(manifest: &NoteManifest) -> Vec<AliasPath<'_>> {
    manifest
        .entries
        .iter()
        .flat_map(|entry| {
            entry
                .alias_routes
                .iter()
                .filter(move |alias| **alias != entry.canonical_route)
                .map(move |alias| AliasPath {
                    slug: alias,
                    canonical_route: &entry.canonical_route,
                })
        })
        .collect()
}

/// Entries whose front matter lists `surface`.
pub fn get_entries_by_surface<'a>(manifest: &'a NoteManifest, surface: &str) -> Vec<&'a NoteEntry> {
    manifest
        .entries
        .iter()
        .filter(|e| e.frontmatter.has_surface(surface))
        .collect()
}

pub fn get_entry_by_canonical_route<'a>(
    manifest: &'a NoteManifest,
    route: &str,
) -> Option<&'a NoteEntry> {
    manifest.entries.iter().find(|e| e.canonical_route == route)
}

pub fn get_entry_by_id<'a>(manifest: &'a NoteManifest, id: &str) -> Option<&'a NoteEntry> {
    manifest.entries.iter().find(|e| e.id == id)
}

/// Parse a `publishedAt`-style value.
///
/// Accepts `YYYY-MM-DD` (optionally followed by a time) and RFC 3339
/// timestamps. Values shorter than 8 characters and Obsidian's `0002-…`
/// placeholder dates are rejected.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.len() < 8 || value.starts_with("0002-") {
        return None;
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.date_naive());
    }
    let date_part = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// The entry's parsed `publishedAt`, if any.
pub fn published_date(entry: &NoteEntry) -> Option<NaiveDate> {
    entry.frontmatter.published_at.as_deref().and_then(parse_date)
}

/// Published means a valid `publishedAt` and `isPublished` not set to false.
pub fn is_published(entry: &NoteEntry) -> bool {
    published_date(entry).is_some() && entry.frontmatter.is_published != Some(false)
}

pub fn get_published_entries(manifest: &NoteManifest) -> Vec<&NoteEntry> {
    manifest.entries.iter().filter(|e| is_published(e)).collect()
}
