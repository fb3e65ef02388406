//! Manifest types shared by the scan stage and everything that consumes it.
//!
//! These are serialized to `manifest.json` for the site build, so field names
//! follow the site's camelCase convention.

use crate::frontmatter::NoteFrontmatter;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// One processed note.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteEntry {
    /// Front matter `id`, or derived from the relative path.
    pub id: String,
    /// Absolute path of the source file. This, not `id`, identifies a note
    /// when checking for collisions.
    pub source_path: PathBuf,
    /// Front matter `title`, else the filename without extension.
    pub title: Option<String>,
    pub slug: String,
    /// `/`-joined route without leading or trailing slash. Empty for the
    /// section root.
    pub canonical_route: String,
    /// Routes that redirect to `canonical_route`.
    pub alias_routes: Vec<String>,
    pub frontmatter: NoteFrontmatter,
    /// Content after the front matter block.
    pub body: String,
}

/// What kind of route conflict was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestErrorKind {
    /// Two notes claim the same canonical route.
    CanonicalCollision,
    /// Two notes declare the same alias.
    AliasCollision,
    /// A note's alias is another note's canonical route.
    AliasCanonicalConflict,
}

impl ManifestErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CanonicalCollision => "canonical_collision",
            Self::AliasCollision => "alias_collision",
            Self::AliasCanonicalConflict => "alias_canonical_conflict",
        }
    }
}

impl fmt::Display for ManifestErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A route conflict found while building the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestError {
    #[serde(rename = "type")]
    pub kind: ManifestErrorKind,
    pub message: String,
    /// Ids of the conflicting notes: the earlier claim first.
    pub files: Vec<String>,
    /// The contested route.
    pub route: String,
}

impl ManifestError {
    pub(crate) fn canonical_collision(existing: &NoteEntry, new: &NoteEntry) -> Self {
        Self {
            kind: ManifestErrorKind::CanonicalCollision,
            message: format!("Canonical route collision: '{}'", new.canonical_route),
            files: vec![existing.id.clone(), new.id.clone()],
            route: new.canonical_route.clone(),
        }
    }

    pub(crate) fn alias_collision(existing: &NoteEntry, new: &NoteEntry, alias: &str) -> Self {
        Self {
            kind: ManifestErrorKind::AliasCollision,
            message: format!("Alias collision: '{alias}'"),
            files: vec![existing.id.clone(), new.id.clone()],
            route: alias.to_string(),
        }
    }

    pub(crate) fn alias_canonical_conflict(
        canonical_owner: &NoteEntry,
        new: &NoteEntry,
        alias: &str,
    ) -> Self {
        Self {
            kind: ManifestErrorKind::AliasCanonicalConflict,
            message: format!("Alias '{alias}' conflicts with canonical route of another note"),
            files: vec![canonical_owner.id.clone(), new.id.clone()],
            route: alias.to_string(),
        }
    }
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}\n  Files: {}\n  Route: {}",
            self.kind,
            self.message,
            self.files.join(", "),
            self.route
        )
    }
}

/// Result of the scan stage: every note plus every detected conflict.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NoteManifest {
    /// Notes in discovery order (sorted relative path).
    pub entries: Vec<NoteEntry>,
    pub errors: Vec<ManifestError>,
}

impl NoteManifest {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}
