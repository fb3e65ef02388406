//! Wiki-link target resolution.
//!
//! Obsidian links name notes by title or filename (`[[My Note]]`,
//! `[[My Note#Section|label]]`), not by route. A [`SlugMap`] answers "which
//! canonical route does this link target mean?" for one manifest.
//!
//! The map is a plain value built from a manifest and owned by the caller.
//! Rebuild it whenever the manifest is rebuilt; nothing is cached globally,
//! so a long-running process never resolves against a stale vault.

use crate::slug::{normalize_slug, strip_markdown_extension};
use crate::types::NoteManifest;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct SlugMap {
    routes: HashMap<String, String>,
}

impl SlugMap {
    /// Index every entry by title, filename stem, normalized stem, slug and
    /// id. When two entries share a key, the one earlier in the manifest
    /// keeps it.
    pub fn from_manifest(manifest: &NoteManifest) -> Self {
        let mut routes = HashMap::new();
        for entry in &manifest.entries {
            let stem = entry
                .source_path
                .file_name()
                .map(|n| strip_markdown_extension(&n.to_string_lossy()).to_string())
                .unwrap_or_default();

            let mut keys = vec![
                normalize_slug(&stem),
                stem,
                entry.slug.clone(),
                entry.id.clone(),
            ];
            if let Some(title) = &entry.title {
                keys.insert(0, title.clone());
            }

            for key in keys.into_iter().filter(|k| !k.is_empty()) {
                routes
                    .entry(key)
                    .or_insert_with(|| entry.canonical_route.clone());
            }
        }
        Self { routes }
    }

    /// Resolve a wiki-link target to a canonical route.
    ///
    /// Heading (`#…`) and label (`|…`) parts are ignored. The target is tried
    /// as written, then normalized.
    pub fn resolve(&self, target: &str) -> Option<&str> {
        let name = target.split('|').next().unwrap_or(target);
        let name = name.split('#').next().unwrap_or(name).trim();
        let name = strip_markdown_extension(name);
        if name.is_empty() {
            return None;
        }
        self.routes
            .get(name)
            .or_else(|| self.routes.get(&normalize_slug(name)))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
