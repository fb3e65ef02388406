//! Build artifacts derived from a manifest for the site build.
//!
//! `manifest.json` carries everything; the files built here are the narrow
//! views the site actually consumes:
//!
//! - `routes.json`: pages to generate and redirects to emit.
//! - `listing.json`: the note index for one surface, newest first.

use crate::config::NotesConfig;
use crate::reading::{ReadingTime, extract_excerpt, reading_time};
use crate::routes::{get_alias_paths, get_canonical_paths, get_entries_by_surface, is_published, published_date};
use crate::toc::{TocHeading, extract_headings, generate_toc};
use crate::types::{NoteEntry, NoteManifest};
use chrono::NaiveDate;
use serde::Serialize;

/// Contents of `routes.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutesFile {
    pub pages: Vec<PageRoute>,
    pub redirects: Vec<Redirect>,
}

/// A page generated at a canonical route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRoute {
    /// `None` for the section root.
    pub path: Option<String>,
    pub id: String,
    pub title: Option<String>,
    pub toc: Vec<TocHeading>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub from: String,
    pub to: String,
}

/// One row of `listing.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingItem {
    pub id: String,
    pub title: Option<String>,
    pub route: String,
    pub excerpt: String,
    pub reading_time: ReadingTime,
    pub tags: Vec<String>,
    pub published_at: Option<NaiveDate>,
}

pub fn build_routes(manifest: &NoteManifest, config: &NotesConfig) -> RoutesFile {
    let pages = get_canonical_paths(manifest)
        .into_iter()
        .map(|canonical| PageRoute {
            path: canonical.path.map(str::to_string),
            id: canonical.entry.id.clone(),
            title: canonical.entry.title.clone(),
            toc: page_toc(canonical.entry, config),
        })
        .collect();

    let redirects = get_alias_paths(manifest)
        .into_iter()
        .map(|alias| Redirect {
            from: alias.slug.to_string(),
            to: alias.canonical_route.to_string(),
        })
        .collect();

    RoutesFile { pages, redirects }
}

fn page_toc(entry: &NoteEntry, config: &NotesConfig) -> Vec<TocHeading> {
    if entry.frontmatter.show_toc == Some(false) {
        return Vec::new();
    }
    generate_toc(
        &extract_headings(&entry.body),
        config.toc.min_depth,
        config.toc.max_depth,
    )
}

/// Listing for `config.listing.surface`.
///
/// Drafts are dropped unless `include_drafts` is set. Items are ordered by
/// `publishedAt`, newest first; undated items go last and otherwise keep
/// manifest order.
pub fn build_listing(manifest: &NoteManifest, config: &NotesConfig) -> Vec<ListingItem> {
    let mut items: Vec<ListingItem> = get_entries_by_surface(manifest, &config.listing.surface)
        .into_iter()
        .filter(|entry| config.listing.include_drafts || is_published(entry))
        .map(|entry| ListingItem {
            id: entry.id.clone(),
            title: entry.title.clone(),
            route: entry.canonical_route.clone(),
            excerpt: extract_excerpt(&entry.body),
            reading_time: reading_time(&entry.body, config.reading.words_per_minute),
            tags: entry.frontmatter.tags.clone().unwrap_or_default(),
            published_at: published_date(entry),
        })
        .collect();

    // Option orders None first, so the reversed comparison puts undated last.
    items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    items
}
