//! # Notes Manifest
//!
//! Builds the route manifest for a statically generated notes section backed
//! by an Obsidian vault. The vault is the data source: every Markdown file is
//! a page, folders become route segments, and front matter can override the
//! slug or promote a note to a listing surface.
//!
//! # Architecture: Scan, Then Derive
//!
//! ```text
//! 1. Scan     notes/    →  NoteManifest   (entries + route conflicts)
//! 2. Gate     manifest  →  Ok | ValidationError
//! 3. Export   manifest  →  routes.json, listing.json
//! ```
//!
//! Scanning never fails on conflicts; it records them so a single run shows
//! every problem. The gate turns recorded conflicts into a hard error for
//! build tooling. Everything after the scan is a pure function of the
//! manifest.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the vault, parses notes, assigns routes, detects collisions |
//! | [`frontmatter`] | Lenient YAML front matter parsing |
//! | [`slug`] | Slug normalization, canonical and alias route rules |
//! | [`types`] | `NoteEntry`, `ManifestError`, `NoteManifest` |
//! | [`routes`] | Validation gate, path helpers, surface and publication queries |
//! | [`slug_map`] | Wiki-link target → canonical route resolution |
//! | [`reading`] | Reading time and excerpts |
//! | [`toc`] | Heading extraction and nested tables of contents |
//! | [`export`] | `routes.json` and `listing.json` builders |
//! | [`config`] | `notes.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | `tracing` subscriber setup for the CLI |
//!
//! # Routing Rules
//!
//! - `index.md` maps to its folder; the root `index.md` maps to `""`.
//! - Any other file maps to its normalized folder path plus its slug.
//! - A note whose `surfaces` lists `notes` also gets a top-level alias (its
//!   `id`, or its slug) that redirects to the canonical route.
//! - Two notes may never share a canonical route or an alias, and an alias
//!   may never shadow another note's canonical route.

pub mod config;
pub mod export;
pub mod frontmatter;
pub mod logging;
pub mod output;
pub mod reading;
pub mod routes;
pub mod scan;
pub mod slug;
pub mod slug_map;
pub mod toc;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
