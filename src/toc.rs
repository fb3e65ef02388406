//! Heading extraction and table-of-contents nesting.
//!
//! ```text
//! ## Setup            setup
//! ### Install         ├── install
//! ### Configure       └── configure
//! ## Setup            setup-1
//! ```

use crate::slug::normalize_slug;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use serde::Serialize;
use std::collections::HashMap;

/// A heading as it appears in the note body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// 1 for `#`, 6 for `######`.
    pub depth: u8,
    /// Anchor, unique within the document.
    pub slug: String,
    pub text: String,
}

/// A node in the nested table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocHeading {
    pub depth: u8,
    pub slug: String,
    pub text: String,
    pub children: Vec<TocHeading>,
}

impl From<&Heading> for TocHeading {
    fn from(heading: &Heading) -> Self {
        Self {
            depth: heading.depth,
            slug: heading.slug.clone(),
            text: heading.text.clone(),
            children: Vec::new(),
        }
    }
}

/// All headings of `body` in document order.
///
/// Repeated anchors get `-1`, `-2`, … suffixes in order of appearance.
pub fn extract_headings(body: &str) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut current: Option<(u8, String)> = None;

    for event in Parser::new(body) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((heading_depth(level), String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buf)) = current.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((depth, text)) = current.take() {
                    let text = text.trim().to_string();
                    let slug = unique_slug(&mut seen, normalize_slug(&text));
                    headings.push(Heading { depth, slug, text });
                }
            }
            _ => {}
        }
    }
    headings
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn unique_slug(seen: &mut HashMap<String, usize>, base: String) -> String {
    let count = seen.entry(base.clone()).or_insert(0);
    let slug = match *count {
        0 => base,
        n => format!("{base}-{n}"),
    };
    *count += 1;
    slug
}

/// Nest headings within `min_depth..=max_depth`.
///
/// Each heading becomes a child of the nearest preceding kept heading with a
/// smaller depth, or a top-level item when there is none.
pub fn generate_toc(headings: &[Heading], min_depth: u8, max_depth: u8) -> Vec<TocHeading> {
    let mut roots = Vec::new();
    let mut open: Vec<TocHeading> = Vec::new();

    for heading in headings
        .iter()
        .filter(|h| (min_depth..=max_depth).contains(&h.depth))
    {
        loop {
            match open.last() {
                Some(top) if top.depth >= heading.depth => {
                    if let Some(done) = open.pop() {
                        attach(done, &mut open, &mut roots);
                    }
                }
                _ => break,
            }
        }
        open.push(TocHeading::from(heading));
    }
    while let Some(done) = open.pop() {
        attach(done, &mut open, &mut roots);
    }
    roots
}

fn attach(node: TocHeading, open: &mut [TocHeading], roots: &mut Vec<TocHeading>) {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}
