//! Reading time and excerpts for note listings.
//!
//! Both work on the note body (front matter already stripped). The excerpt
//! walks the `pulldown-cmark` event stream, so headings, code, HTML and links
//! are dropped by their Markdown structure rather than by pattern matching.

use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use serde::Serialize;

pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

/// Estimated reading time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadingTime {
    /// Display form, e.g. `"3 min read"`.
    pub text: String,
    pub minutes: u32,
    pub words: usize,
}

/// Estimate reading time at `words_per_minute`. Never less than one minute.
pub fn reading_time(text: &str, words_per_minute: u32) -> ReadingTime {
    let words = text.split_whitespace().count();
    let per_minute = words_per_minute.max(1) as usize;
    let minutes = u32::try_from(words.div_ceil(per_minute).max(1)).unwrap_or(u32::MAX);
    ReadingTime {
        text: format!("{minutes} min read"),
        minutes,
        words,
    }
}

/// Minimum length (in characters) of a paragraph worth excerpting.
const MIN_PARAGRAPH_CHARS: usize = 20;
/// Minimum length of a sentence kept in the excerpt.
const MIN_SENTENCE_CHARS: usize = 10;
const EXCERPT_SENTENCES: usize = 2;

/// A short plain-text teaser: the first two sentences of the first real
/// paragraph, followed by `...`. Empty if the body has no such paragraph.
pub fn extract_excerpt(body: &str) -> String {
    let Some(paragraph) = first_prose_paragraph(body) else {
        return String::new();
    };

    let sentences: Vec<&str> = paragraph
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
        .take(EXCERPT_SENTENCES)
        .collect();

    if sentences.is_empty() {
        return String::new();
    }
    format!("{}...", sentences.join(". "))
}

/// First top-level paragraph that reads like prose: long enough, starting
/// with a letter, and not an MDX import.
fn first_prose_paragraph(body: &str) -> Option<String> {
    let mut nesting = 0usize;
    let mut skip_depth = 0usize;
    let mut current: Option<String> = None;

    for event in Parser::new(body) {
        match event {
            Event::Start(Tag::BlockQuote(_) | Tag::Item | Tag::FootnoteDefinition(_)) => {
                nesting += 1
            }
            Event::End(TagEnd::BlockQuote(_) | TagEnd::Item | TagEnd::FootnoteDefinition) => {
                nesting = nesting.saturating_sub(1)
            }
            Event::Start(Tag::Paragraph) if nesting == 0 => current = Some(String::new()),
            Event::End(TagEnd::Paragraph) => {
                if let Some(text) = current.take() {
                    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
                    if is_prose(&text) {
                        return Some(text);
                    }
                }
            }
            Event::Start(Tag::Link { .. } | Tag::Image { .. }) => skip_depth += 1,
            Event::End(TagEnd::Link | TagEnd::Image) => skip_depth = skip_depth.saturating_sub(1),
            Event::Text(text) if skip_depth == 0 => {
                if let Some(buf) = current.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(buf) = current.as_mut() {
                    buf.push(' ');
                }
            }
            _ => {}
        }
    }
    None
}

fn is_prose(text: &str) -> bool {
    let is_import = text.starts_with("import ") && text.contains(" from ");
    !is_import
        && text.chars().count() > MIN_PARAGRAPH_CHARS
        && text.starts_with(|c: char| c.is_ascii_alphabetic())
}
