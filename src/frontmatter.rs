//! Front matter splitting and parsing.
//!
//! Notes may start with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! id: ddia-concurrency
//! title: Concurrency
//! surfaces:
//!   - notes
//! ---
//! Body text…
//! ```
//!
//! Vault notes are hand-edited, so parsing is lenient. Scalars may be written
//! as strings, numbers or booleans; list fields accept a single scalar; a
//! value of the wrong shape reads as absent. Keys not modelled here are kept
//! in [`NoteFrontmatter::extra`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Metadata from a note's front matter block. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteFrontmatter {
    /// Stable external identifier.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Explicit slug override.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool", skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_bool", skip_serializing_if = "Option::is_none")]
    pub show_toc: Option<bool>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub note_type: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Index pages that should list this note (e.g. `notes`).
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Option::is_none")]
    pub surfaces: Option<Vec<String>>,
    /// Any other keys, preserved as written.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl NoteFrontmatter {
    /// Whether `surfaces` lists the given surface. Missing `surfaces` is `false`.
    pub fn has_surface(&self, surface: &str) -> bool {
        self.surfaces
            .as_ref()
            .is_some_and(|s| s.iter().any(|name| name == surface))
    }
}

/// A note split into its metadata and body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedNote {
    pub frontmatter: NoteFrontmatter,
    pub body: String,
}

/// Split raw note content into the front matter block and the body.
///
/// The block must open on the first line with `---` and close with another
/// `---` line. Without a closing fence the whole content is body.
/// A leading byte-order mark is ignored.
pub fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');

    let Some(first) = lines.next() else {
        return (None, content);
    };
    if first.trim_end() != "---" {
        return (None, content);
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if line.trim_end() == "---" {
            return (Some(&content[start..offset]), &content[offset + line.len()..]);
        }
        offset += line.len();
    }
    (None, content)
}

/// Parse the YAML inside a front matter block.
///
/// An empty block, or one that is just `null`, is empty metadata.
pub fn parse_frontmatter(yaml: &str) -> Result<NoteFrontmatter, FrontmatterError> {
    if yaml.trim().is_empty() {
        return Ok(NoteFrontmatter::default());
    }
    let value: Value = serde_yaml::from_str(yaml)?;
    if value.is_null() {
        return Ok(NoteFrontmatter::default());
    }
    Ok(serde_yaml::from_value(value)?)
}

/// Split and parse a note. Front matter that fails to parse is logged and
/// treated as empty metadata; the body is still everything after the fence.
pub fn parse_note(content: &str, source: &std::path::Path) -> ParsedNote {
    let (block, body) = split_frontmatter(content);
    let frontmatter = match block.map(parse_frontmatter) {
        Some(Ok(fm)) => fm,
        Some(Err(err)) => {
            tracing::warn!(path = %source.display(), error = %err, "ignoring unparsable front matter");
            NoteFrontmatter::default()
        }
        None => NoteFrontmatter::default(),
    };
    ParsedNote {
        frontmatter,
        body: body.to_string(),
    }
}

// =============================================================================
// Lenient field deserializers
// =============================================================================

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_to_string))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::Sequence(items)) => Some(items.iter().filter_map(scalar_to_string).collect()),
        Some(other) => scalar_to_string(&other).map(|s| vec![s]),
    })
}
