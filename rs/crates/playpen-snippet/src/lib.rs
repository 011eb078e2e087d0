//! playpen-snippet — Shared snippet types for playpen
//!
//! Defines the canonical Rust representation of a saved snippet and the JSON
//! bodies exchanged between the store server and the editing session. The
//! server, the session and the preview renderer all consume these types.

mod id;
pub mod template;

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub use id::{InvalidSnippetId, SnippetId, MAX_ID_LEN};
pub use template::{default_template, find_template, Template, DEFAULT_TEMPLATE, TEMPLATES};

/// The persisted HTML/CSS/JS triple.
///
/// Absent or `null` fields deserialize to the empty string: the save endpoint
/// stores whatever it is given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    #[serde(default, deserialize_with = "nullable_string")]
    pub html: String,

    #[serde(default, deserialize_with = "nullable_string")]
    pub css: String,

    #[serde(default, deserialize_with = "nullable_string")]
    pub js: String,
}

impl Snippet {
    pub fn new(html: impl Into<String>, css: impl Into<String>, js: impl Into<String>) -> Self {
        Snippet {
            html: html.into(),
            css: css.into(),
            js: js.into(),
        }
    }

    /// Borrow one of the three sources.
    pub fn source(&self, kind: SourceKind) -> &str {
        match kind {
            SourceKind::Html => &self.html,
            SourceKind::Css => &self.css,
            SourceKind::Js => &self.js,
        }
    }

    /// Replace one of the three sources.
    pub fn set_source(&mut self, kind: SourceKind, value: String) {
        match kind {
            SourceKind::Html => self.html = value,
            SourceKind::Css => self.css = value,
            SourceKind::Js => self.js = value,
        }
    }
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Which of the three editors a change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Html,
    Css,
    Js,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::Html, SourceKind::Css, SourceKind::Js];

    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Html => "html",
            SourceKind::Css => "css",
            SourceKind::Js => "js",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Playground pane arrangement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Editors and preview next to each other
    #[default]
    Side,
    /// Preview only
    Full,
}

impl Layout {
    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Side => "side",
            Layout::Full => "full",
        }
    }

    /// Whether the editor panes are visible in this layout.
    pub fn shows_editors(self) -> bool {
        matches!(self, Layout::Side)
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown layout '{0}' (expected 'side' or 'full')")]
pub struct UnknownLayout(pub String);

impl FromStr for Layout {
    type Err = UnknownLayout;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "side" => Ok(Layout::Side),
            "full" => Ok(Layout::Full),
            other => Err(UnknownLayout(other.to_string())),
        }
    }
}

/// Body of a successful `POST /save`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResponse {
    pub id: SnippetId,
}

/// Body of every error response from the store server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Parse a snippet from a JSON string
pub fn parse_snippet(json: &str) -> Result<Snippet, serde_json::Error> {
    serde_json::from_str(json)
}
