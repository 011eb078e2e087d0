use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest identifier the store will look up.
pub const MAX_ID_LEN: usize = 64;

/// Opaque snippet identifier.
///
/// Only `[A-Za-z0-9_-]{1,64}` is accepted, so an id is always safe to use as a
/// file name or URL query value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SnippetId(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed snippet id '{0}'")]
pub struct InvalidSnippetId(pub String);

impl SnippetId {
    pub fn parse(raw: &str) -> Result<Self, InvalidSnippetId> {
        if is_well_formed(raw) {
            Ok(SnippetId(raw.to_string()))
        } else {
            Err(InvalidSnippetId(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_well_formed(raw: &str) -> bool {
    !raw.is_empty()
        && raw.len() <= MAX_ID_LEN
        && raw
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

impl fmt::Display for SnippetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SnippetId {
    type Err = InvalidSnippetId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SnippetId::parse(s)
    }
}

impl TryFrom<String> for SnippetId {
    type Error = InvalidSnippetId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        if is_well_formed(&raw) {
            Ok(SnippetId(raw))
        } else {
            Err(InvalidSnippetId(raw))
        }
    }
}

impl From<SnippetId> for String {
    fn from(id: SnippetId) -> Self {
        id.0
    }
}

impl AsRef<str> for SnippetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
