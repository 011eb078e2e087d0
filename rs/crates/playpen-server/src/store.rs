//! Snippet store: `create` and `get` over a pluggable storage backend.
//!
//! Both backends write with create-if-absent semantics, so an id collision is
//! detected at write time. On a collision `create` draws a fresh id and tries
//! again, a bounded number of times.

use playpen_snippet::{Snippet, SnippetId};
use std::fmt;
use std::str::FromStr;

use crate::db::Db;
use crate::fs_store::FsStore;
use crate::ids::generate_snippet_id;

/// How many fresh ids `create` draws before giving up.
pub const MAX_ID_ATTEMPTS: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No snippet with that id, or the id is malformed.
    #[error("snippet not found")]
    NotFound,
    /// The storage medium failed.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<libsql::Error> for StoreError {
    fn from(e: libsql::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

/// Which storage medium backs the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// One JSON file per snippet
    Fs,
    /// Local libsql database
    Sqlite,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Fs => "fs",
            BackendKind::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fs" | "file" | "files" => Ok(BackendKind::Fs),
            "sqlite" | "libsql" | "db" => Ok(BackendKind::Sqlite),
            other => Err(format!("unknown store backend '{}' (expected 'fs' or 'sqlite')", other)),
        }
    }
}

enum Backend {
    Sqlite(Db),
    Fs(FsStore),
}

pub struct SnippetStore {
    backend: Backend,
}

impl SnippetStore {
    pub fn sqlite(db: Db) -> Self {
        Self {
            backend: Backend::Sqlite(db),
        }
    }

    pub fn fs(store: FsStore) -> Self {
        Self {
            backend: Backend::Fs(store),
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self.backend {
            Backend::Sqlite(_) => BackendKind::Sqlite,
            Backend::Fs(_) => BackendKind::Fs,
        }
    }

    /// Persist a snippet under a freshly generated id.
    ///
    /// Identical content always produces a new record.
    pub async fn create(&self, snippet: &Snippet) -> Result<SnippetId, StoreError> {
        self.create_with(snippet, generate_snippet_id).await
    }

    async fn create_with(
        &self,
        snippet: &Snippet,
        mut next_id: impl FnMut() -> SnippetId,
    ) -> Result<SnippetId, StoreError> {
        for attempt in 1..=MAX_ID_ATTEMPTS {
            let id = next_id();
            if self.insert(&id, snippet).await? {
                tracing::info!(
                    id = %id,
                    backend = %self.kind(),
                    bytes = snippet.html.len() + snippet.css.len() + snippet.js.len(),
                    "snippet saved"
                );
                return Ok(id);
            }
            tracing::warn!(id = %id, attempt, "snippet id collision, retrying");
        }
        Err(StoreError::Storage(format!(
            "no free snippet id after {} attempts",
            MAX_ID_ATTEMPTS
        )))
    }

    /// Look up a snippet by its raw id.
    pub async fn get(&self, raw_id: &str) -> Result<Snippet, StoreError> {
        let id = SnippetId::parse(raw_id).map_err(|_| StoreError::NotFound)?;
        let found = match &self.backend {
            Backend::Sqlite(db) => db.get_snippet(&id).await?,
            Backend::Fs(fs) => fs.read(&id).await?,
        };
        found.ok_or(StoreError::NotFound)
    }

    /// Number of stored snippets.
    pub async fn count(&self) -> Result<u64, StoreError> {
        match &self.backend {
            Backend::Sqlite(db) => Ok(db.count_snippets().await?.max(0) as u64),
            Backend::Fs(fs) => Ok(fs.count()),
        }
    }

    /// Returns false when the id is already taken.
    async fn insert(&self, id: &SnippetId, snippet: &Snippet) -> Result<bool, StoreError> {
        match &self.backend {
            Backend::Sqlite(db) => db.insert_snippet(id, snippet).await,
            Backend::Fs(fs) => fs.write_new(id, snippet).await,
        }
    }
}
