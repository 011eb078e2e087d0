//! File-per-snippet storage: `<dir>/<id>.json` holding `{"html","css","js"}`.
//!
//! A record is written to a temporary file first and then hard-linked into
//! place. The link fails if the target exists, which gives atomic
//! create-if-absent, and readers never observe a half-written record.

use playpen_snippet::{Snippet, SnippetId};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::AsyncWriteExt;

use crate::store::StoreError;

pub struct FsStore {
    dir: PathBuf,
    /// Record count, scanned once on open and bumped on every write
    records: AtomicU64,
}

impl FsStore {
    /// Open (and create if missing) the snippet directory.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| StoreError::Storage(format!("create {}: {}", dir.display(), e)))?;
        let records = scan_records(&dir).await?;
        Ok(Self {
            dir,
            records: AtomicU64::new(records),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, id: &SnippetId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    /// Write a new record. Returns false when the id is already taken.
    pub async fn write_new(&self, id: &SnippetId, snippet: &Snippet) -> Result<bool, StoreError> {
        let target = self.record_path(id);
        let tmp = self.dir.join(format!(".{}.tmp", id));
        let body = serde_json::to_vec(snippet)
            .map_err(|e| StoreError::Storage(format!("encode {}: {}", id, e)))?;

        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp)
            .await
        {
            Ok(f) => f,
            // Another writer holds the same fresh id
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        let written = async {
            file.write_all(&body).await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::hard_link(&tmp, &target).await
        }
        .await;
        if let Err(e) = tokio::fs::remove_file(&tmp).await {
            tracing::debug!(path = %tmp.display(), error = %e, "temp record not removed");
        }

        match written {
            Ok(()) => {
                self.records.fetch_add(1, Ordering::Relaxed);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn read(&self, id: &SnippetId) -> Result<Option<Snippet>, StoreError> {
        let data = match tokio::fs::read(self.record_path(id)).await {
            Ok(d) => d,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let snippet = serde_json::from_slice(&data)
            .map_err(|e| StoreError::Storage(format!("corrupt record {}: {}", id, e)))?;
        Ok(Some(snippet))
    }

    /// Number of records on disk as of open plus those written since.
    pub fn count(&self) -> u64 {
        self.records.load(Ordering::Relaxed)
    }
}

async fn scan_records(dir: &Path) -> Result<u64, StoreError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut n = 0;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.ends_with(".json") && !name.starts_with('.') {
            n += 1;
        }
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_record_layout() {
        let dir = TempDir::new().unwrap();
        let store = FsStore::open(dir.path().join("nested/snippets")).await.unwrap();
        let id = SnippetId::parse("abc123").unwrap();
        assert!(store.write_new(&id, &Snippet::new("<p>hi</p>", "", "")).await.unwrap());

        let raw = std::fs::read_to_string(store.dir().join("abc123.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, serde_json::json!({ "html": "<p>hi</p>", "css": "", "js": "" }));
        // Temp file is gone
        assert_eq!(std::fs::read_dir(store.dir()).unwrap().count(), 1);
        assert_eq!(store.count(), 1);
    }

    #[tokio::test]
    async fn test_count_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let store = FsStore::open(dir.path()).await.unwrap();
        for raw in ["one", "two"] {
            let id = SnippetId::parse(raw).unwrap();
            assert!(store.write_new(&id, &Snippet::default()).await.unwrap());
        }
        // A taken id is not counted twice
        let id = SnippetId::parse("one").unwrap();
        assert!(!store.write_new(&id, &Snippet::default()).await.unwrap());
        assert_eq!(store.count(), 2);

        // Stray temp files are not records
        std::fs::write(dir.path().join(".three.tmp"), b"{}").unwrap();
        let reopened = FsStore::open(dir.path()).await.unwrap();
        assert_eq!(reopened.count(), 2);
    }

    #[tokio::test]
    async fn test_missing_record() {
        let dir = TempDir::new().unwrap();
        let store = FsStore::open(dir.path()).await.unwrap();
        let id = SnippetId::parse("nope").unwrap();
        assert!(store.read(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_record_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let store = FsStore::open(dir.path()).await.unwrap();
        std::fs::write(dir.path().join("broken.json"), b"{not json").unwrap();
        let id = SnippetId::parse("broken").unwrap();
        assert!(matches!(store.read(&id).await, Err(StoreError::Storage(_))));
    }

    #[tokio::test]
    async fn test_records_written_by_older_servers_load() {
        // Records with null fields, as a permissive writer may leave them
        let dir = TempDir::new().unwrap();
        let store = FsStore::open(dir.path()).await.unwrap();
        std::fs::write(
            dir.path().join("0d9c5e52-6f1e-4b8a-9c7e-2b1f0a3d4e5f.json"),
            br#"{"html":"<p>x</p>","css":null}"#,
        )
        .unwrap();
        let id = SnippetId::parse("0d9c5e52-6f1e-4b8a-9c7e-2b1f0a3d4e5f").unwrap();
        assert_eq!(store.read(&id).await.unwrap(), Some(Snippet::new("<p>x</p>", "", "")));
    }
}
