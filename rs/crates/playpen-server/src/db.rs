use libsql::{params, Connection, Database};
use playpen_snippet::{Snippet, SnippetId};

use crate::store::StoreError;

pub struct Db {
    inner: Database,
}

// ── Connection helper ───────────────────────────────────────────────

impl Db {
    pub async fn connect_local(path: &str) -> Result<Self, StoreError> {
        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Storage(format!("local db: {}", e)))?;
        Ok(Self { inner: db })
    }

    fn conn(&self) -> Result<Connection, StoreError> {
        self.inner.connect().map_err(StoreError::from)
    }

    pub async fn init_schema(&self) -> Result<(), StoreError> {
        let c = self.conn()?;
        c.execute(
            "CREATE TABLE IF NOT EXISTS snippets (
                id         TEXT PRIMARY KEY,
                html       TEXT NOT NULL,
                css        TEXT NOT NULL,
                js         TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            (),
        )
        .await?;
        Ok(())
    }

    // ── Snippets ────────────────────────────────────────────────────

    /// Insert unless the id exists. Returns whether a row was written.
    pub async fn insert_snippet(&self, id: &SnippetId, snippet: &Snippet) -> Result<bool, StoreError> {
        let c = self.conn()?;
        let written = c
            .execute(
                "INSERT OR IGNORE INTO snippets (id, html, css, js) VALUES (?1, ?2, ?3, ?4)",
                params![
                    id.as_str(),
                    snippet.html.as_str(),
                    snippet.css.as_str(),
                    snippet.js.as_str()
                ],
            )
            .await?;
        Ok(written == 1)
    }

    pub async fn get_snippet(&self, id: &SnippetId) -> Result<Option<Snippet>, StoreError> {
        let c = self.conn()?;
        let mut rows = c
            .query(
                "SELECT html, css, js FROM snippets WHERE id = ?1",
                params![id.as_str()],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(Snippet {
                html: row.get::<String>(0)?,
                css: row.get::<String>(1)?,
                js: row.get::<String>(2)?,
            })),
            None => Ok(None),
        }
    }

    pub async fn count_snippets(&self) -> Result<i64, StoreError> {
        let c = self.conn()?;
        let mut rows = c.query("SELECT COUNT(*) FROM snippets", ()).await?;
        match rows.next().await? {
            Some(row) => Ok(row.get::<i64>(0)?),
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let db = Db::connect_local(&dir.path().join("t.db").to_string_lossy())
            .await
            .unwrap();
        db.init_schema().await.unwrap();
        db.init_schema().await.unwrap();
        assert_eq!(db.count_snippets().await.unwrap(), 0);

        let id = SnippetId::parse("abc").unwrap();
        assert!(db.insert_snippet(&id, &Snippet::default()).await.unwrap());
        assert_eq!(db.count_snippets().await.unwrap(), 1);
    }
}
