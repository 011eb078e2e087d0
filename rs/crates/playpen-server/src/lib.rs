//! playpen-server — snippet store service
//!
//! `POST /save` persists an HTML/CSS/JS triple under a fresh id, and
//! `GET /load/:id` returns it. Storage is either one JSON file per snippet or a
//! local libsql database.

pub mod config;
pub mod db;
pub mod error;
pub mod fs_store;
pub mod ids;
pub mod logging;
pub mod server;
pub mod store;

use std::future::Future;
use std::sync::Arc;

use config::Config;
use db::Db;
use fs_store::FsStore;
use store::{BackendKind, SnippetStore, StoreError};

/// Open the backend selected by `config`.
pub async fn open_store(config: &Config) -> Result<SnippetStore, StoreError> {
    match config.backend {
        BackendKind::Fs => {
            let fs = FsStore::open(&config.snippets_dir).await?;
            tracing::info!(dir = %config.snippets_dir.display(), "using file store");
            Ok(SnippetStore::fs(fs))
        }
        BackendKind::Sqlite => {
            let db = Db::connect_local(&config.db_path).await?;
            db.init_schema().await?;
            tracing::info!(path = %config.db_path, "using local libsql store");
            Ok(SnippetStore::sqlite(db))
        }
    }
}

/// Build the router over an opened store.
pub fn app(store: SnippetStore) -> axum::Router {
    server::router(Arc::new(server::AppState { store }))
}

/// Serve the store on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: tokio::net::TcpListener,
    store: SnippetStore,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    axum::serve(listener, app(store))
        .with_graceful_shutdown(shutdown)
        .await
}
