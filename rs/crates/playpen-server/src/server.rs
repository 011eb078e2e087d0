use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use playpen_snippet::{SaveResponse, Snippet};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::store::SnippetStore;

// ── Shared state ────────────────────────────────────────────────────

pub struct AppState {
    pub store: SnippetStore,
}

// ── Router ──────────────────────────────────────────────────────────

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Public
        .route("/health", get(health))
        .route("/", get(homepage))
        // Snippets
        .route("/save", post(save))
        .route("/load/:id", get(load))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Handlers: Public ────────────────────────────────────────────────

async fn health() -> &'static str {
    "ok"
}

async fn homepage(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snippets = match state.store.count().await {
        Ok(n) => n,
        Err(e) => {
            tracing::warn!(error = %e, "snippet count unavailable");
            0
        }
    };
    let body = serde_json::json!({
        "service": "playpen-server",
        "version": env!("CARGO_PKG_VERSION"),
        "backend": state.store.kind().as_str(),
        "snippets": snippets,
    });
    Json(body)
}

// ── Handlers: Snippets ──────────────────────────────────────────────

async fn save(
    State(state): State<Arc<AppState>>,
    Json(snippet): Json<Snippet>,
) -> Result<Json<SaveResponse>, AppError> {
    let id = state.store.create(&snippet).await.map_err(AppError::on_save)?;
    Ok(Json(SaveResponse { id }))
}

async fn load(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Snippet>, AppError> {
    let snippet = state.store.get(&id).await.map_err(|e| {
        tracing::debug!(id = %id, error = %e, "load failed");
        AppError::on_load(e)
    })?;
    Ok(Json(snippet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::{fs_store, sqlite_store};
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use playpen_snippet::ErrorBody;
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn post_json(uri: &str, json: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn apps(dir: &TempDir) -> Vec<Router> {
        vec![
            router(Arc::new(AppState { store: fs_store(dir).await })),
            router(Arc::new(AppState { store: sqlite_store(dir).await })),
        ]
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        for app in apps(&dir).await {
            let (status, body) =
                send(&app, post_json("/save", r#"{"html":"<p>hi</p>","css":"","js":""}"#)).await;
            assert_eq!(status, StatusCode::OK);
            let saved: SaveResponse = serde_json::from_slice(&body).unwrap();

            let (status, body) = send(&app, get_req(&format!("/load/{}", saved.id))).await;
            assert_eq!(status, StatusCode::OK);
            let loaded: Snippet = serde_json::from_slice(&body).unwrap();
            assert_eq!(loaded, Snippet::new("<p>hi</p>", "", ""));
        }
    }

    #[tokio::test]
    async fn test_missing_fields_saved_as_empty() {
        let dir = TempDir::new().unwrap();
        for app in apps(&dir).await {
            let (status, body) = send(&app, post_json("/save", r#"{"css":"p{}"}"#)).await;
            assert_eq!(status, StatusCode::OK);
            let saved: SaveResponse = serde_json::from_slice(&body).unwrap();

            let (_, body) = send(&app, get_req(&format!("/load/{}", saved.id))).await;
            let loaded: Snippet = serde_json::from_slice(&body).unwrap();
            assert_eq!(loaded, Snippet::new("", "p{}", ""));
        }
    }

    #[tokio::test]
    async fn test_load_unknown_is_404() {
        let dir = TempDir::new().unwrap();
        for app in apps(&dir).await {
            for uri in ["/load/neversaved", "/load/null", "/load/..%2F..%2Fetc%2Fpasswd"] {
                let (status, body) = send(&app, get_req(uri)).await;
                assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
                let err: ErrorBody = serde_json::from_slice(&body).unwrap();
                assert_eq!(err.error, "Snippet not found");
            }
        }
    }

    #[tokio::test]
    async fn test_storage_failure_on_save_is_500() {
        let dir = TempDir::new().unwrap();
        let app = router(Arc::new(AppState { store: fs_store(&dir).await }));
        std::fs::remove_dir_all(dir.path().join("snippets")).unwrap();

        let (status, body) = send(&app, post_json("/save", r#"{"html":"<p>hi</p>"}"#)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let err: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(err.error, "Failed to save snippet");
    }

    #[tokio::test]
    async fn test_non_json_body_rejected() {
        let dir = TempDir::new().unwrap();
        let app = router(Arc::new(AppState { store: fs_store(&dir).await }));
        let (status, _) = send(&app, post_json("/save", "not json")).await;
        assert!(status.is_client_error());
        // Nothing was written
        let (_, body) = send(&app, get_req("/")).await;
        let info: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(info["snippets"], 0);
    }

    #[tokio::test]
    async fn test_health_and_homepage() {
        let dir = TempDir::new().unwrap();
        let app = router(Arc::new(AppState { store: sqlite_store(&dir).await }));
        let (status, body) = send(&app, get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");

        let (_, body) = send(&app, get_req("/")).await;
        let info: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(info["service"], "playpen-server");
        assert_eq!(info["backend"], "sqlite");
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let dir = TempDir::new().unwrap();
        let app = router(Arc::new(AppState { store: fs_store(&dir).await }));
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/save")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert!(resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }
}
