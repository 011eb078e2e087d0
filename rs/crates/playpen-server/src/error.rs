use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use playpen_snippet::ErrorBody;

use crate::store::StoreError;

pub const SNIPPET_NOT_FOUND: &str = "Snippet not found";
pub const SAVE_FAILED: &str = "Failed to save snippet";
pub const LOAD_FAILED: &str = "Failed to load snippet";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(&'static str),
    /// `public` goes to the client, `detail` only to the log.
    #[error("{public}: {detail}")]
    Storage { public: &'static str, detail: String },
}

impl AppError {
    /// Map a store error raised while saving.
    pub fn on_save(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => Self::Storage {
                public: SAVE_FAILED,
                detail: "store reported not-found on insert".to_string(),
            },
            StoreError::Storage(detail) => Self::Storage {
                public: SAVE_FAILED,
                detail,
            },
        }
    }

    /// Map a store error raised while loading.
    pub fn on_load(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => Self::NotFound(SNIPPET_NOT_FOUND),
            StoreError::Storage(detail) => Self::Storage {
                public: LOAD_FAILED,
                detail,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, *msg),
            Self::Storage { public, detail } => {
                tracing::error!(error = %detail, "{}", public);
                (StatusCode::INTERNAL_SERVER_ERROR, *public)
            }
        };
        let body = ErrorBody {
            error: msg.to_string(),
        };
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_mapping() {
        assert!(matches!(
            AppError::on_load(StoreError::NotFound),
            AppError::NotFound(SNIPPET_NOT_FOUND)
        ));
        let resp = AppError::on_load(StoreError::Storage("disk".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_save_failure_is_500() {
        let resp = AppError::on_save(StoreError::Storage("disk full".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
