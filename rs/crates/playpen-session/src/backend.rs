//! Client side of the snippet store HTTP contract.

use async_trait::async_trait;
use playpen_snippet::{ErrorBody, SaveResponse, Snippet, SnippetId};
use reqwest::{StatusCode, Url};

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("snippet not found")]
    NotFound,
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("invalid server url '{0}'")]
    InvalidUrl(String),
}

/// Where a session saves to and loads from.
#[async_trait]
pub trait SnippetBackend: Send + Sync {
    /// Persist the triple and return the id the store assigned.
    async fn create(&self, snippet: &Snippet) -> Result<SnippetId, BackendError>;

    /// Fetch the triple saved under `id`.
    async fn get(&self, id: &SnippetId) -> Result<Snippet, BackendError>;
}

/// Talks to a running `playpen-server`.
pub struct HttpBackend {
    http: reqwest::Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(server: &str) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .user_agent(format!("playpen-session/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(http, server)
    }

    pub fn with_client(http: reqwest::Client, server: &str) -> Result<Self, BackendError> {
        let mut base = Url::parse(server).map_err(|_| BackendError::InvalidUrl(server.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl(server.to_string()));
        }
        // Endpoints are joined relative to the base path
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { http, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base
            .join(path)
            .map_err(|_| BackendError::InvalidUrl(format!("{}{}", self.base, path)))
    }
}

#[async_trait]
impl SnippetBackend for HttpBackend {
    async fn create(&self, snippet: &Snippet) -> Result<SnippetId, BackendError> {
        let resp = self.http.post(self.endpoint("save")?).json(snippet).send().await?;
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        let body: SaveResponse = resp
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(body.id)
    }

    async fn get(&self, id: &SnippetId) -> Result<Snippet, BackendError> {
        let url = self.endpoint(&format!("load/{}", id))?;
        let resp = self.http.get(url).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound);
        }
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        resp.json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }
}

async fn status_error(resp: reqwest::Response) -> BackendError {
    let status = resp.status().as_u16();
    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.error)
        .unwrap_or(text);
    BackendError::Status { status, message }
}
