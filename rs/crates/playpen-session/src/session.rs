use std::time::Duration;

use playpen_snippet::{default_template, find_template, Layout, Snippet, SnippetId, SourceKind};
use reqwest::Url;
use tokio::sync::watch;

use crate::backend::{BackendError, SnippetBackend};
use crate::debounce::{Debouncer, Preview, DEBOUNCE_WINDOW};
use crate::share::{self, ShareLink};

/// Default file name for [`EditingSession::export_json`] output.
pub const EXPORT_FILE_NAME: &str = "code-snippet.json";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Error saving snippet")]
    Save(#[source] BackendError),
    #[error("unknown template '{0}'")]
    UnknownTemplate(String),
    #[error("failed to export snippet: {0}")]
    Export(#[from] serde_json::Error),
}

/// What happened to a requested load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The working triple now holds the saved snippet
    Loaded(SnippetId),
    /// No usable reference was given; nothing changed
    Skipped,
    /// The load failed; the session fell back to the default template
    Fallback,
}

/// One user's playground state: the working triple, layout, the current
/// share reference, and the debounced preview.
///
/// Construct and drive it from within a Tokio runtime; every edit arms a
/// recomposition task.
pub struct EditingSession<B> {
    backend: B,
    origin: Url,
    working: Snippet,
    layout: Layout,
    reference: Option<SnippetId>,
    preview: Debouncer,
}

impl<B: SnippetBackend> EditingSession<B> {
    /// Start from the default template. `origin` is the playground URL share
    /// links are built on.
    pub fn new(backend: B, origin: Url) -> Self {
        Self::with_window(backend, origin, DEBOUNCE_WINDOW)
    }

    pub fn with_window(backend: B, origin: Url, window: Duration) -> Self {
        let mut session = Self {
            backend,
            origin,
            working: default_template().to_snippet(),
            layout: Layout::default(),
            reference: None,
            preview: Debouncer::new(window),
        };
        session.recompose();
        session
    }

    pub fn working(&self) -> &Snippet {
        &self.working
    }

    pub fn source(&self, kind: SourceKind) -> &str {
        self.working.source(kind)
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn reference(&self) -> Option<&SnippetId> {
        self.reference.as_ref()
    }

    /// Share URL for the current reference, if any.
    pub fn share_url(&self) -> Option<String> {
        self.reference
            .as_ref()
            .map(|id| share::share_url(&self.origin, id))
    }

    // ── Edits ───────────────────────────────────────────────────────

    /// Editor change notification for one of the three sources.
    pub fn set_source(&mut self, kind: SourceKind, value: impl Into<String>) {
        self.working.set_source(kind, value.into());
        self.recompose();
    }

    /// Replace the whole working triple with a named preset.
    ///
    /// An unknown name leaves the session untouched.
    pub fn apply_template(&mut self, name: &str) -> Result<(), SessionError> {
        let Some(template) = find_template(name) else {
            tracing::warn!(template = name, "unknown template ignored");
            return Err(SessionError::UnknownTemplate(name.to_string()));
        };
        self.working = template.to_snippet();
        self.recompose();
        Ok(())
    }

    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
    }

    // ── Store ───────────────────────────────────────────────────────

    /// Save the working triple and make its id the current reference.
    ///
    /// On failure the working triple and reference are left as they were.
    pub async fn save(&mut self) -> Result<ShareLink, SessionError> {
        match self.backend.create(&self.working).await {
            Ok(id) => {
                let url = share::share_url(&self.origin, &id);
                tracing::info!(id = %id, url = %url, "snippet saved");
                self.reference = Some(id.clone());
                Ok(ShareLink { id, url })
            }
            Err(e) => {
                tracing::warn!(error = %e, "save failed");
                Err(SessionError::Save(e))
            }
        }
    }

    /// Restore a shared snippet by id.
    ///
    /// Any failure, including an unknown or malformed id, clears the
    /// reference and falls back to the default template.
    pub async fn load_from_reference(&mut self, raw: &str) -> LoadOutcome {
        if !share::is_present(raw) {
            return LoadOutcome::Skipped;
        }
        let result = match SnippetId::parse(raw.trim()) {
            Ok(id) => self.backend.get(&id).await.map(|s| (id, s)),
            Err(_) => Err(BackendError::NotFound),
        };
        match result {
            Ok((id, snippet)) => {
                tracing::info!(id = %id, "snippet loaded");
                self.working = snippet;
                self.reference = Some(id.clone());
                self.recompose();
                LoadOutcome::Loaded(id)
            }
            Err(e) => {
                tracing::warn!(reference = raw, error = %e, "snippet load failed, using default template");
                self.reference = None;
                self.working = default_template().to_snippet();
                self.recompose();
                LoadOutcome::Fallback
            }
        }
    }

    /// Restore the snippet referenced by a playground URL's `id` parameter.
    pub async fn load_from_url(&mut self, url: &str) -> LoadOutcome {
        match share::reference_from_url(url) {
            Some(raw) => self.load_from_reference(&raw).await,
            None => LoadOutcome::Skipped,
        }
    }

    // ── Preview ─────────────────────────────────────────────────────

    pub fn preview(&self) -> Preview {
        self.preview.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<Preview> {
        self.preview.subscribe()
    }

    /// Compose the preview now instead of waiting out the window.
    pub fn flush_preview(&mut self) -> Preview {
        self.preview.flush(&self.working);
        self.preview.current()
    }

    fn recompose(&mut self) {
        self.preview.schedule(self.working.clone());
    }

    // ── Export ──────────────────────────────────────────────────────

    /// Pretty-printed JSON of the working triple, for download.
    pub fn export_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string_pretty(&self.working)?)
    }
}
