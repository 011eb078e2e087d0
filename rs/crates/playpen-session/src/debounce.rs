//! Debounced preview recomposition.
//!
//! Every change arms a single recomposition task that fires after the quiet
//! window. Arming again aborts the pending task first, so at most one is ever
//! pending and the last state is never skipped.

use std::sync::Arc;
use std::time::Duration;

use playpen_render_html::compose_document;
use playpen_snippet::Snippet;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Quiet period after the last edit before the preview is recomposed.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(250);

/// The latest composed preview document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preview {
    pub document: String,
    /// Number of recompositions so far; 0 means nothing composed yet
    pub generation: u64,
}

pub struct Debouncer {
    window: Duration,
    pending: Option<JoinHandle<()>>,
    tx: Arc<watch::Sender<Preview>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        let (tx, _) = watch::channel(Preview::default());
        Self {
            window,
            pending: None,
            tx: Arc::new(tx),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Arm a recomposition of `snippet`, discarding any pending one.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule(&mut self, snippet: Snippet) {
        self.cancel();
        let tx = Arc::clone(&self.tx);
        let window = self.window;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            publish(&tx, &snippet);
        }));
    }

    /// Recompose `snippet` now, discarding any pending pass.
    pub fn flush(&mut self, snippet: &Snippet) {
        self.cancel();
        publish(&self.tx, snippet);
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn current(&self) -> Preview {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Preview> {
        self.tx.subscribe()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn publish(tx: &watch::Sender<Preview>, snippet: &Snippet) {
    let document = compose_document(snippet);
    tx.send_modify(|preview| {
        preview.document = document;
        preview.generation += 1;
    });
    tracing::trace!(generation = tx.borrow().generation, "preview recomposed");
}
