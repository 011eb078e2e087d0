//! playpen-session — the client side of the playground
//!
//! An [`EditingSession`] holds the working HTML/CSS/JS triple and the layout,
//! keeps a debounced preview document up to date as sources change, and saves
//! to / loads from a snippet store through a [`SnippetBackend`].

pub mod backend;
pub mod debounce;
pub mod session;
pub mod share;

pub use backend::{BackendError, HttpBackend, SnippetBackend};
pub use debounce::{Debouncer, Preview, DEBOUNCE_WINDOW};
pub use session::{EditingSession, LoadOutcome, SessionError, EXPORT_FILE_NAME};
pub use share::{reference_from_url, share_url, ShareLink};
