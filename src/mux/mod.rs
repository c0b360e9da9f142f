//! Multiplexer - Client-side path routing
//!
//! [`Multiplexer`] is the routing capability the application drives;
//! [`PathMux`] is the exact-match, frame-polled implementation.
//!
//! The multiplexer does not render anything itself. Handlers are expected to
//! call back into the app controller (usually `swap_page_to`).

mod path_mux;

pub use path_mux::PathMux;

use crate::types::Callback;

/// Route handler. Same identity rules as [`Callback`].
pub type Handler = Callback;

/// Routing capability: register paths, then serve until stopped.
pub trait Multiplexer {
    /// Register `handler` for the exact `path`. Any string is accepted.
    ///
    /// Re-registering a path replaces its handler (last write wins); the
    /// replaced handler is returned.
    fn define_path(&self, path: &str, handler: Handler) -> Option<Handler>;

    /// Set or clear the handler for paths with no registration.
    /// Returns the previous one.
    fn set_not_found(&self, handler: Option<Handler>) -> Option<Handler>;

    /// Current not-found handler.
    fn not_found(&self) -> Option<Handler>;

    /// Serve the current path and keep watching for changes.
    /// No-op if already serving.
    fn serve_and_listen(&self);

    /// Stop watching. No-op if not serving.
    fn stop_serving(&self);
}
