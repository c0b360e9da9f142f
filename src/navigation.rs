//! Navigation - Shorthands over the host history.
//!
//! `navigate_page` and `redirect_page` do not notify anyone; a serving
//! [`PathMux`](crate::PathMux) notices the new path on its next frame.
//! `prev_page` and `next_page` also fire popstate, which a serving mux
//! handles immediately.

use crate::host::history;

/// Push `path` as a new history entry.
pub fn navigate_page(path: &str) {
    tracing::trace!(path, "navigate");
    history::push_state(path);
}

/// Replace the current history entry with `path`.
pub fn redirect_page(path: &str) {
    tracing::trace!(path, "redirect");
    history::replace_state(path);
}

/// Go one entry back.
pub fn prev_page() {
    history::back();
}

/// Go one entry forward.
pub fn next_page() {
    history::forward();
}
