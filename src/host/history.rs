//! History - Location state and session history stack
//!
//! Holds the host's current path and the stack of visited entries.
//!
//! - `push_state` / `replace_state` change the location silently
//! - `back` / `forward` / `go` step through entries and notify popstate
//!   listeners, the only operations that do
//!
//! The current path is kept in a reactive signal, so effects can track it.
//!
//! # Example
//!
//! ```ignore
//! use spark_spa::host::history;
//!
//! let cleanup = history::on_popstate(|| println!("popped"));
//!
//! history::push_state("/a");   // silent
//! history::back();             // prints "popped"
//! assert_eq!(history::current_path(), "/");
//!
//! cleanup();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::{signal, Signal};

/// Path the host starts at.
pub const INITIAL_PATH: &str = "/";

// =============================================================================
// STATE
// =============================================================================

struct SessionHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl SessionHistory {
    fn new() -> Self {
        Self {
            entries: vec![INITIAL_PATH.to_string()],
            cursor: 0,
        }
    }
}

/// Popstate listener. Shared so dispatch can run without holding the registry.
pub type PopstateHandler = Rc<dyn Fn()>;

struct PopstateRegistry {
    handlers: Vec<(usize, PopstateHandler)>,
    next_id: usize,
}

impl PopstateRegistry {
    fn new() -> Self {
        Self {
            handlers: Vec::new(),
            next_id: 0,
        }
    }
}

thread_local! {
    static LOCATION: Signal<String> = signal(INITIAL_PATH.to_string());
    static HISTORY: RefCell<SessionHistory> = RefCell::new(SessionHistory::new());
    static POPSTATE: RefCell<PopstateRegistry> = RefCell::new(PopstateRegistry::new());
}

// =============================================================================
// LOCATION
// =============================================================================

/// The host's current path.
pub fn current_path() -> String {
    LOCATION.with(|s| s.get())
}

/// The reactive signal backing [`current_path`].
pub fn location_signal() -> Signal<String> {
    LOCATION.with(|s| s.clone())
}

fn set_location(path: &str) {
    LOCATION.with(|s| {
        if s.get() != path {
            s.set(path.to_string());
        }
    });
}

// =============================================================================
// HISTORY MUTATION
// =============================================================================

/// Push a new entry. Forward entries are discarded. No notification.
pub fn push_state(path: &str) {
    HISTORY.with(|h| {
        let mut h = h.borrow_mut();
        let keep = h.cursor + 1;
        h.entries.truncate(keep);
        h.entries.push(path.to_string());
        h.cursor = h.entries.len() - 1;
    });
    set_location(path);
}

/// Replace the current entry. No notification.
pub fn replace_state(path: &str) {
    HISTORY.with(|h| {
        let mut h = h.borrow_mut();
        let cursor = h.cursor;
        h.entries[cursor] = path.to_string();
    });
    set_location(path);
}

/// Step `delta` entries through history.
///
/// Out-of-range steps and `go(0)` are no-ops. A successful step notifies
/// popstate listeners after the location is updated.
pub fn go(delta: isize) {
    let target = HISTORY.with(|h| {
        let mut h = h.borrow_mut();
        let index = h.cursor.checked_add_signed(delta)?;
        if delta == 0 || index >= h.entries.len() {
            return None;
        }
        h.cursor = index;
        Some(h.entries[index].clone())
    });

    if let Some(path) = target {
        set_location(&path);
        dispatch_popstate();
    }
}

/// Step one entry back.
pub fn back() {
    go(-1);
}

/// Step one entry forward.
pub fn forward() {
    go(1);
}

/// Number of entries in the session history.
pub fn history_len() -> usize {
    HISTORY.with(|h| h.borrow().entries.len())
}

// =============================================================================
// POPSTATE
// =============================================================================

/// Subscribe to back/forward notifications. Returns cleanup function.
pub fn on_popstate<F>(handler: F) -> impl FnOnce()
where
    F: Fn() + 'static,
{
    let id = POPSTATE.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id;
        reg.next_id += 1;
        reg.handlers.push((id, Rc::new(handler)));
        id
    });

    move || {
        POPSTATE.with(|reg| {
            reg.borrow_mut().handlers.retain(|(handler_id, _)| *handler_id != id);
        });
    }
}

/// Number of popstate listeners.
pub fn popstate_listener_count() -> usize {
    POPSTATE.with(|reg| reg.borrow().handlers.len())
}

fn dispatch_popstate() {
    // Snapshot: listeners may unsubscribe or navigate while running
    let handlers: Vec<PopstateHandler> = POPSTATE.with(|reg| {
        reg.borrow().handlers.iter().map(|(_, h)| h.clone()).collect()
    });
    for handler in handlers {
        handler();
    }
}

/// Restore the initial location and drop all listeners (for testing).
pub(crate) fn reset_history() {
    HISTORY.with(|h| *h.borrow_mut() = SessionHistory::new());
    POPSTATE.with(|reg| *reg.borrow_mut() = PopstateRegistry::new());
    set_location(INITIAL_PATH);
}

// =============================================================================
// TESTS
// =============================================================================
