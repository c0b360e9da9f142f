//! PathMux - Exact-match client-side path multiplexer
//!
//! Polls the host location once per frame and dispatches at most one handler
//! per distinct path.
//!
//! # Serving State
//!
//! ```text
//! Stopped ──serve_and_listen──▶ Serving { frame, popstate }
//!    ▲                              │
//!    └──────────stop_serving────────┘
//! ```
//!
//! - Serving owns exactly one scheduled observation cycle at a time
//! - `serve_and_listen` while serving and `stop_serving` while stopped are no-ops
//! - The last observed path survives a stop, so resuming only dispatches
//!   if the location changed in between
//!
//! # Observation Cycle
//!
//! 1. Read the host path
//! 2. If it differs from the last observed path: record it, then invoke the
//!    registered handler, else the not-found handler, else nothing
//! 3. Schedule the next cycle if still serving
//!
//! Back/forward steps also trigger an immediate cycle through the host's
//! popstate notification. Push/replace never notify, so the per-frame poll
//! stays the source of truth.
//!
//! Handlers and `observed_path` subscribers run inside a panic boundary; a
//! panic is logged and the loop keeps going. The next cycle is scheduled even
//! if an observation unwinds.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use spark_signals::{signal, Signal};

use crate::host::{frame, history, FrameHandle};
use crate::types::isolate;

use super::{Handler, Multiplexer};

// =============================================================================
// SERVE STATE
// =============================================================================

enum ServeState {
    Stopped,
    Serving {
        /// Pending observation cycle. `None` only while a cycle is running.
        frame: Option<FrameHandle>,
        /// Unsubscribes the popstate fast path.
        popstate: Option<Box<dyn FnOnce()>>,
    },
}

impl ServeState {
    fn is_serving(&self) -> bool {
        matches!(self, ServeState::Serving { .. })
    }

    /// Cancel the pending cycle and drop the popstate subscription.
    fn release(self) -> bool {
        match self {
            ServeState::Stopped => false,
            ServeState::Serving { frame: pending, popstate } => {
                if let Some(handle) = pending {
                    frame::cancel_frame(handle);
                }
                if let Some(unsubscribe) = popstate {
                    unsubscribe();
                }
                true
            }
        }
    }
}

// =============================================================================
// MUX STATE
// =============================================================================

struct MuxInner {
    registry: RefCell<HashMap<String, Handler>>,
    not_found: RefCell<Option<Handler>>,
    last_observed: RefCell<Option<String>>,
    state: RefCell<ServeState>,
    /// Set while a handler runs; nested observations are skipped.
    in_cycle: Cell<bool>,
    observed: Signal<Option<String>>,
    dispatches: Cell<u64>,
}

impl MuxInner {
    fn new() -> Self {
        Self {
            registry: RefCell::new(HashMap::new()),
            not_found: RefCell::new(None),
            last_observed: RefCell::new(None),
            state: RefCell::new(ServeState::Stopped),
            in_cycle: Cell::new(false),
            observed: signal(None),
            dispatches: Cell::new(0),
        }
    }

    fn is_serving(&self) -> bool {
        self.state.borrow().is_serving()
    }

    /// One observation cycle followed by scheduling the next.
    fn watch(self: &Rc<Self>) {
        let _next = Reschedule(self);
        self.observe();
    }

    fn schedule(self: &Rc<Self>) {
        let mut state = self.state.borrow_mut();
        if let ServeState::Serving { frame: pending, .. } = &mut *state {
            if pending.is_none() {
                let weak = Rc::downgrade(self);
                *pending = Some(frame::request_frame(move || on_frame(weak)));
            }
        }
    }

    /// Compare the host path with the last observed one and dispatch on change.
    /// Returns true if a dispatch happened.
    fn observe(&self) -> bool {
        if self.in_cycle.get() {
            tracing::trace!("observation skipped: cycle already running");
            return false;
        }

        let path = history::current_path();
        {
            let mut last = self.last_observed.borrow_mut();
            if last.as_deref() == Some(path.as_str()) {
                return false;
            }
            *last = Some(path.clone());
        }

        let _cycle = CycleGuard::enter(&self.in_cycle);
        self.dispatch(&path);
        true
    }

    fn dispatch(&self, path: &str) {
        // Clone the handler out: it may redefine paths or stop serving
        let registered = self.registry.borrow().get(path).cloned();
        let (handler, route) = match registered {
            Some(handler) => (Some(handler), "registered"),
            None => (self.not_found.borrow().clone(), "not_found"),
        };

        self.dispatches.set(self.dispatches.get() + 1);
        // Effects on the observed path run synchronously here
        if let Err(message) = isolate(|| {
            self.observed.set(Some(path.to_string()));
        }) {
            tracing::error!(path, %message, "observed path subscriber panicked");
        }

        let Some(handler) = handler else {
            tracing::debug!(path, "no handler for path");
            return;
        };

        tracing::debug!(path, route, "dispatching path");
        if let Err(message) = isolate(|| handler()) {
            tracing::error!(path, route, %message, "path handler panicked");
        }
    }
}

/// Marks a running cycle; cleared on return or unwind.
struct CycleGuard<'a>(&'a Cell<bool>);

impl<'a> CycleGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Schedules the next cycle when dropped.
struct Reschedule<'a>(&'a Rc<MuxInner>);

impl Drop for Reschedule<'_> {
    fn drop(&mut self) {
        self.0.schedule();
    }
}

impl Drop for MuxInner {
    fn drop(&mut self) {
        let state = std::mem::replace(self.state.get_mut(), ServeState::Stopped);
        state.release();
    }
}

/// Frame callback: the handle that scheduled us is spent.
fn on_frame(weak: Weak<MuxInner>) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    {
        let mut state = inner.state.borrow_mut();
        match &mut *state {
            ServeState::Serving { frame: pending, .. } => *pending = None,
            ServeState::Stopped => return,
        }
    }
    tracing::trace!("observation cycle");
    inner.watch();
}

// =============================================================================
// PUBLIC TYPE
// =============================================================================

/// Client-side multiplexer matching exact paths.
///
/// Cloning yields another handle to the same multiplexer. The polling loop
/// only holds a weak reference: dropping every handle stops serving.
///
/// # Example
///
/// ```ignore
/// use spark_spa::{callback, Multiplexer, PathMux};
///
/// let mux = PathMux::new();
/// mux.define_path("/", callback(|| println!("home")));
/// mux.set_not_found(Some(callback(|| println!("404"))));
///
/// mux.serve_and_listen();   // prints "home" (host starts at "/")
/// spark_spa::navigate_page("/nowhere");
/// spark_spa::host::run_frame();  // prints "404"
/// ```
#[derive(Clone)]
pub struct PathMux {
    inner: Rc<MuxInner>,
}

impl PathMux {
    /// Create an empty, stopped multiplexer.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(MuxInner::new()),
        }
    }

    /// Check whether the polling loop is active.
    pub fn is_serving(&self) -> bool {
        self.inner.is_serving()
    }

    /// Check whether `path` has a registered handler.
    pub fn has_path(&self, path: &str) -> bool {
        self.inner.registry.borrow().contains_key(path)
    }

    /// Number of registered paths.
    pub fn path_count(&self) -> usize {
        self.inner.registry.borrow().len()
    }

    /// Path seen by the most recent dispatch, `None` before the first one.
    pub fn last_observed(&self) -> Option<String> {
        self.inner.last_observed.borrow().clone()
    }

    /// Reactive view of [`last_observed`](Self::last_observed), updated on
    /// every dispatch.
    pub fn observed_path(&self) -> Signal<Option<String>> {
        self.inner.observed.clone()
    }

    /// Number of path changes dispatched so far, including unmatched ones.
    pub fn dispatch_count(&self) -> u64 {
        self.inner.dispatches.get()
    }

    /// Run one observation cycle now, without waiting for a frame.
    ///
    /// Does nothing while stopped. Returns true if the path had changed.
    pub fn observe_now(&self) -> bool {
        self.is_serving() && self.inner.observe()
    }
}

impl Default for PathMux {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PathMux {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathMux")
            .field("paths", &self.path_count())
            .field("serving", &self.is_serving())
            .field("last_observed", &self.last_observed())
            .finish()
    }
}

impl Multiplexer for PathMux {
    fn define_path(&self, path: &str, handler: Handler) -> Option<Handler> {
        let previous = self
            .inner
            .registry
            .borrow_mut()
            .insert(path.to_string(), handler);
        if previous.is_some() {
            tracing::warn!(path, "path handler replaced");
        } else {
            tracing::debug!(path, "path defined");
        }
        previous
    }

    fn set_not_found(&self, handler: Option<Handler>) -> Option<Handler> {
        std::mem::replace(&mut *self.inner.not_found.borrow_mut(), handler)
    }

    fn not_found(&self) -> Option<Handler> {
        self.inner.not_found.borrow().clone()
    }

    fn serve_and_listen(&self) {
        if self.is_serving() {
            tracing::debug!("serve_and_listen ignored: already serving");
            return;
        }

        let weak = Rc::downgrade(&self.inner);
        let unsubscribe = history::on_popstate(move || {
            if let Some(inner) = weak.upgrade() {
                if inner.is_serving() {
                    inner.observe();
                }
            }
        });

        *self.inner.state.borrow_mut() = ServeState::Serving {
            frame: None,
            popstate: Some(Box::new(unsubscribe)),
        };
        tracing::debug!(paths = self.path_count(), "serving");

        self.inner.watch();
    }

    fn stop_serving(&self) {
        let state = std::mem::replace(&mut *self.inner.state.borrow_mut(), ServeState::Stopped);
        if state.release() {
            tracing::debug!("stopped serving");
        } else {
            tracing::debug!("stop_serving ignored: not serving");
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
