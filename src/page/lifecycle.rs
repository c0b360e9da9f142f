//! Page - A navigable screen with a render/remove lifecycle.
//!
//! A page owns one root container for its whole life. Content goes under
//! [`Page::root`]; the app controller attaches and detaches the root.
//!
//! # Lifecycle
//!
//! - `render(mount)` - dispatch `Render`, then attach the root under `mount`
//! - `remove()` - dispatch `Remove`, then detach the root
//!
//! The page keeps no visible/hidden state. Rendering twice dispatches twice;
//! the controller is responsible for not doing that.
//!
//! # Example
//!
//! ```ignore
//! use spark_spa::{callback, Page, PageEvent};
//!
//! let page = Page::new();
//! let on_show = callback(|| println!("shown"));
//! page.add_event_listener(PageEvent::Render, &[on_show.clone()]);
//!
//! page.render(spark_spa::host::body())?;  // prints "shown"
//! page.remove()?;
//!
//! page.remove_event_listener(PageEvent::Render, &[on_show]);
//! ```

use std::cell::RefCell;

use crate::host::node::{self, NodeId};
use crate::types::{Callback, ListenerFault};

use super::events::{dispatch, PageEvent, Subscriptions};
use super::PageError;

/// One navigable screen.
pub struct Page {
    root: NodeId,
    subscriptions: RefCell<Subscriptions>,
}

impl Page {
    /// Create a page with a fresh, detached `div` root.
    pub fn new() -> Self {
        Self {
            root: node::create_node("div"),
            subscriptions: RefCell::new(Subscriptions::default()),
        }
    }

    /// The root container. Append page content here.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// True if the root currently has a parent.
    pub fn is_attached(&self) -> bool {
        node::parent(self.root).is_some()
    }

    /// Dispatch `Render`, then attach the root under `mount`.
    ///
    /// Listener panics do not stop delivery or attachment; they are
    /// reported afterwards as [`PageError::Listeners`]. A host failure takes
    /// precedence and is returned as [`PageError::Host`], with the listener
    /// faults logged.
    pub fn render(&self, mount: NodeId) -> Result<(), PageError> {
        let faults = self.emit(PageEvent::Render);
        if let Err(err) = node::append_child(mount, self.root) {
            if !faults.is_empty() {
                tracing::warn!(
                    error = %err,
                    faults = faults.len(),
                    "page attach failed after listener faults"
                );
            }
            return Err(err.into());
        }
        PageError::check(PageEvent::Render, faults)
    }

    /// Dispatch `Remove`, then detach the root (no-op if detached).
    pub fn remove(&self) -> Result<(), PageError> {
        let faults = self.emit(PageEvent::Remove);
        node::detach(self.root);
        PageError::check(PageEvent::Remove, faults)
    }

    /// Subscribe callbacks to `event`. Already-subscribed callbacks are skipped.
    pub fn add_event_listener(&self, event: PageEvent, callbacks: &[Callback]) {
        self.subscriptions.borrow_mut().add(event, callbacks);
    }

    /// Unsubscribe callbacks from `event`. Unknown callbacks are ignored.
    pub fn remove_event_listener(&self, event: PageEvent, callbacks: &[Callback]) {
        self.subscriptions.borrow_mut().remove(event, callbacks);
    }

    /// Number of callbacks subscribed to `event`.
    pub fn listener_count(&self, event: PageEvent) -> usize {
        self.subscriptions.borrow().len(event)
    }

    /// Check whether `callback` is subscribed to `event`.
    pub fn has_listener(&self, event: PageEvent, callback: &Callback) -> bool {
        self.subscriptions.borrow().contains(event, callback)
    }

    fn emit(&self, event: PageEvent) -> Vec<ListenerFault> {
        // Release the borrow before running callbacks; they may (un)subscribe
        let subscribers = self.subscriptions.borrow().snapshot(event);
        tracing::trace!(event = %event, root = %self.root, listeners = subscribers.len(), "page event");
        dispatch(event, subscribers)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("root", &self.root)
            .field("render_listeners", &self.listener_count(PageEvent::Render))
            .field("remove_listeners", &self.listener_count(PageEvent::Remove))
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
