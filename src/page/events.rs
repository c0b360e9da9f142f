//! Page Events - Lifecycle signal kinds and subscriber sets
//!
//! Each page keeps one ordered set of callbacks per [`PageEvent`].
//! Registering the same callback twice keeps the first position; dispatch
//! walks a snapshot, so callbacks may subscribe or unsubscribe while it runs
//! without affecting the current delivery.

use std::fmt;

use crate::types::{isolate, same_callback, Callback, ListenerFault};

// =============================================================================
// TYPES
// =============================================================================

/// Lifecycle signal kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PageEvent {
    /// The page is about to be attached.
    Render,
    /// The page is about to be detached.
    Remove,
}

impl PageEvent {
    /// Every event kind, in declaration order.
    pub const ALL: [PageEvent; 2] = [PageEvent::Render, PageEvent::Remove];

    /// Event name as used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            PageEvent::Render => "render",
            PageEvent::Remove => "remove",
        }
    }
}

impl fmt::Display for PageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// SUBSCRIBER SETS
// =============================================================================

/// Ordered, deduplicated callbacks for both event kinds.
#[derive(Default)]
pub(crate) struct Subscriptions {
    render: Vec<Callback>,
    remove: Vec<Callback>,
}

impl Subscriptions {
    fn set(&self, event: PageEvent) -> &Vec<Callback> {
        match event {
            PageEvent::Render => &self.render,
            PageEvent::Remove => &self.remove,
        }
    }

    fn set_mut(&mut self, event: PageEvent) -> &mut Vec<Callback> {
        match event {
            PageEvent::Render => &mut self.render,
            PageEvent::Remove => &mut self.remove,
        }
    }

    /// Add callbacks not already present. Returns how many were added.
    pub(crate) fn add(&mut self, event: PageEvent, callbacks: &[Callback]) -> usize {
        let set = self.set_mut(event);
        let mut added = 0;
        for cb in callbacks {
            if !set.iter().any(|existing| same_callback(existing, cb)) {
                set.push(cb.clone());
                added += 1;
            }
        }
        added
    }

    /// Remove matching callbacks. Returns how many were removed.
    pub(crate) fn remove(&mut self, event: PageEvent, callbacks: &[Callback]) -> usize {
        let set = self.set_mut(event);
        let before = set.len();
        set.retain(|existing| !callbacks.iter().any(|cb| same_callback(existing, cb)));
        before - set.len()
    }

    pub(crate) fn len(&self, event: PageEvent) -> usize {
        self.set(event).len()
    }

    pub(crate) fn contains(&self, event: PageEvent, callback: &Callback) -> bool {
        self.set(event).iter().any(|cb| same_callback(cb, callback))
    }

    /// Clone the current set for dispatch.
    pub(crate) fn snapshot(&self, event: PageEvent) -> Vec<Callback> {
        self.set(event).clone()
    }
}

/// Deliver `event` to every callback in `subscribers`, each in its own
/// fault boundary. Returns the faults, in dispatch order.
pub(crate) fn dispatch(event: PageEvent, subscribers: Vec<Callback>) -> Vec<ListenerFault> {
    let mut faults = Vec::new();
    for (position, cb) in subscribers.into_iter().enumerate() {
        if let Err(message) = isolate(|| cb()) {
            tracing::error!(event = %event, position, %message, "page listener panicked");
            faults.push(ListenerFault {
                context: event.as_str().to_string(),
                position,
                message,
            });
        }
    }
    faults
}

// =============================================================================
// TESTS
// =============================================================================
