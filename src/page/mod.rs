//! Pages - Lifecycle units of visible content
//!
//! - [`Page`] - Root container plus render/remove subscribers
//! - [`PageEvent`] - The two lifecycle signal kinds
//! - [`PageError`] - Host failures and listener faults

use thiserror::Error;

use crate::host::HostError;
use crate::types::ListenerFault;

mod events;
mod lifecycle;

pub use events::PageEvent;
pub use lifecycle::Page;

/// Errors from rendering or removing a page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    /// The host rejected the attach.
    #[error(transparent)]
    Host(#[from] HostError),

    /// One or more listeners panicked. Delivery to the rest still happened.
    #[error("{} {event} listener(s) panicked", .faults.len())]
    Listeners {
        event: PageEvent,
        faults: Vec<ListenerFault>,
    },
}

impl PageError {
    pub(crate) fn check(event: PageEvent, faults: Vec<ListenerFault>) -> Result<(), PageError> {
        if faults.is_empty() {
            Ok(())
        } else {
            Err(PageError::Listeners { event, faults })
        }
    }

    /// Listener faults carried by this error, if any.
    pub fn faults(&self) -> &[ListenerFault] {
        match self {
            PageError::Listeners { faults, .. } => faults,
            PageError::Host(_) => &[],
        }
    }
}
