//! Core types shared by pages, the multiplexer, and the app controller.

use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

// =============================================================================
// CALLBACKS
// =============================================================================

/// Zero-argument callback.
///
/// Identity is the `Rc` allocation: cloning a `Callback` yields the same
/// callback, wrapping the same closure twice yields two different ones.
pub type Callback = Rc<dyn Fn()>;

/// Wrap a closure into a [`Callback`].
pub fn callback<F>(f: F) -> Callback
where
    F: Fn() + 'static,
{
    Rc::new(f)
}

/// True if both handles point at the same callback.
pub fn same_callback(a: &Callback, b: &Callback) -> bool {
    // Compare data pointers only; vtable pointers may differ across codegen units
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

// =============================================================================
// FAULT BOUNDARY
// =============================================================================

/// A callback that panicked inside a fault boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListenerFault {
    /// What was being delivered ("render", "remove", or a route path).
    pub context: String,
    /// Position of the callback in its dispatch order.
    pub position: usize,
    /// Panic payload, if it was a string.
    pub message: String,
}

impl fmt::Display for ListenerFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} callback #{} panicked: {}",
            self.context, self.position, self.message
        )
    }
}

/// Run `f`, turning a panic into an error carrying the panic message.
pub(crate) fn isolate<F>(f: F) -> Result<(), String>
where
    F: FnOnce(),
{
    catch_unwind(AssertUnwindSafe(f)).map_err(panic_message)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// =============================================================================
// TESTS
// =============================================================================
