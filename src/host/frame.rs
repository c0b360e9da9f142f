//! Frame Scheduler - Per-frame callback queue
//!
//! The host's display-refresh hook. Callbacks are single-shot: a callback
//! that wants to run every frame requests the next frame itself.
//!
//! # Pattern
//!
//! - `request_frame(cb)` queues `cb` for the next frame and returns a handle
//! - `cancel_frame(handle)` drops a queued callback before it runs
//! - `run_frame()` presents one frame: runs the callbacks that were queued
//!   before the frame started, in request order
//!
//! Callbacks requested while a frame is running land in the following frame,
//! so a self-rescheduling callback runs exactly once per frame. Each callback
//! runs in its own panic boundary: a panic is logged and the rest of the
//! batch still runs.
//!
//! # Example
//!
//! ```ignore
//! use spark_spa::host::frame;
//!
//! let handle = frame::request_frame(|| println!("tick"));
//! frame::run_frame(); // prints "tick"
//!
//! let handle = frame::request_frame(|| unreachable!());
//! frame::cancel_frame(handle);
//! frame::run_frame(); // nothing
//! ```

use std::cell::RefCell;
use std::collections::HashSet;

use crate::types::isolate;

// =============================================================================
// TYPES
// =============================================================================

/// Handle returned by [`request_frame`], used to cancel it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

type FrameCallback = Box<dyn FnOnce()>;

struct FrameQueue {
    pending: Vec<(FrameHandle, FrameCallback)>,
    /// Handles cancelled while their batch was already taken by `run_frame`.
    cancelled_in_batch: HashSet<FrameHandle>,
    in_frame: bool,
    next_id: u64,
    frame_count: u64,
}

impl FrameQueue {
    fn new() -> Self {
        Self {
            pending: Vec::new(),
            cancelled_in_batch: HashSet::new(),
            in_frame: false,
            next_id: 1,
            frame_count: 0,
        }
    }
}

thread_local! {
    static QUEUE: RefCell<FrameQueue> = RefCell::new(FrameQueue::new());
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Queue `callback` to run on the next frame.
pub fn request_frame<F>(callback: F) -> FrameHandle
where
    F: FnOnce() + 'static,
{
    QUEUE.with(|queue| {
        let mut queue = queue.borrow_mut();
        let handle = FrameHandle(queue.next_id);
        queue.next_id += 1;
        queue.pending.push((handle, Box::new(callback)));
        handle
    })
}

/// Cancel a queued callback. Unknown or already-run handles are ignored.
pub fn cancel_frame(handle: FrameHandle) {
    QUEUE.with(|queue| {
        let mut queue = queue.borrow_mut();
        queue.pending.retain(|(h, _)| *h != handle);
        if queue.in_frame {
            queue.cancelled_in_batch.insert(handle);
        }
    });
}

/// Present one frame. Returns the number of callbacks that ran, panicking
/// ones included.
pub fn run_frame() -> usize {
    // Take the batch out first: callbacks request frames and cancel handles.
    let batch = QUEUE.with(|queue| {
        let mut queue = queue.borrow_mut();
        queue.frame_count += 1;
        queue.in_frame = true;
        std::mem::take(&mut queue.pending)
    });
    let _frame = FrameGuard;

    let mut ran = 0;
    for (handle, callback) in batch {
        // A callback earlier in this batch may have cancelled a later one
        if is_cancelled_in_batch(handle) {
            continue;
        }
        if let Err(message) = isolate(callback) {
            tracing::error!(handle = handle.0, %message, "frame callback panicked");
        }
        ran += 1;
    }
    ran
}

/// Leaves the in-frame state when `run_frame` returns or unwinds.
struct FrameGuard;

impl Drop for FrameGuard {
    fn drop(&mut self) {
        QUEUE.with(|queue| {
            let mut queue = queue.borrow_mut();
            queue.in_frame = false;
            queue.cancelled_in_batch.clear();
        });
    }
}

fn is_cancelled_in_batch(handle: FrameHandle) -> bool {
    QUEUE.with(|queue| queue.borrow().cancelled_in_batch.contains(&handle))
}

/// Present `frames` frames. Returns the total number of callbacks run.
pub fn run_frames(frames: usize) -> usize {
    (0..frames).map(|_| run_frame()).sum()
}

/// Number of callbacks waiting for the next frame.
pub fn pending_frames() -> usize {
    QUEUE.with(|queue| queue.borrow().pending.len())
}

/// Number of frames presented so far.
pub fn frame_count() -> u64 {
    QUEUE.with(|queue| queue.borrow().frame_count)
}

/// Drop every queued callback (for testing).
pub(crate) fn reset_frames() {
    QUEUE.with(|queue| *queue.borrow_mut() = FrameQueue::new());
}

// =============================================================================
// TESTS
// =============================================================================
