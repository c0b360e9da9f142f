//! Host Environment - The in-memory stand-in for the browser
//!
//! Everything the router and pages need from the outside world:
//!
//! - **Nodes** - Display tree (create, attach, detach, class, style)
//! - **History** - Current location, session history, popstate listeners
//! - **Frames** - Per-frame callback scheduler (display-refresh cadence)
//! - **View** - Node construction helpers
//!
//! All state is thread-local. The host is single-threaded and cooperative:
//! nothing runs unless the embedder presents a frame or steps history.

use thiserror::Error;

pub mod frame;
pub mod history;
pub mod node;
mod view;

pub use frame::{cancel_frame, pending_frames, request_frame, run_frame, run_frames, FrameHandle};
pub use history::{
    back, current_path, forward, go, location_signal, on_popstate, push_state, replace_state,
};
pub use node::{body, NodeId};
pub use view::{view, view_class};

/// Errors raised by the host display tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The node id does not exist in this host.
    #[error("unknown display node {0}")]
    UnknownNode(NodeId),

    /// Attaching would make a node its own ancestor.
    #[error("cannot append {child} under {parent}: would create a cycle")]
    HierarchyCycle { parent: NodeId, child: NodeId },
}

/// Reset the whole host: nodes, history, location, and queued frames.
pub fn reset_host() {
    node::reset_nodes();
    history::reset_history();
    frame::reset_frames();
}
