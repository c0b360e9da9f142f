//! View helpers - Build display nodes with a mutator.
//!
//! ```ignore
//! use spark_spa::host::{view, node};
//!
//! let title = view("h1", |e| {
//!     let _ = node::set_class(e, "title");
//!     e
//! });
//! ```

use super::node::{self, NodeId};

/// Create a node with `tag` and hand it to `mutator`.
///
/// Returns whatever node the mutator returns, normally the one it was given.
pub fn view<F>(tag: &str, mutator: F) -> NodeId
where
    F: FnOnce(NodeId) -> NodeId,
{
    mutator(node::create_node(tag))
}

/// Apply `mutator` to an existing node.
pub fn view_class<F>(element: NodeId, mutator: F) -> NodeId
where
    F: FnOnce(NodeId) -> NodeId,
{
    mutator(element)
}
