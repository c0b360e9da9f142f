//! Display Nodes - In-memory display tree
//!
//! A small arena of display nodes standing in for the document tree.
//! Nodes are identified by [`NodeId`] and never freed; a node that is no
//! longer referenced simply stays detached.
//!
//! # API
//!
//! - `create_node(tag)` - Allocate a detached node
//! - `append_child(parent, child)` - Attach (or move) a node under a parent
//! - `detach(node)` - Remove a node from its parent (no-op if detached)
//! - `body()` - The document body, created on first use
//!
//! # Example
//!
//! ```ignore
//! use spark_spa::host::node;
//!
//! let list = node::create_node("ul");
//! let item = node::create_node("li");
//! node::append_child(list, item)?;
//! assert_eq!(node::parent(item), Some(list));
//!
//! node::detach(item);
//! assert_eq!(node::parent(item), None);
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;

use super::HostError;

// =============================================================================
// TYPES
// =============================================================================

/// Handle to a display node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

struct NodeData {
    tag: String,
    class_name: String,
    styles: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NodeData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            class_name: String::new(),
            styles: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
        }
    }
}

// =============================================================================
// STATE
// =============================================================================

struct NodeArena {
    nodes: Vec<NodeData>,
    body: Option<NodeId>,
}

impl NodeArena {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            body: None,
        }
    }

    fn alloc(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(tag));
        id
    }

    fn get(&self, id: NodeId) -> Result<&NodeData, HostError> {
        self.nodes.get(id.0).ok_or(HostError::UnknownNode(id))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut NodeData, HostError> {
        self.nodes.get_mut(id.0).ok_or(HostError::UnknownNode(id))
    }

    /// True if `ancestor` is `node` or one of its ancestors.
    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.nodes.get(current.0).and_then(|n| n.parent);
        }
        false
    }

    fn unlink(&mut self, child: NodeId) {
        let Some(old_parent) = self.nodes.get_mut(child.0).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(old_parent.0) {
            parent.children.retain(|c| *c != child);
        }
    }
}

thread_local! {
    static ARENA: RefCell<NodeArena> = RefCell::new(NodeArena::new());
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Create a new detached node with the given tag.
pub fn create_node(tag: &str) -> NodeId {
    ARENA.with(|arena| arena.borrow_mut().alloc(tag))
}

/// The document body. Created lazily so a reset host gets a fresh one.
pub fn body() -> NodeId {
    ARENA.with(|arena| {
        let mut arena = arena.borrow_mut();
        match arena.body {
            Some(body) => body,
            None => {
                let body = arena.alloc("body");
                arena.body = Some(body);
                body
            }
        }
    })
}

/// Append `child` as the last child of `parent`.
///
/// A child that already has a parent is moved, matching the document tree.
pub fn append_child(parent: NodeId, child: NodeId) -> Result<(), HostError> {
    ARENA.with(|arena| {
        let mut arena = arena.borrow_mut();
        arena.get(parent)?;
        arena.get(child)?;

        if arena.is_ancestor(child, parent) {
            return Err(HostError::HierarchyCycle { parent, child });
        }

        arena.unlink(child);
        arena.get_mut(child)?.parent = Some(parent);
        arena.get_mut(parent)?.children.push(child);
        Ok(())
    })
}

/// Detach `node` from its parent. Detached or unknown nodes are a no-op.
pub fn detach(node: NodeId) {
    ARENA.with(|arena| arena.borrow_mut().unlink(node));
}

/// Parent of `node`, if attached.
pub fn parent(node: NodeId) -> Option<NodeId> {
    ARENA.with(|arena| arena.borrow().get(node).ok().and_then(|n| n.parent))
}

/// Children of `node` in document order.
pub fn children(node: NodeId) -> Vec<NodeId> {
    ARENA.with(|arena| {
        arena
            .borrow()
            .get(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    })
}

/// Check whether `node` is reachable from the body.
pub fn is_connected(node: NodeId) -> bool {
    let body = body();
    ARENA.with(|arena| arena.borrow().is_ancestor(body, node))
}

/// Tag the node was created with.
pub fn tag(node: NodeId) -> Option<String> {
    ARENA.with(|arena| arena.borrow().get(node).ok().map(|n| n.tag.clone()))
}

/// Replace the node's class list.
pub fn set_class(node: NodeId, class_name: &str) -> Result<(), HostError> {
    ARENA.with(|arena| {
        arena.borrow_mut().get_mut(node)?.class_name = class_name.to_string();
        Ok(())
    })
}

/// Current class list (empty string if none or unknown node).
pub fn class_name(node: NodeId) -> String {
    ARENA.with(|arena| {
        arena
            .borrow()
            .get(node)
            .map(|n| n.class_name.clone())
            .unwrap_or_default()
    })
}

/// Set an inline style property.
pub fn set_style(node: NodeId, property: &str, value: &str) -> Result<(), HostError> {
    ARENA.with(|arena| {
        arena
            .borrow_mut()
            .get_mut(node)?
            .styles
            .insert(property.to_string(), value.to_string());
        Ok(())
    })
}

/// Read an inline style property.
pub fn style(node: NodeId, property: &str) -> Option<String> {
    ARENA.with(|arena| {
        arena
            .borrow()
            .get(node)
            .ok()
            .and_then(|n| n.styles.get(property).cloned())
    })
}

/// Number of nodes ever created.
pub fn node_count() -> usize {
    ARENA.with(|arena| arena.borrow().nodes.len())
}

/// Drop every node (for testing).
pub(crate) fn reset_nodes() {
    ARENA.with(|arena| *arena.borrow_mut() = NodeArena::new());
}

// =============================================================================
// TESTS
// =============================================================================
