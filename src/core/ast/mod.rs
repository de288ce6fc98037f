//! Arena-backed syntax tree used by the translation pass.
//!
//! Nodes are stored in a [`Tree`] and addressed by [`NodeId`] handles. The
//! parent link is a handle as well, so detaching, splicing or deep-copying a
//! subtree never leaves a dangling reference behind.
//!
//! Invariant: a node is listed in at most one parent's `children`, and its
//! `parent` field always names that parent. Every mutating operation below
//! updates both sides.

use std::fmt;


/// Stable handle of a node inside a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Closed set of node kinds understood by the pass.
///
/// Anything the front end does not model is an [`NodeKind::Other`] whose
/// children alternate [`NodeKind::Raw`] source text and modeled expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// `callee(args)`: children are `[callee, list]`.
    Call,
    /// Argument list of a call.
    List,
    Identifier,
    /// `object.property`: children are `[object, property]`.
    Dot,
    String,
    Number,
    /// Binary concatenation: children are `[left, right]`.
    Plus,
    ObjectInit,
    /// `key: value`: children are `[key, value]`.
    PropertyInit,
    /// Passthrough for every other construct.
    Other,
    /// Verbatim source text inside an `Other` node.
    Raw,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Call => "call",
            NodeKind::List => "list",
            NodeKind::Identifier => "identifier",
            NodeKind::Dot => "dot",
            NodeKind::String => "string",
            NodeKind::Number => "number",
            NodeKind::Plus => "plus",
            NodeKind::ObjectInit => "object_init",
            NodeKind::PropertyInit => "property_init",
            NodeKind::Other => "other",
            NodeKind::Raw => "raw",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    /// Identifier name, literal value or raw text.
    pub value: Option<String>,
    /// 1-based source line, when the node came from a parsed file.
    pub line: Option<usize>,
    /// Forces explicit grouping when the tree is printed.
    pub parenthesized: bool,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    fn new(kind: NodeKind, value: Option<String>) -> Self {
        Self {
            kind,
            value,
            line: None,
            parenthesized: false,
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// Owner of all nodes of one parsed file.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes ever allocated, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a detached node.
    pub fn alloc(&mut self, kind: NodeKind, value: Option<String>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(kind, value));
        id
    }

    pub fn alloc_leaf(&mut self, kind: NodeKind, value: impl Into<String>) -> NodeId {
        self.alloc(kind, Some(value.into()))
    }

    /// Allocate a node and attach `children` to it in order.
    pub fn alloc_with(&mut self, kind: NodeKind, children: &[NodeId]) -> NodeId {
        let id = self.alloc(kind, None);
        for &child in children {
            self.append(id, child);
        }
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    pub fn value(&self, id: NodeId) -> Option<&str> {
        self.node(id).value()
    }

    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) {
        self.node_mut(id).value = Some(value.into());
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).children()
    }

    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).get(index).copied()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Position of `child` among its parent's children.
    pub fn index_of(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    /// Attach `child` as the last child of `parent`.
    ///
    /// A child still attached elsewhere is detached first.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[parent.index()].children.push(child);
        self.nodes[child.index()].parent = Some(parent);
    }

    /// Attach `child` at `index` among `parent`'s children.
    ///
    /// `index` is clamped to the number of children.
    pub fn insert(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        let children = &mut self.nodes[parent.index()].children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.nodes[child.index()].parent = Some(parent);
    }

    /// Detach `child` from `parent`. Returns false when it was not a child.
    pub fn remove(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(index) = self.index_of(parent, child) else {
            return false;
        };
        self.nodes[parent.index()].children.remove(index);
        self.nodes[child.index()].parent = None;
        true
    }

    /// Detach and return the child at `index`.
    pub fn remove_at(&mut self, parent: NodeId, index: usize) -> Option<NodeId> {
        let child = self.child(parent, index)?;
        self.remove(parent, child);
        Some(child)
    }

    /// Detach and return the last child.
    pub fn pop(&mut self, parent: NodeId) -> Option<NodeId> {
        let child = *self.children(parent).last()?;
        self.remove(parent, child);
        Some(child)
    }

    /// Put `new_child` in place of `old_child`, keeping its sibling position.
    ///
    /// Returns false when `old_child` is not a child of `parent`.
    pub fn replace(&mut self, parent: NodeId, old_child: NodeId, new_child: NodeId) -> bool {
        if old_child == new_child {
            return self.index_of(parent, old_child).is_some();
        }
        // Detaching first may shift positions when both live in `parent`.
        self.detach(new_child);
        let Some(index) = self.index_of(parent, old_child) else {
            return false;
        };
        self.nodes[parent.index()].children[index] = new_child;
        self.nodes[old_child.index()].parent = None;
        self.nodes[new_child.index()].parent = Some(parent);
        true
    }

    /// Move the content of `source` into the slot of `target`.
    ///
    /// Used where `target` cannot be replaced through a parent, e.g. the
    /// root. `target` keeps its handle and position and takes over the kind,
    /// value, flags and children of `source`. Its previous children are
    /// detached. `source` may live inside `target`'s subtree.
    pub fn transplant(&mut self, target: NodeId, source: NodeId) {
        if target == source {
            return;
        }
        self.detach(source);

        for child in std::mem::take(&mut self.nodes[target.index()].children) {
            self.nodes[child.index()].parent = None;
        }

        let moved = std::mem::take(&mut self.nodes[source.index()].children);
        let source_node = &self.nodes[source.index()];
        let (kind, value, line, parenthesized) = (
            source_node.kind,
            source_node.value.clone(),
            source_node.line,
            source_node.parenthesized,
        );

        let node = &mut self.nodes[target.index()];
        node.kind = kind;
        node.value = value;
        node.line = line.or(node.line);
        node.parenthesized = parenthesized;
        node.children = moved;
        for child in self.nodes[target.index()].children.clone() {
            self.nodes[child.index()].parent = Some(target);
        }
    }

    /// Detach `id` from whatever parent currently holds it.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.index()].parent {
            self.remove(parent, id);
        }
    }

    /// Copy the subtree at `id` into fresh, detached nodes.
    pub fn deep_copy(&mut self, id: NodeId) -> NodeId {
        let source = self.node(id);
        let (kind, value, line, parenthesized) = (
            source.kind,
            source.value.clone(),
            source.line,
            source.parenthesized,
        );
        let children = source.children.clone();

        let copy = self.alloc(kind, value);
        {
            let node = self.node_mut(copy);
            node.line = line;
            node.parenthesized = parenthesized;
        }
        for child in children {
            let child_copy = self.deep_copy(child);
            self.append(copy, child_copy);
        }
        copy
    }

    /// Structural equality of two subtrees, ignoring identity and lines.
    pub fn same_shape(&self, a: NodeId, b: NodeId) -> bool {
        let (na, nb) = (self.node(a), self.node(b));
        na.kind == nb.kind
            && na.value == nb.value
            && na.parenthesized == nb.parenthesized
            && na.children.len() == nb.children.len()
            && na
                .children
                .iter()
                .zip(&nb.children)
                .all(|(&ca, &cb)| self.same_shape(ca, cb))
    }

    /// Pre-order walk over the subtree rooted at `id`.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![id],
        }
    }
}

#[cfg(test)]
impl Tree {
    /// Compact rendering of a subtree: `kind(value)[children]`.
    pub(crate) fn shape(&self, id: NodeId) -> String {
        let node = self.node(id);
        let mut out = node.kind.to_string();
        if let Some(value) = node.value() {
            out.push_str(&format!("({:?})", value));
        }
        if node.parenthesized {
            out.push_str("[p]");
        }
        if !node.children.is_empty() {
            let inner: Vec<_> = node.children.iter().map(|&c| self.shape(c)).collect();
            out.push_str(&format!("[{}]", inner.join(", ")));
        }
        out
    }
}

pub struct Descendants<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack.extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
