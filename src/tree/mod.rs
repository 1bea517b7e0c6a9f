//! Layout tree model.
//!
//! A [`Tree`] is an arena of [`Node`]s addressed by [`NodeId`] handles. Two
//! kinds of trees exist: the visual tree, one node per rendered element, and
//! the block tree, whose nodes each summarize one or more visual nodes through
//! [`Node::represents`].
//!
//! Nodes are immutable once the provider has built them. Everything the
//! extraction stages compute about a node (chain links, leaf contents, record
//! ids) lives in side tables owned by one extraction call.

pub mod style;
pub mod traversal;

use serde::Serialize;

pub use style::{Style, StyleProperty};
pub use traversal::Traversal;

/// Handle of a node inside one [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Position of the node in its arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Which of the two page trees an operation runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeKind {
    /// One node per rendered, visible element.
    Visual,
    /// Coarser tree whose nodes summarize groups of visual nodes.
    #[default]
    Block,
}

/// Element or raw text node.
///
/// Trees built by the provider contain elements only; text lives in
/// [`Node::fragments`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeKind {
    /// A rendered element with geometry and style.
    #[default]
    Element,
    /// A bare text node.
    Text,
}

/// Absolute page geometry of a node, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Rect {
    /// Left edge.
    pub left: i64,
    /// Top edge.
    pub top: i64,
    /// Right edge.
    pub right: i64,
    /// Bottom edge.
    pub bottom: i64,
}

impl Rect {
    /// Create a rect from its four edges.
    #[must_use]
    pub const fn new(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Absolute horizontal extent.
    #[must_use]
    pub fn width(&self) -> i64 {
        (self.right - self.left).abs()
    }

    /// Absolute vertical extent.
    #[must_use]
    pub fn height(&self) -> i64 {
        (self.bottom - self.top).abs()
    }

    /// Width times height.
    #[must_use]
    pub fn area(&self) -> i64 {
        self.width() * self.height()
    }

    /// Horizontal center.
    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.left as f64 + self.width() as f64 / 2.0
    }

    /// Vertical center.
    #[must_use]
    pub fn center_y(&self) -> f64 {
        self.top as f64 + self.height() as f64 / 2.0
    }

    /// Smallest rect enclosing all of `rects`, or `None` for an empty input.
    pub fn bounding<'a>(rects: impl IntoIterator<Item = &'a Rect>) -> Option<Rect> {
        rects.into_iter().fold(None, |acc: Option<Rect>, r| {
            Some(match acc {
                None => *r,
                Some(b) => Rect::new(
                    b.left.min(r.left),
                    b.top.min(r.top),
                    b.right.max(r.right),
                    b.bottom.max(r.bottom),
                ),
            })
        })
    }
}

/// One entry of a node's DOM child list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// A raw text child.
    Text(String),
    /// An element child; `Some` when that element is a direct child node of
    /// this node in the same tree.
    Element(Option<NodeId>),
}

/// A node of a layout tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Lowercase tag name (block nodes use the bracketed list of their group).
    pub tag: String,
    /// Element or text.
    pub kind: NodeKind,
    /// Absolute geometry.
    pub rect: Rect,
    /// Computed style.
    pub style: Style,
    /// XPath of the backing DOM element, when known.
    pub xpath: Option<String>,
    /// Ordered DOM child list (text and element children).
    pub fragments: Vec<Fragment>,
    /// Visual-tree nodes summarized by this block node.
    pub represents: Vec<NodeId>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// Element node with the given tag and geometry and an empty style.
    #[must_use]
    pub fn element(tag: impl Into<String>, rect: Rect) -> Self {
        Self {
            tag: tag.into(),
            kind: NodeKind::Element,
            rect,
            style: Style::new(),
            xpath: None,
            fragments: Vec::new(),
            represents: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Bare text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text,
            fragments: vec![Fragment::Text(text.into())],
            ..Self::element("#text", Rect::default())
        }
    }

    /// Builder-style style setter.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// True for element nodes.
    #[must_use]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Parent handle.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child handles in document order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// True when the node has no child nodes.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Direct text fragments, each trimmed, concatenated without separator.
    #[must_use]
    pub fn own_text(&self) -> String {
        self.fragments
            .iter()
            .filter_map(|f| match f {
                Fragment::Text(t) => Some(t.trim()),
                Fragment::Element(_) => None,
            })
            .collect()
    }

    /// Label used in logs and error messages.
    #[must_use]
    pub fn label(&self) -> String {
        self.xpath.clone().unwrap_or_else(|| self.tag.clone())
    }
}

/// Arena of layout nodes with a single root.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Tree {
    /// Empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the root node. Replaces the root handle if one already exists.
    pub fn set_root(&mut self, mut node: Node) -> NodeId {
        node.parent = None;
        let id = self.push(node);
        self.root = Some(id);
        id
    }

    /// Append `node` as the last child of `parent`.
    ///
    /// The parent's fragment list gets a matching element entry.
    pub fn append_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        node.parent = Some(parent);
        let id = self.push(node);
        let parent_node = &mut self.nodes[parent.0];
        parent_node.children.push(id);
        parent_node.fragments.push(Fragment::Element(Some(id)));
        id
    }

    /// Append a raw text fragment to `parent`'s DOM child list.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) {
        self.nodes[parent.0]
            .fragments
            .push(Fragment::Text(text.into()));
    }

    /// Append a DOM element child that has no node in this tree.
    pub fn append_detached_element(&mut self, parent: NodeId) {
        self.nodes[parent.0].fragments.push(Fragment::Element(None));
    }

    /// Attach `node` under `parent` as a tree child without recording it in
    /// the parent's fragment list (the DOM parent is a different element).
    pub fn adopt_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        node.parent = Some(parent);
        let id = self.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Root handle.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node behind a handle.
    ///
    /// Handles always come from this tree; an out-of-range handle is a bug.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Node behind a handle, or `None` when out of range.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Mutable access for providers that adjust nodes after insertion.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Geometry of a node.
    #[must_use]
    pub fn rect(&self, id: NodeId) -> &Rect {
        &self.nodes[id.0].rect
    }

    /// Next tree sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.nodes[id.0].parent?;
        let siblings = &self.nodes[parent.0].children;
        let pos = siblings.iter().position(|&c| c == id)?;
        siblings.get(pos + 1).copied()
    }

    /// True when `ancestor` is a proper ancestor of `node`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.nodes[node.0].parent;
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.nodes[p.0].parent;
        }
        false
    }

    /// Preorder listing of the subtree rooted at `root`.
    #[must_use]
    pub fn preorder(&self, root: NodeId) -> Traversal {
        Traversal::preorder(self, root)
    }

    /// Postorder listing of the subtree rooted at `root`.
    #[must_use]
    pub fn postorder(&self, root: NodeId) -> Traversal {
        Traversal::postorder(self, root)
    }

    /// Iterate all handles in arena order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Check that handles are in range and parent/child links agree.
    pub fn validate(&self) -> crate::Result<()> {
        use crate::Error;

        let root = self
            .root
            .ok_or_else(|| Error::MalformedTree("tree has no root".to_string()))?;
        if root.0 >= self.nodes.len() {
            return Err(Error::MalformedTree(format!("root {} out of range", root.0)));
        }
        for (index, node) in self.nodes.iter().enumerate() {
            for &child in &node.children {
                let Some(child_node) = self.nodes.get(child.0) else {
                    return Err(Error::MalformedTree(format!(
                        "node {index} has dangling child {}",
                        child.0
                    )));
                };
                if child_node.parent != Some(NodeId(index)) {
                    return Err(Error::MalformedTree(format!(
                        "node {} does not point back to parent {index}",
                        child.0
                    )));
                }
            }
            for fragment in &node.fragments {
                if let Fragment::Element(Some(child)) = fragment {
                    if !node.children.contains(child) {
                        return Err(Error::MalformedTree(format!(
                            "node {index} lists {} as DOM child but not as tree child",
                            child.0
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
