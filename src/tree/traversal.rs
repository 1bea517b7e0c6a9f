//! Preorder and postorder listings with per-node depth.

use super::{NodeId, Tree};

/// Flat node listing of a subtree plus the depth of each node.
///
/// `nodes[i]` sits at depth `depths[i]`, the root of the walk at depth 0.
#[derive(Debug, Clone, Default)]
pub struct Traversal {
    /// Visited nodes in walk order.
    pub nodes: Vec<NodeId>,
    /// Depth of each visited node, parallel to `nodes`.
    pub depths: Vec<usize>,
}

impl Traversal {
    /// Parents before children, children in document order.
    #[must_use]
    pub fn preorder(tree: &Tree, root: NodeId) -> Self {
        let mut out = Self::default();
        let mut stack = vec![(root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            out.nodes.push(id);
            out.depths.push(depth);
            for &child in tree.node(id).children().iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }

    /// Children in document order before their parent.
    #[must_use]
    pub fn postorder(tree: &Tree, root: NodeId) -> Self {
        let mut out = Self::default();
        // (node, depth, children already expanded)
        let mut stack = vec![(root, 0usize, false)];
        while let Some((id, depth, expanded)) = stack.pop() {
            if expanded {
                out.nodes.push(id);
                out.depths.push(depth);
                continue;
            }
            stack.push((id, depth, true));
            for &child in tree.node(id).children().iter().rev() {
                stack.push((child, depth + 1, false));
            }
        }
        out
    }

    /// Number of visited nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True for an empty walk.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Position of `id` in the walk.
    #[must_use]
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|&n| n == id)
    }
}
