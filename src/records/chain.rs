//! Doubly linked chains of similar nodes.
//!
//! Links live in a side table keyed by node handle. Every link carries the
//! direction it was made in, so horizontal (row) links can be told apart from
//! vertical (column) links and dropped later.

use std::collections::{HashMap, HashSet};

use crate::tree::NodeId;

/// Which way a link points, seen from the node holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Previous node sits above.
    Up,
    /// Next node sits below.
    Down,
    /// Previous node sits to the left.
    Left,
    /// Next node sits to the right.
    Right,
}

/// One end of a chain link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    /// Linked node.
    pub node: NodeId,
    /// Direction of the link.
    pub direction: Direction,
}

/// Previous/next similar links of every chained node.
#[derive(Debug, Clone, Default)]
pub struct Chains {
    prev: HashMap<NodeId, Link>,
    next: HashMap<NodeId, Link>,
}

impl Chains {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn prev(&self, id: NodeId) -> Option<Link> {
        self.prev.get(&id).copied()
    }

    #[must_use]
    pub fn next(&self, id: NodeId) -> Option<Link> {
        self.next.get(&id).copied()
    }

    pub fn set_prev(&mut self, id: NodeId, node: NodeId, direction: Direction) {
        self.prev.insert(id, Link { node, direction });
    }

    pub fn set_next(&mut self, id: NodeId, node: NodeId, direction: Direction) {
        self.next.insert(id, Link { node, direction });
    }

    pub fn clear_prev(&mut self, id: NodeId) {
        self.prev.remove(&id);
    }

    pub fn clear_next(&mut self, id: NodeId) {
        self.next.remove(&id);
    }

    /// Link `a` to `b` in both directions; `forward` is the direction of
    /// `a -> b` and the back link gets its opposite.
    pub fn link(&mut self, a: NodeId, b: NodeId, forward: Direction) {
        self.set_next(a, b, forward);
        self.set_prev(b, a, forward.opposite());
    }

    /// Drop a horizontal back link (`prev` pointing left) on both ends.
    pub fn remove_left_link(&mut self, id: NodeId) {
        if let Some(link) = self.prev(id) {
            if link.direction == Direction::Left {
                self.clear_prev(id);
                self.clear_next(link.node);
            }
        }
    }

    /// Drop a horizontal forward link (`next` pointing right) on both ends.
    pub fn remove_right_link(&mut self, id: NodeId) {
        if let Some(link) = self.next(id) {
            if link.direction == Direction::Right {
                self.clear_next(id);
                self.clear_prev(link.node);
            }
        }
    }

    /// Last node reached by following `next` links from `id`.
    ///
    /// Stops before revisiting a node, so a cyclic chain still terminates.
    #[must_use]
    pub fn tail(&self, id: NodeId) -> NodeId {
        let mut seen = HashSet::from([id]);
        let mut current = id;
        while let Some(link) = self.next(current) {
            if !seen.insert(link.node) {
                break;
            }
            current = link.node;
        }
        current
    }

    /// Every node reached from `root` by following `next` links, `root` first.
    #[must_use]
    pub fn members(&self, root: NodeId) -> Vec<NodeId> {
        let mut seen = HashSet::from([root]);
        let mut out = vec![root];
        let mut current = root;
        while let Some(link) = self.next(current) {
            if !seen.insert(link.node) {
                break;
            }
            out.push(link.node);
            current = link.node;
        }
        out
    }
}

impl Direction {
    /// The direction of the matching back link.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}
