//! Structural similarity between two subtrees via extended subtree mapping.
//!
//! Both subtrees are listed in postorder. Every pair of nodes that passes a
//! partial [`compare`] gets a [`Mapping`], and a parent pair's mapping then
//! absorbs the mappings of its best child alignment (a longest common
//! subsequence over the two child lists, scored by mapping size). Each node is
//! credited to the largest mapping containing it, and the credited weights are
//! combined into one score.
//!
//! The score is not symmetric: swapping control and test can change it.

use std::collections::HashMap;

use crate::compare::{compare, CompareMode};
use crate::tree::{NodeId, Traversal, Tree};

/// Exponent that makes larger mappings worth more than the sum of their parts.
pub const ALFA: f64 = 2.0;

/// Factor applied to mappings between nodes at different depths.
pub const BETA: f64 = 0.5;

/// Correspondence between a control subtree and a test subtree.
///
/// Indices are positions in the postorder listing of each tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    /// Mapped control node indices.
    pub control: Vec<usize>,
    /// Mapped test node indices.
    pub test: Vec<usize>,
    /// Control nodes whose largest mapping is this one.
    pub control_weight: usize,
    /// Test nodes whose largest mapping is this one.
    pub test_weight: usize,
}

impl Mapping {
    fn pair(c: usize, t: usize) -> Self {
        Self {
            control: vec![c],
            test: vec![t],
            ..Self::default()
        }
    }
}

/// Working context of one similarity computation.
struct Alignment<'a> {
    control_tree: &'a Tree,
    test_tree: &'a Tree,
    control: Traversal,
    test: Traversal,
    control_index: HashMap<NodeId, usize>,
    test_index: HashMap<NodeId, usize>,
    /// Row-major `control.len() x test.len()` matrix.
    matrix: Vec<Option<Mapping>>,
}

impl<'a> Alignment<'a> {
    fn new(control_tree: &'a Tree, control_root: NodeId, test_tree: &'a Tree, test_root: NodeId) -> Self {
        let control = control_tree.postorder(control_root);
        let test = test_tree.postorder(test_root);
        let control_index = index_of(&control);
        let test_index = index_of(&test);
        Self {
            control_tree,
            test_tree,
            control,
            test,
            control_index,
            test_index,
            matrix: Vec::new(),
        }
    }

    fn cell(&self, c: usize, t: usize) -> usize {
        c * self.test.len() + t
    }

    fn build_matrix(&mut self) {
        let (nc, nt) = (self.control.len(), self.test.len());
        self.matrix = Vec::with_capacity(nc * nt);
        for c in 0..nc {
            let cnode = self.control_tree.node(self.control.nodes[c]);
            for t in 0..nt {
                let tnode = self.test_tree.node(self.test.nodes[t]);
                let matched = compare(cnode, tnode, CompareMode::Partial).is_match();
                self.matrix.push(matched.then(|| Mapping::pair(c, t)));
            }
        }

        // Children precede parents in postorder, so each child cell is final
        // before its parent absorbs it.
        for c in 0..nc {
            for t in 0..nt {
                let cell = self.cell(c, t);
                if self.matrix[cell].is_none() {
                    continue;
                }
                let has_children = !self.control_tree.node(self.control.nodes[c]).is_leaf()
                    && !self.test_tree.node(self.test.nodes[t]).is_leaf();
                if has_children {
                    self.align_children(c, t);
                }
            }
        }
    }

    /// Extend the `(c, t)` mapping with the best non-crossing alignment of
    /// the two nodes' children.
    fn align_children(&mut self, c: usize, t: usize) {
        let control_children: Vec<usize> = self
            .control_tree
            .node(self.control.nodes[c])
            .children()
            .iter()
            .filter_map(|id| self.control_index.get(id).copied())
            .collect();
        let test_children: Vec<usize> = self
            .test_tree
            .node(self.test.nodes[t])
            .children()
            .iter()
            .filter_map(|id| self.test_index.get(id).copied())
            .collect();
        let (m, n) = (control_children.len(), test_children.len());

        let mut score = vec![vec![0usize; n + 1]; m + 1];
        let mut best = vec![vec![0usize; n + 1]; m + 1];
        for i in 1..=m {
            for j in 1..=n {
                let cell = self.cell(control_children[i - 1], test_children[j - 1]);
                score[i][j] = self.matrix[cell].as_ref().map_or(0, |mp| mp.control.len());
                best[i][j] = best[i][j - 1]
                    .max(best[i - 1][j])
                    .max(best[i - 1][j - 1] + score[i][j]);
            }
        }

        let mut absorbed_control = Vec::new();
        let mut absorbed_test = Vec::new();
        let (mut i, mut j) = (m, n);
        while i > 0 && j > 0 {
            if best[i][j] == best[i - 1][j - 1] + score[i][j] {
                if score[i][j] > 0 {
                    let cell = self.cell(control_children[i - 1], test_children[j - 1]);
                    if let Some(child) = &self.matrix[cell] {
                        absorbed_control.extend_from_slice(&child.control);
                        absorbed_test.extend_from_slice(&child.test);
                    }
                }
                i -= 1;
                j -= 1;
            } else if best[i][j] == best[i][j - 1] {
                j -= 1;
            } else {
                i -= 1;
            }
        }

        let cell = self.cell(c, t);
        if let Some(mapping) = self.matrix[cell].as_mut() {
            mapping.control.extend(absorbed_control);
            mapping.test.extend(absorbed_test);
        }
    }

    /// For every node index, the cell holding its largest mapping. Cells are
    /// scanned in `(c, t)` order and an equally large mapping replaces the
    /// current holder. A mapping holds an index when its index set contains
    /// that node index, not when the index is a position within the set.
    fn largest_mappings(&self, side: Side) -> Vec<Option<usize>> {
        let len = match side {
            Side::Control => self.control.len(),
            Side::Test => self.test.len(),
        };
        let mut largest: Vec<Option<usize>> = vec![None; len];
        for (cell, mapping) in self.matrix.iter().enumerate() {
            let Some(mapping) = mapping else { continue };
            let indices = side.indices(mapping);
            for &index in indices {
                let replace = match largest[index] {
                    None => true,
                    Some(holder) => self.matrix[holder]
                        .as_ref()
                        .is_some_and(|h| side.indices(h).len() <= indices.len()),
                };
                if replace {
                    largest[index] = Some(cell);
                }
            }
        }
        largest
    }

    fn fill_weights(&mut self) {
        let control = self.largest_mappings(Side::Control);
        let test = self.largest_mappings(Side::Test);
        for cell in control.into_iter().flatten() {
            if let Some(mapping) = self.matrix[cell].as_mut() {
                mapping.control_weight += 1;
            }
        }
        for cell in test.into_iter().flatten() {
            if let Some(mapping) = self.matrix[cell].as_mut() {
                mapping.test_weight += 1;
            }
        }
    }

    fn score(&self) -> f64 {
        let nt = self.test.len();
        let total: f64 = self
            .matrix
            .iter()
            .enumerate()
            .filter_map(|(cell, mapping)| mapping.as_ref().map(|m| (cell / nt, cell % nt, m)))
            .map(|(c, t, m)| {
                let weight = ((m.control_weight + m.test_weight) as f64).powf(ALFA);
                if self.control.depths[c] == self.test.depths[t] {
                    weight
                } else {
                    weight * BETA
                }
            })
            .sum();
        total.powf(1.0 / ALFA)
    }
}

#[derive(Clone, Copy)]
enum Side {
    Control,
    Test,
}

impl Side {
    fn indices(self, mapping: &Mapping) -> &[usize] {
        match self {
            Side::Control => &mapping.control,
            Side::Test => &mapping.test,
        }
    }
}

fn index_of(walk: &Traversal) -> HashMap<NodeId, usize> {
    walk.nodes.iter().enumerate().map(|(i, id)| (*id, i)).collect()
}

/// Raw similarity score between the subtree at `control` and the one at `test`.
#[must_use]
pub fn similarity(control_tree: &Tree, control: NodeId, test_tree: &Tree, test: NodeId) -> f64 {
    let mut alignment = Alignment::new(control_tree, control, test_tree, test);
    alignment.build_matrix();
    alignment.fill_weights();
    alignment.score()
}

/// Similarity scaled by the larger subtree size, in `[0, 1]`.
///
/// A subtree compared with itself scores exactly 1.
#[must_use]
pub fn normalized_similarity(
    control_tree: &Tree,
    control: NodeId,
    test_tree: &Tree,
    test: NodeId,
) -> f64 {
    let mut alignment = Alignment::new(control_tree, control, test_tree, test);
    alignment.build_matrix();
    alignment.fill_weights();
    let size = alignment.control.len().max(alignment.test.len());
    alignment.score() / size as f64 / 2.0
}

/// Mapping matrix of two subtrees with weights filled in, row-major by
/// control postorder index. Exposed for diagnostics.
#[must_use]
pub fn mapping_matrix(
    control_tree: &Tree,
    control: NodeId,
    test_tree: &Tree,
    test: NodeId,
) -> Vec<Vec<Option<Mapping>>> {
    let mut alignment = Alignment::new(control_tree, control, test_tree, test);
    alignment.build_matrix();
    alignment.fill_weights();
    let nt = alignment.test.len().max(1);
    alignment
        .matrix
        .chunks(nt)
        .map(<[Option<Mapping>]>::to_vec)
        .collect()
}
