//! Nesting among chained nodes.
//!
//! Chained nodes can contain other chained nodes: a list item chain inside a
//! chained grid cell, or a chained row of cells inside a chained table. For
//! each nesting only one level survives. When the chained children form a
//! regular, well-filled grid of more than `min_grid_children` cells, the cells
//! are the records and the parent is dropped. Otherwise the children are
//! dropped and the parent stays.

use std::collections::BTreeMap;

use crate::options::Options;
use crate::tree::{NodeId, Tree};

use super::region::sort_by_position_desc;

/// For each chained node (by position in `similar`) the positions of the
/// chained nodes whose nearest chained ancestor it is.
#[must_use]
pub fn visual_children(tree: &Tree, similar: &[NodeId]) -> BTreeMap<usize, Vec<usize>> {
    let mut children: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, &node) in similar.iter().enumerate() {
        let mut ancestors: Vec<NodeId> = similar
            .iter()
            .enumerate()
            .filter(|&(j, &other)| j != i && tree.is_ancestor(other, node))
            .map(|(_, &other)| other)
            .collect();
        if ancestors.is_empty() {
            continue;
        }
        // The nearest ancestor is the lowest, rightmost one on the page.
        sort_by_position_desc(tree, &mut ancestors);
        let Some(parent) = similar.iter().position(|&n| n == ancestors[0]) else {
            continue;
        };
        children.entry(parent).or_default().push(i);
    }
    children
}

/// Chained nodes to drop: the parent of a regular grid, or all chained
/// children of any other parent.
///
/// The list may hold duplicates (a padded grid row repeats a node).
#[must_use]
pub fn removable_nodes(tree: &Tree, similar: &[NodeId], options: &Options) -> Vec<NodeId> {
    let mut removable = Vec::new();
    for (parent, child_positions) in visual_children(tree, similar) {
        let node = similar[parent];
        let mut children: Vec<NodeId> = child_positions.iter().map(|&i| similar[i]).collect();
        let regular_grid = nodes_aligned(tree, &children)
            && areas_consistent(tree, node, &mut children, options.grid_area_ratio)
            && children.len() > options.min_grid_children;
        if regular_grid {
            removable.push(node);
        } else {
            removable.extend(children);
        }
    }
    removable
}

/// Group nodes by an integer key, groups in order of first appearance.
fn group_by<F>(nodes: &[NodeId], key: F) -> Vec<Vec<NodeId>>
where
    F: Fn(NodeId) -> i64,
{
    let mut keys: Vec<i64> = Vec::new();
    let mut groups: Vec<Vec<NodeId>> = Vec::new();
    for &node in nodes {
        let k = key(node);
        match keys.iter().position(|&existing| existing == k) {
            Some(g) => groups[g].push(node),
            None => {
                keys.push(k);
                groups.push(vec![node]);
            }
        }
    }
    groups
}

/// True when the nodes form columns (same `left`) whose rows line up: the
/// i-th node of every column has the same `top` as the i-th node of the first.
#[must_use]
pub fn nodes_aligned(tree: &Tree, nodes: &[NodeId]) -> bool {
    let mut columns = group_by(nodes, |n| tree.rect(n).left);
    for column in &mut columns {
        column.sort_by_key(|n| tree.rect(*n).top);
    }
    let Some((first, rest)) = columns.split_first() else {
        return true;
    };
    first.iter().enumerate().all(|(i, head)| {
        rest.iter().all(|column| {
            column
                .get(i)
                .is_none_or(|other| tree.rect(*other).top == tree.rect(*head).top)
        })
    })
}

/// True when no child is larger than an equal share of the parent and the
/// children cover at least `ratio` of it.
///
/// A grid whose last row is short gets that row padded (with copies of its
/// first node) up to the length of the first row before the coverage check is
/// repeated. The padding stays in `children`.
pub fn areas_consistent(tree: &Tree, parent: NodeId, children: &mut Vec<NodeId>, ratio: f64) -> bool {
    let parent_area = tree.rect(parent).area() as f64;
    let share = parent_area / children.len() as f64;
    if children.iter().any(|c| tree.rect(*c).area() as f64 > share) {
        return false;
    }

    let total = |nodes: &[NodeId]| nodes.iter().map(|c| tree.rect(*c).area()).sum::<i64>() as f64;
    if total(children) >= ratio * parent_area {
        return true;
    }

    let rows = group_by(children, |n| tree.rect(n).top);
    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return false;
    };
    if rows.len() == 1 || first.len() == 1 || last.len() == first.len() {
        return false;
    }
    let middle_regular = rows[1..rows.len() - 1].iter().all(|row| row.len() == first.len());
    if last.len() < first.len() && middle_regular {
        let pad = last[0];
        for _ in 0..first.len() - last.len() {
            children.push(pad);
        }
        if total(children) < ratio * parent_area {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Node, Rect};

    // A 400x300 parent holding a grid of 100x100 cells, `per_row` per row.
    fn grid(cells: usize, per_row: usize) -> (Tree, NodeId, Vec<NodeId>) {
        let mut tree = Tree::new();
        let parent = tree.set_root(Node::element("div", Rect::new(0, 0, 400, 300)));
        let children = (0..cells)
            .map(|i| {
                let (row, col) = ((i / per_row) as i64, (i % per_row) as i64);
                tree.append_child(
                    parent,
                    Node::element("div", Rect::new(col * 100, row * 100, col * 100 + 100, row * 100 + 100)),
                )
            })
            .collect();
        (tree, parent, children)
    }

    #[test]
    fn full_grid_is_aligned_and_consistent() {
        let (tree, parent, mut children) = grid(12, 4);
        assert!(nodes_aligned(&tree, &children));
        assert!(areas_consistent(&tree, parent, &mut children, 0.6));
        assert_eq!(children.len(), 12);
    }

    #[test]
    fn short_last_row_is_padded() {
        // Rows of 4, 4 and 1 cover 75% of the parent; padding the last row
        // to 4 brings it to 100%.
        let (tree, parent, mut children) = grid(9, 4);
        assert!(areas_consistent(&tree, parent, &mut children, 0.8));
        assert_eq!(children.len(), 12);
        assert_eq!(children[11], children[8]);
    }

    #[test]
    fn single_row_is_not_a_grid() {
        let (tree, parent, mut children) = grid(2, 4);
        assert!(!areas_consistent(&tree, parent, &mut children, 0.6));
    }

    // Rows stacked under a body, each holding `per_row` chained cells of
    // `cell` x `cell` pixels side by side in a 400x100 row.
    fn chained_rows(rows: usize, per_row: usize, cell: i64) -> (Tree, Vec<NodeId>, Vec<NodeId>, Vec<NodeId>) {
        let mut tree = Tree::new();
        let body = tree.set_root(Node::element("body", Rect::new(0, 0, 1000, 1000)));
        let mut row_nodes = Vec::new();
        let mut cells = Vec::new();
        for r in 0..rows as i64 {
            let top = r * 200;
            let row = tree.append_child(body, Node::element("div", Rect::new(0, top, 400, top + 100)));
            row_nodes.push(row);
            for c in 0..per_row as i64 {
                let left = c * 100;
                cells.push(tree.append_child(row, Node::element("span", Rect::new(left, top, left + cell, top + cell))));
            }
        }
        let similar = row_nodes.iter().chain(&cells).copied().collect();
        (tree, similar, row_nodes, cells)
    }

    #[test]
    fn regular_grid_drops_the_parent() {
        let (tree, similar, rows, cells) = chained_rows(2, 4, 100);
        let removable = removable_nodes(&tree, &similar, &Options::default());
        assert_eq!(removable, rows);
        assert!(cells.iter().all(|c| !removable.contains(c)));
    }

    #[test]
    fn few_children_are_dropped() {
        let (tree, similar, rows, cells) = chained_rows(2, 3, 100);
        let removable = removable_nodes(&tree, &similar, &Options::default());
        assert_eq!(removable, cells);
        assert!(rows.iter().all(|r| !removable.contains(r)));
    }

    #[test]
    fn sparse_children_are_dropped() {
        // Four 50x50 cells cover a quarter of their row.
        let (tree, similar, rows, cells) = chained_rows(2, 4, 50);
        let removable = removable_nodes(&tree, &similar, &Options::default());
        assert_eq!(removable, cells);
        assert!(rows.iter().all(|r| !removable.contains(r)));
    }

    #[test]
    fn unnested_chains_keep_everything() {
        let (tree, _, rows, _) = chained_rows(3, 0, 100);
        assert!(removable_nodes(&tree, &rows, &Options::default()).is_empty());
    }

    #[test]
    fn misaligned_columns() {
        let mut tree = Tree::new();
        let parent = tree.set_root(Node::element("div", Rect::new(0, 0, 400, 400)));
        let a = tree.append_child(parent, Node::element("div", Rect::new(0, 0, 100, 100)));
        let b = tree.append_child(parent, Node::element("div", Rect::new(200, 50, 300, 150)));
        assert!(!nodes_aligned(&tree, &[a, b]));
    }
}
