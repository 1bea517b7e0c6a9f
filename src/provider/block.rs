//! Default block tree: one block per visual node.

use crate::tree::{Node, NodeId, Rect, Tree};

/// Build the block tree of `visual`.
///
/// Each block mirrors one visual node: same position in the hierarchy, the
/// bounding box of the nodes it represents as geometry and the first
/// represented node's style. Block tags are the bracketed tag list of the
/// represented nodes, e.g. `[li]`.
#[must_use]
pub fn build_block_tree(visual: &Tree) -> Tree {
    let mut blocks = Tree::new();
    let Some(root) = visual.root() else {
        return blocks;
    };

    let block_root = blocks.set_root(block_for(visual, &[root]));
    let mut stack = vec![(root, block_root)];
    while let Some((vt, bt)) = stack.pop() {
        // Reverse so children are appended in document order.
        let mut pending = Vec::new();
        for &child in visual.node(vt).children() {
            let block = blocks.append_child(bt, block_for(visual, &[child]));
            pending.push((child, block));
        }
        pending.reverse();
        stack.extend(pending);
    }
    tracing::debug!(blocks = blocks.len(), "block tree built");
    blocks
}

fn block_for(visual: &Tree, group: &[NodeId]) -> Node {
    let tags: Vec<&str> = group.iter().map(|id| visual.node(*id).tag.as_str()).collect();
    let rect = Rect::bounding(group.iter().map(|id| visual.rect(*id))).unwrap_or_default();
    let mut block = Node::element(format!("[{}]", tags.join(",")), rect);
    if let Some(first) = group.first() {
        block.style = visual.node(*first).style.clone();
    }
    block.represents = group.to_vec();
    block
}
