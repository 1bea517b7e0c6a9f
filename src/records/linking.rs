//! Chain building passes: sibling linking, grid row stitching, root merging.

use super::chain::Direction;
use super::region::{horizontally_aligned, sort_by_position, vertically_aligned};
use super::Locator;
use crate::tree::NodeId;

/// Which sibling pass is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Vertical,
    Horizontal,
}

impl Axis {
    fn forward(self) -> Direction {
        match self {
            Axis::Vertical => Direction::Down,
            Axis::Horizontal => Direction::Right,
        }
    }
}

impl Locator<'_> {
    /// Link vertically stacked similar siblings.
    ///
    /// Every linked node is added to `similar` and dropped from `check`.
    pub(super) fn link_vertical_siblings(&mut self, check: &mut Vec<NodeId>, similar: &mut Vec<NodeId>) {
        self.link_siblings(Axis::Vertical, check, similar, None);
    }

    /// Link side by side similar siblings.
    ///
    /// Linked nodes are also collected in `row_members`, sorted by position.
    pub(super) fn link_horizontal_siblings(
        &mut self,
        check: &mut Vec<NodeId>,
        similar: &mut Vec<NodeId>,
        row_members: &mut Vec<NodeId>,
    ) {
        self.link_siblings(Axis::Horizontal, check, similar, Some(row_members));
        sort_by_position(self.tree, row_members);
    }

    fn link_siblings(
        &mut self,
        axis: Axis,
        check: &mut Vec<NodeId>,
        similar: &mut Vec<NodeId>,
        mut row_members: Option<&mut Vec<NodeId>>,
    ) {
        let forward = axis.forward();
        let back = forward.opposite();
        let mut links = 0usize;

        for i in 0..check.len().saturating_sub(1) {
            let a = check[i];
            for j in i + 1..check.len() {
                let b = check[j];
                if !self.siblings(a, b) || !self.aligned(axis, a, b) || !self.similar(a, b) {
                    continue;
                }
                if let Some(row) = row_members.as_deref_mut() {
                    push_unique(row, a);
                    push_unique(row, b);
                }
                push_unique(similar, a);
                push_unique(similar, b);

                self.chains.set_next(a, b, forward);
                match self.chains.prev(b) {
                    None => self.chains.set_prev(b, a, back),
                    Some(p) => {
                        // `b` already follows `p`: slot `a` in between.
                        if let Some(old) = self.chains.prev(a) {
                            self.chains.clear_next(old.node);
                        }
                        self.chains.set_next(p.node, a, forward);
                        self.chains.set_prev(a, p.node, back);
                        self.chains.set_prev(b, a, back);
                    }
                }
                links += 1;
                break;
            }
        }

        check.retain(|n| !similar.contains(n));
        tracing::debug!(?axis, links, similar = similar.len(), "sibling linking");
    }

    fn siblings(&self, a: NodeId, b: NodeId) -> bool {
        self.tree.node(a).parent() == self.tree.node(b).parent()
    }

    fn aligned(&self, axis: Axis, a: NodeId, b: NodeId) -> bool {
        let (ra, rb) = (self.tree.rect(a), self.tree.rect(b));
        match axis {
            Axis::Vertical => vertically_aligned(ra, rb),
            Axis::Horizontal => horizontally_aligned(ra, rb),
        }
    }

    /// Hook rows of a grid into a vertical chain.
    ///
    /// A node that is only linked sideways looks for a similar node straight
    /// below it in `similar` (sorted by position), then straight above it, and
    /// trades its row links for a vertical link to that node.
    pub(super) fn link_grid_rows(&mut self, row_members: &[NodeId], similar: &[NodeId]) {
        for &a in row_members {
            let in_row = self.chains.prev(a).is_some_and(|l| l.direction == Direction::Left)
                || self.chains.next(a).is_some_and(|l| l.direction == Direction::Right);
            if !in_row {
                continue;
            }
            let Some(pos) = similar.iter().position(|&n| n == a) else {
                continue;
            };

            let below = similar[pos + 1..]
                .iter()
                .copied()
                .find(|&b| vertically_aligned(self.tree.rect(a), self.tree.rect(b)) && self.similar(a, b));
            if let Some(b) = below {
                self.drop_row_links(a);
                match self.chains.prev(b) {
                    Some(p) if p.direction != Direction::Left => {
                        if self.tree.rect(p.node).top < self.tree.rect(a).top {
                            self.chains.link(p.node, a, Direction::Down);
                            self.chains.link(a, b, Direction::Down);
                        } else {
                            self.chains.link(a, p.node, Direction::Down);
                        }
                    }
                    _ => {
                        self.drop_row_links(b);
                        self.chains.link(a, b, Direction::Down);
                    }
                }
                continue;
            }

            let above = similar[..=pos]
                .iter()
                .rev()
                .copied()
                .find(|&b| vertically_aligned(self.tree.rect(b), self.tree.rect(a)) && self.similar(a, b));
            if let Some(b) = above {
                self.drop_row_links(a);
                match self.chains.next(b) {
                    Some(n) if n.direction != Direction::Right => {
                        let tail = self.chains.tail(b);
                        self.chains.link(tail, a, Direction::Down);
                    }
                    _ => {
                        self.drop_row_links(b);
                        self.chains.link(b, a, Direction::Down);
                    }
                }
            }
        }
    }

    pub(super) fn drop_row_links(&mut self, id: NodeId) {
        self.chains.remove_left_link(id);
        self.chains.remove_right_link(id);
    }

    /// Join chains whose roots are similar and share a width or a left edge:
    /// the tail of one chain links to the root of the other, and the absorbed
    /// root leaves `roots`.
    pub(super) fn link_roots(&mut self, roots: &mut Vec<NodeId>) {
        let mut absorbed = Vec::new();
        for i in 0..roots.len() {
            let a = roots[i];
            for j in 0..roots.len() {
                let b = roots[j];
                if i == j || self.chains.prev(a).is_some() {
                    continue;
                }
                let (ra, rb) = (self.tree.rect(a), self.tree.rect(b));
                if ra.width() != rb.width() && ra.left != rb.left {
                    continue;
                }
                if !self.similar(a, b) {
                    continue;
                }
                if self.chains.prev(b).is_none() {
                    let tail = self.chains.tail(a);
                    self.chains.link(tail, b, Direction::Right);
                    absorbed.push(b);
                } else {
                    let tail = self.chains.tail(b);
                    self.chains.link(tail, a, Direction::Right);
                    absorbed.push(a);
                }
                break;
            }
        }
        roots.retain(|r| !absorbed.contains(r));
    }
}

fn push_unique(list: &mut Vec<NodeId>, id: NodeId) {
    if !list.contains(&id) {
        list.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use crate::page::DocumentSize;
    use crate::records::{extract_records, Link, Region};
    use crate::tree::{Node, Rect, Style, StyleProperty, Tree};

    fn styled(tag: &str, rect: Rect) -> Node {
        Node::element(tag, rect).with_style(Style::new().with(StyleProperty::Color, "black"))
    }

    fn document() -> DocumentSize {
        DocumentSize {
            width: 1000,
            height: 1000,
        }
    }

    /// Cards of 150x90 laid out `per_row` to a row, 200 apart across and 100
    /// apart down. `lengths` gives the number of cards in each row.
    fn card_grid(lengths: &[usize]) -> (Tree, NodeId, Vec<NodeId>) {
        let mut tree = Tree::new();
        let body = tree.set_root(styled("body", Rect::new(0, 0, 1000, 1000)));
        let bottom = 100 + 100 * lengths.len() as i64;
        let grid = tree.append_child(body, styled("div", Rect::new(100, 100, 900, bottom)));
        let mut cards = Vec::new();
        for (r, &len) in lengths.iter().enumerate() {
            for c in 0..len {
                let (left, top) = (100 + 200 * c as i64, 100 + 100 * r as i64);
                let card = tree.append_child(grid, styled("div", Rect::new(left, top, left + 150, top + 90)));
                let label = tree.append_child(card, styled("span", Rect::new(left, top, left + 100, top + 20)));
                tree.append_text(label, format!("item {r}-{c}"));
                cards.push(card);
            }
        }
        (tree, body, cards)
    }

    fn record_nodes(tree: &Tree, body: NodeId) -> Vec<NodeId> {
        let region = Region::whole_page(body, document());
        extract_records(tree, region, document(), &Options::default())
            .into_iter()
            .map(|r| r.node)
            .collect()
    }

    fn down(node: NodeId) -> Option<Link> {
        Some(Link {
            node,
            direction: Direction::Down,
        })
    }

    #[test]
    fn three_by_four_grid_is_read_row_major() {
        let (tree, body, cards) = card_grid(&[4, 4, 4]);
        assert_eq!(record_nodes(&tree, body), cards);
    }

    #[test]
    fn four_by_three_grid_is_read_row_major() {
        let (tree, body, cards) = card_grid(&[3, 3, 3, 3]);
        assert_eq!(record_nodes(&tree, body), cards);
    }

    #[test]
    fn short_last_row_is_kept() {
        let (tree, body, cards) = card_grid(&[4, 4, 2]);
        let records = record_nodes(&tree, body);
        assert_eq!(records.len(), 10);
        assert_eq!(records, cards);
    }

    #[test]
    fn row_member_links_down_to_card_below() {
        let mut tree = Tree::new();
        let root = tree.set_root(styled("div", Rect::new(0, 0, 1000, 1000)));
        let r0 = tree.append_child(root, styled("div", Rect::new(0, 0, 150, 90)));
        let r1 = tree.append_child(root, styled("div", Rect::new(200, 0, 350, 90)));
        let r2 = tree.append_child(root, styled("div", Rect::new(400, 0, 550, 90)));
        let below = tree.append_child(root, styled("div", Rect::new(0, 100, 150, 190)));

        let options = Options::default();
        let mut locator = Locator::new(&tree, &options);
        locator.chains.link(r0, r1, Direction::Right);
        locator.chains.link(r1, r2, Direction::Right);
        locator.link_grid_rows(&[r0, r1, r2], &[r0, r1, r2, below]);

        assert_eq!(locator.chains.next(r0), down(below));
        assert!(locator.chains.prev(r1).is_none());
        // Members without a partner below keep their row link.
        assert_eq!(locator.chains.next(r1).map(|l| l.node), Some(r2));
    }

    #[test]
    fn row_member_links_up_to_card_above() {
        let mut tree = Tree::new();
        let root = tree.set_root(styled("div", Rect::new(0, 0, 1000, 1000)));
        let above = tree.append_child(root, styled("div", Rect::new(0, 0, 150, 90)));
        let r0 = tree.append_child(root, styled("div", Rect::new(0, 100, 150, 190)));
        let r1 = tree.append_child(root, styled("div", Rect::new(200, 100, 350, 190)));

        let options = Options::default();
        let mut locator = Locator::new(&tree, &options);
        locator.chains.link(r0, r1, Direction::Right);
        locator.link_grid_rows(&[r0, r1], &[above, r0, r1]);

        assert_eq!(locator.chains.next(above), down(r0));
        assert!(locator.chains.prev(r1).is_none());
    }

    #[test]
    fn row_member_is_slotted_into_a_column() {
        let mut tree = Tree::new();
        let root = tree.set_root(styled("div", Rect::new(0, 0, 1000, 1000)));
        let top = tree.append_child(root, styled("div", Rect::new(0, 0, 150, 90)));
        let middle = tree.append_child(root, styled("div", Rect::new(0, 100, 150, 190)));
        let beside = tree.append_child(root, styled("div", Rect::new(200, 100, 350, 190)));
        let bottom = tree.append_child(root, styled("div", Rect::new(0, 200, 150, 290)));

        let options = Options::default();
        let mut locator = Locator::new(&tree, &options);
        locator.chains.link(top, bottom, Direction::Down);
        locator.chains.link(middle, beside, Direction::Right);
        locator.link_grid_rows(&[middle, beside], &[top, middle, beside, bottom]);

        assert_eq!(locator.chains.members(top), vec![top, middle, bottom]);
        assert!(locator.chains.prev(beside).is_none());
    }

    #[test]
    fn roots_of_equal_width_merge() {
        let mut tree = Tree::new();
        let root = tree.set_root(styled("div", Rect::new(0, 0, 1000, 1000)));
        let a0 = tree.append_child(root, styled("div", Rect::new(0, 0, 150, 90)));
        let a1 = tree.append_child(root, styled("div", Rect::new(0, 100, 150, 190)));
        let b0 = tree.append_child(root, styled("div", Rect::new(200, 0, 350, 90)));
        let b1 = tree.append_child(root, styled("div", Rect::new(200, 100, 350, 190)));

        let options = Options::default();
        let mut locator = Locator::new(&tree, &options);
        locator.chains.link(a0, a1, Direction::Down);
        locator.chains.link(b0, b1, Direction::Down);
        let mut roots = vec![a0, b0];
        locator.link_roots(&mut roots);

        assert_eq!(roots, vec![a0]);
        assert_eq!(locator.chains.members(a0), vec![a0, a1, b0, b1]);
    }

    #[test]
    fn roots_sharing_a_left_edge_merge() {
        let mut tree = Tree::new();
        let root = tree.set_root(styled("div", Rect::new(0, 0, 1000, 1000)));
        let narrow = tree.append_child(root, styled("div", Rect::new(0, 0, 150, 90)));
        let wide = tree.append_child(root, styled("div", Rect::new(0, 300, 400, 390)));

        let options = Options::default();
        let mut locator = Locator::new(&tree, &options);
        let mut roots = vec![narrow, wide];
        locator.link_roots(&mut roots);

        assert_eq!(roots, vec![narrow]);
        assert_eq!(locator.chains.members(narrow), vec![narrow, wide]);
    }

    #[test]
    fn roots_differing_in_width_and_left_stay_apart() {
        let mut tree = Tree::new();
        let root = tree.set_root(styled("div", Rect::new(0, 0, 1000, 1000)));
        let a = tree.append_child(root, styled("div", Rect::new(0, 0, 150, 90)));
        let b = tree.append_child(root, styled("div", Rect::new(200, 0, 500, 90)));

        let options = Options::default();
        let mut locator = Locator::new(&tree, &options);
        let mut roots = vec![a, b];
        locator.link_roots(&mut roots);

        assert_eq!(roots, vec![a, b]);
        assert!(locator.chains.next(a).is_none());
    }
}
