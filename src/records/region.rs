//! Main region selection and the geometric predicates the linking passes use.

use tracing::{debug, info};

use crate::options::Options;
use crate::page::DocumentSize;
use crate::tree::{NodeId, Rect, Tree};

/// The area records are searched in and the point chains are ranked against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    /// Root of the searched subtree.
    pub root: NodeId,
    /// Horizontal reference point.
    pub center_x: f64,
    /// Vertical reference point.
    pub center_y: f64,
}

impl Region {
    /// A main region ranks chains against its own center.
    #[must_use]
    pub fn main(tree: &Tree, root: NodeId) -> Self {
        let rect = tree.rect(root);
        Self {
            root,
            center_x: rect.center_x(),
            center_y: rect.center_y(),
        }
    }

    /// The whole page ranks chains against the document center.
    #[must_use]
    pub fn whole_page(root: NodeId, document: DocumentSize) -> Self {
        Self {
            root,
            center_x: document.center_x(),
            center_y: document.center_y(),
        }
    }
}

/// Pick the main content region of a page.
///
/// Candidates are nodes strictly smaller than the document, fully above its
/// bottom edge, below its top edge and covering at least
/// `main_region_min_area_ratio` of it. The candidate whose horizontal center
/// is nearest the document's wins; the first one found wins a tie.
#[must_use]
pub fn find_main_region(tree: &Tree, document: DocumentSize, options: &Options) -> Option<NodeId> {
    let root = tree.root()?;
    let doc_area = document.area();
    let min_area = doc_area as f64 * options.main_region_min_area_ratio;
    let doc_center_x = document.center_x();

    let mut best: Option<(NodeId, f64)> = None;
    let mut candidates = 0usize;
    for &id in &tree.preorder(root).nodes {
        let rect = tree.rect(id);
        let area = rect.area();
        if area < doc_area && rect.bottom < document.height && rect.top > 0 && area as f64 >= min_area {
            candidates += 1;
            let offset = (doc_center_x - rect.center_x()).abs();
            if best.is_none_or(|(_, b)| offset < b) {
                best = Some((id, offset));
            }
        }
    }

    debug!(candidates, "main region candidates");
    if best.is_none() {
        info!("No main data region found");
    }
    best.map(|(id, _)| id)
}

/// Same left edge with `a` strictly above `b`.
#[must_use]
pub fn vertically_aligned(a: &Rect, b: &Rect) -> bool {
    a.left == b.left && a.bottom < b.bottom && a.top < b.top
}

/// Same top edge and width with `a` strictly left of `b`.
#[must_use]
pub fn horizontally_aligned(a: &Rect, b: &Rect) -> bool {
    a.top == b.top && a.width() == b.width() && a.left < b.left && a.right < b.right
}

/// Stable sort by `(top, left)` ascending.
pub fn sort_by_position(tree: &Tree, nodes: &mut [NodeId]) {
    nodes.sort_by_key(|id| {
        let r = tree.rect(*id);
        (r.top, r.left)
    });
}

/// Stable sort by `(top, left)` descending.
pub fn sort_by_position_desc(tree: &Tree, nodes: &mut [NodeId]) {
    nodes.sort_by(|a, b| {
        let (ra, rb) = (tree.rect(*a), tree.rect(*b));
        (rb.top, rb.left).cmp(&(ra.top, ra.left))
    });
}
