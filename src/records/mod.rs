//! Record region locator.
//!
//! Finds the repeating chain of similar nodes that makes up the data records
//! of a region. Nodes are linked into chains in several passes:
//!
//! 1. Vertically stacked similar siblings are linked, then side by side ones.
//! 2. Where chained nodes nest, either the parent or its chained children are
//!    dropped (see [`hierarchy`]).
//! 3. Rows of a grid are hooked into a vertical chain and remaining sideways
//!    links are dropped.
//! 4. Chains whose roots look alike are joined.
//!
//! Each surviving chain is ranked by the distance of its bounding box center
//! to the region center, after chains with large vertical gaps (filter and
//! facet lists) are discarded. The closest chain holds the records.

pub mod chain;
pub mod hierarchy;
mod linking;
pub mod region;

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::options::Options;
use crate::page::DocumentSize;
use crate::similarity::normalized_similarity;
use crate::tree::{NodeId, Rect, Tree};

pub use chain::{Chains, Direction, Link};
pub use region::{find_main_region, sort_by_position, Region};

/// Root of one repeating unit, numbered from 1 in chain order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DataRecord {
    /// 1-based position in the record chain.
    pub id: usize,
    /// Root node of the record in the locator tree.
    pub node: NodeId,
}

/// Working state of one record search.
pub(crate) struct Locator<'a> {
    pub(crate) tree: &'a Tree,
    pub(crate) options: &'a Options,
    pub(crate) chains: Chains,
    scores: HashMap<(NodeId, NodeId), f64>,
}

impl<'a> Locator<'a> {
    fn new(tree: &'a Tree, options: &'a Options) -> Self {
        Self {
            tree,
            options,
            chains: Chains::new(),
            scores: HashMap::new(),
        }
    }

    /// Normalized similarity of `a` (control) and `b` (test) reaches the
    /// linking threshold.
    pub(crate) fn similar(&mut self, a: NodeId, b: NodeId) -> bool {
        let tree = self.tree;
        let score = *self
            .scores
            .entry((a, b))
            .or_insert_with(|| normalized_similarity(tree, a, tree, b));
        score >= self.options.similarity_threshold
    }
}

/// A materialized chain and its distance to the region center.
#[derive(Debug, Clone)]
struct Candidate {
    members: Vec<NodeId>,
    distance: f64,
}

/// Find the data records of `region`.
///
/// Returns an empty list when no chain survives.
#[must_use]
pub fn extract_records(tree: &Tree, region: Region, document: DocumentSize, options: &Options) -> Vec<DataRecord> {
    let mut locator = Locator::new(tree, options);

    let mut nodes = tree.preorder(region.root).nodes;
    sort_by_position(tree, &mut nodes);
    debug!(nodes = nodes.len(), "record search");

    let mut check = nodes;
    let mut similar = Vec::new();
    locator.link_vertical_siblings(&mut check, &mut similar);
    let mut row_members = Vec::new();
    locator.link_horizontal_siblings(&mut check, &mut similar, &mut row_members);

    let removable = hierarchy::removable_nodes(tree, &similar, options);
    for &node in &removable {
        if let Some(prev) = locator.chains.prev(node) {
            locator.chains.clear_next(prev.node);
            locator.chains.clear_prev(node);
        }
        if let Some(pos) = similar.iter().position(|&n| n == node) {
            similar.remove(pos);
        }
    }
    sort_by_position(tree, &mut similar);
    debug!(removed = removable.len(), similar = similar.len(), "nested chains resolved");

    locator.link_grid_rows(&row_members, &similar);
    for &node in &similar {
        locator.drop_row_links(node);
    }

    let mut roots: Vec<NodeId> = similar
        .iter()
        .copied()
        .filter(|&n| locator.chains.prev(n).is_none())
        .collect();
    sort_by_position(tree, &mut roots);
    locator.link_roots(&mut roots);

    let candidates: Vec<Candidate> = roots
        .iter()
        .map(|&root| {
            let mut members = locator.chains.members(root);
            sort_by_position(tree, &mut members);
            let distance = Rect::bounding(members.iter().map(|m| tree.rect(*m))).map_or(f64::INFINITY, |b| {
                (b.center_x() - region.center_x).hypot(b.center_y() - region.center_y)
            });
            Candidate { members, distance }
        })
        .collect();
    let total = candidates.len();

    let gap_limit = document.height as f64 * options.filter_block_gap_ratio;
    let candidates: Vec<Candidate> = candidates
        .into_iter()
        .filter(|c| !is_filter_block(tree, &c.members, gap_limit))
        .collect();
    debug!(chains = total, filtered = total - candidates.len(), "chains materialized");

    let best = candidates
        .into_iter()
        .fold(None::<Candidate>, |best, c| match best {
            Some(b) if b.distance <= c.distance => Some(b),
            _ => Some(c),
        });

    let Some(best) = best else {
        info!("0 data records found");
        return Vec::new();
    };
    info!("{} data records found", best.members.len());
    best.members
        .into_iter()
        .enumerate()
        .map(|(i, node)| DataRecord { id: i + 1, node })
        .collect()
}

/// True when two consecutive chain members are separated by a vertical gap
/// larger than `gap_limit`.
#[must_use]
pub fn is_filter_block(tree: &Tree, members: &[NodeId], gap_limit: f64) -> bool {
    members.windows(2).any(|pair| {
        let (a, b) = (tree.rect(pair[0]), tree.rect(pair[1]));
        let a_end = a.top + a.height();
        a_end < b.top && (b.top - a_end) as f64 > gap_limit
    })
}
