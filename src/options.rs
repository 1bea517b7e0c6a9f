//! Configuration options for record extraction.
//!
//! The `Options` struct carries the locator thresholds and the tree/visibility
//! switches. Comparator and subtree-alignment constants are fixed and live in
//! their own modules.

use crate::tree::TreeKind;

/// Part of the page searched for records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// The main content region, ranked against its own center.
    #[default]
    MainRegion,
    /// The whole page, ranked against the document center.
    WholePage,
}

/// Configuration options for record extraction.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for the standard settings.
///
/// # Example
///
/// ```rust
/// use recordminer::{Options, TreeKind};
///
/// let options = Options {
///     tree_kind: TreeKind::Visual,
///     fallback_to_whole_page: true,
///     ..Options::default()
/// };
/// assert!((options.similarity_threshold - 0.4).abs() < f64::EPSILON);
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Which tree the record locator runs over.
    ///
    /// When `Block` is selected and the page carries no block tree, a
    /// one-block-per-element tree is built from the visual tree.
    ///
    /// Default: `TreeKind::Block`
    pub tree_kind: TreeKind,

    /// Minimum normalized subtree similarity for two nodes to be linked into
    /// one chain (sibling linking, grid stitching and root merging).
    ///
    /// Default: `0.4`
    pub similarity_threshold: f64,

    /// Minimum share of the document area a node must cover to be a main
    /// region candidate.
    ///
    /// Default: `0.2`
    pub main_region_min_area_ratio: f64,

    /// Vertical gap between consecutive chain members, as a share of the
    /// document height, above which the chain is treated as a filter block.
    ///
    /// Default: `0.2`
    pub filter_block_gap_ratio: f64,

    /// Share of a chained node's area its chained children must cover (after
    /// padding a short last grid row) for the node to stand as one unit.
    ///
    /// Default: `0.6`
    pub grid_area_ratio: f64,

    /// A chained node replaces its chained children only when it has strictly
    /// more children than this.
    ///
    /// Default: `3`
    pub min_grid_children: usize,

    /// Scan the whole page when no main region candidate exists.
    ///
    /// When false a page without a main region yields an empty result.
    ///
    /// Default: `false`
    pub fallback_to_whole_page: bool,

    /// Build the visual tree in visibility-only mode when parsing a layout dump.
    ///
    /// Default: `true`
    pub visible_only: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tree_kind: TreeKind::Block,
            similarity_threshold: 0.4,
            main_region_min_area_ratio: 0.2,
            filter_block_gap_ratio: 0.2,
            grid_area_ratio: 0.6,
            min_grid_children: 3,
            fallback_to_whole_page: false,
            visible_only: true,
        }
    }
}
