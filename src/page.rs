//! A laid-out page: its visual tree, optional block tree and document size.

use crate::error::{Error, Result};
use crate::provider::build_block_tree;
use crate::tree::{Tree, TreeKind};

/// Rendered document extent in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentSize {
    /// Full scroll width.
    pub width: i64,
    /// Full scroll height.
    pub height: i64,
}

impl DocumentSize {
    /// Width times height.
    #[must_use]
    pub fn area(&self) -> i64 {
        self.width * self.height
    }

    /// Horizontal center.
    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.width as f64 / 2.0
    }

    /// Vertical center.
    #[must_use]
    pub fn center_y(&self) -> f64 {
        self.height as f64 / 2.0
    }
}

/// Everything the extraction core needs to know about one page.
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// One node per rendered element.
    pub visual: Tree,
    /// Coarser tree whose nodes represent groups of visual nodes.
    pub blocks: Option<Tree>,
    /// Document extent.
    pub document: DocumentSize,
    /// Address the page was rendered from, if known.
    pub url: Option<String>,
}

impl Page {
    /// Page over a visual tree with no block tree.
    #[must_use]
    pub fn new(visual: Tree, document: DocumentSize) -> Self {
        Self {
            visual,
            blocks: None,
            document,
            url: None,
        }
    }

    /// Attach the default one-block-per-element block tree.
    #[must_use]
    pub fn with_block_tree(mut self) -> Self {
        self.blocks = Some(build_block_tree(&self.visual));
        self
    }

    /// Check both trees for dangling or inconsistent handles.
    pub fn validate(&self) -> Result<()> {
        self.visual.validate()?;
        if let Some(blocks) = &self.blocks {
            blocks.validate()?;
            for id in blocks.ids() {
                for represented in &blocks.node(id).represents {
                    if self.visual.get(*represented).is_none() {
                        return Err(Error::MalformedTree(format!(
                            "block {} represents missing visual node {}",
                            id.0, represented.0
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Locator tree for `kind`, building a block tree on the fly when the
    /// page has none.
    pub(crate) fn tree_for(&self, kind: TreeKind) -> std::borrow::Cow<'_, Tree> {
        use std::borrow::Cow;

        match (kind, &self.blocks) {
            (TreeKind::Visual, _) => Cow::Borrowed(&self.visual),
            (TreeKind::Block, Some(blocks)) => Cow::Borrowed(blocks),
            (TreeKind::Block, None) => Cow::Owned(build_block_tree(&self.visual)),
        }
    }
}
