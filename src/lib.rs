//! # recordminer
//!
//! Structured data record extraction from rendered web pages.
//!
//! A list or grid page (search results, product listings, directories) shows
//! the same kind of item many times, each rendered with the same structure and
//! style. This library finds that repeating unit in a page's layout tree and
//! aligns the fields of every occurrence into a table.
//!
//! ## Quick Start
//!
//! ```rust
//! use recordminer::tree::{Node, Rect, Style, StyleProperty, Tree};
//! use recordminer::{extract_from_whole_page, DocumentSize, Page};
//!
//! let style = Style::new().with(StyleProperty::Color, "black");
//! let mut tree = Tree::new();
//! let body = tree.set_root(Node::element("body", Rect::new(0, 0, 1000, 1000)).with_style(style.clone()));
//! let ul = tree.append_child(body, Node::element("ul", Rect::new(0, 100, 1000, 400)).with_style(style.clone()));
//! for (i, name) in ["Alpha", "Beta", "Gamma"].iter().enumerate() {
//!     let top = 100 + 100 * i as i64;
//!     let li = tree.append_child(ul, Node::element("li", Rect::new(0, top, 1000, top + 90)).with_style(style.clone()));
//!     let span = tree.append_child(li, Node::element("span", Rect::new(0, top, 500, top + 20)).with_style(style.clone()));
//!     tree.append_text(span, *name);
//! }
//!
//! let page = Page::new(tree, DocumentSize { width: 1000, height: 1000 });
//! let result = extract_from_whole_page(&page)?;
//! assert_eq!(result.record_count(), 3);
//! assert_eq!(result.content_table[1], vec!["2".to_string(), "Beta".to_string()]);
//! # Ok::<(), recordminer::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! - **Tree model**: a visual tree of rendered elements and an optional block
//!   tree summarizing it ([`tree`], [`page`])
//! - **Node comparator** and **subtree aligner**: style and structure
//!   similarity of two nodes ([`compare`], [`similarity`])
//! - **Record region locator**: chains of similar nodes, the best of which
//!   holds the records ([`records`])
//! - **Data item aligner**: record leaves aligned into columns ([`items`])
//! - **Table renderer**: text, CSV and HTML output ([`table`])
//!
//! Layout trees come either from code or from an annotated layout dump read
//! by [`provider`].

mod error;
mod options;
mod patterns;
mod result;

/// DOM operations adapter over `dom_query` node handles.
pub mod dom;

/// Character encoding detection and transcoding of layout dumps.
pub mod encoding;

/// Arena layout tree, geometry and computed style.
pub mod tree;

/// A laid-out page with its trees and document size.
pub mod page;

/// Node comparator (style and geometry match of two nodes).
pub mod compare;

/// Subtree aligner (weighted tree mapping and similarity score).
pub mod similarity;

/// Record region locator.
pub mod records;

/// Data item aligner.
pub mod items;

/// Text, CSV and HTML rendering of aligned tables.
pub mod table;

/// Annotated layout dump parsing, block tree construction and tree listings.
pub mod provider;

use tracing::{debug, info};

// Public API - re-exports
pub use error::{Error, Result};
pub use options::{Options, Scope};
pub use page::{DocumentSize, Page};
pub use records::DataRecord;
pub use result::ExtractionResult;
pub use tree::{Node, NodeId, Rect, Tree, TreeKind};

use items::align_data_items;
use records::{find_main_region, Region};

/// Extracts the data records of the page's main region with default options.
///
/// # Example
///
/// ```rust
/// use recordminer::{extract_from_main_region, DocumentSize, Node, Page, Rect, Tree};
///
/// // A single element is no main region: nothing is found, which is not an error.
/// let mut tree = Tree::new();
/// tree.set_root(Node::element("body", Rect::new(0, 0, 800, 600)));
/// let page = Page::new(tree, DocumentSize { width: 800, height: 600 });
/// assert!(extract_from_main_region(&page)?.is_empty());
/// # Ok::<(), recordminer::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn extract_from_main_region(page: &Page) -> Result<ExtractionResult> {
    extract_from_main_region_with_options(page, &Options::default())
}

/// Extracts the data records of the page's main region.
///
/// A page without a main region yields an empty result unless
/// `options.fallback_to_whole_page` is set.
///
/// # Errors
///
/// Returns [`Error::MalformedTree`] when the page's trees are inconsistent.
pub fn extract_from_main_region_with_options(page: &Page, options: &Options) -> Result<ExtractionResult> {
    run(page, Scope::MainRegion, options)
}

/// Extracts the data records of the whole page with default options.
#[allow(clippy::missing_errors_doc)]
pub fn extract_from_whole_page(page: &Page) -> Result<ExtractionResult> {
    extract_from_whole_page_with_options(page, &Options::default())
}

/// Extracts the data records of the whole page, ranking chains against the
/// document center.
///
/// # Errors
///
/// Returns [`Error::MalformedTree`] when the page's trees are inconsistent.
pub fn extract_from_whole_page_with_options(page: &Page, options: &Options) -> Result<ExtractionResult> {
    run(page, Scope::WholePage, options)
}

/// Parses an annotated layout dump and extracts its records with default
/// options.
#[allow(clippy::missing_errors_doc)]
pub fn extract_html(html: &str, scope: Scope) -> Result<ExtractionResult> {
    extract_html_with_options(html, scope, &Options::default())
}

/// Parses an annotated layout dump and extracts its records.
///
/// # Errors
///
/// Any error of [`provider::parse_layout_dump`].
pub fn extract_html_with_options(html: &str, scope: Scope, options: &Options) -> Result<ExtractionResult> {
    let page = provider::parse_layout_dump(html, options)?;
    run(&page, scope, options)
}

/// Extracts records from an undecoded layout dump with automatic encoding
/// detection.
///
/// The encoding comes from a byte order mark, `<meta charset="...">` or
/// `<meta http-equiv="Content-Type" content="...; charset=...">`, defaulting
/// to UTF-8. Invalid sequences become U+FFFD.
#[allow(clippy::missing_errors_doc)]
pub fn extract_bytes(html: &[u8], scope: Scope) -> Result<ExtractionResult> {
    extract_bytes_with_options(html, scope, &Options::default())
}

/// [`extract_bytes`] with custom options.
#[allow(clippy::missing_errors_doc)]
pub fn extract_bytes_with_options(html: &[u8], scope: Scope, options: &Options) -> Result<ExtractionResult> {
    let html = encoding::decode_layout_dump(html)?;
    extract_html_with_options(&html, scope, options)
}

fn run(page: &Page, scope: Scope, options: &Options) -> Result<ExtractionResult> {
    page.validate()?;
    let kind = options.tree_kind;
    let tree = page.tree_for(kind);
    let Some(root) = tree.root() else {
        return Ok(ExtractionResult::default());
    };

    let region = match scope {
        Scope::WholePage => Region::whole_page(root, page.document),
        Scope::MainRegion => match find_main_region(&tree, page.document, options) {
            Some(main) => Region::main(&tree, main),
            None if options.fallback_to_whole_page => {
                debug!("falling back to whole page");
                Region::whole_page(root, page.document)
            }
            None => return Ok(ExtractionResult::default()),
        },
    };

    let records = records::extract_records(&tree, region, page.document, options);
    if records.is_empty() {
        return Ok(ExtractionResult::default());
    }

    let table = align_data_items(&tree, &page.visual, kind, &records);
    info!(
        records = records.len(),
        columns = table.data_columns(),
        "records aligned"
    );

    let csv_table = table::csv_table(&table.content);
    Ok(ExtractionResult {
        text: table::render_text(&table.content),
        csv_table,
        content_table: table.content,
        node_table: table.nodes,
        records,
    })
}
