//! Layout tree provider.
//!
//! The browser side of the pipeline walks a rendered page and writes every
//! element back out with its layout annotated as attributes:
//!
//! - `left`, `top`, `right`, `bottom`: absolute geometry in CSS pixels
//! - `css_<property>` for each [`StyleProperty`]
//! - optionally `css_visibility`, `xpath`, `node_name`
//! - on `<body>` (or `<html>`): optionally `doc_width`, `doc_height`, `tree_name`
//!
//! This module reads such a dump back into a [`Page`]. In visibility-only mode
//! elements that would not paint anything are left out of the visual tree and
//! their visible descendants hang off the nearest included ancestor.

mod block;
mod dump;

use tracing::debug;

use crate::dom::{self, Document, NodeRef};
use crate::error::{Error, Result};
use crate::options::Options;
use crate::page::{DocumentSize, Page};
use crate::patterns::FUNCTIONAL_COLOR;
use crate::tree::{Node, NodeId, Rect, Style, StyleProperty, Tree, TreeKind};

pub use block::build_block_tree;
pub use dump::dump_tree;

/// Elements that always paint something when they have a size.
const MEDIA_TAGS: &[&str] = &["img", "video", "audio", "embed"];

/// Parse an annotated layout dump into a page.
///
/// A block tree is attached when `options.tree_kind` asks for one.
///
/// # Errors
///
/// - [`Error::ParseError`] when the input holds no document
/// - [`Error::MalformedNode`] when an element lacks an integer geometry
///   attribute or one of the style attributes
/// - [`Error::NoVisibleRoot`] when the root element itself is filtered out
///
/// ```
/// use recordminer::provider::parse_layout_dump;
/// use recordminer::Options;
///
/// let mut options = Options::default();
/// options.visible_only = false;
/// let err = parse_layout_dump("<body><div>no layout</div></body>", &options).unwrap_err();
/// assert!(matches!(err, recordminer::Error::MalformedNode { .. }));
/// ```
pub fn parse_layout_dump(html: &str, options: &Options) -> Result<Page> {
    if html.trim().is_empty() {
        return Err(Error::ParseError("empty layout dump".to_string()));
    }
    let doc = Document::from(html);
    let root = dom::query_selector(&doc, "body")
        .or_else(|| dom::query_selector(&doc, "html"))
        .ok_or_else(|| Error::ParseError("layout dump has no root element".to_string()))?;

    let mut builder = TreeBuilder {
        tree: Tree::new(),
        visible_only: options.visible_only,
    };
    let root_xpath = format!("/{}", dom::tag_name(&root).unwrap_or_default().to_ascii_uppercase());
    builder.visit(&root, root_xpath, None)?;
    let visual = builder.tree;
    let root_id = visual.root().ok_or(Error::NoVisibleRoot)?;

    let document = document_size(&doc, &root, visual.rect(root_id))?;
    let mut page = Page::new(visual, document);
    page.url = dom::attribute_value(&root, "tree_name");
    if options.tree_kind == TreeKind::Block {
        page = page.with_block_tree();
    }
    page.validate()?;

    debug!(
        nodes = page.visual.len(),
        width = page.document.width,
        height = page.document.height,
        "layout dump parsed"
    );
    Ok(page)
}

/// Same as [`parse_layout_dump`] for undecoded input.
///
/// # Errors
///
/// Everything [`parse_layout_dump`] returns, plus [`Error::EncodingError`] for
/// an unknown declared charset.
pub fn parse_layout_dump_bytes(bytes: &[u8], options: &Options) -> Result<Page> {
    let html = crate::encoding::decode_layout_dump(bytes)?;
    parse_layout_dump(&html, options)
}

/// Builds the visual tree while walking the DOM.
struct TreeBuilder {
    tree: Tree,
    visible_only: bool,
}

impl TreeBuilder {
    /// Add `element` under `parent` (or as root) and recurse.
    ///
    /// Returns the new node, or `None` when the element was filtered out.
    fn visit(&mut self, element: &NodeRef, xpath: String, parent: Option<Attach>) -> Result<Option<NodeId>> {
        let node = read_node(element, xpath)?;
        let included = match parent {
            None => displayed(element, &node),
            Some(_) => !self.visible_only || is_visible(element, &node),
        };

        if !included {
            let Some(attach) = parent else {
                return Err(Error::NoVisibleRoot);
            };
            // Visible descendants move up to the nearest included ancestor.
            let xpath = node.xpath.clone().unwrap_or_default();
            for (child, child_xpath) in element_children(element, &xpath) {
                self.visit(&child, child_xpath, Some(Attach::Adopted(attach.parent())))?;
            }
            return Ok(None);
        }

        let xpath = node.xpath.clone().unwrap_or_default();
        let id = match parent {
            None => self.tree.set_root(node),
            Some(Attach::Direct(p)) => self.tree.append_child(p, node),
            Some(Attach::Adopted(p)) => self.tree.adopt_child(p, node),
        };

        let mut element_index = 0usize;
        for child in dom::child_nodes(element) {
            if child.is_text() {
                self.tree.append_text(id, dom::text_content(&child).to_string());
            } else if child.is_element() {
                let child_xpath = child_xpath(&xpath, &child, element_index);
                element_index += 1;
                if self.visit(&child, child_xpath, Some(Attach::Direct(id)))?.is_none() {
                    self.tree.append_detached_element(id);
                }
            }
        }
        Ok(Some(id))
    }
}

/// How a new node joins its tree parent.
#[derive(Debug, Clone, Copy)]
enum Attach {
    /// The tree parent is the DOM parent.
    Direct(NodeId),
    /// The DOM parent was filtered out; the node is hoisted.
    Adopted(NodeId),
}

impl Attach {
    fn parent(self) -> NodeId {
        match self {
            Attach::Direct(p) | Attach::Adopted(p) => p,
        }
    }
}

/// Element children of `element` with their computed xpaths.
fn element_children<'a>(element: &NodeRef<'a>, xpath: &str) -> Vec<(NodeRef<'a>, String)> {
    dom::child_nodes(element)
        .into_iter()
        .filter(NodeRef::is_element)
        .enumerate()
        .map(|(i, child)| {
            let path = child_xpath(xpath, &child, i);
            (child, path)
        })
        .collect()
}

fn child_xpath(parent: &str, child: &NodeRef, index: usize) -> String {
    let tag = dom::tag_name(child).unwrap_or_default().to_ascii_uppercase();
    format!("{parent}/{tag}[{index}]")
}

/// Read geometry, style and naming attributes of one element.
fn read_node(element: &NodeRef, xpath: String) -> Result<Node> {
    let xpath = dom::attribute_value(element, "xpath").unwrap_or(xpath);
    let tag = dom::attribute_value(element, "node_name")
        .map(|t| t.to_ascii_lowercase())
        .or_else(|| dom::tag_name(element))
        .unwrap_or_default();

    let rect = Rect::new(
        coordinate(element, "left", &xpath)?,
        coordinate(element, "top", &xpath)?,
        coordinate(element, "right", &xpath)?,
        coordinate(element, "bottom", &xpath)?,
    );

    let mut style = Style::new();
    for &property in StyleProperty::ALL {
        let name = property.attribute_name();
        let value = dom::get_attribute(element, &name).ok_or_else(|| Error::MalformedNode {
            node: xpath.clone(),
            reason: format!("missing style attribute '{name}'"),
        })?;
        style.set(property, value.trim());
    }

    let mut node = Node::element(tag, rect).with_style(style);
    node.xpath = Some(xpath);
    Ok(node)
}

fn coordinate(element: &NodeRef, name: &str, xpath: &str) -> Result<i64> {
    let raw = dom::get_attribute(element, name).ok_or_else(|| Error::MalformedNode {
        node: xpath.to_string(),
        reason: format!("missing geometry attribute '{name}'"),
    })?;
    raw.trim().parse().map_err(|_| Error::MalformedNode {
        node: xpath.to_string(),
        reason: format!("geometry attribute '{name}' is not an integer: '{raw}'"),
    })
}

/// Has a size and is not hidden.
fn displayed(element: &NodeRef, node: &Node) -> bool {
    if node.rect.width() <= 0 || node.rect.height() <= 0 {
        return false;
    }
    !dom::attribute_value(element, "css_visibility").is_some_and(|v| v.eq_ignore_ascii_case("hidden"))
}

/// Whether an element paints anything of its own.
fn is_visible(element: &NodeRef, node: &Node) -> bool {
    if !displayed(element, node) {
        return false;
    }
    if MEDIA_TAGS.contains(&node.tag.as_str()) {
        return true;
    }
    if background_alpha(node.style.get(StyleProperty::BackgroundColor)) > 0.0 {
        return true;
    }
    let image = node.style.get(StyleProperty::BackgroundImage);
    if !image.is_empty() && !image.eq_ignore_ascii_case("none") {
        return true;
    }
    dom::has_direct_text(element)
}

/// Alpha channel of a computed CSS colour, in `0.0..=1.0`.
///
/// Handles `transparent`, `rgb[a]()`/`hsl[a]()` in comma or space syntax and
/// `#rgb[a]`/`#rrggbb[aa]`. Anything else is taken as an opaque named colour.
#[must_use]
pub fn background_alpha(color: &str) -> f64 {
    let color = color.trim();
    if color.is_empty() || color.eq_ignore_ascii_case("transparent") {
        return 0.0;
    }
    if let Some(caps) = FUNCTIONAL_COLOR.captures(color) {
        let args: Vec<&str> = caps[1]
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();
        return match args.get(3) {
            Some(alpha) => parse_alpha(alpha),
            None => 1.0,
        };
    }
    if let Some(hex) = color.strip_prefix('#') {
        let alpha = match hex.len() {
            4 => hex.get(3..4).map(|d| d.repeat(2)),
            8 => hex.get(6..8).map(str::to_string),
            _ => None,
        };
        return alpha
            .and_then(|a| u8::from_str_radix(&a, 16).ok())
            .map_or(1.0, |a| f64::from(a) / 255.0);
    }
    1.0
}

fn parse_alpha(value: &str) -> f64 {
    let parsed = match value.strip_suffix('%') {
        Some(percent) => percent.trim().parse::<f64>().map(|p| p / 100.0),
        None => value.trim().parse::<f64>(),
    };
    parsed.map_or(1.0, |a| a.clamp(0.0, 1.0))
}

/// Document extent from `doc_width`/`doc_height`, else the root's right and
/// bottom edges.
fn document_size(doc: &Document, root: &NodeRef, root_rect: &Rect) -> Result<DocumentSize> {
    let html = dom::query_selector(doc, "html");
    let read = |name: &str| -> Result<Option<i64>> {
        let value = dom::attribute_value(root, name)
            .or_else(|| html.as_ref().and_then(|h| dom::attribute_value(h, name)));
        value
            .map(|v| {
                v.parse().map_err(|_| Error::MalformedNode {
                    node: "document".to_string(),
                    reason: format!("'{name}' is not an integer: '{v}'"),
                })
            })
            .transpose()
    };
    Ok(DocumentSize {
        width: read("doc_width")?.unwrap_or(root_rect.right),
        height: read("doc_height")?.unwrap_or(root_rect.bottom),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Fragment;

    fn attrs(left: i64, top: i64, right: i64, bottom: i64, background: &str) -> String {
        let mut out = format!(r#"left="{left}" top="{top}" right="{right}" bottom="{bottom}""#);
        for property in StyleProperty::ALL {
            let value = match property {
                StyleProperty::BackgroundColor => background,
                StyleProperty::BackgroundImage => "none",
                _ => "0px",
            };
            out.push_str(&format!(r#" {}="{value}""#, property.attribute_name()));
        }
        out
    }

    fn visual_only() -> Options {
        Options {
            tree_kind: TreeKind::Visual,
            ..Options::default()
        }
    }

    #[test]
    fn alpha_parsing() {
        assert!(background_alpha("transparent") == 0.0);
        assert!(background_alpha("") == 0.0);
        assert!(background_alpha("rgba(0, 0, 0, 0)") == 0.0);
        assert!(background_alpha("rgb(255, 0, 0)") == 1.0);
        assert!((background_alpha("rgb(0 0 0 / 50%)") - 0.5).abs() < 1e-9);
        assert!((background_alpha("hsla(0, 0%, 0%, 0.25)") - 0.25).abs() < 1e-9);
        assert!(background_alpha("#ffffff00") == 0.0);
        assert!(background_alpha("#fff0") == 0.0);
        assert!(background_alpha("#fff") == 1.0);
        assert!(background_alpha("white") == 1.0);
    }

    #[test]
    fn builds_tree_with_fragments() {
        let html = format!(
            r#"<body {body} doc_width="1200" doc_height="3000" tree_name="https://shop.example/list">
<div {div}>Price: <span {span}>10</span> EUR</div></body>"#,
            body = attrs(0, 0, 1000, 800, "white"),
            div = attrs(0, 0, 500, 50, "transparent"),
            span = attrs(50, 0, 80, 20, "transparent"),
        );
        let page = parse_layout_dump(&html, &visual_only()).expect("parses");

        assert_eq!(page.document, DocumentSize { width: 1200, height: 3000 });
        assert_eq!(page.url.as_deref(), Some("https://shop.example/list"));
        assert!(page.blocks.is_none());

        let root = page.visual.root().expect("root");
        let div = page.visual.node(root).children()[0];
        let span = page.visual.node(div).children()[0];
        assert_eq!(page.visual.node(div).tag, "div");
        assert_eq!(page.visual.node(div).xpath.as_deref(), Some("/BODY/DIV[0]"));
        assert_eq!(page.visual.node(span).own_text(), "10");
        assert_eq!(
            page.visual.node(div).fragments,
            vec![
                Fragment::Text("Price: ".to_string()),
                Fragment::Element(Some(span)),
                Fragment::Text(" EUR".to_string()),
            ]
        );
    }

    #[test]
    fn invisible_wrapper_is_skipped() {
        let html = format!(
            r#"<body {body}><section {section}><p {p}>kept</p></section><i {empty}></i></body>"#,
            body = attrs(0, 0, 1000, 800, "white"),
            section = attrs(0, 0, 1000, 400, "rgba(0, 0, 0, 0)"),
            p = attrs(0, 0, 1000, 20, "transparent"),
            empty = attrs(0, 0, 0, 0, "red"),
        );
        let page = parse_layout_dump(&html, &visual_only()).expect("parses");
        let root = page.visual.root().expect("root");

        assert_eq!(page.visual.len(), 2);
        let p = page.visual.node(root).children()[0];
        assert_eq!(page.visual.node(p).tag, "p");
        assert_eq!(page.visual.node(p).parent(), Some(root));
        assert_eq!(
            page.visual.node(root).fragments,
            vec![Fragment::Element(None), Fragment::Element(None)]
        );
        // Document size falls back to the root geometry.
        assert_eq!(page.document, DocumentSize { width: 1000, height: 800 });
    }

    #[test]
    fn all_elements_kept_without_visibility_filter() {
        let html = format!(
            r#"<body {body}><section {section}><p {p}>kept</p></section></body>"#,
            body = attrs(0, 0, 1000, 800, "white"),
            section = attrs(0, 0, 1000, 400, "transparent"),
            p = attrs(0, 0, 1000, 20, "transparent"),
        );
        let options = Options {
            visible_only: false,
            ..visual_only()
        };
        let page = parse_layout_dump(&html, &options).expect("parses");
        assert_eq!(page.visual.len(), 3);
    }

    #[test]
    fn hidden_root_is_an_error() {
        let html = format!(r#"<body {} css_visibility="hidden"></body>"#, attrs(0, 0, 10, 10, "white"));
        assert!(matches!(
            parse_layout_dump(&html, &visual_only()),
            Err(Error::NoVisibleRoot)
        ));
    }

    #[test]
    fn non_integer_geometry_is_malformed() {
        let html = format!(r#"<body {}></body>"#, attrs(0, 0, 10, 10, "white")).replace(r#"left="0""#, r#"left="1.5""#);
        let err = parse_layout_dump(&html, &visual_only()).unwrap_err();
        assert!(matches!(err, Error::MalformedNode { ref node, .. } if node == "/BODY"));
    }

    #[test]
    fn block_tree_attached_by_default() {
        let html = format!(r#"<body {}>text</body>"#, attrs(0, 0, 10, 10, "white"));
        let page = parse_layout_dump(&html, &Options::default()).expect("parses");
        let blocks = page.blocks.expect("block tree");
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn blank_input_is_a_parse_error() {
        assert!(matches!(
            parse_layout_dump("  \n", &Options::default()),
            Err(Error::ParseError(_))
        ));
    }
}
