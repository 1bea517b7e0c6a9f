//! Shared fixtures: programmatic list pages and annotated layout dumps.

#![allow(dead_code)]

use std::fmt::Write;

use recordminer::tree::{Style, StyleProperty};
use recordminer::{DocumentSize, Node, NodeId, Page, Rect, Tree};

/// Document used by every fixture page.
pub const DOCUMENT: DocumentSize = DocumentSize {
    width: 1000,
    height: 1000,
};

/// Ids of the interesting nodes of a list page.
pub struct ListPage {
    pub page: Page,
    pub list: NodeId,
    pub items: Vec<NodeId>,
    pub fields: Vec<Vec<NodeId>>,
}

pub fn style(color: &str) -> Style {
    Style::new()
        .with(StyleProperty::Color, color)
        .with(StyleProperty::FontSize, "14px")
        .with(StyleProperty::Position, "static")
}

pub fn element(tag: &str, rect: Rect, color: &str) -> Node {
    Node::element(tag, rect).with_style(style(color))
}

/// Vertical list inside `<ul>`: one `<li>` per row, one `<span>` per cell,
/// spans side by side. Row `i` spans `100 + 100 * i` to `190 + 100 * i`.
pub fn list_page(rows: &[&[&str]]) -> ListPage {
    let mut tree = Tree::new();
    let body = tree.set_root(element("body", Rect::new(0, 0, 1000, 1000), "black"));
    let height = 100 * rows.len() as i64;
    let list = tree.append_child(body, element("ul", Rect::new(100, 100, 900, 100 + height), "black"));

    let mut items = Vec::new();
    let mut fields = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let top = 100 + 100 * i as i64;
        let li = tree.append_child(list, element("li", Rect::new(100, top, 900, top + 90), "black"));
        let mut cells = Vec::new();
        for (j, text) in row.iter().enumerate() {
            let left = 100 + 200 * j as i64;
            let span = tree.append_child(li, element("span", Rect::new(left, top, left + 150, top + 20), "navy"));
            tree.append_text(span, *text);
            cells.push(span);
        }
        items.push(li);
        fields.push(cells);
    }

    ListPage {
        page: Page::new(tree, DOCUMENT),
        list,
        items,
        fields,
    }
}

/// Five products with name, price and stock.
pub fn products() -> Vec<[&'static str; 3]> {
    vec![
        ["Kettle", "24.99", "in stock"],
        ["Toaster", "39.00", "2 left"],
        ["Blender", "59.50", "in stock"],
        ["Grinder", "18.75", "sold out"],
        ["Juicer", "74.10", "in stock"],
    ]
}

/// Layout attributes of one element of an annotated dump.
pub fn layout_attrs(rect: Rect, background: &str) -> String {
    let mut out = format!(
        r#"left="{}" top="{}" right="{}" bottom="{}""#,
        rect.left, rect.top, rect.right, rect.bottom
    );
    for property in StyleProperty::ALL {
        let value = match property {
            StyleProperty::BackgroundColor => background,
            StyleProperty::BackgroundImage => "none",
            StyleProperty::Color => "rgb(0, 0, 0)",
            StyleProperty::FontSize => "14px",
            StyleProperty::Position => "static",
            _ => "normal",
        };
        let _ = write!(out, r#" {}="{value}""#, property.attribute_name());
    }
    out
}

/// Annotated dump of the product list: a `<ul>` painted with `list_background`
/// holding shaded `<li>` rows with one `<span>` per field.
pub fn product_dump(rows: &[[&str; 3]], list_background: &str) -> String {
    let mut items = String::new();
    for (i, row) in rows.iter().enumerate() {
        let top = 100 + 100 * i as i64;
        let _ = write!(
            items,
            "\n    <li {}>",
            layout_attrs(Rect::new(100, top, 900, top + 90), "rgb(245, 245, 245)")
        );
        for (j, text) in row.iter().enumerate() {
            let left = 100 + 200 * j as i64;
            let _ = write!(
                items,
                "<span {}>{text}</span>",
                layout_attrs(Rect::new(left, top, left + 150, top + 20), "transparent")
            );
        }
        items.push_str("</li>");
    }
    let list_bottom = 100 + 100 * rows.len() as i64;
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"></head>\n<body {body} doc_width=\"1000\" doc_height=\"1000\">\n  <ul {ul}>{items}\n  </ul>\n</body></html>",
        body = layout_attrs(Rect::new(0, 0, 1000, 1000), "rgb(255, 255, 255)"),
        ul = layout_attrs(Rect::new(100, 100, 900, list_bottom), list_background),
    )
}
