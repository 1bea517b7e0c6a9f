//! Indented listing of a layout tree for debugging.

use std::fmt::Write;

use crate::tree::{NodeId, Tree, TreeKind};

/// Render `tree` one node per line, framed by a header naming the tree kind.
///
/// ```text
/// ==== VT ====
///   BODY: left=0,top=0,right=1000,bottom=800; xpath="/BODY"
///   |- UL: left=0,top=0,right=1000,bottom=300; xpath="/BODY/UL[0]"
///   | |- LI: left=0,top=0,right=1000,bottom=100; xpath="/BODY/UL[0]/LI[0]"
/// ==== VT ====
/// ```
///
/// Block nodes list the visual nodes they represent instead of an xpath.
#[must_use]
pub fn dump_tree(tree: &Tree, kind: TreeKind) -> String {
    let frame = match kind {
        TreeKind::Visual => "==== VT ====",
        TreeKind::Block => "==== BT ====",
    };
    let mut out = String::new();
    out.push_str(frame);
    out.push('\n');
    if let Some(root) = tree.root() {
        let order = tree.preorder(root);
        for (&id, &depth) in order.nodes.iter().zip(&order.depths) {
            push_line(&mut out, tree, id, depth);
        }
    }
    out.push_str(frame);
    out.push('\n');
    out
}

fn push_line(out: &mut String, tree: &Tree, id: NodeId, depth: usize) {
    let node = tree.node(id);
    out.push_str("  ");
    if depth > 0 {
        out.push_str(&"| ".repeat(depth - 1));
        out.push_str("|- ");
    }
    let r = &node.rect;
    let _ = write!(
        out,
        "{}: left={},top={},right={},bottom={}",
        node.tag.to_uppercase(),
        r.left,
        r.top,
        r.right,
        r.bottom
    );
    if !node.represents.is_empty() {
        let ids: Vec<String> = node.represents.iter().map(|v| v.0.to_string()).collect();
        let _ = write!(out, "; VT=[{}]", ids.join(","));
    } else if let Some(xpath) = &node.xpath {
        let _ = write!(out, "; xpath=\"{xpath}\"");
    }
    out.push('\n');
}
