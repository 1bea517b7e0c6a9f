//! Leaf collection and content building for one data record.

use std::collections::{HashMap, HashSet};

use crate::compare::{compare, CompareMode};
use crate::patterns::LINE_BREAK;
use crate::records::{sort_by_position, DataRecord};
use crate::tree::{Fragment, NodeId, Tree, TreeKind};

use super::DataItem;

/// Text fragments next to a leaf that no tree node captured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct MissedText {
    prev: Option<String>,
    next: Option<String>,
}

/// Working state while collecting the leaves of one record.
#[derive(Default)]
struct LeafCollector {
    leaves: Vec<NodeId>,
    missed_text: HashMap<NodeId, MissedText>,
    /// Leaves that picked up missed text, in the order they did.
    altered: Vec<NodeId>,
    /// `(parent, fragment index)` of every text fragment already claimed.
    claimed: HashSet<(NodeId, usize)>,
}

impl LeafCollector {
    fn push(&mut self, visual: &Tree, leaf: NodeId) {
        self.leaves.push(leaf);
        self.claim_missed_text(visual, leaf);
    }

    /// Attach the raw text around `leaf` in its parent's DOM child list.
    ///
    /// The fragment right after the leaf becomes its trailing text. Every
    /// unclaimed text fragment before it is appended to its leading text.
    fn claim_missed_text(&mut self, visual: &Tree, leaf: NodeId) {
        let Some(parent) = visual.node(leaf).parent() else {
            return;
        };
        let fragments = &visual.node(parent).fragments;
        let Some(index) = fragments
            .iter()
            .position(|f| *f == Fragment::Element(Some(leaf)))
        else {
            return;
        };

        if let Some(Fragment::Text(text)) = fragments.get(index + 1) {
            let text = text.trim();
            if !text.is_empty() {
                self.missed_text.entry(leaf).or_default().next = Some(text.to_string());
                self.altered.push(leaf);
                self.claimed.insert((parent, index + 1));
            }
        }

        for (i, fragment) in fragments.iter().enumerate().take(index) {
            let Fragment::Text(text) = fragment else {
                continue;
            };
            let text = text.trim();
            if text.is_empty() || self.claimed.contains(&(parent, i)) {
                continue;
            }
            let missed = self.missed_text.entry(leaf).or_default();
            missed.prev = Some(match missed.prev.take() {
                Some(prev) => format!("{prev} {text}"),
                None => text.to_string(),
            });
            if !self.altered.contains(&leaf) {
                self.altered.push(leaf);
            }
            self.claimed.insert((parent, i));
        }
    }

    /// Content of a leaf: its own text fragments, each trimmed with line
    /// breaks removed, framed by any missed text.
    fn content(&self, visual: &Tree, leaf: NodeId) -> String {
        let own: String = visual
            .node(leaf)
            .fragments
            .iter()
            .filter_map(|f| match f {
                Fragment::Text(t) => Some(LINE_BREAK.replace_all(t.trim(), "").into_owned()),
                Fragment::Element(_) => None,
            })
            .collect();
        let mut content = own;
        if let Some(missed) = self.missed_text.get(&leaf) {
            if let Some(prev) = &missed.prev {
                content = format!("{prev} {content}");
            }
            if let Some(next) = &missed.next {
                content = format!("{content} {next}");
            }
        }
        content.trim().to_string()
    }
}

/// Collect the data items of one record.
///
/// Over a block tree every leaf of the visual tree represented by a block of
/// the record is collected; over a visual tree the record's own leaves are.
/// Items come out sorted by position, with chains of style-identical sibling
/// leaves that had text between them merged into their first member.
#[must_use]
pub fn record_items(locator: &Tree, visual: &Tree, kind: TreeKind, record: &DataRecord) -> Vec<DataItem> {
    let mut collector = LeafCollector::default();
    for &node in &locator.preorder(record.node).nodes {
        match kind {
            TreeKind::Block => {
                for &represented in &locator.node(node).represents {
                    if visual.node(represented).is_leaf() {
                        collector.push(visual, represented);
                    }
                }
            }
            TreeKind::Visual => {
                if locator.node(node).is_leaf() {
                    collector.push(visual, node);
                }
            }
        }
    }

    sort_by_position(visual, &mut collector.leaves);
    let leaves = collector.leaves.clone();

    // Position in `leaves` of the next style-identical sibling of an altered leaf.
    let mut next_mergeable: HashMap<NodeId, usize> = HashMap::new();
    for &altered in &collector.altered {
        for (j, &leaf) in leaves.iter().enumerate() {
            if altered != leaf
                && visual.next_sibling(altered) == Some(leaf)
                && compare(visual.node(altered), visual.node(leaf), CompareMode::Complete).is_match()
            {
                next_mergeable.insert(altered, j);
            }
        }
    }

    let mut contents: Vec<String> = leaves.iter().map(|&l| collector.content(visual, l)).collect();

    let mut merged: HashSet<NodeId> = HashSet::new();
    for i in 0..leaves.len() {
        let mut next = next_mergeable.get(&leaves[i]).copied();
        let mut steps = 0;
        while let Some(j) = next {
            if merged.contains(&leaves[i]) || steps == leaves.len() {
                break;
            }
            let absorbed = contents[j].clone();
            contents[i] = format!("{} {absorbed}", contents[i]);
            merged.insert(leaves[j]);
            next = next_mergeable.get(&leaves[j]).copied();
            steps += 1;
        }
    }

    leaves
        .into_iter()
        .zip(contents)
        .filter(|(leaf, _)| !merged.contains(leaf))
        .map(|(node, content)| DataItem {
            node,
            record_id: record.id,
            content,
        })
        .collect()
}
