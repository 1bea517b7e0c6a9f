//! Data item alignment.
//!
//! Turns a list of data records into a table: one row per record, one column
//! per field shared across records. Items of each record are collected from
//! its leaves, records that are structurally identical are clustered, their
//! items are clustered into columns, and the column sets of all record
//! clusters are merged into the largest one.

mod cluster;
mod leaves;

use serde::Serialize;
use tracing::debug;

use crate::records::DataRecord;
use crate::tree::{NodeId, Tree, TreeKind};

pub use cluster::{cluster_items, cluster_records, is_empty_column, merge_columns, Column};
pub use leaves::record_items;

/// One field value of one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataItem {
    /// Visual-tree leaf the value was read from.
    pub node: NodeId,
    /// Id of the owning record (1-based).
    pub record_id: usize,
    /// Extracted text.
    pub content: String,
}

/// Records aligned into columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignedTable {
    /// Row `i` holds record `i + 1`; column 0 is the record number.
    pub content: Vec<Vec<String>>,
    /// Same shape as `content`; column 0 is the record root, other cells the
    /// item's leaf node when the record has a value in that column.
    pub nodes: Vec<Vec<Option<NodeId>>>,
}

impl AlignedTable {
    /// Number of data columns (excluding the record number).
    #[must_use]
    pub fn data_columns(&self) -> usize {
        self.content.first().map_or(0, |row| row.len().saturating_sub(1))
    }
}

/// Align the items of `records` into a table.
///
/// `locator` is the tree the records were found in (of kind `kind`);
/// `visual` is the page's visual tree, where items live.
#[must_use]
pub fn align_data_items(locator: &Tree, visual: &Tree, kind: TreeKind, records: &[DataRecord]) -> AlignedTable {
    if records.is_empty() {
        return AlignedTable::default();
    }

    let per_record: Vec<Vec<DataItem>> = records
        .iter()
        .map(|record| record_items(locator, visual, kind, record))
        .collect();
    let item_counts: Vec<usize> = per_record.iter().map(Vec::len).collect();

    let record_clusters = cluster_records(locator, records, &item_counts);
    debug!(records = records.len(), clusters = record_clusters.len(), "record clusters");

    let mut column_sets: Vec<Vec<Column>> = record_clusters
        .iter()
        .map(|cluster| {
            let pooled: Vec<DataItem> = cluster
                .iter()
                .flat_map(|&r| per_record[r].iter().cloned())
                .collect();
            cluster_items(visual, &pooled)
        })
        .collect();

    // Most columns first; the first set is the base the rest merge into.
    column_sets.sort_by(|a, b| b.len().cmp(&a.len()));
    let mut sets = column_sets.into_iter();
    let mut columns = sets.next().unwrap_or_default();
    for other in sets {
        merge_columns(visual, &mut columns, other);
    }

    let before = columns.len();
    columns.retain(|column| !is_empty_column(visual, column));
    for column in &mut columns {
        column.sort_by_key(|item| item.record_id);
    }
    debug!(columns = columns.len(), pruned = before - columns.len(), "aligned columns");

    fill_tables(records, &columns)
}

fn fill_tables(records: &[DataRecord], columns: &[Column]) -> AlignedTable {
    let width = columns.len() + 1;
    let mut content = vec![vec![String::new(); width]; records.len()];
    let mut nodes = vec![vec![None; width]; records.len()];

    for (row, record) in records.iter().enumerate() {
        content[row][0] = (row + 1).to_string();
        nodes[row][0] = Some(record.node);
    }
    for (c, column) in columns.iter().enumerate() {
        for item in column {
            let Some(row) = item.record_id.checked_sub(1).filter(|r| *r < records.len()) else {
                continue;
            };
            content[row][c + 1].clone_from(&item.content);
            nodes[row][c + 1] = Some(item.node);
        }
    }
    AlignedTable { content, nodes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Node, Rect, Style, StyleProperty};

    // Records are `li` elements under one `ul`, each holding one `span` per
    // entry of `fields`; `None` leaves the span without text.
    fn listing(rows: &[&[Option<&str>]]) -> (Tree, Vec<DataRecord>) {
        let mut tree = Tree::new();
        let ul = tree.set_root(Node::element("ul", Rect::new(0, 0, 600, 1000)));
        let mut records = Vec::new();
        for (r, fields) in rows.iter().enumerate() {
            let top = r as i64 * 50;
            let li = tree.append_child(ul, Node::element("li", Rect::new(0, top, 600, top + 40)));
            for (f, field) in fields.iter().enumerate() {
                let left = f as i64 * 200;
                let style = Style::new().with(StyleProperty::FontSize, format!("{}px", 10 + f));
                let span = tree.append_child(
                    li,
                    Node::element("span", Rect::new(left, top, left + 150, top + 40)).with_style(style),
                );
                if let Some(text) = field {
                    tree.append_text(span, *text);
                }
            }
            records.push(DataRecord { id: r + 1, node: li });
        }
        (tree, records)
    }

    #[test]
    fn identical_records_align_column_by_column() {
        let (tree, records) = listing(&[
            &[Some("a1"), Some("b1"), Some("c1")],
            &[Some("a2"), Some("b2"), Some("c2")],
            &[Some("a3"), Some("b3"), Some("c3")],
        ]);
        let table = align_data_items(&tree, &tree, TreeKind::Visual, &records);

        assert_eq!(table.content.len(), 3);
        assert_eq!(table.data_columns(), 3);
        assert_eq!(table.content[1], vec!["2", "a2", "b2", "c2"]);
        assert_eq!(table.nodes[2][0], Some(records[2].node));
    }

    #[test]
    fn empty_column_is_pruned() {
        let (tree, records) = listing(&[
            &[Some("a1"), None, Some("c1")],
            &[Some("a2"), None, Some("c2")],
        ]);
        let table = align_data_items(&tree, &tree, TreeKind::Visual, &records);

        assert_eq!(table.data_columns(), 2);
        assert_eq!(table.content[0], vec!["1", "a1", "c1"]);
    }

    #[test]
    fn no_records_no_table() {
        let tree = Tree::new();
        assert_eq!(align_data_items(&tree, &tree, TreeKind::Visual, &[]), AlignedTable::default());
    }
}
