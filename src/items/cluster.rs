//! Grouping records and their items into columns.

use std::collections::HashSet;

use crate::compare::{compare, CompareMode};
use crate::records::DataRecord;
use crate::similarity::normalized_similarity;
use crate::tree::{NodeId, Tree};

use super::DataItem;

/// One column: at most one item per record.
pub type Column = Vec<DataItem>;

/// Group records that are structurally identical: normalized similarity of
/// exactly 1 and the same number of items. Returns positions into `records`.
#[must_use]
pub fn cluster_records(locator: &Tree, records: &[DataRecord], item_counts: &[usize]) -> Vec<Vec<usize>> {
    let mut clustered = vec![false; records.len()];
    let mut clusters = Vec::new();
    for i in 0..records.len() {
        if clustered[i] {
            continue;
        }
        clustered[i] = true;
        let mut cluster = vec![i];
        for j in i + 1..records.len() {
            if clustered[j] || item_counts[i] != item_counts[j] {
                continue;
            }
            if normalized_similarity(locator, records[i].node, locator, records[j].node) == 1.0 {
                clustered[j] = true;
                cluster.push(j);
            }
        }
        clusters.push(cluster);
    }
    clusters
}

/// Greedily group items that partially match, taking at most one item from
/// each record into a column.
#[must_use]
pub fn cluster_items(visual: &Tree, items: &[DataItem]) -> Vec<Column> {
    let mut clustered = vec![false; items.len()];
    let mut columns = Vec::new();
    for i in 0..items.len() {
        if clustered[i] {
            continue;
        }
        clustered[i] = true;
        let head = &items[i];
        let mut records = vec![head.record_id];
        let mut column = vec![head.clone()];
        for j in i + 1..items.len() {
            let candidate = &items[j];
            if clustered[j] || records.contains(&candidate.record_id) {
                continue;
            }
            if compare(visual.node(head.node), visual.node(candidate.node), CompareMode::Partial).is_match() {
                clustered[j] = true;
                records.push(candidate.record_id);
                column.push(candidate.clone());
            }
        }
        columns.push(column);
    }
    columns
}

/// Fold the columns of another record cluster into `base`.
///
/// Each column is matched by its first item against base columns from the
/// same position onwards (style-identical, each base column matched at most
/// once) and its items are appended there. An unmatched column is inserted
/// right after the position its predecessor ended up at, or first.
pub fn merge_columns(visual: &Tree, base: &mut Vec<Column>, other: Vec<Column>) {
    let mut matched: HashSet<NodeId> = HashSet::new();
    let mut positions: Vec<usize> = Vec::with_capacity(other.len());
    for (i, column) in other.into_iter().enumerate() {
        let Some(head) = column.first() else {
            continue;
        };
        let head_node = visual.node(head.node);
        let target = (i..base.len()).find(|&j| {
            base[j].first().is_some_and(|b| {
                !matched.contains(&b.node)
                    && compare(head_node, visual.node(b.node), CompareMode::Complete).is_match()
            })
        });
        match target {
            Some(j) => {
                if let Some(b) = base[j].first() {
                    matched.insert(b.node);
                }
                base[j].extend(column);
                positions.push(j);
            }
            None => {
                let at = positions.last().map_or(0, |p| p + 1).min(base.len());
                base.insert(at, column);
                positions.push(at);
            }
        }
    }
}

/// True when no item of the column has any own text.
#[must_use]
pub fn is_empty_column(visual: &Tree, column: &[DataItem]) -> bool {
    column.iter().all(|item| visual.node(item.node).own_text().is_empty())
}
