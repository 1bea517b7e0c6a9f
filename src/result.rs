//! Result type for record extraction output.

use serde::Serialize;

use crate::records::DataRecord;
use crate::table::{render_csv, render_html};
use crate::tree::NodeId;

/// Records of a page aligned into a table.
///
/// An empty result means no main region or no repeating chain was found.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractionResult {
    /// One row per record in id order. Column 0 is the record number, the
    /// other columns are the aligned fields; a record without a value in a
    /// column has an empty cell.
    pub content_table: Vec<Vec<String>>,

    /// Same shape as `content_table`. Column 0 holds the record root, the
    /// other cells the visual-tree leaf each value was read from.
    pub node_table: Vec<Vec<Option<NodeId>>>,

    /// Fixed-width text rendering of `content_table`.
    pub text: String,

    /// CSV-escaped cells of `content_table`, record number column excluded.
    pub csv_table: Vec<Vec<String>>,

    /// The records, in id order.
    pub records: Vec<DataRecord>,
}

impl ExtractionResult {
    /// True when nothing was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content_table.is_empty()
    }

    /// Number of records.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.content_table.len()
    }

    /// CSV document: one header-less line per record.
    #[must_use]
    pub fn to_csv(&self) -> String {
        render_csv(&self.csv_table)
    }

    /// The content table as an HTML `<table>`.
    #[must_use]
    pub fn to_html(&self) -> String {
        render_html(&self.content_table)
    }
}
