use serde_json::Value;

use crate::flatten::{flatten_rows, unflatten_from_row_with_options};
use crate::header::build_header_with_strategy;
use crate::options::{CsvReadOptions, CsvWriteOptions, SessionOptions, UnflattenOptions};
use crate::reconcile::{
    add_extra_index_per_list, merge_header_with_fallback, normalize_list_blocks,
    sort_header_and_rows,
};
use crate::schema::scan_records;
use crate::tabular::{decode, encode, Table};
use crate::Result;

/// Owns the long-lived header and rows of one editing session.
///
/// Every scan runs the reconciliation pipeline in a fixed order — scan →
/// merge with the previous header → grow slots → normalize → sort — so the
/// column set stays stable and well-ordered while data and table are edited
/// independently. All methods are synchronous; concurrent edits must be
/// serialized by the caller.
#[derive(Debug, Clone, Default)]
pub struct TableSession {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    options: SessionOptions,
}

impl TableSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SessionOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Scan a value into the session. A top-level array is the record
    /// collection; anything else is a single record.
    pub fn scan_value(&mut self, value: &Value) {
        match value {
            Value::Array(records) => self.scan_records(records),
            other => self.scan_records(std::slice::from_ref(other)),
        }
    }

    /// Re-derive the header from `records`, reconcile it with the header
    /// this session already holds, and re-flatten every record onto the
    /// result.
    pub fn scan_records(&mut self, records: &[Value]) {
        let scan = scan_records(records);
        let fresh = build_header_with_strategy(&scan, self.options.strategy);
        let merged = merge_header_with_fallback(&fresh, &self.header);
        let grown = add_extra_index_per_list(&merged, self.options.grow_extra);
        let normalized = normalize_list_blocks(&grown);
        let (header, _) = sort_header_and_rows(&normalized, &[]);
        self.rows = flatten_rows(records, &header);
        self.header = header;
    }

    /// Write one cell. Out-of-range coordinates are ignored; a short row is
    /// widened to the header first.
    pub fn set_cell(&mut self, row: usize, col: usize, text: impl Into<String>) {
        if col >= self.header.len() {
            return;
        }
        if let Some(cells) = self.rows.get_mut(row) {
            if cells.len() < self.header.len() {
                cells.resize(self.header.len(), String::new());
            }
            cells[col] = text.into();
        }
    }

    /// Append a blank row and return its index.
    pub fn push_row(&mut self) -> usize {
        self.rows.push(vec![String::new(); self.header.len()]);
        self.rows.len() - 1
    }

    pub fn column(&self, col: &str) -> Option<usize> {
        self.header.iter().position(|known| known == col)
    }

    /// Rebuild every row into a record under the session's gap and cell
    /// options.
    pub fn records(&self) -> Vec<Value> {
        let options = UnflattenOptions {
            gap_mode: self.options.gap_mode,
            cell_parsing: self.options.cell_parsing,
        };
        self.rows
            .iter()
            .map(|row| unflatten_from_row_with_options(&self.header, row, &options))
            .collect()
    }

    pub fn to_csv(&self, options: &CsvWriteOptions) -> String {
        let table = Table::new(self.header.clone(), self.rows.clone());
        encode(&table, options)
    }

    /// Replace header and rows from delimited text; rows are widened to the
    /// header.
    pub fn load_csv(&mut self, text: &str, options: &CsvReadOptions) -> Result<()> {
        let table = decode(text, options)?;
        self.header = table.header;
        self.rows = table.rows;
        let width = self.header.len();
        for row in &mut self.rows {
            if row.len() < width {
                row.resize(width, String::new());
            }
        }
        Ok(())
    }
}
