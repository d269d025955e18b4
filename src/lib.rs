pub mod error;
pub mod flatten;
pub mod header;
mod num;
pub mod options;
pub mod path;
pub mod reconcile;
pub mod schema;
pub mod session;
pub mod tabular;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub use crate::error::{Error, ErrorKind, Location};
pub use crate::flatten::{
    flatten_rows, flatten_to_row, unflatten_from_row, unflatten_from_row_with_options,
};
pub use crate::header::{build_header, build_header_with_strategy};
pub use crate::options::{
    CellParsing, CsvReadOptions, CsvWriteOptions, Delimiter, GapMode, LineEnding, ListStrategy,
    SessionOptions, UnflattenOptions,
};
pub use crate::reconcile::{
    add_extra_index_per_list, compare_columns, merge_header_with_fallback, normalize_list_blocks,
    sort_header_and_rows,
};
pub use crate::schema::{scan, scan_records, SchemaScan};
pub use crate::session::TableSession;
pub use crate::tabular::Table;

pub type Result<T> = std::result::Result<T, Error>;

/// Flatten any serializable value into a table under the dynamic list
/// strategy. A value serializing to a top-level array is treated as the
/// record collection; anything else as a single record.
pub fn to_table<T: Serialize>(value: &T) -> Result<Table> {
    to_table_with_strategy(value, ListStrategy::Dynamic)
}

pub fn to_table_with_strategy<T: Serialize>(value: &T, strategy: ListStrategy) -> Result<Table> {
    let value = serde_json::to_value(value).map_err(|err| Error::serialize(err.to_string()))?;
    let records = match value {
        Value::Array(items) => items,
        other => vec![other],
    };
    let scan = schema::scan_records(&records);
    let header = header::build_header_with_strategy(&scan, strategy);
    let rows = flatten::flatten_rows(&records, &header);
    Ok(Table::new(header, rows))
}

/// Rebuild one deserializable record per table row.
pub fn from_table<T: DeserializeOwned>(table: &Table) -> Result<Vec<T>> {
    from_table_with_options(table, &UnflattenOptions::default())
}

pub fn from_table_with_options<T: DeserializeOwned>(
    table: &Table,
    options: &UnflattenOptions,
) -> Result<Vec<T>> {
    table_to_values(table, options)
        .into_iter()
        .map(|value| {
            serde_json::from_value(value).map_err(|err| Error::deserialize(err.to_string()))
        })
        .collect()
}

/// Rebuild one JSON record per table row.
pub fn table_to_values(table: &Table, options: &UnflattenOptions) -> Vec<Value> {
    table
        .rows
        .iter()
        .map(|row| flatten::unflatten_from_row_with_options(&table.header, row, options))
        .collect()
}

pub fn to_csv(table: &Table) -> String {
    to_csv_with_options(table, &CsvWriteOptions::default())
}

pub fn to_csv_with_options(table: &Table, options: &CsvWriteOptions) -> String {
    tabular::encode(table, options)
}

pub fn from_csv(text: &str) -> Result<Table> {
    from_csv_with_options(text, &CsvReadOptions::default())
}

pub fn from_csv_with_options(text: &str, options: &CsvReadOptions) -> Result<Table> {
    tabular::decode(text, options)
}
