use serde_json::{Map, Value};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::num::number::format_number;
use crate::options::{CellParsing, GapMode, UnflattenOptions};
use crate::path::{Path, Segment};

#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 256;

/// Project a record onto a row aligned with a concrete header.
///
/// Addressing a path that does not exist in the record yields an empty
/// cell, never an error.
pub fn flatten_to_row(record: &Value, header: &[String]) -> Vec<String> {
    let paths: Vec<Path> = header.iter().map(|col| Path::parse(col)).collect();
    project(record, &paths)
}

/// Project every record onto the same header, parsing the header once.
pub fn flatten_rows(records: &[Value], header: &[String]) -> Vec<Vec<String>> {
    let paths: Vec<Path> = header.iter().map(|col| Path::parse(col)).collect();

    #[cfg(feature = "parallel")]
    if records.len() >= PARALLEL_THRESHOLD {
        return records
            .par_iter()
            .map(|record| project(record, &paths))
            .collect();
    }

    records.iter().map(|record| project(record, &paths)).collect()
}

fn project(record: &Value, paths: &[Path]) -> Vec<String> {
    paths
        .iter()
        .map(|path| cell_text(lookup(record, path)))
        .collect()
}

fn lookup<'a>(record: &'a Value, path: &Path) -> Option<&'a Value> {
    let mut cur = record;
    for segment in path.segments() {
        if let Some(key) = &segment.key {
            cur = cur.as_object()?.get(key.as_str())?;
        }
        if let Some(index) = segment.index {
            cur = cur.as_array()?.get(index)?;
        }
    }
    Some(cur)
}

/// Stringify a leaf for a cell. Structured values fall back to their JSON
/// text; that only happens when the header disagrees with the record shape.
fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => if *b { "true" } else { "false" }.to_string(),
        Some(Value::Number(n)) => format_number(n),
        Some(structured) => serde_json::to_string(structured).unwrap_or_default(),
    }
}

/// Rebuild a record from a header + row pair under default options
/// (break gaps, typed cells).
pub fn unflatten_from_row(header: &[String], row: &[String]) -> Value {
    unflatten_from_row_with_options(header, row, &UnflattenOptions::default())
}

/// Rebuild a record from a header + row pair into a fresh owned tree.
///
/// Non-empty cells auto-vivify their address; a non-container in the way
/// is overwritten with a fresh container, never an error. Empty cells set
/// no key and claim no array slot under `GapMode::Break`; under
/// `GapMode::Sparse` an empty cell pads an array the row's non-empty cells
/// already created, so list lengths survive blank trailing cells.
pub fn unflatten_from_row_with_options(
    header: &[String],
    row: &[String],
    options: &UnflattenOptions,
) -> Value {
    let mut root = Value::Object(Map::new());
    let mut blanks: Vec<&str> = Vec::new();
    for (i, col) in header.iter().enumerate() {
        let cell = row.get(i).map(String::as_str).unwrap_or("");
        if cell.is_empty() {
            if options.gap_mode == GapMode::Sparse {
                blanks.push(col);
            }
            continue;
        }
        let path = Path::parse(col);
        if path.is_empty() {
            continue;
        }
        set_at(
            &mut root,
            path.segments(),
            cell_value(cell, options.cell_parsing),
        );
    }
    for col in blanks {
        reserve_existing_index(&mut root, Path::parse(col).segments());
    }
    root
}

fn cell_value(cell: &str, parsing: CellParsing) -> Value {
    match parsing {
        CellParsing::Verbatim => Value::String(cell.to_string()),
        CellParsing::Typed => typed_cell(cell),
    }
}

/// Re-interpret cell text: literals, JSON numbers, and JSON-structured
/// text come back typed; everything else stays a string.
fn typed_cell(cell: &str) -> Value {
    match cell {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" => return Value::Null,
        _ => {}
    }
    let Some(first) = cell.bytes().next() else {
        return Value::String(String::new());
    };
    if matches!(first, b'-' | b'0'..=b'9') {
        if let Ok(Value::Number(n)) = serde_json::from_str::<Value>(cell) {
            return Value::Number(n);
        }
    }
    if matches!(first, b'{' | b'[' | b'"') {
        if let Ok(value) = serde_json::from_str::<Value>(cell) {
            return value;
        }
    }
    Value::String(cell.to_string())
}

fn set_at(root: &mut Value, segments: &[Segment], value: Value) {
    let mut value = Some(value);
    let mut cur = root;
    for (i, segment) in segments.iter().enumerate() {
        let last = i + 1 == segments.len();
        if let Some(key) = &segment.key {
            let map = as_object_slot(cur);
            if last && segment.index.is_none() {
                map.insert(key.to_string(), value.take().unwrap_or(Value::Null));
                return;
            }
            cur = map.entry(key.to_string()).or_insert(Value::Null);
        }
        if let Some(index) = segment.index {
            let array = as_array_slot(cur);
            if array.len() <= index {
                array.resize(index + 1, Value::Null);
            }
            if last {
                array[index] = value.take().unwrap_or(Value::Null);
                return;
            }
            cur = &mut array[index];
        }
    }
}

/// Pad an array the row already created so that `index` exists as null.
/// Walks existing containers only; a missing step is a no-op.
fn reserve_existing_index(root: &mut Value, segments: &[Segment]) {
    let Some(last_indexed) = segments.iter().rposition(|s| s.index.is_some()) else {
        return;
    };
    let mut cur = root;
    for (i, segment) in segments[..=last_indexed].iter().enumerate() {
        if let Some(key) = &segment.key {
            match cur {
                Value::Object(map) => match map.get_mut(key.as_str()) {
                    Some(next) => cur = next,
                    None => return,
                },
                _ => return,
            }
        }
        if let Some(index) = segment.index {
            match cur {
                Value::Array(array) => {
                    if i == last_indexed {
                        if array.len() <= index {
                            array.resize(index + 1, Value::Null);
                        }
                        return;
                    }
                    match array.get_mut(index) {
                        Some(next) => cur = next,
                        None => return,
                    }
                }
                _ => return,
            }
        }
    }
}

fn as_object_slot(slot: &mut Value) -> &mut Map<String, Value> {
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot was just replaced with an object"),
    }
}

fn as_array_slot(slot: &mut Value) -> &mut Vec<Value> {
    if !slot.is_array() {
        *slot = Value::Array(Vec::new());
    }
    match slot {
        Value::Array(array) => array,
        _ => unreachable!("slot was just replaced with an array"),
    }
}
