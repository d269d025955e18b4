use std::collections::{HashMap, HashSet};

use serde_json::Value;

/// Result of one scanning pass: the canonical (index-zeroed) column list in
/// first-discovery order, and the largest length observed per list root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaScan {
    pub prototype: Vec<String>,
    pub list_maxes: HashMap<String, usize>,
}

/// Scan a value for its tabular shape. A top-level array is treated as the
/// record collection; anything else is a single record.
///
/// # Examples
/// ```
/// use serde_json::json;
///
/// let scan = jsontab::scan(&json!({"items": [{"id": 1}, {"id": 2}]}));
/// assert_eq!(scan.prototype, vec!["items[0].id"]);
/// assert_eq!(scan.list_maxes["items"], 2);
/// ```
pub fn scan(value: &Value) -> SchemaScan {
    match value {
        Value::Array(records) => scan_records(records),
        other => scan_records(std::slice::from_ref(other)),
    }
}

/// Scan an ordered collection of records in one accumulation pass: maxima
/// reflect the largest array seen anywhere, and the prototype is the union
/// across records in discovery order.
pub fn scan_records(records: &[Value]) -> SchemaScan {
    let mut acc = Accumulator::default();
    for record in records {
        acc.walk(record, String::new());
    }
    SchemaScan {
        prototype: acc.prototype,
        list_maxes: acc.list_maxes,
    }
}

#[derive(Default)]
struct Accumulator {
    prototype: Vec<String>,
    seen: HashSet<String>,
    list_maxes: HashMap<String, usize>,
}

impl Accumulator {
    fn walk(&mut self, value: &Value, prefix: String) {
        match value {
            Value::Array(items) => {
                if !prefix.is_empty() {
                    let max = self.list_maxes.entry(prefix.clone()).or_insert(0);
                    *max = (*max).max(items.len());
                }
                if items.is_empty() {
                    // an empty list still yields a column
                    self.add_leaf(prefix);
                    return;
                }
                // tails from every element contribute, under the canonical
                // [0] prefix, so ragged elements union their shapes
                let child_prefix = format!("{prefix}[0]");
                for item in items {
                    self.walk(item, child_prefix.clone());
                }
            }
            Value::Object(map) => {
                for (key, child) in map {
                    let child_prefix = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{prefix}.{key}")
                    };
                    self.walk(child, child_prefix);
                }
            }
            _ => self.add_leaf(prefix),
        }
    }

    fn add_leaf(&mut self, path: String) {
        if path.is_empty() {
            return;
        }
        if self.seen.insert(path.clone()) {
            self.prototype.push(path);
        }
    }
}
