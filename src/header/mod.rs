use std::collections::HashMap;

use crate::options::ListStrategy;
use crate::path::{join_bracket, split_last_bracket};
use crate::schema::SchemaScan;

/// Expand a prototype header into concrete columns using the scanner's
/// observed maxima.
///
/// # Examples
/// ```
/// use serde_json::json;
///
/// let scan = jsontab::scan(&json!({"items": [{"id": 1, "name": "a"}, {"id": 2, "name": "b"}]}));
/// let header = jsontab::build_header(&scan);
/// assert_eq!(
///     header,
///     vec!["items[0].id", "items[0].name", "items[1].id", "items[1].name"]
/// );
/// ```
pub fn build_header(scan: &SchemaScan) -> Vec<String> {
    build_header_with_strategy(scan, ListStrategy::Dynamic)
}

/// Expand a prototype header into concrete columns.
///
/// Non-array columns pass through unchanged, in order. Each list root is
/// expanded exactly once, at its first prototype occurrence, index-major:
/// every tail at index 0, then every tail at index 1, and so on. Under
/// `ListStrategy::Fixed(k)` every root expands to `k` slots regardless of
/// the observed maxima. No sorting happens here; output order is a pure
/// function of prototype order, maxima, and strategy.
pub fn build_header_with_strategy(scan: &SchemaScan, strategy: ListStrategy) -> Vec<String> {
    // first pass: tail set per root, both in first-seen order
    let mut tails_by_root: HashMap<&str, Vec<&str>> = HashMap::new();
    for col in &scan.prototype {
        if let Some((root, _, tail)) = split_last_bracket(col) {
            let tails = tails_by_root.entry(root).or_default();
            if !tails.iter().any(|known| *known == tail) {
                tails.push(tail);
            }
        }
    }

    // second pass: emit, expanding each root once at its first occurrence
    let mut out = Vec::new();
    let mut emitted_roots: Vec<&str> = Vec::new();
    for col in &scan.prototype {
        let Some((root, _, _)) = split_last_bracket(col) else {
            out.push(col.clone());
            continue;
        };
        if emitted_roots.contains(&root) {
            continue;
        }
        emitted_roots.push(root);
        let max = match strategy {
            ListStrategy::Dynamic => scan.list_maxes.get(root).copied().unwrap_or(0),
            ListStrategy::Fixed(k) => k,
        };
        let tails = &tails_by_root[root];
        for index in 0..max {
            for tail in tails {
                out.push(join_bracket(root, index, tail));
            }
        }
    }
    out
}
