//! Pure header-reconciliation algorithms for interactive editing: keeping
//! vanished blocks reachable, offering grow slots, squaring off ragged
//! blocks, and imposing a stable column order. Each function is a pure
//! function of its inputs; the session sequences them.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::path::{join_bracket, split_first_bracket, Path};

/// Keep the seed block of any list the fresh scan no longer observes.
///
/// For every `previous` column at index 0 of its top-level root, if
/// `current` has no column under that root at all, the column is appended,
/// so the user keeps a placeholder to re-populate an emptied array.
/// Partial presence of a root leaves `current` untouched.
pub fn merge_header_with_fallback(current: &[String], previous: &[String]) -> Vec<String> {
    let mut out = current.to_vec();
    for col in previous {
        let Some((root, index, _)) = split_first_bracket(col) else {
            continue;
        };
        if index != 0 {
            continue;
        }
        let prefix = format!("{root}[");
        if current.iter().any(|known| known.starts_with(&prefix)) {
            continue;
        }
        if !out.contains(col) {
            out.push(col.clone());
        }
    }
    out
}

struct Run {
    root: String,
    max_index: usize,
    tails: Vec<String>,
}

/// Offer `extra` blank index blocks after every contiguous list run, so a
/// list can be grown by editing cells alone.
///
/// # Examples
/// ```
/// let header = vec!["items[0].id".to_string()];
/// assert_eq!(
///     jsontab::add_extra_index_per_list(&header, 1),
///     vec!["items[0].id", "items[1].id"]
/// );
/// ```
pub fn add_extra_index_per_list(header: &[String], extra: usize) -> Vec<String> {
    let mut out = Vec::with_capacity(header.len());
    let mut run: Option<Run> = None;
    for col in header {
        match split_first_bracket(col) {
            Some((root, index, tail)) => {
                if !run.as_ref().is_some_and(|r| r.root == root) {
                    if let Some(done) = run.take() {
                        push_growth(&mut out, &done, extra);
                    }
                    run = Some(Run {
                        root: root.to_string(),
                        max_index: index,
                        tails: Vec::new(),
                    });
                }
                if let Some(r) = run.as_mut() {
                    r.max_index = r.max_index.max(index);
                    if !r.tails.iter().any(|known| known == tail) {
                        r.tails.push(tail.to_string());
                    }
                }
                out.push(col.clone());
            }
            None => {
                // a non-array column closes the run
                if let Some(done) = run.take() {
                    push_growth(&mut out, &done, extra);
                }
                out.push(col.clone());
            }
        }
    }
    if let Some(done) = run.take() {
        push_growth(&mut out, &done, extra);
    }
    out
}

fn push_growth(out: &mut Vec<String>, run: &Run, extra: usize) {
    for offset in 1..=extra {
        for tail in &run.tails {
            out.push(join_bracket(&run.root, run.max_index + offset, tail));
        }
    }
}

struct Block {
    root: String,
    indices: Vec<usize>,
    base_by_index: HashMap<usize, Vec<String>>,
    child_union: Vec<String>,
}

enum Entry {
    Plain(String),
    Block(usize),
}

/// Square off every top-level list block: each index keeps its own base
/// columns and gains the union of nested-array tails seen at any sibling
/// index, plus one synthetic next index per distinct nested child array.
///
/// A block is gathered across the whole header and rebuilt at its first
/// occurrence.
pub fn normalize_list_blocks(header: &[String]) -> Vec<String> {
    let mut entries: Vec<Entry> = Vec::new();
    let mut blocks: Vec<Block> = Vec::new();
    let mut block_by_root: HashMap<String, usize> = HashMap::new();

    for col in header {
        let Some((root, index, tail)) = split_first_bracket(col) else {
            entries.push(Entry::Plain(col.clone()));
            continue;
        };
        let slot = match block_by_root.get(root) {
            Some(&slot) => slot,
            None => {
                blocks.push(Block {
                    root: root.to_string(),
                    indices: Vec::new(),
                    base_by_index: HashMap::new(),
                    child_union: Vec::new(),
                });
                let slot = blocks.len() - 1;
                block_by_root.insert(root.to_string(), slot);
                entries.push(Entry::Block(slot));
                slot
            }
        };
        let block = &mut blocks[slot];
        if !block.indices.contains(&index) {
            block.indices.push(index);
        }
        if split_first_bracket(tail).is_some() {
            if !block.child_union.iter().any(|known| known == tail) {
                block.child_union.push(tail.to_string());
            }
        } else {
            let bases = block.base_by_index.entry(index).or_default();
            if !bases.iter().any(|known| known == tail) {
                bases.push(tail.to_string());
            }
        }
    }

    for block in &mut blocks {
        grow_child_arrays(block);
    }

    let mut out = Vec::new();
    for entry in entries {
        match entry {
            Entry::Plain(col) => out.push(col),
            Entry::Block(slot) => {
                let block = &blocks[slot];
                for &index in &block.indices {
                    if let Some(bases) = block.base_by_index.get(&index) {
                        for tail in bases {
                            out.push(join_bracket(&block.root, index, tail));
                        }
                    }
                    for tail in &block.child_union {
                        out.push(join_bracket(&block.root, index, tail));
                    }
                }
            }
        }
    }
    out
}

/// One blank next index per distinct nested child array, mirroring the
/// grow-slot convention one level deeper.
fn grow_child_arrays(block: &mut Block) {
    let mut groups: Vec<(String, String, usize)> = Vec::new();
    for tail in &block.child_union {
        let Some((prop, child_index, suffix)) = split_first_bracket(tail) else {
            continue;
        };
        match groups
            .iter_mut()
            .find(|(p, s, _)| p == prop && s == suffix)
        {
            Some((_, _, max)) => *max = (*max).max(child_index),
            None => groups.push((prop.to_string(), suffix.to_string(), child_index)),
        }
    }
    for (prop, suffix, max) in groups {
        let synthetic = join_bracket(&prop, max + 1, &suffix);
        if !block.child_union.iter().any(|known| *known == synthetic) {
            block.child_union.push(synthetic);
        }
    }
}

/// Total order over columns: a path that runs out of segments first sorts
/// first; per segment, non-indexed sorts before indexed (plain columns
/// precede list blocks), then keys compare lexicographically, then indices
/// numerically.
pub fn compare_columns(a: &str, b: &str) -> Ordering {
    compare_paths(&Path::parse(a), &Path::parse(b))
}

fn compare_paths(a: &Path, b: &Path) -> Ordering {
    let mut i = 0;
    loop {
        match (a.segments().get(i), b.segments().get(i)) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = x.index.is_some().cmp(&y.index.is_some());
                if ord != Ordering::Equal {
                    return ord;
                }
                let ord = x.key.as_deref().unwrap_or("").cmp(y.key.as_deref().unwrap_or(""));
                if ord != Ordering::Equal {
                    return ord;
                }
                if let (Some(xi), Some(yi)) = (x.index, y.index) {
                    let ord = xi.cmp(&yi);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
            }
        }
        i += 1;
    }
}

/// Reorder a header under `compare_columns` and permute every row's cells
/// to match. The sort is stable, so repeating it is a no-op; a cell with
/// no counterpart in a short row maps to the empty string.
pub fn sort_header_and_rows(
    header: &[String],
    rows: &[Vec<String>],
) -> (Vec<String>, Vec<Vec<String>>) {
    let paths: Vec<Path> = header.iter().map(|col| Path::parse(col)).collect();
    let mut order: Vec<usize> = (0..header.len()).collect();
    order.sort_by(|&i, &j| compare_paths(&paths[i], &paths[j]));

    let sorted_header = order.iter().map(|&i| header[i].clone()).collect();
    let sorted_rows = rows
        .iter()
        .map(|row| {
            order
                .iter()
                .map(|&i| row.get(i).cloned().unwrap_or_default())
                .collect()
        })
        .collect();
    (sorted_header, sorted_rows)
}
