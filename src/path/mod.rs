use std::fmt;

use smallvec::SmallVec;
use smol_str::SmolStr;

/// One step of tree addressing: a named field, an array position, or both
/// (`items[2]` is one segment: key `items`, index `2`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub key: Option<SmolStr>,
    pub index: Option<usize>,
}

impl Segment {
    pub fn key(key: &str) -> Self {
        Self {
            key: Some(SmolStr::new(key)),
            index: None,
        }
    }

    pub fn keyed_index(key: &str, index: usize) -> Self {
        Self {
            key: Some(SmolStr::new(key)),
            index: Some(index),
        }
    }

    pub fn bare_index(index: usize) -> Self {
        Self {
            key: None,
            index: Some(index),
        }
    }
}

/// A parsed column identifier, e.g. `items[0].stats.hp`.
///
/// Paths are immutable values compared by their string form; `Display`
/// round-trips every string this crate generates itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    segments: SmallVec<[Segment; 4]>,
}

impl Path {
    /// Parse a dotted/bracketed column string.
    ///
    /// Lenient by contract: a part with neither key nor index is dropped,
    /// and a part whose bracket text is malformed (`a[x]`, `a[1`) keeps the
    /// whole text as its key.
    ///
    /// # Examples
    /// ```
    /// use jsontab::path::Path;
    ///
    /// let path = Path::parse("items[0].stats.hp");
    /// assert_eq!(path.to_string(), "items[0].stats.hp");
    /// assert_eq!(path.segments().len(), 3);
    /// ```
    pub fn parse(col: &str) -> Self {
        let mut segments = SmallVec::new();
        for part in col.split('.') {
            match split_bracket_suffix(part) {
                Some((key, index)) if key.is_empty() => {
                    segments.push(Segment::bare_index(index));
                }
                Some((key, index)) => {
                    segments.push(Segment::keyed_index(key, index));
                }
                None if part.is_empty() => {}
                None => segments.push(Segment::key(part)),
            }
        }
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            if let Some(key) = &segment.key {
                f.write_str(key)?;
            }
            if let Some(index) = segment.index {
                write!(f, "[{index}]")?;
            }
        }
        Ok(())
    }
}

/// Split a dot-part at its trailing `[digits]`, if it has one.
fn split_bracket_suffix(part: &str) -> Option<(&str, usize)> {
    if !part.ends_with(']') {
        return None;
    }
    let open = part.rfind('[')?;
    let digits = &part[open + 1..part.len() - 1];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index = digits.parse().ok()?;
    Some((&part[..open], index))
}

/// Split a column at its *rightmost* `[digits]` whose tail is empty or
/// dot-led, falling back leftwards; `None` if the column addresses no
/// array. This is the decomposition the header builder keys roots by:
/// `a[0].b[0].c` splits into (`a[0].b`, 0, `.c`).
pub fn split_last_bracket(col: &str) -> Option<(&str, usize, &str)> {
    let mut end = col.len();
    while let Some(close) = col[..end].rfind(']') {
        let tail = &col[close + 1..];
        if tail.is_empty() || tail.starts_with('.') {
            if let Some(open) = col[..close].rfind('[') {
                let digits = &col[open + 1..close];
                if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                    if let Ok(index) = digits.parse() {
                        return Some((&col[..open], index, tail));
                    }
                }
            }
        }
        end = close;
    }
    None
}

/// Split a column at its *leftmost* `[digits]`: the top-level list root the
/// reconciliation algorithms group blocks by. `a[0].b[0].c` splits into
/// (`a`, 0, `.b[0].c`).
pub fn split_first_bracket(col: &str) -> Option<(&str, usize, &str)> {
    let mut search = 0;
    while let Some(open) = col[search..].find('[').map(|i| search + i) {
        let Some(close) = col[open + 1..].find(']').map(|i| open + 1 + i) else {
            break;
        };
        let digits = &col[open + 1..close];
        let tail = &col[close + 1..];
        if !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
            && (tail.is_empty() || tail.starts_with('.') || tail.starts_with('['))
        {
            if let Ok(index) = digits.parse() {
                return Some((&col[..open], index, tail));
            }
        }
        search = open + 1;
    }
    None
}

/// Re-assemble a column from a root, an index, and a tail.
pub(crate) fn join_bracket(root: &str, index: usize, tail: &str) -> String {
    let mut out = String::with_capacity(root.len() + tail.len() + 4);
    out.push_str(root);
    out.push('[');
    let mut buf = itoa::Buffer::new();
    out.push_str(buf.format(index));
    out.push(']');
    out.push_str(tail);
    out
}
