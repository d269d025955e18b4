/// Field separator for tabular text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
}

impl Delimiter {
    pub fn as_char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
        }
    }

    pub(crate) fn as_byte(self) -> u8 {
        self.as_char() as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// How array blocks are sized when a concrete header is built.
///
/// `Dynamic` expands each list root to the largest length the scanner saw;
/// `Fixed(k)` expands every root to exactly `k` slots, ignoring the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListStrategy {
    #[default]
    Dynamic,
    Fixed(usize),
}

/// What an empty cell means when a row is rebuilt into a record.
///
/// `Break` skips the cell entirely: no key is set and no array slot is
/// claimed. `Sparse` keeps a `null` placeholder at the cell's array
/// position so list lengths survive blank trailing cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GapMode {
    #[default]
    Break,
    Sparse,
}

/// How cell text is interpreted when a row is rebuilt into a record.
///
/// `Typed` re-parses `true`/`false`, JSON numbers, and JSON-structured
/// text into their JSON values; everything else stays a string.
/// `Verbatim` keeps every cell a JSON string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellParsing {
    #[default]
    Typed,
    Verbatim,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UnflattenOptions {
    pub gap_mode: GapMode,
    pub cell_parsing: CellParsing,
}

impl UnflattenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gap_mode(mut self, gap_mode: GapMode) -> Self {
        self.gap_mode = gap_mode;
        self
    }

    pub fn with_cell_parsing(mut self, cell_parsing: CellParsing) -> Self {
        self.cell_parsing = cell_parsing;
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvWriteOptions {
    pub delimiter: Delimiter,
    pub line_ending: LineEnding,
    pub byte_order_mark: bool,
}

impl CsvWriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    pub fn with_byte_order_mark(mut self, byte_order_mark: bool) -> Self {
        self.byte_order_mark = byte_order_mark;
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CsvReadOptions {
    /// Explicit separator; `None` auto-detects from the first record.
    pub delimiter: Option<Delimiter>,
    pub has_header: bool,
    pub skip_empty_lines: bool,
}

impl CsvReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_has_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_skip_empty_lines(mut self, skip_empty_lines: bool) -> Self {
        self.skip_empty_lines = skip_empty_lines;
        self
    }
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            skip_empty_lines: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub strategy: ListStrategy,
    pub gap_mode: GapMode,
    pub cell_parsing: CellParsing,
    /// Blank "next row" slots appended to every list block after a scan.
    pub grow_extra: usize,
}

impl SessionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, strategy: ListStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_gap_mode(mut self, gap_mode: GapMode) -> Self {
        self.gap_mode = gap_mode;
        self
    }

    pub fn with_cell_parsing(mut self, cell_parsing: CellParsing) -> Self {
        self.cell_parsing = cell_parsing;
        self
    }

    pub fn with_grow_extra(mut self, grow_extra: usize) -> Self {
        self.grow_extra = grow_extra;
        self
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            strategy: ListStrategy::Dynamic,
            gap_mode: GapMode::Break,
            cell_parsing: CellParsing::Typed,
            grow_extra: 1,
        }
    }
}
