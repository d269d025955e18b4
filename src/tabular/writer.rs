use crate::options::CsvWriteOptions;

use super::Table;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Serialize a table as delimited text: header line first (skipped when the
/// header is empty), rows joined with the configured line ending, no
/// trailing newline.
pub fn encode(table: &Table, options: &CsvWriteOptions) -> String {
    let mut writer = Writer::new(options);
    if !table.header.is_empty() {
        writer.write_record(&table.header);
    }
    for row in &table.rows {
        writer.write_record(row);
    }
    writer.finish()
}

struct Writer {
    buffer: String,
    delimiter: char,
    line_ending: &'static str,
    records: usize,
}

impl Writer {
    fn new(options: &CsvWriteOptions) -> Self {
        let mut buffer = String::new();
        if options.byte_order_mark {
            buffer.push(BYTE_ORDER_MARK);
        }
        Self {
            buffer,
            delimiter: options.delimiter.as_char(),
            line_ending: options.line_ending.as_str(),
            records: 0,
        }
    }

    fn write_record(&mut self, cells: &[String]) {
        if self.records > 0 {
            self.buffer.push_str(self.line_ending);
        }
        self.records += 1;
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                self.buffer.push(self.delimiter);
            }
            self.write_field(cell);
        }
    }

    fn write_field(&mut self, field: &str) {
        if !needs_quoting(field, self.delimiter) {
            self.buffer.push_str(field);
            return;
        }
        self.buffer.push('"');
        for ch in field.chars() {
            if ch == '"' {
                self.buffer.push('"');
            }
            self.buffer.push(ch);
        }
        self.buffer.push('"');
    }

    fn finish(self) -> String {
        self.buffer
    }
}

/// A field is quoted iff it contains the separator, a quote, or a line
/// break.
fn needs_quoting(field: &str, delimiter: char) -> bool {
    field
        .chars()
        .any(|ch| ch == delimiter || ch == '"' || ch == '\n' || ch == '\r')
}
