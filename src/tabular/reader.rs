use memchr::{memchr, memchr2, memchr_iter};

use crate::error::{Error, Location};
use crate::options::{CsvReadOptions, Delimiter};
use crate::Result;

use super::Table;

/// Parse delimited text into a header and rows.
///
/// Quoted fields may contain the separator and embedded line breaks, with
/// `""` unescaping to a quote. A byte-order mark is stripped, `\r\n` and
/// `\n` both terminate records, and the separator is detected from the
/// first record when none is configured. The one reported failure is an
/// unterminated quoted field, located at its opening quote.
pub fn decode(text: &str, options: &CsvReadOptions) -> Result<Table> {
    let input = text.strip_prefix('\u{feff}').unwrap_or(text);
    let delimiter = options.delimiter.unwrap_or_else(|| detect_delimiter(input));

    let mut parser = Parser::new(input, delimiter.as_byte());
    let mut rows: Vec<Vec<String>> = Vec::new();
    while let Some(record) = parser.next_record()? {
        if options.skip_empty_lines && record.len() == 1 && record[0].is_empty() {
            continue;
        }
        rows.push(record);
    }

    let header = if options.has_header && !rows.is_empty() {
        rows.remove(0)
    } else {
        Vec::new()
    };
    Ok(Table { header, rows })
}

/// Pick the candidate separator with the most hits in the first line;
/// comma wins ties and empty input.
fn detect_delimiter(input: &str) -> Delimiter {
    let end = memchr(b'\n', input.as_bytes()).unwrap_or(input.len());
    let first_line = &input.as_bytes()[..end];
    let mut best = Delimiter::Comma;
    let mut best_count = memchr_iter(best.as_byte(), first_line).count();
    for candidate in [Delimiter::Tab, Delimiter::Pipe] {
        let count = memchr_iter(candidate.as_byte(), first_line).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

enum Terminator {
    Field,
    Record,
    Eof,
}

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    delimiter: u8,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, delimiter: u8) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            delimiter,
        }
    }

    fn next_record(&mut self) -> Result<Option<Vec<String>>> {
        if self.pos >= self.bytes.len() {
            return Ok(None);
        }
        let mut record = Vec::new();
        loop {
            let (field, terminator) = self.next_field()?;
            record.push(field);
            match terminator {
                Terminator::Field => continue,
                Terminator::Record | Terminator::Eof => return Ok(Some(record)),
            }
        }
    }

    fn next_field(&mut self) -> Result<(String, Terminator)> {
        if self.bytes.get(self.pos) == Some(&b'"') {
            self.quoted_field()
        } else {
            Ok(self.bare_field())
        }
    }

    fn bare_field(&mut self) -> (String, Terminator) {
        let rest = &self.bytes[self.pos..];
        match memchr2(self.delimiter, b'\n', rest) {
            Some(rel) => {
                let end = self.pos + rel;
                let terminator = if self.bytes[end] == self.delimiter {
                    Terminator::Field
                } else {
                    Terminator::Record
                };
                let mut slice = &self.input[self.pos..end];
                if matches!(terminator, Terminator::Record) {
                    slice = slice.strip_suffix('\r').unwrap_or(slice);
                }
                self.pos = end + 1;
                (slice.to_string(), terminator)
            }
            None => {
                let slice = &self.input[self.pos..];
                self.pos = self.bytes.len();
                (slice.to_string(), Terminator::Eof)
            }
        }
    }

    fn quoted_field(&mut self) -> Result<(String, Terminator)> {
        let open = self.pos;
        self.pos += 1;
        let mut field = String::new();
        loop {
            match memchr(b'"', &self.bytes[self.pos..]) {
                None => {
                    return Err(Error::decode_at(
                        "unterminated quoted field",
                        location_at(self.input, open),
                    ));
                }
                Some(rel) => {
                    let quote = self.pos + rel;
                    field.push_str(&self.input[self.pos..quote]);
                    if self.bytes.get(quote + 1) == Some(&b'"') {
                        // doubled quote inside a quoted field
                        field.push('"');
                        self.pos = quote + 2;
                    } else {
                        self.pos = quote + 1;
                        break;
                    }
                }
            }
        }
        // lenient: stray text between the closing quote and the next
        // separator or line break is taken literally
        let (rest, terminator) = self.bare_field();
        field.push_str(&rest);
        Ok((field, terminator))
    }
}

fn location_at(input: &str, offset: usize) -> Location {
    let mut line = 1;
    let mut line_start = 0;
    for newline in memchr_iter(b'\n', input[..offset].as_bytes()) {
        line += 1;
        line_start = newline + 1;
    }
    let column = input[line_start..offset].chars().count() + 1;
    Location {
        offset,
        line,
        column,
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::options::CsvReadOptions;

    use super::*;

    fn cells(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[rstest::rstest]
    fn splits_header_and_rows() {
        let table = decode("a,b\n1,2\n3,4", &CsvReadOptions::default()).unwrap();
        assert_eq!(table.header, cells(&["a", "b"]));
        assert_eq!(table.rows, vec![cells(&["1", "2"]), cells(&["3", "4"])]);
    }

    #[rstest::rstest]
    fn quoted_fields_keep_separators_and_breaks() {
        let table = decode(
            "a,b\n\"x,y\",\"line\nbreak\"\n\"say \"\"hi\"\"\",z",
            &CsvReadOptions::default(),
        )
        .unwrap();
        assert_eq!(
            table.rows,
            vec![cells(&["x,y", "line\nbreak"]), cells(&["say \"hi\"", "z"])]
        );
    }

    #[rstest::rstest]
    fn crlf_terminators_and_bom() {
        let table = decode("\u{feff}a,b\r\n1,2\r\n", &CsvReadOptions::default()).unwrap();
        assert_eq!(table.header, cells(&["a", "b"]));
        assert_eq!(table.rows, vec![cells(&["1", "2"])]);
    }

    #[rstest::rstest]
    fn empty_lines_are_skipped_by_default() {
        let table = decode("a\n\n1\n\n", &CsvReadOptions::default()).unwrap();
        assert_eq!(table.rows, vec![cells(&["1"])]);
    }

    #[rstest::rstest]
    fn empty_lines_kept_when_asked() {
        let options = CsvReadOptions::new().with_skip_empty_lines(false);
        let table = decode("a\n\n1", &options).unwrap();
        assert_eq!(table.rows, vec![cells(&[""]), cells(&["1"])]);
    }

    #[rstest::rstest]
    fn no_header_mode_keeps_first_record() {
        let options = CsvReadOptions::new().with_has_header(false);
        let table = decode("1,2\n3,4", &options).unwrap();
        assert!(table.header.is_empty());
        assert_eq!(table.rows, vec![cells(&["1", "2"]), cells(&["3", "4"])]);
    }

    #[rstest::rstest]
    #[case("a\tb\n1\t2", &["a", "b"])]
    #[case("a|b|c\n1|2|3", &["a", "b", "c"])]
    #[case("a,b\n1,2", &["a", "b"])]
    fn delimiter_auto_detection(#[case] text: &str, #[case] expected_header: &[&str]) {
        let table = decode(text, &CsvReadOptions::default()).unwrap();
        assert_eq!(table.header, cells(expected_header));
    }

    #[rstest::rstest]
    fn unterminated_quote_is_a_located_error() {
        let err = decode("a,b\n1,\"oops", &CsvReadOptions::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Decode);
        let location = err.location.unwrap();
        assert_eq!(location.line, 2);
        assert_eq!(location.column, 3);
    }

    #[rstest::rstest]
    fn empty_input_is_an_empty_table() {
        let table = decode("", &CsvReadOptions::default()).unwrap();
        assert!(table.is_empty());
    }
}
