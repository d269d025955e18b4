use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Decode,
    Serialize,
    Deserialize,
}

/// Byte offset plus 1-based line/column of a decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Error)]
#[error("{}", render(.message, .location))]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub location: Option<Location>,
}

fn render(message: &str, location: &Option<Location>) -> String {
    match location {
        Some(loc) => format!("{message} at line {}, column {}", loc.line, loc.column),
        None => message.to_string(),
    }
}

impl Error {
    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Decode,
            message: message.into(),
            location: None,
        }
    }

    pub fn decode_at(message: impl Into<String>, location: Location) -> Self {
        Self {
            kind: ErrorKind::Decode,
            message: message.into(),
            location: Some(location),
        }
    }

    pub fn serialize(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Serialize,
            message: message.into(),
            location: None,
        }
    }

    pub fn deserialize(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Deserialize,
            message: message.into(),
            location: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn located_errors_mention_line_and_column() {
        let err = Error::decode_at(
            "unterminated quoted field",
            Location {
                offset: 12,
                line: 3,
                column: 5,
            },
        );
        assert_eq!(
            err.to_string(),
            "unterminated quoted field at line 3, column 5"
        );
    }

    #[rstest::rstest]
    fn plain_errors_are_just_the_message() {
        assert_eq!(Error::decode("bad input").to_string(), "bad input");
    }
}
