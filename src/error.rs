use std::fmt;

use thiserror::Error;

use crate::arena::NodeKind;

/// Position of a hard parse failure in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub(crate) fn from_offset(input: &[u8], offset: usize) -> Self {
        let mut line = 1;
        let mut column = 1;
        for &b in &input[..offset.min(input.len())] {
            if b == b'\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Hard parse failure: the grammar committed to a shape the input does
    /// not finish.
    #[error("syntax error at {location}: {message}")]
    Syntax {
        message: &'static str,
        location: Location,
    },

    /// Top-level soft failure: no grammar production matched at all.
    /// Soft failures carry no location.
    #[error("input does not match the JSON grammar")]
    NoMatch,

    #[error("trailing characters at {location}")]
    TrailingCharacters { location: Location },

    /// The build pass tried to exceed the storage plan from the sizing
    /// pass. Indicates a defect, not bad input.
    #[error("{what} capacity exceeded")]
    CapacityExceeded { what: &'static str },

    #[error("type mismatch: expected {}, found {}", expected.as_str(), found.as_str())]
    TypeMismatch { expected: NodeKind, found: NodeKind },

    #[error("key not found: {key:?}")]
    KeyNotFound { key: String },

    #[error("index {index} out of range for array of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("string content is not valid UTF-8")]
    InvalidUtf8,
}
