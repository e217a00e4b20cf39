pub mod arena;
pub mod combinator;
pub mod decode;
pub mod encode;
pub mod error;
pub mod options;
pub mod value;

pub use crate::arena::{Document, ExternalView, Node, NodeKind, Sizes};
pub use crate::error::{Error, Location};
pub use crate::options::ParseOptions;
pub use crate::value::{ValueMut, ValueRef};

pub type Result<T> = std::result::Result<T, Error>;

/// Exact node and string-byte requirements of `input`, computed without
/// building anything.
pub fn measure(input: &str) -> Result<Sizes> {
    measure_with_options(input, &ParseOptions::default())
}

pub fn measure_with_options(input: &str, options: &ParseOptions) -> Result<Sizes> {
    decode::measure(input, options)
}

/// Parse `input` into an arena-backed document: one sizing scan, one
/// exact allocation, one build scan.
pub fn parse(input: &str) -> Result<Document> {
    parse_with_options(input, &ParseOptions::default())
}

pub fn parse_with_options(input: &str, options: &ParseOptions) -> Result<Document> {
    decode::parse(input, options)
}

pub fn validate_str(input: &str) -> Result<()> {
    validate_str_with_options(input, &ParseOptions::default())
}

pub fn validate_str_with_options(input: &str, options: &ParseOptions) -> Result<()> {
    decode::validate(input, options)
}

/// Render a parsed value back to JSON text.
pub fn to_string(value: ValueRef<'_>) -> String {
    encode::to_string(value)
}
