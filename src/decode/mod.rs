//! Decoding entry points: the sizing pass, the build pass, and the
//! conversion from parser failures to crate errors.

pub(crate) mod grammar;

mod builder;
mod sizing;

use crate::arena::{Document, Sizes};
use crate::combinator::{eat_ws, Cursor, Failure};
use crate::error::{Error, Location};
use crate::options::ParseOptions;
use crate::Result;

use builder::TreeBuilder;

/// Compute the exact arena and string-buffer sizes `input` requires,
/// without building anything.
pub fn measure(input: &str, options: &ParseOptions) -> Result<Sizes> {
    let bytes = input.as_bytes();
    match sizing::value(Cursor::new(bytes), 0, options) {
        Ok((sizes, rest)) => {
            ensure_end(bytes, rest)?;
            Ok(sizes)
        }
        Err(failure) => Err(failure_to_error(bytes, failure)),
    }
}

/// Two full scans: size the document, allocate exactly, build write-once.
pub fn parse(input: &str, options: &ParseOptions) -> Result<Document> {
    let sizes = measure(input, options)?;
    let bytes = input.as_bytes();
    match TreeBuilder::new(bytes, sizes).finish(options) {
        Ok((doc, rest)) => {
            ensure_end(bytes, rest)?;
            Ok(doc)
        }
        Err(failure) => Err(build_failure_to_error(bytes, failure)),
    }
}

/// Check that `input` is a single well-formed JSON value. Runs the sizing
/// pass only.
pub fn validate(input: &str, options: &ParseOptions) -> Result<()> {
    measure(input, options).map(|_| ())
}

fn ensure_end(input: &[u8], rest: Cursor<'_>) -> Result<()> {
    let rest = eat_ws(rest);
    if rest.is_empty() {
        Ok(())
    } else {
        Err(Error::TrailingCharacters {
            location: Location::from_offset(input, rest.offset()),
        })
    }
}

fn failure_to_error(input: &[u8], failure: Failure) -> Error {
    match failure {
        Failure::Soft => Error::NoMatch,
        Failure::Hard { offset, message } => Error::Syntax {
            message,
            location: Location::from_offset(input, offset),
        },
    }
}

/// Build-pass failures additionally cover storage-plan violations, which
/// indicate a defect in one of the passes rather than malformed input.
fn build_failure_to_error(input: &[u8], failure: Failure) -> Error {
    if let Failure::Hard { message, .. } = failure {
        if matches!(
            message,
            builder::NODE_PLAN | builder::STRING_PLAN | builder::SIZING_PLAN
        ) {
            return Error::CapacityExceeded { what: message };
        }
    }
    failure_to_error(input, failure)
}
