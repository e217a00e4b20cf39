//! Sizing pass: a parse over the full grammar that computes, without
//! building anything, the exact node count and decoded string byte count a
//! document requires.
//!
//! Composition is additive: a scalar is one node; a string is one node plus
//! its decoded length; an array is one node plus its children; an object is
//! one node plus two nodes per member (key, value) plus the value subtrees.
//! The build pass must consume exactly these numbers; any divergence is a
//! defect in one of the passes.

use crate::arena::Sizes;
use crate::combinator::{
    alt, byte, map, preceded, require, separated_by, skip_ws, Cursor, Failure, PResult,
};
use crate::decode::grammar;
use crate::options::ParseOptions;

pub(crate) fn value<'a>(c: Cursor<'a>, depth: usize, options: &ParseOptions) -> PResult<'a, Sizes> {
    let ((), c) = skip_ws(c)?;
    let scalar = map(
        alt(
            alt(map(grammar::boolean, |_| ()), grammar::null),
            map(grammar::number, |_| ()),
        ),
        |_| Sizes::scalar(),
    );
    let string = map(grammar::string_size, Sizes::string);
    let array_p = |c| array(c, depth, options);
    let object_p = |c| object(c, depth, options);
    alt(alt(scalar, string), alt(array_p, object_p))(c)
}

fn array<'a>(c: Cursor<'a>, depth: usize, options: &ParseOptions) -> PResult<'a, Sizes> {
    let (_, body) = byte(b'[')(c)?;
    check_depth(c, depth, options)?;
    let element = move |c| value(c, depth + 1, options);
    let comma = preceded(skip_ws, byte(b','));
    let (sizes, body) = separated_by(element, comma, Sizes::container(), |acc, s| acc + s)(body)?;
    let ((), body) = skip_ws(body)?;
    let (_, rest) = require(byte(b']'), "expected `]`")(body)?;
    Ok((sizes, rest))
}

fn object<'a>(c: Cursor<'a>, depth: usize, options: &ParseOptions) -> PResult<'a, Sizes> {
    let (_, body) = byte(b'{')(c)?;
    check_depth(c, depth, options)?;
    let member_p = move |c| member(c, depth, options);
    let comma = preceded(skip_ws, byte(b','));
    let (sizes, body) = separated_by(member_p, comma, Sizes::container(), |acc, s| acc + s)(body)?;
    let ((), body) = skip_ws(body)?;
    let (_, rest) = require(byte(b'}'), "expected `}`")(body)?;
    Ok((sizes, rest))
}

/// One `"key": value` member. Soft-fails only when no key string starts
/// here (which is how `{}` parses); once a key has parsed, the colon and
/// the value are required.
fn member<'a>(c: Cursor<'a>, depth: usize, options: &ParseOptions) -> PResult<'a, Sizes> {
    let ((), c) = skip_ws(c)?;
    let (key_len, c) = grammar::string_size(c)?;
    let ((), c) = skip_ws(c)?;
    let (_, c) = require(byte(b':'), "expected `:` after object key")(c)?;
    let (value_sizes, rest) = require_value(c, depth + 1, options)?;
    // the key consumes one node alongside the value's subtree
    Ok((
        Sizes {
            node_count: value_sizes.node_count + 1,
            string_bytes: value_sizes.string_bytes + key_len,
        },
        rest,
    ))
}

fn require_value<'a>(
    c: Cursor<'a>,
    depth: usize,
    options: &ParseOptions,
) -> PResult<'a, Sizes> {
    match value(c, depth, options) {
        Err(Failure::Soft) => {
            let ((), at) = skip_ws(c)?;
            Err(Failure::Hard {
                offset: at.offset(),
                message: "expected value",
            })
        }
        other => other,
    }
}

fn check_depth<'a>(c: Cursor<'a>, depth: usize, options: &ParseOptions) -> Result<(), Failure> {
    if depth >= options.max_depth {
        return Err(Failure::Hard {
            offset: c.offset(),
            message: "nesting depth limit exceeded",
        });
    }
    Ok(())
}
