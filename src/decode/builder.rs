//! Build pass: fills a pre-sized arena in one scan, using the extent pass
//! to reserve child indices before their contents are parsed.
//!
//! Node indices come from a single monotonically increasing counter, and a
//! compound value needs a contiguous run for its children, so arrays and
//! objects are parsed in two stages. Stage one scans each element with the
//! extent pass, stores its raw input span as an `Unparsed` placeholder at
//! its reserved index, and moves on. Stage two revisits the reserved
//! indices in order and runs the full value parse on each recorded span,
//! replacing the placeholder. A node's index never changes after it is
//! assigned.

use crate::arena::{Document, ExternalView, Node, Sizes, Span};
use crate::combinator::{byte, require, skip_ws, Cursor, Failure, PResult};
use crate::decode::{grammar, sizing};
use crate::options::ParseOptions;

// Storage-plan violations are defects in one of the passes, not bad input.
// They travel as hard failures with these markers so the entry points can
// report them as capacity errors instead of syntax errors.
pub(crate) const NODE_PLAN: &str = "node arena";
pub(crate) const STRING_PLAN: &str = "string buffer";
pub(crate) const SIZING_PLAN: &str = "sizing plan";

/// Byte span of the next value, located without interpreting it. Delegates
/// to the sizing grammar so the two passes accept identical inputs and fail
/// identically, by construction.
fn extent<'a>(c: Cursor<'a>, depth: usize, options: &ParseOptions) -> PResult<'a, Span> {
    let ((), start) = skip_ws(c)?;
    let (_, rest) = sizing::value(start, depth, options)?;
    Ok((
        Span {
            start: start.offset(),
            end: rest.offset(),
        },
        rest,
    ))
}

pub(crate) struct TreeBuilder<'a> {
    input: &'a [u8],
    nodes: Vec<Node>,
    strings: Vec<u8>,
    string_capacity: usize,
}

impl<'a> TreeBuilder<'a> {
    pub(crate) fn new(input: &'a [u8], sizes: Sizes) -> Self {
        Self {
            input,
            nodes: vec![Node::Null; sizes.node_count],
            strings: Vec::with_capacity(sizes.string_bytes),
            string_capacity: sizes.string_bytes,
        }
    }

    /// Parse the document root into index 0 and verify the build consumed
    /// exactly the sizing pass's plan.
    pub(crate) fn finish(
        mut self,
        options: &ParseOptions,
    ) -> Result<(Document, Cursor<'a>), Failure> {
        let c = Cursor::new(self.input);
        let (next, rest) = self.value(c, 0, 1, 0, options)?;
        if next != self.nodes.len() || self.strings.len() != self.string_capacity {
            return Err(Failure::Hard {
                offset: rest.offset(),
                message: SIZING_PLAN,
            });
        }
        Ok((Document::new(self.nodes, self.strings), rest))
    }

    /// Write the value starting at `c` into the reserved index `idx`.
    /// `next` is the first free index; returns the new first-free index.
    fn value(
        &mut self,
        c: Cursor<'a>,
        idx: usize,
        next: usize,
        depth: usize,
        options: &ParseOptions,
    ) -> PResult<'a, usize> {
        let ((), c) = skip_ws(c)?;
        match grammar::boolean(c) {
            Ok((b, rest)) => {
                self.set(idx, Node::Bool(b), c.offset())?;
                return Ok((next, rest));
            }
            Err(Failure::Soft) => {}
            Err(hard) => return Err(hard),
        }
        match grammar::null(c) {
            Ok(((), rest)) => {
                self.set(idx, Node::Null, c.offset())?;
                return Ok((next, rest));
            }
            Err(Failure::Soft) => {}
            Err(hard) => return Err(hard),
        }
        match grammar::number(c) {
            Ok((value, rest)) => {
                self.set(idx, Node::Number(value), c.offset())?;
                return Ok((next, rest));
            }
            Err(Failure::Soft) => {}
            Err(hard) => return Err(hard),
        }
        match self.string(c) {
            Ok((view, rest)) => {
                self.set(idx, Node::String(view), c.offset())?;
                return Ok((next, rest));
            }
            Err(Failure::Soft) => {}
            Err(hard) => return Err(hard),
        }
        match self.array(c, idx, next, depth, options) {
            Err(Failure::Soft) => {}
            other => return other,
        }
        self.object(c, idx, next, depth, options)
    }

    /// Decode a string, appending its content to the shared string buffer.
    fn string(&mut self, c: Cursor<'a>) -> PResult<'a, ExternalView> {
        let (_, mut c) = byte(b'"')(c)?;
        let offset = self.strings.len();
        loop {
            match grammar::string_piece(c) {
                Ok((piece, rest)) => {
                    self.append_piece(&piece, c.offset())?;
                    c = rest;
                }
                Err(Failure::Soft) => break,
                Err(hard) => return Err(hard),
            }
        }
        let (_, c) = byte(b'"')(c)?;
        Ok((
            ExternalView {
                offset,
                extent: self.strings.len() - offset,
            },
            c,
        ))
    }

    fn append_piece(&mut self, piece: &grammar::StringPiece<'a>, offset: usize) -> Result<(), Failure> {
        if self.strings.len() + piece.encoded_len() > self.string_capacity {
            return Err(Failure::Hard {
                offset,
                message: STRING_PLAN,
            });
        }
        match piece {
            grammar::StringPiece::Plain(run) => self.strings.extend_from_slice(run),
            grammar::StringPiece::Byte(b) => self.strings.push(*b),
            grammar::StringPiece::Utf8(bytes) => self.strings.extend_from_slice(bytes),
        }
        Ok(())
    }

    fn array(
        &mut self,
        c: Cursor<'a>,
        idx: usize,
        next: usize,
        depth: usize,
        options: &ParseOptions,
    ) -> PResult<'a, usize> {
        let (_, mut body) = byte(b'[')(c)?;
        self.check_depth(c, depth, options)?;

        // stage one: record each element's span at its reserved index
        let mut reserved = next;
        match extent(body, depth + 1, options) {
            Ok((span, rest)) => {
                self.set(reserved, Node::Unparsed(span), body.offset())?;
                reserved += 1;
                body = rest;
                loop {
                    let ((), ws) = skip_ws(body)?;
                    let after_comma = match byte(b',')(ws) {
                        Ok((_, rest)) => rest,
                        Err(Failure::Soft) => break,
                        Err(hard) => return Err(hard),
                    };
                    match extent(after_comma, depth + 1, options) {
                        Ok((span, rest)) => {
                            self.set(reserved, Node::Unparsed(span), after_comma.offset())?;
                            reserved += 1;
                            body = rest;
                        }
                        // dangling comma: leave it unconsumed so the `]`
                        // check below reports it
                        Err(Failure::Soft) => break,
                        Err(hard) => return Err(hard),
                    }
                }
            }
            Err(Failure::Soft) => {}
            Err(hard) => return Err(hard),
        }
        let ((), body) = skip_ws(body)?;
        let (_, rest) = require(byte(b']'), "expected `]`")(body)?;
        self.set(
            idx,
            Node::Array(ExternalView {
                offset: next,
                extent: reserved - next,
            }),
            c.offset(),
        )?;

        // stage two: finalize each reserved element in index order
        let free = self.finalize(next, reserved, 1, depth, options, rest.offset())?;
        Ok((free, rest))
    }

    fn object(
        &mut self,
        c: Cursor<'a>,
        idx: usize,
        next: usize,
        depth: usize,
        options: &ParseOptions,
    ) -> PResult<'a, usize> {
        let (_, mut body) = byte(b'{')(c)?;
        self.check_depth(c, depth, options)?;

        // stage one: decode each key now, record each member value's span
        let mut reserved = next;
        match self.member_extent(body, depth, options) {
            Ok(((key, span), rest)) => {
                self.set(reserved, Node::String(key), body.offset())?;
                self.set(reserved + 1, Node::Unparsed(span), body.offset())?;
                reserved += 2;
                body = rest;
                loop {
                    let ((), ws) = skip_ws(body)?;
                    let after_comma = match byte(b',')(ws) {
                        Ok((_, rest)) => rest,
                        Err(Failure::Soft) => break,
                        Err(hard) => return Err(hard),
                    };
                    match self.member_extent(after_comma, depth, options) {
                        Ok(((key, span), rest)) => {
                            self.set(reserved, Node::String(key), after_comma.offset())?;
                            self.set(reserved + 1, Node::Unparsed(span), after_comma.offset())?;
                            reserved += 2;
                            body = rest;
                        }
                        Err(Failure::Soft) => break,
                        Err(hard) => return Err(hard),
                    }
                }
            }
            Err(Failure::Soft) => {}
            Err(hard) => return Err(hard),
        }
        let ((), body) = skip_ws(body)?;
        let (_, rest) = require(byte(b'}'), "expected `}`")(body)?;
        self.set(
            idx,
            Node::Object(ExternalView {
                offset: next,
                extent: reserved - next,
            }),
            c.offset(),
        )?;

        // stage two: finalize member values; keys are already final
        let free = self.finalize(next + 1, reserved, 2, depth, options, rest.offset())?;
        Ok((free, rest))
    }

    /// One `"key": value` member: the decoded key plus the value's span.
    /// Soft-fails only when no key string starts here; after a key, the
    /// colon and the value are required.
    fn member_extent(
        &mut self,
        c: Cursor<'a>,
        depth: usize,
        options: &ParseOptions,
    ) -> PResult<'a, (ExternalView, Span)> {
        let ((), c) = skip_ws(c)?;
        let (key, c) = self.string(c)?;
        let ((), c) = skip_ws(c)?;
        let (_, c) = require(byte(b':'), "expected `:` after object key")(c)?;
        match extent(c, depth + 1, options) {
            Ok((span, rest)) => Ok(((key, span), rest)),
            Err(Failure::Soft) => {
                let ((), at) = skip_ws(c)?;
                Err(Failure::Hard {
                    offset: at.offset(),
                    message: "expected value",
                })
            }
            Err(hard) => Err(hard),
        }
    }

    /// Run the full value parse over every reserved placeholder in
    /// `start..reserved`, stepping by `stride`, threading the free-index
    /// counter through the sub-parses.
    fn finalize(
        &mut self,
        start: usize,
        reserved: usize,
        stride: usize,
        depth: usize,
        options: &ParseOptions,
        offset: usize,
    ) -> Result<usize, Failure> {
        let mut free = reserved;
        let mut slot = start;
        while slot < reserved {
            let Node::Unparsed(span) = self.nodes[slot] else {
                return Err(Failure::Hard {
                    offset,
                    message: SIZING_PLAN,
                });
            };
            let sub = Cursor::with_offset(&self.input[span.start..span.end], span.start);
            let (new_free, _) = self.value(sub, slot, free, depth + 1, options)?;
            free = new_free;
            slot += stride;
        }
        Ok(free)
    }

    fn set(&mut self, idx: usize, node: Node, offset: usize) -> Result<(), Failure> {
        match self.nodes.get_mut(idx) {
            Some(slot) => {
                *slot = node;
                Ok(())
            }
            None => Err(Failure::Hard {
                offset,
                message: NODE_PLAN,
            }),
        }
    }

    fn check_depth(
        &self,
        c: Cursor<'a>,
        depth: usize,
        options: &ParseOptions,
    ) -> Result<(), Failure> {
        if depth >= options.max_depth {
            return Err(Failure::Hard {
                offset: c.offset(),
                message: "nesting depth limit exceeded",
            });
        }
        Ok(())
    }
}
