//! JSON text writer over a built arena. Closes the round-trip loop; not a
//! canonicalizing serializer.

use std::fmt::Write;

use crate::arena::{Document, Node};
use crate::value::ValueRef;

/// Render a value (and everything below it) as JSON text.
pub fn to_string(value: ValueRef<'_>) -> String {
    let mut out = String::new();
    write_node(&mut out, value.document(), value.node_index());
    out
}

fn write_node(out: &mut String, doc: &Document, index: usize) {
    match doc.node(index) {
        Node::Null => out.push_str("null"),
        Node::Bool(true) => out.push_str("true"),
        Node::Bool(false) => out.push_str("false"),
        Node::Number(value) => write_number(out, *value),
        Node::String(view) => write_string(out, doc.str_bytes(*view)),
        Node::Array(view) => {
            out.push('[');
            for i in 0..view.extent {
                if i > 0 {
                    out.push(',');
                }
                write_node(out, doc, view.offset + i);
            }
            out.push(']');
        }
        Node::Object(view) => {
            out.push('{');
            let mut i = view.offset;
            let end = view.offset + view.extent;
            while i < end {
                if i > view.offset {
                    out.push(',');
                }
                write_node(out, doc, i);
                out.push(':');
                write_node(out, doc, i + 1);
                i += 2;
            }
            out.push('}');
        }
        // never present in a finished document
        Node::Unparsed(_) => out.push_str("null"),
    }
}

fn write_number(out: &mut String, value: f64) {
    if !value.is_finite() {
        out.push_str("null");
        return;
    }
    // integer-valued doubles print as integers
    if value.fract() == 0.0 && value.abs() <= i64::MAX as f64 {
        let mut buf = itoa::Buffer::new();
        out.push_str(buf.format(value as i64));
        return;
    }
    let mut buf = ryu::Buffer::new();
    out.push_str(buf.format(value));
}

fn write_string(out: &mut String, mut bytes: &[u8]) {
    out.push('"');
    while !bytes.is_empty() {
        match std::str::from_utf8(bytes) {
            Ok(text) => {
                write_escaped(out, text);
                break;
            }
            Err(err) => {
                let (valid, rest) = bytes.split_at(err.valid_up_to());
                if let Ok(text) = std::str::from_utf8(valid) {
                    write_escaped(out, text);
                }
                // a lone surrogate escape decodes to an ED xx xx sequence;
                // re-escape it so the output stays valid JSON text
                if rest.len() >= 3 && rest[0] == 0xED {
                    let code = (u32::from(rest[0] & 0x0F) << 12)
                        | (u32::from(rest[1] & 0x3F) << 6)
                        | u32::from(rest[2] & 0x3F);
                    let _ = write!(out, "\\u{code:04X}");
                    bytes = &rest[3..];
                } else {
                    out.push_str("\\uFFFD");
                    bytes = &rest[1..];
                }
            }
        }
    }
    out.push('"');
}

fn write_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            ch if (ch as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04X}", ch as u32);
            }
            ch => out.push(ch),
        }
    }
}
