//! Flat, index-addressed storage for parsed documents.
//!
//! A parsed document is a fixed-length run of [`Node`]s plus one shared
//! byte buffer holding all decoded string content. Compound nodes point at
//! contiguous sub-ranges of the node arena via [`ExternalView`]; string
//! nodes point into the string buffer the same way. Node 0 is always the
//! document root.

use std::fmt;
use std::ops::{Add, AddAssign};

use crate::value::{ValueMut, ValueRef};

/// A half-open range into external storage: either the node arena (arrays,
/// objects) or the string buffer (strings).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalView {
    pub offset: usize,
    pub extent: usize,
}

/// A byte range of the raw input, recorded by the extent pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// One arena element.
///
/// `Unparsed` holds a raw input span while a compound value's children wait
/// for their second-stage parse; it never survives in a finished
/// [`Document`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Number(f64),
    String(ExternalView),
    Array(ExternalView),
    Object(ExternalView),
    Unparsed(Span),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Null => NodeKind::Null,
            Node::Bool(_) => NodeKind::Bool,
            Node::Number(_) => NodeKind::Number,
            Node::String(_) => NodeKind::String,
            Node::Array(_) => NodeKind::Array,
            Node::Object(_) => NodeKind::Object,
            Node::Unparsed(_) => NodeKind::Unparsed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
    Unparsed,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Null => "null",
            NodeKind::Bool => "boolean",
            NodeKind::Number => "number",
            NodeKind::String => "string",
            NodeKind::Array => "array",
            NodeKind::Object => "object",
            NodeKind::Unparsed => "unparsed",
        }
    }
}

/// Exact storage requirements of a document, computed by the sizing pass
/// before any storage commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sizes {
    pub node_count: usize,
    pub string_bytes: usize,
}

impl Sizes {
    /// A scalar occupies one node and no string bytes.
    pub(crate) const fn scalar() -> Self {
        Self {
            node_count: 1,
            string_bytes: 0,
        }
    }

    /// A string occupies one node plus its decoded content.
    pub(crate) const fn string(decoded_len: usize) -> Self {
        Self {
            node_count: 1,
            string_bytes: decoded_len,
        }
    }

    /// The node an array or object itself occupies; children add on top.
    pub(crate) const fn container() -> Self {
        Self::scalar()
    }
}

impl Add for Sizes {
    type Output = Sizes;

    fn add(self, other: Sizes) -> Sizes {
        Sizes {
            node_count: self.node_count + other.node_count,
            string_bytes: self.string_bytes + other.string_bytes,
        }
    }
}

impl AddAssign for Sizes {
    fn add_assign(&mut self, other: Sizes) {
        *self = *self + other;
    }
}

/// A fully built document: the node arena and the decoded string buffer.
///
/// Both buffers are allocated once at the exact size reported by the sizing
/// pass and populated exactly once by the build pass; nothing moves or is
/// freed until the document is dropped.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    strings: Vec<u8>,
}

impl Document {
    pub(crate) fn new(nodes: Vec<Node>, strings: Vec<u8>) -> Self {
        Self { nodes, strings }
    }

    /// Navigation handle at the document root.
    pub fn root(&self) -> ValueRef<'_> {
        ValueRef::new(self, 0)
    }

    /// Mutable navigation handle at the document root.
    pub fn root_mut(&mut self) -> ValueMut<'_> {
        ValueMut::new(self, 0)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn string_bytes(&self) -> usize {
        self.strings.len()
    }

    /// Actual storage consumption; equals the sizing pass output for the
    /// same input.
    pub fn sizes(&self) -> Sizes {
        Sizes {
            node_count: self.nodes.len(),
            string_bytes: self.strings.len(),
        }
    }

    pub(crate) fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    pub(crate) fn node_mut(&mut self, index: usize) -> &mut Node {
        &mut self.nodes[index]
    }

    pub(crate) fn str_bytes(&self, view: ExternalView) -> &[u8] {
        &self.strings[view.offset..view.offset + view.extent]
    }
}

impl fmt::Display for Document {
    /// Renders the whole document as JSON text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root(), f)
    }
}
