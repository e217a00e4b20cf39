//! Navigation over a built arena. A handle is an index plus a document
//! reference; every operation returns an explicit `Result` and never
//! panics on type or bounds errors.

use std::fmt;

use crate::arena::{Document, ExternalView, Node, NodeKind};
use crate::error::Error;
use crate::Result;

/// Read-only handle on one node of a document.
#[derive(Clone, Copy, Debug)]
pub struct ValueRef<'doc> {
    index: usize,
    doc: &'doc Document,
}

impl<'doc> ValueRef<'doc> {
    pub(crate) fn new(doc: &'doc Document, index: usize) -> Self {
        Self { doc, index }
    }

    pub(crate) fn document(&self) -> &'doc Document {
        self.doc
    }

    pub(crate) fn node_index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> NodeKind {
        self.doc.node(self.index).kind()
    }

    pub fn is_null(&self) -> bool {
        matches!(self.doc.node(self.index), Node::Null)
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self.doc.node(self.index) {
            Node::Bool(b) => Ok(*b),
            other => Err(mismatch(NodeKind::Bool, other)),
        }
    }

    pub fn as_f64(&self) -> Result<f64> {
        match self.doc.node(self.index) {
            Node::Number(n) => Ok(*n),
            other => Err(mismatch(NodeKind::Number, other)),
        }
    }

    /// Decoded string content as raw bytes. Escape decoding can produce
    /// non-UTF-8 content (lone surrogate escapes), so bytes are the
    /// lossless view.
    pub fn as_bytes(&self) -> Result<&'doc [u8]> {
        match self.doc.node(self.index) {
            Node::String(view) => Ok(self.doc.str_bytes(*view)),
            other => Err(mismatch(NodeKind::String, other)),
        }
    }

    pub fn as_str(&self) -> Result<&'doc str> {
        std::str::from_utf8(self.as_bytes()?).map_err(|_| Error::InvalidUtf8)
    }

    pub fn array_len(&self) -> Result<usize> {
        Ok(self.array_view()?.extent)
    }

    /// Element `index` of an array value.
    pub fn get(&self, index: usize) -> Result<ValueRef<'doc>> {
        let view = self.array_view()?;
        if index >= view.extent {
            return Err(Error::IndexOutOfRange {
                index,
                len: view.extent,
            });
        }
        Ok(ValueRef::new(self.doc, view.offset + index))
    }

    pub fn object_len(&self) -> Result<usize> {
        Ok(self.object_view()?.extent / 2)
    }

    /// Member lookup by key: a linear scan over the object's key/value
    /// pairs comparing decoded key bytes.
    pub fn member(&self, key: impl AsRef<[u8]>) -> Result<ValueRef<'doc>> {
        let view = self.object_view()?;
        let key = key.as_ref();
        let mut i = view.offset;
        let end = view.offset + view.extent;
        while i < end {
            if let Node::String(kv) = self.doc.node(i) {
                if self.doc.str_bytes(*kv) == key {
                    return Ok(ValueRef::new(self.doc, i + 1));
                }
            }
            i += 2;
        }
        Err(Error::KeyNotFound {
            key: String::from_utf8_lossy(key).into_owned(),
        })
    }

    /// Iterate the elements of an array value.
    pub fn elements(&self) -> Result<Elements<'doc>> {
        let view = self.array_view()?;
        Ok(Elements {
            doc: self.doc,
            next: view.offset,
            end: view.offset + view.extent,
        })
    }

    /// Iterate the `(key bytes, value)` pairs of an object value.
    pub fn entries(&self) -> Result<Entries<'doc>> {
        let view = self.object_view()?;
        Ok(Entries {
            doc: self.doc,
            next: view.offset,
            end: view.offset + view.extent,
        })
    }

    fn array_view(&self) -> Result<ExternalView> {
        match self.doc.node(self.index) {
            Node::Array(view) => Ok(*view),
            other => Err(mismatch(NodeKind::Array, other)),
        }
    }

    fn object_view(&self) -> Result<ExternalView> {
        match self.doc.node(self.index) {
            Node::Object(view) => Ok(*view),
            other => Err(mismatch(NodeKind::Object, other)),
        }
    }
}

impl fmt::Display for ValueRef<'_> {
    /// Renders the value as JSON text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::encode::to_string(*self))
    }
}

fn mismatch(expected: NodeKind, found: &Node) -> Error {
    Error::TypeMismatch {
        expected,
        found: found.kind(),
    }
}

pub struct Elements<'doc> {
    doc: &'doc Document,
    next: usize,
    end: usize,
}

impl<'doc> Iterator for Elements<'doc> {
    type Item = ValueRef<'doc>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let item = ValueRef::new(self.doc, self.next);
        self.next += 1;
        Some(item)
    }
}

impl ExactSizeIterator for Elements<'_> {
    fn len(&self) -> usize {
        self.end - self.next
    }
}

pub struct Entries<'doc> {
    doc: &'doc Document,
    next: usize,
    end: usize,
}

impl<'doc> Iterator for Entries<'doc> {
    type Item = (&'doc [u8], ValueRef<'doc>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next + 1 >= self.end {
            return None;
        }
        let key = match self.doc.node(self.next) {
            Node::String(view) => self.doc.str_bytes(*view),
            _ => return None,
        };
        let value = ValueRef::new(self.doc, self.next + 1);
        self.next += 2;
        Some((key, value))
    }
}

/// Mutable handle: same navigation as [`ValueRef`], plus in-place scalar
/// mutation. Extents are not editable through this API; a caller who edits
/// nodes through other means owns the arena invariants.
pub struct ValueMut<'doc> {
    index: usize,
    doc: &'doc mut Document,
}

impl<'doc> ValueMut<'doc> {
    pub(crate) fn new(doc: &'doc mut Document, index: usize) -> Self {
        Self { doc, index }
    }

    /// Read-only view of the same node.
    pub fn as_ref(&self) -> ValueRef<'_> {
        ValueRef::new(self.doc, self.index)
    }

    pub fn get_mut(self, index: usize) -> Result<ValueMut<'doc>> {
        let target = ValueRef::new(self.doc, self.index).get(index)?.index;
        Ok(ValueMut::new(self.doc, target))
    }

    pub fn member_mut(self, key: impl AsRef<[u8]>) -> Result<ValueMut<'doc>> {
        let target = ValueRef::new(self.doc, self.index).member(key)?.index;
        Ok(ValueMut::new(self.doc, target))
    }

    pub fn as_bool_mut(self) -> Result<&'doc mut bool> {
        let found = self.doc.node(self.index).kind();
        match self.doc.node_mut(self.index) {
            Node::Bool(value) => Ok(value),
            _ => Err(Error::TypeMismatch {
                expected: NodeKind::Bool,
                found,
            }),
        }
    }

    pub fn as_f64_mut(self) -> Result<&'doc mut f64> {
        let found = self.doc.node(self.index).kind();
        match self.doc.node_mut(self.index) {
            Node::Number(value) => Ok(value),
            _ => Err(Error::TypeMismatch {
                expected: NodeKind::Number,
                found,
            }),
        }
    }
}
