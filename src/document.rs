//! Parsed documents and value views.
//!
//! A [`Document`] owns the node and string arenas produced by a successful
//! parse and is frozen from then on: any number of readers may traverse it
//! concurrently, and the borrow checker keeps every [`Value`] view from
//! outliving it. A [`Value`] is a copyable `(document, node index)` pair
//! that reads the underlying record on demand.
//!
//! Accessors never fail. A type-mismatched read returns a documented
//! default (`false`, zero, the empty string) and missing lookups return
//! `None`, which keeps traversal code branchless per access.

#[cfg(not(test))]
use alloc::vec::Vec;

use core::fmt;

use crate::arena::{NodeArena, StringArena};
use crate::error::Error;
use crate::node::{Node, NodeId, Tag};
use crate::options::StringifyOptions;
use crate::stringify;

/// Public value kinds. Short and long strings both read as
/// [`Kind::String`]; the numeric codes otherwise match the storage tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Kind {
    Null = 0,
    False = 1,
    True = 3,
    Int = 4,
    Float = 5,
    String = 6,
    Array = 8,
    Object = 9,
}

impl Kind {
    /// Human-readable type name.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::False => "false",
            Kind::True => "true",
            Kind::Int => "integer",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An immutable parsed JSON document.
///
/// Created by [`parse`](crate::parse); dropping it releases both arenas at
/// once. No node is ever freed or moved individually.
#[derive(Debug)]
pub struct Document {
    nodes: NodeArena,
    strings: StringArena,
    root: NodeId,
}

impl Document {
    pub(crate) fn from_parts(nodes: NodeArena, strings: StringArena, root: NodeId) -> Self {
        Self {
            nodes,
            strings,
            root,
        }
    }

    /// The root value.
    pub fn root(&self) -> Value<'_> {
        Value {
            doc: self,
            id: self.root,
        }
    }

    /// Number of value nodes in the document (object keys included).
    pub fn value_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total bytes held by the document's arenas.
    pub fn memory_usage(&self) -> usize {
        core::mem::size_of::<Self>() + self.nodes.capacity_bytes() + self.strings.capacity_bytes()
    }

    /// Serialize the root value with default options.
    pub fn stringify(&self) -> Result<Vec<u8>, Error> {
        self.root().stringify()
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.nodes.get(id)
    }

    pub(crate) fn string_slice(&self, offset: usize, len: usize) -> &[u8] {
        self.strings.slice(offset, len)
    }
}

/// Parse a JSON file.
///
/// A convenience wrapper over [`parse`](crate::parse); read failures map to
/// [`ErrorKind::Io`](crate::ErrorKind::Io).
#[cfg(feature = "std")]
pub fn parse_file<P: AsRef<std::path::Path>>(path: P) -> Result<Document, Error> {
    use crate::error::ErrorKind;
    let bytes = std::fs::read(path).map_err(|_| Error::bare(ErrorKind::Io, "cannot read file"))?;
    crate::parse(&bytes)
}

/// A read-only view of one value in a [`Document`].
///
/// Copyable and 16 bytes wide; it stores no parsed data, only the document
/// reference and the node index, and reads slots on demand.
#[derive(Clone, Copy)]
pub struct Value<'doc> {
    doc: &'doc Document,
    id: NodeId,
}

impl<'doc> Value<'doc> {
    #[inline]
    fn node(&self) -> &'doc Node {
        self.doc.node(self.id)
    }

    fn at_id(&self, id: NodeId) -> Value<'doc> {
        Value { doc: self.doc, id }
    }

    /// The value's kind, with both string forms normalized to
    /// [`Kind::String`].
    pub fn kind(&self) -> Kind {
        match self.node().tag() {
            Tag::Null => Kind::Null,
            Tag::False => Kind::False,
            Tag::True => Kind::True,
            Tag::Int => Kind::Int,
            Tag::Float => Kind::Float,
            Tag::ShortStr | Tag::LongStr => Kind::String,
            Tag::Array => Kind::Array,
            Tag::Object => Kind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        self.node().tag() == Tag::Null
    }

    pub fn is_bool(&self) -> bool {
        matches!(self.node().tag(), Tag::False | Tag::True)
    }

    pub fn is_true(&self) -> bool {
        self.node().tag() == Tag::True
    }

    pub fn is_false(&self) -> bool {
        self.node().tag() == Tag::False
    }

    pub fn is_int(&self) -> bool {
        self.node().tag() == Tag::Int
    }

    pub fn is_float(&self) -> bool {
        self.node().tag() == Tag::Float
    }

    pub fn is_number(&self) -> bool {
        matches!(self.node().tag(), Tag::Int | Tag::Float)
    }

    pub fn is_string(&self) -> bool {
        matches!(self.node().tag(), Tag::ShortStr | Tag::LongStr)
    }

    pub fn is_array(&self) -> bool {
        self.node().tag() == Tag::Array
    }

    pub fn is_object(&self) -> bool {
        self.node().tag() == Tag::Object
    }

    pub fn is_container(&self) -> bool {
        matches!(self.node().tag(), Tag::Array | Tag::Object)
    }

    /// Boolean value; `false` for anything that is not `true`.
    pub fn as_bool(&self) -> bool {
        self.is_true()
    }

    /// Integer value. Floats truncate toward zero (saturating at the i64
    /// range); non-numbers read as 0.
    pub fn as_i64(&self) -> i64 {
        let node = self.node();
        match node.tag() {
            Tag::Int => node.int_value(),
            Tag::Float => node.float_value() as i64,
            _ => 0,
        }
    }

    /// Unsigned integer value; negative numbers and non-numbers read as 0.
    pub fn as_u64(&self) -> u64 {
        let v = self.as_i64();
        if v < 0 {
            0
        } else {
            v as u64
        }
    }

    /// Floating-point value. Integers convert; non-numbers read as 0.0.
    pub fn as_f64(&self) -> f64 {
        let node = self.node();
        match node.tag() {
            Tag::Float => node.float_value(),
            Tag::Int => node.int_value() as f64,
            _ => 0.0,
        }
    }

    /// Raw string bytes; empty for non-strings.
    pub fn str_bytes(&self) -> &'doc [u8] {
        let node = self.node();
        match node.tag() {
            Tag::ShortStr => node.short_str_bytes(),
            Tag::LongStr => self
                .doc
                .string_slice(node.long_str_offset(), node.long_str_len()),
            _ => b"",
        }
    }

    /// String length in bytes; 0 for non-strings.
    pub fn str_len(&self) -> usize {
        let node = self.node();
        match node.tag() {
            Tag::ShortStr => node.short_str_bytes().len(),
            Tag::LongStr => node.long_str_len(),
            _ => 0,
        }
    }

    /// String value; empty for non-strings and for string bytes that are
    /// not valid UTF-8.
    pub fn as_str(&self) -> &'doc str {
        core::str::from_utf8(self.str_bytes()).unwrap_or("")
    }

    /// Number of elements or members; 0 for non-containers.
    pub fn len(&self) -> usize {
        if !self.is_container() {
            return 0;
        }
        let mut count = 0;
        let mut cursor = self.node().first_child();
        while let Some(id) = cursor {
            count += 1;
            cursor = self.doc.node(id).next();
        }
        count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Object member lookup by key: a linear walk of the key chain in
    /// insertion order. `None` for missing keys and non-objects.
    pub fn get(&self, key: &str) -> Option<Value<'doc>> {
        self.get_bytes(key.as_bytes())
    }

    /// Byte-level variant of [`get`](Self::get), for keys that are not
    /// valid UTF-8.
    pub fn get_bytes(&self, key: &[u8]) -> Option<Value<'doc>> {
        if self.node().tag() != Tag::Object {
            return None;
        }
        let mut cursor = self.node().first_child();
        while let Some(key_id) = cursor {
            let key_value = self.at_id(key_id);
            if key_value.str_bytes() == key {
                return self.doc.node(key_id).member_value().map(|id| self.at_id(id));
            }
            cursor = self.doc.node(key_id).next();
        }
        None
    }

    /// Whether an object has the given key.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Array element by index; `None` past the end and for non-arrays.
    pub fn at(&self, index: usize) -> Option<Value<'doc>> {
        if self.node().tag() != Tag::Array {
            return None;
        }
        let mut cursor = self.node().first_child();
        let mut i = 0;
        while let Some(id) = cursor {
            if i == index {
                return Some(self.at_id(id));
            }
            i += 1;
            cursor = self.doc.node(id).next();
        }
        None
    }

    /// Iterate array elements in insertion order. Empty for non-arrays.
    pub fn elements(&self) -> Elements<'doc> {
        Elements {
            doc: self.doc,
            cursor: if self.node().tag() == Tag::Array {
                self.node().first_child()
            } else {
                None
            },
        }
    }

    /// Iterate object members as `(key, value)` pairs in insertion order.
    /// Empty for non-objects.
    pub fn members(&self) -> Members<'doc> {
        Members {
            doc: self.doc,
            cursor: if self.node().tag() == Tag::Object {
                self.node().first_child()
            } else {
                None
            },
        }
    }

    /// Serialize this value with default options.
    pub fn stringify(&self) -> Result<Vec<u8>, Error> {
        self.stringify_with(&StringifyOptions::default())
    }

    /// Serialize this value.
    pub fn stringify_with(&self, options: &StringifyOptions) -> Result<Vec<u8>, Error> {
        stringify::stringify_value(self.doc, self.id, options)
    }

    /// Serialize into a caller-provided buffer.
    ///
    /// Returns the content length in bytes, excluding the terminating NUL.
    /// When the buffer holds at least `length + 1` bytes the content plus a
    /// NUL are written; otherwise nothing is written and the required
    /// length is still returned.
    pub fn stringify_into(
        &self,
        buffer: &mut [u8],
        options: &StringifyOptions,
    ) -> Result<usize, Error> {
        let bytes = self.stringify_with(options)?;
        if buffer.len() > bytes.len() {
            buffer[..bytes.len()].copy_from_slice(&bytes);
            buffer[bytes.len()] = 0;
        }
        Ok(bytes.len())
    }

    /// Deep-copy this value into a fresh document, defined as
    /// stringify-then-reparse.
    pub fn deep_clone(&self) -> Result<Document, Error> {
        let bytes = self.stringify()?;
        crate::parse(&bytes)
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("kind", &self.kind())
            .field("node", &self.id.0)
            .finish()
    }
}

/// Deep structural equality, usable across documents.
///
/// Numbers compare within their own kind only (an integer 1 is not the
/// float 1.0); objects compare by size plus per-key lookup, so member order
/// does not matter.
impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        let (ka, kb) = (self.kind(), other.kind());
        if ka != kb {
            return false;
        }
        match ka {
            Kind::Null | Kind::False | Kind::True => true,
            Kind::Int => self.as_i64() == other.as_i64(),
            Kind::Float => self.as_f64() == other.as_f64(),
            Kind::String => self.str_bytes() == other.str_bytes(),
            Kind::Array => {
                let mut a = self.elements();
                let mut b = other.elements();
                loop {
                    match (a.next(), b.next()) {
                        (Some(x), Some(y)) => {
                            if x != y {
                                return false;
                            }
                        }
                        (None, None) => return true,
                        _ => return false,
                    }
                }
            }
            Kind::Object => {
                if self.len() != other.len() {
                    return false;
                }
                for (key, value) in self.members() {
                    match other.get_bytes(key.str_bytes()) {
                        Some(other_value) if value == other_value => {}
                        _ => return false,
                    }
                }
                true
            }
        }
    }
}

/// Iterator over array elements.
pub struct Elements<'doc> {
    doc: &'doc Document,
    cursor: Option<NodeId>,
}

impl<'doc> Iterator for Elements<'doc> {
    type Item = Value<'doc>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        self.cursor = self.doc.node(id).next();
        Some(Value { doc: self.doc, id })
    }
}

/// Iterator over object members as `(key, value)` pairs.
pub struct Members<'doc> {
    doc: &'doc Document,
    cursor: Option<NodeId>,
}

impl<'doc> Iterator for Members<'doc> {
    type Item = (Value<'doc>, Value<'doc>);

    fn next(&mut self) -> Option<Self::Item> {
        let key_id = self.cursor?;
        self.cursor = self.doc.node(key_id).next();
        let value_id = self.doc.node(key_id).member_value()?;
        Some((
            Value {
                doc: self.doc,
                id: key_id,
            },
            Value {
                doc: self.doc,
                id: value_id,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_kind_names() {
        assert_eq!(Kind::Null.name(), "null");
        assert_eq!(Kind::True.name(), "true");
        assert_eq!(Kind::False.name(), "false");
        assert_eq!(Kind::Int.name(), "integer");
        assert_eq!(Kind::Float.name(), "float");
        assert_eq!(Kind::String.name(), "string");
        assert_eq!(Kind::Array.name(), "array");
        assert_eq!(Kind::Object.name(), "object");
    }

    #[test]
    fn test_accessor_defaults() {
        let doc = parse(br#"{"s":"x","n":null,"i":7,"f":2.5,"t":true}"#).unwrap();
        let root = doc.root();

        // Cross-type reads fall back to documented defaults.
        assert!(!root.get("s").unwrap().as_bool());
        assert_eq!(root.get("n").unwrap().as_i64(), 0);
        assert_eq!(root.get("s").unwrap().as_f64(), 0.0);
        assert_eq!(root.get("i").unwrap().as_str(), "");
        assert_eq!(root.get("t").unwrap().str_len(), 0);
        assert_eq!(root.get("s").unwrap().len(), 0);

        // Numeric accessors cross-coerce.
        assert_eq!(root.get("f").unwrap().as_i64(), 2);
        assert_eq!(root.get("i").unwrap().as_f64(), 7.0);
        assert_eq!(root.get("i").unwrap().as_u64(), 7);
        let doc = parse(b"-5").unwrap();
        assert_eq!(doc.root().as_u64(), 0);
    }

    #[test]
    fn test_member_iteration_order() {
        let doc = parse(br#"{"c":1,"a":2,"b":3}"#).unwrap();
        let keys: Vec<&str> = doc.root().members().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["c", "a", "b"]);
        let values: Vec<i64> = doc.root().members().map(|(_, v)| v.as_i64()).collect();
        assert_eq!(values, [1, 2, 3]);
    }

    #[test]
    fn test_element_iteration() {
        let doc = parse(b"[1,2,3,4,5]").unwrap();
        let sum: i64 = doc.root().elements().map(|v| v.as_i64()).sum();
        assert_eq!(sum, 15);
        assert_eq!(doc.root().elements().count(), 5);
    }

    #[test]
    fn test_iteration_on_wrong_kind_is_empty() {
        let doc = parse(b"42").unwrap();
        assert_eq!(doc.root().elements().count(), 0);
        assert_eq!(doc.root().members().count(), 0);
        assert!(doc.root().at(0).is_none());
        assert!(doc.root().get("x").is_none());
    }

    #[test]
    fn test_equality() {
        let a = parse(br#"{"x":[1,2.5,null],"y":"s"}"#).unwrap();
        let b = parse(br#"{"y":"s","x":[1,2.5,null]}"#).unwrap();
        let c = parse(br#"{"x":[1,2.5,null],"y":"t"}"#).unwrap();
        assert_eq!(a.root(), b.root());
        assert_ne!(a.root(), c.root());

        // Int and float of equal magnitude are distinct values.
        let i = parse(b"1").unwrap();
        let f = parse(b"1.0").unwrap();
        assert_ne!(i.root(), f.root());
    }

    #[test]
    fn test_deep_clone() {
        let doc = parse(br#"{"a":[1,{"b":"long enough to leave the node"}]}"#).unwrap();
        let copy = doc.root().deep_clone().unwrap();
        assert_eq!(doc.root(), copy.root());
        assert_eq!(doc.value_count(), copy.value_count());
    }

    #[test]
    fn test_memory_usage_is_reported() {
        let doc = parse(br#"{"key":"value"}"#).unwrap();
        assert!(doc.memory_usage() > 64 * 1024);
    }

    #[test]
    fn test_has() {
        let doc = parse(br#"{"exists":true}"#).unwrap();
        assert!(doc.root().has("exists"));
        assert!(!doc.root().has("missing"));
    }
}
