//! JSON serialization.
//!
//! Emits a value tree into a growable byte buffer. Integers format through
//! `itoa`; floats through `ryu`, whose shortest round-trip decimals parse
//! back to the identical double. NaN and infinities emit as `null`, since
//! standard JSON cannot represent them.

#[cfg(not(test))]
use alloc::vec::Vec;

use crate::document::Document;
use crate::error::{Error, ErrorKind};
use crate::node::{NodeId, Tag};
use crate::options::StringifyOptions;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Growable output buffer with fallible geometric growth.
struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    fn with_capacity(capacity: usize) -> Result<Self, Error> {
        let mut buf = Vec::new();
        buf.try_reserve(capacity).map_err(|_| oom())?;
        Ok(Self { buf })
    }

    fn grow(&mut self, needed: usize) -> Result<(), Error> {
        let free = self.buf.capacity() - self.buf.len();
        if free >= needed {
            return Ok(());
        }
        let mut new_capacity = self.buf.capacity().max(64);
        while new_capacity < self.buf.len() + needed {
            new_capacity = new_capacity.checked_mul(2).ok_or_else(oom)?;
        }
        self.buf
            .try_reserve(new_capacity - self.buf.len())
            .map_err(|_| oom())
    }

    fn push(&mut self, b: u8) -> Result<(), Error> {
        self.grow(1)?;
        self.buf.push(b);
        Ok(())
    }

    fn extend(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.grow(bytes.len())?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }
}

fn oom() -> Error {
    Error::bare(ErrorKind::Memory, "output buffer allocation failed")
}

/// Serialize the value at `id` into a fresh byte buffer.
pub(crate) fn stringify_value(
    doc: &Document,
    id: NodeId,
    options: &StringifyOptions,
) -> Result<Vec<u8>, Error> {
    let mut writer = Writer::with_capacity(1024)?;
    emit_value(&mut writer, doc, id, options, 0)?;
    Ok(writer.buf)
}

fn emit_value(
    w: &mut Writer,
    doc: &Document,
    id: NodeId,
    options: &StringifyOptions,
    depth: usize,
) -> Result<(), Error> {
    let node = doc.node(id);
    match node.tag() {
        Tag::Null => w.extend(b"null"),
        Tag::False => w.extend(b"false"),
        Tag::True => w.extend(b"true"),
        Tag::Int => {
            let mut buf = itoa::Buffer::new();
            w.extend(buf.format(node.int_value()).as_bytes())
        }
        Tag::Float => {
            let value = node.float_value();
            if value.is_finite() {
                let mut buf = ryu::Buffer::new();
                w.extend(buf.format_finite(value).as_bytes())
            } else {
                // JSON has no NaN or Infinity
                w.extend(b"null")
            }
        }
        Tag::ShortStr => emit_string(w, node.short_str_bytes(), options),
        Tag::LongStr => {
            let bytes = doc.string_slice(node.long_str_offset(), node.long_str_len());
            emit_string(w, bytes, options)
        }
        Tag::Array => emit_array(w, doc, id, options, depth),
        Tag::Object => emit_object(w, doc, id, options, depth),
    }
}

fn emit_control_escape(w: &mut Writer, b: u8) -> Result<(), Error> {
    let escape = [
        b'\\',
        b'u',
        b'0',
        b'0',
        HEX_DIGITS[usize::from(b >> 4)],
        HEX_DIGITS[usize::from(b & 0x0F)],
    ];
    w.extend(&escape)
}

fn emit_unicode_escape(w: &mut Writer, cp: u32) -> Result<(), Error> {
    debug_assert!(cp <= 0xFFFF);
    let escape = [
        b'\\',
        b'u',
        HEX_DIGITS[(cp as usize >> 12) & 0xF],
        HEX_DIGITS[(cp as usize >> 8) & 0xF],
        HEX_DIGITS[(cp as usize >> 4) & 0xF],
        HEX_DIGITS[cp as usize & 0xF],
    ];
    w.extend(&escape)
}

/// Decode one UTF-8 sequence starting at `i`; `None` for invalid bytes.
fn decode_utf8(bytes: &[u8], i: usize) -> Option<(u32, usize)> {
    let b0 = u32::from(bytes[i]);
    let (len, mut cp) = match b0 {
        0xC0..=0xDF => (2, b0 & 0x1F),
        0xE0..=0xEF => (3, b0 & 0x0F),
        0xF0..=0xF7 => (4, b0 & 0x07),
        _ => return None,
    };
    if i + len > bytes.len() {
        return None;
    }
    for &b in &bytes[i + 1..i + len] {
        if b & 0xC0 != 0x80 {
            return None;
        }
        cp = (cp << 6) | u32::from(b & 0x3F);
    }
    Some((cp, len))
}

fn emit_string(w: &mut Writer, bytes: &[u8], options: &StringifyOptions) -> Result<(), Error> {
    w.push(b'"')?;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'"' => w.extend(b"\\\"")?,
            b'\\' => w.extend(b"\\\\")?,
            0x08 => w.extend(b"\\b")?,
            0x0C => w.extend(b"\\f")?,
            b'\n' => w.extend(b"\\n")?,
            b'\r' => w.extend(b"\\r")?,
            b'\t' => w.extend(b"\\t")?,
            b'/' if options.escape_slash => w.extend(b"\\/")?,
            _ if b < 0x20 => emit_control_escape(w, b)?,
            _ if b >= 0x80 && options.escape_unicode => {
                match decode_utf8(bytes, i) {
                    Some((cp, len)) => {
                        if cp > 0xFFFF {
                            let v = cp - 0x10000;
                            emit_unicode_escape(w, 0xD800 + (v >> 10))?;
                            emit_unicode_escape(w, 0xDC00 + (v & 0x3FF))?;
                        } else {
                            emit_unicode_escape(w, cp)?;
                        }
                        i += len;
                        continue;
                    }
                    // Not valid UTF-8: pass the byte through untouched.
                    None => w.push(b)?,
                }
            }
            _ => w.push(b)?,
        }
        i += 1;
    }
    w.push(b'"')
}

fn emit_indent(
    w: &mut Writer,
    options: &StringifyOptions,
    depth: usize,
) -> Result<(), Error> {
    w.extend(options.newline.as_bytes())?;
    let spaces = options.indent as usize * depth;
    w.grow(spaces)?;
    for _ in 0..spaces {
        w.buf.push(b' ');
    }
    Ok(())
}

fn emit_array(
    w: &mut Writer,
    doc: &Document,
    id: NodeId,
    options: &StringifyOptions,
    depth: usize,
) -> Result<(), Error> {
    w.push(b'[')?;
    let mut cursor = doc.node(id).first_child();
    let mut first = true;
    while let Some(element) = cursor {
        if !first {
            w.push(b',')?;
        }
        first = false;
        if options.pretty {
            emit_indent(w, options, depth + 1)?;
        }
        emit_value(w, doc, element, options, depth + 1)?;
        cursor = doc.node(element).next();
    }
    if !first && options.pretty {
        emit_indent(w, options, depth)?;
    }
    w.push(b']')
}

fn emit_object(
    w: &mut Writer,
    doc: &Document,
    id: NodeId,
    options: &StringifyOptions,
    depth: usize,
) -> Result<(), Error> {
    w.push(b'{')?;
    let mut cursor = doc.node(id).first_child();
    let mut first = true;
    while let Some(key) = cursor {
        if !first {
            w.push(b',')?;
        }
        first = false;
        if options.pretty {
            emit_indent(w, options, depth + 1)?;
        }

        let key_node = doc.node(key);
        let key_bytes = match key_node.tag() {
            Tag::ShortStr => key_node.short_str_bytes(),
            _ => doc.string_slice(key_node.long_str_offset(), key_node.long_str_len()),
        };
        emit_string(w, key_bytes, options)?;
        w.push(b':')?;
        if options.pretty {
            w.push(b' ')?;
        }

        if let Some(value) = key_node.member_value() {
            emit_value(w, doc, value, options, depth + 1)?;
        }
        cursor = key_node.next();
    }
    if !first && options.pretty {
        emit_indent(w, options, depth)?;
    }
    w.push(b'}')
}
