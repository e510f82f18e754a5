//! Recursive-descent JSON parser.
//!
//! Consumes a byte slice and builds a linked node tree in the document's
//! arenas. Strings are parsed in two passes so that short, escape-free
//! strings can be stored inline in their node; numbers follow RFC 8259
//! strictly, with integers promoted to floats when they leave the 60-bit
//! payload range. All failures unwind immediately — no partial document is
//! ever observable.

use crate::arena::{NodeArena, StringArena};
use crate::document::Document;
use crate::error::{Error, ErrorKind};
use crate::node::{self, NodeId, Tag};
use crate::options::ParseOptions;
use crate::simd::{self, Ops};

/// Parse a JSON byte slice with default options.
///
/// ```
/// let doc = jetjson::parse(b"[1,2,3]").unwrap();
/// assert_eq!(doc.root().len(), 3);
/// ```
pub fn parse(input: &[u8]) -> Result<Document, Error> {
    parse_with(input, &ParseOptions::default())
}

/// Parse a JSON byte slice.
pub fn parse_with(input: &[u8], options: &ParseOptions) -> Result<Document, Error> {
    if input.is_empty() {
        return Err(Error::new(ErrorKind::Syntax, 0, 1, 1, "empty input"));
    }
    let mut parser = Parser::new(input, options, simd::ops())?;
    let root = parser.parse_value()?;
    parser.skip_ws()?;
    if parser.pos < input.len() {
        return Err(parser.error(ErrorKind::Syntax, "trailing content after value"));
    }
    Ok(parser.into_document(root))
}

struct Parser<'a, 'o> {
    input: &'a [u8],
    pos: usize,
    line: usize,
    col: usize,
    depth: usize,
    options: &'o ParseOptions,
    ops: &'static Ops,
    nodes: NodeArena,
    strings: StringArena,
}

impl<'a, 'o> Parser<'a, 'o> {
    fn new(input: &'a [u8], options: &'o ParseOptions, ops: &'static Ops) -> Result<Self, Error> {
        // Roughly one value per four input bytes; the arena clamps small
        // estimates up to its 64 KiB floor.
        let estimate = input.len() / 4 + 1;
        let memory_error =
            || Error::new(ErrorKind::Memory, 0, 1, 1, "document allocation failed");
        Ok(Self {
            input,
            pos: 0,
            line: 1,
            col: 1,
            depth: 0,
            options,
            ops,
            nodes: NodeArena::with_estimate(estimate).map_err(|_| memory_error())?,
            strings: StringArena::new().map_err(|_| memory_error())?,
        })
    }

    fn into_document(self, root: NodeId) -> Document {
        Document::from_parts(self.nodes, self.strings, root)
    }

    fn error(&self, kind: ErrorKind, message: &'static str) -> Error {
        Error::new(kind, self.pos, self.line, self.col, message)
    }

    fn oom(&self) -> Error {
        self.error(ErrorKind::Memory, "arena allocation failed")
    }

    #[inline]
    fn advance(&mut self, n: usize) {
        self.pos += n;
        self.col += n;
    }

    /// Skip whitespace; with `allow_comments`, `//` and `/* */` comments
    /// skip the same way.
    fn skip_ws(&mut self) -> Result<(), Error> {
        while let Some(&c) = self.input.get(self.pos) {
            match c {
                b' ' | b'\t' | b'\r' => self.advance(1),
                b'\n' => {
                    self.pos += 1;
                    self.line += 1;
                    self.col = 1;
                }
                b'/' if self.options.allow_comments => self.skip_comment()?,
                _ => break,
            }
        }
        Ok(())
    }

    fn skip_comment(&mut self) -> Result<(), Error> {
        match self.input.get(self.pos + 1).copied() {
            Some(b'/') => {
                self.advance(2);
                while let Some(&c) = self.input.get(self.pos) {
                    if c == b'\n' {
                        break;
                    }
                    self.advance(1);
                }
                Ok(())
            }
            Some(b'*') => {
                let start = self.error(ErrorKind::Syntax, "unterminated comment");
                self.advance(2);
                while self.pos + 1 < self.input.len() {
                    match self.input[self.pos] {
                        b'*' if self.input[self.pos + 1] == b'/' => {
                            self.advance(2);
                            return Ok(());
                        }
                        b'\n' => {
                            self.pos += 1;
                            self.line += 1;
                            self.col = 1;
                        }
                        _ => self.advance(1),
                    }
                }
                Err(start)
            }
            _ => Err(self.error(ErrorKind::Syntax, "unexpected character")),
        }
    }

    /// The next non-whitespace byte, without consuming it.
    fn peek(&mut self) -> Result<Option<u8>, Error> {
        self.skip_ws()?;
        Ok(self.input.get(self.pos).copied())
    }

    /// Consume `expected` if it is the next non-whitespace byte.
    fn eat(&mut self, expected: u8) -> Result<bool, Error> {
        if self.peek()? == Some(expected) {
            self.advance(1);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn alloc(&mut self, tag: Tag) -> Result<NodeId, Error> {
        match self.nodes.alloc(tag) {
            Ok(id) => Ok(id),
            Err(_) => Err(self.oom()),
        }
    }

    fn parse_value(&mut self) -> Result<NodeId, Error> {
        match self.peek()? {
            Some(b'n') => self.parse_literal(b"null", Tag::Null, "expected 'null'"),
            Some(b't') => self.parse_literal(b"true", Tag::True, "expected 'true'"),
            Some(b'f') => self.parse_literal(b"false", Tag::False, "expected 'false'"),
            Some(b'"') => self.parse_string(),
            Some(b'[') => self.parse_array(),
            Some(b'{') => self.parse_object(),
            Some(b'-' | b'0'..=b'9') => self.parse_number(),
            Some(b'I' | b'N') if self.options.allow_inf_nan => self.parse_nonfinite(),
            None => Err(self.error(ErrorKind::Syntax, "unexpected end of input")),
            Some(_) => Err(self.error(ErrorKind::Syntax, "unexpected character")),
        }
    }

    fn parse_literal(
        &mut self,
        literal: &'static [u8],
        tag: Tag,
        message: &'static str,
    ) -> Result<NodeId, Error> {
        if self.input[self.pos..].starts_with(literal) {
            self.advance(literal.len());
            self.alloc(tag)
        } else {
            Err(self.error(ErrorKind::Syntax, message))
        }
    }

    /// `Infinity`, `-Infinity`, `NaN` under `allow_inf_nan`.
    fn parse_nonfinite(&mut self) -> Result<NodeId, Error> {
        let span = &self.input[self.pos..];
        let (value, len) = if span.starts_with(b"Infinity") {
            (f64::INFINITY, 8)
        } else if span.starts_with(b"-Infinity") {
            (f64::NEG_INFINITY, 9)
        } else if span.starts_with(b"NaN") {
            (f64::NAN, 3)
        } else {
            return Err(self.error(ErrorKind::Syntax, "unexpected character"));
        };
        let id = self.alloc(Tag::Float)?;
        self.nodes.get_mut(id).set_float(value);
        self.advance(len);
        Ok(id)
    }

    fn parse_number(&mut self) -> Result<NodeId, Error> {
        let span = &self.input[self.pos..];
        let mut i = 0;
        let mut is_float = false;

        if span.first() == Some(&b'-') {
            i = 1;
            if self.options.allow_inf_nan && span.get(i) == Some(&b'I') {
                return self.parse_nonfinite();
            }
        }
        let digits_start = i;
        let at = |k: usize| span.get(k).copied();

        // Integer part: a single 0, or a nonzero digit followed by any
        // number of digits.
        match at(i) {
            Some(b'0') => {
                if matches!(at(i + 1), Some(b'0'..=b'9')) {
                    return Err(self.error(ErrorKind::Number, "leading zeros are not allowed"));
                }
                i += 1;
            }
            Some(b'1'..=b'9') => {
                while matches!(at(i), Some(b'0'..=b'9')) {
                    i += 1;
                }
            }
            _ => return Err(self.error(ErrorKind::Number, "invalid number")),
        }
        let int_digits = i - digits_start;

        if at(i) == Some(b'.') {
            is_float = true;
            i += 1;
            if !matches!(at(i), Some(b'0'..=b'9')) {
                return Err(self.error(ErrorKind::Number, "expected digit after decimal point"));
            }
            while matches!(at(i), Some(b'0'..=b'9')) {
                i += 1;
            }
        }

        if matches!(at(i), Some(b'e' | b'E')) {
            is_float = true;
            i += 1;
            if matches!(at(i), Some(b'+' | b'-')) {
                i += 1;
            }
            if !matches!(at(i), Some(b'0'..=b'9')) {
                return Err(self.error(ErrorKind::Number, "expected digit in exponent"));
            }
            while matches!(at(i), Some(b'0'..=b'9')) {
                i += 1;
            }
        }

        let end = self.pos + i;
        let id = self.alloc(Tag::Int)?;

        // 18 digits can never overflow an i64, so the lane result is exact;
        // anything longer is out of payload range anyway.
        if !is_float && int_digits <= 18 {
            let (value, consumed) = (self.ops.parse_int)(&self.input[self.pos..end]);
            if consumed == i && node::fits_int(value) {
                self.nodes.get_mut(id).set_int(value);
                self.advance(i);
                return Ok(id);
            }
        }

        let (value, consumed) = (self.ops.parse_float)(&self.input[self.pos..end]);
        if consumed != i || !value.is_finite() {
            return Err(self.error(ErrorKind::Number, "number out of range"));
        }
        self.nodes.get_mut(id).set_float(value);
        self.advance(i);
        Ok(id)
    }

    /// Four hex digits of a `\u` escape. The leading `\u` is already
    /// consumed.
    fn parse_unicode_escape(&mut self) -> Result<u32, Error> {
        if self.pos + 4 > self.input.len() {
            return Err(self.error(ErrorKind::String, "invalid unicode escape"));
        }
        let mut cp = 0;
        for k in 0..4 {
            match hex_digit(self.input[self.pos + k]) {
                Some(d) => cp = (cp << 4) | d,
                None => return Err(self.error(ErrorKind::String, "invalid unicode escape")),
            }
        }
        self.advance(4);
        Ok(cp)
    }

    fn parse_string(&mut self) -> Result<NodeId, Error> {
        if self.input.get(self.pos) != Some(&b'"') {
            return Err(self.error(ErrorKind::Syntax, "expected '\"'"));
        }
        self.advance(1);
        let body_start = self.pos;

        // First pass: find the closing quote, validate escapes, and compute
        // the decoded length.
        let mut decoded_len = 0usize;
        let mut has_escapes = false;
        loop {
            let skip = (self.ops.scan_string)(&self.input[self.pos..]);
            decoded_len += skip;
            self.advance(skip);

            match self.input.get(self.pos).copied() {
                None => return Err(self.error(ErrorKind::String, "unterminated string")),
                Some(b'"') => break,
                Some(b'\\') => {
                    has_escapes = true;
                    self.advance(1);
                    let esc = match self.input.get(self.pos) {
                        Some(&b) => b,
                        None => {
                            return Err(self.error(ErrorKind::String, "unterminated escape"));
                        }
                    };
                    match esc {
                        b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => {
                            decoded_len += 1;
                            self.advance(1);
                        }
                        b'u' => {
                            self.advance(1);
                            let cp = self.parse_surrogate_aware_escape()?;
                            decoded_len += utf8_len(cp);
                        }
                        _ => {
                            return Err(self.error(ErrorKind::String, "invalid escape sequence"));
                        }
                    }
                }
                // scan_string only stops at '"', '\\', or control bytes.
                Some(_) => {
                    return Err(self.error(ErrorKind::String, "control character in string"));
                }
            }
        }
        let body_end = self.pos;
        self.advance(1); // closing quote

        let id = self.alloc(Tag::ShortStr)?;
        let body = &self.input[body_start..body_end];

        if !has_escapes && decoded_len <= node::SHORT_STR_MAX {
            self.nodes.get_mut(id).set_short_str(body);
            return Ok(id);
        }

        let offset = match self.strings.reserve(decoded_len) {
            Ok(offset) => offset,
            Err(_) => return Err(self.oom()),
        };
        if decoded_len > node::LONG_STR_MAX_LEN || offset > node::STR_OFFSET_MAX {
            return Err(self.error(ErrorKind::Memory, "string arena limit exceeded"));
        }
        if has_escapes {
            decode_escapes(body, &mut self.strings);
        } else {
            self.strings.extend(body);
        }
        self.strings.terminate();
        self.nodes.get_mut(id).set_long_str(decoded_len, offset);
        Ok(id)
    }

    /// A `\u` escape with surrogate-pair handling; the code point is
    /// validated here so the decode pass can run unchecked.
    fn parse_surrogate_aware_escape(&mut self) -> Result<u32, Error> {
        let cp = self.parse_unicode_escape()?;
        if (0xD800..=0xDBFF).contains(&cp) {
            if self.input.get(self.pos) != Some(&b'\\') || self.input.get(self.pos + 1) != Some(&b'u')
            {
                return Err(self.error(ErrorKind::String, "expected low surrogate"));
            }
            self.advance(2);
            let low = self.parse_unicode_escape()?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(self.error(ErrorKind::String, "invalid low surrogate"));
            }
            Ok(0x10000 + ((cp - 0xD800) << 10) + (low - 0xDC00))
        } else if (0xDC00..=0xDFFF).contains(&cp) {
            Err(self.error(ErrorKind::String, "unexpected low surrogate"))
        } else {
            Ok(cp)
        }
    }

    fn enter(&mut self) -> Result<(), Error> {
        if self.options.max_depth > 0 && self.depth >= self.options.max_depth {
            return Err(self.error(ErrorKind::Depth, "maximum depth exceeded"));
        }
        self.depth += 1;
        Ok(())
    }

    fn parse_array(&mut self) -> Result<NodeId, Error> {
        self.advance(1); // '['
        self.enter()?;
        let array = self.alloc(Tag::Array)?;

        if self.eat(b']')? {
            self.depth -= 1;
            return Ok(array);
        }

        let mut prev: Option<NodeId> = None;
        loop {
            let element = self.parse_value()?;
            match prev {
                None => self.nodes.get_mut(array).set_first_child(element),
                Some(p) => self.nodes.get_mut(p).set_next(element),
            }
            prev = Some(element);

            if self.eat(b']')? {
                break;
            }
            if !self.eat(b',')? {
                return Err(self.error(ErrorKind::Syntax, "expected ',' or ']'"));
            }
            if self.options.allow_trailing_commas && self.eat(b']')? {
                break;
            }
        }

        self.depth -= 1;
        Ok(array)
    }

    fn parse_object(&mut self) -> Result<NodeId, Error> {
        self.advance(1); // '{'
        self.enter()?;
        let object = self.alloc(Tag::Object)?;

        if self.eat(b'}')? {
            self.depth -= 1;
            return Ok(object);
        }

        let mut prev: Option<NodeId> = None;
        loop {
            if self.peek()? != Some(b'"') {
                return Err(self.error(ErrorKind::Syntax, "expected string key"));
            }
            let key = self.parse_string()?;

            if !self.eat(b':')? {
                return Err(self.error(ErrorKind::Syntax, "expected ':'"));
            }

            let value = self.parse_value()?;
            self.nodes.get_mut(key).set_member_value(value);

            match prev {
                None => self.nodes.get_mut(object).set_first_child(key),
                Some(p) => self.nodes.get_mut(p).set_next(key),
            }
            prev = Some(key);

            if self.eat(b'}')? {
                break;
            }
            if !self.eat(b',')? {
                return Err(self.error(ErrorKind::Syntax, "expected ',' or '}'"));
            }
            if self.options.allow_trailing_commas && self.eat(b'}')? {
                break;
            }
        }

        self.depth -= 1;
        Ok(object)
    }
}

/// UTF-8 length of a code point, 1-4 bytes.
fn utf8_len(cp: u32) -> usize {
    if cp < 0x80 {
        1
    } else if cp < 0x800 {
        2
    } else if cp < 0x10000 {
        3
    } else {
        4
    }
}

/// Encode a code point into `buf`, returning the byte count.
fn encode_utf8(cp: u32, buf: &mut [u8; 4]) -> usize {
    if cp < 0x80 {
        buf[0] = cp as u8;
        1
    } else if cp < 0x800 {
        buf[0] = 0xC0 | (cp >> 6) as u8;
        buf[1] = 0x80 | (cp & 0x3F) as u8;
        2
    } else if cp < 0x10000 {
        buf[0] = 0xE0 | (cp >> 12) as u8;
        buf[1] = 0x80 | ((cp >> 6) & 0x3F) as u8;
        buf[2] = 0x80 | (cp & 0x3F) as u8;
        3
    } else {
        buf[0] = 0xF0 | (cp >> 18) as u8;
        buf[1] = 0x80 | ((cp >> 12) & 0x3F) as u8;
        buf[2] = 0x80 | ((cp >> 6) & 0x3F) as u8;
        buf[3] = 0x80 | (cp & 0x3F) as u8;
        4
    }
}

fn hex_digit(b: u8) -> Option<u32> {
    match b {
        b'0'..=b'9' => Some(u32::from(b - b'0')),
        b'a'..=b'f' => Some(u32::from(b - b'a') + 10),
        b'A'..=b'F' => Some(u32::from(b - b'A') + 10),
        _ => None,
    }
}

/// Second pass over an escaped string body: write decoded bytes into the
/// string arena. The first pass already validated every escape, so this
/// only transcribes.
fn decode_escapes(body: &[u8], strings: &mut StringArena) {
    let mut i = 0;
    while i < body.len() {
        let c = body[i];
        if c != b'\\' {
            strings.push(c);
            i += 1;
            continue;
        }
        i += 1;
        let esc = body[i];
        i += 1;
        match esc {
            b'"' => strings.push(b'"'),
            b'\\' => strings.push(b'\\'),
            b'/' => strings.push(b'/'),
            b'b' => strings.push(0x08),
            b'f' => strings.push(0x0C),
            b'n' => strings.push(0x0A),
            b'r' => strings.push(0x0D),
            b't' => strings.push(0x09),
            _ => {
                // \u escape
                let mut cp = 0;
                for _ in 0..4 {
                    cp = (cp << 4) | hex_digit(body[i]).unwrap_or(0);
                    i += 1;
                }
                if (0xD800..=0xDBFF).contains(&cp) {
                    i += 2; // skip \u
                    let mut low = 0;
                    for _ in 0..4 {
                        low = (low << 4) | hex_digit(body[i]).unwrap_or(0);
                        i += 1;
                    }
                    cp = 0x10000 + ((cp - 0xD800) << 10) + (low - 0xDC00);
                }
                let mut buf = [0u8; 4];
                let n = encode_utf8(cp, &mut buf);
                strings.extend(&buf[..n]);
            }
        }
    }
}
