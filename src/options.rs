//! Parse and serialization options.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options controlling [`parse_with`](crate::parse_with).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParseOptions {
    /// Maximum container nesting depth. `0` means unlimited.
    pub max_depth: usize,
    /// Skip `//` line and `/* */` block comments like whitespace.
    pub allow_comments: bool,
    /// Permit a trailing comma before `]` or `}`.
    pub allow_trailing_commas: bool,
    /// Accept the literals `Infinity`, `-Infinity`, and `NaN` as floats.
    pub allow_inf_nan: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: 0,
            allow_comments: false,
            allow_trailing_commas: false,
            allow_inf_nan: false,
        }
    }
}

/// Options controlling [`Value::stringify_with`](crate::Value::stringify_with).
///
/// Only `Serialize` is derived: the borrowed `newline` field cannot be
/// deserialized into a `'static` reference.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct StringifyOptions {
    /// Emit newlines and indentation inside containers.
    pub pretty: bool,
    /// Spaces per indent level when pretty-printing.
    pub indent: u32,
    /// Newline string used when pretty-printing.
    pub newline: &'static str,
    /// Escape `/` as `\/`.
    pub escape_slash: bool,
    /// Escape bytes >= 0x80 as `\uXXXX` (surrogate pairs above U+FFFF).
    pub escape_unicode: bool,
}

impl Default for StringifyOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: 2,
            newline: "\n",
            escape_slash: false,
            escape_unicode: false,
        }
    }
}

impl StringifyOptions {
    /// Pretty-printing with the given indent width.
    pub fn pretty(indent: u32) -> Self {
        Self {
            pretty: true,
            indent,
            ..Self::default()
        }
    }
}
