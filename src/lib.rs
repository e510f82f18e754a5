//! # jetjson
//!
//! High-performance JSON parsing and serialization for Rust.
//!
//! This crate parses RFC 8259 JSON into a compact arena-backed value tree
//! with O(1) typed access, and serializes such trees back to bytes that
//! round-trip losslessly. The hot scan loops are vectorized, with runtime
//! dispatch across SSE4.2/AVX2 on x86_64 and NEON on ARM.
//!
//! ## Quick Start
//!
//! ```
//! let doc = jetjson::parse(br#"{"a":1,"b":[2,3.5,null,true]}"#).unwrap();
//! let root = doc.root();
//!
//! assert_eq!(root.get("a").unwrap().as_i64(), 1);
//! assert_eq!(root.get("b").unwrap().at(1).unwrap().as_f64(), 3.5);
//!
//! // Serialization round-trips byte for byte
//! assert_eq!(doc.stringify().unwrap(), br#"{"a":1,"b":[2,3.5,null,true]}"#);
//! ```
//!
//! ## Storage model
//!
//! Every value is a fixed 24-byte node in a bump-allocated arena: a 4-bit
//! type tag plus a 60-bit payload, a sibling link, and a child/value slot.
//! Strings of up to 7 bytes are stored inline in the node; longer or
//! escaped strings live in a per-document string arena, NUL-terminated.
//! All interior references are arena offsets, so the arenas can grow
//! without invalidating anything. A document is immutable once parsed and
//! safe to read from any number of threads.
//!
//! ## Features
//!
//! - `std` (default) - runtime CPU feature dispatch for the SIMD scan
//!   tiers, `std::error::Error` impls, and [`parse_file`]. Without it the
//!   crate is no_std + alloc and always runs the scalar tier.
//! - `serde` - `Serialize`/`Deserialize` for the options types

// Use no_std unless std feature is enabled or we're in test mode
#![cfg_attr(not(any(test, feature = "std")), no_std)]

// When using no_std, we need to explicitly link the alloc crate
#[cfg(not(any(test, feature = "std")))]
extern crate alloc;

// When using std, re-export alloc types from std for compatibility
#[cfg(any(test, feature = "std"))]
extern crate std as alloc;

mod arena;
pub mod cpu;
mod document;
mod error;
mod node;
mod options;
mod parser;
pub mod simd;
mod stringify;

pub use document::{Document, Elements, Kind, Members, Value};
#[cfg(feature = "std")]
pub use document::parse_file;
pub use error::{Error, ErrorKind};
pub use options::{ParseOptions, StringifyOptions};
pub use parser::{parse, parse_with};
