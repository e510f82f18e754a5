//! Parser integration tests: basic types, numbers, strings, containers,
//! whitespace, and error classification.

use jetjson::{parse, parse_with, ErrorKind, Kind, ParseOptions};

// ============================================================================
// Basic types
// ============================================================================

#[test]
fn test_parse_null() {
    let doc = parse(b"null").unwrap();
    assert!(doc.root().is_null());
    assert_eq!(doc.root().kind(), Kind::Null);
}

#[test]
fn test_parse_true() {
    let doc = parse(b"true").unwrap();
    assert!(doc.root().is_true());
    assert!(doc.root().is_bool());
    assert!(doc.root().as_bool());
}

#[test]
fn test_parse_false() {
    let doc = parse(b"false").unwrap();
    assert!(doc.root().is_false());
    assert!(doc.root().is_bool());
    assert!(!doc.root().as_bool());
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn test_parse_zero() {
    let doc = parse(b"0").unwrap();
    assert!(doc.root().is_int());
    assert_eq!(doc.root().as_i64(), 0);
}

#[test]
fn test_parse_ints() {
    assert_eq!(parse(b"42").unwrap().root().as_i64(), 42);
    assert_eq!(parse(b"-123").unwrap().root().as_i64(), -123);
    assert_eq!(parse(b"1000000000").unwrap().root().as_i64(), 1_000_000_000);
}

#[test]
fn test_parse_int_payload_boundary() {
    // The node payload is 60-bit two's complement: [-2^59, 2^59 - 1].
    let max_int = (1i64 << 59) - 1;
    let doc = parse(max_int.to_string().as_bytes()).unwrap();
    assert!(doc.root().is_int());
    assert_eq!(doc.root().as_i64(), max_int);

    let min_int = -(1i64 << 59);
    let doc = parse(min_int.to_string().as_bytes()).unwrap();
    assert!(doc.root().is_int());
    assert_eq!(doc.root().as_i64(), min_int);

    // One past either end silently becomes a float.
    let doc = parse((max_int + 1).to_string().as_bytes()).unwrap();
    assert!(doc.root().is_float());
    assert_eq!(doc.root().as_f64(), (max_int + 1) as f64);
}

#[test]
fn test_parse_int64_overflow_becomes_float() {
    // One past i64::MAX
    let doc = parse(b"9223372036854775808").unwrap();
    assert!(doc.root().is_float());
    assert!(doc.root().is_number());
    assert_eq!(doc.root().as_f64(), 9.2233720368547758e18);
}

#[test]
fn test_parse_floats() {
    let doc = parse(b"3.14159").unwrap();
    assert!(doc.root().is_float());
    let v = doc.root().as_f64();
    assert!(v > 3.14 && v < 3.15);

    assert_eq!(parse(b"1.5e10").unwrap().root().as_f64(), 1.5e10);
    assert_eq!(parse(b"1.5e-3").unwrap().root().as_f64(), 1.5e-3);
    assert_eq!(parse(b"-2.5E+3").unwrap().root().as_f64(), -2500.0);
}

#[test]
fn test_fraction_or_exponent_forces_float() {
    assert!(parse(b"1.0").unwrap().root().is_float());
    assert!(parse(b"1e0").unwrap().root().is_float());
    assert!(parse(b"1").unwrap().root().is_int());
}

#[test]
fn test_number_errors() {
    assert_eq!(parse(b"01").unwrap_err().kind, ErrorKind::Number);
    assert_eq!(parse(b"-01").unwrap_err().kind, ErrorKind::Number);
    assert_eq!(parse(b"1.").unwrap_err().kind, ErrorKind::Number);
    assert_eq!(parse(b"1e").unwrap_err().kind, ErrorKind::Number);
    assert_eq!(parse(b"1e+").unwrap_err().kind, ErrorKind::Number);
    assert_eq!(parse(b"-").unwrap_err().kind, ErrorKind::Number);
    assert_eq!(parse(b"1e400").unwrap_err().kind, ErrorKind::Number);
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_parse_empty_string() {
    let doc = parse(b"\"\"").unwrap();
    assert!(doc.root().is_string());
    assert_eq!(doc.root().str_len(), 0);
    assert_eq!(doc.root().as_str(), "");
}

#[test]
fn test_parse_simple_string() {
    let doc = parse(b"\"hello\"").unwrap();
    assert!(doc.root().is_string());
    assert_eq!(doc.root().str_len(), 5);
    assert_eq!(doc.root().as_str(), "hello");
}

#[test]
fn test_short_long_string_boundary() {
    // 7 bytes fits inline; 8 goes to the string arena. Both must read back
    // identically.
    for len in [0usize, 1, 7, 8, 24] {
        let body = "x".repeat(len);
        let json = format!("\"{body}\"");
        let doc = parse(json.as_bytes()).unwrap();
        assert_eq!(doc.root().str_len(), len, "length {len}");
        assert_eq!(doc.root().as_str(), body, "length {len}");
    }
}

#[test]
fn test_parse_escaped_string() {
    let doc = parse(b"\"hello\\nworld\"").unwrap();
    assert_eq!(doc.root().as_str(), "hello\nworld");

    let doc = parse(br#""say \"hello\"""#).unwrap();
    assert_eq!(doc.root().as_str(), "say \"hello\"");
}

#[test]
fn test_escape_decode_values() {
    let doc = parse(br#""\b\f\n\r\t""#).unwrap();
    assert_eq!(doc.root().str_bytes(), &[0x08, 0x0C, 0x0A, 0x0D, 0x09]);
}

#[test]
fn test_escaped_short_string_goes_to_arena() {
    // Escapes force the long form even when the decoded text fits inline.
    let doc = parse(br#""\n""#).unwrap();
    assert_eq!(doc.root().str_bytes(), b"\n");
}

#[test]
fn test_unicode_escape() {
    let doc = parse(b"\"\\u0041\"").unwrap();
    assert_eq!(doc.root().as_str(), "A");

    // "\u0041\u00e9" decodes to 3 bytes: 'A', 0xC3, 0xA9
    let doc = parse(b"\"\\u0041\\u00e9\"").unwrap();
    assert_eq!(doc.root().str_len(), 3);
    assert_eq!(doc.root().str_bytes(), &[b'A', 0xC3, 0xA9]);
    assert_eq!(doc.root().as_str(), "A\u{e9}");
}

#[test]
fn test_surrogate_pair_roundtrip() {
    let doc = parse(b"\"\\uD83D\\uDE00\"").unwrap();
    assert_eq!(doc.root().as_str(), "\u{1F600}");

    let out = doc.stringify().unwrap();
    let reparsed = parse(&out).unwrap();
    assert_eq!(reparsed.root().as_str(), "\u{1F600}");
}

#[test]
fn test_lone_surrogates_rejected() {
    assert_eq!(parse(b"\"\\uD800\"").unwrap_err().kind, ErrorKind::String);
    assert_eq!(parse(b"\"\\uDC00\"").unwrap_err().kind, ErrorKind::String);
    assert_eq!(
        parse(b"\"\\uD800\\u0041\"").unwrap_err().kind,
        ErrorKind::String
    );
}

#[test]
fn test_string_errors() {
    assert_eq!(parse(b"\"hello").unwrap_err().kind, ErrorKind::String);
    assert_eq!(parse(b"\"a\x01\"").unwrap_err().kind, ErrorKind::String);
    assert_eq!(parse(b"\"\\x\"").unwrap_err().kind, ErrorKind::String);
    assert_eq!(parse(b"\"\\uZZZZ\"").unwrap_err().kind, ErrorKind::String);
}

// ============================================================================
// Arrays
// ============================================================================

#[test]
fn test_parse_empty_array() {
    let doc = parse(b"[]").unwrap();
    assert!(doc.root().is_array());
    assert!(doc.root().is_container());
    assert_eq!(doc.root().len(), 0);
}

#[test]
fn test_parse_simple_array() {
    let doc = parse(b"[1, 2, 3]").unwrap();
    let root = doc.root();
    assert_eq!(root.len(), 3);
    assert_eq!(root.at(0).unwrap().as_i64(), 1);
    assert_eq!(root.at(1).unwrap().as_i64(), 2);
    assert_eq!(root.at(2).unwrap().as_i64(), 3);
}

#[test]
fn test_parse_mixed_array() {
    let doc = parse(b"[1, \"two\", true, null]").unwrap();
    let root = doc.root();
    assert_eq!(root.len(), 4);
    assert!(root.at(0).unwrap().is_int());
    assert!(root.at(1).unwrap().is_string());
    assert!(root.at(2).unwrap().is_true());
    assert!(root.at(3).unwrap().is_null());
}

#[test]
fn test_parse_nested_array() {
    let doc = parse(b"[[1, 2], [3, 4]]").unwrap();
    let root = doc.root();
    assert_eq!(root.len(), 2);
    let inner = root.at(0).unwrap();
    assert!(inner.is_array());
    assert_eq!(inner.len(), 2);
    assert_eq!(inner.at(1).unwrap().as_i64(), 2);
}

#[test]
fn test_unclosed_array() {
    assert_eq!(parse(b"[1, 2, 3").unwrap_err().kind, ErrorKind::Syntax);
    assert_eq!(parse(b"[1 2]").unwrap_err().kind, ErrorKind::Syntax);
}

// ============================================================================
// Objects
// ============================================================================

#[test]
fn test_parse_empty_object() {
    let doc = parse(b"{}").unwrap();
    assert!(doc.root().is_object());
    assert_eq!(doc.root().len(), 0);
}

#[test]
fn test_parse_simple_object() {
    let doc = parse(b"{\"name\": \"John\", \"age\": 30}").unwrap();
    let root = doc.root();
    assert_eq!(root.len(), 2);

    let name = root.get("name").unwrap();
    assert!(name.is_string());
    assert_eq!(name.as_str(), "John");

    let age = root.get("age").unwrap();
    assert!(age.is_int());
    assert_eq!(age.as_i64(), 30);
}

#[test]
fn test_parse_nested_object() {
    let doc = parse(br#"{"person": {"name": "Alice", "age": 25}}"#).unwrap();
    let person = doc.root().get("person").unwrap();
    assert!(person.is_object());
    assert_eq!(person.get("name").unwrap().as_str(), "Alice");
}

#[test]
fn test_object_member_order() {
    let doc = parse(br#"{"z":1,"a":2,"m":3}"#).unwrap();
    let keys: Vec<String> = doc
        .root()
        .members()
        .map(|(k, _)| k.as_str().to_string())
        .collect();
    assert_eq!(keys, ["z", "a", "m"]);
}

#[test]
fn test_object_errors() {
    assert_eq!(parse(b"{1:2}").unwrap_err().kind, ErrorKind::Syntax);
    assert_eq!(parse(b"{\"a\" 1}").unwrap_err().kind, ErrorKind::Syntax);
    assert_eq!(parse(b"{\"a\":1").unwrap_err().kind, ErrorKind::Syntax);
}

// ============================================================================
// Spec scenarios
// ============================================================================

#[test]
fn test_scenario_object_with_mixed_array() {
    let doc = parse(br#"{"a":1,"b":[2,3.5,null,true]}"#).unwrap();
    let root = doc.root();
    assert_eq!(root.kind(), Kind::Object);
    assert_eq!(root.len(), 2);
    assert_eq!(root.get("a").unwrap().as_i64(), 1);

    let b = root.get("b").unwrap();
    assert!((b.at(1).unwrap().as_f64() - 3.5).abs() < f64::EPSILON);

    assert_eq!(doc.stringify().unwrap(), br#"{"a":1,"b":[2,3.5,null,true]}"#);
}

#[test]
fn test_scenario_trailing_comma_flag() {
    let options = ParseOptions {
        allow_trailing_commas: true,
        ..ParseOptions::default()
    };
    let doc = parse_with(b"[1, 2, 3,]", &options).unwrap();
    assert_eq!(doc.root().len(), 3);

    let err = parse(b"[1, 2, 3,]").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Syntax);
    // The error points at the ']' after the trailing comma.
    assert_eq!(err.position, 9);
}

#[test]
fn test_scenario_depth_limit() {
    let options = ParseOptions {
        max_depth: 2,
        ..ParseOptions::default()
    };
    let err = parse_with(br#"{"x":{"y":{"z":1}}}"#, &options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Depth);

    let ok = parse_with(br#"{"x":{"y":1}}"#, &options);
    assert!(ok.is_ok());
}

// ============================================================================
// Whitespace and terminal checks
// ============================================================================

#[test]
fn test_whitespace_handling() {
    assert!(parse(b"  {  \"key\"  :  \"value\"  }  ").is_ok());
    assert!(parse(b"{\n  \"key\": \"value\"\n}").is_ok());
    assert!(parse(b"\t\r\n 1 \t\r\n").is_ok());
}

#[test]
fn test_empty_input_position_zero() {
    let err = parse(b"").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Syntax);
    assert_eq!(err.position, 0);
}

#[test]
fn test_invalid_token() {
    assert_eq!(parse(b"undefined").unwrap_err().kind, ErrorKind::Syntax);
    assert_eq!(parse(b"'single'").unwrap_err().kind, ErrorKind::Syntax);
}

#[test]
fn test_trailing_content() {
    assert_eq!(parse(b"{}[]").unwrap_err().kind, ErrorKind::Syntax);
    assert_eq!(parse(b"1 2").unwrap_err().kind, ErrorKind::Syntax);
    assert_eq!(parse(b"null!").unwrap_err().kind, ErrorKind::Syntax);
}

#[test]
fn test_line_and_column_tracking() {
    let err = parse(b"[1,\n 2,\n oops]").unwrap_err();
    assert_eq!(err.line, 3);
    assert_eq!(err.column, 2);
}

// ============================================================================
// Optional syntax extensions
// ============================================================================

#[test]
fn test_comments() {
    let options = ParseOptions {
        allow_comments: true,
        ..ParseOptions::default()
    };
    let input = b"// leading\n[1, /* between */ 2] // trailing";
    let doc = parse_with(input, &options).unwrap();
    assert_eq!(doc.root().len(), 2);

    assert!(parse(input).is_err());
    assert_eq!(
        parse_with(b"[1] /* unterminated", &options).unwrap_err().kind,
        ErrorKind::Syntax
    );
}

#[test]
fn test_inf_nan_literals() {
    let options = ParseOptions {
        allow_inf_nan: true,
        ..ParseOptions::default()
    };
    assert!(parse_with(b"Infinity", &options)
        .unwrap()
        .root()
        .as_f64()
        .is_infinite());
    assert!(parse_with(b"NaN", &options).unwrap().root().as_f64().is_nan());
    assert_eq!(
        parse_with(b"-Infinity", &options).unwrap().root().as_f64(),
        f64::NEG_INFINITY
    );

    assert!(parse(b"Infinity").is_err());
}

// ============================================================================
// Larger documents
// ============================================================================

#[test]
fn test_large_flat_array() {
    let mut json = String::from("[0");
    for i in 1..10_000 {
        json.push_str(&format!(",{i}"));
    }
    json.push(']');

    let doc = parse(json.as_bytes()).unwrap();
    assert_eq!(doc.root().len(), 10_000);
    assert_eq!(doc.root().at(9_999).unwrap().as_i64(), 9_999);
    assert_eq!(doc.value_count(), 10_001);
}

#[test]
fn test_deeply_nested_within_limit() {
    let depth = 200;
    let mut json = String::new();
    for _ in 0..depth {
        json.push('[');
    }
    for _ in 0..depth {
        json.push(']');
    }
    let doc = parse(json.as_bytes()).unwrap();
    assert!(doc.root().is_array());
}
