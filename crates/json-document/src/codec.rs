//! Adapter between JSON text and [`Value`] trees.
//!
//! Parsing happens here, in a recursive-descent reader that keeps each
//! number's source text verbatim and decides per call whether object
//! members land in ordered or hashed maps. Printing is delegated to
//! `serde_json`, whose `arbitrary_precision` feature lets stored number
//! text pass through to the output unmodified.

use std::io;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::{error::ParseError, io::SaveOptions, map::Map, number::Number, value::Value};

// Nesting bound for arrays and objects, so pathological input fails with
// a parse error instead of exhausting the stack.
const MAX_DEPTH: usize = 128;

pub(crate) fn parse(text: &str, retain_order: bool) -> Result<Value, ParseError> {
    Parser::new(text, retain_order).parse_document()
}

struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    retain_order: bool,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str, retain_order: bool) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            retain_order,
        }
    }

    fn parse_document(mut self) -> Result<Value, ParseError> {
        self.skip_whitespace();
        let value = self.parse_value(0)?;
        self.skip_whitespace();
        if self.pos < self.bytes.len() {
            return Err(self.error_here("trailing characters after the document"));
        }
        Ok(value)
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value, ParseError> {
        if depth > MAX_DEPTH {
            return Err(self.error_here("structure nested too deeply"));
        }
        match self.peek() {
            Some(b'{') => self.parse_object(depth),
            Some(b'[') => self.parse_array(depth),
            Some(b'"') => Ok(Value::String(self.parse_string()?)),
            Some(b't') => self.parse_keyword("true", Value::Boolean(true)),
            Some(b'f') => self.parse_keyword("false", Value::Boolean(false)),
            Some(b'n') => self.parse_keyword("null", Value::Null),
            Some(b'-' | b'0'..=b'9') => self.parse_number(),
            Some(_) => Err(self.error_here("expected a value")),
            None => Err(self.error_here("unexpected end of input")),
        }
    }

    fn parse_object(&mut self, depth: usize) -> Result<Value, ParseError> {
        self.pos += 1; // '{'
        let mut map = Map::with_order(self.retain_order);
        self.skip_whitespace();
        if self.eat(b'}') {
            return Ok(Value::Object(map));
        }
        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'"') {
                return Err(self.error_here("expected a member name"));
            }
            let key = self.parse_string()?;
            self.skip_whitespace();
            if !self.eat(b':') {
                return Err(self.error_here("expected `:` after a member name"));
            }
            self.skip_whitespace();
            let value = self.parse_value(depth + 1)?;
            map.insert(key, value);
            self.skip_whitespace();
            if self.eat(b',') {
                continue;
            }
            if self.eat(b'}') {
                return Ok(Value::Object(map));
            }
            return Err(self.error_here("expected `,` or `}` after a member"));
        }
    }

    fn parse_array(&mut self, depth: usize) -> Result<Value, ParseError> {
        self.pos += 1; // '['
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.eat(b']') {
            return Ok(Value::Array(items));
        }
        loop {
            self.skip_whitespace();
            items.push(self.parse_value(depth + 1)?);
            self.skip_whitespace();
            if self.eat(b',') {
                continue;
            }
            if self.eat(b']') {
                return Ok(Value::Array(items));
            }
            return Err(self.error_here("expected `,` or `]` after an element"));
        }
    }

    fn parse_keyword(&mut self, keyword: &str, value: Value) -> Result<Value, ParseError> {
        if self.bytes[self.pos..].starts_with(keyword.as_bytes()) {
            self.pos += keyword.len();
            Ok(value)
        } else {
            Err(self.error_here("expected a value"))
        }
    }

    // Scans the maximal run of number characters and validates it as one
    // literal, so "01" and "1e+" fail here rather than half-succeeding.
    fn parse_number(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        while matches!(
            self.peek(),
            Some(b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E')
        ) {
            self.pos += 1;
        }
        match Number::from_literal(&self.text[start..self.pos]) {
            Some(number) => Ok(Value::Number(number)),
            None => Err(self.error_at(start, "invalid number")),
        }
    }

    fn parse_string(&mut self) -> Result<String, ParseError> {
        self.pos += 1; // opening quote
        let mut out = String::new();
        let mut run = self.pos;
        loop {
            match self.peek() {
                None => return Err(self.error_here("unterminated string")),
                Some(b'"') => {
                    out.push_str(self.span(run, self.pos));
                    self.pos += 1;
                    return Ok(out);
                }
                Some(b'\\') => {
                    out.push_str(self.span(run, self.pos));
                    self.pos += 1;
                    let c = self.parse_escape()?;
                    out.push(c);
                    run = self.pos;
                }
                Some(b) if b < 0x20 => {
                    return Err(self.error_here("control character in string"));
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn parse_escape(&mut self) -> Result<char, ParseError> {
        let Some(b) = self.peek() else {
            return Err(self.error_here("unterminated string"));
        };
        self.pos += 1;
        Ok(match b {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{0008}',
            b'f' => '\u{000C}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => return self.parse_unicode_escape(),
            _ => return Err(self.error_at(self.pos - 1, "invalid escape")),
        })
    }

    // `\uXXXX`, positioned after the `u`. Surrogate halves must pair up;
    // a lone half has no scalar value to decode to.
    fn parse_unicode_escape(&mut self) -> Result<char, ParseError> {
        let start = self.pos - 2;
        let high = self.hex4()?;
        if (0xDC00..=0xDFFF).contains(&high) {
            return Err(self.error_at(start, "unexpected low surrogate in unicode escape"));
        }
        if (0xD800..=0xDBFF).contains(&high) {
            if !(self.eat(b'\\') && self.eat(b'u')) {
                return Err(self.error_at(start, "unpaired surrogate in unicode escape"));
            }
            let low = self.hex4()?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(self.error_at(start, "unpaired surrogate in unicode escape"));
            }
            let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
            return char::from_u32(code)
                .ok_or_else(|| self.error_at(start, "invalid unicode escape"));
        }
        char::from_u32(high).ok_or_else(|| self.error_at(start, "invalid unicode escape"))
    }

    fn hex4(&mut self) -> Result<u32, ParseError> {
        let mut code = 0_u32;
        for _ in 0..4 {
            let Some(b) = self.peek() else {
                return Err(self.error_here("unterminated string"));
            };
            let digit = char::from(b)
                .to_digit(16)
                .ok_or_else(|| self.error_here("invalid hex digit in unicode escape"))?;
            self.pos += 1;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    fn span(&self, start: usize, end: usize) -> &'a str {
        // Both ends sit on ASCII delimiters, so they are char boundaries.
        &self.text[start..end]
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn error_here(&self, message: &str) -> ParseError {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, pos: usize, message: &str) -> ParseError {
        let mut line = 1;
        let mut column = 1;
        for &b in &self.bytes[..pos] {
            if b == b'\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        ParseError::new(format!("{message} at line {line} column {column}"), line, column)
    }
}

/// Converts to the `serde_json` value model, for handing to the validator.
pub(crate) fn to_raw(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => serde_json::Value::Number(raw_number(n)),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(to_raw).collect()),
        Value::Object(map) => {
            let mut members = serde_json::Map::new();
            for (key, value) in map {
                members.insert(key.to_owned(), to_raw(value));
            }
            serde_json::Value::Object(members)
        }
    }
}

fn raw_number(n: &Number) -> serde_json::Number {
    // The text was validated when the Number was built.
    serde_json::Number::from_string_unchecked(n.as_str().to_owned())
}

// Serialize adapter: emits members in stored or sorted key order, and
// numbers as their exact stored text.
struct Emit<'a> {
    value: &'a Value,
    sort_keys: bool,
}

impl Serialize for Emit<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            Value::Null => serializer.serialize_unit(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Number(n) => raw_number(n).serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&Emit {
                        value: item,
                        sort_keys: self.sort_keys,
                    })?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                if self.sort_keys {
                    let mut entries: Vec<_> = map.iter().collect();
                    entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
                    for (key, value) in entries {
                        out.serialize_entry(key, &Emit { value, sort_keys: true })?;
                    }
                } else {
                    for (key, value) in map {
                        out.serialize_entry(
                            key,
                            &Emit {
                                value,
                                sort_keys: false,
                            },
                        )?;
                    }
                }
                out.end()
            }
        }
    }
}

pub(crate) fn write(
    value: &Value,
    writer: impl io::Write,
    options: SaveOptions,
) -> io::Result<()> {
    let emit = Emit {
        value,
        sort_keys: options.sort_keys,
    };
    if options.human_readable {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"  ");
        let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
        emit.serialize(&mut ser).map_err(io::Error::from)
    } else {
        let mut ser = serde_json::Serializer::new(writer);
        emit.serialize(&mut ser).map_err(io::Error::from)
    }
}

pub(crate) fn to_string(value: &Value, options: SaveOptions) -> String {
    let mut out = Vec::new();
    write(value, &mut out, options).expect("writing JSON to a Vec cannot fail");
    String::from_utf8(out).expect("serialized JSON is UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_number_text() {
        let value = parse("[0.30000000000000004, 1e10, -0.0]", true).unwrap();
        let Value::Array(items) = &value else {
            panic!("expected array");
        };
        let texts: Vec<_> = items
            .iter()
            .map(|v| v.as_number().unwrap().as_str())
            .collect();
        assert_eq!(texts, ["0.30000000000000004", "1e10", "-0.0"]);
    }

    #[test]
    fn parse_keeps_member_order() {
        let value = parse(r#"{"z": 1, "a": 2, "m": 3}"#, true).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn parse_without_order_retention_uses_hashed_maps() {
        let value = parse(r#"{"z": 1, "a": 2}"#, false).unwrap();
        assert!(!value.as_object().unwrap().retains_order());
    }

    #[test]
    fn parse_rejects_malformed_text() {
        assert!(parse("{", true).is_err());
        assert!(parse("[1,]", true).is_err());
        assert!(parse("[01]", true).is_err());
        assert!(parse("truth", true).is_err());
        assert!(parse("[] []", true).is_err());
    }

    #[test]
    fn parse_reports_the_offending_position() {
        let err = parse("{\n  \"a\": }", true).unwrap_err();
        assert_eq!((err.line(), err.column()), (2, 8));
        assert!(err.to_string().contains("line 2 column 8"), "{err}");
    }

    #[test]
    fn members_named_like_number_markers_stay_members() {
        // serde_json's arbitrary-precision deserializer smuggles numbers
        // through a map with this key, collapsing the genuine object.
        // Parsing here must not.
        let text = r#"{"$serde_json::private::Number":"1"}"#;
        let value = parse(text, true).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(
            map.get("$serde_json::private::Number"),
            Some(&Value::String("1".into()))
        );
        assert_eq!(to_string(&value, SaveOptions::compact()), text);
    }

    #[test]
    fn string_escapes_decode() {
        let value = parse(r#"["\u0041\n\t\\\"\/", "\uD83D\uDE00", "héllo π"]"#, true).unwrap();
        let Value::Array(items) = &value else {
            panic!("expected array");
        };
        assert_eq!(items[0], Value::from("A\n\t\\\"/"));
        assert_eq!(items[1], Value::from("\u{1F600}"));
        assert_eq!(items[2], Value::from("héllo π"));
    }

    #[test]
    fn lone_surrogates_are_rejected() {
        assert!(parse(r#""\uD800""#, true).is_err());
        assert!(parse(r#""\uDC00""#, true).is_err());
        assert!(parse(r#""\uD800x""#, true).is_err());
        assert!(parse(r#""\uD800\n""#, true).is_err());
    }

    #[test]
    fn control_characters_must_be_escaped() {
        assert!(parse("\"a\nb\"", true).is_err());
        assert!(parse("\"a\tb\"", true).is_err());
    }

    #[test]
    fn duplicate_member_names_keep_the_last_value() {
        let value = parse(r#"{"a": 1, "a": 2}"#, true).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a"), Some(&Value::from(2_i64)));
    }

    #[test]
    fn nesting_depth_is_bounded() {
        let deep = "[".repeat(400) + &"]".repeat(400);
        assert!(parse(&deep, true).is_err());
        let shallow = "[".repeat(100) + &"]".repeat(100);
        assert!(parse(&shallow, true).is_ok());
    }

    #[test]
    fn compact_output() {
        let value = parse(r#"{"b": [1, 2], "a": "x"}"#, true).unwrap();
        assert_eq!(
            to_string(&value, SaveOptions::compact()),
            r#"{"b":[1,2],"a":"x"}"#
        );
    }

    #[test]
    fn human_readable_output_is_indented() {
        let value = parse(r#"{"a": [1]}"#, true).unwrap();
        let options = SaveOptions {
            human_readable: true,
            sort_keys: false,
        };
        assert_eq!(to_string(&value, options), "{\n  \"a\": [\n    1\n  ]\n}");
    }

    #[test]
    fn sorted_output_orders_nested_members() {
        let value = parse(r#"{"b": {"d": 1, "c": 2}, "a": 3}"#, true).unwrap();
        let options = SaveOptions {
            human_readable: false,
            sort_keys: true,
        };
        assert_eq!(
            to_string(&value, options),
            r#"{"a":3,"b":{"c":2,"d":1}}"#
        );
    }
}
