//! JSON text → `Value`.
//!
//! A single-pass recursive-descent parser with one byte of lookahead. The
//! cursor is a byte offset owned by one `Parser`; every error reports the
//! offset where it was detected.
//!
//! # Accepted grammar
//!
//! - The root must be an object or an array; only whitespace may follow it.
//! - Whitespace is space, tab, `\n` and `\r`.
//! - Numbers are runs of digits, `.` and `-`. A run containing `.` is a
//!   float, otherwise a 64-bit signed integer. Exponents and `+` signs are
//!   not part of the grammar.
//! - String escapes: `\"` `\\` `\/` `\b` `\f` `\n` `\r` `\t` and `\uXXXX`.
//!   A high/low surrogate pair of `\u` escapes decodes to one character.
//!
//! Trailing commas, dropping of null-valued members and the nesting limit
//! are controlled by [`ParserConfig`].

use crate::config::ParserConfig;
use crate::error::{JsonError, ParseError, ParseErrorKind, Result};
use crate::value::{Map, Value};

type ParseResult<T> = std::result::Result<T, ParseError>;

/// Parse JSON text with the default configuration.
///
/// # Example
/// ```
/// use jsonkit_core::{deserialize, Value};
///
/// let value = deserialize(r#"{"Name":"John","Age":30}"#).unwrap();
/// assert_eq!(value.get("Name"), Some(&Value::String("John".into())));
/// ```
pub fn deserialize(text: &str) -> Result<Value> {
    deserialize_with(text, &ParserConfig::default())
}

/// Parse JSON text with an explicit configuration.
pub fn deserialize_with(text: &str, config: &ParserConfig) -> Result<Value> {
    if text.trim_matches([' ', '\t', '\n', '\r']).is_empty() {
        return Err(JsonError::Input("input text is empty".to_string()));
    }
    let value = Parser::new(text, config).parse()?;
    tracing::trace!(bytes = text.len(), root = %value.kind(), "parsed JSON document");
    Ok(value)
}

/// Recursive-descent reader over one source string.
pub struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
    config: &'a ParserConfig,
}

impl<'a> Parser<'a> {
    pub fn new(src: &'a str, config: &'a ParserConfig) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            depth: 0,
            config,
        }
    }

    /// Current byte offset into the source.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Parse the whole input as one root object or array.
    pub fn parse(&mut self) -> ParseResult<Value> {
        self.skip_whitespace();
        let value = match self.peek() {
            Some(b'{') => self.parse_object()?,
            Some(b'[') => self.parse_array()?,
            Some(_) => {
                return Err(self.error(ParseErrorKind::UnexpectedRoot(self.current_char())));
            }
            None => return Err(self.error(ParseErrorKind::UnexpectedEndOfInput)),
        };
        self.skip_whitespace();
        if self.pos < self.bytes.len() {
            return Err(self.error(ParseErrorKind::TrailingCharacters));
        }
        Ok(value)
    }

    fn parse_value(&mut self) -> ParseResult<Value> {
        self.skip_whitespace();
        match self.peek() {
            Some(b'{') => self.parse_object(),
            Some(b'[') => self.parse_array(),
            Some(b'"') => self.parse_string().map(Value::String),
            Some(b't') => self.parse_literal("true", Value::Bool(true)),
            Some(b'f') => self.parse_literal("false", Value::Bool(false)),
            Some(b'n') => self.parse_literal("null", Value::Null),
            Some(b'-' | b'0'..=b'9') => self.parse_number(),
            Some(_) => Err(self.unexpected("a JSON value")),
            None => Err(self.error(ParseErrorKind::UnexpectedEndOfInput)),
        }
    }

    fn parse_object(&mut self) -> ParseResult<Value> {
        self.enter()?;
        self.pos += 1; // '{'
        let mut map = Map::new();

        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            self.depth -= 1;
            return Ok(Value::Object(map));
        }

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'"') => {}
                Some(_) => return Err(self.unexpected("a string key")),
                None => return Err(self.error(ParseErrorKind::UnexpectedEndOfInput)),
            }
            let key = self.parse_string()?;

            self.skip_whitespace();
            match self.peek() {
                Some(b':') => self.pos += 1,
                Some(_) => return Err(self.error(ParseErrorKind::ExpectedColon)),
                None => return Err(self.error(ParseErrorKind::UnexpectedEndOfInput)),
            }

            let value = self.parse_value()?;
            if !(value.is_null() && self.config.drop_null_members) {
                // Duplicate keys: the last value wins, the first position is kept.
                map.insert(key, value);
            }

            if self.finish_element(b'}')? {
                break;
            }
        }

        self.depth -= 1;
        Ok(Value::Object(map))
    }

    fn parse_array(&mut self) -> ParseResult<Value> {
        self.enter()?;
        self.pos += 1; // '['
        let mut items = Vec::new();

        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            self.depth -= 1;
            return Ok(Value::Array(items));
        }

        loop {
            items.push(self.parse_value()?);
            if self.finish_element(b']')? {
                break;
            }
        }

        self.depth -= 1;
        Ok(Value::Array(items))
    }

    /// Consume the separator after an object member or array element.
    /// Returns `true` once the closing delimiter has been consumed.
    fn finish_element(&mut self, close: u8) -> ParseResult<bool> {
        self.skip_whitespace();
        match self.peek() {
            Some(b',') => {
                self.pos += 1;
                self.skip_whitespace();
                if self.peek() == Some(close) {
                    if !self.config.allow_trailing_commas {
                        return Err(self.error(ParseErrorKind::TrailingComma(close as char)));
                    }
                    self.pos += 1;
                    return Ok(true);
                }
                Ok(false)
            }
            Some(b) if b == close => {
                self.pos += 1;
                Ok(true)
            }
            Some(_) => Err(self.unexpected(if close == b'}' {
                "',' or '}'"
            } else {
                "',' or ']'"
            })),
            None => Err(self.error(ParseErrorKind::UnexpectedEndOfInput)),
        }
    }

    fn parse_string(&mut self) -> ParseResult<String> {
        self.pos += 1; // opening quote
        let mut out = String::new();
        let mut run_start = self.pos;
        loop {
            // Multi-byte UTF-8 sequences never contain '"' or '\\', so runs
            // always start and end on char boundaries.
            match self.peek() {
                Some(b'"') => {
                    out.push_str(&self.src[run_start..self.pos]);
                    self.pos += 1;
                    return Ok(out);
                }
                Some(b'\\') => {
                    out.push_str(&self.src[run_start..self.pos]);
                    self.pos += 1;
                    let ch = self.parse_escape()?;
                    out.push(ch);
                    run_start = self.pos;
                }
                Some(_) => self.pos += 1,
                None => return Err(self.error(ParseErrorKind::UnexpectedEndOfInput)),
            }
        }
    }

    /// Decode the escape after a backslash. `self.pos` is just past the `\`.
    fn parse_escape(&mut self) -> ParseResult<char> {
        let escape_start = self.pos - 1;
        if self.pos >= self.bytes.len() {
            return Err(self.error(ParseErrorKind::UnexpectedEndOfInput));
        }
        let found = self.current_char();
        self.pos += found.len_utf8();
        match found {
            '"' => Ok('"'),
            '\\' => Ok('\\'),
            '/' => Ok('/'),
            'b' => Ok('\u{8}'),
            'f' => Ok('\u{c}'),
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            't' => Ok('\t'),
            'u' => self.parse_unicode_escape(escape_start),
            other => Err(ParseError::new(
                escape_start,
                ParseErrorKind::InvalidEscape(other.to_string()),
            )),
        }
    }

    fn parse_unicode_escape(&mut self, escape_start: usize) -> ParseResult<char> {
        let unit = self.read_hex4(escape_start)?;
        let decoded = match unit {
            0xD800..=0xDBFF => {
                if self.bytes.get(self.pos) == Some(&b'\\')
                    && self.bytes.get(self.pos + 1) == Some(&b'u')
                {
                    self.pos += 2;
                    let low = self.read_hex4(escape_start)?;
                    if (0xDC00..=0xDFFF).contains(&low) {
                        let code =
                            0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                        char::from_u32(code)
                    } else {
                        None
                    }
                } else {
                    None
                }
            }
            _ => char::from_u32(u32::from(unit)),
        };
        decoded.ok_or_else(|| {
            ParseError::new(
                escape_start,
                ParseErrorKind::InvalidEscape(format!("u{unit:04X}")),
            )
        })
    }

    /// Read exactly four hex digits as one UTF-16 code unit.
    fn read_hex4(&mut self, escape_start: usize) -> ParseResult<u16> {
        if self.pos + 4 > self.bytes.len() {
            return Err(self.error(ParseErrorKind::UnexpectedEndOfInput));
        }
        let mut unit: u16 = 0;
        for i in 0..4 {
            let b = self.bytes[self.pos + i];
            let Some(digit) = (b as char).to_digit(16) else {
                // Preceding bytes were ASCII hex digits, so this slice is char-aligned.
                let mut seen = format!("u{}", &self.src[self.pos..self.pos + i]);
                seen.push(self.char_at(self.pos + i));
                return Err(ParseError::new(
                    escape_start,
                    ParseErrorKind::InvalidEscape(seen),
                ));
            };
            unit = (unit << 4) | digit as u16;
        }
        self.pos += 4;
        Ok(unit)
    }

    fn parse_number(&mut self) -> ParseResult<Value> {
        let start = self.pos;
        while let Some(b'0'..=b'9' | b'.' | b'-') = self.peek() {
            self.pos += 1;
        }
        let lexeme = &self.src[start..self.pos];
        let invalid = || ParseError::new(start, ParseErrorKind::InvalidNumber(lexeme.to_string()));
        if lexeme.contains('.') {
            // Overflowing literals parse to infinity, which has no JSON form.
            match lexeme.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Value::Float(f)),
                _ => Err(invalid()),
            }
        } else {
            lexeme.parse::<i64>().map(Value::Integer).map_err(|_| invalid())
        }
    }

    fn parse_literal(&mut self, literal: &'static str, value: Value) -> ParseResult<Value> {
        let end = self.pos + literal.len();
        if end > self.bytes.len() {
            return Err(self.error(ParseErrorKind::UnexpectedEndOfInput));
        }
        if &self.bytes[self.pos..end] != literal.as_bytes() {
            return Err(self.unexpected(literal));
        }
        self.pos = end;
        Ok(value)
    }

    fn enter(&mut self) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > self.config.max_depth {
            return Err(self.error(ParseErrorKind::DepthLimitExceeded(self.config.max_depth)));
        }
        Ok(())
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn char_at(&self, pos: usize) -> char {
        self.src
            .get(pos..)
            .and_then(|rest| rest.chars().next())
            .unwrap_or('\0')
    }

    fn current_char(&self) -> char {
        self.char_at(self.pos)
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(self.pos, kind)
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        self.error(ParseErrorKind::UnexpectedCharacter {
            expected,
            found: self.current_char(),
        })
    }
}
