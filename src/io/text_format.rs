//! Protobuf text-format parsing for trace records.
//!
//! Covers the part of the text format the trace schema can express: scalar
//! and message fields, `<>` or `{}` message delimiters, list syntax for
//! repeated and map fields, comments, and quoted strings with C escapes.
//! Parsing merges into the target, so later singular values win and
//! singular messages merge.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::domain::{Device, Resource, Trace, TraceEvent};

/// A parse failure with the 1-based position where it was detected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{line}:{column}: {message}")]
pub struct TextFormatError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Message types that can be merged from text format
pub trait TextMessage: Default {
    /// Consume the value of field `name`; the parser sits right after the field name
    fn merge_field(
        &mut self,
        name: &str,
        parser: &mut Parser<'_>,
    ) -> Result<(), TextFormatError>;
}

/// Parse a trace from text format
pub fn parse_trace(text: &str) -> Result<Trace, TextFormatError> {
    let mut trace = Trace::default();
    merge(text, &mut trace)?;
    Ok(trace)
}

/// Merge text-format content into an existing message
pub fn merge<M: TextMessage>(text: &str, message: &mut M) -> Result<(), TextFormatError> {
    let mut parser = Parser::new(text);
    parser.message_body(message, None)
}

/// Cursor over text-format input
pub struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    /// Start of the field name being merged, for unknown-field errors
    field_start: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            input: text.as_bytes(),
            pos: 0,
            field_start: 0,
        }
    }

    fn error(&self, message: impl fmt::Display) -> TextFormatError {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, pos: usize, message: impl fmt::Display) -> TextFormatError {
        let consumed = &self.input[..pos.min(self.input.len())];
        let line = consumed.iter().filter(|&&b| b == b'\n').count() + 1;
        let line_start = consumed
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        TextFormatError {
            line,
            column: consumed.len() - line_start + 1,
            message: message.to_string(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b == b'#' {
                while let Some(c) = self.peek() {
                    if c == b'\n' {
                        break;
                    }
                    self.pos += 1;
                }
            } else if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Consume `expected` if it is the next non-blank byte
    fn eat(&mut self, expected: u8) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: u8) -> Result<(), TextFormatError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(format_args!(
                "expected '{}', found {}",
                expected as char,
                self.describe_next()
            )))
        }
    }

    fn describe_next(&self) -> String {
        match self.peek() {
            None => "end of input".to_string(),
            Some(b) if b.is_ascii_graphic() => format!("'{}'", b as char),
            Some(b) => format!("byte 0x{b:02x}"),
        }
    }

    fn identifier(&mut self) -> Result<&'a str, TextFormatError> {
        self.skip_whitespace();
        let start = self.pos;
        match self.peek() {
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => self.pos += 1,
            _ => {
                return Err(self.error(format_args!(
                    "expected field name, found {}",
                    self.describe_next()
                )));
            }
        }
        while matches!(self.peek(), Some(b) if b.is_ascii_alphanumeric() || b == b'_') {
            self.pos += 1;
        }
        let input = self.input;
        std::str::from_utf8(&input[start..self.pos])
            .map_err(|_| self.error("field name is not valid UTF-8"))
    }

    /// Parse fields until `close` (or end of input for the top-level message)
    fn message_body<M: TextMessage>(
        &mut self,
        message: &mut M,
        close: Option<u8>,
    ) -> Result<(), TextFormatError> {
        loop {
            self.skip_whitespace();
            match (self.peek(), close) {
                (None, None) => return Ok(()),
                (None, Some(c)) => {
                    return Err(self.error(format_args!(
                        "expected '{}', found end of input",
                        c as char
                    )));
                }
                (Some(b), Some(c)) if b == c => {
                    self.pos += 1;
                    return Ok(());
                }
                _ => {}
            }

            self.field_start = self.pos;
            let name = self.identifier()?;
            message.merge_field(name, self)?;

            if !self.eat(b',') {
                self.eat(b';');
            }
        }
    }

    /// Error for a field name the message does not define
    pub fn unknown_field(&self, message: &str, name: &str) -> TextFormatError {
        self.error_at(
            self.field_start,
            format_args!("unknown field \"{name}\" in message {message}"),
        )
    }

    /// Merge a `{ ... }` or `< ... >` value, with optional leading ':'
    pub fn message<M: TextMessage>(&mut self, message: &mut M) -> Result<(), TextFormatError> {
        self.eat(b':');
        let close = if self.eat(b'{') {
            b'}'
        } else if self.eat(b'<') {
            b'>'
        } else {
            return Err(self.error(format_args!(
                "expected '{{' or '<', found {}",
                self.describe_next()
            )));
        };
        self.message_body(message, Some(close))
    }

    /// Run `parse_one` once per value of a repeated field: either a single
    /// value or a `[a, b, ...]` list
    fn each_value<F>(&mut self, mut parse_one: F) -> Result<(), TextFormatError>
    where
        F: FnMut(&mut Self) -> Result<(), TextFormatError>,
    {
        self.eat(b':');
        if !self.eat(b'[') {
            return parse_one(self);
        }
        if self.eat(b']') {
            return Ok(());
        }
        loop {
            parse_one(self)?;
            if self.eat(b',') {
                continue;
            }
            return self.expect(b']');
        }
    }

    /// Append every value of a repeated field
    pub fn repeated<T: TextField>(&mut self, values: &mut Vec<T>) -> Result<(), TextFormatError> {
        self.each_value(|parser| {
            let mut value = T::default();
            value.merge_text(parser)?;
            values.push(value);
            Ok(())
        })
    }

    /// Insert every `{ key: .. value: .. }` entry of a map field
    pub fn map<K, V>(&mut self, map: &mut BTreeMap<K, V>) -> Result<(), TextFormatError>
    where
        K: TextField + Ord,
        V: TextField,
    {
        self.each_value(|parser| {
            let mut entry = MapEntry::<K, V>::default();
            parser.message(&mut entry)?;
            map.insert(entry.key, entry.value);
            Ok(())
        })
    }

    fn unsigned(&mut self, max: u64, type_name: &str) -> Result<u64, TextFormatError> {
        self.skip_whitespace();
        let start = self.pos;
        while let Some(b) = self.peek() {
            if !(b.is_ascii_alphanumeric() || matches!(b, b'-' | b'+' | b'.' | b'_')) {
                break;
            }
            self.pos += 1;
        }
        let input = self.input;
        let token = std::str::from_utf8(&input[start..self.pos]).unwrap_or_default();
        if token.is_empty() {
            return Err(self.error(format_args!(
                "expected integer, found {}",
                self.describe_next()
            )));
        }
        if token.starts_with('-') {
            return Err(self.error(format_args!(
                "negative value {token} for unsigned field"
            )));
        }

        let (digits, radix) = if let Some(hex) = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
        {
            (hex, 16)
        } else if token.len() > 1 && token.starts_with('0') {
            (&token[1..], 8)
        } else {
            (token, 10)
        };

        // from_str_radix tolerates a leading '+', the text format does not
        let well_formed = !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix));
        let parsed = if well_formed {
            u64::from_str_radix(digits, radix).ok()
        } else {
            None
        };

        match parsed {
            Some(value) if value <= max => Ok(value),
            // Well-formed digits only fail to parse on u64 overflow
            Some(_) => {
                Err(self.error(format_args!("{token} is out of range for {type_name}")))
            }
            None if well_formed => {
                Err(self.error(format_args!("{token} is out of range for {type_name}")))
            }
            None => Err(self.error(format_args!("invalid integer {token:?}"))),
        }
    }

    /// One or more adjacent quoted literals, concatenated
    fn string(&mut self) -> Result<String, TextFormatError> {
        self.skip_whitespace();
        if !matches!(self.peek(), Some(b'"' | b'\'')) {
            return Err(self.error(format_args!(
                "expected string, found {}",
                self.describe_next()
            )));
        }

        let start = self.pos;
        let mut bytes = Vec::new();
        while let Some(quote @ (b'"' | b'\'')) = self.peek() {
            self.pos += 1;
            self.string_literal(quote, &mut bytes)?;
            self.skip_whitespace();
        }

        String::from_utf8(bytes).map_err(|_| self.error_at(start, "string is not valid UTF-8"))
    }

    fn string_literal(&mut self, quote: u8, out: &mut Vec<u8>) -> Result<(), TextFormatError> {
        loop {
            let Some(b) = self.peek() else {
                return Err(self.error("unterminated string"));
            };
            match b {
                b'\n' => return Err(self.error("unterminated string")),
                b'\\' => {
                    self.pos += 1;
                    self.escape(out)?;
                }
                _ if b == quote => {
                    self.pos += 1;
                    return Ok(());
                }
                _ => {
                    out.push(b);
                    self.pos += 1;
                }
            }
        }
    }

    fn escape(&mut self, out: &mut Vec<u8>) -> Result<(), TextFormatError> {
        let Some(b) = self.peek() else {
            return Err(self.error("unterminated string"));
        };
        self.pos += 1;
        let decoded = match b {
            b'n' => b'\n',
            b't' => b'\t',
            b'r' => b'\r',
            b'a' => 0x07,
            b'b' => 0x08,
            b'f' => 0x0c,
            b'v' => 0x0b,
            b'\\' | b'\'' | b'"' | b'?' => b,
            b'0'..=b'7' => {
                let mut value = u32::from(b - b'0');
                for _ in 0..2 {
                    match self.peek() {
                        Some(d @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(d - b'0');
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                u8::try_from(value).map_err(|_| self.error("octal escape out of range"))?
            }
            b'x' | b'X' => {
                let mut value = 0u8;
                let mut digits = 0;
                while digits < 2 {
                    match self.peek().and_then(|d| (d as char).to_digit(16)) {
                        Some(d) => {
                            value = value * 16 + d as u8;
                            self.pos += 1;
                            digits += 1;
                        }
                        None => break,
                    }
                }
                if digits == 0 {
                    return Err(self.error("\\x escape without hex digits"));
                }
                value
            }
            other => {
                return Err(self.error(format_args!(
                    "invalid escape sequence \\{}",
                    other as char
                )));
            }
        };
        out.push(decoded);
        Ok(())
    }
}

/// Field value types that can be read from text format
pub trait TextField: Default {
    fn merge_text(&mut self, parser: &mut Parser<'_>) -> Result<(), TextFormatError>;
}

impl TextField for u32 {
    fn merge_text(&mut self, parser: &mut Parser<'_>) -> Result<(), TextFormatError> {
        parser.expect(b':')?;
        *self = parser.unsigned(u64::from(u32::MAX), "uint32")? as u32;
        Ok(())
    }
}

impl TextField for u64 {
    fn merge_text(&mut self, parser: &mut Parser<'_>) -> Result<(), TextFormatError> {
        parser.expect(b':')?;
        *self = parser.unsigned(u64::MAX, "uint64")?;
        Ok(())
    }
}

impl TextField for String {
    fn merge_text(&mut self, parser: &mut Parser<'_>) -> Result<(), TextFormatError> {
        parser.expect(b':')?;
        *self = parser.string()?;
        Ok(())
    }
}

macro_rules! message_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl TextField for $ty {
                fn merge_text(&mut self, parser: &mut Parser<'_>) -> Result<(), TextFormatError> {
                    parser.message(self)
                }
            }
        )*
    };
}

message_field!(Trace, Device, Resource, TraceEvent);

#[derive(Default)]
struct MapEntry<K, V> {
    key: K,
    value: V,
}

impl<K: TextField, V: TextField> TextMessage for MapEntry<K, V> {
    fn merge_field(
        &mut self,
        name: &str,
        parser: &mut Parser<'_>,
    ) -> Result<(), TextFormatError> {
        match name {
            "key" => self.key.merge_text(parser),
            "value" => self.value.merge_text(parser),
            _ => Err(parser.unknown_field("map entry", name)),
        }
    }
}

impl TextMessage for Trace {
    fn merge_field(
        &mut self,
        name: &str,
        parser: &mut Parser<'_>,
    ) -> Result<(), TextFormatError> {
        match name {
            "devices" => parser.map(&mut self.devices),
            "trace_events" => parser.repeated(&mut self.trace_events),
            _ => Err(parser.unknown_field("Trace", name)),
        }
    }
}

impl TextMessage for Device {
    fn merge_field(
        &mut self,
        name: &str,
        parser: &mut Parser<'_>,
    ) -> Result<(), TextFormatError> {
        match name {
            "name" => self.name.merge_text(parser),
            "device_id" => self.device_id.merge_text(parser),
            "resources" => parser.map(&mut self.resources),
            _ => Err(parser.unknown_field("Device", name)),
        }
    }
}

impl TextMessage for Resource {
    fn merge_field(
        &mut self,
        name: &str,
        parser: &mut Parser<'_>,
    ) -> Result<(), TextFormatError> {
        match name {
            "name" => self.name.merge_text(parser),
            "resource_id" => self.resource_id.merge_text(parser),
            _ => Err(parser.unknown_field("Resource", name)),
        }
    }
}

impl TextMessage for TraceEvent {
    fn merge_field(
        &mut self,
        name: &str,
        parser: &mut Parser<'_>,
    ) -> Result<(), TextFormatError> {
        match name {
            "device_id" => self.device_id.merge_text(parser),
            "resource_id" => self.resource_id.merge_text(parser),
            "name" => self.name.merge_text(parser),
            "timestamp_ps" => self.timestamp_ps.merge_text(parser),
            "duration_ps" => self.duration_ps.merge_text(parser),
            "args" => parser.map(&mut self.args),
            _ => Err(parser.unknown_field("TraceEvent", name)),
        }
    }
}
