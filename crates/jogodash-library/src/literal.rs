//! Serialized string-list columns
//!
//! `genres` and `team` are stored as the printed form of a list of strings,
//! e.g. `['Action', "RPG"]`. Tuples are accepted too. Anything that is not a
//! list or tuple made only of string literals is rejected.

use std::iter::Peekable;
use std::str::CharIndices;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("syntax error at byte {offset}: {reason}")]
    Syntax { offset: usize, reason: &'static str },

    #[error("expected a list of strings, found {0}")]
    Shape(&'static str),
}

/// Decode a serialized list, reporting why it failed
pub fn decode_list(raw: &str) -> Result<Vec<String>, DecodeError> {
    // `(['a'])` is the list itself; `(['a'],)` stays a nested tuple
    match grouped(raw) {
        Some(inner) => decode_list(inner).or_else(|_| decode_sequence(raw)),
        None => decode_sequence(raw),
    }
}

/// Contents of grouping parentheses around a bracketed value
fn grouped(raw: &str) -> Option<&str> {
    let inner = raw.trim().strip_prefix('(')?.strip_suffix(')')?;
    inner.trim_start().starts_with(['[', '(']).then_some(inner)
}

fn decode_sequence(raw: &str) -> Result<Vec<String>, DecodeError> {
    let mut parser = Parser::new(raw);
    parser.skip_ws();

    let close = match parser.bump() {
        Some((_, '[')) => ']',
        Some((_, '(')) => ')',
        Some((_, '\'' | '"')) => return Err(DecodeError::Shape("a string")),
        Some((_, c)) if c.is_ascii_digit() || c == '-' => {
            return Err(DecodeError::Shape("a number"));
        }
        Some((_, '{')) => return Err(DecodeError::Shape("a set or dict")),
        Some((offset, _)) => {
            return Err(DecodeError::Syntax {
                offset,
                reason: "expected '[' or '('",
            });
        }
        None => {
            return Err(DecodeError::Syntax {
                offset: raw.len(),
                reason: "empty input",
            });
        }
    };

    let mut items = Vec::new();
    let mut trailing_comma = false;
    loop {
        parser.skip_ws();
        match parser.peek() {
            Some(c) if c == close => {
                parser.bump();
                break;
            }
            Some(_) => {}
            None => return Err(parser.error("unterminated list")),
        }

        items.push(parser.string_item()?);
        trailing_comma = false;

        parser.skip_ws();
        match parser.bump() {
            Some((_, ',')) => trailing_comma = true,
            Some((_, c)) if c == close => break,
            Some((offset, _)) => {
                return Err(DecodeError::Syntax {
                    offset,
                    reason: "expected ',' or closing bracket",
                });
            }
            None => return Err(parser.error("unterminated list")),
        }
    }

    // `('a')` is a parenthesized string, not a tuple
    if close == ')' && items.len() == 1 && !trailing_comma {
        return Err(DecodeError::Shape("a string"));
    }

    parser.skip_ws();
    if parser.peek().is_some() {
        return Err(parser.error("trailing characters"));
    }

    Ok(items)
}

/// Decode a serialized list, falling back to an empty list
pub fn decode_list_or_empty(raw: &str) -> Vec<String> {
    decode_list(raw).unwrap_or_default()
}

/// Print a list in the form [`decode_list`] reads back
pub fn encode_list<S: AsRef<str>>(items: &[S]) -> String {
    let mut out = String::from("[");
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push('\'');
        for c in item.as_ref().chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '\'' => out.push_str("\\'"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if (c as u32) < 0x20 || c == '\u{7f}' => {
                    out.push_str(&format!("\\x{:02x}", c as u32));
                }
                c => out.push(c),
            }
        }
        out.push('\'');
    }
    out.push(']');
    out
}

struct Parser<'a> {
    src: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.char_indices().peekable(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        self.chars.next()
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map(|&(i, _)| i).unwrap_or(self.src.len())
    }

    fn rest(&mut self) -> &'a str {
        let offset = self.offset();
        let src: &'a str = self.src;
        &src[offset..]
    }

    fn error(&mut self, reason: &'static str) -> DecodeError {
        DecodeError::Syntax {
            offset: self.offset(),
            reason,
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn starts_string(&mut self) -> bool {
        let rest = self.rest();
        let body = rest.trim_start_matches(|c: char| "rRuUbB".contains(c));
        let prefix_len = rest.len() - body.len();
        prefix_len <= 2 && (body.starts_with('\'') || body.starts_with('"'))
    }

    /// One list element: adjacent literals concatenate, as in `'Hack' 'n Slash'`
    fn string_item(&mut self) -> Result<String, DecodeError> {
        if !self.starts_string() {
            return Err(match self.peek() {
                Some(c) if c.is_ascii_digit() || c == '-' => DecodeError::Shape("a number"),
                Some('[' | '(') => DecodeError::Shape("a nested sequence"),
                _ => self.error("expected a string literal"),
            });
        }

        let mut value = self.string_literal()?;
        loop {
            self.skip_ws();
            if !self.starts_string() {
                return Ok(value);
            }
            value.push_str(&self.string_literal()?);
        }
    }

    fn string_literal(&mut self) -> Result<String, DecodeError> {
        let mut raw = false;
        while let Some(c) = self.peek() {
            match c {
                'r' | 'R' => raw = true,
                'u' | 'U' => {}
                'b' | 'B' => return Err(DecodeError::Shape("a bytes literal")),
                _ => break,
            }
            self.bump();
        }

        let quote = match self.bump() {
            Some((_, q @ ('\'' | '"'))) => q,
            _ => return Err(self.error("expected a quote")),
        };

        let triple = self.rest().starts_with(&format!("{quote}{quote}"));
        if triple {
            self.bump();
            self.bump();
        }

        let mut out = String::new();
        loop {
            let Some((_, c)) = self.bump() else {
                return Err(self.error("unterminated string"));
            };
            match c {
                c if c == quote => {
                    if !triple {
                        return Ok(out);
                    }
                    let closing = format!("{quote}{quote}");
                    if self.rest().starts_with(&closing) {
                        self.bump();
                        self.bump();
                        return Ok(out);
                    }
                    out.push(c);
                }
                '\n' if !triple => return Err(self.error("newline in string")),
                '\\' if raw => {
                    // raw strings keep the backslash but still cannot end on an escaped quote
                    out.push('\\');
                    if let Some((_, next)) = self.bump() {
                        out.push(next);
                    }
                }
                '\\' => self.escape(&mut out)?,
                c => out.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), DecodeError> {
        let Some((_, c)) = self.bump() else {
            return Err(self.error("unterminated escape"));
        };
        match c {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'v' => out.push('\u{0b}'),
            'x' => out.push(self.hex_escape(2)?),
            'u' => out.push(self.hex_escape(4)?),
            'U' => out.push(self.hex_escape(8)?),
            '0'..='7' => {
                let mut value = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            self.bump();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(value).ok_or_else(|| self.error("invalid octal escape"))?);
            }
            'N' => return Err(self.error("named escapes are not supported")),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn hex_escape(&mut self, digits: usize) -> Result<char, DecodeError> {
        let mut value = 0u32;
        for _ in 0..digits {
            let digit = self
                .peek()
                .and_then(|d| d.to_digit(16))
                .ok_or_else(|| self.error("truncated hex escape"))?;
            value = value * 16 + digit;
            self.bump();
        }
        char::from_u32(value).ok_or_else(|| self.error("escape is not a valid character"))
    }
}
