//! Parser for Python-style literals, the second reply-parse strategy.
//!
//! Model replies sometimes arrive as Python `repr` output rather than JSON:
//! single-quoted strings, `True`/`False`/`None`, tuples, trailing commas.
//! `serde_json` rejects all of that, so this module walks the text by hand
//! and produces a [`serde_json::Value`]. The grammar is the literal subset
//! only: strings, numbers, booleans, `None`, lists, tuples and dicts.
//! Sets and anything resembling an expression are errors, and the caller
//! moves on to the next strategy.
//!
//! Tuples become arrays. Non-string dict keys are stringified with the same
//! rendering the record coercion uses, so `{1: 'a'}` keys as `"1"`.

use std::iter::Peekable;
use std::str::Chars;

use anyhow::{anyhow, bail, Result};
use serde_json::{Map, Number, Value};

/// Nesting bound, matching serde_json's default recursion limit.
const MAX_DEPTH: usize = 128;

pub(crate) fn parse_literal(text: &str) -> Result<Value> {
    let mut parser = Parser {
        chars: text.chars().peekable(),
    };
    parser.skip_whitespace();
    let value = parser.parse_value(MAX_DEPTH)?;
    parser.skip_whitespace();
    if let Some(c) = parser.chars.peek() {
        bail!("unexpected trailing character {c:?}");
    }
    Ok(value)
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
}

impl Parser<'_> {
    fn parse_value(&mut self, depth: usize) -> Result<Value> {
        if depth == 0 {
            bail!("literal nests too deeply");
        }
        match self.chars.peek().copied() {
            Some(quote @ ('\'' | '"')) => {
                self.chars.next();
                self.parse_string(quote).map(Value::String)
            }
            Some('[') => {
                self.chars.next();
                self.parse_sequence(']', depth - 1)
            }
            Some('(') => {
                self.chars.next();
                self.parse_parenthesized(depth - 1)
            }
            Some('{') => {
                self.chars.next();
                self.parse_dict(depth - 1)
            }
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.parse_number(),
            Some(c) if c.is_ascii_alphabetic() => self.parse_keyword(),
            Some(c) => bail!("unexpected character {c:?}"),
            None => bail!("unexpected end of input"),
        }
    }

    fn parse_string(&mut self, quote: char) -> Result<String> {
        let mut out = String::new();
        loop {
            match self.chars.next() {
                None => bail!("unterminated string literal"),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.chars.next() {
                    None => bail!("unterminated escape sequence"),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('x') => out.push(self.parse_hex_escape(2)?),
                    Some('u') => out.push(self.parse_hex_escape(4)?),
                    Some(c @ ('\\' | '\'' | '"')) => out.push(c),
                    // Python keeps unrecognized escapes verbatim.
                    Some(c) => {
                        out.push('\\');
                        out.push(c);
                    }
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_hex_escape(&mut self, digits: u32) -> Result<char> {
        let mut code = 0u32;
        for _ in 0..digits {
            let digit = self
                .chars
                .next()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| anyhow!("malformed hex escape"))?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or_else(|| anyhow!("hex escape is not a valid character"))
    }

    fn parse_number(&mut self) -> Result<Value> {
        let mut token = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-') {
                token.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        if token.contains(['.', 'e', 'E']) {
            return float_number(&token);
        }
        if let Ok(n) = token.parse::<i64>() {
            return Ok(Value::Number(Number::from(n)));
        }
        if let Ok(n) = token.parse::<u64>() {
            return Ok(Value::Number(Number::from(n)));
        }
        // Integers past the u64 range lose precision rather than the parse.
        float_number(&token)
    }

    fn parse_keyword(&mut self) -> Result<Value> {
        let mut ident = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                ident.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        match ident.as_str() {
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            "None" => Ok(Value::Null),
            _ => bail!("unknown identifier {ident:?}"),
        }
    }

    fn parse_sequence(&mut self, close: char, depth: usize) -> Result<Value> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.eat(close) {
                return Ok(Value::Array(items));
            }
            items.push(self.parse_value(depth)?);
            self.skip_whitespace();
            if !self.eat(',') {
                self.expect(close)?;
                return Ok(Value::Array(items));
            }
        }
    }

    /// `()` is an empty tuple, `(x)` is just `x`, `(x,)` and longer are
    /// tuples. All tuples come out as arrays.
    fn parse_parenthesized(&mut self, depth: usize) -> Result<Value> {
        self.skip_whitespace();
        if self.eat(')') {
            return Ok(Value::Array(Vec::new()));
        }
        let first = self.parse_value(depth)?;
        self.skip_whitespace();
        if self.eat(')') {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.eat(',') {
            self.skip_whitespace();
            if self.eat(')') {
                return Ok(Value::Array(items));
            }
            items.push(self.parse_value(depth)?);
            self.skip_whitespace();
        }
        self.expect(')')?;
        Ok(Value::Array(items))
    }

    fn parse_dict(&mut self, depth: usize) -> Result<Value> {
        let mut map = Map::new();
        loop {
            self.skip_whitespace();
            if self.eat('}') {
                return Ok(Value::Object(map));
            }
            let key = match self.parse_value(depth)? {
                Value::String(s) => s,
                other => other.to_string(),
            };
            self.skip_whitespace();
            self.expect(':')?;
            self.skip_whitespace();
            let value = self.parse_value(depth)?;
            map.insert(key, value);
            self.skip_whitespace();
            if !self.eat(',') {
                self.expect('}')?;
                return Ok(Value::Object(map));
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.chars.peek() == Some(&expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.chars.next() {
            Some(c) if c == expected => Ok(()),
            Some(c) => bail!("expected {expected:?}, found {c:?}"),
            None => bail!("expected {expected:?}, found end of input"),
        }
    }
}

fn float_number(token: &str) -> Result<Value> {
    let parsed: f64 = token
        .parse()
        .map_err(|_| anyhow!("malformed number {token:?}"))?;
    let number =
        Number::from_f64(parsed).ok_or_else(|| anyhow!("number {token:?} is not finite"))?;
    Ok(Value::Number(number))
}
