//! core::manifest::literal
//!
//! Strict parser for the literal-data subset used by addon manifests.
//!
//! Manifests are written as a single dict expression. Only literal values are
//! accepted: strings (any quoting, `u`/`b`/`r` prefixes, adjacent
//! concatenation), integers, floats, `True`, `False`, `None`, lists, tuples
//! and dicts. Names, calls, attribute access and operators other than a sign
//! on a number are rejected, so reading a manifest can never execute code.
//!
//! # Example
//!
//! ```
//! use addonkit::core::manifest::literal::{parse, Literal};
//!
//! let value = parse("{'depends': ['base', 'mail'], 'installable': True}").unwrap();
//! let Literal::Dict(entries) = value else { panic!("expected dict") };
//! assert_eq!(entries.len(), 2);
//! ```

use thiserror::Error;

/// A parsed literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
    /// Entries in source order. Duplicate keys are kept; consumers decide.
    Dict(Vec<(Literal, Literal)>),
}

impl Literal {
    /// Borrow the string content, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the items of a list or tuple.
    pub fn as_sequence(&self) -> Option<&[Literal]> {
        match self {
            Literal::List(items) | Literal::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Truthiness with the usual literal semantics.
    ///
    /// Empty containers, empty strings, zero and `None` are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Literal::None => false,
            Literal::Bool(b) => *b,
            Literal::Int(i) => *i != 0,
            Literal::Float(f) => *f != 0.0,
            Literal::Str(s) => !s.is_empty(),
            Literal::List(items) | Literal::Tuple(items) => !items.is_empty(),
            Literal::Dict(entries) => !entries.is_empty(),
        }
    }

    /// Short name of the value kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Literal::None => "None",
            Literal::Bool(_) => "bool",
            Literal::Int(_) => "int",
            Literal::Float(_) => "float",
            Literal::Str(_) => "str",
            Literal::List(_) => "list",
            Literal::Tuple(_) => "tuple",
            Literal::Dict(_) => "dict",
        }
    }
}

/// A literal parse failure with its source position (1-based).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}, column {column}: {message}")]
pub struct LiteralError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Parse a complete source text holding exactly one literal expression.
///
/// Leading and trailing whitespace and `#` comments are allowed.
///
/// # Errors
///
/// Returns [`LiteralError`] for any non-literal construct, unterminated
/// string or container, or trailing content after the expression.
pub fn parse(source: &str) -> Result<Literal, LiteralError> {
    let mut parser = Parser::new(source);
    parser.skip_trivia();
    if parser.at_end() {
        return Err(parser.error("expected a literal, found end of input"));
    }
    let value = parser.parse_value()?;
    parser.skip_trivia();
    if !parser.at_end() {
        return Err(parser.error(format!(
            "unexpected '{}' after literal",
            parser.peek().unwrap_or(' ')
        )));
    }
    Ok(value)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

const MAX_DEPTH: usize = 128;

impl Parser {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            depth: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> LiteralError {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, pos: usize, message: impl Into<String>) -> LiteralError {
        let mut line = 1;
        let mut column = 1;
        for &c in self.chars.iter().take(pos) {
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        LiteralError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Skip whitespace, comments and explicit line continuations.
    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                '#' => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                '\\' if self.peek_at(1) == Some('\n') => self.pos += 2,
                c if c.is_whitespace() => self.pos += 1,
                _ => break,
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), LiteralError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{}', found '{}'", expected, c))),
            None => Err(self.error(format!("expected '{}', found end of input", expected))),
        }
    }

    fn parse_value(&mut self) -> Result<Literal, LiteralError> {
        self.skip_trivia();
        let Some(c) = self.peek() else {
            return Err(self.error("expected a literal, found end of input"));
        };

        match c {
            '{' => self.nested(Self::parse_dict),
            '[' => self.nested(Self::parse_list),
            '(' => self.nested(Self::parse_paren),
            '\'' | '"' => self.parse_strings(),
            '0'..='9' | '.' | '-' | '+' => self.parse_number(),
            c if c.is_alphabetic() || c == '_' => {
                if self.string_prefix_len().is_some() {
                    self.parse_strings()
                } else {
                    self.parse_name()
                }
            }
            other => Err(self.error(format!("unexpected '{}'", other))),
        }
    }

    fn nested(
        &mut self,
        parse: fn(&mut Self) -> Result<Literal, LiteralError>,
    ) -> Result<Literal, LiteralError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("literal nested too deeply"));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn parse_dict(&mut self) -> Result<Literal, LiteralError> {
        let open = self.pos;
        self.expect('{')?;
        let mut entries = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                Some('}') => {
                    self.pos += 1;
                    return Ok(Literal::Dict(entries));
                }
                None => return Err(self.error_at(open, "unterminated dict")),
                _ => {}
            }

            let key = self.parse_value()?;
            self.skip_trivia();
            match self.peek() {
                Some(':') => self.pos += 1,
                Some(',') | Some('}') => {
                    return Err(self.error("set literals are not supported"));
                }
                Some(c) => {
                    return Err(self.error(format!("expected ':' after dict key, found '{}'", c)))
                }
                None => return Err(self.error_at(open, "unterminated dict")),
            }
            let value = self.parse_value()?;
            entries.push((key, value));

            self.skip_trivia();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some('}') => {}
                Some(c) => {
                    return Err(self.error(format!("expected ',' or '}}' in dict, found '{}'", c)))
                }
                None => return Err(self.error_at(open, "unterminated dict")),
            }
        }
    }

    fn parse_list(&mut self) -> Result<Literal, LiteralError> {
        let open = self.pos;
        self.expect('[')?;
        let (items, _) = self.parse_items(']', open, "list")?;
        Ok(Literal::List(items))
    }

    /// Parenthesised value or tuple: `()`, `(x,)`, `(x, y)` or `(x)`.
    fn parse_paren(&mut self) -> Result<Literal, LiteralError> {
        let open = self.pos;
        self.expect('(')?;
        let (mut items, trailing_comma) = self.parse_items(')', open, "tuple")?;
        if items.len() == 1 && !trailing_comma {
            return Ok(items.remove(0));
        }
        Ok(Literal::Tuple(items))
    }

    /// Comma separated items up to `close`. Returns whether a comma followed
    /// the last item.
    fn parse_items(
        &mut self,
        close: char,
        open: usize,
        what: &str,
    ) -> Result<(Vec<Literal>, bool), LiteralError> {
        let mut items = Vec::new();
        let mut trailing_comma = false;
        loop {
            self.skip_trivia();
            match self.peek() {
                Some(c) if c == close => {
                    self.pos += 1;
                    return Ok((items, trailing_comma));
                }
                None => return Err(self.error_at(open, format!("unterminated {}", what))),
                _ => {}
            }

            items.push(self.parse_value()?);
            trailing_comma = false;

            self.skip_trivia();
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                    trailing_comma = true;
                }
                Some(c) if c == close => {}
                Some(c) => {
                    return Err(self.error(format!(
                        "expected ',' or '{}' in {}, found '{}'",
                        close, what, c
                    )))
                }
                None => return Err(self.error_at(open, format!("unterminated {}", what))),
            }
        }
    }

    fn parse_name(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let name: String = self.chars[start..self.pos].iter().collect();
        match name.as_str() {
            "True" => Ok(Literal::Bool(true)),
            "False" => Ok(Literal::Bool(false)),
            "None" => Ok(Literal::None),
            _ => Err(self.error_at(
                start,
                format!("unexpected name '{}': only literal values are allowed", name),
            )),
        }
    }

    /// Length of a string prefix (`u`, `b`, `r`, `rb`, `br`, ...) at the
    /// cursor, if one is directly followed by a quote.
    fn string_prefix_len(&self) -> Option<usize> {
        let mut len = 0;
        while len < 2 {
            match self.peek_at(len) {
                Some('u' | 'U' | 'b' | 'B' | 'r' | 'R') => len += 1,
                _ => break,
            }
        }
        (1..=len)
            .rev()
            .find(|&n| matches!(self.peek_at(n), Some('\'' | '"')))
    }

    /// One or more adjacent string literals, concatenated.
    fn parse_strings(&mut self) -> Result<Literal, LiteralError> {
        let mut out = self.parse_string()?;
        loop {
            let save = self.pos;
            self.skip_trivia();
            let next_is_string = matches!(self.peek(), Some('\'' | '"'))
                || (matches!(self.peek(), Some(c) if c.is_alphabetic())
                    && self.string_prefix_len().is_some());
            if !next_is_string {
                self.pos = save;
                return Ok(Literal::Str(out));
            }
            out.push_str(&self.parse_string()?);
        }
    }

    fn parse_string(&mut self) -> Result<String, LiteralError> {
        let start = self.pos;
        let mut raw = false;
        let prefix = if matches!(self.peek(), Some('\'' | '"')) {
            0
        } else {
            self.string_prefix_len().unwrap_or(0)
        };
        for _ in 0..prefix {
            if let Some('r' | 'R') = self.bump() {
                raw = true;
            }
        }

        let quote = match self.bump() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error_at(start, "expected string literal")),
        };
        let triple = self.peek() == Some(quote) && self.peek_at(1) == Some(quote);
        if triple {
            self.pos += 2;
        }

        let mut out = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(self.error_at(start, "unterminated string"));
            };
            match c {
                c if c == quote => {
                    if !triple {
                        return Ok(out);
                    }
                    if self.peek() == Some(quote) && self.peek_at(1) == Some(quote) {
                        self.pos += 2;
                        return Ok(out);
                    }
                    out.push(c);
                }
                '\n' if !triple => {
                    return Err(self.error_at(start, "unterminated string"));
                }
                '\\' => {
                    let Some(next) = self.bump() else {
                        return Err(self.error_at(start, "unterminated string"));
                    };
                    if raw {
                        out.push('\\');
                        out.push(next);
                    } else {
                        self.unescape(next, &mut out)?;
                    }
                }
                c => out.push(c),
            }
        }
    }

    fn unescape(&mut self, c: char, out: &mut String) -> Result<(), LiteralError> {
        match c {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0C}'),
            'v' => out.push('\u{0B}'),
            'x' => out.push(self.hex_escape(2)?),
            'u' => out.push(self.hex_escape(4)?),
            'U' => out.push(self.hex_escape(8)?),
            '0'..='7' => {
                let mut value = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            self.pos += 1;
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(value).unwrap_or('\u{FFFD}'));
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn hex_escape(&mut self, digits: usize) -> Result<char, LiteralError> {
        let start = self.pos;
        let mut value: u32 = 0;
        for _ in 0..digits {
            let d = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error_at(start, "truncated hex escape"))?;
            value = value * 16 + d;
        }
        char::from_u32(value).ok_or_else(|| self.error_at(start, "invalid unicode escape"))
    }

    fn parse_number(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        let mut negative = false;
        while let Some(sign @ ('-' | '+')) = self.peek() {
            if sign == '-' {
                negative = !negative;
            }
            self.pos += 1;
            self.skip_trivia();
        }

        let body_start = self.pos;
        if self.peek() == Some('0') && matches!(self.peek_at(1), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B')) {
            let radix = match self.peek_at(1) {
                Some('x' | 'X') => 16,
                Some('o' | 'O') => 8,
                _ => 2,
            };
            self.pos += 2;
            let digits = self.take_digits(|c| c.is_digit(radix));
            let value = i64::from_str_radix(&digits, radix)
                .map_err(|e| self.error_at(body_start, format!("invalid integer: {}", e)))?;
            return Ok(Literal::Int(if negative { -value } else { value }));
        }

        let mut text = self.take_digits(|c| c.is_ascii_digit());
        let mut is_float = false;
        if self.peek() == Some('.') {
            is_float = true;
            self.pos += 1;
            text.push('.');
            text.push_str(&self.take_digits(|c| c.is_ascii_digit()));
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            self.pos += 1;
            text.push('e');
            if let Some(sign @ ('-' | '+')) = self.peek() {
                self.pos += 1;
                text.push(sign);
            }
            text.push_str(&self.take_digits(|c| c.is_ascii_digit()));
        }

        if text.is_empty() || text == "." {
            return Err(self.error_at(start, "expected a number"));
        }
        if matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            return Err(self.error(format!(
                "unexpected '{}' in number",
                self.peek().unwrap_or(' ')
            )));
        }

        if is_float {
            let value: f64 = text
                .parse()
                .map_err(|_| self.error_at(body_start, format!("invalid float '{}'", text)))?;
            Ok(Literal::Float(if negative { -value } else { value }))
        } else {
            let value: i64 = text
                .parse()
                .map_err(|_| self.error_at(body_start, format!("invalid integer '{}'", text)))?;
            Ok(Literal::Int(if negative { -value } else { value }))
        }
    }

    /// Consume digits matching `accept`, dropping `_` separators.
    fn take_digits(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if accept(c) {
                out.push(c);
            } else if c != '_' {
                break;
            }
            self.pos += 1;
        }
        out
    }
}
