use crate::diagnostic::Diagnostic;
use crate::span::{Span, Spanned};

use super::lexeme::Lexeme;

const INT_SUFFIXES: &[&str] = &[
    "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize",
];
const FLOAT_SUFFIXES: &[&str] = &["f32", "f64"];

pub(crate) struct Lexer<'src> {
    source: &'src [u8],
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Lexer<'src> {
    pub(crate) fn new(source: &'src str) -> Self {
        Self {
            source: source.as_bytes(),
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn tokenize(mut self) -> (Vec<Spanned<Lexeme>>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let is_eof = tok.node == Lexeme::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        (tokens, self.diagnostics)
    }

    fn next_token(&mut self) -> Spanned<Lexeme> {
        loop {
            self.skip_whitespace_and_comments();

            if self.pos >= self.source.len() {
                return self.make_token(Lexeme::Eof, self.pos, self.pos);
            }

            let start = self.pos;
            let ch = self.source[self.pos];

            if is_ident_start(ch) {
                return self.scan_ident_or_keyword();
            }

            if ch.is_ascii_digit() {
                return self.scan_number();
            }

            if ch == b'"' {
                return self.scan_string();
            }

            if let Some(tok) = self.scan_symbol(start) {
                return tok;
            }
            // scan_symbol returned None → error was recorded, try again
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }

            // Line comments, including `///` and `//!` doc comments
            if self.at_pair(b'/', b'/') {
                while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
                    self.pos += 1;
                }
                continue;
            }

            if self.at_pair(b'/', b'*') {
                self.skip_block_comment();
                continue;
            }

            break;
        }
    }

    /// Block comments nest in Rust.
    fn skip_block_comment(&mut self) {
        let start = self.pos;
        self.pos += 2;
        let mut depth = 1u32;
        while self.pos < self.source.len() && depth > 0 {
            if self.at_pair(b'/', b'*') {
                depth += 1;
                self.pos += 2;
            } else if self.at_pair(b'*', b'/') {
                depth -= 1;
                self.pos += 2;
            } else {
                self.pos += 1;
            }
        }
        if depth > 0 {
            self.diagnostics.push(
                Diagnostic::error(
                    "unterminated block comment".to_string(),
                    Span::new(start as u32, self.pos as u32),
                )
                .with_help("every `/*` needs a matching `*/`".to_string()),
            );
        }
    }

    fn scan_ident_or_keyword(&mut self) -> Spanned<Lexeme> {
        let start = self.pos;
        while self.pos < self.source.len() && is_ident_continue(self.source[self.pos]) {
            self.pos += 1;
        }
        let text = self.text(start, self.pos);
        let token = Lexeme::from_keyword(&text).unwrap_or(Lexeme::Ident(text));
        self.make_token(token, start, self.pos)
    }

    fn scan_number(&mut self) -> Spanned<Lexeme> {
        let start = self.pos;

        if self.source[self.pos] == b'0' {
            let radix = match self.peek_at(1) {
                Some(b'x') => Some(16),
                Some(b'o') => Some(8),
                Some(b'b') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                return self.scan_radix_integer(start, radix);
            }
        }

        self.skip_digits();
        let mut is_float = false;

        // `1.5` is a float, `1..2` is a range and `1.max(2)` is a method call
        if self.peek() == Some(b'.') {
            match self.peek_at(1) {
                Some(c) if c.is_ascii_digit() => {
                    self.pos += 1;
                    self.skip_digits();
                    is_float = true;
                }
                Some(c) if c == b'.' || is_ident_start(c) => {}
                _ => {
                    self.pos += 1;
                    is_float = true;
                }
            }
        }

        if matches!(self.peek(), Some(b'e') | Some(b'E')) {
            let sign = matches!(self.peek_at(1), Some(b'+') | Some(b'-'));
            let digit_at = if sign { 2 } else { 1 };
            if self.peek_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                self.pos += digit_at;
                self.skip_digits();
                is_float = true;
            }
        }

        let digits_end = self.pos;
        let suffix = self.scan_suffix();
        let digits: String = self
            .text(start, digits_end)
            .chars()
            .filter(|&c| c != '_')
            .collect();

        if let Some(ref s) = suffix {
            let valid = FLOAT_SUFFIXES.contains(&s.as_str())
                || (!is_float && INT_SUFFIXES.contains(&s.as_str()));
            if !valid {
                self.diagnostics.push(
                    Diagnostic::error(
                        format!("invalid suffix `{}` for number literal", s),
                        Span::new(start as u32, self.pos as u32),
                    )
                    .with_help("the suffix must be one of the numeric types".to_string()),
                );
            }
        }

        let float_suffix = suffix
            .as_deref()
            .is_some_and(|s| FLOAT_SUFFIXES.contains(&s));
        if is_float || float_suffix {
            let value = match digits.trim_end_matches('.').parse::<f64>() {
                Ok(value) => value,
                Err(_) => {
                    self.diagnostics.push(Diagnostic::error(
                        format!("malformed float literal '{}'", digits),
                        Span::new(start as u32, self.pos as u32),
                    ));
                    0.0
                }
            };
            return self.make_token(Lexeme::Float { value, suffix }, start, self.pos);
        }

        match digits.parse::<u128>() {
            Ok(value) => self.make_token(Lexeme::Integer { value, suffix }, start, self.pos),
            Err(_) => {
                self.diagnostics.push(
                    Diagnostic::error(
                        format!("integer literal '{}' is too large", digits),
                        Span::new(start as u32, self.pos as u32),
                    )
                    .with_help(format!("maximum integer value is {}", u128::MAX)),
                );
                self.make_token(Lexeme::Integer { value: 0, suffix }, start, self.pos)
            }
        }
    }

    fn scan_radix_integer(&mut self, start: usize, radix: u32) -> Spanned<Lexeme> {
        self.pos += 2; // skip `0x` / `0o` / `0b`
        let digits_start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c == b'_' || (c as char).is_digit(radix))
        {
            self.pos += 1;
        }
        let digits: String = self
            .text(digits_start, self.pos)
            .chars()
            .filter(|&c| c != '_')
            .collect();
        let suffix = self.scan_suffix();
        if let Some(ref s) = suffix {
            if !INT_SUFFIXES.contains(&s.as_str()) {
                self.diagnostics.push(Diagnostic::error(
                    format!("invalid suffix `{}` for integer literal", s),
                    Span::new(start as u32, self.pos as u32),
                ));
            }
        }
        let value = match u128::from_str_radix(&digits, radix) {
            Ok(value) => value,
            Err(_) => {
                let text = self.text(start, self.pos);
                self.diagnostics.push(Diagnostic::error(
                    format!("malformed integer literal '{}'", text),
                    Span::new(start as u32, self.pos as u32),
                ));
                0
            }
        };
        self.make_token(Lexeme::Integer { value, suffix }, start, self.pos)
    }

    fn scan_suffix(&mut self) -> Option<String> {
        if !self.peek().is_some_and(is_ident_start) {
            return None;
        }
        let start = self.pos;
        while self.pos < self.source.len() && is_ident_continue(self.source[self.pos]) {
            self.pos += 1;
        }
        Some(self.text(start, self.pos))
    }

    fn skip_digits(&mut self) {
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || c == b'_')
        {
            self.pos += 1;
        }
    }

    fn scan_string(&mut self) -> Spanned<Lexeme> {
        let start = self.pos;
        self.pos += 1; // opening quote
        let mut value = String::new();
        loop {
            match self.peek() {
                None => {
                    self.diagnostics.push(Diagnostic::error(
                        "unterminated string literal".to_string(),
                        Span::new(start as u32, self.pos as u32),
                    ));
                    break;
                }
                Some(b'"') => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') => {
                    let escape = self.peek_at(1);
                    self.pos += 2;
                    match escape {
                        Some(b'n') => value.push('\n'),
                        Some(b't') => value.push('\t'),
                        Some(b'r') => value.push('\r'),
                        Some(b'0') => value.push('\0'),
                        Some(b'\\') => value.push('\\'),
                        Some(b'"') => value.push('"'),
                        Some(b'\'') => value.push('\''),
                        Some(b'\n') => {
                            while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
                                self.pos += 1;
                            }
                        }
                        other => {
                            let shown = other.map(|c| c as char).unwrap_or(' ');
                            self.diagnostics.push(Diagnostic::error(
                                format!("unknown character escape '\\{}'", shown),
                                Span::new((self.pos - 2) as u32, self.pos as u32),
                            ));
                        }
                    }
                }
                Some(_) => {
                    // Copy one UTF-8 scalar
                    let rest = &self.source[self.pos..];
                    let len = utf8_len(rest[0]);
                    let end = (self.pos + len).min(self.source.len());
                    value.push_str(&String::from_utf8_lossy(&self.source[self.pos..end]));
                    self.pos = end;
                }
            }
        }
        self.make_token(Lexeme::Str(value), start, self.pos)
    }

    fn scan_symbol(&mut self, start: usize) -> Option<Spanned<Lexeme>> {
        let ch = self.source[self.pos];
        self.pos += 1;

        let token = match ch {
            b'(' => Lexeme::LParen,
            b')' => Lexeme::RParen,
            b'{' => Lexeme::LBrace,
            b'}' => Lexeme::RBrace,
            b'[' => Lexeme::LBracket,
            b']' => Lexeme::RBracket,
            b',' => Lexeme::Comma,
            b';' => Lexeme::Semicolon,
            b'.' => Lexeme::Dot,
            b'#' => Lexeme::Hash,
            b'?' => Lexeme::Question,
            b':' => self.pick(b':', Lexeme::PathSep, Lexeme::Colon),
            b'+' => self.pick(b'=', Lexeme::PlusEq, Lexeme::Plus),
            b'*' => self.pick(b'=', Lexeme::StarEq, Lexeme::Star),
            b'/' => self.pick(b'=', Lexeme::SlashEq, Lexeme::Slash),
            b'%' => Lexeme::Percent,
            b'!' => self.pick(b'=', Lexeme::NotEq, Lexeme::Bang),
            b'<' => self.pick(b'=', Lexeme::Le, Lexeme::Lt),
            b'>' => self.pick(b'=', Lexeme::Ge, Lexeme::Gt),
            b'&' => self.pick(b'&', Lexeme::AndAnd, Lexeme::Amp),
            b'|' => self.pick(b'|', Lexeme::OrOr, Lexeme::Pipe),
            b'-' => match self.peek() {
                Some(b'>') => {
                    self.pos += 1;
                    Lexeme::Arrow
                }
                Some(b'=') => {
                    self.pos += 1;
                    Lexeme::MinusEq
                }
                _ => Lexeme::Minus,
            },
            b'=' => match self.peek() {
                Some(b'=') => {
                    self.pos += 1;
                    Lexeme::EqEq
                }
                Some(b'>') => {
                    self.pos += 1;
                    Lexeme::FatArrow
                }
                _ => Lexeme::Eq,
            },
            _ => {
                // Skip the whole UTF-8 scalar so the next token starts cleanly
                let len = utf8_len(ch);
                self.pos = (start + len).min(self.source.len());
                let shown = String::from_utf8_lossy(&self.source[start..self.pos]).into_owned();
                self.diagnostics.push(
                    Diagnostic::error(
                        format!("unexpected character '{}'", shown),
                        Span::new(start as u32, self.pos as u32),
                    )
                    .with_help(
                        "this character is not part of the supported Rust syntax".to_string(),
                    ),
                );
                return None;
            }
        };

        Some(self.make_token(token, start, self.pos))
    }

    /// Consume `next` if it follows, choosing between the two-char and one-char lexeme.
    fn pick(&mut self, next: u8, double: Lexeme, single: Lexeme) -> Lexeme {
        if self.peek() == Some(next) {
            self.pos += 1;
            double
        } else {
            single
        }
    }

    fn at_pair(&self, a: u8, b: u8) -> bool {
        self.peek() == Some(a) && self.peek_at(1) == Some(b)
    }

    fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn text(&self, start: usize, end: usize) -> String {
        String::from_utf8_lossy(&self.source[start..end]).into_owned()
    }

    fn make_token(&self, token: Lexeme, start: usize, end: usize) -> Spanned<Lexeme> {
        Spanned::new(token, Span::new(start as u32, end as u32))
    }
}

fn is_ident_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

fn is_ident_continue(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'_'
}

fn utf8_len(first: u8) -> usize {
    match first {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

#[cfg(test)]
mod tests;
