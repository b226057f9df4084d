use std::borrow::Cow;

use phf::phf_set;

use crate::symbols::SymbolTable;
use crate::token::{Span, TokSpan};

/// Length units accepted right after a number, e.g. `2em` or `-0.5 pt`.
const UNITS: [&str; 12] = [
    "in", "mm", "cm", "pt", "em", "ex", "pc", "bp", "dd", "cc", "sp", "mu",
];

/// Characters which form a two-character token after a backslash, e.g. `\,` or `\{`.
const ESCAPABLE: &[u8] = br"\[]{}!,:>;|_%#$&";

/// Commands whose braced argument is captured as raw text.
static TEXT_COMMANDS: phf::Set<&'static str> = phf_set! {
    "color", "fbox", "hbox", "href", "mbox", "style", "text", "textbf", "textit", "textrm",
    "textsf", "texttt",
};

/// Fraction commands which accept single-character arguments without braces, e.g. `\frac12`.
static SHORT_FRACTIONS: phf::Set<&'static str> = phf_set! {
    "frac", "cfrac", "dfrac", "tfrac",
};

/// Lexer
///
/// Splits the input into tokens line by line; no token spans a line break. At every position the
/// first matching rule wins, which is not necessarily the longest match: `2in` is one
/// dimension token, while `2i` is a number followed by a letter.
pub(crate) struct Lexer<'source, 'symbols> {
    input: &'source str,
    symbols: &'symbols SymbolTable,
    tokens: Vec<TokSpan<'source>>,
}

impl<'source, 'symbols> Lexer<'source, 'symbols> {
    pub(crate) fn new(input: &'source str, symbols: &'symbols SymbolTable) -> Self {
        Lexer {
            input,
            symbols,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the whole input.
    ///
    /// This never fails: anything no other rule accepts becomes a single-character token.
    pub(crate) fn tokenize(mut self) -> Vec<TokSpan<'source>> {
        let mut line_start = 0;
        let line_ends = memchr::memchr_iter(b'\n', self.input.as_bytes())
            .chain(std::iter::once(self.input.len()));
        for line_end in line_ends {
            self.lex_line(line_start, line_end);
            line_start = line_end + 1;
        }
        self.tokens
    }

    fn lex_line(&mut self, start: usize, end: usize) {
        let mut pos = start;
        let mut first = true;
        while let Some(ch) = self.input[pos..end].chars().next() {
            if ch.is_ascii_whitespace() {
                pos += 1;
                continue;
            }
            pos = self.lex_one(pos, end, first);
            first = false;
        }
    }

    fn push(&mut self, token: impl Into<Cow<'source, str>>, start: usize, end: usize) {
        self.tokens.push(TokSpan::new(token, Span::new(start, end)));
    }

    /// Push the text `start..end` as a token.
    fn push_slice(&mut self, start: usize, end: usize) {
        let input = self.input;
        let text = &input[start..end];
        self.push(text, start, end);
    }

    /// Push the text `start..end` with all whitespace removed.
    fn push_stripped(&mut self, start: usize, end: usize) {
        let input = self.input;
        let text = &input[start..end];
        if text.bytes().any(|b| b.is_ascii_whitespace()) {
            let stripped: String = text.chars().filter(|ch| !ch.is_ascii_whitespace()).collect();
            self.push(stripped, start, end);
        } else {
            self.push(text, start, end);
        }
    }

    /// Read one token (or a small fixed group of tokens) starting at the non-whitespace
    /// character at `pos`. Returns the position after the consumed text.
    fn lex_one(&mut self, pos: usize, end: usize, first: bool) -> usize {
        let input = self.input;
        let bytes = &input.as_bytes()[..end];
        let head = bytes[pos];
        if (head == b'-' || head.is_ascii_digit())
            && let Some(dim_end) = scan_dimension(bytes, pos)
        {
            self.push_stripped(pos, dim_end);
            return dim_end;
        }
        match head {
            // Comments run until the end of the line.
            b'%' => end,
            b'_' | b'^' if bytes.get(pos + 1).is_some_and(u8::is_ascii_digit) => {
                self.push_slice(pos, pos + 1);
                self.push_slice(pos + 1, pos + 2);
                pos + 2
            }
            b'0'..=b'9' => {
                let num_end = scan_number(bytes, pos).unwrap_or(pos + 1);
                self.push_slice(pos, num_end);
                num_end
            }
            b'.' => {
                let frac_end = skip_digits(bytes, pos + 1);
                self.push_slice(pos, frac_end);
                frac_end
            }
            b'\\' => self.lex_command(pos, end, first),
            _ => {
                let ch_len = input[pos..end].chars().next().map_or(1, char::len_utf8);
                self.push_slice(pos, pos + ch_len);
                pos + ch_len
            }
        }
    }

    fn lex_command(&mut self, pos: usize, end: usize, first: bool) -> usize {
        let input = self.input;
        let bytes = &input.as_bytes()[..end];
        let Some(&next) = bytes.get(pos + 1) else {
            // A lone backslash at the end of a line.
            self.push_slice(pos, pos + 1);
            return pos + 1;
        };
        if ESCAPABLE.contains(&next) || next.is_ascii_whitespace() {
            self.push_slice(pos, pos + 2);
            return pos + 2;
        }
        let name_end = skip_while(bytes, pos + 1, u8::is_ascii_alphabetic);
        if name_end == pos + 1 {
            self.push_slice(pos, pos + 1);
            return pos + 1;
        }
        let name = &input[pos + 1..name_end];

        match name {
            "begin" | "end" => {
                if let Some(header_end) = scan_environment_name(bytes, name_end) {
                    self.push_stripped(pos, header_end);
                    return header_end;
                }
            }
            "operatorname" => {
                if let Some(header_end) = scan_operator_name(bytes, name_end) {
                    self.push_stripped(pos, header_end);
                    return header_end;
                }
            }
            _ if TEXT_COMMANDS.contains(name) => {
                let open = skip_while(bytes, name_end, u8::is_ascii_whitespace);
                if bytes.get(open) == Some(&b'{')
                    && let Some(close) = memchr::memchr(b'}', &bytes[open + 1..])
                {
                    let close = open + 1 + close;
                    // An empty argument drops the command together with it.
                    if close > open + 1 {
                        self.push_slice(pos, name_end);
                        self.push_slice(open + 1, close);
                    }
                    return close + 1;
                }
            }
            _ if SHORT_FRACTIONS.contains(name) => {
                let first_arg = skip_while(bytes, name_end, u8::is_ascii_whitespace);
                if bytes.get(first_arg).is_some_and(|b| is_short_argument(*b)) {
                    self.push_slice(pos, name_end);
                    self.push_slice(first_arg, first_arg + 1);
                    let second_arg = skip_while(bytes, first_arg + 1, u8::is_ascii_whitespace);
                    if bytes.get(second_arg).is_some_and(|b| is_short_argument(*b)) {
                        self.push_slice(second_arg, second_arg + 1);
                        return second_arg + 1;
                    }
                    return second_arg;
                }
            }
            _ => {}
        }

        let command = &input[pos..name_end];
        // A symbol alias like `\mathdollar` opening a line stands for the symbol itself.
        if first
            && command.starts_with(r"\math")
            && let Some(ch) = self.symbols.lookup(command)
        {
            self.push(ch.to_string(), pos, name_end);
        } else {
            self.push_slice(pos, name_end);
        }
        name_end
    }
}

#[inline]
fn is_short_argument(b: u8) -> bool {
    b.is_ascii_digit() || b == b'.'
}

fn skip_while(bytes: &[u8], mut pos: usize, pred: impl Fn(&u8) -> bool) -> usize {
    while bytes.get(pos).is_some_and(&pred) {
        pos += 1;
    }
    pos
}

#[inline]
fn skip_digits(bytes: &[u8], pos: usize) -> usize {
    skip_while(bytes, pos, u8::is_ascii_digit)
}

/// Matches `\d+(\.\d+)?` at `pos` and returns its end.
fn scan_number(bytes: &[u8], pos: usize) -> Option<usize> {
    let int_end = skip_digits(bytes, pos);
    if int_end == pos {
        return None;
    }
    if bytes.get(int_end) == Some(&b'.') {
        let frac_end = skip_digits(bytes, int_end + 1);
        if frac_end > int_end + 1 {
            return Some(frac_end);
        }
    }
    Some(int_end)
}

/// Matches `-?\d+(\.\d+)?\s*unit` at `pos` and returns its end.
fn scan_dimension(bytes: &[u8], pos: usize) -> Option<usize> {
    let digits = if bytes[pos] == b'-' { pos + 1 } else { pos };
    let num_end = scan_number(bytes, digits)?;
    let unit_start = skip_while(bytes, num_end, u8::is_ascii_whitespace);
    let rest = bytes.get(unit_start..)?;
    UNITS
        .iter()
        .find(|unit| rest.starts_with(unit.as_bytes()))
        .map(|unit| unit_start + unit.len())
}

/// Matches `\s*{[a-zA-Z]+\*?}` at `pos` and returns its end.
fn scan_environment_name(bytes: &[u8], pos: usize) -> Option<usize> {
    let open = skip_while(bytes, pos, u8::is_ascii_whitespace);
    if bytes.get(open) != Some(&b'{') {
        return None;
    }
    let mut name_end = skip_while(bytes, open + 1, u8::is_ascii_alphabetic);
    if name_end == open + 1 {
        return None;
    }
    if bytes.get(name_end) == Some(&b'*') {
        name_end += 1;
    }
    (bytes.get(name_end) == Some(&b'}')).then_some(name_end + 1)
}

/// Matches `\s*{[a-zA-Z\s*]+}` at `pos` and returns its end.
fn scan_operator_name(bytes: &[u8], pos: usize) -> Option<usize> {
    let open = skip_while(bytes, pos, u8::is_ascii_whitespace);
    if bytes.get(open) != Some(&b'{') {
        return None;
    }
    let content_end = skip_while(bytes, open + 1, |b| {
        b.is_ascii_alphabetic() || b.is_ascii_whitespace() || *b == b'*'
    });
    if content_end == open + 1 {
        return None;
    }
    (bytes.get(content_end) == Some(&b'}')).then_some(content_end + 1)
}
