//! Searching and sam-style address expressions.
//!
//! Searches start at an anchor and wrap around the end of the buffer
//! once. All results are `Selection`s in rune columns; byte offsets only
//! exist inside this module while slicing the buffer contents.
//!
//! Address grammar:
//!
//! ```text
//! /regexp/   first match after dot, wrapping to the start
//! ?regexp?   last match before dot, wrapping to the end
//! N          line N (1-based), including its line break
//! $          end of the buffer
//! ```
//!
//! A delimiter inside a pattern is written `\/` (or `\?`).

use regex::{Match, Regex, RegexBuilder};

use crate::{Address, Buffer, Selection};

/// Errors produced while parsing an address expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty address expression")]
    Empty,

    #[error("missing closing '{0}'")]
    Unterminated(char),

    #[error("invalid regular expression {pattern:?}: {message}")]
    InvalidRegex { pattern: String, message: String },

    #[error("unrecognized address: {0:?}")]
    UnknownAddress(String),
}

/// Finds `pattern` literally, starting at `from` and wrapping once.
///
/// The first pass covers `from` to the end of the buffer; if that
/// misses, the second pass covers the start of the buffer up to `from`,
/// so a wrapped match never runs past the anchor. A match that begins
/// exactly at `from` is found again, so repeating a search without
/// moving the anchor is idempotent.
pub fn find_substring(buffer: &Buffer, from: Address, pattern: &str) -> Option<Selection> {
    if pattern.is_empty() {
        return None;
    }

    let from = buffer.clamp(from);
    let text = buffer.contents();
    let start = buffer.byte_offset(from);

    if let Some(i) = text[start..].find(pattern) {
        let begin = from.advance_over(&text[start..start + i]);
        return Some(Selection::new(begin, begin.advance_over(pattern)));
    }

    let i = text[..start].find(pattern)?;
    let begin = Address::ZERO.advance_over(&text[..i]);
    Some(Selection::new(begin, begin.advance_over(pattern)))
}

#[derive(Debug, Clone)]
enum AddressKind {
    Forward(Regex),
    Backward(Regex),
    Line(usize),
    End,
}

/// A compiled address expression.
#[derive(Debug, Clone)]
pub struct AddressMatcher {
    kind: AddressKind,
}

impl AddressMatcher {
    /// Finds the address within `text`, with rows and columns relative
    /// to the start of `text`.
    pub fn execute(&self, text: &str) -> Option<Selection> {
        match &self.kind {
            AddressKind::Forward(re) => re.find(text).map(|m| span(text, m.start(), m.end())),
            AddressKind::Backward(re) => {
                re.find_iter(text).last().map(|m| span(text, m.start(), m.end()))
            }
            AddressKind::Line(n) => Some(line_span(text, *n)),
            AddressKind::End => Some(Selection::caret(Address::ZERO.advance_over(text))),
        }
    }

    /// Resolves the expression against `buffer` with the current `dot`.
    ///
    /// Forward searches run from `dot.to` to the end, then wrap to
    /// matches ending at or before `dot.to`. Backward searches take the
    /// last match ending at or before `dot.from`, then wrap to the last
    /// match starting at or after it. Regexes always see the whole
    /// buffer, so `^`, `$` and `\b` keep their meaning at the anchor.
    /// Line numbers and `$` ignore dot.
    pub fn resolve(&self, buffer: &Buffer, dot: Selection) -> Option<Selection> {
        let dot = buffer.clamp_selection(dot);
        let text = buffer.contents();

        let found = match &self.kind {
            AddressKind::Forward(re) => {
                let start = buffer.byte_offset(dot.to);
                re.find_at(&text, start)
                    .or_else(|| re.find(&text).filter(|m| m.end() <= start))
            }
            AddressKind::Backward(re) => {
                let end = buffer.byte_offset(dot.from);
                re.find_iter(&text)
                    .take_while(|m| m.end() <= end)
                    .last()
                    .or_else(|| matches_from(re, &text, end).last())
            }
            AddressKind::Line(_) | AddressKind::End => return self.execute(&text),
        };
        found.map(|m| span(&text, m.start(), m.end()))
    }
}

/// Matches of `re` starting at or after byte `at`, leftmost first.
/// The text before `at` stays visible to anchors.
fn matches_from<'t>(re: &'t Regex, text: &'t str, at: usize) -> impl Iterator<Item = Match<'t>> + 't {
    let mut pos = at;
    std::iter::from_fn(move || {
        if pos > text.len() {
            return None;
        }
        let m = re.find_at(text, pos)?;
        pos = if m.start() == m.end() {
            text[m.end()..]
                .chars()
                .next()
                .map_or(text.len() + 1, |c| m.end() + c.len_utf8())
        } else {
            m.end()
        };
        Some(m)
    })
}

/// Parses an address expression.
pub fn parse_address_expression(expr: &str) -> Result<AddressMatcher, ParseError> {
    let expr = expr.trim();
    let mut chars = expr.chars();

    let kind = match chars.next() {
        None => return Err(ParseError::Empty),
        Some(delim @ ('/' | '?')) => {
            let (pattern, rest) = split_delimited(chars.as_str(), delim)?;
            if !rest.trim().is_empty() {
                return Err(ParseError::UnknownAddress(rest.to_string()));
            }
            let re = compile(&pattern)?;
            if delim == '/' {
                AddressKind::Forward(re)
            } else {
                AddressKind::Backward(re)
            }
        }
        Some('$') if chars.as_str().is_empty() => AddressKind::End,
        Some(c) if c.is_ascii_digit() => expr
            .parse()
            .map(AddressKind::Line)
            .map_err(|_| ParseError::UnknownAddress(expr.to_string()))?,
        Some(_) => return Err(ParseError::UnknownAddress(expr.to_string())),
    };

    Ok(AddressMatcher { kind })
}

/// Finds `expr` relative to `dot`.
///
/// Returns `Ok(None)` when the expression is valid but matches nothing.
pub fn jump_to(buffer: &Buffer, dot: Selection, expr: &str) -> Result<Option<Selection>, ParseError> {
    let matcher = parse_address_expression(expr)?;
    Ok(matcher.resolve(buffer, dot))
}

/// Splits `s` at the first unescaped `delim`, unescaping `\delim`.
fn split_delimited(s: &str, delim: char) -> Result<(String, &str), ParseError> {
    let mut pattern = String::new();
    let mut iter = s.char_indices();

    while let Some((i, c)) = iter.next() {
        match c {
            '\\' => match iter.next() {
                Some((_, next)) if next == delim => pattern.push(delim),
                Some((_, next)) => {
                    pattern.push('\\');
                    pattern.push(next);
                }
                None => pattern.push('\\'),
            },
            c if c == delim => return Ok((pattern, &s[i + c.len_utf8()..])),
            c => pattern.push(c),
        }
    }

    Err(ParseError::Unterminated(delim))
}

fn compile(pattern: &str) -> Result<Regex, ParseError> {
    if pattern.is_empty() {
        return Err(ParseError::Empty);
    }
    RegexBuilder::new(pattern)
        .multi_line(true)
        .build()
        .map_err(|e| ParseError::InvalidRegex {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

fn span(text: &str, start: usize, end: usize) -> Selection {
    let from = Address::ZERO.advance_over(&text[..start]);
    Selection::new(from, from.advance_over(&text[start..end]))
}

/// Line `n` (1-based) of `text` including its break; `0` is the start.
fn line_span(text: &str, n: usize) -> Selection {
    if n == 0 {
        return Selection::caret(Address::ZERO);
    }
    let last = text.bytes().filter(|&b| b == b'\n').count();
    let row = (n - 1).min(last);
    let from = Address::new(row, 0);
    let to = if row < last {
        Address::new(row + 1, 0)
    } else {
        Address::ZERO.advance_over(text)
    };
    Selection::new(from, to)
}
