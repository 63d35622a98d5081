//! Position primitives over the original script text.
//!
//! All positions are byte offsets into the script. Comment ranges are found
//! once, up front, by a scan that understands string and template literals,
//! so `'//'` inside a string is never mistaken for a comment.

use std::ops::Range;

use crate::error::{Result, TranspileError};

/// What separates two items in a list-like construct.
///
/// When several are present the strongest wins: comma, then semicolon, then
/// line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    Comma,
    Semicolon,
    LineBreak,
    None,
}

/// Result of [`Script::next_item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextItem {
    /// First position of the following item (or of a closing delimiter).
    pub start: usize,
    pub separator: Separator,
}

#[derive(Debug, Clone)]
pub struct Script<'s> {
    text: &'s str,
    comments: Vec<Range<usize>>,
}

impl<'s> Script<'s> {
    pub fn new(text: &'s str) -> Result<Self> {
        let mut comments = Vec::new();
        scan_code(text, 0, None, &mut comments)?;
        Ok(Self { text, comments })
    }

    pub fn text(&self) -> &'s str {
        self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn byte(&self, pos: usize) -> Option<u8> {
        self.text.as_bytes().get(pos).copied()
    }

    pub fn starts_with_at(&self, pos: usize, pattern: &str) -> bool {
        self.text
            .as_bytes()
            .get(pos..)
            .is_some_and(|rest| rest.starts_with(pattern.as_bytes()))
    }

    pub fn slice(&self, start: usize, end: usize) -> Result<&'s str> {
        self.text.get(start..end).ok_or(TranspileError::OutOfRange {
            start,
            end,
            window_start: 0,
            window_end: self.text.len(),
        })
    }

    /// The comment containing `pos`, if any.
    pub fn comment_at(&self, pos: usize) -> Option<Range<usize>> {
        let idx = self.comments.partition_point(|c| c.start <= pos);
        let comment = self.comments.get(idx.checked_sub(1)?)?;
        (pos < comment.end).then(|| comment.clone())
    }

    fn skip_trivia(&self, pos: usize, limit: usize) -> usize {
        let bytes = self.text.as_bytes();
        let mut i = pos;
        while i < limit {
            if let Some(comment) = self.comment_at(i) {
                i = comment.end;
                continue;
            }
            match bytes[i] {
                b' ' | b'\t' | b'\r' | b'\n' => i += 1,
                _ => return i,
            }
        }
        limit
    }

    /// First position at or after `pos` that is neither whitespace nor
    /// comment. Fails at end of input.
    pub fn find_non_whitespace(&self, pos: usize) -> Result<usize> {
        let i = self.skip_trivia(pos, self.len());
        if i < self.len() {
            Ok(i)
        } else {
            Err(TranspileError::expected("a token", pos))
        }
    }

    /// Like [`Script::find_non_whitespace`] but only searches `pos..limit`.
    pub fn find_non_whitespace_within(&self, pos: usize, limit: usize) -> Option<usize> {
        let limit = limit.min(self.len());
        let i = self.skip_trivia(pos, limit);
        (i < limit).then_some(i)
    }

    /// Last position in `limit..end` that is neither whitespace nor comment.
    pub fn find_last_non_whitespace(&self, end: usize, limit: usize) -> Option<usize> {
        let bytes = self.text.as_bytes();
        let mut i = end.min(self.len());
        while i > limit {
            let j = i - 1;
            if let Some(comment) = self.comment_at(j) {
                i = comment.start;
                continue;
            }
            match bytes[j] {
                b' ' | b'\t' | b'\r' | b'\n' => i = j,
                _ => return Some(j),
            }
        }
        None
    }

    /// Position of `pattern` after skipping trivia from `pos`.
    pub fn expect(&self, pos: usize, pattern: &str) -> Result<usize> {
        let i = self.find_non_whitespace(pos)?;
        if self.starts_with_at(i, pattern) {
            Ok(i)
        } else {
            Err(TranspileError::expected(format!("`{pattern}`"), i))
        }
    }

    /// Position of the whole word `name` after skipping trivia from `pos`.
    pub fn expect_name(&self, pos: usize, name: &str) -> Result<usize> {
        let i = self.find_non_whitespace(pos)?;
        if self.starts_with_at(i, name) && self.name_end(i) == i + name.len() {
            Ok(i)
        } else {
            Err(TranspileError::expected(format!("`{name}`"), i))
        }
    }

    /// First occurrence of `pattern` at or after `from`, outside comments.
    pub fn index_of(&self, pattern: &str, from: usize) -> Result<usize> {
        let bytes = self.text.as_bytes();
        let needle = pattern.as_bytes();
        let mut i = from;
        while i + needle.len() <= bytes.len() {
            if let Some(comment) = self.comment_at(i) {
                i = comment.end;
                continue;
            }
            if bytes[i..].starts_with(needle) {
                return Ok(i);
            }
            i += 1;
        }
        Err(TranspileError::expected(format!("`{pattern}`"), from))
    }

    /// Last occurrence of `pattern` ending at or before `before`, outside
    /// comments.
    pub fn last_index_of(&self, pattern: &str, before: usize) -> Result<usize> {
        let bytes = self.text.as_bytes();
        let needle = pattern.as_bytes();
        let end = before.min(bytes.len());
        let mut i = end.checked_sub(needle.len());
        while let Some(pos) = i {
            if self.comment_at(pos).is_none() && bytes[pos..].starts_with(needle) {
                return Ok(pos);
            }
            i = pos.checked_sub(1);
        }
        Err(TranspileError::expected(format!("`{pattern}`"), before))
    }

    /// End (exclusive) of the identifier starting at `pos`.
    pub fn name_end(&self, pos: usize) -> usize {
        let bytes = self.text.as_bytes();
        let mut i = pos;
        while i < bytes.len() && is_name_byte(bytes[i]) {
            i += 1;
        }
        i
    }

    /// Start of the identifier ending (exclusive) at `end`.
    pub fn name_start(&self, end: usize) -> usize {
        let bytes = self.text.as_bytes();
        let mut i = end.min(bytes.len());
        while i > 0 && is_name_byte(bytes[i - 1]) {
            i -= 1;
        }
        i
    }

    /// Skip the gap after one item and classify its separator. At most one
    /// comma or semicolon is consumed.
    pub fn next_item(&self, pos: usize) -> NextItem {
        let bytes = self.text.as_bytes();
        let (mut comma, mut semicolon, mut line_break) = (false, false, false);
        let mut i = pos;
        while i < bytes.len() {
            if let Some(comment) = self.comment_at(i) {
                i = comment.end;
                continue;
            }
            match bytes[i] {
                b' ' | b'\t' => {}
                b'\r' | b'\n' => line_break = true,
                b',' if !comma && !semicolon => comma = true,
                b';' if !comma && !semicolon => semicolon = true,
                _ => break,
            }
            i += 1;
        }
        let separator = if comma {
            Separator::Comma
        } else if semicolon {
            Separator::Semicolon
        } else if line_break {
            Separator::LineBreak
        } else {
            Separator::None
        };
        NextItem {
            start: i,
            separator,
        }
    }

    /// Whether `start..end` contains a comma, semicolon or line break
    /// outside comments.
    pub fn includes_separator(&self, start: usize, end: usize) -> bool {
        let bytes = self.text.as_bytes();
        let mut i = start;
        while i < end.min(bytes.len()) {
            if let Some(comment) = self.comment_at(i) {
                i = comment.end;
                continue;
            }
            if matches!(bytes[i], b',' | b';' | b'\r' | b'\n') {
                return true;
            }
            i += 1;
        }
        false
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// End (exclusive) of the string or template literal starting at `pos`.
pub fn literal_end(text: &str, pos: usize) -> Result<usize> {
    match text.as_bytes().get(pos) {
        Some(b'\'' | b'"') => string_end(text, pos),
        Some(b'`') => template_end(text, pos, &mut Vec::new()),
        _ => Err(TranspileError::expected("a string or template literal", pos)),
    }
}

/// Scan code from `pos`, recording comments. Inside a template
/// interpolation (`template` is the template's start) the scan stops at the
/// unmatched `}` and returns its position.
fn scan_code(
    text: &str,
    pos: usize,
    template: Option<usize>,
    comments: &mut Vec<Range<usize>>,
) -> Result<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = pos;
    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let end = text[i..].find('\n').map_or(bytes.len(), |n| i + n);
                comments.push(i..end);
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let Some(close) = text[i + 2..].find("*/") else {
                    return Err(TranspileError::UnterminatedComment(i));
                };
                let end = i + 2 + close + 2;
                comments.push(i..end);
                i = end;
            }
            b'\'' | b'"' => i = string_end(text, i)?,
            b'`' => i = template_end(text, i, comments)?,
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' => {
                if template.is_some() && depth == 0 {
                    return Ok(i);
                }
                depth = depth.saturating_sub(1);
                i += 1;
            }
            _ => i += 1,
        }
    }
    match template {
        Some(start) => Err(TranspileError::UnterminatedLiteral(start)),
        None => Ok(bytes.len()),
    }
}

/// Legacy strings only escape their own quote; other backslashes are literal.
fn string_end(text: &str, start: usize) -> Result<usize> {
    let bytes = text.as_bytes();
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        if bytes[i] == b'\\' && bytes.get(i + 1) == Some(&quote) {
            i += 2;
        } else if bytes[i] == quote {
            return Ok(i + 1);
        } else {
            i += 1;
        }
    }
    Err(TranspileError::UnterminatedLiteral(start))
}

fn template_end(text: &str, start: usize, comments: &mut Vec<Range<usize>>) -> Result<usize> {
    let bytes = text.as_bytes();
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if matches!(bytes.get(i + 1), Some(b'{' | b'}' | b'`')) => i += 2,
            b'`' => return Ok(i + 1),
            b'{' => i = scan_code(text, i + 1, Some(start), comments)? + 1,
            _ => i += 1,
        }
    }
    Err(TranspileError::UnterminatedLiteral(start))
}
