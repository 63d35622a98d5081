//! Text transformations applied to the gaps between tokens and to literal
//! contents.

use crate::error::{Result, TranspileError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GapState {
    Code,
    LineComment,
    BlockComment,
}

/// Join a gap onto one line.
///
/// Line breaks become single spaces and the indentation after them is
/// dropped. Line comments are turned into block comments (closed before the
/// line break they ran up to) so they cannot swallow the code that now
/// follows them on the same line. Block comments are copied as they are.
pub fn neutralize_line_separators(gap: &str) -> String {
    let mut out = String::with_capacity(gap.len());
    let mut state = GapState::Code;
    let mut skip_indent = false;
    let mut chars = gap.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            GapState::Code => {
                if skip_indent && matches!(c, ' ' | '\t' | '\r' | '\n') {
                    continue;
                }
                skip_indent = false;
                match c {
                    '/' if chars.peek() == Some(&'/') => {
                        chars.next();
                        out.push_str("/*");
                        state = GapState::LineComment;
                    }
                    '/' if chars.peek() == Some(&'*') => {
                        chars.next();
                        out.push_str("/*");
                        state = GapState::BlockComment;
                    }
                    '\r' | '\n' => {
                        if c == '\r' && chars.peek() == Some(&'\n') {
                            chars.next();
                        }
                        out.push(' ');
                        skip_indent = true;
                    }
                    _ => out.push(c),
                }
            }
            GapState::LineComment => match c {
                '*' if chars.peek() == Some(&'/') => {
                    chars.next();
                    out.push_str("* /");
                }
                '\r' | '\n' => {
                    if c == '\r' && chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    out.push_str("*/ ");
                    state = GapState::Code;
                    skip_indent = true;
                }
                _ => out.push(c),
            },
            GapState::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("*/");
                    state = GapState::Code;
                } else {
                    out.push(c);
                }
            }
        }
    }
    if state == GapState::LineComment {
        out.push_str("*/");
    }
    out
}

/// Characters a template literal may escape.
pub const TEMPLATE_ESCAPABLE: &[char] = &['{', '}', '`'];

/// Rewrite the raw contents of a string or template literal for the new
/// escape rules.
///
/// A backslash followed by an `escapable` character stays an escape. Any
/// other backslash was literal in the old grammar and is doubled.
pub fn reescape(raw: &str, escapable: &[char]) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut escape = false;
    for c in raw.chars() {
        if !escape {
            if c == '\\' {
                escape = true;
            } else {
                out.push(c);
            }
            continue;
        }
        if c == '\\' {
            out.push_str("\\\\");
            continue;
        }
        escape = false;
        out.push_str(if escapable.contains(&c) { "\\" } else { "\\\\" });
        out.push(c);
    }
    if escape {
        return Err(TranspileError::MalformedEscape(raw.to_string()));
    }
    Ok(out)
}
