//! Recursive-descent parser over the legacy token stream.
//!
//! The parser keeps the end of the last consumed token so every node can be
//! given an inclusive location from its first token to its last one.

mod expressions;
mod statements;
mod types;

use avt_ast::{Loc, Span};
use avt_lexer::{Punct, Token, TokenAndSpan};

use crate::keywords::is_legacy_keyword;
use crate::parse::ParseError;

pub use statements::StatementContext;

pub(crate) type PResult<T> = Result<T, ParseError>;

pub struct Parser<'t> {
    tokens: &'t [TokenAndSpan],
    pos: usize,
    /// Exclusive end of the last consumed token.
    last_end: usize,
    /// Position reported for errors at the end of the token stream.
    end_pos: usize,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint {
    pos: usize,
    last_end: usize,
}

impl<'t> Parser<'t> {
    /// `start` is where the token stream begins in the source, `end_pos`
    /// where it ends (the source length, or the closing brace of a template
    /// interpolation).
    pub fn new(tokens: &'t [TokenAndSpan], start: usize, end_pos: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            last_end: start,
            end_pos,
        }
    }

    pub(crate) fn peek(&self) -> Option<&'t TokenAndSpan> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn peek_nth(&self, n: usize) -> Option<&'t TokenAndSpan> {
        self.tokens.get(self.pos + n)
    }

    pub(crate) fn peek_token(&self) -> Option<&'t Token> {
        self.peek().map(|t| &t.token)
    }

    pub(crate) fn bump(&mut self) -> Option<&'t TokenAndSpan> {
        let tok = self.tokens.get(self.pos)?;
        self.pos += 1;
        self.last_end = tok.span.hi;
        Some(tok)
    }

    pub(crate) fn is_punct(&self, punct: Punct) -> bool {
        self.nth_is_punct(0, punct)
    }

    pub(crate) fn nth_is_punct(&self, n: usize, punct: Punct) -> bool {
        matches!(self.peek_nth(n), Some(TokenAndSpan { token: Token::Punct(p), .. }) if *p == punct)
    }

    pub(crate) fn is_word(&self, word: &str) -> bool {
        self.nth_is_word(0, word)
    }

    pub(crate) fn nth_is_word(&self, n: usize, word: &str) -> bool {
        matches!(self.peek_nth(n), Some(TokenAndSpan { token: Token::Word(w), .. }) if w == word)
    }

    pub(crate) fn eat_punct(&mut self, punct: Punct) -> bool {
        if self.is_punct(punct) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_punct(&mut self, punct: Punct) -> PResult<Span> {
        if self.is_punct(punct) {
            Ok(self.bump().map(|t| t.span).unwrap_or(Span::new(self.last_end, self.last_end)))
        } else {
            Err(self.unexpected(&format!("`{punct}`")))
        }
    }

    pub(crate) fn expect_word(&mut self, word: &str) -> PResult<Span> {
        if self.is_word(word) {
            Ok(self.bump().map(|t| t.span).unwrap_or(Span::new(self.last_end, self.last_end)))
        } else {
            Err(self.unexpected(&format!("`{word}`")))
        }
    }

    /// Consume an identifier that is not a legacy keyword.
    pub(crate) fn expect_name(&mut self) -> PResult<(String, Span)> {
        match self.peek() {
            Some(TokenAndSpan {
                token: Token::Word(w),
                span,
                ..
            }) => {
                if is_legacy_keyword(w) {
                    return Err(self.error(format!("reserved word `{w}` cannot be used as a name")));
                }
                self.bump();
                Ok((w.clone(), *span))
            }
            _ => Err(self.unexpected("a name")),
        }
    }

    /// Whether a line break separates the last consumed token from the next.
    pub(crate) fn at_line_break(&self) -> bool {
        self.peek().is_some_and(|t| t.had_line_break)
    }

    /// Whether the next token starts exactly where the last one ended.
    pub(crate) fn next_is_adjacent(&self) -> bool {
        self.peek().is_some_and(|t| t.span.lo == self.last_end)
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Start of the next token.
    pub(crate) fn start_pos(&self) -> usize {
        self.peek().map_or(self.end_pos, |t| t.span.lo)
    }

    /// Location from `start` to the end of the last consumed token.
    pub(crate) fn loc_from(&self, start: usize) -> Option<Loc> {
        Span::new(start, self.last_end).to_loc()
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            last_end: self.last_end,
        }
    }

    pub(crate) fn restore(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.last_end = checkpoint.last_end;
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::Syntax {
            message: message.into(),
            pos: self.start_pos(),
        }
    }

    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        self.error(format!("expected {expected}, found {}", describe(self.peek())))
    }

    pub fn expect_end(&self) -> PResult<()> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.unexpected("end of input"))
        }
    }
}

fn describe(token: Option<&TokenAndSpan>) -> String {
    match token.map(|t| &t.token) {
        None => "end of input".to_string(),
        Some(Token::Word(w)) => format!("`{w}`"),
        Some(Token::Num(n)) => format!("number `{n}`"),
        Some(Token::Str { .. }) => "string literal".to_string(),
        Some(Token::Template(_)) => "template literal".to_string(),
        Some(Token::Punct(p)) => format!("`{p}`"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avt_lexer::tokenize;

    #[test]
    fn checkpoint_restores_position() {
        let tokens = tokenize("a b").unwrap();
        let mut parser = Parser::new(&tokens, 0, 3);
        let cp = parser.checkpoint();
        parser.bump();
        assert_eq!(parser.loc_from(0), Some(Loc::new(0, 0)));
        parser.restore(cp);
        assert_eq!(parser.start_pos(), 0);
        assert_eq!(parser.loc_from(0), None);
    }

    #[test]
    fn names_reject_keywords() {
        let tokens = tokenize("each").unwrap();
        let mut parser = Parser::new(&tokens, 0, 4);
        let err = parser.expect_name().unwrap_err();
        assert_eq!(err.position(), 0);
    }
}
