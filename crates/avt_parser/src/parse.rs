use avt_ast::Node;
use avt_lexer::{tokenize, LexError};
use thiserror::Error;

use crate::grammar::{Parser, StatementContext};

/// Error produced when a script is not valid legacy AiScript.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("{message} (at byte {pos})")]
    Syntax { message: String, pos: usize },
}

impl ParseError {
    /// Byte offset the error refers to.
    pub fn position(&self) -> usize {
        match self {
            ParseError::Lex(e) => e.position(),
            ParseError::Syntax { pos, .. } => *pos,
        }
    }
}

/// Parse a whole script into its top-level statements.
pub fn parse_script(source: &str) -> Result<Vec<Node>, ParseError> {
    let tokens = tokenize(source)?;
    tracing::debug!(tokens = tokens.len(), "tokenized script");
    let mut parser = Parser::new(&tokens, 0, source.len());
    let nodes = parser.parse_statements(StatementContext::Global)?;
    parser.expect_end()?;
    Ok(nodes)
}

/// 1-based line and column of a byte offset, for diagnostics.
pub fn line_col(source: &str, pos: usize) -> (usize, usize) {
    let prefix = source.get(..pos).unwrap_or(source);
    let line = prefix.matches('\n').count() + 1;
    let column = prefix
        .rfind('\n')
        .map_or(prefix.chars().count(), |nl| prefix[nl + 1..].chars().count())
        + 1;
    (line, column)
}
