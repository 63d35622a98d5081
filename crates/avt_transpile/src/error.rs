use avt_ast::NodeKind;
use avt_parser::ParseError;
use thiserror::Error;

/// Why a transpile failed. Every variant aborts the whole script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranspileError {
    /// The legacy parser rejected the input.
    #[error("syntax error: {0}")]
    Syntax(#[from] ParseError),
    #[error("{kind} node has no source location")]
    MissingLocation { kind: NodeKind },
    #[error("expected {expected} at byte {pos}")]
    UnexpectedToken { expected: String, pos: usize },
    #[error("expected {expected} node, found {found}")]
    UnexpectedNode { expected: NodeKind, found: NodeKind },
    #[error("replacement {start}..{end} overlaps {other_start}..{other_end}")]
    Overlap {
        start: usize,
        end: usize,
        other_start: usize,
        other_end: usize,
    },
    #[error("replacement {start}..{end} lies outside {window_start}..{window_end}")]
    OutOfRange {
        start: usize,
        end: usize,
        window_start: usize,
        window_end: usize,
    },
    #[error("unterminated comment starting at byte {0}")]
    UnterminatedComment(usize),
    #[error("unterminated literal starting at byte {0}")]
    UnterminatedLiteral(usize),
    #[error("escape sequence is not closed in `{0}`")]
    MalformedEscape(String),
}

impl TranspileError {
    pub(crate) fn expected(expected: impl Into<String>, pos: usize) -> Self {
        TranspileError::UnexpectedToken {
            expected: expected.into(),
            pos,
        }
    }
}

pub type Result<T, E = TranspileError> = std::result::Result<T, E>;
