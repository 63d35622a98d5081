//! Parser for the legacy (0.19) AiScript grammar.
//!
//! Builds [`avt_ast::Node`] trees whose locations index into the exact
//! source string that was parsed. Layout:
//!
//! - `grammar/statements.rs`: statement lists, definitions, loops, namespaces
//! - `grammar/expressions.rs`: infix sugar, chains, literals, `if`/`match`
//! - `grammar/types.rs`: type annotations

pub mod grammar;
pub mod keywords;
pub mod parse;

pub use parse::{line_col, parse_script, ParseError};
