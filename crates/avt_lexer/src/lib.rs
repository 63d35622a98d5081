//! Tokenizer for the legacy (0.19) AiScript grammar.
//!
//! Produces a flat token stream with byte spans. Each token records whether a
//! line break occurred in the trivia before it, which the parser needs for
//! statement separation. Template literals are lexed recursively: every
//! `{ ... }` interpolation carries its own token stream with absolute spans.

use avt_ast::Span;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifier or keyword.
    Word(String),
    /// Unsigned numeric literal as written.
    Num(String),
    /// String literal with escapes decoded.
    Str { quote: char, value: String },
    Template(Vec<TemplatePart>),
    Punct(Punct),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    /// Literal text with escapes decoded; `span` covers the raw text.
    Text { value: String, span: Span },
    /// Interpolation; `span` covers the code between the braces.
    Embed {
        tokens: Vec<TokenAndSpan>,
        span: Span,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Punct {
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Colon,
    ColonColon,
    Dot,
    At,
    Hash3,
    Bang,
    AndAnd,
    OrOr,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Eq,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Arrow,
    PlusEq,
    MinusEq,
    Out,
}

/// Punctuators ordered so that longer spellings are tried first.
const PUNCTS: &[(&str, Punct)] = &[
    ("###", Punct::Hash3),
    ("::", Punct::ColonColon),
    ("&&", Punct::AndAnd),
    ("||", Punct::OrOr),
    ("==", Punct::EqEq),
    ("!=", Punct::NotEq),
    ("<=", Punct::LtEq),
    (">=", Punct::GtEq),
    ("=>", Punct::Arrow),
    ("+=", Punct::PlusEq),
    ("-=", Punct::MinusEq),
    ("<:", Punct::Out),
    ("(", Punct::LParen),
    (")", Punct::RParen),
    ("[", Punct::LBracket),
    ("]", Punct::RBracket),
    ("{", Punct::LBrace),
    ("}", Punct::RBrace),
    (",", Punct::Comma),
    (";", Punct::Semicolon),
    (":", Punct::Colon),
    (".", Punct::Dot),
    ("@", Punct::At),
    ("!", Punct::Bang),
    ("+", Punct::Plus),
    ("-", Punct::Minus),
    ("*", Punct::Star),
    ("/", Punct::Slash),
    ("%", Punct::Percent),
    ("^", Punct::Caret),
    ("=", Punct::Eq),
    ("<", Punct::Lt),
    (">", Punct::Gt),
];

impl Punct {
    pub fn as_str(self) -> &'static str {
        PUNCTS
            .iter()
            .find(|(_, p)| *p == self)
            .map(|(s, _)| *s)
            .unwrap_or("?")
    }
}

impl std::fmt::Display for Punct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenAndSpan {
    pub token: Token,
    pub span: Span,
    pub had_line_break: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated string literal starting at byte {0}")]
    UnterminatedString(usize),
    #[error("unterminated template literal starting at byte {0}")]
    UnterminatedTemplate(usize),
    #[error("unterminated comment starting at byte {0}")]
    UnterminatedComment(usize),
    #[error("unexpected character `{ch}` at byte {pos}")]
    UnexpectedChar { ch: char, pos: usize },
}

impl LexError {
    pub fn position(&self) -> usize {
        match self {
            LexError::UnterminatedString(pos)
            | LexError::UnterminatedTemplate(pos)
            | LexError::UnterminatedComment(pos)
            | LexError::UnexpectedChar { pos, .. } => *pos,
        }
    }
}

/// Tokenize a whole script.
pub fn tokenize(source: &str) -> Result<Vec<TokenAndSpan>, LexError> {
    let mut lexer = Lexer { src: source, pos: 0 };
    lexer.tokens_until(None)
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Lex tokens until end of input, or, when `template_start` is set, until
    /// the `}` closing an interpolation (left unconsumed).
    fn tokens_until(&mut self, template_start: Option<usize>) -> Result<Vec<TokenAndSpan>, LexError> {
        let mut tokens = Vec::new();
        let mut depth = 0usize;
        loop {
            let had_line_break = self.skip_trivia()?;
            let Some(c) = self.peek_char() else {
                return match template_start {
                    Some(start) => Err(LexError::UnterminatedTemplate(start)),
                    None => Ok(tokens),
                };
            };
            if c == '}' && template_start.is_some() {
                if depth == 0 {
                    return Ok(tokens);
                }
                depth -= 1;
            } else if c == '{' {
                depth += 1;
            }
            let token = self.next_token(c, had_line_break)?;
            tokens.push(token);
        }
    }

    /// Skip whitespace and comments. Returns whether a line break was seen.
    fn skip_trivia(&mut self) -> Result<bool, LexError> {
        let mut had_line_break = false;
        loop {
            let rest = self.rest();
            if rest.starts_with("//") {
                let len = rest.find('\n').unwrap_or(rest.len());
                self.pos += len;
            } else if rest.starts_with("/*") {
                let Some(close) = rest[2..].find("*/") else {
                    return Err(LexError::UnterminatedComment(self.pos));
                };
                if rest[..close + 2].contains('\n') {
                    had_line_break = true;
                }
                self.pos += close + 4;
            } else {
                match rest.as_bytes().first() {
                    Some(b'\n') => {
                        had_line_break = true;
                        self.pos += 1;
                    }
                    Some(b' ' | b'\t' | b'\r') => self.pos += 1,
                    _ => return Ok(had_line_break),
                }
            }
        }
    }

    fn next_token(&mut self, c: char, had_line_break: bool) -> Result<TokenAndSpan, LexError> {
        let start = self.pos;
        let token = if c.is_ascii_alphabetic() || c == '_' {
            let len = self
                .rest()
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(self.rest().len());
            let word = self.rest()[..len].to_string();
            self.pos += len;
            Token::Word(word)
        } else if c.is_ascii_digit() {
            self.lex_number()
        } else if c == '\'' || c == '"' {
            self.lex_string(c)?
        } else if c == '`' {
            self.lex_template()?
        } else {
            let rest = self.rest();
            let Some((text, punct)) = PUNCTS.iter().find(|(s, _)| rest.starts_with(s)) else {
                return Err(LexError::UnexpectedChar { ch: c, pos: start });
            };
            self.pos += text.len();
            Token::Punct(*punct)
        };
        Ok(TokenAndSpan {
            token,
            span: Span::new(start, self.pos),
            had_line_break,
        })
    }

    fn lex_number(&mut self) -> Token {
        let bytes = self.src.as_bytes();
        let start = self.pos;
        let mut end = start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
            end += 1;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
        }
        self.pos = end;
        Token::Num(self.src[start..end].to_string())
    }

    /// Only a backslash before the closing quote is an escape; every other
    /// backslash is kept literally.
    fn lex_string(&mut self, quote: char) -> Result<Token, LexError> {
        let start = self.pos;
        let mut value = String::new();
        let mut chars = self.src[start + 1..].char_indices();
        while let Some((offset, c)) = chars.next() {
            if c == '\\' && self.src[start + 1 + offset + 1..].starts_with(quote) {
                chars.next();
                value.push(quote);
            } else if c == quote {
                self.pos = start + 1 + offset + 1;
                return Ok(Token::Str { quote, value });
            } else {
                value.push(c);
            }
        }
        Err(LexError::UnterminatedString(start))
    }

    fn lex_template(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        let mut parts = Vec::new();
        let mut text = String::new();
        self.pos += 1;
        let mut text_start = self.pos;
        loop {
            let rest = self.rest();
            let Some(c) = rest.chars().next() else {
                return Err(LexError::UnterminatedTemplate(start));
            };
            match c {
                '\\' if rest[1..].starts_with(['{', '}', '`']) => {
                    text.push(rest.as_bytes()[1] as char);
                    self.pos += 2;
                }
                '`' => {
                    flush_text(&mut parts, &mut text, text_start, self.pos);
                    self.pos += 1;
                    return Ok(Token::Template(parts));
                }
                '{' => {
                    flush_text(&mut parts, &mut text, text_start, self.pos);
                    self.pos += 1;
                    let embed_start = self.pos;
                    let tokens = self.tokens_until(Some(start))?;
                    parts.push(TemplatePart::Embed {
                        tokens,
                        span: Span::new(embed_start, self.pos),
                    });
                    // closing `}`
                    self.pos += 1;
                    text_start = self.pos;
                }
                _ => {
                    text.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }
    }
}

fn flush_text(parts: &mut Vec<TemplatePart>, text: &mut String, start: usize, end: usize) {
    if start < end {
        parts.push(TemplatePart::Text {
            value: std::mem::take(text),
            span: Span::new(start, end),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    fn word(s: &str) -> Token {
        Token::Word(s.to_string())
    }

    #[test]
    fn words_numbers_and_puncts() {
        assert_eq!(
            kinds("let x = 1.5 + y.z"),
            vec![
                word("let"),
                word("x"),
                Token::Punct(Punct::Eq),
                Token::Num("1.5".into()),
                Token::Punct(Punct::Plus),
                word("y"),
                Token::Punct(Punct::Dot),
                word("z"),
            ]
        );
    }

    #[test]
    fn number_does_not_swallow_property_dot() {
        assert_eq!(
            kinds("1.foo"),
            vec![Token::Num("1".into()), Token::Punct(Punct::Dot), word("foo")]
        );
    }

    #[test]
    fn longest_punct_wins() {
        assert_eq!(
            kinds("<: ### :: => <="),
            vec![
                Token::Punct(Punct::Out),
                Token::Punct(Punct::Hash3),
                Token::Punct(Punct::ColonColon),
                Token::Punct(Punct::Arrow),
                Token::Punct(Punct::LtEq),
            ]
        );
    }

    #[test]
    fn line_breaks_are_recorded() {
        let tokens = tokenize("a\nb /* x\n */ c d").unwrap();
        let breaks: Vec<bool> = tokens.iter().map(|t| t.had_line_break).collect();
        assert_eq!(breaks, vec![false, true, true, false]);
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(kinds("a // b\nc"), vec![word("a"), word("c")]);
    }

    #[test]
    fn string_escapes_only_the_quote() {
        assert_eq!(
            kinds(r"'foo\'bar\baz'"),
            vec![Token::Str {
                quote: '\'',
                value: r"foo'bar\baz".into()
            }]
        );
        assert_eq!(
            kinds(r#""a'b""#),
            vec![Token::Str {
                quote: '"',
                value: "a'b".into()
            }]
        );
    }

    #[test]
    fn string_spans_cover_quotes() {
        let tokens = tokenize("x 'ab'").unwrap();
        assert_eq!(tokens[1].span, Span::new(2, 6));
    }

    #[test]
    fn template_parts() {
        let tokens = tokenize("`a{ b }c`").unwrap();
        let Token::Template(parts) = &tokens[0].token else {
            panic!("expected template");
        };
        assert_eq!(parts.len(), 3);
        assert_eq!(
            parts[0],
            TemplatePart::Text {
                value: "a".into(),
                span: Span::new(1, 2)
            }
        );
        let TemplatePart::Embed { tokens, span } = &parts[1] else {
            panic!("expected embed");
        };
        assert_eq!(*span, Span::new(3, 6));
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token, word("b"));
        assert_eq!(tokens[0].span, Span::new(4, 5));
    }

    #[test]
    fn template_embed_with_nested_braces() {
        let tokens = tokenize("`{ { a: `{1}` } }`").unwrap();
        assert_eq!(tokens.len(), 1);
        let Token::Template(parts) = &tokens[0].token else {
            panic!("expected template");
        };
        assert_eq!(parts.len(), 1);
    }

    #[test]
    fn template_escapes() {
        let tokens = tokenize(r"`\{\`x\n`").unwrap();
        let Token::Template(parts) = &tokens[0].token else {
            panic!("expected template");
        };
        assert_eq!(
            parts[0],
            TemplatePart::Text {
                value: r"{`x\n".into(),
                span: Span::new(1, 8)
            }
        );
    }

    #[test]
    fn unterminated_inputs() {
        assert_eq!(tokenize("'abc"), Err(LexError::UnterminatedString(0)));
        assert_eq!(tokenize("x `a{"), Err(LexError::UnterminatedTemplate(2)));
        assert_eq!(tokenize("/* a"), Err(LexError::UnterminatedComment(0)));
    }

    #[test]
    fn stray_character() {
        assert_eq!(
            tokenize("a $ b"),
            Err(LexError::UnexpectedChar { ch: '$', pos: 2 })
        );
    }
}
