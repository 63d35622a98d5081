use avt_ast::{FnTypeSource, NamedTypeSource, TypeSource};
use avt_lexer::{Punct, Token};

use super::{PResult, Parser};

impl<'t> Parser<'t> {
    /// `name`, `name<inner>` or `@(args) => result`.
    pub(crate) fn parse_type(&mut self) -> PResult<TypeSource> {
        let start = self.start_pos();
        if self.eat_punct(Punct::At) {
            self.expect_punct(Punct::LParen)?;
            let mut args = Vec::new();
            while !self.eat_punct(Punct::RParen) {
                args.push(self.parse_type()?);
                self.eat_punct(Punct::Comma);
            }
            self.expect_punct(Punct::Arrow)?;
            let result = self.parse_type()?;
            return Ok(TypeSource::FnTypeSource(FnTypeSource {
                args,
                result: Box::new(result),
                loc: self.loc_from(start),
            }));
        }

        let name = match self.peek_token() {
            Some(Token::Word(w)) => w.clone(),
            _ => return Err(self.unexpected("a type")),
        };
        self.bump();
        let inner = if self.eat_punct(Punct::Lt) {
            let inner = self.parse_type()?;
            self.expect_punct(Punct::Gt)?;
            Some(Box::new(inner))
        } else {
            None
        };
        Ok(TypeSource::NamedTypeSource(NamedTypeSource {
            name,
            inner,
            loc: self.loc_from(start),
        }))
    }
}
