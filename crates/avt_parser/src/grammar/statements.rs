use avt_ast::{
    Assign, AssignOp, Block, Break, Call, Continue, Definition, Each, For, ForIteration,
    Identifier, Loop, Meta, Namespace, Node, Return,
};
use avt_lexer::{Punct, Token};

use super::{PResult, Parser};
use crate::keywords::is_legacy_keyword;

/// Which statements a statement list accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementContext {
    /// Top level: statements plus namespaces and metadata.
    Global,
    /// Inside `:: Name { }`: definitions and nested namespaces only.
    Namespace,
    /// Function bodies, blocks, loops.
    Block,
}

impl<'t> Parser<'t> {
    /// Parse statements until end of input or an unmatched `}`, which is left
    /// for the caller.
    pub fn parse_statements(&mut self, context: StatementContext) -> PResult<Vec<Node>> {
        let mut nodes = Vec::new();
        loop {
            while self.eat_punct(Punct::Semicolon) {}
            if self.at_end() || self.is_punct(Punct::RBrace) {
                break;
            }
            let node = match context {
                StatementContext::Global => self.parse_global_statement()?,
                StatementContext::Namespace => self.parse_namespace_member()?,
                StatementContext::Block => self.parse_statement()?,
            };
            nodes.push(node);
            let terminated = self.at_end()
                || self.is_punct(Punct::RBrace)
                || self.is_punct(Punct::Semicolon)
                || self.at_line_break();
            if !terminated {
                return Err(self.error("multiple statements cannot be placed on a single line"));
            }
        }
        Ok(nodes)
    }

    fn parse_global_statement(&mut self) -> PResult<Node> {
        if self.is_punct(Punct::ColonColon) {
            self.parse_namespace()
        } else if self.is_punct(Punct::Hash3) {
            self.parse_meta()
        } else {
            self.parse_statement()
        }
    }

    fn parse_namespace_member(&mut self) -> PResult<Node> {
        if self.is_word("let") || self.is_word("var") {
            self.parse_var_def()
        } else if self.is_punct(Punct::At) {
            self.parse_fn_def()
        } else if self.is_punct(Punct::ColonColon) {
            self.parse_namespace()
        } else {
            Err(self.unexpected("a definition"))
        }
    }

    pub(crate) fn parse_statement(&mut self) -> PResult<Node> {
        let Some(tok) = self.peek() else {
            return Err(self.unexpected("a statement"));
        };
        match &tok.token {
            Token::Word(w) => match w.as_str() {
                "let" | "var" => self.parse_var_def(),
                "return" => self.parse_return(),
                "each" => self.parse_each(),
                "for" => self.parse_for(),
                "loop" => self.parse_loop(),
                "break" => {
                    self.bump();
                    Ok(Node::Break(Break {
                        loc: self.loc_from(tok.span.lo),
                    }))
                }
                "continue" => {
                    self.bump();
                    Ok(Node::Continue(Continue {
                        loc: self.loc_from(tok.span.lo),
                    }))
                }
                _ => self.parse_expression_statement(),
            },
            Token::Punct(Punct::At) if matches!(self.peek_nth(1).map(|t| &t.token), Some(Token::Word(_))) => {
                self.parse_fn_def()
            }
            Token::Punct(Punct::Out) => self.parse_print(),
            _ => self.parse_expression_statement(),
        }
    }

    /// A `{ ... }` block if one parses, otherwise a single statement.
    ///
    /// `{ a: 1 }` fails as a block and is re-read as an object literal.
    pub(crate) fn parse_block_or_statement(&mut self) -> PResult<Node> {
        if self.is_punct(Punct::LBrace) {
            let checkpoint = self.checkpoint();
            let start = self.start_pos();
            match self.parse_braced_statements() {
                Ok(statements) => {
                    return Ok(Node::Block(Block {
                        statements,
                        loc: self.loc_from(start),
                    }))
                }
                Err(block_err) => {
                    self.restore(checkpoint);
                    return self.parse_statement().map_err(|e| {
                        if e.position() >= block_err.position() {
                            e
                        } else {
                            block_err
                        }
                    });
                }
            }
        }
        self.parse_statement()
    }

    pub(crate) fn parse_braced_statements(&mut self) -> PResult<Vec<Node>> {
        self.expect_punct(Punct::LBrace)?;
        let statements = self.parse_statements(StatementContext::Block)?;
        self.expect_punct(Punct::RBrace)?;
        Ok(statements)
    }

    fn parse_var_def(&mut self) -> PResult<Node> {
        let start = self.start_pos();
        let mutable = self.is_word("var");
        self.bump();
        let (name, _) = self.expect_name()?;
        let var_type = if self.eat_punct(Punct::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        self.expect_punct(Punct::Eq)?;
        let expr = self.parse_expr()?;
        Ok(Node::Def(Definition {
            name,
            var_type,
            expr: Box::new(expr),
            mutable,
            loc: self.loc_from(start),
        }))
    }

    /// `@name(params) { body }`
    fn parse_fn_def(&mut self) -> PResult<Node> {
        let start = self.start_pos();
        self.expect_punct(Punct::At)?;
        let (name, _) = self.expect_name()?;
        let function = self.parse_fn_rest(start)?;
        Ok(Node::Def(Definition {
            name,
            var_type: None,
            expr: Box::new(Node::Fn(function)),
            mutable: false,
            loc: self.loc_from(start),
        }))
    }

    fn parse_return(&mut self) -> PResult<Node> {
        let start = self.start_pos();
        self.bump();
        let expr = self.parse_expr()?;
        Ok(Node::Return(Return {
            expr: Box::new(expr),
            loc: self.loc_from(start),
        }))
    }

    /// Whether a loop header is written `(let ...)`.
    fn at_paren_let(&self) -> bool {
        self.is_punct(Punct::LParen) && self.nth_is_word(1, "let")
    }

    fn parse_each(&mut self) -> PResult<Node> {
        let start = self.start_pos();
        self.bump();
        let paren = self.at_paren_let();
        if paren {
            self.bump();
        }
        self.expect_word("let")?;
        let (var, _) = self.expect_name()?;
        self.eat_punct(Punct::Comma);
        let items = self.parse_expr()?;
        if paren {
            self.expect_punct(Punct::RParen)?;
        }
        let body = self.parse_block_or_statement()?;
        Ok(Node::Each(Each {
            var,
            items: Box::new(items),
            body: Box::new(body),
            loc: self.loc_from(start),
        }))
    }

    fn parse_for(&mut self) -> PResult<Node> {
        let start = self.start_pos();
        self.bump();
        let paren = self.at_paren_let();
        let iteration = if paren || self.is_word("let") {
            if paren {
                self.bump();
            }
            self.expect_word("let")?;
            let (var, _) = self.expect_name()?;
            let from = if self.eat_punct(Punct::Eq) {
                Some(Box::new(self.parse_expr()?))
            } else {
                None
            };
            self.eat_punct(Punct::Comma);
            let to = self.parse_expr()?;
            if paren {
                self.expect_punct(Punct::RParen)?;
            }
            ForIteration::Range {
                var,
                from,
                to: Box::new(to),
            }
        } else {
            ForIteration::Times {
                times: Box::new(self.parse_expr()?),
            }
        };
        let body = self.parse_block_or_statement()?;
        Ok(Node::For(For {
            iteration,
            body: Box::new(body),
            loc: self.loc_from(start),
        }))
    }

    fn parse_loop(&mut self) -> PResult<Node> {
        let start = self.start_pos();
        self.bump();
        let statements = self.parse_braced_statements()?;
        Ok(Node::Loop(Loop {
            statements,
            loc: self.loc_from(start),
        }))
    }

    /// `<: expr`, sugar for `print(expr)`.
    fn parse_print(&mut self) -> PResult<Node> {
        let start = self.start_pos();
        let op = self.expect_punct(Punct::Out)?;
        let arg = self.parse_expr()?;
        Ok(Node::Call(Call {
            target: Box::new(Node::Identifier(Identifier {
                name: "print".to_string(),
                loc: op.to_loc(),
            })),
            args: vec![arg],
            loc: self.loc_from(start),
        }))
    }

    fn parse_expression_statement(&mut self) -> PResult<Node> {
        let start = self.start_pos();
        let expr = self.parse_expr()?;
        if self.at_line_break() {
            return Ok(expr);
        }
        let op = match self.peek_token() {
            Some(Token::Punct(Punct::Eq)) => AssignOp::Assign,
            Some(Token::Punct(Punct::PlusEq)) => AssignOp::AddAssign,
            Some(Token::Punct(Punct::MinusEq)) => AssignOp::SubAssign,
            _ => return Ok(expr),
        };
        self.bump();
        let value = self.parse_expr()?;
        Ok(Node::Assign(Assign {
            op,
            dest: Box::new(expr),
            expr: Box::new(value),
            loc: self.loc_from(start),
        }))
    }

    fn parse_namespace(&mut self) -> PResult<Node> {
        let start = self.start_pos();
        self.expect_punct(Punct::ColonColon)?;
        let (name, _) = self.expect_name()?;
        self.expect_punct(Punct::LBrace)?;
        let members = self.parse_statements(StatementContext::Namespace)?;
        self.expect_punct(Punct::RBrace)?;
        Ok(Node::Ns(Namespace {
            name,
            members,
            loc: self.loc_from(start),
        }))
    }

    /// `### name value` / `### value`
    fn parse_meta(&mut self) -> PResult<Node> {
        let start = self.start_pos();
        self.expect_punct(Punct::Hash3)?;
        let name = match self.peek_token() {
            Some(Token::Word(w)) if !is_legacy_keyword(w) => {
                self.bump();
                Some(w.clone())
            }
            _ => None,
        };
        let value = self.parse_expr()?;
        Ok(Node::Meta(Meta {
            name,
            value: Box::new(value),
            loc: self.loc_from(start),
        }))
    }
}

#[cfg(test)]
mod tests {
    use avt_ast::{ForIteration, Loc, Node};

    use crate::parse::{parse_script, ParseError};

    fn parse_one(source: &str) -> Node {
        let mut nodes = parse_script(source).unwrap();
        assert_eq!(nodes.len(), 1, "expected one statement in {source:?}");
        nodes.remove(0)
    }

    #[test]
    fn definition_locations() {
        let Node::Def(def) = parse_one("let x: num = 1") else {
            panic!("expected def");
        };
        assert_eq!(def.name, "x");
        assert!(!def.mutable);
        assert!(def.var_type.is_some());
        assert_eq!(def.loc, Some(Loc::new(0, 13)));
        assert_eq!(def.expr.loc(), Some(Loc::new(13, 13)));
    }

    #[test]
    fn fn_definition_shares_location() {
        let Node::Def(def) = parse_one("@f(a, b) { a }") else {
            panic!("expected def");
        };
        assert_eq!(def.name, "f");
        let Node::Fn(function) = def.expr.as_ref() else {
            panic!("expected fn");
        };
        assert_eq!(function.params.len(), 2);
        assert_eq!(function.loc, def.loc);
        assert_eq!(def.loc, Some(Loc::new(0, 13)));
    }

    #[test]
    fn statements_need_separators() {
        assert_eq!(parse_script("a\nb").unwrap().len(), 2);
        assert_eq!(parse_script("a; b").unwrap().len(), 2);
        let err = parse_script("a b").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { pos: 2, .. }));
    }

    #[test]
    fn keywords_are_not_names() {
        for keyword in ["null", "each", "while", "namespace", "fn"] {
            assert!(
                parse_script(&format!("let {keyword} = 1")).is_err(),
                "{keyword} accepted as a name"
            );
        }
        assert!(parse_script("let case = 1").is_ok());
    }

    #[test]
    fn for_forms() {
        let Node::For(times) = parse_one("for 10 {}") else {
            panic!("expected for");
        };
        assert!(matches!(times.iteration, ForIteration::Times { .. }));

        let Node::For(range) = parse_one("for (let i = 1, 10) {}") else {
            panic!("expected for");
        };
        let ForIteration::Range { var, from, .. } = range.iteration else {
            panic!("expected range");
        };
        assert_eq!(var, "i");
        assert!(from.is_some());

        let Node::For(bare) = parse_one("for let i 10 <: i") else {
            panic!("expected for");
        };
        assert!(matches!(bare.iteration, ForIteration::Range { from: None, .. }));
    }

    #[test]
    fn each_with_and_without_parens() {
        assert!(matches!(parse_one("each let e, [1] {}"), Node::Each(_)));
        assert!(matches!(parse_one("each (let e [1]) <: e"), Node::Each(_)));
    }

    #[test]
    fn block_body_falls_back_to_object() {
        let Node::If(node) = parse_one("if true { a: 1 }") else {
            panic!("expected if");
        };
        assert!(matches!(node.then.as_ref(), Node::Obj(_)));

        let Node::If(node) = parse_one("if true { a }") else {
            panic!("expected if");
        };
        assert!(matches!(node.then.as_ref(), Node::Block(_)));
    }

    #[test]
    fn assignment_operators() {
        let Node::Assign(assign) = parse_one("x += 1") else {
            panic!("expected assign");
        };
        assert_eq!(assign.op.as_str(), "+=");
        assert_eq!(assign.loc, Some(Loc::new(0, 5)));
    }

    #[test]
    fn print_sugar_targets_the_operator() {
        let Node::Call(call) = parse_one("<: 1") else {
            panic!("expected call");
        };
        let Node::Identifier(target) = call.target.as_ref() else {
            panic!("expected identifier");
        };
        assert_eq!(target.name, "print");
        assert_eq!(target.loc, Some(Loc::new(0, 1)));
    }

    #[test]
    fn namespaces_hold_definitions_only() {
        let Node::Ns(ns) = parse_one(":: A {\n\tlet x = 1\n\t@f() {}\n\t:: B {}\n}") else {
            panic!("expected namespace");
        };
        assert_eq!(ns.members.len(), 3);
        assert!(parse_script(":: A { <: 1 }").is_err());
    }

    #[test]
    fn meta_with_and_without_name() {
        let Node::Meta(named) = parse_one("### info { a: 1 }") else {
            panic!("expected meta");
        };
        assert_eq!(named.name.as_deref(), Some("info"));
        let Node::Meta(unnamed) = parse_one("### [1, 2]") else {
            panic!("expected meta");
        };
        assert_eq!(unnamed.name, None);
    }

    #[test]
    fn loop_and_jumps() {
        let Node::Loop(node) = parse_one("loop {\n\tbreak\n\tcontinue\n}") else {
            panic!("expected loop");
        };
        assert!(matches!(node.statements[0], Node::Break(_)));
        assert!(matches!(node.statements[1], Node::Continue(_)));
    }
}
