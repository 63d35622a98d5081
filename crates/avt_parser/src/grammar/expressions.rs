use avt_ast::{
    Arr, BinaryOperation, Block, Bool, Call, ElseIf, Exists, Function, FnParam, Identifier, If,
    Index, Match, MatchArm, Node, Not, Null, Num, Obj, ObjEntry, Prop, Str, Tmpl, TmplElement,
};
use avt_lexer::{Punct, TemplatePart, Token, TokenAndSpan};

use super::{PResult, Parser};
use crate::keywords::is_legacy_keyword;

enum Infix {
    And,
    Or,
    /// Sugar for a call to the named `Core` function.
    Call(&'static str),
}

/// Binding power and meaning of an infix operator. Higher binds tighter.
fn infix_operator(punct: Punct) -> Option<(u8, Infix)> {
    Some(match punct {
        Punct::OrOr => (1, Infix::Or),
        Punct::AndAnd => (2, Infix::And),
        Punct::EqEq => (3, Infix::Call("Core:eq")),
        Punct::NotEq => (3, Infix::Call("Core:neq")),
        Punct::Lt => (3, Infix::Call("Core:lt")),
        Punct::LtEq => (3, Infix::Call("Core:lteq")),
        Punct::Gt => (3, Infix::Call("Core:gt")),
        Punct::GtEq => (3, Infix::Call("Core:gteq")),
        Punct::Plus => (4, Infix::Call("Core:add")),
        Punct::Minus => (4, Infix::Call("Core:sub")),
        Punct::Star => (5, Infix::Call("Core:mul")),
        Punct::Slash => (5, Infix::Call("Core:div")),
        Punct::Percent => (5, Infix::Call("Core:mod")),
        Punct::Caret => (6, Infix::Call("Core:pow")),
        _ => return None,
    })
}

impl<'t> Parser<'t> {
    pub fn parse_expr(&mut self) -> PResult<Node> {
        self.parse_infix(0)
    }

    /// An infix operator continuing the current expression. Operators on a
    /// new line start a new statement, and `* =>` is a default match arm.
    fn peek_infix(&self) -> Option<(u8, Infix)> {
        let tok = self.peek()?;
        if tok.had_line_break || self.nth_is_punct(1, Punct::Arrow) {
            return None;
        }
        let Token::Punct(punct) = &tok.token else {
            return None;
        };
        infix_operator(*punct)
    }

    fn parse_infix(&mut self, min_prec: u8) -> PResult<Node> {
        let start = self.start_pos();
        let mut left = self.parse_prefix()?;
        while let Some((prec, op)) = self.peek_infix() {
            if prec < min_prec {
                break;
            }
            let op_loc = self.bump().and_then(|t| t.span.to_loc());
            let right = self.parse_infix(prec + 1)?;
            let loc = self.loc_from(start);
            let operation = |left, right| BinaryOperation {
                left: Box::new(left),
                right: Box::new(right),
                loc,
            };
            left = match op {
                Infix::And => Node::And(operation(left, right)),
                Infix::Or => Node::Or(operation(left, right)),
                Infix::Call(name) => Node::Call(Call {
                    target: Box::new(Node::Identifier(Identifier {
                        name: name.to_string(),
                        loc: op_loc,
                    })),
                    args: vec![left, right],
                    loc,
                }),
            };
        }
        Ok(left)
    }

    fn parse_prefix(&mut self) -> PResult<Node> {
        if self.is_punct(Punct::Bang) {
            let start = self.start_pos();
            self.bump();
            let expr = self.parse_prefix()?;
            return Ok(Node::Not(Not {
                expr: Box::new(expr),
                loc: self.loc_from(start),
            }));
        }
        self.parse_chain()
    }

    /// Primary expression followed by calls, indexing and property access.
    /// The delimiter must touch the preceding token: `f (x)` is not a call.
    fn parse_chain(&mut self) -> PResult<Node> {
        let start = self.start_pos();
        let mut node = self.parse_primary()?;
        while self.next_is_adjacent() {
            if self.eat_punct(Punct::LParen) {
                let args = self.parse_items(Punct::RParen)?;
                node = Node::Call(Call {
                    target: Box::new(node),
                    args,
                    loc: self.loc_from(start),
                });
            } else if self.eat_punct(Punct::LBracket) {
                let index = self.parse_expr()?;
                self.expect_punct(Punct::RBracket)?;
                node = Node::Index(Index {
                    target: Box::new(node),
                    index: Box::new(index),
                    loc: self.loc_from(start),
                });
            } else if self.is_punct(Punct::Dot) {
                self.bump();
                if !self.next_is_adjacent() {
                    return Err(self.unexpected("a property name"));
                }
                let (name, _) = self.expect_name()?;
                node = Node::Prop(Prop {
                    target: Box::new(node),
                    name,
                    loc: self.loc_from(start),
                });
            } else {
                break;
            }
        }
        Ok(node)
    }

    /// Expressions separated by commas or whitespace, up to `close`.
    fn parse_items(&mut self, close: Punct) -> PResult<Vec<Node>> {
        let mut items = Vec::new();
        while !self.eat_punct(close) {
            items.push(self.parse_expr()?);
            self.eat_punct(Punct::Comma);
        }
        Ok(items)
    }

    fn parse_primary(&mut self) -> PResult<Node> {
        let Some(tok) = self.peek() else {
            return Err(self.unexpected("an expression"));
        };
        let start = tok.span.lo;
        match &tok.token {
            Token::Word(w) => match w.as_str() {
                "if" => self.parse_if(),
                "match" => self.parse_match(),
                "eval" => {
                    self.bump();
                    let statements = self.parse_braced_statements()?;
                    Ok(Node::Block(Block {
                        statements,
                        loc: self.loc_from(start),
                    }))
                }
                "exists" => {
                    self.bump();
                    let identifier = self.parse_identifier()?;
                    Ok(Node::Exists(Exists {
                        identifier,
                        loc: self.loc_from(start),
                    }))
                }
                "true" | "false" => {
                    self.bump();
                    Ok(Node::Bool(Bool {
                        value: w == "true",
                        loc: self.loc_from(start),
                    }))
                }
                "null" => {
                    self.bump();
                    Ok(Node::Null(Null {
                        loc: self.loc_from(start),
                    }))
                }
                _ if is_legacy_keyword(w) => Err(self.unexpected("an expression")),
                _ => Ok(Node::Identifier(self.parse_identifier()?)),
            },
            Token::Num(text) => {
                self.bump();
                let value = self.parse_number(text, start)?;
                Ok(Node::Num(Num {
                    value,
                    loc: self.loc_from(start),
                }))
            }
            Token::Punct(Punct::Minus) => match self.peek_nth(1) {
                Some(TokenAndSpan {
                    token: Token::Num(text),
                    span,
                    ..
                }) if span.lo == tok.span.hi => {
                    self.bump();
                    self.bump();
                    let value = -self.parse_number(text, start)?;
                    Ok(Node::Num(Num {
                        value,
                        loc: self.loc_from(start),
                    }))
                }
                _ => Err(self.unexpected("an expression")),
            },
            Token::Str { value, .. } => {
                self.bump();
                Ok(Node::Str(Str {
                    value: value.clone(),
                    loc: self.loc_from(start),
                }))
            }
            Token::Template(parts) => {
                self.bump();
                let tmpl = parse_template_parts(parts)?;
                Ok(Node::Tmpl(Tmpl {
                    tmpl,
                    loc: self.loc_from(start),
                }))
            }
            Token::Punct(Punct::At) => {
                self.bump();
                Ok(Node::Fn(self.parse_fn_rest(start)?))
            }
            Token::Punct(Punct::LBrace) => self.parse_obj(),
            Token::Punct(Punct::LBracket) => {
                self.bump();
                let value = self.parse_items(Punct::RBracket)?;
                Ok(Node::Arr(Arr {
                    value,
                    loc: self.loc_from(start),
                }))
            }
            Token::Punct(Punct::LParen) => {
                self.bump();
                let inner = self.parse_expr()?;
                self.expect_punct(Punct::RParen)?;
                Ok(inner)
            }
            _ => Err(self.unexpected("an expression")),
        }
    }

    fn parse_number(&self, text: &str, pos: usize) -> PResult<f64> {
        text.parse().map_err(|_| crate::parse::ParseError::Syntax {
            message: format!("invalid number `{text}`"),
            pos,
        })
    }

    /// A name, possibly namespaced as `A:B:c` with no spaces around colons.
    pub(crate) fn parse_identifier(&mut self) -> PResult<Identifier> {
        let (mut name, span) = self.expect_name()?;
        while self.is_punct(Punct::Colon) && self.next_is_adjacent() {
            let (Some(colon), Some(segment)) = (self.peek(), self.peek_nth(1)) else {
                break;
            };
            let Token::Word(word) = &segment.token else {
                break;
            };
            if segment.span.lo != colon.span.hi {
                break;
            }
            self.bump();
            self.bump();
            name.push(':');
            name.push_str(word);
        }
        Ok(Identifier {
            name,
            loc: self.loc_from(span.lo),
        })
    }

    fn parse_if(&mut self) -> PResult<Node> {
        let start = self.start_pos();
        self.expect_word("if")?;
        let cond = self.parse_expr()?;
        let then = self.parse_block_or_statement()?;
        let mut elseif = Vec::new();
        while self.is_word("elif") {
            self.bump();
            let cond = self.parse_expr()?;
            let then = self.parse_block_or_statement()?;
            elseif.push(ElseIf { cond, then });
        }
        let else_ = if self.is_word("else") {
            self.bump();
            Some(Box::new(self.parse_block_or_statement()?))
        } else {
            None
        };
        Ok(Node::If(If {
            cond: Box::new(cond),
            then: Box::new(then),
            elseif,
            else_,
            loc: self.loc_from(start),
        }))
    }

    fn parse_match(&mut self) -> PResult<Node> {
        let start = self.start_pos();
        self.expect_word("match")?;
        let about = self.parse_expr()?;
        self.expect_punct(Punct::LBrace)?;
        let mut qs = Vec::new();
        let mut default = None;
        loop {
            while self.eat_punct(Punct::Comma) || self.eat_punct(Punct::Semicolon) {}
            if self.eat_punct(Punct::RBrace) {
                break;
            }
            if self.is_punct(Punct::Star) && self.nth_is_punct(1, Punct::Arrow) {
                self.bump();
                self.bump();
                default = Some(Box::new(self.parse_block_or_statement()?));
                continue;
            }
            let q = self.parse_expr()?;
            self.expect_punct(Punct::Arrow)?;
            let a = self.parse_block_or_statement()?;
            qs.push(MatchArm { q, a });
        }
        Ok(Node::Match(Match {
            about: Box::new(about),
            qs,
            default,
            loc: self.loc_from(start),
        }))
    }

    fn parse_obj(&mut self) -> PResult<Node> {
        let start = self.start_pos();
        self.expect_punct(Punct::LBrace)?;
        let mut entries = Vec::new();
        while !self.eat_punct(Punct::RBrace) {
            let (key, _) = self.expect_name()?;
            self.expect_punct(Punct::Colon)?;
            let value = self.parse_expr()?;
            entries.push(ObjEntry { key, value });
            if !self.eat_punct(Punct::Comma) {
                self.eat_punct(Punct::Semicolon);
            }
        }
        Ok(Node::Obj(Obj {
            entries,
            loc: self.loc_from(start),
        }))
    }

    /// Parameter list, optional return type and body of a function whose
    /// `@` (and name, for definitions) has been consumed.
    pub(crate) fn parse_fn_rest(&mut self, start: usize) -> PResult<Function> {
        self.expect_punct(Punct::LParen)?;
        let mut params = Vec::new();
        while !self.eat_punct(Punct::RParen) {
            let (name, _) = self.expect_name()?;
            let arg_type = if self.eat_punct(Punct::Colon) {
                Some(self.parse_type()?)
            } else {
                None
            };
            params.push(FnParam { name, arg_type });
            self.eat_punct(Punct::Comma);
        }
        let ret_type = if self.eat_punct(Punct::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let children = self.parse_braced_statements()?;
        Ok(Function {
            params,
            ret_type,
            children,
            loc: self.loc_from(start),
        })
    }
}

fn parse_template_parts(parts: &[TemplatePart]) -> PResult<Vec<TmplElement>> {
    let mut tmpl = Vec::with_capacity(parts.len());
    for part in parts {
        match part {
            TemplatePart::Text { value, .. } => tmpl.push(TmplElement::Str(value.clone())),
            TemplatePart::Embed { tokens, span } => {
                let mut parser = Parser::new(tokens, span.lo, span.hi);
                let expr = parser.parse_expr()?;
                parser.expect_end()?;
                tmpl.push(TmplElement::Expr(expr));
            }
        }
    }
    Ok(tmpl)
}

#[cfg(test)]
mod tests {
    use avt_ast::{Loc, Node, TmplElement};

    use crate::parse::parse_script;

    fn expr(source: &str) -> Node {
        let mut nodes = parse_script(source).unwrap();
        assert_eq!(nodes.len(), 1, "expected one statement in {source:?}");
        nodes.remove(0)
    }

    fn call_name(node: &Node) -> &str {
        let Node::Call(call) = node else {
            panic!("expected call, got {node:?}");
        };
        let Node::Identifier(target) = call.target.as_ref() else {
            panic!("expected identifier target");
        };
        &target.name
    }

    #[test]
    fn infix_sugar_becomes_core_calls() {
        let node = expr("1 + 2 * 3");
        assert_eq!(call_name(&node), "Core:add");
        let Node::Call(add) = &node else { unreachable!() };
        assert_eq!(call_name(&add.args[1]), "Core:mul");
        assert_eq!(add.loc, Some(Loc::new(0, 8)));
        assert_eq!(add.target.loc(), Some(Loc::new(2, 2)));
    }

    #[test]
    fn infix_is_left_associative() {
        let node = expr("1 - 2 - 3");
        let Node::Call(outer) = &node else {
            panic!("expected call");
        };
        assert_eq!(call_name(&outer.args[0]), "Core:sub");
        assert_eq!(outer.args[1].loc(), Some(Loc::new(8, 8)));
    }

    #[test]
    fn logical_operators_are_nodes() {
        assert!(matches!(expr("a && b || c"), Node::Or(_)));
        assert!(matches!(expr("!a && b"), Node::And(_)));
    }

    #[test]
    fn parenthesized_operand_loc_excludes_parens() {
        let node = expr("(1 + 2) * 3");
        let Node::Call(mul) = &node else {
            panic!("expected call");
        };
        assert_eq!(mul.loc, Some(Loc::new(0, 10)));
        assert_eq!(mul.args[0].loc(), Some(Loc::new(1, 5)));
    }

    #[test]
    fn chains_require_adjacency() {
        let Node::Call(call) = expr("f(1 2 3)") else {
            panic!("expected call");
        };
        assert_eq!(call.args.len(), 3);
        assert!(matches!(expr("a.b[0](1)"), Node::Call(_)));
        assert!(parse_script("f (1)").is_err());
    }

    #[test]
    fn namespaced_identifier() {
        let Node::Call(call) = expr("Core:abort('x')") else {
            panic!("expected call");
        };
        let Node::Identifier(target) = call.target.as_ref() else {
            panic!("expected identifier");
        };
        assert_eq!(target.name, "Core:abort");
        assert_eq!(target.loc, Some(Loc::new(0, 9)));
    }

    #[test]
    fn object_keys_do_not_merge_with_values() {
        let Node::Obj(obj) = expr("{a:b c:1}") else {
            panic!("expected obj");
        };
        assert_eq!(obj.entries.len(), 2);
        assert_eq!(obj.entries[0].key, "a");
    }

    #[test]
    fn negative_numbers() {
        let Node::Num(num) = expr("-1.5") else {
            panic!("expected num");
        };
        assert_eq!(num.value, -1.5);
        assert_eq!(num.loc, Some(Loc::new(0, 3)));
    }

    #[test]
    fn template_expressions_have_absolute_locations() {
        let Node::Tmpl(tmpl) = expr("`a{ x }b`") else {
            panic!("expected tmpl");
        };
        assert_eq!(tmpl.tmpl.len(), 3);
        let TmplElement::Expr(inner) = &tmpl.tmpl[1] else {
            panic!("expected expr element");
        };
        assert_eq!(inner.loc(), Some(Loc::new(4, 4)));
    }

    #[test]
    fn match_arms_and_default() {
        let Node::Match(node) = expr("match 0 { 1 => 2 * => 3 }") else {
            panic!("expected match");
        };
        assert_eq!(node.qs.len(), 1);
        assert!(node.default.is_some());

        let Node::Match(node) = expr("match x {\n\t1 => 2\n\t3 => { a: 1 }\n}") else {
            panic!("expected match");
        };
        assert_eq!(node.qs.len(), 2);
        assert!(matches!(node.qs[1].a, Node::Obj(_)));
    }

    #[test]
    fn if_with_elif_and_else() {
        let Node::If(node) = expr("if a 1\nelif b 2\nelse 3") else {
            panic!("expected if");
        };
        assert_eq!(node.elseif.len(), 1);
        assert!(node.else_.is_some());
    }

    #[test]
    fn operator_on_next_line_starts_a_statement() {
        assert_eq!(parse_script("a\n!b").unwrap().len(), 2);
        assert!(parse_script("a\n+ b").is_err());
    }

    #[test]
    fn exists_and_eval() {
        assert!(matches!(expr("exists A:b"), Node::Exists(_)));
        assert!(matches!(expr("eval { 1 }"), Node::Block(_)));
    }

    #[test]
    fn function_literal_params() {
        let Node::Fn(function) = expr("@(a: num b) : str { a }") else {
            panic!("expected fn");
        };
        assert_eq!(function.params.len(), 2);
        assert!(function.params[0].arg_type.is_some());
        assert!(function.ret_type.is_some());
    }
}
