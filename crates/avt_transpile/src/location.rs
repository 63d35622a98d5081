//! Resolving the source extent of a node.
//!
//! Parser locations are inclusive and sometimes narrower than what a node
//! really covers, so composite nodes are measured from their children.
//! Everything here returns half-open [`Span`]s.

use avt_ast::{BinaryOperation, Call, Loc, Node, NodeKind, Span, TypeSource};

use crate::error::{Result, TranspileError};
use crate::rewrite::Transpiler;

impl<'s> Transpiler<'s> {
    /// The extent of `node`, widened over redundant parentheses when
    /// `include_parens` is set.
    pub fn actual_location(&self, node: &Node, include_parens: bool) -> Result<Span> {
        if include_parens {
            return self.actual_location_within(node, None);
        }
        match node {
            Node::And(op) | Node::Or(op) => self.binary_location(op),
            Node::Call(call) => self.call_location(call),
            Node::Index(index) => self.chain_location(&index.target, index.loc, NodeKind::Index),
            Node::Prop(prop) => self.chain_location(&prop.target, prop.loc, NodeKind::Prop),
            _ => own_span(node.loc(), node.kind()),
        }
    }

    /// From the left operand through the right one.
    pub fn binary_location(&self, op: &BinaryOperation) -> Result<Span> {
        Ok(Span::new(
            self.actual_location(&op.left, true)?.lo,
            self.actual_location(&op.right, true)?.hi,
        ))
    }

    /// Covers the target and every argument. For operator sugar the target
    /// sits between the arguments.
    pub fn call_location(&self, call: &Call) -> Result<Span> {
        let own = own_span(call.loc, NodeKind::Call)?;
        let target = self.actual_location(&call.target, true)?;
        let lo = match call.args.first() {
            Some(first) => self.actual_location(first, true)?.lo.min(target.lo),
            None => target.lo,
        };
        let hi = match call.args.last() {
            Some(last) => self.actual_location(last, true)?.hi.max(own.hi),
            None => own.hi,
        };
        Ok(Span::new(lo, hi))
    }

    /// Index and property access: from the target through the node's end.
    pub fn chain_location(&self, target: &Node, loc: Option<Loc>, kind: NodeKind) -> Result<Span> {
        let own = own_span(loc, kind)?;
        Ok(Span::new(self.actual_location(target, true)?.lo, own.hi))
    }

    /// Like `actual_location(node, true)`, but parentheses are only taken
    /// from inside `limit`.
    pub fn actual_location_within(&self, node: &Node, limit: Option<Span>) -> Result<Span> {
        let inner = self.actual_location(node, false)?;
        Ok(self.paren_pairs(inner, limit).last().copied().unwrap_or(inner))
    }

    /// Parenthesis pairs around `inner`, innermost first.
    pub(crate) fn paren_pairs(&self, inner: Span, limit: Option<Span>) -> Vec<Span> {
        let limit = limit.unwrap_or(Span::new(0, self.script().len()));
        let mut pairs = Vec::new();
        let mut current = inner;
        while let Some(pair) = self.enclosing_parens(current, limit) {
            pairs.push(pair);
            current = pair;
        }
        pairs
    }

    fn enclosing_parens(&self, inner: Span, limit: Span) -> Option<Span> {
        let script = self.script();
        let left = script.find_last_non_whitespace(inner.lo, limit.lo)?;
        let right = script.find_non_whitespace_within(inner.hi, limit.hi)?;
        (script.byte(left) == Some(b'(') && script.byte(right) == Some(b')'))
            .then(|| Span::new(left, right + 1))
    }

    pub fn type_location(&self, ty: &TypeSource) -> Result<Span> {
        own_span(ty.loc(), ty.kind())
    }
}

/// The parser's inclusive location as a half-open span.
pub(crate) fn own_span(loc: Option<Loc>, kind: NodeKind) -> Result<Span> {
    let loc = loc.ok_or(TranspileError::MissingLocation { kind })?;
    Ok(Span::new(loc.start, loc.end_exclusive()))
}
