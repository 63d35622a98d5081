//! Per-kind rewriting rules and the dispatcher that routes nodes to them.
//!
//! Every rule receives the node, the chain of enclosing nodes, and the
//! [`Transpiler`] holding the script. It returns the new text for the
//! node's own extent; parentheses around the node belong to the caller.

mod access;
mod assign;
mod call;
mod control;
mod definition;
mod function;
mod iteration;
mod jump;
mod literal;
mod matching;
mod names;
mod namespace;
mod object;
mod operator;
mod types;

use avt_ast::{Node, Span};
use tracing::trace;

use crate::ancestors::Ancestors;
use crate::builder::ReplacementBuilder;
use crate::error::Result;
use crate::script::Script;

/// Rewriting context for one script.
pub struct Transpiler<'s> {
    script: Script<'s>,
}

impl<'s> Transpiler<'s> {
    pub fn new(text: &'s str) -> Result<Self> {
        Ok(Self {
            script: Script::new(text)?,
        })
    }

    pub fn script(&self) -> &Script<'s> {
        &self.script
    }

    /// New text for the node's own extent.
    pub fn rewrite(&self, node: &Node, ancestors: Ancestors<'_>) -> Result<String> {
        let frame = ancestors.push(node.kind());
        let ancestors = Ancestors::within(&frame);
        trace!(kind = %node.kind(), loc = ?node.loc(), "rewriting node");

        match node {
            Node::Ns(ns) => namespace::rewrite_namespace(self, ns, ancestors),
            Node::Meta(meta) => namespace::rewrite_meta(self, meta, ancestors),
            Node::Def(def) => definition::rewrite_definition(self, def, ancestors),
            Node::Return(ret) => jump::rewrite_return(self, ret, ancestors),
            Node::Each(each) => iteration::rewrite_each(self, each, ancestors),
            Node::For(for_) => iteration::rewrite_for(self, for_, ancestors),
            Node::Loop(loop_) => iteration::rewrite_loop(self, loop_, ancestors),
            Node::Break(_) => Ok(jump::rewrite_jump("break", ancestors)),
            Node::Continue(_) => Ok(jump::rewrite_jump("continue", ancestors)),
            Node::Assign(assign) => assign::rewrite_assign(self, assign, ancestors),
            Node::If(if_) => control::rewrite_if(self, if_, ancestors),
            Node::Fn(function) => function::rewrite_fn(self, function, None, ancestors),
            Node::Match(match_) => matching::rewrite_match(self, match_, ancestors),
            Node::Block(block) => control::rewrite_block(self, block, ancestors),
            Node::Exists(exists) => names::rewrite_exists(self, exists, ancestors),
            Node::Tmpl(tmpl) => literal::rewrite_tmpl(self, tmpl, ancestors),
            Node::Str(str_) => literal::rewrite_str(self, str_),
            Node::Num(_) | Node::Bool(_) | Node::Null(_) => literal::verbatim(self, node),
            Node::Obj(obj) => object::rewrite_obj(self, obj, ancestors),
            Node::Arr(arr) => literal::rewrite_arr(self, arr, ancestors),
            Node::Not(not) => operator::rewrite_not(self, not, ancestors),
            Node::And(op) => operator::rewrite_binary(self, op, "&&", ancestors),
            Node::Or(op) => operator::rewrite_binary(self, op, "||", ancestors),
            Node::Identifier(identifier) => Ok(names::rewrite_identifier(identifier)),
            Node::Call(call) => call::rewrite_call(self, call, ancestors),
            Node::Index(index) => access::rewrite_index(self, index, ancestors),
            Node::Prop(prop) => access::rewrite_prop(self, prop, ancestors),
        }
    }

    /// New text for the node together with the parentheses around it (those
    /// inside `limit` only). Line breaks between each parenthesis and what it
    /// encloses are joined.
    pub fn rewrite_in_parens(
        &self,
        node: &Node,
        ancestors: Ancestors<'_>,
        limit: Option<Span>,
    ) -> Result<String> {
        let inner = self.actual_location(node, false)?;
        let pairs = self.paren_pairs(inner, limit);
        let Some(&outer) = pairs.last() else {
            return self.rewrite(node, ancestors);
        };

        let mut builder = ReplacementBuilder::new(self, outer);
        let mut current = inner;
        for pair in pairs {
            builder.neutralize(pair.lo + 1, current.lo)?;
            builder.neutralize(current.hi, pair.hi - 1)?;
            current = pair;
        }
        builder.add_bare_node(node, ancestors)?;
        builder.execute()
    }
}

#[cfg(test)]
mod tests {
    use avt_parser::parse_script;
    use pretty_assertions::assert_eq;

    use super::*;

    fn rewrite_first(source: &str) -> String {
        let nodes = parse_script(source).unwrap();
        let cx = Transpiler::new(source).unwrap();
        cx.rewrite_in_parens(&nodes[0], Ancestors::root(), None).unwrap()
    }

    #[test]
    fn no_parentheses() {
        assert_eq!(rewrite_first("0"), "0");
    }

    #[test]
    fn parentheses_are_kept() {
        assert_eq!(rewrite_first("(0)"), "(0)");
        assert_eq!(rewrite_first("((0))"), "((0))");
    }

    #[test]
    fn line_breaks_inside_parentheses_are_joined() {
        assert_eq!(rewrite_first("(\n\t0\n)"), "( 0 )");
        assert_eq!(rewrite_first("(\n\t(\n\t\t0\n\t)\n)"), "( ( 0 ) )");
    }

    fn rewrite_call_arg(source: &str) -> String {
        let nodes = parse_script(source).unwrap();
        let Node::Call(call) = &nodes[0] else {
            panic!("expected call");
        };
        let loc = call.loc.unwrap();
        let cx = Transpiler::new(source).unwrap();
        let limit = Span::new(loc.start + 2, loc.end);
        cx.rewrite_in_parens(&call.args[0], Ancestors::root(), Some(limit))
            .unwrap()
    }

    #[test]
    fn call_parentheses_are_not_taken_by_the_argument() {
        assert_eq!(rewrite_call_arg("f(0)"), "0");
        assert_eq!(rewrite_call_arg("f((0))"), "(0)");
        assert_eq!(rewrite_call_arg("f((\n\t0\n))"), "( 0 )");
        assert_eq!(rewrite_call_arg("f(\n\t0\n)"), "0");
    }
}
