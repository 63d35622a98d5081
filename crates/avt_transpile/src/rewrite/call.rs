//! Calls, both written `f(args)` and produced by operator sugar.

use avt_ast::{Call, Node, NodeKind, Span};

use super::Transpiler;
use crate::ancestors::Ancestors;
use crate::builder::ReplacementBuilder;
use crate::error::{Result, TranspileError};
use crate::location::own_span;
use crate::script::Separator;

pub(super) fn rewrite_call(cx: &Transpiler<'_>, node: &Call, ancestors: Ancestors<'_>) -> Result<String> {
    let mut builder = ReplacementBuilder::new(cx, cx.call_location(node)?);
    match call_parens(cx, node)? {
        Some(args) => rewrite_call_notation(&mut builder, node, args, ancestors)?,
        None => rewrite_operator_sugar(&mut builder, node, ancestors)?,
    }
    builder.execute()
}

/// The span inside the argument parentheses, if the call is written
/// `target(args)`. Infix operators and `<:` produce calls whose target is
/// not written by name.
fn call_parens(cx: &Transpiler<'_>, node: &Call) -> Result<Option<Span>> {
    let script = cx.script();
    let own = own_span(node.loc, NodeKind::Call)?;
    let target = cx.actual_location(&node.target, true)?;
    if own.lo != target.lo || script.byte(target.hi) != Some(b'(') {
        return Ok(None);
    }
    if let Node::Identifier(identifier) = node.target.as_ref() {
        let bare = own_span(identifier.loc, NodeKind::Identifier)?;
        if script.slice(bare.lo, bare.hi)? != identifier.name {
            return Ok(None);
        }
    }
    if own.hi == 0 || script.byte(own.hi - 1) != Some(b')') {
        return Err(TranspileError::expected("`)`", own.hi));
    }
    Ok(Some(Span::new(target.hi + 1, own.hi - 1)))
}

fn rewrite_call_notation(
    builder: &mut ReplacementBuilder<'_, '_>,
    node: &Call,
    args: Span,
    ancestors: Ancestors<'_>,
) -> Result<()> {
    let cx = builder.transpiler();
    let script = cx.script();
    builder.add_node(&node.target, ancestors)?;
    for arg in &node.args {
        builder.add_node_within(arg, ancestors, Some(args))?;
        let end = cx.actual_location_within(arg, Some(args))?.hi;
        let next = script.next_item(end);
        if next.separator == Separator::None && script.byte(next.start) != Some(b')') {
            builder.add_insertion(end, ",")?;
        }
    }
    Ok(())
}

fn rewrite_operator_sugar(
    builder: &mut ReplacementBuilder<'_, '_>,
    node: &Call,
    ancestors: Ancestors<'_>,
) -> Result<()> {
    let cx = builder.transpiler();
    let operator = own_span(node.target.loc(), node.target.kind())?;
    for arg in &node.args {
        let span = cx.actual_location(arg, true)?;
        if span.hi <= operator.lo {
            builder.neutralize(span.hi, operator.lo)?;
        } else if span.lo >= operator.hi {
            builder.neutralize(operator.hi, span.lo)?;
        }
        builder.add_node(arg, ancestors)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{transpile, TranspilerConfig};

    fn run(source: &str) -> String {
        transpile(source, &TranspilerConfig::default()).unwrap()
    }

    #[test]
    fn space_separated_arguments_get_commas() {
        assert_eq!(run("f(1 2 3)"), "f(1, 2, 3)");
        assert_eq!(run("f(1, 2 3)"), "f(1, 2, 3)");
    }

    #[test]
    fn line_separated_arguments_are_kept() {
        assert_eq!(run("f(\n\t1\n\t2\n)"), "f(\n\t1\n\t2\n)");
    }

    #[test]
    fn canonical_calls_are_unchanged() {
        for source in ["f()", "f(1)", "f(1, 2)", "Core:add(1, 2)", "f(g(1))"] {
            assert_eq!(run(source), source);
        }
    }

    #[test]
    fn parenthesized_arguments() {
        assert_eq!(run("f((0))"), "f((0))");
        assert_eq!(run("f((\n\t0\n))"), "f(( 0 ))");
        assert_eq!(run("f((1) (2))"), "f((1), (2))");
    }

    #[test]
    fn operator_sugar_keeps_its_operands() {
        assert_eq!(run("1 + 2"), "1 + 2");
        assert_eq!(run("(1)+(2)"), "(1)+(2)");
        assert_eq!(run("<: case"), "<: case_");
        assert_eq!(run("a + f(1 2)"), "a + f(1, 2)");
    }

    #[test]
    fn line_break_after_operator_is_joined() {
        assert_eq!(run("1 +\n\t2"), "1 + 2");
        assert_eq!(run("<:\n\t1"), "<: 1");
    }

    #[test]
    fn called_target_is_rewritten() {
        assert_eq!(run("default(1)"), "default_(1)");
        assert_eq!(run("o.f(1 2)"), "o.f(1, 2)");
    }
}
