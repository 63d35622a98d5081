use avt_ast::{BinaryOperation, NodeKind, Not};

use super::Transpiler;
use crate::ancestors::Ancestors;
use crate::builder::ReplacementBuilder;
use crate::error::Result;

/// `!expr`
pub(super) fn rewrite_not(cx: &Transpiler<'_>, node: &Not, ancestors: Ancestors<'_>) -> Result<String> {
    let mut builder = ReplacementBuilder::over(cx, node.loc, NodeKind::Not)?;
    let expr = cx.actual_location(&node.expr, true)?;
    builder.neutralize(builder.window().lo + 1, expr.lo)?;
    builder.add_node(&node.expr, ancestors)?;
    builder.execute()
}

/// `left && right` and `left || right`
pub(super) fn rewrite_binary(
    cx: &Transpiler<'_>,
    node: &BinaryOperation,
    operator: &str,
    ancestors: Ancestors<'_>,
) -> Result<String> {
    let mut builder = ReplacementBuilder::new(cx, cx.binary_location(node)?);
    let left = cx.actual_location(&node.left, true)?;
    let right = cx.actual_location(&node.right, true)?;
    let op = cx.script().expect(left.hi, operator)?;

    builder.add_node(&node.left, ancestors)?;
    builder.neutralize(left.hi, op)?;
    builder.neutralize(op + operator.len(), right.lo)?;
    builder.add_node(&node.right, ancestors)?;
    builder.execute()
}
