use avt_ast::{Assign, NodeKind};

use super::Transpiler;
use crate::ancestors::Ancestors;
use crate::builder::ReplacementBuilder;
use crate::error::Result;

/// `dest = expr`, `dest += expr`, `dest -= expr`
pub(super) fn rewrite_assign(cx: &Transpiler<'_>, node: &Assign, ancestors: Ancestors<'_>) -> Result<String> {
    let mut builder = ReplacementBuilder::over(cx, node.loc, NodeKind::Assign)?;
    let operator = node.op.as_str();
    let dest = cx.actual_location(&node.dest, true)?;
    let expr = cx.actual_location(&node.expr, true)?;
    let op = cx.script().expect(dest.hi, operator)?;

    builder.add_node(&node.dest, ancestors)?;
    builder.neutralize(dest.hi, op)?;
    builder.neutralize(op + operator.len(), expr.lo)?;
    builder.add_node(&node.expr, ancestors)?;
    builder.execute()
}
