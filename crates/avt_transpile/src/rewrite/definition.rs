use avt_ast::{Definition, Node, NodeKind};

use super::{function, types, Transpiler};
use crate::ancestors::Ancestors;
use crate::builder::ReplacementBuilder;
use crate::error::{Result, TranspileError};
use crate::keywords::replace_name;

/// `let name: type = expr`, `var name = expr`, or `@name(params) { }`.
pub(super) fn rewrite_definition(
    cx: &Transpiler<'_>,
    node: &Definition,
    ancestors: Ancestors<'_>,
) -> Result<String> {
    let mut builder = ReplacementBuilder::over(cx, node.loc, NodeKind::Def)?;
    let script = cx.script();
    let start = builder.window().lo;

    if script.byte(start) == Some(b'@') {
        let Node::Fn(function) = node.expr.as_ref() else {
            return Err(TranspileError::UnexpectedNode {
                expected: NodeKind::Fn,
                found: node.expr.kind(),
            });
        };
        let frame = ancestors.push(NodeKind::Fn);
        return function::rewrite_fn(cx, function, Some(&node.name), Ancestors::within(&frame));
    }

    let keyword_end = start + if node.mutable { "var" } else { "let" }.len();
    let name_start = script.expect_name(keyword_end, &node.name)?;
    let name_end = name_start + node.name.len();
    builder.neutralize(keyword_end, name_start)?;
    builder.replace_with(name_start, name_end, replace_name(&node.name))?;

    let mut prev_end = name_end;
    if let Some(ty) = &node.var_type {
        let colon = script.expect(name_end, ":")?;
        builder.neutralize(name_end, colon)?;
        builder.neutralize(colon + 1, cx.type_location(ty)?.lo)?;
        prev_end = types::rewrite_type(&mut builder, ty)?;
    }

    let eq = script.expect(prev_end, "=")?;
    builder.neutralize(prev_end, eq)?;
    builder.neutralize(eq + 1, cx.actual_location(&node.expr, true)?.lo)?;
    builder.add_node(&node.expr, ancestors)?;
    builder.execute()
}
