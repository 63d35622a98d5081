//! Function literals and named function definitions.

use avt_ast::{FnParam, Function, NodeKind};

use super::{types, Transpiler};
use crate::ancestors::Ancestors;
use crate::builder::ReplacementBuilder;
use crate::error::{Result, TranspileError};
use crate::keywords::replace_name;
use crate::script::Separator;

/// `@(params): type { children }`, or `@name(...)` when `name` is given.
///
/// `ancestors` must already include the function itself.
pub(super) fn rewrite_fn(
    cx: &Transpiler<'_>,
    node: &Function,
    name: Option<&str>,
    ancestors: Ancestors<'_>,
) -> Result<String> {
    let script = cx.script();
    let mut builder = ReplacementBuilder::over(cx, node.loc, NodeKind::Fn)?;
    let mut prev_end = builder.window().lo + "@".len();

    if let Some(name) = name {
        let name_start = script.expect_name(prev_end, name)?;
        prev_end = name_start + name.len();
        builder.replace_with(name_start, prev_end, replace_name(name))?;
    }

    let lparen = script.expect(prev_end, "(")?;
    builder.neutralize(prev_end, lparen)?;
    let rparen = rewrite_params(&mut builder, &node.params, lparen + 1)?;

    prev_end = rparen + 1;
    if let Some(ty) = &node.ret_type {
        let colon = script.expect(prev_end, ":")?;
        builder.neutralize(prev_end, colon)?;
        builder.neutralize(colon + 1, cx.type_location(ty)?.lo)?;
        prev_end = types::rewrite_type(&mut builder, ty)?;
    }

    let brace = script.expect(prev_end, "{")?;
    builder.neutralize(prev_end, brace)?;
    builder.add_nodes(&node.children, ancestors)?;
    builder.execute()
}

/// Parameters have no locations of their own, so they are found by reading
/// the text after `(`. Returns the position of `)`.
fn rewrite_params(builder: &mut ReplacementBuilder<'_, '_>, params: &[FnParam], start: usize) -> Result<usize> {
    let cx = builder.transpiler();
    let script = cx.script();
    let mut next = script.next_item(start);
    let mut prev_end = start;

    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            match next.separator {
                Separator::Comma => {
                    let comma = script.index_of(",", prev_end)?;
                    builder.neutralize(prev_end, comma)?;
                }
                Separator::LineBreak => {}
                Separator::Semicolon | Separator::None => builder.add_insertion(prev_end, ",")?,
            }
        }

        let name_start = next.start;
        let name_end = script.name_end(name_start);
        if script.slice(name_start, name_end)? != param.name {
            return Err(TranspileError::expected(format!("parameter `{}`", param.name), name_start));
        }
        builder.replace_with(name_start, name_end, replace_name(&param.name))?;
        prev_end = name_end;

        if let Some(ty) = &param.arg_type {
            let colon = script.expect(name_end, ":")?;
            builder.neutralize(name_end, colon)?;
            builder.neutralize(colon + 1, cx.type_location(ty)?.lo)?;
            prev_end = types::rewrite_type(builder, ty)?;
        }
        next = script.next_item(prev_end);
    }

    if script.byte(next.start) != Some(b')') {
        return Err(TranspileError::expected("`)`", next.start));
    }
    Ok(next.start)
}
