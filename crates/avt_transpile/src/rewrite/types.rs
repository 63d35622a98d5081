//! Type annotations. These are rewritten into the enclosing node's builder
//! rather than through the dispatcher.

use avt_ast::{FnTypeSource, NamedTypeSource, TypeSource};

use crate::builder::ReplacementBuilder;
use crate::error::Result;
use crate::script::Separator;

/// Add the edits for `ty` and return the end of the annotation.
pub(super) fn rewrite_type(builder: &mut ReplacementBuilder<'_, '_>, ty: &TypeSource) -> Result<usize> {
    match ty {
        TypeSource::NamedTypeSource(named) => rewrite_named_type(builder, ty, named),
        TypeSource::FnTypeSource(function) => rewrite_fn_type(builder, ty, function),
    }
}

/// `name` or `name<inner>`
fn rewrite_named_type(
    builder: &mut ReplacementBuilder<'_, '_>,
    ty: &TypeSource,
    named: &NamedTypeSource,
) -> Result<usize> {
    let cx = builder.transpiler();
    let span = cx.type_location(ty)?;
    let Some(inner) = &named.inner else {
        return Ok(span.hi);
    };
    let script = cx.script();
    let name_end = span.lo + named.name.len();
    let lt = script.expect(name_end, "<")?;
    builder.neutralize(name_end, lt)?;
    let inner_start = cx.type_location(inner)?.lo;
    builder.neutralize(lt + 1, inner_start)?;
    let inner_end = rewrite_type(builder, inner)?;
    let gt = script.expect(inner_end, ">")?;
    builder.neutralize(inner_end, gt)?;
    Ok(span.hi)
}

/// `@(args) => result`
fn rewrite_fn_type(
    builder: &mut ReplacementBuilder<'_, '_>,
    ty: &TypeSource,
    function: &FnTypeSource,
) -> Result<usize> {
    let cx = builder.transpiler();
    let script = cx.script();
    let span = cx.type_location(ty)?;
    let lparen = script.expect(span.lo + 1, "(")?;
    builder.neutralize(span.lo + 1, lparen)?;

    let mut prev_end = lparen + 1;
    for (i, arg) in function.args.iter().enumerate() {
        let arg_start = cx.type_location(arg)?.lo;
        if i > 0 && script.next_item(prev_end).separator != Separator::Comma {
            builder.add_insertion(prev_end, ",")?;
        }
        builder.neutralize(prev_end, arg_start)?;
        prev_end = rewrite_type(builder, arg)?;
    }
    let rparen = script.expect(prev_end, ")")?;
    builder.neutralize(prev_end, rparen)?;

    let arrow = script.expect(rparen + 1, "=>")?;
    builder.neutralize(rparen + 1, arrow)?;
    let result_start = cx.type_location(&function.result)?.lo;
    builder.neutralize(arrow + 2, result_start)?;
    rewrite_type(builder, &function.result)?;
    Ok(span.hi)
}
