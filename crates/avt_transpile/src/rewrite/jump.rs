use avt_ast::{NodeKind, Return};

use super::Transpiler;
use crate::ancestors::Ancestors;
use crate::builder::ReplacementBuilder;
use crate::error::Result;

/// What a jump without a target turns into.
const ABORT: &str = "Core:abort(\"\")";

/// `break` / `continue`. Outside a loop the legacy runtime stopped the
/// script, which the new grammar can only express as an abort.
pub(super) fn rewrite_jump(keyword: &str, ancestors: Ancestors<'_>) -> String {
    if ancestors.in_breakable() {
        keyword.to_string()
    } else {
        ABORT.to_string()
    }
}

/// `return expr`. Outside a function the value is still evaluated before
/// the script stops.
pub(super) fn rewrite_return(cx: &Transpiler<'_>, node: &Return, ancestors: Ancestors<'_>) -> Result<String> {
    let mut builder = ReplacementBuilder::over(cx, node.loc, NodeKind::Return)?;
    let keyword_start = builder.window().lo;
    let keyword_end = keyword_start + "return".len();
    let expr = cx.actual_location(&node.expr, true)?;

    if !ancestors.has_fn() {
        builder.replace_with(keyword_start, keyword_end, "eval{")?;
        builder.add_insertion(expr.hi, format!(";{ABORT}}}"))?;
    }
    builder.neutralize(keyword_end, expr.lo)?;
    builder.add_node(&node.expr, ancestors)?;
    builder.execute()
}
