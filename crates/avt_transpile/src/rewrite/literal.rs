//! Literals. Strings and templates are re-escaped for the new escape rules;
//! arrays get commas between items.

use avt_ast::{Arr, Node, NodeKind, Str, Tmpl, TmplElement};

use super::Transpiler;
use crate::ancestors::Ancestors;
use crate::builder::ReplacementBuilder;
use crate::error::{Result, TranspileError};
use crate::format::{reescape, TEMPLATE_ESCAPABLE};
use crate::location::own_span;

/// Numbers, booleans and `null` are written the same in both grammars.
pub(super) fn verbatim(cx: &Transpiler<'_>, node: &Node) -> Result<String> {
    let span = own_span(node.loc(), node.kind())?;
    Ok(cx.script().slice(span.lo, span.hi)?.to_string())
}

pub(super) fn rewrite_str(cx: &Transpiler<'_>, node: &Str) -> Result<String> {
    let mut builder = ReplacementBuilder::over(cx, node.loc, NodeKind::Str)?;
    let span = builder.window();
    let quote = match cx.script().byte(span.lo) {
        Some(quote @ (b'\'' | b'"')) => quote as char,
        _ => return Err(TranspileError::expected("a quote", span.lo)),
    };
    builder.try_add_replacement(span.lo + 1, span.hi - 1, |raw| reescape(raw, &[quote]))?;
    builder.execute()
}

/// Literal runs are re-escaped together with the delimiters around them
/// (the backticks and the braces of neighbouring embeds); embedded
/// expressions are rewritten as nodes.
pub(super) fn rewrite_tmpl(cx: &Transpiler<'_>, node: &Tmpl, ancestors: Ancestors<'_>) -> Result<String> {
    let script = cx.script();
    let mut builder = ReplacementBuilder::over(cx, node.loc, NodeKind::Tmpl)?;
    let own = builder.window();

    for (i, element) in node.tmpl.iter().enumerate() {
        let expr = match element {
            TmplElement::Expr(expr) => expr,
            TmplElement::Str(_) => {
                let start = match i.checked_sub(1).map(|j| &node.tmpl[j]) {
                    Some(TmplElement::Expr(prev)) => script.index_of("}", cx.actual_location(prev, true)?.hi)?,
                    _ => own.lo,
                };
                let end = match node.tmpl.get(i + 1) {
                    Some(TmplElement::Expr(next)) => {
                        script.last_index_of("{", cx.actual_location(next, true)?.lo)? + 1
                    }
                    _ => own.hi,
                };
                builder.try_add_replacement(start, end, |raw| reescape(raw, TEMPLATE_ESCAPABLE))?;
                continue;
            }
        };
        builder.add_node(expr, ancestors)?;
    }
    builder.execute()
}

/// `[items]`
pub(super) fn rewrite_arr(cx: &Transpiler<'_>, node: &Arr, ancestors: Ancestors<'_>) -> Result<String> {
    let script = cx.script();
    let mut builder = ReplacementBuilder::over(cx, node.loc, NodeKind::Arr)?;
    let mut prev_end = None;
    for item in &node.value {
        let span = cx.actual_location(item, true)?;
        if let Some(prev_end) = prev_end {
            if !script.includes_separator(prev_end, span.lo) {
                builder.add_insertion(prev_end, ",")?;
            }
        }
        builder.add_node(item, ancestors)?;
        prev_end = Some(span.hi);
    }
    builder.execute()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{transpile, TranspilerConfig};

    fn run(source: &str) -> String {
        transpile(source, &TranspilerConfig::default()).unwrap()
    }

    #[test]
    fn plain_strings_are_unchanged() {
        assert_eq!(run("'Hello, world!'"), "'Hello, world!'");
        assert_eq!(run("\"Hello, world!\""), "\"Hello, world!\"");
    }

    #[test]
    fn lone_backslashes_are_doubled() {
        assert_eq!(run(r"'foo\bar'"), r"'foo\\bar'");
        assert_eq!(run(r#""foo\bar""#), r#""foo\\bar""#);
        assert_eq!(run(r"'foo\\bar'"), r"'foo\\\\bar'");
    }

    #[test]
    fn quote_escapes_are_kept() {
        assert_eq!(run(r"'foo\'bar'"), r"'foo\'bar'");
        assert_eq!(run(r#""foo\"bar""#), r#""foo\"bar""#);
    }

    #[test]
    fn template_escapes() {
        assert_eq!(run(r"`foo\bar`"), r"`foo\\bar`");
        for source in [r"`\``", r"`\{`", r"`\}`"] {
            assert_eq!(run(source), source);
        }
    }

    #[test]
    fn template_expressions() {
        assert_eq!(run("`{ 1 } + { 2 }`"), "`{ 1 } + { 2 }`");
        assert_eq!(run(r"`\a{case}\b`"), r"`\\a{case_}\\b`");
        assert_eq!(run("`{f(1 2)}`"), "`{f(1, 2)}`");
    }

    #[test]
    fn array_items_get_commas() {
        assert_eq!(run("[0 1 2]"), "[0, 1, 2]");
        assert_eq!(run("[0, 1, 2]"), "[0, 1, 2]");
        assert_eq!(run("[\n\t0\n\t1\n]"), "[\n\t0\n\t1\n]");
        assert_eq!(run("[(0) (1)]"), "[(0), (1)]");
    }

    #[test]
    fn literals_are_copied() {
        for source in ["42", "-1", "1.5", "true", "false", "null"] {
            assert_eq!(run(source), source);
        }
    }
}
