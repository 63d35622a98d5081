use avt_ast::{Block, If, Node, NodeKind};

use super::Transpiler;
use crate::ancestors::Ancestors;
use crate::builder::ReplacementBuilder;
use crate::error::Result;

/// `if cond then (elif cond then)* (else then)?`
///
/// Every keyword must stay on the line of what it introduces, so each gap
/// between a keyword and its operand is joined.
pub(super) fn rewrite_if(cx: &Transpiler<'_>, node: &If, ancestors: Ancestors<'_>) -> Result<String> {
    let script = cx.script();
    let mut builder = ReplacementBuilder::over(cx, node.loc, NodeKind::If)?;
    let keyword_end = builder.window().lo + "if".len();
    let mut prev_end = add_branch(&mut builder, keyword_end, &node.cond, &node.then, ancestors)?;

    for elif in &node.elseif {
        let keyword = script.expect_name(prev_end, "elif")?;
        prev_end = add_branch(&mut builder, keyword + "elif".len(), &elif.cond, &elif.then, ancestors)?;
    }

    if let Some(else_) = &node.else_ {
        let keyword = script.expect_name(prev_end, "else")?;
        let body = cx.actual_location(else_, true)?;
        builder.neutralize(keyword + "else".len(), body.lo)?;
        builder.add_node(else_, ancestors)?;
    }
    builder.execute()
}

/// Condition and body following a keyword ending at `keyword_end`. Returns
/// the end of the body.
fn add_branch(
    builder: &mut ReplacementBuilder<'_, '_>,
    keyword_end: usize,
    cond: &Node,
    then: &Node,
    ancestors: Ancestors<'_>,
) -> Result<usize> {
    let cx = builder.transpiler();
    let cond_span = cx.actual_location(cond, true)?;
    let then_span = cx.actual_location(then, true)?;
    builder.neutralize(keyword_end, cond_span.lo)?;
    builder.add_node(cond, ancestors)?;
    builder.neutralize(cond_span.hi, then_span.lo)?;
    builder.add_node(then, ancestors)?;
    Ok(then_span.hi)
}

/// A braced body or an `eval { }` expression.
pub(super) fn rewrite_block(cx: &Transpiler<'_>, node: &Block, ancestors: Ancestors<'_>) -> Result<String> {
    let script = cx.script();
    let mut builder = ReplacementBuilder::over(cx, node.loc, NodeKind::Block)?;
    let start = builder.window().lo;
    if script.starts_with_at(start, "eval") {
        let keyword_end = start + "eval".len();
        let brace = script.expect(keyword_end, "{")?;
        builder.neutralize(keyword_end, brace)?;
    }
    builder.add_nodes(&node.statements, ancestors)?;
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
    fn canonical_if_is_unchanged() {
        for source in [
            "if true { 1 }",
            "if a 1 else 2",
            "if a { 1 } elif b { 2 } else { 3 }",
            "if (a) {\n\t1\n} else {\n\t2\n}",
        ] {
            assert_eq!(run(source), source);
        }
    }

    #[test]
    fn line_breaks_after_keywords_are_joined() {
        assert_eq!(run("if\n\ttrue\n\t1"), "if true 1");
        assert_eq!(run("if a { 1 }\nelif\n\tb { 2 }"), "if a { 1 }\nelif b { 2 }");
        assert_eq!(run("if a { 1 }\nelse\n{ 2 }"), "if a { 1 }\nelse { 2 }");
    }

    #[test]
    fn comment_before_a_joined_line_is_closed() {
        assert_eq!(run("if a // cond\n{ 1 }"), "if a /* cond*/ { 1 }");
    }

    #[test]
    fn block_statements_are_rewritten() {
        assert_eq!(run("if a {\n\tf(1 2)\n}"), "if a {\n\tf(1, 2)\n}");
    }

    #[test]
    fn eval_block() {
        assert_eq!(run("eval {\n\tcase\n}"), "eval {\n\tcase_\n}");
        assert_eq!(run("eval\n{ 1 }"), "eval { 1 }");
    }
}
