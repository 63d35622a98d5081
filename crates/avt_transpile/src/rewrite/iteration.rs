//! `each`, `for` and `loop`.
//!
//! Loop headers must sit on one line in the new grammar, and the comma
//! between the variable (or range start) and what follows is mandatory.

use avt_ast::{Each, For, ForIteration, Loop, Node, NodeKind};

use super::Transpiler;
use crate::ancestors::Ancestors;
use crate::builder::ReplacementBuilder;
use crate::error::Result;
use crate::keywords::replace_name;
use crate::script::Separator;

/// `each let var, items body`, optionally with the header in parentheses.
pub(super) fn rewrite_each(cx: &Transpiler<'_>, node: &Each, ancestors: Ancestors<'_>) -> Result<String> {
    let mut builder = ReplacementBuilder::over(cx, node.loc, NodeKind::Each)?;
    let keyword_end = builder.window().lo + "each".len();
    let header = rewrite_header(&mut builder, keyword_end, &node.var)?;

    let items = cx.actual_location(&node.items, true)?;
    join_with_comma(&mut builder, header.var_end, items.lo)?;
    builder.add_node(&node.items, ancestors)?;

    add_body(&mut builder, header.parenthesized, items.hi, &node.body, ancestors)?;
    builder.execute()
}

/// `for times body` or `for let var = from, to body`.
pub(super) fn rewrite_for(cx: &Transpiler<'_>, node: &For, ancestors: Ancestors<'_>) -> Result<String> {
    let script = cx.script();
    let mut builder = ReplacementBuilder::over(cx, node.loc, NodeKind::For)?;
    let keyword_end = builder.window().lo + "for".len();

    match &node.iteration {
        ForIteration::Times { times } => {
            let span = cx.actual_location(times, true)?;
            builder.neutralize(keyword_end, span.lo)?;
            builder.add_node(times, ancestors)?;
            add_body(&mut builder, false, span.hi, &node.body, ancestors)?;
        }
        ForIteration::Range { var, from, to } => {
            let header = rewrite_header(&mut builder, keyword_end, var)?;
            let mut prev_end = header.var_end;
            if let Some(from) = from {
                let eq = script.expect(prev_end, "=")?;
                let span = cx.actual_location(from, true)?;
                builder.neutralize(prev_end, eq)?;
                builder.neutralize(eq + 1, span.lo)?;
                builder.add_node(from, ancestors)?;
                prev_end = span.hi;
            }

            let span = cx.actual_location(to, true)?;
            join_with_comma(&mut builder, prev_end, span.lo)?;
            builder.add_node(to, ancestors)?;
            add_body(&mut builder, header.parenthesized, span.hi, &node.body, ancestors)?;
        }
    }
    builder.execute()
}

/// `loop { statements }`
pub(super) fn rewrite_loop(cx: &Transpiler<'_>, node: &Loop, ancestors: Ancestors<'_>) -> Result<String> {
    let mut builder = ReplacementBuilder::over(cx, node.loc, NodeKind::Loop)?;
    let keyword_end = builder.window().lo + "loop".len();
    let brace = cx.script().expect(keyword_end, "{")?;
    builder.neutralize(keyword_end, brace)?;
    builder.add_nodes(&node.statements, ancestors)?;
    builder.execute()
}

struct Header {
    parenthesized: bool,
    var_end: usize,
}

/// `(let var` or `let var` following the loop keyword.
fn rewrite_header(builder: &mut ReplacementBuilder<'_, '_>, keyword_end: usize, var: &str) -> Result<Header> {
    let script = builder.transpiler().script();
    let mut start = script.find_non_whitespace(keyword_end)?;
    builder.neutralize(keyword_end, start)?;

    let parenthesized = script.byte(start) == Some(b'(');
    if parenthesized {
        let let_start = script.expect_name(start + 1, "let")?;
        builder.neutralize(start + 1, let_start)?;
        start = let_start;
    }
    let let_end = script.expect_name(start, "let")? + "let".len();

    let var_start = script.expect_name(let_end, var)?;
    let var_end = var_start + var.len();
    builder.neutralize(let_end, var_start)?;
    builder.replace_with(var_start, var_end, replace_name(var))?;
    Ok(Header {
        parenthesized,
        var_end,
    })
}

/// Make sure a comma separates `prev_end` from the next part at `next_start`.
fn join_with_comma(builder: &mut ReplacementBuilder<'_, '_>, prev_end: usize, next_start: usize) -> Result<()> {
    let script = builder.transpiler().script();
    if script.next_item(prev_end).separator == Separator::Comma {
        let comma = script.index_of(",", prev_end)?;
        builder.neutralize(prev_end, comma)?;
        builder.neutralize(comma + 1, next_start)
    } else {
        builder.add_insertion(prev_end, ",")?;
        builder.neutralize(prev_end, next_start)
    }
}

/// Close the header and add the body.
fn add_body(
    builder: &mut ReplacementBuilder<'_, '_>,
    parenthesized: bool,
    header_end: usize,
    body: &Node,
    ancestors: Ancestors<'_>,
) -> Result<()> {
    let cx = builder.transpiler();
    let body_span = cx.actual_location(body, true)?;
    let mut prev_end = header_end;
    if parenthesized {
        let rparen = cx.script().expect(prev_end, ")")?;
        builder.neutralize(prev_end, rparen)?;
        prev_end = rparen + 1;
    }
    builder.neutralize(prev_end, body_span.lo)?;
    builder.add_node(body, ancestors)
}
