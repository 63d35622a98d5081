//! `match` expressions. Arms gain the `case` keyword, `*` becomes `default`,
//! and every arm is separated from the next by a comma or a line break.

use avt_ast::{Match, Node, NodeKind};

use super::Transpiler;
use crate::ancestors::Ancestors;
use crate::builder::ReplacementBuilder;
use crate::error::Result;
use crate::script::Separator;

enum Arm<'n> {
    Case { q: &'n Node, a: &'n Node },
    Default(&'n Node),
}

pub(super) fn rewrite_match(cx: &Transpiler<'_>, node: &Match, ancestors: Ancestors<'_>) -> Result<String> {
    let script = cx.script();
    let mut builder = ReplacementBuilder::over(cx, node.loc, NodeKind::Match)?;
    let keyword_end = builder.window().lo + "match".len();

    let about = cx.actual_location(&node.about, true)?;
    builder.neutralize(keyword_end, about.lo)?;
    builder.add_node(&node.about, ancestors)?;
    let brace = script.expect(about.hi, "{")?;
    builder.neutralize(about.hi, brace)?;

    // The default arm may be written anywhere among the others.
    let mut arms = Vec::with_capacity(node.qs.len() + 1);
    for arm in &node.qs {
        arms.push((cx.actual_location(&arm.q, true)?.lo, Arm::Case { q: &arm.q, a: &arm.a }));
    }
    if let Some(default) = &node.default {
        arms.push((cx.actual_location(default, true)?.lo, Arm::Default(default)));
    }
    arms.sort_by_key(|(start, _)| *start);

    for (_, arm) in arms {
        let result = match arm {
            Arm::Case { q, a } => {
                let q_span = cx.actual_location(q, true)?;
                builder.add_insertion(q_span.lo, "case ")?;
                builder.add_node(q, ancestors)?;
                let arrow = script.expect(q_span.hi, "=>")?;
                builder.neutralize(q_span.hi, arrow)?;
                builder.neutralize(arrow + 2, cx.actual_location(a, true)?.lo)?;
                a
            }
            Arm::Default(a) => {
                let a_start = cx.actual_location(a, true)?.lo;
                let arrow = script.last_index_of("=>", a_start)?;
                let star = script.last_index_of("*", arrow)?;
                builder.replace_with(star, star + 1, "default")?;
                builder.neutralize(star + 1, arrow)?;
                builder.neutralize(arrow + 2, a_start)?;
                a
            }
        };
        let end = add_arm_result(&mut builder, result, ancestors)?;
        separate_arm(&mut builder, end)?;
    }
    builder.execute()
}

/// An object literal right after `=>` would read as a block, so it is
/// parenthesized. Returns the end of the result.
fn add_arm_result(builder: &mut ReplacementBuilder<'_, '_>, node: &Node, ancestors: Ancestors<'_>) -> Result<usize> {
    let cx = builder.transpiler();
    let span = cx.actual_location(node, true)?;
    if matches!(node, Node::Obj(_)) && cx.script().byte(span.lo) != Some(b'(') {
        builder.add_insertion(span.lo, "(")?;
        builder.add_insertion(span.hi, ")")?;
    }
    builder.add_node(node, ancestors)?;
    Ok(span.hi)
}

fn separate_arm(builder: &mut ReplacementBuilder<'_, '_>, end: usize) -> Result<()> {
    let script = builder.transpiler().script();
    let next = script.next_item(end);
    let last = script.byte(next.start) == Some(b'}');
    match next.separator {
        Separator::Semicolon => {
            let semicolon = script.index_of(";", end)?;
            builder.replace_with(semicolon, semicolon + 1, if last { "" } else { "," })
        }
        Separator::None if !last => builder.add_insertion(end, ","),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{transpile, TranspilerConfig};

    fn run(source: &str) -> String {
        transpile(source, &TranspilerConfig::default()).unwrap()
    }

    #[test]
    fn arms_get_case() {
        assert_eq!(run("match 0 {\n\t1 => 2\n}"), "match 0 {\n\tcase 1 => 2\n}");
    }

    #[test]
    fn star_becomes_default() {
        assert_eq!(
            run("match 0 {\n\t1 => 2\n\t* => 3\n}"),
            "match 0 {\n\tcase 1 => 2\n\tdefault => 3\n}"
        );
    }

    #[test]
    fn default_may_come_first() {
        assert_eq!(
            run("match 0 { * => 3 1 => 2 }"),
            "match 0 { default => 3, case 1 => 2 }"
        );
    }

    #[test]
    fn arms_on_one_line_get_commas() {
        assert_eq!(run("match 0 { 1 => 2 3 => 4 }"), "match 0 { case 1 => 2, case 3 => 4 }");
        assert_eq!(run("match 0 { 1 => 2 * => 3 }"), "match 0 { case 1 => 2, default => 3 }");
    }

    #[test]
    fn semicolons_between_arms() {
        assert_eq!(run("match 0 { 1 => 2; 3 => 4; }"), "match 0 { case 1 => 2, case 3 => 4 }");
    }

    #[test]
    fn header_is_joined() {
        assert_eq!(run("match\n0 {\n\t1 => 2\n}"), "match 0 {\n\tcase 1 => 2\n}");
        assert_eq!(run("match 0\n{\n\t1 => 2\n}"), "match 0 {\n\tcase 1 => 2\n}");
    }

    #[test]
    fn object_results_are_parenthesized() {
        assert_eq!(
            run("match 0 {\n\t1 => { key: \"value\" }\n}"),
            "match 0 {\n\tcase 1 => ({ key: \"value\" })\n}"
        );
        assert_eq!(
            run("match 0 {\n\t1 => 2\n\t* => { key: \"value\" }\n}"),
            "match 0 {\n\tcase 1 => 2\n\tdefault => ({ key: \"value\" })\n}"
        );
        let source = "match 0 {\n\t1 => ({ key: \"value\" })\n}";
        assert_eq!(run(source), "match 0 {\n\tcase 1 => ({ key: \"value\" })\n}");
    }
}
