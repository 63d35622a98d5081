use avt_ast::{Meta, Namespace, NodeKind};

use super::Transpiler;
use crate::ancestors::Ancestors;
use crate::builder::ReplacementBuilder;
use crate::error::Result;
use crate::keywords::replace_name;

/// `:: Name { members }`
pub(super) fn rewrite_namespace(
    cx: &Transpiler<'_>,
    node: &Namespace,
    ancestors: Ancestors<'_>,
) -> Result<String> {
    let script = cx.script();
    let mut builder = ReplacementBuilder::over(cx, node.loc, NodeKind::Ns)?;
    let colons_end = builder.window().lo + "::".len();
    let name_start = script.expect_name(colons_end, &node.name)?;
    let name_end = name_start + node.name.len();
    let brace = script.expect(name_end, "{")?;

    builder.neutralize(colons_end, name_start)?;
    builder.replace_with(name_start, name_end, replace_name(&node.name))?;
    builder.neutralize(name_end, brace)?;
    builder.add_nodes(&node.members, ancestors)?;
    builder.execute()
}

/// `### name value` or `### value`
pub(super) fn rewrite_meta(cx: &Transpiler<'_>, node: &Meta, ancestors: Ancestors<'_>) -> Result<String> {
    let mut builder = ReplacementBuilder::over(cx, node.loc, NodeKind::Meta)?;
    if let Some(name) = &node.name {
        let script = cx.script();
        let name_start = script.expect_name(builder.window().lo + "###".len(), name)?;
        let name_end = name_start + name.len();
        builder.replace_with(name_start, name_end, replace_name(name))?;
        builder.neutralize(name_end, cx.actual_location(&node.value, true)?.lo)?;
    }
    builder.add_node(&node.value, ancestors)?;
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
    fn namespace_members_are_rewritten() {
        assert_eq!(
            run(":: Ns {\n\tlet case = 1\n\t@f(a b) {}\n}"),
            ":: Ns {\n\tlet case_ = 1\n\t@f(a, b) {}\n}"
        );
    }

    #[test]
    fn namespace_header_is_joined() {
        assert_eq!(run("::\n\tNs\n{\n}"), ":: Ns {\n}");
        assert_eq!(run(":: new { }"), ":: new_ { }");
    }

    #[test]
    fn metadata() {
        assert_eq!(run("### { a: 1 }"), "### { a: 1 }");
        assert_eq!(run("### case\n\t[1 2]"), "### case_ [1, 2]");
    }
}
