use avt_ast::{Index, Node, NodeKind, Prop};

use super::Transpiler;
use crate::ancestors::Ancestors;
use crate::builder::ReplacementBuilder;
use crate::error::Result;
use crate::keywords::is_keyword;
use crate::location::own_span;

/// `target[index]`
pub(super) fn rewrite_index(cx: &Transpiler<'_>, node: &Index, ancestors: Ancestors<'_>) -> Result<String> {
    let mut builder = ReplacementBuilder::new(cx, cx.chain_location(&node.target, node.loc, NodeKind::Index)?);
    builder.add_node(&node.target, ancestors)?;
    builder.add_node(&node.index, ancestors)?;
    builder.execute()
}

/// `target.name`. Keyword names switch to bracket access, and a bare
/// integer target is parenthesized since `1.x` would read as a number.
pub(super) fn rewrite_prop(cx: &Transpiler<'_>, node: &Prop, ancestors: Ancestors<'_>) -> Result<String> {
    let script = cx.script();
    let mut builder = ReplacementBuilder::new(cx, cx.chain_location(&node.target, node.loc, NodeKind::Prop)?);
    let own = own_span(node.loc, NodeKind::Prop)?;
    let target = cx.actual_location(&node.target, true)?;

    builder.add_node(&node.target, ancestors)?;

    if let Node::Num(_) = node.target.as_ref() {
        let text = script.slice(target.lo, target.hi)?;
        if !text.starts_with('(') && !text.contains('.') {
            builder.add_insertion(target.lo, "(")?;
            builder.add_insertion(target.hi, ")")?;
        }
    }

    if is_keyword(&node.name) {
        builder.replace_with(target.hi, own.hi, format!("[\"{}\"]", node.name))?;
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
    fn keyword_properties_use_brackets() {
        assert_eq!(run("o.default"), "o[\"default\"]");
        assert_eq!(run("o.a.new.b"), "o.a[\"new\"].b");
    }

    #[test]
    fn plain_properties_are_unchanged() {
        assert_eq!(run("o.a"), "o.a");
        assert_eq!(run("o.default_"), "o.default_");
    }

    #[test]
    fn integer_targets_are_parenthesized() {
        assert_eq!(run("1.foo"), "(1).foo");
        assert_eq!(run("(1).foo"), "(1).foo");
        assert_eq!(run("1.5.foo"), "1.5.foo");
    }

    #[test]
    fn index_parts_are_rewritten() {
        assert_eq!(run("case[default]"), "case_[default_]");
        assert_eq!(run("a[f(1 2)]"), "a[f(1, 2)]");
    }
}
