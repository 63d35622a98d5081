use avt_ast::{Exists, Identifier, NodeKind};

use super::Transpiler;
use crate::ancestors::Ancestors;
use crate::builder::ReplacementBuilder;
use crate::error::Result;
use crate::keywords::replace_name;
use crate::location::own_span;

pub(super) fn rewrite_identifier(identifier: &Identifier) -> String {
    replace_name(&identifier.name)
}

/// `exists name`
pub(super) fn rewrite_exists(
    cx: &Transpiler<'_>,
    node: &Exists,
    _ancestors: Ancestors<'_>,
) -> Result<String> {
    let mut builder = ReplacementBuilder::over(cx, node.loc, NodeKind::Exists)?;
    let keyword_end = builder.window().lo + "exists".len();
    let identifier = own_span(node.identifier.loc, NodeKind::Identifier)?;
    builder.neutralize(keyword_end, identifier.lo)?;
    builder.replace_with(identifier.lo, identifier.hi, rewrite_identifier(&node.identifier))?;
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
    fn keyword_names_get_an_underscore() {
        for (input, expected) in [
            ("case", "case_"),
            ("default", "default_"),
            ("new", "new_"),
            ("_", "_"),
            ("__", "__"),
            ("foo_", "foo_"),
            ("case_", "case__"),
        ] {
            assert_eq!(run(input), expected);
        }
    }

    #[test]
    fn namespaced_references_are_renamed_per_segment() {
        assert_eq!(run("in:out()"), "in_:out_()");
    }

    #[test]
    fn exists_renames_its_operand() {
        assert_eq!(run("exists\n\tthis"), "exists this_");
    }
}
