//! Object literals.
//!
//! Only the last entry for each key survives. When a key is a word the new
//! grammar reserves, the literal cannot be written as-is and becomes a block
//! that fills a fresh object one entry at a time.

use std::collections::HashSet;

use avt_ast::{Node, NodeKind, Obj, ObjEntry, Span};

use super::Transpiler;
use crate::ancestors::Ancestors;
use crate::builder::ReplacementBuilder;
use crate::error::{Result, TranspileError};
use crate::keywords::{is_keyword, is_reserved_keyword};
use crate::script::{NextItem, Separator};

/// Name of the object built by the block form.
const HIDDEN_OBJ: &str = "__avt_obj";

/// Where one entry sits in the text.
struct EntryLayout<'n> {
    key: &'n str,
    value: &'n Node,
    key_start: usize,
    key_end: usize,
    colon: usize,
    value_span: Span,
    next: NextItem,
    /// A later entry has the same key.
    shadowed: bool,
}

pub(super) fn rewrite_obj(cx: &Transpiler<'_>, node: &Obj, ancestors: Ancestors<'_>) -> Result<String> {
    let mut builder = ReplacementBuilder::over(cx, node.loc, NodeKind::Obj)?;
    let entries = layout(cx, &node.entries, builder.window().lo + 1)?;
    if node.entries.iter().any(|entry| is_reserved_keyword(&entry.key)) {
        rewrite_as_block(&mut builder, &entries, ancestors)?;
    } else {
        rewrite_entries(&mut builder, &entries, ancestors)?;
    }
    builder.execute()
}

fn layout<'n>(cx: &Transpiler<'_>, entries: &'n [ObjEntry], start: usize) -> Result<Vec<EntryLayout<'n>>> {
    let script = cx.script();
    let mut seen = HashSet::new();
    let mut shadowed: Vec<bool> = entries
        .iter()
        .rev()
        .map(|entry| !seen.insert(entry.key.as_str()))
        .collect();
    shadowed.reverse();

    let mut cursor = start;
    let mut out = Vec::with_capacity(entries.len());
    for (entry, shadowed) in entries.iter().zip(shadowed) {
        let key_start = script.expect_name(cursor, &entry.key)?;
        let key_end = key_start + entry.key.len();
        let colon = script.expect(key_end, ":")?;
        let value_span = cx.actual_location(&entry.value, true)?;
        let next = script.next_item(value_span.hi);
        cursor = next.start;
        out.push(EntryLayout {
            key: &entry.key,
            value: &entry.value,
            key_start,
            key_end,
            colon,
            value_span,
            next,
            shadowed,
        });
    }
    Ok(out)
}

/// The separator character right after a value.
fn separator_at(builder: &ReplacementBuilder<'_, '_>, entry: &EntryLayout<'_>, separator: &str) -> Result<usize> {
    builder.transpiler().script().index_of(separator, entry.value_span.hi)
}

fn rewrite_entries(
    builder: &mut ReplacementBuilder<'_, '_>,
    entries: &[EntryLayout<'_>],
    ancestors: Ancestors<'_>,
) -> Result<()> {
    let last = entries.len().saturating_sub(1);
    for (i, entry) in entries.iter().enumerate() {
        if entry.shadowed {
            builder.replace_with(entry.key_start, entry.next.start, "")?;
            continue;
        }
        builder.neutralize(entry.key_end, entry.colon)?;
        builder.neutralize(entry.colon + 1, entry.value_span.lo)?;
        builder.add_node(entry.value, ancestors)?;

        match entry.next.separator {
            Separator::Semicolon => {
                let semicolon = separator_at(builder, entry, ";")?;
                builder.replace_with(semicolon, semicolon + 1, if i == last { "" } else { "," })?;
            }
            Separator::None if i != last => builder.add_insertion(entry.value_span.hi, ",")?,
            _ => {}
        }
    }
    Ok(())
}

/// `{ k: v }` → `eval{let __avt_obj={}; __avt_obj.k= v; __avt_obj}`
fn rewrite_as_block(
    builder: &mut ReplacementBuilder<'_, '_>,
    entries: &[EntryLayout<'_>],
    ancestors: Ancestors<'_>,
) -> Result<()> {
    let script = builder.transpiler().script();
    let window = builder.window();
    builder.replace_with(window.lo, window.lo + 1, format!("eval{{let {HIDDEN_OBJ}={{}};"))?;

    let mut close = window.lo + 1;
    for entry in entries {
        close = entry.next.start;
        if entry.shadowed {
            builder.replace_with(entry.key_start, entry.next.start, "")?;
            continue;
        }
        let target = if is_keyword(entry.key) {
            format!("{HIDDEN_OBJ}[\"{}\"]", entry.key)
        } else {
            format!("{HIDDEN_OBJ}.{}", entry.key)
        };
        builder.replace_with(entry.key_start, entry.key_end, target)?;
        builder.neutralize(entry.key_end, entry.colon)?;
        builder.replace_with(entry.colon, entry.colon + 1, "=")?;
        builder.neutralize(entry.colon + 1, entry.value_span.lo)?;
        builder.add_node(entry.value, ancestors)?;

        match entry.next.separator {
            Separator::Comma => {
                let comma = separator_at(builder, entry, ",")?;
                builder.replace_with(comma, comma + 1, ";")?;
            }
            Separator::None => builder.add_insertion(entry.value_span.hi, ";")?,
            Separator::Semicolon | Separator::LineBreak => {}
        }
    }

    if script.byte(close) != Some(b'}') || close + 1 != window.hi {
        return Err(TranspileError::expected("`}`", close));
    }
    builder.replace_with(close, close + 1, format!("{HIDDEN_OBJ}}}"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{transpile, TranspilerConfig};

    fn run(source: &str) -> String {
        transpile(source, &TranspilerConfig::default()).unwrap()
    }

    #[test]
    fn canonical_objects_are_unchanged() {
        for source in ["{}", "{ a: 0 }", "{ a: 0, b: 1 }", "{\n\ta: 0\n\tb: 1\n}", "{ default: 0 }"] {
            assert_eq!(run(source), source);
        }
    }

    #[test]
    fn space_separated_entries_get_commas() {
        assert_eq!(run("{ a: 0 b: 1 }"), "{ a: 0, b: 1 }");
    }

    #[test]
    fn semicolons_become_commas() {
        assert_eq!(run("{ a: 0; b: 1; }"), "{ a: 0, b: 1 }");
    }

    #[test]
    fn gaps_around_colons_are_joined() {
        assert_eq!(run("{ a\n: 0, b:\n\t1 }"), "{ a : 0, b: 1 }");
    }

    #[test]
    fn only_the_last_duplicate_survives() {
        assert_eq!(run("{ a: 0 b: 1 c: 2 b: 3 d: 4 }"), "{ a: 0, c: 2, b: 3, d: 4 }");
        assert_eq!(run("{ a: 0, a: 1 }"), "{ a: 1 }");
    }

    #[test]
    fn values_are_rewritten() {
        assert_eq!(run("{ a: [0 1] }"), "{ a: [0, 1] }");
    }

    #[test]
    fn reserved_key_turns_into_a_block() {
        assert_eq!(
            run("{ new: 1 }"),
            "eval{let __avt_obj={}; __avt_obj[\"new\"]= 1; __avt_obj}"
        );
        assert_eq!(
            run("{ a: 0, this: 1 b: 2 }"),
            "eval{let __avt_obj={}; __avt_obj.a= 0; __avt_obj[\"this\"]= 1; __avt_obj.b= 2; __avt_obj}"
        );
    }

    #[test]
    fn reserved_key_block_keeps_line_breaks() {
        assert_eq!(
            run("{\n\tin: 1\n\tout: 2\n}"),
            "eval{let __avt_obj={};\n\t__avt_obj[\"in\"]= 1\n\t__avt_obj[\"out\"]= 2\n__avt_obj}"
        );
    }

    #[test]
    fn reserved_key_block_collapses_duplicates() {
        assert_eq!(
            run("{ new: 1, new: 2 }"),
            "eval{let __avt_obj={}; __avt_obj[\"new\"]= 2; __avt_obj}"
        );
    }
}
