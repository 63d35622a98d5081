//! Keywords of the 1.x grammar that legacy scripts may use as names.

/// Keywords the 1.x grammar gives meaning to.
pub const USED_KEYWORDS: &[&str] = &["case", "default", "do"];

/// Keywords the 1.x grammar reserves without using them.
pub const RESERVED_KEYWORDS: &[&str] = &[
    "as",
    "async",
    "await",
    "catch",
    "component",
    "constructor",
    "dictionary",
    "enum",
    "finally",
    "hash",
    "in",
    "interface",
    "out",
    "private",
    "public",
    "ref",
    "table",
    "this",
    "throw",
    "trait",
    "try",
    "undefined",
    "use",
    "using",
    "when",
    "yield",
    "is",
    "new",
];

pub fn is_keyword(name: &str) -> bool {
    USED_KEYWORDS.contains(&name) || RESERVED_KEYWORDS.contains(&name)
}

/// Reserved but unused. These force the block form of an object literal.
pub fn is_reserved_keyword(name: &str) -> bool {
    RESERVED_KEYWORDS.contains(&name)
}

/// Rename a name that collides with a keyword by adding one underscore
/// beyond any it already ends with: `case` → `case_`, `case_` → `case__`.
/// Namespaced names are handled per segment.
pub fn replace_name(name: &str) -> String {
    name.split(':')
        .map(replace_segment)
        .collect::<Vec<_>>()
        .join(":")
}

fn replace_segment(segment: &str) -> String {
    let base = segment.trim_end_matches('_');
    if is_keyword(base) {
        format!("{segment}_")
    } else {
        segment.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_get_an_underscore() {
        assert_eq!(replace_name("case"), "case_");
        assert_eq!(replace_name("case_"), "case__");
        assert_eq!(replace_name("this__"), "this___");
    }

    #[test]
    fn other_names_are_unchanged() {
        for name in ["_", "__", "foo", "foo_", "cases", "Core:add"] {
            assert_eq!(replace_name(name), name);
        }
    }

    #[test]
    fn namespaced_names_are_renamed_per_segment() {
        assert_eq!(replace_name("in:out:x"), "in_:out_:x");
    }

    #[test]
    fn used_keywords_are_not_reserved() {
        assert!(is_keyword("default"));
        assert!(!is_reserved_keyword("default"));
        assert!(is_reserved_keyword("new"));
    }
}
