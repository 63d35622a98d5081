//! Words the legacy grammar refuses as names.

pub const LEGACY_KEYWORDS: &[&str] = &[
    "null",
    "true",
    "false",
    "each",
    "for",
    "loop",
    "break",
    "continue",
    "match",
    "if",
    "elif",
    "else",
    "return",
    "eval",
    "var",
    "let",
    "exists",
    // reserved
    "attr",
    "attribute",
    "class",
    "export",
    "fn",
    "static",
    "struct",
    "while",
    "import",
    "meta",
    "module",
    "namespace",
];

pub fn is_legacy_keyword(word: &str) -> bool {
    LEGACY_KEYWORDS.contains(&word)
}
