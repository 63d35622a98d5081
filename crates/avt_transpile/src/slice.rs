//! Applying a batch of text edits.

use crate::error::{Result, TranspileError};

/// Replace `text[start..end]` with `content`. `start == end` is an insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceReplacement {
    pub start: usize,
    pub end: usize,
    pub content: String,
}

impl SliceReplacement {
    pub fn new(start: usize, end: usize, content: impl Into<String>) -> Self {
        Self {
            start,
            end,
            content: content.into(),
        }
    }

    pub fn insertion(pos: usize, content: impl Into<String>) -> Self {
        Self::new(pos, pos, content)
    }
}

/// Apply non-overlapping replacements to `text`.
///
/// Edits are applied in order of position; insertions at the same position
/// keep the order in which they were given. Text outside every edit is copied
/// unchanged.
pub fn apply_replacements(text: &str, replacements: &[SliceReplacement]) -> Result<String> {
    let mut sorted: Vec<&SliceReplacement> = replacements.iter().collect();
    sorted.sort_by_key(|r| (r.start, r.end));

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut previous: Option<&SliceReplacement> = None;
    for r in sorted {
        if r.start > r.end || r.end > text.len() {
            return Err(TranspileError::OutOfRange {
                start: r.start,
                end: r.end,
                window_start: 0,
                window_end: text.len(),
            });
        }
        if r.start < cursor {
            let other = previous.map_or((0, cursor), |p| (p.start, p.end));
            return Err(TranspileError::Overlap {
                start: r.start,
                end: r.end,
                other_start: other.0,
                other_end: other.1,
            });
        }
        let Some(unchanged) = text.get(cursor..r.start) else {
            return Err(TranspileError::OutOfRange {
                start: r.start,
                end: r.end,
                window_start: 0,
                window_end: text.len(),
            });
        };
        out.push_str(unchanged);
        out.push_str(&r.content);
        cursor = r.end;
        previous = Some(r);
    }
    out.push_str(text.get(cursor..).unwrap_or_default());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_words() {
        let out = apply_replacements(
            "Ai is cute",
            &[
                SliceReplacement::new(3, 5, "am"),
                SliceReplacement::new(6, 10, "kawaii"),
            ],
        )
        .unwrap();
        assert_eq!(out, "Ai am kawaii");
    }

    #[test]
    fn no_replacements_is_identity() {
        assert_eq!(apply_replacements("Hello, World!", &[]).unwrap(), "Hello, World!");
    }

    #[test]
    fn adjacent_ranges() {
        let out = apply_replacements(
            "abcde",
            &[
                SliceReplacement::new(1, 3, "X"),
                SliceReplacement::new(3, 4, "Y"),
            ],
        )
        .unwrap();
        assert_eq!(out, "aXYe");
    }

    #[test]
    fn order_of_input_does_not_matter() {
        let out = apply_replacements(
            "abcde",
            &[
                SliceReplacement::new(3, 4, "Y"),
                SliceReplacement::new(1, 3, "X"),
            ],
        )
        .unwrap();
        assert_eq!(out, "aXYe");
    }

    #[test]
    fn insertion_before_replacement_at_same_start() {
        let out = apply_replacements(
            "a b",
            &[
                SliceReplacement::new(1, 2, "  "),
                SliceReplacement::insertion(1, ","),
            ],
        )
        .unwrap();
        assert_eq!(out, "a,  b");
    }

    #[test]
    fn overlapping_ranges_fail() {
        let err = apply_replacements(
            "abcde",
            &[
                SliceReplacement::new(1, 3, "X"),
                SliceReplacement::new(2, 4, "Y"),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, TranspileError::Overlap { start: 2, .. }));
    }

    #[test]
    fn out_of_bounds_fails() {
        let err = apply_replacements("abc", &[SliceReplacement::new(2, 5, "")]).unwrap_err();
        assert!(matches!(err, TranspileError::OutOfRange { .. }));
    }
}
