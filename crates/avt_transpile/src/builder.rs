//! Collecting the edits that rewrite one node.

use avt_ast::{Loc, Node, NodeKind, Span};

use crate::ancestors::Ancestors;
use crate::error::{Result, TranspileError};
use crate::format::neutralize_line_separators;
use crate::location::own_span;
use crate::rewrite::Transpiler;
use crate::slice::{apply_replacements, SliceReplacement};

/// Edits confined to one window of the script.
///
/// Positions passed in are absolute script offsets. [`execute`] returns the
/// window's text with every edit applied, so a rewriter never needs to know
/// where its output ends up in the final script.
///
/// [`execute`]: ReplacementBuilder::execute
pub struct ReplacementBuilder<'a, 's> {
    cx: &'a Transpiler<'s>,
    window: Span,
    replacements: Vec<SliceReplacement>,
    /// Net change in length of the window so far.
    end_offset: isize,
}

impl<'a, 's> ReplacementBuilder<'a, 's> {
    pub fn new(cx: &'a Transpiler<'s>, window: Span) -> Self {
        Self {
            cx,
            window,
            replacements: Vec::new(),
            end_offset: 0,
        }
    }

    /// A builder over the parser location of a node.
    pub fn over(cx: &'a Transpiler<'s>, loc: Option<Loc>, kind: NodeKind) -> Result<Self> {
        Ok(Self::new(cx, own_span(loc, kind)?))
    }

    pub fn window(&self) -> Span {
        self.window
    }

    pub fn transpiler(&self) -> &'a Transpiler<'s> {
        self.cx
    }

    pub fn add_insertion(&mut self, pos: usize, content: impl Into<String>) -> Result<()> {
        self.push(SliceReplacement::insertion(pos, content))
    }

    /// Replace `start..end` with `f` of its original text.
    pub fn add_replacement(
        &mut self,
        start: usize,
        end: usize,
        f: impl FnOnce(&str) -> String,
    ) -> Result<()> {
        let original = self.cx.script().slice(start, end)?;
        self.push(SliceReplacement::new(start, end, f(original)))
    }

    pub fn try_add_replacement(
        &mut self,
        start: usize,
        end: usize,
        f: impl FnOnce(&str) -> Result<String>,
    ) -> Result<()> {
        let original = self.cx.script().slice(start, end)?;
        self.push(SliceReplacement::new(start, end, f(original)?))
    }

    pub fn replace_with(&mut self, start: usize, end: usize, content: impl Into<String>) -> Result<()> {
        self.push(SliceReplacement::new(start, end, content))
    }

    /// Join the gap `start..end` onto one line. Empty gaps are skipped.
    pub fn neutralize(&mut self, start: usize, end: usize) -> Result<()> {
        if start == end {
            return Ok(());
        }
        self.add_replacement(start, end, neutralize_line_separators)
    }

    /// Rewrite `node` together with any parentheses around it.
    pub fn add_node(&mut self, node: &Node, ancestors: Ancestors<'_>) -> Result<()> {
        self.add_node_within(node, ancestors, None)
    }

    /// Like [`add_node`](Self::add_node), taking parentheses only from
    /// inside `limit`.
    pub fn add_node_within(
        &mut self,
        node: &Node,
        ancestors: Ancestors<'_>,
        limit: Option<Span>,
    ) -> Result<()> {
        let span = self.cx.actual_location_within(node, limit)?;
        let content = self.cx.rewrite_in_parens(node, ancestors, limit)?;
        self.push(SliceReplacement::new(span.lo, span.hi, content))
    }

    /// Rewrite `node` alone, leaving surrounding parentheses to the caller.
    pub fn add_bare_node(&mut self, node: &Node, ancestors: Ancestors<'_>) -> Result<()> {
        let span = self.cx.actual_location(node, false)?;
        let content = self.cx.rewrite(node, ancestors)?;
        self.push(SliceReplacement::new(span.lo, span.hi, content))
    }

    pub fn add_nodes<'n>(
        &mut self,
        nodes: impl IntoIterator<Item = &'n Node>,
        ancestors: Ancestors<'_>,
    ) -> Result<()> {
        for node in nodes {
            self.add_node(node, ancestors)?;
        }
        Ok(())
    }

    fn push(&mut self, replacement: SliceReplacement) -> Result<()> {
        let SliceReplacement { start, end, .. } = replacement;
        if start > end || start < self.window.lo || end > self.window.hi {
            return Err(TranspileError::OutOfRange {
                start,
                end,
                window_start: self.window.lo,
                window_end: self.window.hi,
            });
        }
        if let Some(other) = self
            .replacements
            .iter()
            .find(|other| start < other.end && other.start < end)
        {
            return Err(TranspileError::Overlap {
                start,
                end,
                other_start: other.start,
                other_end: other.end,
            });
        }
        self.end_offset += replacement.content.len() as isize - (end - start) as isize;
        self.replacements.push(replacement);
        Ok(())
    }

    /// The window's text with every edit applied.
    pub fn execute(self) -> Result<String> {
        let Span { lo, hi } = self.window;
        let text = self.cx.script().slice(lo, hi)?;
        let local: Vec<SliceReplacement> = self
            .replacements
            .into_iter()
            .map(|r| SliceReplacement::new(r.start - lo, r.end - lo, r.content))
            .collect();
        let out = apply_replacements(text, &local)?;
        debug_assert_eq!(out.len() as isize, (hi - lo) as isize + self.end_offset);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use avt_ast::Span;

    use super::*;

    #[test]
    fn edits_are_local_to_the_window() {
        let cx = Transpiler::new("let x = (\n\t0\n)").unwrap();
        let mut builder = ReplacementBuilder::new(&cx, Span::new(8, 14));
        builder.neutralize(9, 11).unwrap();
        builder.neutralize(12, 13).unwrap();
        assert_eq!(builder.execute().unwrap(), "( 0 )");
    }

    #[test]
    fn overlapping_edits_fail() {
        let cx = Transpiler::new("abcdef").unwrap();
        let mut builder = ReplacementBuilder::new(&cx, Span::new(0, 6));
        builder.replace_with(1, 3, "x").unwrap();
        let err = builder.replace_with(2, 4, "y").unwrap_err();
        assert_eq!(
            err,
            TranspileError::Overlap {
                start: 2,
                end: 4,
                other_start: 1,
                other_end: 3
            }
        );
    }

    #[test]
    fn insertions_may_touch_replacements() {
        let cx = Transpiler::new("a b").unwrap();
        let mut builder = ReplacementBuilder::new(&cx, Span::new(0, 3));
        builder.add_insertion(1, ",").unwrap();
        builder.replace_with(1, 2, "  ").unwrap();
        builder.add_insertion(2, "").unwrap();
        assert_eq!(builder.execute().unwrap(), "a,  b");
    }

    #[test]
    fn edits_outside_the_window_fail() {
        let cx = Transpiler::new("abcdef").unwrap();
        let mut builder = ReplacementBuilder::new(&cx, Span::new(2, 4));
        assert!(matches!(
            builder.add_insertion(5, "x"),
            Err(TranspileError::OutOfRange { .. })
        ));
    }
}
