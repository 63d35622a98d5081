//! The chain of nodes enclosing the node being rewritten.

use avt_ast::NodeKind;

/// One link of the chain. Frames live on the stack of the rewriting call that
/// pushed them.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    kind: NodeKind,
    parent: Option<&'a Frame<'a>>,
}

/// Innermost-first view of the enclosing nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ancestors<'a> {
    frame: Option<&'a Frame<'a>>,
}

impl<'a> Ancestors<'a> {
    pub fn root() -> Self {
        Self { frame: None }
    }

    /// A frame for `kind` whose parent is this chain. Wrap it with
    /// [`Ancestors::within`] to descend.
    pub fn push(self, kind: NodeKind) -> Frame<'a> {
        Frame {
            kind,
            parent: self.frame,
        }
    }

    pub fn within(frame: &'a Frame<'a>) -> Self {
        Self { frame: Some(frame) }
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeKind> + 'a {
        let mut frame = self.frame;
        std::iter::from_fn(move || {
            let current = frame?;
            frame = current.parent;
            Some(current.kind)
        })
    }

    pub fn innermost(&self) -> Option<NodeKind> {
        self.frame.map(|f| f.kind)
    }

    /// Whether a function literal encloses this point.
    pub fn has_fn(&self) -> bool {
        self.iter().any(|kind| kind == NodeKind::Fn)
    }

    /// Whether `break`/`continue` have a loop to act on: a `loop`, `for` or
    /// `each` encloses this point with no function literal in between.
    pub fn in_breakable(&self) -> bool {
        for kind in self.iter() {
            match kind {
                NodeKind::Loop | NodeKind::For | NodeKind::Each => return true,
                NodeKind::Fn => return false,
                _ => {}
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_empty() {
        let root = Ancestors::root();
        assert_eq!(root.iter().count(), 0);
        assert!(!root.has_fn());
        assert!(!root.in_breakable());
    }

    #[test]
    fn iterates_innermost_first() {
        let root = Ancestors::root();
        let loop_frame = root.push(NodeKind::Loop);
        let in_loop = Ancestors::within(&loop_frame);
        let if_frame = in_loop.push(NodeKind::If);
        let in_if = Ancestors::within(&if_frame);
        assert_eq!(
            in_if.iter().collect::<Vec<_>>(),
            vec![NodeKind::If, NodeKind::Loop]
        );
        assert_eq!(in_if.innermost(), Some(NodeKind::If));
        assert!(in_if.in_breakable());
    }

    #[test]
    fn function_boundary_hides_outer_loop() {
        let root = Ancestors::root();
        let each_frame = root.push(NodeKind::Each);
        let in_each = Ancestors::within(&each_frame);
        let fn_frame = in_each.push(NodeKind::Fn);
        let in_fn = Ancestors::within(&fn_frame);
        assert!(!in_fn.in_breakable());
        assert!(in_fn.has_fn());

        let for_frame = in_fn.push(NodeKind::For);
        assert!(Ancestors::within(&for_frame).in_breakable());
    }
}
