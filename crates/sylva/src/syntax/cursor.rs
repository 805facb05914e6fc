use crate::syntax::{SyntaxElement, SyntaxNode, TextRange};

/// Stateful depth-first cursor over a syntax tree.
///
/// A cursor is positioned on one element at a time and moves with
/// `goto_*` methods that return whether the move happened. This mirrors
/// how editor integrations walk trees: no allocation per step, and the
/// cursor can always climb back out with [`goto_parent`](Self::goto_parent).
pub struct TreeCursor {
    root: SyntaxNode,
    current: SyntaxElement,
}

impl TreeCursor {
    #[must_use]
    pub fn new(root: SyntaxNode) -> Self {
        let current = SyntaxElement::Node(root.clone());
        Self { root, current }
    }

    /// The element the cursor is currently positioned on.
    #[must_use]
    pub const fn element(&self) -> &SyntaxElement {
        &self.current
    }

    /// The node the cursor is on, if it is not on a token.
    #[must_use]
    pub const fn node(&self) -> Option<&SyntaxNode> {
        self.current.as_node()
    }

    #[must_use]
    pub fn text_range(&self) -> TextRange {
        self.current.text_range()
    }

    /// Move to the first child of the current node.
    ///
    /// Returns `false` (without moving) when positioned on a token or a
    /// childless node.
    pub fn goto_first_child(&mut self) -> bool {
        let Some(node) = self.current.as_node() else {
            return false;
        };
        match node.first_child() {
            Some(child) => {
                self.current = child;
                true
            }
            None => false,
        }
    }

    /// Move to the next sibling of the current element.
    pub fn goto_next_sibling(&mut self) -> bool {
        let next = match &self.current {
            SyntaxElement::Node(n) => n.next_sibling(),
            SyntaxElement::Token(t) => t.next_sibling(),
        };
        match next {
            Some(sibling) => {
                self.current = sibling;
                true
            }
            None => false,
        }
    }

    /// Move to the parent of the current element.
    ///
    /// Returns `false` at the root.
    pub fn goto_parent(&mut self) -> bool {
        let parent = match &self.current {
            SyntaxElement::Node(n) => n.parent(),
            SyntaxElement::Token(t) => Some(t.parent()),
        };
        match parent {
            Some(parent) => {
                self.current = SyntaxElement::Node(parent);
                true
            }
            None => false,
        }
    }

    /// Advance in preorder: first child, else next sibling, else the next
    /// sibling of the nearest ancestor that has one.
    ///
    /// Returns `false` once the whole tree has been visited.
    pub fn goto_next(&mut self) -> bool {
        if self.goto_first_child() {
            return true;
        }
        loop {
            if self.goto_next_sibling() {
                return true;
            }
            if !self.goto_parent() {
                return false;
            }
        }
    }

    /// Reset the cursor to the root node.
    pub fn reset(&mut self) {
        self.current = SyntaxElement::Node(self.root.clone());
    }
}
