use crate::syntax::{GreenElement, GreenNode, GreenToken, SyntaxKind, TextSize};
use smallvec::SmallVec;
use std::sync::Arc;
use thiserror::Error;

/// Error that can occur when building a syntax tree
#[derive(Debug, Clone, Error)]
pub enum BuilderError {
    #[error("builder must have exactly one root node, but found {stack_size} nodes on stack")]
    InvalidStackSize { stack_size: usize },

    #[error("finish_node() called without a matching start_node()")]
    UnmatchedFinishNode,

    #[error("token() called without a parent node; call start_node() first")]
    TokenWithoutParent,
}

/// Bottom-up builder for green syntax trees.
///
/// Nodes open with [`start_node`](Self::start_node), collect tokens and
/// reused subtrees, and close with [`finish_node`](Self::finish_node).
/// Exactly one root must remain when [`finish`](Self::finish) is called.
///
/// The parse engine assembles green nodes directly from reduction
/// elements; the builder is the construction surface for embedders that
/// produce trees from some other source.
pub struct GreenNodeBuilder {
    stack: SmallVec<[NodeInProgress; 8]>,
}

struct NodeInProgress {
    kind: SyntaxKind,
    children: SmallVec<[GreenElement; 4]>,
    text_len: TextSize,
}

impl GreenNodeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stack: SmallVec::new(),
        }
    }

    pub fn start_node(&mut self, kind: SyntaxKind) {
        self.stack.push(NodeInProgress {
            kind,
            children: SmallVec::new(),
            text_len: TextSize::zero(),
        });
    }

    /// Finish the current node and add it to its parent.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no open node to finish.
    pub fn finish_node(&mut self) -> Result<(), BuilderError> {
        let node = self.stack.pop().ok_or(BuilderError::UnmatchedFinishNode)?;
        let green = GreenNode::new(node.kind, node.children, node.text_len);

        if let Some(parent) = self.stack.last_mut() {
            parent.text_len += green.text_len();
            parent.children.push(GreenElement::Node(green));
        } else {
            // Root closed with no parent; keep it as a finished single-entry
            // stack so finish() can return it.
            self.stack.push(NodeInProgress {
                kind: green.kind(),
                children: green.children().iter().cloned().collect(),
                text_len: green.text_len(),
            });
        }
        Ok(())
    }

    /// Add a token to the current node.
    ///
    /// # Errors
    ///
    /// Returns an error if no node is open.
    pub fn token(
        &mut self,
        kind: SyntaxKind,
        text: impl Into<compact_str::CompactString>,
    ) -> Result<(), BuilderError> {
        let token = GreenToken::new(kind, text);
        let text_len = token.text_len();

        let parent = self
            .stack
            .last_mut()
            .ok_or(BuilderError::TokenWithoutParent)?;
        parent.text_len += text_len;
        parent.children.push(GreenElement::Token(token));
        Ok(())
    }

    /// Add a pre-built subtree to the current node, sharing it with
    /// whatever tree it came from.
    ///
    /// # Errors
    ///
    /// Returns an error if no node is open.
    pub fn reuse_node(&mut self, node: Arc<GreenNode>) -> Result<(), BuilderError> {
        let parent = self
            .stack
            .last_mut()
            .ok_or(BuilderError::TokenWithoutParent)?;
        parent.text_len += node.text_len();
        parent.children.push(GreenElement::Node(node));
        Ok(())
    }

    /// Finish building and return the root node.
    ///
    /// # Errors
    ///
    /// Returns an error unless exactly one node remains on the stack, which
    /// typically means unmatched `start_node()`/`finish_node()` calls.
    pub fn finish(mut self) -> Result<Arc<GreenNode>, BuilderError> {
        if self.stack.len() != 1 {
            return Err(BuilderError::InvalidStackSize {
                stack_size: self.stack.len(),
            });
        }
        let root = self.stack.pop().ok_or(BuilderError::UnmatchedFinishNode)?;
        Ok(GreenNode::new(root.kind, root.children, root.text_len))
    }
}

impl Default for GreenNodeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: SyntaxKind = SyntaxKind(10);
    const EXPR: SyntaxKind = SyntaxKind(11);
    const IDENT: SyntaxKind = SyntaxKind(1);
    const PLUS: SyntaxKind = SyntaxKind(2);

    #[test]
    fn test_build_flat_tree() {
        let mut builder = GreenNodeBuilder::new();
        builder.start_node(ROOT);
        builder.token(IDENT, "x").unwrap();
        builder.token(PLUS, "+").unwrap();
        builder.token(IDENT, "y").unwrap();

        let root = builder.finish().unwrap();
        assert_eq!(root.kind(), ROOT);
        assert_eq!(root.child_count(), 3);
        assert_eq!(root.text(), "x+y");
    }

    #[test]
    fn test_build_nested_tree() {
        let mut builder = GreenNodeBuilder::new();
        builder.start_node(ROOT);
        builder.start_node(EXPR);
        builder.token(IDENT, "a").unwrap();
        builder.finish_node().unwrap();
        builder.token(PLUS, "+").unwrap();

        let root = builder.finish().unwrap();
        assert_eq!(root.child_count(), 2);
        assert_eq!(root.text(), "a+");
        assert_eq!(root.children()[0].kind(), EXPR);
    }

    #[test]
    fn test_reuse_node() {
        let reused = GreenNode::from_children(
            EXPR,
            vec![GreenElement::Token(GreenToken::new(IDENT, "cached"))],
        );

        let mut builder = GreenNodeBuilder::new();
        builder.start_node(ROOT);
        builder.reuse_node(reused).unwrap();

        let root = builder.finish().unwrap();
        assert_eq!(root.text(), "cached");
    }

    #[test]
    fn test_token_without_parent() {
        let mut builder = GreenNodeBuilder::new();
        assert!(matches!(
            builder.token(IDENT, "x"),
            Err(BuilderError::TokenWithoutParent)
        ));
    }

    #[test]
    fn test_unmatched_finish_node() {
        let mut builder = GreenNodeBuilder::new();
        assert!(matches!(
            builder.finish_node(),
            Err(BuilderError::UnmatchedFinishNode)
        ));
    }

    #[test]
    fn test_finish_with_open_nodes() {
        let mut builder = GreenNodeBuilder::new();
        builder.start_node(ROOT);
        builder.start_node(EXPR);
        assert!(matches!(
            builder.finish(),
            Err(BuilderError::InvalidStackSize { stack_size: 2 })
        ));
    }
}
