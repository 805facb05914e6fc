use crate::incremental::InputEdit;
use crate::language::Language;
use crate::syntax::{GreenNode, SyntaxNode, TextSize, TreeCursor};
use std::sync::Arc;

/// A concrete syntax tree produced by one parse.
///
/// The tree owns its immutable green root and the [`Language`] that parsed
/// it. Pending [`InputEdit`]s recorded with [`edit`](Self::edit) are picked
/// up by [`Parser::parse_with`](crate::parser::Parser::parse_with) to reuse
/// unaffected tokens on the next parse.
#[derive(Clone)]
pub struct Tree {
    green: Arc<GreenNode>,
    lang: Language,
    edits: Vec<InputEdit>,
}

impl Tree {
    pub(crate) fn new(green: Arc<GreenNode>, lang: Language) -> Self {
        Self {
            green,
            lang,
            edits: Vec::new(),
        }
    }

    /// Red root node of the tree.
    #[must_use]
    pub fn root(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone(), self.lang.clone())
    }

    #[must_use]
    pub fn language(&self) -> &Language {
        &self.lang
    }

    #[must_use]
    pub fn green(&self) -> &Arc<GreenNode> {
        &self.green
    }

    /// Total byte length of the parsed text.
    #[must_use]
    pub fn len(&self) -> TextSize {
        self.green.text_len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == TextSize::zero()
    }

    /// Reconstruct the full source text from the tree's tokens.
    #[must_use]
    pub fn text(&self) -> String {
        self.green.text()
    }

    /// Record a text splice to apply on the next incremental reparse.
    pub fn edit(&mut self, edit: InputEdit) {
        self.edits.push(edit);
    }

    /// Edits recorded since this tree was produced.
    #[must_use]
    pub fn edits(&self) -> &[InputEdit] {
        &self.edits
    }

    /// Depth-first cursor positioned at the root.
    #[must_use]
    pub fn walk(&self) -> TreeCursor {
        TreeCursor::new(self.root())
    }
}

impl std::fmt::Debug for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tree")
            .field("language", &self.lang.name())
            .field("len", &self.len())
            .field("pending_edits", &self.edits.len())
            .finish()
    }
}
