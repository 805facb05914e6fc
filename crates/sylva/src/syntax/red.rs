use crate::language::Language;
use crate::syntax::{GreenElement, GreenNode, GreenToken, SyntaxKind, TextRange, TextSize};
use std::fmt;
use std::sync::Arc;

/// A positioned view over a green node ("red" node).
///
/// Red nodes lazily pair a shared green node with its absolute byte offset
/// and a parent pointer, and resolve kind names through the language that
/// produced the tree. Cloning is cheap (a few `Arc` bumps).
#[derive(Clone)]
pub struct SyntaxNode {
    green: Arc<GreenNode>,
    parent: Option<Arc<SyntaxNode>>,
    index: u32,
    offset: TextSize,
    lang: Language,
}

/// A positioned view over a green token.
#[derive(Clone)]
pub struct SyntaxToken {
    green: GreenToken,
    parent: Arc<SyntaxNode>,
    index: u32,
    offset: TextSize,
}

/// Either a red node or a red token.
#[derive(Clone)]
pub enum SyntaxElement {
    Node(SyntaxNode),
    Token(SyntaxToken),
}

impl SyntaxNode {
    #[must_use]
    pub fn new_root(green: Arc<GreenNode>, lang: Language) -> Self {
        Self {
            green,
            parent: None,
            index: 0,
            offset: TextSize::zero(),
            lang,
        }
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        self.green.kind()
    }

    /// Human-readable kind name resolved through the language.
    #[must_use]
    pub fn kind_name(&self) -> &str {
        self.lang.kind_name(self.kind()).unwrap_or("ERROR")
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind().is_error()
    }

    /// Whether this node or any descendant is an error node.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.is_error()
            || self.descendants().any(|el| match el {
                SyntaxElement::Node(n) => n.is_error(),
                SyntaxElement::Token(_) => false,
            })
    }

    #[inline]
    #[must_use]
    pub fn text_range(&self) -> TextRange {
        TextRange::at(self.offset, self.green.text_len())
    }

    #[must_use]
    pub fn language(&self) -> &Language {
        &self.lang
    }

    #[must_use]
    pub fn green(&self) -> &Arc<GreenNode> {
        &self.green
    }

    /// The exact source text spanned by this node.
    #[must_use]
    pub fn text(&self) -> String {
        self.green.text()
    }

    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.parent.as_deref().cloned()
    }

    #[must_use]
    pub fn children(&self) -> SyntaxChildren {
        SyntaxChildren {
            parent: Arc::new(self.clone()),
            index: 0,
            offset: self.offset,
        }
    }

    /// Child nodes only, skipping tokens.
    pub fn child_nodes(&self) -> impl Iterator<Item = Self> {
        self.children().filter_map(SyntaxElement::into_node)
    }

    #[must_use]
    pub fn child_count(&self) -> usize {
        self.green.child_count()
    }

    #[must_use]
    pub fn first_child(&self) -> Option<SyntaxElement> {
        self.children().next()
    }

    #[must_use]
    pub fn last_child(&self) -> Option<SyntaxElement> {
        let count = self.child_count();
        if count == 0 {
            None
        } else {
            self.nth_child(count - 1)
        }
    }

    #[must_use]
    pub fn nth_child(&self, index: usize) -> Option<SyntaxElement> {
        if index >= self.child_count() {
            return None;
        }
        self.children().nth(index)
    }

    #[must_use]
    pub fn next_sibling(&self) -> Option<SyntaxElement> {
        let parent = self.parent()?;
        parent.nth_child(self.index as usize + 1)
    }

    #[must_use]
    pub fn prev_sibling(&self) -> Option<SyntaxElement> {
        if self.index == 0 {
            return None;
        }
        let parent = self.parent()?;
        parent.nth_child(self.index as usize - 1)
    }

    #[must_use]
    pub fn ancestors(&self) -> SyntaxAncestors {
        SyntaxAncestors {
            current: self.parent(),
        }
    }

    /// Preorder traversal of all descendant elements.
    #[must_use]
    pub fn descendants(&self) -> SyntaxDescendants {
        let mut stack: Vec<SyntaxElement> = self.children().collect();
        stack.reverse();
        SyntaxDescendants { stack }
    }

    /// Child nodes with the given kind.
    pub fn children_with_kind(&self, kind: SyntaxKind) -> impl Iterator<Item = Self> {
        self.child_nodes().filter(move |n| n.kind() == kind)
    }

    /// The deepest element whose range contains `offset`.
    #[must_use]
    pub fn element_at(&self, offset: TextSize) -> Option<SyntaxElement> {
        if !self.text_range().contains(offset) {
            return None;
        }
        let mut current = SyntaxElement::Node(self.clone());
        loop {
            let node = match &current {
                SyntaxElement::Node(n) => n.clone(),
                SyntaxElement::Token(_) => return Some(current),
            };
            let child = node
                .children()
                .find(|el| el.text_range().contains(offset));
            match child {
                Some(c) => current = c,
                None => return Some(current),
            }
        }
    }
}

impl fmt::Debug for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.kind_name(), self.text_range())
    }
}

impl PartialEq for SyntaxNode {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset && Arc::ptr_eq(&self.green, &other.green)
    }
}

impl Eq for SyntaxNode {}

impl SyntaxToken {
    #[inline]
    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        self.green.kind()
    }

    #[must_use]
    pub fn kind_name(&self) -> &str {
        self.parent.lang.kind_name(self.kind()).unwrap_or("ERROR")
    }

    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        self.green.text()
    }

    #[must_use]
    pub fn text_range(&self) -> TextRange {
        TextRange::at(self.offset, self.green.text_len())
    }

    #[must_use]
    pub fn parent(&self) -> SyntaxNode {
        (*self.parent).clone()
    }

    #[must_use]
    pub fn is_trivia(&self) -> bool {
        self.parent.lang.is_trivia(self.kind())
    }

    #[must_use]
    pub fn next_sibling(&self) -> Option<SyntaxElement> {
        self.parent.nth_child(self.index as usize + 1)
    }

    #[must_use]
    pub fn prev_sibling(&self) -> Option<SyntaxElement> {
        if self.index == 0 {
            return None;
        }
        self.parent.nth_child(self.index as usize - 1)
    }
}

impl fmt::Debug for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} {:?}", self.kind_name(), self.text_range(), self.text())
    }
}

impl SyntaxElement {
    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        match self {
            Self::Node(n) => n.kind(),
            Self::Token(t) => t.kind(),
        }
    }

    #[must_use]
    pub fn text_range(&self) -> TextRange {
        match self {
            Self::Node(n) => n.text_range(),
            Self::Token(t) => t.text_range(),
        }
    }

    #[must_use]
    pub fn into_node(self) -> Option<SyntaxNode> {
        match self {
            Self::Node(n) => Some(n),
            Self::Token(_) => None,
        }
    }

    #[must_use]
    pub fn into_token(self) -> Option<SyntaxToken> {
        match self {
            Self::Node(_) => None,
            Self::Token(t) => Some(t),
        }
    }

    #[must_use]
    pub const fn as_node(&self) -> Option<&SyntaxNode> {
        match self {
            Self::Node(n) => Some(n),
            Self::Token(_) => None,
        }
    }
}

impl fmt::Debug for SyntaxElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(n) => n.fmt(f),
            Self::Token(t) => t.fmt(f),
        }
    }
}

/// Iterator over the direct children of a node.
pub struct SyntaxChildren {
    parent: Arc<SyntaxNode>,
    index: u32,
    offset: TextSize,
}

impl Iterator for SyntaxChildren {
    type Item = SyntaxElement;

    fn next(&mut self) -> Option<SyntaxElement> {
        let green = self.parent.green.children().get(self.index as usize)?;
        let offset = self.offset;
        let index = self.index;
        self.offset += green.text_len();
        self.index += 1;

        Some(match green {
            GreenElement::Node(n) => SyntaxElement::Node(SyntaxNode {
                green: n.clone(),
                parent: Some(self.parent.clone()),
                index,
                offset,
                lang: self.parent.lang.clone(),
            }),
            GreenElement::Token(t) => SyntaxElement::Token(SyntaxToken {
                green: t.clone(),
                parent: self.parent.clone(),
                index,
                offset,
            }),
        })
    }
}

/// Iterator over a node's ancestors, nearest first.
pub struct SyntaxAncestors {
    current: Option<SyntaxNode>,
}

impl Iterator for SyntaxAncestors {
    type Item = SyntaxNode;

    fn next(&mut self) -> Option<SyntaxNode> {
        let node = self.current.take()?;
        self.current = node.parent();
        Some(node)
    }
}

/// Preorder iterator over all descendants of a node.
pub struct SyntaxDescendants {
    stack: Vec<SyntaxElement>,
}

impl Iterator for SyntaxDescendants {
    type Item = SyntaxElement;

    fn next(&mut self) -> Option<SyntaxElement> {
        let element = self.stack.pop()?;
        if let SyntaxElement::Node(node) = &element {
            let mut children: Vec<SyntaxElement> = node.children().collect();
            children.reverse();
            self.stack.extend(children);
        }
        Some(element)
    }
}
