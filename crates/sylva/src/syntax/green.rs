use crate::syntax::{SyntaxKind, TextSize};
use compact_str::CompactString;
use smallvec::SmallVec;
use std::sync::Arc;

/// Threshold for switching from inline to Arc storage
const INLINE_CHILDREN_THRESHOLD: usize = 8;

/// Immutable, shareable green tree node.
///
/// Green nodes store kinds and text lengths but no absolute positions, so
/// identical subtrees can be shared between trees (and between revisions of
/// the same tree after an incremental reparse).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GreenNode {
    kind: SyntaxKind,
    text_len: TextSize,
    children: GreenChildren,
}

/// Children storage specialized by arity.
///
/// - `Empty`: no allocation
/// - `One`: single child inline (common for wrapper nodes)
/// - `Inline`: up to 8 children without a separate heap block
/// - `Many`: shared slice for wide nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GreenChildren {
    Empty,
    One(Box<GreenElement>),
    Inline(SmallVec<[GreenElement; 8]>),
    Many(Arc<[GreenElement]>),
}

/// A leaf of the green tree: one lexed token with its exact source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GreenToken {
    kind: SyntaxKind,
    text: CompactString,
}

/// Either a node or a token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GreenElement {
    Node(Arc<GreenNode>),
    Token(GreenToken),
}

impl GreenNode {
    /// Create a new green node.
    ///
    /// # Panics
    ///
    /// Panics if the iterator reports a length of 1 but `next()` returns `None`.
    #[must_use]
    pub fn new<I>(kind: SyntaxKind, children: I, text_len: TextSize) -> Arc<Self>
    where
        I: IntoIterator<Item = GreenElement>,
        I::IntoIter: ExactSizeIterator,
    {
        let mut iter = children.into_iter();
        let len = iter.len();
        let children = match len {
            0 => GreenChildren::Empty,
            1 => GreenChildren::One(Box::new(iter.next().unwrap())),
            2..=INLINE_CHILDREN_THRESHOLD => GreenChildren::Inline(iter.collect()),
            _ => GreenChildren::Many(Arc::from(iter.collect::<Vec<_>>())),
        };

        Arc::new(Self {
            kind,
            text_len,
            children,
        })
    }

    /// Create a node computing `text_len` from its children.
    #[must_use]
    pub fn from_children(kind: SyntaxKind, children: Vec<GreenElement>) -> Arc<Self> {
        let text_len = children
            .iter()
            .fold(TextSize::zero(), |acc, c| acc + c.text_len());
        Self::new(kind, children, text_len)
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> SyntaxKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub const fn text_len(&self) -> TextSize {
        self.text_len
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[GreenElement] {
        match &self.children {
            GreenChildren::Empty => &[],
            GreenChildren::One(child) => std::slice::from_ref(child),
            GreenChildren::Inline(children) => children,
            GreenChildren::Many(children) => children,
        }
    }

    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self.children, GreenChildren::Empty)
    }

    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    /// Iterate over child kinds without touching full elements.
    pub fn child_kinds(&self) -> impl Iterator<Item = SyntaxKind> + '_ {
        self.children().iter().map(GreenElement::kind)
    }

    /// Find the first child with the given kind.
    #[must_use]
    pub fn first_child_by_kind(&self, kind: SyntaxKind) -> Option<&GreenElement> {
        self.children().iter().find(|c| c.kind() == kind)
    }

    /// Rebuild this node with extra children appended at the end.
    ///
    /// Used by the parse engine to attach trailing trivia to the root.
    #[must_use]
    pub fn with_appended(&self, extra: Vec<GreenElement>) -> Arc<Self> {
        if extra.is_empty() {
            return Arc::new(self.clone());
        }
        let mut children: Vec<GreenElement> = self.children().to_vec();
        let mut text_len = self.text_len;
        for element in extra {
            text_len += element.text_len();
            children.push(element);
        }
        Self::new(self.kind, children, text_len)
    }

    /// Aggregate the text of all tokens under this node.
    #[must_use]
    pub fn text(&self) -> String {
        let mut buf = String::new();
        self.collect_text(&mut buf);
        buf
    }

    fn collect_text(&self, buf: &mut String) {
        for child in self.children() {
            match child {
                GreenElement::Node(n) => n.collect_text(buf),
                GreenElement::Token(t) => buf.push_str(t.text()),
            }
        }
    }
}

impl GreenToken {
    #[must_use]
    pub fn new(kind: SyntaxKind, text: impl Into<CompactString>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> SyntaxKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn text_len(&self) -> TextSize {
        TextSize::of(&self.text)
    }
}

impl GreenElement {
    #[must_use]
    pub const fn node(node: Arc<GreenNode>) -> Self {
        Self::Node(node)
    }

    #[must_use]
    pub const fn token(token: GreenToken) -> Self {
        Self::Token(token)
    }

    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        match self {
            Self::Node(n) => n.kind(),
            Self::Token(t) => t.kind(),
        }
    }

    #[must_use]
    pub fn text_len(&self) -> TextSize {
        match self {
            Self::Node(n) => n.text_len(),
            Self::Token(t) => t.text_len(),
        }
    }

    #[must_use]
    pub const fn as_node(&self) -> Option<&Arc<GreenNode>> {
        match self {
            Self::Node(n) => Some(n),
            Self::Token(_) => None,
        }
    }

    #[must_use]
    pub const fn as_token(&self) -> Option<&GreenToken> {
        match self {
            Self::Node(_) => None,
            Self::Token(t) => Some(t),
        }
    }
}

impl From<GreenToken> for GreenElement {
    fn from(token: GreenToken) -> Self {
        Self::Token(token)
    }
}

impl From<Arc<GreenNode>> for GreenElement {
    fn from(node: Arc<GreenNode>) -> Self {
        Self::Node(node)
    }
}
