use crate::syntax::{SyntaxKind, TextRange, TextSize};
use compact_str::CompactString;

/// One lexed token: kind, exact source text, and byte range.
///
/// Tokens carry their text verbatim, trivia and malformed input included,
/// so a token stream always reassembles into the input it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub text: CompactString,
    pub range: TextRange,
    /// For reserved words: the identifier kind this token falls back to in
    /// parse states that do not admit the keyword.
    pub(crate) ident_alt: Option<SyntaxKind>,
    pub(crate) trivia: bool,
}

impl Token {
    pub(crate) fn new(
        kind: SyntaxKind,
        text: impl Into<CompactString>,
        range: TextRange,
        trivia: bool,
    ) -> Self {
        Self {
            kind,
            text: text.into(),
            range,
            ident_alt: None,
            trivia,
        }
    }

    #[must_use]
    pub fn len(&self) -> TextSize {
        self.range.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Whitespace or comment token.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        self.trivia
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}@{:?}", self.text.as_str(), self.range)
    }
}
