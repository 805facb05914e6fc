#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node or token kind within one loaded [`Language`].
///
/// Kinds are plain indices into the language's symbol table; the same
/// numeric kind means different things in different languages. Metadata
/// lookups (name, trivia, keyword) go through
/// [`Language`](crate::language::Language), which owns the symbol table the
/// kind indexes into.
///
/// The only language-independent kind is [`SyntaxKind::ERROR`], used for
/// nodes synthesized during error recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SyntaxKind(pub u16);

impl SyntaxKind {
    /// Kind of nodes wrapping input the parser could not make sense of.
    pub const ERROR: Self = Self(u16::MAX);

    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn is_error(self) -> bool {
        self.0 == u16::MAX
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_error() {
            write!(f, "ERROR")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind() {
        assert!(SyntaxKind::ERROR.is_error());
        assert!(!SyntaxKind::from_raw(0).is_error());
        assert_eq!(format!("{}", SyntaxKind::ERROR), "ERROR");
        assert_eq!(format!("{}", SyntaxKind::from_raw(3)), "#3");
    }

    #[test]
    fn test_raw_round_trip() {
        let kind = SyntaxKind::from_raw(17);
        assert_eq!(kind.raw(), 17);
        assert_eq!(SyntaxKind::from_raw(kind.raw()), kind);
    }
}
