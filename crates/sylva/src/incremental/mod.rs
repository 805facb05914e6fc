//! # Incremental Reparsing
//!
//! Token reuse across edits.
//!
//! ## Overview
//!
//! An edited [`Tree`](crate::syntax::Tree) carries [`InputEdit`]s
//! describing where the text changed.
//! [`Parser::parse_with`](crate::parser::Parser::parse_with) uses them to
//! avoid relexing the whole input: tokens before and after the damaged
//! region are lifted out of the old tree, only the region between them is
//! scanned again, and the three runs are spliced into one stream. The
//! damaged region is widened to token boundaries, plus one token on the
//! trailing side to catch edits that merge adjacent tokens.
//!
//! Reuse is best-effort: anything surprising (several edits, inconsistent
//! coordinates, an edit that could glue tokens together) falls back to a
//! full scan, which is always correct.

use crate::lexer::{Lexer, Token};
use crate::syntax::{GreenElement, GreenNode, SyntaxKind, TextRange, TextSize, Tree};

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// One contiguous text splice: bytes `start..old_end` of the old text were
/// replaced by bytes `start..new_end` of the new text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct InputEdit {
    pub start: TextSize,
    pub old_end: TextSize,
    pub new_end: TextSize,
}

impl InputEdit {
    #[must_use]
    pub const fn new(start: TextSize, old_end: TextSize, new_end: TextSize) -> Self {
        Self {
            start,
            old_end,
            new_end,
        }
    }

    /// An insertion of `len` bytes at `offset`.
    #[must_use]
    pub fn insert(offset: TextSize, len: TextSize) -> Self {
        Self::new(offset, offset, offset + len)
    }

    /// A deletion of the given range.
    #[must_use]
    pub fn delete(range: TextRange) -> Self {
        Self::new(range.start(), range.end(), range.start())
    }

    /// A replacement of `range` with `len` new bytes.
    #[must_use]
    pub fn replace(range: TextRange, len: TextSize) -> Self {
        Self::new(range.start(), range.end(), range.start() + len)
    }
}

/// Relex `new_text` reusing tokens from `old_tree` where the single
/// recorded edit left them untouched. Returns `None` when reuse is not
/// safe; the caller then does a full scan. On success `reused` is set to
/// the number of tokens lifted from the old tree.
pub(crate) fn relex(
    lexer: &Lexer,
    old_tree: &Tree,
    new_text: &str,
    reused: &mut usize,
) -> Option<(Vec<Token>, Vec<crate::error::LexerError>)> {
    let [edit] = old_tree.edits() else {
        return None;
    };

    let old_len = old_tree.len();
    if edit.start > edit.old_end || edit.start > edit.new_end || edit.old_end > old_len {
        return None;
    }
    let removed = edit.old_end - edit.start;
    let added = edit.new_end - edit.start;
    if old_len - removed + added != TextSize::of(new_text) {
        return None;
    }

    let old_tokens = tokens_of_tree(old_tree);

    let prefix_len = old_tokens
        .iter()
        .take_while(|token| token.range.end() < edit.start)
        .count();

    let mut suffix_index = old_tokens
        .iter()
        .position(|token| token.range.start() > edit.old_end)
        .unwrap_or(old_tokens.len());
    // one extra token on the trailing side guards against merges
    suffix_index = (suffix_index + 1).min(old_tokens.len());
    if suffix_index < prefix_len {
        return None;
    }

    let prefix_end = old_tokens[..prefix_len]
        .last()
        .map_or(TextSize::zero(), |token| token.range.end());
    let suffix_old_start = old_tokens
        .get(suffix_index)
        .map_or(old_len, |token| token.range.start());
    let suffix_new_start = suffix_old_start - removed + added;
    if suffix_new_start < prefix_end || suffix_new_start > TextSize::of(new_text) {
        return None;
    }

    // an edit that butts word characters together would have merged tokens
    let boundary = usize::try_from(suffix_new_start.into()).ok()?;
    let bytes = new_text.as_bytes();
    if boundary > 0
        && boundary < bytes.len()
        && is_word_byte(bytes[boundary - 1])
        && is_word_byte(bytes[boundary])
    {
        return None;
    }

    let middle_slice =
        new_text.get(usize::try_from(prefix_end.into()).ok()?..boundary)?;
    let (middle, errors) = lexer.scan_at(middle_slice, prefix_end);
    // an unterminated literal would swallow the reused suffix in a full lex
    if !errors.is_empty() && suffix_index < old_tokens.len() {
        return None;
    }

    let mut tokens = Vec::with_capacity(prefix_len + middle.len() + old_tokens.len() - suffix_index);
    tokens.extend_from_slice(&old_tokens[..prefix_len]);
    tokens.extend(middle);
    for token in &old_tokens[suffix_index..] {
        let mut shifted = token.clone();
        let start = token.range.start() - removed + added;
        shifted.range = TextRange::new(start, start + token.range.len());
        tokens.push(shifted);
    }

    *reused = prefix_len + (old_tokens.len() - suffix_index);
    Some((tokens, errors))
}

/// Identifier, number and keyword lexemes are made of these bytes; two of
/// them meeting across a splice point means the edit merged tokens.
const fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Reconstruct the token stream from a tree's green leaves. Zero-width
/// tokens left behind by recovery are dropped; they are not part of the
/// input.
pub(crate) fn tokens_of_tree(tree: &Tree) -> Vec<Token> {
    let lang = tree.language().clone();
    let ident_alt = lang
        .data()
        .lex()
        .identifier_terminal()
        .map(SyntaxKind::from_raw);
    let mut tokens = Vec::new();
    let mut offset = TextSize::zero();
    collect_leaves(tree.green(), &mut offset, &mut |kind, text, range| {
        let mut token = Token::new(kind, text, range, lang.is_trivia(kind));
        if lang.is_keyword(kind) {
            token.ident_alt = ident_alt;
        }
        tokens.push(token);
    });
    tokens
}

fn collect_leaves(
    node: &GreenNode,
    offset: &mut TextSize,
    sink: &mut impl FnMut(SyntaxKind, &str, TextRange),
) {
    for child in node.children() {
        match child {
            GreenElement::Node(inner) => collect_leaves(inner, offset, sink),
            GreenElement::Token(token) => {
                let len = token.text_len();
                if len != TextSize::zero() {
                    sink(token.kind(), token.text(), TextRange::at(*offset, len));
                }
                *offset += len;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_edit_constructors() {
        let insert = InputEdit::insert(TextSize::from(4), TextSize::from(3));
        assert_eq!(insert.start, TextSize::from(4));
        assert_eq!(insert.old_end, TextSize::from(4));
        assert_eq!(insert.new_end, TextSize::from(7));

        let delete = InputEdit::delete(TextRange::new(TextSize::from(2), TextSize::from(5)));
        assert_eq!(delete.old_end, TextSize::from(5));
        assert_eq!(delete.new_end, TextSize::from(2));

        let replace = InputEdit::replace(
            TextRange::new(TextSize::from(2), TextSize::from(5)),
            TextSize::from(1),
        );
        assert_eq!(replace.new_end, TextSize::from(3));
    }

    #[test]
    fn test_word_byte_classification() {
        for b in [b'a', b'Z', b'0', b'9', b'_'] {
            assert!(is_word_byte(b));
        }
        for b in [b' ', b'\n', b'(', b')', b',', b'+', b'\'', b'.'] {
            assert!(!is_word_byte(b));
        }
    }
}
