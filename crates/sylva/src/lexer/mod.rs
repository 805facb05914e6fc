//! # Lexer
//!
//! Table-driven tokenization.
//!
//! ## Overview
//!
//! The lexer is compiled from the grammar artifact's lexical classes at
//! load time; there is no per-language lexer code. Reserved words are
//! matched case-insensitively and carry an identifier fallback, which the
//! parser uses to let keywords double as plain identifiers in positions
//! where the grammar does not reserve them.
//!
//! Lexing is total: malformed input (stray characters, unterminated
//! strings) still produces tokens covering every byte, alongside the
//! recorded [`LexerError`]s, so downstream trees stay full fidelity.

mod table;
mod token;

pub(crate) use table::LexTable;
pub use token::Token;

use crate::error::{LexerError, LexerErrorKind};
use crate::language::Language;
use crate::syntax::{SyntaxKind, TextRange, TextSize};
use memchr::{memchr, memmem};

/// Tokenizer for one [`Language`].
#[derive(Debug, Clone)]
pub struct Lexer {
    lang: Language,
}

impl Lexer {
    #[must_use]
    pub fn new(language: &Language) -> Self {
        Self {
            lang: language.clone(),
        }
    }

    /// Tokenize `text`, failing on the first lexical error.
    ///
    /// The strict entry point for embedders that want tokens without a
    /// parse, e.g. syntax highlighting or input validation.
    ///
    /// # Errors
    ///
    /// The first [`LexerError`] encountered. Parsing paths use the lenient
    /// scanner instead and recover.
    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>, LexerError> {
        let (tokens, mut errors) = self.scan(text);
        if errors.is_empty() {
            Ok(tokens)
        } else {
            Err(errors.remove(0))
        }
    }

    /// Lenient scan: every byte of `text` lands in some token, lexical
    /// errors are reported on the side.
    pub(crate) fn scan(&self, text: &str) -> (Vec<Token>, Vec<LexerError>) {
        self.scan_at(text, TextSize::zero())
    }

    /// Scan a slice that starts at absolute offset `base`.
    pub(crate) fn scan_at(&self, text: &str, base: TextSize) -> (Vec<Token>, Vec<LexerError>) {
        let table = self.lang.data().lex();
        let bytes = text.as_bytes();
        let mut tokens = Vec::new();
        let mut errors = Vec::new();
        let mut pos = 0usize;

        let abs = |start: usize, end: usize| {
            TextRange::new(
                base + TextSize::of_usize(start),
                base + TextSize::of_usize(end),
            )
        };

        while pos < bytes.len() {
            let rest = &text[pos..];
            let start = pos;

            // whitespace
            if let Some(ws) = table.whitespace {
                if bytes[pos].is_ascii_whitespace() {
                    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                        pos += 1;
                    }
                    tokens.push(self.token(ws, &text[start..pos], abs(start, pos)));
                    continue;
                }
            }

            // comments, before punctuation: `--` must not lex as two minuses
            if let Some((terminal, len)) = scan_line_comment(table, rest) {
                pos += len;
                tokens.push(self.token(terminal, &text[start..pos], abs(start, pos)));
                continue;
            }
            if let Some((terminal, len, terminated)) = scan_block_comment(table, rest) {
                pos += len;
                if !terminated {
                    errors.push(LexerError::new(
                        abs(start, pos),
                        LexerErrorKind::UnterminatedBlockComment,
                    ));
                }
                tokens.push(self.token(terminal, &text[start..pos], abs(start, pos)));
                continue;
            }

            // string literals
            if let Some(string) = table.string {
                let quote = bytes[pos];
                if quote == b'\'' || quote == b'"' {
                    let (len, terminated) = scan_string(&bytes[pos..], quote);
                    pos += len;
                    if !terminated {
                        errors.push(LexerError::new(
                            abs(start, pos),
                            LexerErrorKind::UnterminatedString,
                        ));
                    }
                    tokens.push(self.token(string, &text[start..pos], abs(start, pos)));
                    continue;
                }
            }

            // numbers
            if let Some(number) = table.number {
                if bytes[pos].is_ascii_digit() {
                    pos += scan_number(&bytes[pos..]);
                    tokens.push(self.token(number, &text[start..pos], abs(start, pos)));
                    continue;
                }
            }

            // identifiers and reserved words
            if bytes[pos].is_ascii_alphabetic() || bytes[pos] == b'_' {
                while pos < bytes.len()
                    && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_')
                {
                    pos += 1;
                }
                let word = &text[start..pos];
                let lower = word.to_ascii_lowercase();
                if let Some(&keyword) = table.keywords.get(&lower) {
                    let mut token = self.token(keyword, word, abs(start, pos));
                    token.ident_alt = table
                        .identifier_terminal()
                        .map(SyntaxKind::from_raw);
                    tokens.push(token);
                    continue;
                }
                if let Some(identifier) = table.identifier {
                    tokens.push(self.token(identifier, word, abs(start, pos)));
                    continue;
                }
                // no identifier class: fall through to the error path below
                pos = start;
            }

            // punctuation, longest match first
            if let Some(&(ref punct, terminal)) =
                table.puncts.iter().find(|(p, _)| rest.starts_with(p))
            {
                pos += punct.len();
                tokens.push(self.token(terminal, punct.as_str(), abs(start, pos)));
                continue;
            }

            // nothing matched: one character becomes an error token
            let ch = rest.chars().next().unwrap_or('\u{fffd}');
            pos += ch.len_utf8();
            errors.push(LexerError::new(
                abs(start, pos),
                LexerErrorKind::UnexpectedChar { char: ch },
            ));
            tokens.push(Token::new(
                SyntaxKind::ERROR,
                &text[start..pos],
                abs(start, pos),
                false,
            ));
        }

        (tokens, errors)
    }

    fn token(&self, terminal: u16, text: &str, range: TextRange) -> Token {
        let kind = SyntaxKind::from_raw(terminal);
        Token::new(kind, text, range, self.lang.is_trivia(kind))
    }
}

fn scan_line_comment(table: &LexTable, rest: &str) -> Option<(u16, usize)> {
    for (prefix, terminal) in &table.line_comments {
        if rest.starts_with(prefix.as_str()) {
            let len = memchr(b'\n', rest.as_bytes()).unwrap_or(rest.len());
            return Some((*terminal, len));
        }
    }
    None
}

fn scan_block_comment(table: &LexTable, rest: &str) -> Option<(u16, usize, bool)> {
    for (open, close, terminal) in &table.block_comments {
        if rest.starts_with(open.as_str()) {
            let body = &rest.as_bytes()[open.len()..];
            return Some(match memmem::find(body, close.as_bytes()) {
                Some(at) => (*terminal, open.len() + at + close.len(), true),
                None => (*terminal, rest.len(), false),
            });
        }
    }
    None
}

/// Length of a quoted literal starting at `bytes[0]`, and whether the
/// closing quote was found. Backslash escapes the next byte.
fn scan_string(bytes: &[u8], quote: u8) -> (usize, bool) {
    let mut pos = 1usize;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos = (pos + 2).min(bytes.len()),
            b if b == quote => return (pos + 1, true),
            _ => pos += 1,
        }
    }
    (bytes.len(), false)
}

/// Length of a numeric literal: digits, optional fraction, optional
/// exponent.
fn scan_number(bytes: &[u8]) -> usize {
    let mut pos = 0usize;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos + 1 < bytes.len() && bytes[pos] == b'.' && bytes[pos + 1].is_ascii_digit() {
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
    }
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut exp = pos + 1;
        if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
            exp += 1;
        }
        if exp < bytes.len() && bytes[exp].is_ascii_digit() {
            pos = exp;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
        }
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{
        GrammarArtifact, LexClass, LexSpec, ProductionSpec, SymbolSpec, GRAMMAR_FORMAT_VERSION,
    };

    fn test_language() -> Language {
        // terminals: 0 ws, 1 comment, 2 identifier, 3 number, 4 string,
        // 5 SELECT, 6 FROM, 7 "(", 8 ")", 9 ",", 10 "<=", 11 "<"
        let artifact = GrammarArtifact {
            name: "lex-test".to_string(),
            version: GRAMMAR_FORMAT_VERSION,
            symbols: vec![
                SymbolSpec::trivia("whitespace"),
                SymbolSpec::trivia("comment"),
                SymbolSpec::terminal("identifier"),
                SymbolSpec::terminal("number"),
                SymbolSpec::terminal("string_literal"),
                SymbolSpec::terminal("SELECT"),
                SymbolSpec::terminal("FROM"),
                SymbolSpec::terminal("("),
                SymbolSpec::terminal(")"),
                SymbolSpec::terminal(","),
                SymbolSpec::terminal("<="),
                SymbolSpec::terminal("<"),
                SymbolSpec::non_terminal("source_file"),
            ],
            lexemes: vec![
                LexSpec::new(0, LexClass::Whitespace),
                LexSpec::new(1, LexClass::LineComment("--".to_string())),
                LexSpec::new(1, LexClass::BlockComment("/*".to_string(), "*/".to_string())),
                LexSpec::new(2, LexClass::Identifier),
                LexSpec::new(3, LexClass::Number),
                LexSpec::new(4, LexClass::String),
                LexSpec::new(5, LexClass::Keyword("SELECT".to_string())),
                LexSpec::new(6, LexClass::Keyword("FROM".to_string())),
                LexSpec::new(7, LexClass::Punct("(".to_string())),
                LexSpec::new(8, LexClass::Punct(")".to_string())),
                LexSpec::new(9, LexClass::Punct(",".to_string())),
                LexSpec::new(10, LexClass::Punct("<=".to_string())),
                LexSpec::new(11, LexClass::Punct("<".to_string())),
            ],
            productions: vec![ProductionSpec::new(12, vec![5, 2])],
            entry: 12,
        };
        Language::load(&artifact).unwrap()
    }

    fn kinds(tokens: &[Token]) -> Vec<u16> {
        tokens.iter().map(|t| t.kind.raw()).collect()
    }

    #[test]
    fn test_keywords_case_insensitive() {
        let lexer = Lexer::new(&test_language());
        let tokens = lexer.tokenize("select SELECT SeLeCt").unwrap();
        assert_eq!(kinds(&tokens), vec![5, 0, 5, 0, 5]);
        // text is preserved verbatim
        assert_eq!(tokens[4].text, "SeLeCt");
        // keywords carry the identifier fallback
        assert_eq!(tokens[0].ident_alt, Some(SyntaxKind::from_raw(2)));
    }

    #[test]
    fn test_identifiers_and_numbers() {
        let lexer = Lexer::new(&test_language());
        let tokens = lexer.tokenize("foo _bar42 12 3.25 1e9 2.5E-3").unwrap();
        assert_eq!(kinds(&tokens), vec![2, 0, 2, 0, 3, 0, 3, 0, 3, 0, 3]);
        assert_eq!(tokens[10].text, "2.5E-3");
        assert_eq!(tokens[0].ident_alt, None);
    }

    #[test]
    fn test_punct_longest_match() {
        let lexer = Lexer::new(&test_language());
        let tokens = lexer.tokenize("<=<").unwrap();
        assert_eq!(kinds(&tokens), vec![10, 11]);
    }

    #[test]
    fn test_comments_are_trivia() {
        let lexer = Lexer::new(&test_language());
        let tokens = lexer
            .tokenize("foo -- trailing\n/* block */ bar")
            .unwrap();
        assert_eq!(kinds(&tokens), vec![2, 0, 1, 0, 1, 0, 2]);
        assert!(tokens[2].is_trivia());
        assert_eq!(tokens[2].text, "-- trailing");
        assert_eq!(tokens[4].text, "/* block */");
    }

    #[test]
    fn test_string_literals() {
        let lexer = Lexer::new(&test_language());
        let tokens = lexer.tokenize(r#"'it''s' "q\"uoted""#).unwrap();
        assert_eq!(kinds(&tokens), vec![4, 4, 0, 4]);
        assert_eq!(tokens[3].text, r#""q\"uoted""#);
    }

    #[test]
    fn test_unterminated_string() {
        let lexer = Lexer::new(&test_language());
        let err = lexer.tokenize("'oops").unwrap_err();
        assert_eq!(err.kind(), &LexerErrorKind::UnterminatedString);

        // the lenient path still covers every byte
        let (tokens, errors) = lexer.scan("'oops");
        assert_eq!(errors.len(), 1);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "'oops");
    }

    #[test]
    fn test_unexpected_char_becomes_error_token() {
        let lexer = Lexer::new(&test_language());
        let (tokens, errors) = lexer.scan("foo # bar");
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0].kind(),
            LexerErrorKind::UnexpectedChar { char: '#' }
        ));
        assert_eq!(tokens[2].kind, SyntaxKind::ERROR);
        let joined: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(joined, "foo # bar");
    }

    #[test]
    fn test_scan_at_offsets_ranges() {
        let lexer = Lexer::new(&test_language());
        let (tokens, _) = lexer.scan_at("foo", TextSize::from(10));
        assert_eq!(
            tokens[0].range,
            TextRange::new(TextSize::from(10), TextSize::from(13))
        );
    }

    #[test]
    fn test_tokens_partition_input() {
        let lexer = Lexer::new(&test_language());
        let text = "SELECT a, b FROM t -- done";
        let tokens = lexer.tokenize(text).unwrap();
        let mut offset = TextSize::zero();
        for token in &tokens {
            assert_eq!(token.range.start(), offset);
            offset = token.range.end();
        }
        assert_eq!(offset, TextSize::of(text));
    }
}
