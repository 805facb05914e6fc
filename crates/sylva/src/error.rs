//! # Error Types
//!
//! Error taxonomy for grammar loading, parser binding, lexing, and parsing.
//!
//! ## Overview
//!
//! Every fallible operation returns a discriminated `Result`; nothing in
//! this crate signals failure by panicking or unwinding. The types split by
//! phase:
//!
//! - [`LanguageError`]: a grammar artifact could not be loaded.
//! - [`BindingError`]: a loaded language could not be attached to a parser.
//! - [`LexerError`]: invalid input during tokenization.
//! - [`ParseError`] / [`ParseWarning`]: syntax problems reported inside a
//!   [`ParseResult`] — the parse itself always completes and yields a tree.
//!
//! With the `diagnostics` feature enabled, errors derive
//! `miette::Diagnostic` for rich reporting with source spans.

use crate::syntax::TextRange;
use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// Failure to load a grammar artifact into a [`Language`](crate::language::Language).
///
/// Loading is all-or-nothing: on any failure no `Language` value exists, so
/// a partially usable grammar can never escape.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum LanguageError {
    #[error(
        "grammar `{name}` uses format version {found}, but this runtime supports {min}..={max}"
    )]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(language::incompatible_version)))]
    IncompatibleVersion {
        name: String,
        found: u32,
        min: u32,
        max: u32,
    },

    #[error("failed to load grammar `{name}`: {message}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(language::load_failure)))]
    LoadFailure { name: String, message: String },
}

impl LanguageError {
    pub(crate) fn load_failure(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LoadFailure {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Failure to bind a [`Language`](crate::language::Language) to a
/// [`Parser`](crate::parser::Parser).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum BindingError {
    #[error(
        "language `{name}` was compiled for grammar format {found}, but this runtime supports {min}..={max}"
    )]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(binding::incompatible_version)))]
    IncompatibleVersion {
        name: String,
        found: u32,
        min: u32,
        max: u32,
    },

    #[error("language `{name}` cannot be bound: {message}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(binding::invalid_language)))]
    InvalidLanguage { name: String, message: String },
}

/// Lexer error with location information
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
#[error("{kind}")]
pub struct LexerError {
    #[cfg_attr(feature = "diagnostics", label)]
    pub span: TextRange,
    #[source]
    pub kind: LexerErrorKind,
}

/// Types of lexer errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum LexerErrorKind {
    #[error("unexpected character: '{char}'")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::unexpected_char)))]
    UnexpectedChar { char: char },

    #[error("unterminated string literal")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::unterminated_string)))]
    UnterminatedString,

    #[error("unterminated block comment")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::unterminated_comment)))]
    UnterminatedBlockComment,
}

impl LexerError {
    #[must_use]
    pub const fn new(span: TextRange, kind: LexerErrorKind) -> Self {
        Self { span, kind }
    }

    #[must_use]
    pub const fn span(&self) -> TextRange {
        self.span
    }

    #[must_use]
    pub const fn kind(&self) -> &LexerErrorKind {
        &self.kind
    }
}

/// A syntax error recorded during parsing.
///
/// Parse errors never abort the parse; they accumulate in the
/// [`ParseResult`] while recovery keeps the tree full-fidelity.
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum ParseError {
    #[error("unexpected token {found}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parser::unexpected_token)))]
    UnexpectedToken {
        #[cfg_attr(feature = "diagnostics", label("unexpected token"))]
        span: TextRange,
        found: String,
        expected: Vec<String>,
    },

    #[error("unexpected end of file")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parser::unexpected_eof)))]
    UnexpectedEof {
        #[cfg_attr(feature = "diagnostics", label("expected more input"))]
        span: TextRange,
        expected: Vec<String>,
    },

    #[error("invalid syntax")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parser::invalid_syntax)))]
    InvalidSyntax {
        #[cfg_attr(feature = "diagnostics", label)]
        span: TextRange,
        message: String,
    },
}

impl ParseError {
    /// Get the span (location) of this error
    #[must_use]
    pub const fn span(&self) -> TextRange {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::UnexpectedEof { span, .. }
            | Self::InvalidSyntax { span, .. } => *span,
        }
    }

    /// Format expected tokens as a human-readable list
    #[must_use]
    pub fn format_expected(&self) -> String {
        match self {
            Self::UnexpectedToken { expected, .. } | Self::UnexpectedEof { expected, .. } => {
                format_expected_list(expected)
            }
            Self::InvalidSyntax { .. } => String::new(),
        }
    }
}

impl From<LexerError> for ParseError {
    fn from(err: LexerError) -> Self {
        Self::InvalidSyntax {
            span: err.span,
            message: err.kind.to_string(),
        }
    }
}

/// Format a list of expected tokens as a human-readable string
#[must_use]
pub fn format_expected_list(expected: &[String]) -> String {
    match expected.len() {
        0 => "nothing".to_string(),
        1 => expected[0].clone(),
        2 => format!("{} or {}", expected[0], expected[1]),
        _ => {
            let mut result = expected[..expected.len() - 1].join(", ");
            result.push_str(", or ");
            result.push_str(&expected[expected.len() - 1]);
            result
        }
    }
}

/// A recoverable issue noted during parsing (recovery actions, mostly).
#[derive(Debug, Clone)]
pub struct ParseWarning {
    pub span: TextRange,
    pub message: String,
    pub severity: Severity,
}

impl ParseWarning {
    #[must_use]
    pub const fn new(span: TextRange, message: String, severity: Severity) -> Self {
        Self {
            span,
            message,
            severity,
        }
    }

    #[must_use]
    pub const fn warning(span: TextRange, message: String) -> Self {
        Self::new(span, message, Severity::Warning)
    }

    #[must_use]
    pub const fn info(span: TextRange, message: String) -> Self {
        Self::new(span, message, Severity::Info)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Info,
    Hint,
}

/// Counters collected while parsing.
#[derive(Debug, Default, Clone)]
pub struct ParseMetrics {
    pub tokens_consumed: usize,
    pub tokens_reused: usize,
    pub nodes_created: usize,
    pub errors_recovered: usize,
    pub parse_time: std::time::Duration,
    pub cache_hits: usize,
}

/// Outcome of one parse: the tree plus everything noted along the way.
///
/// A parse always yields a tree; `errors` being empty is what "success"
/// means.
#[derive(Debug)]
pub struct ParseResult {
    pub tree: crate::syntax::Tree,
    pub errors: Vec<ParseError>,
    pub warnings: Vec<ParseWarning>,
    pub metrics: ParseMetrics,
}

impl ParseResult {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}
