//! # Sylva
//!
//! A grammar-driven parsing runtime with full-fidelity syntax trees.
//!
//! ## Overview
//!
//! Sylva separates grammars from the parsing machinery. A grammar ships as
//! a [`GrammarArtifact`](language::GrammarArtifact): plain data describing
//! symbols, lexical classes, and productions. Loading it yields a
//! [`Language`](language::Language), binding that to a
//! [`Parser`](parser::Parser) yields trees:
//!
//! - **Strict loading**: format-version and structural checks up front; a
//!   loaded `Language` is always internally consistent.
//! - **Total parsing**: every parse returns a tree that reproduces the
//!   input byte for byte, with syntax errors collected alongside.
//! - **Green/red trees**: immutable shared green nodes, positioned red
//!   views materialized on demand.
//! - **Incremental reparsing**: recorded edits let the next parse reuse
//!   tokens outside the damaged region.
//!
//! ## Quick Start
//!
//! ```rust
//! use sylva::grammars::clickhouse;
//! use sylva::parser::Parser;
//!
//! let language = clickhouse::language().expect("bundled grammar loads");
//! let mut parser = Parser::bind(&language).expect("compatible runtime");
//!
//! let result = parser.parse("SELECT id, name FROM users LIMIT 10");
//! assert!(result.is_ok());
//! assert_eq!(result.tree.text(), "SELECT id, name FROM users LIMIT 10");
//!
//! let root = result.tree.root();
//! assert_eq!(root.kind_name(), "source_file");
//! ```
//!
//! ## Feature Flags
//!
//! - `diagnostics`: derive `miette::Diagnostic` on error types for rich
//!   terminal reports.
//! - `serialize`: serde support for grammar artifacts and text types.

pub mod error;
pub mod grammars;
pub mod incremental;
pub mod language;
pub mod lexer;
pub mod parser;
pub mod syntax;

pub use error::{
    BindingError, LanguageError, LexerError, ParseError, ParseMetrics, ParseResult, ParseWarning,
};
pub use incremental::InputEdit;
pub use language::{GrammarArtifact, Language};
pub use lexer::{Lexer, Token};
pub use parser::{Parser, ParserConfig};
pub use syntax::{
    SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken, TextRange, TextSize, Tree, TreeCursor,
};
