//! # Syntax Trees
//!
//! Full-fidelity concrete syntax trees.
//!
//! ## Overview
//!
//! Trees come in two layers, following the green/red design:
//!
//! - **Green trees** ([`GreenNode`], [`GreenToken`]): immutable, position
//!   independent, shared via `Arc`. Identical subtrees are reused across
//!   tree revisions.
//! - **Red trees** ([`SyntaxNode`], [`SyntaxToken`]): positioned views with
//!   absolute byte ranges and parent pointers, materialized on demand while
//!   navigating.
//!
//! Every byte of the parsed input appears in exactly one token, trivia and
//! error-recovery debris included, so `tree.root().text()` reproduces the
//! input and child spans partition each node's span.
//!
//! Node kinds ([`SyntaxKind`]) are indices into the symbol table of the
//! [`Language`](crate::language::Language) that produced the tree; red
//! nodes resolve their names through it.

pub mod builder;
pub mod cursor;
pub mod green;
pub mod kind;
pub mod red;
pub mod text;
pub mod tree;

pub use builder::{BuilderError, GreenNodeBuilder};
pub use cursor::TreeCursor;
pub use green::{GreenElement, GreenNode, GreenToken};
pub use kind::SyntaxKind;
pub use red::{SyntaxAncestors, SyntaxChildren, SyntaxDescendants, SyntaxElement, SyntaxNode, SyntaxToken};
pub use text::{TextRange, TextSize};
pub use tree::Tree;
