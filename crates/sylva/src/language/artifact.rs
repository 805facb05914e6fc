#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Grammar artifact format version produced by current grammar packages.
pub const GRAMMAR_FORMAT_VERSION: u32 = 14;

/// Oldest artifact format version this runtime can still load.
pub const MIN_COMPATIBLE_GRAMMAR_VERSION: u32 = 13;

/// A precompiled grammar: the portable description a grammar package ships
/// and [`Language::load`](crate::language::Language::load) consumes.
///
/// The artifact is pure data — symbol inventory, lexical classes, and
/// productions. The shift/reduce automaton is compiled from it at load
/// time; nothing here is interpreted as a grammar-authoring DSL.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct GrammarArtifact {
    /// Grammar name, e.g. `"clickhouse"`.
    pub name: String,
    /// Format version the artifact was compiled for.
    pub version: u32,
    /// Symbol inventory; [`SyntaxKind`](crate::syntax::SyntaxKind) values
    /// index into this table.
    pub symbols: Vec<SymbolSpec>,
    /// Lexical class per terminal symbol.
    pub lexemes: Vec<LexSpec>,
    /// Production rules over symbol indices.
    pub productions: Vec<ProductionSpec>,
    /// Index of the entry non-terminal.
    pub entry: u16,
}

/// One entry in the grammar's symbol inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SymbolSpec {
    pub name: String,
    pub class: SymbolClass,
    /// Trivia terminals (whitespace, comments) are accepted between any two
    /// tokens and kept in the tree without participating in productions.
    pub trivia: bool,
    /// Hidden symbols never produce tree nodes; their children splice into
    /// the parent. By convention their names start with `_`.
    pub hidden: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum SymbolClass {
    Terminal,
    NonTerminal,
}

impl SymbolSpec {
    #[must_use]
    pub fn terminal(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class: SymbolClass::Terminal,
            trivia: false,
            hidden: false,
        }
    }

    #[must_use]
    pub fn non_terminal(name: impl Into<String>) -> Self {
        let name = name.into();
        let hidden = name.starts_with('_');
        Self {
            name,
            class: SymbolClass::NonTerminal,
            trivia: false,
            hidden,
        }
    }

    #[must_use]
    pub fn trivia(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class: SymbolClass::Terminal,
            trivia: true,
            hidden: false,
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self.class, SymbolClass::Terminal)
    }
}

/// Lexical class of one terminal symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct LexSpec {
    pub terminal: u16,
    pub class: LexClass,
}

/// How a terminal's lexeme is recognized in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum LexClass {
    /// Case-insensitive reserved word. A word lexes as this keyword only
    /// where the parse state admits it; elsewhere it stays an identifier.
    Keyword(String),
    /// Exact operator or punctuation text; longest match wins.
    Punct(String),
    /// `[A-Za-z_][A-Za-z0-9_]*`
    Identifier,
    /// Integer or float literal, optional exponent.
    Number,
    /// Quoted string (single or double quotes) with backslash escapes.
    String,
    /// ASCII whitespace run.
    Whitespace,
    /// Comment from the given prefix to end of line.
    LineComment(String),
    /// Comment between the given delimiters.
    BlockComment(String, String),
}

impl LexSpec {
    #[must_use]
    pub const fn new(terminal: u16, class: LexClass) -> Self {
        Self { terminal, class }
    }
}

/// One production rule, `lhs -> rhs`, over symbol indices.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ProductionSpec {
    pub lhs: u16,
    pub rhs: Vec<u16>,
    /// Node alias: reducing this production creates a node of this kind
    /// instead of `lhs`. Lets several stratified rules (precedence levels)
    /// all surface as one node kind, e.g. `binary_expression`.
    pub node: Option<u16>,
}

impl ProductionSpec {
    #[must_use]
    pub fn new(lhs: u16, rhs: Vec<u16>) -> Self {
        Self {
            lhs,
            rhs,
            node: None,
        }
    }

    /// An epsilon production, `lhs -> ε`.
    #[must_use]
    pub const fn empty(lhs: u16) -> Self {
        Self {
            lhs,
            rhs: Vec::new(),
            node: None,
        }
    }

    /// A production whose reduction is surfaced as `node` rather than `lhs`.
    #[must_use]
    pub fn aliased(lhs: u16, rhs: Vec<u16>, node: u16) -> Self {
        Self {
            lhs,
            rhs,
            node: Some(node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_spec_constructors() {
        let t = SymbolSpec::terminal("identifier");
        assert!(t.is_terminal());
        assert!(!t.trivia);

        let ws = SymbolSpec::trivia("whitespace");
        assert!(ws.is_terminal());
        assert!(ws.trivia);

        let nt = SymbolSpec::non_terminal("select_statement");
        assert!(!nt.is_terminal());
        assert!(!nt.hidden);

        // underscore prefix marks hidden symbols
        let hidden = SymbolSpec::non_terminal("_expression");
        assert!(hidden.hidden);
    }

    #[test]
    fn test_production_spec() {
        let p = ProductionSpec::new(5, vec![1, 2, 3]);
        assert_eq!(p.lhs, 5);
        assert_eq!(p.rhs.len(), 3);

        let e = ProductionSpec::empty(5);
        assert!(e.rhs.is_empty());
    }

    #[test]
    fn test_version_window() {
        assert!(MIN_COMPATIBLE_GRAMMAR_VERSION <= GRAMMAR_FORMAT_VERSION);
    }

    #[cfg(feature = "serialize")]
    #[test]
    fn test_artifact_json_round_trip() {
        let artifact = GrammarArtifact {
            name: "tiny".to_string(),
            version: GRAMMAR_FORMAT_VERSION,
            symbols: vec![
                SymbolSpec::trivia("whitespace"),
                SymbolSpec::terminal("identifier"),
                SymbolSpec::non_terminal("item"),
            ],
            lexemes: vec![
                LexSpec::new(0, LexClass::Whitespace),
                LexSpec::new(1, LexClass::Identifier),
            ],
            productions: vec![ProductionSpec::new(2, vec![1])],
            entry: 2,
        };
        let json = serde_json::to_string(&artifact).unwrap();
        let back: GrammarArtifact = serde_json::from_str(&json).unwrap();
        assert_eq!(back, artifact);
    }
}
