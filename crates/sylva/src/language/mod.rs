//! # Languages
//!
//! Loading grammar artifacts into runtime [`Language`] values.
//!
//! ## Overview
//!
//! A [`GrammarArtifact`] is portable data: symbols, lexical classes, and
//! productions. [`Language::load`] validates it, compiles the shift/reduce
//! automaton and the lexer tables, and interns the symbol names. The
//! resulting `Language` is an immutable, cheaply cloneable handle that can
//! be shared across threads and bound to any number of
//! [`Parser`](crate::parser::Parser)s.
//!
//! Loading is strict: an artifact compiled for an unsupported format
//! version is rejected with [`LanguageError::IncompatibleVersion`], and any
//! structural defect (dangling symbol indices, duplicate names, grammar
//! conflicts) is rejected with [`LanguageError::LoadFailure`]. A `Language`
//! value is therefore always internally consistent.

pub mod artifact;
pub(crate) mod table;

pub use artifact::{
    GrammarArtifact, LexClass, LexSpec, ProductionSpec, SymbolClass, SymbolSpec,
    GRAMMAR_FORMAT_VERSION, MIN_COMPATIBLE_GRAMMAR_VERSION,
};

use crate::error::LanguageError;
use crate::lexer::LexTable;
use crate::syntax::SyntaxKind;
use hashbrown::{HashMap, HashSet};
use lasso::{Rodeo, RodeoReader, Spur};
use std::sync::Arc;
use table::ParseTable;

/// A loaded grammar, ready to be bound to a parser.
///
/// `Language` is a shared handle; cloning is an `Arc` bump. Two handles
/// compare equal when they refer to the same loaded grammar.
#[derive(Clone)]
pub struct Language {
    inner: Arc<LanguageData>,
}

pub(crate) struct LanguageData {
    name: String,
    version: u32,
    names: RodeoReader,
    index_of: HashMap<Spur, u16, ahash::RandomState>,
    symbols: Vec<SymbolInfo>,
    table: ParseTable,
    lex: LexTable,
    entry: u16,
}

pub(crate) struct SymbolInfo {
    name: Spur,
    class: SymbolClass,
    trivia: bool,
    hidden: bool,
    keyword: bool,
}

impl Language {
    /// Load a grammar artifact.
    ///
    /// # Errors
    ///
    /// [`LanguageError::IncompatibleVersion`] if the artifact's format
    /// version falls outside the supported window, and
    /// [`LanguageError::LoadFailure`] for any structural defect: dangling
    /// symbol indices, duplicate names, terminals without a lexical class,
    /// or a grammar the shift/reduce automaton cannot represent.
    pub fn load(artifact: &GrammarArtifact) -> Result<Self, LanguageError> {
        if artifact.version < MIN_COMPATIBLE_GRAMMAR_VERSION
            || artifact.version > GRAMMAR_FORMAT_VERSION
        {
            return Err(LanguageError::IncompatibleVersion {
                name: artifact.name.clone(),
                found: artifact.version,
                min: MIN_COMPATIBLE_GRAMMAR_VERSION,
                max: GRAMMAR_FORMAT_VERSION,
            });
        }
        Self::load_validated(artifact, artifact.version)
    }

    /// Load while recording a different format version on the result.
    /// Lets binding-compatibility paths be exercised without fabricating a
    /// whole artifact in an unsupported format.
    pub(crate) fn load_with_version(
        artifact: &GrammarArtifact,
        version: u32,
    ) -> Result<Self, LanguageError> {
        Self::load_validated(artifact, version)
    }

    fn load_validated(artifact: &GrammarArtifact, version: u32) -> Result<Self, LanguageError> {
        let name = artifact.name.clone();
        let fail = |message: String| LanguageError::load_failure(&name, message);

        if artifact.symbols.is_empty() {
            return Err(fail("grammar has no symbols".to_string()));
        }
        // two indices are reserved as automaton sentinels
        let max_symbols = usize::from(u16::MAX - 2);
        if artifact.symbols.len() > max_symbols {
            return Err(fail(format!(
                "grammar has {} symbols, the maximum is {max_symbols}",
                artifact.symbols.len()
            )));
        }

        let mut interner = Rodeo::new();
        let mut index_of: HashMap<Spur, u16, ahash::RandomState> = HashMap::default();
        let mut symbols = Vec::with_capacity(artifact.symbols.len());
        for (index, spec) in artifact.symbols.iter().enumerate() {
            if spec.name.is_empty() {
                return Err(fail(format!("symbol {index} has an empty name")));
            }
            let spur = interner.get_or_intern(&spec.name);
            let raw = u16::try_from(index).unwrap_or(u16::MAX);
            if index_of.insert(spur, raw).is_some() {
                return Err(fail(format!("duplicate symbol name `{}`", spec.name)));
            }
            if spec.trivia && !spec.is_terminal() {
                return Err(fail(format!(
                    "trivia symbol `{}` must be a terminal",
                    spec.name
                )));
            }
            symbols.push(SymbolInfo {
                name: spur,
                class: spec.class,
                trivia: spec.trivia,
                hidden: spec.hidden,
                keyword: false,
            });
        }

        let valid = |symbol: u16| usize::from(symbol) < artifact.symbols.len();

        let entry_spec = artifact
            .symbols
            .get(usize::from(artifact.entry))
            .ok_or_else(|| fail(format!("entry symbol {} is out of range", artifact.entry)))?;
        if entry_spec.is_terminal() {
            return Err(fail(format!(
                "entry symbol `{}` must be a non-terminal",
                entry_spec.name
            )));
        }
        if entry_spec.hidden {
            return Err(fail(format!(
                "entry symbol `{}` must not be hidden",
                entry_spec.name
            )));
        }

        let mut produced: HashSet<u16, ahash::RandomState> = HashSet::default();
        let mut referenced: HashSet<u16, ahash::RandomState> = HashSet::default();
        referenced.insert(artifact.entry);
        for (index, production) in artifact.productions.iter().enumerate() {
            let lhs = artifact
                .symbols
                .get(usize::from(production.lhs))
                .ok_or_else(|| fail(format!("production {index} has out-of-range lhs")))?;
            if lhs.is_terminal() {
                return Err(fail(format!(
                    "production {index} has terminal `{}` on the left-hand side",
                    lhs.name
                )));
            }
            produced.insert(production.lhs);
            for &symbol in &production.rhs {
                let spec = artifact
                    .symbols
                    .get(usize::from(symbol))
                    .ok_or_else(|| fail(format!("production {index} references symbol {symbol} out of range")))?;
                if spec.trivia {
                    return Err(fail(format!(
                        "trivia terminal `{}` cannot appear in a production",
                        spec.name
                    )));
                }
                if !spec.is_terminal() {
                    referenced.insert(symbol);
                }
            }
            if let Some(alias) = production.node {
                if !valid(alias) {
                    return Err(fail(format!(
                        "production {index} aliases to symbol {alias} out of range"
                    )));
                }
                let spec = &artifact.symbols[usize::from(alias)];
                if spec.hidden || spec.trivia {
                    return Err(fail(format!(
                        "production {index} aliases to `{}`, which cannot name a node",
                        spec.name
                    )));
                }
            }
        }
        for &symbol in &referenced {
            if !produced.contains(&symbol) {
                return Err(fail(format!(
                    "non-terminal `{}` has no productions",
                    artifact.symbols[usize::from(symbol)].name
                )));
            }
        }

        let lex = LexTable::compile(artifact).map_err(|message| fail(message))?;
        for spec in &artifact.lexemes {
            if matches!(spec.class, LexClass::Keyword(_)) {
                if let Some(info) = symbols.get_mut(usize::from(spec.terminal)) {
                    info.keyword = true;
                }
            }
        }

        let table = ParseTable::build(artifact).map_err(|message| fail(message))?;

        Ok(Self {
            inner: Arc::new(LanguageData {
                name,
                version,
                names: interner.into_reader(),
                index_of,
                symbols,
                table,
                lex,
                entry: artifact.entry,
            }),
        })
    }

    /// Grammar name, e.g. `"clickhouse"`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Grammar format version the language was compiled for.
    #[must_use]
    pub fn version(&self) -> u32 {
        self.inner.version
    }

    /// Number of symbols in the grammar.
    #[must_use]
    pub fn symbol_count(&self) -> usize {
        self.inner.symbols.len()
    }

    /// Kind of the grammar's entry non-terminal.
    #[must_use]
    pub fn entry_kind(&self) -> SyntaxKind {
        SyntaxKind::from_raw(self.inner.entry)
    }

    /// Name of a syntax kind, or `None` for out-of-range kinds.
    /// [`SyntaxKind::ERROR`] resolves to `"ERROR"`.
    #[must_use]
    pub fn kind_name(&self, kind: SyntaxKind) -> Option<&str> {
        if kind.is_error() {
            return Some("ERROR");
        }
        let info = self.inner.symbols.get(usize::from(kind.raw()))?;
        Some(self.inner.names.resolve(&info.name))
    }

    /// Look up a syntax kind by symbol name.
    #[must_use]
    pub fn kind_for_name(&self, name: &str) -> Option<SyntaxKind> {
        let spur = self.inner.names.get(name)?;
        self.inner
            .index_of
            .get(&spur)
            .map(|&raw| SyntaxKind::from_raw(raw))
    }

    #[must_use]
    pub fn is_terminal(&self, kind: SyntaxKind) -> bool {
        self.inner
            .symbols
            .get(usize::from(kind.raw()))
            .is_some_and(|s| matches!(s.class, SymbolClass::Terminal))
    }

    /// Whether tokens of this kind are trivia (whitespace, comments).
    #[must_use]
    pub fn is_trivia(&self, kind: SyntaxKind) -> bool {
        self.inner
            .symbols
            .get(usize::from(kind.raw()))
            .is_some_and(|s| s.trivia)
    }

    /// Whether this kind is a reserved word terminal.
    #[must_use]
    pub fn is_keyword(&self, kind: SyntaxKind) -> bool {
        self.inner
            .symbols
            .get(usize::from(kind.raw()))
            .is_some_and(|s| s.keyword)
    }

    /// Whether this kind never produces tree nodes of its own.
    #[must_use]
    pub fn is_hidden(&self, kind: SyntaxKind) -> bool {
        self.inner
            .symbols
            .get(usize::from(kind.raw()))
            .is_some_and(|s| s.hidden)
    }

    pub(crate) fn data(&self) -> &LanguageData {
        &self.inner
    }
}

impl LanguageData {
    pub(crate) fn table(&self) -> &ParseTable {
        &self.table
    }

    pub(crate) fn lex(&self) -> &LexTable {
        &self.lex
    }

    pub(crate) fn entry(&self) -> u16 {
        self.entry
    }

    pub(crate) fn is_hidden(&self, symbol: u16) -> bool {
        self.symbols
            .get(usize::from(symbol))
            .is_some_and(|s| s.hidden)
    }
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Language {}

impl std::fmt::Debug for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Language")
            .field("name", &self.inner.name)
            .field("version", &self.inner.version)
            .field("symbols", &self.inner.symbols.len())
            .finish()
    }
}
