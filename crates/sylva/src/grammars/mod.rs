//! # Bundled Grammars
//!
//! Grammar artifacts shipped with the crate.
//!
//! Each submodule exposes a `grammar()` function returning the
//! [`GrammarArtifact`](crate::language::GrammarArtifact) and a
//! `language()` convenience that loads it.

pub mod clickhouse;

use crate::language::{
    GrammarArtifact, LexClass, LexSpec, ProductionSpec, SymbolSpec, GRAMMAR_FORMAT_VERSION,
};

/// Internal helper for assembling artifacts symbol by symbol. Not part of
/// the public API; artifacts are plain data and this only keeps the
/// bundled transcriptions readable.
pub(crate) struct ArtifactAssembler {
    name: String,
    symbols: Vec<SymbolSpec>,
    lexemes: Vec<LexSpec>,
    productions: Vec<ProductionSpec>,
}

impl ArtifactAssembler {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbols: Vec::new(),
            lexemes: Vec::new(),
            productions: Vec::new(),
        }
    }

    fn add_symbol(&mut self, spec: SymbolSpec) -> u16 {
        let raw = u16::try_from(self.symbols.len()).unwrap_or(u16::MAX);
        self.symbols.push(spec);
        raw
    }

    pub(crate) fn trivia(&mut self, name: &str, class: LexClass) -> u16 {
        let raw = self.add_symbol(SymbolSpec::trivia(name));
        self.lexemes.push(LexSpec::new(raw, class));
        raw
    }

    /// Attach an extra lexical class to an existing trivia terminal, e.g.
    /// line and block comments sharing one `comment` kind.
    pub(crate) fn extra_class(&mut self, terminal: u16, class: LexClass) {
        self.lexemes.push(LexSpec::new(terminal, class));
    }

    pub(crate) fn terminal(&mut self, name: &str, class: LexClass) -> u16 {
        let raw = self.add_symbol(SymbolSpec::terminal(name));
        self.lexemes.push(LexSpec::new(raw, class));
        raw
    }

    pub(crate) fn keyword(&mut self, word: &str) -> u16 {
        self.terminal(word, LexClass::Keyword(word.to_string()))
    }

    pub(crate) fn punct(&mut self, text: &str) -> u16 {
        self.terminal(text, LexClass::Punct(text.to_string()))
    }

    pub(crate) fn non_terminal(&mut self, name: &str) -> u16 {
        self.add_symbol(SymbolSpec::non_terminal(name))
    }

    pub(crate) fn rule(&mut self, lhs: u16, rhs: &[u16]) {
        self.productions.push(ProductionSpec::new(lhs, rhs.to_vec()));
    }

    pub(crate) fn aliased_rule(&mut self, lhs: u16, rhs: &[u16], node: u16) {
        self.productions
            .push(ProductionSpec::aliased(lhs, rhs.to_vec(), node));
    }

    pub(crate) fn empty_rule(&mut self, lhs: u16) {
        self.productions.push(ProductionSpec::empty(lhs));
    }

    pub(crate) fn finish(self, entry: u16) -> GrammarArtifact {
        GrammarArtifact {
            name: self.name,
            version: GRAMMAR_FORMAT_VERSION,
            symbols: self.symbols,
            lexemes: self.lexemes,
            productions: self.productions,
            entry,
        }
    }
}
