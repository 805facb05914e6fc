//! # Parser
//!
//! Binding languages and parsing text into trees.
//!
//! ## Overview
//!
//! A [`Parser`] is a [`Language`] bound together with a
//! [`ParserConfig`] and a small cache of recent parses. Binding re-checks
//! the grammar format version, so a `Language` deserialized or constructed
//! for a different runtime is rejected up front with a
//! [`BindingError`] instead of misparsing later.
//!
//! Parsing never fails: [`Parser::parse`] always returns a
//! [`ParseResult`] whose tree spells out the input byte for byte, with
//! syntax problems collected alongside. [`Parser::parse_with`] additionally
//! reuses tokens from an edited previous tree.

mod engine;
mod recovery;

use crate::error::{BindingError, ParseError, ParseMetrics, ParseResult, ParseWarning};
use crate::incremental;
use crate::language::{Language, GRAMMAR_FORMAT_VERSION, MIN_COMPATIBLE_GRAMMAR_VERSION};
use crate::lexer::Lexer;
use crate::syntax::{GreenNode, Tree};
use lru::LruCache;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;

/// Tuning knobs for one parser.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Keep parsing after a syntax error.
    pub error_recovery: bool,
    /// Allow recovery to insert zero-width tokens for missing input.
    pub token_insertion: bool,
    /// Stop after this many syntax errors.
    pub max_errors: usize,
    /// Number of recent parses kept for reuse by text hash. Zero disables
    /// the cache.
    pub cache_capacity: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            error_recovery: true,
            token_insertion: true,
            max_errors: 100,
            cache_capacity: 32,
        }
    }
}

struct CachedParse {
    root: Arc<GreenNode>,
    errors: Vec<ParseError>,
    warnings: Vec<ParseWarning>,
}

/// A parser bound to one [`Language`].
pub struct Parser {
    lang: Language,
    config: ParserConfig,
    lexer: Lexer,
    cache: LruCache<u64, Arc<CachedParse>>,
}

impl Parser {
    /// Bind a language with the default configuration.
    ///
    /// # Errors
    ///
    /// [`BindingError::IncompatibleVersion`] when the language's grammar
    /// format version falls outside this runtime's supported window, and
    /// [`BindingError::InvalidLanguage`] when the language carries no
    /// usable automaton.
    pub fn bind(language: &Language) -> Result<Self, BindingError> {
        Self::with_config(language, ParserConfig::default())
    }

    /// Bind a language with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Same conditions as [`bind`](Self::bind).
    pub fn with_config(language: &Language, config: ParserConfig) -> Result<Self, BindingError> {
        let version = language.version();
        if version < MIN_COMPATIBLE_GRAMMAR_VERSION || version > GRAMMAR_FORMAT_VERSION {
            return Err(BindingError::IncompatibleVersion {
                name: language.name().to_string(),
                found: version,
                min: MIN_COMPATIBLE_GRAMMAR_VERSION,
                max: GRAMMAR_FORMAT_VERSION,
            });
        }
        if language.data().table().num_states() == 0 {
            return Err(BindingError::InvalidLanguage {
                name: language.name().to_string(),
                message: "automaton has no states".to_string(),
            });
        }

        let capacity = NonZeroUsize::new(config.cache_capacity.max(1))
            .unwrap_or(NonZeroUsize::MIN);
        Ok(Self {
            lang: language.clone(),
            lexer: Lexer::new(language),
            config,
            cache: LruCache::new(capacity),
        })
    }

    #[must_use]
    pub fn language(&self) -> &Language {
        &self.lang
    }

    #[must_use]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse `text` from scratch.
    pub fn parse(&mut self, text: &str) -> ParseResult {
        self.parse_with(text, None)
    }

    /// Parse `text`, reusing work from `old_tree` where possible.
    ///
    /// An old tree with recorded edits enables token-level reuse around the
    /// damaged region. An old tree without edits (or none at all) still
    /// benefits from the parse cache when the text was seen recently.
    pub fn parse_with(&mut self, text: &str, old_tree: Option<&Tree>) -> ParseResult {
        let started = Instant::now();
        let mut metrics = ParseMetrics::default();

        let caching = self.config.cache_capacity > 0;
        let key = text_key(text);
        if caching {
            if let Some(cached) = self.cache.get(&key) {
                metrics.cache_hits = 1;
                metrics.parse_time = started.elapsed();
                return ParseResult {
                    tree: Tree::new(cached.root.clone(), self.lang.clone()),
                    errors: cached.errors.clone(),
                    warnings: cached.warnings.clone(),
                    metrics,
                };
            }
        }

        let mut reused = 0usize;
        let (tokens, lex_errors) = old_tree
            .filter(|tree| tree.language() == &self.lang && !tree.edits().is_empty())
            .and_then(|tree| incremental::relex(&self.lexer, tree, text, &mut reused))
            .unwrap_or_else(|| self.lexer.scan(text));
        metrics.tokens_reused = reused;

        let output = engine::run(&self.lang, &tokens, &self.config);

        let mut errors: Vec<ParseError> = lex_errors.into_iter().map(Into::into).collect();
        errors.extend(output.errors);

        metrics.tokens_consumed = output.tokens_consumed;
        metrics.nodes_created = output.nodes_created;
        metrics.errors_recovered = output.errors_recovered;

        if caching {
            self.cache.put(
                key,
                Arc::new(CachedParse {
                    root: output.root.clone(),
                    errors: errors.clone(),
                    warnings: output.warnings.clone(),
                }),
            );
        }

        metrics.parse_time = started.elapsed();
        ParseResult {
            tree: Tree::new(output.root, self.lang.clone()),
            errors,
            warnings: output.warnings,
            metrics,
        }
    }
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("language", &self.lang.name())
            .field("config", &self.config)
            .finish()
    }
}

fn text_key(text: &str) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}
