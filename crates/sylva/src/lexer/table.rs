//! Lexer tables compiled from a grammar artifact's lexical classes.

use crate::language::artifact::{GrammarArtifact, LexClass};
use hashbrown::HashMap;

/// Compiled lexical classes: keyword map, punctuation list sorted for
/// longest match, and the singleton classes (identifier, number, string,
/// whitespace) resolved to their terminal indices.
#[derive(Debug)]
pub(crate) struct LexTable {
    pub(crate) keywords: HashMap<String, u16, ahash::RandomState>,
    /// Sorted by text length, longest first.
    pub(crate) puncts: Vec<(String, u16)>,
    pub(crate) identifier: Option<u16>,
    pub(crate) number: Option<u16>,
    pub(crate) string: Option<u16>,
    pub(crate) whitespace: Option<u16>,
    pub(crate) line_comments: Vec<(String, u16)>,
    /// (open, close, terminal) triples.
    pub(crate) block_comments: Vec<(String, String, u16)>,
}

impl LexTable {
    /// Compile the lexical classes of `artifact`, validating that every
    /// terminal is covered by exactly one class (comment classes may share
    /// a terminal) and that trivia terminals only carry whitespace or
    /// comment classes.
    pub(crate) fn compile(artifact: &GrammarArtifact) -> Result<Self, String> {
        let mut table = Self {
            keywords: HashMap::default(),
            puncts: Vec::new(),
            identifier: None,
            number: None,
            string: None,
            whitespace: None,
            line_comments: Vec::new(),
            block_comments: Vec::new(),
        };

        // terminal -> (has a non-comment class, has a comment class)
        let mut claimed: HashMap<u16, (bool, bool), ahash::RandomState> = HashMap::default();

        for spec in &artifact.lexemes {
            let symbol = artifact
                .symbols
                .get(usize::from(spec.terminal))
                .ok_or_else(|| format!("lexeme references symbol {} out of range", spec.terminal))?;
            if !symbol.is_terminal() {
                return Err(format!(
                    "lexeme references non-terminal `{}`",
                    symbol.name
                ));
            }

            let comment = matches!(
                spec.class,
                LexClass::LineComment(_) | LexClass::BlockComment(..)
            );
            let trivia_class = comment || matches!(spec.class, LexClass::Whitespace);
            if symbol.trivia != trivia_class {
                return Err(if symbol.trivia {
                    format!(
                        "trivia terminal `{}` must have a whitespace or comment class",
                        symbol.name
                    )
                } else {
                    format!(
                        "terminal `{}` has a trivia class but is not marked trivia",
                        symbol.name
                    )
                });
            }

            let entry = claimed.entry(spec.terminal).or_insert((false, false));
            if comment {
                entry.1 = true;
            } else {
                if entry.0 || entry.1 {
                    return Err(format!(
                        "terminal `{}` has more than one lexical class",
                        symbol.name
                    ));
                }
                entry.0 = true;
            }

            match &spec.class {
                LexClass::Keyword(word) => {
                    if word.is_empty() {
                        return Err(format!("keyword for `{}` is empty", symbol.name));
                    }
                    let lower = word.to_ascii_lowercase();
                    if table.keywords.insert(lower, spec.terminal).is_some() {
                        return Err(format!("duplicate keyword `{word}`"));
                    }
                }
                LexClass::Punct(text) => {
                    if text.is_empty() {
                        return Err(format!("punctuation for `{}` is empty", symbol.name));
                    }
                    if table.puncts.iter().any(|(existing, _)| existing == text) {
                        return Err(format!("duplicate punctuation `{text}`"));
                    }
                    table.puncts.push((text.clone(), spec.terminal));
                }
                LexClass::Identifier => {
                    set_singleton(&mut table.identifier, spec.terminal, "identifier")?;
                }
                LexClass::Number => {
                    set_singleton(&mut table.number, spec.terminal, "number")?;
                }
                LexClass::String => {
                    set_singleton(&mut table.string, spec.terminal, "string")?;
                }
                LexClass::Whitespace => {
                    set_singleton(&mut table.whitespace, spec.terminal, "whitespace")?;
                }
                LexClass::LineComment(prefix) => {
                    if prefix.is_empty() {
                        return Err(format!("line comment prefix for `{}` is empty", symbol.name));
                    }
                    table.line_comments.push((prefix.clone(), spec.terminal));
                }
                LexClass::BlockComment(open, close) => {
                    if open.is_empty() || close.is_empty() {
                        return Err(format!(
                            "block comment delimiters for `{}` are empty",
                            symbol.name
                        ));
                    }
                    table
                        .block_comments
                        .push((open.clone(), close.clone(), spec.terminal));
                }
            }
        }

        for (index, symbol) in artifact.symbols.iter().enumerate() {
            if symbol.is_terminal() {
                let raw = u16::try_from(index).unwrap_or(u16::MAX);
                if !claimed.contains_key(&raw) {
                    return Err(format!("terminal `{}` has no lexical class", symbol.name));
                }
            }
        }

        // longest match first
        table.puncts.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Ok(table)
    }

    /// Terminal a reserved word falls back to outside keyword positions.
    pub(crate) fn identifier_terminal(&self) -> Option<u16> {
        self.identifier
    }
}

fn set_singleton(slot: &mut Option<u16>, terminal: u16, what: &str) -> Result<(), String> {
    if slot.replace(terminal).is_some() {
        return Err(format!("more than one {what} class in grammar"));
    }
    Ok(())
}
