//! The shift/reduce loop.
//!
//! The engine drives the compiled automaton over a token stream and builds
//! the green tree directly on the parse stack: every stack entry carries
//! the green elements produced since the previous entry, so a reduce just
//! drains the top `n` entries into a node. Trivia never reaches the
//! automaton; it buffers in `pending` and attaches in front of the next
//! shifted token, which keeps every input byte in the tree.

use crate::error::{ParseError, ParseWarning};
use crate::language::table::{Action, ParseTable, EOF};
use crate::language::Language;
use crate::lexer::Token;
use crate::parser::{recovery, ParserConfig};
use crate::syntax::{GreenElement, GreenNode, GreenToken, SyntaxKind, TextRange, TextSize};
use std::sync::Arc;

pub(crate) struct EngineOutput {
    pub root: Arc<GreenNode>,
    pub errors: Vec<ParseError>,
    pub warnings: Vec<ParseWarning>,
    pub tokens_consumed: usize,
    pub nodes_created: usize,
    pub errors_recovered: usize,
}

pub(crate) fn run(lang: &Language, tokens: &[Token], config: &ParserConfig) -> EngineOutput {
    Engine::new(lang, tokens, config).run()
}

struct StackEntry {
    state: u32,
    /// Green elements produced since the previous stack entry.
    elements: Vec<GreenElement>,
}

struct Engine<'a> {
    lang: &'a Language,
    table: &'a ParseTable,
    config: &'a ParserConfig,
    tokens: &'a [Token],
    pos: usize,
    stack: Vec<StackEntry>,
    /// Trivia and error debris waiting for the next shift.
    pending: Vec<GreenElement>,
    errors: Vec<ParseError>,
    warnings: Vec<ParseWarning>,
    nodes_created: usize,
    errors_recovered: usize,
    /// Position where a token was last inserted; blocks a second insertion
    /// at the same spot so recovery always makes progress.
    last_insert: Option<usize>,
}

impl<'a> Engine<'a> {
    fn new(lang: &'a Language, tokens: &'a [Token], config: &'a ParserConfig) -> Self {
        Self {
            lang,
            table: lang.data().table(),
            config,
            tokens,
            pos: 0,
            stack: vec![StackEntry {
                state: 0,
                elements: Vec::new(),
            }],
            pending: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
            nodes_created: 0,
            errors_recovered: 0,
            last_insert: None,
        }
    }

    fn run(mut self) -> EngineOutput {
        loop {
            self.buffer_leading();
            let state = self.state();
            let lookahead = self.lookahead(state);
            match self.table.action(state, lookahead) {
                Some(Action::Shift(next)) => {
                    if !self.shift(next, lookahead) {
                        break;
                    }
                }
                Some(Action::Reduce(production)) => {
                    if !self.reduce(production) {
                        break;
                    }
                }
                Some(Action::Accept) => break,
                None => {
                    if !self.recover(state) {
                        break;
                    }
                }
            }
        }
        self.finish()
    }

    fn state(&self) -> u32 {
        self.stack.last().map_or(0, |entry| entry.state)
    }

    /// Move trivia and lexer error tokens into the pending buffer.
    fn buffer_leading(&mut self) {
        while let Some(token) = self.tokens.get(self.pos) {
            if token.is_trivia() {
                self.pending.push(GreenElement::Token(GreenToken::new(
                    token.kind,
                    token.text.as_str(),
                )));
            } else if token.kind.is_error() {
                let leaf = GreenToken::new(SyntaxKind::ERROR, token.text.as_str());
                self.pending.push(GreenElement::Node(GreenNode::from_children(
                    SyntaxKind::ERROR,
                    vec![GreenElement::Token(leaf)],
                )));
                self.nodes_created += 1;
            } else {
                break;
            }
            self.pos += 1;
        }
    }

    /// Resolve the lookahead terminal, falling back from a reserved word to
    /// its identifier kind where the state does not admit the keyword.
    fn lookahead(&self, state: u32) -> u16 {
        let Some(token) = self.tokens.get(self.pos) else {
            return EOF;
        };
        let kind = token.kind.raw();
        if self.table.action(state, kind).is_some() {
            return kind;
        }
        if let Some(alt) = token.ident_alt {
            if self.table.action(state, alt.raw()).is_some() {
                return alt.raw();
            }
        }
        kind
    }

    fn shift(&mut self, next: u32, resolved: u16) -> bool {
        let Some(token) = self.tokens.get(self.pos) else {
            return false;
        };
        let mut elements = std::mem::take(&mut self.pending);
        elements.push(GreenElement::Token(GreenToken::new(
            SyntaxKind::from_raw(resolved),
            token.text.as_str(),
        )));
        self.stack.push(StackEntry {
            state: next,
            elements,
        });
        self.pos += 1;
        true
    }

    fn reduce(&mut self, production: u32) -> bool {
        let (lhs, arity, alias) = {
            let p = self.table.production(production);
            (p.lhs, p.rhs.len(), p.node)
        };
        if arity >= self.stack.len() {
            self.errors.push(ParseError::InvalidSyntax {
                span: TextRange::empty(self.offset()),
                message: "parse stack underflow".to_string(),
            });
            return false;
        }

        let split = self.stack.len() - arity;
        let mut children: Vec<GreenElement> = Vec::new();
        for entry in self.stack.drain(split..) {
            children.extend(entry.elements);
        }

        let state = self.state();
        let Some(target) = self.table.goto(state, lhs) else {
            self.errors.push(ParseError::InvalidSyntax {
                span: TextRange::empty(self.offset()),
                message: "parse table is inconsistent".to_string(),
            });
            return false;
        };

        // empty reductions leave no trace in the tree; hidden symbols
        // splice their children into the parent
        let elements = if arity == 0 {
            Vec::new()
        } else if let Some(node_kind) = alias {
            self.nodes_created += 1;
            vec![GreenElement::Node(GreenNode::from_children(
                SyntaxKind::from_raw(node_kind),
                children,
            ))]
        } else if self.lang.data().is_hidden(lhs) {
            children
        } else {
            self.nodes_created += 1;
            vec![GreenElement::Node(GreenNode::from_children(
                SyntaxKind::from_raw(lhs),
                children,
            ))]
        };

        self.stack.push(StackEntry {
            state: target,
            elements,
        });
        true
    }

    fn recover(&mut self, state: u32) -> bool {
        let expected = self.expected_names(state);
        match self.tokens.get(self.pos) {
            Some(token) => self.errors.push(ParseError::UnexpectedToken {
                span: token.range,
                found: token.text.to_string(),
                expected,
            }),
            None => self.errors.push(ParseError::UnexpectedEof {
                span: TextRange::empty(self.offset()),
                expected,
            }),
        }

        if !self.config.error_recovery || self.errors.len() >= self.config.max_errors {
            return false;
        }

        if self.config.token_insertion && self.last_insert != Some(self.pos) {
            if let Some((terminal, next)) = recovery::insertion_candidate(self.table, state) {
                let name = self.terminal_name(terminal);
                let mut elements = std::mem::take(&mut self.pending);
                elements.push(GreenElement::Token(GreenToken::new(
                    SyntaxKind::from_raw(terminal),
                    "",
                )));
                self.stack.push(StackEntry {
                    state: next,
                    elements,
                });
                self.warnings.push(ParseWarning::info(
                    TextRange::empty(self.offset()),
                    format!("inserted missing `{name}`"),
                ));
                self.errors_recovered += 1;
                self.last_insert = Some(self.pos);
                return true;
            }
        }

        if let Some(token) = self.tokens.get(self.pos) {
            let leaf = GreenToken::new(token.kind, token.text.as_str());
            self.pending.push(GreenElement::Node(GreenNode::from_children(
                SyntaxKind::ERROR,
                vec![GreenElement::Token(leaf)],
            )));
            self.warnings.push(ParseWarning::warning(
                token.range,
                format!("skipped `{}`", token.text),
            ));
            self.nodes_created += 1;
            self.errors_recovered += 1;
            self.pos += 1;
            return true;
        }

        false
    }

    fn finish(mut self) -> EngineOutput {
        let entry_kind = SyntaxKind::from_raw(self.lang.data().entry());

        let mut elements: Vec<GreenElement> = Vec::new();
        for entry in std::mem::take(&mut self.stack) {
            elements.extend(entry.elements);
        }

        // trailing trivia, plus any input left behind by a bailed-out parse
        let mut extras = std::mem::take(&mut self.pending);
        let mut tail: Vec<GreenElement> = Vec::new();
        for token in &self.tokens[self.pos..] {
            tail.push(GreenElement::Token(GreenToken::new(
                token.kind,
                token.text.as_str(),
            )));
        }
        if !tail.is_empty() {
            extras.push(GreenElement::Node(GreenNode::from_children(
                SyntaxKind::ERROR,
                tail,
            )));
            self.nodes_created += 1;
        }

        let accepted_root = match elements.as_slice() {
            [GreenElement::Node(node)] if node.kind() == entry_kind => Some(node.clone()),
            _ => None,
        };
        let root = if let Some(node) = accepted_root {
            node.with_appended(extras)
        } else {
            elements.extend(extras);
            self.nodes_created += 1;
            GreenNode::from_children(entry_kind, elements)
        };

        EngineOutput {
            root,
            errors: self.errors,
            warnings: self.warnings,
            tokens_consumed: self.pos,
            nodes_created: self.nodes_created,
            errors_recovered: self.errors_recovered,
        }
    }

    /// Byte offset of the current parse position.
    fn offset(&self) -> TextSize {
        match self.tokens.get(self.pos) {
            Some(token) => token.range.start(),
            None => self
                .tokens
                .last()
                .map_or(TextSize::zero(), |token| token.range.end()),
        }
    }

    fn expected_names(&self, state: u32) -> Vec<String> {
        self.table
            .expected_lookaheads(state)
            .iter()
            .map(|&terminal| self.terminal_name(terminal))
            .collect()
    }

    fn terminal_name(&self, terminal: u16) -> String {
        if terminal == EOF {
            return "<eof>".to_string();
        }
        self.lang
            .kind_name(SyntaxKind::from_raw(terminal))
            .unwrap_or("<unknown>")
            .to_string()
    }
}
