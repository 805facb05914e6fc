//! SLR(1) automaton compiled from a grammar artifact.
//!
//! Construction is the classic pipeline: nullable / FIRST / FOLLOW sets,
//! LR(0) canonical collection, then action and goto tables with reduce
//! actions placed on FOLLOW sets. Shift/reduce conflicts resolve in favor
//! of shift (the longest-match convention); reduce/reduce conflicts make
//! the grammar unloadable.

use crate::language::artifact::{GrammarArtifact, SymbolClass};
use hashbrown::{HashMap, HashSet};
use std::collections::BTreeSet;

/// Sentinel terminal for end of input; never a valid symbol index.
pub(crate) const EOF: u16 = u16::MAX;

/// Sentinel non-terminal for the augmented start production.
const AUGMENTED: u16 = u16::MAX - 1;

/// One parse action for a (state, lookahead) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Shift(u32),
    Reduce(u32),
    Accept,
}

/// Production over symbol indices; index 0 is the augmented start.
#[derive(Debug, Clone)]
pub(crate) struct Production {
    pub lhs: u16,
    pub rhs: Vec<u16>,
    /// Node kind created on reduce when it differs from `lhs`.
    pub node: Option<u16>,
}

/// An LR(0) item: (production index, dot position).
type Item = (u32, u32);

#[derive(Debug)]
pub(crate) struct ParseTable {
    actions: HashMap<(u32, u16), Action, ahash::RandomState>,
    gotos: HashMap<(u32, u16), u32, ahash::RandomState>,
    productions: Vec<Production>,
    /// Per-state sorted lookaheads that have an action, EOF last.
    expected: Vec<Vec<u16>>,
    num_states: u32,
}

impl ParseTable {
    /// Compile the automaton for `artifact`.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message for grammars with reduce/reduce
    /// conflicts.
    pub(crate) fn build(artifact: &GrammarArtifact) -> Result<Self, String> {
        let builder = TableBuilder::new(artifact);
        builder.build()
    }

    pub(crate) fn action(&self, state: u32, lookahead: u16) -> Option<Action> {
        self.actions.get(&(state, lookahead)).copied()
    }

    pub(crate) fn goto(&self, state: u32, non_terminal: u16) -> Option<u32> {
        self.gotos.get(&(state, non_terminal)).copied()
    }

    pub(crate) fn production(&self, index: u32) -> &Production {
        &self.productions[index as usize]
    }

    /// Lookaheads with an action in `state`, sorted, EOF last.
    pub(crate) fn expected_lookaheads(&self, state: u32) -> &[u16] {
        &self.expected[state as usize]
    }

    pub(crate) const fn num_states(&self) -> u32 {
        self.num_states
    }
}

struct TableBuilder<'a> {
    artifact: &'a GrammarArtifact,
    productions: Vec<Production>,
    by_lhs: HashMap<u16, Vec<u32>, ahash::RandomState>,
}

impl<'a> TableBuilder<'a> {
    fn new(artifact: &'a GrammarArtifact) -> Self {
        let mut productions = Vec::with_capacity(artifact.productions.len() + 1);
        productions.push(Production {
            lhs: AUGMENTED,
            rhs: vec![artifact.entry],
            node: None,
        });
        for spec in &artifact.productions {
            productions.push(Production {
                lhs: spec.lhs,
                rhs: spec.rhs.clone(),
                node: spec.node,
            });
        }

        let mut by_lhs: HashMap<u16, Vec<u32>, ahash::RandomState> = HashMap::default();
        for (index, production) in productions.iter().enumerate() {
            by_lhs
                .entry(production.lhs)
                .or_default()
                .push(u32::try_from(index).unwrap_or(u32::MAX));
        }

        Self {
            artifact,
            productions,
            by_lhs,
        }
    }

    fn is_terminal(&self, symbol: u16) -> bool {
        if symbol == AUGMENTED {
            return false;
        }
        if symbol == EOF {
            return true;
        }
        self.artifact
            .symbols
            .get(symbol as usize)
            .is_some_and(|s| matches!(s.class, SymbolClass::Terminal))
    }

    fn symbol_name(&self, symbol: u16) -> &str {
        match symbol {
            EOF => "<eof>",
            AUGMENTED => "<start>",
            _ => self
                .artifact
                .symbols
                .get(symbol as usize)
                .map_or("<unknown>", |s| s.name.as_str()),
        }
    }

    fn build(self) -> Result<ParseTable, String> {
        let nullable = self.compute_nullable();
        let first = self.compute_first(&nullable);
        let follow = self.compute_follow(&nullable, &first);

        let (states, transitions) = self.canonical_collection();

        let mut actions: HashMap<(u32, u16), Action, ahash::RandomState> = HashMap::default();
        let mut gotos: HashMap<(u32, u16), u32, ahash::RandomState> = HashMap::default();

        for (state_index, items) in states.iter().enumerate() {
            let state = u32::try_from(state_index).unwrap_or(u32::MAX);
            for &(prod, dot) in items {
                let production = &self.productions[prod as usize];
                if let Some(&next) = production.rhs.get(dot as usize) {
                    if self.is_terminal(next) {
                        let target = transitions[&(state, next)];
                        // shift wins over any reduce already placed here
                        actions.insert((state, next), Action::Shift(target));
                    }
                } else if prod == 0 {
                    actions.insert((state, EOF), Action::Accept);
                } else {
                    let empty = HashSet::default();
                    let lookaheads = follow.get(&production.lhs).unwrap_or(&empty);
                    for &lookahead in lookaheads {
                        match actions.get(&(state, lookahead)) {
                            Some(Action::Shift(_) | Action::Accept) => {}
                            Some(Action::Reduce(other)) if *other != prod => {
                                return Err(format!(
                                    "reduce/reduce conflict in state {state} on `{}` between \
                                     `{}` and `{}`",
                                    self.symbol_name(lookahead),
                                    self.symbol_name(self.productions[*other as usize].lhs),
                                    self.symbol_name(production.lhs),
                                ));
                            }
                            _ => {
                                actions.insert((state, lookahead), Action::Reduce(prod));
                            }
                        }
                    }
                }
            }

        }

        for (&(state, symbol), &target) in &transitions {
            if !self.is_terminal(symbol) && symbol != AUGMENTED {
                gotos.insert((state, symbol), target);
            }
        }

        let num_states = u32::try_from(states.len()).unwrap_or(u32::MAX);
        let mut expected = vec![Vec::new(); states.len()];
        for &(state, lookahead) in actions.keys() {
            expected[state as usize].push(lookahead);
        }
        for lookaheads in &mut expected {
            // sort puts EOF (u16::MAX) last
            lookaheads.sort_unstable();
        }

        Ok(ParseTable {
            actions,
            gotos,
            productions: self.productions,
            expected,
            num_states,
        })
    }

    fn compute_nullable(&self) -> HashSet<u16, ahash::RandomState> {
        let mut nullable: HashSet<u16, ahash::RandomState> = HashSet::default();
        let mut changed = true;
        while changed {
            changed = false;
            for production in &self.productions {
                if nullable.contains(&production.lhs) {
                    continue;
                }
                if production
                    .rhs
                    .iter()
                    .all(|s| !self.is_terminal(*s) && nullable.contains(s))
                {
                    nullable.insert(production.lhs);
                    changed = true;
                }
            }
        }
        nullable
    }

    fn compute_first(
        &self,
        nullable: &HashSet<u16, ahash::RandomState>,
    ) -> HashMap<u16, HashSet<u16, ahash::RandomState>, ahash::RandomState> {
        let mut first: HashMap<u16, HashSet<u16, ahash::RandomState>, ahash::RandomState> =
            HashMap::default();
        let mut changed = true;
        while changed {
            changed = false;
            for production in &self.productions {
                let mut addition: Vec<u16> = Vec::new();
                for &symbol in &production.rhs {
                    if self.is_terminal(symbol) {
                        addition.push(symbol);
                        break;
                    }
                    if let Some(set) = first.get(&symbol) {
                        addition.extend(set.iter().copied());
                    }
                    if !nullable.contains(&symbol) {
                        break;
                    }
                }
                let entry = first.entry(production.lhs).or_default();
                for symbol in addition {
                    if entry.insert(symbol) {
                        changed = true;
                    }
                }
            }
        }
        first
    }

    fn compute_follow(
        &self,
        nullable: &HashSet<u16, ahash::RandomState>,
        first: &HashMap<u16, HashSet<u16, ahash::RandomState>, ahash::RandomState>,
    ) -> HashMap<u16, HashSet<u16, ahash::RandomState>, ahash::RandomState> {
        let mut follow: HashMap<u16, HashSet<u16, ahash::RandomState>, ahash::RandomState> =
            HashMap::default();
        follow.entry(AUGMENTED).or_default().insert(EOF);

        let mut changed = true;
        while changed {
            changed = false;
            for production in &self.productions {
                for (position, &symbol) in production.rhs.iter().enumerate() {
                    if self.is_terminal(symbol) {
                        continue;
                    }
                    let mut addition: Vec<u16> = Vec::new();
                    let mut rest_nullable = true;
                    for &trailing in &production.rhs[position + 1..] {
                        if self.is_terminal(trailing) {
                            addition.push(trailing);
                            rest_nullable = false;
                            break;
                        }
                        if let Some(set) = first.get(&trailing) {
                            addition.extend(set.iter().copied());
                        }
                        if !nullable.contains(&trailing) {
                            rest_nullable = false;
                            break;
                        }
                    }
                    if rest_nullable {
                        if let Some(set) = follow.get(&production.lhs) {
                            addition.extend(set.iter().copied());
                        }
                    }
                    let entry = follow.entry(symbol).or_default();
                    for lookahead in addition {
                        if entry.insert(lookahead) {
                            changed = true;
                        }
                    }
                }
            }
        }
        follow
    }

    fn closure(&self, items: &mut BTreeSet<Item>) {
        let mut work: Vec<Item> = items.iter().copied().collect();
        while let Some((prod, dot)) = work.pop() {
            let production = &self.productions[prod as usize];
            let Some(&next) = production.rhs.get(dot as usize) else {
                continue;
            };
            if self.is_terminal(next) {
                continue;
            }
            if let Some(candidates) = self.by_lhs.get(&next) {
                for &candidate in candidates {
                    if items.insert((candidate, 0)) {
                        work.push((candidate, 0));
                    }
                }
            }
        }
    }

    /// LR(0) canonical collection: all item sets and their transitions.
    fn canonical_collection(
        &self,
    ) -> (
        Vec<BTreeSet<Item>>,
        HashMap<(u32, u16), u32, ahash::RandomState>,
    ) {
        let mut start: BTreeSet<Item> = BTreeSet::new();
        start.insert((0, 0));
        self.closure(&mut start);

        let mut states: Vec<BTreeSet<Item>> = vec![start.clone()];
        let mut index: HashMap<BTreeSet<Item>, u32, ahash::RandomState> = HashMap::default();
        index.insert(start, 0);
        let mut transitions: HashMap<(u32, u16), u32, ahash::RandomState> = HashMap::default();

        let mut work: Vec<u32> = vec![0];
        while let Some(state) = work.pop() {
            // group items by the symbol after the dot
            let mut by_symbol: HashMap<u16, BTreeSet<Item>, ahash::RandomState> =
                HashMap::default();
            for &(prod, dot) in &states[state as usize] {
                let production = &self.productions[prod as usize];
                if let Some(&next) = production.rhs.get(dot as usize) {
                    by_symbol.entry(next).or_default().insert((prod, dot + 1));
                }
            }

            let mut symbols: Vec<u16> = by_symbol.keys().copied().collect();
            symbols.sort_unstable();
            for symbol in symbols {
                let mut target = by_symbol.remove(&symbol).unwrap_or_default();
                self.closure(&mut target);
                let target_index = match index.get(&target) {
                    Some(&existing) => existing,
                    None => {
                        let fresh = u32::try_from(states.len()).unwrap_or(u32::MAX);
                        states.push(target.clone());
                        index.insert(target, fresh);
                        work.push(fresh);
                        fresh
                    }
                };
                transitions.insert((state, symbol), target_index);
            }
        }

        (states, transitions)
    }
}
