//! Error recovery helpers.
//!
//! Recovery has two moves, tried in order:
//!
//! 1. Insert a zero-width copy of a token the state could shift. The
//!    inserted token has no text, so the tree still spells out exactly the
//!    input.
//! 2. Skip the offending token into an `ERROR` node and try again.
//!
//! Insertion is capped at one per input position; together with skipping
//! that guarantees the parse always reaches end of input.

use crate::language::table::{Action, ParseTable, EOF};

/// Pick a terminal the state can shift, for zero-width insertion.
///
/// Candidates come from the state's expected set, which is sorted, so the
/// choice is deterministic.
pub(crate) fn insertion_candidate(table: &ParseTable, state: u32) -> Option<(u16, u32)> {
    for &lookahead in table.expected_lookaheads(state) {
        if lookahead == EOF {
            continue;
        }
        if let Some(Action::Shift(next)) = table.action(state, lookahead) {
            return Some((lookahead, next));
        }
    }
    None
}
