//! `TransitionTable` — the static (state, trigger) → state mapping.
//!
//! Built once at configuration time through [`TableBuilder`], which rejects
//! malformed tables (duplicate rows, outgoing rows from terminal states) up
//! front.  At runtime the table is read-only: an absent entry means the
//! trigger is ignored in that state — not an error.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{FsmError, FsmResult, StateKind, TriggerKind};

/// Immutable transition mapping for one agent kind.
///
/// Shared across every machine of that kind (wrap in `Arc`).
pub struct TransitionTable<S: StateKind, T: TriggerKind> {
    rows: FxHashMap<(S, T), S>,
    terminal: FxHashSet<S>,
}

impl<S: StateKind, T: TriggerKind> TransitionTable<S, T> {
    pub fn builder() -> TableBuilder<S, T> {
        TableBuilder::new()
    }

    /// Destination for `trigger` in `state`, or `None` (= ignore).
    #[inline]
    pub fn next(&self, state: S, trigger: T) -> Option<S> {
        self.rows.get(&(state, trigger)).copied()
    }

    /// `true` for states declared terminal (no outgoing transitions, ever).
    #[inline]
    pub fn is_terminal(&self, state: S) -> bool {
        self.terminal.contains(&state)
    }

    /// Every state the table mentions (sources, destinations, terminals).
    /// Startup validation checks each has a registered behavior.
    pub fn states(&self) -> FxHashSet<S> {
        let mut states: FxHashSet<S> = FxHashSet::default();
        for (&(from, _), &to) in &self.rows {
            states.insert(from);
            states.insert(to);
        }
        states.extend(self.terminal.iter().copied());
        states
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Collects rows, validates at `build`.
pub struct TableBuilder<S: StateKind, T: TriggerKind> {
    rows: Vec<(S, T, S)>,
    terminal: FxHashSet<S>,
}

impl<S: StateKind, T: TriggerKind> TableBuilder<S, T> {
    pub fn new() -> Self {
        Self { rows: Vec::new(), terminal: FxHashSet::default() }
    }

    /// Add the row "(from, trigger) → to".
    pub fn on(mut self, from: S, trigger: T, to: S) -> Self {
        self.rows.push((from, trigger, to));
        self
    }

    /// Declare `state` terminal.  Terminal states accept incoming
    /// transitions but `build` rejects any outgoing row from them.
    pub fn terminal(mut self, state: S) -> Self {
        self.terminal.insert(state);
        self
    }

    /// Validate and freeze the table.
    pub fn build(self) -> FsmResult<TransitionTable<S, T>> {
        let mut rows: FxHashMap<(S, T), S> = FxHashMap::default();
        for (from, trigger, to) in self.rows {
            if self.terminal.contains(&from) {
                return Err(FsmError::TerminalOutgoing {
                    state: format!("{from:?}"),
                    trigger: format!("{trigger:?}"),
                });
            }
            if rows.insert((from, trigger), to).is_some() {
                return Err(FsmError::DuplicateTransition {
                    state: format!("{from:?}"),
                    trigger: format!("{trigger:?}"),
                });
            }
        }
        Ok(TransitionTable { rows, terminal: self.terminal })
    }
}

impl<S: StateKind, T: TriggerKind> Default for TableBuilder<S, T> {
    fn default() -> Self {
        Self::new()
    }
}
