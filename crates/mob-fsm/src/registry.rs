//! `BehaviorRegistry` — state → behavior-factory wiring for one agent kind.
//!
//! Behaviors are stateful and bound to one agent, so the registry stores
//! factories rather than instances; each machine instantiates its own full
//! set at creation.  [`validate`][BehaviorRegistry::validate] is the
//! fail-fast startup check: every state a table can reach must have a
//! factory *before* any machine runs.

use rustc_hash::FxHashMap;

use crate::{Behavior, FsmError, FsmResult, StateKind, TransitionTable, TriggerKind};

type Factory<T> = Box<dyn Fn() -> Box<dyn Behavior<T>>>;

/// Per-state behavior factories for one agent kind.
pub struct BehaviorRegistry<S: StateKind, T: TriggerKind> {
    factories: FxHashMap<S, Factory<T>>,
}

impl<S: StateKind, T: TriggerKind> BehaviorRegistry<S, T> {
    pub fn new() -> Self {
        Self { factories: FxHashMap::default() }
    }

    /// Register the factory for `state`, replacing any previous one.
    pub fn register<B, F>(&mut self, state: S, factory: F) -> &mut Self
    where
        B: Behavior<T> + 'static,
        F: Fn() -> B + 'static,
    {
        self.factories
            .insert(state, Box::new(move || Box::new(factory())));
        self
    }

    pub fn contains(&self, state: S) -> bool {
        self.factories.contains_key(&state)
    }

    /// Fail-fast configuration check: every state `table` mentions must
    /// have a behavior factory.
    pub fn validate(&self, table: &TransitionTable<S, T>) -> FsmResult<()> {
        for state in table.states() {
            if !self.contains(state) {
                return Err(FsmError::MissingBehavior { state: format!("{state:?}") });
            }
        }
        Ok(())
    }

    /// Instantiate a fresh behavior set for one machine.
    pub(crate) fn instantiate(&self) -> FxHashMap<S, Box<dyn Behavior<T>>> {
        self.factories
            .iter()
            .map(|(&state, factory)| (state, factory()))
            .collect()
    }
}

impl<S: StateKind, T: TriggerKind> Default for BehaviorRegistry<S, T> {
    fn default() -> Self {
        Self::new()
    }
}
