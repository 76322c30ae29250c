//! `AgentStateMachine` — one agent's behavior coordinator.
//!
//! The machine owns the per-agent behavior instances, the active state, the
//! timer set for the current activation, and the queue of triggers fired
//! from inside hooks.  Transition discipline:
//!
//! 1. `on_exit` of the old behavior runs to completion first.
//! 2. Every timer registered during the old activation is cancelled.
//! 3. The state changes, then `on_enter` of the new behavior runs.
//!
//! Triggers fired from inside enter/exit are queued and applied after the
//! hook returns, so hooks never re-enter the machine.  A bounded drain
//! turns enter/exit fire cycles into a [`TriggerStorm`][FsmError::TriggerStorm]
//! error instead of an unbounded loop.

use std::collections::VecDeque;
use std::sync::Arc;

use mob_core::{AgentId, AgentRng, AgentWorld};
use mob_group::GroupRegistry;
use mob_timed::TimerSet;
use rustc_hash::FxHashMap;

use crate::{
    Behavior, BehaviorCx, BehaviorRegistry, FsmError, FsmResult, StateKind, TransitionTable,
    TriggerKind,
};

/// Most queued transitions applied in one frame before the machine gives up.
const DRAIN_BUDGET: usize = 32;

pub struct AgentStateMachine<S: StateKind, T: TriggerKind> {
    agent:     AgentId,
    table:     Arc<TransitionTable<S, T>>,
    behaviors: FxHashMap<S, Box<dyn Behavior<T>>>,
    timers:    TimerSet<T>,
    pending:   VecDeque<T>,
    current:   Option<S>,
}

impl<S: StateKind, T: TriggerKind> AgentStateMachine<S, T> {
    /// Build a machine for `agent`.  Validates that `registry` covers every
    /// state `table` mentions, then instantiates a fresh behavior set.
    pub fn new(
        agent: AgentId,
        table: Arc<TransitionTable<S, T>>,
        registry: &BehaviorRegistry<S, T>,
    ) -> FsmResult<Self> {
        registry.validate(&table)?;
        Ok(Self {
            agent,
            table,
            behaviors: registry.instantiate(),
            timers: TimerSet::new(),
            pending: VecDeque::new(),
            current: None,
        })
    }

    #[inline]
    pub fn agent(&self) -> AgentId {
        self.agent
    }

    /// The active state, or `None` before initialize / after shutdown.
    #[inline]
    pub fn current(&self) -> Option<S> {
        self.current
    }

    /// Enter `start` and run its `on_enter`.  Must be called exactly once.
    pub fn initialize(
        &mut self,
        start: S,
        world: &mut dyn AgentWorld,
        groups: &mut GroupRegistry,
        rng: &mut AgentRng,
    ) -> FsmResult<()> {
        if self.current.is_some() {
            return Err(FsmError::AlreadyInitialized(self.agent));
        }
        self.current = Some(start);
        self.run_hook(start, Hook::Enter, world, groups, rng);
        self.drain_pending(world, groups, rng)
    }

    /// Apply `trigger`.  Returns `Ok(true)` if the table had a row for it
    /// (including no-op self-transitions), `Ok(false)` if it was ignored.
    pub fn fire(
        &mut self,
        trigger: T,
        world: &mut dyn AgentWorld,
        groups: &mut GroupRegistry,
        rng: &mut AgentRng,
    ) -> FsmResult<bool> {
        let handled = self.apply_trigger(trigger, world, groups, rng)?;
        self.drain_pending(world, groups, rng)?;
        Ok(handled)
    }

    /// Advance one frame: tick timers, apply any triggers they fired, then
    /// tick the active behavior.  If a timer transitioned the machine this
    /// frame, the (now exited) behavior's `tick` is skipped.
    pub fn tick(
        &mut self,
        dt: f32,
        world: &mut dyn AgentWorld,
        groups: &mut GroupRegistry,
        rng: &mut AgentRng,
    ) -> FsmResult<()> {
        let Some(before) = self.current else {
            return Err(FsmError::NotInitialized(self.agent));
        };

        let fired = self.timers.tick(dt, self.agent, world);
        self.pending.extend(fired);
        self.drain_pending(world, groups, rng)?;

        if self.current == Some(before)
            && let Some(behavior) = self.behaviors.get_mut(&before)
        {
            let mut cx = BehaviorCx {
                agent:  self.agent,
                world,
                groups,
                rng,
                timers: &mut self.timers,
                queued: &mut self.pending,
            };
            behavior.tick(&mut cx, dt);
        }
        self.drain_pending(world, groups, rng)
    }

    /// Tear down: cancel timers, run the active behavior's `on_exit`, clear
    /// the state.  Safe to call on an uninitialized machine.
    pub fn shutdown(
        &mut self,
        world: &mut dyn AgentWorld,
        groups: &mut GroupRegistry,
        rng: &mut AgentRng,
    ) {
        self.timers.cancel_all();
        if let Some(state) = self.current.take() {
            self.run_hook(state, Hook::Exit, world, groups, rng);
        }
        self.pending.clear();
        self.timers.cancel_all();
    }

    fn apply_trigger(
        &mut self,
        trigger: T,
        world: &mut dyn AgentWorld,
        groups: &mut GroupRegistry,
        rng: &mut AgentRng,
    ) -> FsmResult<bool> {
        let Some(state) = self.current else {
            return Err(FsmError::NotInitialized(self.agent));
        };
        let Some(dest) = self.table.next(state, trigger) else {
            return Ok(false);
        };
        // Self-transitions are idempotent no-ops: no exit, no re-enter.
        if dest == state {
            return Ok(true);
        }
        self.run_hook(state, Hook::Exit, world, groups, rng);
        self.timers.cancel_all();
        self.current = Some(dest);
        self.run_hook(dest, Hook::Enter, world, groups, rng);
        Ok(true)
    }

    fn drain_pending(
        &mut self,
        world: &mut dyn AgentWorld,
        groups: &mut GroupRegistry,
        rng: &mut AgentRng,
    ) -> FsmResult<()> {
        let mut applied = 0;
        while let Some(trigger) = self.pending.pop_front() {
            applied += 1;
            if applied > DRAIN_BUDGET {
                let count = applied + self.pending.len();
                self.pending.clear();
                return Err(FsmError::TriggerStorm { agent: self.agent, count });
            }
            self.apply_trigger(trigger, world, groups, rng)?;
        }
        Ok(())
    }

    fn run_hook(
        &mut self,
        state: S,
        hook: Hook,
        world: &mut dyn AgentWorld,
        groups: &mut GroupRegistry,
        rng: &mut AgentRng,
    ) {
        let Some(behavior) = self.behaviors.get_mut(&state) else {
            return;
        };
        let mut cx = BehaviorCx {
            agent:  self.agent,
            world,
            groups,
            rng,
            timers: &mut self.timers,
            queued: &mut self.pending,
        };
        match hook {
            Hook::Enter => behavior.on_enter(&mut cx),
            Hook::Exit => behavior.on_exit(&mut cx),
        }
    }
}

#[derive(Clone, Copy)]
enum Hook {
    Enter,
    Exit,
}
