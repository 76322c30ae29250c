//! The `Behavior` trait and the command surface behaviors act through.
//!
//! A behavior is the enter/exit/tick logic bound to one state, instantiated
//! per agent.  Hooks never mutate machine internals directly: they act
//! through [`BehaviorCx`], which queues triggers (applied after the hook
//! returns), registers timed subroutines (cancelled automatically on exit),
//! reaches group coordination, and issues fire-and-forget world commands.

use std::collections::VecDeque;

use mob_core::{AgentId, AgentRng, AgentWorld, Vec3};
use mob_group::GroupRegistry;
use mob_timed::{Condition, TimerSet};

use crate::TriggerKind;

/// Everything a behavior hook may touch, for one agent, for one call.
pub struct BehaviorCx<'a, T: TriggerKind> {
    /// The agent this machine drives.
    pub agent: AgentId,

    /// Host world access.  All commands are fire-and-forget.
    pub world: &'a mut dyn AgentWorld,

    /// Cross-agent coordination: turn queues, clusters, zone assignments.
    pub groups: &'a mut GroupRegistry,

    /// This agent's deterministic RNG.
    pub rng: &'a mut AgentRng,

    pub(crate) timers: &'a mut TimerSet<T>,
    pub(crate) queued: &'a mut VecDeque<T>,
}

impl<'a, T: TriggerKind> BehaviorCx<'a, T> {
    /// Request a transition.  Queued; the machine applies it after the
    /// current hook returns, so firing from inside enter/exit is safe.
    pub fn fire(&mut self, trigger: T) {
        self.queued.push_back(trigger);
    }

    /// Fire `trigger` after `secs`.  Cancelled automatically if this
    /// behavior exits first.
    pub fn after(&mut self, name: &'static str, secs: f32, trigger: T) {
        self.timers.after(name, secs, trigger);
    }

    /// Fire `trigger` on the next frame.
    pub fn next_frame(&mut self, name: &'static str, trigger: T) {
        self.timers.next_frame(name, trigger);
    }

    /// Fire `trigger` once `poll` holds (checked once per frame).
    pub fn when(&mut self, name: &'static str, trigger: T, poll: Condition) {
        self.timers.when(name, trigger, poll);
    }

    /// Cancel one of this behavior's subroutines early.
    pub fn cancel(&mut self, name: &str) -> bool {
        self.timers.cancel(name)
    }

    pub fn has_timer(&self, name: &str) -> bool {
        self.timers.contains(name)
    }

    /// This agent's position, or `None` for a stale handle.
    #[inline]
    pub fn position(&self) -> Option<Vec3> {
        self.world.position(self.agent)
    }

    /// The position of this agent's hunt target, if the host reports one.
    pub fn target_position(&self) -> Option<Vec3> {
        self.world
            .target_of(self.agent)
            .and_then(|t| self.world.position(t))
    }
}

/// Enter/exit/tick logic for one state.
///
/// Instances are created per agent by the
/// [`BehaviorRegistry`][crate::BehaviorRegistry] and live as long as the
/// machine.  The machine guarantees: at most one behavior is active per
/// agent; `on_exit` of the old behavior completes strictly before
/// `on_enter` of the new one; and every timer the behavior registered is
/// cancelled before `on_exit` returns control to the transition.
pub trait Behavior<T: TriggerKind> {
    /// Called when the machine enters this behavior's state.
    fn on_enter(&mut self, _cx: &mut BehaviorCx<'_, T>) {}

    /// Called when the machine leaves this behavior's state, and on machine
    /// shutdown.  Must leave no lingering world state (active hit windows,
    /// claimed attack turns).
    fn on_exit(&mut self, _cx: &mut BehaviorCx<'_, T>) {}

    /// Called once per host frame while active.
    fn tick(&mut self, cx: &mut BehaviorCx<'_, T>, dt: f32);
}
