//! `TimerSet` — per-agent named timed subroutines.
//!
//! # Why this exists
//!
//! The original behaviors leaned on engine coroutines: "retract after N
//! seconds", "wait for arrival, then continue".  Here each such wait is an
//! explicit record in the owning agent's `TimerSet`, ticked once per frame.
//! When a wait completes, its *continuation trigger* is returned to the
//! caller (the state machine), which fires it like any other trigger.
//!
//! A handful of entries per agent is the norm, so storage is a plain `Vec`
//! scanned linearly — no allocation-heavy priority structure is warranted at
//! this scale.

use mob_core::{AgentId, AgentWorld};

/// Predicate polled once per tick by condition timers.
pub type Condition = Box<dyn FnMut(AgentId, &dyn AgentWorld) -> bool>;

enum Wait {
    /// Fires when `remaining` reaches zero.
    Delay { remaining: f32 },
    /// Fires when the predicate returns `true`.
    Until { poll: Condition },
}

struct Entry<T> {
    name: &'static str,
    wait: Wait,
    trigger: T,
}

/// Named, cancellable timed subroutines for one agent.
///
/// Registering a name that already exists replaces the old entry — restart
/// semantics, matching "re-arm the retract timer" use sites.  Completed
/// entries are removed before their trigger is handed back.
pub struct TimerSet<T> {
    entries: Vec<Entry<T>>,
}

impl<T: Copy> TimerSet<T> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Fire `trigger` after `secs` of accumulated tick delta.
    pub fn after(&mut self, name: &'static str, secs: f32, trigger: T) {
        self.insert(Entry {
            name,
            wait: Wait::Delay { remaining: secs.max(0.0) },
            trigger,
        });
    }

    /// Fire `trigger` on the next tick.
    pub fn next_frame(&mut self, name: &'static str, trigger: T) {
        self.after(name, 0.0, trigger);
    }

    /// Fire `trigger` once `poll` returns `true` (checked once per tick).
    ///
    /// Bare condition waits can hang forever; pair them with a
    /// [`ProgressGuard`][crate::ProgressGuard] or a parallel `after` timer so
    /// every wait has a hard exit.
    pub fn when(&mut self, name: &'static str, trigger: T, poll: Condition) {
        self.insert(Entry { name, wait: Wait::Until { poll }, trigger });
    }

    /// Cancel the named subroutine.  Returns `false` if no such entry.
    pub fn cancel(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.name != name);
        self.entries.len() != before
    }

    /// Cancel everything.  Called by the state machine on behavior exit.
    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Advance all entries by `dt` and collect the triggers of those that
    /// completed, in registration order.  Completed entries are removed.
    pub fn tick(&mut self, dt: f32, agent: AgentId, world: &dyn AgentWorld) -> Vec<T> {
        let mut fired = Vec::new();
        self.entries.retain_mut(|entry| {
            let done = match &mut entry.wait {
                Wait::Delay { remaining } => {
                    *remaining -= dt.max(0.0);
                    *remaining <= 0.0
                }
                Wait::Until { poll } => poll(agent, world),
            };
            if done {
                fired.push(entry.trigger);
            }
            !done
        });
        fired
    }

    fn insert(&mut self, entry: Entry<T>) {
        self.entries.retain(|e| e.name != entry.name);
        self.entries.push(entry);
    }
}

impl<T: Copy> Default for TimerSet<T> {
    fn default() -> Self {
        Self::new()
    }
}
