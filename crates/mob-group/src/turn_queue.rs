//! `AttackTurnQueue` — at most one group member attacks at a time.
//!
//! Members must ask [`can_attack`][AttackTurnQueue::can_attack] before
//! committing to an attack window, call
//! [`notify_begin`][AttackTurnQueue::notify_begin] when the window opens and
//! [`notify_end`][AttackTurnQueue::notify_end] when it closes.  Ending a
//! turn rotates the order front-to-back — strict round-robin, no priorities,
//! so over any window of `k` completed attacks each of `k` members attacks
//! exactly once.
//!
//! Members denied their turn re-poll at [`RETRY_INTERVAL_SECS`] rather than
//! blocking; the interval is short enough to feel immediate and long enough
//! that a 12-strong swarm isn't hammering the queue every frame.

use std::collections::VecDeque;

use mob_core::AgentId;

/// How long a denied member waits before asking again, seconds.
pub const RETRY_INTERVAL_SECS: f32 = 0.15;

/// Round-robin attack admission for one group.
#[derive(Debug, Default, Clone)]
pub struct AttackTurnQueue {
    order: VecDeque<AgentId>,
    active: Option<AgentId>,
}

impl AttackTurnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `agent` at the back of the turn order.  No-op if already queued.
    pub fn join(&mut self, agent: AgentId) {
        if !self.order.contains(&agent) {
            self.order.push_back(agent);
        }
    }

    /// Remove `agent` entirely.  If it was mid-attack the turn is released
    /// so the next member isn't starved by a corpse.
    pub fn leave(&mut self, agent: AgentId) {
        self.order.retain(|&a| a != agent);
        if self.active == Some(agent) {
            self.active = None;
        }
    }

    /// `true` if it is `agent`'s turn and nobody is currently attacking.
    pub fn can_attack(&self, agent: AgentId) -> bool {
        self.active.is_none() && self.order.front() == Some(&agent)
    }

    /// Claim the attack window.  Returns `false` (and changes nothing) if it
    /// is not `agent`'s turn.
    pub fn notify_begin(&mut self, agent: AgentId) -> bool {
        if self.can_attack(agent) {
            self.active = Some(agent);
            true
        } else {
            false
        }
    }

    /// Release the attack window and rotate the turn order.
    ///
    /// Ignored unless `agent` actually holds the window — a behavior exiting
    /// abnormally must not rotate someone else's turn away.
    pub fn notify_end(&mut self, agent: AgentId) {
        if self.active == Some(agent) {
            self.active = None;
            if let Some(front) = self.order.pop_front() {
                self.order.push_back(front);
            }
        }
    }

    /// The member currently holding the attack window, if any.
    pub fn active(&self) -> Option<AgentId> {
        self.active
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
