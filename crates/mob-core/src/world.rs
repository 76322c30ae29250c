//! The `AgentWorld` trait — the library's entire view of the host game.
//!
//! Every engine concern (navigation, physics queries, animation, audio,
//! health bookkeeping) sits behind this trait.  All methods are cheap,
//! synchronous, and fire-and-forget from the library's perspective: a
//! [`move_to`][AgentWorld::move_to] is a request the host's navigation system
//! executes over the following frames, not a teleport.
//!
//! # Stale handles
//!
//! The host may destroy an entity without despawning its state machine in
//! the same frame.  Query methods therefore return `Option`; behaviors
//! treat `None` as "no-op this frame" rather than a fault, and the runtime
//! reports the stale handle through its observer.

use crate::{AgentId, CueId, Vec3};

/// Which entities a proximity query should return.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum QueryFilter {
    /// Entities hostile to the querying agent (the player, allies of the
    /// player).  Attack strike tests use this.
    Hostiles,
    /// Other library-controlled agents.  Swarm membership checks use this.
    Agents,
    /// Everything the host considers relevant.
    Any,
}

/// Host-implemented world access.
///
/// One implementation serves all agents; per-call `AgentId` identifies the
/// subject.  Implementations are not required to be `Sync` — the library is
/// single-threaded cooperative by contract.
pub trait AgentWorld {
    /// `false` once the host has destroyed or pooled-out the entity.
    fn is_alive(&self, agent: AgentId) -> bool;

    /// Current world position, or `None` for a stale handle.
    fn position(&self, agent: AgentId) -> Option<Vec3>;

    /// Request navigation toward `target`.  The host owns path execution;
    /// repeated calls with the same target should be cheap.
    fn move_to(&mut self, agent: AgentId, target: Vec3);

    /// Cancel any in-progress movement request.
    fn stop(&mut self, agent: AgentId);

    /// Entities within `radius` of `origin`, per `filter`.
    fn nearby(&self, origin: Vec3, radius: f32, filter: QueryFilter) -> Vec<AgentId>;

    /// Fire an animation/audio cue.  No return value is consumed.
    fn play_cue(&mut self, agent: AgentId, cue: CueId);

    /// Apply `amount` damage to `target`.
    fn apply_damage(&mut self, target: AgentId, amount: f32);

    /// Restore `amount` health to `agent`, clamped by the host to its max.
    fn heal(&mut self, agent: AgentId, amount: f32);

    /// `(current, max)` health, or `None` for a stale handle.
    fn health(&self, agent: AgentId) -> Option<(f32, f32)>;

    /// The entity this agent is currently hunting (usually the player), as
    /// decided by the host's perception layer.  `None` = no target.
    fn target_of(&self, agent: AgentId) -> Option<AgentId>;

    /// Enable or disable the agent's locomotion capability.  Death disables
    /// it before playing the death cue.
    fn set_mobile(&mut self, agent: AgentId, mobile: bool);

    /// Remove the agent from play (despawn, return to pool).  Terminal.
    fn deactivate(&mut self, agent: AgentId);
}
