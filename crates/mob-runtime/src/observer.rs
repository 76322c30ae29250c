//! Director observer — host callbacks at key orchestration points.

use mob_core::AgentId;
use mob_fsm::{StateKind, TriggerKind};
use mob_group::GroupEvent;

/// Callbacks invoked by [`Director::tick`][crate::Director::tick] and
/// [`Director::fire`][crate::Director::fire].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — transition logger
///
/// ```rust,ignore
/// struct TransitionLogger;
///
/// impl DirectorObserver<CrawlerState, CrawlerTrigger> for TransitionLogger {
///     fn on_transition(&mut self, agent: AgentId, from: CrawlerState, to: CrawlerState) {
///         println!("{agent}: {from} -> {to}");
///     }
/// }
/// ```
pub trait DirectorObserver<S: StateKind, T: TriggerKind> {
    /// An agent's machine changed state during the call.  Reported once per
    /// call with the outermost endpoints; intermediate hops inside one drain
    /// are not broken out.
    fn on_transition(&mut self, _agent: AgentId, _from: S, _to: S) {}

    /// A group coordination event was delivered to a member, along with the
    /// trigger it was mapped to (`None` = the mapping dropped it).
    fn on_group_event(&mut self, _agent: AgentId, _event: GroupEvent, _mapped: Option<T>) {}

    /// A spawned agent's handle went stale: the host reports no position for
    /// it but the machine still exists.  Reported once per tick while the
    /// condition holds; behaviors themselves no-op on stale handles.
    fn on_stale_handle(&mut self, _agent: AgentId) {}

    /// End of one Director tick.  `agents` is the number of live machines.
    fn on_tick_end(&mut self, _frame: u64, _agents: usize) {}

    /// An agent was despawned and its machine torn down.
    fn on_despawn(&mut self, _agent: AgentId) {}
}

/// A [`DirectorObserver`] that does nothing.  Use when you need to call
/// `tick` but don't want callbacks.
pub struct NoopObserver;

impl<S: StateKind, T: TriggerKind> DirectorObserver<S, T> for NoopObserver {}
