//! Crawler wiring — the melee ground agent.
//!
//! Crawlers wander, chase on sight, queue for melee strikes, and retreat to
//! recover when the host reports low health.  Grouped crawlers additionally
//! ambush and swarm; the `AmbushNow` trigger comes from the host (a scripted
//! encounter or a perception event), everything else is fired by behaviors
//! or mapped from group events.

use std::fmt;
use std::sync::Arc;

use mob_fsm::{BehaviorRegistry, FsmResult, TransitionTable};

use crate::{
    Ambush, Attack, AttackTuning, Chase, ChaseTuning, Death, DeathTuning, Flee, FleeTuning, Idle,
    IdleTuning, Recover, RecoverTuning, Relocate, RelocateTuning, Swarm, SwarmTuning,
};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum CrawlerState {
    Idle,
    Chase,
    Attack,
    Flee,
    Swarm,
    Ambush,
    Relocate,
    Recover,
    Death,
}

impl fmt::Display for CrawlerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum CrawlerTrigger {
    /// Perception handed the agent a hunt target.
    SeeTarget,
    /// Target gone or out of interest range.
    LoseTarget,
    InAttackRange,
    OutOfAttackRange,
    /// Host-reported health threshold crossing.
    LowHealth,
    /// Reached the retreat pocket.
    PocketReached,
    Recovered,
    /// Request a zone change (dwell expiry or host script).
    RelocateNow,
    RelocateDone,
    /// Host script: set up an ambush.
    AmbushNow,
    /// The group clustering barrier released.
    AmbushReady,
    Die,
}

impl fmt::Display for CrawlerTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// All crawler behavior tuning in one place.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrawlerTuning {
    pub idle:     IdleTuning,
    pub chase:    ChaseTuning,
    pub attack:   AttackTuning,
    pub flee:     FleeTuning,
    pub swarm:    SwarmTuning,
    pub relocate: RelocateTuning,
    pub recover:  RecoverTuning,
    pub death:    DeathTuning,
}

/// The crawler transition graph.
pub fn crawler_table() -> FsmResult<TransitionTable<CrawlerState, CrawlerTrigger>> {
    use CrawlerState as S;
    use CrawlerTrigger as T;

    TransitionTable::builder()
        .on(S::Idle, T::SeeTarget, S::Chase)
        .on(S::Idle, T::RelocateNow, S::Relocate)
        .on(S::Idle, T::AmbushNow, S::Ambush)
        .on(S::Idle, T::LowHealth, S::Flee)
        .on(S::Chase, T::InAttackRange, S::Attack)
        .on(S::Chase, T::LoseTarget, S::Idle)
        .on(S::Chase, T::LowHealth, S::Flee)
        .on(S::Attack, T::OutOfAttackRange, S::Chase)
        .on(S::Attack, T::LoseTarget, S::Idle)
        .on(S::Attack, T::LowHealth, S::Flee)
        .on(S::Swarm, T::InAttackRange, S::Attack)
        .on(S::Swarm, T::LoseTarget, S::Idle)
        .on(S::Swarm, T::LowHealth, S::Flee)
        .on(S::Ambush, T::AmbushReady, S::Swarm)
        .on(S::Relocate, T::RelocateDone, S::Idle)
        .on(S::Relocate, T::SeeTarget, S::Chase)
        .on(S::Flee, T::PocketReached, S::Recover)
        .on(S::Recover, T::Recovered, S::Idle)
        .on(S::Idle, T::Die, S::Death)
        .on(S::Chase, T::Die, S::Death)
        .on(S::Attack, T::Die, S::Death)
        .on(S::Flee, T::Die, S::Death)
        .on(S::Swarm, T::Die, S::Death)
        .on(S::Ambush, T::Die, S::Death)
        .on(S::Relocate, T::Die, S::Death)
        .on(S::Recover, T::Die, S::Death)
        .terminal(S::Death)
        .build()
}

/// Build the full crawler wiring: validated table plus a behavior registry
/// with `tuning` baked in.  Share the result across every crawler machine.
pub fn crawler_wiring(
    tuning: &CrawlerTuning,
) -> FsmResult<(
    Arc<TransitionTable<CrawlerState, CrawlerTrigger>>,
    BehaviorRegistry<CrawlerState, CrawlerTrigger>,
)> {
    use CrawlerState as S;
    use CrawlerTrigger as T;

    let table = Arc::new(crawler_table()?);
    let mut behaviors = BehaviorRegistry::new();

    let t = tuning.idle.clone();
    behaviors.register(S::Idle, move || {
        Idle::new(t.clone(), Some(T::SeeTarget), Some(T::RelocateNow))
    });
    let t = tuning.chase.clone();
    behaviors.register(S::Chase, move || {
        Chase::new(t.clone(), T::InAttackRange, T::LoseTarget)
    });
    let t = tuning.attack.clone();
    behaviors.register(S::Attack, move || {
        Attack::new(t.clone(), T::OutOfAttackRange, T::LoseTarget)
    });
    let t = tuning.flee.clone();
    behaviors.register(S::Flee, move || Flee::new(t.clone(), Some(T::PocketReached)));
    let t = tuning.swarm.clone();
    behaviors.register(S::Swarm, move || {
        Swarm::new(t.clone(), T::InAttackRange, T::LoseTarget)
    });
    behaviors.register(S::Ambush, || Ambush::new(None, T::AmbushReady));
    let t = tuning.relocate.clone();
    behaviors.register(S::Relocate, move || Relocate::new(t.clone(), T::RelocateDone));
    let t = tuning.recover.clone();
    behaviors.register(S::Recover, move || Recover::new(t.clone(), T::Recovered));
    let t = tuning.death.clone();
    behaviors.register(S::Death, move || Death::new(t.clone()));

    behaviors.validate(&table)?;
    Ok((table, behaviors))
}
