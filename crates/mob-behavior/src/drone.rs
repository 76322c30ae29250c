//! Drone wiring — the hovering ranged agent.
//!
//! Drones patrol a hover ring near their cluster, chase under coordinator
//! control at hover height, and fire ranged volleys through the same turn
//! queue crawlers use.  Drones are disposable: Flee self-removes by default
//! instead of recovering.

use std::fmt;
use std::sync::Arc;

use mob_core::{CueId, Vec3};
use mob_fsm::{Behavior, BehaviorCx, BehaviorRegistry, FsmResult, TransitionTable, TriggerKind};
use mob_group::RETRY_INTERVAL_SECS;
use mob_timed::{GuardVerdict, ProgressGuard};

use crate::{Death, DeathTuning, Flee, FleeTuning};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum DroneState {
    Patrol,
    Chase,
    Attack,
    Flee,
    Death,
}

impl fmt::Display for DroneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum DroneTrigger {
    SeeTarget,
    LoseTarget,
    InAttackRange,
    OutOfAttackRange,
    LowHealth,
    PocketReached,
    Die,
}

impl fmt::Display for DroneTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ── Patrol ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatrolTuning {
    /// Hover height above the anchor, metres.
    pub hover_height: f32,

    /// Patrol ring radius around the cluster anchor, metres.
    pub ring_radius: f32,

    /// A leg counts as arrived within this distance, metres.
    pub arrive_dist: f32,

    /// Hard cap on one patrol leg, seconds.
    pub travel_timeout_secs: f32,

    /// Pause between legs, uniform in `[min, max]` seconds.
    pub pause_min_secs: f32,
    pub pause_max_secs: f32,
}

impl Default for PatrolTuning {
    fn default() -> Self {
        Self {
            hover_height: 3.0,
            ring_radius: 5.0,
            arrive_dist: 0.8,
            travel_timeout_secs: 8.0,
            pause_min_secs: 0.5,
            pause_max_secs: 2.0,
        }
    }
}

enum PatrolPhase {
    Travel { target: Vec3, guard: ProgressGuard },
    Pause { remaining: f32 },
}

/// Hover ring around the cluster anchor (the leader's position, or the
/// drone's own when ungrouped).
pub struct Patrol<T: TriggerKind> {
    tuning: PatrolTuning,
    spot: T,
    phase: PatrolPhase,
}

impl<T: TriggerKind> Patrol<T> {
    pub fn new(tuning: PatrolTuning, spot: T) -> Self {
        Self { tuning, spot, phase: PatrolPhase::Pause { remaining: 0.0 } }
    }

    fn next_leg(tuning: &PatrolTuning, cx: &mut BehaviorCx<'_, T>) -> PatrolPhase {
        let anchor = cx
            .groups
            .group_of(cx.agent)
            .and_then(|g| cx.groups.cluster(g))
            .and_then(|c| c.leader())
            .and_then(|l| cx.world.position(l))
            .or_else(|| cx.position());
        let Some(anchor) = anchor else {
            return PatrolPhase::Pause { remaining: 0.5 };
        };
        let angle = cx.rng.angle();
        let r = cx.rng.gen_range(0.0..tuning.ring_radius).max(0.5);
        let target = Vec3::new(
            anchor.x + r * angle.cos(),
            anchor.y + tuning.hover_height,
            anchor.z + r * angle.sin(),
        );
        cx.world.move_to(cx.agent, target);
        PatrolPhase::Travel {
            target,
            guard: ProgressGuard::new(tuning.travel_timeout_secs, 1.0, 0.25),
        }
    }
}

impl<T: TriggerKind> Behavior<T> for Patrol<T> {
    fn on_enter(&mut self, cx: &mut BehaviorCx<'_, T>) {
        self.phase = Self::next_leg(&self.tuning, cx);
    }

    fn on_exit(&mut self, cx: &mut BehaviorCx<'_, T>) {
        cx.world.stop(cx.agent);
    }

    fn tick(&mut self, cx: &mut BehaviorCx<'_, T>, dt: f32) {
        if cx.world.target_of(cx.agent).is_some() {
            cx.fire(self.spot);
            return;
        }
        match &mut self.phase {
            PatrolPhase::Travel { target, guard } => {
                let pos = cx.position();
                let arrived =
                    pos.is_some_and(|p| p.distance(*target) <= self.tuning.arrive_dist);
                if arrived || guard.poll(pos, dt) != GuardVerdict::Waiting {
                    cx.world.stop(cx.agent);
                    let remaining = cx
                        .rng
                        .gen_range(self.tuning.pause_min_secs..=self.tuning.pause_max_secs);
                    self.phase = PatrolPhase::Pause { remaining };
                }
            }
            PatrolPhase::Pause { remaining } => {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    self.phase = Self::next_leg(&self.tuning, cx);
                }
            }
        }
    }
}

// ── HoverChase ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HoverChaseTuning {
    /// Firing range, metres (horizontal).
    pub reach_dist: f32,

    /// Give up beyond this distance, metres.
    pub lose_dist: f32,

    /// Hover height above the target, metres.
    pub hover_height: f32,

    /// Re-issue movement only when the approach point moved this far, metres.
    pub repath_dist: f32,
}

impl Default for HoverChaseTuning {
    fn default() -> Self {
        Self {
            reach_dist: 7.0,
            lose_dist: 35.0,
            hover_height: 3.0,
            repath_dist: 1.0,
        }
    }
}

/// Cluster-led approach at hover height.  Grouped drones let the coordinator
/// place them and only watch ranges; solo drones steer themselves.
pub struct HoverChase<T: TriggerKind> {
    tuning: HoverChaseTuning,
    in_range: T,
    lost: T,
    last_issued: Option<Vec3>,
}

impl<T: TriggerKind> HoverChase<T> {
    pub fn new(tuning: HoverChaseTuning, in_range: T, lost: T) -> Self {
        Self { tuning, in_range, lost, last_issued: None }
    }
}

impl<T: TriggerKind> Behavior<T> for HoverChase<T> {
    fn on_enter(&mut self, cx: &mut BehaviorCx<'_, T>) {
        self.last_issued = None;
        if let Some(group) = cx.groups.group_of(cx.agent)
            && let Some(cluster) = cx.groups.cluster_mut(group)
        {
            cluster.mark_dirty();
        }
    }

    fn on_exit(&mut self, cx: &mut BehaviorCx<'_, T>) {
        self.last_issued = None;
        cx.world.stop(cx.agent);
    }

    fn tick(&mut self, cx: &mut BehaviorCx<'_, T>, _dt: f32) {
        let Some(pos) = cx.position() else {
            return;
        };
        let Some(target) = cx.target_position() else {
            cx.fire(self.lost);
            return;
        };

        let dist = pos.distance_xz(target);
        if dist >= self.tuning.lose_dist {
            cx.fire(self.lost);
            return;
        }
        if dist <= self.tuning.reach_dist {
            cx.fire(self.in_range);
            return;
        }

        // Grouped drones fly where the coordinator puts them.
        if cx.groups.group_of(cx.agent).is_some() {
            return;
        }
        let mut approach = Vec3::approach_point(pos, target, self.tuning.reach_dist * 0.85);
        approach.y = target.y + self.tuning.hover_height;
        if self
            .last_issued
            .is_none_or(|p| p.distance(approach) > self.tuning.repath_dist)
        {
            cx.world.move_to(cx.agent, approach);
            self.last_issued = Some(approach);
        }
    }
}

// ── Volley ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VolleyTuning {
    /// Maximum firing range, metres (horizontal).
    pub range: f32,

    /// Damage per shot.
    pub damage: f32,

    /// Shots per volley.
    pub shots: u32,

    /// Spacing between shots inside a volley, seconds.
    pub shot_interval_secs: f32,

    /// Cooldown after a volley, seconds.
    pub cooldown_secs: f32,

    /// Cue played as the volley opens.
    pub cue: CueId,
}

impl Default for VolleyTuning {
    fn default() -> Self {
        Self {
            range: 8.0,
            damage: 4.0,
            shots: 3,
            shot_interval_secs: 0.25,
            cooldown_secs: 1.5,
            cue: CueId::INVALID,
        }
    }
}

enum VolleyPhase {
    Queued { retry: f32 },
    Firing { shots_left: u32, until_next: f32 },
    Cooldown { remaining: f32 },
}

/// Ranged volley with turn-queue admission.  Each shot lands only if the
/// target is inside range at that instant; out-of-range shots fizzle rather
/// than track.
pub struct Volley<T: TriggerKind> {
    tuning: VolleyTuning,
    out_of_range: T,
    target_lost: T,
    phase: VolleyPhase,
    holds_turn: bool,
}

impl<T: TriggerKind> Volley<T> {
    pub fn new(tuning: VolleyTuning, out_of_range: T, target_lost: T) -> Self {
        Self {
            tuning,
            out_of_range,
            target_lost,
            phase: VolleyPhase::Queued { retry: 0.0 },
            holds_turn: false,
        }
    }
}

impl<T: TriggerKind> Behavior<T> for Volley<T> {
    fn on_enter(&mut self, cx: &mut BehaviorCx<'_, T>) {
        self.phase = VolleyPhase::Queued { retry: 0.0 };
        self.holds_turn = false;
        cx.world.stop(cx.agent);
    }

    fn on_exit(&mut self, cx: &mut BehaviorCx<'_, T>) {
        if self.holds_turn {
            cx.groups.end_attack(cx.agent);
            self.holds_turn = false;
        }
        self.phase = VolleyPhase::Queued { retry: 0.0 };
    }

    fn tick(&mut self, cx: &mut BehaviorCx<'_, T>, dt: f32) {
        let Some(pos) = cx.position() else {
            return;
        };
        let Some(target) = cx.world.target_of(cx.agent) else {
            cx.fire(self.target_lost);
            return;
        };

        match &mut self.phase {
            VolleyPhase::Queued { retry } => {
                *retry -= dt;
                if *retry > 0.0 {
                    return;
                }
                *retry = RETRY_INTERVAL_SECS;
                if cx.groups.can_attack(cx.agent) && cx.groups.begin_attack(cx.agent) {
                    self.holds_turn = true;
                    cx.world.play_cue(cx.agent, self.tuning.cue);
                    self.phase = VolleyPhase::Firing {
                        shots_left: self.tuning.shots,
                        until_next: 0.0,
                    };
                }
            }
            VolleyPhase::Firing { shots_left, until_next } => {
                *until_next -= dt;
                if *until_next > 0.0 {
                    return;
                }
                let in_range = cx
                    .world
                    .position(target)
                    .is_some_and(|tp| pos.distance_xz(tp) <= self.tuning.range);
                if in_range {
                    cx.world.apply_damage(target, self.tuning.damage);
                }
                *shots_left -= 1;
                *until_next = self.tuning.shot_interval_secs;
                if *shots_left == 0 {
                    if self.holds_turn {
                        cx.groups.end_attack(cx.agent);
                        self.holds_turn = false;
                    }
                    self.phase =
                        VolleyPhase::Cooldown { remaining: self.tuning.cooldown_secs };
                }
            }
            VolleyPhase::Cooldown { remaining } => {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    let in_range = cx
                        .world
                        .position(target)
                        .is_some_and(|tp| pos.distance_xz(tp) <= self.tuning.range);
                    if in_range {
                        self.phase = VolleyPhase::Queued { retry: 0.0 };
                    } else {
                        cx.fire(self.out_of_range);
                    }
                }
            }
        }
    }
}

// ── Wiring ────────────────────────────────────────────────────────────────────

/// All drone behavior tuning in one place.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DroneTuning {
    pub patrol: PatrolTuning,
    pub chase:  HoverChaseTuning,
    pub volley: VolleyTuning,
    pub flee:   FleeTuning,
    pub death:  DeathTuning,
}

impl Default for DroneTuning {
    fn default() -> Self {
        Self {
            patrol: PatrolTuning::default(),
            chase:  HoverChaseTuning::default(),
            volley: VolleyTuning::default(),
            flee:   FleeTuning { self_remove: true, ..FleeTuning::default() },
            death:  DeathTuning::default(),
        }
    }
}

/// The drone transition graph.
pub fn drone_table() -> FsmResult<TransitionTable<DroneState, DroneTrigger>> {
    use DroneState as S;
    use DroneTrigger as T;

    TransitionTable::builder()
        .on(S::Patrol, T::SeeTarget, S::Chase)
        .on(S::Patrol, T::LowHealth, S::Flee)
        .on(S::Chase, T::InAttackRange, S::Attack)
        .on(S::Chase, T::LoseTarget, S::Patrol)
        .on(S::Chase, T::LowHealth, S::Flee)
        .on(S::Attack, T::OutOfAttackRange, S::Chase)
        .on(S::Attack, T::LoseTarget, S::Patrol)
        .on(S::Attack, T::LowHealth, S::Flee)
        .on(S::Flee, T::PocketReached, S::Patrol)
        .on(S::Patrol, T::Die, S::Death)
        .on(S::Chase, T::Die, S::Death)
        .on(S::Attack, T::Die, S::Death)
        .on(S::Flee, T::Die, S::Death)
        .terminal(S::Death)
        .build()
}

/// Build the full drone wiring: validated table plus a behavior registry
/// with `tuning` baked in.
pub fn drone_wiring(
    tuning: &DroneTuning,
) -> FsmResult<(
    Arc<TransitionTable<DroneState, DroneTrigger>>,
    BehaviorRegistry<DroneState, DroneTrigger>,
)> {
    use DroneState as S;
    use DroneTrigger as T;

    let table = Arc::new(drone_table()?);
    let mut behaviors = BehaviorRegistry::new();

    let t = tuning.patrol.clone();
    behaviors.register(S::Patrol, move || Patrol::new(t.clone(), T::SeeTarget));
    let t = tuning.chase.clone();
    behaviors.register(S::Chase, move || {
        HoverChase::new(t.clone(), T::InAttackRange, T::LoseTarget)
    });
    let t = tuning.volley.clone();
    behaviors.register(S::Attack, move || {
        Volley::new(t.clone(), T::OutOfAttackRange, T::LoseTarget)
    });
    let t = tuning.flee.clone();
    behaviors.register(S::Flee, move || Flee::new(t.clone(), Some(T::PocketReached)));
    let t = tuning.death.clone();
    behaviors.register(S::Death, move || Death::new(t.clone()));

    behaviors.validate(&table)?;
    Ok((table, behaviors))
}
