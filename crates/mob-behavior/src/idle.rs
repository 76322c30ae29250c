//! Idle — wander inside the assigned zone until something happens.
//!
//! Each leg commits to one wander target until arrival or the travel
//! failsafe resolves, then pauses a random interval before the next pick.
//! After a configurable dwell with no transition, the behavior requests a
//! relocation (only when an alternate zone actually exists).

use mob_core::Vec3;
use mob_fsm::{Behavior, BehaviorCx, TriggerKind};
use mob_timed::{GuardVerdict, ProgressGuard};

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdleTuning {
    /// Hard cap on one wander leg, seconds.
    pub travel_timeout_secs: f32,

    /// Pause between legs, uniform in `[min, max]` seconds.
    pub pause_min_secs: f32,
    pub pause_max_secs: f32,

    /// A leg counts as arrived within this distance, metres.
    pub arrive_dist: f32,

    /// Dwell with no transition before a relocation is requested, seconds.
    pub dwell_secs: f32,

    /// Wander leg length when the agent has no zone assignment, metres.
    pub fallback_radius: f32,
}

impl Default for IdleTuning {
    fn default() -> Self {
        Self {
            travel_timeout_secs: 8.0,
            pause_min_secs: 0.5,
            pause_max_secs: 3.0,
            arrive_dist: 0.6,
            dwell_secs: 25.0,
            fallback_radius: 6.0,
        }
    }
}

enum Phase {
    Travel { target: Vec3, guard: ProgressGuard },
    Pause { remaining: f32 },
}

pub struct Idle<T: TriggerKind> {
    tuning: IdleTuning,
    /// Fired when the host's perception layer hands the agent a target.
    spot: Option<T>,
    /// Fired after the dwell elapses with alternate zones available.
    relocate: Option<T>,
    phase: Phase,
    dwell: f32,
}

impl<T: TriggerKind> Idle<T> {
    pub fn new(tuning: IdleTuning, spot: Option<T>, relocate: Option<T>) -> Self {
        Self {
            tuning,
            spot,
            relocate,
            phase: Phase::Pause { remaining: 0.0 },
            dwell: 0.0,
        }
    }

    /// Pick the next wander target and start traveling toward it.
    fn next_leg(tuning: &IdleTuning, cx: &mut BehaviorCx<'_, T>) -> Phase {
        let zone = cx
            .groups
            .zone_assignment(cx.agent)
            .and_then(|id| cx.groups.zones().get(id))
            .cloned();
        let target = match (zone, cx.position()) {
            (Some(zone), _) => zone.random_point(cx.rng),
            (None, Some(pos)) => {
                let angle = cx.rng.angle();
                let r = cx.rng.gen_range(1.0..tuning.fallback_radius.max(1.5));
                pos + Vec3::new(r * angle.cos(), 0.0, r * angle.sin())
            }
            // Stale handle: wait a beat and retry instead of faulting.
            (None, None) => return Phase::Pause { remaining: 0.5 },
        };
        cx.world.move_to(cx.agent, target);
        Phase::Travel {
            target,
            guard: ProgressGuard::new(tuning.travel_timeout_secs, 1.0, 0.25),
        }
    }
}

impl<T: TriggerKind> Behavior<T> for Idle<T> {
    fn on_enter(&mut self, cx: &mut BehaviorCx<'_, T>) {
        self.dwell = 0.0;
        self.phase = Self::next_leg(&self.tuning, cx);
    }

    fn on_exit(&mut self, cx: &mut BehaviorCx<'_, T>) {
        cx.world.stop(cx.agent);
    }

    fn tick(&mut self, cx: &mut BehaviorCx<'_, T>, dt: f32) {
        if let Some(spot) = self.spot
            && cx.world.target_of(cx.agent).is_some()
        {
            cx.fire(spot);
            return;
        }

        self.dwell += dt;
        if let Some(relocate) = self.relocate
            && self.dwell >= self.tuning.dwell_secs
            && cx.groups.zones().len() > 1
        {
            cx.fire(relocate);
            return;
        }

        match &mut self.phase {
            Phase::Travel { target, guard } => {
                let pos = cx.position();
                let arrived =
                    pos.is_some_and(|p| p.distance_xz(*target) <= self.tuning.arrive_dist);
                if arrived || guard.poll(pos, dt) != GuardVerdict::Waiting {
                    cx.world.stop(cx.agent);
                    let remaining = cx
                        .rng
                        .gen_range(self.tuning.pause_min_secs..=self.tuning.pause_max_secs);
                    self.phase = Phase::Pause { remaining };
                }
            }
            Phase::Pause { remaining } => {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    self.phase = Self::next_leg(&self.tuning, cx);
                }
            }
        }
    }
}
