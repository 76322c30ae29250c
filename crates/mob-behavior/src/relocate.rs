//! Relocate — move to a different zone.
//!
//! Grouped agents relocate as a unit: the leader picks the destination
//! (uniform among zones excluding the current one) and requests the cluster
//! maneuver; completion arrives as a group event mapped onto the done
//! trigger by the orchestrator.  Followers only sync their zone-of-record to
//! the maneuver's destination.
//!
//! Ungrouped agents run the same policy solo with a local travel failsafe.

use mob_core::{Vec3, ZoneId};
use mob_fsm::{Behavior, BehaviorCx, TriggerKind};
use mob_group::Maneuver;
use mob_timed::{GuardVerdict, ProgressGuard};

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelocateTuning {
    /// Solo arrival distance when the destination zone has no geometry, metres.
    pub arrive_dist: f32,

    /// Hard cap on a solo relocation leg, seconds.
    pub travel_timeout_secs: f32,
}

impl Default for RelocateTuning {
    fn default() -> Self {
        Self { arrive_dist: 1.5, travel_timeout_secs: 8.0 }
    }
}

struct SoloLeg {
    target: Vec3,
    guard:  ProgressGuard,
}

pub struct Relocate<T: TriggerKind> {
    tuning: RelocateTuning,
    done:   T,
    solo:   Option<SoloLeg>,
}

impl<T: TriggerKind> Relocate<T> {
    pub fn new(tuning: RelocateTuning, done: T) -> Self {
        Self { tuning, done, solo: None }
    }

    fn current_zone(cx: &BehaviorCx<'_, T>) -> ZoneId {
        cx.groups
            .zone_assignment(cx.agent)
            .or_else(|| cx.position().and_then(|p| cx.groups.zones().zone_at(p)))
            .unwrap_or(ZoneId::INVALID)
    }
}

impl<T: TriggerKind> Behavior<T> for Relocate<T> {
    fn on_enter(&mut self, cx: &mut BehaviorCx<'_, T>) {
        self.solo = None;
        let agent = cx.agent;

        let Some(group) = cx.groups.group_of(agent) else {
            // Solo path: pick, move, watch.  No alternative zone means there
            // is nothing to do — resolve immediately rather than hang.
            let current = Self::current_zone(cx);
            let Some(dest) = cx.groups.zones().pick_other(current, cx.rng) else {
                cx.fire(self.done);
                return;
            };
            let Some(target) = cx
                .groups
                .zones()
                .get(dest)
                .cloned()
                .map(|z| z.random_point(cx.rng))
            else {
                cx.fire(self.done);
                return;
            };
            cx.groups.assign_zone(agent, dest);
            cx.world.move_to(agent, target);
            self.solo = Some(SoloLeg {
                target,
                guard: ProgressGuard::new(self.tuning.travel_timeout_secs, 1.0, 0.25),
            });
            return;
        };

        let is_leader = cx
            .groups
            .cluster(group)
            .is_some_and(|c| c.leader() == Some(agent));
        if is_leader {
            let current = Self::current_zone(cx);
            // No alternative zone still requests the maneuver: the guard
            // resolves it within the failsafe window instead of hanging.
            let dest = cx
                .groups
                .zones()
                .pick_other(current, cx.rng)
                .unwrap_or(ZoneId::INVALID);
            cx.groups.request_relocate(group, dest).ok();
        }
    }

    fn on_exit(&mut self, cx: &mut BehaviorCx<'_, T>) {
        self.solo = None;
        cx.world.stop(cx.agent);
    }

    fn tick(&mut self, cx: &mut BehaviorCx<'_, T>, dt: f32) {
        match &mut self.solo {
            Some(leg) => {
                let pos = cx.position();
                let dest = cx.groups.zone_assignment(cx.agent);
                let arrived = pos.is_some_and(|p| {
                    match dest.and_then(|d| cx.groups.zones().get(d)) {
                        Some(zone) => zone.contains(p),
                        None => p.distance_xz(leg.target) <= self.tuning.arrive_dist,
                    }
                });
                if arrived || leg.guard.poll(pos, dt) != GuardVerdict::Waiting {
                    cx.world.stop(cx.agent);
                    cx.fire(self.done);
                }
            }
            None => {
                // Follower: keep the zone-of-record in step with the group's
                // destination so Idle wanders in the right place afterwards.
                if let Some(group) = cx.groups.group_of(cx.agent)
                    && let Some(cluster) = cx.groups.cluster(group)
                    && let Maneuver::Relocate { dest, .. } = &cluster.maneuver
                {
                    let dest = *dest;
                    if dest != ZoneId::INVALID
                        && cx.groups.zone_assignment(cx.agent) != Some(dest)
                    {
                        cx.groups.assign_zone(cx.agent, dest);
                    }
                }
            }
        }
    }
}
