//! `ClusterCoordinator` — the batched per-group coordination tick.
//!
//! Only the group leader's data drives shared decisions: the leader's hunt
//! target becomes the formation center and the leader's position feeds the
//! maneuver watchdogs.  Followers never compute destinations — the
//! coordinator issues one `move_to` per member per repositioning, which is
//! what keeps an N-strong group at one pathfinding request burst per window
//! instead of N per frame.
//!
//! Repositioning is discrete and time-windowed: a soft deadline fires once a
//! configured majority of members have settled into their slots, and a hard
//! deadline fires regardless — balancing responsiveness against locomotion
//! settling time.

use std::f32::consts::PI;

use mob_core::{AgentWorld, SimRng, Vec3, ZoneSet};

use crate::cluster::{Cluster, Maneuver};
use crate::registry::{GroupEvent, GroupRegistry};
use mob_timed::GuardVerdict;

/// How a gated evaluation resolved the group's maneuver, if at all.
enum Resolution {
    Pending,
    AmbushReady,
    RelocateComplete,
}

/// Drives every cluster in a [`GroupRegistry`] from the host frame loop.
pub struct ClusterCoordinator {
    rng: SimRng,
}

impl ClusterCoordinator {
    pub fn new(session_seed: u64) -> Self {
        Self { rng: SimRng::new(session_seed) }
    }

    /// Advance all groups by one frame.  Each group is evaluated only when
    /// its own coordination interval elapses; completed maneuvers buffer
    /// [`GroupEvent`]s on the registry for the orchestrator to drain.
    pub fn tick(&mut self, dt: f32, registry: &mut GroupRegistry, world: &mut dyn AgentWorld) {
        let (clusters, zones, events) = registry.clusters_mut();

        for (_group, cluster) in clusters.iter_mut() {
            cluster.window_age += dt.max(0.0);
            cluster.eval_dt += dt.max(0.0);
            if !cluster.gate.ready(dt) || cluster.is_empty() {
                continue;
            }
            let eval_dt = std::mem::replace(&mut cluster.eval_dt, 0.0);

            let resolution = Self::evaluate(cluster, eval_dt, zones, world, &mut self.rng);

            match resolution {
                Resolution::Pending => {}
                Resolution::AmbushReady => {
                    events.extend(cluster.members.iter().map(|&a| (a, GroupEvent::AmbushReady)));
                    cluster.maneuver = Maneuver::Formation;
                    cluster.mark_dirty();
                }
                Resolution::RelocateComplete => {
                    events.extend(
                        cluster.members.iter().map(|&a| (a, GroupEvent::RelocateComplete)),
                    );
                    cluster.maneuver = Maneuver::Formation;
                    cluster.mark_dirty();
                }
            }
        }
    }

    fn evaluate(
        cluster: &mut Cluster,
        eval_dt: f32,
        zones: &ZoneSet,
        world: &mut dyn AgentWorld,
        rng: &mut SimRng,
    ) -> Resolution {
        let leader_pos = cluster.leader().and_then(|l| world.position(l));

        match &mut cluster.maneuver {
            // ── Ring formation around the shared target ───────────────────
            Maneuver::Formation => {
                let n = cluster.members.len();
                let due_hard = cluster.window_age >= cluster.tuning.window_max_secs;
                let due_soft = cluster.window_age >= cluster.tuning.window_min_secs
                    && Self::settled_frac(&cluster.members, &cluster.slots, world, cluster.tuning.arrive_dist)
                        >= cluster.tuning.early_arrival_frac;
                if !(due_hard || due_soft) {
                    return Resolution::Pending;
                }

                // Shared target = the leader's hunt target, as the host's
                // perception layer sees it.  No target, no formation.
                let target_pos = cluster
                    .leader()
                    .and_then(|l| world.target_of(l))
                    .and_then(|t| world.position(t));
                let Some(center) = target_pos else {
                    cluster.shared_target = None;
                    cluster.slots.clear();
                    return Resolution::Pending;
                };

                if rng.gen_bool(cluster.tuning.cross_swap_prob) {
                    cluster.base_angle += PI;
                }

                let radius = cluster.tuning.ring_radius;
                let jitter = cluster.tuning.slot_jitter;
                cluster.slots = (0..n)
                    .map(|i| {
                        let slot = Vec3::ring_slot(center, radius, i, n, cluster.base_angle);
                        slot + Self::jitter_offset(rng, jitter)
                    })
                    .collect();
                for (i, &member) in cluster.members.iter().enumerate() {
                    world.move_to(member, cluster.slots[i]);
                }
                cluster.shared_target = Some(center);
                cluster.window_age = 0.0;
                Resolution::Pending
            }

            // ── Group relocation: majority arrival or failsafe ────────────
            Maneuver::Relocate { dest, fallback, guard } => {
                let zone = zones.get(*dest);
                let scatter_center = zone.map(|z| z.center).unwrap_or(*fallback);
                let scatter_radius = zone
                    .map(|z| (z.radius * 0.5).min(cluster.tuning.ring_radius))
                    .unwrap_or(cluster.tuning.ring_radius);

                // Issue movement once per membership change, not per eval.
                if cluster.slots.len() != cluster.members.len() {
                    let n = cluster.members.len();
                    cluster.slots = (0..n)
                        .map(|i| Vec3::ring_slot(scatter_center, scatter_radius, i, n, cluster.base_angle))
                        .collect();
                    for (i, &member) in cluster.members.iter().enumerate() {
                        world.move_to(member, cluster.slots[i]);
                    }
                    cluster.window_age = 0.0;
                }

                let arrived = cluster
                    .members
                    .iter()
                    .filter_map(|&m| world.position(m))
                    .filter(|&p| match zone {
                        Some(z) => z.contains(p),
                        None => p.distance_xz(*fallback) <= cluster.tuning.relocate_fallback_dist,
                    })
                    .count();
                let majority = cluster.members.len().div_ceil(2);
                if arrived >= majority {
                    return Resolution::RelocateComplete;
                }
                match guard.poll(leader_pos, eval_dt) {
                    GuardVerdict::Waiting => Resolution::Pending,
                    GuardVerdict::Stuck | GuardVerdict::TimedOut => Resolution::RelocateComplete,
                }
            }

            // ── Ambush barrier: everyone clustered for long enough ────────
            Maneuver::Ambush { anchor, clustered_secs, guard } => {
                if cluster.slots.len() != cluster.members.len() {
                    let n = cluster.members.len();
                    let radius = cluster.tuning.ambush_radius * 0.6;
                    cluster.slots = (0..n)
                        .map(|i| Vec3::ring_slot(*anchor, radius, i, n, cluster.base_angle))
                        .collect();
                    for (i, &member) in cluster.members.iter().enumerate() {
                        world.move_to(member, cluster.slots[i]);
                    }
                    cluster.window_age = 0.0;
                }

                let all_inside = cluster.members.iter().all(|&m| {
                    world
                        .position(m)
                        .is_some_and(|p| p.distance_xz(*anchor) <= cluster.tuning.ambush_radius)
                });
                *clustered_secs = if all_inside { *clustered_secs + eval_dt } else { 0.0 };

                if *clustered_secs >= cluster.tuning.ambush_min_cluster_secs {
                    return Resolution::AmbushReady;
                }
                match guard.poll(leader_pos, eval_dt) {
                    GuardVerdict::Waiting => Resolution::Pending,
                    GuardVerdict::Stuck | GuardVerdict::TimedOut => Resolution::AmbushReady,
                }
            }
        }
    }

    /// Fraction of members within `arrive_dist` of their issued slot.
    /// Zero when no slots have been issued yet.
    fn settled_frac(
        members: &[mob_core::AgentId],
        slots: &[Vec3],
        world: &dyn AgentWorld,
        arrive_dist: f32,
    ) -> f32 {
        if members.is_empty() || slots.len() != members.len() {
            return 0.0;
        }
        let settled = members
            .iter()
            .zip(slots)
            .filter(|&(&m, &slot)| {
                world.position(m).is_some_and(|p| p.distance_xz(slot) <= arrive_dist)
            })
            .count();
        settled as f32 / members.len() as f32
    }

    fn jitter_offset(rng: &mut SimRng, half: f32) -> Vec3 {
        if half <= 0.0 {
            return Vec3::ZERO;
        }
        Vec3::new(rng.gen_range(-half..=half), 0.0, rng.gen_range(-half..=half))
    }
}
