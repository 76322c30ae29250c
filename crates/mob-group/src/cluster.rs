//! One coordinated group: members, leader, formation, and active maneuver.
//!
//! # Leadership
//!
//! The leader is the first entry of the stable member list.  Removing the
//! leader promotes the next member (explicit promote-next policy); the
//! coordinator re-issues formation targets on the group's next evaluation,
//! so a leadership change costs at most one coordination interval of drift.

use mob_core::{AgentId, IntervalGate, Vec3, ZoneId};
use mob_timed::ProgressGuard;

// ── Tuning ────────────────────────────────────────────────────────────────────

/// Per-group coordination tuning.
#[derive(Clone, Debug)]
pub struct ClusterTuning {
    /// Seconds between coordinator evaluations of this group.  Coarser than
    /// the frame tick on purpose — one formation pass per interval, not per
    /// member per frame.
    pub interval_secs: f32,

    /// Formation ring radius around the shared target, metres.  Hosts derive
    /// this from the agents' attack range.
    pub ring_radius: f32,

    /// Per-member positional jitter applied to ring slots, metres.
    pub slot_jitter: f32,

    /// Soft deadline: earliest a repositioning may fire, seconds.
    pub window_min_secs: f32,

    /// Hard deadline: a repositioning fires at this age regardless of how
    /// many members have settled, seconds.
    pub window_max_secs: f32,

    /// Fraction of members that must be in their slots for the early
    /// (soft-deadline) repositioning to fire.
    pub early_arrival_frac: f32,

    /// A member is "in its slot" within this distance, metres.
    pub arrive_dist: f32,

    /// Probability that a repositioning adds 180° to the rotation offset,
    /// so members stop funneling through identical paths.
    pub cross_swap_prob: f64,

    /// Ambush clustering radius around the anchor, metres.
    pub ambush_radius: f32,

    /// How long the whole group must stay clustered before the ambush
    /// barrier releases, seconds.
    pub ambush_min_cluster_secs: f32,

    /// Relocation arrival fallback: when the destination zone is undefined,
    /// a member counts as arrived within this distance of the fallback
    /// point, metres.
    pub relocate_fallback_dist: f32,

    /// Stuck/timeout watchdog for relocation maneuvers.
    pub relocate_guard: ProgressGuard,

    /// Stuck/timeout watchdog for ambush maneuvers.
    pub ambush_guard: ProgressGuard,
}

impl Default for ClusterTuning {
    fn default() -> Self {
        Self {
            interval_secs: 0.2,
            ring_radius: 4.0,
            slot_jitter: 0.5,
            window_min_secs: 1.5,
            window_max_secs: 4.0,
            early_arrival_frac: 0.7,
            arrive_dist: 1.2,
            cross_swap_prob: 0.15,
            ambush_radius: 3.0,
            ambush_min_cluster_secs: 1.5,
            relocate_fallback_dist: 3.0,
            relocate_guard: ProgressGuard::new(5.0, 1.0, 0.25),
            ambush_guard: ProgressGuard::new(6.0, 1.0, 0.25),
        }
    }
}

// ── Maneuver ──────────────────────────────────────────────────────────────────

/// What the group is currently doing.
#[derive(Debug, Clone)]
pub enum Maneuver {
    /// Ring formation around the shared target (the default).
    Formation,

    /// Group relocation toward `dest` (or `fallback` when the zone layout
    /// doesn't define it).  Completes on majority arrival or failsafe.
    Relocate {
        dest: ZoneId,
        fallback: Vec3,
        guard: ProgressGuard,
    },

    /// Clustering at `anchor` until everyone has been inside the ambush
    /// radius for the minimum cluster time — a barrier: no member is
    /// released until the whole group is ready.
    Ambush {
        anchor: Vec3,
        clustered_secs: f32,
        guard: ProgressGuard,
    },
}

// ── Cluster ───────────────────────────────────────────────────────────────────

/// Mutable coordination record for one group.  Owned by the
/// [`GroupRegistry`][crate::GroupRegistry]; created with the group and
/// destroyed with it.
#[derive(Debug)]
pub struct Cluster {
    /// Stable member list.  Index 0 is the leader.
    pub members: Vec<AgentId>,

    pub tuning: ClusterTuning,

    /// Active maneuver.  Behaviors request changes through the registry;
    /// only the coordinator resolves them.
    pub maneuver: Maneuver,

    /// Last formation slot issued per member (parallel to `members`).
    /// Empty until the first repositioning.
    pub slots: Vec<Vec3>,

    /// Rotation offset for ring slots, radians.  Cross-swaps add 180°.
    pub base_angle: f32,

    /// Last shared target position the leader computed.
    pub shared_target: Option<Vec3>,

    pub(crate) gate: IntervalGate,
    /// Seconds since the last repositioning fired.
    pub(crate) window_age: f32,
    /// Delta accumulated since the last gated evaluation.
    pub(crate) eval_dt: f32,
}

impl Cluster {
    pub fn new(tuning: ClusterTuning) -> Self {
        let gate = IntervalGate::new(tuning.interval_secs);
        Self {
            members: Vec::new(),
            tuning,
            maneuver: Maneuver::Formation,
            slots: Vec::new(),
            base_angle: 0.0,
            shared_target: None,
            gate,
            window_age: f32::MAX, // first evaluation repositions immediately
            eval_dt: 0.0,
        }
    }

    /// The current leader — the single member authorized to compute shared
    /// movement for the group.
    pub fn leader(&self) -> Option<AgentId> {
        self.members.first().copied()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.members.contains(&agent)
    }

    /// Append a member and mark the formation stale.
    pub fn add_member(&mut self, agent: AgentId) {
        if !self.contains(agent) {
            self.members.push(agent);
            self.mark_dirty();
        }
    }

    /// Remove a member.  Removing index 0 promotes the next member to
    /// leader; the coordinator recomputes targets on the next evaluation.
    pub fn remove_member(&mut self, agent: AgentId) {
        if let Some(i) = self.members.iter().position(|&a| a == agent) {
            self.members.remove(i);
            if i < self.slots.len() {
                self.slots.remove(i);
            }
            self.mark_dirty();
        }
    }

    /// Force a repositioning at the next evaluation — called when slot
    /// membership changes (a member attacks, joins, or leaves).
    pub fn mark_dirty(&mut self) {
        self.window_age = f32::MAX;
    }

    /// Majority threshold for relocation arrival: `ceil(n / 2)`.
    pub fn majority(&self) -> usize {
        self.members.len().div_ceil(2)
    }
}
