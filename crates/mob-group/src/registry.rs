//! `GroupRegistry` — session-owned membership, zones, and group records.
//!
//! Behaviors reach cross-agent state exclusively through this registry (via
//! their behavior context); the coordinator mutates it once per interval.
//! Events produced by maneuvers are buffered here and drained by the
//! orchestrator, which maps them onto whatever trigger enum the agent kind
//! uses — this crate stays trigger-type-agnostic.

use std::collections::BTreeMap;

use mob_core::{AgentId, GroupId, Vec3, ZoneId, ZoneSet};
use rustc_hash::FxHashMap;

use crate::cluster::Maneuver;
use crate::{AttackTurnQueue, Cluster, ClusterTuning, GroupError, GroupResult};

// ── Events ────────────────────────────────────────────────────────────────────

/// A coordination outcome addressed to one member.  The orchestrator maps
/// these onto agent-kind triggers and fires them.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum GroupEvent {
    /// The ambush barrier released: the whole group clustered long enough
    /// (or the failsafe forced it).  Sent to every member simultaneously.
    AmbushReady,

    /// The group relocation completed: a majority arrived in the destination
    /// zone (or the failsafe forced it).  Sent to every member.
    RelocateComplete,
}

// ── Registry ──────────────────────────────────────────────────────────────────

/// All group-coordination state for one session.
///
/// Clusters and queues are kept in `BTreeMap`s so coordinator iteration is
/// deterministic in `GroupId` order; per-agent lookups use `FxHashMap`.
pub struct GroupRegistry {
    zones: ZoneSet,
    clusters: BTreeMap<GroupId, Cluster>,
    queues: BTreeMap<GroupId, AttackTurnQueue>,
    membership: FxHashMap<AgentId, GroupId>,
    zone_of: FxHashMap<AgentId, ZoneId>,
    pub(crate) events: Vec<(AgentId, GroupEvent)>,
}

impl GroupRegistry {
    pub fn new(zones: ZoneSet) -> Self {
        Self {
            zones,
            clusters: BTreeMap::new(),
            queues: BTreeMap::new(),
            membership: FxHashMap::default(),
            zone_of: FxHashMap::default(),
            events: Vec::new(),
        }
    }

    pub fn zones(&self) -> &ZoneSet {
        &self.zones
    }

    // ── Group lifecycle ───────────────────────────────────────────────────

    /// Create an empty group.  Errors if the ID is taken.
    pub fn create_group(&mut self, group: GroupId, tuning: ClusterTuning) -> GroupResult<()> {
        if self.clusters.contains_key(&group) {
            return Err(GroupError::GroupExists(group));
        }
        self.clusters.insert(group, Cluster::new(tuning));
        self.queues.insert(group, AttackTurnQueue::new());
        Ok(())
    }

    /// Destroy a group and unlink all its members.
    pub fn destroy_group(&mut self, group: GroupId) {
        if let Some(cluster) = self.clusters.remove(&group) {
            for agent in cluster.members {
                self.membership.remove(&agent);
            }
        }
        self.queues.remove(&group);
    }

    /// Add `agent` to `group` (cluster membership + turn queue).
    pub fn add_member(&mut self, group: GroupId, agent: AgentId) -> GroupResult<()> {
        let cluster = self
            .clusters
            .get_mut(&group)
            .ok_or(GroupError::GroupNotFound(group))?;
        cluster.add_member(agent);
        self.queues.entry(group).or_default().join(agent);
        self.membership.insert(agent, group);
        Ok(())
    }

    /// Remove `agent` from whatever group it belongs to (plus queue and
    /// zone-of-record).  Safe to call for ungrouped agents.
    pub fn remove_agent(&mut self, agent: AgentId) {
        if let Some(group) = self.membership.remove(&agent) {
            if let Some(cluster) = self.clusters.get_mut(&group) {
                cluster.remove_member(agent);
            }
            if let Some(queue) = self.queues.get_mut(&group) {
                queue.leave(agent);
            }
        }
        self.zone_of.remove(&agent);
    }

    pub fn group_of(&self, agent: AgentId) -> Option<GroupId> {
        self.membership.get(&agent).copied()
    }

    pub fn cluster(&self, group: GroupId) -> Option<&Cluster> {
        self.clusters.get(&group)
    }

    pub fn cluster_mut(&mut self, group: GroupId) -> Option<&mut Cluster> {
        self.clusters.get_mut(&group)
    }

    pub(crate) fn clusters_mut(
        &mut self,
    ) -> (&mut BTreeMap<GroupId, Cluster>, &ZoneSet, &mut Vec<(AgentId, GroupEvent)>) {
        (&mut self.clusters, &self.zones, &mut self.events)
    }

    // ── Attack admission (solo agents always pass) ────────────────────────

    /// `true` if `agent` may open an attack window now.  Ungrouped agents
    /// have no queue and always may.
    pub fn can_attack(&self, agent: AgentId) -> bool {
        match self.group_of(agent).and_then(|g| self.queues.get(&g)) {
            Some(queue) => queue.can_attack(agent),
            None => true,
        }
    }

    /// Claim the attack window.  Marks the formation stale so the ring
    /// recomputes around the attacker's vacated slot.
    pub fn begin_attack(&mut self, agent: AgentId) -> bool {
        match self.group_of(agent) {
            Some(group) => {
                let ok = self
                    .queues
                    .get_mut(&group)
                    .is_some_and(|q| q.notify_begin(agent));
                if ok && let Some(cluster) = self.clusters.get_mut(&group) {
                    cluster.mark_dirty();
                }
                ok
            }
            None => true,
        }
    }

    /// Release the attack window and rotate the turn order.
    pub fn end_attack(&mut self, agent: AgentId) {
        if let Some(group) = self.group_of(agent)
            && let Some(queue) = self.queues.get_mut(&group)
        {
            queue.notify_end(agent);
        }
    }

    pub fn queue(&self, group: GroupId) -> Option<&AttackTurnQueue> {
        self.queues.get(&group)
    }

    // ── Zone assignment ───────────────────────────────────────────────────

    pub fn zone_assignment(&self, agent: AgentId) -> Option<ZoneId> {
        self.zone_of.get(&agent).copied()
    }

    pub fn assign_zone(&mut self, agent: AgentId, zone: ZoneId) {
        self.zone_of.insert(agent, zone);
    }

    // ── Maneuver requests (resolved by the coordinator) ───────────────────

    /// Begin a group relocation to `dest`.  Idempotent while already
    /// relocating to the same zone.
    pub fn request_relocate(&mut self, group: GroupId, dest: ZoneId) -> GroupResult<()> {
        let zones = &self.zones;
        let cluster = self
            .clusters
            .get_mut(&group)
            .ok_or(GroupError::GroupNotFound(group))?;
        if let Maneuver::Relocate { dest: cur, .. } = &cluster.maneuver
            && *cur == dest
        {
            return Ok(());
        }
        let fallback = zones
            .get(dest)
            .map(|z| z.center)
            .unwrap_or(Vec3::ZERO);
        let mut guard = cluster.tuning.relocate_guard.clone();
        guard.reset();
        cluster.maneuver = Maneuver::Relocate { dest, fallback, guard };
        // Slots from a prior formation pass are stale now; clearing them
        // makes the coordinator issue movement toward the destination on its
        // next evaluation.
        cluster.slots.clear();
        cluster.mark_dirty();
        Ok(())
    }

    /// Begin an ambush cluster at `anchor`.
    pub fn request_ambush(&mut self, group: GroupId, anchor: Vec3) -> GroupResult<()> {
        let cluster = self
            .clusters
            .get_mut(&group)
            .ok_or(GroupError::GroupNotFound(group))?;
        let mut guard = cluster.tuning.ambush_guard.clone();
        guard.reset();
        cluster.maneuver = Maneuver::Ambush { anchor, clustered_secs: 0.0, guard };
        cluster.slots.clear();
        cluster.mark_dirty();
        Ok(())
    }

    /// The shared target position of `agent`'s cluster, if its leader has
    /// computed one.
    pub fn shared_target(&self, agent: AgentId) -> Option<Vec3> {
        self.group_of(agent)
            .and_then(|g| self.clusters.get(&g))
            .and_then(|c| c.shared_target)
    }

    /// Drain buffered coordination events for the orchestrator to map onto
    /// triggers.
    pub fn drain_events(&mut self) -> Vec<(AgentId, GroupEvent)> {
        std::mem::take(&mut self.events)
    }
}
