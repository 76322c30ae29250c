//! Swarm — hold a formation slot and gate the transition into Attack.
//!
//! Movement belongs to the coordinator while swarming; this behavior only
//! watches ranges and the turn queue.  An agent leaves for Attack when the
//! target is in reach *and* the queue would admit it, so a twelve-strong
//! swarm feeds attackers one at a time instead of dogpiling.

use mob_fsm::{Behavior, BehaviorCx, TriggerKind};

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwarmTuning {
    /// Target distance at which an admitted member engages, metres.
    pub engage_dist: f32,

    /// Formation breaks past this target distance, metres.
    pub lose_dist: f32,
}

impl Default for SwarmTuning {
    fn default() -> Self {
        Self { engage_dist: 3.0, lose_dist: 30.0 }
    }
}

pub struct Swarm<T: TriggerKind> {
    tuning: SwarmTuning,
    engage: T,
    lost: T,
}

impl<T: TriggerKind> Swarm<T> {
    pub fn new(tuning: SwarmTuning, engage: T, lost: T) -> Self {
        Self { tuning, engage, lost }
    }
}

impl<T: TriggerKind> Behavior<T> for Swarm<T> {
    fn on_enter(&mut self, cx: &mut BehaviorCx<'_, T>) {
        // Joining the ring invalidates the current slot layout.
        if let Some(group) = cx.groups.group_of(cx.agent)
            && let Some(cluster) = cx.groups.cluster_mut(group)
        {
            cluster.mark_dirty();
        }
    }

    fn tick(&mut self, cx: &mut BehaviorCx<'_, T>, _dt: f32) {
        let Some(pos) = cx.position() else {
            return;
        };
        match cx.target_position() {
            Some(target) => {
                let dist = pos.distance_xz(target);
                if dist >= self.tuning.lose_dist {
                    cx.fire(self.lost);
                } else if dist <= self.tuning.engage_dist && cx.groups.can_attack(cx.agent) {
                    cx.fire(self.engage);
                }
            }
            // No own target and no shared one either: the hunt is over.
            None => {
                if cx.groups.shared_target(cx.agent).is_none() {
                    cx.fire(self.lost);
                }
            }
        }
    }
}
