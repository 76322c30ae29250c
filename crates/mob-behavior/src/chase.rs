//! Chase — steer for a standoff point near the target, not the target itself.
//!
//! Movement commands are re-issued only when the computed approach point
//! drifts past a hysteresis distance, so a strafing target doesn't turn into
//! a `move_to` per frame against the host's navigation.

use mob_core::Vec3;
use mob_fsm::{Behavior, BehaviorCx, TriggerKind};

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChaseTuning {
    /// Standoff distance, derived from attack range, metres.
    pub reach_dist: f32,

    /// Give up beyond this distance, metres.
    pub lose_dist: f32,

    /// Re-issue movement only when the approach point moved this far, metres.
    pub repath_dist: f32,
}

impl Default for ChaseTuning {
    fn default() -> Self {
        Self { reach_dist: 2.0, lose_dist: 25.0, repath_dist: 0.75 }
    }
}

pub struct Chase<T: TriggerKind> {
    tuning: ChaseTuning,
    in_range: T,
    lost: T,
    last_issued: Option<Vec3>,
}

impl<T: TriggerKind> Chase<T> {
    pub fn new(tuning: ChaseTuning, in_range: T, lost: T) -> Self {
        Self { tuning, in_range, lost, last_issued: None }
    }
}

impl<T: TriggerKind> Behavior<T> for Chase<T> {
    fn on_enter(&mut self, _cx: &mut BehaviorCx<'_, T>) {
        self.last_issued = None;
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

        // Slightly inside reach so the range check holds on arrival.
        let approach = Vec3::approach_point(pos, target, self.tuning.reach_dist * 0.85);
        if self
            .last_issued
            .is_none_or(|p| p.distance(approach) > self.tuning.repath_dist)
        {
            cx.world.move_to(cx.agent, approach);
            self.last_issued = Some(approach);
        }
    }
}
