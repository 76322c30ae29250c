//! Ambush — wait behind the group clustering barrier.
//!
//! The leader requests the cluster maneuver on entry; the coordinator
//! releases the whole group at once (everyone clustered long enough, or the
//! failsafe), and the orchestrator maps that event onto the ready trigger.
//! No member proceeds alone.

use mob_core::Vec3;
use mob_fsm::{Behavior, BehaviorCx, TriggerKind};

pub struct Ambush<T: TriggerKind> {
    /// Fixed anchor, or `None` to cluster at the leader's position on entry.
    anchor: Option<Vec3>,
    /// Fired directly for ungrouped agents, which have nobody to wait for.
    ready: T,
}

impl<T: TriggerKind> Ambush<T> {
    pub fn new(anchor: Option<Vec3>, ready: T) -> Self {
        Self { anchor, ready }
    }
}

impl<T: TriggerKind> Behavior<T> for Ambush<T> {
    fn on_enter(&mut self, cx: &mut BehaviorCx<'_, T>) {
        let Some(group) = cx.groups.group_of(cx.agent) else {
            cx.fire(self.ready);
            return;
        };
        let is_leader = cx
            .groups
            .cluster(group)
            .is_some_and(|c| c.leader() == Some(cx.agent));
        if is_leader {
            let anchor = self
                .anchor
                .or_else(|| cx.position())
                .unwrap_or(Vec3::ZERO);
            cx.groups.request_ambush(group, anchor).ok();
        }
    }

    fn tick(&mut self, _cx: &mut BehaviorCx<'_, T>, _dt: f32) {
        // The coordinator owns movement and the release decision.
    }
}
