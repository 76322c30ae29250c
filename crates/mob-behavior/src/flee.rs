//! Flee — retreat to a designated pocket.
//!
//! Arrival (or the travel failsafe, whichever first) resolves the retreat:
//! disposable agents leave their group and deactivate themselves; the rest
//! fire the arrival trigger and let the table route them onward (commonly to
//! Recover).

use mob_core::Vec3;
use mob_fsm::{Behavior, BehaviorCx, TriggerKind};
use mob_timed::{GuardVerdict, ProgressGuard};

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FleeTuning {
    /// The retreat point.
    pub pocket: Vec3,

    /// Arrived within this distance of the pocket, metres.
    pub arrive_dist: f32,

    /// Hard cap on the retreat, seconds.
    pub travel_timeout_secs: f32,

    /// Disposable agents deactivate on arrival instead of transitioning.
    pub self_remove: bool,
}

impl Default for FleeTuning {
    fn default() -> Self {
        Self {
            pocket: Vec3::ZERO,
            arrive_dist: 1.0,
            travel_timeout_secs: 10.0,
            self_remove: false,
        }
    }
}

pub struct Flee<T: TriggerKind> {
    tuning: FleeTuning,
    arrived: Option<T>,
    guard: ProgressGuard,
    resolved: bool,
}

impl<T: TriggerKind> Flee<T> {
    pub fn new(tuning: FleeTuning, arrived: Option<T>) -> Self {
        let guard = ProgressGuard::new(tuning.travel_timeout_secs, 1.0, 0.25);
        Self { tuning, arrived, guard, resolved: false }
    }
}

impl<T: TriggerKind> Behavior<T> for Flee<T> {
    fn on_enter(&mut self, cx: &mut BehaviorCx<'_, T>) {
        self.guard.reset();
        self.resolved = false;
        cx.world.move_to(cx.agent, self.tuning.pocket);
    }

    fn on_exit(&mut self, cx: &mut BehaviorCx<'_, T>) {
        cx.world.stop(cx.agent);
    }

    fn tick(&mut self, cx: &mut BehaviorCx<'_, T>, dt: f32) {
        if self.resolved {
            return;
        }
        let pos = cx.position();
        let arrived =
            pos.is_some_and(|p| p.distance_xz(self.tuning.pocket) <= self.tuning.arrive_dist);
        if !arrived && self.guard.poll(pos, dt) == GuardVerdict::Waiting {
            return;
        }

        self.resolved = true;
        cx.world.stop(cx.agent);
        if self.tuning.self_remove {
            cx.groups.remove_agent(cx.agent);
            cx.world.deactivate(cx.agent);
        } else if let Some(arrived) = self.arrived {
            cx.fire(arrived);
        }
    }
}
