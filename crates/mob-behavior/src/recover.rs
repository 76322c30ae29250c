//! Recover — exponential heal toward a fraction of max health.
//!
//! The per-tick amount is `rate × (max − current) × dt`, so healing is fast
//! when badly hurt and tapers as the agent approaches the threshold.  The
//! amount is clamped so health never overshoots the target fraction.

use mob_fsm::{Behavior, BehaviorCx, TriggerKind};

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecoverTuning {
    /// Healing rate applied to the remaining deficit, per second.
    pub rate_per_sec: f32,

    /// Recovery completes at this fraction of max health.
    pub target_frac: f32,
}

impl Default for RecoverTuning {
    fn default() -> Self {
        Self { rate_per_sec: 0.6, target_frac: 0.8 }
    }
}

pub struct Recover<T: TriggerKind> {
    tuning: RecoverTuning,
    recovered: T,
}

impl<T: TriggerKind> Recover<T> {
    pub fn new(tuning: RecoverTuning, recovered: T) -> Self {
        Self { tuning, recovered }
    }
}

impl<T: TriggerKind> Behavior<T> for Recover<T> {
    fn on_enter(&mut self, cx: &mut BehaviorCx<'_, T>) {
        cx.world.stop(cx.agent);
    }

    fn tick(&mut self, cx: &mut BehaviorCx<'_, T>, dt: f32) {
        let Some((current, max)) = cx.world.health(cx.agent) else {
            return;
        };
        let target = max * self.tuning.target_frac;
        // Small tolerance so f32 rounding right at the threshold terminates.
        if current + 1e-3 >= target {
            cx.fire(self.recovered);
            return;
        }
        let amount = self.tuning.rate_per_sec * (max - current) * dt;
        cx.world.heal(cx.agent, amount.min(target - current));
    }
}
