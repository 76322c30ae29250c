//! Death — terminal teardown.
//!
//! Entered once and never left (the table marks the state terminal).  The
//! agent is immobilized and unlinked from its group immediately; the death
//! cue and the final deactivation follow after fixed delays, driven by the
//! behavior's own tick since a terminal state has no triggers left to fire.

use mob_core::CueId;
use mob_fsm::{Behavior, BehaviorCx, TriggerKind};

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeathTuning {
    pub cue: CueId,

    /// Delay before the death cue plays, seconds.
    pub cue_delay_secs: f32,

    /// Delay before the agent is deactivated, seconds.
    pub remove_delay_secs: f32,
}

impl Default for DeathTuning {
    fn default() -> Self {
        Self {
            cue: CueId::INVALID,
            cue_delay_secs: 0.2,
            remove_delay_secs: 2.5,
        }
    }
}

pub struct Death {
    tuning: DeathTuning,
    elapsed: f32,
    cue_played: bool,
    removed: bool,
}

impl Death {
    pub fn new(tuning: DeathTuning) -> Self {
        Self { tuning, elapsed: 0.0, cue_played: false, removed: false }
    }
}

impl<T: TriggerKind> Behavior<T> for Death {
    fn on_enter(&mut self, cx: &mut BehaviorCx<'_, T>) {
        self.elapsed = 0.0;
        cx.world.stop(cx.agent);
        cx.world.set_mobile(cx.agent, false);
        // Leave the group now so the turn queue and formation stop counting
        // a corpse.
        cx.groups.remove_agent(cx.agent);
    }

    fn tick(&mut self, cx: &mut BehaviorCx<'_, T>, dt: f32) {
        self.elapsed += dt;
        if !self.cue_played && self.elapsed >= self.tuning.cue_delay_secs {
            self.cue_played = true;
            cx.world.play_cue(cx.agent, self.tuning.cue);
        }
        if !self.removed && self.elapsed >= self.tuning.remove_delay_secs {
            self.removed = true;
            cx.world.deactivate(cx.agent);
        }
    }
}
