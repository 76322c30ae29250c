//! Attack — queue-admitted melee strike windows.
//!
//! The loop: wait for the group turn queue, open an activation window, land
//! at most one hit inside it, cool down, repeat while the target stays in
//! reach.  The one-shot `struck` flag is the per-window hit guard; the
//! strike test is a radius query in front of the agent delegated to the
//! host's `nearby`.
//!
//! Exit is unconditional cleanup: leaving Attack mid-window releases the
//! queue turn and clears the hit state, whatever phase was active.

use mob_core::{CueId, QueryFilter};
use mob_fsm::{Behavior, BehaviorCx, TriggerKind};
use mob_group::RETRY_INTERVAL_SECS;

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackTuning {
    /// Strike query radius, metres.
    pub strike_radius: f32,

    /// Target must stay inside this to keep attacking, metres.
    pub reach_dist: f32,

    pub damage: f32,

    /// Activation window length, seconds.
    pub active_secs: f32,

    /// Cooldown between windows, seconds.
    pub cooldown_secs: f32,

    /// Cue played as the window opens.
    pub cue: CueId,
}

impl Default for AttackTuning {
    fn default() -> Self {
        Self {
            strike_radius: 1.8,
            reach_dist: 2.4,
            damage: 12.0,
            active_secs: 0.6,
            cooldown_secs: 1.1,
            cue: CueId::INVALID,
        }
    }
}

enum Phase {
    /// Waiting for the turn queue, re-polling at the retry interval.
    Queued { retry: f32 },
    /// Activation window is open.  `struck` is the one-shot hit guard.
    Active { remaining: f32, struck: bool },
    Cooldown { remaining: f32 },
}

pub struct Attack<T: TriggerKind> {
    tuning: AttackTuning,
    out_of_range: T,
    target_lost: T,
    phase: Phase,
    holds_turn: bool,
}

impl<T: TriggerKind> Attack<T> {
    pub fn new(tuning: AttackTuning, out_of_range: T, target_lost: T) -> Self {
        Self {
            tuning,
            out_of_range,
            target_lost,
            phase: Phase::Queued { retry: 0.0 },
            holds_turn: false,
        }
    }
}

impl<T: TriggerKind> Behavior<T> for Attack<T> {
    fn on_enter(&mut self, cx: &mut BehaviorCx<'_, T>) {
        self.phase = Phase::Queued { retry: 0.0 };
        self.holds_turn = false;
        cx.world.stop(cx.agent);
    }

    fn on_exit(&mut self, cx: &mut BehaviorCx<'_, T>) {
        if self.holds_turn {
            cx.groups.end_attack(cx.agent);
            self.holds_turn = false;
        }
        self.phase = Phase::Queued { retry: 0.0 };
    }

    fn tick(&mut self, cx: &mut BehaviorCx<'_, T>, dt: f32) {
        let Some(pos) = cx.position() else {
            return;
        };
        let Some(target) = cx.world.target_of(cx.agent) else {
            cx.fire(self.target_lost);
            return;
        };

        match &mut self.phase {
            Phase::Queued { retry } => {
                *retry -= dt;
                if *retry > 0.0 {
                    return;
                }
                *retry = RETRY_INTERVAL_SECS;
                if cx.groups.can_attack(cx.agent) && cx.groups.begin_attack(cx.agent) {
                    self.holds_turn = true;
                    cx.world.play_cue(cx.agent, self.tuning.cue);
                    self.phase = Phase::Active {
                        remaining: self.tuning.active_secs,
                        struck:    false,
                    };
                }
            }
            Phase::Active { remaining, struck } => {
                if !*struck
                    && cx
                        .world
                        .nearby(pos, self.tuning.strike_radius, QueryFilter::Hostiles)
                        .contains(&target)
                {
                    cx.world.apply_damage(target, self.tuning.damage);
                    *struck = true;
                }
                *remaining -= dt;
                if *remaining <= 0.0 {
                    if self.holds_turn {
                        cx.groups.end_attack(cx.agent);
                        self.holds_turn = false;
                    }
                    self.phase = Phase::Cooldown { remaining: self.tuning.cooldown_secs };
                }
            }
            Phase::Cooldown { remaining } => {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    let in_reach = cx
                        .world
                        .position(target)
                        .is_some_and(|tp| pos.distance_xz(tp) <= self.tuning.reach_dist);
                    if in_reach {
                        self.phase = Phase::Queued { retry: 0.0 };
                    } else {
                        cx.fire(self.out_of_range);
                    }
                }
            }
        }
    }
}
