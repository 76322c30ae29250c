//! `ProgressGuard` — the mandatory three-tier failsafe for wait loops.
//!
//! Every "wait until arrival / clustering / regrouping" loop in this library
//! carries three exits, whichever fires first:
//!
//! 1. the primary condition (checked by the owning behavior, not here),
//! 2. a **stuck** detector — insufficient positional progress over a
//!    sampling window,
//! 3. a **hard timeout** on total elapsed time.
//!
//! The guard only observes; the owner decides what a `Stuck` or `TimedOut`
//! verdict forces (typically the same trigger the primary condition would
//! have fired).

use mob_core::Vec3;

/// What the guard concluded this tick.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum GuardVerdict {
    /// Progress looks fine; keep waiting.
    Waiting,
    /// A full sample window passed with less than `min_progress` movement.
    Stuck,
    /// Total elapsed time exceeded the hard timeout.
    TimedOut,
}

/// Stuck/timeout watchdog for one wait loop.
#[derive(Debug, Clone)]
pub struct ProgressGuard {
    /// Hard cap on total wait time, seconds.
    pub hard_timeout_secs: f32,
    /// How often to sample position for the stuck check, seconds.
    pub sample_interval_secs: f32,
    /// Minimum movement per sample window, metres.  Less than this = stuck.
    pub min_progress: f32,

    elapsed: f32,
    since_sample: f32,
    last_sample: Option<Vec3>,
}

impl ProgressGuard {
    pub fn new(hard_timeout_secs: f32, sample_interval_secs: f32, min_progress: f32) -> Self {
        Self {
            hard_timeout_secs,
            sample_interval_secs,
            min_progress,
            elapsed: 0.0,
            since_sample: 0.0,
            last_sample: None,
        }
    }

    /// Restart the watchdog (new wait, same tuning).
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.since_sample = 0.0;
        self.last_sample = None;
    }

    /// Total time this guard has been watching, seconds.
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed
    }

    /// Advance by `dt` with the subject's current position.
    ///
    /// `position = None` (stale handle) counts as zero progress, so a
    /// vanished subject resolves through `Stuck`/`TimedOut` instead of
    /// hanging the wait.
    pub fn poll(&mut self, position: Option<Vec3>, dt: f32) -> GuardVerdict {
        let dt = dt.max(0.0);
        self.elapsed += dt;
        self.since_sample += dt;

        if self.elapsed >= self.hard_timeout_secs {
            return GuardVerdict::TimedOut;
        }

        if self.since_sample >= self.sample_interval_secs {
            self.since_sample = 0.0;
            let moved = match (self.last_sample, position) {
                (Some(prev), Some(now)) => now.distance(prev),
                // First sample, or no position available: no measurable progress.
                _ => 0.0,
            };
            let had_baseline = self.last_sample.is_some();
            self.last_sample = position;
            if had_baseline && moved < self.min_progress {
                return GuardVerdict::Stuck;
            }
        }

        GuardVerdict::Waiting
    }
}

impl Default for ProgressGuard {
    /// 8 s hard timeout, 1 s sampling, 0.25 m minimum progress — the travel
    /// watchdog tuning used by the wander and relocation behaviors.
    fn default() -> Self {
        Self::new(8.0, 1.0, 0.25)
    }
}
