//! Frame-driven time model.
//!
//! # Design
//!
//! The host game loop owns real time and hands this library a float delta
//! each frame.  Time is therefore accumulated seconds plus a frame counter —
//! there is no fixed tick length and no wall-clock mapping.  All durations in
//! tuning structs are seconds; all waits are countdowns decremented by the
//! per-frame delta at well-defined tick boundaries, never mid-computation.

/// Accumulated session time, advanced once per host frame.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameClock {
    /// Frames elapsed since session start.
    pub frame: u64,
    /// Seconds elapsed since session start.
    pub elapsed_secs: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one frame of `dt` seconds.
    ///
    /// Negative deltas are clamped to zero — a host pausing or rewinding its
    /// own clock must not run library timers backwards.
    #[inline]
    pub fn advance(&mut self, dt: f32) {
        self.frame += 1;
        self.elapsed_secs += dt.max(0.0);
    }
}

impl std::fmt::Display for FrameClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "frame {} ({:.2}s)", self.frame, self.elapsed_secs)
    }
}

/// A recurring interval gate: `ready(dt)` returns `true` once every
/// `interval_secs` of accumulated delta.
///
/// Used to run group coordination at a coarser cadence than the per-agent
/// frame tick (one coordinator pass per group per interval, not per member
/// per frame).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntervalGate {
    pub interval_secs: f32,
    accumulated: f32,
}

impl IntervalGate {
    pub fn new(interval_secs: f32) -> Self {
        Self { interval_secs, accumulated: 0.0 }
    }

    /// Accumulate `dt`; `true` when a full interval has elapsed.
    ///
    /// Carries the remainder over so long frames don't drop intervals, but
    /// never reports more than one firing per call — a stall produces one
    /// catch-up pass, not a burst.
    pub fn ready(&mut self, dt: f32) -> bool {
        self.accumulated += dt.max(0.0);
        if self.accumulated >= self.interval_secs {
            self.accumulated -= self.interval_secs;
            self.accumulated = self.accumulated.min(self.interval_secs);
            true
        } else {
            false
        }
    }

    /// Reset accumulated time to zero (e.g. after a maneuver begins).
    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }
}
