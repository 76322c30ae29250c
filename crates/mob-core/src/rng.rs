//! Deterministic per-agent and session-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each agent gets its own independent `SmallRng` seeded by:
//!
//!   seed = session_seed XOR (agent_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive agent IDs uniformly across the seed space.
//! Consequences that matter for a game AI library:
//!
//! - Agents never share RNG state, so the order the host ticks its state
//!   machines in cannot change any agent's decisions.
//! - A replay with the same session seed and spawn order reproduces every
//!   wander target, pause length, and cross-swap exactly.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::AgentId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG.
///
/// Created by the runtime when an agent spawns and handed to every behavior
/// hook for that agent.  The type is `!Sync` on purpose — per-agent RNG state
/// must never be shared.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the session seed and an agent ID.
    pub fn new(session_seed: u64, agent: AgentId) -> Self {
        let seed = session_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform value in `[-half, half]` — per-agent positional or angular
    /// jitter around a computed slot.
    #[inline]
    pub fn jitter(&mut self, half: f32) -> f32 {
        if half <= 0.0 {
            0.0
        } else {
            self.0.gen_range(-half..=half)
        }
    }

    /// Uniform angle in `[0, TAU)`.
    #[inline]
    pub fn angle(&mut self) -> f32 {
        self.0.gen_range(0.0..std::f32::consts::TAU)
    }

    /// Choose a random element from a slice.  Returns `None` if empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Session-level RNG for decisions that belong to a group rather than any
/// one member (formation base angle, cross-swap rolls).
///
/// One per coordinator/session; never shared between threads.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset — used to give
    /// each group its own stream seeded from the session root.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform angle in `[0, TAU)`.
    #[inline]
    pub fn angle(&mut self) -> f32 {
        self.0.gen_range(0.0..std::f32::consts::TAU)
    }
}
