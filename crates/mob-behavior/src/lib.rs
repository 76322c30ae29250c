//! `mob-behavior` — the shipped behavior set for crawler and drone agents.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`idle`]     | Wander-in-zone with dwell-driven relocation requests         |
//! | [`chase`]    | Standoff approach with movement hysteresis                   |
//! | [`attack`]   | Queue-admitted melee strike windows                          |
//! | [`flee`]     | Retreat to a pocket, optional self-removal                   |
//! | [`swarm`]    | Formation holding + engage gating                            |
//! | [`ambush`]   | Barrier wait for the group ambush release                    |
//! | [`relocate`] | Zone change, leader-requested for groups, solo fallback      |
//! | [`recover`]  | Exponential heal toward a health fraction                    |
//! | [`death`]    | Terminal teardown with cue/removal delays                    |
//! | [`crawler`]  | `CrawlerState`/`CrawlerTrigger` enums + wiring               |
//! | [`drone`]    | Drone variants (patrol, hover chase, volley) + wiring        |
//!
//! Every behavior is generic over the trigger enum and holds the concrete
//! trigger values it fires, so the same `Chase` drives a crawler and (via
//! [`drone::HoverChase`]) shares its policy shape with a drone without the
//! state-machine plumbing knowing either enum.
//!
//! Wiring helpers ([`crawler::crawler_wiring`], [`drone::drone_wiring`])
//! return a validated table/registry pair; hosts that want different
//! transition graphs can build their own tables against the same behaviors.

pub mod ambush;
pub mod attack;
pub mod chase;
pub mod crawler;
pub mod death;
pub mod drone;
pub mod flee;
pub mod idle;
pub mod recover;
pub mod relocate;
pub mod swarm;

#[cfg(test)]
mod tests;

pub use ambush::Ambush;
pub use attack::{Attack, AttackTuning};
pub use chase::{Chase, ChaseTuning};
pub use crawler::{CrawlerState, CrawlerTrigger, CrawlerTuning, crawler_table, crawler_wiring};
pub use death::{Death, DeathTuning};
pub use drone::{
    DroneState, DroneTrigger, DroneTuning, HoverChase, HoverChaseTuning, Patrol, PatrolTuning,
    Volley, VolleyTuning, drone_table, drone_wiring,
};
pub use flee::{Flee, FleeTuning};
pub use idle::{Idle, IdleTuning};
pub use recover::{Recover, RecoverTuning};
pub use relocate::{Relocate, RelocateTuning};
pub use swarm::{Swarm, SwarmTuning};
