//! `mob-core` — foundational types for the `rust_mob` enemy behavior library.
//!
//! This crate is a dependency of every other `mob-*` crate.  It intentionally
//! has no `mob-*` dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                 |
//! |-------------|----------------------------------------------------------|
//! | [`ids`]     | `AgentId`, `GroupId`, `ZoneId`, `CueId`                  |
//! | [`vec`]     | `Vec3`, ring-slot placement                              |
//! | [`zone`]    | `Zone`, `ZoneSet` — assignable spatial regions           |
//! | [`clock`]   | `FrameClock`, `IntervalGate`                             |
//! | [`rng`]     | `AgentRng` (per-agent), `SimRng` (session-level)         |
//! | [`world`]   | `AgentWorld` host trait, `QueryFilter`                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                      |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public data types.    |

pub mod clock;
pub mod ids;
pub mod rng;
pub mod vec;
pub mod world;
pub mod zone;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use clock::{FrameClock, IntervalGate};
pub use ids::{AgentId, CueId, GroupId, ZoneId};
pub use rng::{AgentRng, SimRng};
pub use vec::Vec3;
pub use world::{AgentWorld, QueryFilter};
pub use zone::{Zone, ZoneSet};
