//! `mob-runtime` — the session orchestrator.
//!
//! # Crate layout
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`director`] | `Director<S, T>` — spawn/fire/tick/despawn             |
//! | [`observer`] | `DirectorObserver` callbacks, `NoopObserver`           |
//! | [`error`]    | `DirectorError`, `DirectorResult`                      |
//!
//! # Design notes
//!
//! The Director owns everything with session lifetime: one state machine and
//! one deterministic RNG per agent, the group registry, the cluster
//! coordinator, and the frame clock.  The host owns the world and real time;
//! each frame it calls [`Director::tick`] once with its delta.
//!
//! Observability follows the observer-trait pattern rather than a logging
//! dependency: hosts that want logs implement [`DirectorObserver`] and format
//! with the `Display` impls on IDs and states.

pub mod director;
pub mod error;
pub mod observer;

#[cfg(test)]
mod tests;

pub use director::{Director, EventMap};
pub use error::{DirectorError, DirectorResult};
pub use observer::{DirectorObserver, NoopObserver};
