//! `mob-group` — cross-agent coordination: clusters, formations, turn-taking.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`turn_queue`] | `AttackTurnQueue` — round-robin attack admission           |
//! | [`cluster`]    | `Cluster`, `ClusterTuning`, `Maneuver` — one group's state |
//! | [`registry`]   | `GroupRegistry` — membership, zones, event buffer          |
//! | [`coordinator`]| `ClusterCoordinator` — the per-interval group tick         |
//! | [`error`]      | `GroupError`, `GroupResult`                                |
//!
//! # Design notes
//!
//! The only cross-agent mutable state in the whole library lives here: each
//! cluster's shared target/slots and each queue's turn pointer.  Both are
//! mutated exclusively by the coordinator tick and the queue object — never
//! written from two agents' behavior hooks in the same frame, which the
//! single-threaded cooperative model makes safe by construction.
//!
//! Groups are explicit owned records created with the group and destroyed
//! with it.  There is no process-wide static registry; the host (or the
//! `mob-runtime` Director) owns one `GroupRegistry` per session.
//!
//! Coordination is batched: the coordinator evaluates each group once per
//! coordination interval, not per member per frame, so member tick order can
//! never matter and a 12-strong swarm costs one formation computation, not
//! twelve.

pub mod cluster;
pub mod coordinator;
pub mod error;
pub mod registry;
pub mod turn_queue;


pub use cluster::{Cluster, ClusterTuning, Maneuver};
pub use coordinator::ClusterCoordinator;
pub use error::{GroupError, GroupResult};
pub use registry::{GroupEvent, GroupRegistry};
pub use turn_queue::{AttackTurnQueue, RETRY_INTERVAL_SECS};
