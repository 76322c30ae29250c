//! `mob-fsm` — the generic agent state machine.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`kind`]     | `StateKind` / `TriggerKind` marker traits                   |
//! | [`table`]    | `TransitionTable<S, T>` + builder, terminal states          |
//! | [`behavior`] | `Behavior<T>` trait and `BehaviorCx` command surface        |
//! | [`registry`] | `BehaviorRegistry<S, T>` — per-state behavior factories     |
//! | [`machine`]  | `AgentStateMachine<S, T>` — fire/tick/shutdown              |
//! | [`error`]    | `FsmError`, `FsmResult`                                     |
//!
//! # Design notes
//!
//! States and triggers are plain enums supplied by the agent kind; all
//! plumbing is generic over them, so a crawler and a drone share the machine
//! code without sharing a single state value.
//!
//! The machine's tick is two-phase, like the simulation loops this library
//! descends from: behavior hooks *produce* (queue triggers, register timers,
//! issue world commands) and the machine *applies* queued triggers only
//! after the hook returns.  Re-entrant fires during enter/exit therefore
//! queue naturally and can never corrupt an in-flight transition, and an
//! exited behavior is never ticked again within the same frame.

pub mod behavior;
pub mod error;
pub mod kind;
pub mod machine;
pub mod registry;
pub mod table;

#[cfg(test)]
mod tests;

pub use behavior::{Behavior, BehaviorCx};
pub use error::{FsmError, FsmResult};
pub use kind::{StateKind, TriggerKind};
pub use machine::AgentStateMachine;
pub use registry::BehaviorRegistry;
pub use table::{TableBuilder, TransitionTable};
