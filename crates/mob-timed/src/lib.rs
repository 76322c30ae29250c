//! `mob-timed` — cooperative timed subroutines, replacing engine coroutines.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`timer`]    | `TimerSet<T>` — named, cancellable delays and conditions  |
//! | [`failsafe`] | `ProgressGuard` — three-tier wait failsafe                |
//!
//! # Design notes
//!
//! A timed subroutine is a resumable record (remaining time or a polled
//! predicate, plus a continuation trigger), ticked once per host frame.
//! Suspension happens only at tick boundaries — a subroutine waits "N
//! seconds", "until next frame", or "until a condition holds", and resumes
//! at the next scheduled tick, never asynchronously mid-computation.
//!
//! Every `TimerSet` is owned by exactly one behavior activation; the state
//! machine cancels it wholesale on exit so no timer can outlive the behavior
//! that registered it.

pub mod failsafe;
pub mod timer;


pub use failsafe::{GuardVerdict, ProgressGuard};
pub use timer::{Condition, TimerSet};
