//! State machine errors.
//!
//! Everything here is a *configuration* fault (caught at build/validate
//! time) or a programming fault (calls out of lifecycle order).  Unknown
//! triggers are deliberately not errors — `fire` returns `false` for them.
//!
//! Errors carry `Debug`-formatted state/trigger names rather than generic
//! parameters so one error type serves every agent kind.

use mob_core::AgentId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FsmError {
    #[error("duplicate transition ({state}, {trigger})")]
    DuplicateTransition { state: String, trigger: String },

    #[error("terminal state {state} has an outgoing transition on {trigger}")]
    TerminalOutgoing { state: String, trigger: String },

    #[error("no behavior registered for state {state}")]
    MissingBehavior { state: String },

    #[error("state machine for {0} used before initialize")]
    NotInitialized(AgentId),

    #[error("state machine for {0} initialized twice")]
    AlreadyInitialized(AgentId),

    #[error("trigger storm for {agent}: {count} queued transitions in one frame")]
    TriggerStorm { agent: AgentId, count: usize },
}

pub type FsmResult<T> = Result<T, FsmError>;
