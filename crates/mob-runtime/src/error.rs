use mob_core::AgentId;
use mob_fsm::FsmError;
use mob_group::GroupError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectorError {
    #[error("{0} already spawned")]
    AgentExists(AgentId),

    #[error("{0} is not spawned")]
    UnknownAgent(AgentId),

    #[error(transparent)]
    Fsm(#[from] FsmError),

    #[error(transparent)]
    Group(#[from] GroupError),
}

pub type DirectorResult<T> = Result<T, DirectorError>;
