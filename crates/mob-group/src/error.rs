use mob_core::GroupId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GroupError {
    #[error("group {0} not found")]
    GroupNotFound(GroupId),

    #[error("group {0} already exists")]
    GroupExists(GroupId),
}

pub type GroupResult<T> = Result<T, GroupError>;
