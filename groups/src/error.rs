use crate::lifecycle::LifecycleOp;
use cohort_store::StoreError;
use cohort_types::{GroupState, IdentityId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GroupError {
    #[error("group {0} not found")]
    NotFound(String),

    #[error("cannot {op} a {state} group")]
    InvalidTransition { op: LifecycleOp, state: GroupState },

    #[error("recruiting was changed recently, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("{caller} is not a manager of group {group}")]
    NotAuthorized { caller: IdentityId, group: String },

    #[error("group {0} is not open to this identity")]
    NotJoinable(String),

    #[error("invalid group path: {0}")]
    InvalidPath(String),

    #[error("invalid group title: {0}")]
    InvalidTitle(String),

    #[error("group path {0} is already taken")]
    PathTaken(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
