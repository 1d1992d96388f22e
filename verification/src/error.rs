use cohort_store::StoreError;
use cohort_types::TokenSourceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("identity {0} not found")]
    NotFound(String),

    #[error("presented token does not match the issued token")]
    TokenMismatch,

    #[error("a token was sent recently, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("email {0} is already registered")]
    EmailTaken(String),

    #[error("nickname {0} is already taken")]
    NicknameTaken(String),

    #[error("bad credentials")]
    BadCredentials,

    #[error("profile field {0} is too long")]
    InvalidProfile(&'static str),

    #[error("principal does not belong to this identity")]
    PrincipalMismatch,

    #[error(transparent)]
    TokenSource(#[from] TokenSourceError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
