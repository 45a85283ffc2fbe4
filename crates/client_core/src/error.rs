use shared::{
    error::{ApiException, ErrorCode},
    process::DraftError,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("server error")]
    Remote,
    #[error("{0}")]
    Validation(String),
    #[error("not signed in")]
    NotSignedIn,
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("process persistence is not implemented yet")]
    NotImplemented,
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error("process request failed: {0}")]
    Remote(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemberError {
    #[error("{0}")]
    Validation(String),
    #[error("confirmation email does not match the member's email")]
    ConfirmationMismatch,
    #[error("member not found")]
    NotFound,
    #[error("email is already registered")]
    EmailTaken,
    #[error("member request failed: {0}")]
    Remote(String),
}

/// Error code carried by a gateway failure, when the server sent one.
pub fn remote_code(err: &anyhow::Error) -> Option<ErrorCode> {
    err.downcast_ref::<ApiException>().map(|e| e.code)
}
