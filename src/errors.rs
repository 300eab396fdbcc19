use crate::validation::ValidationError;
use thiserror::Error;

/// Error raised by the domain services.
///
/// The client-facing variants carry the message shown to the caller; only
/// `Internal` hides its cause.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Invariant(String),

    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    Authorization(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn invariant<S: Into<String>>(message: S) -> Self {
        ServiceError::Invariant(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Invariant(_) => "invariant",
            ServiceError::Authentication(_) => "authentication",
            ServiceError::Authorization(_) => "authorization",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::PayloadTooLarge(_) => "payload_too_large",
            ServiceError::Internal(_) => "internal",
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Invariant(err.to_string())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub const FORBIDDEN_MESSAGE: &str = "Anda tidak berhak mengakses resource ini";
