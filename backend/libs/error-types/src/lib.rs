//! Error taxonomy shared by every backend service and the gateway.
//!
//! Each backend operation fails with a [`ServiceError`]; the variant decides
//! both the gRPC status code put on the wire and the HTTP status the gateway
//! answers with once the error has crossed the service boundary. Only a
//! human-readable message travels with the code.

pub mod input;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tonic::{Code, Status};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    /// The canonical denial for a caller touching someone else's record.
    pub fn not_owner() -> Self {
        Self::PermissionDenied("You do not have permission to access this resource".into())
    }

    pub fn not_found(what: &str) -> Self {
        Self::NotFound(format!("{what} not found"))
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn code(&self) -> Code {
        match self {
            ServiceError::InvalidInput(_) => Code::InvalidArgument,
            ServiceError::Unauthenticated(_) => Code::Unauthenticated,
            ServiceError::PermissionDenied(_) => Code::PermissionDenied,
            ServiceError::NotFound(_) => Code::NotFound,
            ServiceError::AlreadyExists(_) => Code::AlreadyExists,
            ServiceError::Internal(_) => Code::Internal,
        }
    }

    /// HTTP status the gateway answers with. Conflicts are reported as
    /// invalid input; there is no 409 in the public surface.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::InvalidInput(_) | ServiceError::AlreadyExists(_) => 400,
            ServiceError::Unauthenticated(_) => 401,
            ServiceError::PermissionDenied(_) => 403,
            ServiceError::NotFound(_) => 404,
            ServiceError::Internal(_) => 500,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ServiceError::InvalidInput(m)
            | ServiceError::Unauthenticated(m)
            | ServiceError::PermissionDenied(m)
            | ServiceError::NotFound(m)
            | ServiceError::AlreadyExists(m)
            | ServiceError::Internal(m) => m,
        }
    }

    pub fn to_status(&self) -> Status {
        Status::new(self.code(), self.message())
    }
}

impl From<ServiceError> for Status {
    fn from(err: ServiceError) -> Self {
        err.to_status()
    }
}

/// Rebuild the taxonomy from a remote status. Anything outside the known
/// codes (transport failures, deadlines, cancellations) is an upstream
/// failure and keeps the remote message.
impl From<Status> for ServiceError {
    fn from(status: Status) -> Self {
        let msg = status.message().to_string();
        match status.code() {
            Code::InvalidArgument | Code::OutOfRange | Code::FailedPrecondition => {
                ServiceError::InvalidInput(msg)
            }
            Code::Unauthenticated => ServiceError::Unauthenticated(msg),
            Code::PermissionDenied => ServiceError::PermissionDenied(msg),
            Code::NotFound => ServiceError::NotFound(msg),
            Code::AlreadyExists => ServiceError::AlreadyExists(msg),
            _ => ServiceError::Internal(msg),
        }
    }
}

/// JSON body for every error the gateway returns
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&ServiceError> for ErrorResponse {
    fn from(err: &ServiceError) -> Self {
        Self {
            error: err.message().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trip_keeps_class_and_message() {
        let cases = [
            ServiceError::invalid_input("bad id"),
            ServiceError::unauthenticated("no identity"),
            ServiceError::not_owner(),
            ServiceError::not_found("workflow"),
            ServiceError::AlreadyExists("taken".into()),
            ServiceError::internal("db down"),
        ];

        for err in cases {
            let back = ServiceError::from(Status::from(err.clone()));
            assert_eq!(back, err);
        }
    }

    #[test]
    fn transport_failures_become_internal() {
        let err = ServiceError::from(Status::unavailable("connection refused"));
        assert_eq!(err, ServiceError::Internal("connection refused".into()));
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn http_mapping_covers_public_surface() {
        assert_eq!(ServiceError::invalid_input("x").http_status(), 400);
        assert_eq!(ServiceError::unauthenticated("x").http_status(), 401);
        assert_eq!(ServiceError::not_owner().http_status(), 403);
        assert_eq!(ServiceError::not_found("x").http_status(), 404);
        assert_eq!(ServiceError::AlreadyExists("x".into()).http_status(), 400);
    }

    #[test]
    fn error_body_carries_message_only() {
        let body = ErrorResponse::from(&ServiceError::not_found("project"));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "project not found" }));
    }
}
