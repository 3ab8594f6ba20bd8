//! HTTP rendering of the shared error taxonomy

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use error_types::{ErrorResponse, ServiceError};
use thiserror::Error;
use tonic::Status;
use tracing::error;

use crate::storage::StorageError;

/// Every handler and the auth gate fail with this. The body is always
/// `{"error": "<message>"}`.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct GatewayError(pub ServiceError);

impl GatewayError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self(ServiceError::invalid_input(msg))
    }

    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self(ServiceError::unauthenticated(msg))
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self(ServiceError::internal(msg))
    }
}

impl From<ServiceError> for GatewayError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

/// Remote failures keep their class and message
impl From<Status> for GatewayError {
    fn from(status: Status) -> Self {
        if !matches!(
            status.code(),
            tonic::Code::InvalidArgument
                | tonic::Code::Unauthenticated
                | tonic::Code::PermissionDenied
                | tonic::Code::NotFound
                | tonic::Code::AlreadyExists
        ) {
            error!(code = ?status.code(), message = status.message(), "Backend call failed");
        }
        Self(ServiceError::from(status))
    }
}

impl From<StorageError> for GatewayError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { .. } => Self(ServiceError::NotFound(err.to_string())),
            StorageError::InvalidKey(_) => Self::invalid_input(err.to_string()),
            StorageError::MissingBucket(_) | StorageError::Backend(_) => {
                error!(error = %err, "Object store failure");
                Self::internal(err.to_string())
            }
        }
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::from(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_remote_codes_map_to_http() {
        let cases = [
            (Status::invalid_argument("bad"), 400),
            (Status::already_exists("taken"), 400),
            (Status::unauthenticated("who"), 401),
            (Status::permission_denied("no"), 403),
            (Status::not_found("gone"), 404),
            (Status::unavailable("down"), 500),
            (Status::internal("boom"), 500),
        ];
        for (status, http) in cases {
            assert_eq!(GatewayError::from(status).status_code().as_u16(), http);
        }
    }

    #[actix_web::test]
    async fn test_body_carries_remote_message() {
        let err = GatewayError::from(Status::permission_denied("not yours"));
        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "not yours" }));
    }

    #[test]
    fn test_missing_object_is_404() {
        let err = GatewayError::from(StorageError::NotFound {
            bucket: "docs".into(),
            key: "a.pdf".into(),
        });
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
