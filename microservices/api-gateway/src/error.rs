//! Error mapping at the HTTP boundary
//!
//! gRPC statuses from the record services are folded back into the
//! platform taxonomy, then rendered as a JSON error envelope. Client
//! mistakes keep their precise message; backend failures degrade to a
//! generic one with the detail logged here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use certhub_core::CerthubError;
use serde_json::json;
use tonic::Code;
use tracing::error;

pub struct ApiError(pub CerthubError);

impl From<CerthubError> for ApiError {
    fn from(err: CerthubError) -> Self {
        Self(err)
    }
}

impl From<tonic::Status> for ApiError {
    fn from(status: tonic::Status) -> Self {
        Self(status_to_error(status))
    }
}

/// Map an upstream gRPC status onto the platform error taxonomy.
pub fn status_to_error(status: tonic::Status) -> CerthubError {
    let message = status.message().to_string();
    match status.code() {
        Code::InvalidArgument => CerthubError::Validation(message),
        Code::NotFound => CerthubError::NotFound(message),
        Code::DeadlineExceeded => CerthubError::Timeout(message),
        Code::Unavailable => CerthubError::Unavailable(message),
        _ => CerthubError::Internal(message),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = StatusCode::from_u16(err.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(code = err.error_code(), error = %err, "request failed");
        }
        let body = json!({
            "error": {
                "code": err.error_code(),
                "message": err.client_message(),
            }
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grpc_codes_map_onto_taxonomy() {
        let err = status_to_error(tonic::Status::invalid_argument("name is required"));
        assert!(matches!(err, CerthubError::Validation(_)));
        assert_eq!(err.status_code(), 400);

        let err = status_to_error(tonic::Status::not_found("no record"));
        assert!(matches!(err, CerthubError::NotFound(_)));

        let err = status_to_error(tonic::Status::deadline_exceeded("rpc deadline"));
        assert_eq!(err.status_code(), 504);

        let err = status_to_error(tonic::Status::unavailable("connect refused"));
        assert_eq!(err.status_code(), 503);

        let err = status_to_error(tonic::Status::internal("boom"));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn backend_detail_stays_out_of_responses() {
        let err = status_to_error(tonic::Status::internal("pg pool exhausted at 10.0.0.3"));
        assert_eq!(err.client_message(), "internal error");
    }
}
