//! gRPC surface of the record service

mod certificate;
mod skill;

use certhub_core::CerthubError;
use tonic::Status;
use tracing::error;

pub use certificate::CertificateGrpc;
pub use skill::SkillGrpc;

/// Maps the platform taxonomy onto the RPC status taxonomy. Expected
/// outcomes keep their message; everything else is degraded to a generic
/// internal failure with detail only in the server log.
pub(crate) fn error_status(err: CerthubError) -> Status {
    match err {
        CerthubError::Validation(msg) => Status::invalid_argument(msg),
        CerthubError::NotFound(msg) => Status::not_found(msg),
        other => {
            error!(code = other.error_code(), error = %other, "record operation failed");
            Status::internal("internal error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_taxonomy() {
        let status = error_status(CerthubError::Validation("name is required".into()));
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
        assert!(status.message().contains("name is required"));

        let status = error_status(CerthubError::NotFound("certificate x not found".into()));
        assert_eq!(status.code(), tonic::Code::NotFound);

        let status = error_status(CerthubError::Store("connection reset".into()));
        assert_eq!(status.code(), tonic::Code::Internal);
        assert_eq!(status.message(), "internal error");
    }
}
