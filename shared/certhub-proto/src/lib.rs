//! Certhub Protocol Buffers
//!
//! gRPC service definitions and message types for the record services.

pub mod certificate {
    tonic::include_proto!("certhub.certificate.v1");
}

pub mod skill {
    tonic::include_proto!("certhub.skill.v1");
}
