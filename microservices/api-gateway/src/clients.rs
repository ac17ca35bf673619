//! gRPC client channels to the record services
//!
//! Channels are lazy: the gateway starts even when a record service is
//! down, and each RPC carries its own deadline so a dead backend shows
//! up as a gateway-side timeout rather than a hung request.

use std::time::Duration;

use certhub_core::{CerthubError, Result};
use certhub_proto::certificate::certificate_service_client::CertificateServiceClient;
use certhub_proto::skill::skill_service_client::SkillServiceClient;
use tonic::transport::{Channel, Endpoint};
use tracing::info;

use crate::config::GatewayConfig;

#[derive(Clone)]
pub struct ServiceClients {
    certificates: CertificateServiceClient<Channel>,
    skills: SkillServiceClient<Channel>,
}

impl ServiceClients {
    pub fn connect(config: &GatewayConfig) -> Result<Self> {
        let certificates = CertificateServiceClient::new(endpoint(
            &config.certificate_service_url,
            config,
        )?);
        let skills = SkillServiceClient::new(endpoint(&config.skill_service_url, config)?);

        info!(
            certificates = %config.certificate_service_url,
            skills = %config.skill_service_url,
            "record service channels ready"
        );
        Ok(Self {
            certificates,
            skills,
        })
    }

    /// Tonic clients are cheap to clone; each request gets its own handle.
    pub fn certificates(&self) -> CertificateServiceClient<Channel> {
        self.certificates.clone()
    }

    pub fn skills(&self) -> SkillServiceClient<Channel> {
        self.skills.clone()
    }
}

fn endpoint(url: &str, config: &GatewayConfig) -> Result<Channel> {
    let endpoint = Endpoint::from_shared(url.to_string())
        .map_err(|err| CerthubError::Config(format!("invalid service url {url}: {err}")))?
        .timeout(Duration::from_millis(config.rpc_timeout_ms))
        .connect_timeout(Duration::from_millis(config.connect_timeout_ms));
    Ok(endpoint.connect_lazy())
}
