//! Gateway configuration

use certhub_core::config::{env_or, env_parsed};
use certhub_core::Result;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// HTTP bind address (REST + GraphQL)
    pub http_bind: String,
    /// Record service endpoints
    pub certificate_service_url: String,
    pub skill_service_url: String,
    /// Caller-side deadlines on every RPC
    pub rpc_timeout_ms: u64,
    pub connect_timeout_ms: u64,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            http_bind: env_or("HTTP_BIND", "0.0.0.0:3005"),
            certificate_service_url: env_or(
                "CERTIFICATE_SERVICE_URL",
                "http://localhost:50051",
            ),
            skill_service_url: env_or("SKILL_SERVICE_URL", "http://localhost:50052"),
            rpc_timeout_ms: env_parsed("RPC_TIMEOUT_MS", 5_000),
            connect_timeout_ms: env_parsed("RPC_CONNECT_TIMEOUT_MS", 10_000),
        })
    }
}
