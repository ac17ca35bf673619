//! Microservice lifecycle shared by all binaries

use std::sync::Arc;

use async_trait::async_trait;
use tokio::signal;
use tracing::{error, info, warn};

use crate::error::{CerthubError, Result};

/// Standard trait every certhub microservice implements.
#[async_trait]
pub trait CerthubService: Send + Sync + 'static {
    /// Service identifier (e.g., "api-gateway", "record-service")
    fn service_id(&self) -> &'static str;

    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// Start the service (gRPC server, HTTP server, subscriber loop, ...).
    /// Runs until the service fails or the runtime aborts it.
    async fn start(&self) -> Result<()>;

    /// Graceful shutdown hook.
    async fn shutdown(&self) -> Result<()>;
}

/// Runs a microservice until ctrl-c or SIGTERM, then shuts it down.
pub struct MicroserviceRuntime;

impl MicroserviceRuntime {
    pub async fn run<S: CerthubService>(service: Arc<S>) -> Result<()> {
        let start_time = std::time::Instant::now();

        info!(
            service_id = service.service_id(),
            version = service.version(),
            "starting microservice"
        );

        let worker = service.clone();
        let mut handle = tokio::spawn(async move { worker.start().await });

        tokio::select! {
            // A worker that returns on its own failed to start or stopped
            // serving; propagate so the process exits nonzero.
            joined = &mut handle => {
                let result =
                    joined.map_err(|err| CerthubError::Internal(err.to_string()))?;
                if let Err(err) = result {
                    error!(error = %err, "service terminated with error");
                    return Err(err);
                }
            }
            _ = Self::wait_for_shutdown() => {
                info!("shutdown signal received, stopping");
                if let Err(err) = service.shutdown().await {
                    warn!(error = %err, "error during shutdown");
                }
                handle.abort();
            }
        }

        info!(
            service_id = service.service_id(),
            uptime_seconds = start_time.elapsed().as_secs(),
            "microservice stopped"
        );

        Ok(())
    }

    async fn wait_for_shutdown() {
        let ctrl_c = async {
            signal::ctrl_c().await.expect("failed to listen for ctrl-c");
        };

        #[cfg(unix)]
        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("failed to listen for SIGTERM")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    }
}
