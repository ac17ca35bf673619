//! Record Service
//!
//! RPC-exposed CRUD for one record entity type, backed by the document
//! store. The certificate instance additionally publishes a notification
//! event after each successful create. Which entity an instance serves is
//! configuration (`RECORD_ENTITY`), not separate code.

use std::sync::Arc;
use std::time::Duration;

use certhub_core::{CerthubError, CerthubService, MicroserviceRuntime, Result};
use certhub_events::{EventPublisher, EventSink};
use certhub_proto::certificate::certificate_service_server::CertificateServiceServer;
use certhub_proto::skill::skill_service_server::SkillServiceServer;
use certhub_store::{DocumentStore, MemoryDocStore, PgDocStore, PoolConfig};
use tonic::transport::Server;
use tracing::{info, warn};

mod config;
mod entity;
mod grpc;
mod store;

#[cfg(test)]
mod tests;

use certhub_core::domain::{CertificateRecord, SkillRecord};
use config::{EntityKind, RecordServiceConfig, StoreBackend};
use entity::Entity;
use grpc::{CertificateGrpc, SkillGrpc};
use store::RecordStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("record_service=debug".parse().unwrap()),
        )
        .json()
        .init();

    info!("starting record service");

    let service = Arc::new(RecordServiceApp::new()?);
    MicroserviceRuntime::run(service).await
}

pub struct RecordServiceApp {
    config: RecordServiceConfig,
}

impl RecordServiceApp {
    pub fn new() -> Result<Self> {
        Ok(Self {
            config: RecordServiceConfig::from_env()?,
        })
    }

    async fn build_store(&self, collection: &str) -> Result<Arc<dyn DocumentStore>> {
        match self.config.store_backend {
            StoreBackend::Memory => {
                warn!("using in-memory store backend, data is not persisted");
                Ok(Arc::new(MemoryDocStore::new()))
            }
            StoreBackend::Postgres => {
                let store = PgDocStore::connect(PoolConfig {
                    url: self.config.store_url.clone(),
                    max_size: self.config.store_pool_size,
                })
                .await
                .map_err(|err| CerthubError::Store(err.to_string()))?;
                store
                    .ensure_collection(collection)
                    .await
                    .map_err(|err| CerthubError::Store(err.to_string()))?;
                Ok(Arc::new(store))
            }
        }
    }

    fn build_publisher(&self) -> Option<Arc<dyn EventSink>> {
        match EventPublisher::new(&self.config.broker_url, self.config.event_topic.clone()) {
            Ok(publisher) => Some(Arc::new(publisher)),
            Err(err) => {
                // Creations still succeed without the channel; they just
                // will not notify.
                warn!(error = %err, "event channel unavailable, notifications disabled");
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl CerthubService for RecordServiceApp {
    fn service_id(&self) -> &'static str {
        "record-service"
    }

    async fn start(&self) -> Result<()> {
        let addr = self
            .config
            .grpc_bind
            .parse()
            .map_err(|err| CerthubError::Config(format!("invalid GRPC_BIND: {err}")))?;
        let op_timeout = Duration::from_millis(self.config.store_timeout_ms);

        match self.config.entity {
            EntityKind::Certificate => {
                let doc_store = self.build_store(CertificateRecord::COLLECTION).await?;
                let service = CertificateGrpc::new(
                    RecordStore::new(doc_store, op_timeout),
                    self.build_publisher(),
                );
                info!(bind = %self.config.grpc_bind, entity = "certificate", "record service listening");
                Server::builder()
                    .add_service(CertificateServiceServer::new(service))
                    .serve(addr)
                    .await
                    .map_err(|err| CerthubError::Internal(err.to_string()))?;
            }
            EntityKind::Skill => {
                let doc_store = self.build_store(SkillRecord::COLLECTION).await?;
                let service = SkillGrpc::new(RecordStore::new(doc_store, op_timeout));
                info!(bind = %self.config.grpc_bind, entity = "skill", "record service listening");
                Server::builder()
                    .add_service(SkillServiceServer::new(service))
                    .serve(addr)
                    .await
                    .map_err(|err| CerthubError::Internal(err.to_string()))?;
            }
        }

        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        info!("shutting down record service");
        Ok(())
    }
}
