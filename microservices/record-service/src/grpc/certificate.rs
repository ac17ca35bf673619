//! Certificate record service

use std::sync::Arc;

use certhub_core::domain::{CertificateDraft, CertificatePatch, CertificateRecord};
use certhub_events::{EventSink, NotificationEvent};
use certhub_proto::certificate::certificate_service_server::CertificateService;
use certhub_proto::certificate::{
    Certificate, CreateCertificateRequest, DeleteCertificateRequest, DeleteCertificateResponse,
    GetCertificateRequest, SearchCertificatesRequest, SearchCertificatesResponse,
    UpdateCertificateRequest,
};
use tonic::{Request, Response, Status};
use tracing::{info, warn};

use super::error_status;
use crate::store::RecordStore;

pub struct CertificateGrpc {
    store: RecordStore<CertificateRecord>,
    events: Option<Arc<dyn EventSink>>,
}

impl CertificateGrpc {
    pub fn new(store: RecordStore<CertificateRecord>, events: Option<Arc<dyn EventSink>>) -> Self {
        Self { store, events }
    }

    /// Best-effort notification after a committed create. A channel failure
    /// is logged and never fails the create.
    async fn publish_created(&self, record: &CertificateRecord) {
        let Some(sink) = &self.events else {
            return;
        };
        let event = NotificationEvent::record_created(record.clone());
        if let Err(err) = sink.publish(&event).await {
            warn!(
                record_id = %record.id,
                error = %err,
                "notification publish failed, create already committed"
            );
        }
    }
}

fn to_proto(record: CertificateRecord) -> Certificate {
    Certificate {
        id: record.id,
        name: record.name,
        issuing_organization: record.issuing_organization,
        date_obtained: record.date_obtained,
        date_expiration: record.date_expiration,
        skills: record.skills,
        created_at: record.created_at.to_rfc3339(),
        updated_at: record.updated_at.to_rfc3339(),
    }
}

#[tonic::async_trait]
impl CertificateService for CertificateGrpc {
    async fn get_certificate(
        &self,
        request: Request<GetCertificateRequest>,
    ) -> Result<Response<Certificate>, Status> {
        let req = request.into_inner();
        let record = self
            .store
            .find_by_id(&req.certificate_id)
            .await
            .map_err(error_status)?;
        Ok(Response::new(to_proto(record)))
    }

    async fn search_certificates(
        &self,
        request: Request<SearchCertificatesRequest>,
    ) -> Result<Response<SearchCertificatesResponse>, Status> {
        let req = request.into_inner();
        let records = self.store.search(&req.query).await.map_err(error_status)?;
        Ok(Response::new(SearchCertificatesResponse {
            certificates: records.into_iter().map(to_proto).collect(),
        }))
    }

    async fn create_certificate(
        &self,
        request: Request<CreateCertificateRequest>,
    ) -> Result<Response<Certificate>, Status> {
        let req = request.into_inner();
        let draft = CertificateDraft::new(
            req.name,
            req.issuing_organization,
            req.date_obtained,
            req.date_expiration,
            req.skills,
        )
        .map_err(error_status)?;

        let record = self.store.create(draft).await.map_err(error_status)?;
        info!(record_id = %record.id, "certificate created");

        self.publish_created(&record).await;

        Ok(Response::new(to_proto(record)))
    }

    async fn update_certificate(
        &self,
        request: Request<UpdateCertificateRequest>,
    ) -> Result<Response<Certificate>, Status> {
        let req = request.into_inner();
        let patch = CertificatePatch::new(
            req.name,
            req.issuing_organization,
            req.date_obtained,
            req.date_expiration,
            req.skills,
        )
        .map_err(error_status)?;

        let record = self
            .store
            .update(&req.certificate_id, patch)
            .await
            .map_err(error_status)?;
        Ok(Response::new(to_proto(record)))
    }

    async fn delete_certificate(
        &self,
        request: Request<DeleteCertificateRequest>,
    ) -> Result<Response<DeleteCertificateResponse>, Status> {
        let req = request.into_inner();
        let success = self
            .store
            .delete(&req.certificate_id)
            .await
            .map_err(error_status)?;
        info!(record_id = %req.certificate_id, "certificate deleted");
        Ok(Response::new(DeleteCertificateResponse { success }))
    }
}
