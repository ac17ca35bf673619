//! Unit tests for the record service
//!
//! Run against the in-memory store backend; gRPC handlers are exercised
//! directly through the generated service traits.

use std::sync::Arc;
use std::time::Duration;

use certhub_core::domain::{CertificateDraft, CertificatePatch, CertificateRecord, SkillDraft, SkillRecord};
use certhub_core::CerthubError;
use certhub_events::{ChannelError, EventSink, NotificationEvent};
use certhub_proto::certificate::certificate_service_server::CertificateService;
use certhub_proto::certificate::{CreateCertificateRequest, GetCertificateRequest};
use certhub_store::{DocumentStore, MemoryDocStore};
use serde_json::Value;
use tokio::sync::Mutex;
use tonic::{Code, Request};

use crate::grpc::CertificateGrpc;
use crate::store::RecordStore;

fn certificate_store() -> RecordStore<CertificateRecord> {
    RecordStore::new(Arc::new(MemoryDocStore::new()), Duration::from_secs(1))
}

fn skill_store() -> RecordStore<SkillRecord> {
    RecordStore::new(Arc::new(MemoryDocStore::new()), Duration::from_secs(1))
}

fn aws_draft() -> CertificateDraft {
    CertificateDraft::new(
        "AWS SA".into(),
        "Amazon".into(),
        "2024-01-01".into(),
        None,
        Some("cloud, architecture".into()),
    )
    .unwrap()
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let store = certificate_store();

    let created = store.create(aws_draft()).await.unwrap();
    assert_eq!(created.id.len(), 24);

    let fetched = store.find_by_id(&created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn malformed_id_fails_without_store_access() {
    let store = certificate_store();
    store.create(aws_draft()).await.unwrap();

    for op in [
        store.find_by_id("not-an-id").await.err(),
        store.delete("not-an-id").await.err(),
        store
            .update("not-an-id", CertificatePatch::default())
            .await
            .err(),
    ] {
        assert!(matches!(op, Some(CerthubError::Validation(_))));
    }

    // Nothing was mutated.
    assert_eq!(store.search("").await.unwrap().len(), 1);
}

#[tokio::test]
async fn well_formed_missing_id_is_not_found() {
    let store = certificate_store();
    let ghost = "0123456789abcdef01234567";

    assert!(matches!(
        store.find_by_id(ghost).await,
        Err(CerthubError::NotFound(_))
    ));
    assert!(matches!(
        store.update(ghost, CertificatePatch::default()).await,
        Err(CerthubError::NotFound(_))
    ));
    assert!(matches!(
        store.delete(ghost).await,
        Err(CerthubError::NotFound(_))
    ));
}

#[tokio::test]
async fn empty_patch_only_advances_updated_at() {
    let store = certificate_store();
    let created = store.create(aws_draft()).await.unwrap();

    tokio::time::sleep(Duration::from_millis(5)).await;
    let updated = store
        .update(&created.id, CertificatePatch::default())
        .await
        .unwrap();

    assert_eq!(updated.name, created.name);
    assert_eq!(updated.issuing_organization, created.issuing_organization);
    assert_eq!(updated.date_obtained, created.date_obtained);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
}

#[tokio::test]
async fn partial_patch_keeps_absent_fields() {
    let store = certificate_store();
    let created = store.create(aws_draft()).await.unwrap();

    let patch = CertificatePatch::new(Some("AWS SA Pro".into()), None, None, None, None).unwrap();
    let updated = store.update(&created.id, patch).await.unwrap();

    assert_eq!(updated.name, "AWS SA Pro");
    assert_eq!(updated.issuing_organization, "Amazon");
    assert_eq!(updated.skills.as_deref(), Some("cloud, architecture"));
}

#[tokio::test]
async fn search_matches_substring_across_fields() {
    let store = skill_store();
    for (name, level, category) in [
        ("Rust", "expert", "backend"),
        ("React", "junior", "frontend"),
        ("Terraform", "senior", "infrastructure"),
    ] {
        store
            .create(SkillDraft::new(name.into(), level.into(), category.into()).unwrap())
            .await
            .unwrap();
    }

    let all = store.search("").await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].name, "Rust");

    let by_name = store.search("rust").await.unwrap();
    assert_eq!(by_name.len(), 1);

    let by_category = store.search("FRONT").await.unwrap();
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_category[0].name, "React");

    // level is not a search field
    assert!(store.search("expert").await.unwrap().is_empty());
}

/// Store whose operations never resolve, standing in for a hung backend.
struct StalledStore;

#[async_trait::async_trait]
impl DocumentStore for StalledStore {
    async fn insert(&self, _: &str, _: &str, _: Value) -> certhub_store::Result<()> {
        std::future::pending().await
    }

    async fn find_by_id(&self, _: &str, _: &str) -> certhub_store::Result<Option<Value>> {
        std::future::pending().await
    }

    async fn search(&self, _: &str, _: &[&str], _: &str) -> certhub_store::Result<Vec<Value>> {
        std::future::pending().await
    }

    async fn merge(&self, _: &str, _: &str, _: Value) -> certhub_store::Result<Option<Value>> {
        std::future::pending().await
    }

    async fn delete(&self, _: &str, _: &str) -> certhub_store::Result<bool> {
        std::future::pending().await
    }

    async fn is_healthy(&self) -> bool {
        false
    }
}

#[tokio::test]
async fn stalled_store_surfaces_as_timeout_not_a_hang() {
    let store: RecordStore<CertificateRecord> =
        RecordStore::new(Arc::new(StalledStore), Duration::from_millis(20));
    let id = "0123456789abcdef01234567";

    assert!(matches!(
        store.find_by_id(id).await,
        Err(CerthubError::Timeout(_))
    ));
    assert!(matches!(
        store.search("aws").await,
        Err(CerthubError::Timeout(_))
    ));
    assert!(matches!(
        store.create(aws_draft()).await,
        Err(CerthubError::Timeout(_))
    ));
    assert!(matches!(
        store.update(id, CertificatePatch::default()).await,
        Err(CerthubError::Timeout(_))
    ));
    assert!(matches!(
        store.delete(id).await,
        Err(CerthubError::Timeout(_))
    ));
}

#[tokio::test]
async fn delete_is_terminal() {
    let store = certificate_store();
    let created = store.create(aws_draft()).await.unwrap();

    assert!(store.delete(&created.id).await.unwrap());
    assert!(matches!(
        store.find_by_id(&created.id).await,
        Err(CerthubError::NotFound(_))
    ));
}

// gRPC layer

struct RecordingSink(Mutex<Vec<NotificationEvent>>);

#[async_trait::async_trait]
impl EventSink for RecordingSink {
    async fn publish(&self, event: &NotificationEvent) -> certhub_events::Result<()> {
        self.0.lock().await.push(event.clone());
        Ok(())
    }
}

struct FailingSink;

#[async_trait::async_trait]
impl EventSink for FailingSink {
    async fn publish(&self, _event: &NotificationEvent) -> certhub_events::Result<()> {
        Err(ChannelError::Configuration("broker offline".into()))
    }
}

#[tokio::test]
async fn grpc_create_rejects_missing_required_field_and_persists_nothing() {
    let store = certificate_store();
    let service = CertificateGrpc::new(store.clone(), None);

    let status = service
        .create_certificate(Request::new(CreateCertificateRequest {
            name: "AWS SA".into(),
            issuing_organization: String::new(),
            date_obtained: "2024-01-01".into(),
            date_expiration: None,
            skills: None,
        }))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
    assert!(store.search("").await.unwrap().is_empty());
}

#[tokio::test]
async fn grpc_create_publishes_record_created_event() {
    let sink = Arc::new(RecordingSink(Mutex::new(Vec::new())));
    let service = CertificateGrpc::new(certificate_store(), Some(sink.clone()));

    let response = service
        .create_certificate(Request::new(CreateCertificateRequest {
            name: "AWS SA".into(),
            issuing_organization: "Amazon".into(),
            date_obtained: "2024-01-01".into(),
            date_expiration: None,
            skills: None,
        }))
        .await
        .unwrap()
        .into_inner();

    let events = sink.0.lock().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].record_snapshot.id, response.id);
    assert_eq!(events[0].record_snapshot.name, "AWS SA");
}

#[tokio::test]
async fn grpc_create_succeeds_when_channel_is_unavailable() {
    let store = certificate_store();
    let service = CertificateGrpc::new(store.clone(), Some(Arc::new(FailingSink)));

    let response = service
        .create_certificate(Request::new(CreateCertificateRequest {
            name: "AWS SA".into(),
            issuing_organization: "Amazon".into(),
            date_obtained: "2024-01-01".into(),
            date_expiration: None,
            skills: None,
        }))
        .await
        .unwrap()
        .into_inner();

    // The create committed despite the publish failure.
    let fetched = service
        .get_certificate(Request::new(GetCertificateRequest {
            certificate_id: response.id.clone(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(fetched.name, "AWS SA");
}

#[tokio::test]
async fn grpc_get_maps_error_kinds() {
    let service = CertificateGrpc::new(certificate_store(), None);

    let status = service
        .get_certificate(Request::new(GetCertificateRequest {
            certificate_id: "bogus".into(),
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    let status = service
        .get_certificate(Request::new(GetCertificateRequest {
            certificate_id: "0123456789abcdef01234567".into(),
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);
}
