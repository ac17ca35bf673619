//! Entity parameterization for the record store
//!
//! Both record types go through the same adapter; this trait carries the
//! per-entity facts (collection, searchable fields, draft and patch types)
//! so the CRUD logic exists exactly once.

use certhub_core::domain::{
    CertificateDraft, CertificatePatch, CertificateRecord, RecordId, SkillDraft, SkillPatch,
    SkillRecord,
};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Entity name for log fields and error messages.
    const KIND: &'static str;
    /// Store collection holding this entity's documents.
    const COLLECTION: &'static str;
    /// Fields matched by text search.
    const SEARCH_FIELDS: &'static [&'static str];

    /// Validated creation input.
    type Draft: Send + 'static;
    /// Partial update; serializes only the fields present.
    type Patch: Serialize + Send + 'static;

    fn from_draft(id: &RecordId, draft: Self::Draft, now: DateTime<Utc>) -> Self;
}

impl Entity for CertificateRecord {
    const KIND: &'static str = "certificate";
    const COLLECTION: &'static str = "certificates";
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "issuing_organization", "skills"];

    type Draft = CertificateDraft;
    type Patch = CertificatePatch;

    fn from_draft(id: &RecordId, draft: CertificateDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            name: draft.name,
            issuing_organization: draft.issuing_organization,
            date_obtained: draft.date_obtained,
            date_expiration: draft.date_expiration,
            skills: draft.skills,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for SkillRecord {
    const KIND: &'static str = "skill";
    const COLLECTION: &'static str = "skills";
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "category"];

    type Draft = SkillDraft;
    type Patch = SkillPatch;

    fn from_draft(id: &RecordId, draft: SkillDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            name: draft.name,
            level: draft.level,
            category: draft.category,
            created_at: now,
            updated_at: now,
        }
    }
}
