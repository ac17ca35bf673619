//! Domain records for the certification platform
//!
//! Two record types (certificates and skills) share the same lifecycle:
//! store-assigned opaque identifier, service-managed timestamps, free-form
//! date strings normalized to RFC 3339 on the way in. Drafts and patches
//! are validated at construction, so a value of those types is known-good
//! by the time it reaches the storage layer.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CerthubError, Result};

/// Length of an opaque record identifier (hex digits).
pub const RECORD_ID_LEN: usize = 24;

/// Store-assigned opaque identifier: 24 hex digits.
///
/// Operations receiving a malformed identifier must fail before any store
/// access, so identifier parsing lives here rather than in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(String);

impl RecordId {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.len() == RECORD_ID_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(raw.to_ascii_lowercase()))
        } else {
            Err(CerthubError::Validation(format!(
                "malformed record id: {raw:?}"
            )))
        }
    }

    pub fn generate() -> Self {
        let hex = uuid::Uuid::new_v4().simple().to_string();
        Self(hex[..RECORD_ID_LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A professional certification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateRecord {
    pub id: String,
    pub name: String,
    pub issuing_organization: String,
    pub date_obtained: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_expiration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A named skill with a proficiency level and category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRecord {
    pub id: String,
    pub name: String,
    pub level: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a certificate.
#[derive(Debug, Clone)]
pub struct CertificateDraft {
    pub name: String,
    pub issuing_organization: String,
    pub date_obtained: String,
    pub date_expiration: Option<String>,
    pub skills: Option<String>,
}

impl CertificateDraft {
    pub fn new(
        name: String,
        issuing_organization: String,
        date_obtained: String,
        date_expiration: Option<String>,
        skills: Option<String>,
    ) -> Result<Self> {
        let date_obtained = parse_date("date_obtained", &required("date_obtained", date_obtained)?)?;
        let date_expiration = match optional_text(date_expiration) {
            Some(raw) => Some(parse_date("date_expiration", &raw)?),
            None => None,
        };
        Ok(Self {
            name: required("name", name)?,
            issuing_organization: required("issuing_organization", issuing_organization)?,
            date_obtained,
            date_expiration,
            skills: optional_text(skills),
        })
    }
}

/// Partial update for a certificate. Absent fields retain prior values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CertificatePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuing_organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_obtained: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_expiration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
}

impl CertificatePatch {
    pub fn new(
        name: Option<String>,
        issuing_organization: Option<String>,
        date_obtained: Option<String>,
        date_expiration: Option<String>,
        skills: Option<String>,
    ) -> Result<Self> {
        let date_obtained = match optional_text(date_obtained) {
            Some(raw) => Some(parse_date("date_obtained", &raw)?),
            None => None,
        };
        let date_expiration = match optional_text(date_expiration) {
            Some(raw) => Some(parse_date("date_expiration", &raw)?),
            None => None,
        };
        Ok(Self {
            name: optional_text(name),
            issuing_organization: optional_text(issuing_organization),
            date_obtained,
            date_expiration,
            skills: optional_text(skills),
        })
    }
}

/// Validated input for creating a skill.
#[derive(Debug, Clone)]
pub struct SkillDraft {
    pub name: String,
    pub level: String,
    pub category: String,
}

impl SkillDraft {
    pub fn new(name: String, level: String, category: String) -> Result<Self> {
        Ok(Self {
            name: required("name", name)?,
            level: required("level", level)?,
            category: required("category", category)?,
        })
    }
}

/// Partial update for a skill.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SkillPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl SkillPatch {
    pub fn new(name: Option<String>, level: Option<String>, category: Option<String>) -> Self {
        Self {
            name: optional_text(name),
            level: optional_text(level),
            category: optional_text(category),
        }
    }
}

fn required(field: &str, value: String) -> Result<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        Err(CerthubError::Validation(format!("{field} is required")))
    } else {
        Ok(value)
    }
}

// Empty strings are treated as absent, for both optional create fields and
// patch fields.
fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Accepts RFC 3339 or `YYYY-MM-DD`; returns the canonical RFC 3339 form.
fn parse_date(field: &str, raw: &str) -> Result<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc).to_rfc3339());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc().to_rfc3339());
    }
    Err(CerthubError::Validation(format!(
        "{field} is not a valid date: {raw:?}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_round_trip() {
        let id = RecordId::generate();
        assert_eq!(id.as_str().len(), RECORD_ID_LEN);
        let parsed = RecordId::parse(id.as_str()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn record_id_rejects_malformed_input() {
        assert!(RecordId::parse("").is_err());
        assert!(RecordId::parse("abc").is_err());
        assert!(RecordId::parse("zzzzzzzzzzzzzzzzzzzzzzzz").is_err());
        assert!(RecordId::parse("0123456789abcdef0123456789abcdef").is_err());
    }

    #[test]
    fn record_id_normalizes_case() {
        let id = RecordId::parse("0123456789ABCDEF01234567").unwrap();
        assert_eq!(id.as_str(), "0123456789abcdef01234567");
    }

    #[test]
    fn certificate_draft_requires_core_fields() {
        let err = CertificateDraft::new(
            "".into(),
            "Amazon".into(),
            "2024-01-01".into(),
            None,
            None,
        );
        assert!(matches!(err, Err(CerthubError::Validation(_))));

        let err = CertificateDraft::new(
            "AWS SA".into(),
            "  ".into(),
            "2024-01-01".into(),
            None,
            None,
        );
        assert!(matches!(err, Err(CerthubError::Validation(_))));
    }

    #[test]
    fn certificate_draft_normalizes_dates() {
        let draft = CertificateDraft::new(
            "AWS SA".into(),
            "Amazon".into(),
            "2024-01-01".into(),
            Some("2027-01-01T12:30:00Z".into()),
            Some("cloud".into()),
        )
        .unwrap();
        assert_eq!(draft.date_obtained, "2024-01-01T00:00:00+00:00");
        assert_eq!(draft.date_expiration.as_deref(), Some("2027-01-01T12:30:00+00:00"));
    }

    #[test]
    fn certificate_draft_rejects_bad_dates() {
        let err = CertificateDraft::new(
            "AWS SA".into(),
            "Amazon".into(),
            "yesterday".into(),
            None,
            None,
        );
        assert!(matches!(err, Err(CerthubError::Validation(_))));
    }

    #[test]
    fn skill_draft_requires_every_field() {
        assert!(SkillDraft::new("Rust".into(), "".into(), "backend".into()).is_err());
        assert!(SkillDraft::new("Rust".into(), "expert".into(), "backend".into()).is_ok());
    }

    #[test]
    fn empty_patch_serializes_to_empty_object() {
        let patch = CertificatePatch::default();
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn patch_keeps_only_present_fields() {
        let patch = CertificatePatch::new(Some("New name".into()), None, None, None, None).unwrap();
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({"name": "New name"}));
    }
}
