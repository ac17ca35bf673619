//! REST surface
//!
//! CRUD routes over the record services. Paths keep the public names the
//! platform shipped with: `/certificats` for certificates, `/competences`
//! for skills. Bodies and responses are JSON; upstream record payloads are
//! passed through unchanged.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use certhub_core::CerthubError;
use certhub_proto::{certificate, skill};
use serde::Deserialize;
use serde_json::json;

use crate::clients::ServiceClients;
use crate::error::ApiError;

pub fn router(clients: ServiceClients) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(health))
        .route("/certificats", get(search_certificates).post(create_certificate))
        .route(
            "/certificats/{id}",
            get(get_certificate)
                .put(update_certificate)
                .delete(delete_certificate),
        )
        .route("/competences", get(search_skills).post(create_skill))
        .route(
            "/competences/{id}",
            get(get_skill).put(update_skill).delete(delete_skill),
        )
        .with_state(clients)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "service": "api-gateway" }))
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Deserialize, Default)]
pub struct CertificateBody {
    pub name: Option<String>,
    pub issuing_organization: Option<String>,
    pub date_obtained: Option<String>,
    pub date_expiration: Option<String>,
    pub skills: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct SkillBody {
    pub name: Option<String>,
    pub level: Option<String>,
    pub category: Option<String>,
}

/// Required-field check done before any RPC leaves the gateway: a body
/// missing a required field is rejected here and nothing is persisted.
pub fn require_field(value: Option<String>, name: &str) -> Result<String, CerthubError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(CerthubError::Validation(format!("{name} is required"))),
    }
}

/// Empty strings in optional fields mean "absent".
pub fn optional_field(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

// -- certificates ----------------------------------------------------------

async fn get_certificate(
    State(clients): State<ServiceClients>,
    Path(id): Path<String>,
) -> Result<Json<certificate::Certificate>, ApiError> {
    let response = clients
        .certificates()
        .get_certificate(certificate::GetCertificateRequest { certificate_id: id })
        .await?;
    Ok(Json(response.into_inner()))
}

async fn search_certificates(
    State(clients): State<ServiceClients>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<certificate::Certificate>>, ApiError> {
    let response = clients
        .certificates()
        .search_certificates(certificate::SearchCertificatesRequest { query: params.q })
        .await?;
    Ok(Json(response.into_inner().certificates))
}

async fn create_certificate(
    State(clients): State<ServiceClients>,
    Json(body): Json<CertificateBody>,
) -> Result<(StatusCode, Json<certificate::Certificate>), ApiError> {
    let request = certificate::CreateCertificateRequest {
        name: require_field(body.name, "name")?,
        issuing_organization: require_field(body.issuing_organization, "issuing_organization")?,
        date_obtained: require_field(body.date_obtained, "date_obtained")?,
        date_expiration: optional_field(body.date_expiration),
        skills: optional_field(body.skills),
    };
    let response = clients.certificates().create_certificate(request).await?;
    Ok((StatusCode::CREATED, Json(response.into_inner())))
}

async fn update_certificate(
    State(clients): State<ServiceClients>,
    Path(id): Path<String>,
    Json(body): Json<CertificateBody>,
) -> Result<Json<certificate::Certificate>, ApiError> {
    let request = certificate::UpdateCertificateRequest {
        certificate_id: id,
        name: optional_field(body.name),
        issuing_organization: optional_field(body.issuing_organization),
        date_obtained: optional_field(body.date_obtained),
        date_expiration: optional_field(body.date_expiration),
        skills: optional_field(body.skills),
    };
    let response = clients.certificates().update_certificate(request).await?;
    Ok(Json(response.into_inner()))
}

async fn delete_certificate(
    State(clients): State<ServiceClients>,
    Path(id): Path<String>,
) -> Result<Json<certificate::DeleteCertificateResponse>, ApiError> {
    let response = clients
        .certificates()
        .delete_certificate(certificate::DeleteCertificateRequest { certificate_id: id })
        .await?;
    Ok(Json(response.into_inner()))
}

// -- skills ----------------------------------------------------------------

async fn get_skill(
    State(clients): State<ServiceClients>,
    Path(id): Path<String>,
) -> Result<Json<skill::Skill>, ApiError> {
    let response = clients
        .skills()
        .get_skill(skill::GetSkillRequest { skill_id: id })
        .await?;
    Ok(Json(response.into_inner()))
}

async fn search_skills(
    State(clients): State<ServiceClients>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<skill::Skill>>, ApiError> {
    let response = clients
        .skills()
        .search_skills(skill::SearchSkillsRequest { query: params.q })
        .await?;
    Ok(Json(response.into_inner().skills))
}

async fn create_skill(
    State(clients): State<ServiceClients>,
    Json(body): Json<SkillBody>,
) -> Result<(StatusCode, Json<skill::Skill>), ApiError> {
    let request = skill::CreateSkillRequest {
        name: require_field(body.name, "name")?,
        level: require_field(body.level, "level")?,
        category: require_field(body.category, "category")?,
    };
    let response = clients.skills().create_skill(request).await?;
    Ok((StatusCode::CREATED, Json(response.into_inner())))
}

async fn update_skill(
    State(clients): State<ServiceClients>,
    Path(id): Path<String>,
    Json(body): Json<SkillBody>,
) -> Result<Json<skill::Skill>, ApiError> {
    let request = skill::UpdateSkillRequest {
        skill_id: id,
        name: optional_field(body.name),
        level: optional_field(body.level),
        category: optional_field(body.category),
    };
    let response = clients.skills().update_skill(request).await?;
    Ok(Json(response.into_inner()))
}

async fn delete_skill(
    State(clients): State<ServiceClients>,
    Path(id): Path<String>,
) -> Result<Json<skill::DeleteSkillResponse>, ApiError> {
    let response = clients
        .skills()
        .delete_skill(skill::DeleteSkillRequest { skill_id: id })
        .await?;
    Ok(Json(response.into_inner()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_fields_reject_missing_and_blank() {
        assert!(require_field(None, "name").is_err());
        assert!(require_field(Some("   ".into()), "name").is_err());
        assert_eq!(require_field(Some("AWS SA".into()), "name").unwrap(), "AWS SA");

        let err = require_field(None, "date_obtained").unwrap_err();
        assert!(err.to_string().contains("date_obtained is required"));
    }

    #[test]
    fn empty_optional_fields_are_treated_as_absent() {
        assert_eq!(optional_field(Some(String::new())), None);
        assert_eq!(optional_field(Some("  ".into())), None);
        assert_eq!(optional_field(Some("cloud".into())), Some("cloud".into()));
        assert_eq!(optional_field(None), None);
    }
}
