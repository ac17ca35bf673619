//! GraphQL surface
//!
//! Single schema over both record services. Field names keep the public
//! API the platform shipped with (`certificat`, `competence`); record
//! fields themselves use the canonical English names.

use async_graphql::{Context, EmptySubscription, ErrorExtensions, Object, Schema, SimpleObject};
use certhub_core::CerthubError;
use certhub_proto::{certificate, skill};

use crate::clients::ServiceClients;
use crate::error::status_to_error;

pub type ApiSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(clients: ServiceClients) -> ApiSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(clients)
        .finish()
}

#[derive(SimpleObject)]
pub struct Certificat {
    pub id: String,
    pub name: String,
    pub issuing_organization: String,
    pub date_obtained: String,
    pub date_expiration: Option<String>,
    pub skills: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<certificate::Certificate> for Certificat {
    fn from(proto: certificate::Certificate) -> Self {
        Self {
            id: proto.id,
            name: proto.name,
            issuing_organization: proto.issuing_organization,
            date_obtained: proto.date_obtained,
            date_expiration: proto.date_expiration,
            skills: proto.skills,
            created_at: proto.created_at,
            updated_at: proto.updated_at,
        }
    }
}

#[derive(SimpleObject)]
pub struct Competence {
    pub id: String,
    pub name: String,
    pub level: String,
    pub category: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<skill::Skill> for Competence {
    fn from(proto: skill::Skill) -> Self {
        Self {
            id: proto.id,
            name: proto.name,
            level: proto.level,
            category: proto.category,
            created_at: proto.created_at,
            updated_at: proto.updated_at,
        }
    }
}

#[derive(SimpleObject)]
pub struct DeleteResponse {
    pub success: bool,
}

fn rpc_error(status: tonic::Status) -> async_graphql::Error {
    let err: CerthubError = status_to_error(status);
    async_graphql::Error::new(err.client_message())
        .extend_with(|_, extensions| extensions.set("code", err.error_code()))
}

fn clients<'a>(ctx: &'a Context<'a>) -> &'a ServiceClients {
    // Registered unconditionally in build_schema.
    ctx.data_unchecked::<ServiceClients>()
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn certificat(
        &self,
        ctx: &Context<'_>,
        id: String,
    ) -> async_graphql::Result<Certificat> {
        let response = clients(ctx)
            .certificates()
            .get_certificate(certificate::GetCertificateRequest { certificate_id: id })
            .await
            .map_err(rpc_error)?;
        Ok(response.into_inner().into())
    }

    async fn certificats(
        &self,
        ctx: &Context<'_>,
        query: Option<String>,
    ) -> async_graphql::Result<Vec<Certificat>> {
        let response = clients(ctx)
            .certificates()
            .search_certificates(certificate::SearchCertificatesRequest {
                query: query.unwrap_or_default(),
            })
            .await
            .map_err(rpc_error)?;
        Ok(response
            .into_inner()
            .certificates
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn competence(
        &self,
        ctx: &Context<'_>,
        id: String,
    ) -> async_graphql::Result<Competence> {
        let response = clients(ctx)
            .skills()
            .get_skill(skill::GetSkillRequest { skill_id: id })
            .await
            .map_err(rpc_error)?;
        Ok(response.into_inner().into())
    }

    async fn competences(
        &self,
        ctx: &Context<'_>,
        query: Option<String>,
    ) -> async_graphql::Result<Vec<Competence>> {
        let response = clients(ctx)
            .skills()
            .search_skills(skill::SearchSkillsRequest {
                query: query.unwrap_or_default(),
            })
            .await
            .map_err(rpc_error)?;
        Ok(response
            .into_inner()
            .skills
            .into_iter()
            .map(Into::into)
            .collect())
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    #[allow(clippy::too_many_arguments)]
    async fn create_certificat(
        &self,
        ctx: &Context<'_>,
        name: String,
        issuing_organization: String,
        date_obtained: String,
        date_expiration: Option<String>,
        skills: Option<String>,
    ) -> async_graphql::Result<Certificat> {
        let response = clients(ctx)
            .certificates()
            .create_certificate(certificate::CreateCertificateRequest {
                name,
                issuing_organization,
                date_obtained,
                date_expiration,
                skills,
            })
            .await
            .map_err(rpc_error)?;
        Ok(response.into_inner().into())
    }

    #[allow(clippy::too_many_arguments)]
    async fn update_certificat(
        &self,
        ctx: &Context<'_>,
        id: String,
        name: Option<String>,
        issuing_organization: Option<String>,
        date_obtained: Option<String>,
        date_expiration: Option<String>,
        skills: Option<String>,
    ) -> async_graphql::Result<Certificat> {
        let response = clients(ctx)
            .certificates()
            .update_certificate(certificate::UpdateCertificateRequest {
                certificate_id: id,
                name,
                issuing_organization,
                date_obtained,
                date_expiration,
                skills,
            })
            .await
            .map_err(rpc_error)?;
        Ok(response.into_inner().into())
    }

    async fn delete_certificat(
        &self,
        ctx: &Context<'_>,
        id: String,
    ) -> async_graphql::Result<DeleteResponse> {
        let response = clients(ctx)
            .certificates()
            .delete_certificate(certificate::DeleteCertificateRequest { certificate_id: id })
            .await
            .map_err(rpc_error)?;
        Ok(DeleteResponse {
            success: response.into_inner().success,
        })
    }

    async fn create_competence(
        &self,
        ctx: &Context<'_>,
        name: String,
        level: String,
        category: String,
    ) -> async_graphql::Result<Competence> {
        let response = clients(ctx)
            .skills()
            .create_skill(skill::CreateSkillRequest {
                name,
                level,
                category,
            })
            .await
            .map_err(rpc_error)?;
        Ok(response.into_inner().into())
    }

    async fn update_competence(
        &self,
        ctx: &Context<'_>,
        id: String,
        name: Option<String>,
        level: Option<String>,
        category: Option<String>,
    ) -> async_graphql::Result<Competence> {
        let response = clients(ctx)
            .skills()
            .update_skill(skill::UpdateSkillRequest {
                skill_id: id,
                name,
                level,
                category,
            })
            .await
            .map_err(rpc_error)?;
        Ok(response.into_inner().into())
    }

    async fn delete_competence(
        &self,
        ctx: &Context<'_>,
        id: String,
    ) -> async_graphql::Result<DeleteResponse> {
        let response = clients(ctx)
            .skills()
            .delete_skill(skill::DeleteSkillRequest { skill_id: id })
            .await
            .map_err(rpc_error)?;
        Ok(DeleteResponse {
            success: response.into_inner().success,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proto_records_convert_losslessly() {
        let proto = certificate::Certificate {
            id: "0123456789abcdef01234567".into(),
            name: "AWS SA".into(),
            issuing_organization: "Amazon".into(),
            date_obtained: "2024-01-01T00:00:00+00:00".into(),
            date_expiration: None,
            skills: Some("cloud".into()),
            created_at: "2024-01-01T00:00:00+00:00".into(),
            updated_at: "2024-01-01T00:00:00+00:00".into(),
        };
        let gql: Certificat = proto.into();
        assert_eq!(gql.name, "AWS SA");
        assert_eq!(gql.date_expiration, None);
        assert_eq!(gql.skills.as_deref(), Some("cloud"));
    }

    #[test]
    fn rpc_errors_carry_the_taxonomy_code() {
        let err = rpc_error(tonic::Status::not_found("no certificate"));
        assert_eq!(err.message, "not found: no certificate");

        // Internal detail never reaches the GraphQL response.
        let err = rpc_error(tonic::Status::internal("pg pool exhausted"));
        assert_eq!(err.message, "internal error");
    }
}
