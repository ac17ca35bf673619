//! Skill record service

use certhub_core::domain::{SkillDraft, SkillPatch, SkillRecord};
use certhub_proto::skill::skill_service_server::SkillService;
use certhub_proto::skill::{
    CreateSkillRequest, DeleteSkillRequest, DeleteSkillResponse, GetSkillRequest,
    SearchSkillsRequest, SearchSkillsResponse, Skill, UpdateSkillRequest,
};
use tonic::{Request, Response, Status};
use tracing::info;

use super::error_status;
use crate::store::RecordStore;

pub struct SkillGrpc {
    store: RecordStore<SkillRecord>,
}

impl SkillGrpc {
    pub fn new(store: RecordStore<SkillRecord>) -> Self {
        Self { store }
    }
}

fn to_proto(record: SkillRecord) -> Skill {
    Skill {
        id: record.id,
        name: record.name,
        level: record.level,
        category: record.category,
        created_at: record.created_at.to_rfc3339(),
        updated_at: record.updated_at.to_rfc3339(),
    }
}

#[tonic::async_trait]
impl SkillService for SkillGrpc {
    async fn get_skill(
        &self,
        request: Request<GetSkillRequest>,
    ) -> Result<Response<Skill>, Status> {
        let req = request.into_inner();
        let record = self
            .store
            .find_by_id(&req.skill_id)
            .await
            .map_err(error_status)?;
        Ok(Response::new(to_proto(record)))
    }

    async fn search_skills(
        &self,
        request: Request<SearchSkillsRequest>,
    ) -> Result<Response<SearchSkillsResponse>, Status> {
        let req = request.into_inner();
        let records = self.store.search(&req.query).await.map_err(error_status)?;
        Ok(Response::new(SearchSkillsResponse {
            skills: records.into_iter().map(to_proto).collect(),
        }))
    }

    async fn create_skill(
        &self,
        request: Request<CreateSkillRequest>,
    ) -> Result<Response<Skill>, Status> {
        let req = request.into_inner();
        let draft = SkillDraft::new(req.name, req.level, req.category).map_err(error_status)?;
        let record = self.store.create(draft).await.map_err(error_status)?;
        info!(record_id = %record.id, "skill created");
        Ok(Response::new(to_proto(record)))
    }

    async fn update_skill(
        &self,
        request: Request<UpdateSkillRequest>,
    ) -> Result<Response<Skill>, Status> {
        let req = request.into_inner();
        let patch = SkillPatch::new(req.name, req.level, req.category);
        let record = self
            .store
            .update(&req.skill_id, patch)
            .await
            .map_err(error_status)?;
        Ok(Response::new(to_proto(record)))
    }

    async fn delete_skill(
        &self,
        request: Request<DeleteSkillRequest>,
    ) -> Result<Response<DeleteSkillResponse>, Status> {
        let req = request.into_inner();
        let success = self
            .store
            .delete(&req.skill_id)
            .await
            .map_err(error_status)?;
        info!(record_id = %req.skill_id, "skill deleted");
        Ok(Response::new(DeleteSkillResponse { success }))
    }
}
