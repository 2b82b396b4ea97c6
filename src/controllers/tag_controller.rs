use std::sync::Arc;

use validator::Validate;

use super::ensure_matching_id;
use crate::dto::paged_dto::PagedResult;
use crate::dto::tag_dto::{TagRequest, TagResponse};
use crate::repositories::Store;
use crate::services::TagService;
use crate::utils::errors::AppResult;
use crate::utils::pagination::PageRequest;

pub const TAGS_PATH: &str = "/api/tags";

pub struct TagController {
    service: TagService,
}

impl TagController {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            service: TagService::new(store),
        }
    }

    pub async fn create(&self, request: TagRequest) -> AppResult<TagResponse> {
        request.validate()?;
        let tag = self.service.create_tag(request.into_data()).await?;
        Ok(TagResponse::from(tag))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<TagResponse> {
        let tag = self.service.get_tag(id).await?;
        Ok(TagResponse::from(tag))
    }

    pub async fn list(&self, request: PageRequest) -> AppResult<PagedResult<TagResponse>> {
        let paged = self.service.list_tags(request).await?;
        Ok(PagedResult::from_paged(paged, TAGS_PATH, TagResponse::from))
    }

    pub async fn update(&self, id: i32, request: TagRequest) -> AppResult<()> {
        ensure_matching_id(id, request.id)?;
        request.validate()?;
        self.service.update_tag(id, request.into_data()).await?;
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.service.delete_tag(id).await
    }
}
