use std::sync::Arc;

use validator::Validate;

use super::ensure_matching_id;
use crate::dto::paged_dto::PagedResult;
use crate::dto::spot_dto::{ZoneRequest, ZoneResponse};
use crate::repositories::Store;
use crate::services::DirectoryService;
use crate::utils::errors::AppResult;
use crate::utils::pagination::PageRequest;

pub const ZONES_PATH: &str = "/api/zones";

pub struct ZoneController {
    directory: DirectoryService,
}

impl ZoneController {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            directory: DirectoryService::new(store),
        }
    }

    pub async fn create(&self, request: ZoneRequest) -> AppResult<ZoneResponse> {
        request.validate()?;
        let zone = self.directory.create_zone(request.into_data()).await?;
        Ok(ZoneResponse::from(zone))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<ZoneResponse> {
        let details = self.directory.get_zone(id).await?;
        Ok(ZoneResponse::from(details))
    }

    pub async fn list(&self, request: PageRequest) -> AppResult<PagedResult<ZoneResponse>> {
        let paged = self.directory.list_zones(request).await?;
        Ok(PagedResult::from_paged(paged, ZONES_PATH, ZoneResponse::from))
    }

    pub async fn update(&self, id: i32, request: ZoneRequest) -> AppResult<()> {
        ensure_matching_id(id, request.id)?;
        request.validate()?;
        self.directory.update_zone(id, request.into_data()).await?;
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.directory.delete_zone(id).await
    }
}
