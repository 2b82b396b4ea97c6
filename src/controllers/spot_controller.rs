use std::sync::Arc;

use validator::Validate;

use super::ensure_matching_id;
use crate::dto::paged_dto::PagedResult;
use crate::dto::spot_dto::{SpotRequest, SpotResponse};
use crate::repositories::Store;
use crate::services::{DirectoryService, OccupancyService};
use crate::utils::errors::AppResult;
use crate::utils::pagination::PageRequest;

pub const SPOTS_PATH: &str = "/api/spots";

pub struct SpotController {
    directory: DirectoryService,
    occupancy: OccupancyService,
}

impl SpotController {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            directory: DirectoryService::new(store.clone()),
            occupancy: OccupancyService::new(store),
        }
    }

    pub async fn create(&self, request: SpotRequest) -> AppResult<SpotResponse> {
        request.validate()?;
        let spot = self.directory.create_spot(request.into_data()).await?;
        Ok(SpotResponse::from(spot))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<SpotResponse> {
        let details = self.directory.get_spot(id).await?;
        Ok(SpotResponse::from(details))
    }

    pub async fn list(&self, request: PageRequest) -> AppResult<PagedResult<SpotResponse>> {
        let paged = self.directory.list_spots(request).await?;
        Ok(PagedResult::from_paged(paged, SPOTS_PATH, SpotResponse::from))
    }

    pub async fn update(&self, id: i32, request: SpotRequest) -> AppResult<()> {
        ensure_matching_id(id, request.id)?;
        request.validate()?;
        self.directory.update_spot(id, request.into_data()).await?;
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.directory.delete_spot(id).await
    }

    /// Libera la vaga desvinculando la moto que la ocupa
    pub async fn release(&self, id: i32) -> AppResult<()> {
        self.occupancy.release_spot(id).await?;
        Ok(())
    }
}
