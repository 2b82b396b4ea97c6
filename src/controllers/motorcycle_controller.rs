use std::sync::Arc;

use validator::Validate;

use super::ensure_matching_id;
use crate::dto::motorcycle_dto::{MotorcycleRequest, MotorcycleResponse};
use crate::dto::paged_dto::PagedResult;
use crate::repositories::Store;
use crate::services::OccupancyService;
use crate::utils::errors::AppResult;
use crate::utils::pagination::PageRequest;

pub const MOTORCYCLES_PATH: &str = "/api/motorcycles";

pub struct MotorcycleController {
    service: OccupancyService,
}

impl MotorcycleController {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            service: OccupancyService::new(store),
        }
    }

    pub async fn create(&self, request: MotorcycleRequest) -> AppResult<MotorcycleResponse> {
        request.validate()?;
        let motorcycle = self.service.create_motorcycle(request.into_new()).await?;
        Ok(MotorcycleResponse::from(motorcycle))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<MotorcycleResponse> {
        let details = self.service.get_motorcycle(id).await?;
        Ok(MotorcycleResponse::from(details))
    }

    pub async fn list(&self, request: PageRequest) -> AppResult<PagedResult<MotorcycleResponse>> {
        let paged = self.service.list_motorcycles(request).await?;
        Ok(PagedResult::from_paged(paged, MOTORCYCLES_PATH, MotorcycleResponse::from))
    }

    pub async fn list_by_type(&self, moto_type: &str) -> AppResult<Vec<MotorcycleResponse>> {
        let motorcycles = self.service.list_motorcycles_by_type(moto_type.trim()).await?;
        Ok(motorcycles.into_iter().map(MotorcycleResponse::from).collect())
    }

    pub async fn update(&self, id: i32, request: MotorcycleRequest) -> AppResult<()> {
        ensure_matching_id(id, request.id)?;
        request.validate()?;
        self.service.update_motorcycle(id, request.into_changes()).await?;
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.service.delete_motorcycle(id).await
    }
}
