use std::sync::Arc;

use validator::Validate;

use super::ensure_matching_id;
use crate::dto::paged_dto::PagedResult;
use crate::dto::user_dto::{
    CategoryRequest, CategoryResponse, CreateUserRequest, UpdateUserRequest, UserResponse,
};
use crate::repositories::Store;
use crate::services::UserService;
use crate::utils::errors::AppResult;
use crate::utils::pagination::PageRequest;

pub const USERS_PATH: &str = "/api/users";

pub struct UserController {
    service: UserService,
}

impl UserController {
    pub fn new(store: Arc<dyn Store>, hash_cost: u32) -> Self {
        Self {
            service: UserService::new(store).with_hash_cost(hash_cost),
        }
    }

    pub async fn create(&self, request: CreateUserRequest) -> AppResult<UserResponse> {
        request.validate()?;
        let user = self.service.create_user(request.into_input()).await?;
        Ok(UserResponse::from(user))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<UserResponse> {
        let user = self.service.get_user(id).await?;
        Ok(UserResponse::from(user))
    }

    pub async fn get_by_name(&self, name: &str) -> AppResult<UserResponse> {
        let user = self.service.get_user_by_name(name.trim()).await?;
        Ok(UserResponse::from(user))
    }

    pub async fn list(&self, request: PageRequest) -> AppResult<PagedResult<UserResponse>> {
        let paged = self.service.list_users(request).await?;
        Ok(PagedResult::from_paged(paged, USERS_PATH, UserResponse::from))
    }

    pub async fn update(&self, id: i32, request: UpdateUserRequest) -> AppResult<()> {
        ensure_matching_id(id, request.id)?;
        request.validate()?;
        self.service.update_user(id, request.into_input()).await?;
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.service.delete_user(id).await
    }

    // ----- Categorías -----

    pub async fn create_category(&self, request: CategoryRequest) -> AppResult<CategoryResponse> {
        request.validate()?;
        let category = self.service.create_category(&request.name).await?;
        Ok(CategoryResponse::from(category))
    }

    pub async fn get_category(&self, id: i32) -> AppResult<CategoryResponse> {
        let category = self.service.get_category(id).await?;
        Ok(CategoryResponse::from(category))
    }

    pub async fn list_categories(&self) -> AppResult<Vec<CategoryResponse>> {
        let categories = self.service.list_categories().await?;
        Ok(categories.into_iter().map(CategoryResponse::from).collect())
    }

    pub async fn delete_category(&self, id: i32) -> AppResult<()> {
        self.service.delete_category(id).await
    }
}
