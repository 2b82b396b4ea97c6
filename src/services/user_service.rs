//! Servicio de usuarios y categorías
//!
//! La contraseña llega en claro, se hashea con bcrypt y nunca se devuelve.
//! Email y CPF son únicos; la categoría debe existir.

use std::sync::Arc;

use bcrypt::{hash, DEFAULT_COST};
use chrono::NaiveDate;
use tracing::info;

use crate::models::{User, UserCategory, UserData};
use crate::repositories::{Store, Transaction};
use crate::utils::errors::{
    conflict_error, invalid_reference_error, not_found_error, AppError, AppResult,
};
use crate::utils::pagination::{PageRequest, Paged};
use crate::utils::validation::normalize_cpf;

/// Datos de entrada de un usuario, con la contraseña en claro
#[derive(Debug, Clone)]
pub struct UserInput {
    pub category_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub cpf: String,
    pub email: String,
    /// En una actualización `None` conserva el hash actual
    pub password: Option<String>,
}

pub struct UserService {
    store: Arc<dyn Store>,
    hash_cost: u32,
}

/// Verifica categoría y unicidad de email/CPF (excluyendo al propio usuario)
async fn check_user_constraints(
    tx: &mut dyn Transaction,
    user_id: Option<i32>,
    category_id: i32,
    email: &str,
    cpf: &str,
) -> AppResult<()> {
    if tx.find_category(category_id).await?.is_none() {
        return Err(invalid_reference_error("UserCategory", category_id));
    }
    if let Some(existing) = tx.find_user_by_email(email).await? {
        if Some(existing.id) != user_id {
            return Err(conflict_error("User", "email", email));
        }
    }
    if let Some(existing) = tx.find_user_by_cpf(cpf).await? {
        if Some(existing.id) != user_id {
            return Err(conflict_error("User", "cpf", cpf));
        }
    }
    Ok(())
}

impl UserService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            hash_cost: DEFAULT_COST,
        }
    }

    /// Coste de bcrypt reducido, útil en tests
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    fn hash_password(&self, password: &str) -> AppResult<String> {
        hash(password, self.hash_cost)
            .map_err(|e| AppError::Internal(format!("Error hasheando password: {}", e)))
    }

    pub async fn create_user(&self, input: UserInput) -> AppResult<User> {
        let password = input
            .password
            .as_deref()
            .ok_or_else(|| AppError::BadRequest("Password is required".to_string()))?;
        // bcrypt es lento: se hashea antes de abrir la transacción
        let password_hash = self.hash_password(password)?;
        let cpf = normalize_cpf(&input.cpf);

        let mut tx = self.store.begin().await?;
        check_user_constraints(&mut *tx, None, input.category_id, &input.email, &cpf).await?;

        let data = UserData {
            category_id: input.category_id,
            first_name: input.first_name,
            last_name: input.last_name,
            birth_date: input.birth_date,
            cpf,
            email: input.email,
            password_hash,
        };
        let user = tx.insert_user(&data).await?;
        tx.commit().await?;

        info!("👤 Usuario {} creado ({})", user.id, user.email);
        Ok(user)
    }

    pub async fn update_user(&self, id: i32, input: UserInput) -> AppResult<User> {
        let password_hash = input
            .password
            .as_deref()
            .map(|password| self.hash_password(password))
            .transpose()?;
        let cpf = normalize_cpf(&input.cpf);

        let mut tx = self.store.begin().await?;
        let mut user = tx
            .find_user(id)
            .await?
            .ok_or_else(|| not_found_error("User", id))?;
        check_user_constraints(&mut *tx, Some(id), input.category_id, &input.email, &cpf).await?;

        if let Some(password_hash) = password_hash {
            user.password_hash = password_hash;
        }
        user.category_id = input.category_id;
        user.first_name = input.first_name;
        user.last_name = input.last_name;
        user.birth_date = input.birth_date;
        user.cpf = cpf;
        user.email = input.email;

        tx.update_user(&user).await?;
        tx.commit().await?;

        info!("👤 Usuario {} actualizado", id);
        Ok(user)
    }

    pub async fn delete_user(&self, id: i32) -> AppResult<()> {
        let mut tx = self.store.begin().await?;
        if !tx.delete_user(id).await? {
            return Err(not_found_error("User", id));
        }
        tx.commit().await?;

        info!("🗑️ Usuario {} eliminado", id);
        Ok(())
    }

    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        let mut tx = self.store.begin().await?;
        tx.find_user(id)
            .await?
            .ok_or_else(|| not_found_error("User", id))
    }

    /// Busca por nombre de pila
    pub async fn get_user_by_name(&self, name: &str) -> AppResult<User> {
        let mut tx = self.store.begin().await?;
        tx.find_user_by_first_name(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with name '{}' not found", name)))
    }

    pub async fn list_users(&self, request: PageRequest) -> AppResult<Paged<User>> {
        let mut tx = self.store.begin().await?;
        let total = tx.count_users().await?;
        let items = tx.list_users(request.offset(), request.page_size()).await?;
        Ok(Paged::new(items, request, total))
    }

    // ----- Categorías -----

    pub async fn create_category(&self, name: &str) -> AppResult<UserCategory> {
        let name = name.trim();
        let mut tx = self.store.begin().await?;
        if tx.find_category_by_name(name).await?.is_some() {
            return Err(conflict_error("UserCategory", "name", name));
        }
        let category = tx.insert_category(name).await?;
        tx.commit().await?;

        info!("🏷️ Categoría {} ({}) creada", category.id, category.name);
        Ok(category)
    }

    pub async fn get_category(&self, id: i32) -> AppResult<UserCategory> {
        let mut tx = self.store.begin().await?;
        tx.find_category(id)
            .await?
            .ok_or_else(|| not_found_error("UserCategory", id))
    }

    pub async fn list_categories(&self) -> AppResult<Vec<UserCategory>> {
        let mut tx = self.store.begin().await?;
        tx.list_categories().await
    }

    /// Una categoría en uso no se puede borrar
    pub async fn delete_category(&self, id: i32) -> AppResult<()> {
        let mut tx = self.store.begin().await?;
        if tx.find_category(id).await?.is_none() {
            return Err(not_found_error("UserCategory", id));
        }
        let in_use = tx.count_users_in_category(id).await?;
        if in_use > 0 {
            return Err(AppError::Conflict(format!(
                "UserCategory {} is assigned to {} users",
                id, in_use
            )));
        }
        tx.delete_category(id).await?;
        tx.commit().await?;

        info!("🗑️ Categoría {} eliminada", id);
        Ok(())
    }
}
