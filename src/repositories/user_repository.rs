use async_trait::async_trait;

use super::postgres::PgTransaction;
use crate::models::{User, UserCategory, UserData};
use crate::utils::errors::{AppError, AppResult};

const USER_COLUMNS: &str =
    "id, category_id, first_name, last_name, birth_date, cpf, email, password_hash";

/// Repositorio de usuarios y de sus categorías
#[async_trait]
pub trait UserRepository: Send {
    async fn find_user(&mut self, id: i32) -> AppResult<Option<User>>;

    async fn find_user_by_first_name(&mut self, name: &str) -> AppResult<Option<User>>;

    async fn find_user_by_email(&mut self, email: &str) -> AppResult<Option<User>>;

    async fn find_user_by_cpf(&mut self, cpf: &str) -> AppResult<Option<User>>;

    async fn list_users(&mut self, offset: i64, limit: i64) -> AppResult<Vec<User>>;

    async fn count_users(&mut self) -> AppResult<i64>;

    async fn count_users_in_category(&mut self, category_id: i32) -> AppResult<i64>;

    async fn insert_user(&mut self, data: &UserData) -> AppResult<User>;

    async fn update_user(&mut self, user: &User) -> AppResult<()>;

    async fn delete_user(&mut self, id: i32) -> AppResult<bool>;

    async fn find_category(&mut self, id: i32) -> AppResult<Option<UserCategory>>;

    async fn find_category_by_name(&mut self, name: &str) -> AppResult<Option<UserCategory>>;

    async fn list_categories(&mut self) -> AppResult<Vec<UserCategory>>;

    async fn insert_category(&mut self, name: &str) -> AppResult<UserCategory>;

    async fn delete_category(&mut self, id: i32) -> AppResult<bool>;
}

#[async_trait]
impl UserRepository for PgTransaction {
    async fn find_user(&mut self, id: i32) -> AppResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error finding user"))
    }

    async fn find_user_by_first_name(&mut self, name: &str) -> AppResult<Option<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE first_name = $1 ORDER BY id LIMIT 1",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(name)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error finding user by name"))
    }

    async fn find_user_by_email(&mut self, email: &str) -> AppResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error finding user by email"))
    }

    async fn find_user_by_cpf(&mut self, cpf: &str) -> AppResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE cpf = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(cpf)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error finding user by cpf"))
    }

    async fn list_users(&mut self, offset: i64, limit: i64) -> AppResult<Vec<User>> {
        let sql = format!(
            "SELECT {} FROM users ORDER BY id LIMIT $1 OFFSET $2",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error listing users"))
    }

    async fn count_users(&mut self) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error counting users"))
    }

    async fn count_users_in_category(&mut self, category_id: i32) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error counting users by category"))
    }

    async fn insert_user(&mut self, data: &UserData) -> AppResult<User> {
        let sql = format!(
            r#"
            INSERT INTO users (category_id, first_name, last_name, birth_date, cpf, email, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(data.category_id)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(data.birth_date)
            .bind(&data.cpf)
            .bind(&data.email)
            .bind(&data.password_hash)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error creating user"))
    }

    async fn update_user(&mut self, user: &User) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET category_id = $2, first_name = $3, last_name = $4, birth_date = $5,
                cpf = $6, email = $7, password_hash = $8
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(user.category_id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.birth_date)
        .bind(&user.cpf)
        .bind(&user.email)
        .bind(&user.password_hash)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| AppError::from_db(e, "Error updating user"))?;

        Ok(())
    }

    async fn delete_user(&mut self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error deleting user"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_category(&mut self, id: i32) -> AppResult<Option<UserCategory>> {
        sqlx::query_as::<_, UserCategory>("SELECT id, name FROM user_categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error finding category"))
    }

    async fn find_category_by_name(&mut self, name: &str) -> AppResult<Option<UserCategory>> {
        sqlx::query_as::<_, UserCategory>("SELECT id, name FROM user_categories WHERE name = $1")
            .bind(name)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error finding category by name"))
    }

    async fn list_categories(&mut self) -> AppResult<Vec<UserCategory>> {
        sqlx::query_as::<_, UserCategory>("SELECT id, name FROM user_categories ORDER BY id")
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error listing categories"))
    }

    async fn insert_category(&mut self, name: &str) -> AppResult<UserCategory> {
        sqlx::query_as::<_, UserCategory>(
            "INSERT INTO user_categories (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| AppError::from_db(e, "Error creating category"))
    }

    async fn delete_category(&mut self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM user_categories WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error deleting category"))?;

        Ok(result.rows_affected() > 0)
    }
}
