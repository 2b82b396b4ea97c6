use async_trait::async_trait;

use super::postgres::PgTransaction;
use crate::models::{Zone, ZoneData};
use crate::utils::errors::{AppError, AppResult};

#[async_trait]
pub trait ZoneRepository: Send {
    async fn find_zone(&mut self, id: i32) -> AppResult<Option<Zone>>;

    async fn list_zones(&mut self, offset: i64, limit: i64) -> AppResult<Vec<Zone>>;

    async fn count_zones(&mut self) -> AppResult<i64>;

    async fn insert_zone(&mut self, data: &ZoneData) -> AppResult<Zone>;

    async fn update_zone(&mut self, id: i32, data: &ZoneData) -> AppResult<()>;

    async fn delete_zone(&mut self, id: i32) -> AppResult<bool>;
}

#[async_trait]
impl ZoneRepository for PgTransaction {
    async fn find_zone(&mut self, id: i32) -> AppResult<Option<Zone>> {
        sqlx::query_as::<_, Zone>("SELECT id, name, zone_type FROM zones WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error finding zone"))
    }

    async fn list_zones(&mut self, offset: i64, limit: i64) -> AppResult<Vec<Zone>> {
        sqlx::query_as::<_, Zone>(
            "SELECT id, name, zone_type FROM zones ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| AppError::from_db(e, "Error listing zones"))
    }

    async fn count_zones(&mut self) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM zones")
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error counting zones"))
    }

    async fn insert_zone(&mut self, data: &ZoneData) -> AppResult<Zone> {
        sqlx::query_as::<_, Zone>(
            "INSERT INTO zones (name, zone_type) VALUES ($1, $2) RETURNING id, name, zone_type",
        )
        .bind(&data.name)
        .bind(&data.zone_type)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| AppError::from_db(e, "Error creating zone"))
    }

    async fn update_zone(&mut self, id: i32, data: &ZoneData) -> AppResult<()> {
        sqlx::query("UPDATE zones SET name = $2, zone_type = $3 WHERE id = $1")
            .bind(id)
            .bind(&data.name)
            .bind(&data.zone_type)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error updating zone"))?;

        Ok(())
    }

    async fn delete_zone(&mut self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM zones WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error deleting zone"))?;

        Ok(result.rows_affected() > 0)
    }
}
