use async_trait::async_trait;

use super::postgres::PgTransaction;
use crate::models::{Spot, SpotData};
use crate::utils::errors::{AppError, AppResult};

#[async_trait]
pub trait SpotRepository: Send {
    async fn find_spot(&mut self, id: i32) -> AppResult<Option<Spot>>;

    /// Lee la vaga bloqueando la fila (`SELECT ... FOR UPDATE`)
    async fn lock_spot(&mut self, id: i32) -> AppResult<Option<Spot>>;

    async fn list_spots(&mut self, offset: i64, limit: i64) -> AppResult<Vec<Spot>>;

    async fn count_spots(&mut self) -> AppResult<i64>;

    async fn list_spots_by_zone(&mut self, zone_id: i32) -> AppResult<Vec<Spot>>;

    /// Inserta siempre con `occupied = false`
    async fn insert_spot(&mut self, data: &SpotData) -> AppResult<Spot>;

    async fn update_spot_data(&mut self, id: i32, data: &SpotData) -> AppResult<()>;

    async fn set_spot_occupied(&mut self, id: i32, occupied: bool) -> AppResult<()>;

    async fn delete_spot(&mut self, id: i32) -> AppResult<bool>;

    async fn delete_spots_by_zone(&mut self, zone_id: i32) -> AppResult<u64>;
}

#[async_trait]
impl SpotRepository for PgTransaction {
    async fn find_spot(&mut self, id: i32) -> AppResult<Option<Spot>> {
        sqlx::query_as::<_, Spot>("SELECT id, code, occupied, zone_id FROM spots WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error finding spot"))
    }

    async fn lock_spot(&mut self, id: i32) -> AppResult<Option<Spot>> {
        sqlx::query_as::<_, Spot>(
            "SELECT id, code, occupied, zone_id FROM spots WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| AppError::from_db(e, "Error locking spot"))
    }

    async fn list_spots(&mut self, offset: i64, limit: i64) -> AppResult<Vec<Spot>> {
        sqlx::query_as::<_, Spot>(
            "SELECT id, code, occupied, zone_id FROM spots ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| AppError::from_db(e, "Error listing spots"))
    }

    async fn count_spots(&mut self) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM spots")
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error counting spots"))
    }

    async fn list_spots_by_zone(&mut self, zone_id: i32) -> AppResult<Vec<Spot>> {
        sqlx::query_as::<_, Spot>(
            "SELECT id, code, occupied, zone_id FROM spots WHERE zone_id = $1 ORDER BY id",
        )
        .bind(zone_id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| AppError::from_db(e, "Error listing spots by zone"))
    }

    async fn insert_spot(&mut self, data: &SpotData) -> AppResult<Spot> {
        sqlx::query_as::<_, Spot>(
            r#"
            INSERT INTO spots (code, occupied, zone_id)
            VALUES ($1, FALSE, $2)
            RETURNING id, code, occupied, zone_id
            "#,
        )
        .bind(&data.code)
        .bind(data.zone_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| AppError::from_db(e, "Error creating spot"))
    }

    async fn update_spot_data(&mut self, id: i32, data: &SpotData) -> AppResult<()> {
        sqlx::query("UPDATE spots SET code = $2, zone_id = $3 WHERE id = $1")
            .bind(id)
            .bind(&data.code)
            .bind(data.zone_id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error updating spot"))?;

        Ok(())
    }

    async fn set_spot_occupied(&mut self, id: i32, occupied: bool) -> AppResult<()> {
        sqlx::query("UPDATE spots SET occupied = $2 WHERE id = $1")
            .bind(id)
            .bind(occupied)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error updating spot occupancy"))?;

        Ok(())
    }

    async fn delete_spot(&mut self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM spots WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error deleting spot"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_spots_by_zone(&mut self, zone_id: i32) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM spots WHERE zone_id = $1")
            .bind(zone_id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error deleting spots by zone"))?;

        Ok(result.rows_affected())
    }
}
