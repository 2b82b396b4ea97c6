use async_trait::async_trait;

use super::postgres::PgTransaction;
use crate::models::{Motorcycle, NewMotorcycle};
use crate::utils::errors::{AppError, AppResult};

const MOTORCYCLE_COLUMNS: &str = "id, moto_type, plate, chassis_number, odometer_km, spot_id";

#[async_trait]
pub trait MotorcycleRepository: Send {
    async fn find_motorcycle(&mut self, id: i32) -> AppResult<Option<Motorcycle>>;

    /// Lectura con bloqueo de fila hasta el fin de la transacción
    async fn find_motorcycle_for_update(&mut self, id: i32) -> AppResult<Option<Motorcycle>>;

    async fn find_motorcycle_by_spot(&mut self, spot_id: i32) -> AppResult<Option<Motorcycle>>;

    async fn list_motorcycles(&mut self, offset: i64, limit: i64) -> AppResult<Vec<Motorcycle>>;

    async fn count_motorcycles(&mut self) -> AppResult<i64>;

    async fn list_motorcycles_by_type(&mut self, moto_type: &str) -> AppResult<Vec<Motorcycle>>;

    async fn insert_motorcycle(&mut self, moto: &NewMotorcycle) -> AppResult<Motorcycle>;

    async fn update_motorcycle(&mut self, moto: &Motorcycle) -> AppResult<()>;

    /// Devuelve false si no existía ninguna fila con ese id
    async fn delete_motorcycle(&mut self, id: i32) -> AppResult<bool>;
}

#[async_trait]
impl MotorcycleRepository for PgTransaction {
    async fn find_motorcycle(&mut self, id: i32) -> AppResult<Option<Motorcycle>> {
        let sql = format!("SELECT {} FROM motorcycles WHERE id = $1", MOTORCYCLE_COLUMNS);
        sqlx::query_as::<_, Motorcycle>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error finding motorcycle"))
    }

    async fn find_motorcycle_for_update(&mut self, id: i32) -> AppResult<Option<Motorcycle>> {
        let sql = format!(
            "SELECT {} FROM motorcycles WHERE id = $1 FOR UPDATE",
            MOTORCYCLE_COLUMNS
        );
        sqlx::query_as::<_, Motorcycle>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error locking motorcycle"))
    }

    async fn find_motorcycle_by_spot(&mut self, spot_id: i32) -> AppResult<Option<Motorcycle>> {
        let sql = format!("SELECT {} FROM motorcycles WHERE spot_id = $1", MOTORCYCLE_COLUMNS);
        sqlx::query_as::<_, Motorcycle>(&sql)
            .bind(spot_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error finding motorcycle by spot"))
    }

    async fn list_motorcycles(&mut self, offset: i64, limit: i64) -> AppResult<Vec<Motorcycle>> {
        let sql = format!(
            "SELECT {} FROM motorcycles ORDER BY id LIMIT $1 OFFSET $2",
            MOTORCYCLE_COLUMNS
        );
        sqlx::query_as::<_, Motorcycle>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error listing motorcycles"))
    }

    async fn count_motorcycles(&mut self) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM motorcycles")
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error counting motorcycles"))
    }

    async fn list_motorcycles_by_type(&mut self, moto_type: &str) -> AppResult<Vec<Motorcycle>> {
        let sql = format!(
            "SELECT {} FROM motorcycles WHERE moto_type = $1 ORDER BY id",
            MOTORCYCLE_COLUMNS
        );
        sqlx::query_as::<_, Motorcycle>(&sql)
            .bind(moto_type)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error listing motorcycles by type"))
    }

    async fn insert_motorcycle(&mut self, moto: &NewMotorcycle) -> AppResult<Motorcycle> {
        let sql = format!(
            r#"
            INSERT INTO motorcycles (moto_type, plate, chassis_number, odometer_km, spot_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            MOTORCYCLE_COLUMNS
        );
        sqlx::query_as::<_, Motorcycle>(&sql)
            .bind(&moto.moto_type)
            .bind(&moto.plate)
            .bind(&moto.chassis_number)
            .bind(moto.odometer_km)
            .bind(moto.spot_id)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error creating motorcycle"))
    }

    async fn update_motorcycle(&mut self, moto: &Motorcycle) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE motorcycles
            SET moto_type = $2, plate = $3, chassis_number = $4, odometer_km = $5, spot_id = $6
            WHERE id = $1
            "#,
        )
        .bind(moto.id)
        .bind(&moto.moto_type)
        .bind(&moto.plate)
        .bind(&moto.chassis_number)
        .bind(moto.odometer_km)
        .bind(moto.spot_id)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| AppError::from_db(e, "Error updating motorcycle"))?;

        Ok(())
    }

    async fn delete_motorcycle(&mut self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM motorcycles WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error deleting motorcycle"))?;

        Ok(result.rows_affected() > 0)
    }
}
