use async_trait::async_trait;

use super::postgres::PgTransaction;
use crate::models::{Tag, TagData};
use crate::utils::errors::{AppError, AppResult};

const TAG_COLUMNS: &str = "id, moto_id, frequency_range, band, application";

#[async_trait]
pub trait TagRepository: Send {
    async fn find_tag(&mut self, id: i32) -> AppResult<Option<Tag>>;

    async fn find_tag_by_moto(&mut self, moto_id: i32) -> AppResult<Option<Tag>>;

    async fn list_tags(&mut self, offset: i64, limit: i64) -> AppResult<Vec<Tag>>;

    async fn count_tags(&mut self) -> AppResult<i64>;

    async fn insert_tag(&mut self, data: &TagData) -> AppResult<Tag>;

    async fn update_tag(&mut self, tag: &Tag) -> AppResult<()>;

    async fn delete_tag(&mut self, id: i32) -> AppResult<bool>;
}

#[async_trait]
impl TagRepository for PgTransaction {
    async fn find_tag(&mut self, id: i32) -> AppResult<Option<Tag>> {
        let sql = format!("SELECT {} FROM rfid_tags WHERE id = $1", TAG_COLUMNS);
        sqlx::query_as::<_, Tag>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error finding tag"))
    }

    async fn find_tag_by_moto(&mut self, moto_id: i32) -> AppResult<Option<Tag>> {
        let sql = format!("SELECT {} FROM rfid_tags WHERE moto_id = $1", TAG_COLUMNS);
        sqlx::query_as::<_, Tag>(&sql)
            .bind(moto_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error finding tag by motorcycle"))
    }

    async fn list_tags(&mut self, offset: i64, limit: i64) -> AppResult<Vec<Tag>> {
        let sql = format!(
            "SELECT {} FROM rfid_tags ORDER BY id LIMIT $1 OFFSET $2",
            TAG_COLUMNS
        );
        sqlx::query_as::<_, Tag>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error listing tags"))
    }

    async fn count_tags(&mut self) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rfid_tags")
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error counting tags"))
    }

    async fn insert_tag(&mut self, data: &TagData) -> AppResult<Tag> {
        let sql = format!(
            r#"
            INSERT INTO rfid_tags (moto_id, frequency_range, band, application)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            TAG_COLUMNS
        );
        sqlx::query_as::<_, Tag>(&sql)
            .bind(data.moto_id)
            .bind(&data.frequency_range)
            .bind(&data.band)
            .bind(&data.application)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error creating tag"))
    }

    async fn update_tag(&mut self, tag: &Tag) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE rfid_tags
            SET moto_id = $2, frequency_range = $3, band = $4, application = $5
            WHERE id = $1
            "#,
        )
        .bind(tag.id)
        .bind(tag.moto_id)
        .bind(&tag.frequency_range)
        .bind(&tag.band)
        .bind(&tag.application)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| AppError::from_db(e, "Error updating tag"))?;

        Ok(())
    }

    async fn delete_tag(&mut self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM rfid_tags WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Error deleting tag"))?;

        Ok(result.rows_affected() > 0)
    }
}
