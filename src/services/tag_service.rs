//! Servicio de tags RFID
//!
//! Vincula y desvincula tags de motos por clave foránea. La relación es uno
//! a uno: una moto ya vinculada a otro tag es un conflicto.

use std::sync::Arc;

use tracing::info;

use crate::models::{Tag, TagData};
use crate::repositories::{Store, Transaction};
use crate::utils::errors::{invalid_reference_error, not_found_error, AppError, AppResult};
use crate::utils::pagination::{PageRequest, Paged};

pub struct TagService {
    store: Arc<dyn Store>,
}

/// Comprueba que la moto exista y no tenga otro tag
async fn check_binding(tx: &mut dyn Transaction, tag_id: Option<i32>, moto_id: i32) -> AppResult<()> {
    if tx.find_motorcycle(moto_id).await?.is_none() {
        return Err(invalid_reference_error("Motorcycle", moto_id));
    }
    if let Some(bound) = tx.find_tag_by_moto(moto_id).await? {
        if Some(bound.id) != tag_id {
            return Err(AppError::Conflict(format!(
                "Motorcycle {} is already linked to tag {}",
                moto_id, bound.id
            )));
        }
    }
    Ok(())
}

impl TagService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create_tag(&self, data: TagData) -> AppResult<Tag> {
        let mut tx = self.store.begin().await?;
        if let Some(moto_id) = data.moto_id {
            check_binding(&mut *tx, None, moto_id).await?;
        }
        let tag = tx.insert_tag(&data).await?;
        tx.commit().await?;

        info!("🏷️ Tag {} creado (moto: {:?})", tag.id, tag.moto_id);
        Ok(tag)
    }

    /// Sobrescribe todos los campos, incluida la moto vinculada
    pub async fn update_tag(&self, id: i32, data: TagData) -> AppResult<Tag> {
        let mut tx = self.store.begin().await?;
        let mut tag = tx
            .find_tag(id)
            .await?
            .ok_or_else(|| not_found_error("Tag", id))?;
        if let Some(moto_id) = data.moto_id {
            check_binding(&mut *tx, Some(id), moto_id).await?;
        }

        tag.moto_id = data.moto_id;
        tag.frequency_range = data.frequency_range;
        tag.band = data.band;
        tag.application = data.application;
        tx.update_tag(&tag).await?;
        tx.commit().await?;

        info!("🏷️ Tag {} actualizado (moto: {:?})", id, tag.moto_id);
        Ok(tag)
    }

    /// Borra el tag; la moto referenciada no se toca
    pub async fn delete_tag(&self, id: i32) -> AppResult<()> {
        let mut tx = self.store.begin().await?;
        if !tx.delete_tag(id).await? {
            return Err(not_found_error("Tag", id));
        }
        tx.commit().await?;

        info!("🗑️ Tag {} eliminado", id);
        Ok(())
    }

    pub async fn get_tag(&self, id: i32) -> AppResult<Tag> {
        let mut tx = self.store.begin().await?;
        tx.find_tag(id)
            .await?
            .ok_or_else(|| not_found_error("Tag", id))
    }

    pub async fn list_tags(&self, request: PageRequest) -> AppResult<Paged<Tag>> {
        let mut tx = self.store.begin().await?;
        let total = tx.count_tags().await?;
        let items = tx.list_tags(request.offset(), request.page_size()).await?;
        Ok(Paged::new(items, request, total))
    }
}
