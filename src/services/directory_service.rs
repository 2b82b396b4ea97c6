//! Directorio de zonas y vagas
//!
//! CRUD simple. El flag `occupied` de una vaga nunca se modifica aquí: al
//! crear se fuerza a `false` y las actualizaciones sólo tocan código y zona.
//! La ocupación la cambia exclusivamente el motor de ocupación.

use std::sync::Arc;

use tracing::info;

use crate::models::{Motorcycle, Spot, SpotData, Zone, ZoneData};
use crate::repositories::{Store, Transaction};
use crate::utils::errors::{invalid_reference_error, not_found_error, AppError, AppResult};
use crate::utils::pagination::{PageRequest, Paged};

/// Vaga con su zona y la moto que la ocupa
#[derive(Debug, Clone, PartialEq)]
pub struct SpotDetails {
    pub spot: Spot,
    pub zone: Option<Zone>,
    pub motorcycle: Option<Motorcycle>,
}

/// Zona con sus vagas
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneDetails {
    pub zone: Zone,
    pub spots: Vec<Spot>,
}

pub struct DirectoryService {
    store: Arc<dyn Store>,
}

async fn ensure_zone_exists(tx: &mut dyn Transaction, zone_id: i32) -> AppResult<()> {
    if tx.find_zone(zone_id).await?.is_none() {
        return Err(invalid_reference_error("Zone", zone_id));
    }
    Ok(())
}

async fn spot_details(tx: &mut dyn Transaction, spot: Spot) -> AppResult<SpotDetails> {
    let zone = tx.find_zone(spot.zone_id).await?;
    let motorcycle = tx.find_motorcycle_by_spot(spot.id).await?;
    Ok(SpotDetails {
        spot,
        zone,
        motorcycle,
    })
}

impl DirectoryService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    // ----- Vagas -----

    pub async fn create_spot(&self, data: SpotData) -> AppResult<Spot> {
        let mut tx = self.store.begin().await?;
        ensure_zone_exists(&mut *tx, data.zone_id).await?;
        let spot = tx.insert_spot(&data).await?;
        tx.commit().await?;

        info!("🅿️ Vaga {} ({}) creada en la zona {}", spot.id, spot.code, spot.zone_id);
        Ok(spot)
    }

    /// Actualiza sólo código y zona
    pub async fn update_spot(&self, id: i32, data: SpotData) -> AppResult<Spot> {
        let mut tx = self.store.begin().await?;
        let mut spot = tx
            .find_spot(id)
            .await?
            .ok_or_else(|| not_found_error("Spot", id))?;
        ensure_zone_exists(&mut *tx, data.zone_id).await?;

        tx.update_spot_data(id, &data).await?;
        tx.commit().await?;

        spot.code = data.code;
        spot.zone_id = data.zone_id;
        info!("🅿️ Vaga {} actualizada", id);
        Ok(spot)
    }

    /// Borra una vaga libre; una vaga ocupada es un conflicto
    pub async fn delete_spot(&self, id: i32) -> AppResult<()> {
        let mut tx = self.store.begin().await?;
        let spot = tx
            .lock_spot(id)
            .await?
            .ok_or_else(|| not_found_error("Spot", id))?;
        if spot.occupied {
            return Err(AppError::Conflict(format!(
                "Spot '{}' ({}) is occupied and cannot be deleted",
                spot.code, id
            )));
        }

        tx.delete_spot(id).await?;
        tx.commit().await?;

        info!("🗑️ Vaga {} eliminada", id);
        Ok(())
    }

    pub async fn get_spot(&self, id: i32) -> AppResult<SpotDetails> {
        let mut tx = self.store.begin().await?;
        let spot = tx
            .find_spot(id)
            .await?
            .ok_or_else(|| not_found_error("Spot", id))?;
        spot_details(&mut *tx, spot).await
    }

    pub async fn list_spots(&self, request: PageRequest) -> AppResult<Paged<SpotDetails>> {
        let mut tx = self.store.begin().await?;
        let total = tx.count_spots().await?;
        let spots = tx.list_spots(request.offset(), request.page_size()).await?;

        let mut items = Vec::with_capacity(spots.len());
        for spot in spots {
            items.push(spot_details(&mut *tx, spot).await?);
        }
        Ok(Paged::new(items, request, total))
    }

    // ----- Zonas -----

    pub async fn create_zone(&self, data: ZoneData) -> AppResult<Zone> {
        let mut tx = self.store.begin().await?;
        let zone = tx.insert_zone(&data).await?;
        tx.commit().await?;

        info!("🗺️ Zona {} ({}) creada", zone.id, zone.name);
        Ok(zone)
    }

    pub async fn update_zone(&self, id: i32, data: ZoneData) -> AppResult<Zone> {
        let mut tx = self.store.begin().await?;
        if tx.find_zone(id).await?.is_none() {
            return Err(not_found_error("Zone", id));
        }
        tx.update_zone(id, &data).await?;
        tx.commit().await?;

        info!("🗺️ Zona {} actualizada", id);
        Ok(Zone {
            id,
            name: data.name,
            zone_type: data.zone_type,
        })
    }

    /// Borra la zona junto con sus vagas, siempre que ninguna esté ocupada
    pub async fn delete_zone(&self, id: i32) -> AppResult<()> {
        let mut tx = self.store.begin().await?;
        if tx.find_zone(id).await?.is_none() {
            return Err(not_found_error("Zone", id));
        }

        let mut spot_ids: Vec<i32> = tx
            .list_spots_by_zone(id)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();
        spot_ids.sort_unstable();
        for spot_id in &spot_ids {
            let occupied = tx
                .lock_spot(*spot_id)
                .await?
                .map(|s| s.occupied)
                .unwrap_or(false);
            if occupied {
                return Err(AppError::Conflict(format!(
                    "Zone {} has occupied spot {}",
                    id, spot_id
                )));
            }
        }

        let removed_spots = tx.delete_spots_by_zone(id).await?;
        tx.delete_zone(id).await?;
        tx.commit().await?;

        info!("🗑️ Zona {} eliminada junto con {} vagas", id, removed_spots);
        Ok(())
    }

    pub async fn get_zone(&self, id: i32) -> AppResult<ZoneDetails> {
        let mut tx = self.store.begin().await?;
        let zone = tx
            .find_zone(id)
            .await?
            .ok_or_else(|| not_found_error("Zone", id))?;
        let spots = tx.list_spots_by_zone(id).await?;
        Ok(ZoneDetails { zone, spots })
    }

    pub async fn list_zones(&self, request: PageRequest) -> AppResult<Paged<Zone>> {
        let mut tx = self.store.begin().await?;
        let total = tx.count_zones().await?;
        let items = tx.list_zones(request.offset(), request.page_size()).await?;
        Ok(Paged::new(items, request, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;
    use crate::services::occupancy_service::OccupancyService;
    use crate::models::NewMotorcycle;

    fn setup() -> (DirectoryService, OccupancyService) {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        (
            DirectoryService::new(store.clone()),
            OccupancyService::new(store),
        )
    }

    fn zone_data(name: &str) -> ZoneData {
        ZoneData {
            name: name.to_string(),
            zone_type: "Elétrica".to_string(),
        }
    }

    fn moto_on(spot_id: i32) -> NewMotorcycle {
        NewMotorcycle {
            moto_type: "Scooter".to_string(),
            plate: "GHI7890".to_string(),
            chassis_number: "9C2JC4110JR000005".to_string(),
            odometer_km: 10.0,
            spot_id: Some(spot_id),
        }
    }

    #[tokio::test]
    async fn test_create_spot_starts_free() {
        let (directory, _) = setup();
        let zone = directory.create_zone(zone_data("ZE")).await.unwrap();
        let spot = directory
            .create_spot(SpotData {
                code: "ZEVG1".to_string(),
                zone_id: zone.id,
            })
            .await
            .unwrap();
        assert!(!spot.occupied);
    }

    #[tokio::test]
    async fn test_create_spot_in_unknown_zone_is_invalid_reference() {
        let (directory, _) = setup();
        let err = directory
            .create_spot(SpotData {
                code: "ZEVG1".to_string(),
                zone_id: 77,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidReference(_)));
    }

    #[tokio::test]
    async fn test_update_spot_keeps_occupancy() {
        let (directory, occupancy) = setup();
        let z1 = directory.create_zone(zone_data("ZC1")).await.unwrap();
        let z2 = directory.create_zone(zone_data("ZC2")).await.unwrap();
        let spot = directory
            .create_spot(SpotData {
                code: "ZC1VG1".to_string(),
                zone_id: z1.id,
            })
            .await
            .unwrap();
        occupancy.create_motorcycle(moto_on(spot.id)).await.unwrap();

        let updated = directory
            .update_spot(
                spot.id,
                SpotData {
                    code: "ZC2VG1".to_string(),
                    zone_id: z2.id,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.code, "ZC2VG1");
        assert_eq!(updated.zone_id, z2.id);
        assert!(updated.occupied);
        let details = directory.get_spot(spot.id).await.unwrap();
        assert!(details.spot.occupied);
        assert!(details.motorcycle.is_some());
        assert_eq!(details.zone.map(|z| z.name), Some("ZC2".to_string()));
    }

    #[tokio::test]
    async fn test_delete_occupied_spot_is_conflict() {
        let (directory, occupancy) = setup();
        let zone = directory.create_zone(zone_data("ZC1")).await.unwrap();
        let spot = directory
            .create_spot(SpotData {
                code: "ZC1VG1".to_string(),
                zone_id: zone.id,
            })
            .await
            .unwrap();
        let moto = occupancy.create_motorcycle(moto_on(spot.id)).await.unwrap();

        let err = directory.delete_spot(spot.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        occupancy.delete_motorcycle(moto.id).await.unwrap();
        directory.delete_spot(spot.id).await.unwrap();
        let err = directory.delete_spot(spot.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_zone_cascades_free_spots() {
        let (directory, _) = setup();
        let zone = directory.create_zone(zone_data("ZC1")).await.unwrap();
        let spot = directory
            .create_spot(SpotData {
                code: "ZC1VG1".to_string(),
                zone_id: zone.id,
            })
            .await
            .unwrap();

        directory.delete_zone(zone.id).await.unwrap();

        assert!(matches!(
            directory.get_spot(spot.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            directory.get_zone(zone.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_delete_zone_with_occupied_spot_is_conflict() {
        let (directory, occupancy) = setup();
        let zone = directory.create_zone(zone_data("ZC1")).await.unwrap();
        let spot = directory
            .create_spot(SpotData {
                code: "ZC1VG1".to_string(),
                zone_id: zone.id,
            })
            .await
            .unwrap();
        occupancy.create_motorcycle(moto_on(spot.id)).await.unwrap();

        let err = directory.delete_zone(zone.id).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        let details = directory.get_zone(zone.id).await.unwrap();
        assert_eq!(details.spots.len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_list_zones() {
        let (directory, _) = setup();
        let zone = directory.create_zone(zone_data("ZC1")).await.unwrap();
        directory.create_zone(zone_data("ZC2")).await.unwrap();

        let updated = directory
            .update_zone(zone.id, zone_data("ZC1-Norte"))
            .await
            .unwrap();
        assert_eq!(updated.name, "ZC1-Norte");

        let page = directory.list_zones(PageRequest::default()).await.unwrap();
        assert_eq!(page.total_items, 2);
        assert_eq!(page.items[0].name, "ZC1-Norte");

        let err = directory.update_zone(99, zone_data("X")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
