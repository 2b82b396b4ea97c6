//! Motor de ocupación de vagas
//!
//! Mantiene consistentes el `spot_id` de cada moto y el flag `occupied` de
//! cada vaga: una vaga está ocupada si y sólo si exactamente una moto la
//! referencia. Cada operación corre en una única transacción y valida por
//! completo antes de mutar, de modo que un rechazo nunca deja cambios
//! parciales.
//!
//! Orden de bloqueos: vagas (id ascendente), después la moto, después el
//! tag. Todas las operaciones lo respetan.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::models::{Motorcycle, MotorcycleChanges, NewMotorcycle, Spot, Tag};
use crate::repositories::{Store, Transaction};
use crate::utils::errors::{invalid_reference_error, not_found_error, AppError, AppResult};
use crate::utils::pagination::{PageRequest, Paged};

/// Moto con su vaga y su tag
#[derive(Debug, Clone, PartialEq)]
pub struct MotorcycleDetails {
    pub motorcycle: Motorcycle,
    pub spot: Option<Spot>,
    pub tag: Option<Tag>,
}

pub struct OccupancyService {
    store: Arc<dyn Store>,
}

/// Bloquea las vagas indicadas en orden ascendente de id.
/// Las que no existen simplemente no aparecen en el resultado.
async fn lock_spots(
    tx: &mut dyn Transaction,
    ids: &[Option<i32>],
) -> AppResult<BTreeMap<i32, Spot>> {
    let mut ordered: Vec<i32> = ids.iter().flatten().copied().collect();
    ordered.sort_unstable();
    ordered.dedup();

    let mut locked = BTreeMap::new();
    for id in ordered {
        if let Some(spot) = tx.lock_spot(id).await? {
            locked.insert(id, spot);
        }
    }
    Ok(locked)
}

fn ensure_free(spot: &Spot) -> AppResult<()> {
    if spot.occupied {
        return Err(AppError::Conflict(format!(
            "Spot '{}' ({}) is already occupied",
            spot.code, spot.id
        )));
    }
    Ok(())
}

impl OccupancyService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Crea una moto, ocupando la vaga pedida si la hay
    pub async fn create_motorcycle(&self, new: NewMotorcycle) -> AppResult<Motorcycle> {
        let mut tx = self.store.begin().await?;

        if let Some(spot_id) = new.spot_id {
            let spot = tx
                .lock_spot(spot_id)
                .await?
                .ok_or_else(|| invalid_reference_error("Spot", spot_id))?;
            ensure_free(&spot)?;
            tx.set_spot_occupied(spot_id, true).await?;
        }

        let moto = tx.insert_motorcycle(&new).await?;
        tx.commit().await?;

        match moto.spot_id {
            Some(spot_id) => info!("🏍️ Moto {} creada en la vaga {}", moto.id, spot_id),
            None => info!("🏍️ Moto {} creada sin vaga", moto.id),
        }
        Ok(moto)
    }

    /// Reemplaza los datos de una moto, moviéndola de vaga si cambia `spot_id`
    pub async fn update_motorcycle(
        &self,
        id: i32,
        changes: MotorcycleChanges,
    ) -> AppResult<Motorcycle> {
        let mut tx = self.store.begin().await?;

        let snapshot = tx
            .find_motorcycle(id)
            .await?
            .ok_or_else(|| not_found_error("Motorcycle", id))?;
        let old_spot = snapshot.spot_id;
        let new_spot = changes.spot_id;

        let locked = if old_spot != new_spot {
            lock_spots(&mut *tx, &[old_spot, new_spot]).await?
        } else {
            BTreeMap::new()
        };

        let mut moto = tx
            .find_motorcycle_for_update(id)
            .await?
            .ok_or_else(|| not_found_error("Motorcycle", id))?;
        if moto.spot_id != old_spot {
            return Err(AppError::Conflict(format!(
                "Motorcycle {} changed spot concurrently",
                id
            )));
        }

        moto.apply_details(&changes);

        if old_spot != new_spot {
            if let Some(target) = new_spot {
                let spot = locked
                    .get(&target)
                    .ok_or_else(|| invalid_reference_error("Spot", target))?;
                ensure_free(spot)?;
            }

            if let Some(previous) = old_spot {
                if locked.contains_key(&previous) {
                    tx.set_spot_occupied(previous, false).await?;
                } else {
                    warn!(
                        "⚠️ La vaga anterior {} de la moto {} ya no existe",
                        previous, id
                    );
                }
            }
            if let Some(target) = new_spot {
                tx.set_spot_occupied(target, true).await?;
            }
            moto.spot_id = new_spot;
        }

        tx.update_motorcycle(&moto).await?;
        tx.commit().await?;

        if old_spot != new_spot {
            info!(
                "🔁 Moto {} movida de la vaga {:?} a la vaga {:?}",
                id, old_spot, new_spot
            );
        } else {
            debug!("Moto {} actualizada sin cambio de vaga", id);
        }
        Ok(moto)
    }

    /// Elimina una moto liberando su vaga y desvinculando su tag
    pub async fn delete_motorcycle(&self, id: i32) -> AppResult<()> {
        let mut tx = self.store.begin().await?;

        let snapshot = tx
            .find_motorcycle(id)
            .await?
            .ok_or_else(|| not_found_error("Motorcycle", id))?;
        let locked = lock_spots(&mut *tx, &[snapshot.spot_id]).await?;

        let moto = tx
            .find_motorcycle_for_update(id)
            .await?
            .ok_or_else(|| not_found_error("Motorcycle", id))?;
        if moto.spot_id != snapshot.spot_id {
            return Err(AppError::Conflict(format!(
                "Motorcycle {} changed spot concurrently",
                id
            )));
        }

        if let Some(mut tag) = tx.find_tag_by_moto(id).await? {
            tag.moto_id = None;
            tx.update_tag(&tag).await?;
            debug!("Tag {} desvinculado de la moto {}", tag.id, id);
        }

        if let Some(spot_id) = moto.spot_id {
            if locked.contains_key(&spot_id) {
                tx.set_spot_occupied(spot_id, false).await?;
            }
        }

        tx.delete_motorcycle(id).await?;
        tx.commit().await?;

        info!("🗑️ Moto {} eliminada (vaga liberada: {:?})", id, moto.spot_id);
        Ok(())
    }

    /// Libera una vaga ocupada, desvinculando la moto que la ocupa.
    ///
    /// Rechaza con `Conflict` una vaga que no está ocupada por ninguna moto.
    pub async fn release_spot(&self, spot_id: i32) -> AppResult<Spot> {
        let mut tx = self.store.begin().await?;

        let mut spot = tx
            .lock_spot(spot_id)
            .await?
            .ok_or_else(|| not_found_error("Spot", spot_id))?;

        let occupant = match tx.find_motorcycle_by_spot(spot_id).await? {
            Some(moto) if spot.occupied => moto,
            _ => {
                return Err(AppError::Conflict(format!(
                    "Spot '{}' ({}) is not occupied by a motorcycle",
                    spot.code, spot_id
                )));
            }
        };

        let mut moto = tx
            .find_motorcycle_for_update(occupant.id)
            .await?
            .ok_or_else(|| not_found_error("Motorcycle", occupant.id))?;
        moto.spot_id = None;
        tx.update_motorcycle(&moto).await?;
        tx.set_spot_occupied(spot_id, false).await?;
        tx.commit().await?;

        spot.occupied = false;
        info!("🅿️ Vaga {} liberada (moto {})", spot_id, moto.id);
        Ok(spot)
    }

    pub async fn get_motorcycle(&self, id: i32) -> AppResult<MotorcycleDetails> {
        let mut tx = self.store.begin().await?;

        let motorcycle = tx
            .find_motorcycle(id)
            .await?
            .ok_or_else(|| not_found_error("Motorcycle", id))?;
        let spot = match motorcycle.spot_id {
            Some(spot_id) => tx.find_spot(spot_id).await?,
            None => None,
        };
        let tag = tx.find_tag_by_moto(id).await?;

        Ok(MotorcycleDetails {
            motorcycle,
            spot,
            tag,
        })
    }

    pub async fn list_motorcycles(&self, request: PageRequest) -> AppResult<Paged<MotorcycleDetails>> {
        let mut tx = self.store.begin().await?;

        let total = tx.count_motorcycles().await?;
        let motorcycles = tx
            .list_motorcycles(request.offset(), request.page_size())
            .await?;

        let mut items = Vec::with_capacity(motorcycles.len());
        for motorcycle in motorcycles {
            let spot = match motorcycle.spot_id {
                Some(spot_id) => tx.find_spot(spot_id).await?,
                None => None,
            };
            let tag = tx.find_tag_by_moto(motorcycle.id).await?;
            items.push(MotorcycleDetails {
                motorcycle,
                spot,
                tag,
            });
        }

        Ok(Paged::new(items, request, total))
    }

    pub async fn list_motorcycles_by_type(&self, moto_type: &str) -> AppResult<Vec<Motorcycle>> {
        let mut tx = self.store.begin().await?;
        tx.list_motorcycles_by_type(moto_type).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SpotData, TagData, ZoneData};
    use crate::repositories::MemoryStore;

    struct Fixture {
        store: Arc<dyn Store>,
        service: OccupancyService,
    }

    impl Fixture {
        fn new() -> Self {
            let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
            let service = OccupancyService::new(store.clone());
            Self { store, service }
        }

        async fn zone(&self) -> i32 {
            let mut tx = self.store.begin().await.unwrap();
            let zone = tx
                .insert_zone(&ZoneData {
                    name: "ZC1".to_string(),
                    zone_type: "Combustão".to_string(),
                })
                .await
                .unwrap();
            tx.commit().await.unwrap();
            zone.id
        }

        async fn spot(&self, zone_id: i32, code: &str) -> i32 {
            let mut tx = self.store.begin().await.unwrap();
            let spot = tx
                .insert_spot(&SpotData {
                    code: code.to_string(),
                    zone_id,
                })
                .await
                .unwrap();
            tx.commit().await.unwrap();
            spot.id
        }

        async fn tag(&self, moto_id: i32) -> i32 {
            let mut tx = self.store.begin().await.unwrap();
            let tag = tx
                .insert_tag(&TagData {
                    moto_id: Some(moto_id),
                    frequency_range: "860-960 MHz".to_string(),
                    band: "UHF".to_string(),
                    application: "Rastreamento".to_string(),
                })
                .await
                .unwrap();
            tx.commit().await.unwrap();
            tag.id
        }

        async fn spot_state(&self, id: i32) -> Spot {
            let mut tx = self.store.begin().await.unwrap();
            tx.find_spot(id).await.unwrap().unwrap()
        }

        async fn motorcycle_count(&self) -> i64 {
            let mut tx = self.store.begin().await.unwrap();
            tx.count_motorcycles().await.unwrap()
        }

        /// ocupada <=> exactamente una moto la referencia
        async fn assert_invariant(&self) {
            let mut tx = self.store.begin().await.unwrap();
            let spots = tx.list_spots(0, i64::MAX).await.unwrap();
            let motos = tx.list_motorcycles(0, i64::MAX).await.unwrap();
            for spot in spots {
                let holders = motos
                    .iter()
                    .filter(|m| m.spot_id == Some(spot.id))
                    .count();
                assert_eq!(spot.occupied, holders == 1, "spot {} inconsistent", spot.id);
                assert!(holders <= 1);
            }
        }
    }

    fn new_moto(spot_id: Option<i32>) -> NewMotorcycle {
        NewMotorcycle {
            moto_type: "Esportiva".to_string(),
            plate: "ABC1234".to_string(),
            chassis_number: "9C2JC4110JR000001".to_string(),
            odometer_km: 0.0,
            spot_id,
        }
    }

    fn changes(spot_id: Option<i32>) -> MotorcycleChanges {
        MotorcycleChanges {
            moto_type: "Custom".to_string(),
            plate: "XYZ5678".to_string(),
            chassis_number: "9C2JC4110JR000002".to_string(),
            odometer_km: 1520.5,
            spot_id,
        }
    }

    #[tokio::test]
    async fn test_create_without_spot() {
        let fx = Fixture::new();
        let moto = fx.service.create_motorcycle(new_moto(None)).await.unwrap();
        assert_eq!(moto.spot_id, None);
        assert_eq!(fx.motorcycle_count().await, 1);
    }

    #[tokio::test]
    async fn test_create_occupies_free_spot() {
        let fx = Fixture::new();
        let zone = fx.zone().await;
        let s1 = fx.spot(zone, "ZC1VG1").await;

        let moto = fx.service.create_motorcycle(new_moto(Some(s1))).await.unwrap();

        assert_eq!(moto.spot_id, Some(s1));
        assert!(fx.spot_state(s1).await.occupied);
        fx.assert_invariant().await;
    }

    #[tokio::test]
    async fn test_create_with_missing_spot_is_invalid_reference() {
        let fx = Fixture::new();
        let err = fx
            .service
            .create_motorcycle(new_moto(Some(99)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidReference(_)));
        assert_eq!(fx.motorcycle_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_on_occupied_spot_is_conflict() {
        let fx = Fixture::new();
        let zone = fx.zone().await;
        let s1 = fx.spot(zone, "ZC1VG1").await;
        let m1 = fx.service.create_motorcycle(new_moto(Some(s1))).await.unwrap();

        let err = fx
            .service
            .create_motorcycle(new_moto(Some(s1)))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(fx.motorcycle_count().await, 1);
        let details = fx.service.get_motorcycle(m1.id).await.unwrap();
        assert_eq!(details.motorcycle.spot_id, Some(s1));
        fx.assert_invariant().await;
    }

    #[tokio::test]
    async fn test_update_moves_motorcycle_between_spots() {
        let fx = Fixture::new();
        let zone = fx.zone().await;
        let s1 = fx.spot(zone, "ZC1VG1").await;
        let s2 = fx.spot(zone, "ZC1VG2").await;
        let m1 = fx.service.create_motorcycle(new_moto(Some(s1))).await.unwrap();

        let updated = fx
            .service
            .update_motorcycle(m1.id, changes(Some(s2)))
            .await
            .unwrap();

        assert_eq!(updated.spot_id, Some(s2));
        assert_eq!(updated.moto_type, "Custom");
        assert!(!fx.spot_state(s1).await.occupied);
        assert!(fx.spot_state(s2).await.occupied);
        fx.assert_invariant().await;
    }

    #[tokio::test]
    async fn test_blocked_swap_leaves_no_partial_release() {
        let fx = Fixture::new();
        let zone = fx.zone().await;
        let s1 = fx.spot(zone, "ZC1VG1").await;
        let s2 = fx.spot(zone, "ZC1VG2").await;
        let m1 = fx.service.create_motorcycle(new_moto(Some(s1))).await.unwrap();
        let m4 = fx.service.create_motorcycle(new_moto(Some(s2))).await.unwrap();

        let err = fx
            .service
            .update_motorcycle(m1.id, changes(Some(s2)))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert!(fx.spot_state(s1).await.occupied);
        assert!(fx.spot_state(s2).await.occupied);
        let m1_after = fx.service.get_motorcycle(m1.id).await.unwrap().motorcycle;
        assert_eq!(m1_after.spot_id, Some(s1));
        // los demás campos tampoco se persisten
        assert_eq!(m1_after.moto_type, "Esportiva");
        let m4_after = fx.service.get_motorcycle(m4.id).await.unwrap().motorcycle;
        assert_eq!(m4_after.spot_id, Some(s2));
        fx.assert_invariant().await;
    }

    #[tokio::test]
    async fn test_update_to_missing_spot_is_invalid_reference() {
        let fx = Fixture::new();
        let zone = fx.zone().await;
        let s1 = fx.spot(zone, "ZC1VG1").await;
        let m1 = fx.service.create_motorcycle(new_moto(Some(s1))).await.unwrap();

        let err = fx
            .service
            .update_motorcycle(m1.id, changes(Some(42)))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidReference(_)));
        assert!(fx.spot_state(s1).await.occupied);
        fx.assert_invariant().await;
    }

    #[tokio::test]
    async fn test_update_leaving_spot_frees_it() {
        let fx = Fixture::new();
        let zone = fx.zone().await;
        let s1 = fx.spot(zone, "ZC1VG1").await;
        let m1 = fx.service.create_motorcycle(new_moto(Some(s1))).await.unwrap();

        let updated = fx.service.update_motorcycle(m1.id, changes(None)).await.unwrap();

        assert_eq!(updated.spot_id, None);
        assert!(!fx.spot_state(s1).await.occupied);
        fx.assert_invariant().await;
    }

    #[tokio::test]
    async fn test_update_same_spot_only_changes_details() {
        let fx = Fixture::new();
        let zone = fx.zone().await;
        let s1 = fx.spot(zone, "ZC1VG1").await;
        let m1 = fx.service.create_motorcycle(new_moto(Some(s1))).await.unwrap();

        let updated = fx
            .service
            .update_motorcycle(m1.id, changes(Some(s1)))
            .await
            .unwrap();

        assert_eq!(updated.spot_id, Some(s1));
        assert_eq!(updated.plate, "XYZ5678");
        assert!((updated.odometer_km - 1520.5).abs() < f64::EPSILON);
        assert!(fx.spot_state(s1).await.occupied);
    }

    #[tokio::test]
    async fn test_update_unknown_motorcycle_is_not_found() {
        let fx = Fixture::new();
        let err = fx.service.update_motorcycle(7, changes(None)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_frees_spot_and_detaches_tag() {
        let fx = Fixture::new();
        let zone = fx.zone().await;
        let s1 = fx.spot(zone, "ZC1VG1").await;
        let m1 = fx.service.create_motorcycle(new_moto(Some(s1))).await.unwrap();
        let t1 = fx.tag(m1.id).await;

        fx.service.delete_motorcycle(m1.id).await.unwrap();

        assert!(!fx.spot_state(s1).await.occupied);
        let mut tx = fx.store.begin().await.unwrap();
        let tag = tx.find_tag(t1).await.unwrap().unwrap();
        assert_eq!(tag.moto_id, None);
        drop(tx);
        let err = fx.service.get_motorcycle(m1.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        fx.assert_invariant().await;
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let fx = Fixture::new();
        let zone = fx.zone().await;
        let s1 = fx.spot(zone, "ZC1VG1").await;
        let m1 = fx.service.create_motorcycle(new_moto(None)).await.unwrap();
        fx.service.delete_motorcycle(m1.id).await.unwrap();

        let err = fx.service.delete_motorcycle(m1.id).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(!fx.spot_state(s1).await.occupied);
    }

    #[tokio::test]
    async fn test_release_frees_spot_and_detaches_motorcycle() {
        let fx = Fixture::new();
        let zone = fx.zone().await;
        let s1 = fx.spot(zone, "ZC1VG1").await;
        let m1 = fx.service.create_motorcycle(new_moto(Some(s1))).await.unwrap();

        let released = fx.service.release_spot(s1).await.unwrap();

        assert!(!released.occupied);
        assert!(!fx.spot_state(s1).await.occupied);
        let moto = fx.service.get_motorcycle(m1.id).await.unwrap();
        assert_eq!(moto.motorcycle.spot_id, None);
        assert_eq!(moto.spot, None);
        fx.assert_invariant().await;
    }

    #[tokio::test]
    async fn test_release_of_free_spot_is_rejected() {
        let fx = Fixture::new();
        let zone = fx.zone().await;
        let s1 = fx.spot(zone, "ZC1VG1").await;

        let err = fx.service.release_spot(s1).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = fx.service.release_spot(500).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        fx.assert_invariant().await;
    }

    #[tokio::test]
    async fn test_get_includes_spot_and_tag() {
        let fx = Fixture::new();
        let zone = fx.zone().await;
        let s1 = fx.spot(zone, "ZC1VG1").await;
        let m1 = fx.service.create_motorcycle(new_moto(Some(s1))).await.unwrap();
        let t1 = fx.tag(m1.id).await;

        let details = fx.service.get_motorcycle(m1.id).await.unwrap();

        assert_eq!(details.spot.map(|s| s.id), Some(s1));
        assert_eq!(details.tag.map(|t| t.id), Some(t1));
    }

    #[tokio::test]
    async fn test_list_by_type() {
        let fx = Fixture::new();
        fx.service.create_motorcycle(new_moto(None)).await.unwrap();
        let mut scooter = new_moto(None);
        scooter.moto_type = "Scooter".to_string();
        fx.service.create_motorcycle(scooter).await.unwrap();

        let found = fx.service.list_motorcycles_by_type("Scooter").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].moto_type, "Scooter");

        let page = fx.service.list_motorcycles(PageRequest::new(1, 1)).await.unwrap();
        assert_eq!(page.total_items, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_pages(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_on_same_spot() {
        for _ in 0..20 {
            let fx = Fixture::new();
            let zone = fx.zone().await;
            let s1 = fx.spot(zone, "ZC1VG1").await;
            let service = Arc::new(OccupancyService::new(fx.store.clone()));

            let a = tokio::spawn({
                let service = service.clone();
                async move { service.create_motorcycle(new_moto(Some(s1))).await }
            });
            let b = tokio::spawn({
                let service = service.clone();
                async move { service.create_motorcycle(new_moto(Some(s1))).await }
            });
            let (a, b) = tokio::join!(a, b);
            let results = [a.unwrap(), b.unwrap()];

            let ok = results.iter().filter(|r| r.is_ok()).count();
            let conflicts = results
                .iter()
                .filter(|r| matches!(r, Err(AppError::Conflict(_))))
                .count();
            assert_eq!((ok, conflicts), (1, 1));
            assert_eq!(fx.motorcycle_count().await, 1);
            assert!(fx.spot_state(s1).await.occupied);
            fx.assert_invariant().await;
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_move_in_and_release() {
        for _ in 0..20 {
            let fx = Fixture::new();
            let zone = fx.zone().await;
            let s1 = fx.spot(zone, "ZC1VG1").await;
            let m1 = fx.service.create_motorcycle(new_moto(Some(s1))).await.unwrap();
            let m2 = fx.service.create_motorcycle(new_moto(None)).await.unwrap();
            let service = Arc::new(OccupancyService::new(fx.store.clone()));

            let release = tokio::spawn({
                let service = service.clone();
                async move { service.release_spot(s1).await }
            });
            let move_in = tokio::spawn({
                let service = service.clone();
                async move { service.update_motorcycle(m2.id, changes(Some(s1))).await }
            });
            let (release, move_in) = tokio::join!(release, move_in);

            // la liberación siempre procede; la entrada depende del orden
            assert!(release.unwrap().is_ok());
            let after = fx.service.get_motorcycle(m1.id).await.unwrap().motorcycle;
            assert_eq!(after.spot_id, None);
            match move_in.unwrap() {
                Ok(moved) => {
                    assert_eq!(moved.spot_id, Some(s1));
                    assert!(fx.spot_state(s1).await.occupied);
                }
                Err(AppError::Conflict(_)) => {
                    assert!(!fx.spot_state(s1).await.occupied);
                }
                Err(other) => panic!("unexpected error: {other}"),
            }
            fx.assert_invariant().await;
        }
    }
}
