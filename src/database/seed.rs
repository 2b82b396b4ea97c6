//! Datos de demostración
//!
//! Se cargan sólo si la tabla de motos está vacía. Pasan por los servicios
//! para que la ocupación de las vagas quede consistente.

use std::sync::Arc;

use tracing::info;

use crate::models::{NewMotorcycle, SpotData, ZoneData};
use crate::repositories::Store;
use crate::services::{DirectoryService, OccupancyService};
use crate::utils::errors::AppResult;

const DEMO_MOTORCYCLES: [(&str, &str, &str); 5] = [
    ("Esportiva", "ABC1234", "9C2JC4110JR000001"),
    ("Custom", "XYZ5678", "9C2JC4110JR000002"),
    ("Naked", "LMN9012", "9C2JC4110JR000003"),
    ("Trail", "DEF3456", "9C2JC4110JR000004"),
    ("Scooter", "GHI7890", "9C2JC4110JR000005"),
];

/// Devuelve `true` si sembró datos
pub async fn seed_demo_data(store: Arc<dyn Store>) -> AppResult<bool> {
    {
        let mut tx = store.begin().await?;
        if tx.count_motorcycles().await? > 0 {
            return Ok(false);
        }
    }

    let directory = DirectoryService::new(store.clone());
    let occupancy = OccupancyService::new(store);

    let common = directory
        .create_zone(ZoneData {
            name: "ZC1".to_string(),
            zone_type: "Comum".to_string(),
        })
        .await?;
    let electric = directory
        .create_zone(ZoneData {
            name: "ZE".to_string(),
            zone_type: "Elétrica".to_string(),
        })
        .await?;

    let mut spot_ids = Vec::new();
    for (zone, prefix, count) in [(&common, "ZC1VG", 3), (&electric, "ZEVG", 2)] {
        for n in 1..=count {
            let spot = directory
                .create_spot(SpotData {
                    code: format!("{}{}", prefix, n),
                    zone_id: zone.id,
                })
                .await?;
            spot_ids.push(spot.id);
        }
    }

    // las dos primeras motos quedan estacionadas
    for (i, (moto_type, plate, chassis)) in DEMO_MOTORCYCLES.iter().enumerate() {
        occupancy
            .create_motorcycle(NewMotorcycle {
                moto_type: moto_type.to_string(),
                plate: plate.to_string(),
                chassis_number: chassis.to_string(),
                odometer_km: 0.0,
                spot_id: if i < 2 { spot_ids.get(i).copied() } else { None },
            })
            .await?;
    }

    info!(
        "🌱 Datos demo: 2 zonas, {} vagas, {} motos",
        spot_ids.len(),
        DEMO_MOTORCYCLES.len()
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;

    #[tokio::test]
    async fn test_seed_runs_once() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());

        assert!(seed_demo_data(store.clone()).await.unwrap());
        assert!(!seed_demo_data(store.clone()).await.unwrap());

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.count_motorcycles().await.unwrap(), 5);
        assert_eq!(tx.count_zones().await.unwrap(), 2);

        let spots = tx.list_spots(0, 10).await.unwrap();
        assert_eq!(spots.len(), 5);
        assert_eq!(spots.iter().filter(|s| s.occupied).count(), 2);
        for spot in spots.iter().filter(|s| s.occupied) {
            assert!(tx.find_motorcycle_by_spot(spot.id).await.unwrap().is_some());
        }
    }
}
