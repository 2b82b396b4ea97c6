//! Implementación en memoria del gateway de persistencia
//!
//! Un único escritor a la vez: `begin()` toma el mutex del estado y trabaja
//! sobre una copia; `commit()` reemplaza el estado publicado por la copia.
//! Si la transacción se suelta sin confirmar, la copia se descarta.
//! Emula las restricciones de integridad del schema PostgreSQL que el
//! motor de ocupación considera parte del contrato.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{
    MotorcycleRepository, SpotRepository, Store, TagRepository, Transaction, UserRepository,
    ZoneRepository,
};
use crate::models::{
    Motorcycle, NewMotorcycle, Spot, SpotData, Tag, TagData, User, UserCategory, UserData, Zone,
    ZoneData,
};
use crate::utils::errors::{AppError, AppResult};

/// Contadores de identidad por tabla, equivalentes a las secuencias SERIAL
#[derive(Debug, Clone, Default)]
struct Sequences {
    motorcycles: i32,
    spots: i32,
    zones: i32,
    tags: i32,
    users: i32,
    categories: i32,
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    motorcycles: BTreeMap<i32, Motorcycle>,
    spots: BTreeMap<i32, Spot>,
    zones: BTreeMap<i32, Zone>,
    tags: BTreeMap<i32, Tag>,
    users: BTreeMap<i32, User>,
    categories: BTreeMap<i32, UserCategory>,
    sequences: Sequences,
}

fn page<T: Clone>(items: &BTreeMap<i32, T>, offset: i64, limit: i64) -> Vec<T> {
    let offset = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
    let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
    items.values().skip(offset).take(limit).cloned().collect()
}

fn count<T>(items: &BTreeMap<i32, T>) -> i64 {
    i64::try_from(items.len()).unwrap_or(i64::MAX)
}

impl MemoryState {
    fn check_motorcycle_refs(&self, id: Option<i32>, spot_id: Option<i32>) -> AppResult<()> {
        let Some(spot_id) = spot_id else {
            return Ok(());
        };
        if !self.spots.contains_key(&spot_id) {
            return Err(AppError::InvalidReference(format!(
                "spot {} does not exist",
                spot_id
            )));
        }
        let taken = self
            .motorcycles
            .values()
            .any(|m| m.spot_id == Some(spot_id) && Some(m.id) != id);
        if taken {
            return Err(AppError::Conflict(format!(
                "spot {} is already assigned to another motorcycle",
                spot_id
            )));
        }
        Ok(())
    }

    fn check_tag_refs(&self, id: Option<i32>, moto_id: Option<i32>) -> AppResult<()> {
        let Some(moto_id) = moto_id else {
            return Ok(());
        };
        if !self.motorcycles.contains_key(&moto_id) {
            return Err(AppError::InvalidReference(format!(
                "motorcycle {} does not exist",
                moto_id
            )));
        }
        let taken = self
            .tags
            .values()
            .any(|t| t.moto_id == Some(moto_id) && Some(t.id) != id);
        if taken {
            return Err(AppError::Conflict(format!(
                "motorcycle {} already has a tag",
                moto_id
            )));
        }
        Ok(())
    }

    fn check_user_refs(&self, id: Option<i32>, data: &UserData) -> AppResult<()> {
        if !self.categories.contains_key(&data.category_id) {
            return Err(AppError::InvalidReference(format!(
                "category {} does not exist",
                data.category_id
            )));
        }
        let duplicated = self
            .users
            .values()
            .any(|u| Some(u.id) != id && (u.email == data.email || u.cpf == data.cpf));
        if duplicated {
            return Err(AppError::Conflict("email or cpf already registered".to_string()));
        }
        Ok(())
    }
}

/// Store en memoria, usado por los tests y por `DATABASE_URL=memory://`
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

pub struct MemoryTransaction {
    published: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn Transaction>> {
        let published = self.state.clone().lock_owned().await;
        let working = published.clone();
        Ok(Box::new(MemoryTransaction { published, working }))
    }
}

#[async_trait]
impl Transaction for MemoryTransaction {
    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryTransaction {
            mut published,
            working,
        } = *self;
        *published = working;
        Ok(())
    }
}

#[async_trait]
impl MotorcycleRepository for MemoryTransaction {
    async fn find_motorcycle(&mut self, id: i32) -> AppResult<Option<Motorcycle>> {
        Ok(self.working.motorcycles.get(&id).cloned())
    }

    async fn find_motorcycle_for_update(&mut self, id: i32) -> AppResult<Option<Motorcycle>> {
        Ok(self.working.motorcycles.get(&id).cloned())
    }

    async fn find_motorcycle_by_spot(&mut self, spot_id: i32) -> AppResult<Option<Motorcycle>> {
        Ok(self
            .working
            .motorcycles
            .values()
            .find(|m| m.spot_id == Some(spot_id))
            .cloned())
    }

    async fn list_motorcycles(&mut self, offset: i64, limit: i64) -> AppResult<Vec<Motorcycle>> {
        Ok(page(&self.working.motorcycles, offset, limit))
    }

    async fn count_motorcycles(&mut self) -> AppResult<i64> {
        Ok(count(&self.working.motorcycles))
    }

    async fn list_motorcycles_by_type(&mut self, moto_type: &str) -> AppResult<Vec<Motorcycle>> {
        Ok(self
            .working
            .motorcycles
            .values()
            .filter(|m| m.moto_type == moto_type)
            .cloned()
            .collect())
    }

    async fn insert_motorcycle(&mut self, moto: &NewMotorcycle) -> AppResult<Motorcycle> {
        self.working.check_motorcycle_refs(None, moto.spot_id)?;
        let id = next_id(&mut self.working.sequences.motorcycles);
        let created = Motorcycle::from_new(id, moto);
        self.working.motorcycles.insert(id, created.clone());
        Ok(created)
    }

    async fn update_motorcycle(&mut self, moto: &Motorcycle) -> AppResult<()> {
        self.working.check_motorcycle_refs(Some(moto.id), moto.spot_id)?;
        if let Some(existing) = self.working.motorcycles.get_mut(&moto.id) {
            *existing = moto.clone();
        }
        Ok(())
    }

    async fn delete_motorcycle(&mut self, id: i32) -> AppResult<bool> {
        let removed = self.working.motorcycles.remove(&id).is_some();
        // ON DELETE SET NULL
        for tag in self.working.tags.values_mut() {
            if tag.moto_id == Some(id) {
                tag.moto_id = None;
            }
        }
        Ok(removed)
    }
}

#[async_trait]
impl SpotRepository for MemoryTransaction {
    async fn find_spot(&mut self, id: i32) -> AppResult<Option<Spot>> {
        Ok(self.working.spots.get(&id).cloned())
    }

    async fn lock_spot(&mut self, id: i32) -> AppResult<Option<Spot>> {
        Ok(self.working.spots.get(&id).cloned())
    }

    async fn list_spots(&mut self, offset: i64, limit: i64) -> AppResult<Vec<Spot>> {
        Ok(page(&self.working.spots, offset, limit))
    }

    async fn count_spots(&mut self) -> AppResult<i64> {
        Ok(count(&self.working.spots))
    }

    async fn list_spots_by_zone(&mut self, zone_id: i32) -> AppResult<Vec<Spot>> {
        Ok(self
            .working
            .spots
            .values()
            .filter(|s| s.zone_id == zone_id)
            .cloned()
            .collect())
    }

    async fn insert_spot(&mut self, data: &SpotData) -> AppResult<Spot> {
        if !self.working.zones.contains_key(&data.zone_id) {
            return Err(AppError::InvalidReference(format!(
                "zone {} does not exist",
                data.zone_id
            )));
        }
        let id = next_id(&mut self.working.sequences.spots);
        let spot = Spot {
            id,
            code: data.code.clone(),
            occupied: false,
            zone_id: data.zone_id,
        };
        self.working.spots.insert(id, spot.clone());
        Ok(spot)
    }

    async fn update_spot_data(&mut self, id: i32, data: &SpotData) -> AppResult<()> {
        if !self.working.zones.contains_key(&data.zone_id) {
            return Err(AppError::InvalidReference(format!(
                "zone {} does not exist",
                data.zone_id
            )));
        }
        if let Some(spot) = self.working.spots.get_mut(&id) {
            spot.code = data.code.clone();
            spot.zone_id = data.zone_id;
        }
        Ok(())
    }

    async fn set_spot_occupied(&mut self, id: i32, occupied: bool) -> AppResult<()> {
        if let Some(spot) = self.working.spots.get_mut(&id) {
            spot.occupied = occupied;
        }
        Ok(())
    }

    async fn delete_spot(&mut self, id: i32) -> AppResult<bool> {
        let removed = self.working.spots.remove(&id).is_some();
        // ON DELETE SET NULL
        for moto in self.working.motorcycles.values_mut() {
            if moto.spot_id == Some(id) {
                moto.spot_id = None;
            }
        }
        Ok(removed)
    }

    async fn delete_spots_by_zone(&mut self, zone_id: i32) -> AppResult<u64> {
        let ids: Vec<i32> = self
            .working
            .spots
            .values()
            .filter(|s| s.zone_id == zone_id)
            .map(|s| s.id)
            .collect();
        for id in &ids {
            self.delete_spot(*id).await?;
        }
        Ok(ids.len() as u64)
    }
}

#[async_trait]
impl ZoneRepository for MemoryTransaction {
    async fn find_zone(&mut self, id: i32) -> AppResult<Option<Zone>> {
        Ok(self.working.zones.get(&id).cloned())
    }

    async fn list_zones(&mut self, offset: i64, limit: i64) -> AppResult<Vec<Zone>> {
        Ok(page(&self.working.zones, offset, limit))
    }

    async fn count_zones(&mut self) -> AppResult<i64> {
        Ok(count(&self.working.zones))
    }

    async fn insert_zone(&mut self, data: &ZoneData) -> AppResult<Zone> {
        let id = next_id(&mut self.working.sequences.zones);
        let zone = Zone {
            id,
            name: data.name.clone(),
            zone_type: data.zone_type.clone(),
        };
        self.working.zones.insert(id, zone.clone());
        Ok(zone)
    }

    async fn update_zone(&mut self, id: i32, data: &ZoneData) -> AppResult<()> {
        if let Some(zone) = self.working.zones.get_mut(&id) {
            zone.name = data.name.clone();
            zone.zone_type = data.zone_type.clone();
        }
        Ok(())
    }

    async fn delete_zone(&mut self, id: i32) -> AppResult<bool> {
        // ON DELETE RESTRICT
        if self.working.spots.values().any(|s| s.zone_id == id) {
            return Err(AppError::InvalidReference(format!(
                "zone {} still has spots",
                id
            )));
        }
        Ok(self.working.zones.remove(&id).is_some())
    }
}

#[async_trait]
impl TagRepository for MemoryTransaction {
    async fn find_tag(&mut self, id: i32) -> AppResult<Option<Tag>> {
        Ok(self.working.tags.get(&id).cloned())
    }

    async fn find_tag_by_moto(&mut self, moto_id: i32) -> AppResult<Option<Tag>> {
        Ok(self
            .working
            .tags
            .values()
            .find(|t| t.moto_id == Some(moto_id))
            .cloned())
    }

    async fn list_tags(&mut self, offset: i64, limit: i64) -> AppResult<Vec<Tag>> {
        Ok(page(&self.working.tags, offset, limit))
    }

    async fn count_tags(&mut self) -> AppResult<i64> {
        Ok(count(&self.working.tags))
    }

    async fn insert_tag(&mut self, data: &TagData) -> AppResult<Tag> {
        self.working.check_tag_refs(None, data.moto_id)?;
        let id = next_id(&mut self.working.sequences.tags);
        let tag = Tag::from_data(id, data);
        self.working.tags.insert(id, tag.clone());
        Ok(tag)
    }

    async fn update_tag(&mut self, tag: &Tag) -> AppResult<()> {
        self.working.check_tag_refs(Some(tag.id), tag.moto_id)?;
        if let Some(existing) = self.working.tags.get_mut(&tag.id) {
            *existing = tag.clone();
        }
        Ok(())
    }

    async fn delete_tag(&mut self, id: i32) -> AppResult<bool> {
        Ok(self.working.tags.remove(&id).is_some())
    }
}

#[async_trait]
impl UserRepository for MemoryTransaction {
    async fn find_user(&mut self, id: i32) -> AppResult<Option<User>> {
        Ok(self.working.users.get(&id).cloned())
    }

    async fn find_user_by_first_name(&mut self, name: &str) -> AppResult<Option<User>> {
        Ok(self
            .working
            .users
            .values()
            .find(|u| u.first_name == name)
            .cloned())
    }

    async fn find_user_by_email(&mut self, email: &str) -> AppResult<Option<User>> {
        Ok(self.working.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_cpf(&mut self, cpf: &str) -> AppResult<Option<User>> {
        Ok(self.working.users.values().find(|u| u.cpf == cpf).cloned())
    }

    async fn list_users(&mut self, offset: i64, limit: i64) -> AppResult<Vec<User>> {
        Ok(page(&self.working.users, offset, limit))
    }

    async fn count_users(&mut self) -> AppResult<i64> {
        Ok(count(&self.working.users))
    }

    async fn count_users_in_category(&mut self, category_id: i32) -> AppResult<i64> {
        let total = self
            .working
            .users
            .values()
            .filter(|u| u.category_id == category_id)
            .count();
        Ok(i64::try_from(total).unwrap_or(i64::MAX))
    }

    async fn insert_user(&mut self, data: &UserData) -> AppResult<User> {
        self.working.check_user_refs(None, data)?;
        let id = next_id(&mut self.working.sequences.users);
        let user = User::from_data(id, data);
        self.working.users.insert(id, user.clone());
        Ok(user)
    }

    async fn update_user(&mut self, user: &User) -> AppResult<()> {
        let data = UserData {
            category_id: user.category_id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            birth_date: user.birth_date,
            cpf: user.cpf.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
        };
        self.working.check_user_refs(Some(user.id), &data)?;
        if let Some(existing) = self.working.users.get_mut(&user.id) {
            *existing = user.clone();
        }
        Ok(())
    }

    async fn delete_user(&mut self, id: i32) -> AppResult<bool> {
        Ok(self.working.users.remove(&id).is_some())
    }

    async fn find_category(&mut self, id: i32) -> AppResult<Option<UserCategory>> {
        Ok(self.working.categories.get(&id).cloned())
    }

    async fn find_category_by_name(&mut self, name: &str) -> AppResult<Option<UserCategory>> {
        Ok(self
            .working
            .categories
            .values()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn list_categories(&mut self) -> AppResult<Vec<UserCategory>> {
        Ok(self.working.categories.values().cloned().collect())
    }

    async fn insert_category(&mut self, name: &str) -> AppResult<UserCategory> {
        if self.working.categories.values().any(|c| c.name == name) {
            return Err(AppError::Conflict(format!("category '{}' already exists", name)));
        }
        let id = next_id(&mut self.working.sequences.categories);
        let category = UserCategory {
            id,
            name: name.to_string(),
        };
        self.working.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn delete_category(&mut self, id: i32) -> AppResult<bool> {
        if self.working.users.values().any(|u| u.category_id == id) {
            return Err(AppError::InvalidReference(format!(
                "category {} is still in use",
                id
            )));
        }
        Ok(self.working.categories.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone_data() -> ZoneData {
        ZoneData {
            name: "ZC1".to_string(),
            zone_type: "Combustão".to_string(),
        }
    }

    #[tokio::test]
    async fn test_uncommitted_changes_are_discarded() {
        let store = MemoryStore::new();
        {
            let mut tx = store.begin().await.unwrap();
            tx.insert_zone(&zone_data()).await.unwrap();
            // se suelta sin commit
        }
        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.count_zones().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_committed_changes_are_visible() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let zone = tx.insert_zone(&zone_data()).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.find_zone(zone.id).await.unwrap(), Some(zone));
    }

    #[tokio::test]
    async fn test_spot_cannot_be_assigned_twice() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let zone = tx.insert_zone(&zone_data()).await.unwrap();
        let spot = tx
            .insert_spot(&SpotData {
                code: "ZC1VG1".to_string(),
                zone_id: zone.id,
            })
            .await
            .unwrap();
        let moto = NewMotorcycle {
            moto_type: "Esportiva".to_string(),
            plate: "ABC1234".to_string(),
            chassis_number: "9C2JC4110JR000001".to_string(),
            odometer_km: 0.0,
            spot_id: Some(spot.id),
        };
        tx.insert_motorcycle(&moto).await.unwrap();
        let err = tx.insert_motorcycle(&moto).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
