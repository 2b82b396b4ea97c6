//! Gateway de persistencia
//!
//! Cada comando abre una unidad de trabajo (`Transaction`) a través de un
//! `Store`. Todas las lecturas y escrituras del comando pasan por ella y se
//! publican juntas en `commit()`; soltar la transacción sin confirmar
//! descarta todos los cambios.

pub mod memory;
pub mod motorcycle_repository;
pub mod postgres;
pub mod spot_repository;
pub mod tag_repository;
pub mod user_repository;
pub mod zone_repository;

use async_trait::async_trait;

use crate::utils::errors::AppResult;

pub use memory::MemoryStore;
pub use motorcycle_repository::MotorcycleRepository;
pub use postgres::{PgStore, PgTransaction};
pub use spot_repository::SpotRepository;
pub use tag_repository::TagRepository;
pub use user_repository::UserRepository;
pub use zone_repository::ZoneRepository;

/// Unidad de trabajo sobre todas las colecciones de entidades
#[async_trait]
pub trait Transaction:
    MotorcycleRepository + SpotRepository + ZoneRepository + TagRepository + UserRepository + Send
{
    /// Publica todos los cambios de la unidad de trabajo de forma atómica
    async fn commit(self: Box<Self>) -> AppResult<()>;
}

/// Fábrica de transacciones
#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> AppResult<Box<dyn Transaction>>;
}
