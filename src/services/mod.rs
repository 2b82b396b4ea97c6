//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación. Cada servicio
//! abre su propia transacción sobre el `Store` y la confirma al final; si
//! devuelve un error antes, el drop de la transacción hace rollback.

pub mod directory_service;
pub mod occupancy_service;
pub mod tag_service;
pub mod user_service;

pub use directory_service::{DirectoryService, SpotDetails, ZoneDetails};
pub use occupancy_service::{MotorcycleDetails, OccupancyService};
pub use tag_service::TagService;
pub use user_service::{UserInput, UserService};
