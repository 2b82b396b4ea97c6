//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL.

pub mod motorcycle;
pub mod spot;
pub mod tag;
pub mod user;
pub mod zone;

pub use motorcycle::{Motorcycle, MotorcycleChanges, NewMotorcycle};
pub use spot::{Spot, SpotData};
pub use tag::{Tag, TagData};
pub use user::{User, UserCategory, UserData};
pub use zone::{Zone, ZoneData};
