//! Modelo de Zone

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Zona del pátio - agrupa vagas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Zone {
    pub id: i32,
    pub name: String,
    pub zone_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneData {
    pub name: String,
    pub zone_type: String,
}
