//! Modelo de Spot ("vaga")

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Vaga de estacionamiento - mapea la tabla spots.
///
/// `occupied` nunca viene del cliente: lo calcula el motor de ocupación.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Spot {
    pub id: i32,
    pub code: String,
    pub occupied: bool,
    pub zone_id: i32,
}

/// Datos editables de una vaga (código y zona)
#[derive(Debug, Clone, PartialEq)]
pub struct SpotData {
    pub code: String,
    pub zone_id: i32,
}
