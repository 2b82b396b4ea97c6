//! Modelo de Motorcycle
//!
//! Mapea la tabla `motorcycles`. La vaga ocupada se referencia sólo por id;
//! la relación inversa (vaga → moto) se resuelve por consulta, nunca por
//! propiedad.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Motorcycle principal - mapea exactamente a la tabla motorcycles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Motorcycle {
    pub id: i32,
    pub moto_type: String,
    pub plate: String,
    pub chassis_number: String,
    pub odometer_km: f64,
    pub spot_id: Option<i32>,
}

/// Datos de una moto todavía no persistida
#[derive(Debug, Clone, PartialEq)]
pub struct NewMotorcycle {
    pub moto_type: String,
    pub plate: String,
    pub chassis_number: String,
    pub odometer_km: f64,
    pub spot_id: Option<i32>,
}

/// Reemplazo completo de los datos de una moto existente.
///
/// `spot_id` forma parte del reemplazo: `None` significa "sin vaga".
#[derive(Debug, Clone, PartialEq)]
pub struct MotorcycleChanges {
    pub moto_type: String,
    pub plate: String,
    pub chassis_number: String,
    pub odometer_km: f64,
    pub spot_id: Option<i32>,
}

impl Motorcycle {
    /// Aplica los campos que no afectan la ocupación de vagas
    pub fn apply_details(&mut self, changes: &MotorcycleChanges) {
        self.moto_type = changes.moto_type.clone();
        self.plate = changes.plate.clone();
        self.chassis_number = changes.chassis_number.clone();
        self.odometer_km = changes.odometer_km;
    }

    /// Materializa una moto nueva con el id asignado por el almacenamiento
    pub fn from_new(id: i32, new: &NewMotorcycle) -> Self {
        Self {
            id,
            moto_type: new.moto_type.clone(),
            plate: new.plate.clone(),
            chassis_number: new.chassis_number.clone(),
            odometer_km: new.odometer_km,
            spot_id: new.spot_id,
        }
    }
}
