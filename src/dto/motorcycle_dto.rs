use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Motorcycle, MotorcycleChanges, NewMotorcycle, Spot, Tag};
use crate::services::MotorcycleDetails;
use crate::utils::validation::{normalize_reference, validate_not_blank, PLATE_REGEX};

// Request para crear o reemplazar una moto
#[derive(Debug, Deserialize, Validate)]
pub struct MotorcycleRequest {
    /// Sólo en PUT; si viene debe coincidir con el id de la ruta
    pub id: Option<i32>,
    #[validate(custom = "validate_not_blank", length(max = 50))]
    pub moto_type: String,
    #[validate(regex = "PLATE_REGEX")]
    pub plate: String,
    #[validate(length(min = 17, max = 17))]
    pub chassis_number: String,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub odometer_km: f64,
    /// `0` equivale a "sin vaga"
    pub spot_id: Option<i32>,
}

impl MotorcycleRequest {
    pub fn into_new(self) -> NewMotorcycle {
        NewMotorcycle {
            moto_type: self.moto_type.trim().to_string(),
            plate: self.plate,
            chassis_number: self.chassis_number,
            odometer_km: self.odometer_km,
            spot_id: normalize_reference(self.spot_id),
        }
    }

    pub fn into_changes(self) -> MotorcycleChanges {
        MotorcycleChanges {
            moto_type: self.moto_type.trim().to_string(),
            plate: self.plate,
            chassis_number: self.chassis_number,
            odometer_km: self.odometer_km,
            spot_id: normalize_reference(self.spot_id),
        }
    }
}

// Query de `GET /api/motorcycles/type?type=`
#[derive(Debug, Deserialize)]
pub struct MotorcycleTypeQuery {
    #[serde(rename = "type")]
    pub moto_type: String,
}

// Resumen de vaga embebido en la moto
#[derive(Debug, Serialize)]
pub struct SpotSummary {
    pub id: i32,
    pub code: String,
    pub occupied: bool,
    pub zone_id: i32,
}

impl From<Spot> for SpotSummary {
    fn from(spot: Spot) -> Self {
        Self {
            id: spot.id,
            code: spot.code,
            occupied: spot.occupied,
            zone_id: spot.zone_id,
        }
    }
}

// Resumen de tag embebido en la moto
#[derive(Debug, Serialize)]
pub struct TagSummary {
    pub id: i32,
    pub frequency_range: String,
    pub band: String,
    pub application: String,
}

impl From<Tag> for TagSummary {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            frequency_range: tag.frequency_range,
            band: tag.band,
            application: tag.application,
        }
    }
}

// Response de moto
#[derive(Debug, Serialize)]
pub struct MotorcycleResponse {
    pub id: i32,
    pub moto_type: String,
    pub plate: String,
    pub chassis_number: String,
    pub odometer_km: f64,
    pub spot_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spot: Option<SpotSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<TagSummary>,
}

impl From<Motorcycle> for MotorcycleResponse {
    fn from(moto: Motorcycle) -> Self {
        Self {
            id: moto.id,
            moto_type: moto.moto_type,
            plate: moto.plate,
            chassis_number: moto.chassis_number,
            odometer_km: moto.odometer_km,
            spot_id: moto.spot_id,
            spot: None,
            tag: None,
        }
    }
}

impl From<MotorcycleDetails> for MotorcycleResponse {
    fn from(details: MotorcycleDetails) -> Self {
        let mut response = Self::from(details.motorcycle);
        response.spot = details.spot.map(SpotSummary::from);
        response.tag = details.tag.map(TagSummary::from);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(plate: &str, spot_id: Option<i32>) -> MotorcycleRequest {
        MotorcycleRequest {
            id: None,
            moto_type: " Naked ".to_string(),
            plate: plate.to_string(),
            chassis_number: "9C2JC4110JR000001".to_string(),
            odometer_km: 1200.5,
            spot_id,
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request("ABC1D23", Some(1)).validate().is_ok());
    }

    #[test]
    fn test_invalid_plate_and_odometer() {
        let mut req = request("abc-1234", None);
        req.odometer_km = -1.0;
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("plate"));
        assert!(fields.contains_key("odometer_km"));
    }

    #[test]
    fn test_blank_type_is_rejected() {
        let mut req = request("ABC1234", None);
        req.moto_type = "  ".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_zero_spot_means_no_spot() {
        let new = request("ABC1234", Some(0)).into_new();
        assert_eq!(new.spot_id, None);
        assert_eq!(new.moto_type, "Naked");
    }
}
