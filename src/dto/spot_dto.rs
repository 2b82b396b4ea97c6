use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Motorcycle, Spot, SpotData, Zone, ZoneData};
use crate::services::{SpotDetails, ZoneDetails};
use crate::utils::validation::validate_not_blank;

// Request de vaga. No acepta `occupied`: la ocupación no es editable.
#[derive(Debug, Deserialize, Validate)]
pub struct SpotRequest {
    pub id: Option<i32>,
    #[validate(custom = "validate_not_blank", length(max = 20))]
    pub code: String,
    #[validate(range(min = 1))]
    pub zone_id: i32,
}

impl SpotRequest {
    pub fn into_data(self) -> SpotData {
        SpotData {
            code: self.code.trim().to_string(),
            zone_id: self.zone_id,
        }
    }
}

// Request de zona
#[derive(Debug, Deserialize, Validate)]
pub struct ZoneRequest {
    pub id: Option<i32>,
    #[validate(custom = "validate_not_blank", length(max = 50))]
    pub name: String,
    #[validate(custom = "validate_not_blank", length(max = 50))]
    pub zone_type: String,
}

impl ZoneRequest {
    pub fn into_data(self) -> ZoneData {
        ZoneData {
            name: self.name.trim().to_string(),
            zone_type: self.zone_type.trim().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ZoneSummary {
    pub id: i32,
    pub name: String,
    pub zone_type: String,
}

impl From<Zone> for ZoneSummary {
    fn from(zone: Zone) -> Self {
        Self {
            id: zone.id,
            name: zone.name,
            zone_type: zone.zone_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MotorcycleSummary {
    pub id: i32,
    pub moto_type: String,
    pub plate: String,
}

impl From<Motorcycle> for MotorcycleSummary {
    fn from(moto: Motorcycle) -> Self {
        Self {
            id: moto.id,
            moto_type: moto.moto_type,
            plate: moto.plate,
        }
    }
}

// Response de vaga con su zona y su ocupante
#[derive(Debug, Serialize)]
pub struct SpotResponse {
    pub id: i32,
    pub code: String,
    pub occupied: bool,
    pub zone_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<ZoneSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motorcycle: Option<MotorcycleSummary>,
}

impl From<Spot> for SpotResponse {
    fn from(spot: Spot) -> Self {
        Self {
            id: spot.id,
            code: spot.code,
            occupied: spot.occupied,
            zone_id: spot.zone_id,
            zone: None,
            motorcycle: None,
        }
    }
}

impl From<SpotDetails> for SpotResponse {
    fn from(details: SpotDetails) -> Self {
        let mut response = Self::from(details.spot);
        response.zone = details.zone.map(ZoneSummary::from);
        response.motorcycle = details.motorcycle.map(MotorcycleSummary::from);
        response
    }
}

// Response de zona; `spots` sólo en el detalle
#[derive(Debug, Serialize)]
pub struct ZoneResponse {
    pub id: i32,
    pub name: String,
    pub zone_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spots: Option<Vec<SpotResponse>>,
}

impl From<Zone> for ZoneResponse {
    fn from(zone: Zone) -> Self {
        Self {
            id: zone.id,
            name: zone.name,
            zone_type: zone.zone_type,
            spots: None,
        }
    }
}

impl From<ZoneDetails> for ZoneResponse {
    fn from(details: ZoneDetails) -> Self {
        let mut response = Self::from(details.zone);
        response.spots = Some(details.spots.into_iter().map(SpotResponse::from).collect());
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spot_request_validation() {
        let ok = SpotRequest {
            id: None,
            code: "ZC1VG1".to_string(),
            zone_id: 1,
        };
        assert!(ok.validate().is_ok());

        let bad = SpotRequest {
            id: None,
            code: " ".to_string(),
            zone_id: 0,
        };
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("code"));
        assert!(errors.field_errors().contains_key("zone_id"));
    }

    #[test]
    fn test_occupied_is_ignored_on_input() {
        let req: SpotRequest =
            serde_json::from_str(r#"{"code":"ZC1VG2","zone_id":3,"occupied":true}"#).unwrap();
        let data = req.into_data();
        assert_eq!(data.code, "ZC1VG2");
        assert_eq!(data.zone_id, 3);
    }
}
