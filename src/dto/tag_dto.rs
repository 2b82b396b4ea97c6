use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Tag, TagData};
use crate::utils::validation::{normalize_reference, validate_not_blank};

// Request de tag RFID. `moto_id` ausente o `0` deja el tag sin moto.
#[derive(Debug, Deserialize, Validate)]
pub struct TagRequest {
    pub id: Option<i32>,
    pub moto_id: Option<i32>,
    #[validate(custom = "validate_not_blank", length(max = 50))]
    pub frequency_range: String,
    #[validate(custom = "validate_not_blank", length(max = 20))]
    pub band: String,
    #[validate(custom = "validate_not_blank", length(max = 100))]
    pub application: String,
}

impl TagRequest {
    pub fn into_data(self) -> TagData {
        TagData {
            moto_id: normalize_reference(self.moto_id),
            frequency_range: self.frequency_range,
            band: self.band,
            application: self.application,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TagResponse {
    pub id: i32,
    pub moto_id: Option<i32>,
    pub frequency_range: String,
    pub band: String,
    pub application: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            moto_id: tag.moto_id,
            frequency_range: tag.frequency_range,
            band: tag.band,
            application: tag.application,
        }
    }
}
