//! Modelo de Tag RFID
//!
//! `moto_id` es opcional de verdad: el antiguo centinela `0` se normaliza
//! a `None` en la frontera HTTP.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Tag RFID - mapea la tabla rfid_tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: i32,
    pub moto_id: Option<i32>,
    pub frequency_range: String,
    pub band: String,
    pub application: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagData {
    pub moto_id: Option<i32>,
    pub frequency_range: String,
    pub band: String,
    pub application: String,
}

impl Tag {
    pub fn from_data(id: i32, data: &TagData) -> Self {
        Self {
            id,
            moto_id: data.moto_id,
            frequency_range: data.frequency_range.clone(),
            band: data.band.clone(),
            application: data.application.clone(),
        }
    }
}
