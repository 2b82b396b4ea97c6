//! Controllers
//!
//! Validan el DTO de entrada, delegan en el servicio y devuelven DTOs de
//! salida. No conocen axum: las rutas deciden los códigos de estado.

pub mod motorcycle_controller;
pub mod spot_controller;
pub mod tag_controller;
pub mod user_controller;
pub mod zone_controller;

use crate::utils::errors::{AppError, AppResult};

/// Un PUT con `id` en el body debe coincidir con el de la ruta
pub(crate) fn ensure_matching_id(path_id: i32, body_id: Option<i32>) -> AppResult<()> {
    match body_id {
        Some(body_id) if body_id != path_id => Err(AppError::BadRequest(format!(
            "Body id {} does not match path id {}",
            body_id, path_id
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_matching_id() {
        assert!(ensure_matching_id(3, None).is_ok());
        assert!(ensure_matching_id(3, Some(3)).is_ok());
        assert!(matches!(
            ensure_matching_id(3, Some(4)),
            Err(AppError::BadRequest(_))
        ));
    }
}
