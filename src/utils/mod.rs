//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación
//! y paginación.

pub mod errors;
pub mod pagination;
pub mod validation;
