//! DTOs de la API HTTP
//!
//! Requests validados con `validator` y responses serializables. Los
//! resúmenes anidados van en una sola dirección (moto → vaga, vaga → moto)
//! para no formar ciclos.

pub mod motorcycle_dto;
pub mod paged_dto;
pub mod spot_dto;
pub mod tag_dto;
pub mod user_dto;
