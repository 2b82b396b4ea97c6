//! Módulo de base de datos
//!
//! Conexión al almacenamiento y datos de demostración.

pub mod connection;
pub mod seed;

pub use connection::DatabaseConnection;
pub use seed::seed_demo_data;
