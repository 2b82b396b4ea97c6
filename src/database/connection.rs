//! Conexión al almacenamiento
//!
//! Elige la implementación del `Store` según `DATABASE_URL`: PostgreSQL
//! (con migraciones embebidas) o memoria para `memory://`.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::config::database::DatabaseConfig;
use crate::config::environment::EnvironmentConfig;
use crate::repositories::{MemoryStore, PgStore, Store};

/// Conexión activa: el `Store` y, si aplica, el pool subyacente
pub struct DatabaseConnection {
    store: Arc<dyn Store>,
    pool: Option<PgPool>,
}

impl DatabaseConnection {
    /// Conectar según la configuración y aplicar migraciones
    pub async fn connect(config: &EnvironmentConfig) -> Result<Self> {
        if config.uses_memory_store() {
            info!("🧠 Usando almacenamiento en memoria");
            return Ok(Self {
                store: Arc::new(MemoryStore::new()),
                pool: None,
            });
        }

        let pool = DatabaseConfig::from_environment(config)
            .create_pool()
            .await
            .context("Error conectando a PostgreSQL")?;
        run_migrations(&pool).await?;
        info!("✅ PostgreSQL conectado y migrado");

        Ok(Self {
            store: Arc::new(PgStore::new(pool.clone())),
            pool: Some(pool),
        })
    }

    pub fn store(&self) -> Arc<dyn Store> {
        self.store.clone()
    }

    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    /// Cerrar el pool al apagar el servidor
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

/// Ejecutar las migraciones embebidas de `migrations/`
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Error ejecutando migraciones")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_connection_has_no_pool() {
        let connection = DatabaseConnection::connect(&EnvironmentConfig::for_tests())
            .await
            .unwrap();
        assert!(connection.pool().is_none());

        let mut tx = connection.store().begin().await.unwrap();
        assert_eq!(tx.count_motorcycles().await.unwrap(), 0);
    }
}
