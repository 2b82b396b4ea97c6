//! Implementación PostgreSQL del gateway de persistencia

use async_trait::async_trait;
use sqlx::{PgPool, Postgres};

use super::{Store, Transaction};
use crate::utils::errors::{AppError, AppResult};

/// Store respaldado por un pool de PostgreSQL
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Transacción abierta en PostgreSQL.
///
/// sqlx revierte la transacción automáticamente si se suelta sin `commit`.
pub struct PgTransaction {
    pub(crate) tx: sqlx::Transaction<'static, Postgres>,
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> AppResult<Box<dyn Transaction>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::from_db(e, "Error opening transaction"))?;
        Ok(Box::new(PgTransaction { tx }))
    }
}

#[async_trait]
impl Transaction for PgTransaction {
    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| AppError::from_db(e, "Error committing transaction"))
    }
}
