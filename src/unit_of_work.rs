use async_trait::async_trait;
use parking_lot::RwLock;
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;
use tracing::debug;

use crate::{Executor, RentalError, RentalResult, TransactionAware};

/// Source of transactional sessions.
///
/// Every multi-statement operation of the store (checkout, catalog edits,
/// profile updates) runs inside one session so it either lands completely
/// or not at all.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    type Session: UnitOfWorkSession;

    /// Opens a session on a fresh transaction.
    async fn begin(&self) -> RentalResult<Self::Session>;
}

/// One open transaction plus the observers waiting on its outcome.
#[async_trait]
pub trait UnitOfWorkSession: Send + Sync {
    /// Handle repositories use to issue statements in this transaction.
    fn executor(&self) -> &Executor;

    fn register_transaction_aware(&self, observer: Arc<dyn TransactionAware>);

    /// Commits, then tells every observer.
    async fn commit(self) -> RentalResult<()>;

    /// Rolls back, then tells every observer.
    async fn rollback(self) -> RentalResult<()>;
}

/// Sessions backed by a shared `PgPool`.
#[derive(Clone)]
pub struct PostgresUnitOfWork {
    pool: Arc<PgPool>,
}

impl PostgresUnitOfWork {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    type Session = PostgresUnitOfWorkSession;

    async fn begin(&self) -> RentalResult<Self::Session> {
        let tx = self.pool.begin().await?;
        Ok(PostgresUnitOfWorkSession::new(tx))
    }
}

/// Postgres session.
///
/// A session dropped without `commit` is rolled back when its transaction
/// is returned to the pool.
pub struct PostgresUnitOfWorkSession {
    executor: Executor,
    observers: Arc<RwLock<Vec<Arc<dyn TransactionAware>>>>,
}

impl PostgresUnitOfWorkSession {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self {
            executor: Executor::new(tx),
            observers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    fn observers(&self) -> Vec<Arc<dyn TransactionAware>> {
        self.observers.read().clone()
    }
}

#[async_trait]
impl UnitOfWorkSession for PostgresUnitOfWorkSession {
    fn executor(&self) -> &Executor {
        &self.executor
    }

    fn register_transaction_aware(&self, observer: Arc<dyn TransactionAware>) {
        self.observers.write().push(observer);
    }

    async fn commit(self) -> RentalResult<()> {
        let tx = self.executor.take_transaction().await?;
        tx.commit()
            .await
            .map_err(|e| RentalError::CommitFailed(e.to_string()))?;
        debug!("transaction committed");

        for observer in self.observers().iter() {
            observer.on_commit().await?;
        }
        Ok(())
    }

    async fn rollback(self) -> RentalResult<()> {
        let tx = self.executor.take_transaction().await?;
        tx.rollback()
            .await
            .map_err(|e| RentalError::RollbackFailed(e.to_string()))?;
        debug!("transaction rolled back");

        for observer in self.observers().iter() {
            observer.on_rollback().await?;
        }
        Ok(())
    }
}
