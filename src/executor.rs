use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use crate::{RentalError, RentalResult};

type SharedTransaction = Arc<Mutex<Option<Transaction<'static, Postgres>>>>;

/// Executor wraps the open transaction of one unit of work.
///
/// Every repository created for the same session holds a clone, so the
/// statements they issue all land in that single transaction.
#[derive(Clone, Debug)]
pub struct Executor {
    tx: SharedTransaction,
}

/// Exclusive access to the transaction for the duration of one statement.
pub struct ExecutorGuard<'a> {
    inner: MutexGuard<'a, Option<Transaction<'static, Postgres>>>,
}

impl ExecutorGuard<'_> {
    /// The live transaction, or `TransactionClosed` once it was committed
    /// or rolled back.
    pub fn transaction(&mut self) -> RentalResult<&mut Transaction<'static, Postgres>> {
        self.inner.as_mut().ok_or(RentalError::TransactionClosed)
    }
}

impl Executor {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self {
            tx: Arc::new(Mutex::new(Some(tx))),
        }
    }

    /// Locks the transaction for one statement.
    pub async fn lock(&self) -> ExecutorGuard<'_> {
        ExecutorGuard {
            inner: self.tx.lock().await,
        }
    }

    /// Removes the transaction so the session can commit or roll it back.
    /// Later statements through any clone fail with `TransactionClosed`.
    pub(crate) async fn take_transaction(&self) -> RentalResult<Transaction<'static, Postgres>> {
        self.tx
            .lock()
            .await
            .take()
            .ok_or(RentalError::TransactionClosed)
    }
}
