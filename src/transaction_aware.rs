use async_trait::async_trait;

use crate::RentalResult;

/// Observer of a unit of work's outcome.
///
/// Registered on a session, it hears about the transaction only after the
/// database has accepted the commit or finished the rollback.
#[async_trait]
pub trait TransactionAware: Send + Sync {
    async fn on_commit(&self) -> RentalResult<()>;

    async fn on_rollback(&self) -> RentalResult<()>;
}
