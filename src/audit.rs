use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{RentalResult, TransactionAware};

/// Buffers store events until the unit of work that produced them ends.
///
/// Events are only logged once the transaction commits, so the log never
/// claims an order or catalog change that was rolled back.
#[derive(Default)]
pub struct AuditTrail {
    pending: Mutex<Vec<String>>,
    committed: Mutex<Vec<String>>,
}

impl AuditTrail {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn record(&self, event: impl Into<String>) {
        self.pending.lock().push(event.into());
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    /// Events whose transaction has committed, oldest first.
    pub fn committed(&self) -> Vec<String> {
        self.committed.lock().clone()
    }
}

#[async_trait]
impl TransactionAware for AuditTrail {
    async fn on_commit(&self) -> RentalResult<()> {
        let events = std::mem::take(&mut *self.pending.lock());
        for event in &events {
            info!(target: "game_rental::audit", "{}", event);
        }
        self.committed.lock().extend(events);
        Ok(())
    }

    async fn on_rollback(&self) -> RentalResult<()> {
        let discarded = std::mem::take(&mut *self.pending.lock());
        if !discarded.is_empty() {
            warn!(
                target: "game_rental::audit",
                "discarding {} event(s) from rolled back transaction",
                discarded.len()
            );
        }
        Ok(())
    }
}
