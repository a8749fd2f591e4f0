use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{error, warn};

use crate::audit::AuditTrail;
use crate::checkout::{CheckoutStore, PlacedOrder, RentalOrderDraft};
use crate::ids::{IdAllocator, IdKind};
use crate::{
    Executor, PostgresUnitOfWork, RentalResult, UnitOfWork, UnitOfWorkSession,
};

use super::{CatalogRepository, RentalOrderRepository, TrackingRepository};

/// Postgres-backed checkout storage.
///
/// Each `place_order` call is one unit of work: the order, its tracking
/// record and its lines are committed together or rolled back together.
#[derive(Clone)]
pub struct PgCheckoutStore {
    uow: PostgresUnitOfWork,
}

impl PgCheckoutStore {
    pub fn new(uow: PostgresUnitOfWork) -> Self {
        Self { uow }
    }

    async fn write_order(
        executor: &Executor,
        draft: &RentalOrderDraft,
        audit: &AuditTrail,
    ) -> RentalResult<PlacedOrder> {
        let orders = RentalOrderRepository::new(executor.clone());
        let tracking_repo = TrackingRepository::new(executor.clone());

        let rental_order_id = IdAllocator::allocate(executor, IdKind::RentalOrder).await?;
        let order = draft.to_order(&rental_order_id);
        orders.create(&order).await?;

        let tracking_id = IdAllocator::allocate(executor, IdKind::Tracking).await?;
        let tracking = draft.initial_tracking(&tracking_id, &rental_order_id);
        tracking_repo.create(&tracking).await?;

        let lines = draft.order_lines(&rental_order_id);
        orders.create_lines(&lines).await?;

        audit.record(format!(
            "order {} placed by {}: {} copies, total {}",
            order.rental_order_id, order.customer_login, order.total_copies, order.total_price
        ));
        audit.record(format!(
            "tracking {} opened for {}",
            tracking.tracking_id, order.rental_order_id
        ));

        Ok(PlacedOrder {
            order,
            tracking,
            lines,
        })
    }
}

#[async_trait]
impl CheckoutStore for PgCheckoutStore {
    async fn game_exists(&self, game_id: &str) -> RentalResult<bool> {
        let session = self.uow.begin().await?;
        let exists = CatalogRepository::new(session.executor().clone())
            .exists(game_id)
            .await?;
        session.commit().await?;
        Ok(exists)
    }

    async fn prices(&self, game_ids: &[String]) -> RentalResult<HashMap<String, Decimal>> {
        let session = self.uow.begin().await?;
        let prices = CatalogRepository::new(session.executor().clone())
            .prices(game_ids)
            .await?;
        session.commit().await?;
        Ok(prices)
    }

    async fn place_order(&self, draft: RentalOrderDraft) -> RentalResult<PlacedOrder> {
        let session = self.uow.begin().await?;
        let audit = AuditTrail::new();
        session.register_transaction_aware(audit.clone());

        match Self::write_order(session.executor(), &draft, &audit).await {
            Ok(placed) => {
                session.commit().await?;
                Ok(placed)
            }
            Err(e) => {
                error!(customer = %draft.customer_login, "checkout failed: {}", e);
                if let Err(rollback) = session.rollback().await {
                    warn!("rollback after failed checkout also failed: {}", rollback);
                }
                Err(e)
            }
        }
    }
}
