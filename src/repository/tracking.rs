use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::model::{TrackingInfo, TrackingUpdate};
use crate::{Executor, RentalError, RentalResult};

const TRACKING_COLUMNS: &str =
    "tracking_id, rental_order_id, status, current_location, courier, last_updated_at";

fn tracking_from_row(row: &PgRow) -> TrackingInfo {
    TrackingInfo {
        tracking_id: row.get("tracking_id"),
        rental_order_id: row.get("rental_order_id"),
        status: row.get("status"),
        current_location: row.get("current_location"),
        courier: row.get("courier"),
        last_updated_at: row.get("last_updated_at"),
    }
}

pub struct TrackingRepository {
    executor: Executor,
}

impl TrackingRepository {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    pub async fn create(&self, tracking: &TrackingInfo) -> RentalResult<()> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        sqlx::query(&format!(
            "INSERT INTO tracking_info ({TRACKING_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6)"
        ))
        .bind(&tracking.tracking_id)
        .bind(&tracking.rental_order_id)
        .bind(&tracking.status)
        .bind(&tracking.current_location)
        .bind(&tracking.courier)
        .bind(tracking.last_updated_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn find(&self, tracking_id: &str) -> RentalResult<Option<TrackingInfo>> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        let row = sqlx::query(&format!(
            "SELECT {TRACKING_COLUMNS} FROM tracking_info WHERE tracking_id = $1"
        ))
        .bind(tracking_id)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(row.as_ref().map(tracking_from_row))
    }

    pub async fn find_for_order(&self, rental_order_id: &str) -> RentalResult<Option<TrackingInfo>> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        let row = sqlx::query(&format!(
            "SELECT {TRACKING_COLUMNS} FROM tracking_info WHERE rental_order_id = $1"
        ))
        .bind(rental_order_id)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(row.as_ref().map(tracking_from_row))
    }

    /// Applies the set fields of `update` and stamps `updated_at`.
    pub async fn update(
        &self,
        tracking_id: &str,
        update: &TrackingUpdate,
        updated_at: DateTime<Utc>,
    ) -> RentalResult<TrackingInfo> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        let row = sqlx::query(&format!(
            "UPDATE tracking_info SET status = COALESCE($1, status), \
             current_location = COALESCE($2, current_location), \
             courier = COALESCE($3, courier), last_updated_at = $4 \
             WHERE tracking_id = $5 RETURNING {TRACKING_COLUMNS}"
        ))
        .bind(&update.status)
        .bind(&update.current_location)
        .bind(&update.courier)
        .bind(updated_at)
        .bind(tracking_id)
        .fetch_optional(&mut **tx)
        .await?;
        row.as_ref()
            .map(tracking_from_row)
            .ok_or_else(|| RentalError::not_found("Tracking record", tracking_id))
    }

    pub async fn count(&self) -> RentalResult<i64> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        let row = sqlx::query("SELECT COUNT(*) AS count FROM tracking_info")
            .fetch_one(&mut **tx)
            .await?;
        Ok(row.get("count"))
    }
}
