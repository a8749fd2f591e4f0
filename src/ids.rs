//! Sequential identifiers of the form `<prefix><number>`.
//!
//! Allocation happens inside the caller's transaction and holds a
//! transaction-scoped advisory lock per identifier kind, so two concurrent
//! checkouts cannot compute the same next identifier.

use sqlx::Row;
use tracing::debug;

use crate::{Executor, RentalError, RentalResult};

/// Numeric suffix handed out when a table holds no identifiers yet.
pub const SEED: i64 = 1;

const GAME_ID_DIGITS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    RentalOrder,
    Tracking,
    Game,
}

impl IdKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            IdKind::RentalOrder => "gamerentalorder",
            IdKind::Tracking => "trackingid",
            IdKind::Game => "game",
        }
    }

    fn table(&self) -> &'static str {
        match self {
            IdKind::RentalOrder => "rental_order",
            IdKind::Tracking => "tracking_info",
            IdKind::Game => "catalog",
        }
    }

    fn column(&self) -> &'static str {
        match self {
            IdKind::RentalOrder => "rental_order_id",
            IdKind::Tracking => "tracking_id",
            IdKind::Game => "game_id",
        }
    }

    fn lock_key(&self) -> i64 {
        match self {
            IdKind::RentalOrder => 0x6772_0001,
            IdKind::Tracking => 0x6772_0002,
            IdKind::Game => 0x6772_0003,
        }
    }

    /// Numeric suffix of `id`, if it carries this kind's prefix followed
    /// only by digits.
    pub fn suffix(&self, id: &str) -> Option<i64> {
        let digits = id.strip_prefix(self.prefix())?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    pub fn format(&self, n: i64) -> RentalResult<String> {
        match self {
            IdKind::Game => {
                if n > 9999 {
                    return Err(RentalError::IdSpaceExhausted {
                        prefix: self.prefix(),
                    });
                }
                Ok(format!("{}{:0width$}", self.prefix(), n, width = GAME_ID_DIGITS))
            }
            _ => Ok(format!("{}{}", self.prefix(), n)),
        }
    }

    /// Identifier following `max`, or the seed identifier for an empty table.
    pub fn next_after(&self, max: Option<i64>) -> RentalResult<String> {
        let next = match max {
            Some(n) => n.checked_add(1).ok_or(RentalError::IdSpaceExhausted {
                prefix: self.prefix(),
            })?,
            None => SEED,
        };
        self.format(next)
    }
}

/// Allocates identifiers within an open unit of work.
pub struct IdAllocator;

impl IdAllocator {
    pub async fn allocate(executor: &Executor, kind: IdKind) -> RentalResult<String> {
        let mut guard = executor.lock().await;
        let tx = guard.transaction()?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(kind.lock_key())
            .execute(&mut **tx)
            .await?;

        // Numeric maximum: `gamerentalorder10` must sort after `gamerentalorder9`.
        let sql = format!(
            "SELECT MAX(CAST(SUBSTRING({col} FROM $1::int) AS BIGINT)) AS max_suffix \
             FROM {table} WHERE {col} LIKE $2 AND SUBSTRING({col} FROM $1::int) ~ '^[0-9]+$'",
            col = kind.column(),
            table = kind.table(),
        );
        let row = sqlx::query(&sql)
            .bind(kind.prefix().len() as i32 + 1)
            .bind(format!("{}%", kind.prefix()))
            .fetch_one(&mut **tx)
            .await?;
        let max: Option<i64> = row.get("max_suffix");

        let id = kind.next_after(max)?;
        debug!(%id, "allocated identifier");
        Ok(id)
    }
}
