use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::model::{OrderLine, RentalOrder};
use crate::{Executor, RentalResult};

const ORDER_COLUMNS: &str =
    "rental_order_id, customer_login, total_copies, total_price, ordered_at, due_date";

fn order_from_row(row: &PgRow) -> RentalOrder {
    RentalOrder {
        rental_order_id: row.get("rental_order_id"),
        customer_login: row.get("customer_login"),
        total_copies: row.get("total_copies"),
        total_price: row.get("total_price"),
        ordered_at: row.get("ordered_at"),
        due_date: row.get("due_date"),
    }
}

/// Rental orders and their lines (`games_in_order`).
pub struct RentalOrderRepository {
    executor: Executor,
}

impl RentalOrderRepository {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    pub async fn create(&self, order: &RentalOrder) -> RentalResult<()> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        sqlx::query(&format!(
            "INSERT INTO rental_order ({ORDER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6)"
        ))
        .bind(&order.rental_order_id)
        .bind(&order.customer_login)
        .bind(order.total_copies)
        .bind(order.total_price)
        .bind(order.ordered_at)
        .bind(order.due_date)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn create_lines(&self, lines: &[OrderLine]) -> RentalResult<()> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        for line in lines {
            sqlx::query(
                "INSERT INTO games_in_order (rental_order_id, game_id, quantity) VALUES ($1, $2, $3)",
            )
            .bind(&line.rental_order_id)
            .bind(&line.game_id)
            .bind(line.quantity)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    pub async fn find(&self, rental_order_id: &str) -> RentalResult<Option<RentalOrder>> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        let row = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM rental_order WHERE rental_order_id = $1"
        ))
        .bind(rental_order_id)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(row.as_ref().map(order_from_row))
    }

    pub async fn lines(&self, rental_order_id: &str) -> RentalResult<Vec<OrderLine>> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        let rows = sqlx::query(
            "SELECT rental_order_id, game_id, quantity FROM games_in_order \
             WHERE rental_order_id = $1 ORDER BY game_id",
        )
        .bind(rental_order_id)
        .fetch_all(&mut **tx)
        .await?;
        Ok(rows
            .iter()
            .map(|row| OrderLine {
                rental_order_id: row.get("rental_order_id"),
                game_id: row.get("game_id"),
                quantity: row.get("quantity"),
            })
            .collect())
    }

    /// Orders of one customer, newest first. `limit` of `None` returns all.
    pub async fn list_for_customer(
        &self,
        customer_login: &str,
        limit: Option<i64>,
    ) -> RentalResult<Vec<RentalOrder>> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM rental_order WHERE customer_login = $1 \
             ORDER BY ordered_at DESC, rental_order_id DESC LIMIT $2"
        ))
        .bind(customer_login)
        .bind(limit)
        .fetch_all(&mut **tx)
        .await?;
        Ok(rows.iter().map(order_from_row).collect())
    }

    pub async fn count(&self) -> RentalResult<i64> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        let row = sqlx::query("SELECT COUNT(*) AS count FROM rental_order")
            .fetch_one(&mut **tx)
            .await?;
        Ok(row.get("count"))
    }

    pub async fn count_lines(&self) -> RentalResult<i64> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        let row = sqlx::query("SELECT COUNT(*) AS count FROM games_in_order")
            .fetch_one(&mut **tx)
            .await?;
        Ok(row.get("count"))
    }
}
