use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::Row;
use std::collections::HashMap;

use crate::model::{CatalogEntry, CatalogFilter, PriceOrder};
use crate::validate::{MAX_GAME_NAME_LEN, MAX_GENRE_LEN};
use crate::{Executor, RentalError, RentalResult};

const CATALOG_COLUMNS: &str = "game_id, name, genre, price, description, image_url";

/// Catalog columns a manager edits as free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogText {
    Name,
    Genre,
    Description,
    ImageUrl,
}

impl CatalogText {
    fn column(&self) -> &'static str {
        match self {
            CatalogText::Name => "name",
            CatalogText::Genre => "genre",
            CatalogText::Description => "description",
            CatalogText::ImageUrl => "image_url",
        }
    }

    /// Width of the column, for the `VARCHAR` ones.
    pub fn max_len(&self) -> Option<usize> {
        match self {
            CatalogText::Name => Some(MAX_GAME_NAME_LEN),
            CatalogText::Genre => Some(MAX_GENRE_LEN),
            CatalogText::Description | CatalogText::ImageUrl => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CatalogText::Name => "game name",
            CatalogText::Genre => "genre",
            CatalogText::Description => "description",
            CatalogText::ImageUrl => "image URL",
        }
    }
}

fn entry_from_row(row: &PgRow) -> CatalogEntry {
    CatalogEntry {
        game_id: row.get("game_id"),
        name: row.get("name"),
        genre: row.get("genre"),
        price: row.get("price"),
        description: row.get("description"),
        image_url: row.get("image_url"),
    }
}

pub struct CatalogRepository {
    executor: Executor,
}

impl CatalogRepository {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    pub async fn exists(&self, game_id: &str) -> RentalResult<bool> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        let row = sqlx::query("SELECT EXISTS (SELECT 1 FROM catalog WHERE game_id = $1) AS found")
            .bind(game_id)
            .fetch_one(&mut **tx)
            .await?;
        Ok(row.get("found"))
    }

    pub async fn find(&self, game_id: &str) -> RentalResult<Option<CatalogEntry>> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        let row = sqlx::query(&format!(
            "SELECT {CATALOG_COLUMNS} FROM catalog WHERE game_id = $1"
        ))
        .bind(game_id)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(row.as_ref().map(entry_from_row))
    }

    pub async fn list(&self, filter: &CatalogFilter) -> RentalResult<Vec<CatalogEntry>> {
        let direction = match filter.order {
            PriceOrder::Ascending => "ASC",
            PriceOrder::Descending => "DESC",
        };
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        let rows = sqlx::query(&format!(
            "SELECT {CATALOG_COLUMNS} FROM catalog \
             WHERE ($1::text IS NULL OR genre = $1) AND ($2::numeric IS NULL OR price < $2) \
             ORDER BY price {direction}, game_id"
        ))
        .bind(&filter.genre)
        .bind(filter.max_price)
        .fetch_all(&mut **tx)
        .await?;
        Ok(rows.iter().map(entry_from_row).collect())
    }

    /// Unit prices for all of `game_ids` in a single query. Unknown IDs are
    /// simply absent from the map.
    pub async fn prices(&self, game_ids: &[String]) -> RentalResult<HashMap<String, Decimal>> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        let rows = sqlx::query("SELECT game_id, price FROM catalog WHERE game_id = ANY($1)")
            .bind(game_ids)
            .fetch_all(&mut **tx)
            .await?;
        Ok(rows
            .iter()
            .map(|row| (row.get("game_id"), row.get("price")))
            .collect())
    }

    pub async fn create(&self, entry: &CatalogEntry) -> RentalResult<()> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        sqlx::query(&format!(
            "INSERT INTO catalog ({CATALOG_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6)"
        ))
        .bind(&entry.game_id)
        .bind(&entry.name)
        .bind(&entry.genre)
        .bind(entry.price)
        .bind(&entry.description)
        .bind(&entry.image_url)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn update_text(&self, game_id: &str, field: CatalogText, value: &str) -> RentalResult<()> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        let result = sqlx::query(&format!(
            "UPDATE catalog SET {} = $1 WHERE game_id = $2",
            field.column()
        ))
        .bind(value)
        .bind(game_id)
        .execute(&mut **tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(RentalError::not_found("Game", game_id));
        }
        Ok(())
    }

    pub async fn update_price(&self, game_id: &str, price: Decimal) -> RentalResult<()> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        let result = sqlx::query("UPDATE catalog SET price = $1 WHERE game_id = $2")
            .bind(price)
            .bind(game_id)
            .execute(&mut **tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RentalError::not_found("Game", game_id));
        }
        Ok(())
    }

    pub async fn delete(&self, game_id: &str) -> RentalResult<()> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        let result = sqlx::query("DELETE FROM catalog WHERE game_id = $1")
            .bind(game_id)
            .execute(&mut **tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RentalError::not_found("Game", game_id));
        }
        Ok(())
    }

    /// Number of order lines that reference the game.
    pub async fn count_order_lines(&self, game_id: &str) -> RentalResult<i64> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        let row = sqlx::query("SELECT COUNT(*) AS count FROM games_in_order WHERE game_id = $1")
            .bind(game_id)
            .fetch_one(&mut **tx)
            .await?;
        Ok(row.get("count"))
    }
}
