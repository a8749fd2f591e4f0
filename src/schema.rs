use sqlx::PgPool;
use tracing::info;

use crate::RentalResult;

/// Table definitions, in dependency order.
pub const CREATE_TABLES: [&str; 5] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        login VARCHAR(50) PRIMARY KEY,
        password VARCHAR(30) NOT NULL,
        role VARCHAR(10) NOT NULL CHECK (role IN ('customer', 'employee', 'manager')),
        favorite_games TEXT,
        phone_number VARCHAR(20) NOT NULL,
        overdue_count INTEGER NOT NULL DEFAULT 0 CHECK (overdue_count >= 0)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS catalog (
        game_id VARCHAR(8) PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        genre VARCHAR(50) NOT NULL,
        price NUMERIC(10, 2) NOT NULL CHECK (price >= 0),
        description TEXT NOT NULL DEFAULT '',
        image_url TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS rental_order (
        rental_order_id VARCHAR(50) PRIMARY KEY,
        customer_login VARCHAR(50) NOT NULL REFERENCES users(login) ON UPDATE CASCADE,
        total_copies BIGINT NOT NULL CHECK (total_copies > 0),
        -- 9999 games x 999 copies x the largest catalog price still fits.
        total_price NUMERIC(20, 2) NOT NULL CHECK (total_price >= 0),
        ordered_at TIMESTAMPTZ NOT NULL,
        due_date DATE NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tracking_info (
        tracking_id VARCHAR(50) PRIMARY KEY,
        rental_order_id VARCHAR(50) NOT NULL UNIQUE REFERENCES rental_order(rental_order_id),
        status VARCHAR(50) NOT NULL,
        current_location VARCHAR(60) NOT NULL,
        courier VARCHAR(60) NOT NULL,
        last_updated_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS games_in_order (
        rental_order_id VARCHAR(50) NOT NULL REFERENCES rental_order(rental_order_id),
        game_id VARCHAR(8) NOT NULL REFERENCES catalog(game_id),
        quantity INTEGER NOT NULL CHECK (quantity > 0),
        PRIMARY KEY (rental_order_id, game_id)
    )
    "#,
];

/// Creates any missing table. Safe to run on every start.
pub async fn create_schema(pool: &PgPool) -> RentalResult<()> {
    for statement in CREATE_TABLES {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("schema ready");
    Ok(())
}
