use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;

use game_rental::model::{CatalogEntry, Role, User};
use game_rental::repository::{
    CatalogRepository, RentalOrderRepository, TrackingRepository, UserRepository,
};
use game_rental::schema::create_schema;
use game_rental::{PostgresUnitOfWork, UnitOfWork, UnitOfWorkSession};

/// Connects to `DATABASE_URL` and rebuilds an empty schema.
///
/// Returns `None` when no database is configured so database-backed tests
/// can skip themselves.
pub async fn test_pool() -> Option<PgPool> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping database test");
        return None;
    };
    let pool = PgPool::connect(&url)
        .await
        .expect("Failed to connect to database");

    for table in ["games_in_order", "tracking_info", "rental_order", "catalog", "users"] {
        sqlx::query(&format!("DROP TABLE IF EXISTS {table} CASCADE"))
            .execute(&pool)
            .await
            .expect("Failed to drop table");
    }
    create_schema(&pool).await.expect("Failed to create schema");
    Some(pool)
}

fn game(id: &str, name: &str, genre: &str, price: Decimal) -> CatalogEntry {
    CatalogEntry {
        game_id: id.to_string(),
        name: name.to_string(),
        genre: genre.to_string(),
        price,
        description: format!("{name} for rent"),
        image_url: format!("https://img.example/{id}.png"),
    }
}

/// Three accounts (one per role) and three games.
pub async fn seed_store(pool: &PgPool) -> PostgresUnitOfWork {
    let uow = PostgresUnitOfWork::new(Arc::new(pool.clone()));
    let session = uow.begin().await.expect("Failed to begin seed transaction");
    let users = UserRepository::new(session.executor().clone());
    let catalog = CatalogRepository::new(session.executor().clone());

    for (login, role) in [
        ("alice", Role::Customer),
        ("bob", Role::Employee),
        ("carol", Role::Manager),
    ] {
        let mut user = User::customer(
            login.to_string(),
            "secret".to_string(),
            "+1-951-555-0100".to_string(),
        );
        user.role = role;
        users.create(&user).await.expect("Failed to seed user");
    }

    for entry in [
        game("game0001", "Star Racer", "Racing", Decimal::new(1999, 2)),
        game("game0002", "Dungeon Deep", "RPG", Decimal::new(4999, 2)),
        game("game0003", "Puzzle Pop", "Puzzle", Decimal::new(999, 2)),
    ] {
        catalog.create(&entry).await.expect("Failed to seed game");
    }

    session.commit().await.expect("Failed to commit seed data");
    uow
}

#[derive(Debug, PartialEq, Eq)]
pub struct OrderCounts {
    pub orders: i64,
    pub tracking: i64,
    pub lines: i64,
}

impl OrderCounts {
    pub async fn load(uow: &PostgresUnitOfWork) -> Self {
        let session = uow.begin().await.expect("Failed to begin count transaction");
        let orders = RentalOrderRepository::new(session.executor().clone());
        let tracking = TrackingRepository::new(session.executor().clone());
        let counts = Self {
            orders: orders.count().await.expect("Failed to count orders"),
            tracking: tracking.count().await.expect("Failed to count tracking"),
            lines: orders.count_lines().await.expect("Failed to count lines"),
        };
        session.commit().await.expect("Failed to commit count transaction");
        counts
    }
}
