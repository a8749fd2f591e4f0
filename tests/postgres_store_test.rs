mod common;

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;

use game_rental::cart::Cart;
use game_rental::checkout::{CheckoutStore, RentalOrderDraft, INITIAL_STATUS, ORIGIN_LOCATION};
use game_rental::ids::{IdAllocator, IdKind};
use game_rental::model::{CatalogFilter, NewCatalogEntry, PriceOrder, Role, TrackingUpdate};
use game_rental::validate::{MAX_COPIES_PER_GAME, MAX_PRICE};
use game_rental::repository::{
    CatalogRepository, CatalogText, PgCheckoutStore, RentalOrderRepository, TrackingRepository,
    UserRepository,
};
use game_rental::{PostgresUnitOfWork, UnitOfWork, UnitOfWorkSession};

use common::{seed_store, test_pool, OrderCounts};

fn draft(login: &str, items: &[(&str, i32)], prices: &HashMap<String, Decimal>) -> RentalOrderDraft {
    let mut cart = Cart::new();
    for (game_id, quantity) in items {
        cart.add(*game_id, *quantity).expect("Failed to add to cart");
    }
    let priced = cart.price(prices).expect("Failed to price cart");
    RentalOrderDraft::new(
        login,
        priced,
        Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).unwrap(),
    )
}

async fn allocate(uow: &PostgresUnitOfWork, kind: IdKind) -> String {
    let session = uow.begin().await.expect("Failed to begin transaction");
    let id = IdAllocator::allocate(session.executor(), kind)
        .await
        .expect("Failed to allocate id");
    session.commit().await.expect("Failed to commit transaction");
    id
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
#[serial_test::serial]
async fn test_checkout_writes_all_rows_in_one_unit() {
    let Some(pool) = test_pool().await else { return };
    let uow = seed_store(&pool).await;
    let store = PgCheckoutStore::new(uow.clone());

    let ids = vec!["game0001".to_string(), "game0002".to_string()];
    let prices = store.prices(&ids).await.expect("Failed to fetch prices");
    assert_eq!(prices.len(), 2);
    assert!(store.game_exists("game0003").await.unwrap());
    assert!(!store.game_exists("game0042").await.unwrap());

    let placed = store
        .place_order(draft("alice", &[("game0001", 2), ("game0002", 1)], &prices))
        .await
        .expect("Failed to place order");

    assert_eq!(placed.order.rental_order_id, "gamerentalorder1");
    assert_eq!(placed.tracking.tracking_id, "trackingid1");
    assert_eq!(
        OrderCounts::load(&uow).await,
        OrderCounts {
            orders: 1,
            tracking: 1,
            lines: 2
        }
    );

    let session = uow.begin().await.unwrap();
    let orders = RentalOrderRepository::new(session.executor().clone());
    let stored = orders
        .find("gamerentalorder1")
        .await
        .unwrap()
        .expect("Order not stored");
    assert_eq!(stored.total_copies, 3);
    assert_eq!(stored.total_price, Decimal::new(8997, 2));
    assert_eq!(stored.due_date, placed.order.due_date);
    assert_eq!(orders.lines("gamerentalorder1").await.unwrap(), placed.lines);
    let tracking = TrackingRepository::new(session.executor().clone())
        .find_for_order("gamerentalorder1")
        .await
        .unwrap()
        .expect("Tracking not stored");
    assert_eq!(tracking.status, INITIAL_STATUS);
    assert_eq!(tracking.current_location, ORIGIN_LOCATION);
    session.commit().await.unwrap();

    let second = store
        .place_order(draft("alice", &[("game0003", 1)], &prices_with_third(&prices)))
        .await
        .expect("Failed to place second order");
    assert_eq!(second.order.rental_order_id, "gamerentalorder2");
    assert_eq!(second.tracking.tracking_id, "trackingid2");

    pool.close().await;
}

fn prices_with_third(prices: &HashMap<String, Decimal>) -> HashMap<String, Decimal> {
    let mut prices = prices.clone();
    prices.insert("game0003".to_string(), Decimal::new(999, 2));
    prices
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
#[serial_test::serial]
async fn test_failed_line_insert_rolls_back_order_and_tracking() {
    let Some(pool) = test_pool().await else { return };
    let uow = seed_store(&pool).await;
    let store = PgCheckoutStore::new(uow.clone());

    // game0404 is priced but missing from the catalog, so the order line
    // violates its foreign key after the order and tracking rows went in.
    let prices = HashMap::from([
        ("game0001".to_string(), Decimal::new(1999, 2)),
        ("game0404".to_string(), Decimal::new(100, 2)),
    ]);
    let result = store
        .place_order(draft("alice", &[("game0001", 1), ("game0404", 1)], &prices))
        .await;

    assert!(result.is_err());
    assert_eq!(
        OrderCounts::load(&uow).await,
        OrderCounts {
            orders: 0,
            tracking: 0,
            lines: 0
        }
    );

    pool.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
#[serial_test::serial]
async fn test_allocator_seeds_and_uses_numeric_maximum() {
    let Some(pool) = test_pool().await else { return };
    let uow = seed_store(&pool).await;

    assert_eq!(allocate(&uow, IdKind::RentalOrder).await, "gamerentalorder1");
    assert_eq!(allocate(&uow, IdKind::Tracking).await, "trackingid1");
    assert_eq!(allocate(&uow, IdKind::Game).await, "game0004");

    for id in ["gamerentalorder9", "gamerentalorder10"] {
        sqlx::query(
            "INSERT INTO rental_order (rental_order_id, customer_login, total_copies, total_price, ordered_at, due_date) \
             VALUES ($1, 'alice', 1, 9.99, now(), current_date + 30)",
        )
        .bind(id)
        .execute(&pool)
        .await
        .expect("Failed to insert order");
    }
    assert_eq!(allocate(&uow, IdKind::RentalOrder).await, "gamerentalorder11");

    pool.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
#[serial_test::serial]
async fn test_catalog_filters_and_edits() {
    let Some(pool) = test_pool().await else { return };
    let uow = seed_store(&pool).await;

    let session = uow.begin().await.unwrap();
    let catalog = CatalogRepository::new(session.executor().clone());

    let all = catalog.list(&CatalogFilter::default()).await.unwrap();
    let ids: Vec<&str> = all.iter().map(|g| g.game_id.as_str()).collect();
    assert_eq!(ids, vec!["game0002", "game0001", "game0003"]);

    let cheap_first = catalog
        .list(&CatalogFilter {
            genre: None,
            max_price: Some(Decimal::new(2000, 2)),
            order: PriceOrder::Ascending,
        })
        .await
        .unwrap();
    let ids: Vec<&str> = cheap_first.iter().map(|g| g.game_id.as_str()).collect();
    assert_eq!(ids, vec!["game0003", "game0001"]);

    let rpg = catalog
        .list(&CatalogFilter {
            genre: Some("RPG".to_string()),
            ..CatalogFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(rpg.len(), 1);

    catalog
        .update_text("game0001", CatalogText::Name, "Star Racer Deluxe")
        .await
        .unwrap();
    catalog
        .update_price("game0001", Decimal::new(2499, 2))
        .await
        .unwrap();
    let updated = catalog.find("game0001").await.unwrap().unwrap();
    assert_eq!(updated.name, "Star Racer Deluxe");
    assert_eq!(updated.price, Decimal::new(2499, 2));

    let game_id = IdAllocator::allocate(session.executor(), IdKind::Game)
        .await
        .unwrap();
    let entry = NewCatalogEntry {
        name: "Space Farm".to_string(),
        genre: "Simulation".to_string(),
        price: Decimal::new(1500, 2),
        description: String::new(),
        image_url: String::new(),
    }
    .with_id(game_id);
    catalog.create(&entry).await.unwrap();
    assert_eq!(entry.game_id, "game0004");
    assert_eq!(catalog.count_order_lines("game0004").await.unwrap(), 0);
    catalog.delete("game0004").await.unwrap();
    assert!(!catalog.exists("game0004").await.unwrap());
    assert!(catalog.delete("game0004").await.is_err());

    session.commit().await.unwrap();
    pool.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
#[serial_test::serial]
async fn test_user_and_tracking_updates() {
    let Some(pool) = test_pool().await else { return };
    let uow = seed_store(&pool).await;
    let store = PgCheckoutStore::new(uow.clone());
    let prices = HashMap::from([("game0002".to_string(), Decimal::new(4999, 2))]);
    let placed = store
        .place_order(draft("alice", &[("game0002", 1)], &prices))
        .await
        .unwrap();

    let session = uow.begin().await.unwrap();
    let users = UserRepository::new(session.executor().clone());
    assert!(users.authenticate("alice", "secret").await.unwrap().is_some());
    assert!(users.authenticate("alice", "wrong").await.unwrap().is_none());
    users.update_role("alice", Role::Employee).await.unwrap();
    users.update_overdue_count("alice", 2).await.unwrap();
    users
        .update_favorite_games("alice", Some("Star Racer, Puzzle Pop"))
        .await
        .unwrap();
    let alice = users.find("alice").await.unwrap().unwrap();
    assert_eq!(alice.role, Role::Employee);
    assert_eq!(alice.overdue_count, 2);
    assert_eq!(alice.favorite_games.as_deref(), Some("Star Racer, Puzzle Pop"));
    assert!(users.update_password("nobody", "x").await.is_err());

    let orders = RentalOrderRepository::new(session.executor().clone());
    let history = orders.list_for_customer("alice", None).await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(orders
        .list_for_customer("alice", Some(5))
        .await
        .unwrap()
        .len()
        <= 5);

    let tracking = TrackingRepository::new(session.executor().clone());
    let updated_at = Utc.with_ymd_and_hms(2026, 4, 2, 8, 0, 0).unwrap();
    let updated = tracking
        .update(
            &placed.tracking.tracking_id,
            &TrackingUpdate {
                status: Some("Shipped".to_string()),
                current_location: None,
                courier: Some("UPS".to_string()),
            },
            updated_at,
        )
        .await
        .unwrap();
    assert_eq!(updated.status, "Shipped");
    assert_eq!(updated.current_location, ORIGIN_LOCATION);
    assert_eq!(updated.courier, "UPS");
    assert_eq!(updated.last_updated_at, updated_at);
    assert!(tracking
        .update("trackingid999", &TrackingUpdate::default(), updated_at)
        .await
        .is_err());

    session.commit().await.unwrap();
    pool.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial_test::serial]
async fn test_concurrent_checkouts_get_distinct_contiguous_ids() {
    let Some(pool) = test_pool().await else { return };
    let uow = seed_store(&pool).await;
    let store = PgCheckoutStore::new(uow.clone());
    let prices = HashMap::from([("game0001".to_string(), Decimal::new(1999, 2))]);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            let draft = draft("alice", &[("game0001", 1)], &prices);
            tokio::spawn(async move { store.place_order(draft).await })
        })
        .collect();

    let mut order_ids = Vec::new();
    let mut tracking_ids = Vec::new();
    for handle in handles {
        let placed = handle
            .await
            .expect("checkout task panicked")
            .expect("Failed to place order");
        order_ids.push(IdKind::RentalOrder.suffix(&placed.order.rental_order_id).unwrap());
        tracking_ids.push(IdKind::Tracking.suffix(&placed.tracking.tracking_id).unwrap());
    }
    order_ids.sort_unstable();
    tracking_ids.sort_unstable();

    let expected: Vec<i64> = (1..=8).collect();
    assert_eq!(order_ids, expected);
    assert_eq!(tracking_ids, expected);
    assert_eq!(
        OrderCounts::load(&uow).await,
        OrderCounts {
            orders: 8,
            tracking: 8,
            lines: 8
        }
    );

    pool.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
#[serial_test::serial]
async fn test_largest_order_fits_the_total_column() {
    let Some(pool) = test_pool().await else { return };
    let uow = seed_store(&pool).await;

    let session = uow.begin().await.unwrap();
    let entry = NewCatalogEntry {
        name: "Collector Vault".to_string(),
        genre: "Bundle".to_string(),
        price: MAX_PRICE,
        description: String::new(),
        image_url: String::new(),
    }
    .with_id("game0900".to_string());
    CatalogRepository::new(session.executor().clone())
        .create(&entry)
        .await
        .unwrap();
    session.commit().await.unwrap();

    let store = PgCheckoutStore::new(uow.clone());
    let prices = store
        .prices(&["game0900".to_string()])
        .await
        .expect("Failed to fetch prices");
    let placed = store
        .place_order(draft("alice", &[("game0900", MAX_COPIES_PER_GAME)], &prices))
        .await
        .expect("Failed to place order at the quantity cap");

    assert_eq!(
        placed.order.total_price,
        MAX_PRICE * Decimal::from(MAX_COPIES_PER_GAME)
    );

    pool.close().await;
}
