use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::HashMap;

use game_rental::checkout::{CheckoutStore, PlacedOrder, RentalOrderDraft};
use game_rental::ids::IdKind;
use game_rental::model::{OrderLine, RentalOrder, TrackingInfo};
use game_rental::{RentalError, RentalResult};

#[derive(Default)]
struct State {
    catalog: HashMap<String, Decimal>,
    orders: Vec<RentalOrder>,
    tracking: Vec<TrackingInfo>,
    lines: Vec<OrderLine>,
    fail_on_place: bool,
    existence_lookups: usize,
    price_lookups: usize,
}

/// In-memory checkout storage. `place_order` stores all rows or none.
#[derive(Default)]
pub struct MemoryCheckoutStore {
    state: Mutex<State>,
}

fn max_suffix<'a>(kind: IdKind, ids: impl Iterator<Item = &'a String>) -> Option<i64> {
    ids.filter_map(|id| kind.suffix(id)).max()
}

impl MemoryCheckoutStore {
    pub fn with_games(games: &[(&str, Decimal)]) -> Self {
        let store = Self::default();
        store.state.lock().catalog = games
            .iter()
            .map(|(id, price)| (id.to_string(), *price))
            .collect();
        store
    }

    pub fn set_fail_on_place(&self, fail: bool) {
        self.state.lock().fail_on_place = fail;
    }

    /// Pretends an earlier order with this ID was already stored.
    pub fn insert_existing_order(&self, order: RentalOrder) {
        self.state.lock().orders.push(order);
    }

    pub fn orders(&self) -> Vec<RentalOrder> {
        self.state.lock().orders.clone()
    }

    pub fn tracking(&self) -> Vec<TrackingInfo> {
        self.state.lock().tracking.clone()
    }

    pub fn lines(&self) -> Vec<OrderLine> {
        self.state.lock().lines.clone()
    }

    pub fn existence_lookups(&self) -> usize {
        self.state.lock().existence_lookups
    }

    pub fn price_lookups(&self) -> usize {
        self.state.lock().price_lookups
    }
}

#[async_trait]
impl CheckoutStore for MemoryCheckoutStore {
    async fn game_exists(&self, game_id: &str) -> RentalResult<bool> {
        let mut state = self.state.lock();
        state.existence_lookups += 1;
        Ok(state.catalog.contains_key(game_id))
    }

    async fn prices(&self, game_ids: &[String]) -> RentalResult<HashMap<String, Decimal>> {
        let mut state = self.state.lock();
        state.price_lookups += 1;
        Ok(game_ids
            .iter()
            .filter_map(|id| state.catalog.get(id).map(|price| (id.clone(), *price)))
            .collect())
    }

    async fn place_order(&self, draft: RentalOrderDraft) -> RentalResult<PlacedOrder> {
        let mut state = self.state.lock();
        if state.fail_on_place {
            return Err(RentalError::CommitFailed("injected failure".into()));
        }

        let order_id = IdKind::RentalOrder.next_after(max_suffix(
            IdKind::RentalOrder,
            state.orders.iter().map(|o| &o.rental_order_id),
        ))?;
        let tracking_id = IdKind::Tracking.next_after(max_suffix(
            IdKind::Tracking,
            state.tracking.iter().map(|t| &t.tracking_id),
        ))?;

        let placed = PlacedOrder {
            order: draft.to_order(&order_id),
            tracking: draft.initial_tracking(&tracking_id, &order_id),
            lines: draft.order_lines(&order_id),
        };
        state.orders.push(placed.order.clone());
        state.tracking.push(placed.tracking.clone());
        state.lines.extend(placed.lines.iter().cloned());
        Ok(placed)
    }
}
