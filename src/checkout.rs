//! Rental order placement.
//!
//! A checkout moves through
//! `CollectingCart -> Pricing -> AwaitingConfirmation -> Persisting -> Done`,
//! or ends in `Cancelled` when the operator leaves the game ID blank or
//! declines the summary. Nothing is written before the operator confirms, and the store persists the order,
//! its tracking record and its lines as one unit.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::cart::{money, Cart, PricedCart, PricedLine};
use crate::console::prompt::{ask, ask_valid, banner, confirm};
use crate::console::Terminal;
use crate::model::{OrderLine, RentalOrder, TrackingInfo};
use crate::validate::{is_valid_game_id, parse_positive, parse_quantity};
use crate::RentalResult;

pub const INITIAL_STATUS: &str = "Order Received";
pub const ORIGIN_LOCATION: &str = "Los Angeles,CA";
pub const INITIAL_COURIER: &str = "USPS";
pub const RENTAL_PERIOD_DAYS: i64 = 30;

/// Storage operations a checkout needs.
#[async_trait]
pub trait CheckoutStore: Send + Sync {
    async fn game_exists(&self, game_id: &str) -> RentalResult<bool>;

    /// Unit prices for `game_ids`, fetched in one lookup.
    async fn prices(&self, game_ids: &[String]) -> RentalResult<HashMap<String, Decimal>>;

    /// Allocates identifiers and writes the order, its tracking record and
    /// its lines. Either all of them are stored or none is.
    async fn place_order(&self, draft: RentalOrderDraft) -> RentalResult<PlacedOrder>;
}

/// A priced, confirmed order that has not been assigned identifiers yet.
#[derive(Debug, Clone, PartialEq)]
pub struct RentalOrderDraft {
    pub customer_login: String,
    pub lines: Vec<PricedLine>,
    pub total_copies: i64,
    pub total_price: Decimal,
    pub ordered_at: DateTime<Utc>,
    pub due_date: NaiveDate,
}

impl RentalOrderDraft {
    pub fn new(customer_login: impl Into<String>, priced: PricedCart, ordered_at: DateTime<Utc>) -> Self {
        Self {
            customer_login: customer_login.into(),
            lines: priced.lines,
            total_copies: priced.total_copies,
            total_price: priced.total_price,
            ordered_at,
            due_date: (ordered_at + Duration::days(RENTAL_PERIOD_DAYS)).date_naive(),
        }
    }

    pub fn to_order(&self, rental_order_id: &str) -> RentalOrder {
        RentalOrder {
            rental_order_id: rental_order_id.to_string(),
            customer_login: self.customer_login.clone(),
            total_copies: self.total_copies,
            total_price: self.total_price,
            ordered_at: self.ordered_at,
            due_date: self.due_date,
        }
    }

    pub fn order_lines(&self, rental_order_id: &str) -> Vec<OrderLine> {
        self.lines
            .iter()
            .map(|line| OrderLine {
                rental_order_id: rental_order_id.to_string(),
                game_id: line.game_id.clone(),
                quantity: line.quantity,
            })
            .collect()
    }

    /// Tracking record every new order starts with.
    pub fn initial_tracking(&self, tracking_id: &str, rental_order_id: &str) -> TrackingInfo {
        TrackingInfo {
            tracking_id: tracking_id.to_string(),
            rental_order_id: rental_order_id.to_string(),
            status: INITIAL_STATUS.to_string(),
            current_location: ORIGIN_LOCATION.to_string(),
            courier: INITIAL_COURIER.to_string(),
            last_updated_at: self.ordered_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    pub order: RentalOrder,
    pub tracking: TrackingInfo,
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    CollectingCart,
    Pricing,
    AwaitingConfirmation,
    Persisting,
    Done,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
    Placed(PlacedOrder),
    Cancelled,
}

/// One order placement for a logged-in customer.
pub struct Checkout<'a, S: ?Sized> {
    store: &'a S,
    customer_login: &'a str,
    state: CheckoutState,
    clock: fn() -> DateTime<Utc>,
}

impl<'a, S: CheckoutStore + ?Sized> Checkout<'a, S> {
    pub fn new(store: &'a S, customer_login: &'a str) -> Self {
        Self {
            store,
            customer_login,
            state: CheckoutState::CollectingCart,
            clock: Utc::now,
        }
    }

    /// Replaces the source of the order timestamp.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    fn transition(&mut self, next: CheckoutState) {
        debug!(from = ?self.state, to = ?next, "checkout state change");
        self.state = next;
    }

    /// Drives the checkout on `term`.
    ///
    /// Storage errors end the checkout and are returned to the caller; any
    /// write already made by `place_order` has been rolled back by then.
    pub async fn run<T: Terminal + ?Sized>(&mut self, term: &mut T) -> RentalResult<CheckoutOutcome> {
        banner(term, "Place Order")?;

        let Some(cart) = self.collect_cart(term).await? else {
            return self.cancel(term);
        };

        self.transition(CheckoutState::Pricing);
        let prices = self.store.prices(&cart.game_ids()).await?;
        let priced = cart.price(&prices)?;

        self.transition(CheckoutState::AwaitingConfirmation);
        print_summary(term, &priced)?;
        if !confirm(term, "Please confirm order (y/n): ")? {
            return self.cancel(term);
        }

        self.transition(CheckoutState::Persisting);
        let draft = RentalOrderDraft::new(self.customer_login, priced, (self.clock)());
        let placed = self.store.place_order(draft).await?;

        self.transition(CheckoutState::Done);
        info!(
            order = %placed.order.rental_order_id,
            customer = %placed.order.customer_login,
            "rental order placed"
        );
        term.write_line("Order placed successfully")?;
        term.write_line(&format!(
            "Rental order ID: {}  Tracking ID: {}  Due: {}",
            placed.order.rental_order_id, placed.tracking.tracking_id, placed.order.due_date
        ))?;
        Ok(CheckoutOutcome::Placed(placed))
    }

    fn cancel<T: Terminal + ?Sized>(&mut self, term: &mut T) -> RentalResult<CheckoutOutcome> {
        self.transition(CheckoutState::Cancelled);
        term.write_line("Order canceled")?;
        term.write_line("Returning to Main Menu...")?;
        Ok(CheckoutOutcome::Cancelled)
    }

    /// Collects the requested number of distinct games, or `None` when the
    /// operator gives up with a blank game ID.
    async fn collect_cart<T: Terminal + ?Sized>(&mut self, term: &mut T) -> RentalResult<Option<Cart>> {
        let distinct = ask_valid(
            term,
            "How many different games would you like to order?",
            "Invalid input",
            parse_positive,
        )?;

        let mut cart = Cart::new();
        while cart.len() < distinct as usize {
            let Some(game_id) = self.ask_game_id(term, &cart).await? else {
                return Ok(None);
            };
            let quantity = ask_valid(
                term,
                "Please enter number of copies: ",
                "Invalid input",
                parse_quantity,
            )?;
            cart.add(game_id, quantity)?;
        }
        Ok(Some(cart))
    }

    async fn ask_game_id<T: Terminal + ?Sized>(
        &self,
        term: &mut T,
        cart: &Cart,
    ) -> RentalResult<Option<String>> {
        loop {
            let game_id = ask(term, "Please enter gameID (blank to cancel): ")?;
            if game_id.is_empty() {
                return Ok(None);
            }
            if !is_valid_game_id(&game_id) {
                term.write_line("Invalid gameID")?;
            } else if cart.contains(&game_id) {
                term.write_line(&format!("{game_id} is already in this order"))?;
            } else if !self.store.game_exists(&game_id).await? {
                term.write_line("Invalid gameID")?;
            } else {
                return Ok(Some(game_id));
            }
        }
    }
}

fn print_summary<T: Terminal + ?Sized>(term: &mut T, priced: &PricedCart) -> RentalResult<()> {
    term.write_line("")?;
    term.write_line("Items in Order")?;
    term.write_line("--------------")?;
    term.write_line("gameID  \tnumCopies\tPrice")?;
    for line in &priced.lines {
        term.write_line(&format!(
            "{}\t    {}\t\t{}",
            line.game_id,
            line.quantity,
            money(line.unit_price)
        ))?;
    }
    term.write_line(&format!(
        "Total: numGames = {}, totalCopies = {}",
        priced.lines.len(),
        priced.total_copies
    ))?;
    term.write_line(&format!("Total Cost: ${}", money(priced.total_price)))
}
