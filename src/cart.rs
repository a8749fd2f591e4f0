use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

use crate::validate::MAX_COPIES_PER_GAME;
use crate::{RentalError, RentalResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub game_id: String,
    pub quantity: i32,
}

/// Games collected for one checkout, in entry order.
///
/// A game appears at most once; order lines are keyed by
/// (rental order, game).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, game_id: &str) -> bool {
        self.lines.iter().any(|line| line.game_id == game_id)
    }

    pub fn add(&mut self, game_id: impl Into<String>, quantity: i32) -> RentalResult<()> {
        let game_id = game_id.into();
        if !(1..=MAX_COPIES_PER_GAME).contains(&quantity) {
            return Err(RentalError::InvalidInput(format!(
                "quantity for {game_id} must be between 1 and {MAX_COPIES_PER_GAME}"
            )));
        }
        if self.contains(&game_id) {
            return Err(RentalError::InvalidInput(format!(
                "{game_id} is already in the order"
            )));
        }
        self.lines.push(CartLine { game_id, quantity });
        Ok(())
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn game_ids(&self) -> Vec<String> {
        self.lines.iter().map(|line| line.game_id.clone()).collect()
    }

    /// Prices every line against `prices` (game ID to unit price).
    pub fn price(&self, prices: &HashMap<String, Decimal>) -> RentalResult<PricedCart> {
        if self.is_empty() {
            return Err(RentalError::InvalidInput("the order has no games".into()));
        }

        let mut lines = Vec::with_capacity(self.lines.len());
        let mut total_copies: i64 = 0;
        let mut total_price = Decimal::ZERO;
        for line in &self.lines {
            let unit_price = *prices
                .get(&line.game_id)
                .ok_or_else(|| RentalError::not_found("Game", line.game_id.as_str()))?;
            let line_total = round_cents(unit_price * Decimal::from(line.quantity));
            total_copies += i64::from(line.quantity);
            total_price += line_total;
            lines.push(PricedLine {
                game_id: line.game_id.clone(),
                quantity: line.quantity,
                unit_price,
                line_total,
            });
        }

        Ok(PricedCart {
            lines,
            total_copies,
            total_price: round_cents(total_price),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub game_id: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// A cart with catalog prices applied.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedCart {
    pub lines: Vec<PricedLine>,
    pub total_copies: i64,
    pub total_price: Decimal,
}

/// Rounds half away from zero to whole cents.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Renders an amount with exactly two decimals.
pub fn money(amount: Decimal) -> String {
    let mut amount = round_cents(amount);
    amount.rescale(2);
    amount.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices() -> HashMap<String, Decimal> {
        HashMap::from([
            ("game0001".to_string(), Decimal::new(1999, 2)),
            ("game0002".to_string(), Decimal::new(4999, 2)),
        ])
    }

    #[test]
    fn totals_sum_quantities_and_line_prices() {
        let mut cart = Cart::new();
        cart.add("game0001", 2).unwrap();
        cart.add("game0002", 1).unwrap();

        let priced = cart.price(&prices()).unwrap();

        assert_eq!(priced.total_copies, 3);
        assert_eq!(priced.total_price, Decimal::new(8997, 2));
        assert_eq!(priced.lines[0].line_total, Decimal::new(3998, 2));
        assert_eq!(priced.lines[1].unit_price, Decimal::new(4999, 2));
    }

    #[test]
    fn duplicate_games_are_rejected() {
        let mut cart = Cart::new();
        cart.add("game0001", 1).unwrap();
        assert!(cart.add("game0001", 4).is_err());
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn quantities_above_the_cap_are_rejected() {
        let mut cart = Cart::new();
        assert!(cart.add("game0001", 0).is_err());
        assert!(cart.add("game0001", MAX_COPIES_PER_GAME + 1).is_err());
        cart.add("game0001", MAX_COPIES_PER_GAME).unwrap();
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn missing_price_is_not_found() {
        let mut cart = Cart::new();
        cart.add("game0003", 1).unwrap();
        assert!(matches!(
            cart.price(&prices()),
            Err(RentalError::NotFound { entity: "Game", .. })
        ));
    }

    #[test]
    fn empty_cart_cannot_be_priced() {
        assert!(Cart::new().price(&prices()).is_err());
    }

    #[test]
    fn money_always_shows_cents() {
        assert_eq!(money(Decimal::new(8997, 2)), "89.97");
        assert_eq!(money(Decimal::from(5)), "5.00");
        assert_eq!(money(Decimal::new(12345, 3)), "12.35");
    }
}
