use crate::cart::money;
use crate::checkout::{Checkout, CheckoutOutcome};
use crate::model::RentalOrder;
use crate::repository::{RentalOrderRepository, TrackingRepository};
use crate::{RentalError, RentalResult, UnitOfWork, UnitOfWorkSession};

use super::prompt::{ask, banner};
use super::{Shell, Terminal};

fn order_row(order: &RentalOrder) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}",
        order.rental_order_id,
        order.total_copies,
        money(order.total_price),
        order.ordered_at.format("%Y-%m-%d %H:%M:%S"),
        order.due_date
    )
}

impl<T: Terminal> Shell<T> {
    pub(super) async fn place_order(&mut self, login: &str) -> RentalResult<()> {
        let outcome = Checkout::new(&self.checkout, login)
            .run(&mut self.term)
            .await;
        match outcome {
            Ok(CheckoutOutcome::Placed(_)) | Ok(CheckoutOutcome::Cancelled) => Ok(()),
            Err(RentalError::InputClosed) => Err(RentalError::InputClosed),
            Err(e) => {
                self.term.write_line("Order could not be placed.")?;
                Err(e)
            }
        }
    }

    /// Orders of the logged-in user, newest first; `limit` caps the count.
    pub(super) async fn view_order_history(&mut self, login: &str, limit: Option<i64>) -> RentalResult<()> {
        let session = self.uow.begin().await?;
        let orders = RentalOrderRepository::new(session.executor().clone())
            .list_for_customer(login, limit)
            .await?;
        session.commit().await?;

        match limit {
            Some(n) => banner(&mut self.term, &format!("Past {n} Rental Orders"))?,
            None => banner(&mut self.term, "Rental Order History")?,
        }
        if orders.is_empty() {
            return self.term.write_line("No rental orders found.");
        }
        self.term
            .write_line("rentalOrderID\tnumCopies\ttotalPrice\torderTimestamp\tdueDate")?;
        for order in &orders {
            self.term.write_line(&order_row(order))?;
        }
        self.term
            .write_line(&format!("total row(s): {}", orders.len()))
    }

    /// Shows one order with its lines. Customers may only look at their own.
    pub(super) async fn view_order_info(&mut self, login: &str) -> RentalResult<()> {
        let role = self.role_of(login).await?;
        let rental_order_id = ask(&mut self.term, "Please enter rentalOrderID: ")?;

        let session = self.uow.begin().await?;
        let orders = RentalOrderRepository::new(session.executor().clone());
        let order = orders.find(&rental_order_id).await?;
        let visible = order
            .filter(|order| order.customer_login == login || role.can_view_any_order());
        let Some(order) = visible else {
            session.commit().await?;
            return self.term.write_line("Rental order not found.");
        };
        let lines = orders.lines(&order.rental_order_id).await?;
        let tracking = TrackingRepository::new(session.executor().clone())
            .find_for_order(&order.rental_order_id)
            .await?;
        session.commit().await?;

        banner(&mut self.term, "Rental Order Information")?;
        self.term
            .write_line(&format!("Rental Order ID: {}", order.rental_order_id))?;
        self.term
            .write_line(&format!("Customer: {}", order.customer_login))?;
        self.term.write_line(&format!(
            "Order Timestamp: {}",
            order.ordered_at.format("%Y-%m-%d %H:%M:%S")
        ))?;
        self.term
            .write_line(&format!("Due Date: {}", order.due_date))?;
        self.term
            .write_line(&format!("Total Copies: {}", order.total_copies))?;
        self.term
            .write_line(&format!("Total Price: ${}", money(order.total_price)))?;
        if let Some(tracking) = tracking {
            self.term
                .write_line(&format!("Tracking ID: {}", tracking.tracking_id))?;
        }
        self.term.write_line("gameID\tnumCopies")?;
        for line in &lines {
            self.term
                .write_line(&format!("{}\t{}", line.game_id, line.quantity))?;
        }
        Ok(())
    }
}
