use chrono::Utc;

use crate::audit::AuditTrail;
use crate::model::{Role, TrackingInfo, TrackingUpdate};
use crate::repository::{RentalOrderRepository, TrackingRepository};
use crate::validate::{optional_text, MAX_COURIER_LEN, MAX_LOCATION_LEN, MAX_STATUS_LEN};
use crate::{RentalResult, UnitOfWork, UnitOfWorkSession};

use super::prompt::{ask, ask_valid, banner};
use super::{Shell, Terminal};

impl<T: Terminal> Shell<T> {
    fn print_tracking(&mut self, tracking: &TrackingInfo) -> RentalResult<()> {
        banner(&mut self.term, "Tracking Information")?;
        self.term
            .write_line(&format!("Tracking ID: {}", tracking.tracking_id))?;
        self.term
            .write_line(&format!("Rental Order ID: {}", tracking.rental_order_id))?;
        self.term
            .write_line(&format!("Status: {}", tracking.status))?;
        self.term
            .write_line(&format!("Current Location: {}", tracking.current_location))?;
        self.term
            .write_line(&format!("Courier: {}", tracking.courier))?;
        self.term.write_line(&format!(
            "Last Updated: {}",
            tracking.last_updated_at.format("%Y-%m-%d %H:%M:%S")
        ))
    }

    fn ask_tracking_field(&mut self, prompt: &str, max_len: usize) -> RentalResult<Option<String>> {
        ask_valid(
            &mut self.term,
            prompt,
            &format!("Must be at most {max_len} characters"),
            |s| optional_text(s, max_len),
        )
    }

    /// Shows a tracking record. Customers only see records of their own orders.
    pub(super) async fn view_tracking_info(&mut self, login: &str) -> RentalResult<()> {
        let role = self.role_of(login).await?;
        let tracking_id = ask(&mut self.term, "Please enter trackingID: ")?;

        let session = self.uow.begin().await?;
        let tracking = TrackingRepository::new(session.executor().clone())
            .find(&tracking_id)
            .await?;
        let visible = match tracking {
            Some(tracking) if role.can_view_any_order() => Some(tracking),
            Some(tracking) => {
                let order = RentalOrderRepository::new(session.executor().clone())
                    .find(&tracking.rental_order_id)
                    .await?;
                order
                    .filter(|order| order.customer_login == login)
                    .map(|_| tracking)
            }
            None => None,
        };
        session.commit().await?;

        match visible {
            Some(tracking) => self.print_tracking(&tracking),
            None => self.term.write_line("Tracking record not found."),
        }
    }

    pub(super) async fn update_tracking_info(&mut self, login: &str) -> RentalResult<()> {
        self.term
            .write_line("You have selected: Update Tracking Information")?;
        self.require(login, Role::can_update_tracking, "update tracking information")
            .await?;

        let tracking_id = ask(&mut self.term, "Please enter trackingID: ")?;
        self.term.write_line("Leave a field blank to keep its current value.")?;
        let update = TrackingUpdate {
            status: self.ask_tracking_field("New status: ", MAX_STATUS_LEN)?,
            current_location: self.ask_tracking_field("New current location: ", MAX_LOCATION_LEN)?,
            courier: self.ask_tracking_field("New courier: ", MAX_COURIER_LEN)?,
        };
        if update.is_empty() {
            return self.term.write_line("Nothing to update.");
        }

        let session = self.uow.begin().await?;
        let audit = AuditTrail::new();
        session.register_transaction_aware(audit.clone());
        let tracking = TrackingRepository::new(session.executor().clone())
            .update(&tracking_id, &update, Utc::now())
            .await?;
        audit.record(format!(
            "tracking {} updated by {}: {} at {}",
            tracking.tracking_id, login, tracking.status, tracking.current_location
        ));
        session.commit().await?;

        self.term.write_line("Tracking information updated")?;
        self.print_tracking(&tracking)
    }
}
