//! Menu-driven operator console.
//!
//! Every screen runs its storage work in short units of work and reports
//! failures on the terminal without leaving the menu loop. Only a closed
//! input stream ends the session.

mod account;
mod catalog;
mod orders;
mod profile;
pub mod prompt;
mod terminal;
mod tracking;
mod users;

use tracing::{error, info, warn};

use crate::model::Role;
use crate::repository::{PgCheckoutStore, UserRepository};
use crate::{PostgresUnitOfWork, RentalError, RentalResult, UnitOfWork, UnitOfWorkSession};

use prompt::{banner, read_choice};
pub use terminal::{LineTerminal, Terminal};

pub struct Shell<T> {
    term: T,
    uow: PostgresUnitOfWork,
    checkout: PgCheckoutStore,
}

impl<T: Terminal> Shell<T> {
    pub fn new(term: T, uow: PostgresUnitOfWork) -> Self {
        let checkout = PgCheckoutStore::new(uow.clone());
        Self {
            term,
            uow,
            checkout,
        }
    }

    pub fn terminal(&self) -> &T {
        &self.term
    }

    /// Runs the main menu until the operator exits or input ends.
    pub async fn run(&mut self) -> RentalResult<()> {
        banner(&mut self.term, "User Interface")?;
        match self.main_menu().await {
            Err(RentalError::InputClosed) => {
                info!("input closed, ending session");
                Ok(())
            }
            other => other,
        }
    }

    async fn main_menu(&mut self) -> RentalResult<()> {
        loop {
            self.menu("MAIN MENU", &["1. Create user", "2. Log in", "9. < EXIT"])?;
            match read_choice(&mut self.term)? {
                1 => {
                    let result = self.create_user().await;
                    self.report(result)?;
                }
                2 => match self.log_in().await {
                    Ok(Some(login)) => self.user_menu(&login).await?,
                    Ok(None) => {}
                    Err(e) => self.report(Err(e))?,
                },
                9 => return Ok(()),
                _ => self.term.write_line("Unrecognized choice!")?,
            }
        }
    }

    async fn user_menu(&mut self, login: &str) -> RentalResult<()> {
        info!(%login, "user logged in");
        loop {
            self.menu(
                "MAIN MENU",
                &[
                    "1. View Profile",
                    "2. Update Profile",
                    "3. View Catalog",
                    "4. Place Rental Order",
                    "5. View Full Rental Order History",
                    "6. View Past 5 Rental Orders",
                    "7. View Rental Order Information",
                    "8. View Tracking Information",
                    "9. Update Tracking Information",
                    "10. Update Catalog",
                    "11. Update User",
                    ".........................",
                    "20. Log out",
                ],
            )?;
            let result = match read_choice(&mut self.term)? {
                1 => self.view_profile(login).await,
                2 => self.update_profile(login).await,
                3 => self.browse_catalog().await,
                4 => self.place_order(login).await,
                5 => self.view_order_history(login, None).await,
                6 => self.view_order_history(login, Some(5)).await,
                7 => self.view_order_info(login).await,
                8 => self.view_tracking_info(login).await,
                9 => self.update_tracking_info(login).await,
                10 => self.update_catalog(login).await,
                11 => self.update_user(login).await,
                20 => {
                    info!(%login, "user logged out");
                    return Ok(());
                }
                _ => self.term.write_line("Unrecognized choice!"),
            };
            self.report(result)?;
        }
    }

    fn menu(&mut self, title: &str, items: &[&str]) -> RentalResult<()> {
        self.term.write_line(title)?;
        self.term.write_line(&"-".repeat(title.len()))?;
        for item in items {
            self.term.write_line(item)?;
        }
        Ok(())
    }

    /// Prints a failed screen's error and keeps the session going.
    fn report(&mut self, result: RentalResult<()>) -> RentalResult<()> {
        match result {
            Ok(()) => Ok(()),
            Err(RentalError::InputClosed) => Err(RentalError::InputClosed),
            Err(e @ RentalError::Unauthorized { .. }) => {
                warn!("{}", e);
                self.term.write_line(&e.to_string())?;
                self.term.write_line("Returning to Main Menu...")
            }
            Err(e) => {
                error!("{}", e);
                self.term.write_line(&format!("Error: {e}"))
            }
        }
    }

    /// Current role of `login`, read from storage rather than cached at login.
    async fn role_of(&self, login: &str) -> RentalResult<Role> {
        let session = self.uow.begin().await?;
        let role = UserRepository::new(session.executor().clone())
            .role_of(login)
            .await?;
        session.commit().await?;
        role.ok_or_else(|| RentalError::not_found("User", login))
    }

    async fn require(
        &self,
        login: &str,
        allowed: fn(&Role) -> bool,
        action: &'static str,
    ) -> RentalResult<Role> {
        let role = self.role_of(login).await?;
        if allowed(&role) {
            Ok(role)
        } else {
            Err(RentalError::Unauthorized { action })
        }
    }
}
