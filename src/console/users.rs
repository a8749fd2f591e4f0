use crate::audit::AuditTrail;
use crate::model::Role;
use crate::repository::UserRepository;
use crate::validate::parse_count;
use crate::{RentalResult, UnitOfWork, UnitOfWorkSession};

use super::prompt::{ask, ask_valid, banner, read_choice};
use super::{Shell, Terminal};

impl<T: Terminal> Shell<T> {
    /// Manager screen for changing another account's role or overdue count.
    pub(super) async fn update_user(&mut self, login: &str) -> RentalResult<()> {
        self.term.write_line("You have selected: Update User")?;
        self.require(login, Role::can_manage_store, "update users")
            .await?;

        let target = loop {
            let target = ask(
                &mut self.term,
                "Please enter the username to update (blank to cancel): ",
            )?;
            if target.is_empty() {
                return self.term.write_line("Returning to Main Menu...");
            }
            if self.login_exists(&target).await? {
                break target;
            }
            self.term.write_line("Invalid Username")?;
        };

        loop {
            banner(&mut self.term, &format!("Update User: {target}"))?;
            self.menu(
                "USER OPTIONS",
                &[
                    "1. Change Role",
                    "2. Change Number of Overdue Games",
                    "9. Return to Main Menu",
                ],
            )?;
            let result = match read_choice(&mut self.term)? {
                1 => self.change_role(login, &target).await,
                2 => self.change_overdue_count(login, &target).await,
                9 => return Ok(()),
                _ => self.term.write_line("Unrecognized choice!"),
            };
            self.report(result)?;
        }
    }

    async fn change_role(&mut self, manager: &str, target: &str) -> RentalResult<()> {
        let role: Role = ask_valid(
            &mut self.term,
            "Please enter new role (customer/employee/manager): ",
            "Invalid role",
            |s| s.parse().ok(),
        )?;

        let session = self.uow.begin().await?;
        let audit = AuditTrail::new();
        session.register_transaction_aware(audit.clone());
        UserRepository::new(session.executor().clone())
            .update_role(target, role)
            .await?;
        audit.record(format!("{manager} changed role of {target} to {role}"));
        session.commit().await?;

        self.term
            .write_line(&format!("Role of {target} changed to {role}"))
    }

    async fn change_overdue_count(&mut self, manager: &str, target: &str) -> RentalResult<()> {
        let count = ask_valid(
            &mut self.term,
            "Please enter number of overdue games: ",
            "Invalid input",
            parse_count,
        )?;

        let session = self.uow.begin().await?;
        let audit = AuditTrail::new();
        session.register_transaction_aware(audit.clone());
        UserRepository::new(session.executor().clone())
            .update_overdue_count(target, count)
            .await?;
        audit.record(format!(
            "{manager} set overdue games of {target} to {count}"
        ));
        session.commit().await?;

        self.term
            .write_line(&format!("Overdue games of {target} set to {count}"))
    }
}
