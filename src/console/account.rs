use tracing::info;

use crate::audit::AuditTrail;
use crate::model::User;
use crate::repository::UserRepository;
use crate::validate::{
    full_phone_number, is_valid_login, is_valid_password, is_valid_phone, MAX_LOGIN_LEN,
    MAX_PASSWORD_LEN,
};
use crate::{RentalResult, UnitOfWork, UnitOfWorkSession};

use super::prompt::{ask, ask_valid, banner};
use super::{Shell, Terminal};

impl<T: Terminal> Shell<T> {
    /// Registers a customer account.
    pub(super) async fn create_user(&mut self) -> RentalResult<()> {
        banner(&mut self.term, "Create New User")?;

        self.term.write_line("Username Selection")?;
        self.term.write_line(&format!(
            "Usernames should be no longer than {MAX_LOGIN_LEN} characters."
        ))?;
        let login = loop {
            let login = ask(&mut self.term, "Please enter your username: ")?;
            if is_valid_login(&login) && !self.login_exists(&login).await? {
                break login;
            }
            self.term.write_line("Invalid Username")?;
        };

        self.term.write_line("Set Your Password")?;
        self.term.write_line(&format!(
            "Passwords should be no longer than {MAX_PASSWORD_LEN} characters."
        ))?;
        let password = ask_valid(
            &mut self.term,
            "Please enter your password: ",
            "Invalid Password",
            |s| is_valid_password(s).then(|| s.to_string()),
        )?;

        self.term.write_line("Contact Information")?;
        let phone = ask_valid(
            &mut self.term,
            "Please enter your phone number (123-456-7890): ",
            "Invalid Phone Number",
            |s| is_valid_phone(s).then(|| full_phone_number(s)),
        )?;

        let user = User::customer(login, password, phone);
        let session = self.uow.begin().await?;
        let audit = AuditTrail::new();
        session.register_transaction_aware(audit.clone());
        UserRepository::new(session.executor().clone())
            .create(&user)
            .await?;
        audit.record(format!("account {} registered", user.login));
        session.commit().await?;

        self.term.write_line("Account Created Successfully")?;
        self.term.write_line("Returning to Main Menu...")
    }

    pub(super) async fn login_exists(&self, login: &str) -> RentalResult<bool> {
        let session = self.uow.begin().await?;
        let exists = UserRepository::new(session.executor().clone())
            .exists(login)
            .await?;
        session.commit().await?;
        Ok(exists)
    }

    /// Returns the login of the authenticated user, or `None` on a mismatch.
    pub(super) async fn log_in(&mut self) -> RentalResult<Option<String>> {
        banner(&mut self.term, "Log In")?;
        let login = ask(&mut self.term, "Please enter your username: ")?;
        let password = ask(&mut self.term, "Please enter your password: ")?;

        let session = self.uow.begin().await?;
        let user = UserRepository::new(session.executor().clone())
            .authenticate(&login, &password)
            .await?;
        session.commit().await?;

        match user {
            Some(user) => Ok(Some(user.login)),
            None => {
                info!(%login, "rejected login");
                self.term.write_line("Incorrect username or password.")?;
                self.term.write_line("Returning to main menu.")?;
                Ok(None)
            }
        }
    }
}
