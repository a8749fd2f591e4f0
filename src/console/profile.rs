use crate::repository::UserRepository;
use crate::validate::{
    full_phone_number, is_valid_password, is_valid_phone, parse_count, MAX_PASSWORD_LEN,
};
use crate::{RentalError, RentalResult, UnitOfWork, UnitOfWorkSession};

use super::prompt::{ask, ask_twice, ask_valid, banner, read_choice};
use super::{Shell, Terminal};

impl<T: Terminal> Shell<T> {
    pub(super) async fn view_profile(&mut self, login: &str) -> RentalResult<()> {
        let session = self.uow.begin().await?;
        let user = UserRepository::new(session.executor().clone())
            .find(login)
            .await?
            .ok_or_else(|| RentalError::not_found("User", login))?;
        session.commit().await?;

        banner(&mut self.term, "User Profile")?;
        self.term.write_line(&format!("Username: {}", user.login))?;
        self.term.write_line(&format!("Role: {}", user.role))?;
        self.term.write_line(&format!(
            "Favorite Games: {}",
            user.favorite_games.as_deref().unwrap_or("")
        ))?;
        self.term
            .write_line(&format!("Phone Number: {}", user.phone_number))?;
        self.term
            .write_line(&format!("# of Overdue Games: {}", user.overdue_count))
    }

    pub(super) async fn update_profile(&mut self, login: &str) -> RentalResult<()> {
        loop {
            banner(&mut self.term, "Update Profile")?;
            self.menu(
                "PROFILE SETTINGS",
                &[
                    "1. Change Password",
                    "2. Change Phone Number",
                    "3. Change Favorite Games",
                    "9. Return to Main Menu",
                ],
            )?;
            let result = match read_choice(&mut self.term)? {
                1 => self.change_password(login).await,
                2 => self.change_phone_number(login).await,
                3 => self.change_favorite_games(login).await,
                9 => return Ok(()),
                _ => self.term.write_line("Unrecognized choice!"),
            };
            self.report(result)?;
        }
    }

    async fn change_password(&mut self, login: &str) -> RentalResult<()> {
        self.term.write_line("You have selected: Change Password")?;
        self.term.write_line(&format!(
            "Passwords should be no longer than {MAX_PASSWORD_LEN} characters."
        ))?;
        let password = ask_twice(
            &mut self.term,
            "Please enter new password: ",
            "Please confirm password: ",
            "Invalid Password",
            |s| is_valid_password(s).then(|| s.to_string()),
        )?;
        let Some(password) = password else {
            return self.term.write_line("Returning to Profile Settings...");
        };

        let session = self.uow.begin().await?;
        UserRepository::new(session.executor().clone())
            .update_password(login, &password)
            .await?;
        session.commit().await?;
        self.term.write_line("Password changed successfully")
    }

    async fn change_phone_number(&mut self, login: &str) -> RentalResult<()> {
        self.term.write_line("You have selected: Change Phone Number")?;
        let phone = ask_twice(
            &mut self.term,
            "Please enter new phone number (123-456-7890): ",
            "Please confirm your phone number: ",
            "Invalid phone number",
            |s| is_valid_phone(s).then(|| full_phone_number(s)),
        )?;
        let Some(phone) = phone else {
            return self.term.write_line("Returning to Profile Settings...");
        };

        let session = self.uow.begin().await?;
        UserRepository::new(session.executor().clone())
            .update_phone(login, &phone)
            .await?;
        session.commit().await?;
        self.term.write_line("Phone number changed successfully")?;
        self.term.write_line(&format!("New phone number: {phone}"))
    }

    async fn change_favorite_games(&mut self, login: &str) -> RentalResult<()> {
        self.term.write_line("You have selected: Change Favorite Games")?;
        let count = ask_valid(
            &mut self.term,
            "Please enter total number of favorite games (0 to clear): ",
            "Invalid input",
            parse_count,
        )?;

        let mut games = Vec::new();
        for _ in 0..count {
            let game = ask(&mut self.term, "Please enter game: ")?;
            if !game.is_empty() {
                games.push(game);
            }
        }
        let games = (!games.is_empty()).then(|| games.join(", "));

        let session = self.uow.begin().await?;
        UserRepository::new(session.executor().clone())
            .update_favorite_games(login, games.as_deref())
            .await?;
        session.commit().await?;
        self.term.write_line("Favorite games changed successfully")?;
        self.term.write_line(&format!(
            "Favorite Games: {}",
            games.as_deref().unwrap_or("")
        ))
    }
}
