use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::model::{Role, User};
use crate::{Executor, RentalError, RentalResult};

const USER_COLUMNS: &str =
    "login, password, role, favorite_games, phone_number, overdue_count";

/// Accounts table accessor bound to one unit of work.
pub struct UserRepository {
    executor: Executor,
}

fn user_from_row(row: &PgRow) -> RentalResult<User> {
    let role: String = row.get("role");
    Ok(User {
        login: row.get("login"),
        password: row.get("password"),
        role: role.parse()?,
        favorite_games: row.get("favorite_games"),
        phone_number: row.get("phone_number"),
        overdue_count: row.get("overdue_count"),
    })
}

impl UserRepository {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    pub async fn create(&self, user: &User) -> RentalResult<()> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        sqlx::query(
            "INSERT INTO users (login, password, role, favorite_games, phone_number, overdue_count) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&user.login)
        .bind(&user.password)
        .bind(user.role.as_str())
        .bind(&user.favorite_games)
        .bind(&user.phone_number)
        .bind(user.overdue_count)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn find(&self, login: &str) -> RentalResult<Option<User>> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE login = $1"))
            .bind(login)
            .fetch_optional(&mut **tx)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    pub async fn exists(&self, login: &str) -> RentalResult<bool> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        let row = sqlx::query("SELECT EXISTS (SELECT 1 FROM users WHERE login = $1) AS found")
            .bind(login)
            .fetch_one(&mut **tx)
            .await?;
        Ok(row.get("found"))
    }

    /// The account matching both login and password. Passwords are stored
    /// and compared as plain text.
    pub async fn authenticate(&self, login: &str, password: &str) -> RentalResult<Option<User>> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE login = $1 AND password = $2"
        ))
        .bind(login)
        .bind(password)
        .fetch_optional(&mut **tx)
        .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    pub async fn role_of(&self, login: &str) -> RentalResult<Option<Role>> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        let row = sqlx::query("SELECT role FROM users WHERE login = $1")
            .bind(login)
            .fetch_optional(&mut **tx)
            .await?;
        row.map(|r| r.get::<String, _>("role").parse()).transpose()
    }

    pub async fn list(&self) -> RentalResult<Vec<User>> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY login"))
            .fetch_all(&mut **tx)
            .await?;
        rows.iter().map(user_from_row).collect()
    }

    pub async fn update_password(&self, login: &str, password: &str) -> RentalResult<()> {
        self.update_text("password", login, Some(password)).await
    }

    pub async fn update_phone(&self, login: &str, phone_number: &str) -> RentalResult<()> {
        self.update_text("phone_number", login, Some(phone_number)).await
    }

    /// `None` clears the list.
    pub async fn update_favorite_games(&self, login: &str, games: Option<&str>) -> RentalResult<()> {
        self.update_text("favorite_games", login, games).await
    }

    pub async fn update_role(&self, login: &str, role: Role) -> RentalResult<()> {
        self.update_text("role", login, Some(role.as_str())).await
    }

    pub async fn update_overdue_count(&self, login: &str, overdue_count: i32) -> RentalResult<()> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        let result = sqlx::query("UPDATE users SET overdue_count = $1 WHERE login = $2")
            .bind(overdue_count)
            .bind(login)
            .execute(&mut **tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RentalError::not_found("User", login));
        }
        Ok(())
    }

    async fn update_text(&self, column: &'static str, login: &str, value: Option<&str>) -> RentalResult<()> {
        let mut guard = self.executor.lock().await;
        let tx = guard.transaction()?;
        let result = sqlx::query(&format!("UPDATE users SET {column} = $1 WHERE login = $2"))
            .bind(value)
            .bind(login)
            .execute(&mut **tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RentalError::not_found("User", login));
        }
        Ok(())
    }
}
