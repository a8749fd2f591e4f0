use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

use crate::RentalError;

/// Access level of a store account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Customer,
    Employee,
    Manager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Employee => "employee",
            Role::Manager => "manager",
        }
    }

    /// Employees and managers move orders through shipping.
    pub fn can_update_tracking(&self) -> bool {
        matches!(self, Role::Employee | Role::Manager)
    }

    pub fn can_manage_store(&self) -> bool {
        matches!(self, Role::Manager)
    }

    /// Whether this role may look at orders placed by other customers.
    pub fn can_view_any_order(&self) -> bool {
        matches!(self, Role::Employee | Role::Manager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(Role::Customer),
            "employee" => Ok(Role::Employee),
            "manager" => Ok(Role::Manager),
            other => Err(RentalError::InvalidInput(format!("unknown role '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub login: String,
    pub password: String,
    pub role: Role,
    pub favorite_games: Option<String>,
    pub phone_number: String,
    pub overdue_count: i32,
}

impl User {
    /// A freshly registered account: customer role, no favourites, nothing overdue.
    pub fn customer(login: String, password: String, phone_number: String) -> Self {
        Self {
            login,
            password,
            role: Role::Customer,
            favorite_games: None,
            phone_number,
            overdue_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub game_id: String,
    pub name: String,
    pub genre: String,
    pub price: Decimal,
    pub description: String,
    pub image_url: String,
}

/// Catalog fields supplied by a manager; the game ID is allocated on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCatalogEntry {
    pub name: String,
    pub genre: String,
    pub price: Decimal,
    pub description: String,
    pub image_url: String,
}

impl NewCatalogEntry {
    pub fn with_id(self, game_id: String) -> CatalogEntry {
        CatalogEntry {
            game_id,
            name: self.name,
            genre: self.genre,
            price: self.price,
            description: self.description,
            image_url: self.image_url,
        }
    }
}

/// Price ordering used when browsing the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceOrder {
    Ascending,
    #[default]
    Descending,
}

impl PriceOrder {
    pub fn toggled(self) -> Self {
        match self {
            PriceOrder::Ascending => PriceOrder::Descending,
            PriceOrder::Descending => PriceOrder::Ascending,
        }
    }
}

/// Browse filter for the catalog screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilter {
    pub genre: Option<String>,
    /// Only games strictly cheaper than this.
    pub max_price: Option<Decimal>,
    pub order: PriceOrder,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RentalOrder {
    pub rental_order_id: String,
    pub customer_login: String,
    pub total_copies: i64,
    pub total_price: Decimal,
    pub ordered_at: DateTime<Utc>,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub rental_order_id: String,
    pub game_id: String,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackingInfo {
    pub tracking_id: String,
    pub rental_order_id: String,
    pub status: String,
    pub current_location: String,
    pub courier: String,
    pub last_updated_at: DateTime<Utc>,
}

/// Fields an employee may change on a tracking record; `None` keeps the
/// stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackingUpdate {
    pub status: Option<String>,
    pub current_location: Option<String>,
    pub courier: Option<String>,
}

impl TrackingUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.current_location.is_none() && self.courier.is_none()
    }
}
