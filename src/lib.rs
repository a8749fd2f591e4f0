//! Game Rental Store
//!
//! Console front-end for a video game rental store backed by PostgreSQL.
//! Every multi-statement operation, most importantly rental order checkout,
//! runs inside one unit of work so it is stored completely or not at all.

pub mod audit;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod console;
pub mod error;
pub mod executor;
pub mod ids;
pub mod model;
pub mod repository;
pub mod schema;
pub mod transaction_aware;
pub mod unit_of_work;
pub mod validate;

pub use error::{RentalError, RentalResult};
pub use executor::Executor;
pub use transaction_aware::TransactionAware;
pub use unit_of_work::{PostgresUnitOfWork, PostgresUnitOfWorkSession, UnitOfWork, UnitOfWorkSession};
