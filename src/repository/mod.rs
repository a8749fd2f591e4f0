//! Parameterized table accessors. Each repository is bound to the executor
//! of one unit of work.

pub mod catalog;
pub mod checkout;
pub mod orders;
pub mod tracking;
pub mod users;

pub use catalog::{CatalogRepository, CatalogText};
pub use checkout::PgCheckoutStore;
pub use orders::RentalOrderRepository;
pub use tracking::TrackingRepository;
pub use users::UserRepository;
