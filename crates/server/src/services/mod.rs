//! Application services.
//!
//! Services validate input, run the domain workflows, and translate
//! repository outcomes into application errors. They borrow the pool via
//! the repositories and hold no state of their own.

pub mod auth;
pub mod catalog;
pub mod orders;

pub use auth::AuthService;
pub use catalog::CatalogService;
pub use orders::OrderService;
