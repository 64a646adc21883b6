//! Domain models.
//!
//! These types represent validated domain objects separate from database
//! row types and request payloads.

pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use order::{Order, OrderPage};
pub use product::Product;
pub use session::{CurrentUser, session_keys};
pub use user::{User, UserProfile};
