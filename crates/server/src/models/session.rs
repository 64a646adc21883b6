//! Session principal types.
//!
//! The session registry binds an opaque cookie token to a [`CurrentUser`].
//! The principal is loaded once per request by the auth extractors and is
//! immutable for the duration of the request; login, register, and logout
//! replace it wholesale.

use serde::{Deserialize, Serialize};

use stockroom_core::{Email, Role, UserId};

use crate::models::user::User;

/// Session storage keys.
pub mod session_keys {
    /// Key under which the authenticated principal is stored.
    pub const CURRENT_USER: &str = "current_user";
}

/// The authenticated principal stored in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: Email,
    /// Authorization role.
    pub role: Role,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}
