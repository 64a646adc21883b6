//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use stockroom_core::{Email, Role, UserId};

/// A registered user (domain type).
///
/// The password hash is stored in the `users` table but lives outside
/// this type; it is only surfaced by the credential lookup used for login
/// and never serialized.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address (lowercased, unique).
    pub email: Email,
    /// Authorization role.
    pub role: Role,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

/// Public profile returned by the API. Never includes credentials.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}
