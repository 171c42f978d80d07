//! User record types.

use chrono::NaiveDateTime;

/// Maximum length for a username (in characters).
pub const MAX_USERNAME_LENGTH: usize = 100;

/// A registered user.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Login username (unique).
    pub username: String,
    /// Password hash (Argon2, PHC string).
    pub password: String,
    /// When the user was created (UTC).
    pub created_at: NaiveDateTime,
    /// When the user was last updated (UTC).
    pub updated_at: NaiveDateTime,
}

/// Data for creating a new user.
///
/// Timestamps and the id are assigned by the store when the unit of work
/// commits.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login username.
    pub username: String,
    /// Password hash (already hashed, never plaintext).
    pub password: String,
}

impl NewUser {
    /// Create a new NewUser.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}
