//! Identity service: registration and login.

use tracing::info;

use crate::auth::{hash_password, verify_password};
use crate::db::{NewUser, Store, UnitOfWork, User, MAX_USERNAME_LENGTH};
use crate::{DepotError, Result};

/// Service for user registration and credential checks.
pub struct UserService<S> {
    store: S,
}

impl<S: Store> UserService<S> {
    /// Create a new UserService over a metadata store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Register a new user.
    ///
    /// The password is stored as a salted Argon2id hash, never as
    /// plaintext. Fails with `AlreadyRegistered` if the username is taken.
    pub async fn register(&self, username: &str, password: &str) -> Result<User> {
        validate_username(username)?;

        let mut uow = self.store.begin().await?;

        if uow.find_user_by_username(username).await?.is_some() {
            return Err(DepotError::AlreadyRegistered(username.to_string()));
        }

        let password_hash = hash_password(password)?;

        let user = uow.insert_user(NewUser::new(username, password_hash)).await?;
        uow.commit().await?;

        info!("registered user {} (id {})", user.username, user.id);
        Ok(user)
    }

    /// Check a user's credentials.
    ///
    /// Fails with `InvalidCredentials` if no such user exists; a wrong
    /// password for an existing user is `Ok(false)`, not an error.
    pub async fn login(&self, username: &str, password: &str) -> Result<bool> {
        let mut uow = self.store.begin().await?;

        let user = uow
            .find_user_by_username(username)
            .await?
            .ok_or(DepotError::InvalidCredentials)?;

        Ok(verify_password(password, &user.password)?)
    }
}

fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() || username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(DepotError::Validation(format!(
            "username must be 1 to {MAX_USERNAME_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::PasswordError;
    use crate::db::{Database, SqliteStore};

    async fn setup() -> UserService<SqliteStore> {
        let db = Database::open_in_memory().await.unwrap();
        UserService::new(SqliteStore::new(&db))
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let users = setup().await;

        let user = users.register("alice", "password123").await.unwrap();
        assert!(user.id > 0);
        assert_eq!(user.username, "alice");
        // Stored as a hash, not plaintext
        assert!(user.password.starts_with("$argon2id$"));

        assert!(users.login("alice", "password123").await.unwrap());
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_false() {
        let users = setup().await;
        users.register("alice", "password123").await.unwrap();

        // A mismatch is a negative answer, not an error
        assert!(!users.login("alice", "wrong_password").await.unwrap());
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let users = setup().await;

        let result = users.login("ghost", "password123").await;
        assert!(matches!(result, Err(DepotError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let users = setup().await;
        users.register("alice", "password123").await.unwrap();

        let result = users.register("alice", "otherpassword").await;
        assert!(matches!(result, Err(DepotError::AlreadyRegistered(name)) if name == "alice"));
    }

    #[tokio::test]
    async fn test_register_invalid_username() {
        let users = setup().await;

        let result = users.register("", "password123").await;
        assert!(matches!(result, Err(DepotError::Validation(_))));

        let long = "a".repeat(101);
        let result = users.register(&long, "password123").await;
        assert!(matches!(result, Err(DepotError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_short_password() {
        let users = setup().await;

        let result = users.register("alice", "short").await;
        assert!(matches!(
            result,
            Err(DepotError::Password(PasswordError::TooShort))
        ));
    }
}
