//! Credential handling for filedepot.
//!
//! Passwords are stored as salted Argon2id hashes in PHC string format.

mod password;

pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
