//! filedepot - multi-user file upload service core.
//!
//! Users register and authenticate, then upload, replace, list and download
//! files. File content is persisted on the filesystem and metadata in
//! SQLite; the service layer keeps the two consistent with ordered writes
//! and compensating deletes. The HTTP surface that would sit on top is out
//! of scope for this crate.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod service;
pub mod storage;

pub use auth::{hash_password, validate_password, verify_password, PasswordError};
pub use config::{Config, DatabaseConfig, LoggingConfig, StorageConfig};
pub use db::{
    Database, FileRecord, NewFileRecord, NewUser, SqliteStore, Store, UnitOfWork, User,
};
pub use error::{DepotError, Result};
pub use service::{FileContent, FileService, FileSummary, FileUpload, UserService};
pub use storage::{sanitize_file_name, FileStore};
