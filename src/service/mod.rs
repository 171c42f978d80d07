//! Service layer for filedepot.
//!
//! [`FileService`] orchestrates the metadata store and the filesystem
//! gateway to implement the file lifecycle (create, update, list, content)
//! with dual-write consistency; [`UserService`] handles registration and
//! login.

mod files;
mod users;

pub use files::{FileContent, FileService, FileSummary, FileUpload};
pub use users::UserService;
