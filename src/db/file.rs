//! File metadata record types.

use chrono::NaiveDateTime;

/// Maximum length for a file name (in characters).
pub const MAX_FILE_NAME_LENGTH: usize = 100;

/// Maximum length for a MIME content type (in characters).
pub const MAX_CONTENT_TYPE_LENGTH: usize = 20;

/// Maximum length for a storage path (in characters).
pub const MAX_STORAGE_PATH_LENGTH: usize = 256;

/// Metadata for a stored file.
///
/// The on-disk content lives at `storage_path`; after any completed
/// operation either both this record and the bytes exist, or neither does.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FileRecord {
    /// Unique file ID.
    pub id: i64,
    /// File name (unique per owning user).
    pub file_name: String,
    /// MIME content type.
    pub content_type: String,
    /// Where the content is physically stored (globally unique).
    pub storage_path: String,
    /// Owning user's id. Immutable once set.
    pub user_id: i64,
    /// When the record was created (UTC).
    pub created_at: NaiveDateTime,
    /// When the record was last updated (UTC).
    pub updated_at: NaiveDateTime,
}

/// Data for creating a new file record.
///
/// The id and timestamps are assigned by the store when the unit of work
/// commits.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    /// File name (already sanitized).
    pub file_name: String,
    /// MIME content type.
    pub content_type: String,
    /// Computed storage path.
    pub storage_path: String,
    /// Owning user's id.
    pub user_id: i64,
}

impl NewFileRecord {
    /// Create a new NewFileRecord.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        storage_path: impl Into<String>,
        user_id: i64,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            storage_path: storage_path.into(),
            user_id,
        }
    }
}
