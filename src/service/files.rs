//! File lifecycle service.
//!
//! Coordinates the filesystem gateway and the metadata store so that after
//! any completed operation either both the on-disk bytes and the metadata
//! row exist, or neither does. The filesystem and the database cannot be
//! committed atomically, so the orderings here matter:
//!
//! - create writes bytes *before* staging metadata, and compensates with a
//!   best-effort delete when the commit fails;
//! - update deletes replaced content only *after* a successful commit.

use tracing::{info, warn};

use crate::db::{
    NewFileRecord, Store, UnitOfWork, MAX_CONTENT_TYPE_LENGTH, MAX_FILE_NAME_LENGTH,
    MAX_STORAGE_PATH_LENGTH,
};
use crate::storage::{sanitize_file_name, FileStore};
use crate::{DepotError, Result};

/// A logical file supplied by a caller: name, MIME type and raw content.
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// Client-supplied file name (sanitized before use).
    pub file_name: String,
    /// MIME content type.
    pub content_type: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl FileUpload {
    /// Create a new upload.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Identifier and name of a stored file, as returned by mutations and
/// listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    /// Assigned file id.
    pub id: i64,
    /// Stored (sanitized) file name.
    pub file_name: String,
}

/// Full file payload, as returned by content reads.
#[derive(Debug, Clone)]
pub struct FileContent {
    /// File id.
    pub id: i64,
    /// Stored file name.
    pub file_name: String,
    /// MIME content type.
    pub content_type: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

/// Service for the file lifecycle: create, update, list, content.
///
/// Stateless between operations; all state lives in the metadata store and
/// on the filesystem, so a single instance may serve concurrent requests.
pub struct FileService<S> {
    store: S,
    storage: FileStore,
}

impl<S: Store> FileService<S> {
    /// Create a new FileService over a metadata store and a file store.
    pub fn new(store: S, storage: FileStore) -> Self {
        Self { store, storage }
    }

    /// Store a new file for `username`.
    ///
    /// Resolves the owner (`Unauthorized` for an unknown username), writes
    /// the bytes to the deterministic storage path, then commits the
    /// metadata row. If the commit fails the just-written bytes are removed
    /// before the failure propagates, so no row ever outlives its content
    /// and vice versa.
    pub async fn create_file(&self, upload: FileUpload, username: &str) -> Result<FileSummary> {
        let mut uow = self.store.begin().await?;

        let owner = uow
            .find_user_by_username(username)
            .await?
            .ok_or(DepotError::Unauthorized)?;

        let file_name = sanitize_file_name(&upload.file_name)?;
        validate_lengths(&file_name, &upload.content_type)?;

        let storage_path = self.resolve_path(owner.id, &file_name)?;

        // Bytes land on disk first: if this write fails, no metadata row is
        // ever created.
        self.storage.write(&storage_path, &upload.bytes).await?;

        let staged = NewFileRecord::new(
            file_name.as_str(),
            upload.content_type.as_str(),
            storage_path.as_str(),
            owner.id,
        );

        let committed = async {
            let record = uow.insert_file(staged).await?;
            uow.commit().await?;
            Ok::<_, DepotError>(record)
        }
        .await;

        match committed {
            Ok(record) => {
                info!(
                    "stored file {} (id {}) for user {}",
                    record.file_name, record.id, username
                );
                Ok(FileSummary {
                    id: record.id,
                    file_name: record.file_name,
                })
            }
            Err(e) => {
                if e.is_commit_failure() {
                    // Best-effort compensation; only the commit failure is
                    // surfaced.
                    if let Err(cleanup) = self.storage.delete_if_exists(&storage_path).await {
                        warn!(
                            "failed to remove {} after failed commit: {}",
                            storage_path, cleanup
                        );
                    }
                }
                Err(e)
            }
        }
    }

    /// Replace the content (and possibly name and type) of an existing
    /// file.
    ///
    /// The new bytes are always written, even when the storage path is
    /// unchanged, because the content may differ. The old path is deleted
    /// only after the commit succeeded and only if the path actually
    /// changed; on a failed commit nothing is deleted.
    pub async fn update_file(
        &self,
        file_id: i64,
        upload: FileUpload,
        username: &str,
    ) -> Result<FileSummary> {
        let mut uow = self.store.begin().await?;

        let mut record = uow
            .find_file_by_id_and_owner(file_id, username)
            .await?
            .ok_or_else(|| DepotError::NotFound("file".to_string()))?;

        let old_storage_path = record.storage_path.clone();

        let file_name = sanitize_file_name(&upload.file_name)?;
        validate_lengths(&file_name, &upload.content_type)?;

        record.file_name = file_name;
        record.content_type = upload.content_type;
        // Recomputed from the existing owner; ownership never changes here.
        record.storage_path = self.resolve_path(record.user_id, &record.file_name)?;

        self.storage.write(&record.storage_path, &upload.bytes).await?;

        uow.update_file(&record).await?;
        uow.commit().await?;

        if old_storage_path != record.storage_path {
            if let Err(cleanup) = self.storage.delete_if_exists(&old_storage_path).await {
                warn!(
                    "failed to remove replaced content at {}: {}",
                    old_storage_path, cleanup
                );
            }
        }

        info!(
            "updated file {} (id {}) for user {}",
            record.file_name, record.id, username
        );
        Ok(FileSummary {
            id: record.id,
            file_name: record.file_name,
        })
    }

    /// List the files owned by `username`.
    ///
    /// Pure projection; an unknown username yields an empty list.
    pub async fn list_files(&self, username: &str) -> Result<Vec<FileSummary>> {
        let mut uow = self.store.begin().await?;
        let files = uow.list_files_by_owner(username).await?;

        Ok(files
            .into_iter()
            .map(|f| FileSummary {
                id: f.id,
                file_name: f.file_name,
            })
            .collect())
    }

    /// Fetch the full content of a file owned by `username`.
    ///
    /// Metadata without bytes on disk is reported as `NotFound`, the same
    /// as a missing record: from the caller's perspective the artifact is
    /// not retrievable either way.
    pub async fn file_content(&self, file_id: i64, username: &str) -> Result<FileContent> {
        let mut uow = self.store.begin().await?;

        let record = uow
            .find_file_by_id_and_owner(file_id, username)
            .await?
            .ok_or_else(|| DepotError::NotFound("file".to_string()))?;

        if !self.storage.exists(&record.storage_path).await {
            return Err(DepotError::NotFound("file".to_string()));
        }

        let bytes = self.storage.read(&record.storage_path).await?;

        Ok(FileContent {
            id: record.id,
            file_name: record.file_name,
            content_type: record.content_type,
            bytes,
        })
    }

    /// Compute and validate the storage path for an owner and sanitized
    /// name.
    fn resolve_path(&self, user_id: i64, file_name: &str) -> Result<String> {
        let path = self
            .storage
            .resolve(user_id, file_name)
            .to_string_lossy()
            .into_owned();

        if path.chars().count() > MAX_STORAGE_PATH_LENGTH {
            return Err(DepotError::Validation(format!(
                "storage path exceeds {MAX_STORAGE_PATH_LENGTH} characters"
            )));
        }

        Ok(path)
    }
}

fn validate_lengths(file_name: &str, content_type: &str) -> Result<()> {
    if file_name.chars().count() > MAX_FILE_NAME_LENGTH {
        return Err(DepotError::Validation(format!(
            "file name exceeds {MAX_FILE_NAME_LENGTH} characters"
        )));
    }
    if content_type.is_empty() || content_type.chars().count() > MAX_CONTENT_TYPE_LENGTH {
        return Err(DepotError::Validation(format!(
            "content type must be 1 to {MAX_CONTENT_TYPE_LENGTH} characters"
        )));
    }
    Ok(())
}
