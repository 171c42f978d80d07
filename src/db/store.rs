//! Metadata store abstraction and its SQLite implementation.
//!
//! A [`UnitOfWork`] scopes a batch of staged inserts/updates behind a single
//! commit point: nothing staged becomes durable until [`UnitOfWork::commit`]
//! succeeds, and a dropped unit of work rolls everything back. Uniqueness
//! (file name per owner, global storage path) is enforced here at commit
//! scope, not pre-checked by callers.

use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::file::{FileRecord, NewFileRecord};
use super::user::{NewUser, User};
use super::Database;
use crate::{DepotError, Result};

/// A scoped batch of metadata reads and staged writes.
///
/// Identifiers are assigned when the write is staged but only become durable
/// on commit. Timestamps are maintained by the store: `created_at` is set
/// once when a record is inserted, `updated_at` on every insert or update.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Look up a user by exact username.
    async fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>>;

    /// Look up a file by id, scoped to its owner.
    ///
    /// Never returns a file belonging to a different owner, even if the id
    /// matches; matching is by exact username equality.
    async fn find_file_by_id_and_owner(
        &mut self,
        id: i64,
        username: &str,
    ) -> Result<Option<FileRecord>>;

    /// List all files owned by the given user.
    async fn list_files_by_owner(&mut self, username: &str) -> Result<Vec<FileRecord>>;

    /// Stage the insert of a new file record, returning it with its id.
    async fn insert_file(&mut self, file: NewFileRecord) -> Result<FileRecord>;

    /// Stage an in-place update of a previously fetched file record.
    ///
    /// The owning user is immutable and never updated.
    async fn update_file(&mut self, file: &FileRecord) -> Result<()>;

    /// Stage the insert of a new user, returning it with its id.
    async fn insert_user(&mut self, user: NewUser) -> Result<User>;

    /// Make all staged changes durable.
    ///
    /// Returns the number of affected rows. On failure (`Conflict`,
    /// `Persistence` or `Canceled`) no staged change is applied.
    async fn commit(self) -> Result<u64>;
}

/// Factory for units of work.
#[async_trait]
pub trait Store: Send + Sync {
    /// The unit-of-work type produced by this store.
    type Uow: UnitOfWork;

    /// Begin a new unit of work.
    async fn begin(&self) -> Result<Self::Uow>;
}

/// Map a sqlx error to the store's failure taxonomy.
///
/// Constraint violations (unique file name per owner, unique storage path)
/// are conflicts; anything else is a persistence failure.
fn map_store_error(e: sqlx::Error) -> DepotError {
    match &e {
        sqlx::Error::Database(db)
            if db.is_unique_violation()
                || db.is_foreign_key_violation()
                || db.is_check_violation() =>
        {
            DepotError::Conflict(db.message().to_string())
        }
        _ => DepotError::Persistence(e.to_string()),
    }
}

/// SQLite-backed [`Store`].
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a store over the given database.
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }
}

#[async_trait]
impl Store for SqliteStore {
    type Uow = SqliteUnitOfWork;

    async fn begin(&self) -> Result<Self::Uow> {
        let tx = self.pool.begin().await.map_err(map_store_error)?;
        Ok(SqliteUnitOfWork {
            tx,
            rows_affected: 0,
        })
    }
}

/// SQLite-backed [`UnitOfWork`] over a single transaction.
pub struct SqliteUnitOfWork {
    tx: Transaction<'static, Sqlite>,
    rows_affected: u64,
}

const FILE_COLUMNS: &str =
    "f.id, f.file_name, f.content_type, f.storage_path, f.user_id, f.created_at, f.updated_at";

#[async_trait]
impl UnitOfWork for SqliteUnitOfWork {
    async fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password, created_at, updated_at
             FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_store_error)?;

        Ok(user)
    }

    async fn find_file_by_id_and_owner(
        &mut self,
        id: i64,
        username: &str,
    ) -> Result<Option<FileRecord>> {
        let file = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS}
             FROM files f JOIN users u ON u.id = f.user_id
             WHERE f.id = ? AND u.username = ?"
        ))
        .bind(id)
        .bind(username)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_store_error)?;

        Ok(file)
    }

    async fn list_files_by_owner(&mut self, username: &str) -> Result<Vec<FileRecord>> {
        let files = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS}
             FROM files f JOIN users u ON u.id = f.user_id
             WHERE u.username = ?
             ORDER BY f.created_at DESC, f.id DESC"
        ))
        .bind(username)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_store_error)?;

        Ok(files)
    }

    async fn insert_file(&mut self, file: NewFileRecord) -> Result<FileRecord> {
        let result = sqlx::query(
            "INSERT INTO files (file_name, content_type, storage_path, user_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, datetime('now'), datetime('now'))",
        )
        .bind(&file.file_name)
        .bind(&file.content_type)
        .bind(&file.storage_path)
        .bind(file.user_id)
        .execute(&mut *self.tx)
        .await
        .map_err(map_store_error)?;

        self.rows_affected += result.rows_affected();
        let id = result.last_insert_rowid();

        let record = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM files f WHERE f.id = ?"
        ))
        .bind(id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_store_error)?;

        Ok(record)
    }

    async fn update_file(&mut self, file: &FileRecord) -> Result<()> {
        let result = sqlx::query(
            "UPDATE files
             SET file_name = ?, content_type = ?, storage_path = ?, updated_at = datetime('now')
             WHERE id = ?",
        )
        .bind(&file.file_name)
        .bind(&file.content_type)
        .bind(&file.storage_path)
        .bind(file.id)
        .execute(&mut *self.tx)
        .await
        .map_err(map_store_error)?;

        if result.rows_affected() == 0 {
            return Err(DepotError::NotFound("file".to_string()));
        }

        self.rows_affected += result.rows_affected();
        Ok(())
    }

    async fn insert_user(&mut self, user: NewUser) -> Result<User> {
        let result = sqlx::query(
            "INSERT INTO users (username, password, created_at, updated_at)
             VALUES (?, ?, datetime('now'), datetime('now'))",
        )
        .bind(&user.username)
        .bind(&user.password)
        .execute(&mut *self.tx)
        .await
        .map_err(map_store_error)?;

        self.rows_affected += result.rows_affected();
        let id = result.last_insert_rowid();

        let record = sqlx::query_as::<_, User>(
            "SELECT id, username, password, created_at, updated_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_store_error)?;

        Ok(record)
    }

    async fn commit(self) -> Result<u64> {
        self.tx.commit().await.map_err(map_store_error)?;
        Ok(self.rows_affected)
    }
}
