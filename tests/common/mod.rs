//! Shared setup helpers for integration tests.

use tempfile::TempDir;

use filedepot::{Database, FileService, FileStore, SqliteStore, UserService};

/// A fully wired depot over an in-memory database and a temporary storage
/// directory.
pub struct TestDepot {
    /// Storage directory; dropped last, removing all written files.
    pub dir: TempDir,
    pub files: FileService<SqliteStore>,
    pub users: UserService<SqliteStore>,
}

/// Create a depot with a fresh database and empty storage directory.
pub async fn setup() -> TestDepot {
    let db = Database::open_in_memory().await.expect("open database");
    let store = SqliteStore::new(&db);

    let dir = TempDir::new().expect("create temp dir");
    let storage = FileStore::new(dir.path()).expect("create file store");

    TestDepot {
        dir,
        files: FileService::new(store.clone(), storage),
        users: UserService::new(store),
    }
}
