//! Database schema migrations for filedepot.
//!
//! Each entry is a batch of SQL applied in order; the applied version is
//! tracked in the `schema_version` table.

/// All schema migrations, in order.
pub const MIGRATIONS: &[&str] = &[
    // v1: users and files
    r#"
    CREATE TABLE users (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        username    TEXT NOT NULL UNIQUE CHECK (length(username) <= 100),
        password    TEXT NOT NULL CHECK (length(password) <= 100),
        created_at  TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE files (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        file_name     TEXT NOT NULL CHECK (length(file_name) <= 100),
        content_type  TEXT NOT NULL CHECK (length(content_type) <= 20),
        storage_path  TEXT NOT NULL CHECK (length(storage_path) <= 256),
        user_id       INTEGER NOT NULL REFERENCES users(id),
        created_at    TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at    TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE UNIQUE INDEX idx_files_storage_path ON files(storage_path);
    CREATE UNIQUE INDEX idx_files_file_name_user_id ON files(file_name, user_id);
    CREATE INDEX idx_files_user_id ON files(user_id);
    "#,
];
