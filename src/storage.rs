//! Filesystem gateway for filedepot.
//!
//! Thin async wrapper over byte-level file I/O: read, write, existence
//! check and idempotent delete. Carries no state beyond the configured base
//! directory; every storage path is derived deterministically from that
//! directory, the owning user's id and the sanitized file name.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::{DepotError, Result};

/// Physical file storage rooted at a base directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a new FileStore with the given base path.
    ///
    /// The base directory will be created if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path)?;

        Ok(Self { base_path })
    }

    /// Get the base path of this store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Compute the storage path for a file owned by `user_id`.
    ///
    /// The name must already be sanitized; the result is
    /// `{base}/{user_id}/{file_name}` and is deterministic for a given
    /// owner and name.
    pub fn resolve(&self, user_id: i64, file_name: &str) -> PathBuf {
        self.base_path.join(user_id.to_string()).join(file_name)
    }

    /// Read the full content of the file at `path`.
    pub async fn read(&self, path: impl AsRef<Path>) -> Result<Vec<u8>> {
        Ok(fs::read(path.as_ref()).await?)
    }

    /// Write `bytes` to `path`, creating parent directories as needed.
    ///
    /// Overwrites any existing content at the path.
    pub async fn write(&self, path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(path, bytes).await?;
        Ok(())
    }

    /// Check whether a file exists at `path`. Never fails; an empty path is
    /// reported as absent.
    pub async fn exists(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return false;
        }
        fs::try_exists(path).await.unwrap_or(false)
    }

    /// Delete the file at `path` if it exists.
    ///
    /// A missing file is not an error; repeated deletes are no-ops.
    pub async fn delete_if_exists(&self, path: impl AsRef<Path>) -> Result<()> {
        match fs::remove_file(path.as_ref()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Reduce a client-supplied file name to its final path segment.
///
/// Both `/` and `\` are treated as separators, so traversal sequences such
/// as `"../"` or `"..\"` are stripped. A name whose final segment is empty,
/// `.` or `..` is rejected.
pub fn sanitize_file_name(file_name: &str) -> Result<String> {
    let segment = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if segment.is_empty() || segment == "." || segment == ".." {
        return Err(DepotError::Validation(format!(
            "invalid file name: \"{file_name}\""
        )));
    }

    Ok(segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_write_and_read() {
        let (_dir, store) = setup();
        let path = store.resolve(1, "hello.txt");

        store.write(&path, b"Hello, World!").await.unwrap();
        let content = store.read(&path).await.unwrap();
        assert_eq!(content, b"Hello, World!");
    }

    #[tokio::test]
    async fn test_write_creates_parent_directories() {
        let (_dir, store) = setup();
        let path = store.resolve(42, "nested.bin");

        assert!(!store.exists(&path).await);
        store.write(&path, &[1, 2, 3]).await.unwrap();
        assert!(store.exists(&path).await);
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let (_dir, store) = setup();
        let path = store.resolve(1, "file.txt");

        store.write(&path, b"first").await.unwrap();
        store.write(&path, b"second").await.unwrap();
        assert_eq!(store.read(&path).await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_read_missing_is_io_error() {
        let (_dir, store) = setup();
        let result = store.read(store.resolve(1, "missing.txt")).await;
        assert!(matches!(result, Err(DepotError::Io(_))));
    }

    #[tokio::test]
    async fn test_exists_empty_path() {
        let (_dir, store) = setup();
        assert!(!store.exists("").await);
    }

    #[tokio::test]
    async fn test_delete_if_exists_idempotent() {
        let (_dir, store) = setup();
        let path = store.resolve(1, "gone.txt");

        // Absent path: no error, no effect
        store.delete_if_exists(&path).await.unwrap();

        store.write(&path, b"bytes").await.unwrap();
        store.delete_if_exists(&path).await.unwrap();
        assert!(!store.exists(&path).await);

        // Second delete is a no-op
        store.delete_if_exists(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_resolve_is_deterministic() {
        let (_dir, store) = setup();
        assert_eq!(
            store.resolve(7, "report.pdf"),
            store.resolve(7, "report.pdf")
        );
        assert_ne!(store.resolve(7, "report.pdf"), store.resolve(8, "report.pdf"));
    }

    #[test]
    fn test_sanitize_plain_name() {
        assert_eq!(sanitize_file_name("report.pdf").unwrap(), "report.pdf");
    }

    #[test]
    fn test_sanitize_strips_traversal() {
        assert_eq!(sanitize_file_name("../testfile.pdf").unwrap(), "testfile.pdf");
        assert_eq!(
            sanitize_file_name("..\\..\\testfile.pdf").unwrap(),
            "testfile.pdf"
        );
        assert_eq!(
            sanitize_file_name("/etc/passwd").unwrap(),
            "passwd"
        );
        assert_eq!(
            sanitize_file_name("a/b/c/data.csv").unwrap(),
            "data.csv"
        );
    }

    #[test]
    fn test_sanitize_rejects_degenerate_names() {
        assert!(sanitize_file_name("").is_err());
        assert!(sanitize_file_name("..").is_err());
        assert!(sanitize_file_name(".").is_err());
        assert!(sanitize_file_name("dir/").is_err());
        assert!(sanitize_file_name("a/b/..").is_err());
    }
}
