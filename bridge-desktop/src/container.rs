//! Secure Container Implementation using Tokio

use async_trait::async_trait;
use bridge_traits::{
    container::{FileMetadata, SecureFileAccess},
    error::{BridgeError, Result},
};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Directory-rooted stand-in for the encrypted container
///
/// Provides the container's I/O surface using:
/// - `tokio::fs` for async operations
/// - A fixed storage root that every path must resolve under
///
/// Desktop has no at-rest encryption layer of its own; the root directory is
/// assumed to sit on an encrypted volume when that matters.
pub struct TokioSecureContainer {
    root: PathBuf,
}

impl TokioSecureContainer {
    /// Create a container rooted at `root`
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Convert std::io::Error to BridgeError
    fn map_io_error(e: std::io::Error) -> BridgeError {
        BridgeError::Io(e)
    }

    fn reject_escape(&self, path: &Path, resolved: &PathBuf) -> Result<()> {
        if resolved.starts_with(&self.root) {
            Ok(())
        } else {
            Err(BridgeError::PathOutsideContainer(
                path.display().to_string(),
            ))
        }
    }
}

#[async_trait]
impl SecureFileAccess for TokioSecureContainer {
    fn storage_root(&self) -> &Path {
        &self.root
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        let resolved = self.resolve(path)?;
        Ok(fs::try_exists(&resolved).await.map_err(Self::map_io_error)?)
    }

    async fn metadata(&self, path: &Path) -> Result<FileMetadata> {
        let resolved = self.resolve(path)?;
        let metadata = fs::metadata(&resolved).await.map_err(Self::map_io_error)?;

        Ok(FileMetadata {
            size: metadata.len(),
            modified_at: metadata
                .modified()
                .ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map(|d| d.as_secs() as i64),
            is_directory: metadata.is_dir(),
        })
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        let resolved = self.resolve(path)?;
        fs::create_dir_all(&resolved)
            .await
            .map_err(Self::map_io_error)?;
        debug!(path = ?resolved, "Created directory");
        Ok(())
    }

    async fn delete_file(&self, path: &Path) -> Result<()> {
        let resolved = self.resolve(path)?;
        fs::remove_file(&resolved).await.map_err(Self::map_io_error)?;
        debug!(path = ?resolved, "Deleted file");
        Ok(())
    }

    async fn open_read_stream(
        &self,
        path: &Path,
    ) -> Result<Box<dyn tokio::io::AsyncRead + Send + Unpin>> {
        let resolved = self.resolve(path)?;
        let file = fs::File::open(&resolved).await.map_err(Self::map_io_error)?;
        debug!(path = ?resolved, "Opened file for reading");
        Ok(Box::new(file))
    }

    async fn open_write_stream(
        &self,
        path: &Path,
    ) -> Result<Box<dyn tokio::io::AsyncWrite + Send + Unpin>> {
        let resolved = self.resolve(path)?;
        if let Some(parent) = resolved.parent() {
            fs::create_dir_all(parent).await.map_err(Self::map_io_error)?;
        }

        let file = fs::File::create(&resolved)
            .await
            .map_err(Self::map_io_error)?;
        debug!(path = ?resolved, "Opened file for writing");
        Ok(Box::new(file))
    }

    fn resolve(&self, path: &Path) -> Result<PathBuf> {
        // `..` would defeat the prefix check below; refuse it outright.
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(BridgeError::PathOutsideContainer(
                path.display().to_string(),
            ));
        }

        let resolved = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };

        self.reject_escape(path, &resolved)?;
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn container() -> (tempfile::TempDir, TokioSecureContainer) {
        let dir = tempfile::tempdir().unwrap();
        let container = TokioSecureContainer::new(dir.path().to_path_buf());
        (dir, container)
    }

    #[test]
    fn test_resolve_relative_path() {
        let (dir, container) = container();
        let resolved = container.resolve(Path::new("docs/report.pdf")).unwrap();
        assert_eq!(resolved, dir.path().join("docs/report.pdf"));
    }

    #[test]
    fn test_resolve_rejects_parent_components() {
        let (_dir, container) = container();
        assert!(container.resolve(Path::new("../outside.txt")).is_err());
        assert!(container.resolve(Path::new("a/../../b")).is_err());
    }

    #[test]
    fn test_resolve_rejects_foreign_absolute_path() {
        let (_dir, container) = container();
        let err = container.resolve(Path::new("/etc/passwd")).unwrap_err();
        assert!(matches!(err, BridgeError::PathOutsideContainer(_)));
    }

    #[tokio::test]
    async fn test_write_then_read_stream() {
        let (_dir, container) = container();

        let mut writer = container
            .open_write_stream(Path::new("inbox/data.bin"))
            .await
            .unwrap();
        writer.write_all(b"secure bytes").await.unwrap();
        writer.shutdown().await.unwrap();

        let mut reader = container
            .open_read_stream(Path::new("inbox/data.bin"))
            .await
            .unwrap();
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, b"secure bytes");

        let meta = container.metadata(Path::new("inbox/data.bin")).await.unwrap();
        assert_eq!(meta.size, 12);
        assert!(!meta.is_directory);
    }

    #[tokio::test]
    async fn test_create_dir_all() {
        let (_dir, container) = container();

        container
            .create_dir_all(Path::new("a/b/c"))
            .await
            .unwrap();
        let meta = container.metadata(Path::new("a/b/c")).await.unwrap();
        assert!(meta.is_directory);
    }

    #[tokio::test]
    async fn test_delete_file() {
        let (_dir, container) = container();

        let mut writer = container
            .open_write_stream(Path::new("tmp.txt"))
            .await
            .unwrap();
        writer.write_all(b"x").await.unwrap();
        writer.shutdown().await.unwrap();

        assert!(container.exists(Path::new("tmp.txt")).await.unwrap());
        container.delete_file(Path::new("tmp.txt")).await.unwrap();
        assert!(!container.exists(Path::new("tmp.txt")).await.unwrap());
    }
}
