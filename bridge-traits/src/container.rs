//! Secure Container Storage Abstraction
//!
//! Models the file-I/O surface of the enterprise secure container SDK. The
//! container encrypts data at rest and enforces that every path stays inside
//! its storage root; the transfer core only ever talks to it through this
//! trait.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// File metadata information
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub size: u64,
    pub modified_at: Option<i64>,
    pub is_directory: bool,
}

/// Secure container file access trait
///
/// Abstracts the encrypted-container file handle API:
/// - iOS/Android: the secure-container SDK's file handles
/// - Desktop: a directory-rooted filesystem stand-in
///
/// Transfers stream through the `open_read_stream`/`open_write_stream` pair;
/// whole-file reads are deliberately absent so large transfers never buffer
/// in memory.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::container::SecureFileAccess;
///
/// async fn target_size(container: &dyn SecureFileAccess, path: &Path) -> Result<u64> {
///     Ok(container.metadata(path).await?.size)
/// }
/// ```
#[async_trait]
pub trait SecureFileAccess: Send + Sync {
    /// Absolute root of the container's storage area
    fn storage_root(&self) -> &Path;

    /// Check if a file or directory exists
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Get metadata for a file or directory
    async fn metadata(&self, path: &Path) -> Result<FileMetadata>;

    /// Create a directory and all parent directories if they don't exist
    async fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Delete a file
    async fn delete_file(&self, path: &Path) -> Result<()>;

    /// Open a file for streaming reads
    async fn open_read_stream(
        &self,
        path: &Path,
    ) -> Result<Box<dyn tokio::io::AsyncRead + Send + Unpin>>;

    /// Open a file for streaming writes, creating parent directories as needed
    ///
    /// An existing file at `path` is truncated.
    async fn open_write_stream(
        &self,
        path: &Path,
    ) -> Result<Box<dyn tokio::io::AsyncWrite + Send + Unpin>>;

    /// Resolve a container-relative path to its absolute on-disk form
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::PathOutsideContainer`](crate::error::BridgeError)
    /// if the resolved path would escape the storage root.
    fn resolve(&self, path: &Path) -> Result<PathBuf>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_metadata() {
        let metadata = FileMetadata {
            size: 1024,
            modified_at: Some(1234567900),
            is_directory: false,
        };

        assert_eq!(metadata.size, 1024);
        assert!(!metadata.is_directory);
    }
}
