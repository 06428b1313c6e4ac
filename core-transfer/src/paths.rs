//! Storage Path Helper
//!
//! Pure, bidirectional mapping between two absolute path namespaces and the
//! shared relative namespace: the secure storage container root and the
//! AppKinetics inbox root (where files received from other trusted
//! applications land). Both roots are supplied by the enclosing runtime at
//! process start; this helper never touches the filesystem.

/// Path helper bound to the two process-wide roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    storage_root: String,
    inbox_root: String,
}

impl StoragePaths {
    pub fn new(storage_root: impl Into<String>, inbox_root: impl Into<String>) -> Self {
        Self {
            storage_root: storage_root.into(),
            inbox_root: inbox_root.into(),
        }
    }

    /// Full path to the secure storage container.
    pub fn secure_storage_path(&self) -> &str {
        &self.storage_root
    }

    /// Full path to the cross-application file-sharing inbox.
    pub fn appkinetics_inbox_path(&self) -> &str {
        &self.inbox_root
    }

    /// True iff `path` begins with the secure storage root.
    pub fn is_path_contains_secure_storage_path(&self, path: &str) -> bool {
        path.starts_with(&self.storage_root)
    }

    /// Strip the secure storage root prefix from `full_path`.
    ///
    /// A path that does not carry the prefix is returned unchanged; the
    /// round-trip guarantee with [`full_path_with_storage_path`](Self::full_path_with_storage_path)
    /// only covers paths under the root.
    pub fn relative_path_from_full_path(&self, full_path: &str) -> String {
        strip_root(&self.storage_root, full_path)
    }

    /// Prefix `path` with the secure storage root.
    ///
    /// Exact inverse of [`relative_path_from_full_path`](Self::relative_path_from_full_path)
    /// for any path produced by it.
    pub fn full_path_with_storage_path(&self, path: &str) -> String {
        join_root(&self.storage_root, path)
    }

    /// Prefix `path` with the AppKinetics inbox root.
    pub fn full_path_with_appkinetics_path(&self, path: &str) -> String {
        join_root(&self.inbox_root, path)
    }

    /// Strip the AppKinetics inbox root prefix from `inbox_path`.
    ///
    /// The inbox counterpart of [`relative_path_from_full_path`](Self::relative_path_from_full_path);
    /// unprefixed input passes through unchanged.
    pub fn relative_path_from_inbox_path(&self, inbox_path: &str) -> String {
        strip_root(&self.inbox_root, inbox_path)
    }
}

fn strip_root(root: &str, path: &str) -> String {
    match path.strip_prefix(root) {
        Some(rest) => rest.to_string(),
        None => path.to_string(),
    }
}

fn join_root(root: &str, path: &str) -> String {
    if path.starts_with('/') || root.ends_with('/') || path.is_empty() {
        format!("{}{}", root, path)
    } else {
        format!("{}/{}", root, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> StoragePaths {
        StoragePaths::new("/data/secure", "/data/secure/Inbox")
    }

    #[test]
    fn test_storage_round_trip() {
        let p = paths();
        for full in [
            "/data/secure/docs/report.pdf",
            "/data/secure/a",
            "/data/secure/",
            "/data/secure",
        ] {
            let relative = p.relative_path_from_full_path(full);
            assert_eq!(p.full_path_with_storage_path(&relative), full);
        }
    }

    #[test]
    fn test_inbox_round_trip() {
        let p = paths();
        let full = "/data/secure/Inbox/sender/file.txt";
        let relative = p.relative_path_from_inbox_path(full);
        assert_eq!(relative, "/sender/file.txt");
        assert_eq!(p.full_path_with_appkinetics_path(&relative), full);
    }

    #[test]
    fn test_unprefixed_path_passes_through() {
        let p = paths();
        assert_eq!(
            p.relative_path_from_full_path("/elsewhere/file.txt"),
            "/elsewhere/file.txt"
        );
        assert_eq!(p.relative_path_from_inbox_path("plain.txt"), "plain.txt");
    }

    #[test]
    fn test_prefix_detection() {
        let p = paths();
        assert!(p.is_path_contains_secure_storage_path("/data/secure"));
        assert!(p.is_path_contains_secure_storage_path("/data/secure/x"));
        assert!(!p.is_path_contains_secure_storage_path(""));
        assert!(!p.is_path_contains_secure_storage_path("/data"));
        assert!(!p.is_path_contains_secure_storage_path("/other/data/secure"));
    }

    #[test]
    fn test_join_without_leading_slash() {
        let p = paths();
        assert_eq!(
            p.full_path_with_storage_path("docs/a.txt"),
            "/data/secure/docs/a.txt"
        );
        assert_eq!(p.full_path_with_storage_path(""), "/data/secure");
    }
}
