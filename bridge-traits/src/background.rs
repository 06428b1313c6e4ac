//! Background Execution Leases
//!
//! Provides platform-aware keep-alive leases for in-flight transfers.

use async_trait::async_trait;

use crate::error::Result;

/// A lease on extended execution time
///
/// Held for the full lifetime of one transfer and released when the transfer
/// reaches a terminal state. Dropping the lease without an explicit release
/// must also return the allowance to the platform.
pub trait KeepAliveLease: Send {
    /// Release the lease
    ///
    /// Idempotent relative to `Drop`; calling this and then dropping the
    /// lease releases only once.
    fn release(self: Box<Self>);
}

/// Keep-alive lease provider trait
///
/// Abstracts the platform's "please don't suspend me yet" mechanism:
/// - **iOS**: `beginBackgroundTask` / `endBackgroundTask`
/// - **Android**: foreground service or WorkManager expedited work
/// - **Desktop**: a no-op; processes are not suspended mid-transfer
///
/// # Platform Constraints
///
/// Mobile platforms grant a bounded allowance (iOS: roughly 30 seconds).
/// The core treats lease expiry like any other platform-initiated abort; it
/// never polls the remaining allowance.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::background::KeepAliveProvider;
///
/// async fn run_transfer(provider: &dyn KeepAliveProvider) -> Result<()> {
///     let lease = provider.acquire("download:42").await?;
///     // ... drive the transfer ...
///     lease.release();
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait KeepAliveProvider: Send + Sync {
    /// Acquire a lease for the named activity
    ///
    /// `tag` identifies the transfer for diagnostics; it carries no semantic
    /// meaning to the platform.
    async fn acquire(&self, tag: &str) -> Result<Box<dyn KeepAliveLease>>;

    /// Number of leases currently outstanding
    async fn active_leases(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestLease;

    impl KeepAliveLease for TestLease {
        fn release(self: Box<Self>) {}
    }

    #[test]
    fn test_lease_release_consumes() {
        let lease: Box<dyn KeepAliveLease> = Box::new(TestLease);
        lease.release();
    }
}
