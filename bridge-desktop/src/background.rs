//! Keep-Alive Lease Implementation

use async_trait::async_trait;
use bridge_traits::{
    background::{KeepAliveLease, KeepAliveProvider},
    error::Result,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Counting no-op lease provider for desktop
///
/// Desktop processes are never suspended mid-transfer, so the lease grants
/// nothing; the outstanding-lease count is still tracked so tests and
/// diagnostics can observe acquire/release pairing.
pub struct NoopKeepAlive {
    active: Arc<AtomicUsize>,
}

impl NoopKeepAlive {
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Default for NoopKeepAlive {
    fn default() -> Self {
        Self::new()
    }
}

struct NoopLease {
    active: Arc<AtomicUsize>,
    released: bool,
    tag: String,
}

impl NoopLease {
    fn release_once(&mut self) {
        if !self.released {
            self.released = true;
            self.active.fetch_sub(1, Ordering::SeqCst);
            debug!(tag = %self.tag, "Released keep-alive lease");
        }
    }
}

impl KeepAliveLease for NoopLease {
    fn release(mut self: Box<Self>) {
        self.release_once();
    }
}

impl Drop for NoopLease {
    fn drop(&mut self) {
        self.release_once();
    }
}

#[async_trait]
impl KeepAliveProvider for NoopKeepAlive {
    async fn acquire(&self, tag: &str) -> Result<Box<dyn KeepAliveLease>> {
        self.active.fetch_add(1, Ordering::SeqCst);
        debug!(tag = %tag, "Acquired keep-alive lease");
        Ok(Box::new(NoopLease {
            active: Arc::clone(&self.active),
            released: false,
            tag: tag.to_string(),
        }))
    }

    async fn active_leases(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_acquire_and_release() {
        let provider = NoopKeepAlive::new();
        assert_eq!(provider.active_leases().await, 0);

        let lease = provider.acquire("upload:1").await.unwrap();
        assert_eq!(provider.active_leases().await, 1);

        lease.release();
        assert_eq!(provider.active_leases().await, 0);
    }

    #[tokio::test]
    async fn test_drop_releases() {
        let provider = NoopKeepAlive::new();
        {
            let _lease = provider.acquire("download:2").await.unwrap();
            assert_eq!(provider.active_leases().await, 1);
        }
        assert_eq!(provider.active_leases().await, 0);
    }

    #[tokio::test]
    async fn test_release_then_drop_counts_once() {
        let provider = NoopKeepAlive::new();
        let a = provider.acquire("a").await.unwrap();
        let _b = provider.acquire("b").await.unwrap();
        a.release();
        assert_eq!(provider.active_leases().await, 1);
    }
}
