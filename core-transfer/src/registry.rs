//! Active Transfer Registry
//!
//! The one piece of state shared between the command-dispatch side and the
//! transfer tasks: a table of in-flight transfers keyed by object id. At
//! most one entry per id exists at any time; entries are inserted when a
//! transfer starts and removed before (or atomically with) its terminal
//! event.

use std::collections::HashMap;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::command::ObjectId;
use crate::delegate::SharedDelegate;
use crate::error::{Result, TransferError};
use crate::events::TransferEvent;

/// Registry entry for one in-flight transfer.
#[derive(Clone)]
pub struct ActiveTransfer {
    pub delegate: SharedDelegate,
    /// Fired on abort; the transfer task observes it at every suspension
    /// point.
    pub cancel: CancellationToken,
    /// Callback channel; kept here so abort can emit the terminal event
    /// without waiting for the task to wind down.
    pub events: UnboundedSender<TransferEvent>,
}

/// Table of in-flight transfers keyed by object id.
pub struct TransferRegistry {
    inner: Mutex<HashMap<ObjectId, ActiveTransfer>>,
}

impl TransferRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Register a transfer under its object id.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::TransferInProgress`] if the id already has a
    /// live transfer.
    pub async fn register(&self, object_id: ObjectId, transfer: ActiveTransfer) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.contains_key(&object_id) {
            return Err(TransferError::TransferInProgress {
                object_id: object_id.to_string(),
            });
        }
        inner.insert(object_id, transfer);
        Ok(())
    }

    /// Remove and return a transfer, if present.
    pub async fn remove(&self, object_id: &ObjectId) -> Option<ActiveTransfer> {
        self.inner.lock().await.remove(object_id)
    }

    /// Look up a live transfer.
    pub async fn get(&self, object_id: &ObjectId) -> Option<ActiveTransfer> {
        self.inner.lock().await.get(object_id).cloned()
    }

    pub async fn contains(&self, object_id: &ObjectId) -> bool {
        self.inner.lock().await.contains_key(object_id)
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

impl Default for TransferRegistry {
    fn default() -> Self {
        Self::new()
    }
}
