//! # Transfer Delegate State Machine
//!
//! One delegate per in-flight transfer, with validated state transitions.
//!
//! ## State Machine
//!
//! ```text
//! Created → Transferring → Completed
//!     ↓          ↓             ↑
//!     └───────→ Failed        │
//!     └───────→ Cancelled     │
//! ```
//!
//! Terminal states are mutually exclusive and final; the bridge's guarantee
//! of exactly one terminal callback per transfer rests on the fact that only
//! one caller can win the terminal transition here.
//!
//! ## Byte accounting
//!
//! `bytes_transferred` is monotonically non-decreasing and, once an expected
//! length is known, never exceeds it. A violation of either rule is reported
//! as an error rather than clamped: it means the source changed underneath
//! the transfer or the server lied about the entity length.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::command::ObjectId;
use crate::error::{FileTransferError, Result, TransferError};

/// Direction of a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferDirection {
    Upload,
    Download,
}

impl TransferDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferDirection::Upload => "upload",
            TransferDirection::Download => "download",
        }
    }
}

impl std::fmt::Display for TransferDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The current status of a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    /// Delegate created but I/O not yet started
    Created,
    /// Bytes are moving in either direction
    Transferring,
    /// Transfer finished successfully
    Completed,
    /// Transfer failed with an error payload
    Failed,
    /// Transfer was cancelled by the caller
    Cancelled,
}

impl TransferStatus {
    /// Check if this status represents a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransferStatus::Completed | TransferStatus::Failed | TransferStatus::Cancelled
        )
    }

    /// Check if this status represents an active state
    pub fn is_active(&self) -> bool {
        matches!(self, TransferStatus::Created | TransferStatus::Transferring)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Created => "created",
            TransferStatus::Transferring => "transferring",
            TransferStatus::Completed => "completed",
            TransferStatus::Failed => "failed",
            TransferStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for TransferStatus {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "created" => Ok(TransferStatus::Created),
            "transferring" => Ok(TransferStatus::Transferring),
            "completed" => Ok(TransferStatus::Completed),
            "failed" => Ok(TransferStatus::Failed),
            "cancelled" => Ok(TransferStatus::Cancelled),
            _ => Err(TransferError::InvalidStateTransition {
                from: s.to_string(),
                to: "parse".to_string(),
                reason: "unknown transfer status".to_string(),
            }),
        }
    }
}

impl std::fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// State record for one in-flight transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDelegate {
    pub object_id: ObjectId,
    pub direction: TransferDirection,
    pub source: String,
    pub target: String,
    pub status: TransferStatus,
    /// Bytes moved so far; monotonically non-decreasing
    pub bytes_transferred: u64,
    /// Total expected, when known; updatable mid-flight
    pub bytes_expected: Option<u64>,
    pub response_code: Option<u16>,
    pub response_headers: HashMap<String, String>,
    pub mime_type: Option<String>,
    /// Error payload recorded on failure
    pub error: Option<FileTransferError>,
    pub created_at: i64,
    pub started_at: Option<i64>,
    pub completed_at: Option<i64>,
}

impl TransferDelegate {
    /// Create a new delegate in `Created` state
    pub fn new(
        object_id: ObjectId,
        direction: TransferDirection,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            object_id,
            direction,
            source: source.into(),
            target: target.into(),
            status: TransferStatus::Created,
            bytes_transferred: 0,
            bytes_expected: None,
            response_code: None,
            response_headers: HashMap::new(),
            mime_type: None,
            error: None,
            created_at: current_timestamp(),
            started_at: None,
            completed_at: None,
        }
    }

    /// Begin moving bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the delegate is not in `Created` state.
    pub fn start(&mut self) -> Result<()> {
        self.validate_transition(TransferStatus::Transferring)?;
        self.status = TransferStatus::Transferring;
        self.started_at = Some(current_timestamp());
        Ok(())
    }

    /// Record the cumulative number of bytes moved so far
    ///
    /// # Errors
    ///
    /// Fails when the delegate is not transferring, when the count goes
    /// backwards, or when it exceeds a known expected length.
    pub fn record_progress(&mut self, bytes_transferred: u64) -> Result<()> {
        if self.status != TransferStatus::Transferring {
            return Err(TransferError::InvalidStateTransition {
                from: self.status.as_str().to_string(),
                to: "record_progress".to_string(),
                reason: "transfer must be active to record progress".to_string(),
            });
        }
        if bytes_transferred < self.bytes_transferred {
            return Err(TransferError::ProgressRegression {
                previous: self.bytes_transferred,
                reported: bytes_transferred,
            });
        }
        if let Some(expected) = self.bytes_expected {
            if bytes_transferred > expected {
                return Err(TransferError::ExpectedLengthExceeded {
                    transferred: bytes_transferred,
                    expected,
                });
            }
        }

        self.bytes_transferred = bytes_transferred;
        Ok(())
    }

    /// Mid-flight correction of the expected byte count
    ///
    /// Used when the server declares a length only after headers arrive, or
    /// after an entity-length probe resolves it.
    ///
    /// # Errors
    ///
    /// Fails when more bytes were already moved than the new expectation
    /// allows; the mismatch is a data-consistency error, not something to
    /// clamp away.
    pub fn update_bytes_expected(&mut self, bytes_expected: u64) -> Result<()> {
        if self.bytes_transferred > bytes_expected {
            return Err(TransferError::ExpectedLengthExceeded {
                transferred: self.bytes_transferred,
                expected: bytes_expected,
            });
        }
        self.bytes_expected = Some(bytes_expected);
        Ok(())
    }

    /// Record the response metadata once headers arrive
    pub fn set_response(
        &mut self,
        code: u16,
        headers: HashMap<String, String>,
        mime_type: Option<String>,
    ) {
        self.response_code = Some(code);
        self.mime_type = mime_type;
        self.response_headers = headers;
    }

    /// Mark the transfer as completed
    pub fn complete(&mut self) -> Result<()> {
        self.validate_transition(TransferStatus::Completed)?;
        self.status = TransferStatus::Completed;
        self.completed_at = Some(current_timestamp());
        Ok(())
    }

    /// Mark the transfer as failed with its error payload
    pub fn fail(&mut self, error: FileTransferError) -> Result<()> {
        self.validate_transition(TransferStatus::Failed)?;
        self.status = TransferStatus::Failed;
        self.completed_at = Some(current_timestamp());
        self.error = Some(error);
        Ok(())
    }

    /// Mark the transfer as cancelled
    ///
    /// The first terminal transition wins; cancelling an already-terminal
    /// delegate returns an error the caller treats as "someone else already
    /// finished this".
    pub fn cancel(&mut self) -> Result<()> {
        self.validate_transition(TransferStatus::Cancelled)?;
        self.status = TransferStatus::Cancelled;
        self.completed_at = Some(current_timestamp());
        Ok(())
    }

    /// Validate a state transition
    fn validate_transition(&self, to: TransferStatus) -> Result<()> {
        let valid = match (self.status, to) {
            (TransferStatus::Created, TransferStatus::Transferring) => true,
            (TransferStatus::Created, TransferStatus::Failed) => true,
            (TransferStatus::Created, TransferStatus::Cancelled) => true,

            (TransferStatus::Transferring, TransferStatus::Completed) => true,
            (TransferStatus::Transferring, TransferStatus::Failed) => true,
            (TransferStatus::Transferring, TransferStatus::Cancelled) => true,

            // Terminal states cannot transition
            _ => false,
        };

        if !valid {
            return Err(TransferError::InvalidStateTransition {
                from: self.status.as_str().to_string(),
                to: to.as_str().to_string(),
                reason: format!(
                    "cannot transition from {} to {}",
                    self.status.as_str(),
                    to.as_str()
                ),
            });
        }

        Ok(())
    }
}

/// Shared handle to a delegate, lockable from both the command-dispatch side
/// and the transfer task.
///
/// Uses a std `Mutex` because the critical sections are a handful of field
/// updates and the lock is taken from stream `poll` contexts where awaiting
/// is not an option. Poisoning is recovered rather than propagated; the
/// delegate's own state machine keeps a half-finished update harmless.
#[derive(Debug, Clone)]
pub struct SharedDelegate(Arc<Mutex<TransferDelegate>>);

impl SharedDelegate {
    pub fn new(delegate: TransferDelegate) -> Self {
        Self(Arc::new(Mutex::new(delegate)))
    }

    pub fn lock(&self) -> MutexGuard<'_, TransferDelegate> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current state
    pub fn snapshot(&self) -> TransferDelegate {
        self.lock().clone()
    }
}

/// Get current Unix timestamp
fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("System time before UNIX epoch")
        .as_secs() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransferErrorCode;

    fn delegate() -> TransferDelegate {
        TransferDelegate::new(
            ObjectId::new("t1"),
            TransferDirection::Download,
            "https://example.com/file.bin",
            "downloads/file.bin",
        )
    }

    #[test]
    fn test_new_delegate_is_created() {
        let d = delegate();
        assert_eq!(d.status, TransferStatus::Created);
        assert_eq!(d.bytes_transferred, 0);
        assert!(d.bytes_expected.is_none());
        assert!(d.started_at.is_none());
    }

    #[test]
    fn test_status_terminal_and_active() {
        assert!(TransferStatus::Created.is_active());
        assert!(TransferStatus::Transferring.is_active());
        assert!(TransferStatus::Completed.is_terminal());
        assert!(TransferStatus::Failed.is_terminal());
        assert!(TransferStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_full_lifecycle() {
        let mut d = delegate();
        d.start().unwrap();
        assert_eq!(d.status, TransferStatus::Transferring);
        assert!(d.started_at.is_some());

        d.update_bytes_expected(100).unwrap();
        d.record_progress(40).unwrap();
        d.record_progress(100).unwrap();
        d.complete().unwrap();

        assert_eq!(d.status, TransferStatus::Completed);
        assert!(d.completed_at.is_some());
    }

    #[test]
    fn test_progress_requires_active_state() {
        let mut d = delegate();
        assert!(d.record_progress(1).is_err());
    }

    #[test]
    fn test_progress_is_monotone() {
        let mut d = delegate();
        d.start().unwrap();
        d.record_progress(50).unwrap();

        let err = d.record_progress(10).unwrap_err();
        assert!(matches!(err, TransferError::ProgressRegression { .. }));
        assert_eq!(d.bytes_transferred, 50);
    }

    #[test]
    fn test_progress_cannot_exceed_expected() {
        let mut d = delegate();
        d.start().unwrap();
        d.update_bytes_expected(10).unwrap();

        let err = d.record_progress(11).unwrap_err();
        assert!(matches!(err, TransferError::ExpectedLengthExceeded { .. }));
    }

    #[test]
    fn test_expected_update_rejects_past_progress() {
        let mut d = delegate();
        d.start().unwrap();
        d.record_progress(80).unwrap();

        assert!(d.update_bytes_expected(50).is_err());
        // A consistent correction is fine.
        d.update_bytes_expected(200).unwrap();
        assert_eq!(d.bytes_expected, Some(200));
    }

    #[test]
    fn test_cancel_from_created() {
        let mut d = delegate();
        d.cancel().unwrap();
        assert_eq!(d.status, TransferStatus::Cancelled);
    }

    #[test]
    fn test_terminal_states_are_final() {
        let mut d = delegate();
        d.start().unwrap();
        d.complete().unwrap();

        assert!(d.start().is_err());
        assert!(d.cancel().is_err());
        assert!(d
            .fail(FileTransferError::new(
                TransferErrorCode::Connection,
                "s",
                "t"
            ))
            .is_err());
    }

    #[test]
    fn test_first_terminal_transition_wins() {
        let mut d = delegate();
        d.start().unwrap();

        d.cancel().unwrap();
        let err = d.complete().unwrap_err();
        assert!(matches!(err, TransferError::InvalidStateTransition { .. }));
        assert_eq!(d.status, TransferStatus::Cancelled);
    }

    #[test]
    fn test_fail_records_payload() {
        let mut d = delegate();
        d.start().unwrap();
        d.fail(
            FileTransferError::new(TransferErrorCode::Connection, "s", "t").with_http_status(500),
        )
        .unwrap();

        assert_eq!(d.status, TransferStatus::Failed);
        assert_eq!(d.error.as_ref().unwrap().http_status, Some(500));
    }

    #[test]
    fn test_shared_delegate_snapshot() {
        let shared = SharedDelegate::new(delegate());
        shared.lock().start().unwrap();
        shared.lock().record_progress(7).unwrap();

        let snap = shared.snapshot();
        assert_eq!(snap.bytes_transferred, 7);
        assert_eq!(snap.status, TransferStatus::Transferring);
    }
}
