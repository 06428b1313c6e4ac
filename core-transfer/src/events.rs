//! Typed callback channel events.
//!
//! Each transfer gets its own unbounded `tokio::sync::mpsc` channel; the
//! host side consumes [`TransferEvent`]s from the receiver handed back when
//! the transfer starts. Exactly one terminal event is emitted per transfer.

use serde::{Deserialize, Serialize};

use crate::error::FileTransferError;

/// Events emitted on a transfer's callback channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum TransferEvent {
    /// Incremental progress; `bytes_expected` is absent while the total is
    /// unknown
    Progress {
        bytes_transferred: u64,
        bytes_expected: Option<u64>,
    },
    /// Upload finished; carries the server's response body
    UploadCompleted {
        response_code: u16,
        bytes_sent: u64,
        response: String,
    },
    /// Download finished; body was written to `target`
    DownloadCompleted {
        response_code: u16,
        bytes_written: u64,
        target: String,
    },
    /// Transfer ended with an error payload (including cancellation)
    Failed(FileTransferError),
}

impl TransferEvent {
    /// Whether this event ends the transfer
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransferEvent::Progress { .. })
    }

    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &'static str {
        match self {
            TransferEvent::Progress { .. } => "transfer progress",
            TransferEvent::UploadCompleted { .. } => "upload completed",
            TransferEvent::DownloadCompleted { .. } => "download completed",
            TransferEvent::Failed(_) => "transfer failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransferErrorCode;

    #[test]
    fn test_terminal_classification() {
        let progress = TransferEvent::Progress {
            bytes_transferred: 10,
            bytes_expected: Some(100),
        };
        assert!(!progress.is_terminal());

        let failed = TransferEvent::Failed(FileTransferError::new(
            TransferErrorCode::Aborted,
            "s",
            "t",
        ));
        assert!(failed.is_terminal());
    }

    #[test]
    fn test_event_serialization_shape() {
        let event = TransferEvent::Progress {
            bytes_transferred: 5,
            bytes_expected: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Progress");
        assert_eq!(json["payload"]["bytes_transferred"], 5);
    }
}
