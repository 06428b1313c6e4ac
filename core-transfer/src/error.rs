//! Error taxonomy and structured transfer error payloads.
//!
//! Two layers of errors live here:
//!
//! - [`FileTransferError`] is the structured payload surfaced to the host
//!   callback channel. Its numeric [`TransferErrorCode`] values are part of
//!   the wire contract and must not change.
//! - [`TransferError`] is the crate's internal error enum covering misuse of
//!   the API (duplicate object ids, invalid state transitions) alongside the
//!   payload case.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Numeric error codes surfaced to the host.
///
/// The discriminants are fixed; hosts switch on the raw number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferErrorCode {
    /// Local source/target file missing or unreadable
    FileNotFound = 1,
    /// Malformed or unsupported transfer URL
    InvalidUrl = 2,
    /// Network-layer failure or unacceptable HTTP response
    Connection = 3,
    /// Transfer cancelled by the caller
    Aborted = 4,
    /// Server answered 304 Not Modified
    NotModified = 5,
}

impl TransferErrorCode {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(TransferErrorCode::FileNotFound),
            2 => Some(TransferErrorCode::InvalidUrl),
            3 => Some(TransferErrorCode::Connection),
            4 => Some(TransferErrorCode::Aborted),
            5 => Some(TransferErrorCode::NotModified),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferErrorCode::FileNotFound => "FILE_NOT_FOUND_ERR",
            TransferErrorCode::InvalidUrl => "INVALID_URL_ERR",
            TransferErrorCode::Connection => "CONNECTION_ERR",
            TransferErrorCode::Aborted => "CONNECTION_ABORTED",
            TransferErrorCode::NotModified => "NOT_MODIFIED",
        }
    }
}

impl std::fmt::Display for TransferErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for TransferErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for TransferErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        TransferErrorCode::from_u8(value)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown error code {}", value)))
    }
}

/// Structured error payload returned through the callback channel.
///
/// Mirrors the host-visible shape: `code`, `source`, `target`, and when
/// available `http_status`, `body` and `exception`.
// `Display`/`Error` are hand-written: the wire contract names the
// originating path field `source`, which thiserror would otherwise claim
// as the error-source accessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTransferError {
    pub code: TransferErrorCode,
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
}

impl std::fmt::Display for FileTransferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "file transfer error {}: {} -> {}",
            self.code, self.source, self.target
        )
    }
}

impl std::error::Error for FileTransferError {}

impl FileTransferError {
    pub fn new(
        code: TransferErrorCode,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            code,
            source: source.into(),
            target: target.into(),
            http_status: None,
            body: None,
            exception: None,
        }
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_exception(mut self, message: impl Into<String>) -> Self {
        self.exception = Some(message.into());
        self
    }
}

#[derive(Error, Debug)]
pub enum TransferError {
    #[error(transparent)]
    Transfer(#[from] FileTransferError),

    #[error("Transfer already in progress for object {object_id}")]
    TransferInProgress { object_id: String },

    #[error("Invalid upload method: {0}")]
    InvalidUploadMethod(String),

    #[error("Invalid state transition from {from} to {to}: {reason}")]
    InvalidStateTransition {
        from: String,
        to: String,
        reason: String,
    },

    #[error("Progress went backwards: {previous} -> {reported} bytes")]
    ProgressRegression { previous: u64, reported: u64 },

    #[error("Transferred {transferred} bytes but only {expected} were expected")]
    ExpectedLengthExceeded { transferred: u64, expected: u64 },

    #[error("Bridge error: {0}")]
    Bridge(#[from] bridge_traits::BridgeError),
}

pub type Result<T> = std::result::Result<T, TransferError>;
