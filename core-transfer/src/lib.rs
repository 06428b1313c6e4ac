//! # File Transfer Module
//!
//! Upload and download engine for files held in the secure storage
//! container.
//!
//! ## Overview
//!
//! This module drives HTTP file transfers on behalf of the host
//! application:
//! - Uploading container files as multipart forms or raw request bodies
//! - Downloading HTTP resources into the container with streamed writes
//! - Reporting progress, completion and failure over a typed event channel
//! - Aborting transfers by object id, with partial-file cleanup
//! - Mapping between secure-storage and inter-app inbox path namespaces
//!
//! ## Components
//!
//! - **Bridge** (`bridge`): Validates commands, spawns transfer tasks, owns the HTTP clients
//! - **Delegate** (`delegate`): Per-transfer state machine with validated transitions
//! - **Registry** (`registry`): Active transfers keyed by object id
//! - **Commands & Events** (`command`, `events`): Host-facing request and callback types
//! - **Paths** (`paths`): Storage/inbox path namespace mapping

pub mod bridge;
pub mod command;
pub mod delegate;
pub mod error;
pub mod escape;
pub mod events;
pub mod paths;
pub mod probe;
pub mod registry;

pub use bridge::{FileTransferBridge, TransferHandle};
pub use command::{
    split_cookie_header, DownloadCommand, ObjectId, UploadCommand, UploadMethod,
    OPTIONS_KEY_COOKIE,
};
pub use delegate::{SharedDelegate, TransferDelegate, TransferDirection, TransferStatus};
pub use error::{FileTransferError, Result, TransferError, TransferErrorCode};
pub use escape::escape_path_component_for_url;
pub use events::TransferEvent;
pub use paths::StoragePaths;
pub use registry::{ActiveTransfer, TransferRegistry};
