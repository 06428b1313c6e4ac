//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the transfer core and the
//! platform-specific runtime it is embedded in. Each trait represents a
//! capability that the core requires but that is supplied differently per
//! platform (desktop, iOS, Android).
//!
//! ## Traits
//!
//! ### Storage
//! - [`SecureFileAccess`](container::SecureFileAccess) - File I/O against the
//!   encrypted storage container
//!
//! ### Platform Integration
//! - [`KeepAliveProvider`](background::KeepAliveProvider) - Execution-time
//!   leases that keep in-flight transfers alive across app suspension
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type for
//! consistent error handling. Platform implementations should:
//!
//! - Convert platform-specific errors to `BridgeError`
//! - Provide actionable error messages
//! - Include error context (e.g., file paths)
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds to support safe concurrent
//! usage across async tasks. Implementations must ensure thread safety.

pub mod background;
pub mod container;
pub mod error;

pub use error::BridgeError;

// Re-export commonly used types
pub use background::{KeepAliveLease, KeepAliveProvider};
pub use container::{FileMetadata, SecureFileAccess};
