//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! This crate provides production-ready implementations of the bridge traits
//! using desktop-appropriate primitives:
//! - `SecureFileAccess` using `tokio::fs` rooted at a container directory
//! - `KeepAliveProvider` as a counting no-op (desktop processes are not
//!   suspended mid-transfer)
//!
//! On mobile these seams are instead backed by the secure-container SDK and
//! the platform's background-task API.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{NoopKeepAlive, TokioSecureContainer};
//! use bridge_traits::{KeepAliveProvider, SecureFileAccess};
//!
//! #[tokio::main]
//! async fn main() {
//!     let container = TokioSecureContainer::new("/var/lib/app/container".into());
//!     let keep_alive = NoopKeepAlive::new();
//!
//!     // Inject into the transfer bridge
//! }
//! ```

mod background;
mod container;

pub use background::NoopKeepAlive;
pub use container::TokioSecureContainer;
