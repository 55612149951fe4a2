//! Wallet facade, configuration and error types.
//!
//! `Wallet` is the entry point for callers: it is opened or created through an
//! [`EngineProvider`](crate::engine::EngineProvider) from a validated [`WalletConfig`], guards
//! every operation with its closed flag, and delegates listening and synchronization to the
//! `sync` module.

/// Wallet configuration and validation
pub mod config;
/// The wallet facade
pub mod service;
/// Listener registration and synchronization
pub mod sync;
/// Error types
pub mod types;

pub use config::{CreationMode, DEFAULT_LANGUAGE, WalletConfig};
pub use service::Wallet;
pub use types::*;
