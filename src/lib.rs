//! Client-side query, filtering and notification layer for a wallet whose cryptography and
//! consensus logic live in an external engine.
//!
//! - `model`: entities returned to callers.
//! - `query`: composable tx/transfer/output queries, their normalization and matching.
//! - `engine`: the boundary traits and wire types of the wallet engine.
//! - `assembler`: turns engine responses back into entity graphs.
//! - `wallet`: the `Wallet` facade, its configuration, listeners and sync coordination.

pub mod assembler;
pub mod engine;
pub mod model;
pub mod query;
pub mod utils;
pub mod wallet;

pub use engine::{EngineError, EngineNotification, EngineNotificationSink, EngineProvider, WalletEngine};
pub use wallet::sync::{ChannelListener, SyncListener, WalletEvent, WalletListener};
pub use wallet::{CreationMode, Wallet, WalletConfig, WalletError};
