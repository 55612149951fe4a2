//! Entity model for wallet state.
//!
//! This module defines the value types returned to callers: accounts, subaddresses, blocks,
//! wallet transactions, transfers and outputs, plus the smaller result types produced by the
//! wallet engine (tx sets, key image import results, proof checks, multisig results).
//!
//! Transactions own their transfers and outputs. Transfers and outputs keep a non-owning
//! back-reference to the transaction that contains them; flat result lists hand out
//! [`TransferRef`] and [`OutputRef`] handles which keep the owning transaction alive.

/// Accounts and subaddresses
pub mod account;
/// Transactions, transfers, outputs and their handles
pub mod tx;
/// Supporting request/result types
pub mod types;

pub use account::*;
pub use tx::*;
pub use types::*;
