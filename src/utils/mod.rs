//!
//! Utility module for the wallet bridge.
//!
//! Re-exports amount formatting and parsing helpers used throughout the codebase.
/// Utility functions for formatting and parsing amounts
pub mod index;

pub use index::{ATOMIC_UNIT_DECIMALS, format_token_amount, parse_atomic_amount};
