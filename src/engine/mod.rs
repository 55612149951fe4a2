//! Boundary to the external wallet engine.
//!
//! The engine is an opaque collaborator reachable only through synchronous-style calls that
//! accept and return serialized structures. This module defines the capability traits the rest
//! of the crate depends on, and the wire types used to encode requests and decode responses.

/// Capability traits for the wallet engine
mod boundary;
/// Scripted engine used by the test suites
#[cfg(test)]
pub(crate) mod mock;
/// Wire type definitions
mod types;

pub use boundary::*;
pub use types::*;
