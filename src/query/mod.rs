//! Query model for wallet transactions, transfers and outputs.
//!
//! Queries are shaped like the entities they filter and can reference each other: a tx query
//! embeds transfer and output queries, which point back at it. The graph lives in an arena
//! (`QueryGraph`) so that identity is explicit and cycles never alias mutable state.
//!
//! - `graph`: query node types and the arena holding them.
//! - `normalizer`: turns a caller-built graph into a boundary-ready, fully circular one.
//! - `criteria`: evaluates a query against candidate entities.

/// Tri-state matching of queries against entities
pub mod criteria;
/// Query arena and node types
pub mod graph;
/// Circular normalization and request building
pub mod normalizer;

pub use criteria::*;
pub use graph::*;
pub use normalizer::*;
