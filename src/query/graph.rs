//! Arena holding mutually-referencing tx, transfer and output queries.
//!
//! A tx query owns its sub-queries; sub-query back-references are plain ids into the same arena.
//! Node identity is the id, so "the same query" always means "the same id".

use crate::model::{Block, Destination, KeyImage, TransferDirection};
use std::ops::Index;

/// Handle to a [`TxQuery`] within a [`QueryGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TxQueryId(usize);

/// Handle to a [`TransferQuery`] within a [`QueryGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransferQueryId(usize);

/// Handle to an [`OutputQuery`] within a [`QueryGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputQueryId(usize);

/// Filter over wallet transactions.
///
/// Every field is tri-state: `None` places no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TxQuery {
	pub hash: Option<String>,
	/// Restrict to these hashes; the result order follows this list.
	pub hashes: Option<Vec<String>>,
	pub height: Option<u64>,
	pub min_height: Option<u64>,
	pub max_height: Option<u64>,
	pub fee: Option<u64>,
	pub version: Option<u32>,
	pub unlock_time: Option<u64>,
	pub is_confirmed: Option<bool>,
	pub in_tx_pool: Option<bool>,
	pub is_locked: Option<bool>,
	pub is_relayed: Option<bool>,
	pub is_failed: Option<bool>,
	pub is_incoming: Option<bool>,
	pub is_outgoing: Option<bool>,
	pub payment_ids: Option<Vec<String>>,
	pub has_payment_id: Option<bool>,
	pub include_outputs: Option<bool>,
	pub transfer_query: Option<TransferQueryId>,
	pub output_query: Option<OutputQueryId>,
	/// Placeholder block carrying this query across the boundary.
	pub block: Option<Block>,
}

impl TxQuery {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
		self.hash = Some(hash.into());
		self
	}

	pub fn with_hashes<I, S>(mut self, hashes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.hashes = Some(hashes.into_iter().map(Into::into).collect());
		self
	}

	pub fn with_height(mut self, height: u64) -> Self {
		self.height = Some(height);
		self
	}

	pub fn with_height_range(mut self, min_height: Option<u64>, max_height: Option<u64>) -> Self {
		self.min_height = min_height;
		self.max_height = max_height;
		self
	}

	pub fn with_is_confirmed(mut self, is_confirmed: bool) -> Self {
		self.is_confirmed = Some(is_confirmed);
		self
	}

	pub fn with_in_tx_pool(mut self, in_tx_pool: bool) -> Self {
		self.in_tx_pool = Some(in_tx_pool);
		self
	}

	pub fn with_is_locked(mut self, is_locked: bool) -> Self {
		self.is_locked = Some(is_locked);
		self
	}

	pub fn with_is_incoming(mut self, is_incoming: bool) -> Self {
		self.is_incoming = Some(is_incoming);
		self
	}

	pub fn with_is_outgoing(mut self, is_outgoing: bool) -> Self {
		self.is_outgoing = Some(is_outgoing);
		self
	}

	pub fn with_payment_ids<I, S>(mut self, payment_ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.payment_ids = Some(payment_ids.into_iter().map(Into::into).collect());
		self
	}

	pub fn with_has_payment_id(mut self, has_payment_id: bool) -> Self {
		self.has_payment_id = Some(has_payment_id);
		self
	}

	pub fn with_include_outputs(mut self, include_outputs: bool) -> Self {
		self.include_outputs = Some(include_outputs);
		self
	}

	/// Copy of the scalar constraints without links or placeholder block.
	pub(crate) fn detached(&self) -> Self {
		Self {
			transfer_query: None,
			output_query: None,
			block: None,
			..self.clone()
		}
	}

	/// Whether no field of this query constrains a tx, ignoring links and request flags.
	pub fn is_unconstrained(&self) -> bool {
		Self {
			include_outputs: None,
			..self.detached()
		} == Self::default()
	}
}

/// Filter over wallet transfers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferQuery {
	pub direction: Option<TransferDirection>,
	pub account_index: Option<u32>,
	pub subaddress_index: Option<u32>,
	pub subaddress_indices: Option<Vec<u32>>,
	pub amount: Option<u64>,
	pub address: Option<String>,
	pub addresses: Option<Vec<String>>,
	/// Every listed destination must appear among the candidate's destinations.
	pub destinations: Option<Vec<Destination>>,
	pub has_destinations: Option<bool>,
	/// Filter on the containing transaction. Must be `None` or the tx query embedding this one.
	pub tx_query: Option<TxQueryId>,
}

impl TransferQuery {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_incoming(&self) -> Option<bool> {
		self.direction.map(|d| d == TransferDirection::Incoming)
	}

	pub fn is_outgoing(&self) -> Option<bool> {
		self.direction.map(|d| d == TransferDirection::Outgoing)
	}

	pub fn with_is_incoming(mut self, is_incoming: bool) -> Self {
		self.direction = Some(if is_incoming {
			TransferDirection::Incoming
		} else {
			TransferDirection::Outgoing
		});
		self
	}

	pub fn with_is_outgoing(self, is_outgoing: bool) -> Self {
		self.with_is_incoming(!is_outgoing)
	}

	pub fn with_account_index(mut self, account_index: u32) -> Self {
		self.account_index = Some(account_index);
		self
	}

	pub fn with_subaddress_index(mut self, subaddress_index: u32) -> Self {
		self.subaddress_index = Some(subaddress_index);
		self
	}

	pub fn with_subaddress_indices(mut self, subaddress_indices: Vec<u32>) -> Self {
		self.subaddress_indices = Some(subaddress_indices);
		self
	}

	pub fn with_amount(mut self, amount: u64) -> Self {
		self.amount = Some(amount);
		self
	}

	pub fn with_address(mut self, address: impl Into<String>) -> Self {
		self.address = Some(address.into());
		self
	}

	pub fn with_addresses<I, S>(mut self, addresses: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.addresses = Some(addresses.into_iter().map(Into::into).collect());
		self
	}

	pub fn with_destinations(mut self, destinations: Vec<Destination>) -> Self {
		self.destinations = Some(destinations);
		self
	}

	pub fn with_has_destinations(mut self, has_destinations: bool) -> Self {
		self.has_destinations = Some(has_destinations);
		self
	}

	pub(crate) fn detached(&self) -> Self {
		Self {
			tx_query: None,
			..self.clone()
		}
	}

	/// Whether every field except the tx link is unset.
	pub fn is_unconstrained(&self) -> bool {
		self.detached() == Self::default()
	}
}

/// Filter over wallet outputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputQuery {
	pub account_index: Option<u32>,
	pub subaddress_index: Option<u32>,
	pub subaddress_indices: Option<Vec<u32>>,
	pub amount: Option<u64>,
	pub min_amount: Option<u64>,
	pub max_amount: Option<u64>,
	pub is_spent: Option<bool>,
	pub is_frozen: Option<bool>,
	pub key_image: Option<KeyImage>,
	pub index: Option<u64>,
	pub stealth_public_key: Option<String>,
	/// Filter on the containing transaction. Must be `None` or the tx query embedding this one.
	pub tx_query: Option<TxQueryId>,
}

impl OutputQuery {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_account_index(mut self, account_index: u32) -> Self {
		self.account_index = Some(account_index);
		self
	}

	pub fn with_subaddress_index(mut self, subaddress_index: u32) -> Self {
		self.subaddress_index = Some(subaddress_index);
		self
	}

	pub fn with_subaddress_indices(mut self, subaddress_indices: Vec<u32>) -> Self {
		self.subaddress_indices = Some(subaddress_indices);
		self
	}

	pub fn with_amount(mut self, amount: u64) -> Self {
		self.amount = Some(amount);
		self
	}

	pub fn with_amount_range(mut self, min_amount: Option<u64>, max_amount: Option<u64>) -> Self {
		self.min_amount = min_amount;
		self.max_amount = max_amount;
		self
	}

	pub fn with_is_spent(mut self, is_spent: bool) -> Self {
		self.is_spent = Some(is_spent);
		self
	}

	pub fn with_is_frozen(mut self, is_frozen: bool) -> Self {
		self.is_frozen = Some(is_frozen);
		self
	}

	pub fn with_key_image(mut self, key_image: KeyImage) -> Self {
		self.key_image = Some(key_image);
		self
	}

	pub(crate) fn detached(&self) -> Self {
		Self {
			tx_query: None,
			..self.clone()
		}
	}

	/// Whether every field except the tx link is unset.
	pub fn is_unconstrained(&self) -> bool {
		self.detached() == Self::default()
	}
}

/// Arena of queries addressed by typed ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryGraph {
	tx_queries: Vec<TxQuery>,
	transfer_queries: Vec<TransferQuery>,
	output_queries: Vec<OutputQuery>,
}

impl QueryGraph {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_tx_query(&mut self, query: TxQuery) -> TxQueryId {
		self.tx_queries.push(query);
		TxQueryId(self.tx_queries.len() - 1)
	}

	pub fn add_transfer_query(&mut self, query: TransferQuery) -> TransferQueryId {
		self.transfer_queries.push(query);
		TransferQueryId(self.transfer_queries.len() - 1)
	}

	pub fn add_output_query(&mut self, query: OutputQuery) -> OutputQueryId {
		self.output_queries.push(query);
		OutputQueryId(self.output_queries.len() - 1)
	}

	pub fn tx_query(&self, id: TxQueryId) -> Option<&TxQuery> {
		self.tx_queries.get(id.0)
	}

	pub fn tx_query_mut(&mut self, id: TxQueryId) -> Option<&mut TxQuery> {
		self.tx_queries.get_mut(id.0)
	}

	pub fn transfer_query(&self, id: TransferQueryId) -> Option<&TransferQuery> {
		self.transfer_queries.get(id.0)
	}

	pub fn transfer_query_mut(&mut self, id: TransferQueryId) -> Option<&mut TransferQuery> {
		self.transfer_queries.get_mut(id.0)
	}

	pub fn output_query(&self, id: OutputQueryId) -> Option<&OutputQuery> {
		self.output_queries.get(id.0)
	}

	pub fn output_query_mut(&mut self, id: OutputQueryId) -> Option<&mut OutputQuery> {
		self.output_queries.get_mut(id.0)
	}

	/// Total number of nodes, used to observe whether an operation copied anything.
	pub fn len(&self) -> usize {
		self.tx_queries.len() + self.transfer_queries.len() + self.output_queries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Embed `transfer` in `tx` and point it back at `tx`.
	pub fn link_transfer_query(&mut self, tx: TxQueryId, transfer: TransferQueryId) {
		if let Some(tx_query) = self.tx_queries.get_mut(tx.0) {
			tx_query.transfer_query = Some(transfer);
		}
		if let Some(transfer_query) = self.transfer_queries.get_mut(transfer.0) {
			transfer_query.tx_query = Some(tx);
		}
	}

	/// Embed `output` in `tx` and point it back at `tx`.
	pub fn link_output_query(&mut self, tx: TxQueryId, output: OutputQueryId) {
		if let Some(tx_query) = self.tx_queries.get_mut(tx.0) {
			tx_query.output_query = Some(output);
		}
		if let Some(output_query) = self.output_queries.get_mut(output.0) {
			output_query.tx_query = Some(tx);
		}
	}

	/// Constrain an output query on the lock state of its transaction, creating a tx query
	/// when the output query has none.
	pub fn set_output_is_locked(&mut self, output: OutputQueryId, is_locked: bool) {
		let existing = self.output_query(output).and_then(|q| q.tx_query);
		let tx = match existing {
			Some(tx) => tx,
			None => {
				let tx = self.add_tx_query(TxQuery::new());
				self.link_output_query(tx, output);
				tx
			}
		};
		if let Some(tx_query) = self.tx_query_mut(tx) {
			tx_query.is_locked = Some(is_locked);
		}
	}

	/// Graph containing only `query`.
	pub fn single_tx(query: TxQuery) -> (Self, TxQueryId) {
		let mut graph = Self::new();
		let id = graph.add_tx_query(query);
		(graph, id)
	}

	/// Graph containing only `query`.
	pub fn single_transfer(query: TransferQuery) -> (Self, TransferQueryId) {
		let mut graph = Self::new();
		let id = graph.add_transfer_query(query);
		(graph, id)
	}

	/// Graph containing only `query`.
	pub fn single_output(query: OutputQuery) -> (Self, OutputQueryId) {
		let mut graph = Self::new();
		let id = graph.add_output_query(query);
		(graph, id)
	}
}

impl Index<TxQueryId> for QueryGraph {
	type Output = TxQuery;

	fn index(&self, id: TxQueryId) -> &TxQuery {
		&self.tx_queries[id.0]
	}
}

impl Index<TransferQueryId> for QueryGraph {
	type Output = TransferQuery;

	fn index(&self, id: TransferQueryId) -> &TransferQuery {
		&self.transfer_queries[id.0]
	}
}

impl Index<OutputQueryId> for QueryGraph {
	type Output = OutputQuery;

	fn index(&self, id: OutputQueryId) -> &OutputQuery {
		&self.output_queries[id.0]
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_link_sets_both_directions() {
		let mut graph = QueryGraph::new();
		let tx = graph.add_tx_query(TxQuery::new().with_is_confirmed(true));
		let transfer = graph.add_transfer_query(TransferQuery::new().with_account_index(0));
		graph.link_transfer_query(tx, transfer);
		assert_eq!(graph.tx_query(tx).unwrap().transfer_query, Some(transfer));
		assert_eq!(graph.transfer_query(transfer).unwrap().tx_query, Some(tx));
	}

	#[test]
	fn test_set_output_is_locked_creates_tx_query() {
		let (mut graph, output) = QueryGraph::single_output(OutputQuery::new());
		graph.set_output_is_locked(output, false);
		let tx = graph.output_query(output).unwrap().tx_query.unwrap();
		let tx_query = graph.tx_query(tx).unwrap();
		assert_eq!(tx_query.is_locked, Some(false));
		assert_eq!(tx_query.output_query, Some(output));

		graph.set_output_is_locked(output, true);
		assert_eq!(graph.len(), 2);
		assert_eq!(graph.tx_query(tx).unwrap().is_locked, Some(true));
	}

	#[test]
	fn test_transfer_direction_accessors() {
		let query = TransferQuery::new().with_is_outgoing(true);
		assert_eq!(query.is_outgoing(), Some(true));
		assert_eq!(query.is_incoming(), Some(false));
		assert_eq!(TransferQuery::new().is_incoming(), None);
	}

	#[test]
	fn test_unconstrained_ignores_links_and_request_flags() {
		let mut graph = QueryGraph::new();
		let tx = graph.add_tx_query(TxQuery::new().with_include_outputs(true));
		let transfer = graph.add_transfer_query(TransferQuery::new());
		graph.link_transfer_query(tx, transfer);
		assert!(graph[tx].is_unconstrained());
		assert!(graph[transfer].is_unconstrained());

		assert!(!TxQuery::new().with_has_payment_id(false).is_unconstrained());
		assert!(!TransferQuery::new().with_has_destinations(false).is_unconstrained());
		assert!(!OutputQuery::new().with_is_frozen(false).is_unconstrained());
	}
}
