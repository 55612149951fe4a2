//! Criteria matching of queries against wallet entities.
//!
//! Every constraint is tri-state: an unset field accepts anything, a set field must be satisfied
//! by a present candidate value. Nested filters are followed one way only: a tx query descends
//! into its transfer/output queries, a transfer/output query ascends to its tx query, and neither
//! turns back.

use super::graph::*;
use super::normalizer::NormalizedQuery;
use crate::model::{Destination, KeyImage, OutputWallet, Transfer, TxWallet};

/// Predicate over candidates of type `T`.
pub trait Filter<T> {
	/// Whether `candidate` satisfies every constraint of the filter.
	fn meets_criteria(&self, candidate: &T) -> bool;

	/// Whether the filter places no constraint, judged against the empty candidate.
	fn is_default(&self) -> bool;
}

/// View of a tx query inside its graph.
#[derive(Debug, Clone, Copy)]
pub struct TxQueryRef<'a> {
	graph: &'a QueryGraph,
	id: TxQueryId,
}

/// View of a transfer query inside its graph.
#[derive(Debug, Clone, Copy)]
pub struct TransferQueryRef<'a> {
	graph: &'a QueryGraph,
	id: TransferQueryId,
}

/// View of an output query inside its graph.
#[derive(Debug, Clone, Copy)]
pub struct OutputQueryRef<'a> {
	graph: &'a QueryGraph,
	id: OutputQueryId,
}

impl<'a> TxQueryRef<'a> {
	pub fn new(graph: &'a QueryGraph, id: TxQueryId) -> Option<Self> {
		graph.tx_query(id).map(|_| Self { graph, id })
	}

	pub fn query(&self) -> &'a TxQuery {
		&self.graph[self.id]
	}
}

impl<'a> TransferQueryRef<'a> {
	pub fn new(graph: &'a QueryGraph, id: TransferQueryId) -> Option<Self> {
		graph.transfer_query(id).map(|_| Self { graph, id })
	}

	pub fn query(&self) -> &'a TransferQuery {
		&self.graph[self.id]
	}
}

impl<'a> OutputQueryRef<'a> {
	pub fn new(graph: &'a QueryGraph, id: OutputQueryId) -> Option<Self> {
		graph.output_query(id).map(|_| Self { graph, id })
	}

	pub fn query(&self) -> &'a OutputQuery {
		&self.graph[self.id]
	}
}

impl NormalizedQuery {
	pub fn tx_filter(&self) -> TxQueryRef<'_> {
		TxQueryRef {
			graph: self.graph(),
			id: self.tx_query_id(),
		}
	}

	pub fn transfer_filter(&self) -> Option<TransferQueryRef<'_>> {
		self.transfer_query_id()
			.and_then(|id| TransferQueryRef::new(self.graph(), id))
	}

	pub fn output_filter(&self) -> Option<OutputQueryRef<'_>> {
		self.output_query_id()
			.and_then(|id| OutputQueryRef::new(self.graph(), id))
	}
}

impl Filter<TxWallet> for TxQueryRef<'_> {
	fn meets_criteria(&self, candidate: &TxWallet) -> bool {
		tx_matches(self.graph, self.id, candidate, true)
	}

	fn is_default(&self) -> bool {
		self.meets_criteria(&TxWallet::default())
	}
}

impl Filter<Transfer> for TransferQueryRef<'_> {
	fn meets_criteria(&self, candidate: &Transfer) -> bool {
		transfer_matches(self.graph, self.id, candidate, true)
	}

	fn is_default(&self) -> bool {
		self.meets_criteria(&Transfer::default())
	}
}

impl Filter<OutputWallet> for OutputQueryRef<'_> {
	fn meets_criteria(&self, candidate: &OutputWallet) -> bool {
		output_matches(self.graph, self.id, candidate, true)
	}

	fn is_default(&self) -> bool {
		self.meets_criteria(&OutputWallet::default())
	}
}

/// A set filter value requires an equal, present candidate value.
fn scalar<T: PartialEq>(filter: &Option<T>, candidate: &Option<T>) -> bool {
	match filter {
		None => true,
		Some(expected) => candidate.as_ref() == Some(expected),
	}
}

/// A set filter list requires a present candidate value contained in it.
fn member<T: PartialEq>(filter: &Option<Vec<T>>, candidate: &Option<T>) -> bool {
	match (filter, candidate) {
		(None, _) => true,
		(Some(set), Some(value)) => set.contains(value),
		(Some(_), None) => false,
	}
}

/// A set bound requires a present candidate value within it, bounds inclusive.
fn in_range(min: Option<u64>, max: Option<u64>, candidate: Option<u64>) -> bool {
	if min.is_none() && max.is_none() {
		return true;
	}
	let Some(value) = candidate else {
		return false;
	};
	min.is_none_or(|min| value >= min) && max.is_none_or(|max| value <= max)
}

fn existence<T>(filter: Option<bool>, candidate: Option<&[T]>) -> bool {
	let present = candidate.is_some_and(|items| !items.is_empty());
	filter.is_none_or(|expected| expected == present)
}

fn key_image_matches(filter: &Option<KeyImage>, candidate: &Option<KeyImage>) -> bool {
	let Some(filter) = filter else {
		return true;
	};
	let Some(candidate) = candidate else {
		return false;
	};
	scalar(&filter.hex, &candidate.hex) && scalar(&filter.signature, &candidate.signature)
}

/// Every filter destination must be present among the candidate destinations.
fn destinations_match(filter: &Option<Vec<Destination>>, candidate: &Option<Vec<Destination>>) -> bool {
	let Some(required) = filter else {
		return true;
	};
	let available = candidate.as_deref().unwrap_or_default();
	required.iter().all(|wanted| {
		available
			.iter()
			.any(|dest| scalar(&wanted.address, &dest.address) && scalar(&wanted.amount, &dest.amount))
	})
}

fn tx_matches(graph: &QueryGraph, id: TxQueryId, tx: &TxWallet, descend: bool) -> bool {
	let Some(query) = graph.tx_query(id) else {
		return true;
	};

	if !scalar(&query.hash, &tx.hash)
		|| !member(&query.hashes, &tx.hash)
		|| !scalar(&query.height, &tx.height())
		|| !in_range(query.min_height, query.max_height, tx.height())
		|| !scalar(&query.fee, &tx.fee)
		|| !scalar(&query.version, &tx.version)
		|| !scalar(&query.unlock_time, &tx.unlock_time)
		|| !scalar(&query.is_confirmed, &tx.is_confirmed)
		|| !scalar(&query.in_tx_pool, &tx.in_tx_pool)
		|| !scalar(&query.is_locked, &tx.is_locked)
		|| !scalar(&query.is_relayed, &tx.is_relayed)
		|| !scalar(&query.is_failed, &tx.is_failed)
		|| !scalar(&query.is_incoming, &tx.is_incoming)
		|| !scalar(&query.is_outgoing, &tx.is_outgoing)
		|| !member(&query.payment_ids, &tx.payment_id)
	{
		return false;
	}
	if let Some(has_payment_id) = query.has_payment_id {
		if has_payment_id != tx.payment_id.is_some() {
			return false;
		}
	}

	if !descend {
		return true;
	}

	let nested_transfer = query
		.transfer_query
		.filter(|&id| graph.transfer_query(id).is_some_and(|nested| !nested.is_unconstrained()));
	if let Some(transfer_id) = nested_transfer {
		if !tx
			.transfers
			.iter()
			.any(|transfer| transfer_matches(graph, transfer_id, transfer, false))
		{
			return false;
		}
	}

	let nested_output = query
		.output_query
		.filter(|&id| graph.output_query(id).is_some_and(|nested| !nested.is_unconstrained()));
	if let Some(output_id) = nested_output {
		if !tx.outputs.iter().any(|output| output_matches(graph, output_id, output, false)) {
			return false;
		}
	}

	true
}

/// Ascend to the tx query unless it sets no field of its own.
fn owning_tx_matches(graph: &QueryGraph, tx_query: Option<TxQueryId>, tx: Option<std::sync::Arc<TxWallet>>) -> bool {
	let constrained = tx_query.filter(|&id| graph.tx_query(id).is_some_and(|query| !query.is_unconstrained()));
	let Some(tx_query) = constrained else {
		return true;
	};
	tx.is_some_and(|tx| tx_matches(graph, tx_query, &tx, false))
}

fn transfer_matches(graph: &QueryGraph, id: TransferQueryId, transfer: &Transfer, ascend: bool) -> bool {
	let Some(query) = graph.transfer_query(id) else {
		return true;
	};

	if !scalar(&query.direction, &transfer.direction)
		|| !scalar(&query.account_index, &transfer.account_index)
		|| !scalar(&query.amount, &transfer.amount)
		|| !scalar(&query.address, &transfer.address)
		|| !member(&query.addresses, &transfer.address)
		|| !existence(query.has_destinations, transfer.destinations.as_deref())
		|| !destinations_match(&query.destinations, &transfer.destinations)
	{
		return false;
	}

	// Incoming transfers carry one receiving subaddress, outgoing ones the spending set.
	let spent_from = transfer.subaddress_indices.as_deref().unwrap_or_default();
	if let Some(index) = query.subaddress_index {
		if transfer.subaddress_index != Some(index) && !spent_from.contains(&index) {
			return false;
		}
	}
	if let Some(indices) = &query.subaddress_indices {
		let received = transfer.subaddress_index.is_some_and(|index| indices.contains(&index));
		if !received && !spent_from.iter().any(|index| indices.contains(index)) {
			return false;
		}
	}

	!ascend || owning_tx_matches(graph, query.tx_query, transfer.tx())
}

fn output_matches(graph: &QueryGraph, id: OutputQueryId, output: &OutputWallet, ascend: bool) -> bool {
	let Some(query) = graph.output_query(id) else {
		return true;
	};

	if !scalar(&query.account_index, &output.account_index)
		|| !scalar(&query.subaddress_index, &output.subaddress_index)
		|| !member(&query.subaddress_indices, &output.subaddress_index)
		|| !scalar(&query.amount, &output.amount)
		|| !in_range(query.min_amount, query.max_amount, output.amount)
		|| !scalar(&query.is_spent, &output.is_spent)
		|| !scalar(&query.is_frozen, &output.is_frozen)
		|| !scalar(&query.index, &output.index)
		|| !scalar(&query.stealth_public_key, &output.stealth_public_key)
		|| !key_image_matches(&query.key_image, &output.key_image)
	{
		return false;
	}

	!ascend || owning_tx_matches(graph, query.tx_query, output.tx())
}
