//! Query normalization.
//!
//! Before a query crosses the boundary its graph must be fully circular: the tx query at the root
//! embeds the transfer/output query being asked for, and that sub-query points back at exactly
//! that tx query. Normalization copies nodes when it has to rewire them, reuses an
//! already-circular graph untouched, and refuses graphs that would encode two different
//! sub-filters for one tx filter.

use super::graph::*;
use crate::engine::{QueryRequest, WireOutputQuery, WireTransferQuery, WireTxQuery};
use crate::model::{Block, TransferDirection};
use crate::wallet::WalletError;
use tracing::debug;

/// Boundary-ready query graph rooted at a tx query carrying a placeholder block.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedQuery {
	graph: QueryGraph,
	tx_query: TxQueryId,
}

impl NormalizedQuery {
	pub fn graph(&self) -> &QueryGraph {
		&self.graph
	}

	pub fn into_graph(self) -> QueryGraph {
		self.graph
	}

	pub fn tx_query_id(&self) -> TxQueryId {
		self.tx_query
	}

	pub fn tx_query(&self) -> &TxQuery {
		&self.graph[self.tx_query]
	}

	pub fn transfer_query_id(&self) -> Option<TransferQueryId> {
		self.tx_query().transfer_query
	}

	pub fn output_query_id(&self) -> Option<OutputQueryId> {
		self.tx_query().output_query
	}

	/// Hashes whose order the results must follow, if the caller asked for specific txs.
	pub fn requested_hashes(&self) -> Option<&[String]> {
		self.tx_query().hashes.as_deref()
	}

	/// Request shape sent to the engine: the root tx query as the only tx of the placeholder
	/// block, with its sub-queries nested and back-references omitted.
	pub fn to_request(&self) -> QueryRequest {
		let tx_query = self.tx_query();
		let transfer_query = tx_query
			.transfer_query
			.map(|id| wire_transfer_query(&self.graph[id]));
		let output_query = tx_query
			.output_query
			.map(|id| wire_output_query(&self.graph[id]));
		QueryRequest {
			txs: vec![WireTxQuery {
				hash: tx_query.hash.clone(),
				tx_hashes: tx_query.hashes.clone(),
				height: tx_query.height,
				min_height: tx_query.min_height,
				max_height: tx_query.max_height,
				fee: tx_query.fee,
				version: tx_query.version,
				unlock_time: tx_query.unlock_time,
				is_confirmed: tx_query.is_confirmed,
				in_tx_pool: tx_query.in_tx_pool,
				is_locked: tx_query.is_locked,
				is_relayed: tx_query.is_relayed,
				is_failed: tx_query.is_failed,
				is_incoming: tx_query.is_incoming,
				is_outgoing: tx_query.is_outgoing,
				payment_ids: tx_query.payment_ids.clone(),
				has_payment_id: tx_query.has_payment_id,
				include_outputs: tx_query.include_outputs,
				transfer_query,
				output_query,
			}],
		}
	}

	pub fn to_request_json(&self) -> Result<String, WalletError> {
		Ok(serde_json::to_string(&self.to_request())?)
	}
}

fn wire_transfer_query(query: &TransferQuery) -> WireTransferQuery {
	WireTransferQuery {
		is_incoming: query.direction.map(|d| d == TransferDirection::Incoming),
		account_index: query.account_index,
		subaddress_index: query.subaddress_index,
		subaddress_indices: query.subaddress_indices.clone(),
		amount: query.amount,
		address: query.address.clone(),
		addresses: query.addresses.clone(),
		destinations: query.destinations.clone(),
		has_destinations: query.has_destinations,
	}
}

fn wire_output_query(query: &OutputQuery) -> WireOutputQuery {
	WireOutputQuery {
		account_index: query.account_index,
		subaddress_index: query.subaddress_index,
		subaddress_indices: query.subaddress_indices.clone(),
		amount: query.amount,
		min_amount: query.min_amount,
		max_amount: query.max_amount,
		is_spent: query.is_spent,
		is_frozen: query.is_frozen,
		key_image: query.key_image.clone(),
		index: query.index,
		stealth_public_key: query.stealth_public_key.clone(),
	}
}

fn dangling(kind: &str) -> WalletError {
	WalletError::Validation(format!("{} query id does not exist in the graph", kind))
}

fn check_tx(graph: &QueryGraph, id: TxQueryId) -> Result<&TxQuery, WalletError> {
	graph.tx_query(id).ok_or_else(|| dangling("Tx"))
}

fn attach_placeholder(graph: &mut QueryGraph, tx: TxQueryId) {
	if let Some(tx_query) = graph.tx_query_mut(tx) {
		if tx_query.block.is_none() {
			tx_query.block = Some(Block::default());
		}
	}
}

/// Link each sub-query of `tx` back to it, failing if one already points elsewhere.
fn close_sub_queries(graph: &mut QueryGraph, tx: TxQueryId) -> Result<(), WalletError> {
	let tx_query = check_tx(graph, tx)?;
	let (transfer, output) = (tx_query.transfer_query, tx_query.output_query);

	if let Some(transfer) = transfer {
		let back = graph
			.transfer_query(transfer)
			.ok_or_else(|| dangling("Transfer"))?
			.tx_query;
		match back {
			None => graph.link_transfer_query(tx, transfer),
			Some(back) if back == tx => {}
			Some(_) => {
				return Err(WalletError::Validation(
					"Transfer query's tx query must be circular reference or null".to_string(),
				));
			}
		}
	}

	if let Some(output) = output {
		let back = graph
			.output_query(output)
			.ok_or_else(|| dangling("Output"))?
			.tx_query;
		match back {
			None => graph.link_output_query(tx, output),
			Some(back) if back == tx => {}
			Some(_) => {
				return Err(WalletError::Validation(
					"Output query's tx query must be circular reference or null".to_string(),
				));
			}
		}
	}

	Ok(())
}

/// Copy `tx` and its sub-queries into fresh nodes wired to the copy.
fn copy_tx_query(graph: &mut QueryGraph, tx: TxQueryId) -> Result<TxQueryId, WalletError> {
	let original = check_tx(graph, tx)?.clone();
	let copy = graph.add_tx_query(original.detached());

	if let Some(transfer) = original.transfer_query {
		let sub = graph
			.transfer_query(transfer)
			.ok_or_else(|| dangling("Transfer"))?;
		if sub.tx_query.is_some_and(|back| back != tx) {
			return Err(WalletError::Validation(
				"Transfer query's tx query must be circular reference or null".to_string(),
			));
		}
		let detached = sub.detached();
		let sub_copy = graph.add_transfer_query(detached);
		graph.link_transfer_query(copy, sub_copy);
	}

	if let Some(output) = original.output_query {
		let sub = graph.output_query(output).ok_or_else(|| dangling("Output"))?;
		if sub.tx_query.is_some_and(|back| back != tx) {
			return Err(WalletError::Validation(
				"Output query's tx query must be circular reference or null".to_string(),
			));
		}
		let detached = sub.detached();
		let sub_copy = graph.add_output_query(detached);
		graph.link_output_query(copy, sub_copy);
	}

	Ok(copy)
}

/// Normalize a tx query. `None` stands for an absent query and yields an unconstrained one.
pub fn normalize_tx_query(
	graph: QueryGraph,
	id: Option<TxQueryId>,
) -> Result<NormalizedQuery, WalletError> {
	let mut graph = graph;
	let tx = match id {
		Some(id) => id,
		None => graph.add_tx_query(TxQuery::new()),
	};
	close_sub_queries(&mut graph, tx)?;
	attach_placeholder(&mut graph, tx);
	Ok(NormalizedQuery {
		graph,
		tx_query: tx,
	})
}

/// Normalize a transfer query so that its tx query embeds exactly it.
pub fn normalize_transfer_query(
	graph: QueryGraph,
	id: Option<TransferQueryId>,
) -> Result<NormalizedQuery, WalletError> {
	let mut graph = graph;
	let transfer = match id {
		None => {
			let transfer = graph.add_transfer_query(TransferQuery::new());
			let tx = graph.add_tx_query(TxQuery::new());
			graph.link_transfer_query(tx, transfer);
			transfer
		}
		Some(id) => {
			let query = graph
				.transfer_query(id)
				.ok_or_else(|| dangling("Transfer"))?
				.clone();
			match query.tx_query {
				None => {
					let copy = graph.add_transfer_query(query.detached());
					let tx = graph.add_tx_query(TxQuery::new());
					graph.link_transfer_query(tx, copy);
					copy
				}
				Some(tx) => match check_tx(&graph, tx)?.transfer_query {
					Some(existing) if existing == id => {
						debug!("Transfer query is already circular, reusing it");
						id
					}
					Some(_) => {
						return Err(WalletError::FilterConflict(
							"Transfer query's tx query already carries a different transfer query"
								.to_string(),
						));
					}
					None => {
						let tx_copy = copy_tx_query(&mut graph, tx)?;
						let copy = graph.add_transfer_query(query.detached());
						graph.link_transfer_query(tx_copy, copy);
						copy
					}
				},
			}
		}
	};

	let tx = graph[transfer]
		.tx_query
		.ok_or_else(|| WalletError::Validation("Transfer query lost its tx query".to_string()))?;
	close_sub_queries(&mut graph, tx)?;
	attach_placeholder(&mut graph, tx);
	Ok(NormalizedQuery {
		graph,
		tx_query: tx,
	})
}

/// Normalize an output query so that its tx query embeds exactly it.
pub fn normalize_output_query(
	graph: QueryGraph,
	id: Option<OutputQueryId>,
) -> Result<NormalizedQuery, WalletError> {
	let mut graph = graph;
	let output = match id {
		None => {
			let output = graph.add_output_query(OutputQuery::new());
			let tx = graph.add_tx_query(TxQuery::new());
			graph.link_output_query(tx, output);
			output
		}
		Some(id) => {
			let query = graph
				.output_query(id)
				.ok_or_else(|| dangling("Output"))?
				.clone();
			match query.tx_query {
				None => {
					let copy = graph.add_output_query(query.detached());
					let tx = graph.add_tx_query(TxQuery::new());
					graph.link_output_query(tx, copy);
					copy
				}
				Some(tx) => match check_tx(&graph, tx)?.output_query {
					Some(existing) if existing == id => {
						debug!("Output query is already circular, reusing it");
						id
					}
					Some(_) => {
						return Err(WalletError::FilterConflict(
							"Output query's tx query already carries a different output query"
								.to_string(),
						));
					}
					None => {
						let tx_copy = copy_tx_query(&mut graph, tx)?;
						let copy = graph.add_output_query(query.detached());
						graph.link_output_query(tx_copy, copy);
						copy
					}
				},
			}
		}
	};

	let tx = graph[output]
		.tx_query
		.ok_or_else(|| WalletError::Validation("Output query lost its tx query".to_string()))?;
	close_sub_queries(&mut graph, tx)?;
	attach_placeholder(&mut graph, tx);
	Ok(NormalizedQuery {
		graph,
		tx_query: tx,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::KeyImage;

	#[test]
	fn test_absent_transfer_query_yields_fresh_circular_graph() {
		let normalized = normalize_transfer_query(QueryGraph::new(), None).unwrap();
		let transfer = normalized.transfer_query_id().unwrap();
		assert_eq!(normalized.graph()[transfer].tx_query, Some(normalized.tx_query_id()));
		assert!(normalized.tx_query().block.as_ref().unwrap().is_placeholder());
		assert_eq!(normalized.graph().len(), 2);
	}

	#[test]
	fn test_transfer_query_without_tx_query_is_copied() {
		let (graph, original) =
			QueryGraph::single_transfer(TransferQuery::new().with_account_index(1));
		let normalized = normalize_transfer_query(graph, Some(original)).unwrap();
		let transfer = normalized.transfer_query_id().unwrap();
		assert_ne!(transfer, original);
		assert_eq!(normalized.graph()[transfer].account_index, Some(1));
		assert_eq!(normalized.graph()[transfer].tx_query, Some(normalized.tx_query_id()));
		// the caller's node is untouched
		assert_eq!(normalized.graph()[original].tx_query, None);
	}

	#[test]
	fn test_self_circular_transfer_query_is_reused() {
		let mut graph = QueryGraph::new();
		let tx = graph.add_tx_query(TxQuery::new().with_is_confirmed(true));
		let transfer = graph.add_transfer_query(TransferQuery::new().with_is_incoming(true));
		graph.link_transfer_query(tx, transfer);
		let before = graph.len();

		let normalized = normalize_transfer_query(graph, Some(transfer)).unwrap();
		assert_eq!(normalized.tx_query_id(), tx);
		assert_eq!(normalized.transfer_query_id(), Some(transfer));
		assert_eq!(normalized.graph().len(), before);
	}

	#[test]
	fn test_normalization_is_idempotent() {
		let (graph, transfer) = QueryGraph::single_transfer(TransferQuery::new().with_amount(5));
		let once = normalize_transfer_query(graph, Some(transfer)).unwrap();
		let transfer = once.transfer_query_id().unwrap();
		let twice = normalize_transfer_query(once.clone().into_graph(), Some(transfer)).unwrap();
		assert_eq!(once, twice);

		let (graph, output) = QueryGraph::single_output(OutputQuery::new().with_is_spent(false));
		let once = normalize_output_query(graph, Some(output)).unwrap();
		let output = once.output_query_id().unwrap();
		let twice = normalize_output_query(once.clone().into_graph(), Some(output)).unwrap();
		assert_eq!(once, twice);
	}

	#[test]
	fn test_foreign_tx_query_is_copied_and_rewired() {
		let mut graph = QueryGraph::new();
		let foreign = graph.add_tx_query(TxQuery::new().with_is_confirmed(true));
		let transfer = graph.add_transfer_query(TransferQuery {
			tx_query: Some(foreign),
			..TransferQuery::new().with_account_index(0)
		});

		let normalized = normalize_transfer_query(graph, Some(transfer)).unwrap();
		let tx = normalized.tx_query_id();
		let copy = normalized.transfer_query_id().unwrap();
		assert_ne!(tx, foreign);
		assert_ne!(copy, transfer);
		assert_eq!(normalized.tx_query().is_confirmed, Some(true));
		assert_eq!(normalized.graph()[copy].tx_query, Some(tx));
		assert_eq!(normalized.graph()[copy].account_index, Some(0));
		// the foreign tx query still has no transfer query
		assert_eq!(normalized.graph()[foreign].transfer_query, None);
	}

	#[test]
	fn test_foreign_tx_query_with_other_transfer_query_conflicts() {
		let mut graph = QueryGraph::new();
		let foreign = graph.add_tx_query(TxQuery::new());
		let other = graph.add_transfer_query(TransferQuery::new().with_amount(1));
		graph.link_transfer_query(foreign, other);
		let transfer = graph.add_transfer_query(TransferQuery {
			tx_query: Some(foreign),
			..TransferQuery::new()
		});

		let err = normalize_transfer_query(graph, Some(transfer)).unwrap_err();
		assert!(matches!(err, WalletError::FilterConflict(_)));
	}

	#[test]
	fn test_foreign_output_tx_query_keeps_its_transfer_query() {
		let mut graph = QueryGraph::new();
		let foreign = graph.add_tx_query(TxQuery::new().with_is_locked(false));
		let sibling = graph.add_transfer_query(TransferQuery::new().with_is_incoming(true));
		graph.link_transfer_query(foreign, sibling);
		let output = graph.add_output_query(OutputQuery {
			tx_query: Some(foreign),
			..OutputQuery::new().with_key_image(KeyImage::new("ab"))
		});

		let normalized = normalize_output_query(graph, Some(output)).unwrap();
		let tx = normalized.tx_query_id();
		let output_copy = normalized.output_query_id().unwrap();
		let transfer_copy = normalized.transfer_query_id().unwrap();
		assert_ne!(transfer_copy, sibling);
		assert_eq!(normalized.graph()[output_copy].tx_query, Some(tx));
		assert_eq!(normalized.graph()[transfer_copy].tx_query, Some(tx));
		assert_eq!(normalized.graph()[transfer_copy].is_incoming(), Some(true));
	}

	#[test]
	fn test_output_conflict() {
		let mut graph = QueryGraph::new();
		let foreign = graph.add_tx_query(TxQuery::new());
		let other = graph.add_output_query(OutputQuery::new());
		graph.link_output_query(foreign, other);
		let output = graph.add_output_query(OutputQuery {
			tx_query: Some(foreign),
			..OutputQuery::new()
		});
		assert!(matches!(
			normalize_output_query(graph, Some(output)),
			Err(WalletError::FilterConflict(_))
		));
	}

	#[test]
	fn test_tx_query_with_cross_wired_sub_query_is_rejected() {
		let mut graph = QueryGraph::new();
		let tx = graph.add_tx_query(TxQuery::new());
		let elsewhere = graph.add_tx_query(TxQuery::new());
		let transfer = graph.add_transfer_query(TransferQuery {
			tx_query: Some(elsewhere),
			..TransferQuery::new()
		});
		graph.tx_query_mut(tx).unwrap().transfer_query = Some(transfer);

		let err = normalize_tx_query(graph, Some(tx)).unwrap_err();
		assert!(matches!(err, WalletError::Validation(_)));
	}

	#[test]
	fn test_tx_query_links_unset_back_references() {
		let mut graph = QueryGraph::new();
		let output = graph.add_output_query(OutputQuery::new().with_is_spent(false));
		let tx = graph.add_tx_query(TxQuery {
			output_query: Some(output),
			..TxQuery::new()
		});
		let normalized = normalize_tx_query(graph, Some(tx)).unwrap();
		assert_eq!(normalized.graph()[output].tx_query, Some(tx));
	}

	#[test]
	fn test_dangling_ids_are_validation_errors() {
		let (_, transfer) = QueryGraph::single_transfer(TransferQuery::new());
		let err = normalize_transfer_query(QueryGraph::new(), Some(transfer)).unwrap_err();
		assert!(matches!(err, WalletError::Validation(_)));
	}

	#[test]
	fn test_request_is_rooted_at_tx_query() {
		let (graph, output) =
			QueryGraph::single_output(OutputQuery::new().with_account_index(0).with_is_spent(false));
		let normalized = normalize_output_query(graph, Some(output)).unwrap();
		assert_eq!(
			normalized.to_request_json().unwrap(),
			r#"{"txs":[{"outputQuery":{"accountIndex":0,"isSpent":false}}]}"#
		);
	}

	#[test]
	fn test_requested_hashes() {
		let (graph, tx) = QueryGraph::single_tx(TxQuery::new().with_hashes(["h3", "h1"]));
		let normalized = normalize_tx_query(graph, Some(tx)).unwrap();
		assert_eq!(
			normalized.requested_hashes().unwrap(),
			&["h3".to_string(), "h1".to_string()]
		);
	}
}
