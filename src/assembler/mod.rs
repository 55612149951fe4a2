//! Result assembly.
//!
//! Engine responses arrive as flat, block-shaped JSON. This module rebuilds the entity graph from
//! them: each transaction owns its transfers and outputs, which point back at it; transactions
//! delivered in the placeholder block lose their block reference; results are re-sorted to the
//! caller's requested hash order; and empty strings are collapsed to `None` on the way in.

use crate::engine::*;
use crate::model::*;
use crate::query::{Filter, NormalizedQuery};
use crate::wallet::WalletError;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

/// Collapse an empty string to `None`.
pub fn non_empty(value: Option<String>) -> Option<String> {
	value.filter(|s| !s.is_empty())
}

/// Decode any JSON response, logging the payload kind on failure.
pub fn decode<T: DeserializeOwned>(json: &str) -> Result<T, WalletError> {
	serde_json::from_str(json).map_err(|e| {
		warn!(
			"Failed to decode {} from engine response: {}",
			std::any::type_name::<T>(),
			e
		);
		WalletError::from(e)
	})
}

/// Block-shaped containers of a tx, transfer or output response.
pub fn deserialize_blocks(json: &str) -> Result<Vec<WireBlock>, WalletError> {
	let container: BlocksContainer = decode(json)?;
	Ok(container.blocks.unwrap_or_default())
}

fn key_image(wire: Option<KeyImage>) -> Option<KeyImage> {
	wire.map(|ki| KeyImage {
		hex: non_empty(ki.hex),
		signature: non_empty(ki.signature),
	})
}

fn output(wire: WireOutput, tx: &Weak<TxWallet>) -> OutputWallet {
	OutputWallet {
		account_index: wire.account_index,
		subaddress_index: wire.subaddress_index,
		amount: wire.amount,
		is_spent: wire.is_spent,
		is_frozen: wire.is_frozen,
		key_image: key_image(wire.key_image),
		index: wire.index,
		stealth_public_key: non_empty(wire.stealth_public_key),
		ring_output_indices: wire.ring_output_indices,
		tx: tx.clone(),
	}
}

fn transfer(wire: WireTransfer, direction: TransferDirection, tx: &Weak<TxWallet>) -> Transfer {
	Transfer {
		direction: Some(direction),
		account_index: wire.account_index,
		subaddress_index: wire.subaddress_index,
		subaddress_indices: wire.subaddress_indices,
		amount: wire.amount,
		address: non_empty(wire.address),
		destinations: wire.destinations.map(|destinations| {
			destinations
				.into_iter()
				.map(|d| Destination {
					address: non_empty(d.address),
					amount: d.amount,
				})
				.collect()
		}),
		num_suggested_confirmations: wire.num_suggested_confirmations,
		tx: tx.clone(),
	}
}

/// Build one transaction with its back-references wired.
pub fn build_tx(wire: WireTx, block: Option<Arc<Block>>) -> Arc<TxWallet> {
	Arc::new_cyclic(|weak: &Weak<TxWallet>| {
		let mut transfers = Vec::new();
		if let Some(outgoing) = wire.outgoing_transfer {
			transfers.push(transfer(outgoing, TransferDirection::Outgoing, weak));
		}
		for incoming in wire.incoming_transfers.unwrap_or_default() {
			transfers.push(transfer(incoming, TransferDirection::Incoming, weak));
		}

		TxWallet {
			hash: non_empty(wire.hash),
			block,
			fee: wire.fee,
			version: wire.version,
			unlock_time: wire.unlock_time,
			is_confirmed: wire.is_confirmed,
			in_tx_pool: wire.in_tx_pool,
			is_locked: wire.is_locked,
			is_relayed: wire.is_relayed,
			is_failed: wire.is_failed,
			is_incoming: wire.is_incoming,
			is_outgoing: wire.is_outgoing,
			num_confirmations: wire.num_confirmations,
			payment_id: non_empty(wire.payment_id),
			note: non_empty(wire.note),
			key: non_empty(wire.key),
			transfers,
			outputs: wire
				.outputs
				.unwrap_or_default()
				.into_iter()
				.map(|o| output(o, weak))
				.collect(),
			inputs: wire
				.inputs
				.unwrap_or_default()
				.into_iter()
				.map(|o| output(o, weak))
				.collect(),
		}
	})
}

/// Flatten blocks into transactions, detaching the placeholder block.
fn collect_txs(blocks: Vec<WireBlock>) -> Vec<Arc<TxWallet>> {
	let mut txs = Vec::new();
	for wire_block in blocks {
		let block = wire_block.height.map(|height| {
			Arc::new(Block {
				height: Some(height),
				hash: non_empty(wire_block.hash),
				timestamp: wire_block.timestamp,
			})
		});
		for wire_tx in wire_block.txs {
			txs.push(build_tx(wire_tx, block.clone()));
		}
	}
	txs
}

/// Re-sort `txs` to `hashes`; hashes without a result become holes.
pub fn order_by_hashes(txs: Vec<Arc<TxWallet>>, hashes: &[String]) -> Vec<Option<Arc<TxWallet>>> {
	let mut by_hash: HashMap<String, Arc<TxWallet>> = HashMap::new();
	for tx in txs {
		if let Some(hash) = tx.hash.clone() {
			by_hash.insert(hash, tx);
		}
	}
	hashes.iter().map(|hash| by_hash.get(hash).cloned()).collect()
}

/// Assemble a tx response.
///
/// With `requested_hashes` the result has exactly one entry per requested hash, in that order,
/// `None` where the engine returned nothing. Without it every entry is `Some`.
pub fn assemble_txs(
	json: &str,
	requested_hashes: Option<&[String]>,
) -> Result<Vec<Option<Arc<TxWallet>>>, WalletError> {
	let txs = collect_txs(deserialize_blocks(json)?);
	debug!("Assembled {} transactions", txs.len());
	Ok(match requested_hashes {
		Some(hashes) => order_by_hashes(txs, hashes),
		None => txs.into_iter().map(Some).collect(),
	})
}

/// Assemble a transfer response into flat handles, outgoing before incoming per tx.
pub fn assemble_transfers(json: &str) -> Result<Vec<TransferRef>, WalletError> {
	let transfers: Vec<TransferRef> = collect_txs(deserialize_blocks(json)?)
		.iter()
		.flat_map(|tx| tx.transfer_refs())
		.collect();
	debug!("Assembled {} transfers", transfers.len());
	Ok(transfers)
}

/// Assemble an output response into flat handles.
pub fn assemble_outputs(json: &str) -> Result<Vec<OutputRef>, WalletError> {
	let outputs: Vec<OutputRef> = collect_txs(deserialize_blocks(json)?)
		.iter()
		.flat_map(|tx| tx.output_refs())
		.collect();
	debug!("Assembled {} outputs", outputs.len());
	Ok(outputs)
}

/// Re-apply the tx filter locally. Holes stay holes, rejected txs become holes.
pub fn filter_txs(txs: Vec<Option<Arc<TxWallet>>>, query: &NormalizedQuery) -> Vec<Option<Arc<TxWallet>>> {
	let filter = query.tx_filter();
	if filter.is_default() {
		return txs;
	}
	let keep_holes = query.requested_hashes().is_some();
	txs.into_iter()
		.filter_map(|tx| match tx {
			Some(tx) if filter.meets_criteria(&tx) => Some(Some(tx)),
			_ if keep_holes => Some(None),
			_ => None,
		})
		.collect()
}

pub fn filter_transfers(transfers: Vec<TransferRef>, query: &NormalizedQuery) -> Vec<TransferRef> {
	match query.transfer_filter() {
		Some(filter) if !filter.is_default() => transfers
			.into_iter()
			.filter(|transfer| filter.meets_criteria(transfer.transfer()))
			.collect(),
		_ => transfers,
	}
}

pub fn filter_outputs(outputs: Vec<OutputRef>, query: &NormalizedQuery) -> Vec<OutputRef> {
	match query.output_filter() {
		Some(filter) if !filter.is_default() => outputs
			.into_iter()
			.filter(|output| filter.meets_criteria(output.output()))
			.collect(),
		_ => outputs,
	}
}

fn sanitize_subaddress(subaddress: Subaddress) -> Subaddress {
	Subaddress {
		address: non_empty(subaddress.address),
		label: non_empty(subaddress.label),
		..subaddress
	}
}

fn sanitize_account(account: Account) -> Account {
	Account {
		primary_address: non_empty(account.primary_address),
		label: non_empty(account.label),
		tag: non_empty(account.tag),
		subaddresses: account
			.subaddresses
			.map(|subaddresses| subaddresses.into_iter().map(sanitize_subaddress).collect()),
		..account
	}
}

pub fn decode_accounts(json: &str) -> Result<Vec<Account>, WalletError> {
	let container: AccountsContainer = decode(json)?;
	Ok(container
		.accounts
		.unwrap_or_default()
		.into_iter()
		.map(sanitize_account)
		.collect())
}

pub fn decode_account(json: &str) -> Result<Account, WalletError> {
	decode(json).map(sanitize_account)
}

pub fn decode_subaddresses(json: &str) -> Result<Vec<Subaddress>, WalletError> {
	let container: SubaddressesContainer = decode(json)?;
	Ok(container
		.subaddresses
		.unwrap_or_default()
		.into_iter()
		.map(sanitize_subaddress)
		.collect())
}

pub fn decode_subaddress(json: &str) -> Result<Subaddress, WalletError> {
	decode(json).map(sanitize_subaddress)
}

pub fn decode_key_images(json: &str) -> Result<Vec<KeyImage>, WalletError> {
	let container: KeyImagesContainer = decode(json)?;
	Ok(container
		.key_images
		.unwrap_or_default()
		.into_iter()
		.filter_map(|ki| key_image(Some(ki)))
		.collect())
}

pub fn decode_address_book(json: &str) -> Result<Vec<AddressBookEntry>, WalletError> {
	let container: AddressBookEntriesContainer = decode(json)?;
	Ok(container
		.entries
		.unwrap_or_default()
		.into_iter()
		.map(|entry| AddressBookEntry {
			address: non_empty(entry.address),
			payment_id: non_empty(entry.payment_id),
			description: non_empty(entry.description),
			..entry
		})
		.collect())
}

fn tx_set(wire: WireTxSet) -> TxSet {
	TxSet {
		txs: wire
			.txs
			.unwrap_or_default()
			.into_iter()
			.map(|tx| build_tx(tx, None))
			.collect(),
		multisig_tx_hex: non_empty(wire.multisig_tx_hex),
		unsigned_tx_hex: non_empty(wire.unsigned_tx_hex),
		signed_tx_hex: non_empty(wire.signed_tx_hex),
	}
}

pub fn decode_tx_set(json: &str) -> Result<TxSet, WalletError> {
	decode::<WireTxSet>(json).map(tx_set)
}

pub fn decode_tx_sets(json: &str) -> Result<Vec<TxSet>, WalletError> {
	let container: TxSetsContainer = decode(json)?;
	Ok(container
		.tx_sets
		.unwrap_or_default()
		.into_iter()
		.map(tx_set)
		.collect())
}
