//! Wire types exchanged with the wallet engine.
//!
//! Structured values cross the boundary as JSON. Requests are rooted at a block-shaped object
//! whose transaction list carries the query; responses are lists of block-shaped objects with
//! nested transactions, transfers and outputs. Empty strings denote absent values.

use crate::model::{Destination, KeyImage, SyncProgress};
use serde::{Deserialize, Serialize};

/// Container returned by the tx, transfer and output queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlocksContainer {
	pub blocks: Option<Vec<WireBlock>>,
}

/// Block-shaped container. A missing height marks the placeholder holding unconfirmed txs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireBlock {
	pub height: Option<u64>,
	pub hash: Option<String>,
	pub timestamp: Option<u64>,
	pub txs: Vec<WireTx>,
}

/// Transaction as returned by the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireTx {
	pub hash: Option<String>,
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
	pub num_confirmations: Option<u64>,
	pub payment_id: Option<String>,
	pub note: Option<String>,
	pub key: Option<String>,
	pub outgoing_transfer: Option<WireTransfer>,
	pub incoming_transfers: Option<Vec<WireTransfer>>,
	pub outputs: Option<Vec<WireOutput>>,
	pub inputs: Option<Vec<WireOutput>>,
}

/// Transfer as returned by the engine; direction is implied by its position in the tx.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireTransfer {
	pub account_index: Option<u32>,
	pub subaddress_index: Option<u32>,
	pub subaddress_indices: Option<Vec<u32>>,
	pub amount: Option<u64>,
	pub address: Option<String>,
	pub destinations: Option<Vec<Destination>>,
	pub num_suggested_confirmations: Option<u64>,
}

/// Output as returned by the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireOutput {
	pub account_index: Option<u32>,
	pub subaddress_index: Option<u32>,
	pub amount: Option<u64>,
	pub is_spent: Option<bool>,
	pub is_frozen: Option<bool>,
	pub key_image: Option<KeyImage>,
	pub index: Option<u64>,
	pub stealth_public_key: Option<String>,
	pub ring_output_indices: Option<Vec<u64>>,
}

/// Tx set as returned by send, sweep and parse calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireTxSet {
	pub txs: Option<Vec<WireTx>>,
	pub multisig_tx_hex: Option<String>,
	pub unsigned_tx_hex: Option<String>,
	pub signed_tx_hex: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TxSetsContainer {
	pub tx_sets: Option<Vec<WireTxSet>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountsContainer {
	pub accounts: Option<Vec<crate::model::Account>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubaddressesContainer {
	pub subaddresses: Option<Vec<crate::model::Subaddress>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyImagesContainer {
	pub key_images: Option<Vec<KeyImage>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressBookEntriesContainer {
	pub entries: Option<Vec<crate::model::AddressBookEntry>>,
}

/// Query request rooted at the placeholder block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
	pub txs: Vec<WireTxQuery>,
}

/// Tx query fields; the related queries are nested, the back-references are not serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireTxQuery {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub hash: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub tx_hashes: Option<Vec<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub height: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub min_height: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max_height: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub fee: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub version: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub unlock_time: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_confirmed: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub in_tx_pool: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_locked: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_relayed: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_failed: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_incoming: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_outgoing: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub payment_ids: Option<Vec<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub has_payment_id: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub include_outputs: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub transfer_query: Option<WireTransferQuery>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub output_query: Option<WireOutputQuery>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireTransferQuery {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_incoming: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub account_index: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub subaddress_index: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub subaddress_indices: Option<Vec<u32>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub amount: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub address: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub addresses: Option<Vec<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub destinations: Option<Vec<Destination>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub has_destinations: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireOutputQuery {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub account_index: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub subaddress_index: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub subaddress_indices: Option<Vec<u32>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub amount: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub min_amount: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max_amount: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_spent: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_frozen: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub key_image: Option<KeyImage>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub index: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub stealth_public_key: Option<String>,
}

/// Notifications pushed by the engine from its own thread.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineNotification {
	/// Chain scan progress
	SyncProgress(SyncProgress),
	/// A new block was processed
	NewBlock { height: u64 },
	/// The wallet received an output. A height of 0 means unconfirmed.
	OutputReceived {
		height: u64,
		tx_hash: String,
		/// Decimal atomic units
		amount: String,
		account_index: u32,
		subaddress_index: u32,
		version: u32,
		unlock_time: u64,
	},
	/// An output of the wallet was spent. A height of 0 means unconfirmed.
	OutputSpent {
		height: u64,
		tx_hash: String,
		amount: String,
		account_index: u32,
		subaddress_index: u32,
		version: u32,
	},
}

/// Error types for wallet engine calls
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
	#[error("Engine call failed: {0}")]
	Failed(String),

	#[error("Not supported by engine: {0}")]
	NotSupported(String),
}
