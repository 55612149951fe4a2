use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::{Arc, Weak};

/// A key image proving that an output has been spent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyImage {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub hex: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub signature: Option<String>,
}

impl KeyImage {
	pub fn new(hex: impl Into<String>) -> Self {
		Self {
			hex: Some(hex.into()),
			signature: None,
		}
	}

	pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
		self.signature = Some(signature.into());
		self
	}
}

/// Destination of an outgoing transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Destination {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub address: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub amount: Option<u64>,
}

impl Destination {
	pub fn new(address: impl Into<String>, amount: u64) -> Self {
		Self {
			address: Some(address.into()),
			amount: Some(amount),
		}
	}
}

/// Block containing wallet transactions.
///
/// A block without a height is a placeholder used to carry unconfirmed transactions (or query
/// constraints) through the boundary. Assembled transactions never reference a placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
	pub height: Option<u64>,
	pub hash: Option<String>,
	pub timestamp: Option<u64>,
}

impl Block {
	pub fn at_height(height: u64) -> Self {
		Self {
			height: Some(height),
			..Default::default()
		}
	}

	pub fn is_placeholder(&self) -> bool {
		self.height.is_none()
	}
}

/// Direction of a transfer relative to the wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferDirection {
	Incoming,
	Outgoing,
}

/// Movement of funds into or out of the wallet within one transaction.
#[derive(Debug, Clone, Default)]
pub struct Transfer {
	pub direction: Option<TransferDirection>,
	pub account_index: Option<u32>,
	/// Receiving subaddress (incoming transfers).
	pub subaddress_index: Option<u32>,
	/// Spending subaddresses (outgoing transfers).
	pub subaddress_indices: Option<Vec<u32>>,
	pub amount: Option<u64>,
	/// Receiving address (incoming transfers).
	pub address: Option<String>,
	/// Destinations (outgoing transfers).
	pub destinations: Option<Vec<Destination>>,
	pub num_suggested_confirmations: Option<u64>,
	pub(crate) tx: Weak<TxWallet>,
}

impl Transfer {
	/// The transaction containing this transfer, if it is still alive.
	pub fn tx(&self) -> Option<Arc<TxWallet>> {
		self.tx.upgrade()
	}

	pub fn is_incoming(&self) -> Option<bool> {
		self.direction.map(|d| d == TransferDirection::Incoming)
	}

	pub fn is_outgoing(&self) -> Option<bool> {
		self.direction.map(|d| d == TransferDirection::Outgoing)
	}
}

/// Output the wallet owns or owned.
#[derive(Debug, Clone, Default)]
pub struct OutputWallet {
	pub account_index: Option<u32>,
	pub subaddress_index: Option<u32>,
	pub amount: Option<u64>,
	pub is_spent: Option<bool>,
	pub is_frozen: Option<bool>,
	pub key_image: Option<KeyImage>,
	pub index: Option<u64>,
	pub stealth_public_key: Option<String>,
	pub ring_output_indices: Option<Vec<u64>>,
	pub(crate) tx: Weak<TxWallet>,
}

impl OutputWallet {
	/// The transaction containing this output, if it is still alive.
	pub fn tx(&self) -> Option<Arc<TxWallet>> {
		self.tx.upgrade()
	}
}

/// Wallet transaction with its transfers and outputs.
///
/// Transfers are stored outgoing first, then incoming. Spent outputs announced through
/// notifications are stored as `inputs`.
#[derive(Debug, Default)]
pub struct TxWallet {
	pub hash: Option<String>,
	pub block: Option<Arc<Block>>,
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
	pub transfers: Vec<Transfer>,
	pub outputs: Vec<OutputWallet>,
	pub inputs: Vec<OutputWallet>,
}

impl TxWallet {
	pub fn height(&self) -> Option<u64> {
		self.block.as_ref().and_then(|block| block.height)
	}

	pub fn outgoing_transfer(&self) -> Option<&Transfer> {
		self.transfers
			.iter()
			.find(|t| t.direction == Some(TransferDirection::Outgoing))
	}

	pub fn incoming_transfers(&self) -> impl Iterator<Item = &Transfer> {
		self.transfers
			.iter()
			.filter(|t| t.direction == Some(TransferDirection::Incoming))
	}

	/// Handles to every transfer of this transaction, outgoing first.
	pub fn transfer_refs(self: &Arc<Self>) -> Vec<TransferRef> {
		(0..self.transfers.len())
			.map(|index| TransferRef {
				tx: self.clone(),
				index,
			})
			.collect()
	}

	/// Handles to every output of this transaction.
	pub fn output_refs(self: &Arc<Self>) -> Vec<OutputRef> {
		(0..self.outputs.len())
			.map(|index| OutputRef {
				tx: self.clone(),
				slot: OutputSlot::Output(index),
			})
			.collect()
	}

	/// Handles to every spent output (input) of this transaction.
	pub fn input_refs(self: &Arc<Self>) -> Vec<OutputRef> {
		(0..self.inputs.len())
			.map(|index| OutputRef {
				tx: self.clone(),
				slot: OutputSlot::Input(index),
			})
			.collect()
	}
}

/// Handle to a transfer that keeps its transaction alive.
#[derive(Debug, Clone)]
pub struct TransferRef {
	tx: Arc<TxWallet>,
	index: usize,
}

impl TransferRef {
	pub fn tx(&self) -> &Arc<TxWallet> {
		&self.tx
	}

	pub fn transfer(&self) -> &Transfer {
		&self.tx.transfers[self.index]
	}
}

impl Deref for TransferRef {
	type Target = Transfer;

	fn deref(&self) -> &Transfer {
		self.transfer()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputSlot {
	Output(usize),
	Input(usize),
}

/// Handle to an output that keeps its transaction alive.
#[derive(Debug, Clone)]
pub struct OutputRef {
	tx: Arc<TxWallet>,
	slot: OutputSlot,
}

impl OutputRef {
	pub fn tx(&self) -> &Arc<TxWallet> {
		&self.tx
	}

	pub fn output(&self) -> &OutputWallet {
		match self.slot {
			OutputSlot::Output(index) => &self.tx.outputs[index],
			OutputSlot::Input(index) => &self.tx.inputs[index],
		}
	}

	/// Whether this handle refers to a spent output recorded as a transaction input.
	pub fn is_input(&self) -> bool {
		matches!(self.slot, OutputSlot::Input(_))
	}
}

impl Deref for OutputRef {
	type Target = OutputWallet;

	fn deref(&self) -> &OutputWallet {
		self.output()
	}
}
