use crate::model::{Destination, TxWallet};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Network a wallet operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
	Mainnet,
	Testnet,
	Stagenet,
}

impl NetworkType {
	/// Ordinal used by the wallet engine.
	pub fn ordinal(self) -> u8 {
		match self {
			NetworkType::Mainnet => 0,
			NetworkType::Testnet => 1,
			NetworkType::Stagenet => 2,
		}
	}

	pub fn from_ordinal(ordinal: u8) -> Option<Self> {
		match ordinal {
			0 => Some(NetworkType::Mainnet),
			1 => Some(NetworkType::Testnet),
			2 => Some(NetworkType::Stagenet),
			_ => None,
		}
	}
}

/// Connection settings for the daemon the engine talks to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConnection {
	pub uri: Option<String>,
	pub username: Option<String>,
	pub password: Option<String>,
}

impl DaemonConnection {
	pub fn new(uri: impl Into<String>) -> Self {
		Self {
			uri: Some(uri.into()),
			..Default::default()
		}
	}
}

/// Outcome of a synchronization call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
	/// Height the wallet reached.
	pub height: u64,
	/// Whether the wallet caught up with the daemon.
	pub is_synced: bool,
}

/// Progress notification emitted while the engine scans the chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncProgress {
	pub height: u64,
	pub start_height: u64,
	pub end_height: u64,
	pub percent_done: f64,
	pub message: String,
}

/// Request to build (and optionally relay) transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SendRequest {
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub destinations: Vec<Destination>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub account_index: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub subaddress_indices: Option<Vec<u32>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub priority: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub payment_id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub unlock_time: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub do_not_relay: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub can_split: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub key_image: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub below_amount: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub sweep_each_subaddress: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub note: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub recipient_name: Option<String>,
}

impl SendRequest {
	pub fn to(address: impl Into<String>, amount: u64) -> Self {
		Self {
			destinations: vec![Destination::new(address, amount)],
			..Default::default()
		}
	}

	pub fn with_account_index(mut self, account_index: u32) -> Self {
		self.account_index = Some(account_index);
		self
	}

	pub fn with_do_not_relay(mut self, do_not_relay: bool) -> Self {
		self.do_not_relay = Some(do_not_relay);
		self
	}
}

/// Group of transactions created, signed or parsed together.
#[derive(Debug, Clone, Default)]
pub struct TxSet {
	pub txs: Vec<Arc<TxWallet>>,
	pub multisig_tx_hex: Option<String>,
	pub unsigned_tx_hex: Option<String>,
	pub signed_tx_hex: Option<String>,
}

/// Result of importing key images.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyImageImportResult {
	pub height: Option<u64>,
	pub spent_amount: Option<u64>,
	pub unspent_amount: Option<u64>,
}

/// Result of checking a transaction key or proof.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckTx {
	pub is_good: bool,
	pub in_tx_pool: Option<bool>,
	pub num_confirmations: Option<u64>,
	pub received_amount: Option<u64>,
}

/// Result of checking a reserve proof.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckReserve {
	pub is_good: bool,
	pub total_amount: Option<u64>,
	pub unconfirmed_spent_amount: Option<u64>,
}

/// Multisig state of the wallet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MultisigInfo {
	pub is_multisig: bool,
	pub is_ready: bool,
	pub threshold: Option<u32>,
	pub num_participants: Option<u32>,
}

/// Result of one multisig key-exchange round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MultisigInitResult {
	pub address: Option<String>,
	pub multisig_hex: Option<String>,
}

/// Result of signing a multisig transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MultisigSignResult {
	pub signed_multisig_tx_hex: Option<String>,
	pub tx_hashes: Option<Vec<String>>,
}

/// Version reported by the wallet engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Version {
	pub number: Option<u32>,
	pub is_release: Option<bool>,
}
