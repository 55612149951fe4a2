//!
//! Capability traits for the external wallet engine.
//!
//! The engine owns key derivation, transaction construction and signing, chain scanning,
//! multisig ceremonies and proofs. This crate reaches it only through the traits below.
//! Structured values are exchanged as JSON strings, amounts as decimal strings where the
//! engine reports them that way. Operations a backend does not offer return
//! [`EngineError::NotSupported`], which the default method bodies do.

use super::types::*;
use crate::model::{NetworkType, SyncResult};
use crate::wallet::config::CreationMode;
use async_trait::async_trait;
use std::sync::Arc;

/// Receives notifications from the engine's callback thread.
pub trait EngineNotificationSink: Send + Sync {
	fn notify(&self, notification: EngineNotification);
}

fn not_supported<T>(operation: &str) -> Result<T, EngineError> {
	Err(EngineError::NotSupported(operation.to_string()))
}

/// Opens and creates wallet engine instances.
#[async_trait]
pub trait EngineProvider: Send + Sync {
	async fn wallet_exists(&self, path: &str) -> Result<bool, EngineError>;

	async fn open_wallet(
		&self,
		path: &str,
		password: &str,
		network: NetworkType,
	) -> Result<Arc<dyn WalletEngine>, EngineError>;

	async fn create_wallet(
		&self,
		path: Option<&str>,
		password: Option<&str>,
		network: NetworkType,
		mode: &CreationMode,
	) -> Result<Arc<dyn WalletEngine>, EngineError>;
}

/// One opened wallet inside the engine.
///
/// The engine is single-threaded with respect to one wallet instance.
#[async_trait]
pub trait WalletEngine: Send + Sync {
	// ---------------------------------------------------------------- notifications

	/// Enable (`Some`) or disable (`None`) notification delivery.
	fn set_listening(&self, sink: Option<Arc<dyn EngineNotificationSink>>) -> Result<(), EngineError>;

	// ---------------------------------------------------------------- chain state

	async fn height(&self) -> Result<u64, EngineError>;

	async fn restore_height(&self) -> Result<u64, EngineError>;

	async fn set_restore_height(&self, height: u64) -> Result<(), EngineError>;

	async fn daemon_height(&self) -> Result<u64, EngineError> {
		not_supported("daemonHeight")
	}

	async fn daemon_max_peer_height(&self) -> Result<u64, EngineError> {
		not_supported("daemonMaxPeerHeight")
	}

	async fn is_synced(&self) -> Result<bool, EngineError> {
		not_supported("isSynced")
	}

	async fn is_daemon_synced(&self) -> Result<bool, EngineError> {
		not_supported("isDaemonSynced")
	}

	async fn is_connected(&self) -> Result<bool, EngineError> {
		not_supported("isConnected")
	}

	async fn set_daemon_connection(
		&self,
		_uri: &str,
		_username: &str,
		_password: &str,
	) -> Result<(), EngineError> {
		not_supported("setDaemonConnection")
	}

	/// Returns `[uri, username, password]` or `None` when unconnected.
	async fn daemon_connection(&self) -> Result<Option<[String; 3]>, EngineError> {
		not_supported("daemonConnection")
	}

	// ---------------------------------------------------------------- identity

	async fn is_watch_only(&self) -> Result<bool, EngineError>;

	async fn network_type(&self) -> Result<u8, EngineError>;

	async fn version(&self) -> Result<String, EngineError> {
		not_supported("version")
	}

	async fn path(&self) -> Result<String, EngineError>;

	async fn mnemonic(&self) -> Result<String, EngineError>;

	async fn mnemonic_language(&self) -> Result<String, EngineError>;

	async fn private_view_key(&self) -> Result<String, EngineError>;

	async fn private_spend_key(&self) -> Result<String, EngineError>;

	async fn public_view_key(&self) -> Result<String, EngineError>;

	async fn public_spend_key(&self) -> Result<String, EngineError>;

	async fn address(&self, account_index: u32, subaddress_index: u32) -> Result<String, EngineError>;

	/// Subaddress JSON for the given address.
	async fn address_index(&self, address: &str) -> Result<String, EngineError>;

	// ---------------------------------------------------------------- sync

	async fn sync(&self, start_height: u64) -> Result<SyncResult, EngineError>;

	async fn start_syncing(&self) -> Result<(), EngineError> {
		not_supported("startSyncing")
	}

	async fn stop_syncing(&self) -> Result<(), EngineError> {
		not_supported("stopSyncing")
	}

	async fn rescan_spent(&self) -> Result<(), EngineError> {
		not_supported("rescanSpent")
	}

	async fn rescan_blockchain(&self) -> Result<(), EngineError> {
		not_supported("rescanBlockchain")
	}

	// ---------------------------------------------------------------- accounts

	/// Decimal balance of the wallet, an account, or a subaddress.
	async fn balance(
		&self,
		account_index: Option<u32>,
		subaddress_index: Option<u32>,
	) -> Result<String, EngineError>;

	async fn unlocked_balance(
		&self,
		account_index: Option<u32>,
		subaddress_index: Option<u32>,
	) -> Result<String, EngineError>;

	/// `{"accounts": [...]}`
	async fn accounts(&self, include_subaddresses: bool, tag: Option<&str>) -> Result<String, EngineError>;

	async fn account(&self, account_index: u32, include_subaddresses: bool) -> Result<String, EngineError>;

	async fn create_account(&self, label: Option<&str>) -> Result<String, EngineError>;

	/// `{"subaddresses": [...]}`
	async fn subaddresses(
		&self,
		account_index: u32,
		subaddress_indices: &[u32],
	) -> Result<String, EngineError>;

	async fn create_subaddress(&self, account_index: u32, label: Option<&str>) -> Result<String, EngineError>;

	// ---------------------------------------------------------------- queries

	/// Takes a [`QueryRequest`] as JSON and returns a [`BlocksContainer`] as JSON.
	async fn get_txs(&self, request: &str) -> Result<String, EngineError>;

	async fn get_transfers(&self, request: &str) -> Result<String, EngineError>;

	async fn get_outputs(&self, request: &str) -> Result<String, EngineError>;

	// ---------------------------------------------------------------- outputs and key images

	async fn outputs_hex(&self) -> Result<String, EngineError> {
		not_supported("outputsHex")
	}

	async fn import_outputs_hex(&self, _outputs_hex: &str) -> Result<u32, EngineError> {
		not_supported("importOutputsHex")
	}

	/// `{"keyImages": [...]}`
	async fn key_images(&self) -> Result<String, EngineError>;

	async fn import_key_images(&self, key_images: &str) -> Result<String, EngineError>;

	// ---------------------------------------------------------------- sending

	/// Takes a send request as JSON, returns a tx set as JSON.
	async fn send_txs(&self, request: &str) -> Result<String, EngineError>;

	/// Returns `{"txSets": [...]}`.
	async fn sweep_unlocked(&self, _request: &str) -> Result<String, EngineError> {
		not_supported("sweepUnlocked")
	}

	async fn sweep_output(&self, _request: &str) -> Result<String, EngineError> {
		not_supported("sweepOutput")
	}

	async fn sweep_dust(&self, _do_not_relay: bool) -> Result<String, EngineError> {
		not_supported("sweepDust")
	}

	async fn relay_txs(&self, _tx_metadatas: &[String]) -> Result<Vec<String>, EngineError> {
		not_supported("relayTxs")
	}

	async fn parse_tx_set(&self, _tx_set: &str) -> Result<String, EngineError> {
		not_supported("parseTxSet")
	}

	async fn sign_txs(&self, _unsigned_tx_hex: &str) -> Result<String, EngineError> {
		not_supported("signTxs")
	}

	async fn submit_txs(&self, _signed_tx_hex: &str) -> Result<Vec<String>, EngineError> {
		not_supported("submitTxs")
	}

	// ---------------------------------------------------------------- notes, messages, proofs

	async fn tx_notes(&self, _tx_hashes: &[String]) -> Result<Vec<String>, EngineError> {
		not_supported("getTxNotes")
	}

	async fn set_tx_notes(&self, _tx_hashes: &[String], _notes: &[String]) -> Result<(), EngineError> {
		not_supported("setTxNotes")
	}

	async fn sign_message(&self, _message: &str) -> Result<String, EngineError> {
		not_supported("sign")
	}

	async fn verify_message(
		&self,
		_message: &str,
		_address: &str,
		_signature: &str,
	) -> Result<bool, EngineError> {
		not_supported("verify")
	}

	async fn tx_key(&self, _tx_hash: &str) -> Result<String, EngineError> {
		not_supported("getTxKey")
	}

	async fn check_tx_key(&self, _tx_hash: &str, _tx_key: &str, _address: &str) -> Result<String, EngineError> {
		not_supported("checkTxKey")
	}

	async fn tx_proof(&self, _tx_hash: &str, _address: &str, _message: &str) -> Result<String, EngineError> {
		not_supported("getTxProof")
	}

	async fn check_tx_proof(
		&self,
		_tx_hash: &str,
		_address: &str,
		_message: &str,
		_signature: &str,
	) -> Result<String, EngineError> {
		not_supported("checkTxProof")
	}

	async fn spend_proof(&self, _tx_hash: &str, _message: &str) -> Result<String, EngineError> {
		not_supported("getSpendProof")
	}

	async fn check_spend_proof(
		&self,
		_tx_hash: &str,
		_message: &str,
		_signature: &str,
	) -> Result<bool, EngineError> {
		not_supported("checkSpendProof")
	}

	async fn reserve_proof_wallet(&self, _message: &str) -> Result<String, EngineError> {
		not_supported("getReserveProofWallet")
	}

	async fn reserve_proof_account(
		&self,
		_account_index: u32,
		_amount: &str,
		_message: &str,
	) -> Result<String, EngineError> {
		not_supported("getReserveProofAccount")
	}

	async fn check_reserve_proof(
		&self,
		_address: &str,
		_message: &str,
		_signature: &str,
	) -> Result<String, EngineError> {
		not_supported("checkReserveProof")
	}

	// ---------------------------------------------------------------- address book and attributes

	/// `{"entries": [...]}`
	async fn address_book_entries(&self, _entry_indices: &[u32]) -> Result<String, EngineError> {
		not_supported("getAddressBookEntries")
	}

	async fn add_address_book_entry(&self, _address: &str, _description: &str) -> Result<u32, EngineError> {
		not_supported("addAddressBookEntry")
	}

	async fn edit_address_book_entry(
		&self,
		_index: u32,
		_address: Option<&str>,
		_description: Option<&str>,
	) -> Result<(), EngineError> {
		not_supported("editAddressBookEntry")
	}

	async fn delete_address_book_entry(&self, _index: u32) -> Result<(), EngineError> {
		not_supported("deleteAddressBookEntry")
	}

	async fn attribute(&self, _key: &str) -> Result<String, EngineError> {
		not_supported("getAttribute")
	}

	async fn set_attribute(&self, _key: &str, _value: &str) -> Result<(), EngineError> {
		not_supported("setAttribute")
	}

	// ---------------------------------------------------------------- multisig

	async fn is_multisig_import_needed(&self) -> Result<bool, EngineError> {
		not_supported("isMultisigImportNeeded")
	}

	async fn multisig_info(&self) -> Result<String, EngineError> {
		not_supported("getMultisigInfo")
	}

	async fn prepare_multisig(&self) -> Result<String, EngineError> {
		not_supported("prepareMultisig")
	}

	async fn make_multisig(
		&self,
		_multisig_hexes: &[String],
		_threshold: u32,
		_password: &str,
	) -> Result<String, EngineError> {
		not_supported("makeMultisig")
	}

	async fn exchange_multisig_keys(&self, _multisig_hexes: &[String], _password: &str) -> Result<String, EngineError> {
		not_supported("exchangeMultisigKeys")
	}

	async fn multisig_hex(&self) -> Result<String, EngineError> {
		not_supported("getMultisigHex")
	}

	async fn import_multisig_hex(&self, _multisig_hexes: &[String]) -> Result<u32, EngineError> {
		not_supported("importMultisigHex")
	}

	async fn sign_multisig_tx_hex(&self, _multisig_tx_hex: &str) -> Result<String, EngineError> {
		not_supported("signMultisigTxHex")
	}

	async fn submit_multisig_tx_hex(&self, _signed_multisig_tx_hex: &str) -> Result<Vec<String>, EngineError> {
		not_supported("submitMultisigTxHex")
	}

	// ---------------------------------------------------------------- persistence

	async fn save(&self) -> Result<(), EngineError>;

	async fn move_to(&self, _path: &str, _password: &str) -> Result<(), EngineError> {
		not_supported("moveTo")
	}

	async fn close(&self, save: bool) -> Result<(), EngineError>;
}
