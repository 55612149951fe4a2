//! Wallet facade over an opened engine instance.
//!
//! Every public operation checks the closed flag first, then forwards to the engine and converts
//! its serialized answer into entities. Queries go through the normalizer before they cross the
//! boundary, and results are re-filtered locally with the same query once assembled.

use crate::assembler;
use crate::engine::{EngineProvider, WalletEngine};
use crate::model::*;
use crate::query::{
	NormalizedQuery, OutputQueryId, QueryGraph, TransferQueryId, TxQuery, TxQueryId, normalize_output_query,
	normalize_transfer_query, normalize_tx_query,
};
use crate::utils::{ATOMIC_UNIT_DECIMALS, format_token_amount, parse_atomic_amount};
use crate::wallet::WalletError;
use crate::wallet::config::WalletConfig;
use crate::wallet::sync::{SyncCoordinator, SyncListener, WalletListener};

use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// A wallet backed by the external engine.
pub struct Wallet {
	engine: Arc<dyn WalletEngine>,
	coordinator: SyncCoordinator,
	closed: AtomicBool,
}

fn validation(message: &str) -> WalletError {
	WalletError::Validation(message.to_string())
}

fn not_supported<T>(operation: &str) -> Result<T, WalletError> {
	Err(WalletError::NotSupported(operation.to_string()))
}

fn parse_balance(value: &str) -> Result<u64, WalletError> {
	parse_atomic_amount(value)
		.ok_or_else(|| WalletError::Engine(format!("Invalid balance '{}' reported by engine", value)))
}

/// Subaddress index only makes sense within an account.
fn check_balance_indices(account_index: Option<u32>, subaddress_index: Option<u32>) -> Result<(), WalletError> {
	if account_index.is_none() && subaddress_index.is_some() {
		return Err(validation("Must provide account index with subaddress index"));
	}
	Ok(())
}

impl Wallet {
	/// Wrap an engine instance that is already open.
	pub fn new(engine: Arc<dyn WalletEngine>) -> Self {
		Self {
			coordinator: SyncCoordinator::new(engine.clone()),
			engine,
			closed: AtomicBool::new(false),
		}
	}

	pub async fn wallet_exists(provider: &dyn EngineProvider, path: &str) -> Result<bool, WalletError> {
		Ok(provider.wallet_exists(path).await?)
	}

	/// Open an existing wallet.
	pub async fn open(provider: &dyn EngineProvider, config: &WalletConfig) -> Result<Self, WalletError> {
		let (path, password, network_type) = config.validate_open()?;
		if !provider.wallet_exists(path).await? {
			return Err(WalletError::Validation(format!("Wallet does not exist at path: {}", path)));
		}
		info!("Opening {:?} wallet at {}", network_type, path);
		let engine = provider.open_wallet(path, password, network_type).await?;
		let wallet = Self::new(engine);
		if let Some(server) = &config.server {
			wallet.set_daemon_connection(server).await?;
		}
		Ok(wallet)
	}

	/// Create a new wallet from a random seed, a mnemonic or keys.
	pub async fn create(provider: &dyn EngineProvider, config: &WalletConfig) -> Result<Self, WalletError> {
		let (network_type, mode) = config.validate_create()?;
		if let Some(path) = config.path.as_deref() {
			if provider.wallet_exists(path).await? {
				return Err(WalletError::Validation(format!("Wallet already exists: {}", path)));
			}
		}
		info!(
			"Creating {:?} wallet at {}",
			network_type,
			config.path.as_deref().unwrap_or("<memory>")
		);
		let engine = provider
			.create_wallet(config.path.as_deref(), config.password.as_deref(), network_type, &mode)
			.await?;
		let wallet = Self::new(engine);
		if let Some(server) = &config.server {
			wallet.set_daemon_connection(server).await?;
		}
		Ok(wallet)
	}

	fn check_open(&self) -> Result<(), WalletError> {
		if self.closed.load(Ordering::SeqCst) {
			return Err(WalletError::Closed);
		}
		Ok(())
	}

	pub fn is_closed(&self) -> bool {
		self.closed.load(Ordering::SeqCst)
	}

	/// Close the wallet, optionally saving it first. Closing twice has no effect.
	pub async fn close(&self, save: bool) -> Result<(), WalletError> {
		if self.closed.swap(true, Ordering::SeqCst) {
			return Ok(());
		}
		for listener in self.coordinator.listeners() {
			if let Err(e) = self.coordinator.remove_listener(&listener) {
				warn!("Failed to remove listener {} on close: {}", listener.name(), e);
			}
		}
		info!("Closing wallet (save: {})", save);
		self.engine.close(save).await?;
		Ok(())
	}

	pub async fn save(&self) -> Result<(), WalletError> {
		self.check_open()?;
		self.engine.save().await?;
		debug!("Wallet saved");
		Ok(())
	}

	pub async fn move_to(&self, path: &str, password: &str) -> Result<(), WalletError> {
		self.check_open()?;
		if path.is_empty() {
			return Err(validation("Must specify a path to move the wallet to"));
		}
		self.engine.move_to(path, password).await?;
		info!("Wallet moved to {}", path);
		Ok(())
	}

	// ---------------------------------------------------------------- chain state and daemon

	pub async fn height(&self) -> Result<u64, WalletError> {
		self.check_open()?;
		Ok(self.engine.height().await?)
	}

	pub async fn daemon_height(&self) -> Result<u64, WalletError> {
		self.check_open()?;
		Ok(self.engine.daemon_height().await?)
	}

	pub async fn daemon_max_peer_height(&self) -> Result<u64, WalletError> {
		self.check_open()?;
		Ok(self.engine.daemon_max_peer_height().await?)
	}

	pub async fn restore_height(&self) -> Result<u64, WalletError> {
		self.check_open()?;
		Ok(self.engine.restore_height().await?)
	}

	pub async fn set_restore_height(&self, height: u64) -> Result<(), WalletError> {
		self.check_open()?;
		Ok(self.engine.set_restore_height(height).await?)
	}

	pub async fn is_synced(&self) -> Result<bool, WalletError> {
		self.check_open()?;
		Ok(self.engine.is_synced().await?)
	}

	pub async fn is_daemon_synced(&self) -> Result<bool, WalletError> {
		self.check_open()?;
		Ok(self.engine.is_daemon_synced().await?)
	}

	pub async fn is_connected(&self) -> Result<bool, WalletError> {
		self.check_open()?;
		Ok(self.engine.is_connected().await?)
	}

	pub async fn set_daemon_connection(&self, connection: &DaemonConnection) -> Result<(), WalletError> {
		self.check_open()?;
		let uri = connection.uri.as_deref().unwrap_or_default();
		debug!("Setting daemon connection to {}", uri);
		Ok(self
			.engine
			.set_daemon_connection(
				uri,
				connection.username.as_deref().unwrap_or_default(),
				connection.password.as_deref().unwrap_or_default(),
			)
			.await?)
	}

	pub async fn daemon_connection(&self) -> Result<Option<DaemonConnection>, WalletError> {
		self.check_open()?;
		Ok(self
			.engine
			.daemon_connection()
			.await?
			.and_then(|[uri, username, password]| {
				let uri = assembler::non_empty(Some(uri))?;
				Some(DaemonConnection {
					uri: Some(uri),
					username: assembler::non_empty(Some(username)),
					password: assembler::non_empty(Some(password)),
				})
			}))
	}

	// ---------------------------------------------------------------- identity and keys

	pub async fn is_watch_only(&self) -> Result<bool, WalletError> {
		self.check_open()?;
		Ok(self.engine.is_watch_only().await?)
	}

	pub async fn network_type(&self) -> Result<NetworkType, WalletError> {
		self.check_open()?;
		let ordinal = self.engine.network_type().await?;
		NetworkType::from_ordinal(ordinal)
			.ok_or_else(|| WalletError::Engine(format!("Unknown network type ordinal {}", ordinal)))
	}

	pub async fn version(&self) -> Result<Version, WalletError> {
		self.check_open()?;
		assembler::decode(&self.engine.version().await?)
	}

	/// Path of the wallet file, `None` for an in-memory wallet.
	pub async fn path(&self) -> Result<Option<String>, WalletError> {
		self.check_open()?;
		Ok(assembler::non_empty(Some(self.engine.path().await?)))
	}

	/// Mnemonic of the wallet, `None` for wallets without a spend key.
	pub async fn mnemonic(&self) -> Result<Option<String>, WalletError> {
		self.check_open()?;
		Ok(assembler::non_empty(Some(self.engine.mnemonic().await?)))
	}

	pub async fn mnemonic_language(&self) -> Result<Option<String>, WalletError> {
		self.check_open()?;
		Ok(assembler::non_empty(Some(self.engine.mnemonic_language().await?)))
	}

	pub async fn private_view_key(&self) -> Result<Option<String>, WalletError> {
		self.check_open()?;
		Ok(assembler::non_empty(Some(self.engine.private_view_key().await?)))
	}

	/// Private spend key, `None` for view-only wallets.
	pub async fn private_spend_key(&self) -> Result<Option<String>, WalletError> {
		self.check_open()?;
		Ok(assembler::non_empty(Some(self.engine.private_spend_key().await?)))
	}

	pub async fn public_view_key(&self) -> Result<Option<String>, WalletError> {
		self.check_open()?;
		Ok(assembler::non_empty(Some(self.engine.public_view_key().await?)))
	}

	pub async fn public_spend_key(&self) -> Result<Option<String>, WalletError> {
		self.check_open()?;
		Ok(assembler::non_empty(Some(self.engine.public_spend_key().await?)))
	}

	pub async fn primary_address(&self) -> Result<String, WalletError> {
		self.address(0, 0).await
	}

	pub async fn address(&self, account_index: u32, subaddress_index: u32) -> Result<String, WalletError> {
		self.check_open()?;
		Ok(self.engine.address(account_index, subaddress_index).await?)
	}

	/// Account and subaddress indices of an address owned by the wallet.
	pub async fn address_index(&self, address: &str) -> Result<Subaddress, WalletError> {
		self.check_open()?;
		assembler::decode_subaddress(&self.engine.address_index(address).await?)
	}

	// ---------------------------------------------------------------- balances

	/// Balance of the wallet, an account, or a subaddress of an account.
	pub async fn balance(
		&self,
		account_index: Option<u32>,
		subaddress_index: Option<u32>,
	) -> Result<u64, WalletError> {
		self.check_open()?;
		check_balance_indices(account_index, subaddress_index)?;
		let balance = parse_balance(&self.engine.balance(account_index, subaddress_index).await?)?;
		debug!(
			"Balance for {:?}/{:?}: {}",
			account_index,
			subaddress_index,
			format_token_amount(balance, ATOMIC_UNIT_DECIMALS)
		);
		Ok(balance)
	}

	pub async fn unlocked_balance(
		&self,
		account_index: Option<u32>,
		subaddress_index: Option<u32>,
	) -> Result<u64, WalletError> {
		self.check_open()?;
		check_balance_indices(account_index, subaddress_index)?;
		let balance = parse_balance(
			&self
				.engine
				.unlocked_balance(account_index, subaddress_index)
				.await?,
		)?;
		debug!(
			"Unlocked balance for {:?}/{:?}: {}",
			account_index,
			subaddress_index,
			format_token_amount(balance, ATOMIC_UNIT_DECIMALS)
		);
		Ok(balance)
	}

	// ---------------------------------------------------------------- accounts and subaddresses

	pub async fn accounts(&self, include_subaddresses: bool, tag: Option<&str>) -> Result<Vec<Account>, WalletError> {
		self.check_open()?;
		assembler::decode_accounts(&self.engine.accounts(include_subaddresses, tag).await?)
	}

	pub async fn account(&self, account_index: u32, include_subaddresses: bool) -> Result<Account, WalletError> {
		self.check_open()?;
		assembler::decode_account(&self.engine.account(account_index, include_subaddresses).await?)
	}

	pub async fn create_account(&self, label: Option<&str>) -> Result<Account, WalletError> {
		self.check_open()?;
		let account = assembler::decode_account(&self.engine.create_account(label).await?)?;
		info!("Created account {:?}", account.index);
		Ok(account)
	}

	/// Subaddresses of an account; an empty index list means all of them.
	pub async fn subaddresses(
		&self,
		account_index: u32,
		subaddress_indices: &[u32],
	) -> Result<Vec<Subaddress>, WalletError> {
		self.check_open()?;
		assembler::decode_subaddresses(
			&self
				.engine
				.subaddresses(account_index, subaddress_indices)
				.await?,
		)
	}

	pub async fn subaddress(&self, account_index: u32, subaddress_index: u32) -> Result<Subaddress, WalletError> {
		self.subaddresses(account_index, &[subaddress_index])
			.await?
			.into_iter()
			.next()
			.ok_or_else(|| {
				WalletError::Validation(format!(
					"Subaddress {}/{} does not exist",
					account_index, subaddress_index
				))
			})
	}

	pub async fn create_subaddress(&self, account_index: u32, label: Option<&str>) -> Result<Subaddress, WalletError> {
		self.check_open()?;
		assembler::decode_subaddress(&self.engine.create_subaddress(account_index, label).await?)
	}

	// ---------------------------------------------------------------- queries

	/// Wallet transactions matching a tx query.
	///
	/// When the query names tx hashes the result has one entry per hash, in that order, with
	/// `None` for hashes the wallet does not know.
	pub async fn txs(
		&self,
		graph: QueryGraph,
		query: Option<TxQueryId>,
	) -> Result<Vec<Option<Arc<TxWallet>>>, WalletError> {
		self.check_open()?;
		let query = normalize_tx_query(graph, query)?;
		let response = self.engine.get_txs(&query.to_request_json()?).await?;
		let txs = assembler::assemble_txs(&response, query.requested_hashes())?;
		let txs = assembler::filter_txs(txs, &query);
		debug!("Query returned {} transactions", txs.len());
		Ok(txs)
	}

	/// All wallet transactions.
	pub async fn all_txs(&self) -> Result<Vec<Arc<TxWallet>>, WalletError> {
		Ok(self.txs(QueryGraph::new(), None).await?.into_iter().flatten().collect())
	}

	pub async fn tx(&self, hash: &str) -> Result<Option<Arc<TxWallet>>, WalletError> {
		let (graph, id) = QueryGraph::single_tx(TxQuery::new().with_hashes([hash]));
		Ok(self.txs(graph, Some(id)).await?.into_iter().next().flatten())
	}

	/// Transfers matching a transfer query, outgoing before incoming per transaction.
	pub async fn transfers(
		&self,
		graph: QueryGraph,
		query: Option<TransferQueryId>,
	) -> Result<Vec<TransferRef>, WalletError> {
		self.check_open()?;
		let query = normalize_transfer_query(graph, query)?;
		let transfers = assembler::assemble_transfers(&self.query_engine(&query, QueryKind::Transfers).await?)?;
		let transfers = assembler::filter_transfers(transfers, &query);
		debug!("Query returned {} transfers", transfers.len());
		Ok(transfers)
	}

	/// Outputs matching an output query.
	pub async fn outputs(
		&self,
		graph: QueryGraph,
		query: Option<OutputQueryId>,
	) -> Result<Vec<OutputRef>, WalletError> {
		self.check_open()?;
		let query = normalize_output_query(graph, query)?;
		let outputs = assembler::assemble_outputs(&self.query_engine(&query, QueryKind::Outputs).await?)?;
		let outputs = assembler::filter_outputs(outputs, &query);
		debug!("Query returned {} outputs", outputs.len());
		Ok(outputs)
	}

	async fn query_engine(&self, query: &NormalizedQuery, kind: QueryKind) -> Result<String, WalletError> {
		let request = query.to_request_json()?;
		Ok(match kind {
			QueryKind::Transfers => self.engine.get_transfers(&request).await?,
			QueryKind::Outputs => self.engine.get_outputs(&request).await?,
		})
	}

	// ---------------------------------------------------------------- sync and listeners

	/// Synchronize the wallet; see [`SyncCoordinator::sync`].
	pub async fn sync(
		&self,
		start_height: Option<u64>,
		listener: Option<Arc<dyn SyncListener>>,
	) -> Result<SyncResult, WalletError> {
		self.check_open()?;
		self.coordinator.sync(start_height, listener).await
	}

	pub async fn start_syncing(&self) -> Result<(), WalletError> {
		self.check_open()?;
		info!("Starting background synchronization");
		Ok(self.engine.start_syncing().await?)
	}

	pub async fn stop_syncing(&self) -> Result<(), WalletError> {
		self.check_open()?;
		info!("Stopping background synchronization");
		Ok(self.engine.stop_syncing().await?)
	}

	pub async fn rescan_spent(&self) -> Result<(), WalletError> {
		self.check_open()?;
		Ok(self.engine.rescan_spent().await?)
	}

	pub async fn rescan_blockchain(&self) -> Result<(), WalletError> {
		self.check_open()?;
		info!("Rescanning blockchain");
		Ok(self.engine.rescan_blockchain().await?)
	}

	pub fn add_listener(&self, listener: Arc<dyn WalletListener>) -> Result<(), WalletError> {
		self.check_open()?;
		self.coordinator.add_listener(listener)
	}

	pub fn remove_listener(&self, listener: &Arc<dyn WalletListener>) -> Result<(), WalletError> {
		self.check_open()?;
		self.coordinator.remove_listener(listener)
	}

	pub fn listeners(&self) -> Result<Vec<Arc<dyn WalletListener>>, WalletError> {
		self.check_open()?;
		Ok(self.coordinator.listeners())
	}

	// ---------------------------------------------------------------- outputs and key images

	pub async fn outputs_hex(&self) -> Result<Option<String>, WalletError> {
		self.check_open()?;
		Ok(assembler::non_empty(Some(self.engine.outputs_hex().await?)))
	}

	/// Import outputs exported by another wallet. Returns how many were imported.
	pub async fn import_outputs_hex(&self, outputs_hex: &str) -> Result<u32, WalletError> {
		self.check_open()?;
		Ok(self.engine.import_outputs_hex(outputs_hex).await?)
	}

	pub async fn key_images(&self) -> Result<Vec<KeyImage>, WalletError> {
		self.check_open()?;
		assembler::decode_key_images(&self.engine.key_images().await?)
	}

	pub async fn import_key_images(&self, key_images: &[KeyImage]) -> Result<KeyImageImportResult, WalletError> {
		self.check_open()?;
		let request = serde_json::to_string(&json!({ "keyImages": key_images }))?;
		let result: KeyImageImportResult = assembler::decode(&self.engine.import_key_images(&request).await?)?;
		info!(
			"Imported {} key images, spent {:?}, unspent {:?}",
			key_images.len(),
			result.spent_amount,
			result.unspent_amount
		);
		Ok(result)
	}

	pub async fn new_key_images_from_last_import(&self) -> Result<Vec<KeyImage>, WalletError> {
		self.check_open()?;
		not_supported("getNewKeyImagesFromLastImport")
	}

	// ---------------------------------------------------------------- sending

	/// Build, and unless `do_not_relay` is set relay, transactions for the given destinations.
	pub async fn send_txs(&self, request: &SendRequest) -> Result<TxSet, WalletError> {
		self.check_open()?;
		if request.destinations.is_empty() {
			return Err(validation("Must specify at least one destination to send to"));
		}
		if request
			.destinations
			.iter()
			.any(|d| d.address.is_none() || d.amount.is_none())
		{
			return Err(validation("Destination address and amount must be specified"));
		}
		let tx_set = assembler::decode_tx_set(&self.engine.send_txs(&serde_json::to_string(request)?).await?)?;
		info!("Created {} transactions", tx_set.txs.len());
		Ok(tx_set)
	}

	/// Sweep all unlocked funds to the request's single destination address.
	pub async fn sweep_unlocked(&self, request: &SendRequest) -> Result<Vec<TxSet>, WalletError> {
		self.check_open()?;
		if request.destinations.len() != 1 || request.destinations[0].address.is_none() {
			return Err(validation("Must specify exactly one destination address to sweep to"));
		}
		if request.destinations[0].amount.is_some() {
			return Err(validation("Cannot specify amount to sweep"));
		}
		if request.key_image.is_some() {
			return Err(validation("Cannot specify key image in sweep unlocked; use sweep_output"));
		}
		if request.account_index.is_none() && request.subaddress_indices.is_some() {
			return Err(validation("Must specify account index if subaddress indices are specified"));
		}
		assembler::decode_tx_sets(&self.engine.sweep_unlocked(&serde_json::to_string(request)?).await?)
	}

	/// Sweep the output identified by the request's key image.
	pub async fn sweep_output(&self, request: &SendRequest) -> Result<TxSet, WalletError> {
		self.check_open()?;
		if request.key_image.as_deref().is_none_or(str::is_empty) {
			return Err(validation("Must specify key image of output to sweep"));
		}
		if request.destinations.len() != 1 || request.destinations[0].address.is_none() {
			return Err(validation("Must specify exactly one destination address to sweep to"));
		}
		assembler::decode_tx_set(&self.engine.sweep_output(&serde_json::to_string(request)?).await?)
	}

	pub async fn sweep_dust(&self, do_not_relay: bool) -> Result<Vec<TxSet>, WalletError> {
		self.check_open()?;
		assembler::decode_tx_sets(&self.engine.sweep_dust(do_not_relay).await?)
	}

	/// Relay previously created transactions by their metadata. Returns the relayed tx hashes.
	pub async fn relay_txs(&self, tx_metadatas: &[String]) -> Result<Vec<String>, WalletError> {
		self.check_open()?;
		Ok(self.engine.relay_txs(tx_metadatas).await?)
	}

	/// Describe the transactions of an unsigned or multisig tx set.
	pub async fn parse_tx_set(&self, tx_set: &TxSet) -> Result<TxSet, WalletError> {
		self.check_open()?;
		let request = serde_json::to_string(&json!({
			"unsignedTxHex": tx_set.unsigned_tx_hex,
			"multisigTxHex": tx_set.multisig_tx_hex,
			"signedTxHex": tx_set.signed_tx_hex,
		}))?;
		assembler::decode_tx_set(&self.engine.parse_tx_set(&request).await?)
	}

	/// Sign an unsigned tx set; returns the signed tx hex.
	pub async fn sign_txs(&self, unsigned_tx_hex: &str) -> Result<String, WalletError> {
		self.check_open()?;
		Ok(self.engine.sign_txs(unsigned_tx_hex).await?)
	}

	pub async fn submit_txs(&self, signed_tx_hex: &str) -> Result<Vec<String>, WalletError> {
		self.check_open()?;
		Ok(self.engine.submit_txs(signed_tx_hex).await?)
	}

	// ---------------------------------------------------------------- notes, messages and proofs

	pub async fn tx_notes(&self, tx_hashes: &[String]) -> Result<Vec<Option<String>>, WalletError> {
		self.check_open()?;
		Ok(self
			.engine
			.tx_notes(tx_hashes)
			.await?
			.into_iter()
			.map(|note| assembler::non_empty(Some(note)))
			.collect())
	}

	pub async fn set_tx_notes(&self, tx_hashes: &[String], notes: &[String]) -> Result<(), WalletError> {
		self.check_open()?;
		if tx_hashes.len() != notes.len() {
			return Err(validation("Different number of tx hashes than notes"));
		}
		Ok(self.engine.set_tx_notes(tx_hashes, notes).await?)
	}

	pub async fn sign_message(&self, message: &str) -> Result<String, WalletError> {
		self.check_open()?;
		Ok(self.engine.sign_message(message).await?)
	}

	pub async fn verify_message(&self, message: &str, address: &str, signature: &str) -> Result<bool, WalletError> {
		self.check_open()?;
		Ok(self.engine.verify_message(message, address, signature).await?)
	}

	pub async fn tx_key(&self, tx_hash: &str) -> Result<String, WalletError> {
		self.check_open()?;
		Ok(self.engine.tx_key(tx_hash).await?)
	}

	pub async fn check_tx_key(&self, tx_hash: &str, tx_key: &str, address: &str) -> Result<CheckTx, WalletError> {
		self.check_open()?;
		assembler::decode(&self.engine.check_tx_key(tx_hash, tx_key, address).await?)
	}

	pub async fn tx_proof(&self, tx_hash: &str, address: &str, message: &str) -> Result<String, WalletError> {
		self.check_open()?;
		Ok(self.engine.tx_proof(tx_hash, address, message).await?)
	}

	pub async fn check_tx_proof(
		&self,
		tx_hash: &str,
		address: &str,
		message: &str,
		signature: &str,
	) -> Result<CheckTx, WalletError> {
		self.check_open()?;
		assembler::decode(
			&self
				.engine
				.check_tx_proof(tx_hash, address, message, signature)
				.await?,
		)
	}

	pub async fn spend_proof(&self, tx_hash: &str, message: &str) -> Result<String, WalletError> {
		self.check_open()?;
		Ok(self.engine.spend_proof(tx_hash, message).await?)
	}

	pub async fn check_spend_proof(&self, tx_hash: &str, message: &str, signature: &str) -> Result<bool, WalletError> {
		self.check_open()?;
		Ok(self.engine.check_spend_proof(tx_hash, message, signature).await?)
	}

	pub async fn reserve_proof_wallet(&self, message: &str) -> Result<String, WalletError> {
		self.check_open()?;
		Ok(self.engine.reserve_proof_wallet(message).await?)
	}

	pub async fn reserve_proof_account(
		&self,
		account_index: u32,
		amount: u64,
		message: &str,
	) -> Result<String, WalletError> {
		self.check_open()?;
		Ok(self
			.engine
			.reserve_proof_account(account_index, &amount.to_string(), message)
			.await?)
	}

	pub async fn check_reserve_proof(
		&self,
		address: &str,
		message: &str,
		signature: &str,
	) -> Result<CheckReserve, WalletError> {
		self.check_open()?;
		assembler::decode(&self.engine.check_reserve_proof(address, message, signature).await?)
	}

	// ---------------------------------------------------------------- address book and attributes

	/// Address book entries; an empty index list means all of them.
	pub async fn address_book_entries(&self, entry_indices: &[u32]) -> Result<Vec<AddressBookEntry>, WalletError> {
		self.check_open()?;
		assembler::decode_address_book(&self.engine.address_book_entries(entry_indices).await?)
	}

	pub async fn add_address_book_entry(&self, address: &str, description: &str) -> Result<u32, WalletError> {
		self.check_open()?;
		Ok(self.engine.add_address_book_entry(address, description).await?)
	}

	pub async fn edit_address_book_entry(
		&self,
		index: u32,
		address: Option<&str>,
		description: Option<&str>,
	) -> Result<(), WalletError> {
		self.check_open()?;
		Ok(self
			.engine
			.edit_address_book_entry(index, address, description)
			.await?)
	}

	pub async fn delete_address_book_entry(&self, index: u32) -> Result<(), WalletError> {
		self.check_open()?;
		Ok(self.engine.delete_address_book_entry(index).await?)
	}

	pub async fn attribute(&self, key: &str) -> Result<Option<String>, WalletError> {
		self.check_open()?;
		Ok(assembler::non_empty(Some(self.engine.attribute(key).await?)))
	}

	pub async fn set_attribute(&self, key: &str, value: &str) -> Result<(), WalletError> {
		self.check_open()?;
		Ok(self.engine.set_attribute(key, value).await?)
	}

	// ---------------------------------------------------------------- account tags

	pub async fn tag_accounts(&self, _tag: &str, _account_indices: &[u32]) -> Result<(), WalletError> {
		self.check_open()?;
		not_supported("tagAccounts")
	}

	pub async fn untag_accounts(&self, _account_indices: &[u32]) -> Result<(), WalletError> {
		self.check_open()?;
		not_supported("untagAccounts")
	}

	pub async fn account_tags(&self) -> Result<Vec<String>, WalletError> {
		self.check_open()?;
		not_supported("getAccountTags")
	}

	pub async fn set_account_tag_label(&self, _tag: &str, _label: &str) -> Result<(), WalletError> {
		self.check_open()?;
		not_supported("setAccountTagLabel")
	}

	// ---------------------------------------------------------------- multisig

	pub async fn is_multisig_import_needed(&self) -> Result<bool, WalletError> {
		self.check_open()?;
		Ok(self.engine.is_multisig_import_needed().await?)
	}

	pub async fn multisig_info(&self) -> Result<MultisigInfo, WalletError> {
		self.check_open()?;
		assembler::decode(&self.engine.multisig_info().await?)
	}

	pub async fn is_multisig(&self) -> Result<bool, WalletError> {
		Ok(self.multisig_info().await?.is_multisig)
	}

	pub async fn prepare_multisig(&self) -> Result<String, WalletError> {
		self.check_open()?;
		Ok(self.engine.prepare_multisig().await?)
	}

	pub async fn make_multisig(
		&self,
		multisig_hexes: &[String],
		threshold: u32,
		password: &str,
	) -> Result<MultisigInitResult, WalletError> {
		self.check_open()?;
		if threshold == 0 || threshold as usize > multisig_hexes.len() + 1 {
			return Err(WalletError::Validation(format!(
				"Invalid multisig threshold {} for {} participants",
				threshold,
				multisig_hexes.len() + 1
			)));
		}
		let result = self
			.engine
			.make_multisig(multisig_hexes, threshold, password)
			.await?;
		assembler::decode(&result)
	}

	pub async fn exchange_multisig_keys(
		&self,
		multisig_hexes: &[String],
		password: &str,
	) -> Result<MultisigInitResult, WalletError> {
		self.check_open()?;
		assembler::decode(&self.engine.exchange_multisig_keys(multisig_hexes, password).await?)
	}

	pub async fn multisig_hex(&self) -> Result<String, WalletError> {
		self.check_open()?;
		Ok(self.engine.multisig_hex().await?)
	}

	/// Import multisig info from the other participants. Returns the number of outputs signed.
	pub async fn import_multisig_hex(&self, multisig_hexes: &[String]) -> Result<u32, WalletError> {
		self.check_open()?;
		if multisig_hexes.is_empty() {
			return Err(validation("Must provide hex to import"));
		}
		Ok(self.engine.import_multisig_hex(multisig_hexes).await?)
	}

	pub async fn sign_multisig_tx_hex(&self, multisig_tx_hex: &str) -> Result<MultisigSignResult, WalletError> {
		self.check_open()?;
		assembler::decode(&self.engine.sign_multisig_tx_hex(multisig_tx_hex).await?)
	}

	pub async fn submit_multisig_tx_hex(&self, signed_multisig_tx_hex: &str) -> Result<Vec<String>, WalletError> {
		self.check_open()?;
		Ok(self.engine.submit_multisig_tx_hex(signed_multisig_tx_hex).await?)
	}
}

#[derive(Debug, Clone, Copy)]
enum QueryKind {
	Transfers,
	Outputs,
}

impl std::fmt::Debug for Wallet {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Wallet")
			.field("closed", &self.is_closed())
			.field("listeners", &self.coordinator.listeners().len())
			.finish()
	}
}
