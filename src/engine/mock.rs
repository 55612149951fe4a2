//! Scripted wallet engine for tests.
//!
//! Responses are canned JSON strings, requests and listening toggles are recorded so tests can
//! assert on what crossed the boundary.

use super::boundary::{EngineNotificationSink, WalletEngine};
use super::types::*;
use crate::model::{SyncProgress, SyncResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Route `tracing` output of the code under test to the test harness, filtered by `RUST_LOG`.
pub fn init_test_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_test_writer()
		.try_init();
}

#[derive(Default)]
struct MockState {
	height: u64,
	restore_height: u64,
	txs_response: String,
	transfers_response: String,
	outputs_response: String,
	accounts_response: String,
	key_images_response: String,
	tx_set_response: String,
	requests: Vec<String>,
	listening_calls: Vec<bool>,
	sync_starts: Vec<u64>,
	sink: Option<Arc<dyn EngineNotificationSink>>,
	saved: bool,
	closed_with_save: Option<bool>,
}

/// In-memory engine double.
pub struct MockEngine {
	state: Mutex<MockState>,
	should_fail: AtomicBool,
	/// Makes `set_listening` fail independently of `should_fail`
	listening_fails: AtomicBool,
	sync_delay: Mutex<Option<Duration>>,
	/// Notifications emitted through the registered sink during `sync`
	sync_notifications: Mutex<Vec<EngineNotification>>,
}

impl MockEngine {
	pub fn new() -> Self {
		Self {
			state: Mutex::new(MockState {
				txs_response: "{}".to_string(),
				transfers_response: "{}".to_string(),
				outputs_response: "{}".to_string(),
				accounts_response: "{}".to_string(),
				key_images_response: "{}".to_string(),
				tx_set_response: "{}".to_string(),
				..Default::default()
			}),
			should_fail: AtomicBool::new(false),
			listening_fails: AtomicBool::new(false),
			sync_delay: Mutex::new(None),
			sync_notifications: Mutex::new(Vec::new()),
		}
	}

	pub fn with_heights(self, height: u64, restore_height: u64) -> Self {
		{
			let mut state = self.state.lock().unwrap();
			state.height = height;
			state.restore_height = restore_height;
		}
		self
	}

	pub fn with_txs_response(self, json: &str) -> Self {
		self.state.lock().unwrap().txs_response = json.to_string();
		self
	}

	pub fn with_transfers_response(self, json: &str) -> Self {
		self.state.lock().unwrap().transfers_response = json.to_string();
		self
	}

	pub fn with_outputs_response(self, json: &str) -> Self {
		self.state.lock().unwrap().outputs_response = json.to_string();
		self
	}

	pub fn with_accounts_response(self, json: &str) -> Self {
		self.state.lock().unwrap().accounts_response = json.to_string();
		self
	}

	pub fn with_key_images_response(self, json: &str) -> Self {
		self.state.lock().unwrap().key_images_response = json.to_string();
		self
	}

	pub fn with_tx_set_response(self, json: &str) -> Self {
		self.state.lock().unwrap().tx_set_response = json.to_string();
		self
	}

	pub fn with_sync_delay(self, delay: Duration) -> Self {
		*self.sync_delay.lock().unwrap() = Some(delay);
		self
	}

	pub fn with_sync_notifications(self, notifications: Vec<EngineNotification>) -> Self {
		*self.sync_notifications.lock().unwrap() = notifications;
		self
	}

	pub fn set_should_fail(&self, should_fail: bool) {
		self.should_fail.store(should_fail, Ordering::SeqCst);
	}

	pub fn set_listening_fails(&self, fails: bool) {
		self.listening_fails.store(fails, Ordering::SeqCst);
	}

	/// Every `set_listening` call, `true` for enable.
	pub fn listening_calls(&self) -> Vec<bool> {
		self.state.lock().unwrap().listening_calls.clone()
	}

	pub fn requests(&self) -> Vec<String> {
		self.state.lock().unwrap().requests.clone()
	}

	pub fn sync_starts(&self) -> Vec<u64> {
		self.state.lock().unwrap().sync_starts.clone()
	}

	pub fn was_saved(&self) -> bool {
		self.state.lock().unwrap().saved
	}

	pub fn closed_with_save(&self) -> Option<bool> {
		self.state.lock().unwrap().closed_with_save
	}

	/// Push a notification as the engine's callback thread would.
	pub fn emit(&self, notification: EngineNotification) {
		let sink = self.state.lock().unwrap().sink.clone();
		if let Some(sink) = sink {
			sink.notify(notification);
		}
	}

	fn check(&self) -> Result<(), EngineError> {
		if self.should_fail.load(Ordering::SeqCst) {
			Err(EngineError::Failed("Mock engine failure".to_string()))
		} else {
			Ok(())
		}
	}

	fn record(&self, request: &str) {
		self.state.lock().unwrap().requests.push(request.to_string());
	}
}

#[async_trait]
impl WalletEngine for MockEngine {
	fn set_listening(&self, sink: Option<Arc<dyn EngineNotificationSink>>) -> Result<(), EngineError> {
		if self.listening_fails.load(Ordering::SeqCst) {
			return Err(EngineError::Failed("Mock listening toggle failure".to_string()));
		}
		let mut state = self.state.lock().unwrap();
		state.listening_calls.push(sink.is_some());
		state.sink = sink;
		Ok(())
	}

	async fn height(&self) -> Result<u64, EngineError> {
		self.check()?;
		Ok(self.state.lock().unwrap().height)
	}

	async fn restore_height(&self) -> Result<u64, EngineError> {
		self.check()?;
		Ok(self.state.lock().unwrap().restore_height)
	}

	async fn set_restore_height(&self, height: u64) -> Result<(), EngineError> {
		self.check()?;
		self.state.lock().unwrap().restore_height = height;
		Ok(())
	}

	async fn is_watch_only(&self) -> Result<bool, EngineError> {
		Ok(false)
	}

	async fn network_type(&self) -> Result<u8, EngineError> {
		Ok(2)
	}

	async fn path(&self) -> Result<String, EngineError> {
		Ok(String::new())
	}

	async fn mnemonic(&self) -> Result<String, EngineError> {
		Ok("abbey abducts ability".to_string())
	}

	async fn mnemonic_language(&self) -> Result<String, EngineError> {
		Ok("English".to_string())
	}

	async fn private_view_key(&self) -> Result<String, EngineError> {
		Ok("0a".to_string())
	}

	async fn private_spend_key(&self) -> Result<String, EngineError> {
		Ok(String::new())
	}

	async fn public_view_key(&self) -> Result<String, EngineError> {
		Ok("0b".to_string())
	}

	async fn public_spend_key(&self) -> Result<String, EngineError> {
		Ok("0c".to_string())
	}

	async fn address(&self, account_index: u32, subaddress_index: u32) -> Result<String, EngineError> {
		Ok(format!("addr-{}-{}", account_index, subaddress_index))
	}

	async fn address_index(&self, address: &str) -> Result<String, EngineError> {
		Ok(format!(r#"{{"address":"{}","accountIndex":0,"index":0}}"#, address))
	}

	async fn sync(&self, start_height: u64) -> Result<SyncResult, EngineError> {
		self.state.lock().unwrap().sync_starts.push(start_height);
		let delay = *self.sync_delay.lock().unwrap();
		if let Some(delay) = delay {
			tokio::time::sleep(delay).await;
		}
		let notifications = self.sync_notifications.lock().unwrap().clone();
		for notification in notifications {
			self.emit(notification);
		}
		self.check()?;
		let end_height = self.state.lock().unwrap().height.max(start_height);
		self.emit(EngineNotification::SyncProgress(SyncProgress {
			height: end_height,
			start_height,
			end_height,
			percent_done: 1.0,
			message: "Done".to_string(),
		}));
		Ok(SyncResult {
			height: end_height,
			is_synced: true,
		})
	}

	async fn balance(
		&self,
		_account_index: Option<u32>,
		_subaddress_index: Option<u32>,
	) -> Result<String, EngineError> {
		self.check()?;
		Ok("18446744073709551615".to_string())
	}

	async fn unlocked_balance(
		&self,
		_account_index: Option<u32>,
		_subaddress_index: Option<u32>,
	) -> Result<String, EngineError> {
		self.check()?;
		Ok("1500000000000".to_string())
	}

	async fn accounts(&self, _include_subaddresses: bool, _tag: Option<&str>) -> Result<String, EngineError> {
		self.check()?;
		Ok(self.state.lock().unwrap().accounts_response.clone())
	}

	async fn account(&self, account_index: u32, _include_subaddresses: bool) -> Result<String, EngineError> {
		self.check()?;
		Ok(format!(r#"{{"index":{},"label":""}}"#, account_index))
	}

	async fn create_account(&self, label: Option<&str>) -> Result<String, EngineError> {
		self.check()?;
		Ok(format!(r#"{{"index":1,"label":"{}"}}"#, label.unwrap_or_default()))
	}

	async fn subaddresses(
		&self,
		account_index: u32,
		_subaddress_indices: &[u32],
	) -> Result<String, EngineError> {
		self.check()?;
		Ok(format!(
			r#"{{"subaddresses":[{{"accountIndex":{},"index":0,"label":""}},{{"accountIndex":{},"index":1,"label":"savings"}}]}}"#,
			account_index, account_index
		))
	}

	async fn create_subaddress(&self, account_index: u32, label: Option<&str>) -> Result<String, EngineError> {
		self.check()?;
		Ok(format!(
			r#"{{"accountIndex":{},"index":2,"label":"{}"}}"#,
			account_index,
			label.unwrap_or_default()
		))
	}

	async fn get_txs(&self, request: &str) -> Result<String, EngineError> {
		self.record(request);
		self.check()?;
		Ok(self.state.lock().unwrap().txs_response.clone())
	}

	async fn get_transfers(&self, request: &str) -> Result<String, EngineError> {
		self.record(request);
		self.check()?;
		Ok(self.state.lock().unwrap().transfers_response.clone())
	}

	async fn get_outputs(&self, request: &str) -> Result<String, EngineError> {
		self.record(request);
		self.check()?;
		Ok(self.state.lock().unwrap().outputs_response.clone())
	}

	async fn key_images(&self) -> Result<String, EngineError> {
		self.check()?;
		Ok(self.state.lock().unwrap().key_images_response.clone())
	}

	async fn import_key_images(&self, key_images: &str) -> Result<String, EngineError> {
		self.record(key_images);
		self.check()?;
		Ok(r#"{"height":100,"spentAmount":5,"unspentAmount":7}"#.to_string())
	}

	async fn send_txs(&self, request: &str) -> Result<String, EngineError> {
		self.record(request);
		self.check()?;
		Ok(self.state.lock().unwrap().tx_set_response.clone())
	}

	async fn make_multisig(
		&self,
		multisig_hexes: &[String],
		threshold: u32,
		_password: &str,
	) -> Result<String, EngineError> {
		self.record(&format!("{}:{}", threshold, multisig_hexes.join(",")));
		self.check()?;
		Ok(r#"{"address":"5multisig","multisigHex":"round2"}"#.to_string())
	}

	async fn save(&self) -> Result<(), EngineError> {
		self.check()?;
		self.state.lock().unwrap().saved = true;
		Ok(())
	}

	async fn close(&self, save: bool) -> Result<(), EngineError> {
		self.state.lock().unwrap().closed_with_save = Some(save);
		Ok(())
	}
}
