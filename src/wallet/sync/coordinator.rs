//! Listener and sync coordination for one wallet.
//!
//! This module defines the `SyncCoordinator`, which owns the listener registry of a wallet and
//! the relay the engine pushes notifications into. It enables engine notifications when the first
//! listener is registered and disables them when the last one leaves, and it runs sync calls with
//! an optional one-shot progress listener that is registered only while the call is in flight.
//!
//! The coordinator is responsible for:
//! - Toggling engine notifications on the 0→1 and 1→0 listener transitions only
//! - Rejecting a second sync while one is in flight on the same wallet
//! - Unregistering the one-shot sync listener on every exit path, including cancellation
//! - Logging progress statistics once a sync finishes

use crate::engine::{EngineNotificationSink, WalletEngine};
use crate::model::SyncResult;
use crate::wallet::WalletError;
use crate::wallet::sync::events::{
	ListenerRegistry, NotificationRelay, SyncListener, SyncListenerAdapter, WalletListener,
};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

/// Coordinates listeners and sync calls of one wallet.
pub struct SyncCoordinator {
	engine: Arc<dyn WalletEngine>,
	registry: Arc<ListenerRegistry>,
	relay: Arc<dyn EngineNotificationSink>,
	/// Serializes registry changes with the matching engine toggle
	toggle: Mutex<()>,
	syncing: AtomicBool,
}

/// Clears the in-flight flag when the sync call ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
	fn drop(&mut self) {
		self.0.store(false, Ordering::SeqCst);
	}
}

/// Unregisters a one-shot listener when the sync call ends.
struct Registration<'a> {
	coordinator: &'a SyncCoordinator,
	listener: Arc<dyn WalletListener>,
}

impl Drop for Registration<'_> {
	fn drop(&mut self) {
		if let Err(e) = self.coordinator.remove_listener(&self.listener) {
			warn!("Failed to unregister sync listener: {}", e);
		}
	}
}

impl SyncCoordinator {
	pub fn new(engine: Arc<dyn WalletEngine>) -> Self {
		let registry = Arc::new(ListenerRegistry::new());
		let relay: Arc<dyn EngineNotificationSink> = Arc::new(NotificationRelay::new(registry.clone()));
		Self {
			engine,
			registry,
			relay,
			toggle: Mutex::new(()),
			syncing: AtomicBool::new(false),
		}
	}

	/// Register a listener, enabling engine notifications if it is the first one.
	pub fn add_listener(&self, listener: Arc<dyn WalletListener>) -> Result<(), WalletError> {
		let _toggle = self.toggle.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
		if self.registry.add(listener.clone()) {
			info!("Enabling engine notifications for listener {}", listener.name());
			if let Err(e) = self.engine.set_listening(Some(self.relay.clone())) {
				error!("Failed to enable engine notifications: {}", e);
				if let Err(rollback) = self.registry.remove(&listener) {
					warn!("Failed to roll back listener {}: {}", listener.name(), rollback);
				}
				return Err(e.into());
			}
		}
		Ok(())
	}

	/// Unregister a listener, disabling engine notifications if it was the last one.
	pub fn remove_listener(&self, listener: &Arc<dyn WalletListener>) -> Result<(), WalletError> {
		let _toggle = self.toggle.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
		if self.registry.remove(listener)? {
			info!("Disabling engine notifications");
			if let Err(e) = self.engine.set_listening(None) {
				// The engine still holds the relay.
				error!("Failed to disable engine notifications: {}", e);
				self.registry.add(listener.clone());
				return Err(e.into());
			}
		}
		Ok(())
	}

	/// Registered listeners in registration order.
	pub fn listeners(&self) -> Vec<Arc<dyn WalletListener>> {
		self.registry.snapshot()
	}

	pub fn is_listening(&self) -> bool {
		!self.registry.is_empty()
	}

	pub fn is_syncing(&self) -> bool {
		self.syncing.load(Ordering::SeqCst)
	}

	/// Synchronize the wallet.
	///
	/// Without `start_height` the sync resumes from the higher of the wallet height and its
	/// restore height. A `listener` receives the progress of this call only.
	pub async fn sync(
		&self,
		start_height: Option<u64>,
		listener: Option<Arc<dyn SyncListener>>,
	) -> Result<SyncResult, WalletError> {
		if self
			.syncing
			.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
			.is_err()
		{
			warn!("Rejecting sync: another sync is in progress");
			return Err(WalletError::SyncInProgress);
		}
		let _in_flight = InFlight(&self.syncing);

		let start_height = match start_height {
			Some(height) => height,
			None => {
				let height = self.engine.height().await?;
				let restore_height = self.engine.restore_height().await?;
				height.max(restore_height)
			}
		};
		info!("Starting wallet synchronization from height {}", start_height);

		let adapter = listener.map(|listener| Arc::new(SyncListenerAdapter::new(listener, start_height)));
		let _registration = match &adapter {
			Some(adapter) => {
				let listener: Arc<dyn WalletListener> = adapter.clone();
				self.add_listener(listener.clone())?;
				Some(Registration {
					coordinator: self,
					listener,
				})
			}
			None => None,
		};

		let result = self.engine.sync(start_height).await;

		if let Some(adapter) = &adapter {
			let mut tracker = adapter.progress();
			tracker.log_progress(true);
			tracker.validate_completion();
			info!("{}", tracker.get_stats().summary());
		}
		match &result {
			Ok(sync_result) => info!(
				"Wallet synchronization finished at height {} (synced: {})",
				sync_result.height, sync_result.is_synced
			),
			Err(e) => error!("Wallet synchronization failed: {}", e),
		}

		result.map_err(WalletError::from)
	}
}
