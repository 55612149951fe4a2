//! Event system for wallet notifications.
//!
//! This module defines the events delivered to wallet listeners, the listener traits, the
//! registry holding the listeners of one wallet, and the relay that turns raw engine
//! notifications into events. Notifications arrive on the engine's callback thread, so the
//! registry is shared behind a mutex and each delivery walks a snapshot of it, in registration
//! order, without holding the lock while listeners run.

use crate::engine::{EngineNotification, EngineNotificationSink};
use crate::model::{Block, OutputRef, OutputWallet, SyncProgress, TxWallet};
use crate::wallet::WalletError;
use crate::wallet::sync::progress_tracker::SyncProgressTracker;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::sync::mpsc;
use tracing::{debug, error};

/// Events delivered to wallet listeners
#[derive(Debug, Clone)]
pub enum WalletEvent {
	/// Progress of an ongoing sync
	SyncProgress(SyncProgress),
	/// A new block was processed
	NewBlock { height: u64 },
	/// The wallet received an output; its tx lists it as the only output
	OutputReceived(OutputRef),
	/// An output of the wallet was spent; its tx lists it as the only input
	OutputSpent(OutputRef),
}

/// Trait for receiving wallet events.
///
/// Methods run on the engine's callback thread and should return quickly.
pub trait WalletListener: Send + Sync {
	fn on_sync_progress(&self, _progress: &SyncProgress) {}

	fn on_new_block(&self, _height: u64) {}

	fn on_output_received(&self, _output: &OutputRef) {}

	fn on_output_spent(&self, _output: &OutputRef) {}

	/// Handle any event, routing it to the specific method by default.
	fn handle(&self, event: &WalletEvent) {
		match event {
			WalletEvent::SyncProgress(progress) => self.on_sync_progress(progress),
			WalletEvent::NewBlock { height } => self.on_new_block(*height),
			WalletEvent::OutputReceived(output) => self.on_output_received(output),
			WalletEvent::OutputSpent(output) => self.on_output_spent(output),
		}
	}

	/// Get the name of this listener for logging and diagnostics.
	fn name(&self) -> &'static str {
		"listener"
	}
}

/// Trait for one-shot sync progress observers.
pub trait SyncListener: Send + Sync {
	fn on_sync_progress(&self, progress: &SyncProgress);
}

impl<F> SyncListener for F
where
	F: Fn(&SyncProgress) + Send + Sync,
{
	fn on_sync_progress(&self, progress: &SyncProgress) {
		self(progress)
	}
}

/// Wraps a sync listener as a wallet listener for the duration of one sync.
pub struct SyncListenerAdapter {
	listener: Arc<dyn SyncListener>,
	tracker: Mutex<SyncProgressTracker>,
}

impl SyncListenerAdapter {
	pub fn new(listener: Arc<dyn SyncListener>, start_height: u64) -> Self {
		Self {
			listener,
			tracker: Mutex::new(SyncProgressTracker::new(start_height)),
		}
	}

	fn tracker(&self) -> MutexGuard<'_, SyncProgressTracker> {
		self.tracker.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
	}

	/// Snapshot of the progress seen so far.
	pub fn progress(&self) -> SyncProgressTracker {
		self.tracker().clone()
	}
}

impl WalletListener for SyncListenerAdapter {
	fn on_sync_progress(&self, progress: &SyncProgress) {
		{
			let mut tracker = self.tracker();
			tracker.record(progress);
			tracker.log_progress(false);
		}
		self.listener.on_sync_progress(progress);
	}

	fn name(&self) -> &'static str {
		"sync-listener"
	}
}

/// Forwards every event into a tokio channel.
pub struct ChannelListener {
	sender: mpsc::UnboundedSender<WalletEvent>,
}

impl ChannelListener {
	pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<WalletEvent>) {
		let (sender, receiver) = mpsc::unbounded_channel();
		(Arc::new(Self { sender }), receiver)
	}
}

impl WalletListener for ChannelListener {
	fn handle(&self, event: &WalletEvent) {
		if self.sender.send(event.clone()).is_err() {
			debug!("Channel listener receiver dropped, discarding event");
		}
	}

	fn name(&self) -> &'static str {
		"channel"
	}
}

/// Identity comparison ignoring vtables.
pub fn same_listener(a: &Arc<dyn WalletListener>, b: &Arc<dyn WalletListener>) -> bool {
	std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Insertion-ordered set of listeners, deduplicated by identity.
#[derive(Default)]
pub struct ListenerRegistry {
	listeners: Mutex<Vec<Arc<dyn WalletListener>>>,
}

impl ListenerRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	fn lock(&self) -> MutexGuard<'_, Vec<Arc<dyn WalletListener>>> {
		self.listeners.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
	}

	/// Register a listener. Returns `true` if the registry was empty before.
	///
	/// Registering the same listener twice is a no-op returning `false`.
	pub fn add(&self, listener: Arc<dyn WalletListener>) -> bool {
		let mut listeners = self.lock();
		if listeners.iter().any(|l| same_listener(l, &listener)) {
			return false;
		}
		let was_empty = listeners.is_empty();
		listeners.push(listener);
		was_empty
	}

	/// Unregister a listener. Returns `true` if the registry became empty.
	pub fn remove(&self, listener: &Arc<dyn WalletListener>) -> Result<bool, WalletError> {
		let mut listeners = self.lock();
		let position = listeners
			.iter()
			.position(|l| same_listener(l, listener))
			.ok_or(WalletError::ListenerNotRegistered)?;
		listeners.remove(position);
		Ok(listeners.is_empty())
	}

	pub fn contains(&self, listener: &Arc<dyn WalletListener>) -> bool {
		self.lock().iter().any(|l| same_listener(l, listener))
	}

	pub fn len(&self) -> usize {
		self.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.lock().is_empty()
	}

	/// Copy of the current listeners, in registration order.
	pub fn snapshot(&self) -> Vec<Arc<dyn WalletListener>> {
		self.lock().clone()
	}

	/// Deliver an event to every listener registered at the time of the call.
	pub fn dispatch(&self, event: &WalletEvent) {
		for listener in self.snapshot() {
			debug!("Delivering {} to {}", event_kind(event), listener.name());
			listener.handle(event);
		}
	}
}

fn event_kind(event: &WalletEvent) -> &'static str {
	match event {
		WalletEvent::SyncProgress(_) => "sync progress",
		WalletEvent::NewBlock { .. } => "new block",
		WalletEvent::OutputReceived(_) => "output received",
		WalletEvent::OutputSpent(_) => "output spent",
	}
}

fn parse_amount(amount: &str) -> Result<u64, WalletError> {
	amount
		.parse::<u64>()
		.map_err(|e| WalletError::Engine(format!("Invalid amount '{}' in notification: {}", amount, e)))
}

/// Single-output tx graph for an output notification, with a block only when confirmed.
fn output_tx(
	height: u64,
	tx_hash: String,
	output: OutputWallet,
	version: u32,
	unlock_time: Option<u64>,
	spent: bool,
) -> Arc<TxWallet> {
	let block = (height > 0).then(|| Arc::new(Block::at_height(height)));
	Arc::new_cyclic(|weak: &Weak<TxWallet>| {
		let output = OutputWallet {
			tx: weak.clone(),
			..output
		};
		let (outputs, inputs) = if spent {
			(Vec::new(), vec![output])
		} else {
			(vec![output], Vec::new())
		};
		TxWallet {
			hash: Some(tx_hash).filter(|h| !h.is_empty()),
			block,
			version: Some(version),
			unlock_time,
			outputs,
			inputs,
			..Default::default()
		}
	})
}

/// Convert an engine notification into a wallet event.
///
/// Output notifications are expanded into the same entity shapes the query path produces.
pub fn convert_notification(notification: EngineNotification) -> Result<WalletEvent, WalletError> {
	Ok(match notification {
		EngineNotification::SyncProgress(progress) => WalletEvent::SyncProgress(progress),
		EngineNotification::NewBlock { height } => WalletEvent::NewBlock { height },
		EngineNotification::OutputReceived {
			height,
			tx_hash,
			amount,
			account_index,
			subaddress_index,
			version,
			unlock_time,
		} => {
			let output = OutputWallet {
				amount: Some(parse_amount(&amount)?),
				account_index: Some(account_index),
				subaddress_index: Some(subaddress_index),
				..Default::default()
			};
			let tx = output_tx(height, tx_hash, output, version, Some(unlock_time), false);
			match tx.output_refs().into_iter().next() {
				Some(output) => WalletEvent::OutputReceived(output),
				None => return Err(WalletError::Engine("Synthesized tx has no output".to_string())),
			}
		}
		EngineNotification::OutputSpent {
			height,
			tx_hash,
			amount,
			account_index,
			subaddress_index,
			version,
		} => {
			let output = OutputWallet {
				amount: Some(parse_amount(&amount)?),
				account_index: Some(account_index),
				subaddress_index: Some(subaddress_index),
				..Default::default()
			};
			let tx = output_tx(height, tx_hash, output, version, None, true);
			match tx.input_refs().into_iter().next() {
				Some(output) => WalletEvent::OutputSpent(output),
				None => return Err(WalletError::Engine("Synthesized tx has no input".to_string())),
			}
		}
	})
}

/// Engine-side sink relaying notifications to the registered listeners.
pub struct NotificationRelay {
	registry: Arc<ListenerRegistry>,
}

impl NotificationRelay {
	pub fn new(registry: Arc<ListenerRegistry>) -> Self {
		Self { registry }
	}
}

impl EngineNotificationSink for NotificationRelay {
	fn notify(&self, notification: EngineNotification) {
		match convert_notification(notification) {
			Ok(event) => self.registry.dispatch(&event),
			Err(e) => error!("Dropping engine notification: {}", e),
		}
	}
}

impl std::fmt::Debug for ListenerRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let names: Vec<&str> = self.snapshot().iter().map(|l| l.name()).collect();
		f.debug_struct("ListenerRegistry")
			.field("listeners", &names)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicUsize, Ordering};

	#[derive(Default)]
	struct RecordingListener {
		events: Mutex<Vec<String>>,
	}

	impl RecordingListener {
		fn events(&self) -> Vec<String> {
			self.events.lock().unwrap().clone()
		}
	}

	impl WalletListener for RecordingListener {
		fn on_new_block(&self, height: u64) {
			self.events.lock().unwrap().push(format!("block {}", height));
		}

		fn on_output_received(&self, output: &OutputRef) {
			self.events.lock().unwrap().push(format!("received {:?}", output.amount));
		}
	}

	#[test]
	fn test_registry_reports_transitions() {
		let registry = ListenerRegistry::new();
		let a: Arc<dyn WalletListener> = Arc::new(RecordingListener::default());
		let b: Arc<dyn WalletListener> = Arc::new(RecordingListener::default());

		assert!(registry.add(a.clone()));
		assert!(!registry.add(b.clone()));
		assert!(!registry.add(a.clone()));
		assert_eq!(registry.len(), 2);

		assert!(!registry.remove(&a).unwrap());
		assert!(registry.remove(&b).unwrap());
		assert!(matches!(registry.remove(&b), Err(WalletError::ListenerNotRegistered)));
	}

	#[test]
	fn test_dispatch_in_registration_order() {
		struct Ordered(Arc<Mutex<Vec<usize>>>, usize);
		impl WalletListener for Ordered {
			fn on_new_block(&self, _height: u64) {
				self.0.lock().unwrap().push(self.1);
			}
		}

		let seen = Arc::new(Mutex::new(Vec::new()));
		let registry = ListenerRegistry::new();
		for i in 0..3 {
			registry.add(Arc::new(Ordered(seen.clone(), i)));
		}
		registry.dispatch(&WalletEvent::NewBlock { height: 1 });
		assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
	}

	#[test]
	fn test_listener_may_unregister_during_delivery() {
		struct SelfRemoving {
			registry: Arc<ListenerRegistry>,
			me: Mutex<Option<Arc<dyn WalletListener>>>,
			calls: AtomicUsize,
		}
		impl WalletListener for SelfRemoving {
			fn on_new_block(&self, _height: u64) {
				self.calls.fetch_add(1, Ordering::SeqCst);
				if let Some(me) = self.me.lock().unwrap().take() {
					self.registry.remove(&me).unwrap();
				}
			}
		}

		let registry = Arc::new(ListenerRegistry::new());
		let listener = Arc::new(SelfRemoving {
			registry: registry.clone(),
			me: Mutex::new(None),
			calls: AtomicUsize::new(0),
		});
		let as_dyn: Arc<dyn WalletListener> = listener.clone();
		*listener.me.lock().unwrap() = Some(as_dyn.clone());
		registry.add(as_dyn);

		registry.dispatch(&WalletEvent::NewBlock { height: 1 });
		registry.dispatch(&WalletEvent::NewBlock { height: 2 });
		assert_eq!(listener.calls.load(Ordering::SeqCst), 1);
		assert!(registry.is_empty());
	}

	#[test]
	fn test_relay_delivers_from_engine_thread_while_listeners_change() {
		struct Logging(Arc<Mutex<Vec<(u64, usize)>>>, usize);
		impl WalletListener for Logging {
			fn on_new_block(&self, height: u64) {
				self.0.lock().unwrap().push((height, self.1));
			}
		}

		const BLOCKS: u64 = 500;
		let log = Arc::new(Mutex::new(Vec::new()));
		let registry = Arc::new(ListenerRegistry::new());
		registry.add(Arc::new(Logging(log.clone(), 0)));
		registry.add(Arc::new(Logging(log.clone(), 1)));

		let relay = NotificationRelay::new(registry.clone());
		let engine_thread = std::thread::spawn(move || {
			for height in 1..=BLOCKS {
				relay.notify(EngineNotification::NewBlock { height });
			}
		});

		let transient: Arc<dyn WalletListener> = Arc::new(Logging(log.clone(), 2));
		while !engine_thread.is_finished() {
			registry.add(transient.clone());
			registry.remove(&transient).unwrap();
		}
		engine_thread.join().unwrap();

		let log = log.lock().unwrap();
		for height in 1..=BLOCKS {
			let order: Vec<usize> = log.iter().filter(|(h, _)| *h == height).map(|(_, id)| *id).collect();
			assert!(order == vec![0, 1] || order == vec![0, 1, 2], "height {}: {:?}", height, order);
		}
		let heights: Vec<u64> = log.iter().filter(|(_, id)| *id == 0).map(|(h, _)| *h).collect();
		assert_eq!(heights, (1..=BLOCKS).collect::<Vec<_>>());
		assert_eq!(registry.len(), 2);
	}

	#[test]
	fn test_output_received_synthesizes_tx_graph() {
		let event = convert_notification(EngineNotification::OutputReceived {
			height: 250,
			tx_hash: "rx".to_string(),
			amount: "1000000000000".to_string(),
			account_index: 1,
			subaddress_index: 2,
			version: 2,
			unlock_time: 0,
		})
		.unwrap();
		let WalletEvent::OutputReceived(output) = event else {
			panic!("expected output received");
		};
		assert_eq!(output.amount, Some(1_000_000_000_000));
		assert_eq!(output.account_index, Some(1));
		assert!(!output.is_input());
		let tx = output.output().tx().unwrap();
		assert_eq!(tx.hash.as_deref(), Some("rx"));
		assert_eq!(tx.height(), Some(250));
		assert_eq!(tx.outputs.len(), 1);
		assert!(tx.inputs.is_empty());
	}

	#[test]
	fn test_unconfirmed_output_spent_has_no_block() {
		let event = convert_notification(EngineNotification::OutputSpent {
			height: 0,
			tx_hash: "sp".to_string(),
			amount: "5".to_string(),
			account_index: 0,
			subaddress_index: 0,
			version: 2,
		})
		.unwrap();
		let WalletEvent::OutputSpent(output) = event else {
			panic!("expected output spent");
		};
		assert!(output.is_input());
		assert!(output.tx().block.is_none());
		assert!(output.tx().outputs.is_empty());
		assert_eq!(output.tx().inputs.len(), 1);
	}

	#[test]
	fn test_invalid_amount_is_rejected() {
		let result = convert_notification(EngineNotification::OutputSpent {
			height: 1,
			tx_hash: "sp".to_string(),
			amount: "not-a-number".to_string(),
			account_index: 0,
			subaddress_index: 0,
			version: 2,
		});
		assert!(matches!(result, Err(WalletError::Engine(_))));
	}

	#[test]
	fn test_relay_delivers_to_registry() {
		let registry = Arc::new(ListenerRegistry::new());
		let listener = Arc::new(RecordingListener::default());
		registry.add(listener.clone());
		let relay = NotificationRelay::new(registry);
		relay.notify(EngineNotification::NewBlock { height: 9 });
		relay.notify(EngineNotification::OutputReceived {
			height: 9,
			tx_hash: "a".to_string(),
			amount: "3".to_string(),
			account_index: 0,
			subaddress_index: 0,
			version: 2,
			unlock_time: 0,
		});
		assert_eq!(listener.events(), vec!["block 9", "received Some(3)"]);
	}

	#[test]
	fn test_sync_listener_adapter_tracks_progress() {
		let seen = Arc::new(AtomicUsize::new(0));
		let counter = seen.clone();
		let adapter = SyncListenerAdapter::new(
			Arc::new(move |_: &SyncProgress| {
				counter.fetch_add(1, Ordering::SeqCst);
			}),
			3,
		);
		adapter.handle(&WalletEvent::SyncProgress(SyncProgress {
			height: 8,
			start_height: 3,
			end_height: 8,
			percent_done: 1.0,
			message: String::new(),
		}));
		adapter.handle(&WalletEvent::NewBlock { height: 8 });
		assert_eq!(seen.load(Ordering::SeqCst), 1);
		assert!(adapter.progress().is_complete());
	}

	#[tokio::test]
	async fn test_channel_listener_forwards_events() {
		let (listener, mut receiver) = ChannelListener::new();
		let registry = ListenerRegistry::new();
		registry.add(listener);
		registry.dispatch(&WalletEvent::NewBlock { height: 4 });
		match receiver.recv().await {
			Some(WalletEvent::NewBlock { height }) => assert_eq!(height, 4),
			other => panic!("unexpected {:?}", other),
		}
	}
}
