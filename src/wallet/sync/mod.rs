//! Wallet Listening and Synchronization Module
//!
//! This module holds the logic that connects a wallet's listeners to its engine and runs sync
//! calls. It is composed of several submodules:
//!
//! - `coordinator`: Registers listeners, toggles engine notifications on the first and last
//!   registration, and runs sync calls with a one-shot progress listener.
//! - `events`: Defines the wallet events, the listener traits, the listener registry, and the relay
//!   converting engine notifications into events.
//! - `progress_tracker`: Tracks sync progress and provides statistics and validation.

/// Listener registration and sync coordination
pub mod coordinator;
/// Event system for wallet notifications
pub mod events;
/// Tracks synchronization progress and statistics
pub mod progress_tracker;

pub use coordinator::SyncCoordinator;
pub use events::{
	ChannelListener, ListenerRegistry, NotificationRelay, SyncListener, SyncListenerAdapter, WalletEvent,
	WalletListener,
};
pub use progress_tracker::{SyncProgressTracker, SyncStats};
