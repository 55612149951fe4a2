//! Progress tracking for wallet synchronization.
//!
//! This module provides the `SyncProgressTracker`, which follows the progress notifications the
//! engine emits during one sync call. It records the heights reached, counts notifications, and
//! produces statistics and a summary line once the call finishes.

use crate::model::SyncProgress;
use tracing::{info, warn};

/// Number of blocks between two progress log lines.
const LOG_INTERVAL_BLOCKS: u64 = 1000;

/// Service for tracking synchronization progress
///
/// The tracker keeps the highest height announced, the target height, and how many progress
/// notifications were received, so that the end of a sync can be logged and sanity-checked.
#[derive(Debug, Clone)]
pub struct SyncProgressTracker {
	/// Height the sync started from
	start_height: u64,
	/// Highest height announced so far
	highest_height: u64,
	/// Target height announced by the engine
	end_height: Option<u64>,
	/// Last fraction reported, between 0 and 1
	percent_done: f64,
	/// Number of progress notifications received
	updates_received: usize,
	/// Notifications that went backwards in height
	regressions: usize,
	/// Height at which progress was last logged
	last_logged_height: u64,
}

impl SyncProgressTracker {
	/// Create a new progress tracker starting from the given height.
	pub fn new(start_height: u64) -> Self {
		Self {
			start_height,
			highest_height: start_height,
			end_height: None,
			percent_done: 0.0,
			updates_received: 0,
			regressions: 0,
			last_logged_height: start_height,
		}
	}

	/// Record one progress notification
	pub fn record(&mut self, progress: &SyncProgress) {
		if progress.height < self.highest_height && self.updates_received > 0 {
			self.regressions += 1;
		}
		self.highest_height = self.highest_height.max(progress.height);
		self.end_height = Some(progress.end_height);
		self.percent_done = progress.percent_done;
		self.updates_received += 1;
	}

	/// Whether the last notification reported completion.
	pub fn is_complete(&self) -> bool {
		self.percent_done >= 1.0
	}

	/// Log progress at regular intervals or when forced
	pub fn log_progress(&mut self, force: bool) {
		let blocks_since_last_log = self.highest_height.saturating_sub(self.last_logged_height);
		let should_log = force || blocks_since_last_log >= LOG_INTERVAL_BLOCKS;

		if should_log && self.updates_received > 0 {
			info!(
				"Sync progress: height {} of {} ({:.1}%)",
				self.highest_height,
				self.end_height.unwrap_or(self.highest_height),
				self.percent_done * 100.0
			);
			self.last_logged_height = self.highest_height;
		}
	}

	/// Get sync statistics as a SyncStats struct
	pub fn get_stats(&self) -> SyncStats {
		SyncStats {
			start_height: self.start_height,
			highest_height: self.highest_height,
			end_height: self.end_height,
			updates_received: self.updates_received,
			regressions: self.regressions,
			is_complete: self.is_complete(),
		}
	}

	/// Warn about anything unusual seen during the sync.
	pub fn validate_completion(&self) {
		if self.updates_received == 0 {
			warn!("Sync finished without any progress notification");
			return;
		}
		if self.regressions > 0 {
			warn!(
				"Sync progress went backwards {} times",
				self.regressions
			);
		}
	}
}

/// Statistics about the sync progress
#[derive(Debug, Clone, PartialEq)]
pub struct SyncStats {
	pub start_height: u64,
	pub highest_height: u64,
	pub end_height: Option<u64>,
	pub updates_received: usize,
	pub regressions: usize,
	pub is_complete: bool,
}

impl SyncStats {
	/// Get a human-readable summary of the sync statistics
	pub fn summary(&self) -> String {
		format!(
			"Sync from {} to {}: {} progress updates{}",
			self.start_height,
			self.highest_height,
			self.updates_received,
			if self.is_complete {
				String::new()
			} else {
				" (incomplete)".to_string()
			}
		)
	}
}
