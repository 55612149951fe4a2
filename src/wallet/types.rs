use crate::engine::EngineError;

/// Error types for wallet operations
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
	#[error("Validation error: {0}")]
	Validation(String),

	#[error("Filter conflict: {0}")]
	FilterConflict(String),

	#[error("Wallet is closed")]
	Closed,

	#[error("Engine error: {0}")]
	Engine(String),

	#[error("Not supported: {0}")]
	NotSupported(String),

	#[error("Listener is not registered")]
	ListenerNotRegistered,

	#[error("A sync is already in progress on this wallet")]
	SyncInProgress,

	#[error("Decode error: {0}")]
	Decode(#[from] serde_json::Error),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

impl From<EngineError> for WalletError {
	fn from(err: EngineError) -> Self {
		match err {
			EngineError::NotSupported(operation) => WalletError::NotSupported(operation),
			EngineError::Failed(message) => WalletError::Engine(message),
		}
	}
}
