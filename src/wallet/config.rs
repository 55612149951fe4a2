//! Wallet configuration and its validation for opening or creating a wallet.

use crate::model::{DaemonConnection, NetworkType};
use crate::wallet::WalletError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Language used for new mnemonics when none is given.
pub const DEFAULT_LANGUAGE: &str = "English";

/// Configuration to open or create a wallet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WalletConfig {
	/// Path of the wallet file; `None` creates an in-memory wallet
	pub path: Option<String>,
	pub password: Option<String>,
	pub network_type: Option<NetworkType>,
	/// Daemon to connect to after opening
	pub server: Option<DaemonConnection>,
	pub mnemonic: Option<String>,
	pub seed_offset: Option<String>,
	pub primary_address: Option<String>,
	pub private_view_key: Option<String>,
	pub private_spend_key: Option<String>,
	pub restore_height: Option<u64>,
	pub language: Option<String>,
	pub save_current: Option<bool>,
}

/// How the engine derives the keys of a new wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationMode {
	Random {
		language: String,
	},
	Mnemonic {
		mnemonic: String,
		seed_offset: Option<String>,
		restore_height: u64,
	},
	Keys {
		primary_address: String,
		private_view_key: Option<String>,
		private_spend_key: Option<String>,
		restore_height: u64,
		language: String,
	},
}

fn forbid<T>(value: &Option<T>, message: &str) -> Result<(), WalletError> {
	match value {
		Some(_) => Err(WalletError::Validation(message.to_string())),
		None => Ok(()),
	}
}

impl WalletConfig {
	pub fn new(network_type: NetworkType) -> Self {
		Self {
			network_type: Some(network_type),
			..Default::default()
		}
	}

	pub fn with_path(mut self, path: impl Into<String>) -> Self {
		self.path = Some(path.into());
		self
	}

	pub fn with_password(mut self, password: impl Into<String>) -> Self {
		self.password = Some(password.into());
		self
	}

	pub fn with_server(mut self, server: DaemonConnection) -> Self {
		self.server = Some(server);
		self
	}

	pub fn with_mnemonic(mut self, mnemonic: impl Into<String>) -> Self {
		self.mnemonic = Some(mnemonic.into());
		self
	}

	pub fn with_seed_offset(mut self, seed_offset: impl Into<String>) -> Self {
		self.seed_offset = Some(seed_offset.into());
		self
	}

	pub fn with_keys(
		mut self,
		primary_address: impl Into<String>,
		private_view_key: Option<String>,
		private_spend_key: Option<String>,
	) -> Self {
		self.primary_address = Some(primary_address.into());
		self.private_view_key = private_view_key;
		self.private_spend_key = private_spend_key;
		self
	}

	pub fn with_restore_height(mut self, restore_height: u64) -> Self {
		self.restore_height = Some(restore_height);
		self
	}

	pub fn with_language(mut self, language: impl Into<String>) -> Self {
		self.language = Some(language.into());
		self
	}

	/// Read a JSON configuration file.
	pub async fn load(path: impl AsRef<Path>) -> Result<Self, WalletError> {
		let content = tokio::fs::read_to_string(path.as_ref()).await?;
		let config: Self = serde_json::from_str(&content)?;
		debug!("Loaded wallet config from {}", path.as_ref().display());
		Ok(config)
	}

	/// Write this configuration as pretty JSON.
	pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), WalletError> {
		let content = serde_json::to_string_pretty(self)?;
		tokio::fs::write(path.as_ref(), content).await?;
		Ok(())
	}

	/// Check the configuration for opening an existing wallet.
	///
	/// Returns the path, password and network type.
	pub fn validate_open(&self) -> Result<(&str, &str, NetworkType), WalletError> {
		let path = self
			.path
			.as_deref()
			.ok_or_else(|| WalletError::Validation("Must specify path to open wallet".to_string()))?;
		let password = self.password.as_deref().ok_or_else(|| {
			WalletError::Validation("Must specify password to decrypt wallet".to_string())
		})?;
		let network_type = self.network_type.ok_or_else(|| {
			WalletError::Validation(
				"Must specify a network type: 'mainnet', 'testnet' or 'stagenet'".to_string(),
			)
		})?;
		forbid(&self.mnemonic, "Cannot specify mnemonic when opening wallet")?;
		forbid(&self.seed_offset, "Cannot specify seed offset when opening wallet")?;
		forbid(&self.primary_address, "Cannot specify primary address when opening wallet")?;
		forbid(&self.private_view_key, "Cannot specify private view key when opening wallet")?;
		forbid(&self.private_spend_key, "Cannot specify private spend key when opening wallet")?;
		forbid(&self.restore_height, "Cannot specify restore height when opening wallet")?;
		forbid(&self.language, "Cannot specify language when opening wallet")?;
		if self.save_current == Some(true) {
			return Err(WalletError::Validation(
				"Cannot save current wallet when opening wallet".to_string(),
			));
		}
		Ok((path, password, network_type))
	}

	/// Check the configuration for creating a wallet and derive how to create it.
	pub fn validate_create(&self) -> Result<(NetworkType, CreationMode), WalletError> {
		let network_type = self.network_type.ok_or_else(|| {
			WalletError::Validation(
				"Must specify a network type: 'mainnet', 'testnet' or 'stagenet'".to_string(),
			)
		})?;
		let has_keys = self.primary_address.is_some()
			|| self.private_view_key.is_some()
			|| self.private_spend_key.is_some();
		if self.mnemonic.is_some() && has_keys {
			return Err(WalletError::Validation(
				"Wallet may be initialized with a mnemonic or keys but not both".to_string(),
			));
		}
		if self.save_current.is_some() {
			return Err(WalletError::Validation(
				"Cannot save current wallet when creating wallet".to_string(),
			));
		}

		let restore_height = self.restore_height.unwrap_or(0);
		let language = self
			.language
			.clone()
			.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

		let mode = if let Some(mnemonic) = &self.mnemonic {
			forbid(&self.language, "Cannot specify language when creating wallet from mnemonic")?;
			CreationMode::Mnemonic {
				mnemonic: mnemonic.clone(),
				seed_offset: self.seed_offset.clone(),
				restore_height,
			}
		} else if let Some(primary_address) = &self.primary_address {
			forbid(&self.seed_offset, "Cannot specify seed offset when creating wallet from keys")?;
			CreationMode::Keys {
				primary_address: primary_address.clone(),
				private_view_key: self.private_view_key.clone(),
				private_spend_key: self.private_spend_key.clone(),
				restore_height,
				language,
			}
		} else if has_keys {
			return Err(WalletError::Validation(
				"Must specify primary address when creating wallet from keys".to_string(),
			));
		} else {
			forbid(&self.seed_offset, "Cannot specify seed offset when creating random wallet")?;
			forbid(&self.restore_height, "Cannot specify restore height when creating random wallet")?;
			CreationMode::Random { language }
		};
		Ok((network_type, mode))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn open_config() -> WalletConfig {
		WalletConfig::new(NetworkType::Stagenet)
			.with_path("/tmp/wallet")
			.with_password("secret")
	}

	#[test]
	fn test_open_requires_path_password_and_network() {
		assert!(open_config().validate_open().is_ok());
		let err = WalletConfig {
			path: None,
			..open_config()
		}
		.validate_open()
		.unwrap_err();
		assert!(err.to_string().contains("path"));
		assert!(WalletConfig {
			network_type: None,
			..open_config()
		}
		.validate_open()
		.is_err());
	}

	#[test]
	fn test_open_rejects_creation_parameters() {
		for config in [
			open_config().with_mnemonic("words"),
			open_config().with_restore_height(5),
			open_config().with_language("German"),
			open_config().with_keys("addr", None, None),
		] {
			assert!(matches!(config.validate_open(), Err(WalletError::Validation(_))));
		}
	}

	#[test]
	fn test_create_random_defaults_language() {
		let (network, mode) = WalletConfig::new(NetworkType::Testnet).validate_create().unwrap();
		assert_eq!(network, NetworkType::Testnet);
		assert_eq!(
			mode,
			CreationMode::Random {
				language: DEFAULT_LANGUAGE.to_string()
			}
		);
	}

	#[test]
	fn test_create_rejects_mnemonic_with_keys() {
		let err = WalletConfig::new(NetworkType::Mainnet)
			.with_mnemonic("words")
			.with_keys("addr", Some("view".to_string()), None)
			.validate_create()
			.unwrap_err();
		assert!(err.to_string().contains("mnemonic or keys"));
	}

	#[test]
	fn test_create_mode_specific_restrictions() {
		let mnemonic_with_language = WalletConfig::new(NetworkType::Mainnet)
			.with_mnemonic("words")
			.with_language("English");
		assert!(mnemonic_with_language.validate_create().is_err());

		let keys_with_offset = WalletConfig::new(NetworkType::Mainnet)
			.with_keys("addr", None, None)
			.with_seed_offset("pass");
		assert!(keys_with_offset.validate_create().is_err());

		let random_with_height = WalletConfig::new(NetworkType::Mainnet).with_restore_height(10);
		assert!(random_with_height.validate_create().is_err());
	}

	#[test]
	fn test_create_from_mnemonic_defaults_restore_height() {
		let (_, mode) = WalletConfig::new(NetworkType::Stagenet)
			.with_mnemonic("words")
			.with_seed_offset("pass")
			.validate_create()
			.unwrap();
		assert_eq!(
			mode,
			CreationMode::Mnemonic {
				mnemonic: "words".to_string(),
				seed_offset: Some("pass".to_string()),
				restore_height: 0,
			}
		);
	}

	#[tokio::test]
	async fn test_config_file_round_trip() {
		let path = std::env::temp_dir().join(format!("wallet-config-{}.json", std::process::id()));
		let config = open_config().with_server(DaemonConnection::new("http://localhost:38081"));
		config.save(&path).await.unwrap();
		let loaded = WalletConfig::load(&path).await.unwrap();
		tokio::fs::remove_file(&path).await.unwrap();
		assert_eq!(loaded, config);
	}

	#[tokio::test]
	async fn test_load_missing_file_is_io_error() {
		let err = WalletConfig::load("/nonexistent/wallet-config.json").await.unwrap_err();
		assert!(matches!(err, WalletError::Io(_)));
	}
}
