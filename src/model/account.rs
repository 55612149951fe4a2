use serde::{Deserialize, Serialize};

/// Account within the wallet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Account {
	pub index: Option<u32>,
	pub primary_address: Option<String>,
	pub balance: Option<u64>,
	pub unlocked_balance: Option<u64>,
	pub label: Option<String>,
	pub tag: Option<String>,
	pub subaddresses: Option<Vec<Subaddress>>,
}

/// Subaddress of an account; the spendable unit of the wallet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Subaddress {
	pub account_index: Option<u32>,
	pub index: Option<u32>,
	pub address: Option<String>,
	pub label: Option<String>,
	pub balance: Option<u64>,
	pub unlocked_balance: Option<u64>,
	pub num_unspent_outputs: Option<u64>,
	pub is_used: Option<bool>,
	pub num_blocks_to_unlock: Option<u64>,
}

/// Entry in the wallet's address book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressBookEntry {
	pub index: Option<u32>,
	pub address: Option<String>,
	pub payment_id: Option<String>,
	pub description: Option<String>,
}
