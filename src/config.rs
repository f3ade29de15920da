use alloy_primitives::{address, Address};

/// Deployed collection contract.
pub const CONTRACT_ADDRESS: Address = address!("8EEB251EdE1E98C9d99Bc32E2F27F5A635347eA3");
/// Rinkeby.
pub const REQUIRED_CHAIN_ID: u64 = 0x4;
pub const REQUIRED_NETWORK_NAME: &str = "Rinkeby";
pub const OPENSEA_COLLECTION_URL: &str = "https://testnets.opensea.io/collection/cheesenft-v3";
pub const OPENSEA_ASSETS_URL: &str = "https://testnets.opensea.io/assets";
pub const EXPLORER_TX_URL: &str = "https://rinkeby.etherscan.io/tx";
pub const COLLECTION_SIZE: u64 = 50;
/// Same cadence the wallet libraries use for receipt and log polling.
pub const POLL_INTERVAL_MS: u32 = 4_000;

pub const CONTRACT_ABI_JSON: &str = include_str!("../abi/EpicNft.json");

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub contract_address: Address,
    pub required_chain_id: u64,
    pub required_network_name: String,
    pub collection_url: String,
    pub assets_url: String,
    pub explorer_tx_url: String,
    pub collection_size: u64,
    pub poll_interval_ms: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            contract_address: CONTRACT_ADDRESS,
            required_chain_id: REQUIRED_CHAIN_ID,
            required_network_name: REQUIRED_NETWORK_NAME.to_string(),
            collection_url: OPENSEA_COLLECTION_URL.to_string(),
            assets_url: OPENSEA_ASSETS_URL.to_string(),
            explorer_tx_url: EXPLORER_TX_URL.to_string(),
            collection_size: COLLECTION_SIZE,
            poll_interval_ms: POLL_INTERVAL_MS,
        }
    }
}

impl AppConfig {
    /// Marketplace page for a single token of the collection.
    pub fn token_url(&self, token_id: impl std::fmt::Display) -> String {
        format!("{}/{}/{}", self.assets_url, self.contract_address, token_id)
    }

    pub fn transaction_url(&self, hash: impl std::fmt::Display) -> String {
        format!("{}/{}", self.explorer_tx_url, hash)
    }
}
