use alloy_primitives::B256;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WalletError {
    #[error("No wallet provider found in this browser")]
    NoWallet,

    #[error("Wallet returned no authorized accounts")]
    NoAccounts,

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("JavaScript error: {0}")]
    Js(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("ABI error: {0}")]
    Abi(String),

    #[error("Transaction {0} reverted")]
    Reverted(B256),
}

impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        WalletError::Decode(err.to_string())
    }
}

impl From<alloy_primitives::hex::FromHexError> for WalletError {
    fn from(err: alloy_primitives::hex::FromHexError) -> Self {
        WalletError::Decode(err.to_string())
    }
}

pub type Result<T, E = WalletError> = std::result::Result<T, E>;
