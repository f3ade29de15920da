//! Capabilities the page needs from the injected wallet.
//!
//! The controller is generic over these traits so it can run against the
//! browser's `window.ethereum` or an in-memory double.
#![allow(async_fn_in_trait)]

mod browser;
mod contract;

use std::rc::Rc;

use alloy_primitives::{Address, B256, U256};

use crate::abi::{AbiValue, ContractAbi};
use crate::error::{Result, WalletError};

pub use browser::{BrowserNotifier, Eip1193Provider};
pub use contract::BrowserContract;

pub const TOTAL_MINTED_FN: &str = "getTotalNFTsMintedSoFar";
pub const MINT_FN: &str = "makeAnEpicNFT";
pub const MINTED_EVENT: &str = "NewEpicNFTMinted";

pub trait WalletProvider {
    type Contract: NftContract;

    /// Accounts already authorized for this origin. Never prompts.
    async fn accounts(&self) -> Result<Vec<String>>;

    /// Asks the user to authorize accounts; may open a wallet prompt.
    async fn request_accounts(&self) -> Result<Vec<String>>;

    /// Hex encoded chain id, e.g. `0x4`.
    async fn chain_id(&self) -> Result<String>;

    fn contract(&self, address: Address, abi: Rc<ContractAbi>) -> Self::Contract;
}

pub trait NftContract {
    async fn total_minted(&self) -> Result<U256>;

    /// Submits the mint transaction; resolves once the wallet has sent it.
    async fn mint(&self) -> Result<PendingMint>;

    /// Resolves once the transaction is mined. Reverts are errors.
    async fn wait(&self, pending: &PendingMint) -> Result<TransactionReceipt>;

    /// Installs a listener for mint events. The listener lives for the page.
    fn on_minted(&self, handler: Box<dyn Fn(MintedEvent)>) -> Result<()>;
}

pub trait Notifier {
    fn alert(&self, message: &str);
}

#[derive(Clone, Debug, PartialEq)]
pub struct PendingMint {
    pub hash: B256,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransactionReceipt {
    pub hash: B256,
    pub block_number: Option<u64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MintedEvent {
    pub from: Address,
    pub token_id: U256,
}

impl MintedEvent {
    pub fn from_values(values: &[(String, AbiValue)]) -> Result<Self> {
        let from = values.iter().find_map(|(_, v)| match v {
            AbiValue::Address(a) => Some(*a),
            _ => None,
        });
        let token_id = values.iter().find_map(|(_, v)| match v {
            AbiValue::Uint(u) => Some(*u),
            _ => None,
        });
        match (from, token_id) {
            (Some(from), Some(token_id)) => Ok(Self { from, token_id }),
            _ => Err(WalletError::Abi(format!("{MINTED_EVENT} log is missing fields"))),
        }
    }
}
