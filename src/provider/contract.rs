use std::rc::Rc;

use alloy_primitives::{hex, Address, B256, U256};
use gloo_timers::future::TimeoutFuture;
use serde::Deserialize;
use serde_json::json;
use wasm_bindgen_futures::spawn_local;

use super::browser::parse_quantity;
use super::{
    Eip1193Provider, MintedEvent, NftContract, PendingMint, TransactionReceipt, WalletProvider,
    MINTED_EVENT, MINT_FN, TOTAL_MINTED_FN,
};
use crate::abi::{decode_uint, AbiEvent, ContractAbi};
use crate::error::{Result, WalletError};

#[derive(Deserialize, Debug)]
struct RawReceipt {
    #[serde(rename = "blockNumber", default)]
    block_number: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RawLog {
    topics: Vec<String>,
    data: String,
}

fn parse_hash(value: &str) -> Result<B256> {
    value
        .parse::<B256>()
        .map_err(|e| WalletError::Decode(format!("bad hash {value}: {e}")))
}

fn decode_minted(event: &AbiEvent, log: &RawLog) -> Result<MintedEvent> {
    let topics = log
        .topics
        .iter()
        .map(|t| parse_hash(t))
        .collect::<Result<Vec<_>>>()?;
    let data = hex::decode(&log.data)?;
    MintedEvent::from_values(&event.decode_log(&topics, &data)?)
}

/// `None` while the transaction is still pending.
fn receipt_outcome(hash: B256, receipt: Option<RawReceipt>) -> Result<Option<TransactionReceipt>> {
    let Some(receipt) = receipt else {
        return Ok(None);
    };
    if receipt.status.as_deref() == Some("0x0") {
        return Err(WalletError::Reverted(hash));
    }
    let block_number = receipt
        .block_number
        .as_deref()
        .map(parse_quantity)
        .transpose()?;
    Ok(Some(TransactionReceipt { hash, block_number }))
}

/// Given the first unscanned block and the chain head, returns the block
/// range to query (if any) and the first unscanned block to keep until that
/// query succeeds.
fn log_window(next: Option<u64>, head: u64) -> (Option<(u64, u64)>, Option<u64>) {
    match next {
        None => (None, Some(head + 1)),
        Some(from) if from <= head => (Some((from, head)), Some(from)),
        Some(from) => (None, Some(from)),
    }
}

/// Contract handle that talks JSON-RPC through the injected wallet.
#[derive(Clone, Debug)]
pub struct BrowserContract {
    provider: Eip1193Provider,
    address: Address,
    abi: Rc<ContractAbi>,
}

impl BrowserContract {
    pub fn new(provider: Eip1193Provider, address: Address, abi: Rc<ContractAbi>) -> Self {
        Self {
            provider,
            address,
            abi,
        }
    }

    fn call_data(&self, function: &str) -> Result<String> {
        Ok(hex::encode_prefixed(self.abi.encode_call(function)?))
    }

    async fn sender(&self) -> Result<String> {
        self.provider
            .accounts()
            .await?
            .into_iter()
            .next()
            .ok_or(WalletError::NoAccounts)
    }
}

impl NftContract for BrowserContract {
    async fn total_minted(&self) -> Result<U256> {
        let call = json!({
            "to": self.address.to_string(),
            "data": self.call_data(TOTAL_MINTED_FN)?,
        });
        let result: String = self.provider.request("eth_call", json!([call, "latest"])).await?;
        decode_uint(&hex::decode(result)?)
    }

    async fn mint(&self) -> Result<PendingMint> {
        let tx = json!({
            "from": self.sender().await?,
            "to": self.address.to_string(),
            "data": self.call_data(MINT_FN)?,
        });
        let hash: String = self.provider.request("eth_sendTransaction", json!([tx])).await?;
        Ok(PendingMint {
            hash: parse_hash(&hash)?,
        })
    }

    async fn wait(&self, pending: &PendingMint) -> Result<TransactionReceipt> {
        let params = json!([pending.hash.to_string()]);
        loop {
            let receipt: Option<RawReceipt> = self
                .provider
                .request("eth_getTransactionReceipt", params.clone())
                .await?;
            match receipt_outcome(pending.hash, receipt)? {
                Some(receipt) => return Ok(receipt),
                None => TimeoutFuture::new(self.provider.poll_interval_ms()).await,
            }
        }
    }

    fn on_minted(&self, handler: Box<dyn Fn(MintedEvent)>) -> Result<()> {
        let event = self.abi.event(MINTED_EVENT)?.clone();
        let provider = self.provider.clone();
        let address = self.address.to_string();
        let topic = event.topic().to_string();
        let interval = provider.poll_interval_ms();

        spawn_local(async move {
            // First block not yet scanned; unset until the head is known.
            let mut next_block: Option<u64> = None;
            loop {
                match provider.block_number().await {
                    Ok(head) => {
                        let (range, next) = log_window(next_block, head);
                        next_block = next;
                        if let Some((from, to)) = range {
                            let filter = json!({
                                "address": address,
                                "topics": [topic],
                                "fromBlock": format!("{from:#x}"),
                                "toBlock": format!("{to:#x}"),
                            });
                            match provider
                                .request::<Vec<RawLog>>("eth_getLogs", json!([filter]))
                                .await
                            {
                                Ok(logs) => {
                                    for raw in &logs {
                                        match decode_minted(&event, raw) {
                                            Ok(minted) => handler(minted),
                                            Err(err) => log::error!("Bad {MINTED_EVENT} log: {err}"),
                                        }
                                    }
                                    next_block = Some(to + 1);
                                }
                                Err(err) => log::error!("eth_getLogs failed: {err}"),
                            }
                        }
                    }
                    Err(err) => log::error!("eth_blockNumber failed: {err}"),
                }
                TimeoutFuture::new(interval).await;
            }
        });
        Ok(())
    }
}
