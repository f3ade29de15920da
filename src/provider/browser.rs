use std::rc::Rc;

use alloy_primitives::Address;
use gloo_utils::format::JsValueSerdeExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use super::{BrowserContract, Notifier, WalletProvider};
use crate::abi::ContractAbi;
use crate::error::{Result, WalletError};

#[wasm_bindgen]
extern "C" {
    /// The EIP-1193 object wallets inject as `window.ethereum`.
    #[derive(Clone, Debug)]
    pub type Ethereum;

    #[wasm_bindgen(method, catch)]
    fn request(this: &Ethereum, args: &JsValue) -> std::result::Result<js_sys::Promise, JsValue>;
}

#[derive(Serialize)]
struct RequestArguments<'a> {
    method: &'a str,
    #[serde(skip_serializing_if = "Value::is_null")]
    params: Value,
}

/// Turns a rejected request into a typed error. Wallets reject with
/// `{ code, message }` objects.
fn js_error(err: JsValue) -> WalletError {
    let field = |name: &str| js_sys::Reflect::get(&err, &JsValue::from_str(name)).ok();
    let code = field("code").and_then(|c| c.as_f64());
    let message = field("message").and_then(|m| m.as_string());
    match (code, message) {
        (Some(code), Some(message)) => WalletError::Rpc {
            code: code as i64,
            message,
        },
        (None, Some(message)) => WalletError::Js(message),
        _ => WalletError::Js(format!("{:?}", err)),
    }
}

pub(crate) fn parse_quantity(value: &str) -> Result<u64> {
    let digits = value
        .strip_prefix("0x")
        .ok_or_else(|| WalletError::Decode(format!("not a hex quantity: {value}")))?;
    u64::from_str_radix(digits, 16).map_err(|e| WalletError::Decode(e.to_string()))
}

#[derive(Clone, Debug)]
pub struct Eip1193Provider {
    ethereum: Ethereum,
    poll_interval_ms: u32,
}

impl Eip1193Provider {
    /// Looks up `window.ethereum`; `None` when no wallet extension is installed.
    pub fn detect(poll_interval_ms: u32) -> Option<Self> {
        let window = web_sys::window()?;
        let ethereum = js_sys::Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
        if ethereum.is_undefined() || ethereum.is_null() {
            return None;
        }
        Some(Self {
            ethereum: ethereum.unchecked_into(),
            poll_interval_ms,
        })
    }

    pub fn poll_interval_ms(&self) -> u32 {
        self.poll_interval_ms
    }

    pub async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let args = JsValue::from_serde(&RequestArguments { method, params })?;
        let promise = self.ethereum.request(&args).map_err(js_error)?;
        let response = JsFuture::from(promise).await.map_err(js_error)?;
        log::trace!("{method} -> {response:?}");
        if response.is_undefined() {
            return Ok(serde_json::from_value(Value::Null)?);
        }
        Ok(response.into_serde()?)
    }

    pub async fn block_number(&self) -> Result<u64> {
        let block: String = self.request("eth_blockNumber", Value::Null).await?;
        parse_quantity(&block)
    }
}

impl WalletProvider for Eip1193Provider {
    type Contract = BrowserContract;

    async fn accounts(&self) -> Result<Vec<String>> {
        self.request("eth_accounts", Value::Null).await
    }

    async fn request_accounts(&self) -> Result<Vec<String>> {
        self.request("eth_requestAccounts", Value::Null).await
    }

    async fn chain_id(&self) -> Result<String> {
        self.request("eth_chainId", Value::Null).await
    }

    fn contract(&self, address: Address, abi: Rc<ContractAbi>) -> BrowserContract {
        BrowserContract::new(self.clone(), address, abi)
    }
}

/// Blocking `window.alert` dialogs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BrowserNotifier;

impl Notifier for BrowserNotifier {
    fn alert(&self, message: &str) {
        match web_sys::window() {
            Some(window) => {
                if let Err(err) = window.alert_with_message(message) {
                    log::error!("alert failed: {:?}", err);
                }
            }
            None => log::warn!("no window to alert: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_hex_quantities() {
        assert_eq!(parse_quantity("0x0").unwrap(), 0);
        assert_eq!(parse_quantity("0x10").unwrap(), 16);
        assert!(parse_quantity("16").is_err());
        assert!(parse_quantity("0xzz").is_err());
    }

    #[test]
    fn request_arguments_omit_missing_params() {
        let bare = serde_json::to_value(RequestArguments {
            method: "eth_accounts",
            params: Value::Null,
        })
        .unwrap();
        assert_eq!(bare, json!({ "method": "eth_accounts" }));

        let with_params = serde_json::to_value(RequestArguments {
            method: "eth_getTransactionReceipt",
            params: json!(["0x01"]),
        })
        .unwrap();
        assert_eq!(with_params["params"], json!(["0x01"]));
    }
}
