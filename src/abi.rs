//! Minimal reader for the contract's JSON ABI descriptor.
//!
//! Only what the minting page needs is supported: zero-argument calls,
//! `uint256` return values and logs made of `address` / `uint256` fields.

use alloy_primitives::{keccak256, Address, B256, U256};
use serde::Deserialize;

use crate::error::{Result, WalletError};

const WORD: usize = 32;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub indexed: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AbiFunction {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default)]
    pub outputs: Vec<AbiParam>,
    #[serde(rename = "stateMutability", default)]
    pub state_mutability: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AbiEvent {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default)]
    pub anonymous: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
enum AbiItem {
    Function(AbiFunction),
    Event(AbiEvent),
    #[serde(other)]
    Other,
}

/// A decoded ABI value.
#[derive(Debug, Clone, PartialEq)]
pub enum AbiValue {
    Address(Address),
    Uint(U256),
}

fn signature(name: &str, params: &[AbiParam]) -> String {
    let kinds: Vec<&str> = params.iter().map(|p| p.kind.as_str()).collect();
    format!("{}({})", name, kinds.join(","))
}

impl AbiFunction {
    pub fn signature(&self) -> String {
        signature(&self.name, &self.inputs)
    }

    pub fn selector(&self) -> [u8; 4] {
        let hash = keccak256(self.signature().as_bytes());
        [hash[0], hash[1], hash[2], hash[3]]
    }
}

impl AbiEvent {
    pub fn signature(&self) -> String {
        signature(&self.name, &self.inputs)
    }

    /// First log topic of a non-anonymous event.
    pub fn topic(&self) -> B256 {
        keccak256(self.signature().as_bytes())
    }

    /// Decodes a log into `(field name, value)` pairs in declaration order.
    pub fn decode_log(&self, topics: &[B256], data: &[u8]) -> Result<Vec<(String, AbiValue)>> {
        let mut topics = topics.iter();
        if !self.anonymous {
            match topics.next() {
                Some(topic) if *topic == self.topic() => {}
                _ => {
                    return Err(WalletError::Abi(format!(
                        "log does not belong to event {}",
                        self.name
                    )))
                }
            }
        }

        let mut words = data.chunks(WORD);
        let mut values = Vec::with_capacity(self.inputs.len());
        for param in &self.inputs {
            let word: &[u8] = if param.indexed {
                topics
                    .next()
                    .map(|t| t.as_slice())
                    .ok_or_else(|| WalletError::Abi(format!("missing topic for {}", param.name)))?
            } else {
                words
                    .next()
                    .filter(|w| w.len() == WORD)
                    .ok_or_else(|| WalletError::Abi(format!("missing data for {}", param.name)))?
            };
            values.push((param.name.clone(), decode_word(&param.kind, word)?));
        }
        Ok(values)
    }
}

fn decode_word(kind: &str, word: &[u8]) -> Result<AbiValue> {
    match kind {
        "address" => Ok(AbiValue::Address(Address::from_slice(&word[WORD - 20..]))),
        "uint256" => Ok(AbiValue::Uint(U256::from_be_slice(word))),
        other => Err(WalletError::Abi(format!("unsupported type {other}"))),
    }
}

/// Reads the first return word of a call as `uint256`.
pub fn decode_uint(data: &[u8]) -> Result<U256> {
    if data.len() < WORD {
        return Err(WalletError::Decode(format!(
            "expected a 32 byte word, got {} bytes",
            data.len()
        )));
    }
    Ok(U256::from_be_slice(&data[..WORD]))
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContractAbi {
    functions: Vec<AbiFunction>,
    events: Vec<AbiEvent>,
}

impl ContractAbi {
    pub fn from_json(json: &str) -> Result<Self> {
        let items: Vec<AbiItem> = serde_json::from_str(json)?;
        let mut abi = ContractAbi::default();
        for item in items {
            match item {
                AbiItem::Function(f) => abi.functions.push(f),
                AbiItem::Event(e) => abi.events.push(e),
                AbiItem::Other => {}
            }
        }
        Ok(abi)
    }

    pub fn function(&self, name: &str) -> Result<&AbiFunction> {
        self.functions
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| WalletError::Abi(format!("no function named {name}")))
    }

    pub fn event(&self, name: &str) -> Result<&AbiEvent> {
        self.events
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| WalletError::Abi(format!("no event named {name}")))
    }

    /// Calldata for a function that takes no arguments.
    pub fn encode_call(&self, name: &str) -> Result<Vec<u8>> {
        let function = self.function(name)?;
        if !function.inputs.is_empty() {
            return Err(WalletError::Abi(format!(
                "{} takes arguments, only zero-argument calls are supported",
                function.signature()
            )));
        }
        Ok(function.selector().to_vec())
    }
}
