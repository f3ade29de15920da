//! UI state owned by the root component.
//!
//! Every mutation goes through [`MintState::apply`], so the controller only
//! ever emits [`Action`]s and never touches the state directly.

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    AccountConnected(String),
    /// Resolves the network check. `None` means no chain id was available.
    ChainIdLoaded(Option<String>),
    TotalMintedLoaded(String),
    MintStarted,
    MintFinished,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MintState {
    pub account: Option<String>,
    pub chain_id: Option<String>,
    pub total_minted: Option<String>,
    pub loading_chain: bool,
    pub minting: bool,
}

impl Default for MintState {
    fn default() -> Self {
        Self {
            account: None,
            chain_id: None,
            total_minted: None,
            loading_chain: true,
            minting: false,
        }
    }
}

/// What the page shows above the footer.
#[derive(Clone, Debug, PartialEq)]
pub enum Screen {
    Loading,
    NetworkUnknown,
    WrongNetwork(String),
    Mint,
}

/// Parses an `eth_chainId` style hex quantity.
pub fn parse_chain_id(chain_id: &str) -> Option<u64> {
    let digits = chain_id
        .strip_prefix("0x")
        .or_else(|| chain_id.strip_prefix("0X"))?;
    u64::from_str_radix(digits, 16).ok()
}

impl MintState {
    /// Applies an action and reports whether anything changed.
    pub fn apply(&mut self, action: Action) -> bool {
        let before = self.clone();
        match action {
            Action::AccountConnected(account) => self.account = Some(account),
            Action::ChainIdLoaded(chain_id) => {
                self.chain_id = chain_id;
                self.loading_chain = false;
            }
            Action::TotalMintedLoaded(total) => self.total_minted = Some(total),
            Action::MintStarted => self.minting = true,
            Action::MintFinished => self.minting = false,
        }
        *self != before
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    pub fn screen(&self, required_chain_id: u64) -> Screen {
        if self.loading_chain {
            return Screen::Loading;
        }
        match &self.chain_id {
            None => Screen::NetworkUnknown,
            Some(id) if parse_chain_id(id) == Some(required_chain_id) => Screen::Mint,
            Some(id) => Screen::WrongNetwork(id.clone()),
        }
    }

    pub fn total_minted_label(&self) -> &str {
        self.total_minted.as_deref().unwrap_or("?")
    }
}
