//! Wallet-facing behaviour of the minting page.
//!
//! Every operation reports its outcome as [`Action`]s through a `dispatch`
//! callback; the root component feeds them into [`crate::state::MintState`].
//! Failures other than a missing wallet are logged and swallowed.

use std::cell::Cell;
use std::rc::Rc;

use crate::abi::ContractAbi;
use crate::config::AppConfig;
use crate::error::{Result, WalletError};
use crate::provider::{MintedEvent, NftContract, Notifier, TransactionReceipt, WalletProvider};
use crate::state::Action;

pub const NO_WALLET_ALERT: &str = "Get MetaMask!";
pub const NO_ACCOUNTS_ALERT: &str = "no accounts connected";

pub fn minted_message(config: &AppConfig, event: &MintedEvent) -> String {
    format!(
        "Hey there! We've minted your NFT and sent it to your wallet. It may be blank right now. \
         It can take a max of 10 min to show up on OpenSea. Here's the link: {}",
        config.token_url(event.token_id)
    )
}

pub struct MintController<P, N> {
    provider: Option<P>,
    notifier: Rc<N>,
    config: Rc<AppConfig>,
    abi: Rc<ContractAbi>,
    subscribed: Cell<bool>,
}

impl<P, N> MintController<P, N>
where
    P: WalletProvider,
    N: Notifier + 'static,
{
    pub fn new(provider: Option<P>, notifier: N, config: AppConfig, abi: ContractAbi) -> Self {
        Self {
            provider,
            notifier: Rc::new(notifier),
            config: Rc::new(config),
            abi: Rc::new(abi),
            subscribed: Cell::new(false),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Wallet guard: alerts once and yields `None` when no wallet is injected.
    pub fn wallet(&self) -> Option<&P> {
        if self.provider.is_none() {
            log::warn!("{}", WalletError::NoWallet);
            self.notifier.alert(NO_WALLET_ALERT);
        }
        self.provider.as_ref()
    }

    fn contract(&self, provider: &P) -> P::Contract {
        provider.contract(self.config.contract_address, self.abi.clone())
    }

    /// Mount-time work: silent reconnect, network check and mint counter,
    /// run concurrently.
    pub async fn bootstrap(&self, dispatch: impl Fn(Action)) {
        let Some(provider) = self.wallet() else {
            dispatch(Action::ChainIdLoaded(None));
            return;
        };
        futures::join!(
            self.restore_session(provider, &dispatch),
            self.load_chain_id(provider, &dispatch),
            self.load_total_minted(provider, &dispatch),
        );
    }

    async fn restore_session(&self, provider: &P, dispatch: &impl Fn(Action)) {
        match provider.accounts().await {
            Ok(accounts) => match accounts.into_iter().next() {
                Some(account) => {
                    log::info!("Found an authorized account: {account}");
                    self.install_subscription(provider);
                    dispatch(Action::AccountConnected(account));
                }
                None => log::info!("No authorized account found"),
            },
            Err(err) => log::error!("eth_accounts failed: {err}"),
        }
    }

    async fn load_chain_id(&self, provider: &P, dispatch: &impl Fn(Action)) {
        let chain_id = match provider.chain_id().await {
            Ok(chain_id) => {
                log::info!("Connected to chain {chain_id}");
                Some(chain_id)
            }
            Err(err) => {
                log::error!("eth_chainId failed: {err}");
                None
            }
        };
        dispatch(Action::ChainIdLoaded(chain_id));
    }

    async fn load_total_minted(&self, provider: &P, dispatch: &impl Fn(Action)) {
        match self.contract(provider).total_minted().await {
            Ok(total) => dispatch(Action::TotalMintedLoaded(total.to_string())),
            Err(err) => log::error!("Failed to read mint count: {err}"),
        }
    }

    pub async fn refresh_total_minted(&self, dispatch: impl Fn(Action)) {
        if let Some(provider) = self.wallet() {
            self.load_total_minted(provider, &dispatch).await;
        }
    }

    /// Asks the wallet for accounts, prompting the user if needed.
    pub async fn connect(&self, dispatch: impl Fn(Action)) {
        let Some(provider) = self.wallet() else {
            return;
        };
        match provider.request_accounts().await {
            Ok(accounts) => match accounts.into_iter().next() {
                Some(account) => {
                    log::info!("Connected {account}");
                    self.install_subscription(provider);
                    dispatch(Action::AccountConnected(account));
                }
                None => self.notifier.alert(NO_ACCOUNTS_ALERT),
            },
            Err(err) => log::error!("eth_requestAccounts failed: {err}"),
        }
    }

    /// Sends one mint transaction and waits for it to be mined. The minting
    /// flag is cleared on every path.
    pub async fn mint(&self, dispatch: impl Fn(Action)) {
        let Some(provider) = self.wallet() else {
            return;
        };
        dispatch(Action::MintStarted);
        match self.send_mint(provider).await {
            Ok(receipt) => log::info!(
                "Minted in block {}, see transaction: {}",
                receipt
                    .block_number
                    .map_or_else(|| "?".to_string(), |n| n.to_string()),
                self.config.transaction_url(receipt.hash)
            ),
            Err(err) => log::error!("Mint failed: {err}"),
        }
        dispatch(Action::MintFinished);
    }

    async fn send_mint(&self, provider: &P) -> Result<TransactionReceipt> {
        let contract = self.contract(provider);
        log::info!("Going to pop wallet now to pay gas...");
        let pending = contract.mint().await?;
        log::info!("Minting {}...please wait.", pending.hash);
        contract.wait(&pending).await
    }

    pub fn subscribe_to_mints(&self) {
        if let Some(provider) = self.wallet() {
            self.install_subscription(provider);
        }
    }

    /// At most one listener per controller.
    fn install_subscription(&self, provider: &P) {
        if self.subscribed.replace(true) {
            log::debug!("Mint listener already installed");
            return;
        }
        let notifier = self.notifier.clone();
        let config = self.config.clone();
        let handler = Box::new(move |event: MintedEvent| {
            log::info!("{} minted token {}", event.from, event.token_id);
            notifier.alert(&minted_message(&config, &event));
        });
        match self.contract(provider).on_minted(handler) {
            Ok(()) => log::info!("Setup event listener!"),
            Err(err) => {
                self.subscribed.set(false);
                log::error!("Failed to listen for mints: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use alloy_primitives::{address, B256, U256};
    use futures::executor::block_on;

    use super::*;
    use crate::config::CONTRACT_ABI_JSON;
    use crate::provider::PendingMint;
    use crate::state::MintState;

    struct MockChain {
        accounts: Result<Vec<String>>,
        requested: Result<Vec<String>>,
        chain_id: Result<String>,
        total: Result<U256>,
        mint: Result<PendingMint>,
        receipt: Result<TransactionReceipt>,
        subscriptions: Cell<usize>,
        handlers: RefCell<Vec<Box<dyn Fn(MintedEvent)>>>,
    }

    impl Default for MockChain {
        fn default() -> Self {
            let hash = B256::repeat_byte(0xaa);
            Self {
                accounts: Ok(vec![]),
                requested: Ok(vec![]),
                chain_id: Ok("0x4".to_string()),
                total: Ok(U256::from(3)),
                mint: Ok(PendingMint { hash }),
                receipt: Ok(TransactionReceipt {
                    hash,
                    block_number: Some(10),
                }),
                subscriptions: Cell::new(0),
                handlers: RefCell::new(vec![]),
            }
        }
    }

    struct MockWallet(Rc<MockChain>);
    struct MockContract(Rc<MockChain>);

    impl WalletProvider for MockWallet {
        type Contract = MockContract;

        async fn accounts(&self) -> Result<Vec<String>> {
            self.0.accounts.clone()
        }

        async fn request_accounts(&self) -> Result<Vec<String>> {
            self.0.requested.clone()
        }

        async fn chain_id(&self) -> Result<String> {
            self.0.chain_id.clone()
        }

        fn contract(&self, _address: alloy_primitives::Address, _abi: Rc<ContractAbi>) -> MockContract {
            MockContract(self.0.clone())
        }
    }

    impl NftContract for MockContract {
        async fn total_minted(&self) -> Result<U256> {
            self.0.total.clone()
        }

        async fn mint(&self) -> Result<PendingMint> {
            self.0.mint.clone()
        }

        async fn wait(&self, _pending: &PendingMint) -> Result<TransactionReceipt> {
            self.0.receipt.clone()
        }

        fn on_minted(&self, handler: Box<dyn Fn(MintedEvent)>) -> Result<()> {
            self.0.subscriptions.set(self.0.subscriptions.get() + 1);
            self.0.handlers.borrow_mut().push(handler);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        alerts: RefCell<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn alert(&self, message: &str) {
            self.alerts.borrow_mut().push(message.to_string());
        }
    }

    type TestController = MintController<MockWallet, RecordingNotifier>;

    fn controller(chain: Option<MockChain>) -> (TestController, Option<Rc<MockChain>>) {
        let chain = chain.map(Rc::new);
        let abi = ContractAbi::from_json(CONTRACT_ABI_JSON).unwrap();
        let controller = MintController::new(
            chain.clone().map(MockWallet),
            RecordingNotifier::default(),
            AppConfig::default(),
            abi,
        );
        (controller, chain)
    }

    fn alerts(controller: &TestController) -> Vec<String> {
        controller.notifier().alerts.borrow().clone()
    }

    #[test]
    fn actions_without_wallet_alert_once_and_do_nothing() {
        let (controller, _) = controller(None);
        let actions = RefCell::new(vec![]);

        block_on(controller.connect(|a| actions.borrow_mut().push(a)));
        assert_eq!(alerts(&controller), vec![NO_WALLET_ALERT]);

        block_on(controller.mint(|a| actions.borrow_mut().push(a)));
        assert_eq!(alerts(&controller).len(), 2);

        block_on(controller.refresh_total_minted(|a| actions.borrow_mut().push(a)));
        assert_eq!(alerts(&controller).len(), 3);

        controller.subscribe_to_mints();
        assert_eq!(alerts(&controller).len(), 4);

        assert!(actions.borrow().is_empty());
    }

    #[test]
    fn bootstrap_without_wallet_resolves_loading() {
        let (controller, _) = controller(None);
        let actions = RefCell::new(vec![]);
        block_on(controller.bootstrap(|a| actions.borrow_mut().push(a)));
        assert_eq!(alerts(&controller), vec![NO_WALLET_ALERT]);
        assert_eq!(*actions.borrow(), vec![Action::ChainIdLoaded(None)]);
    }

    #[test]
    fn bootstrap_with_no_accounts_stays_disconnected() {
        let (controller, chain) = controller(Some(MockChain::default()));
        let mut state = MintState::default();
        let actions = RefCell::new(vec![]);
        block_on(controller.bootstrap(|a| actions.borrow_mut().push(a)));
        for action in actions.into_inner() {
            state.apply(action);
        }

        assert_eq!(state.account, None);
        assert_eq!(chain.unwrap().subscriptions.get(), 0);
        assert_eq!(state.chain_id.as_deref(), Some("0x4"));
        assert_eq!(state.total_minted.as_deref(), Some("3"));
        assert!(!state.loading_chain);
        assert!(alerts(&controller).is_empty());
    }

    #[test]
    fn bootstrap_restores_authorized_account() {
        let (controller, chain) = controller(Some(MockChain {
            accounts: Ok(vec!["0xABC".to_string()]),
            ..Default::default()
        }));
        let mut state = MintState::default();
        let actions = RefCell::new(vec![]);
        block_on(controller.bootstrap(|a| actions.borrow_mut().push(a)));
        for action in actions.into_inner() {
            state.apply(action);
        }

        assert_eq!(state.account.as_deref(), Some("0xABC"));
        assert_eq!(chain.unwrap().subscriptions.get(), 1);
    }

    #[test]
    fn bootstrap_tolerates_failures() {
        let (controller, _) = controller(Some(MockChain {
            accounts: Err(WalletError::Js("boom".into())),
            chain_id: Err(WalletError::Rpc {
                code: -32603,
                message: "internal".into(),
            }),
            total: Err(WalletError::Decode("short".into())),
            ..Default::default()
        }));
        let actions = RefCell::new(vec![]);
        block_on(controller.bootstrap(|a| actions.borrow_mut().push(a)));
        assert_eq!(*actions.borrow(), vec![Action::ChainIdLoaded(None)]);
        assert!(alerts(&controller).is_empty());
    }

    #[test]
    fn connect_adopts_first_account_and_subscribes_once() {
        let (controller, chain) = controller(Some(MockChain {
            accounts: Ok(vec!["0xABC".to_string()]),
            requested: Ok(vec!["0xABC".to_string(), "0x123".to_string()]),
            ..Default::default()
        }));
        let actions = RefCell::new(vec![]);
        block_on(controller.bootstrap(|a| actions.borrow_mut().push(a)));
        block_on(controller.connect(|a| actions.borrow_mut().push(a)));

        assert!(actions
            .borrow()
            .ends_with(&[Action::AccountConnected("0xABC".to_string())]));
        assert_eq!(chain.unwrap().subscriptions.get(), 1);
    }

    #[test]
    fn connect_with_no_accounts_alerts() {
        let (controller, chain) = controller(Some(MockChain::default()));
        let actions = RefCell::new(vec![]);
        block_on(controller.connect(|a| actions.borrow_mut().push(a)));
        assert_eq!(alerts(&controller), vec![NO_ACCOUNTS_ALERT]);
        assert!(actions.borrow().is_empty());
        assert_eq!(chain.unwrap().subscriptions.get(), 0);
    }

    #[test]
    fn connect_rejection_is_only_logged() {
        let (controller, _) = controller(Some(MockChain {
            requested: Err(WalletError::Rpc {
                code: 4001,
                message: "User rejected the request.".into(),
            }),
            ..Default::default()
        }));
        let actions = RefCell::new(vec![]);
        block_on(controller.connect(|a| actions.borrow_mut().push(a)));
        assert!(alerts(&controller).is_empty());
        assert!(actions.borrow().is_empty());
    }

    fn mint_flags(chain: MockChain) -> Vec<bool> {
        let (controller, _) = controller(Some(chain));
        let state = RefCell::new(MintState {
            total_minted: Some("3".to_string()),
            ..Default::default()
        });
        let flags = RefCell::new(vec![state.borrow().minting]);
        block_on(controller.mint(|a| {
            state.borrow_mut().apply(a);
            flags.borrow_mut().push(state.borrow().minting);
        }));
        assert_eq!(state.borrow().total_minted.as_deref(), Some("3"));
        flags.into_inner()
    }

    #[test]
    fn mint_flag_round_trips_on_success() {
        assert_eq!(mint_flags(MockChain::default()), vec![false, true, false]);
    }

    #[test]
    fn mint_flag_round_trips_on_rejection() {
        let chain = MockChain {
            mint: Err(WalletError::Rpc {
                code: 4001,
                message: "User denied transaction signature.".into(),
            }),
            ..Default::default()
        };
        assert_eq!(mint_flags(chain), vec![false, true, false]);
    }

    #[test]
    fn mint_flag_round_trips_on_revert() {
        let chain = MockChain {
            receipt: Err(WalletError::Reverted(B256::repeat_byte(0xaa))),
            ..Default::default()
        };
        assert_eq!(mint_flags(chain), vec![false, true, false]);
    }

    #[test]
    fn mint_event_alerts_with_token_url() {
        let (controller, chain) = controller(Some(MockChain::default()));
        controller.subscribe_to_mints();
        controller.subscribe_to_mints();
        let chain = chain.unwrap();
        assert_eq!(chain.subscriptions.get(), 1);

        let event = MintedEvent {
            from: address!("0000000000000000000000000000000000000def"),
            token_id: U256::from(7),
        };
        for handler in chain.handlers.borrow().iter() {
            handler(event.clone());
        }

        let alerts = alerts(&controller);
        assert_eq!(alerts.len(), 1);
        let contract = controller.config().contract_address.to_string();
        assert!(alerts[0].contains(&format!("{contract}/7")));
        assert!(alerts[0].contains("/7"));
    }
}
