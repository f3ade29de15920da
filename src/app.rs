use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::abi::ContractAbi;
use crate::components::{mint_panel::MintPanel, network::NetworkNotice};
use crate::config::{AppConfig, CONTRACT_ABI_JSON};
use crate::controller::MintController;
use crate::provider::{BrowserNotifier, Eip1193Provider};
use crate::state::{Action, MintState, Screen};

type Controller = MintController<Eip1193Provider, BrowserNotifier>;

pub struct App {
    state: MintState,
    controller: Rc<Controller>,
}

pub enum Msg {
    Apply(Action),
    Connect,
    Mint,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let config = AppConfig::default();
        let abi = ContractAbi::from_json(CONTRACT_ABI_JSON).unwrap_or_else(|err| {
            log::error!("Contract ABI is unusable: {err}");
            ContractAbi::default()
        });
        let provider = Eip1193Provider::detect(config.poll_interval_ms);
        let controller = Rc::new(MintController::new(provider, BrowserNotifier, config, abi));

        {
            let controller = controller.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                controller
                    .bootstrap(|action| link.send_message(Msg::Apply(action)))
                    .await;
            });
        }

        Self {
            state: MintState::default(),
            controller,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Apply(action) => self.state.apply(action),
            Msg::Connect => {
                let controller = self.controller.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    controller
                        .connect(|action| link.send_message(Msg::Apply(action)))
                        .await;
                });
                false
            }
            Msg::Mint => {
                if !self.state.is_connected() || self.state.minting {
                    return false;
                }
                let controller = self.controller.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    let dispatch = |action: Action| link.send_message(Msg::Apply(action));
                    controller.mint(dispatch).await;
                    controller.refresh_total_minted(dispatch).await;
                });
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let config = self.controller.config();
        let screen = self.state.screen(config.required_chain_id);

        html! {
            <div class="App">
                <div class="container">
                    if screen == Screen::Mint {
                        <MintPanel
                            account={self.state.account.clone()}
                            total_minted={self.state.total_minted_label().to_string()}
                            collection_size={config.collection_size}
                            minting={self.state.minting}
                            on_connect={ctx.link().callback(|_| Msg::Connect)}
                            on_mint={ctx.link().callback(|_| Msg::Mint)}
                        />
                    } else {
                        <NetworkNotice
                            screen={screen.clone()}
                            network_name={config.required_network_name.clone()}
                        />
                    }
                    <div class="footer-container">
                        <a
                            class="footer-text"
                            href={config.collection_url.clone()}
                            target="_blank"
                            rel="noreferrer"
                        >
                            {"View collection on opensea"}
                        </a>
                    </div>
                </div>
            </div>
        }
    }
}
