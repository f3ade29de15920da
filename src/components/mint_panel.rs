use yew::prelude::*;

use crate::components::wallet::WalletConnect;

pub struct MintPanel;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub account: Option<String>,
    pub total_minted: String,
    pub collection_size: u64,
    pub minting: bool,
    pub on_connect: Callback<()>,
    pub on_mint: Callback<()>,
}

impl Component for MintPanel {
    type Message = ();
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let onclick = props.on_mint.reform(|_: MouseEvent| ());

        html! {
            <div class="header-container">
                <p class="header gradient-text">{"My NFT Collection"}</p>
                <p class="sub-text">
                    {"Each unique. Each beautiful. Discover your NFT today."}
                </p>
                <p class="sub-text">
                    {format!("{}/{} minted so far.", props.total_minted, props.collection_size)}
                </p>

                <WalletConnect
                    account={props.account.clone()}
                    on_connect={props.on_connect.clone()}
                />
                if props.account.is_some() {
                    <button
                        class="cta-button connect-wallet-button"
                        {onclick}
                        disabled={props.minting}
                    >
                        {"Mint NFT"}
                    </button>
                }

                if props.minting {
                    <div class="minting-status">
                        <div>{"Minting ..."}</div>
                        <div class="lds-circle"><div></div></div>
                    </div>
                }
            </div>
        }
    }
}
