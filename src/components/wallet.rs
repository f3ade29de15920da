use yew::prelude::*;

use crate::utils::format_address;

pub struct WalletConnect;

fn address_line(account: &str) -> String {
    format!("Address: {}", format_address(account))
}

#[derive(Properties, PartialEq)]
pub struct Props {
    pub account: Option<String>,
    pub on_connect: Callback<()>,
}

impl Component for WalletConnect {
    type Message = ();
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();

        html! {
            <div class="wallet-section">
                if let Some(account) = &props.account {
                    <div class="connected-status">
                        {"Wallet Connected"}
                        <div class="wallet-address">
                            {address_line(account)}
                        </div>
                    </div>
                } else {
                    <button
                        class="cta-button connect-wallet-button"
                        onclick={props.on_connect.reform(|_: MouseEvent| ())}
                    >
                        {"Connect to Wallet"}
                    </button>
                }
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connected_account_is_shortened() {
        assert_eq!(
            address_line("0x8EEB251EdE1E98C9d99Bc32E2F27F5A635347eA3"),
            "Address: 0x8EEB...7eA3"
        );
        assert_eq!(address_line("0xABC"), "Address: 0xABC");
    }
}
