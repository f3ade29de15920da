use yew::prelude::*;

use crate::state::Screen;

/// Header shown instead of the mint panel while the network is not usable.
#[derive(Properties, PartialEq)]
pub struct Props {
    pub screen: Screen,
    pub network_name: String,
}

#[function_component(NetworkNotice)]
pub fn network_notice(props: &Props) -> Html {
    match &props.screen {
        Screen::Loading => html! {
            <div class="header-container">
                <p class="header gradient-text">{"Figuring out which network we're on ..."}</p>
            </div>
        },
        Screen::WrongNetwork(_) | Screen::NetworkUnknown => {
            let detail = match &props.screen {
                Screen::WrongNetwork(chain_id) => format!(
                    "Your wallet is on chain {}. Switch to the {} network in metamask, and then try reloading this page.",
                    chain_id, props.network_name
                ),
                _ => format!(
                    "We couldn't read a network from your wallet. Install metamask, select the {} network, and then try reloading this page.",
                    props.network_name
                ),
            };
            html! {
                <div class="header-container">
                    <p class="header gradient-text">{"Uh oh ... it looks like"}</p>
                    <p class="header gradient-text">{"you're on the wrong network."}</p>
                    <p class="sub-text">{detail}</p>
                </div>
            }
        }
        Screen::Mint => Html::default(),
    }
}
