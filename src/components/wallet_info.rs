use yew::prelude::*;

use crate::bridge::BUTTON_ROOT_ID;
use crate::util::short_address;

#[derive(Properties, PartialEq, Clone)]
pub struct WalletInfoProps {
    pub address: Option<String>,
    /// The wallet library loaded and started.
    pub available: bool,
}

#[function_component(WalletInfo)]
pub fn wallet_info(props: &WalletInfoProps) -> Html {
    html! {
        <div style="width:100%; max-width:448px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:12px; padding:14px 18px; box-sizing:border-box; display:flex; flex-direction:column; align-items:center; gap:12px;">
            <div style="width:100%; display:flex; justify-content:space-between; align-items:center;">
                <span style="font-size:16px; font-weight:600;">{"TON Wallet"}</span>
                <span style="font-size:20px; color:#58a6ff;">{"💎"}</span>
            </div>
            // the wallet library renders its connect button in here
            <div id={BUTTON_ROOT_ID}></div>
            if !props.available {
                <div style="font-size:12px; color:#f85149;">{"Wallet connection unavailable."}</div>
            }
            if let Some(addr) = &props.address {
                <div style="font-size:12px; opacity:0.7; word-break:break-all;">{ format!("Connected: {}", short_address(addr)) }</div>
            }
        </div>
    }
}
