//! Bindings to the TON Connect UI library (`TON_CONNECT_UI` global, loaded by
//! `index.html`). The library renders its own connect button into
//! [`BUTTON_ROOT_ID`] and owns the wallet session; we only read the account and
//! ask it to send transactions.

use futures::future::LocalBoxFuture;
use js_sys::{Function, Promise, Reflect};
use serde::{Deserialize, Serialize};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::payment::{PaymentError, PaymentGateway, TransactionRequest, classify_wallet_error};
use crate::storage::js_err;
use crate::util::{cerror, clog, cwarn};

pub const BUTTON_ROOT_ID: &str = "ton-connect-button";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = TON_CONNECT_UI)]
    pub type TonConnectUI;

    #[wasm_bindgen(constructor, catch, js_namespace = TON_CONNECT_UI)]
    fn new(options: &JsValue) -> Result<TonConnectUI, JsValue>;

    #[wasm_bindgen(method, getter)]
    fn wallet(this: &TonConnectUI) -> JsValue;

    #[wasm_bindgen(method, js_name = onStatusChange)]
    fn on_status_change(this: &TonConnectUI, callback: &Function) -> JsValue;

    #[wasm_bindgen(method, catch, js_name = sendTransaction)]
    fn send_transaction(this: &TonConnectUI, tx: &JsValue) -> Result<Promise, JsValue>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Options<'a> {
    manifest_url: &'a str,
    button_root_id: &'a str,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Account {
    /// Raw form, `<workchain>:<hex>`.
    pub address: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ConnectedWallet {
    pub account: Account,
}

fn decode_wallet(value: JsValue) -> Option<ConnectedWallet> {
    if value.is_null() || value.is_undefined() {
        return None;
    }
    match serde_wasm_bindgen::from_value::<ConnectedWallet>(value) {
        Ok(w) => Some(w),
        Err(e) => {
            cwarn(&format!("unexpected wallet shape: {}", e));
            None
        }
    }
}

fn library_loaded() -> bool {
    web_sys::window()
        .and_then(|w| Reflect::get(&w, &JsValue::from_str("TON_CONNECT_UI")).ok())
        .is_some_and(|v| !v.is_undefined())
}

/// Owns the TON Connect instance and the status subscription.
pub struct TonConnectSession {
    ui: TonConnectUI,
    _on_status: Closure<dyn FnMut(JsValue)>,
    unsubscribe: Option<Function>,
}

impl TonConnectSession {
    /// `on_change` receives the connected address, or `None` after a disconnect.
    /// Returns `None` when the library is missing or refuses to start; the game
    /// stays playable without a wallet.
    pub fn connect(manifest_url: &str, on_change: impl Fn(Option<String>) + 'static) -> Option<Self> {
        if !library_loaded() {
            cwarn("TON Connect UI not loaded; wallet features disabled");
            return None;
        }
        let options = serde_wasm_bindgen::to_value(&Options {
            manifest_url,
            button_root_id: BUTTON_ROOT_ID,
        })
        .ok()?;
        let ui = match TonConnectUI::new(&options) {
            Ok(ui) => ui,
            Err(e) => {
                cerror(&format!("TON Connect init failed: {}", js_err(e)));
                return None;
            }
        };
        let restored = decode_wallet(ui.wallet()).map(|w| w.account.address);
        on_change(restored);

        let on_status = Closure::<dyn FnMut(JsValue)>::new(move |wallet: JsValue| {
            let address = decode_wallet(wallet).map(|w| w.account.address);
            clog(&format!("wallet status: connected={}", address.is_some()));
            on_change(address);
        });
        let unsubscribe = ui
            .on_status_change(on_status.as_ref().unchecked_ref())
            .dyn_into::<Function>()
            .ok();
        Some(Self {
            ui,
            _on_status: on_status,
            unsubscribe,
        })
    }
}

impl Drop for TonConnectSession {
    fn drop(&mut self) {
        if let Some(f) = self.unsubscribe.take() {
            let _ = f.call0(&JsValue::NULL);
        }
    }
}

fn wallet_error(e: JsValue) -> PaymentError {
    let field = |k: &str| {
        Reflect::get(&e, &JsValue::from_str(k))
            .ok()
            .and_then(|v| v.as_string())
    };
    let name = field("name");
    let message = field("message").or_else(|| e.as_string());
    classify_wallet_error(name.as_deref(), message.as_deref())
}

impl PaymentGateway for TonConnectSession {
    fn send_transaction(
        &self,
        request: &TransactionRequest,
    ) -> LocalBoxFuture<'static, Result<(), PaymentError>> {
        let tx = match serde_wasm_bindgen::to_value(request) {
            Ok(tx) => tx,
            Err(e) => {
                let err = PaymentError::Failed(e.to_string());
                return Box::pin(async move { Err(err) });
            }
        };
        let promise = self.ui.send_transaction(&tx);
        Box::pin(async move {
            let promise = promise.map_err(wallet_error)?;
            JsFuture::from(promise).await.map_err(wallet_error)?;
            Ok(())
        })
    }
}
