//! Telegram Mini App host: `ready()`, haptics and CloudStorage.
//! Everything here probes `window.Telegram.WebApp` first; outside Telegram each
//! call is a no-op and the cloud backend is simply not offered.

use futures::future::LocalBoxFuture;
use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::storage::{ScoreBackend, StoreError, js_err, parse_score};
use crate::util::clog;

const CLOUD_KEY_PREFIX: &str = "score_";
const CLOUD_KEY_MAX: usize = 128;
const CLOUD_STORAGE_MIN_VERSION: &str = "6.9";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notification {
    Success,
    Error,
    Warning,
}

impl Notification {
    fn as_str(self) -> &'static str {
        match self {
            Notification::Success => "success",
            Notification::Error => "error",
            Notification::Warning => "warning",
        }
    }
}

fn get(target: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn method(target: &JsValue, name: &str) -> Option<Function> {
    get(target, name).and_then(|f| f.dyn_into::<Function>().ok())
}

fn web_app() -> Option<JsValue> {
    let window: JsValue = web_sys::window()?.into();
    get(&get(&window, "Telegram")?, "WebApp")
}

/// Tells the host the page is ready to be shown.
pub fn ready() {
    if let Some(app) = web_app() {
        if let Some(f) = method(&app, "ready") {
            let _ = f.call0(&app);
            clog("telegram web app ready");
        }
    }
}

fn haptic(name: &str, arg: &str) {
    let Some(haptics) = web_app().and_then(|app| get(&app, "HapticFeedback")) else {
        return;
    };
    if let Some(f) = method(&haptics, name) {
        let _ = f.call1(&haptics, &JsValue::from_str(arg));
    }
}

pub fn impact_medium() {
    haptic("impactOccurred", "medium");
}

pub fn notify(kind: Notification) {
    haptic("notificationOccurred", kind.as_str());
}

/// A Telegram user is attached to this launch.
pub fn has_user_session() -> bool {
    web_app()
        .and_then(|app| get(&app, "initDataUnsafe"))
        .and_then(|init| get(&init, "user"))
        .is_some()
}

fn supports_cloud_storage(app: &JsValue) -> bool {
    match method(app, "isVersionAtLeast") {
        Some(f) => f
            .call1(app, &JsValue::from_str(CLOUD_STORAGE_MIN_VERSION))
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
        // Old clients do not expose the check; trust the object being there.
        None => true,
    }
}

/// `score_<address>` with characters CloudStorage refuses replaced by `_`.
pub fn cloud_key(address: &str) -> String {
    let mut key = String::with_capacity(CLOUD_KEY_PREFIX.len() + address.len());
    key.push_str(CLOUD_KEY_PREFIX);
    key.extend(address.chars().map(|c| {
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            c
        } else {
            '_'
        }
    }));
    key.truncate(CLOUD_KEY_MAX);
    key
}

/// Telegram CloudStorage as a score backend.
pub struct CloudScoreBackend {
    storage: JsValue,
}

impl CloudScoreBackend {
    /// Only inside Telegram, on a client new enough, with a user session.
    pub fn detect() -> Option<Self> {
        let app = web_app()?;
        if !supports_cloud_storage(&app) || !has_user_session() {
            return None;
        }
        let storage = get(&app, "CloudStorage")?;
        Some(Self { storage })
    }

    /// Calls `CloudStorage.<name>(...args, callback(error, result))` and
    /// resolves with `result`.
    fn call(&self, name: &'static str, args: Vec<JsValue>) -> Result<Promise, StoreError> {
        let f = method(&self.storage, name).ok_or(StoreError::Unavailable("telegram cloud storage"))?;
        let storage = self.storage.clone();
        Ok(Promise::new(&mut move |resolve, reject| {
            let reject_on_throw = reject.clone();
            let callback = Closure::once_into_js(move |error: JsValue, result: JsValue| {
                if error.is_null() || error.is_undefined() {
                    let _ = resolve.call1(&JsValue::NULL, &result);
                } else {
                    let _ = reject.call1(&JsValue::NULL, &error);
                }
            });
            let call_args = js_sys::Array::new();
            for arg in &args {
                call_args.push(arg);
            }
            call_args.push(&callback);
            if let Err(e) = f.apply(&storage, &call_args) {
                let _ = reject_on_throw.call1(&JsValue::NULL, &e);
            }
        }))
    }
}

impl ScoreBackend for CloudScoreBackend {
    fn name(&self) -> &'static str {
        "telegram cloud storage"
    }

    fn load(&self, address: &str) -> LocalBoxFuture<'static, Result<Option<u64>, StoreError>> {
        let promise = self.call("getItem", vec![JsValue::from_str(&cloud_key(address))]);
        Box::pin(async move {
            let value = JsFuture::from(promise?)
                .await
                .map_err(|e| StoreError::Js(js_err(e)))?;
            // Missing keys come back as an empty string.
            Ok(value
                .as_string()
                .and_then(|raw| parse_score(&serde_json::Value::String(raw))))
        })
    }

    fn save(&self, address: &str, score: u64) -> LocalBoxFuture<'static, Result<(), StoreError>> {
        let promise = self.call(
            "setItem",
            vec![
                JsValue::from_str(&cloud_key(address)),
                JsValue::from_str(&score.to_string()),
            ],
        );
        Box::pin(async move {
            JsFuture::from(promise?)
                .await
                .map_err(|e| StoreError::Js(js_err(e)))?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_addresses_become_valid_keys() {
        assert_eq!(cloud_key("0:ab-CD_9"), "score_0_ab-CD_9");
        assert_eq!(
            cloud_key("EQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAM9c"),
            "score_EQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAM9c"
        );
    }

    #[test]
    fn keys_are_capped() {
        let long = "a".repeat(300);
        assert_eq!(cloud_key(&long).len(), CLOUD_KEY_MAX);
    }
}
