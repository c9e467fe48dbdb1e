//! Score persistence across a ranked list of key-value backends.
//!
//! Reads ask every backend. A value held by an authoritative backend (the
//! local store) wins; otherwise the first value in rank order is used. Writes
//! go to every backend; synchronous backends complete inside the call, the
//! rest are awaited by the returned future and only logged on error.

use std::collections::BTreeMap;
use std::rc::Rc;

use futures::future::{self, LocalBoxFuture};
use serde_json::Value;
use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::util::cwarn;

/// Key of the JSON object (address -> score) in `localStorage`.
pub const LOCAL_SCORES_KEY: &str = "tapton_scores";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("{0} is not available")]
    Unavailable(&'static str),
    #[error("javascript error: {0}")]
    Js(String),
    #[error("could not encode scores: {0}")]
    Encode(String),
}

pub(crate) fn js_err(value: JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(&value, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

pub trait ScoreBackend {
    fn name(&self) -> &'static str;
    /// Whether this backend's value wins over the others on conflict. A failed
    /// write elsewhere must never roll this one back on the next load.
    fn authoritative(&self) -> bool {
        false
    }
    fn load(&self, address: &str) -> LocalBoxFuture<'static, Result<Option<u64>, StoreError>>;
    fn save(&self, address: &str, score: u64) -> LocalBoxFuture<'static, Result<(), StoreError>>;
}

/// Synchronous string key-value storage.
pub trait StringStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl StringStore for web_sys::Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        web_sys::Storage::get_item(self, key).map_err(|e| StoreError::Js(js_err(e)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        web_sys::Storage::set_item(self, key, value).map_err(|e| StoreError::Js(js_err(e)))
    }
}

/// Browser `localStorage`, if the page is allowed to use it.
pub fn browser_local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Accepts non-negative integers stored either as JSON numbers or numeric strings.
pub fn parse_score(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

/// All scores live in one JSON object under [`LOCAL_SCORES_KEY`].
pub struct LocalScoreBackend<S> {
    store: S,
}

impl<S: StringStore> LocalScoreBackend<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn read_map(&self) -> Result<BTreeMap<String, Value>, StoreError> {
        let Some(raw) = self.store.get_item(LOCAL_SCORES_KEY)? else {
            return Ok(BTreeMap::new());
        };
        match serde_json::from_str::<BTreeMap<String, Value>>(&raw) {
            Ok(map) => Ok(map),
            Err(e) => {
                cwarn(&format!("local scores unreadable, starting fresh: {}", e));
                Ok(BTreeMap::new())
            }
        }
    }

    pub fn load_now(&self, address: &str) -> Result<Option<u64>, StoreError> {
        Ok(self.read_map()?.get(address).and_then(parse_score))
    }

    pub fn save_now(&self, address: &str, score: u64) -> Result<(), StoreError> {
        let mut map = self.read_map()?;
        map.insert(address.to_string(), Value::from(score));
        let raw = serde_json::to_string(&map).map_err(|e| StoreError::Encode(e.to_string()))?;
        self.store.set_item(LOCAL_SCORES_KEY, &raw)
    }
}

impl<S: StringStore> ScoreBackend for LocalScoreBackend<S> {
    fn name(&self) -> &'static str {
        "local storage"
    }

    fn authoritative(&self) -> bool {
        true
    }

    fn load(&self, address: &str) -> LocalBoxFuture<'static, Result<Option<u64>, StoreError>> {
        Box::pin(future::ready(self.load_now(address)))
    }

    fn save(&self, address: &str, score: u64) -> LocalBoxFuture<'static, Result<(), StoreError>> {
        Box::pin(future::ready(self.save_now(address, score)))
    }
}

#[derive(Clone, Default)]
pub struct ScoreStore {
    backends: Vec<Rc<dyn ScoreBackend>>,
}

impl ScoreStore {
    /// `backends` in read priority, highest first.
    pub fn new(backends: Vec<Rc<dyn ScoreBackend>>) -> Self {
        Self { backends }
    }

    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Reads every backend. An authoritative value wins, then the first value
    /// in rank order; 0 when nobody has one.
    pub fn load(&self, address: &str) -> impl Future<Output = u64> + 'static {
        let reads: Vec<_> = self
            .backends
            .iter()
            .map(|b| {
                let (name, authoritative) = (b.name(), b.authoritative());
                let read = b.load(address);
                async move { (name, authoritative, read.await) }
            })
            .collect();
        async move {
            let mut found: Vec<(bool, u64)> = Vec::new();
            for (name, authoritative, result) in future::join_all(reads).await {
                match result {
                    Ok(Some(score)) => found.push((authoritative, score)),
                    Ok(None) => {}
                    Err(e) => cwarn(&format!("score load from {} failed: {}", name, e)),
                }
            }
            let chosen = found
                .iter()
                .find(|(authoritative, _)| *authoritative)
                .or_else(|| found.first())
                .map(|(_, score)| *score)
                .unwrap_or(0);
            if found.iter().any(|(_, score)| *score != chosen) {
                cwarn(&format!("stored scores disagree, keeping {}", chosen));
            }
            chosen
        }
    }

    /// Starts the write on every backend before returning. The future only
    /// reports failures; dropping it does not undo anything already written.
    pub fn save(&self, address: &str, score: u64) -> impl Future<Output = ()> + 'static {
        let writes: Vec<_> = self
            .backends
            .iter()
            .map(|b| {
                let name = b.name();
                let write = b.save(address, score);
                async move { (name, write.await) }
            })
            .collect();
        async move {
            for (name, result) in future::join_all(writes).await {
                if let Err(e) = result {
                    cwarn(&format!("score save to {} failed: {}", name, e));
                }
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{FakeCloud, MemoryStore};
    use super::*;
    use futures::executor::block_on;

    fn local_only(mem: &MemoryStore) -> ScoreStore {
        ScoreStore::new(vec![Rc::new(LocalScoreBackend::new(mem.clone()))])
    }

    #[test]
    fn save_then_load_with_only_local() {
        let mem = MemoryStore::default();
        let store = local_only(&mem);
        block_on(store.save("0:abc", 42));
        assert_eq!(block_on(store.load("0:abc")), 42);
        assert_eq!(block_on(store.load("0:other")), 0);
    }

    #[test]
    fn local_write_happens_before_future_is_polled() {
        let mem = MemoryStore::default();
        let store = local_only(&mem);
        let pending = store.save("0:abc", 7);
        assert_eq!(
            mem.items.borrow().get(LOCAL_SCORES_KEY).map(String::as_str),
            Some(r#"{"0:abc":7}"#)
        );
        drop(pending);
    }

    #[test]
    fn non_numeric_values_are_absent() {
        let mem = MemoryStore::default();
        mem.set_item(LOCAL_SCORES_KEY, r#"{"a":"12","b":"lots","c":-3,"d":null,"e":4.0}"#)
            .unwrap();
        let local = LocalScoreBackend::new(mem.clone());
        assert_eq!(local.load_now("a").unwrap(), Some(12));
        assert_eq!(local.load_now("b").unwrap(), None);
        assert_eq!(local.load_now("c").unwrap(), None);
        assert_eq!(local.load_now("d").unwrap(), None);
        assert_eq!(local.load_now("e").unwrap(), Some(4));
    }

    #[test]
    fn corrupt_map_is_replaced_on_write() {
        let mem = MemoryStore::default();
        mem.set_item(LOCAL_SCORES_KEY, "{oops").unwrap();
        let local = LocalScoreBackend::new(mem.clone());
        assert_eq!(local.load_now("a").unwrap(), None);
        local.save_now("a", 3).unwrap();
        assert_eq!(local.load_now("a").unwrap(), Some(3));
    }

    #[test]
    fn saving_keeps_other_addresses() {
        let mem = MemoryStore::default();
        let local = LocalScoreBackend::new(mem.clone());
        local.save_now("a", 1).unwrap();
        local.save_now("b", 2).unwrap();
        local.save_now("a", 5).unwrap();
        assert_eq!(local.load_now("a").unwrap(), Some(5));
        assert_eq!(local.load_now("b").unwrap(), Some(2));
    }

    fn cloud_and_local(mem: &MemoryStore, cloud: &Rc<FakeCloud>) -> ScoreStore {
        ScoreStore::new(vec![
            Rc::new(cloud.clone()),
            Rc::new(LocalScoreBackend::new(mem.clone())),
        ])
    }

    #[test]
    fn local_wins_then_cloud_then_zero() {
        let mem = MemoryStore::default();
        let cloud = Rc::new(FakeCloud::default());
        let store = cloud_and_local(&mem, &cloud);
        cloud.values.borrow_mut().insert("a".to_string(), 30);
        // new device: only the cloud knows the score
        assert_eq!(block_on(store.load("a")), 30);
        LocalScoreBackend::new(mem.clone()).save_now("a", 9).unwrap();
        assert_eq!(block_on(store.load("a")), 9);
        cloud.failing.set(true);
        assert_eq!(block_on(store.load("a")), 9);
        assert_eq!(block_on(store.load("nobody")), 0);
    }

    #[test]
    fn failed_cloud_write_does_not_roll_back_local_on_reload() {
        let mem = MemoryStore::default();
        let cloud = Rc::new(FakeCloud::default());
        let store = cloud_and_local(&mem, &cloud);
        block_on(store.save("a", 3));
        cloud.failing.set(true);
        block_on(store.save("a", 500));
        cloud.failing.set(false);
        assert_eq!(cloud.values.borrow().get("a"), Some(&3));
        assert_eq!(block_on(store.load("a")), 500);
    }

    #[test]
    fn cloud_failure_leaves_local_write_in_place() {
        let mem = MemoryStore::default();
        let cloud = Rc::new(FakeCloud::default());
        cloud.failing.set(true);
        let store = ScoreStore::new(vec![
            Rc::new(cloud.clone()),
            Rc::new(LocalScoreBackend::new(mem.clone())),
        ]);
        block_on(store.save("a", 11));
        assert_eq!(cloud.writes.get(), 0);
        assert_eq!(LocalScoreBackend::new(mem).load_now("a").unwrap(), Some(11));
    }

    #[test]
    fn score_parsing() {
        assert_eq!(parse_score(&Value::from(5u64)), Some(5));
        assert_eq!(parse_score(&Value::from(" 17 ")), Some(17));
        assert_eq!(parse_score(&Value::from(1.5)), None);
        assert_eq!(parse_score(&Value::Bool(true)), None);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    async fn local_storage_round_trips_a_score() {
        let storage = browser_local_storage().expect("localStorage available");
        storage.remove_item(LOCAL_SCORES_KEY).expect("clear scores");
        let store = ScoreStore::new(vec![Rc::new(LocalScoreBackend::new(storage.clone()))]);
        store.save("0:feed", 77).await;
        assert_eq!(store.load("0:feed").await, 77);
        let raw = web_sys::Storage::get_item(&storage, LOCAL_SCORES_KEY)
            .expect("read scores")
            .expect("scores written");
        assert_eq!(raw, r#"{"0:feed":77}"#);
        storage.remove_item(LOCAL_SCORES_KEY).expect("clean up");
    }
}
