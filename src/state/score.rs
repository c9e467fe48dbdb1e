// Score owned by the connected wallet address.
use crate::storage::ScoreStore;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScoreState {
    pub value: u64,
    /// Address whose score is shown; `None` while no wallet is connected.
    pub address: Option<String>,
    /// Set once the stored score for `address` has been read. Nothing is
    /// written for an address before that, so the stored value is never
    /// overwritten with the pre-load zero.
    pub loaded: bool,
}

impl ScoreState {
    pub fn increment(&mut self, delta: u64) {
        self.value = self.value.saturating_add(delta);
    }

    /// Switches to another wallet (or none). The in-memory value is kept until
    /// the stored one arrives.
    pub fn switch_address(&mut self, address: Option<String>) -> bool {
        if self.address == address {
            return false;
        }
        self.address = address;
        self.loaded = false;
        true
    }

    /// Applies a finished load. Results for an address that is no longer
    /// connected are dropped, and so is any result after the first one: a
    /// reconnect can leave two loads in flight, and the later one must not
    /// overwrite taps made since the first arrived.
    pub fn apply_loaded(&mut self, address: &str, value: u64) -> bool {
        if self.loaded || self.address.as_deref() != Some(address) {
            return false;
        }
        self.value = value;
        self.loaded = true;
        true
    }

    /// What should be persisted right now, if anything.
    pub fn persist_target(&self) -> Option<(String, u64)> {
        match &self.address {
            Some(addr) if self.loaded => Some((addr.clone(), self.value)),
            _ => None,
        }
    }
}

pub async fn load(store: ScoreStore, address: String) -> u64 {
    store.load(&address).await
}

pub fn save(store: &ScoreStore, address: &str, value: u64) -> impl Future<Output = ()> + 'static {
    store.save(address, value)
}
