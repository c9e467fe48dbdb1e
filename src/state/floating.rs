// Short-lived "+N" labels shown where the user tapped.

#[derive(Clone, Debug, PartialEq)]
pub struct FloatingText {
    pub id: u64,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub created_at: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FloatingTexts {
    pub items: Vec<FloatingText>,
    next_id: u64,
}

impl FloatingTexts {
    pub fn push(&mut self, text: String, x: f64, y: f64, now: u64) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.items.push(FloatingText {
            id,
            text,
            x,
            y,
            created_at: now,
        });
        id
    }

    pub fn remove(&mut self, id: u64) {
        self.items.retain(|t| t.id != id);
    }

    /// Drops texts older than `ttl_ms`, for when a removal timer was lost.
    pub fn prune(&mut self, now: u64, ttl_ms: u64) {
        self.items
            .retain(|t| now.saturating_sub(t.created_at) < ttl_ms.saturating_mul(2));
    }
}

/// Position for a tap label: a little above the pointer with some jitter.
/// `rx`/`ry` are uniform samples in [0, 1).
pub fn jittered(x: f64, y: f64, rx: f64, ry: f64) -> (f64, f64) {
    (x + rx * 40.0 - 20.0, y - 30.0 + ry * 20.0 - 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_within_one_millisecond() {
        let mut f = FloatingTexts::default();
        let a = f.push("+1".into(), 0.0, 0.0, 5);
        let b = f.push("+1".into(), 0.0, 0.0, 5);
        assert_ne!(a, b);
        f.remove(a);
        assert_eq!(f.items.len(), 1);
        assert_eq!(f.items[0].id, b);
    }

    #[test]
    fn jitter_stays_in_band() {
        assert_eq!(jittered(100.0, 100.0, 0.0, 0.0), (80.0, 60.0));
        let (x, y) = jittered(100.0, 100.0, 0.999, 0.999);
        assert!(x < 120.0 && y < 80.0);
    }

    #[test]
    fn prune_drops_only_stale_texts() {
        let mut f = FloatingTexts::default();
        f.push("+1".into(), 0.0, 0.0, 0);
        f.push("+1".into(), 0.0, 0.0, 2_500);
        f.prune(3_100, 1_500);
        assert_eq!(f.items.len(), 1);
        assert_eq!(f.items[0].created_at, 2_500);
    }
}
