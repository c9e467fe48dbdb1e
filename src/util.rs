// Small helpers shared by the model and the components.

/// Milliseconds since the epoch, from the browser clock.
pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// Longest delay a browser timer honours; larger values wrap and fire at once.
pub const MAX_TIMER_MS: u64 = i32::MAX as u64;

/// Delay for a gloo timer, clamped to [`MAX_TIMER_MS`].
pub fn timer_delay(ms: u64) -> u32 {
    ms.min(MAX_TIMER_MS) as u32
}

/// Whole seconds left until `end`, rounded up (a countdown never shows 0s while running).
pub fn remaining_secs(end_ms: u64, now_ms: u64) -> u64 {
    end_ms.saturating_sub(now_ms).div_ceil(1000)
}

/// Human label for a duration: "45s", "1 min", "2 min 30s".
pub fn format_duration(ms: u64) -> String {
    let secs = ms / 1000;
    let m = secs / 60;
    let s = secs % 60;
    match (m, s) {
        (0, s) => format!("{}s", s),
        (m, 0) => format!("{} min", m),
        (m, s) => format!("{} min {}s", m, s),
    }
}

/// "0:8a1f…c3d2" style shortening used in the wallet card.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(target_arch = "wasm32")]
pub fn clog(msg: &str) {
    gloo::console::log!(msg);
}

#[cfg(target_arch = "wasm32")]
pub fn cwarn(msg: &str) {
    gloo::console::warn!(msg);
}

#[cfg(target_arch = "wasm32")]
pub fn cerror(msg: &str) {
    gloo::console::error!(msg);
}

// Native builds only run the unit tests; there is no console to forward to.
#[cfg(not(target_arch = "wasm32"))]
pub fn clog(msg: &str) {
    eprintln!("[log] {}", msg);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn cwarn(msg: &str) {
    eprintln!("[warn] {}", msg);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn cerror(msg: &str) {
    eprintln!("[error] {}", msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_secs_rounds_up() {
        assert_eq!(remaining_secs(60_000, 0), 60);
        assert_eq!(remaining_secs(60_000, 59_001), 1);
        assert_eq!(remaining_secs(60_000, 60_000), 0);
        assert_eq!(remaining_secs(60_000, 70_000), 0);
    }

    #[test]
    fn timer_delays_stay_positive_as_i32() {
        assert_eq!(timer_delay(60_000), 60_000);
        assert_eq!(timer_delay(MAX_TIMER_MS + 1), i32::MAX as u32);
        assert!((timer_delay(u64::MAX) as i32) > 0);
    }

    #[test]
    fn durations_read_naturally() {
        assert_eq!(format_duration(60_000), "1 min");
        assert_eq!(format_duration(45_000), "45s");
        assert_eq!(format_duration(150_000), "2 min 30s");
    }

    #[test]
    fn long_addresses_are_shortened() {
        let raw = "0:8a1f00000000000000000000000000000000000000000000000000000000c3d2";
        assert_eq!(short_address(raw), "0:8a1f...c3d2");
        assert_eq!(short_address("EQshort"), "EQshort");
    }
}
