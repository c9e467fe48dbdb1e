//! Game economics and timing.
//!
//! Every value has a default so the app runs without any configuration. A page
//! may override any subset through a JSON `<script id="tapton-config">` block.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::{MAX_TIMER_MS, cwarn};

pub const CONFIG_ELEMENT_ID: &str = "tapton-config";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(String),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("{0} is longer than a browser timer allows")]
    TooLong(&'static str),
    #[error("payment {0} must not be empty")]
    EmptyPayment(&'static str),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    /// Destination of the activation payment (a burn address by default).
    pub recipient: String,
    /// Amount in nanoton, as the wallet library expects it (decimal string).
    pub amount_nano: String,
    /// Optional base64 BOC payload attached to the message.
    pub payload: Option<String>,
    pub valid_for_secs: u64,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            recipient: "EQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAM9c".to_string(),
            amount_nano: "1000000".to_string(),
            payload: None,
            valid_for_secs: 300,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub base_points: u64,
    pub multiplier: u64,
    pub activation_bonus: u64,
    pub active_duration_ms: u64,
    pub cooldown_duration_ms: u64,
    pub payment_timeout_ms: u64,
    pub floating_text_ms: u64,
    pub toast_ms: u64,
    pub manifest_url: String,
    pub payment: PaymentConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            base_points: 1,
            multiplier: 100,
            activation_bonus: 10,
            active_duration_ms: 60_000,
            cooldown_duration_ms: 60_000,
            payment_timeout_ms: 90_000,
            floating_text_ms: 1_500,
            toast_ms: 4_000,
            manifest_url: "https://studio-zeta-five.vercel.app/tonconnect-manifest.json".to_string(),
            payment: PaymentConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig =
            serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_points == 0 {
            return Err(ConfigError::Zero("base_points"));
        }
        if self.multiplier == 0 {
            return Err(ConfigError::Zero("multiplier"));
        }
        let timed = [
            ("active_duration_ms", self.active_duration_ms),
            ("payment_timeout_ms", self.payment_timeout_ms),
            ("floating_text_ms", self.floating_text_ms),
            ("toast_ms", self.toast_ms),
        ];
        for (name, ms) in timed {
            if ms == 0 {
                return Err(ConfigError::Zero(name));
            }
            if ms > MAX_TIMER_MS {
                return Err(ConfigError::TooLong(name));
            }
        }
        // the cooldown timer fires at active + cooldown
        if self.active_duration_ms.saturating_add(self.cooldown_duration_ms) > MAX_TIMER_MS {
            return Err(ConfigError::TooLong("cooldown_duration_ms"));
        }
        if self.payment.recipient.trim().is_empty() {
            return Err(ConfigError::EmptyPayment("recipient"));
        }
        if self.payment.amount_nano.trim().is_empty() {
            return Err(ConfigError::EmptyPayment("amount"));
        }
        Ok(())
    }

    /// Reads the config block from the page, falling back to defaults.
    pub fn load_from_document() -> Self {
        let raw = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());
        match raw {
            Some(raw) if !raw.trim().is_empty() => match Self::from_json(&raw) {
                Ok(cfg) => cfg,
                Err(e) => {
                    cwarn(&format!("ignoring page config: {}", e));
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }

    /// Points a single tap awards while the booster runs.
    pub fn boosted_points(&self) -> u64 {
        self.base_points.saturating_mul(self.multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_other_defaults() {
        let cfg = GameConfig::from_json(r#"{"multiplier": 2, "payment": {"amount_nano": "5000"}}"#)
            .unwrap();
        assert_eq!(cfg.multiplier, 2);
        assert_eq!(cfg.base_points, 1);
        assert_eq!(cfg.payment.amount_nano, "5000");
        assert_eq!(cfg.payment.valid_for_secs, 300);
        assert_eq!(cfg.active_duration_ms, 60_000);
    }

    #[test]
    fn rejects_zero_multiplier() {
        assert_eq!(
            GameConfig::from_json(r#"{"multiplier": 0}"#),
            Err(ConfigError::Zero("multiplier"))
        );
    }

    #[test]
    fn rejects_zero_display_durations() {
        assert_eq!(
            GameConfig::from_json(r#"{"toast_ms": 0}"#),
            Err(ConfigError::Zero("toast_ms"))
        );
        assert_eq!(
            GameConfig::from_json(r#"{"floating_text_ms": 0}"#),
            Err(ConfigError::Zero("floating_text_ms"))
        );
    }

    #[test]
    fn rejects_delays_a_timer_cannot_hold() {
        assert_eq!(
            GameConfig::from_json(r#"{"payment_timeout_ms": 3000000000}"#),
            Err(ConfigError::TooLong("payment_timeout_ms"))
        );
        assert_eq!(
            GameConfig::from_json(r#"{"cooldown_duration_ms": 2147483647}"#),
            Err(ConfigError::TooLong("cooldown_duration_ms"))
        );
        assert!(GameConfig::from_json(r#"{"cooldown_duration_ms": 0}"#).is_ok());
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            GameConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = GameConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.boosted_points(), 100);
    }
}
