pub mod app;
pub mod booster_button;
pub mod floating_texts;
pub mod score_panel;
pub mod tap_section;
pub mod toast;
pub mod wallet_info;
