pub mod telegram;
pub mod ton_connect;

pub use telegram::{CloudScoreBackend, Notification};
pub use ton_connect::{BUTTON_ROOT_ID, TonConnectSession};
