pub mod booster;
pub mod floating;
pub mod score;
pub mod timers;

pub use booster::{ActivationRejected, AttemptId, Booster, BoosterView};
pub use floating::{FloatingText, FloatingTexts};
pub use score::ScoreState;
pub use timers::TimerSlots;
