//! Game state and the reducer that drives the UI.
//! Every transition happens in one `reduce` call, so a tap never interleaves
//! with a timer or a payment result.

use std::rc::Rc;

use yew::Reducible;

use crate::config::GameConfig;
use crate::state::{AttemptId, Booster, FloatingTexts, ScoreState};

#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub config: Rc<GameConfig>,
    pub score: ScoreState,
    pub booster: Booster,
    pub floating: FloatingTexts,
    /// Last clock reading seen by the reducer; drives countdown rendering.
    pub now: u64,
}

pub enum GameAction {
    WalletChanged(Option<String>),
    ScoreLoaded { address: String, score: u64 },
    Tap { now: u64, x: f64, y: f64 },
    BoosterRequested { attempt: AttemptId, now: u64 },
    /// `x`/`y` place the bonus label.
    BoosterConfirmed { attempt: AttemptId, now: u64, x: f64, y: f64 },
    BoosterFailed { attempt: AttemptId },
    BoosterExpired { attempt: AttemptId, now: u64 },
    CooldownFinished { attempt: AttemptId, now: u64 },
    FloatingExpired { id: u64 },
    Tick { now: u64 },
}

impl GameState {
    pub fn new(config: Rc<GameConfig>) -> Self {
        Self {
            config,
            score: ScoreState::default(),
            booster: Booster::default(),
            floating: FloatingTexts::default(),
            now: 0,
        }
    }

    pub fn wallet_connected(&self) -> bool {
        self.score.address.is_some()
    }

    fn observe(&mut self, now: u64) {
        self.now = self.now.max(now);
    }
}

impl Reducible for GameState {
    type Action = GameAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use GameAction::*;
        let mut new = (*self).clone();
        let changed = match action {
            WalletChanged(address) => new.score.switch_address(address),
            ScoreLoaded { address, score } => new.score.apply_loaded(&address, score),
            Tap { now, x, y } => {
                new.observe(now);
                let award = new.booster.points_per_tap(now, &new.config);
                new.score.increment(award);
                new.floating.push(format!("+{}", award), x, y, now);
                true
            }
            BoosterRequested { attempt, now } => {
                new.observe(now);
                new.booster.begin(attempt, now).is_ok()
            }
            BoosterConfirmed { attempt, now, x, y } => {
                new.observe(now);
                let cfg = new.config.clone();
                if new.booster.confirm(attempt, now, &cfg) {
                    new.score.increment(cfg.activation_bonus);
                    new.floating
                        .push(format!("+{} Boost!", cfg.activation_bonus), x, y, now);
                    true
                } else {
                    false
                }
            }
            BoosterFailed { attempt } => new.booster.fail(attempt),
            BoosterExpired { attempt, now } => {
                new.observe(now);
                new.booster.expire(attempt, now)
            }
            CooldownFinished { attempt, now } => {
                new.observe(now);
                new.booster.finish_cooldown(attempt, now)
            }
            FloatingExpired { id } => {
                let before = new.floating.items.len();
                new.floating.remove(id);
                before != new.floating.items.len()
            }
            Tick { now } => {
                new.observe(now);
                new.booster.settle(now);
                new.floating.prune(now, new.config.floating_text_ms);
                true
            }
        };
        if !changed {
            return self;
        }
        Rc::new(new)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastVariant {
    Default,
    Destructive,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Toasts {
    pub items: Vec<Toast>,
    next_id: u64,
}

pub enum ToastAction {
    Show {
        title: String,
        description: String,
        variant: ToastVariant,
    },
    Dismiss(u64),
}

// Only the newest few stay on screen.
const MAX_TOASTS: usize = 3;

impl Reducible for Toasts {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut new = (*self).clone();
        match action {
            ToastAction::Show {
                title,
                description,
                variant,
            } => {
                new.next_id += 1;
                new.items.push(Toast {
                    id: new.next_id,
                    title,
                    description,
                    variant,
                });
                if new.items.len() > MAX_TOASTS {
                    let excess = new.items.len() - MAX_TOASTS;
                    new.items.drain(..excess);
                }
            }
            ToastAction::Dismiss(id) => {
                if !new.items.iter().any(|t| t.id == id) {
                    return self;
                }
                new.items.retain(|t| t.id != id);
            }
        }
        Rc::new(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::booster::BoosterPhase;

    fn fresh() -> Rc<GameState> {
        Rc::new(GameState::new(Rc::new(GameConfig::default())))
    }

    fn tap(s: Rc<GameState>, now: u64) -> Rc<GameState> {
        s.reduce(GameAction::Tap { now, x: 0.0, y: 0.0 })
    }

    fn connected(address: &str, score: u64) -> Rc<GameState> {
        fresh()
            .reduce(GameAction::WalletChanged(Some(address.to_string())))
            .reduce(GameAction::ScoreLoaded {
                address: address.to_string(),
                score,
            })
    }

    #[test]
    fn plain_taps_add_base_points() {
        let mut s = connected("a", 5);
        for i in 0..25 {
            s = tap(s, i * 100);
        }
        assert_eq!(s.score.value, 30);
        assert_eq!(s.floating.items.len(), 25);
        assert_eq!(s.floating.items[0].text, "+1");
    }

    #[test]
    fn documented_scenario() {
        let s = connected("a", 0);
        let s = tap(s, 0);
        assert_eq!(s.score.value, 1);

        let s = s.reduce(GameAction::BoosterRequested { attempt: 1, now: 0 });
        let s = s.reduce(GameAction::BoosterConfirmed {
            attempt: 1,
            now: 0,
            x: 0.0,
            y: 0.0,
        });
        assert_eq!(s.score.value, 11);
        assert_eq!(s.floating.items.last().unwrap().text, "+10 Boost!");

        let s = tap(s, 10_000);
        assert_eq!(s.score.value, 111);

        let s = s.reduce(GameAction::BoosterExpired {
            attempt: 1,
            now: 60_000,
        });
        let s = tap(s, 61_000);
        assert_eq!(s.score.value, 112);

        let before = s.clone();
        let s = s.reduce(GameAction::BoosterRequested {
            attempt: 2,
            now: 65_000,
        });
        assert!(Rc::ptr_eq(&before, &s));
        assert!(matches!(
            s.booster.phase,
            BoosterPhase::Cooldown {
                cooldown_end_time: 120_000,
                ..
            }
        ));
    }

    #[test]
    fn late_confirmation_changes_nothing() {
        let s = connected("a", 0)
            .reduce(GameAction::BoosterRequested { attempt: 1, now: 0 })
            .reduce(GameAction::BoosterFailed { attempt: 1 });
        let before = s.clone();
        let s = s.reduce(GameAction::BoosterConfirmed {
            attempt: 1,
            now: 95_000,
            x: 0.0,
            y: 0.0,
        });
        assert!(Rc::ptr_eq(&before, &s));
        assert_eq!(s.score.value, 0);
        let s = tap(s, 96_000);
        assert_eq!(s.score.value, 1);
    }

    #[test]
    fn tick_settles_overdue_booster() {
        let s = connected("a", 0)
            .reduce(GameAction::BoosterRequested { attempt: 1, now: 0 })
            .reduce(GameAction::BoosterConfirmed {
                attempt: 1,
                now: 0,
                x: 0.0,
                y: 0.0,
            })
            .reduce(GameAction::Tick { now: 130_000 });
        assert_eq!(s.booster.phase, BoosterPhase::Idle);
        assert_eq!(s.now, 130_000);
    }

    #[test]
    fn reconnect_keeps_taps_over_a_second_load() {
        let s = fresh()
            .reduce(GameAction::WalletChanged(Some("a".to_string())))
            .reduce(GameAction::WalletChanged(None))
            .reduce(GameAction::WalletChanged(Some("a".to_string())))
            .reduce(GameAction::ScoreLoaded {
                address: "a".to_string(),
                score: 5,
            });
        let s = tap(tap(s, 0), 100);
        let before = s.clone();
        let s = s.reduce(GameAction::ScoreLoaded {
            address: "a".to_string(),
            score: 5,
        });
        assert!(Rc::ptr_eq(&before, &s));
        assert_eq!(s.score.value, 7);
    }

    #[test]
    fn wallet_switch_waits_for_load() {
        let s = connected("a", 7)
            .reduce(GameAction::WalletChanged(Some("b".to_string())));
        assert_eq!(s.score.persist_target(), None);
        let s = s.reduce(GameAction::ScoreLoaded {
            address: "a".to_string(),
            score: 1,
        });
        assert_eq!(s.score.value, 7);
        let s = s.reduce(GameAction::ScoreLoaded {
            address: "b".to_string(),
            score: 3,
        });
        assert_eq!(s.score.persist_target(), Some(("b".to_string(), 3)));
    }

    #[test]
    fn toasts_keep_only_the_newest() {
        let mut t = Rc::new(Toasts::default());
        for i in 0..5 {
            t = t.reduce(ToastAction::Show {
                title: format!("t{}", i),
                description: String::new(),
                variant: ToastVariant::Default,
            });
        }
        assert_eq!(t.items.len(), MAX_TOASTS);
        assert_eq!(t.items[0].title, "t2");
        let t = t.reduce(ToastAction::Dismiss(4));
        assert_eq!(t.items.len(), 2);
        assert!(Rc::ptr_eq(&t, &t.clone().reduce(ToastAction::Dismiss(4))));
    }
}
