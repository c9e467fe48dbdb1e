// Booster lifecycle: Idle -> Pending -> Active -> Cooldown -> Idle.
use crate::config::GameConfig;

/// Identifies one activation attempt; timers and payment results carry it so
/// leftovers from an earlier attempt can be told apart and ignored.
pub type AttemptId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BoosterPhase {
    #[default]
    Idle,
    /// Payment request is with the wallet.
    Pending { attempt: AttemptId },
    Active {
        attempt: AttemptId,
        end_time: u64,
        cooldown_end_time: u64,
    },
    Cooldown {
        attempt: AttemptId,
        cooldown_end_time: u64,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivationRejected {
    NoWallet,
    Pending,
    AlreadyActive { remaining_ms: u64 },
    CoolingDown { remaining_ms: u64 },
}

/// What the booster control renders from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoosterView {
    pub active: bool,
    pub pending: bool,
    pub end_time: Option<u64>,
    pub cooldown_end_time: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Booster {
    pub phase: BoosterPhase,
}

impl Booster {
    pub fn check_activation(&self, now: u64, wallet_connected: bool) -> Result<(), ActivationRejected> {
        if !wallet_connected {
            return Err(ActivationRejected::NoWallet);
        }
        match self.phase {
            BoosterPhase::Idle => Ok(()),
            BoosterPhase::Pending { .. } => Err(ActivationRejected::Pending),
            BoosterPhase::Active {
                end_time,
                cooldown_end_time,
                ..
            } => {
                if now < end_time {
                    Err(ActivationRejected::AlreadyActive {
                        remaining_ms: end_time - now,
                    })
                } else if now < cooldown_end_time {
                    Err(ActivationRejected::CoolingDown {
                        remaining_ms: cooldown_end_time - now,
                    })
                } else {
                    Ok(())
                }
            }
            BoosterPhase::Cooldown {
                cooldown_end_time, ..
            } => {
                if now < cooldown_end_time {
                    Err(ActivationRejected::CoolingDown {
                        remaining_ms: cooldown_end_time - now,
                    })
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Starts a payment attempt. The wallet check is the caller's job.
    pub fn begin(&mut self, attempt: AttemptId, now: u64) -> Result<(), ActivationRejected> {
        self.settle(now);
        self.check_activation(now, true)?;
        self.phase = BoosterPhase::Pending { attempt };
        Ok(())
    }

    /// Payment went through. Returns false when the attempt is no longer the
    /// pending one (timed out, superseded), in which case nothing changes.
    pub fn confirm(&mut self, attempt: AttemptId, now: u64, cfg: &GameConfig) -> bool {
        match self.phase {
            BoosterPhase::Pending { attempt: pending } if pending == attempt => {
                let end_time = now.saturating_add(cfg.active_duration_ms);
                self.phase = BoosterPhase::Active {
                    attempt,
                    end_time,
                    cooldown_end_time: end_time.saturating_add(cfg.cooldown_duration_ms),
                };
                true
            }
            _ => false,
        }
    }

    pub fn fail(&mut self, attempt: AttemptId) -> bool {
        match self.phase {
            BoosterPhase::Pending { attempt: pending } if pending == attempt => {
                self.phase = BoosterPhase::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn expire(&mut self, attempt: AttemptId, now: u64) -> bool {
        match self.phase {
            BoosterPhase::Active {
                attempt: active,
                end_time,
                cooldown_end_time,
            } if active == attempt && now >= end_time => {
                self.phase = BoosterPhase::Cooldown {
                    attempt,
                    cooldown_end_time,
                };
                true
            }
            _ => false,
        }
    }

    pub fn finish_cooldown(&mut self, attempt: AttemptId, now: u64) -> bool {
        match self.phase {
            BoosterPhase::Cooldown {
                attempt: cooling,
                cooldown_end_time,
            } if cooling == attempt && now >= cooldown_end_time => {
                self.phase = BoosterPhase::Idle;
                true
            }
            _ => false,
        }
    }

    /// Applies whatever time-driven transitions are overdue.
    pub fn settle(&mut self, now: u64) {
        if let BoosterPhase::Active { attempt, .. } = self.phase {
            self.expire(attempt, now);
        }
        if let BoosterPhase::Cooldown { attempt, .. } = self.phase {
            self.finish_cooldown(attempt, now);
        }
    }

    pub fn is_active(&self, now: u64) -> bool {
        matches!(self.phase, BoosterPhase::Active { end_time, .. } if now < end_time)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, BoosterPhase::Pending { .. })
    }

    pub fn points_per_tap(&self, now: u64, cfg: &GameConfig) -> u64 {
        if self.is_active(now) {
            cfg.boosted_points()
        } else {
            cfg.base_points
        }
    }

    pub fn view(&self, now: u64) -> BoosterView {
        let (end_time, cooldown_end_time) = match self.phase {
            BoosterPhase::Idle | BoosterPhase::Pending { .. } => (None, None),
            BoosterPhase::Active {
                end_time,
                cooldown_end_time,
                ..
            } => (Some(end_time), Some(cooldown_end_time)),
            BoosterPhase::Cooldown {
                cooldown_end_time, ..
            } => (None, Some(cooldown_end_time)),
        };
        BoosterView {
            active: end_time.is_some_and(|end| end > now),
            pending: self.is_pending(),
            end_time,
            cooldown_end_time,
        }
    }
}
