//! Score, unlocks, and the speed schedule
//!
//! Unlocks are a one-way ladder keyed to the score. Speed rises by a fixed
//! increment at every milestone, except that a milestone following a fresh
//! unlock is skipped once so new hazards arrive at the old pace.

use serde::{Deserialize, Serialize};

use super::state::ObstacleKind;
use crate::tuning::Tuning;

/// Content gated behind a score threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unlock {
    Star,
    Triangle2x,
    Pentagon2x,
    DoubleStar,
}

/// Monotonic unlock flags (never revert within a session)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unlocks {
    pub star: bool,
    pub triangle_2x: bool,
    pub pentagon_2x: bool,
    pub double_star: bool,
}

impl Unlocks {
    fn flag_mut(&mut self, unlock: Unlock) -> &mut bool {
        match unlock {
            Unlock::Star => &mut self.star,
            Unlock::Triangle2x => &mut self.triangle_2x,
            Unlock::Pentagon2x => &mut self.pentagon_2x,
            Unlock::DoubleStar => &mut self.double_star,
        }
    }

    pub fn contains(&self, unlock: Unlock) -> bool {
        match unlock {
            Unlock::Star => self.star,
            Unlock::Triangle2x => self.triangle_2x,
            Unlock::Pentagon2x => self.pentagon_2x,
            Unlock::DoubleStar => self.double_star,
        }
    }

    /// Ground hazard kinds currently allowed for single spawns
    pub fn ground_kinds(&self) -> Vec<ObstacleKind> {
        let mut kinds = vec![ObstacleKind::Triangle, ObstacleKind::Pentagon];
        if self.triangle_2x {
            kinds.push(ObstacleKind::Triangle2x);
        }
        if self.pentagon_2x {
            kinds.push(ObstacleKind::Pentagon2x);
        }
        kinds
    }
}

/// What happened to the speed on a milestone
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpeedChange {
    /// New speed level
    Increased(f32),
    /// Milestone reached but a fresh unlock absorbed it
    Skipped,
}

/// Result of recording one passed hazard
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassOutcome {
    pub score: u32,
    pub unlocked: Vec<Unlock>,
    pub speed: Option<SpeedChange>,
    pub won: bool,
}

/// Progression tracker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progression {
    /// Hazards passed
    pub score: u32,
    pub coins: u32,
    pub speed_level: f32,
    /// Milestone index the speed was last evaluated at
    pub last_milestone: u32,
    pub unlocks: Unlocks,
    /// Set by an unlock, consumed by the next milestone
    pub skip_next_speed_bump: bool,
    /// Shield items owed to the player
    pub pending_shields: u32,
}

impl Progression {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            coins: 0,
            speed_level: tuning.initial_speed_level,
            last_milestone: 0,
            unlocks: Unlocks::default(),
            skip_next_speed_bump: false,
            pending_shields: 0,
        }
    }

    /// Current world scroll speed
    #[inline]
    pub fn speed(&self, tuning: &Tuning) -> f32 {
        tuning.speed_for_level(self.speed_level)
    }

    /// Count one hazard as passed and apply unlocks and speed milestones
    pub fn record_pass(&mut self, tuning: &Tuning) -> PassOutcome {
        self.score += 1;
        let score = self.score;

        let thresholds = &tuning.unlocks;
        let ladder = [
            (Unlock::Star, thresholds.star),
            (Unlock::Triangle2x, thresholds.triangle_2x),
            (Unlock::Pentagon2x, thresholds.pentagon_2x),
            (Unlock::DoubleStar, thresholds.double_star),
        ];

        let mut unlocked = Vec::new();
        for (unlock, threshold) in ladder {
            let flag = self.unlocks.flag_mut(unlock);
            if score >= threshold && !*flag {
                *flag = true;
                unlocked.push(unlock);
                log::info!("Unlocked {:?} at score {}", unlock, score);
            }
        }
        if !unlocked.is_empty() {
            self.skip_next_speed_bump = true;
        }

        let milestone = score / tuning.milestone_interval;
        let speed = if milestone > self.last_milestone {
            self.last_milestone = milestone;
            if self.skip_next_speed_bump {
                self.skip_next_speed_bump = false;
                log::info!("Speed increase skipped at score {} (new content)", score);
                Some(SpeedChange::Skipped)
            } else {
                self.speed_level += tuning.speed_increment;
                log::info!("Speed level raised to {:.1} at score {}", self.speed_level, score);
                Some(SpeedChange::Increased(self.speed_level))
            }
        } else {
            None
        };

        PassOutcome {
            score,
            unlocked,
            speed,
            won: score >= tuning.win_score,
        }
    }

    /// Count a coin; returns true when it earned a pending-shield credit
    pub fn record_coin(&mut self, tuning: &Tuning) -> bool {
        self.coins += 1;
        if self.coins.is_multiple_of(tuning.coins_per_shield) {
            self.pending_shields += 1;
            true
        } else {
            false
        }
    }

    /// Redeem one pending-shield credit if any
    pub fn take_pending_shield(&mut self) -> bool {
        if self.pending_shields > 0 {
            self.pending_shields -= 1;
            true
        } else {
            false
        }
    }
}
