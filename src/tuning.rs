//! Data-driven game balance
//!
//! Every gameplay number that shapes difficulty lives here so a run can be
//! re-balanced from a JSON file without touching the simulation. Fields missing
//! from the file keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Score thresholds that permanently unlock new hazard patterns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnlockThresholds {
    pub star: u32,
    pub triangle_2x: u32,
    pub pentagon_2x: u32,
    pub double_star: u32,
}

impl Default for UnlockThresholds {
    fn default() -> Self {
        Self {
            star: 60,
            triangle_2x: 100,
            pentagon_2x: 120,
            double_star: 150,
        }
    }
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Kinematics (per frame) ===
    /// Downward acceleration in px/frame² (sign flips while inverted)
    pub gravity: f32,
    /// Jump impulse magnitude in px/frame
    pub jump_velocity: f32,

    // === Speed schedule ===
    /// World scroll at speed level 1.0 (px/frame)
    pub base_speed: f32,
    pub initial_speed_level: f32,
    pub speed_increment: f32,
    /// Score interval between speed milestones
    pub milestone_interval: u32,

    // === Goals and unlocks ===
    pub win_score: u32,
    pub unlocks: UnlockThresholds,
    pub flip_portal_score: u32,
    pub restore_portal_score: u32,
    /// Inclusive score band where bursts and clusters replace single hazards
    pub advanced_band_start: u32,
    pub advanced_band_end: u32,
    /// Terrain stays flat until the score exceeds this
    pub varied_terrain_score: u32,

    // === Shields ===
    /// Every Nth default spawn places a shield
    pub shield_spawn_interval: u32,
    /// Coins needed to earn one pending-shield credit
    pub coins_per_shield: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            jump_velocity: 10.5,

            base_speed: 5.0,
            initial_speed_level: 1.1,
            speed_increment: 0.1,
            milestone_interval: 50,

            win_score: 500,
            unlocks: UnlockThresholds::default(),
            flip_portal_score: 80,
            restore_portal_score: 100,
            advanced_band_start: 200,
            advanced_band_end: 500,
            varied_terrain_score: 40,

            shield_spawn_interval: 50,
            coins_per_shield: 30,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON string
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |field, reason| Err(TuningError::Invalid { field, reason });

        if !(self.gravity > 0.0) {
            return invalid("gravity", "must be positive");
        }
        if !(self.jump_velocity > 0.0) {
            return invalid("jump_velocity", "must be positive");
        }
        if !(self.base_speed > 0.0) {
            return invalid("base_speed", "must be positive");
        }
        if !(self.initial_speed_level > 0.0) {
            return invalid("initial_speed_level", "must be positive");
        }
        if self.milestone_interval == 0 {
            return invalid("milestone_interval", "must be at least 1");
        }
        if self.win_score == 0 {
            return invalid("win_score", "must be at least 1");
        }
        if self.shield_spawn_interval == 0 {
            return invalid("shield_spawn_interval", "must be at least 1");
        }
        if self.coins_per_shield == 0 {
            return invalid("coins_per_shield", "must be at least 1");
        }
        if self.advanced_band_start > self.advanced_band_end {
            return invalid("advanced_band_start", "must not exceed advanced_band_end");
        }
        Ok(())
    }

    /// World scroll speed for a given speed level
    #[inline]
    pub fn speed_for_level(&self, level: f32) -> f32 {
        level * self.base_speed
    }

    /// Whether a score falls in the burst/cluster band
    #[inline]
    pub fn in_advanced_band(&self, score: u32) -> bool {
        (self.advanced_band_start..=self.advanced_band_end).contains(&score)
    }
}
