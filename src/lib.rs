//! Flip Dash - a gravity-flipping endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, spawning, collisions, game state)
//! - `audio`: Sound effect descriptions and the audio backend seam
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod sim;
pub mod tuning;

pub use audio::{AudioManager, AudioSink, SoundEffect};
pub use tuning::{Tuning, TuningError};

/// World geometry constants (pixels, frames)
pub mod consts {
    /// Simulation runs once per rendered frame at this rate
    pub const FRAME_RATE: u32 = 60;

    /// Visible world dimensions
    pub const GAME_WIDTH: f32 = 800.0;
    pub const GAME_HEIGHT: f32 = 450.0;

    /// Baseline ground surface (y grows downward)
    pub const BASE_GROUND_Y: f32 = 380.0;
    /// Flat ceiling used while gravity is inverted
    pub const CEILING_Y: f32 = 70.0;

    /// Player body - x never changes, the world scrolls instead
    pub const PLAYER_X: f32 = 100.0;
    pub const PLAYER_SIZE: f32 = 30.0;

    /// Cosmetic spin while airborne (degrees per frame)
    pub const TUMBLE_RATE: f32 = 5.0;

    /// Hitbox shrink applied to both player and hazards on each side
    pub const FAIRNESS_MARGIN: f32 = 5.0;

    /// Ground height reported where no floor segment exists
    pub const PIT_Y: f32 = GAME_HEIGHT + 100.0;

    /// Hazards, items and portals enter here
    pub const SPAWN_X: f32 = GAME_WIDTH + 50.0;

    /// Background moves at half the world speed
    pub const BACKGROUND_PARALLAX: f32 = 0.5;
}

/// Snap an angle in degrees to the nearest multiple of 90
#[inline]
pub fn snap_to_right_angle(degrees: f32) -> f32 {
    (degrees / 90.0).round() * 90.0
}
