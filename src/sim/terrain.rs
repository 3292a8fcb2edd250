//! Procedural ground profile
//!
//! The floor is a strip of flat segments that scroll left with the world.
//! New segments are appended on the right so the profile always reaches a
//! fixed distance past the visible edge. Height evolves according to a style
//! (flat, bumpy, stairs) that is re-rolled when its segment budget runs out.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::FloorSegment;
use crate::consts::*;

/// How far past the right edge the profile is kept generated
pub const LOOKAHEAD: f32 = 800.0;
/// Segments fully left of this are discarded
pub const DISCARD_X: f32 = -100.0;
/// Width of the flat runway present at session start
pub const INITIAL_RUNWAY: f32 = GAME_WIDTH * 2.0;

/// Deepest allowed surface (heights below this reset to baseline)
pub const MAX_DEPTH: f32 = 50.0;
/// Highest allowed surface above baseline
pub const MAX_RISE: f32 = 150.0;

/// Flat style eases back toward baseline by this much per segment
pub const FLAT_EASE_STEP: f32 = 10.0;
/// Bumpy style height jitter (±)
pub const BUMP_DELTA: f32 = 20.0;
/// Stairs style step height (±)
pub const STAIR_STEP: f32 = 40.0;

/// Height-evolution style for upcoming segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FloorStyle {
    Flat,
    Bumpy,
    Stairs,
}

impl FloorStyle {
    /// Weighted draw: flat 40%, bumpy 30%, stairs 30%
    pub fn roll<R: Rng>(rng: &mut R) -> Self {
        let roll: f32 = rng.random();
        if roll < 0.4 {
            FloorStyle::Flat
        } else if roll < 0.7 {
            FloorStyle::Bumpy
        } else {
            FloorStyle::Stairs
        }
    }

    /// How many segments a freshly drawn style lasts
    pub fn sample_duration<R: Rng>(self, rng: &mut R) -> f32 {
        match self {
            FloorStyle::Flat => rng.random_range(5.0..10.0),
            FloorStyle::Bumpy => rng.random_range(5.0..15.0),
            FloorStyle::Stairs => rng.random_range(5.0..10.0),
        }
    }

    /// Segment width range for this style
    pub fn sample_width<R: Rng>(self, rng: &mut R) -> f32 {
        match self {
            FloorStyle::Flat => rng.random_range(200.0..400.0),
            FloorStyle::Bumpy => rng.random_range(50.0..150.0),
            FloorStyle::Stairs => rng.random_range(100.0..200.0),
        }
    }
}

/// Keep a surface height inside the playable band
///
/// Too deep snaps back to baseline rather than to the limit, so a run of
/// down-steps never parks the floor at the bottom of the band.
pub fn clamp_height(y: f32) -> f32 {
    if y > BASE_GROUND_Y + MAX_DEPTH {
        BASE_GROUND_Y
    } else if y < BASE_GROUND_Y - MAX_RISE {
        BASE_GROUND_Y - MAX_RISE
    } else {
        y
    }
}

/// Terrain generator and the floor it owns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terrain {
    /// Ordered left to right
    pub segments: Vec<FloorSegment>,
    pub style: FloorStyle,
    /// Segments left in the current style
    pub style_timer: f32,
    /// Surface height of the most recent segment
    pub current_y: f32,
    /// Right edge of the generated profile
    pub last_x: f32,
}

impl Default for Terrain {
    fn default() -> Self {
        Self::new()
    }
}

impl Terrain {
    /// Start with a flat runway twice the screen width
    pub fn new() -> Self {
        Self {
            segments: vec![FloorSegment {
                x: 0.0,
                y: BASE_GROUND_Y,
                w: INITIAL_RUNWAY,
            }],
            style: FloorStyle::Flat,
            style_timer: 0.0,
            current_y: BASE_GROUND_Y,
            last_x: INITIAL_RUNWAY,
        }
    }

    /// Scroll, discard, and extend for one frame
    pub fn update<R: Rng>(&mut self, speed: f32, score: u32, varied_after: u32, rng: &mut R) {
        self.scroll(speed);
        self.extend(score, varied_after, rng);
    }

    /// Move every segment left and drop those far off-screen
    pub fn scroll(&mut self, speed: f32) {
        for segment in &mut self.segments {
            segment.x -= speed;
        }
        self.segments.retain(|s| s.right() >= DISCARD_X);
        self.last_x -= speed;
    }

    /// Append segments until the profile reaches the look-ahead margin
    pub fn extend<R: Rng>(&mut self, score: u32, varied_after: u32, rng: &mut R) {
        while self.last_x < GAME_WIDTH + LOOKAHEAD {
            self.generate_next(score, varied_after, rng);
        }
    }

    /// Append exactly one segment
    pub fn generate_next<R: Rng>(&mut self, score: u32, varied_after: u32, rng: &mut R) {
        let varied = score > varied_after;

        if varied && self.style_timer <= 0.0 {
            let style = FloorStyle::roll(rng);
            self.style_timer = style.sample_duration(rng);
            if style != self.style {
                log::debug!("Terrain style {:?} -> {:?} at score {}", self.style, style, score);
            }
            self.style = style;
        } else {
            self.style_timer -= 1.0;
        }

        if !varied {
            self.style = FloorStyle::Flat;
        }

        let mut next_y = self.current_y;
        match self.style {
            FloorStyle::Flat => {
                if next_y > BASE_GROUND_Y {
                    next_y -= FLAT_EASE_STEP;
                } else if next_y < BASE_GROUND_Y {
                    next_y += FLAT_EASE_STEP;
                }
                if (next_y - BASE_GROUND_Y).abs() < FLAT_EASE_STEP {
                    next_y = BASE_GROUND_Y;
                }
            }
            FloorStyle::Bumpy => {
                next_y += rng.random_range(-BUMP_DELTA..BUMP_DELTA);
            }
            FloorStyle::Stairs => {
                next_y += if rng.random_bool(0.5) {
                    -STAIR_STEP
                } else {
                    STAIR_STEP
                };
            }
        }
        let width = self.style.sample_width(rng);
        let next_y = clamp_height(next_y);

        self.segments.push(FloorSegment {
            x: self.last_x,
            y: next_y,
            w: width,
        });
        self.last_x += width;
        self.current_y = next_y;
    }

    /// Surface height at `x`, or `PIT_Y` where no segment covers it
    pub fn ground_y_at(&self, x: f32) -> f32 {
        self.segments
            .iter()
            .find(|s| s.covers(x))
            .map(|s| s.y)
            .unwrap_or(PIT_Y)
    }

    /// True when nothing covers `x`
    #[inline]
    pub fn is_pit(&self, x: f32) -> bool {
        self.ground_y_at(x) >= PIT_Y
    }
}
