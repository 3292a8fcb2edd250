//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One frame per step, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio, or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod progression;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod terrain;
pub mod tick;

pub use collision::{Rect, circle_rect_overlap, rects_overlap};
pub use progression::{Progression, Unlock, Unlocks};
pub use snapshot::{PlayerPose, RenderSnapshot};
pub use spawn::{SpawnDirector, SpawnPattern};
pub use state::{
    FloorSegment, GameEvent, GamePhase, GameState, Item, ItemKind, Obstacle, ObstacleKind,
    Particle, Player, Portal, PortalKind,
};
pub use terrain::{FloorStyle, Terrain};
pub use tick::{DeathCause, TickInput, step, tick};
