//! Game state and core simulation types
//!
//! All state that must be reproduced for determinism lives here. The whole
//! session is one `GameState`; a reset replaces it wholesale.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::progression::{Progression, Unlock};
use super::spawn::SpawnDirector;
use super::terrain::Terrain;
use crate::consts::*;
use crate::snap_to_right_angle;
use crate::tuning::{Tuning, TuningError};

/// Top-level session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the first activation
    Start,
    /// 3-2-1-GO before the run; simulation is frozen
    Countdown,
    /// Active gameplay
    Playing,
    /// Run ended in a death (terminal until reset)
    GameOver,
    /// Win score reached (terminal until reset)
    Victory,
}

/// Notifications for the audio and UI collaborators, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jump,
    Coin,
    Shield,
    Portal,
    Die,
    Win,
    MusicStart,
    MusicStop,
    ScoreChanged(u32),
    CoinsChanged(u32),
    PhaseChanged(GamePhase),
    /// Countdown shows this number (3, 2, 1)
    CountdownTick(u8),
    CountdownGo,
    Unlocked(Unlock),
    SpeedChanged(f32),
}

/// Frames each countdown number stays on screen
pub const COUNTDOWN_TICK_FRAMES: u32 = FRAME_RATE;
/// Frames the "GO" label stays before play begins
pub const COUNTDOWN_GO_FRAMES: u32 = FRAME_RATE / 2;
/// Countdown starts from this number
pub const COUNTDOWN_START: u8 = 3;

/// Frame-clocked countdown sub-state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    /// Number currently shown; 0 means "GO"
    pub count: u8,
    /// Frames until the next tick
    pub frames_left: u32,
}

impl Default for Countdown {
    fn default() -> Self {
        Self {
            count: COUNTDOWN_START,
            frames_left: COUNTDOWN_TICK_FRAMES,
        }
    }
}

/// The player's cube
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Fixed horizontal position
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Vertical velocity (px/frame, positive is downward)
    pub vy: f32,
    pub grounded: bool,
    /// Jumps used since last landing (0-2)
    pub jump_count: u8,
    pub shield_count: u32,
    pub dead: bool,
    /// Cosmetic rotation in degrees
    pub rotation: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            x: PLAYER_X,
            y: BASE_GROUND_Y - PLAYER_SIZE,
            w: PLAYER_SIZE,
            h: PLAYER_SIZE,
            vy: 0.0,
            grounded: true,
            jump_count: 0,
            shield_count: 0,
            dead: false,
            rotation: 0.0,
        }
    }
}

impl Player {
    pub const MAX_JUMPS: u8 = 2;

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    #[inline]
    pub fn leading_edge(&self) -> f32 {
        self.x + self.w
    }

    /// Try to jump; the second jump is only available in mid-air
    pub fn jump(&mut self, inverted: bool, jump_velocity: f32) -> bool {
        if self.dead {
            return false;
        }
        let impulse = if inverted {
            jump_velocity
        } else {
            -jump_velocity
        };
        if self.grounded {
            self.vy = impulse;
            self.grounded = false;
            self.jump_count = 1;
            true
        } else if self.jump_count < Self::MAX_JUMPS {
            self.vy = impulse;
            self.jump_count += 1;
            true
        } else {
            false
        }
    }

    /// Integrate one frame of gravity and resolve against the surface
    ///
    /// `ground_y` is the floor height under the player's center; while
    /// inverted the flat ceiling is the surface instead.
    pub fn integrate(&mut self, inverted: bool, ground_y: f32, gravity: f32) {
        if self.dead {
            return;
        }

        self.vy += if inverted { -gravity } else { gravity };
        self.y += self.vy;

        let landed = if inverted {
            if self.y <= CEILING_Y {
                self.y = CEILING_Y;
                true
            } else {
                false
            }
        } else if self.y >= ground_y - self.h {
            self.y = ground_y - self.h;
            true
        } else {
            false
        };

        if landed {
            self.vy = 0.0;
            self.grounded = true;
            self.jump_count = 0;
            self.rotation = snap_to_right_angle(self.rotation);
        } else {
            self.grounded = false;
            self.rotation += if inverted { -TUMBLE_RATE } else { TUMBLE_RATE };
        }
    }
}

/// Hazard shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Triangle,
    Pentagon,
    Triangle2x,
    Pentagon2x,
    /// Flying hazard that closes in faster than the world scrolls
    Star,
}

/// Per-kind size and motion table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindParams {
    pub size: f32,
    pub speed_multiplier: f32,
    /// Distance of a flying kind's top edge from the surface line
    pub hover: f32,
}

impl ObstacleKind {
    pub fn params(self) -> KindParams {
        match self {
            ObstacleKind::Triangle => KindParams {
                size: 30.0,
                speed_multiplier: 1.0,
                hover: 0.0,
            },
            ObstacleKind::Pentagon => KindParams {
                size: 35.0,
                speed_multiplier: 1.0,
                hover: 0.0,
            },
            ObstacleKind::Triangle2x => KindParams {
                size: 50.0,
                speed_multiplier: 1.0,
                hover: 0.0,
            },
            ObstacleKind::Pentagon2x => KindParams {
                size: 60.0,
                speed_multiplier: 1.0,
                hover: 0.0,
            },
            ObstacleKind::Star => KindParams {
                size: 30.0,
                speed_multiplier: 1.5,
                hover: 80.0,
            },
        }
    }

    #[inline]
    pub fn is_flying(self) -> bool {
        self == ObstacleKind::Star
    }

    #[inline]
    pub fn is_large(self) -> bool {
        matches!(self, ObstacleKind::Triangle2x | ObstacleKind::Pentagon2x)
    }
}

/// A hazard entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub speed_multiplier: f32,
    /// Hanging from the ceiling instead of standing on the floor
    pub ceiling: bool,
    /// Set once when the hazard passes behind the player
    pub scored: bool,
    /// Marked for compaction at the end of the frame
    #[serde(skip)]
    pub removed: bool,
}

impl Obstacle {
    /// Build a hazard resting on `surface_y` (or hanging from the ceiling)
    pub fn new(id: u32, kind: ObstacleKind, x: f32, surface_y: f32, ceiling: bool) -> Self {
        let params = kind.params();
        let size = params.size;
        let y = match (ceiling, kind.is_flying()) {
            (true, _) => CEILING_Y + params.hover,
            (false, true) => surface_y - params.hover,
            (false, false) => surface_y - size,
        };
        Self {
            id,
            kind,
            x,
            y,
            w: size,
            h: size,
            speed_multiplier: params.speed_multiplier,
            ceiling,
            scored: false,
            removed: false,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    /// Shrunken collision box
    #[inline]
    pub fn hitbox(&self) -> Rect {
        self.rect().inset(FAIRNESS_MARGIN)
    }

    /// Move left by the world speed (scaled for flying kinds)
    #[inline]
    pub fn advance(&mut self, speed: f32) {
        self.x -= speed * self.speed_multiplier;
    }

    /// Shift away from the surface this hazard is attached to
    pub fn lift(&mut self, amount: f32) {
        if self.ceiling {
            self.y += amount;
        } else {
            self.y -= amount;
        }
    }
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Shield,
    Coin,
}

/// Pickup radius shared by all items
pub const ITEM_RADIUS: f32 = 15.0;
/// Items float this far above the ground sample
pub const ITEM_FLOAT_MIN: f32 = 40.0;
pub const ITEM_FLOAT_MAX: f32 = 120.0;

/// A pickup entity (removed on collection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub kind: ItemKind,
    pub pos: Vec2,
    pub radius: f32,
}

impl Item {
    #[inline]
    pub fn advance(&mut self, speed: f32) {
        self.pos.x -= speed;
    }

    /// Fully past the left edge
    #[inline]
    pub fn is_offscreen(&self) -> bool {
        self.pos.x + 2.0 * self.radius < 0.0
    }
}

/// Gravity portal types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortalKind {
    /// Inverts gravity
    Flip,
    /// Restores normal gravity
    Restore,
}

pub const PORTAL_WIDTH: f32 = 40.0;
pub const PORTAL_HEIGHT: f32 = 80.0;
/// Gap between the portal and the surface it floats near
pub const PORTAL_FLOAT: f32 = 20.0;
/// Portal hit box is narrowed by this much per side
pub const PORTAL_HIT_INSET: f32 = 10.0;
/// Cosmetic pulse phase per frame
pub const PORTAL_PULSE_RATE: f32 = 0.1;

/// A gravity portal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portal {
    pub id: u32,
    pub kind: PortalKind,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub collected: bool,
    pub pulse: f32,
}

impl Portal {
    /// Flip portals float above `surface_y`; restore portals hang from the ceiling
    pub fn new(id: u32, kind: PortalKind, x: f32, surface_y: f32) -> Self {
        let y = match kind {
            PortalKind::Flip => surface_y - PORTAL_HEIGHT - PORTAL_FLOAT,
            PortalKind::Restore => CEILING_Y + PORTAL_FLOAT,
        };
        Self {
            id,
            kind,
            x,
            y,
            w: PORTAL_WIDTH,
            h: PORTAL_HEIGHT,
            collected: false,
            pulse: 0.0,
        }
    }

    #[inline]
    pub fn hitbox(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h).inset_x(PORTAL_HIT_INSET)
    }

    #[inline]
    pub fn advance(&mut self, speed: f32) {
        self.x -= speed;
        self.pulse += PORTAL_PULSE_RATE;
    }
}

/// A horizontal span of ground
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloorSegment {
    pub x: f32,
    /// Surface height
    pub y: f32,
    pub w: f32,
}

impl FloorSegment {
    /// Half-open coverage test `[x, x + w)`
    #[inline]
    pub fn covers(&self, x: f32) -> bool {
        x >= self.x && x < self.x + self.w
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }
}

/// Firework palette (RGB)
pub const FIREWORK_COLORS: [u32; 5] = [0xEF4444, 0x3B82F6, 0x10B981, 0xF59E0B, 0x8B5CF6];
/// Starting lifetime of a particle
pub const PARTICLE_LIFE: f32 = 100.0;
/// Lifetime lost per frame
pub const PARTICLE_DECAY: f32 = 2.0;
/// Particles spawned for the victory burst
pub const FIREWORK_COUNT: usize = 100;

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    pub life: f32,
}

impl Particle {
    pub fn update(&mut self) {
        self.pos += self.vel;
        self.life -= PARTICLE_DECAY;
    }

    /// Opacity for rendering (1 = fresh, 0 = gone)
    #[inline]
    pub fn alpha(&self) -> f32 {
        (self.life / PARTICLE_LIFE).clamp(0.0, 1.0)
    }
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub countdown: Countdown,
    /// Frames simulated while playing
    pub frame: u64,
    /// Background scroll offset in [-GAME_WIDTH, 0]
    pub background_x: f32,
    /// World gravity direction
    pub gravity_inverted: bool,
    pub player: Player,
    pub terrain: Terrain,
    pub spawner: SpawnDirector,
    pub progression: Progression,
    /// Active hazards (spawn order)
    pub obstacles: Vec<Obstacle>,
    pub items: Vec<Item>,
    pub portals: Vec<Portal>,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
    /// Pending notifications for collaborators
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Tuning::default())
    }

    /// Create a new session with the given balance, rejecting values the
    /// simulation cannot run with
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(seed, tuning))
    }

    fn build(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let spawner = SpawnDirector::new(&mut rng);
        let progression = Progression::new(&tuning);
        Self {
            seed,
            rng,
            tuning,
            phase: GamePhase::Start,
            countdown: Countdown::default(),
            frame: 0,
            background_x: 0.0,
            gravity_inverted: false,
            player: Player::default(),
            terrain: Terrain::new(),
            spawner,
            progression,
            obstacles: Vec::new(),
            items: Vec::new(),
            portals: Vec::new(),
            particles: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Discard the whole session and start over with a derived seed
    pub fn reset(&mut self) {
        let seed = self.rng.random::<u64>();
        let tuning = self.tuning.clone();
        log::info!("Session reset (seed {})", seed);
        *self = Self::build(seed, tuning);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Current world scroll speed
    #[inline]
    pub fn world_speed(&self) -> f32 {
        self.progression.speed(&self.tuning)
    }

    /// Queue a notification for this frame
    #[inline]
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all queued notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Change phase and notify collaborators
    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
            self.emit(GameEvent::PhaseChanged(phase));
        }
    }

    /// Spawn a hazard at `x`, resting on the terrain there or hanging from the
    /// ceiling while gravity is inverted
    pub fn spawn_obstacle(&mut self, kind: ObstacleKind, x: f32) -> &mut Obstacle {
        let id = self.next_entity_id();
        let surface_y = self.terrain.ground_y_at(x);
        self.obstacles
            .push(Obstacle::new(id, kind, x, surface_y, self.gravity_inverted));
        let last = self.obstacles.len() - 1;
        &mut self.obstacles[last]
    }

    /// Spawn a pickup floating above the terrain at `x`
    pub fn spawn_item(&mut self, kind: ItemKind, x: f32) {
        let id = self.next_entity_id();
        let ground_y = self.terrain.ground_y_at(x);
        let y = self
            .rng
            .random_range(ground_y - ITEM_FLOAT_MAX..ground_y - ITEM_FLOAT_MIN);
        self.items.push(Item {
            id,
            kind,
            pos: Vec2::new(x, y),
            radius: ITEM_RADIUS,
        });
    }

    /// Spawn a portal at `x`, floating above the terrain there (or the
    /// baseline over a pit)
    pub fn spawn_portal(&mut self, kind: PortalKind, x: f32) {
        let id = self.next_entity_id();
        let surface_y = if self.terrain.is_pit(x) {
            BASE_GROUND_Y
        } else {
            self.terrain.ground_y_at(x)
        };
        self.portals.push(Portal::new(id, kind, x, surface_y));
    }

    /// Burst of celebratory particles at the world center
    pub fn spawn_fireworks(&mut self) {
        let center = Vec2::new(GAME_WIDTH / 2.0, GAME_HEIGHT / 2.0);
        for _ in 0..FIREWORK_COUNT {
            let vel = Vec2::new(
                self.rng.random_range(-5.0..5.0),
                self.rng.random_range(-5.0..5.0),
            );
            let color = FIREWORK_COLORS[self.rng.random_range(0..FIREWORK_COLORS.len())];
            self.particles.push(Particle {
                pos: center,
                vel,
                color,
                life: PARTICLE_LIFE,
            });
        }
    }

    /// Advance and cull particles
    pub fn update_particles(&mut self) {
        for particle in &mut self.particles {
            particle.update();
        }
        self.particles.retain(|p| p.life > 0.0);
    }
}
