//! Hazard, item, and portal placement
//!
//! A spawn opportunity opens once the last pattern has scrolled far enough
//! left to leave the sampled gap on screen. Each opportunity emits exactly one
//! pattern, chosen in priority order: gravity portals, advanced-band bursts and
//! clusters, then a single hazard with optional coin and shield.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::progression::Unlock;
use super::state::{GameState, ItemKind, ObstacleKind, PortalKind};
use crate::consts::*;

/// Gap sampled when the session starts
pub const INITIAL_GAP: (f32, f32) = (200.0, 400.0);
/// Gap after a burst or cluster
pub const ADVANCED_GAP: (f32, f32) = (300.0, 600.0);
/// Default gap lower bound is `DEFAULT_GAP_BASE + speed_level * GAP_PER_SPEED_LEVEL`
pub const DEFAULT_GAP_BASE: f32 = 200.0;
pub const GAP_PER_SPEED_LEVEL: f32 = 50.0;
/// Width of the default gap range
pub const DEFAULT_GAP_SPREAD: f32 = 350.0;

/// Spawn marker after a portal
pub const PORTAL_MARKER_OFFSET: f32 = 100.0;

pub const STAR_CHANCE: f64 = 0.3;
pub const STAR_BURST_CHANCE: f64 = 0.3;
pub const COIN_CHANCE: f64 = 0.5;
/// Chance that each 2x kind joins the cluster candidates
pub const CLUSTER_LARGE_CHANCE: f64 = 0.3;

pub const STAR_SPACING: f32 = 100.0;
/// Stars in a burst drift up to this far off the surface
pub const STAR_BURST_JITTER: f32 = 50.0;
/// First star of a double-star pattern is raised by this much
pub const DOUBLE_STAR_LIFT: f32 = 30.0;
pub const CLUSTER_SPACING: f32 = 35.0;
pub const CLUSTER_SPACING_LARGE: f32 = 65.0;
/// Extra breathing room after a cluster
pub const CLUSTER_TAIL: f32 = 50.0;
/// Shield lands this far past the spawn point
pub const SHIELD_OFFSET: f32 = 100.0;

/// What a spawn opportunity produced
#[derive(Debug, Clone, PartialEq)]
pub enum SpawnPattern {
    FlipPortal,
    RestorePortal,
    StarBurst { count: u32 },
    GroundCluster { kind: ObstacleKind, count: u32 },
    DoubleStar,
    Single {
        kind: ObstacleKind,
        coin: bool,
        shield: bool,
    },
}

/// Spawn timing and one-shot bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnDirector {
    /// Right edge marker of the last pattern, scrolled with the world
    pub last_spawn_x: f32,
    /// Gap required before the next pattern
    pub next_gap: f32,
    /// Default-path spawns so far (drives periodic shields)
    pub spawned_count: u32,
    pub flip_portal_spawned: bool,
    pub restore_portal_spawned: bool,
}

impl SpawnDirector {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        Self {
            last_spawn_x: GAME_WIDTH,
            next_gap: rng.random_range(INITIAL_GAP.0..INITIAL_GAP.1),
            spawned_count: 0,
            flip_portal_spawned: false,
            restore_portal_spawned: false,
        }
    }

    /// Scroll the marker with the world
    #[inline]
    pub fn advance(&mut self, speed: f32) {
        self.last_spawn_x -= speed;
    }

    #[inline]
    pub fn ready(&self) -> bool {
        self.last_spawn_x < GAME_WIDTH - self.next_gap
    }
}

/// Default gap range for a speed level
pub fn default_gap_range(speed_level: f32) -> (f32, f32) {
    let min = DEFAULT_GAP_BASE + speed_level * GAP_PER_SPEED_LEVEL;
    (min, min + DEFAULT_GAP_SPREAD)
}

/// Run one spawn opportunity if the gap has opened
pub fn run_spawner(state: &mut GameState) -> Option<SpawnPattern> {
    if !state.spawner.ready() {
        return None;
    }

    let pattern = if let Some(pattern) = spawn_portal(state) {
        pattern
    } else if state.tuning.in_advanced_band(state.progression.score) {
        spawn_advanced(state)
    } else {
        spawn_default(state)
    };

    log::debug!(
        "Spawned {:?} at score {} (next gap {:.0})",
        pattern,
        state.progression.score,
        state.spawner.next_gap
    );
    Some(pattern)
}

/// One-time gravity portals; the gap is left unchanged
fn spawn_portal(state: &mut GameState) -> Option<SpawnPattern> {
    let score = state.progression.score;
    let (kind, pattern) = if score >= state.tuning.flip_portal_score
        && !state.spawner.flip_portal_spawned
    {
        state.spawner.flip_portal_spawned = true;
        (PortalKind::Flip, SpawnPattern::FlipPortal)
    } else if score >= state.tuning.restore_portal_score && !state.spawner.restore_portal_spawned {
        state.spawner.restore_portal_spawned = true;
        (PortalKind::Restore, SpawnPattern::RestorePortal)
    } else {
        return None;
    };

    state.spawn_portal(kind, SPAWN_X);
    state.spawner.last_spawn_x = SPAWN_X + PORTAL_MARKER_OFFSET;
    Some(pattern)
}

/// Burst of flying stars or a tight ground cluster
fn spawn_advanced(state: &mut GameState) -> SpawnPattern {
    let pattern = if state.rng.random_bool(STAR_BURST_CHANCE) {
        let count = state.rng.random_range(1..=3u32);
        for i in 0..count {
            let x = SPAWN_X + i as f32 * STAR_SPACING;
            let jitter = state.rng.random_range(0.0..STAR_BURST_JITTER);
            state.spawn_obstacle(ObstacleKind::Star, x).lift(jitter);
        }
        state.spawner.last_spawn_x = SPAWN_X + count as f32 * STAR_SPACING;
        SpawnPattern::StarBurst { count }
    } else {
        let count = state.rng.random_range(2..=3u32);
        let mut kinds = vec![ObstacleKind::Triangle, ObstacleKind::Pentagon];
        if state.rng.random_bool(CLUSTER_LARGE_CHANCE) {
            kinds.push(ObstacleKind::Triangle2x);
        }
        if state.rng.random_bool(CLUSTER_LARGE_CHANCE) {
            kinds.push(ObstacleKind::Pentagon2x);
        }
        let kind = kinds[state.rng.random_range(0..kinds.len())];
        let spacing = if kind.is_large() {
            CLUSTER_SPACING_LARGE
        } else {
            CLUSTER_SPACING
        };
        for i in 0..count {
            state.spawn_obstacle(kind, SPAWN_X + i as f32 * spacing);
        }
        state.spawner.last_spawn_x = SPAWN_X + count as f32 * spacing + CLUSTER_TAIL;
        SpawnPattern::GroundCluster { kind, count }
    };

    state.spawner.next_gap = state.rng.random_range(ADVANCED_GAP.0..ADVANCED_GAP.1);
    pattern
}

/// Single hazard from the unlocked set, plus optional coin and shield
fn spawn_default(state: &mut GameState) -> SpawnPattern {
    let used_gap = state.spawner.next_gap;

    let kinds = state.progression.unlocks.ground_kinds();
    let mut kind = kinds[state.rng.random_range(0..kinds.len())];
    if state.progression.unlocks.contains(Unlock::Star) && state.rng.random_bool(STAR_CHANCE) {
        kind = ObstacleKind::Star;
    }

    let (min_gap, max_gap) = default_gap_range(state.progression.speed_level);
    state.spawner.next_gap = state.rng.random_range(min_gap..max_gap);

    if kind == ObstacleKind::Star && state.progression.unlocks.contains(Unlock::DoubleStar) {
        state
            .spawn_obstacle(ObstacleKind::Star, SPAWN_X)
            .lift(DOUBLE_STAR_LIFT);
        state.spawn_obstacle(ObstacleKind::Star, SPAWN_X + STAR_SPACING);
        state.spawner.last_spawn_x = SPAWN_X + STAR_SPACING;
        return SpawnPattern::DoubleStar;
    }

    state.spawn_obstacle(kind, SPAWN_X);
    state.spawner.last_spawn_x = SPAWN_X;

    let coin = state.rng.random_bool(COIN_CHANCE);
    if coin {
        state.spawn_item(ItemKind::Coin, GAME_WIDTH - used_gap / 2.0);
    }

    state.spawner.spawned_count += 1;
    let periodic = state
        .spawner
        .spawned_count
        .is_multiple_of(state.tuning.shield_spawn_interval);
    let owed = state.progression.take_pending_shield();
    let shield = periodic || owed;
    if shield {
        state.spawn_item(ItemKind::Shield, SPAWN_X + SHIELD_OFFSET);
    }

    SpawnPattern::Single { kind, coin, shield }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameState;

    /// Force the next opportunity open
    fn open_gap(state: &mut GameState) {
        state.spawner.last_spawn_x = GAME_WIDTH - state.spawner.next_gap - 1.0;
    }

    #[test]
    fn test_not_ready_does_nothing() {
        let mut state = GameState::new(1);
        assert!(!state.spawner.ready());
        assert_eq!(run_spawner(&mut state), None);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_gap_opens_after_scrolling() {
        let mut state = GameState::new(1);
        let gap = state.spawner.next_gap;
        state.spawner.advance(gap);
        assert!(!state.spawner.ready());
        state.spawner.advance(1.0);
        assert!(state.spawner.ready());
    }

    #[test]
    fn test_flip_portal_at_80() {
        let mut state = GameState::new(5);
        state.progression.score = 80;
        open_gap(&mut state);
        let gap = state.spawner.next_gap;

        let pattern = run_spawner(&mut state);
        assert_eq!(pattern, Some(SpawnPattern::FlipPortal));
        assert_eq!(state.portals.len(), 1);
        assert_eq!(state.portals[0].kind, PortalKind::Flip);
        assert!(state.obstacles.is_empty());
        assert!(state.items.is_empty());
        assert_eq!(state.spawner.last_spawn_x, SPAWN_X + PORTAL_MARKER_OFFSET);
        assert_eq!(state.spawner.next_gap, gap);
        assert!(state.spawner.flip_portal_spawned);

        // Never again
        open_gap(&mut state);
        assert_ne!(run_spawner(&mut state), Some(SpawnPattern::FlipPortal));
        assert_eq!(state.portals.len(), 1);
    }

    #[test]
    fn test_flip_before_restore_when_both_due() {
        let mut state = GameState::new(5);
        state.progression.score = 100;
        open_gap(&mut state);
        assert_eq!(run_spawner(&mut state), Some(SpawnPattern::FlipPortal));
        open_gap(&mut state);
        assert_eq!(run_spawner(&mut state), Some(SpawnPattern::RestorePortal));
        assert_eq!(state.portals[1].kind, PortalKind::Restore);
    }

    #[test]
    fn test_default_single_hazard() {
        let mut state = GameState::new(21);
        open_gap(&mut state);
        match run_spawner(&mut state) {
            Some(SpawnPattern::Single { kind, .. }) => {
                assert!(matches!(kind, ObstacleKind::Triangle | ObstacleKind::Pentagon));
            }
            other => panic!("unexpected pattern {:?}", other),
        }
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].x, SPAWN_X);
        assert_eq!(state.spawner.last_spawn_x, SPAWN_X);

        let (min, max) = default_gap_range(state.progression.speed_level);
        assert!(state.spawner.next_gap >= min && state.spawner.next_gap < max);
    }

    #[test]
    fn test_gap_floor_grows_with_speed() {
        let (slow, _) = default_gap_range(1.1);
        let (fast, _) = default_gap_range(1.5);
        assert!(fast > slow);
        assert!((slow - 255.0).abs() < 1e-3);
    }

    #[test]
    fn test_pending_shield_redeemed_regardless_of_period() {
        let mut state = GameState::new(3);
        state.progression.pending_shields = 1;
        open_gap(&mut state);
        match run_spawner(&mut state) {
            Some(SpawnPattern::Single { shield, .. }) => assert!(shield),
            other => panic!("unexpected pattern {:?}", other),
        }
        assert_eq!(state.progression.pending_shields, 0);
        assert!(
            state
                .items
                .iter()
                .any(|i| i.kind == ItemKind::Shield && i.pos.x == SPAWN_X + SHIELD_OFFSET)
        );
    }

    #[test]
    fn test_periodic_shield() {
        let mut state = GameState::new(3);
        state.spawner.spawned_count = state.tuning.shield_spawn_interval - 1;
        open_gap(&mut state);
        match run_spawner(&mut state) {
            Some(SpawnPattern::Single { shield, .. }) => assert!(shield),
            other => panic!("unexpected pattern {:?}", other),
        }
    }

    #[test]
    fn test_coin_lands_mid_gap() {
        // Try seeds until a coin shows up; the position is deterministic
        for seed in 0..64 {
            let mut state = GameState::new(seed);
            open_gap(&mut state);
            let gap = state.spawner.next_gap;
            if let Some(SpawnPattern::Single { coin: true, .. }) = run_spawner(&mut state) {
                let coin = state
                    .items
                    .iter()
                    .find(|i| i.kind == ItemKind::Coin)
                    .expect("coin spawned");
                assert!((coin.pos.x - (GAME_WIDTH - gap / 2.0)).abs() < 1e-3);
                return;
            }
        }
        panic!("no seed produced a coin");
    }

    #[test]
    fn test_double_star_pattern() {
        for seed in 0..200 {
            let mut state = GameState::new(seed);
            state.progression.score = 160;
            state.progression.unlocks.star = true;
            state.progression.unlocks.double_star = true;
            state.spawner.flip_portal_spawned = true;
            state.spawner.restore_portal_spawned = true;
            open_gap(&mut state);
            if run_spawner(&mut state) == Some(SpawnPattern::DoubleStar) {
                assert_eq!(state.obstacles.len(), 2);
                assert_eq!(state.obstacles[0].x, SPAWN_X);
                assert_eq!(state.obstacles[1].x, SPAWN_X + STAR_SPACING);
                assert_eq!(state.obstacles[0].y, state.obstacles[1].y - DOUBLE_STAR_LIFT);
                assert_eq!(state.spawner.last_spawn_x, SPAWN_X + STAR_SPACING);
                return;
            }
        }
        panic!("no seed produced a double star");
    }

    #[test]
    fn test_advanced_band_patterns() {
        let mut saw_burst = false;
        let mut saw_cluster = false;
        for seed in 0..100 {
            let mut state = GameState::new(seed);
            state.progression.score = 250;
            state.spawner.flip_portal_spawned = true;
            state.spawner.restore_portal_spawned = true;
            open_gap(&mut state);
            match run_spawner(&mut state) {
                Some(SpawnPattern::StarBurst { count }) => {
                    saw_burst = true;
                    assert!((1..=3).contains(&count));
                    assert_eq!(state.obstacles.len(), count as usize);
                    assert!(state.obstacles.iter().all(|o| o.kind == ObstacleKind::Star));
                }
                Some(SpawnPattern::GroundCluster { kind, count }) => {
                    saw_cluster = true;
                    assert!((2..=3).contains(&count));
                    let spacing = if kind.is_large() {
                        CLUSTER_SPACING_LARGE
                    } else {
                        CLUSTER_SPACING
                    };
                    for (i, obstacle) in state.obstacles.iter().enumerate() {
                        assert_eq!(obstacle.kind, kind);
                        assert!((obstacle.x - (SPAWN_X + i as f32 * spacing)).abs() < 1e-3);
                    }
                }
                other => panic!("unexpected pattern {:?}", other),
            }
            assert!(state.spawner.next_gap >= ADVANCED_GAP.0);
            assert!(state.spawner.next_gap < ADVANCED_GAP.1);
        }
        assert!(saw_burst && saw_cluster);
    }

    #[test]
    fn test_inverted_hazards_hang_from_ceiling() {
        let mut state = GameState::new(8);
        state.gravity_inverted = true;
        open_gap(&mut state);
        run_spawner(&mut state);
        let obstacle = &state.obstacles[0];
        assert!(obstacle.ceiling);
        assert_eq!(obstacle.y, CEILING_Y);
    }
}
