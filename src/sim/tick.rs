//! Per-frame simulation tick
//!
//! `tick` is the game state machine: it interprets the single "activate"
//! input by phase, runs the countdown, and only calls `step` while playing.
//! `step` advances the world by exactly one frame in a fixed order.

use super::autopilot;
use super::collision::{circle_rect_overlap, rects_overlap};
use super::progression::SpeedChange;
use super::spawn::run_spawner;
use super::state::{
    COUNTDOWN_GO_FRAMES, COUNTDOWN_START, COUNTDOWN_TICK_FRAMES, Countdown, GameEvent, GamePhase,
    GameState, ItemKind, PortalKind,
};
use crate::consts::*;

/// Input commands for a single frame (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Key, click, or tap this frame
    pub activate: bool,
    /// Demo mode - the autopilot decides when to jump
    pub autopilot: bool,
}

/// Why a run ended early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    /// Ran into the side of a raised step
    WallStrike,
    /// Dropped below the visible world
    Pit,
    /// Touched a hazard without a shield
    Obstacle,
}

/// Wall strike tolerance below the leading-edge ground sample
pub const WALL_TOLERANCE: f32 = 5.0;
/// Probe points are pulled in from the player's right and bottom edges
pub const WALL_PROBE_INSET: f32 = 5.0;

/// Advance the session by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    let mut activate = input.activate;
    if input.autopilot {
        activate |= match state.phase {
            GamePhase::Start => true,
            GamePhase::Playing => autopilot::wants_jump(state),
            _ => false,
        };
    }

    if activate {
        handle_activate(state);
    }

    match state.phase {
        GamePhase::Start | GamePhase::GameOver => {}
        GamePhase::Countdown => advance_countdown(state),
        GamePhase::Playing => step(state),
        GamePhase::Victory => state.update_particles(),
    }
}

/// Interpret the single logical input by phase
pub fn handle_activate(state: &mut GameState) {
    match state.phase {
        GamePhase::Start => start_countdown(state),
        GamePhase::GameOver | GamePhase::Victory => {
            state.reset();
            start_countdown(state);
        }
        GamePhase::Playing => {
            let inverted = state.gravity_inverted;
            let jump_velocity = state.tuning.jump_velocity;
            if state.player.jump(inverted, jump_velocity) {
                state.emit(GameEvent::Jump);
            }
        }
        GamePhase::Countdown => {}
    }
}

/// Begin the 3-2-1-GO sequence and the background loop
pub fn start_countdown(state: &mut GameState) {
    state.countdown = Countdown::default();
    state.emit(GameEvent::MusicStart);
    state.set_phase(GamePhase::Countdown);
    state.emit(GameEvent::CountdownTick(COUNTDOWN_START));
}

fn advance_countdown(state: &mut GameState) {
    state.countdown.frames_left = state.countdown.frames_left.saturating_sub(1);
    if state.countdown.frames_left > 0 {
        return;
    }

    if state.countdown.count == 0 {
        state.set_phase(GamePhase::Playing);
        return;
    }

    state.countdown.count -= 1;
    if state.countdown.count > 0 {
        state.countdown.frames_left = COUNTDOWN_TICK_FRAMES;
        state.emit(GameEvent::CountdownTick(state.countdown.count));
    } else {
        state.countdown.frames_left = COUNTDOWN_GO_FRAMES;
        state.emit(GameEvent::CountdownGo);
    }
}

/// Run one frame of gameplay
///
/// Order is load-bearing: scroll and terrain, player kinematics, wall and pit
/// checks, spawning, hazards (scoring before collision), items, portals,
/// particles. A death or win stops the frame where it happens.
pub fn step(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }
    state.frame += 1;
    let speed = state.world_speed();

    // 1. World scroll and terrain
    state.background_x -= speed * BACKGROUND_PARALLAX;
    if state.background_x <= -GAME_WIDTH {
        state.background_x = 0.0;
    }
    let score = state.progression.score;
    let varied_after = state.tuning.varied_terrain_score;
    state
        .terrain
        .update(speed, score, varied_after, &mut state.rng);

    // 2. Player kinematics
    let ground_y = state.terrain.ground_y_at(state.player.center_x());
    let gravity = state.tuning.gravity;
    state
        .player
        .integrate(state.gravity_inverted, ground_y, gravity);

    // 3. Side of a raised step
    if hits_wall(state) {
        kill_player(state, DeathCause::WallStrike);
        return;
    }

    // 4. Fell through a gap
    if state.player.y > GAME_HEIGHT {
        kill_player(state, DeathCause::Pit);
        return;
    }

    // 5. Spawning
    state.spawner.advance(speed);
    run_spawner(state);

    // 6-8. Entities
    if !update_obstacles(state, speed) {
        return;
    }
    update_items(state, speed);
    update_portals(state, speed);

    // 9. Cosmetics
    state.update_particles();
}

/// Leading-edge probe against the terrain (normal gravity only)
fn hits_wall(state: &GameState) -> bool {
    if state.gravity_inverted || state.player.dead {
        return false;
    }
    let player = &state.player;
    let probe_x = player.leading_edge() - WALL_PROBE_INSET;
    let probe_bottom = player.y + player.h - WALL_PROBE_INSET;
    let front_ground = state.terrain.ground_y_at(probe_x);
    probe_bottom > front_ground + WALL_TOLERANCE && player.y < front_ground
}

/// Move hazards, score passes, resolve hits. Returns false if the run ended.
fn update_obstacles(state: &mut GameState, speed: f32) -> bool {
    let player_x = state.player.x;
    let player_box = state.player.rect().inset(FAIRNESS_MARGIN);
    let mut alive = true;

    for i in 0..state.obstacles.len() {
        let obstacle = &mut state.obstacles[i];
        obstacle.advance(speed);

        if obstacle.rect().right() < 0.0 {
            obstacle.removed = true;
            continue;
        }

        if !obstacle.scored && obstacle.rect().right() < player_x {
            obstacle.scored = true;
            if score_pass(state) {
                alive = false;
                break;
            }
        }

        let obstacle = &mut state.obstacles[i];
        if !rects_overlap(&player_box, &obstacle.hitbox()) {
            continue;
        }
        if state.player.shield_count > 0 {
            obstacle.removed = true;
            state.player.shield_count -= 1;
            log::debug!("Shield absorbed {:?} ({} left)", obstacle.kind, state.player.shield_count);
            state.emit(GameEvent::Shield);
        } else {
            kill_player(state, DeathCause::Obstacle);
            alive = false;
            break;
        }
    }

    state.obstacles.retain(|o| !o.removed);
    alive
}

/// Record a passed hazard. Returns true if the run was won.
fn score_pass(state: &mut GameState) -> bool {
    let outcome = state.progression.record_pass(&state.tuning);
    state.emit(GameEvent::ScoreChanged(outcome.score));
    for unlock in &outcome.unlocked {
        state.emit(GameEvent::Unlocked(*unlock));
    }
    if let Some(SpeedChange::Increased(level)) = outcome.speed {
        state.emit(GameEvent::SpeedChanged(level));
    }
    if outcome.won {
        win(state);
    }
    outcome.won
}

fn update_items(state: &mut GameState, speed: f32) {
    let player_box = state.player.rect();
    let mut collected = Vec::new();

    state.items.retain_mut(|item| {
        item.advance(speed);
        if item.is_offscreen() {
            return false;
        }
        if circle_rect_overlap(item.pos, item.radius, &player_box) {
            collected.push(item.kind);
            return false;
        }
        true
    });

    for kind in collected {
        match kind {
            ItemKind::Shield => {
                state.player.shield_count += 1;
                state.emit(GameEvent::Shield);
            }
            ItemKind::Coin => {
                if state.progression.record_coin(&state.tuning) {
                    log::info!(
                        "Coin milestone: shield owed ({} pending)",
                        state.progression.pending_shields
                    );
                }
                state.emit(GameEvent::Coin);
                state.emit(GameEvent::CoinsChanged(state.progression.coins));
            }
        }
    }
}

fn update_portals(state: &mut GameState, speed: f32) {
    let player_box = state.player.rect();
    let mut entered = Vec::new();

    state.portals.retain_mut(|portal| {
        portal.advance(speed);
        if portal.x + portal.w < 0.0 {
            return false;
        }
        if !portal.collected && rects_overlap(&player_box, &portal.hitbox()) {
            portal.collected = true;
            entered.push(portal.kind);
        }
        true
    });

    for kind in entered {
        state.gravity_inverted = kind == PortalKind::Flip;
        log::info!("Entered {:?} portal; gravity inverted = {}", kind, state.gravity_inverted);
        state.emit(GameEvent::Portal);
    }
}

fn kill_player(state: &mut GameState, cause: DeathCause) {
    state.player.dead = true;
    log::info!(
        "Run over ({:?}) at score {}, {} coins",
        cause,
        state.progression.score,
        state.progression.coins
    );
    state.emit(GameEvent::Die);
    state.emit(GameEvent::MusicStop);
    state.set_phase(GamePhase::GameOver);
}

fn win(state: &mut GameState) {
    log::info!("Victory at score {}", state.progression.score);
    state.emit(GameEvent::MusicStop);
    state.emit(GameEvent::Win);
    state.set_phase(GamePhase::Victory);
    state.spawn_fireworks();
}
