//! Demo-mode input
//!
//! A simple look-ahead bot: jump when a hazard in the player's lane, a pit,
//! or a raised step is about to reach the leading edge. It only reads state,
//! so it never affects determinism beyond the input it produces.

use super::state::GameState;
use crate::consts::*;

/// Frames of warning the bot wants before an obstacle arrives
pub const REACTION_FRAMES: f32 = 14.0;
/// Rises taller than this are jumped rather than walked
pub const STEP_THRESHOLD: f32 = 10.0;

/// Should the player jump this frame?
pub fn wants_jump(state: &GameState) -> bool {
    let player = &state.player;
    if player.dead {
        return false;
    }

    let speed = state.world_speed();
    let lead = player.leading_edge();
    let lane = player.rect();

    if !player.grounded {
        // Second jump only to rescue a fall into a pit
        let falling = if state.gravity_inverted {
            player.vy < 0.0
        } else {
            player.vy > 0.0
        };
        return falling
            && !state.gravity_inverted
            && state.terrain.is_pit(player.center_x());
    }

    let hazard_ahead = state.obstacles.iter().any(|o| {
        let reach = lead + speed * o.speed_multiplier * REACTION_FRAMES;
        let hitbox = o.hitbox();
        let in_lane = hitbox.y < lane.bottom() && hitbox.bottom() > lane.y;
        !o.scored && in_lane && o.x >= player.x && o.x <= reach
    });
    if hazard_ahead {
        return true;
    }

    if state.gravity_inverted {
        return false;
    }

    let here = state.terrain.ground_y_at(player.center_x());
    (1..=REACTION_FRAMES as u32).any(|frame| {
        let ahead = state.terrain.ground_y_at(lead + speed * frame as f32);
        ahead >= PIT_Y || here - ahead > STEP_THRESHOLD
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{FloorSegment, GamePhase, Obstacle, ObstacleKind};
    use crate::sim::tick::{TickInput, tick};

    #[test]
    fn test_idle_on_open_ground() {
        let state = GameState::new(1);
        assert!(!wants_jump(&state));
    }

    #[test]
    fn test_jumps_for_hazard_in_lane() {
        let mut state = GameState::new(1);
        let id = state.next_entity_id();
        state
            .obstacles
            .push(Obstacle::new(id, ObstacleKind::Triangle, PLAYER_X + 60.0, BASE_GROUND_Y, false));
        assert!(wants_jump(&state));
    }

    #[test]
    fn test_ignores_star_overhead() {
        let mut state = GameState::new(1);
        let id = state.next_entity_id();
        let mut star = Obstacle::new(id, ObstacleKind::Star, PLAYER_X + 60.0, BASE_GROUND_Y, false);
        star.lift(40.0);
        state.obstacles.push(star);
        assert!(!wants_jump(&state));
    }

    #[test]
    fn test_jumps_before_pit() {
        let mut state = GameState::new(1);
        state.terrain.segments = vec![FloorSegment {
            x: 0.0,
            y: BASE_GROUND_Y,
            w: 180.0,
        }];
        assert!(wants_jump(&state));
    }

    #[test]
    fn test_autopilot_starts_and_plays() {
        let mut state = GameState::new(2024);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::Countdown);
        for _ in 0..600 {
            tick(&mut state, &input);
        }
        assert_ne!(state.phase, GamePhase::Start);
        assert!(state.frame > 0);
    }
}
