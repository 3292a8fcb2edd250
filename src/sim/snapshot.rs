//! Read-only view handed to the renderer each frame
//!
//! Borrowed from `GameState`, so building one costs nothing and nothing the
//! renderer does can leak back into the simulation.

use super::state::{FloorSegment, GamePhase, GameState, Item, Obstacle, Particle, Portal};

/// Player transform and shield indicator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerPose {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Degrees
    pub rotation: f32,
    pub shield_count: u32,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone)]
pub struct RenderSnapshot<'a> {
    pub phase: GamePhase,
    pub background_x: f32,
    pub gravity_inverted: bool,
    pub floor: &'a [FloorSegment],
    pub items: &'a [Item],
    pub obstacles: &'a [Obstacle],
    pub player: PlayerPose,
    pub portals: &'a [Portal],
    pub particles: &'a [Particle],
    /// "3", "2", "1", "GO!" during the countdown
    pub countdown_label: Option<String>,
    pub score: u32,
    pub coins: u32,
}

impl GameState {
    pub fn snapshot(&self) -> RenderSnapshot<'_> {
        let countdown_label = (self.phase == GamePhase::Countdown).then(|| {
            if self.countdown.count > 0 {
                self.countdown.count.to_string()
            } else {
                "GO!".to_string()
            }
        });

        RenderSnapshot {
            phase: self.phase,
            background_x: self.background_x,
            gravity_inverted: self.gravity_inverted,
            floor: &self.terrain.segments,
            items: &self.items,
            obstacles: &self.obstacles,
            player: PlayerPose {
                x: self.player.x,
                y: self.player.y,
                w: self.player.w,
                h: self.player.h,
                rotation: self.player.rotation,
                shield_count: self.player.shield_count,
            },
            portals: &self.portals,
            particles: &self.particles,
            countdown_label,
            score: self.progression.score,
            coins: self.progression.coins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick::start_countdown;

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut state = GameState::new(5);
        state.player.shield_count = 2;
        state.progression.coins = 7;
        let snap = state.snapshot();
        assert_eq!(snap.phase, GamePhase::Start);
        assert_eq!(snap.floor.len(), state.terrain.segments.len());
        assert_eq!(snap.player.shield_count, 2);
        assert_eq!(snap.coins, 7);
        assert!(snap.countdown_label.is_none());
    }

    #[test]
    fn test_countdown_label() {
        let mut state = GameState::new(5);
        start_countdown(&mut state);
        assert_eq!(state.snapshot().countdown_label.as_deref(), Some("3"));
        state.countdown.count = 0;
        assert_eq!(state.snapshot().countdown_label.as_deref(), Some("GO!"));
    }
}
