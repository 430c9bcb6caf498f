//! Scripted pilot for headless runs
//!
//! Reads the live game state once per frame and answers with held controls:
//! reload when dry, dodge the nearest obstacle on a collision course, shoot
//! whatever lines up, otherwise drift back to the corridor center.

use glam::Vec3;

use crate::sim::{GameState, Obstacle, TickInput};

/// Obstacles closer than this (along -z) are threats
const LOOKAHEAD: f32 = 12.0;
/// Extra clearance kept around the collision radius when dodging
const DODGE_MARGIN: f32 = 0.6;
/// Lateral error that still counts as lined up for a shot
const AIM_TOLERANCE: f32 = 0.3;
/// Dead zone for recentering
const CENTER_TOLERANCE: f32 = 0.2;

pub trait Pilot {
    fn id(&self) -> &'static str;
    fn next_input(&mut self, state: &GameState) -> TickInput;
}

/// Dodge-first heuristic pilot
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    /// Last frame's fire key, released every other frame so the cooldown re-arms cleanly
    fired_last: bool,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    fn nearest_threat<'a>(state: &'a GameState, reach: f32) -> Option<&'a Obstacle> {
        let player = state.player.position;
        state
            .obstacles
            .iter()
            .filter(|o| o.position.z < player.z + 1.0 && o.position.z > player.z - LOOKAHEAD)
            .filter(|o| {
                let lane = reach + o.radius;
                (o.position.x - player.x).abs() < lane && (o.position.y - player.y).abs() < lane
            })
            .max_by(|a, b| a.position.z.total_cmp(&b.position.z))
    }

    fn lined_up(player: Vec3, o: &Obstacle) -> bool {
        o.position.z < player.z - 2.0
            && (o.position.x - player.x).abs() < AIM_TOLERANCE
            && (o.position.y - player.y).abs() < AIM_TOLERANCE
    }
}

impl Pilot for Autopilot {
    fn id(&self) -> &'static str {
        "autopilot"
    }

    fn next_input(&mut self, state: &GameState) -> TickInput {
        let mut input = TickInput::default();
        let ammo = state.ammo();
        let player = state.player.position;
        let bounds = &state.tuning.player;

        if ammo.current == 0 && !ammo.is_reloading {
            input.reload = true;
        }

        let reach = bounds.radius + DODGE_MARGIN;
        match Self::nearest_threat(state, reach) {
            Some(threat) if ammo.current > 0 && Self::lined_up(player, threat) => {
                input.shoot = !self.fired_last;
            }
            Some(threat) => {
                // Sidestep away, unless pinned against the wall
                let go_left = threat.position.x >= player.x;
                if go_left && player.x > -bounds.bound_x + reach {
                    input.left = true;
                } else if !go_left && player.x < bounds.bound_x - reach {
                    input.right = true;
                } else if go_left {
                    input.right = true;
                } else {
                    input.left = true;
                }
                if threat.position.y >= player.y {
                    input.down = player.y > bounds.min_y;
                } else {
                    input.up = player.y < bounds.max_y;
                }
            }
            None => {
                if player.x > CENTER_TOLERANCE {
                    input.left = true;
                } else if player.x < -CENTER_TOLERANCE {
                    input.right = true;
                }
                if ammo.current > 0 && state.obstacles.iter().any(|o| Self::lined_up(player, o)) {
                    input.shoot = !self.fired_last;
                }
            }
        }

        self.fired_last = input.shoot;
        input
    }
}
