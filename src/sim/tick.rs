//! Per-frame simulation step
//!
//! Order within a frame: due timers, input, spawn, movement, collisions,
//! score. Explosions animate in every phase so the crash effect keeps playing
//! after the craft is gone.

use serde::{Deserialize, Serialize};

use super::projectiles::{AmmoInfo, ShotResult};
use super::state::{GameEvent, GameOverReport, GamePhase, GameState};
use super::timers::TimerKind;
use crate::consts::{KILL_BONUS, SCORE_PER_FRAME};
use crate::platform::{Action, InputProvider};
use crate::sanitize_dt;

/// Held controls for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub shoot: bool,
    pub reload: bool,
}

impl TickInput {
    /// Sample a key-state provider
    pub fn poll(provider: &impl InputProvider) -> Self {
        Self {
            left: provider.is_pressed(Action::Left),
            right: provider.is_pressed(Action::Right),
            up: provider.is_pressed(Action::Up),
            down: provider.is_pressed(Action::Down),
            shoot: provider.is_pressed(Action::Shoot),
            reload: provider.is_pressed(Action::Reload),
        }
    }

    /// Steering axes in {-1, 0, 1}; opposite keys cancel
    pub fn axes(&self) -> (f32, f32) {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        (axis(self.left, self.right), axis(self.down, self.up))
    }
}

/// What a step produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickOutcome {
    pub score: u64,
    pub ammo: AmmoInfo,
    pub running: bool,
    pub phase: GamePhase,
    /// Set on the step the run is finalized
    pub game_over: Option<GameOverReport>,
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Advance the whole simulation by one display frame
    pub fn step(&mut self, input: &TickInput, dt: f32) -> TickOutcome {
        tick(self, input, dt)
    }
}

/// Advance the game state by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> TickOutcome {
    let dt = sanitize_dt(dt);
    state.clock_ms += f64::from(dt) * 1000.0;

    let mut game_over = None;
    for kind in state.timers.drain_due(state.clock_ms, state.generation) {
        match kind {
            TimerKind::ReloadComplete => {
                if state.projectiles.finish_reload() {
                    state.events.push(GameEvent::ReloadFinished);
                    log::debug!("Reload complete");
                }
            }
            TimerKind::FinalizeGameOver => {
                if state.phase == GamePhase::CollisionPending {
                    game_over = state.game_over();
                }
            }
        }
    }

    if state.phase == GamePhase::Running {
        run_frame(state, input, dt);
    } else {
        state.shoot_held = input.shoot;
    }

    state.explosions.update(dt);

    TickOutcome {
        score: state.score,
        ammo: state.ammo(),
        running: state.is_running(),
        phase: state.phase,
        game_over,
        events: std::mem::take(&mut state.events),
    }
}

fn run_frame(state: &mut GameState, input: &TickInput, dt: f32) {
    state.frame += 1;

    // Controls
    let (dx, dy) = input.axes();
    state.player.steer(dx, dy, dt, &state.tuning.player);

    if input.reload && state.projectiles.reload() {
        state.timers.schedule(
            state.clock_ms + state.projectiles.reload_ms(),
            state.generation,
            TimerKind::ReloadComplete,
        );
        state.events.push(GameEvent::ReloadStarted);
        log::debug!("Reload started");
    }

    if input.shoot {
        match state.projectiles.try_shoot(state.player.position, state.clock_ms) {
            ShotResult::Fired(id) => state.events.push(GameEvent::Shot { id }),
            ShotResult::Empty if !state.shoot_held => state.events.push(GameEvent::DryFire),
            _ => {}
        }
    }
    state.shoot_held = input.shoot;

    // Spawn and move
    if let Some(obstacle) = state.spawner.try_spawn(state.frame) {
        state.obstacles.insert(obstacle);
    }
    state.obstacles.advance(state.speed_scale, dt);
    state.projectiles.advance(dt);

    // Projectile kills
    let hits = state.projectiles.check_obstacle_hits(&state.obstacles);
    for obstacle in state.obstacles.remove_indices(&hits) {
        state
            .explosions
            .spawn(obstacle.position, &state.tuning.particles.kill_burst);
        state.score += KILL_BONUS;
        state.events.push(GameEvent::ObstacleDestroyed {
            id: obstacle.id,
            position: obstacle.position,
        });
        log::debug!("Obstacle {} destroyed", obstacle.id.0);
    }

    // Player contact, once per session
    if !state.collision_handled
        && state
            .obstacles
            .check_player_collision(state.player.position, state.tuning.player.radius)
    {
        state.on_player_hit();
        return;
    }

    state.score += SCORE_PER_FRAME;
}
