//! Game state and core simulation types
//!
//! `GameState` owns everything a session needs: the entity sets, the timer
//! queue, score and phase. Nothing here is global, so several games can run
//! side by side (and tests build their own).

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::explosions::ExplosionSet;
use super::obstacles::ObstacleSet;
use super::projectiles::{AmmoInfo, ProjectileSet};
use super::snapshot::{ObstacleView, ParticleView, PlayerView, ProjectileView, RenderSnapshot};
use super::spawner::Spawner;
use super::timers::{Scheduler, TimerKind};
use crate::consts::{MAX_LEVEL, MIN_LEVEL};
use crate::error::Error;
use crate::tuning::{PlayerTuning, Tuning};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Not running, menu/controls visible
    Idle,
    /// Active gameplay
    Running,
    /// Craft destroyed, crash effect playing before the result
    CollisionPending,
    /// Run ended, score finalized
    GameOver,
}

/// Selected difficulty level (1..=5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MIN: Level = Level(MIN_LEVEL);
    pub const MAX: Level = Level(MAX_LEVEL);

    pub fn new(level: u8) -> Option<Self> {
        (MIN_LEVEL..=MAX_LEVEL).contains(&level).then_some(Self(level))
    }

    /// Clamp any number into the selectable range
    pub fn clamped(level: u8) -> Self {
        Self(level.clamp(MIN_LEVEL, MAX_LEVEL))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based index into per-level tables
    pub fn index(self) -> usize {
        (self.0 - MIN_LEVEL) as usize
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::MIN
    }
}

impl TryFrom<u8> for Level {
    type Error = Error;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Level::new(level).ok_or(Error::InvalidLevel(level))
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObstacleId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectileId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExplosionId(pub u32);

/// An incoming meteor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub position: Vec3,
    /// Multiplies the level approach speed
    pub speed_multiplier: f32,
    /// Cosmetic spin (rad/s per axis)
    pub rotation_rate: Vec3,
    /// Accumulated spin, for rendering only
    pub rotation: Vec3,
    /// Collision radius (from its size class)
    pub radius: f32,
    /// Session frame it appeared on
    pub spawn_frame: u64,
}

impl Obstacle {
    /// Stationary, non-spinning obstacle (used by spawner and tests)
    pub fn new(id: ObstacleId, position: Vec3, radius: f32) -> Self {
        Self {
            id,
            position,
            speed_multiplier: 1.0,
            rotation_rate: Vec3::ZERO,
            rotation: Vec3::ZERO,
            radius,
            spawn_frame: 0,
        }
    }
}

/// A player shot travelling down the corridor (-z)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: ProjectileId,
    pub position: Vec3,
    /// Forward speed (units/s)
    pub speed: f32,
    /// Distance covered since firing
    pub traveled: f32,
}

/// A single explosion fragment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub color: u32,
    pub size: f32,
}

/// A burst of particles sharing one lifetime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub id: ExplosionId,
    pub origin: Vec3,
    pub particles: Vec<Particle>,
    /// Total lifetime (s)
    pub duration: f32,
    /// Time alive so far (s)
    pub elapsed: f32,
}

impl Explosion {
    /// Done once `elapsed` reaches `duration`
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Remaining-life fraction in [0, 1]; drives opacity
    pub fn fade(&self) -> f32 {
        if self.duration <= 0.0 {
            0.0
        } else {
            (1.0 - self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Particles grow as they fade
    pub fn scale(&self) -> f32 {
        0.5 + (1.0 - self.fade())
    }
}

/// The player's craft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub position: Vec3,
    /// Hidden once destroyed
    pub visible: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            visible: true,
        }
    }
}

impl Player {
    /// Move by the held directions and clamp into the flight box
    pub fn steer(&mut self, dx: f32, dy: f32, dt: f32, tuning: &PlayerTuning) {
        let step = tuning.move_speed * dt;
        self.position.x = (self.position.x + dx * step).clamp(-tuning.bound_x, tuning.bound_x);
        self.position.y = (self.position.y + dy * step).clamp(tuning.min_y, tuning.max_y.max(tuning.min_y));
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Result surfaced when a run ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverReport {
    pub final_score: u64,
    pub is_new_record: bool,
    pub level: Level,
}

/// Things that happened during a step, for audio/UI hosts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    SessionStarted { level: Level },
    SessionStopped,
    Shot { id: ProjectileId },
    /// Trigger pulled with an empty magazine
    DryFire,
    ReloadStarted,
    ReloadFinished,
    ObstacleDestroyed { id: ObstacleId, position: Vec3 },
    PlayerHit { position: Vec3 },
    GameOver { report: GameOverReport },
    NewRecord { score: u64 },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// Run seed
    pub seed: u64,
    pub phase: GamePhase,
    pub level: Level,
    /// Obstacle speed scale for the selected level
    pub speed_scale: f32,
    pub score: u64,
    /// Best score known locally
    pub high_score: u64,
    /// Frames simulated while running this session
    pub frame: u64,
    /// Session clock (ms), advances every step in every phase
    pub clock_ms: f64,
    pub player: Player,
    pub spawner: Spawner,
    pub obstacles: ObstacleSet,
    pub projectiles: ProjectileSet,
    pub explosions: ExplosionSet,
    pub timers: Scheduler,
    /// Bumped on start/stop; timers from older generations are dropped
    pub generation: u32,
    /// Latched once the craft has been hit this session
    pub collision_handled: bool,
    /// Result of the last finished run
    pub last_report: Option<GameOverReport>,
    /// Shoot key state last frame (dry-fire edge detection)
    pub(crate) shoot_held: bool,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle game with the given tuning and seed
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let level = Level::default();
        Self {
            spawner: Spawner::new(&tuning.obstacles, seed),
            obstacles: ObstacleSet::new(&tuning.obstacles),
            projectiles: ProjectileSet::new(&tuning.weapon),
            explosions: ExplosionSet::new(&tuning.particles, seed.wrapping_add(1)),
            speed_scale: tuning.level_speed(level),
            tuning,
            seed,
            phase: GamePhase::Idle,
            level,
            score: 0,
            high_score: 0,
            frame: 0,
            clock_ms: 0.0,
            player: Player::default(),
            timers: Scheduler::default(),
            generation: 0,
            collision_handled: false,
            last_report: None,
            shoot_held: false,
            events: Vec::new(),
        }
    }

    /// Seed the locally known best score (from a persistence provider)
    pub fn with_high_score(mut self, high_score: u64) -> Self {
        self.high_score = high_score;
        self
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn ammo(&self) -> AmmoInfo {
        self.projectiles.ammo_info()
    }

    /// Current frames between spawns
    pub fn spawn_interval(&self) -> u32 {
        self.spawner.interval()
    }

    /// Scale explosion particle counts (see `Settings::particle_scale`)
    pub fn set_particle_scale(&mut self, scale: f32) {
        self.explosions.set_particle_scale(scale);
    }

    /// Begin a fresh run at `level`
    pub fn start_game(&mut self, level: Level) {
        self.generation = self.generation.wrapping_add(1);
        self.level = level;
        self.speed_scale = self.tuning.level_speed(level);
        self.score = 0;
        self.frame = 0;
        self.obstacles.clear();
        self.projectiles.clear_all();
        self.explosions.clear();
        self.spawner.reset();
        self.player.reset();
        self.collision_handled = false;
        self.shoot_held = false;
        self.last_report = None;
        self.phase = GamePhase::Running;
        self.events.push(GameEvent::SessionStarted { level });
        log::info!(
            "Session started: level {} (speed x{:.2}, generation {})",
            level.get(),
            self.speed_scale,
            self.generation
        );
    }

    /// Restart at the current level
    pub fn restart_game(&mut self) {
        self.start_game(self.level);
    }

    /// Halt the simulation without finalizing the score
    pub fn stop_game(&mut self) {
        if !matches!(self.phase, GamePhase::Running | GamePhase::CollisionPending) {
            return;
        }
        self.generation = self.generation.wrapping_add(1);
        self.timers.cancel_all();
        self.obstacles.clear();
        self.projectiles.clear_all();
        self.phase = GamePhase::Idle;
        self.events.push(GameEvent::SessionStopped);
        log::info!("Session stopped at score {}", self.score);
    }

    /// Finalize the run: compare against the high score and surface the result
    ///
    /// Returns `None` when no run is in progress.
    pub fn game_over(&mut self) -> Option<GameOverReport> {
        if !matches!(self.phase, GamePhase::Running | GamePhase::CollisionPending) {
            return None;
        }
        let is_new_record = self.score > self.high_score;
        if is_new_record {
            self.high_score = self.score;
            self.events.push(GameEvent::NewRecord { score: self.score });
        }
        let report = GameOverReport {
            final_score: self.score,
            is_new_record,
            level: self.level,
        };
        self.phase = GamePhase::GameOver;
        self.last_report = Some(report);
        self.events.push(GameEvent::GameOver { report });
        log::info!(
            "Game over: score {} at level {}{}",
            report.final_score,
            report.level.get(),
            if is_new_record { " (new record)" } else { "" }
        );
        Some(report)
    }

    /// Craft hit: latch, hide, blow up, and schedule the result
    pub(crate) fn on_player_hit(&mut self) {
        self.collision_handled = true;
        self.phase = GamePhase::CollisionPending;
        self.player.visible = false;
        let position = self.player.position;
        self.explosions.spawn(position, &self.tuning.particles.crash_burst);
        self.timers.schedule(
            self.clock_ms + self.tuning.session.collision_delay_ms,
            self.generation,
            TimerKind::FinalizeGameOver,
        );
        self.events.push(GameEvent::PlayerHit { position });
        log::debug!("Player hit at {:?}, score frozen at {}", position, self.score);
    }

    /// Read-only view of everything the renderer draws
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            phase: self.phase,
            score: self.score,
            high_score: self.high_score,
            level: self.level,
            ammo: self.ammo(),
            player: PlayerView {
                position: self.player.position,
                visible: self.player.visible,
            },
            obstacles: self
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    position: o.position,
                    rotation: o.rotation,
                    radius: o.radius,
                })
                .collect(),
            projectiles: self
                .projectiles
                .iter()
                .map(|p| ProjectileView {
                    id: p.id,
                    position: p.position,
                })
                .collect(),
            particles: self
                .explosions
                .iter()
                .flat_map(|e| {
                    let opacity = e.fade();
                    let scale = e.scale();
                    e.particles.iter().map(move |p| ParticleView {
                        position: p.position,
                        color: p.color,
                        size: p.size,
                        opacity,
                        scale,
                    })
                })
                .collect(),
        }
    }
}
