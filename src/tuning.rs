//! Data-driven game balance
//!
//! Every gameplay number lives here so a balance pass is a JSON edit, not a
//! rebuild. Missing fields fall back to the shipped defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sim::explosions::ExplosionConfig;
use crate::sim::state::Level;

/// Player craft movement and hitbox
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Movement speed (units/s)
    pub move_speed: f32,
    /// Lateral bound, x stays within [-bound_x, bound_x]
    pub bound_x: f32,
    /// Vertical bounds
    pub min_y: f32,
    pub max_y: f32,
    /// Collision sphere radius
    pub radius: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            move_speed: 6.0,
            bound_x: 4.0,
            min_y: 0.0,
            max_y: 2.0,
            radius: 0.5,
        }
    }
}

/// Obstacle motion, placement and the spawn ramp
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleTuning {
    /// Approach speed at level speed 1.0 (units/s)
    pub base_speed: f32,
    /// Obstacles with z beyond this have passed the player
    pub exit_z: f32,
    /// Nearest spawn depth; spawns land in [spawn_z - depth_jitter, spawn_z]
    pub spawn_z: f32,
    pub depth_jitter: f32,
    /// Spawn x lies in [-lateral_range, lateral_range]
    pub lateral_range: f32,
    pub min_height: f32,
    pub max_height: f32,
    /// Collision radii of the size classes
    pub size_classes: Vec<f32>,
    /// Per-instance speed multiplier range
    pub speed_multiplier_min: f32,
    pub speed_multiplier_max: f32,
    /// Max cosmetic spin per axis (rad/s)
    pub max_rotation_rate: f32,
    /// Frames between spawns at session start
    pub initial_spawn_interval: u32,
    /// Floor for the spawn interval
    pub min_spawn_interval: u32,
    /// Difficulty ramp period (frames) and step (frames)
    pub ramp_every_frames: u64,
    pub ramp_step: u32,
}

impl Default for ObstacleTuning {
    fn default() -> Self {
        Self {
            base_speed: 9.0,
            exit_z: 5.0,
            spawn_z: -20.0,
            depth_jitter: 5.0,
            lateral_range: 4.0,
            min_height: 0.0,
            max_height: 2.0,
            size_classes: vec![0.25, 0.3, 0.45],
            speed_multiplier_min: 0.8,
            speed_multiplier_max: 1.2,
            max_rotation_rate: 2.0,
            initial_spawn_interval: 60,
            min_spawn_interval: 20,
            ramp_every_frames: 300,
            ramp_step: 5,
        }
    }
}

/// Projectile ballistics and the ammo/reload cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTuning {
    pub max_ammo: u32,
    pub reload_ms: f64,
    pub shoot_cooldown_ms: f64,
    /// Forward speed (units/s)
    pub projectile_speed: f32,
    /// Spawn distance in front of the craft
    pub muzzle_offset: f32,
    /// Projectiles are dropped after travelling this far
    pub max_travel: f32,
    /// Added to the obstacle radius for projectile hits
    pub hit_radius: f32,
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            max_ammo: 10,
            reload_ms: 1500.0,
            shoot_cooldown_ms: 150.0,
            projectile_speed: 48.0,
            muzzle_offset: 1.0,
            max_travel: 50.0,
            hit_radius: 0.2,
        }
    }
}

/// Particle motion shared by every explosion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTuning {
    pub speed_min: f32,
    pub speed_range: f32,
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Explosion on a projectile kill
    pub kill_burst: ExplosionConfig,
    /// Explosion when the craft is hit
    pub crash_burst: ExplosionConfig,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            speed_min: 1.0,
            speed_range: 3.0,
            gravity: 1.5,
            kill_burst: ExplosionConfig {
                count: 20,
                colors: vec![0xffaa33, 0xff5533, 0xffff66],
                duration: 0.6,
            },
            crash_burst: ExplosionConfig {
                count: 60,
                colors: vec![0xffaa33, 0xff5533, 0xffff66, 0xff3366],
                duration: 1.2,
            },
        }
    }
}

/// Complete tuning table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub obstacles: ObstacleTuning,
    pub weapon: WeaponTuning,
    pub particles: ParticleTuning,
    pub session: SessionTuning,
}

/// Session pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTuning {
    /// Delay between the crash and the game-over result (ms)
    pub collision_delay_ms: f64,
    /// Obstacle speed scale for levels 1..=5
    pub level_speeds: [f32; 5],
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            collision_delay_ms: 1000.0,
            level_speeds: [1.0, 1.25, 1.5, 1.8, 2.2],
        }
    }
}

impl Tuning {
    /// Speed scale for a level
    pub fn level_speed(&self, level: Level) -> f32 {
        self.session.level_speeds[level.index()]
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&contents)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
