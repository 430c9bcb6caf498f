//! Frame-stepped simulation module
//!
//! All gameplay logic lives here. The simulation is deterministic for a given
//! seed and input sequence:
//! - Caller-supplied dt only (no wall clock)
//! - Seeded RNG only
//! - Stable iteration order (insertion order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod explosions;
pub mod obstacles;
pub mod projectiles;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timers;

pub use collision::{BroadPhase, BruteForce, Sphere, spheres_overlap};
pub use explosions::{ExplosionConfig, ExplosionSet};
pub use obstacles::ObstacleSet;
pub use projectiles::{AmmoInfo, ProjectileSet, ShotResult};
pub use snapshot::RenderSnapshot;
pub use spawner::Spawner;
pub use state::{
    Explosion, GameEvent, GameOverReport, GamePhase, GameState, Level, Obstacle, ObstacleId,
    Particle, Player, Projectile, ProjectileId,
};
pub use tick::{TickInput, TickOutcome, tick};
pub use timers::{Scheduler, TimerKind};
