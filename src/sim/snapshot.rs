//! Read-only render snapshot
//!
//! Everything a renderer needs for one frame, detached from the simulation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::projectiles::AmmoInfo;
use super::state::{GamePhase, Level, ObstacleId, ProjectileId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Vec3,
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleView {
    pub id: ObstacleId,
    pub position: Vec3,
    pub rotation: Vec3,
    pub radius: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: ProjectileId,
    pub position: Vec3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleView {
    pub position: Vec3,
    pub color: u32,
    pub size: f32,
    /// 1 at spawn, 0 at expiry
    pub opacity: f32,
    pub scale: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    pub level: Level,
    pub ammo: AmmoInfo,
    pub player: PlayerView,
    pub obstacles: Vec<ObstacleView>,
    pub projectiles: Vec<ProjectileView>,
    pub particles: Vec<ParticleView>,
}

impl RenderSnapshot {
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
