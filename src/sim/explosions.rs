//! Explosion particle bursts (visual only)

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{Explosion, ExplosionId, Particle};
use crate::tuning::ParticleTuning;

/// Base particle size before the per-burst variation
const PARTICLE_SIZE: f32 = 0.06;

/// Fallback palette when a config carries no colors
const DEFAULT_COLORS: [u32; 4] = [0xffaa33, 0xff5533, 0xffff66, 0xff3366];

/// Shape of one burst
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplosionConfig {
    /// Particles per burst
    pub count: usize,
    /// Colors picked at random per particle (0xRRGGBB)
    pub colors: Vec<u32>,
    /// Lifetime (s)
    pub duration: f32,
}

/// Live explosions, each updated independently
#[derive(Debug, Clone)]
pub struct ExplosionSet {
    explosions: Vec<Explosion>,
    speed_min: f32,
    speed_range: f32,
    gravity: f32,
    /// Multiplies every burst's particle count (quality preset)
    particle_scale: f32,
    next_id: u32,
    rng: Pcg32,
}

impl ExplosionSet {
    pub fn new(tuning: &ParticleTuning, seed: u64) -> Self {
        Self {
            explosions: Vec::new(),
            speed_min: tuning.speed_min,
            speed_range: tuning.speed_range,
            gravity: tuning.gravity,
            particle_scale: 1.0,
            next_id: 1,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Scale particle counts (0 disables particles, bursts still time out)
    pub fn set_particle_scale(&mut self, scale: f32) {
        self.particle_scale = scale.max(0.0);
    }

    /// Burst at `origin`
    pub fn spawn(&mut self, origin: Vec3, config: &ExplosionConfig) -> ExplosionId {
        let count = (config.count as f32 * self.particle_scale).round() as usize;
        let colors: &[u32] = if config.colors.is_empty() {
            &DEFAULT_COLORS
        } else {
            &config.colors
        };
        let size = PARTICLE_SIZE * (0.8 + self.rng.random::<f32>() * 1.6);

        let particles = (0..count)
            .map(|_| {
                // Slightly biased downward
                let direction = Vec3::new(
                    self.rng.random::<f32>() - 0.5,
                    self.rng.random::<f32>() - 0.2,
                    self.rng.random::<f32>() - 0.5,
                )
                .normalize_or(Vec3::Y);
                let speed = self.speed_min + self.rng.random::<f32>() * self.speed_range;
                Particle {
                    position: origin,
                    velocity: direction * speed,
                    color: colors[self.rng.random_range(0..colors.len())],
                    size,
                }
            })
            .collect();

        let id = ExplosionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.explosions.push(Explosion {
            id,
            origin,
            particles,
            duration: config.duration,
            elapsed: 0.0,
        });
        id
    }

    /// Age, move and cull every burst; returns how many finished
    pub fn update(&mut self, dt: f32) -> usize {
        let gravity = self.gravity;
        for explosion in &mut self.explosions {
            explosion.elapsed += dt;
            for p in &mut explosion.particles {
                p.position += p.velocity * dt;
                p.velocity.y -= gravity * dt;
            }
        }
        let before = self.explosions.len();
        self.explosions.retain(|e| !e.is_finished());
        before - self.explosions.len()
    }

    pub fn clear(&mut self) {
        self.explosions.clear();
    }

    pub fn len(&self) -> usize {
        self.explosions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.explosions.is_empty()
    }

    /// Total live particles across all bursts
    pub fn particle_count(&self) -> usize {
        self.explosions.iter().map(|e| e.particles.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Explosion> {
        self.explosions.iter()
    }
}
