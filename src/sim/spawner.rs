//! Obstacle spawner with a difficulty ramp
//!
//! Counts frames and emits one obstacle each time the counter reaches the
//! spawn interval. The interval shrinks on a fixed cadence down to a floor and
//! never grows back until the next session.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Obstacle, ObstacleId};
use crate::tuning::ObstacleTuning;

/// Fallback radius if the size class table is empty
const DEFAULT_RADIUS: f32 = 0.3;

#[derive(Debug, Clone)]
pub struct Spawner {
    tuning: ObstacleTuning,
    counter: u32,
    interval: u32,
    /// Last frame a ramp step was applied (guards repeat calls on one frame)
    last_ramp_frame: u64,
    next_id: u32,
    rng: Pcg32,
}

impl Spawner {
    pub fn new(tuning: &ObstacleTuning, seed: u64) -> Self {
        Self {
            tuning: tuning.clone(),
            counter: 0,
            interval: tuning.initial_spawn_interval,
            last_ramp_frame: 0,
            next_id: 1,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Frames between spawns right now
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Back to the opening interval with an empty counter
    pub fn reset(&mut self) {
        self.counter = 0;
        self.interval = self.tuning.initial_spawn_interval;
        self.last_ramp_frame = 0;
    }

    /// Advance one frame; maybe produce an obstacle
    ///
    /// `elapsed_frames` is the session frame number (1 on the first running
    /// frame). The caller inserts the obstacle into its set.
    pub fn try_spawn(&mut self, elapsed_frames: u64) -> Option<Obstacle> {
        self.ramp(elapsed_frames);

        self.counter += 1;
        if self.counter < self.interval {
            return None;
        }
        self.counter = 0;
        Some(self.spawn_obstacle(elapsed_frames))
    }

    fn ramp(&mut self, elapsed_frames: u64) {
        let every = self.tuning.ramp_every_frames;
        if every == 0
            || elapsed_frames == 0
            || elapsed_frames == self.last_ramp_frame
            || elapsed_frames % every != 0
        {
            return;
        }
        self.last_ramp_frame = elapsed_frames;

        let floor = self.tuning.min_spawn_interval;
        if self.interval > floor {
            self.interval = self.interval.saturating_sub(self.tuning.ramp_step).max(floor);
            log::debug!(
                "Difficulty up at frame {}: spawn every {} frames",
                elapsed_frames,
                self.interval
            );
        }
    }

    fn spawn_obstacle(&mut self, elapsed_frames: u64) -> Obstacle {
        let t = &self.tuning;
        let x = uniform(&mut self.rng, -t.lateral_range, t.lateral_range);
        let y = uniform(&mut self.rng, t.min_height, t.max_height);
        let z = t.spawn_z - uniform(&mut self.rng, 0.0, t.depth_jitter);

        let radius = if t.size_classes.is_empty() {
            DEFAULT_RADIUS
        } else {
            t.size_classes[self.rng.random_range(0..t.size_classes.len())]
        };
        let speed_multiplier = uniform(&mut self.rng, t.speed_multiplier_min, t.speed_multiplier_max);
        let spin = t.max_rotation_rate;
        let rotation_rate = Vec3::new(
            uniform(&mut self.rng, -spin, spin),
            uniform(&mut self.rng, -spin, spin),
            0.0,
        );

        let id = ObstacleId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        log::debug!("Spawned obstacle {} r={} at ({:.2}, {:.2}, {:.2})", id.0, radius, x, y, z);

        Obstacle {
            id,
            position: Vec3::new(x, y, z),
            speed_multiplier,
            rotation_rate,
            rotation: Vec3::ZERO,
            radius,
            spawn_frame: elapsed_frames,
        }
    }
}

/// Uniform sample in [lo, hi); collapses to `lo` for empty ranges
fn uniform(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}
