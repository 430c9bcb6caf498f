//! Player projectiles and the ammo/reload cycle
//!
//! Shots are rate limited by a cooldown and drawn from a magazine. Reloading
//! is two-phase: `reload` starts it, and the owner calls `finish_reload` when
//! its scheduled completion comes due.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::{BroadPhase, BruteForce, Sphere};
use super::obstacles::ObstacleSet;
use super::state::{Projectile, ProjectileId};
use crate::tuning::WeaponTuning;

/// Ammo readout for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmmoInfo {
    pub current: u32,
    pub max: u32,
    pub is_reloading: bool,
}

/// Magazine state
#[derive(Debug, Clone)]
pub struct AmmoState {
    pub current: u32,
    pub max: u32,
    pub is_reloading: bool,
    /// Session clock of the last successful shot
    pub last_shot_ms: Option<f64>,
}

impl AmmoState {
    fn full(max: u32) -> Self {
        Self {
            current: max,
            max,
            is_reloading: false,
            last_shot_ms: None,
        }
    }
}

/// Outcome of pulling the trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotResult {
    Fired(ProjectileId),
    CoolingDown,
    Empty,
    Reloading,
}

#[derive(Debug, Clone)]
pub struct ProjectileSet {
    projectiles: Vec<Projectile>,
    ammo: AmmoState,
    tuning: WeaponTuning,
    next_id: u32,
}

impl ProjectileSet {
    pub fn new(tuning: &WeaponTuning) -> Self {
        Self {
            projectiles: Vec::new(),
            ammo: AmmoState::full(tuning.max_ammo),
            tuning: tuning.clone(),
            next_id: 1,
        }
    }

    /// Fire from `origin` at session time `now_ms`
    ///
    /// Returns false, leaving all state untouched, while cooling down, empty,
    /// or reloading.
    pub fn shoot(&mut self, origin: Vec3, now_ms: f64) -> bool {
        matches!(self.try_shoot(origin, now_ms), ShotResult::Fired(_))
    }

    /// Like `shoot`, but says why a shot was refused
    pub fn try_shoot(&mut self, origin: Vec3, now_ms: f64) -> ShotResult {
        if let Some(last) = self.ammo.last_shot_ms {
            if now_ms - last < self.tuning.shoot_cooldown_ms {
                return ShotResult::CoolingDown;
            }
        }
        if self.ammo.is_reloading {
            return ShotResult::Reloading;
        }
        if self.ammo.current == 0 {
            return ShotResult::Empty;
        }

        self.ammo.current -= 1;
        self.ammo.last_shot_ms = Some(now_ms);

        let id = ProjectileId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.projectiles.push(Projectile {
            id,
            position: origin - Vec3::Z * self.tuning.muzzle_offset,
            speed: self.tuning.projectile_speed,
            traveled: 0.0,
        });
        ShotResult::Fired(id)
    }

    /// Start a reload
    ///
    /// Returns true if a reload began; the caller schedules `finish_reload`
    /// after `reload_ms()`. No-op when already reloading or full.
    pub fn reload(&mut self) -> bool {
        if self.ammo.is_reloading || self.ammo.current == self.ammo.max {
            return false;
        }
        self.ammo.is_reloading = true;
        true
    }

    /// Complete an in-flight reload; ignored if none is pending
    pub fn finish_reload(&mut self) -> bool {
        if !self.ammo.is_reloading {
            return false;
        }
        self.ammo.current = self.ammo.max;
        self.ammo.is_reloading = false;
        true
    }

    pub fn reload_ms(&self) -> f64 {
        self.tuning.reload_ms
    }

    /// Fly forward; drop shots that have gone their full range
    pub fn advance(&mut self, dt: f32) -> usize {
        for p in &mut self.projectiles {
            let step = p.speed * dt;
            p.position.z -= step;
            p.traveled += step;
        }
        let before = self.projectiles.len();
        let max_travel = self.tuning.max_travel;
        self.projectiles.retain(|p| p.traveled < max_travel);
        before - self.projectiles.len()
    }

    /// Test every projectile against the obstacles
    ///
    /// Returns the indices of obstacles hit, deduplicated, in first-hit order.
    /// A projectile is consumed by the first obstacle it overlaps, even one
    /// another projectile already hit this call. The obstacles themselves are
    /// left for the caller to destroy.
    pub fn check_obstacle_hits(&mut self, obstacles: &ObstacleSet) -> Vec<usize> {
        self.check_obstacle_hits_with(obstacles, &mut BruteForce)
    }

    pub fn check_obstacle_hits_with<B: BroadPhase>(
        &mut self,
        obstacles: &ObstacleSet,
        broad: &mut B,
    ) -> Vec<usize> {
        if obstacles.is_empty() || self.projectiles.is_empty() {
            return Vec::new();
        }
        let targets = obstacles.spheres();
        let hit_radius = self.tuning.hit_radius;
        let mut hits: Vec<usize> = Vec::new();

        self.projectiles.retain(|p| {
            match broad.first_hit(&Sphere::new(p.position, hit_radius), &targets) {
                Some(index) => {
                    if !hits.contains(&index) {
                        hits.push(index);
                    }
                    false
                }
                None => true,
            }
        });
        hits
    }

    /// Drop all shots, refill, cancel any reload
    pub fn clear_all(&mut self) {
        self.projectiles.clear();
        self.ammo = AmmoState::full(self.tuning.max_ammo);
    }

    pub fn ammo_info(&self) -> AmmoInfo {
        AmmoInfo {
            current: self.ammo.current,
            max: self.ammo.max,
            is_reloading: self.ammo.is_reloading,
        }
    }

    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Obstacle, ObstacleId};
    use crate::tuning::ObstacleTuning;
    use proptest::prelude::*;

    fn weapon() -> ProjectileSet {
        ProjectileSet::new(&WeaponTuning::default())
    }

    fn obstacles_at(points: &[Vec3]) -> ObstacleSet {
        let mut set = ObstacleSet::new(&ObstacleTuning::default());
        for (i, &p) in points.iter().enumerate() {
            set.insert(Obstacle::new(ObstacleId(i as u32), p, 0.3));
        }
        set
    }

    #[test]
    fn test_shoot_spawns_in_front() {
        let mut weapon = weapon();
        assert!(weapon.shoot(Vec3::new(1.0, 0.5, 0.0), 0.0));
        let p = weapon.iter().next().unwrap();
        assert_eq!(p.position, Vec3::new(1.0, 0.5, -1.0));
        assert_eq!(weapon.ammo_info().current, 9);
    }

    #[test]
    fn test_cooldown_rejects_second_shot() {
        let mut weapon = weapon();
        assert!(weapon.shoot(Vec3::ZERO, 1000.0));
        let ammo = weapon.ammo_info().current;
        assert!(!weapon.shoot(Vec3::ZERO, 1100.0));
        assert_eq!(weapon.ammo_info().current, ammo);
        assert_eq!(weapon.len(), 1);
        assert!(weapon.shoot(Vec3::ZERO, 1150.0));
    }

    #[test]
    fn test_empty_magazine() {
        let mut weapon = weapon();
        for i in 0..10 {
            assert!(weapon.shoot(Vec3::ZERO, i as f64 * 200.0));
        }
        assert_eq!(weapon.try_shoot(Vec3::ZERO, 5000.0), ShotResult::Empty);
        assert_eq!(weapon.ammo_info().current, 0);
    }

    #[test]
    fn test_reload_cycle() {
        let mut weapon = weapon();
        // Full magazine: nothing to do
        assert!(!weapon.reload());

        weapon.shoot(Vec3::ZERO, 0.0);
        assert!(weapon.reload());
        assert!(weapon.ammo_info().is_reloading);
        // Repeated presses while reloading are ignored
        assert!(!weapon.reload());
        assert_eq!(weapon.try_shoot(Vec3::ZERO, 1000.0), ShotResult::Reloading);

        assert!(weapon.finish_reload());
        assert_eq!(
            weapon.ammo_info(),
            AmmoInfo { current: 10, max: 10, is_reloading: false }
        );
        // A second completion does nothing
        assert!(!weapon.finish_reload());
    }

    #[test]
    fn test_advance_expires_at_max_travel() {
        let mut weapon = weapon();
        weapon.shoot(Vec3::ZERO, 0.0);
        // 48 u/s: 1.0 s covers 48 units
        assert_eq!(weapon.advance(1.0), 0);
        assert!((weapon.iter().next().unwrap().position.z - (-49.0)).abs() < 1e-4);
        assert_eq!(weapon.advance(0.1), 1);
        assert!(weapon.is_empty());
    }

    #[test]
    fn test_hit_consumes_projectile() {
        let mut weapon = weapon();
        weapon.shoot(Vec3::new(0.0, 0.0, 1.0), 0.0); // lands at z = 0
        let obstacles = obstacles_at(&[Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -0.4)]);
        let hits = weapon.check_obstacle_hits(&obstacles);
        assert_eq!(hits, vec![1]);
        assert!(weapon.is_empty());
        // Obstacles are untouched
        assert_eq!(obstacles.len(), 2);
    }

    #[test]
    fn test_hit_boundary_is_exclusive() {
        let mut weapon = weapon();
        weapon.shoot(Vec3::new(0.0, 0.0, 1.0), 0.0);
        // 0.3 + 0.2 = 0.5 apart exactly
        let obstacles = obstacles_at(&[Vec3::new(0.0, 0.0, -0.5)]);
        assert!(weapon.check_obstacle_hits(&obstacles).is_empty());
        assert_eq!(weapon.len(), 1);
    }

    #[test]
    fn test_obstacle_credited_once() {
        let mut weapon = weapon();
        // Two shots side by side, both overlapping one obstacle
        weapon.shoot(Vec3::new(-0.1, 0.0, 1.0), 0.0);
        weapon.shoot(Vec3::new(0.1, 0.0, 1.0), 500.0);
        let obstacles = obstacles_at(&[Vec3::new(0.0, 0.0, 0.0)]);

        let hits = weapon.check_obstacle_hits(&obstacles);
        assert_eq!(hits, vec![0]);
        // Both shots are spent on it
        assert!(weapon.is_empty());
    }

    #[test]
    fn test_each_shot_takes_its_first_overlap() {
        let mut weapon = weapon();
        weapon.shoot(Vec3::new(0.0, 0.0, 1.0), 0.0);
        weapon.shoot(Vec3::new(3.0, 0.0, 1.0), 500.0);
        weapon.shoot(Vec3::new(-3.0, 0.0, 1.0), 1000.0);
        let obstacles = obstacles_at(&[
            Vec3::new(3.0, 0.0, 0.1),
            Vec3::new(0.0, 0.0, -0.1),
            Vec3::new(0.0, 0.0, 0.1),
        ]);
        let hits = weapon.check_obstacle_hits(&obstacles);
        // The center shot overlaps 1 and 2 but only takes 1
        assert_eq!(hits, vec![1, 0]);
        assert_eq!(weapon.len(), 1);
        assert_eq!(weapon.iter().next().unwrap().id, ProjectileId(3));
    }

    #[test]
    fn test_clear_all_refills_and_cancels() {
        let mut weapon = weapon();
        weapon.shoot(Vec3::ZERO, 0.0);
        weapon.reload();
        weapon.clear_all();
        assert!(weapon.is_empty());
        assert_eq!(
            weapon.ammo_info(),
            AmmoInfo { current: 10, max: 10, is_reloading: false }
        );
        assert!(!weapon.finish_reload());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Shoot(u16),
        Reload,
        Finish,
        Clear,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u16..400).prop_map(Op::Shoot),
            Just(Op::Reload),
            Just(Op::Finish),
            Just(Op::Clear),
        ]
    }

    proptest! {
        #[test]
        fn ammo_stays_in_bounds(ops in prop::collection::vec(op(), 0..200)) {
            let mut weapon = weapon();
            let mut now = 0.0;
            for op in ops {
                match op {
                    Op::Shoot(gap) => {
                        now += gap as f64;
                        let before = weapon.ammo_info();
                        let fired = weapon.shoot(Vec3::ZERO, now);
                        let after = weapon.ammo_info();
                        if fired {
                            prop_assert!(before.current > 0 && !before.is_reloading);
                            prop_assert_eq!(after.current, before.current - 1);
                        } else {
                            prop_assert_eq!(after, before);
                        }
                    }
                    Op::Reload => { weapon.reload(); }
                    Op::Finish => { weapon.finish_reload(); }
                    Op::Clear => weapon.clear_all(),
                }
                let info = weapon.ammo_info();
                prop_assert!(info.current <= info.max);
            }
        }
    }
}
