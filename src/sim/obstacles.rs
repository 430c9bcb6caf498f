//! Live obstacle collection

use glam::Vec3;

use super::collision::{Sphere, spheres_overlap};
use super::state::Obstacle;
use crate::tuning::ObstacleTuning;

/// Obstacles in insertion (spawn) order
#[derive(Debug, Clone)]
pub struct ObstacleSet {
    obstacles: Vec<Obstacle>,
    base_speed: f32,
    exit_z: f32,
}

impl ObstacleSet {
    pub fn new(tuning: &ObstacleTuning) -> Self {
        Self {
            obstacles: Vec::new(),
            base_speed: tuning.base_speed,
            exit_z: tuning.exit_z,
        }
    }

    pub fn insert(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// Move everything toward the player and drop what has passed
    ///
    /// Returns the number of obstacles that left the corridor.
    pub fn advance(&mut self, speed_scale: f32, dt: f32) -> usize {
        let step = self.base_speed * speed_scale * dt;
        for obstacle in &mut self.obstacles {
            obstacle.position.z += step * obstacle.speed_multiplier;
            obstacle.rotation += obstacle.rotation_rate * dt;
        }

        let before = self.obstacles.len();
        let exit_z = self.exit_z;
        self.obstacles.retain(|o| o.position.z <= exit_z);
        before - self.obstacles.len()
    }

    /// Whether any obstacle touches the player sphere
    pub fn check_player_collision(&self, player_pos: Vec3, player_radius: f32) -> bool {
        let player = Sphere::new(player_pos, player_radius);
        self.obstacles
            .iter()
            .any(|o| spheres_overlap(&player, &Sphere::new(o.position, o.radius)))
    }

    /// Collision proxies, index-aligned with the set
    pub fn spheres(&self) -> Vec<Sphere> {
        self.obstacles
            .iter()
            .map(|o| Sphere::new(o.position, o.radius))
            .collect()
    }

    /// Remove the obstacles at `indices` (any order, duplicates ignored)
    ///
    /// Returns the removed obstacles in ascending index order. Out-of-range
    /// indices are skipped.
    pub fn remove_indices(&mut self, indices: &[usize]) -> Vec<Obstacle> {
        let mut sorted: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.obstacles.len())
            .collect();
        sorted.sort_unstable();
        sorted.dedup();

        // Back to front so earlier indices stay valid
        let mut removed: Vec<Obstacle> = sorted
            .into_iter()
            .rev()
            .map(|i| self.obstacles.remove(i))
            .collect();
        removed.reverse();
        removed
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Obstacle> {
        self.obstacles.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ObstacleId;

    fn set_with(zs: &[f32]) -> ObstacleSet {
        let mut set = ObstacleSet::new(&ObstacleTuning::default());
        for (i, &z) in zs.iter().enumerate() {
            set.insert(Obstacle::new(ObstacleId(i as u32), Vec3::new(0.0, 0.0, z), 0.3));
        }
        set
    }

    #[test]
    fn test_advance_moves_toward_player() {
        let mut set = set_with(&[-20.0]);
        // base 9 u/s * 2.0 scale * 0.5 s
        set.advance(2.0, 0.5);
        assert!((set.get(0).unwrap().position.z - (-11.0)).abs() < 1e-5);
    }

    #[test]
    fn test_speed_multiplier_applies() {
        let mut set = set_with(&[-20.0]);
        set.obstacles[0].speed_multiplier = 0.5;
        set.advance(1.0, 1.0);
        assert!((set.get(0).unwrap().position.z - (-15.5)).abs() < 1e-5);
    }

    #[test]
    fn test_exit_threshold_removal() {
        // Three obstacles cross the exit plane this frame, two do not
        let mut set = set_with(&[4.99, -10.0, 4.95, 4.98, -3.0]);
        let removed = set.advance(1.0, 0.1);
        assert_eq!(removed, 3);
        assert_eq!(set.len(), 2);
        // Survivors keep insertion order
        let ids: Vec<u32> = set.iter().map(|o| o.id.0).collect();
        assert_eq!(ids, vec![1, 4]);

        // Nothing left to cross; length never underflows
        let mut empty = set_with(&[]);
        assert_eq!(empty.advance(1.0, 10.0), 0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_rotation_is_cosmetic() {
        let mut set = set_with(&[-10.0]);
        set.obstacles[0].rotation_rate = Vec3::new(1.0, 2.0, 0.0);
        set.advance(0.0, 0.5);
        let o = set.get(0).unwrap();
        assert_eq!(o.rotation, Vec3::new(0.5, 1.0, 0.0));
        assert_eq!(o.position.z, -10.0);
    }

    #[test]
    fn test_player_collision_boundary() {
        let set = set_with(&[-0.8]);
        // 0.5 + 0.3 == 0.8: touching is not a hit
        assert!(!set.check_player_collision(Vec3::ZERO, 0.5));
        assert!(set.check_player_collision(Vec3::new(0.0, 0.0, -0.01), 0.5));
    }

    #[test]
    fn test_remove_indices() {
        let mut set = set_with(&[-1.0, -2.0, -3.0, -4.0]);
        let removed = set.remove_indices(&[3, 1, 3, 17]);
        let removed_ids: Vec<u32> = removed.iter().map(|o| o.id.0).collect();
        assert_eq!(removed_ids, vec![1, 3]);
        let left: Vec<u32> = set.iter().map(|o| o.id.0).collect();
        assert_eq!(left, vec![0, 2]);
    }

    #[test]
    fn test_clear() {
        let mut set = set_with(&[-1.0, -2.0]);
        set.clear();
        assert!(set.is_empty());
        assert!(!set.check_player_collision(Vec3::ZERO, 100.0));
    }
}
