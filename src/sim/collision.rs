//! Sphere proximity tests
//!
//! Every entity is a sphere (projectiles are spheres of the hit radius), so a
//! collision is just a center distance against a radius sum. The boundary is
//! exclusive: spheres exactly touching do not collide.

use glam::Vec3;

/// A spherical collision proxy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    #[inline]
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// True iff `|a - b| < ra + rb`
///
/// Compared in squared space; the reach is non-negative so this is exact.
#[inline]
pub fn spheres_overlap(a: &Sphere, b: &Sphere) -> bool {
    let reach = a.radius + b.radius;
    a.center.distance_squared(b.center) < reach * reach
}

/// Candidate search for the pairwise tests
///
/// The brute-force scan is fine at tens of entities. A spatial index can be
/// dropped in behind this trait without touching the callers.
pub trait BroadPhase {
    /// Push the indices of `targets` overlapping `subject` into `out`, in index order
    fn query(&mut self, subject: &Sphere, targets: &[Sphere], out: &mut Vec<usize>);

    /// First target overlapping `subject`
    fn first_hit(&mut self, subject: &Sphere, targets: &[Sphere]) -> Option<usize> {
        let mut out = Vec::new();
        self.query(subject, targets, &mut out);
        out.first().copied()
    }
}

/// O(n) scan over every target
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForce;

impl BroadPhase for BruteForce {
    fn query(&mut self, subject: &Sphere, targets: &[Sphere], out: &mut Vec<usize>) {
        out.extend(
            targets
                .iter()
                .enumerate()
                .filter(|(_, t)| spheres_overlap(subject, t))
                .map(|(i, _)| i),
        );
    }

    fn first_hit(&mut self, subject: &Sphere, targets: &[Sphere]) -> Option<usize> {
        targets.iter().position(|t| spheres_overlap(subject, t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_touching_spheres_do_not_collide() {
        let a = Sphere::new(Vec3::ZERO, 0.5);
        let b = Sphere::new(Vec3::new(0.75, 0.0, 0.0), 0.25);
        assert!(!spheres_overlap(&a, &b));
    }

    #[test]
    fn test_just_inside_collides() {
        let a = Sphere::new(Vec3::ZERO, 0.5);
        let b = Sphere::new(Vec3::new(0.75 - 1e-4, 0.0, 0.0), 0.25);
        assert!(spheres_overlap(&a, &b));
    }

    #[test]
    fn test_distance_is_3d() {
        let a = Sphere::new(Vec3::ZERO, 0.5);
        // Close in x/y but far behind in z
        let b = Sphere::new(Vec3::new(0.1, 0.1, -10.0), 0.3);
        assert!(!spheres_overlap(&a, &b));
    }

    #[test]
    fn test_brute_force_order() {
        let subject = Sphere::new(Vec3::ZERO, 1.0);
        let targets = [
            Sphere::new(Vec3::new(5.0, 0.0, 0.0), 0.1),
            Sphere::new(Vec3::new(0.5, 0.0, 0.0), 0.1),
            Sphere::new(Vec3::new(0.0, 0.5, 0.0), 0.1),
        ];
        let mut out = Vec::new();
        BruteForce.query(&subject, &targets, &mut out);
        assert_eq!(out, vec![1, 2]);
        assert_eq!(BruteForce.first_hit(&subject, &targets), Some(1));
        assert_eq!(BruteForce.first_hit(&subject, &targets[..1]), None);
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(
            ax in -10.0f32..10.0, ay in -10.0f32..10.0, az in -10.0f32..10.0,
            bx in -10.0f32..10.0, by in -10.0f32..10.0, bz in -10.0f32..10.0,
            ra in 0.0f32..3.0, rb in 0.0f32..3.0,
        ) {
            let a = Sphere::new(Vec3::new(ax, ay, az), ra);
            let b = Sphere::new(Vec3::new(bx, by, bz), rb);
            prop_assert_eq!(spheres_overlap(&a, &b), spheres_overlap(&b, &a));
        }

        #[test]
        fn far_apart_never_overlap(offset in 6.01f32..100.0, ra in 0.0f32..3.0, rb in 0.0f32..3.0) {
            let a = Sphere::new(Vec3::ZERO, ra);
            let b = Sphere::new(Vec3::new(0.0, 0.0, offset), rb);
            prop_assert!(!spheres_overlap(&a, &b));
        }
    }
}
