//! Axis-aligned bounding boxes
//!
//! Local boxes are fixed per mesh; world boxes are rebuilt every frame by
//! pushing the eight local corners through the mesh's world matrix.

use glam::{Affine3A, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Overlap test (touching faces count as overlap)
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Smallest axis-aligned box enclosing this box under `transform`
    pub fn transformed(&self, transform: &Affine3A) -> Aabb {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for corner in self.corners() {
            let p = transform.transform_point3(corner);
            min = min.min(p);
            max = max.max(p);
        }
        Aabb { min, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn test_intersects() {
        let a = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_center_half_extents(Vec3::new(1.5, 0.0, 0.0), Vec3::ONE);
        let c = Aabb::from_center_half_extents(Vec3::new(3.0, 0.0, 0.0), Vec3::splat(0.5));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_separated_on_one_axis_only() {
        let a = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_center_half_extents(Vec3::new(0.0, 0.0, 2.5), Vec3::ONE);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_translation_moves_box() {
        let local = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5));
        let world = local.transformed(&Affine3A::from_translation(Vec3::new(2.0, 1.0, 0.0)));
        assert!((world.center() - Vec3::new(2.0, 1.0, 0.0)).length() < 1e-6);
        assert!((world.half_extents() - Vec3::splat(0.5)).length() < 1e-6);
    }

    #[test]
    fn test_rotation_grows_box() {
        let local = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.5));
        let world = local.transformed(&Affine3A::from_quat(Quat::from_rotation_z(FRAC_PI_4)));
        let expected = std::f32::consts::SQRT_2;
        assert!((world.half_extents().x - expected).abs() < 1e-5);
        assert!((world.half_extents().y - expected).abs() < 1e-5);
        assert!((world.half_extents().z - 0.5).abs() < 1e-5);
    }
}
