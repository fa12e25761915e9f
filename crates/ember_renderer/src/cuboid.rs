//! Axis-aligned box built from six rectangles.

use std::sync::Arc;

use crate::hittable::{HitRecord, HittableList};
use crate::{AaRect, Material, Ray};
use ember_math::{Aabb, Interval, Vec3};
use rand::RngCore;

/// A closed box. Every face has its outward normal pointing away from the
/// interior, so rays inside see back faces.
pub struct Cuboid {
    min: Vec3,
    max: Vec3,
    sides: HittableList,
}

impl Cuboid {
    /// Box between two opposite corners, in any order.
    pub fn new(p0: Vec3, p1: Vec3, material: Arc<Material>) -> Self {
        let min = p0.min(p1);
        let max = p0.max(p1);

        let x = (min.x, max.x);
        let y = (min.y, max.y);
        let z = (min.z, max.z);

        let mut sides = HittableList::new();
        sides.add(AaRect::xy(x, y, max.z, material.clone()));
        sides.add(AaRect::xy(x, y, min.z, material.clone()).flipped());
        sides.add(AaRect::xz(x, z, max.y, material.clone()));
        sides.add(AaRect::xz(x, z, min.y, material.clone()).flipped());
        sides.add(AaRect::yz(y, z, max.x, material.clone()));
        sides.add(AaRect::yz(y, z, min.x, material).flipped());

        Self { min, max, sides }
    }

    pub fn min(&self) -> Vec3 {
        self.min
    }

    pub fn max(&self) -> Vec3 {
        self.max
    }

    pub fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        self.sides.hit(ray, ray_t, rng)
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points(self.min, self.max)
    }
}
