//! Axis-aligned rectangles.

use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::{hittable::HitRecord, Material, Ray};
use ember_math::{Aabb, Interval, Vec3};

/// Which pair of axes a rectangle spans. The remaining axis is fixed at `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    XY,
    XZ,
    YZ,
}

impl Plane {
    /// Axis indices `(a, b, fixed)`.
    pub fn axes(self) -> (usize, usize, usize) {
        match self {
            Plane::XY => (0, 1, 2),
            Plane::XZ => (0, 2, 1),
            Plane::YZ => (1, 2, 0),
        }
    }
}

/// A rectangle lying in an axis-aligned plane.
pub struct AaRect {
    plane: Plane,
    a: RangeInclusive<f32>,
    b: RangeInclusive<f32>,
    k: f32,
    /// Outward normal points along -axis instead of +axis
    flipped: bool,
    material: Arc<Material>,
}

impl AaRect {
    /// Bounds may be given in either order.
    pub fn new(
        plane: Plane,
        (a0, a1): (f32, f32),
        (b0, b1): (f32, f32),
        k: f32,
        material: Arc<Material>,
    ) -> Self {
        Self {
            plane,
            a: a0.min(a1)..=a0.max(a1),
            b: b0.min(b1)..=b0.max(b1),
            k,
            flipped: false,
            material,
        }
    }

    pub fn xy(x: (f32, f32), y: (f32, f32), z: f32, material: Arc<Material>) -> Self {
        Self::new(Plane::XY, x, y, z, material)
    }

    pub fn xz(x: (f32, f32), z: (f32, f32), y: f32, material: Arc<Material>) -> Self {
        Self::new(Plane::XZ, x, z, y, material)
    }

    pub fn yz(y: (f32, f32), z: (f32, f32), x: f32, material: Arc<Material>) -> Self {
        Self::new(Plane::YZ, y, z, x, material)
    }

    /// Same rectangle with the outward normal reversed.
    pub fn flipped(mut self) -> Self {
        self.flipped = !self.flipped;
        self
    }

    pub fn plane(&self) -> Plane {
        self.plane
    }

    pub fn outward_normal(&self) -> Vec3 {
        let (_, _, fixed) = self.plane.axes();
        let normal = Vec3::AXES[fixed];
        if self.flipped {
            -normal
        } else {
            normal
        }
    }

    pub fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let (a_axis, b_axis, fixed) = self.plane.axes();

        // Parallel rays give an infinite or NaN t, which `surrounds` rejects.
        let t = (self.k - ray.origin()[fixed]) / ray.direction()[fixed];
        if !ray_t.surrounds(t) {
            return None;
        }

        let p = ray.at(t);
        let (x, y) = (p[a_axis], p[b_axis]);
        if !self.a.contains(&x) || !self.b.contains(&y) {
            return None;
        }

        let u = (x - self.a.start()) / (self.a.end() - self.a.start());
        let v = (y - self.b.start()) / (self.b.end() - self.b.start());

        Some(HitRecord::new(
            ray,
            t,
            self.outward_normal(),
            (u, v),
            &self.material,
        ))
    }

    /// Box padded along the fixed axis.
    pub fn bounding_box(&self) -> Aabb {
        let (a_axis, b_axis, fixed) = self.plane.axes();

        let mut min = Vec3::ZERO;
        let mut max = Vec3::ZERO;
        min[a_axis] = *self.a.start();
        max[a_axis] = *self.a.end();
        min[b_axis] = *self.b.start();
        max[b_axis] = *self.b.end();
        min[fixed] = self.k;
        max[fixed] = self.k;

        Aabb::from_points(min, max)
    }
}
