//! Instancing wrappers that move a child object without copying it.
//!
//! The ray is brought into the child's local frame, intersected there, and
//! the hit is brought back. `front_face` is kept from the child: a rigid
//! motion applied to both the ray and the surface does not change which side
//! was hit.

use std::sync::Arc;

use crate::{hittable::HitRecord, Hittable, Ray};
use ember_math::{Aabb, Interval, Vec3};
use rand::RngCore;

/// Child displaced by a constant offset.
pub struct Translate {
    child: Arc<Hittable>,
    offset: Vec3,
}

impl Translate {
    pub fn new(child: Arc<Hittable>, offset: Vec3) -> Self {
        Self { child, offset }
    }

    pub fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let local = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());

        let mut rec = self.child.hit(&local, ray_t, rng)?;
        rec.p += self.offset;
        Some(rec)
    }

    pub fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.child
            .bounding_box(time0, time1)
            .map(|bbox| bbox.translate(self.offset))
    }
}

/// Child rotated about the Y axis.
pub struct RotateY {
    child: Arc<Hittable>,
    sin_theta: f32,
    cos_theta: f32,
}

impl RotateY {
    /// Positive angles rotate counter-clockwise looking down -Y.
    pub fn new(child: Arc<Hittable>, angle_degrees: f32) -> Self {
        let (sin_theta, cos_theta) = angle_degrees.to_radians().sin_cos();
        Self {
            child,
            sin_theta,
            cos_theta,
        }
    }

    /// World to object space.
    #[inline]
    fn to_local(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x - self.sin_theta * v.z,
            v.y,
            self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }

    /// Object to world space.
    #[inline]
    fn to_world(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x + self.sin_theta * v.z,
            v.y,
            -self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }

    pub fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let local = Ray::new(
            self.to_local(ray.origin()),
            self.to_local(ray.direction()),
            ray.time(),
        );

        let mut rec = self.child.hit(&local, ray_t, rng)?;
        rec.p = self.to_world(rec.p);
        rec.normal = self.to_world(rec.normal);
        Some(rec)
    }

    /// Box around the eight rotated corners of the child's box.
    pub fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        let bbox = self.child.bounding_box(time0, time1)?;
        let (lo, hi) = (bbox.min_corner(), bbox.max_corner());

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);

        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            );
            let rotated = self.to_world(corner);
            min = min.min(rotated);
            max = max.max(rotated);
        }

        Some(Aabb::from_points(min, max))
    }
}
