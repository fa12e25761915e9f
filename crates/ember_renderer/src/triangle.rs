//! Triangle primitive for ray tracing.
//!
//! Plane intersection followed by an inside-outside test against each edge.
//! The plane through the triangle is `N·P + d = 0` with `N = (b - a) × (c - a)`
//! and `d = -N·a`, so along the ray `t = -(N·O + d) / (N·D)`.

use std::sync::Arc;

use crate::{hittable::HitRecord, Material, Ray};
use ember_math::{Aabb, Interval, Vec3};

/// Rays whose direction is this close to perpendicular to the normal are
/// treated as parallel to the triangle and miss.
const PARALLEL_EPSILON: f32 = 1e-6;

/// A triangle primitive.
pub struct Triangle {
    a: Vec3,
    b: Vec3,
    c: Vec3,
    /// Unit face normal, counter-clockwise winding
    normal: Vec3,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3, material: Arc<Material>) -> Self {
        let normal = (b - a).cross(c - a).normalize_or_zero();

        // from_points pads the thin axis of an axis-aligned triangle.
        let bbox = Aabb::from_points(a.min(b).min(c), a.max(b).max(c));

        Self {
            a,
            b,
            c,
            normal,
            material,
            bbox,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let n = self.normal;

        let n_dot_dir = n.dot(ray.direction());
        if n_dot_dir.abs() < PARALLEL_EPSILON {
            return None;
        }

        let d = -n.dot(self.a);
        let t = -(n.dot(ray.origin()) + d) / n_dot_dir;
        if !ray_t.surrounds(t) {
            return None;
        }

        let p = ray.at(t);

        // Inside-outside: P must lie on the inner side of every edge.
        let edges = [(self.a, self.b), (self.b, self.c), (self.c, self.a)];
        for (start, end) in edges {
            if n.dot((end - start).cross(p - start)) < 0.0 {
                return None;
            }
        }

        // TODO: interpolate barycentric UVs so textures map across triangles.
        Some(HitRecord::new(ray, t, n, (0.5, 0.5), &self.material))
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
