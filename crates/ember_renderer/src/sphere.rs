//! Sphere primitives for ray tracing.

use std::cmp::Ordering;
use std::f32::consts::PI;
use std::sync::Arc;

use crate::{hittable::HitRecord, Material, Ray, SceneError, SceneResult};
use ember_math::{Aabb, Interval, Vec3};

/// A sphere primitive.
///
/// A negative radius keeps the same surface but turns the normals inward,
/// which is how a hollow glass shell is modelled.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>) -> Self {
        Self {
            center,
            radius,
            material,
            bbox: sphere_box(center, radius),
        }
    }

    pub fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        hit_sphere(self.center, self.radius, &self.material, ray, ray_t)
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// A sphere whose center moves linearly from `center0` at `time0` to
/// `center1` at `time1`.
pub struct MovingSphere {
    center0: Vec3,
    center1: Vec3,
    time0: f32,
    time1: f32,
    radius: f32,
    material: Arc<Material>,
}

impl MovingSphere {
    /// Fails if `time1 <= time0`, since the center could not be
    /// interpolated.
    pub fn new(
        center0: Vec3,
        center1: Vec3,
        time0: f32,
        time1: f32,
        radius: f32,
        material: Arc<Material>,
    ) -> SceneResult<Self> {
        if time1.partial_cmp(&time0) != Some(Ordering::Greater) {
            return Err(SceneError::InvalidTimeSpan { time0, time1 });
        }

        Ok(Self {
            center0,
            center1,
            time0,
            time1,
            radius,
            material,
        })
    }

    /// Center at the given time. Extrapolates outside `[time0, time1]`.
    pub fn center(&self, time: f32) -> Vec3 {
        let s = (time - self.time0) / (self.time1 - self.time0);
        self.center0 + s * (self.center1 - self.center0)
    }

    pub fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        hit_sphere(self.center(ray.time()), self.radius, &self.material, ray, ray_t)
    }

    /// Box covering the sphere at both ends of the query interval.
    pub fn bounding_box(&self, time0: f32, time1: f32) -> Aabb {
        Aabb::surrounding(
            &sphere_box(self.center(time0), self.radius),
            &sphere_box(self.center(time1), self.radius),
        )
    }
}

fn sphere_box(center: Vec3, radius: f32) -> Aabb {
    let rvec = Vec3::splat(radius.abs());
    Aabb::from_points(center - rvec, center + rvec)
}

fn hit_sphere<'a>(
    center: Vec3,
    radius: f32,
    material: &'a Material,
    ray: &Ray,
    ray_t: Interval,
) -> Option<HitRecord<'a>> {
    let oc = center - ray.origin();
    let a = ray.direction().length_squared();
    let h = ray.direction().dot(oc);
    let c = oc.length_squared() - radius * radius;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();

    // Find the nearest root in the acceptable range
    let mut root = (h - sqrtd) / a;
    if !ray_t.surrounds(root) {
        root = (h + sqrtd) / a;
        if !ray_t.surrounds(root) {
            return None;
        }
    }

    let outward_normal = (ray.at(root) - center) / radius;
    Some(HitRecord::new(
        ray,
        root,
        outward_normal,
        sphere_uv(outward_normal),
        material,
    ))
}

/// UV coordinates for a point on the unit sphere centered at the origin.
///
/// `u` runs around the Y axis starting from -X, `v` from -Y to +Y.
fn sphere_uv(p: Vec3) -> (f32, f32) {
    let theta = (-p.y).clamp(-1.0, 1.0).acos();
    let phi = (-p.z).atan2(p.x) + PI;

    (phi / (2.0 * PI), theta / PI)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;

    fn grey() -> Arc<Material> {
        Material::from(Lambertian::new(Vec3::splat(0.5))).shared()
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey());
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let rec = sphere
            .hit(&ray, Interval::new(0.001, f32::INFINITY))
            .expect("ray should hit the sphere");
        assert!((rec.t - 0.5).abs() < 0.001);
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_sphere_roots_from_outside() {
        // Unit sphere, ray from distance 5 aimed at the center: roots 4 and 6.
        let sphere = Sphere::new(Vec3::ZERO, 1.0, grey());
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

        let near = sphere
            .hit(&ray, Interval::new(0.001, f32::INFINITY))
            .expect("nearer root");
        assert!((near.t - 4.0).abs() < 1e-4);
        assert!(near.front_face);

        // Exclude the nearer root and the farther one is reported.
        let far = sphere
            .hit(&ray, Interval::new(4.5, f32::INFINITY))
            .expect("farther root");
        assert!((far.t - 6.0).abs() < 1e-4);
        assert!(!far.front_face);
        assert!((far.normal - Vec3::Z).length() < 1e-5);

        assert!(sphere.hit(&ray, Interval::new(0.001, 3.9)).is_none());
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey());
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));

        assert!(sphere.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_negative_radius_flips_normal() {
        let shell = Sphere::new(Vec3::ZERO, -1.0, grey());
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

        let rec = shell
            .hit(&ray, Interval::new(0.001, f32::INFINITY))
            .expect("hollow shell is still hit");
        assert!((rec.t - 4.0).abs() < 1e-4);
        assert!(!rec.front_face);
        assert!(shell.bounding_box().contains(Vec3::splat(0.99)));
    }

    #[test]
    fn test_sphere_uv() {
        let (u, v) = sphere_uv(Vec3::new(1.0, 0.0, 0.0));
        assert!((u - 0.5).abs() < 1e-5);
        assert!((v - 0.5).abs() < 1e-5);

        let (_, v) = sphere_uv(Vec3::new(0.0, 1.0, 0.0));
        assert!((v - 1.0).abs() < 1e-5);

        let (u, _) = sphere_uv(Vec3::new(0.0, 0.0, 1.0));
        assert!((u - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_moving_sphere_follows_ray_time() {
        let sphere = MovingSphere::new(
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::new(0.0, 2.0, -5.0),
            0.0,
            1.0,
            0.5,
            grey(),
        )
        .expect("valid time span");

        assert_eq!(sphere.center(0.5), Vec3::new(0.0, 1.0, -5.0));

        let at_start = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let at_end = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 1.0);
        let interval = Interval::new(0.001, f32::INFINITY);

        assert!(sphere.hit(&at_start, interval).is_some());
        assert!(sphere.hit(&at_end, interval).is_none());

        let raised = Ray::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 0.0, -1.0), 1.0);
        let rec = sphere.hit(&raised, interval).expect("hit at the end position");
        assert!((rec.t - 4.5).abs() < 1e-4);
    }

    #[test]
    fn test_moving_sphere_box_spans_motion() {
        let sphere = MovingSphere::new(
            Vec3::ZERO,
            Vec3::new(4.0, 0.0, 0.0),
            0.0,
            1.0,
            1.0,
            grey(),
        )
        .expect("valid time span");

        let bbox = sphere.bounding_box(0.0, 1.0);
        assert_eq!(bbox.min_corner(), Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(bbox.max_corner(), Vec3::new(5.0, 1.0, 1.0));

        // Only the first half of the shutter
        let half = sphere.bounding_box(0.0, 0.5);
        assert_eq!(half.max_corner().x, 3.0);
    }

    #[test]
    fn test_moving_sphere_rejects_empty_time_span() {
        let result = MovingSphere::new(Vec3::ZERO, Vec3::X, 1.0, 1.0, 1.0, grey());
        assert!(matches!(
            result,
            Err(SceneError::InvalidTimeSpan { time0, time1 }) if time0 == 1.0 && time1 == 1.0
        ));
    }
}
