//! Intersectable scene objects and HitRecord.
//!
//! The set of intersectables is closed: every primitive, wrapper and
//! composite is a variant of [`Hittable`], and `hit` / `bounding_box`
//! dispatch with a `match`. Children are held through `Arc<Hittable>` so one
//! sub-tree can sit under several wrappers and a BVH leaf can reuse its only
//! child on both sides.

use std::sync::Arc;

use crate::{
    AaRect, BvhNode, ConstantMedium, Cuboid, Material, MovingSphere, Ray, RotateY, Sphere,
    Translate, Triangle,
};
use ember_math::{Aabb, Interval, Vec3};
use rand::RngCore;

/// Record of a ray-object intersection.
///
/// Borrowed from the scene for as long as the scene lives; returned by value
/// from each `hit` call.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a Material,
    /// UV texture coordinates
    pub u: f32,
    pub v: f32,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record at `ray.at(t)`, orienting `outward_normal` against the
    /// ray.
    pub fn new(
        ray: &Ray,
        t: f32,
        outward_normal: Vec3,
        (u, v): (f32, f32),
        material: &'a Material,
    ) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            u,
            v,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        // If the ray and normal point in the same direction, we're inside
        self.front_face = ray.direction().dot(outward_normal) < 0.0;

        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Every kind of object a ray can be tested against.
pub enum Hittable {
    Sphere(Sphere),
    MovingSphere(MovingSphere),
    Triangle(Triangle),
    Rect(AaRect),
    Cuboid(Cuboid),
    Translate(Translate),
    RotateY(RotateY),
    Bvh(BvhNode),
    List(HittableList),
    ConstantMedium(ConstantMedium),
}

impl Hittable {
    /// Closest intersection with `ray` inside `ray_t`, if any.
    ///
    /// The RNG is only consumed by participating media, which sample a
    /// scattering distance inside `hit`.
    pub fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        match self {
            Hittable::Sphere(sphere) => sphere.hit(ray, ray_t),
            Hittable::MovingSphere(sphere) => sphere.hit(ray, ray_t),
            Hittable::Triangle(triangle) => triangle.hit(ray, ray_t),
            Hittable::Rect(rect) => rect.hit(ray, ray_t),
            Hittable::Cuboid(cuboid) => cuboid.hit(ray, ray_t, rng),
            Hittable::Translate(translate) => translate.hit(ray, ray_t, rng),
            Hittable::RotateY(rotate) => rotate.hit(ray, ray_t, rng),
            Hittable::Bvh(node) => node.hit(ray, ray_t, rng),
            Hittable::List(list) => list.hit(ray, ray_t, rng),
            Hittable::ConstantMedium(medium) => medium.hit(ray, ray_t, rng),
        }
    }

    /// Box enclosing the object over the time interval `[time0, time1]`.
    ///
    /// `None` means the object is unbounded (or empty) and cannot be placed
    /// in a BVH.
    pub fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        match self {
            Hittable::Sphere(sphere) => Some(sphere.bounding_box()),
            Hittable::MovingSphere(sphere) => Some(sphere.bounding_box(time0, time1)),
            Hittable::Triangle(triangle) => Some(triangle.bounding_box()),
            Hittable::Rect(rect) => Some(rect.bounding_box()),
            Hittable::Cuboid(cuboid) => Some(cuboid.bounding_box()),
            Hittable::Translate(translate) => translate.bounding_box(time0, time1),
            Hittable::RotateY(rotate) => rotate.bounding_box(time0, time1),
            Hittable::Bvh(node) => Some(node.bounding_box()),
            Hittable::List(list) => list.bounding_box(time0, time1),
            Hittable::ConstantMedium(medium) => medium.bounding_box(time0, time1),
        }
    }

    /// Wrap in an `Arc` for sharing between parents.
    pub fn shared(self) -> Arc<Hittable> {
        Arc::new(self)
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Hittable {
                fn from(object: $ty) -> Self {
                    Hittable::$variant(object)
                }
            }
        )*
    };
}

impl_from_variant! {
    Sphere => Sphere,
    MovingSphere => MovingSphere,
    Triangle => Triangle,
    Rect => AaRect,
    Cuboid => Cuboid,
    Translate => Translate,
    RotateY => RotateY,
    Bvh => BvhNode,
    List => HittableList,
    ConstantMedium => ConstantMedium,
}

/// An ordered list of hittable objects, tested linearly.
#[derive(Clone, Default)]
pub struct HittableList {
    objects: Vec<Arc<Hittable>>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: impl Into<Hittable>) {
        self.objects.push(Arc::new(object.into()));
    }

    /// Add an object that is also referenced elsewhere.
    pub fn add_shared(&mut self, object: Arc<Hittable>) {
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[Arc<Hittable>] {
        &self.objects
    }

    pub fn into_objects(self) -> Vec<Arc<Hittable>> {
        self.objects
    }

    /// Clear all objects from the list.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Closest hit across all members, shrinking `t_max` as hits are found.
    pub fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let mut closest: Option<HitRecord<'a>> = None;

        for object in &self.objects {
            let t_max = closest.map_or(ray_t.max, |rec| rec.t);
            if let Some(rec) = object.hit(ray, ray_t.with_max(t_max), rng) {
                closest = Some(rec);
            }
        }

        closest
    }

    /// Union of the members' boxes. `None` if the list is empty or any
    /// member is unbounded.
    pub fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        if self.objects.is_empty() {
            return None;
        }

        self.objects.iter().try_fold(Aabb::EMPTY, |acc, object| {
            object
                .bounding_box(time0, time1)
                .map(|bbox| Aabb::surrounding(&acc, &bbox))
        })
    }
}

impl FromIterator<Hittable> for HittableList {
    fn from_iter<I: IntoIterator<Item = Hittable>>(iter: I) -> Self {
        Self {
            objects: iter.into_iter().map(Arc::new).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lambertian;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grey() -> Arc<Material> {
        Arc::new(Lambertian::new(Vec3::splat(0.5)).into())
    }

    #[test]
    fn test_set_face_normal_flips_against_ray() {
        let material = Material::from(Lambertian::new(Vec3::ONE));

        // Ray travelling along -z hits a surface whose outward normal is +z
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0));
        let rec = HitRecord::new(&ray, 1.0, Vec3::Z, (0.0, 0.0), &material);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);

        // Same surface seen from behind
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, -1.0), Vec3::Z);
        let rec = HitRecord::new(&ray, 1.0, Vec3::Z, (0.0, 0.0), &material);
        assert!(!rec.front_face);
        assert_eq!(rec.normal, -Vec3::Z);
    }

    #[test]
    fn test_list_returns_closest_hit() {
        let mut list = HittableList::new();
        list.add(Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0, grey()));
        list.add(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, grey()));
        list.add(Sphere::new(Vec3::new(0.0, 0.0, -6.0), 1.0, grey()));

        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let rec = list
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .expect("ray should hit the list");

        assert!((rec.t - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_list_misses_and_has_no_box() {
        let list = HittableList::new();
        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::X);

        assert!(list.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng).is_none());
        assert!(list.bounding_box(0.0, 1.0).is_none());
    }

    #[test]
    fn test_list_box_is_union() {
        let mut list = HittableList::new();
        list.add(Sphere::new(Vec3::new(-5.0, 0.0, 0.0), 1.0, grey()));
        list.add(Sphere::new(Vec3::new(5.0, 2.0, 0.0), 1.0, grey()));

        let bbox = list.bounding_box(0.0, 1.0).expect("bounded list");
        assert_eq!(bbox.min_corner(), Vec3::new(-6.0, -1.0, -1.0));
        assert_eq!(bbox.max_corner(), Vec3::new(6.0, 3.0, 1.0));
    }

    #[test]
    fn test_list_box_fails_with_unbounded_member() {
        let mut list = HittableList::new();
        list.add(Sphere::new(Vec3::ZERO, 1.0, grey()));
        // An empty nested list reports no box.
        list.add(HittableList::new());

        assert!(list.bounding_box(0.0, 1.0).is_none());
    }
}
