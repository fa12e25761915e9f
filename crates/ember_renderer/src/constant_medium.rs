//! Homogeneous participating medium (fog, smoke) inside a closed boundary.

use std::sync::Arc;

use crate::material::Isotropic;
use crate::sampling::gen_f32;
use crate::{hittable::HitRecord, Hittable, Material, Ray, SceneError, SceneResult};
use ember_core::{Color, Texture};
use ember_math::{Aabb, Interval, Vec3};
use rand::RngCore;

/// Gap between the entry hit and the search for the exit hit.
const EXIT_EPSILON: f32 = 0.0001;

/// A volume of constant density bounded by a closed convex object.
///
/// Rays that enter the boundary travel an exponentially distributed free
/// path; if that path ends before the ray leaves, the medium reports a hit
/// there with its isotropic phase function as the material.
pub struct ConstantMedium {
    boundary: Arc<Hittable>,
    neg_inv_density: f32,
    phase_function: Material,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<Hittable>, density: f32, albedo: Arc<Texture>) -> SceneResult<Self> {
        if !density.is_finite() || density <= 0.0 {
            return Err(SceneError::InvalidDensity(density));
        }

        Ok(Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Material::Isotropic(Isotropic::from_texture(albedo)),
        })
    }

    pub fn from_color(boundary: Arc<Hittable>, density: f32, albedo: Color) -> SceneResult<Self> {
        Self::new(boundary, density, Arc::new(Texture::Solid(albedo)))
    }

    pub fn density(&self) -> f32 {
        -1.0 / self.neg_inv_density
    }

    pub fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let entry = self.boundary.hit(ray, Interval::UNIVERSE, rng)?;
        let exit = self
            .boundary
            .hit(ray, Interval::new(entry.t + EXIT_EPSILON, f32::INFINITY), rng)?;

        let mut t_entry = entry.t.max(ray_t.min);
        let t_exit = exit.t.min(ray_t.max);
        if t_entry >= t_exit {
            return None;
        }
        t_entry = t_entry.max(0.0);

        let ray_length = ray.direction().length();
        let distance_inside_boundary = (t_exit - t_entry) * ray_length;

        // 1 - U lies in (0, 1], so the log is finite.
        let u = 1.0 - gen_f32(rng);
        let hit_distance = self.neg_inv_density * u.ln();
        if hit_distance > distance_inside_boundary {
            return None;
        }

        let t = t_entry + hit_distance / ray_length;
        Some(HitRecord {
            p: ray.at(t),
            // Arbitrary: the phase function ignores the normal.
            normal: Vec3::X,
            material: &self.phase_function,
            u: 0.0,
            v: 0.0,
            t,
            front_face: true,
        })
    }

    pub fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.boundary.bounding_box(time0, time1)
    }
}
