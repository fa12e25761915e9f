//! Materials describe how light interacts with surfaces and volumes.

use std::sync::Arc;

use crate::sampling::{gen_f32, random_in_unit_sphere, random_unit_vector};
use crate::{hittable::HitRecord, Ray};
use ember_core::{Color, Texture};
use ember_math::Vec3;
use rand::RngCore;

/// Outcome of a successful scatter: the ray to follow and the color it is
/// filtered by.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    pub attenuation: Color,
    pub scattered: Ray,
}

/// All material variants.
pub enum Material {
    Lambertian(Lambertian),
    Metal(Metal),
    Dielectric(Dielectric),
    DiffuseLight(DiffuseLight),
    Isotropic(Isotropic),
}

impl Material {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed (or the material only emits).
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match self {
            Material::Lambertian(m) => Some(m.scatter(ray_in, rec, rng)),
            Material::Metal(m) => m.scatter(ray_in, rec, rng),
            Material::Dielectric(m) => Some(m.scatter(ray_in, rec, rng)),
            Material::DiffuseLight(_) => None,
            Material::Isotropic(m) => Some(m.scatter(ray_in, rec, rng)),
        }
    }

    /// Light emitted at the given UV coordinates and point. Black for
    /// everything but lights.
    pub fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        match self {
            Material::DiffuseLight(light) => light.emit.value(u, v, p),
            _ => Color::ZERO,
        }
    }

    /// Wrap in an `Arc` for sharing between primitives.
    pub fn shared(self) -> Arc<Material> {
        Arc::new(self)
    }
}

/// Lambertian (diffuse) material.
pub struct Lambertian {
    albedo: Arc<Texture>,
}

impl Lambertian {
    /// Diffuse material with a constant albedo.
    pub fn new(albedo: Color) -> Self {
        Self::from_texture(Arc::new(Texture::Solid(albedo)))
    }

    pub fn from_texture(albedo: Arc<Texture>) -> Self {
        Self { albedo }
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> ScatterResult {
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if scatter_direction.length_squared() < 1e-8 {
            scatter_direction = rec.normal;
        }

        ScatterResult {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, scatter_direction, ray_in.time()),
        }
    }
}

/// Metal (specular) material.
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let scattered_dir = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Fuzz pushed the ray below the surface: absorb.
        if scattered_dir.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, scattered_dir, ray_in.time()),
        })
    }
}

/// Dielectric (glass) material.
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance.
    pub(crate) fn reflectance(cosine: f32, refraction_ratio: f32) -> f32 {
        let r0 = ((1.0 - refraction_ratio) / (1.0 + refraction_ratio)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> ScatterResult {
        let refraction_ratio = if rec.front_face {
            1.0 / self.ior
        } else {
            self.ior
        };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract
            || Self::reflectance(cos_theta, refraction_ratio) > gen_f32(rng)
        {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        }
    }
}

/// Diffuse light emitter. Never scatters.
pub struct DiffuseLight {
    emit: Arc<Texture>,
}

impl DiffuseLight {
    /// Create a new diffuse light with the given emission color.
    pub fn new(emit: Color) -> Self {
        Self::from_texture(Arc::new(Texture::Solid(emit)))
    }

    pub fn from_texture(emit: Arc<Texture>) -> Self {
        Self { emit }
    }
}

/// Isotropic phase function for participating media: scatters uniformly in
/// every direction.
pub struct Isotropic {
    albedo: Arc<Texture>,
}

impl Isotropic {
    pub fn new(albedo: Color) -> Self {
        Self::from_texture(Arc::new(Texture::Solid(albedo)))
    }

    pub fn from_texture(albedo: Arc<Texture>) -> Self {
        Self { albedo }
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> ScatterResult {
        ScatterResult {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, random_unit_vector(rng), ray_in.time()),
        }
    }
}

macro_rules! impl_from_material {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Material {
                fn from(material: $variant) -> Self {
                    Material::$variant(material)
                }
            }
        )*
    };
}

impl_from_material!(Lambertian, Metal, Dielectric, DiffuseLight, Isotropic);

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub(crate) fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with relative index
/// `etai_over_etat`.
#[inline]
pub(crate) fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
