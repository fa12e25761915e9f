//! Ember Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for physically-based rendering: spheres (static
//! and moving), triangles, axis-aligned rectangles and boxes, instancing
//! transforms and constant-density volumes, organized in a BVH and shaded
//! with diffuse, metal, glass, emissive and isotropic materials.
//!
//! Scenes are immutable once built and shared read-only between the rayon
//! workers of [`render_parallel`].

mod bucket;
mod bvh;
mod camera;
mod constant_medium;
mod cuboid;
mod error;
mod hittable;
mod material;
mod ppm;
mod rect;
mod renderer;
mod sampling;
mod sphere;
mod transform;
mod triangle;

pub use bucket::{
    generate_buckets, render_bucket, render_parallel, Bucket, BucketResult, DEFAULT_BUCKET_SIZE,
};
pub use bvh::{build_world, BvhNode, TraversalStats};
pub use camera::{Camera, CameraConfig};
pub use constant_medium::ConstantMedium;
pub use cuboid::Cuboid;
pub use error::{SceneError, SceneResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterResult,
};
pub use ppm::{save_ppm, write_ppm};
pub use rect::{AaRect, Plane};
pub use renderer::{
    color_to_rgb8, linear_to_gamma, ray_color, render, render_pixel, Background, ImageBuffer,
    RenderConfig,
};
pub use sphere::{MovingSphere, Sphere};
pub use transform::{RotateY, Translate};
pub use triangle::Triangle;

/// Re-export Vec3 and common math types from ember_math
pub use ember_math::{Aabb, Interval, Ray, Vec3};

/// Re-export texture types from ember_core
pub use ember_core::{Color, Texture};
