//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Iterative bounce loop with configurable depth
//! - Emission from lights, solid or gradient backgrounds
//! - Anti-aliasing via multi-sampling

use std::time::Instant;

use crate::{Camera, Color, Hittable, Ray};
use ember_math::Interval;
use rand::RngCore;

use crate::sampling::gen_f32;

/// Shadow acne threshold: hits closer than this to the ray origin are ignored.
const T_MIN: f32 = 0.001;

/// What a ray sees when it escapes the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    Solid(Color),
    /// Linear blend from `bottom` (straight down) to `top` (straight up).
    Gradient { bottom: Color, top: Color },
}

impl Background {
    /// White to light blue, the classic daylight sky.
    pub fn sky() -> Self {
        Background::Gradient {
            bottom: Color::ONE,
            top: Color::new(0.5, 0.7, 1.0),
        }
    }

    pub fn color(&self, ray: &Ray) -> Color {
        match *self {
            Background::Solid(color) => color,
            Background::Gradient { bottom, top } => {
                let unit_direction = ray.direction().normalize();
                let a = 0.5 * (unit_direction.y + 1.0);
                bottom * (1.0 - a) + top * a
            }
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Color::ZERO)
    }
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub image_width: u32,
    pub image_height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Background color when ray doesn't hit anything
    pub background: Background,
    /// Base seed for every random stream of the render
    pub seed: u64,
    /// Edge length of the square tiles rendered in parallel
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_width: 600,
            image_height: 337,
            samples_per_pixel: 20,
            max_depth: 20,
            background: Background::sky(),
            seed: 0,
            bucket_size: crate::DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderConfig {
    /// Set the width and derive the height from an aspect ratio.
    pub fn with_width(mut self, image_width: u32, aspect_ratio: f32) -> Self {
        self.image_width = image_width.max(1);
        self.image_height = ((image_width as f32 / aspect_ratio) as u32).max(1);
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Compute the color seen by a ray.
///
/// Follows the path for at most `depth` bounces. Each surface adds its
/// emission weighted by the attenuation accumulated so far; an absorbed ray
/// ends the path, an escaped ray picks up the background, and a path that
/// runs out of bounces contributes nothing more.
pub fn ray_color(
    ray: &Ray,
    world: &Hittable,
    background: &Background,
    depth: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut ray = *ray;
    let mut throughput = Color::ONE;
    let mut radiance = Color::ZERO;

    for _ in 0..depth {
        let Some(rec) = world.hit(&ray, Interval::new(T_MIN, f32::INFINITY), rng) else {
            return radiance + throughput * background.color(&ray);
        };

        radiance += throughput * rec.material.emitted(rec.u, rec.v, rec.p);

        match rec.material.scatter(&ray, &rec, rng) {
            Some(result) => {
                throughput *= result.attenuation;
                ray = result.scattered;
            }
            None => return radiance,
        }
    }

    radiance
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Map one averaged linear channel to a byte: NaN to 0, gamma 2, clamp
/// just below 1 and scale by 256.
#[inline]
fn channel_to_u8(linear: f32) -> u8 {
    let linear = if linear.is_nan() { 0.0 } else { linear };
    (256.0 * linear_to_gamma(linear).clamp(0.0, 0.999)) as u8
}

/// Convert an averaged linear color to 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    [
        channel_to_u8(color.x),
        channel_to_u8(color.y),
        channel_to_u8(color.z),
    ]
}

/// Render a single pixel with multi-sampling.
///
/// `(x, y)` are image coordinates with `y = 0` the top row; the camera's
/// viewport has its origin at the bottom-left, so rows are flipped here.
pub fn render_pixel(
    camera: &Camera,
    world: &Hittable,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let width_span = config.image_width.saturating_sub(1).max(1) as f32;
    let height_span = config.image_height.saturating_sub(1).max(1) as f32;
    let row = config.image_height.saturating_sub(1) - y;

    let mut pixel_color = Color::ZERO;
    for _ in 0..config.samples_per_pixel {
        let s = (x as f32 + gen_f32(rng)) / width_span;
        let t = (row as f32 + gen_f32(rng)) / height_span;

        let ray = camera.get_ray(s, t, rng);
        pixel_color += ray_color(&ray, world, &config.background, config.max_depth, rng);
    }

    // Average the samples
    pixel_color / config.samples_per_pixel.max(1) as f32
}

/// Linear colors of a finished render, row-major, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Convert to RGB bytes, three per pixel.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|color| color_to_rgb8(*color))
            .collect()
    }
}

/// Render the entire scene to an image buffer.
///
/// This is a simple single-threaded renderer driven by one RNG; see
/// [`crate::render_parallel`] for the bucketed version.
pub fn render(
    camera: &Camera,
    world: &Hittable,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> ImageBuffer {
    let start = Instant::now();
    log::info!(
        "Rendering {}x{} at {} spp, single-threaded",
        config.image_width,
        config.image_height,
        config.samples_per_pixel
    );

    let mut image = ImageBuffer::new(config.image_width, config.image_height);
    for y in 0..config.image_height {
        for x in 0..config.image_width {
            let color = render_pixel(camera, world, x, y, config, rng);
            image.set(x, y, color);
        }
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}
