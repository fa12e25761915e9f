//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel using rayon. Each bucket draws from its own
//! RNG, seeded from the render seed and the bucket's position in the
//! spiral order, so the image does not depend on how tiles are scheduled.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::renderer::{render_pixel, ImageBuffer};
use crate::{Camera, Color, Hittable, RenderConfig};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Private random stream for this bucket. Never equal to the stream
    /// seeded with `seed` alone.
    pub fn rng(&self, seed: u64) -> StdRng {
        let offset = (self.index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        StdRng::seed_from_u64(seed.wrapping_add(offset))
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets for an image, sorted in spiral order from center.
///
/// Buckets are rendered from the center outward so the most important part
/// of the frame finishes first.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    // Update indices after sorting
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center (spiral order). Ties keep
/// their row-major order.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let distance = |b: &Bucket| {
        let bx = b.x as f32 + b.width as f32 / 2.0;
        let by = b.y as f32 + b.height as f32 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    buckets.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }

    /// Copy the bucket's pixels into their place in the full image.
    pub fn write_into(&self, image: &mut ImageBuffer) {
        let rows = self.pixels.chunks(self.bucket.width.max(1) as usize);
        for (local_y, row) in (0u32..).zip(rows) {
            for (local_x, color) in (0u32..).zip(row) {
                image.set(self.bucket.x + local_x, self.bucket.y + local_y, *color);
            }
        }
    }
}

/// Render a single bucket with its own RNG.
///
/// Returns pixels in row-major order within the bucket.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    world: &Hittable,
    config: &RenderConfig,
) -> BucketResult {
    let mut rng = bucket.rng(config.seed);
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let global_x = bucket.x + local_x;
            let global_y = bucket.y + local_y;
            pixels.push(render_pixel(
                camera, world, global_x, global_y, config, &mut rng,
            ));
        }
    }

    BucketResult::new(*bucket, pixels)
}

/// Render the whole image, one rayon task per bucket.
pub fn render_parallel(camera: &Camera, world: &Hittable, config: &RenderConfig) -> ImageBuffer {
    let start = Instant::now();
    let buckets = generate_buckets(config.image_width, config.image_height, config.bucket_size);
    log::info!(
        "Rendering {}x{} at {} spp in {} buckets on {} threads",
        config.image_width,
        config.image_height,
        config.samples_per_pixel,
        buckets.len(),
        rayon::current_num_threads()
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| render_bucket(bucket, camera, world, config))
        .collect();

    let mut image = ImageBuffer::new(config.image_width, config.image_height);
    for result in &results {
        result.write_into(&mut image);
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Background, CameraConfig, Dielectric, HittableList, Lambertian, Material, Sphere, Vec3,
    };

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(100, 100, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid with partial buckets

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 100);
    }

    #[test]
    fn test_spiral_order() {
        let buckets = generate_buckets(192, 192, 64);
        assert_eq!(buckets.len(), 9); // 3x3 grid

        // First bucket should be the center one
        let first = &buckets[0];
        assert_eq!(first.x, 64);
        assert_eq!(first.y, 64);

        for (i, bucket) in buckets.iter().enumerate() {
            assert_eq!(bucket.index, i);
        }
    }

    #[test]
    fn test_bucket_streams_differ() {
        use rand::Rng;

        let buckets = generate_buckets(128, 128, 64);
        let a: u64 = buckets[0].rng(7).gen();
        let b: u64 = buckets[1].rng(7).gen();
        let again: u64 = buckets[0].rng(7).gen();
        assert_ne!(a, b);
        assert_eq!(a, again);
    }

    #[test]
    fn test_first_bucket_stream_differs_from_seed_stream() {
        use rand::Rng;

        let buckets = generate_buckets(600, 337, 64);
        for seed in [0, 42, u64::MAX] {
            let mut scene_rng = StdRng::seed_from_u64(seed);
            let mut bucket_rng = buckets[0].rng(seed);
            let scene: [u64; 4] = scene_rng.gen();
            let bucket: [u64; 4] = bucket_rng.gen();
            assert_ne!(scene, bucket, "seed {seed}");
        }
    }

    fn test_scene() -> (Camera, Hittable) {
        let mut list = HittableList::new();
        list.add(Sphere::new(
            Vec3::new(0.0, -100.5, -1.0),
            100.0,
            Material::from(Lambertian::new(Color::new(0.8, 0.8, 0.0))).shared(),
        ));
        list.add(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Material::from(Dielectric::new(1.5)).shared(),
        ));
        (Camera::new(&CameraConfig::default()), Hittable::List(list))
    }

    #[test]
    fn test_parallel_render_is_deterministic() {
        let (camera, world) = test_scene();
        let config = RenderConfig {
            image_width: 20,
            image_height: 12,
            samples_per_pixel: 3,
            max_depth: 6,
            background: Background::sky(),
            seed: 99,
            bucket_size: 8,
        };

        let first = render_parallel(&camera, &world, &config);
        let second = render_parallel(&camera, &world, &config);
        assert_eq!(first.to_rgb8(), second.to_rgb8());

        let reseeded = render_parallel(&camera, &world, &config.clone().with_seed(100));
        assert_ne!(first.pixels, reseeded.pixels);
    }

    #[test]
    fn test_parallel_render_ignores_thread_count() {
        let (camera, world) = test_scene();
        let config = RenderConfig {
            image_width: 24,
            image_height: 14,
            samples_per_pixel: 2,
            max_depth: 5,
            background: Background::sky(),
            seed: 5,
            bucket_size: 6,
        };

        let render_on = |threads: usize| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .expect("thread pool")
                .install(|| render_parallel(&camera, &world, &config))
        };
        let single = render_on(1);
        let multi = render_on(4);
        assert_eq!(single.pixels, multi.pixels);

        // Same image assembled one bucket at a time on this thread
        let mut serial = ImageBuffer::new(config.image_width, config.image_height);
        for bucket in generate_buckets(config.image_width, config.image_height, config.bucket_size)
        {
            render_bucket(&bucket, &camera, &world, &config).write_into(&mut serial);
        }
        assert_eq!(serial.pixels, single.pixels);
    }

    #[test]
    fn test_parallel_render_fills_every_pixel() {
        let mut list = HittableList::new();
        list.add(Sphere::new(
            Vec3::ZERO,
            1000.0,
            Material::from(crate::DiffuseLight::new(Color::ONE)).shared(),
        ));
        // Camera inside an emissive sphere sees light everywhere.
        let world = Hittable::List(list);
        let camera = Camera::new(&CameraConfig::default());
        let config = RenderConfig {
            image_width: 13,
            image_height: 7,
            samples_per_pixel: 1,
            max_depth: 2,
            background: Background::Solid(Color::ZERO),
            seed: 0,
            bucket_size: 4,
        };

        let image = render_parallel(&camera, &world, &config);
        assert!(image.pixels.iter().all(|&pixel| pixel == Color::ONE));
    }
}
