//! Thin-lens camera for ray generation.

use crate::sampling::{gen_range_f32, random_in_unit_disk};
use crate::Ray;
use ember_math::Vec3;
use rand::RngCore;

/// Placement, lens and shutter settings a [`Camera`] is built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
    pub aspect_ratio: f32,
    /// Lens diameter. Zero is a pinhole.
    pub aperture: f32,
    /// Distance from camera to plane of perfect focus
    pub focus_dist: f32,
    /// Shutter open time
    pub time0: f32,
    /// Shutter close time
    pub time1: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect_ratio: 16.0 / 9.0,
            aperture: 0.0,
            focus_dist: 1.0,
            time0: 0.0,
            time1: 1.0,
        }
    }
}

impl CameraConfig {
    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, aperture: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set the interval ray times are drawn from.
    pub fn with_shutter(mut self, time0: f32, time1: f32) -> Self {
        self.time0 = time0;
        self.time1 = time1;
        self
    }
}

/// Camera for generating rays into the scene.
///
/// `(s, t) = (0, 0)` is the lower-left corner of the viewport and `(1, 1)`
/// the upper-right.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f32,
    time0: f32,
    time1: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        // Calculate viewport dimensions
        let theta = config.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = config.aspect_ratio * viewport_height;

        // Calculate camera basis vectors
        let w = (config.look_from - config.look_at).normalize();
        let u = config.vup.cross(w).normalize();
        let v = w.cross(u);

        let origin = config.look_from;
        let horizontal = config.focus_dist * viewport_width * u;
        let vertical = config.focus_dist * viewport_height * v;
        let lower_left_corner =
            origin - horizontal / 2.0 - vertical / 2.0 - config.focus_dist * w;

        Self {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            w,
            lens_radius: config.aperture / 2.0,
            time0: config.time0,
            time1: config.time1,
        }
    }

    /// Generate a ray through viewport coordinates `(s, t)`, jittered over
    /// the lens and the shutter interval.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let rd = self.lens_radius * random_in_unit_disk(rng);
        let offset = self.u * rd.x + self.v * rd.y;

        Ray::new(
            self.origin + offset,
            self.lower_left_corner + s * self.horizontal + t * self.vertical
                - self.origin
                - offset,
            gen_range_f32(rng, self.time0, self.time1),
        )
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Unit vector pointing from the scene back towards the camera.
    pub fn backward(&self) -> Vec3 {
        self.w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_center_ray_points_at_target() {
        let config = CameraConfig::default()
            .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
            .with_lens(20.0, 0.0, 10.0);
        let camera = Camera::new(&config);
        let mut rng = StdRng::seed_from_u64(0);

        let ray = camera.get_ray(0.5, 0.5, &mut rng);
        assert_eq!(ray.origin(), config.look_from);

        let expected = (config.look_at - config.look_from).normalize();
        assert!((ray.direction().normalize() - expected).length() < 1e-5);
        assert!((camera.backward() + expected).length() < 1e-5);
    }

    #[test]
    fn test_viewport_corners() {
        // 90 degree fov, square aspect, focus at 1: viewport spans [-1, 1]^2 at z = -1.
        let config = CameraConfig::default().with_aspect_ratio(1.0);
        let camera = Camera::new(&config);
        let mut rng = StdRng::seed_from_u64(0);

        let lower_left = camera.get_ray(0.0, 0.0, &mut rng);
        assert!((lower_left.direction() - Vec3::new(-1.0, -1.0, -1.0)).length() < 1e-5);

        let upper_right = camera.get_ray(1.0, 1.0, &mut rng);
        assert!((upper_right.direction() - Vec3::new(1.0, 1.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_ray_time_within_shutter() {
        let config = CameraConfig::default().with_shutter(0.25, 0.75);
        let camera = Camera::new(&config);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..1000 {
            let time = camera.get_ray(0.5, 0.5, &mut rng).time();
            assert!((0.25..0.75).contains(&time));
        }

        let still = Camera::new(&CameraConfig::default().with_shutter(0.5, 0.5));
        assert_eq!(still.get_ray(0.3, 0.3, &mut rng).time(), 0.5);
    }

    #[test]
    fn test_aperture_jitters_origin_on_lens() {
        let config = CameraConfig::default().with_lens(40.0, 2.0, 5.0);
        let camera = Camera::new(&config);
        let mut rng = StdRng::seed_from_u64(11);

        let mut moved = 0;
        for _ in 0..200 {
            let ray = camera.get_ray(0.5, 0.5, &mut rng);
            let offset = ray.origin() - camera.origin();
            assert!(offset.length() <= 1.0 + 1e-5);
            // The lens lies in the camera's u/v plane.
            assert!(offset.dot(camera.backward()).abs() < 1e-5);
            if offset.length() > 1e-3 {
                moved += 1;
            }

            // Every ray through the center converges on the focus plane.
            let focus_point = ray.origin() + ray.direction();
            assert!((focus_point - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-4);
        }
        assert!(moved > 150);
    }
}
