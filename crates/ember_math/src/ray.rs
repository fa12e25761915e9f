use crate::Vec3;

/// A ray with origin, direction and time.
///
/// The direction is not normalized; intersection routines work in the ray's
/// own parameterization. `time` selects the instant a moving primitive is
/// sampled at, which is how motion blur enters the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
    time: f32,
}

impl Ray {
    /// Create a new ray.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3, time: f32) -> Self {
        Self {
            origin,
            direction,
            time,
        }
    }

    /// Create a ray at time 0.
    #[inline]
    pub fn new_simple(origin: Vec3, direction: Vec3) -> Self {
        Self::new(origin, direction, 0.0)
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// P(t) = origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::Z, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0), 0.0);

        assert_eq!(ray.at(0.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(ray.at(1.0), Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(ray.at(-0.5), Vec3::new(1.0, -1.0, 0.0));
    }

    #[test]
    fn test_ray_keeps_time() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Y, 0.75);
        assert_eq!(ray.time(), 0.75);
        assert_eq!(Ray::new_simple(Vec3::ZERO, Vec3::Y).time(), 0.0);
    }
}
