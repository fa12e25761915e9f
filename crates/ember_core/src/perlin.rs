//! Gradient (Perlin) noise with turbulence.

use ember_math::Vec3;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

const POINT_COUNT: usize = 256;

/// Default number of octaves summed by [`Perlin::turb`].
pub const DEFAULT_TURBULENCE_DEPTH: u32 = 7;

/// Lattice of random unit gradients addressed through three permutation
/// tables, one per axis.
#[derive(Clone)]
pub struct Perlin {
    ranvec: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    /// Build a new noise lattice from the given random stream.
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let ranvec = (0..POINT_COUNT)
            .map(|_| random_unit_gradient(rng))
            .collect();

        Self {
            ranvec,
            perm_x: generate_perm(rng),
            perm_y: generate_perm(rng),
            perm_z: generate_perm(rng),
        }
    }

    /// Smoothly interpolated noise in roughly [-1, 1].
    pub fn noise(&self, p: Vec3) -> f32 {
        let floor = p.floor();
        let u = p.x - floor.x;
        let v = p.y - floor.y;
        let w = p.z - floor.z;

        let i = floor.x as i32;
        let j = floor.y as i32;
        let k = floor.z as i32;

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, cell) in row.iter_mut().enumerate() {
                    let index = self.perm_x[wrap(i + di as i32)]
                        ^ self.perm_y[wrap(j + dj as i32)]
                        ^ self.perm_z[wrap(k + dk as i32)];
                    *cell = self.ranvec[index];
                }
            }
        }

        trilinear_interp(&c, u, v, w)
    }

    /// Sum of `depth` octaves of noise with halving weights, folded to >= 0.
    pub fn turb(&self, p: Vec3, depth: u32) -> f32 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }
}

#[inline]
fn wrap(n: i32) -> usize {
    (n & (POINT_COUNT as i32 - 1)) as usize
}

fn random_unit_gradient(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-6 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

fn generate_perm(rng: &mut dyn RngCore) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..POINT_COUNT).collect();
    perm.shuffle(rng);
    perm
}

/// Hermite-smoothed trilinear blend of the eight corner gradients.
fn trilinear_interp(c: &[[[Vec3; 2]; 2]; 2], u: f32, v: f32, w: f32) -> f32 {
    let uu = u * u * (3.0 - 2.0 * u);
    let vv = v * v * (3.0 - 2.0 * v);
    let ww = w * w * (3.0 - 2.0 * w);

    let mut accum = 0.0;
    for (i, plane) in c.iter().enumerate() {
        for (j, row) in plane.iter().enumerate() {
            for (k, gradient) in row.iter().enumerate() {
                let (fi, fj, fk) = (i as f32, j as f32, k as f32);
                let weight = Vec3::new(u - fi, v - fj, w - fk);
                accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                    * (fj * vv + (1.0 - fj) * (1.0 - vv))
                    * (fk * ww + (1.0 - fk) * (1.0 - ww))
                    * gradient.dot(weight);
            }
        }
    }
    accum
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_noise_vanishes_on_lattice_points() {
        let mut rng = StdRng::seed_from_u64(7);
        let perlin = Perlin::new(&mut rng);

        // Gradient noise is zero at integer coordinates.
        for p in [Vec3::ZERO, Vec3::new(3.0, -2.0, 5.0), Vec3::new(-10.0, 4.0, 1.0)] {
            assert!(perlin.noise(p).abs() < 1e-5, "noise({p:?}) = {}", perlin.noise(p));
        }
    }

    #[test]
    fn test_noise_is_bounded_and_deterministic() {
        let a = Perlin::new(&mut StdRng::seed_from_u64(11));
        let b = Perlin::new(&mut StdRng::seed_from_u64(11));

        for i in 0..200 {
            let p = Vec3::new(i as f32 * 0.37, i as f32 * -0.11, i as f32 * 0.73);
            let n = a.noise(p);
            assert!((-1.5..=1.5).contains(&n));
            assert_eq!(n, b.noise(p));
        }
    }

    #[test]
    fn test_turbulence_is_non_negative() {
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(3));
        for i in 0..100 {
            let p = Vec3::splat(i as f32 * 0.21);
            assert!(perlin.turb(p, DEFAULT_TURBULENCE_DEPTH) >= 0.0);
        }
    }

    #[test]
    fn test_permutations_are_complete() {
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(1));
        let mut sorted = perlin.perm_x.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..POINT_COUNT).collect::<Vec<_>>());
    }
}
