//! Coherent gradient noise seeded from a [`WorldRng`].

use ::noise::{NoiseFn, Simplex};

use super::rng::WorldRng;

/// 2D and 3D simplex noise whose permutation table comes from a `WorldRng`.
///
/// Building the sampler consumes one value from the generator, so the noise
/// pattern is as reproducible as the generator itself. Samples are continuous
/// and lie approximately in `[-1, 1]`.
pub struct GradientNoise {
    simplex: Simplex,
}

impl GradientNoise {
    /// Creates a sampler, drawing its table seed from `rng`.
    pub fn new(rng: &mut WorldRng) -> Self {
        GradientNoise {
            simplex: Simplex::new(rng.next_u32()),
        }
    }

    /// 2D sample.
    #[inline]
    pub fn noise2(&self, x: f64, y: f64) -> f64 {
        self.simplex.get([x, y])
    }

    /// 3D sample.
    #[inline]
    pub fn noise3(&self, x: f64, y: f64, z: f64) -> f64 {
        self.simplex.get([x, y, z])
    }
}
