//! Random sources and derived generators.
//!
//! Every Monte Carlo engine draws through the [`RandomSource`] trait, so a
//! seeded Mersenne Twister, any `rand` generator, or a replayed fixed
//! sequence can be injected interchangeably. Only uniform draws are
//! required from an implementation; standard normals (Box-Muller) and gamma
//! durations are derived from them.

mod gamma;

use op_core::{ensure, GammaMethod, Real, Result};
use rand::{Rng, RngCore, SeedableRng};
use rand_mt::Mt19937GenRand64;
use std::f64::consts::PI;
use std::fmt;

pub use gamma::{erlang_duration, marsaglia_tsang_duration, MAX_ERLANG_SHAPE};

/// A stream of independent uniform draws on the open interval `(0, 1)`.
pub trait RandomSource {
    /// Next uniform deviate in `(0, 1)`. Must never return exactly 0.
    fn next_uniform(&mut self) -> Real;

    /// Next standard-normal deviate via Box-Muller.
    ///
    /// Consumes two uniforms `u1, u2` and returns
    /// `√(−2·ln u1)·cos(2π·u2)`; the sine branch is discarded.
    fn next_standard_normal(&mut self) -> Real {
        let u1 = self.next_uniform();
        let u2 = self.next_uniform();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Gamma(shape, scale) draw using the Marsaglia-Tsang sampler.
    fn next_gamma_duration(&mut self, shape: Real, scale: Real) -> Real {
        marsaglia_tsang_duration(self, shape, scale)
    }

    /// Gamma draw as `−ln(∏ uᵢ)·scale` over `ceil(shape)` uniforms.
    ///
    /// Exact for integer shapes only.
    fn next_erlang_duration(&mut self, shape: Real, scale: Real) -> Real {
        erlang_duration(self, shape, scale)
    }

    /// Gamma draw with an explicitly chosen sampler.
    fn next_duration(&mut self, method: GammaMethod, shape: Real, scale: Real) -> Real {
        match method {
            GammaMethod::Erlang => self.next_erlang_duration(shape, scale),
            GammaMethod::MarsagliaTsang => self.next_gamma_duration(shape, scale),
        }
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_uniform(&mut self) -> Real {
        (**self).next_uniform()
    }
}

// ─── Mersenne Twister ─────────────────────────────────────────────────────────

/// A uniform pseudo-random number generator based on the Mersenne Twister
/// MT19937-64 algorithm.
#[derive(Clone)]
pub struct MersenneTwisterUniformRng {
    rng: Mt19937GenRand64,
}

impl MersenneTwisterUniformRng {
    /// Create a new generator with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mt19937GenRand64::new(seed),
        }
    }

    /// Generate the next uniform deviate in `(0, 1)`.
    pub fn next_real(&mut self) -> Real {
        // 53 random bits, shifted by half a step so 0 and 1 are unreachable.
        let bits = self.rng.next_u64() >> 11;
        (bits as Real + 0.5) * (1.0 / (1u64 << 53) as Real)
    }
}

impl fmt::Debug for MersenneTwisterUniformRng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MersenneTwisterUniformRng").finish_non_exhaustive()
    }
}

impl RandomSource for MersenneTwisterUniformRng {
    fn next_uniform(&mut self) -> Real {
        self.next_real()
    }
}

// ─── rand adapter ─────────────────────────────────────────────────────────────

/// Adapts any `rand` generator into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: RngCore> RngSource<R> {
    /// Wrap a generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Give the generator back.
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RngSource<rand::rngs::StdRng> {
    /// A `StdRng`-backed source with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(rand::rngs::StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> RandomSource for RngSource<R> {
    fn next_uniform(&mut self) -> Real {
        // `gen` samples [0, 1); reject the single excluded endpoint.
        loop {
            let u: Real = self.rng.gen();
            if u > 0.0 {
                return u;
            }
        }
    }
}

// ─── Fixed sequence ───────────────────────────────────────────────────────────

/// Replays a fixed list of uniforms, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<Real>,
    position: usize,
}

impl SequenceSource {
    /// Create a source from uniforms, all of which must lie in `(0, 1)`.
    pub fn new(values: Vec<Real>) -> Result<Self> {
        ensure!(!values.is_empty(), "a sequence source needs at least one value");
        for &u in &values {
            ensure!(u > 0.0 && u < 1.0, "sequence value {u} is outside (0, 1)");
        }
        Ok(Self {
            values,
            position: 0,
        })
    }

    /// Number of uniforms handed out so far.
    pub fn consumed(&self) -> usize {
        self.position
    }
}

impl RandomSource for SequenceSource {
    fn next_uniform(&mut self) -> Real {
        let u = self.values[self.position % self.values.len()];
        self.position += 1;
        u
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn mt_open_interval() {
        let mut rng = MersenneTwisterUniformRng::new(42);
        for _ in 0..10_000 {
            let x = rng.next_uniform();
            assert!(x > 0.0 && x < 1.0);
        }
    }

    #[test]
    fn mt_is_reproducible() {
        let mut a = MersenneTwisterUniformRng::new(7);
        let mut b = MersenneTwisterUniformRng::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_uniform().to_bits(), b.next_uniform().to_bits());
        }
    }

    #[test]
    fn box_muller_uses_cosine_branch() {
        // u1 = e^{-2} gives √(−2 ln u1) = 2; u2 = 1/2 gives cos(π) = −1.
        let mut src = SequenceSource::new(vec![(-2.0_f64).exp(), 0.5]).unwrap();
        let z = src.next_standard_normal();
        assert_abs_diff_eq!(z, -2.0, epsilon = 1e-12);
        assert_eq!(src.consumed(), 2);
    }

    #[test]
    fn standard_normal_moments() {
        let mut rng = MersenneTwisterUniformRng::new(2024);
        let n = 100_000;
        let samples: Vec<Real> = (0..n).map(|_| rng.next_standard_normal()).collect();
        let mean = samples.iter().sum::<Real>() / n as Real;
        let var = samples.iter().map(|z| (z - mean).powi(2)).sum::<Real>() / (n - 1) as Real;
        assert!(mean.abs() < 0.02, "mean {mean}");
        assert!((var - 1.0).abs() < 0.03, "variance {var}");
    }

    #[test]
    fn rng_source_adapter() {
        let mut src = RngSource::seeded(99);
        for _ in 0..1_000 {
            let u = src.next_uniform();
            assert!(u > 0.0 && u < 1.0);
        }
    }

    #[test]
    fn sequence_source_rejects_endpoints() {
        assert!(SequenceSource::new(vec![]).is_err());
        assert!(SequenceSource::new(vec![0.5, 0.0]).is_err());
        assert!(SequenceSource::new(vec![1.0]).is_err());
    }

    #[test]
    fn sequence_source_wraps() {
        let mut src = SequenceSource::new(vec![0.25, 0.75]).unwrap();
        let drawn: Vec<Real> = (0..5).map(|_| src.next_uniform()).collect();
        assert_eq!(drawn, vec![0.25, 0.75, 0.25, 0.75, 0.25]);
    }

    #[test]
    fn dyn_source_is_usable() {
        let mut mt = MersenneTwisterUniformRng::new(1);
        let src: &mut dyn RandomSource = &mut mt;
        let g = src.next_duration(GammaMethod::Erlang, 2.0, 0.5);
        assert!(g > 0.0);
    }
}
