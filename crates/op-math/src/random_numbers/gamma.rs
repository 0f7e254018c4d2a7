//! Gamma-distributed durations built on uniform draws.

use super::RandomSource;
use op_core::Real;

/// Largest shape [`erlang_duration`] is asked to draw; each unit of shape
/// costs one uniform per path.
pub const MAX_ERLANG_SHAPE: Real = 1.0e6;

/// Gamma(shape, scale) via the Marsaglia-Tsang squeeze/rejection method.
///
/// Shapes below one are boosted: `G(shape) = G(shape + 1)·U^(1/shape)`.
/// A non-positive shape returns `0.0` so a zero-length horizon has no
/// time change.
pub fn marsaglia_tsang_duration<R: RandomSource + ?Sized>(
    rng: &mut R,
    shape: Real,
    scale: Real,
) -> Real {
    if shape <= 0.0 {
        return 0.0;
    }
    if shape < 1.0 {
        let boosted = marsaglia_tsang_duration(rng, shape + 1.0, 1.0);
        let u = rng.next_uniform();
        return boosted * u.powf(1.0 / shape) * scale;
    }

    let d = shape - 1.0 / 3.0;
    let c = 1.0 / (9.0 * d).sqrt();
    loop {
        let x = rng.next_standard_normal();
        let v = 1.0 + c * x;
        if v <= 0.0 {
            continue;
        }
        let v = v * v * v;
        let u = rng.next_uniform();
        let x2 = x * x;
        if u < 1.0 - 0.0331 * x2 * x2 {
            return d * v * scale;
        }
        if u.ln() < 0.5 * x2 + d * (1.0 - v + v.ln()) {
            return d * v * scale;
        }
    }
}

/// Sum of `ceil(shape)` exponentials: `−Σ ln uᵢ · scale`.
///
/// Summing logarithms instead of multiplying uniforms avoids underflow for
/// large shapes. Exact only when `shape` is an integer; fractional shapes
/// are rounded up. A non-positive shape returns `0.0`.
///
/// Cost is linear in `shape`; callers should keep it at or below
/// [`MAX_ERLANG_SHAPE`].
pub fn erlang_duration<R: RandomSource + ?Sized>(rng: &mut R, shape: Real, scale: Real) -> Real {
    if shape <= 0.0 {
        return 0.0;
    }
    let n = shape.ceil() as usize;
    let mut log_sum = 0.0;
    for _ in 0..n {
        log_sum += rng.next_uniform().ln();
    }
    -log_sum * scale
}
