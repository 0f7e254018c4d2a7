//! Standard normal distribution.

use op_core::Real;
use std::f64::consts::PI;

/// The standard normal probability density function.
///
/// `φ(x) = exp(-x²/2) / √(2π)`
#[inline]
pub fn normal_pdf(x: Real) -> Real {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// The standard normal cumulative distribution function Φ(x).
///
/// Zelen-Severo polynomial approximation (Abramowitz & Stegun 26.2.17):
/// the upper tail `φ(x)·P(t)` with `t = 1/(1 + 0.2316419·|x|)` and a
/// fifth-order polynomial `P`. Maximum absolute error < 7.5×10⁻⁸.
/// Negative arguments use `Φ(−x) = 1 − Φ(x)`.
pub fn normal_cdf(x: Real) -> Real {
    if x == 0.0 {
        return 0.5;
    }
    let t = 1.0 / (1.0 + 0.231_641_9 * x.abs());
    let poly = t
        * (0.319_381_530
            + t * (-0.356_563_782
                + t * (1.781_477_937 + t * (-1.821_255_978 + t * 1.330_274_429))));
    let tail = poly * normal_pdf(x);
    if x > 0.0 {
        1.0 - tail
    } else {
        tail
    }
}
