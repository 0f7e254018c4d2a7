//! Variance Gamma process.
//!
//! A Brownian motion with drift `θ` and volatility `σ`, run on a gamma
//! clock `G(t)` with unit mean rate and variance rate `ν`:
//!
//! ```text
//! X(t) = θ·G(t) + σ·W(G(t))
//! ln S(t) = ln S(0) + μ·t + X(t),   μ = r + ω
//! ω = ln(1 − θν − σ²ν/2) / ν
//! ```
//!
//! `ω` is the martingale correction; it only exists when the logarithm's
//! argument is positive, which constrains `(σ, ν, θ)` jointly.

use op_core::{ensure, ensure_constraint, GammaMethod, Price, Rate, Real, Result, Time};
use op_math::RandomSource;

/// Variance Gamma process for a single underlying with a flat rate.
#[derive(Debug, Clone, PartialEq)]
pub struct VarianceGammaProcess {
    s0: Real,
    rate: Rate,
    sigma: Real,
    nu: Real,
    theta: Real,
    omega: Real,
}

impl VarianceGammaProcess {
    /// Create a new Variance Gamma process.
    ///
    /// Fails with `InvalidInput` when `σ` or `ν` is not positive, and with
    /// `ParameterConstraintViolated` when `1 − θν − σ²ν/2 ≤ 0`. The check
    /// runs before any logarithm is taken.
    pub fn new(s0: Real, rate: Rate, sigma: Real, nu: Real, theta: Real) -> Result<Self> {
        ensure!(s0.is_finite() && s0 > 0.0, "spot must be positive, got {s0}");
        ensure!(rate.is_finite(), "risk-free rate must be finite, got {rate}");
        ensure!(sigma.is_finite() && sigma > 0.0, "VG sigma must be positive, got {sigma}");
        ensure!(nu.is_finite() && nu > 0.0, "VG nu must be positive, got {nu}");
        ensure!(theta.is_finite(), "VG theta must be finite, got {theta}");

        let omega = Self::martingale_correction(sigma, nu, theta)?;
        Ok(Self {
            s0,
            rate,
            sigma,
            nu,
            theta,
            omega,
        })
    }

    /// `ω = ln(1 − θν − σ²ν/2)/ν`, or an error if the argument is not positive.
    pub fn martingale_correction(sigma: Real, nu: Real, theta: Real) -> Result<Real> {
        let arg = 1.0 - theta * nu - 0.5 * sigma * sigma * nu;
        ensure_constraint!(
            arg > 0.0,
            "1 - theta*nu - sigma^2*nu/2 must be positive, got {arg} \
             (sigma={sigma}, nu={nu}, theta={theta})"
        );
        Ok(arg.ln() / nu)
    }

    /// Spot price.
    pub fn s0(&self) -> Real {
        self.s0
    }

    /// Diffusion volatility of the subordinated Brownian motion.
    pub fn sigma(&self) -> Real {
        self.sigma
    }

    /// Variance rate of the gamma clock.
    pub fn nu(&self) -> Real {
        self.nu
    }

    /// Drift of the subordinated Brownian motion.
    pub fn theta(&self) -> Real {
        self.theta
    }

    /// Martingale correction `ω`.
    pub fn omega(&self) -> Real {
        self.omega
    }

    /// Risk-neutral log drift `μ = r + ω`.
    pub fn drift(&self) -> Real {
        self.rate + self.omega
    }

    /// `S(t)` given the elapsed gamma time `g` and a standard normal `z`.
    pub fn terminal_value(&self, t: Time, g: Real, z: Real) -> Price {
        let increment = self.theta * g + self.sigma * g.sqrt() * z;
        self.s0 * (self.drift() * t + increment).exp()
    }

    /// Draw `S(t)`: the gamma clock `G ~ Gamma(t/ν, ν)` first, then one normal.
    pub fn sample_terminal<R: RandomSource + ?Sized>(
        &self,
        rng: &mut R,
        t: Time,
        method: GammaMethod,
    ) -> Price {
        let g = rng.next_duration(method, t / self.nu, self.nu);
        let z = rng.next_standard_normal();
        self.terminal_value(t, g, z)
    }
}
