//! Heston stochastic volatility process.
//!
//! ```text
//! dS = r S dt + √v S dW₁
//! dv = κ(θ − v) dt + σ √v dW₂
//! dW₁ dW₂ = ρ dt
//! ```
//!
//! Paths are advanced with a full-truncation Euler scheme: the variance is
//! floored at zero after every step, so `√(v·dt)` is always defined. The
//! floor biases the scheme slightly, which is accepted.

use op_core::{ensure, Rate, Real, Result, Time};

/// Spot and instantaneous variance at one point of a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HestonState {
    /// Underlying price.
    pub spot: Real,
    /// Instantaneous variance, never negative.
    pub variance: Real,
}

/// The Heston process under the risk-neutral measure with a flat rate.
///
/// * `v0`    — initial variance
/// * `kappa` — mean-reversion speed of variance
/// * `theta` — long-run variance level
/// * `sigma` — vol-of-vol
/// * `rho`   — correlation between the two Brownian motions
#[derive(Debug, Clone, PartialEq)]
pub struct HestonProcess {
    s0: Real,
    v0: Real,
    rate: Rate,
    kappa: Real,
    theta: Real,
    sigma: Real,
    rho: Real,
    rho_complement: Real,
}

impl HestonProcess {
    /// Create a new Heston process, rejecting out-of-range parameters.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        s0: Real,
        v0: Real,
        rate: Rate,
        kappa: Real,
        theta: Real,
        sigma: Real,
        rho: Real,
    ) -> Result<Self> {
        ensure!(s0.is_finite() && s0 > 0.0, "spot must be positive, got {s0}");
        ensure!(v0.is_finite() && v0 >= 0.0, "initial variance must be non-negative, got {v0}");
        ensure!(rate.is_finite(), "risk-free rate must be finite, got {rate}");
        ensure!(kappa.is_finite() && kappa >= 0.0, "mean reversion speed must be non-negative, got {kappa}");
        ensure!(theta.is_finite() && theta >= 0.0, "long-run variance must be non-negative, got {theta}");
        ensure!(sigma.is_finite() && sigma >= 0.0, "vol-of-vol must be non-negative, got {sigma}");
        ensure!((-1.0..=1.0).contains(&rho), "correlation must be in [-1, 1], got {rho}");

        Ok(Self {
            s0,
            v0,
            rate,
            kappa,
            theta,
            sigma,
            rho,
            rho_complement: (1.0 - rho * rho).sqrt(),
        })
    }

    /// Spot price.
    pub fn s0(&self) -> Real {
        self.s0
    }

    /// Initial variance.
    pub fn v0(&self) -> Real {
        self.v0
    }

    /// Risk-free rate.
    pub fn rate(&self) -> Rate {
        self.rate
    }

    /// Mean-reversion speed.
    pub fn kappa(&self) -> Real {
        self.kappa
    }

    /// Long-run variance.
    pub fn theta(&self) -> Real {
        self.theta
    }

    /// Vol-of-vol.
    pub fn sigma(&self) -> Real {
        self.sigma
    }

    /// Correlation.
    pub fn rho(&self) -> Real {
        self.rho
    }

    /// State at time zero.
    pub fn initial_state(&self) -> HestonState {
        HestonState {
            spot: self.s0,
            variance: self.v0,
        }
    }

    /// Advance `state` by one step of length `dt`.
    ///
    /// `z1` drives the variance; the price is driven by the correlated
    /// `ρ·z1 + √(1−ρ²)·z2`. The variance is updated first and the floored
    /// value feeds the price step.
    pub fn evolve(&self, state: HestonState, dt: Time, z1: Real, z2: Real) -> HestonState {
        let v = state.variance;
        let v = (v + self.kappa * (self.theta - v) * dt + self.sigma * (v * dt).sqrt() * z1).max(0.0);
        let z = self.rho * z1 + self.rho_complement * z2;
        let spot = state.spot * ((self.rate - 0.5 * v) * dt + (v * dt).sqrt() * z).exp();
        HestonState { spot, variance: v }
    }
}
