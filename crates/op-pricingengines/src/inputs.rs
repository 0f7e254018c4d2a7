//! Market snapshot and model parameter records.
//!
//! Both are validated at the dispatcher boundary before any arithmetic, so
//! an engine never sees a non-positive spot or strike, a negative expiry,
//! or a model parameter outside its admissible range.

use op_core::{ensure, Price, Rate, Real, Result, Size, Time, Volatility};
use op_processes::VarianceGammaProcess;
use serde::{Deserialize, Serialize};
use std::fmt;

// ─── OptionType ───────────────────────────────────────────────────────────────

/// Option type: call (CE) or put (PE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    /// Right to buy at the strike.
    Call,
    /// Right to sell at the strike.
    Put,
}

impl OptionType {
    /// `+1` for calls, `−1` for puts.
    pub fn sign(self) -> Real {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    /// Payoff at expiry, `max(φ·(S − K), 0)`.
    pub fn intrinsic(self, spot: Price, strike: Price) -> Price {
        (self.sign() * (spot - strike)).max(0.0)
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "Call"),
            OptionType::Put => write!(f, "Put"),
        }
    }
}

// ─── MarketInputs ─────────────────────────────────────────────────────────────

/// One pricing snapshot. Implied volatilities are in percentage points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketInputs {
    /// Underlying price `S`.
    pub spot: Price,
    /// Strike `K`.
    pub strike: Price,
    /// Time to expiry `T` in years.
    pub time_to_expiry: Time,
    /// Annualized continuously-compounded risk-free rate `r`.
    pub risk_free_rate: Rate,
    /// Call implied volatility, percent.
    pub ce_iv: Real,
    /// Put implied volatility, percent.
    pub pe_iv: Real,
}

impl MarketInputs {
    /// Check `S, K > 0`, `T ≥ 0`, finite `r`, and finite non-negative IVs.
    pub fn validate(&self) -> Result<()> {
        let Self {
            spot,
            strike,
            time_to_expiry,
            risk_free_rate,
            ce_iv,
            pe_iv,
        } = *self;
        ensure!(spot.is_finite() && spot > 0.0, "underlying price must be positive, got {spot}");
        ensure!(strike.is_finite() && strike > 0.0, "strike must be positive, got {strike}");
        ensure!(
            time_to_expiry.is_finite() && time_to_expiry >= 0.0,
            "time to expiry must be non-negative, got {time_to_expiry}"
        );
        ensure!(risk_free_rate.is_finite(), "risk-free rate must be finite, got {risk_free_rate}");
        ensure!(ce_iv.is_finite() && ce_iv >= 0.0, "call IV must be non-negative, got {ce_iv}");
        ensure!(pe_iv.is_finite() && pe_iv >= 0.0, "put IV must be non-negative, got {pe_iv}");
        Ok(())
    }

    /// Call volatility as a decimal.
    pub fn ce_volatility(&self) -> Volatility {
        self.ce_iv / 100.0
    }

    /// Put volatility as a decimal.
    pub fn pe_volatility(&self) -> Volatility {
        self.pe_iv / 100.0
    }

    /// Heston initial variance, `(max(ceIV, peIV)/100)²`.
    pub fn initial_variance(&self) -> Real {
        let vol = self.ce_iv.max(self.pe_iv) / 100.0;
        vol * vol
    }

    /// `e^(−rT)`.
    pub fn discount_factor(&self) -> Real {
        (-self.risk_free_rate * self.time_to_expiry).exp()
    }
}

// ─── Model parameters ─────────────────────────────────────────────────────────

/// Heston model parameters and simulation sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HestonParameters {
    /// Mean-reversion speed of variance.
    pub kappa: Real,
    /// Long-run variance.
    pub theta: Real,
    /// Vol-of-vol.
    pub sigma: Real,
    /// Spot/variance correlation, in `[-1, 1]`.
    pub rho: Real,
    /// Time steps per path.
    pub steps: Size,
    /// Number of paths.
    pub sims: Size,
}

impl Default for HestonParameters {
    fn default() -> Self {
        Self {
            kappa: 2.0,
            theta: 0.04,
            sigma: 0.3,
            rho: -0.7,
            steps: 252,
            sims: 10_000,
        }
    }
}

impl HestonParameters {
    /// Range checks; all failures are `InvalidInput`.
    pub fn validate(&self) -> Result<()> {
        let Self {
            kappa,
            theta,
            sigma,
            rho,
            steps,
            sims,
        } = *self;
        ensure!(kappa.is_finite() && kappa >= 0.0, "Heston kappa must be non-negative, got {kappa}");
        ensure!(theta.is_finite() && theta >= 0.0, "Heston theta must be non-negative, got {theta}");
        ensure!(sigma.is_finite() && sigma >= 0.0, "Heston sigma must be non-negative, got {sigma}");
        ensure!((-1.0..=1.0).contains(&rho), "Heston rho must be in [-1, 1], got {rho}");
        ensure!(steps >= 1, "Heston steps must be at least 1");
        ensure!(sims >= 1, "Heston sims must be at least 1");
        Ok(())
    }
}

/// Variance-Gamma model parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VarianceGammaParameters {
    /// Diffusion volatility.
    pub sigma: Real,
    /// Variance rate of the gamma clock.
    pub nu: Real,
    /// Drift (skew) of the subordinated Brownian motion.
    pub theta: Real,
}

impl Default for VarianceGammaParameters {
    fn default() -> Self {
        Self {
            sigma: 0.2,
            nu: 0.5,
            theta: -0.1,
        }
    }
}

impl VarianceGammaParameters {
    /// `σ > 0`, `ν > 0` (`InvalidInput`), then `1 − θν − σ²ν/2 > 0`
    /// (`ParameterConstraintViolated`).
    pub fn validate(&self) -> Result<()> {
        let Self { sigma, nu, theta } = *self;
        ensure!(sigma.is_finite() && sigma > 0.0, "VG sigma must be positive, got {sigma}");
        ensure!(nu.is_finite() && nu > 0.0, "VG nu must be positive, got {nu}");
        ensure!(theta.is_finite(), "VG theta must be finite, got {theta}");
        VarianceGammaProcess::martingale_correction(sigma, nu, theta)?;
        Ok(())
    }
}

/// The pricing model and its parameters.
///
/// Serialized with an internal `"model"` tag: `{"model": "BSM"}`,
/// `{"model": "Heston", "kappa": 2.0, ...}`, `{"model": "VarianceGamma", ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model")]
pub enum ModelParameters {
    /// Black-Scholes-Merton closed form; uses the quoted IVs directly.
    #[serde(rename = "BSM")]
    Bsm,
    /// Heston stochastic volatility, Monte Carlo.
    Heston(HestonParameters),
    /// Variance-Gamma, Monte Carlo.
    VarianceGamma(VarianceGammaParameters),
}

impl ModelParameters {
    /// Display name of the model.
    pub fn name(&self) -> &'static str {
        match self {
            ModelParameters::Bsm => "BSM",
            ModelParameters::Heston(_) => "Heston",
            ModelParameters::VarianceGamma(_) => "VarianceGamma",
        }
    }

    /// Validate the model's own parameters.
    pub fn validate(&self) -> Result<()> {
        match self {
            ModelParameters::Bsm => Ok(()),
            ModelParameters::Heston(params) => params.validate(),
            ModelParameters::VarianceGamma(params) => params.validate(),
        }
    }
}

impl fmt::Display for ModelParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use op_core::Error;

    fn inputs() -> MarketInputs {
        MarketInputs {
            spot: 22_000.0,
            strike: 22_000.0,
            time_to_expiry: 0.0833,
            risk_free_rate: 0.065,
            ce_iv: 12.0,
            pe_iv: 14.0,
        }
    }

    #[test]
    fn derived_quantities() {
        let m = inputs();
        assert_eq!(m.ce_volatility(), 0.12);
        assert_eq!(m.pe_volatility(), 0.14);
        assert!((m.initial_variance() - 0.0196).abs() < 1e-15);
        assert!((m.discount_factor() - (-0.065_f64 * 0.0833).exp()).abs() < 1e-15);
    }

    #[test]
    fn invalid_market_inputs() {
        for bad in [
            MarketInputs { strike: 0.0, ..inputs() },
            MarketInputs { spot: -1.0, ..inputs() },
            MarketInputs { time_to_expiry: -1.0, ..inputs() },
            MarketInputs { ce_iv: -5.0, ..inputs() },
            MarketInputs { pe_iv: Real::NAN, ..inputs() },
            MarketInputs { risk_free_rate: Real::INFINITY, ..inputs() },
        ] {
            assert!(matches!(bad.validate(), Err(Error::InvalidInput(_))), "{bad:?}");
        }
        assert!(MarketInputs { time_to_expiry: 0.0, ..inputs() }.validate().is_ok());
    }

    #[test]
    fn heston_validation() {
        assert!(HestonParameters::default().validate().is_ok());
        let bad = [
            HestonParameters { rho: 1.2, ..Default::default() },
            HestonParameters { steps: 0, ..Default::default() },
            HestonParameters { sims: 0, ..Default::default() },
            HestonParameters { kappa: -1.0, ..Default::default() },
        ];
        for p in bad {
            assert!(matches!(p.validate(), Err(Error::InvalidInput(_))), "{p:?}");
        }
    }

    #[test]
    fn variance_gamma_validation() {
        assert!(VarianceGammaParameters::default().validate().is_ok());
        assert!(matches!(
            VarianceGammaParameters { nu: 0.0, ..Default::default() }.validate(),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            VarianceGammaParameters { sigma: 0.0, ..Default::default() }.validate(),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            VarianceGammaParameters { sigma: 0.2, nu: 2.0, theta: 0.5 }.validate(),
            Err(Error::ParameterConstraintViolated(_))
        ));
    }

    #[test]
    fn model_tagging() {
        let json = serde_json::to_value(ModelParameters::Bsm).unwrap();
        assert_eq!(json, serde_json::json!({ "model": "BSM" }));

        let heston: ModelParameters =
            serde_json::from_str(r#"{"model": "Heston", "sims": 500}"#).unwrap();
        assert_eq!(
            heston,
            ModelParameters::Heston(HestonParameters { sims: 500, ..Default::default() })
        );
        assert_eq!(heston.name(), "Heston");

        let vg: ModelParameters =
            serde_json::from_str(r#"{"model": "VarianceGamma", "sigma": 0.25, "nu": 0.4, "theta": -0.2}"#)
                .unwrap();
        assert_eq!(vg.to_string(), "VarianceGamma");

        assert!(serde_json::from_str::<ModelParameters>(r#"{"model": "SABR"}"#).is_err());
    }

    #[test]
    fn intrinsic_values() {
        assert_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
        assert_eq!(OptionType::Put.intrinsic(110.0, 100.0), 0.0);
        assert_eq!(OptionType::Put.intrinsic(90.0, 100.0), 10.0);
    }
}
