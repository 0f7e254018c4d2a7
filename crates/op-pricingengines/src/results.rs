//! Pricing outputs.

use crate::inputs::{MarketInputs, ModelParameters};
use op_core::{Price, Real};
use op_math::Statistics;
use serde::{Deserialize, Serialize};

/// A discounted Monte Carlo estimate for one leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct McEstimate {
    /// Discounted mean payoff.
    pub price: Price,
    /// Discounted standard error of the mean.
    pub std_error: Real,
}

impl McEstimate {
    /// Discount the mean payoff and its standard error by `discount`.
    pub fn from_statistics(stats: &Statistics, discount: Real) -> Self {
        Self {
            price: discount * stats.mean().unwrap_or(0.0),
            std_error: discount * stats.error_estimate().unwrap_or(0.0),
        }
    }
}

/// Theoretical call/put prices with the request that produced them.
///
/// Standard errors are present for the Monte Carlo models only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    /// Call (CE) price.
    pub ce_price: Price,
    /// Put (PE) price.
    pub pe_price: Price,
    /// Call standard error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ce_std_error: Option<Real>,
    /// Put standard error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pe_std_error: Option<Real>,
    /// The market snapshot priced.
    pub inputs: MarketInputs,
    /// The model and parameters used.
    pub model: ModelParameters,
}

impl PricingResult {
    /// A closed-form result without error estimates.
    pub fn analytic(ce_price: Price, pe_price: Price, inputs: MarketInputs, model: ModelParameters) -> Self {
        Self {
            ce_price,
            pe_price,
            ce_std_error: None,
            pe_std_error: None,
            inputs,
            model,
        }
    }

    /// A simulated result carrying both legs' standard errors.
    pub fn simulated(
        call: McEstimate,
        put: McEstimate,
        inputs: MarketInputs,
        model: ModelParameters,
    ) -> Self {
        Self {
            ce_price: call.price,
            pe_price: put.price,
            ce_std_error: Some(call.std_error),
            pe_std_error: Some(put.std_error),
            inputs,
            model,
        }
    }
}
