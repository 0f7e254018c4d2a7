//! Black-Scholes-Merton closed form.
//!
//! ```text
//! C = S·Φ(d₁) − K·e^(−rT)·Φ(d₂)
//! P = K·e^(−rT)·Φ(−d₂) − S·Φ(−d₁)
//! d₁ = (ln(S/K) + (r + σ²/2)·T) / (σ√T),   d₂ = d₁ − σ√T
//! ```
//!
//! `Φ` is the Zelen-Severo approximation from `op-math`.

use crate::inputs::{MarketInputs, OptionType};
use op_core::{Price, Rate, Real, Time, Volatility};
use op_math::normal_cdf;

/// Closed-form European price.
///
/// With `T ≤ 0` or `σ ≤ 0` the `d` terms are undefined; the market is
/// degenerate and the undiscounted intrinsic value `max(φ·(S − K), 0)` is
/// returned instead. Rounding in `Φ` can push a deep out-of-the-money price
/// a hair below zero, so the result is floored at zero.
pub fn black_scholes_price(
    option_type: OptionType,
    spot: Price,
    strike: Price,
    time_to_expiry: Time,
    risk_free_rate: Rate,
    volatility: Volatility,
) -> Price {
    let t = time_to_expiry;
    if t <= 0.0 || volatility <= 0.0 {
        return option_type.intrinsic(spot, strike);
    }

    let std_dev = volatility * t.sqrt();
    let d1 = ((spot / strike).ln() + (risk_free_rate + 0.5 * volatility * volatility) * t) / std_dev;
    let d2 = d1 - std_dev;
    let df = (-risk_free_rate * t).exp();

    let price = match option_type {
        OptionType::Call => spot * normal_cdf(d1) - strike * df * normal_cdf(d2),
        OptionType::Put => strike * df * normal_cdf(-d2) - spot * normal_cdf(-d1),
    };
    price.max(0.0)
}

/// Call priced at `ceIV`, put priced at `peIV`.
pub fn black_scholes_prices(inputs: &MarketInputs) -> (Price, Price) {
    let call = black_scholes_price(
        OptionType::Call,
        inputs.spot,
        inputs.strike,
        inputs.time_to_expiry,
        inputs.risk_free_rate,
        inputs.ce_volatility(),
    );
    let put = black_scholes_price(
        OptionType::Put,
        inputs.spot,
        inputs.strike,
        inputs.time_to_expiry,
        inputs.risk_free_rate,
        inputs.pe_volatility(),
    );
    (call, put)
}

/// Forward minus discounted strike, `S − K·e^(−rT)`.
pub fn parity_gap(spot: Price, strike: Price, time_to_expiry: Time, risk_free_rate: Rate) -> Real {
    spot - strike * (-risk_free_rate * time_to_expiry).exp()
}
