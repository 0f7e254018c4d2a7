//! # op-pricingengines
//!
//! European option pricing under three models behind one dispatcher.
//!
//! ## Engines
//!
//! - [`black_scholes_price`] — Black-Scholes-Merton closed form
//! - [`HestonMonteCarloEngine`] — Heston stochastic volatility, full-truncation
//!   Euler paths shared by both legs
//! - [`VarianceGammaMonteCarloEngine`] — Variance-Gamma terminal sampling,
//!   one independent ensemble per leg
//! - [`PricingDispatcher`] — validates a request and routes it by
//!   [`ModelParameters`]

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod black_scholes;
pub mod dispatcher;
pub mod heston_mc;
pub mod inputs;
pub mod path_source;
pub mod results;
pub mod variance_gamma_mc;

pub use black_scholes::{black_scholes_price, black_scholes_prices, parity_gap};
pub use dispatcher::PricingDispatcher;
pub use heston_mc::{HestonMonteCarloEngine, HestonPathPricer};
pub use inputs::{
    HestonParameters, MarketInputs, ModelParameters, OptionType, VarianceGammaParameters,
};
pub use path_source::PathSource;
pub use results::{McEstimate, PricingResult};
pub use variance_gamma_mc::{VarianceGammaMonteCarloEngine, VarianceGammaPathPricer};
