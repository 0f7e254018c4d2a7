//! # optionpricer
//!
//! Theoretical call/put prices for European options under
//! Black-Scholes-Merton, Heston (Monte Carlo) and Variance-Gamma (Monte
//! Carlo).
//!
//! This crate is a **façade** that re-exports the workspace crates, plus the
//! request layer a presentation front end talks to and logging setup for
//! the `optionpricer` binary.
//!
//! ## Quick start
//!
//! ```rust
//! use optionpricer::pricingengines::{MarketInputs, ModelParameters, PricingDispatcher};
//!
//! let inputs = MarketInputs {
//!     spot: 22_000.0,
//!     strike: 22_000.0,
//!     time_to_expiry: 0.0833,
//!     risk_free_rate: 0.065,
//!     ce_iv: 12.0,
//!     pe_iv: 12.0,
//! };
//! let result = PricingDispatcher::default()
//!     .price(&inputs, &ModelParameters::Bsm)
//!     .unwrap();
//! assert!(result.ce_price > result.pe_price);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, error taxonomy, and settings.
pub use op_core as core;

/// Normal distribution, random sources, gamma samplers, statistics.
pub use op_math as math;

/// Heston and Variance-Gamma dynamics.
pub use op_processes as processes;

/// Monte Carlo orchestration and cancellation.
pub use op_methods as methods;

/// Pricing engines and the model dispatcher.
pub use op_pricingengines as pricingengines;

pub mod logging;
pub mod request;

pub use request::{MarketQuote, PricingRequest, QuotedPricing, UnderlyingPrice};
