//! # op-math
//!
//! Mathematical utilities for the pricing engines: the standard normal
//! distribution, swappable random sources with their derived normal and
//! gamma generators, and a statistics accumulator for Monte Carlo payoffs.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Probability distributions.
pub mod distributions;

/// Random sources and derived generators.
pub mod random_numbers;

/// Statistics accumulators.
pub mod statistics;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use distributions::{normal_cdf, normal_pdf};
pub use random_numbers::{MersenneTwisterUniformRng, RandomSource, RngSource, SequenceSource};
pub use statistics::Statistics;
