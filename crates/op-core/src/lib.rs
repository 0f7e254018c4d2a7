//! # op-core
//!
//! Core types, error taxonomy, and engine settings for optionpricer.
//!
//! This crate provides the building blocks shared across the workspace –
//! numeric type aliases, the pricing error hierarchy with its `ensure!`
//! macros, and the [`Settings`] value that configures the Monte Carlo
//! engines.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types and the `ensure!` / `ensure_constraint!` macros.
pub mod errors;

/// Engine settings (path counts, seeding, gamma sampler).
pub mod settings;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the engine.
pub type Real = f64;

/// A rate expressed as a decimal (e.g. 0.065 = 6.5 %).
pub type Rate = Real;

/// A price or value.
pub type Price = Real;

/// A volatility level expressed as a decimal.
pub type Volatility = Real;

/// A time measurement in years.
pub type Time = Real;

/// Alias used for path and step counts.
pub type Size = usize;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};
pub use settings::{GammaMethod, Settings};
