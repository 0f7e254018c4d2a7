//! # op-processes
//!
//! Risk-neutral dynamics simulated by the Monte Carlo engines: the Heston
//! stochastic-volatility process discretized with full-truncation Euler, and
//! the Variance-Gamma process as Brownian motion on a gamma clock.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod heston_process;
pub mod variance_gamma_process;

pub use heston_process::{HestonProcess, HestonState};
pub use variance_gamma_process::VarianceGammaProcess;
