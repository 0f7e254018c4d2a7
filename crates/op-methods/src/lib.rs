//! # op-methods
//!
//! Monte Carlo orchestration shared by the simulation engines.
//!
//! A [`PathPricer`](monte_carlo::PathPricer) turns one draw of random numbers
//! into undiscounted call/put payoffs; a
//! [`MonteCarloModel`](monte_carlo::MonteCarloModel) runs it over many paths,
//! either on a caller-supplied random source or on independently seeded
//! batches (spread over rayon workers with the `parallel` feature).

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cancellation;
pub mod monte_carlo;

pub use cancellation::CancellationToken;
pub use monte_carlo::{MonteCarloModel, PathPricer, PathValue, PayoffStatistics};
