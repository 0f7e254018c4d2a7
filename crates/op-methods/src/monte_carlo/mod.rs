//! Monte Carlo simulation framework.
//!
//! * [`PathPricer`] — simulates one path and reports its call/put payoffs
//! * [`PayoffStatistics`] — per-leg accumulators over many paths
//! * [`MonteCarloModel`] — runs a pricer over a path count, sequentially on a
//!   supplied source or in independently seeded batches

use crate::cancellation::CancellationToken;
use op_core::{ensure, Error, Real, Result};
use op_math::{MersenneTwisterUniformRng, RandomSource, Statistics};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, warn};

/// Multiplier separating the seeds of consecutive batches.
const BATCH_SEED_STRIDE: u64 = 6_364_136_223_846_793_005;

// ─── PathPricer ───────────────────────────────────────────────────────────────

/// Undiscounted payoffs of both legs on one simulated path.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PathValue {
    /// Call payoff `max(S_T − K, 0)`.
    pub call: Real,
    /// Put payoff `max(K − S_T, 0)`.
    pub put: Real,
}

impl PathValue {
    /// Both payoffs at terminal price `s_t`.
    pub fn at_terminal(s_t: Real, strike: Real) -> Self {
        Self {
            call: (s_t - strike).max(0.0),
            put: (strike - s_t).max(0.0),
        }
    }
}

/// Simulates a single path from the supplied random source.
///
/// Implementations must draw only from `rng`, so that a seeded source fully
/// determines the result.
pub trait PathPricer: Sync {
    /// Simulate one path and return its undiscounted payoffs.
    fn simulate_path(&self, rng: &mut dyn RandomSource) -> PathValue;
}

// ─── PayoffStatistics ─────────────────────────────────────────────────────────

/// Call and put payoff statistics gathered over the same paths.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PayoffStatistics {
    /// Call leg.
    pub call: Statistics,
    /// Put leg.
    pub put: Statistics,
}

impl PayoffStatistics {
    /// Record one path.
    pub fn add(&mut self, value: PathValue) {
        self.call.add(value.call);
        self.put.add(value.put);
    }

    /// Fold in statistics from a disjoint set of paths.
    pub fn merge(&mut self, other: &PayoffStatistics) {
        self.call.merge(&other.call);
        self.put.merge(&other.put);
    }

    /// Number of paths recorded.
    pub fn samples(&self) -> usize {
        self.call.samples()
    }
}

// ─── MonteCarloModel ──────────────────────────────────────────────────────────

/// A Monte Carlo run over a fixed number of paths.
#[derive(Debug, Clone)]
pub struct MonteCarloModel {
    paths: usize,
    cancellation: Option<CancellationToken>,
}

impl MonteCarloModel {
    /// A run of `paths` paths.
    pub fn new(paths: usize) -> Self {
        Self {
            paths,
            cancellation: None,
        }
    }

    /// Poll `token` between paths and stop when it is set.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Requested path count.
    pub fn paths(&self) -> usize {
        self.paths
    }

    /// Run every path sequentially on `rng`.
    pub fn simulate(
        &self,
        pricer: &dyn PathPricer,
        rng: &mut dyn RandomSource,
    ) -> Result<PayoffStatistics> {
        ensure!(self.paths > 0, "path count must be positive");
        debug!(paths = self.paths, "monte carlo run (sequential)");

        let (stats, cancelled) = self.run_paths(pricer, rng, self.paths);
        self.finish(stats, cancelled)
    }

    /// Run the paths in batches of `batch_size`, batch `i` drawing from its
    /// own Mersenne Twister seeded with `seed + i·stride`.
    ///
    /// Batches are merged in index order, so the result depends only on
    /// `seed` and `batch_size`, not on whether the `parallel` feature spread
    /// them across threads. Batches are generated lazily and dispatched in
    /// bounded rounds; the token is polled before each round and each path.
    pub fn simulate_batched(
        &self,
        pricer: &dyn PathPricer,
        seed: u64,
        batch_size: usize,
    ) -> Result<PayoffStatistics> {
        ensure!(self.paths > 0, "path count must be positive");
        ensure!(batch_size > 0, "batch size must be positive");

        let batches = batch_count(self.paths, batch_size);
        let round = batches_per_round();
        debug!(
            paths = self.paths,
            batches,
            batch_size,
            parallel = cfg!(feature = "parallel"),
            "monte carlo run (batched)"
        );

        let run_batch = |i: usize| {
            let batch_seed = seed.wrapping_add((i as u64).wrapping_mul(BATCH_SEED_STRIDE));
            let mut rng = MersenneTwisterUniformRng::new(batch_seed);
            self.run_paths(pricer, &mut rng, batch_len(self.paths, batch_size, i))
        };

        let mut total = PayoffStatistics::default();
        let mut cancelled = false;
        let mut next = 0;
        while next < batches && !cancelled {
            if self.is_cancelled() {
                cancelled = true;
                break;
            }
            let end = next.saturating_add(round).min(batches);

            #[cfg(feature = "parallel")]
            let results = (next..end).into_par_iter().map(run_batch).collect::<Vec<_>>();
            #[cfg(not(feature = "parallel"))]
            let results = (next..end).map(run_batch).collect::<Vec<_>>();

            for (stats, batch_cancelled) in &results {
                total.merge(stats);
                cancelled |= batch_cancelled;
            }
            next = end;
        }
        self.finish(total, cancelled)
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Run up to `n` paths; the flag reports whether cancellation cut it short.
    fn run_paths(
        &self,
        pricer: &dyn PathPricer,
        rng: &mut dyn RandomSource,
        n: usize,
    ) -> (PayoffStatistics, bool) {
        let mut stats = PayoffStatistics::default();
        for _ in 0..n {
            if self.is_cancelled() {
                return (stats, true);
            }
            stats.add(pricer.simulate_path(rng));
        }
        (stats, false)
    }

    fn finish(&self, stats: PayoffStatistics, cancelled: bool) -> Result<PayoffStatistics> {
        if cancelled {
            let completed = stats.samples();
            warn!(completed, requested = self.paths, "monte carlo run cancelled");
            return Err(Error::Cancelled {
                completed,
                requested: self.paths,
            });
        }
        Ok(stats)
    }
}

/// Number of batches of at most `batch_size` covering `paths`.
fn batch_count(paths: usize, batch_size: usize) -> usize {
    paths.div_ceil(batch_size)
}

/// Length of batch `i`; only the last batch may be short.
fn batch_len(paths: usize, batch_size: usize, i: usize) -> usize {
    batch_size.min(paths - i * batch_size)
}

/// Batches dispatched between cancellation checks.
#[cfg(feature = "parallel")]
fn batches_per_round() -> usize {
    rayon::current_num_threads().max(1) * 4
}

#[cfg(not(feature = "parallel"))]
fn batches_per_round() -> usize {
    1
}

// ─── Tests ────────────────────────────────────────────────────────────────────
