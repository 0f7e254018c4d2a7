//! Where a Monte Carlo engine gets its random numbers.

use op_core::Result;
use op_math::RandomSource;
use op_methods::{MonteCarloModel, PathPricer, PayoffStatistics};

/// Offset applied to the base seed after each seeded run, so consecutive
/// runs in one request (the two Variance-Gamma legs) use unrelated streams.
const RUN_SEED_OFFSET: u64 = 0x9E37_79B9_7F4A_7C15;

/// Randomness for one pricing request.
pub enum PathSource<'a> {
    /// Draw every path, in order, from a caller-supplied source.
    Stream(&'a mut dyn RandomSource),
    /// Independently seeded batches, parallel with the `parallel` feature.
    Seeded {
        /// Base seed of the next run.
        seed: u64,
        /// Paths per batch.
        batch_size: usize,
    },
}

impl PathSource<'_> {
    /// Run `model` with `pricer`, consuming this source.
    pub fn run(
        &mut self,
        model: &MonteCarloModel,
        pricer: &dyn PathPricer,
    ) -> Result<PayoffStatistics> {
        match self {
            PathSource::Stream(rng) => model.simulate(pricer, &mut **rng),
            PathSource::Seeded { seed, batch_size } => {
                let stats = model.simulate_batched(pricer, *seed, *batch_size);
                *seed = seed.wrapping_add(RUN_SEED_OFFSET);
                stats
            }
        }
    }
}
