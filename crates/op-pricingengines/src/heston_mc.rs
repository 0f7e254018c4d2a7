//! Heston Monte Carlo engine.
//!
//! Each path starts at `(S, v0)` and takes `steps` full-truncation Euler
//! steps of `dt = T/steps`, drawing two independent normals per step. The
//! call and put payoffs are read off the same terminal price, so both legs
//! come from one path ensemble and are discounted once by `e^(−rT)`.

use crate::inputs::{HestonParameters, MarketInputs};
use crate::path_source::PathSource;
use crate::results::McEstimate;
use op_core::{Price, Result, Size, Time};
use op_math::RandomSource;
use op_methods::{CancellationToken, MonteCarloModel, PathPricer, PathValue};
use op_processes::HestonProcess;
use tracing::debug;

/// Simulates one Heston path to expiry.
#[derive(Debug, Clone)]
pub struct HestonPathPricer {
    process: HestonProcess,
    strike: Price,
    steps: Size,
    dt: Time,
}

impl HestonPathPricer {
    /// A pricer stepping `process` to `time_to_expiry` in `steps` steps.
    pub fn new(process: HestonProcess, strike: Price, time_to_expiry: Time, steps: Size) -> Self {
        Self {
            process,
            strike,
            steps,
            dt: time_to_expiry / steps as Time,
        }
    }
}

impl PathPricer for HestonPathPricer {
    fn simulate_path(&self, rng: &mut dyn RandomSource) -> PathValue {
        let mut state = self.process.initial_state();
        for _ in 0..self.steps {
            let z1 = rng.next_standard_normal();
            let z2 = rng.next_standard_normal();
            state = self.process.evolve(state, self.dt, z1, z2);
        }
        PathValue::at_terminal(state.spot, self.strike)
    }
}

/// Prices both legs under Heston from a shared path ensemble.
#[derive(Debug, Clone)]
pub struct HestonMonteCarloEngine {
    params: HestonParameters,
    cancellation: Option<CancellationToken>,
}

impl HestonMonteCarloEngine {
    /// An engine for the given parameters.
    pub fn new(params: HestonParameters) -> Self {
        Self {
            params,
            cancellation: None,
        }
    }

    /// Stop between paths once `token` is set.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Simulate `(call, put)` with `v0 = (max(ceIV, peIV)/100)²`.
    pub fn price(
        &self,
        inputs: &MarketInputs,
        source: &mut PathSource<'_>,
    ) -> Result<(McEstimate, McEstimate)> {
        self.params.validate()?;
        let HestonParameters {
            kappa,
            theta,
            sigma,
            rho,
            steps,
            sims,
        } = self.params;

        let process = HestonProcess::new(
            inputs.spot,
            inputs.initial_variance(),
            inputs.risk_free_rate,
            kappa,
            theta,
            sigma,
            rho,
        )?;
        let pricer = HestonPathPricer::new(process, inputs.strike, inputs.time_to_expiry, steps);

        let mut model = MonteCarloModel::new(sims);
        if let Some(token) = &self.cancellation {
            model = model.with_cancellation(token.clone());
        }
        debug!(steps, sims, v0 = inputs.initial_variance(), "heston simulation");

        let stats = source.run(&model, &pricer)?;
        let discount = inputs.discount_factor();
        Ok((
            McEstimate::from_statistics(&stats.call, discount),
            McEstimate::from_statistics(&stats.put, discount),
        ))
    }

    /// Simulate on a caller-supplied random source.
    pub fn price_with(
        &self,
        inputs: &MarketInputs,
        rng: &mut dyn RandomSource,
    ) -> Result<(McEstimate, McEstimate)> {
        self.price(inputs, &mut PathSource::Stream(rng))
    }
}
