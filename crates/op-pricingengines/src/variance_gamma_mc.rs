//! Variance-Gamma Monte Carlo engine.
//!
//! Terminal prices are drawn directly: a gamma clock `G ~ Gamma(T/ν, ν)`,
//! then one normal `z`, giving `S_T = S·exp(μT + θG + σ√G·z)` with the
//! martingale-corrected drift `μ = r + ln(1 − θν − σ²ν/2)/ν`.
//!
//! Unlike the Heston engine, each leg is priced from its own, independent
//! path ensemble. The path count is an engine setting, not a model
//! parameter.

use crate::inputs::{MarketInputs, OptionType, VarianceGammaParameters};
use crate::path_source::PathSource;
use crate::results::McEstimate;
use op_core::{ensure, GammaMethod, Price, Result, Size, Time};
use op_math::random_numbers::MAX_ERLANG_SHAPE;
use op_math::RandomSource;
use op_methods::{CancellationToken, MonteCarloModel, PathPricer, PathValue};
use op_processes::VarianceGammaProcess;
use tracing::debug;

/// Draws one Variance-Gamma terminal price.
#[derive(Debug, Clone)]
pub struct VarianceGammaPathPricer {
    process: VarianceGammaProcess,
    strike: Price,
    time_to_expiry: Time,
    method: GammaMethod,
}

impl VarianceGammaPathPricer {
    /// A pricer for `process` at horizon `time_to_expiry`.
    pub fn new(
        process: VarianceGammaProcess,
        strike: Price,
        time_to_expiry: Time,
        method: GammaMethod,
    ) -> Self {
        Self {
            process,
            strike,
            time_to_expiry,
            method,
        }
    }
}

impl PathPricer for VarianceGammaPathPricer {
    fn simulate_path(&self, rng: &mut dyn RandomSource) -> PathValue {
        let s_t = self
            .process
            .sample_terminal(rng, self.time_to_expiry, self.method);
        PathValue::at_terminal(s_t, self.strike)
    }
}

/// Prices each leg under Variance-Gamma from a fresh simulation.
#[derive(Debug, Clone)]
pub struct VarianceGammaMonteCarloEngine {
    params: VarianceGammaParameters,
    paths: Size,
    method: GammaMethod,
    cancellation: Option<CancellationToken>,
}

impl VarianceGammaMonteCarloEngine {
    /// An engine drawing `paths` terminal prices per leg.
    pub fn new(params: VarianceGammaParameters, paths: Size, method: GammaMethod) -> Self {
        Self {
            params,
            paths,
            method,
            cancellation: None,
        }
    }

    /// Stop between paths once `token` is set.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Price a single leg from its own ensemble.
    pub fn price_leg(
        &self,
        inputs: &MarketInputs,
        option_type: OptionType,
        source: &mut PathSource<'_>,
    ) -> Result<McEstimate> {
        let VarianceGammaParameters { sigma, nu, theta } = self.params;
        let process = VarianceGammaProcess::new(inputs.spot, inputs.risk_free_rate, sigma, nu, theta)?;
        debug!(
            %option_type,
            paths = self.paths,
            method = %self.method,
            omega = process.omega(),
            "variance gamma simulation"
        );
        let pricer =
            VarianceGammaPathPricer::new(process, inputs.strike, inputs.time_to_expiry, self.method);

        let mut model = MonteCarloModel::new(self.paths);
        if let Some(token) = &self.cancellation {
            model = model.with_cancellation(token.clone());
        }
        let stats = source.run(&model, &pricer)?;
        let leg = match option_type {
            OptionType::Call => &stats.call,
            OptionType::Put => &stats.put,
        };
        Ok(McEstimate::from_statistics(leg, inputs.discount_factor()))
    }

    /// Price the call, then the put, each from a separate simulation.
    pub fn price(
        &self,
        inputs: &MarketInputs,
        source: &mut PathSource<'_>,
    ) -> Result<(McEstimate, McEstimate)> {
        self.params.validate()?;
        if self.method == GammaMethod::Erlang {
            let shape = inputs.time_to_expiry / self.params.nu;
            ensure!(
                shape <= MAX_ERLANG_SHAPE,
                "Erlang clock shape T/nu = {shape} exceeds {MAX_ERLANG_SHAPE}; use the Marsaglia-Tsang sampler"
            );
        }
        let call = self.price_leg(inputs, OptionType::Call, source)?;
        let put = self.price_leg(inputs, OptionType::Put, source)?;
        Ok((call, put))
    }

    /// Price both legs on a caller-supplied random source.
    pub fn price_with(
        &self,
        inputs: &MarketInputs,
        rng: &mut dyn RandomSource,
    ) -> Result<(McEstimate, McEstimate)> {
        self.price(inputs, &mut PathSource::Stream(rng))
    }
}
