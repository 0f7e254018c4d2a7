//! Model dispatch.
//!
//! The dispatcher is the validation boundary: market inputs and model
//! parameters are checked before any engine runs, so callers receive either
//! a complete [`PricingResult`] or a typed error, never a `NaN` price.

use crate::black_scholes::black_scholes_prices;
use crate::heston_mc::HestonMonteCarloEngine;
use crate::inputs::{MarketInputs, ModelParameters};
use crate::path_source::PathSource;
use crate::results::PricingResult;
use crate::variance_gamma_mc::VarianceGammaMonteCarloEngine;
use op_core::{Result, Settings};
use op_math::RandomSource;
use op_methods::CancellationToken;
use tracing::debug;

/// Routes a pricing request to the engine for its model.
///
/// Holds no state between requests besides its configuration.
#[derive(Debug, Clone)]
pub struct PricingDispatcher {
    settings: Settings,
    cancellation: Option<CancellationToken>,
}

impl Default for PricingDispatcher {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            cancellation: None,
        }
    }
}

impl PricingDispatcher {
    /// A dispatcher with the given settings.
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            cancellation: None,
        })
    }

    /// Abort Monte Carlo runs between paths once `token` is set.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// The active settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Price with the dispatcher's own randomness.
    ///
    /// Simulations run on batches seeded from `settings.seed`, or from fresh
    /// entropy when no seed is configured.
    pub fn price(&self, inputs: &MarketInputs, model: &ModelParameters) -> Result<PricingResult> {
        let seed = self.settings.seed.unwrap_or_else(rand::random);
        let mut source = PathSource::Seeded {
            seed,
            batch_size: self.settings.batch_size,
        };
        self.dispatch(inputs, model, &mut source)
    }

    /// Price drawing every random number, in order, from `rng`.
    pub fn price_with(
        &self,
        inputs: &MarketInputs,
        model: &ModelParameters,
        rng: &mut dyn RandomSource,
    ) -> Result<PricingResult> {
        self.dispatch(inputs, model, &mut PathSource::Stream(rng))
    }

    fn dispatch(
        &self,
        inputs: &MarketInputs,
        model: &ModelParameters,
        source: &mut PathSource<'_>,
    ) -> Result<PricingResult> {
        inputs.validate()?;
        model.validate()?;
        debug!(
            model = model.name(),
            spot = inputs.spot,
            strike = inputs.strike,
            time_to_expiry = inputs.time_to_expiry,
            rate = inputs.risk_free_rate,
            ce_iv = inputs.ce_iv,
            pe_iv = inputs.pe_iv,
            "dispatching pricing request"
        );

        let result = match *model {
            ModelParameters::Bsm => {
                let (ce, pe) = black_scholes_prices(inputs);
                PricingResult::analytic(ce, pe, *inputs, *model)
            }
            ModelParameters::Heston(params) => {
                let mut engine = HestonMonteCarloEngine::new(params);
                if let Some(token) = &self.cancellation {
                    engine = engine.with_cancellation(token.clone());
                }
                let (call, put) = engine.price(inputs, source)?;
                PricingResult::simulated(call, put, *inputs, *model)
            }
            ModelParameters::VarianceGamma(params) => {
                let mut engine = VarianceGammaMonteCarloEngine::new(
                    params,
                    self.settings.vg_paths,
                    self.settings.gamma_method,
                );
                if let Some(token) = &self.cancellation {
                    engine = engine.with_cancellation(token.clone());
                }
                let (call, put) = engine.price(inputs, source)?;
                PricingResult::simulated(call, put, *inputs, *model)
            }
        };

        debug!(
            model = model.name(),
            ce_price = result.ce_price,
            pe_price = result.pe_price,
            "priced"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::{HestonParameters, VarianceGammaParameters};
    use op_core::{Error, GammaMethod};
    use op_math::{MersenneTwisterUniformRng, SequenceSource};

    fn nifty() -> MarketInputs {
        MarketInputs {
            spot: 22_000.0,
            strike: 22_000.0,
            time_to_expiry: 0.0833,
            risk_free_rate: 0.065,
            ce_iv: 12.0,
            pe_iv: 12.0,
        }
    }

    fn seeded(seed: u64) -> PricingDispatcher {
        PricingDispatcher::new(Settings::default().with_seed(seed)).unwrap()
    }

    #[test]
    fn bsm_result_echoes_request() {
        let result = PricingDispatcher::default()
            .price(&nifty(), &ModelParameters::Bsm)
            .unwrap();
        assert!((result.ce_price - 366.232_580_25).abs() < 1e-3);
        assert!((result.pe_price - 247.435_483_92).abs() < 1e-3);
        assert_eq!(result.ce_std_error, None);
        assert_eq!(result.inputs, nifty());
        assert_eq!(result.model, ModelParameters::Bsm);
    }

    #[test]
    fn invalid_inputs_are_rejected_before_pricing() {
        let dispatcher = PricingDispatcher::default();
        let mut rng = SequenceSource::new(vec![0.5]).unwrap();
        for bad in [
            MarketInputs { strike: 0.0, ..nifty() },
            MarketInputs { time_to_expiry: -1.0, ..nifty() },
        ] {
            for model in [
                ModelParameters::Bsm,
                ModelParameters::Heston(HestonParameters::default()),
                ModelParameters::VarianceGamma(VarianceGammaParameters::default()),
            ] {
                let err = dispatcher.price_with(&bad, &model, &mut rng).unwrap_err();
                assert!(matches!(err, Error::InvalidInput(_)), "{model}: {err}");
            }
        }
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn heston_result_carries_errors_and_parameters() {
        let params = HestonParameters {
            steps: 30,
            sims: 4_000,
            ..Default::default()
        };
        let model = ModelParameters::Heston(params);
        let result = seeded(1).price(&nifty(), &model).unwrap();
        assert!(result.ce_price > 0.0 && result.pe_price > 0.0);
        assert!(result.ce_std_error.unwrap() > 0.0);
        assert_eq!(result.model, model);
    }

    #[test]
    fn seeded_dispatch_is_reproducible() {
        let models = [
            ModelParameters::Heston(HestonParameters {
                steps: 20,
                sims: 2_000,
                ..Default::default()
            }),
            ModelParameters::VarianceGamma(VarianceGammaParameters::default()),
        ];
        for model in models {
            let a = seeded(42).price(&nifty(), &model).unwrap();
            let b = seeded(42).price(&nifty(), &model).unwrap();
            assert_eq!(a.ce_price.to_bits(), b.ce_price.to_bits(), "{model}");
            assert_eq!(a.pe_price.to_bits(), b.pe_price.to_bits(), "{model}");

            let mut r1 = MersenneTwisterUniformRng::new(5);
            let mut r2 = MersenneTwisterUniformRng::new(5);
            let c = PricingDispatcher::default().price_with(&nifty(), &model, &mut r1).unwrap();
            let d = PricingDispatcher::default().price_with(&nifty(), &model, &mut r2).unwrap();
            assert_eq!(c, d);
        }
    }

    #[test]
    fn vg_path_count_comes_from_settings() {
        // With the Erlang sampler each path draws ceil(T/ν) = 1 uniform for
        // the clock and 2 for the normal, and each leg is a separate run.
        let model = ModelParameters::VarianceGamma(VarianceGammaParameters::default());
        for vg_paths in [3, 5] {
            let dispatcher = PricingDispatcher::new(Settings {
                vg_paths,
                gamma_method: GammaMethod::Erlang,
                ..Settings::default()
            })
            .unwrap();
            let mut rng = SequenceSource::new(vec![0.3, 0.6, 0.9, 0.2]).unwrap();
            let result = dispatcher.price_with(&nifty(), &model, &mut rng).unwrap();
            assert!(result.ce_price >= 0.0 && result.pe_price >= 0.0);
            assert_eq!(rng.consumed(), 2 * vg_paths * 3, "vg_paths = {vg_paths}");
        }
    }

    #[test]
    fn cancelled_huge_heston_run_fails_cleanly() {
        let token = CancellationToken::new();
        token.cancel();
        let dispatcher = PricingDispatcher::new(Settings::default().with_seed(1))
            .unwrap()
            .with_cancellation(token);
        let model = ModelParameters::Heston(HestonParameters {
            sims: usize::MAX,
            ..Default::default()
        });
        let err = dispatcher.price(&nifty(), &model).unwrap_err();
        assert_eq!(
            err,
            Error::Cancelled {
                completed: 0,
                requested: usize::MAX
            }
        );
    }

    #[test]
    fn vg_constraint_is_surfaced() {
        let model = ModelParameters::VarianceGamma(VarianceGammaParameters {
            sigma: 0.2,
            nu: 2.0,
            theta: 0.5,
        });
        let err = PricingDispatcher::default().price(&nifty(), &model).unwrap_err();
        assert!(matches!(err, Error::ParameterConstraintViolated(_)));
    }

    #[test]
    fn zero_path_settings_are_rejected() {
        let settings = Settings {
            vg_paths: 0,
            ..Settings::default()
        };
        assert!(matches!(PricingDispatcher::new(settings), Err(Error::Config(_))));
    }

    #[test]
    fn cancellation_reaches_the_engines() {
        let token = CancellationToken::new();
        token.cancel();
        let dispatcher = PricingDispatcher::default().with_cancellation(token);
        let model = ModelParameters::VarianceGamma(VarianceGammaParameters::default());
        let err = dispatcher.price(&nifty(), &model).unwrap_err();
        assert!(matches!(err, Error::Cancelled { .. }));
        // Closed form has nothing to cancel.
        assert!(dispatcher.price(&nifty(), &ModelParameters::Bsm).is_ok());
    }
}
