//! End-to-end pricing of JSON requests as a front end would send them.

use approx::assert_relative_eq;
use optionpricer::core::{Error, Settings};
use optionpricer::pricingengines::{ModelParameters, PricingDispatcher};
use optionpricer::{PricingRequest, QuotedPricing};

const BSM_REQUEST: &str = r#"{
    "symbol": "NIFTY",
    "expiry": "27-Jun-2024",
    "underlying": { "live": 22000.0 },
    "quote": {
        "strike": 22000.0,
        "time_to_expiry": 0.0833,
        "risk_free_rate": 0.065,
        "ce_iv": 12.0,
        "pe_iv": 12.0,
        "ce_market_price": 370.5,
        "pe_market_price": 244.0
    },
    "model": { "model": "BSM" }
}"#;

fn dispatcher() -> PricingDispatcher {
    PricingDispatcher::new(Settings {
        vg_paths: 2_000,
        ..Settings::default().with_seed(11)
    })
    .unwrap()
}

#[test]
fn bsm_request_round_trip() {
    let request: PricingRequest = serde_json::from_str(BSM_REQUEST).unwrap();
    assert_eq!(request.model, ModelParameters::Bsm);

    let quoted = request.price(&dispatcher()).unwrap();
    assert_eq!(quoted.symbol, "NIFTY");
    assert_relative_eq!(quoted.result.ce_price, 366.232_580_25, epsilon = 1e-3);
    assert_relative_eq!(quoted.result.pe_price, 247.435_483_92, epsilon = 1e-3);
    assert_eq!(quoted.ce_market_price, Some(370.5));
    assert_eq!(quoted.pe_market_price, Some(244.0));

    let json = serde_json::to_value(&quoted).unwrap();
    assert_eq!(json["result"]["model"]["model"], "BSM");
    let back: QuotedPricing = serde_json::from_value(json).unwrap();
    assert_eq!(back.symbol, quoted.symbol);
}

#[test]
fn manual_underlying_overrides_live() {
    let mut request: PricingRequest = serde_json::from_str(BSM_REQUEST).unwrap();
    request.underlying.manual = Some(22_500.0);
    request.underlying.use_manual = true;
    let quoted = request.price(&dispatcher()).unwrap();
    assert_eq!(quoted.result.inputs.spot, 22_500.0);
    assert!(quoted.result.ce_price > 500.0);
}

#[test]
fn missing_underlying_is_rejected() {
    let mut request: PricingRequest = serde_json::from_str(BSM_REQUEST).unwrap();
    request.underlying.live = None;
    let err = request.price(&dispatcher()).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn heston_parameters_default_when_omitted() {
    let json = BSM_REQUEST.replace(
        r#"{ "model": "BSM" }"#,
        r#"{ "model": "Heston", "steps": 20, "sims": 2000 }"#,
    );
    let request: PricingRequest = serde_json::from_str(&json).unwrap();
    let ModelParameters::Heston(params) = request.model else {
        panic!("expected Heston, got {}", request.model);
    };
    assert_eq!(params.kappa, 2.0);
    assert_eq!(params.rho, -0.7);
    assert_eq!(params.sims, 2_000);

    let quoted = request.price(&dispatcher()).unwrap();
    assert!(quoted.result.ce_std_error.is_some());
    assert!(quoted.result.ce_price > 0.0 && quoted.result.pe_price > 0.0);
}

#[test]
fn variance_gamma_constraint_reaches_the_caller() {
    let json = BSM_REQUEST.replace(
        r#"{ "model": "BSM" }"#,
        r#"{ "model": "VarianceGamma", "sigma": 0.2, "nu": 2.0, "theta": 0.5 }"#,
    );
    let request: PricingRequest = serde_json::from_str(&json).unwrap();
    let err = request.price(&dispatcher()).unwrap_err();
    assert!(matches!(err, Error::ParameterConstraintViolated(_)), "{err}");
}

#[test]
fn unknown_model_tag_fails_to_parse() {
    let json = BSM_REQUEST.replace(r#""BSM""#, r#""SABR""#);
    assert!(serde_json::from_str::<PricingRequest>(&json).is_err());
}
