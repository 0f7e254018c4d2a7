//! Pricing requests as a presentation front end sends them.
//!
//! The front end picks a symbol, expiry, and strike, forwards the market-data
//! record for that strike, and supplies either the live underlying price or a
//! manually entered override. This module resolves those into
//! [`MarketInputs`] and returns theoretical prices next to the quoted market
//! prices.

use op_core::{Error, Price, Rate, Real, Result, Time};
use op_pricingengines::{MarketInputs, ModelParameters, PricingDispatcher, PricingResult};
use serde::{Deserialize, Serialize};
use tracing::info;

/// One strike's market-data record, as the data collaborator supplies it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketQuote {
    /// Strike price.
    pub strike: Price,
    /// Years to expiry.
    pub time_to_expiry: Time,
    /// Annualized risk-free rate.
    pub risk_free_rate: Rate,
    /// Call implied volatility, percent.
    pub ce_iv: Real,
    /// Put implied volatility, percent.
    pub pe_iv: Real,
    /// Last traded call price, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ce_market_price: Option<Price>,
    /// Last traded put price, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pe_market_price: Option<Price>,
}

/// Live and manually entered underlying prices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnderlyingPrice {
    /// Price from the live feed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live: Option<Price>,
    /// Price typed in by the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual: Option<Price>,
    /// Prefer the manual price when one is present.
    pub use_manual: bool,
}

impl UnderlyingPrice {
    /// Only a live price.
    pub fn live(price: Price) -> Self {
        Self {
            live: Some(price),
            ..Self::default()
        }
    }

    /// Only a manual override, switched on.
    pub fn manual(price: Price) -> Self {
        Self {
            manual: Some(price),
            use_manual: true,
            ..Self::default()
        }
    }

    /// The price to use: the manual one if selected and present, else the
    /// live one.
    pub fn resolve(&self) -> Result<Price> {
        let chosen = match (self.use_manual, self.manual) {
            (true, Some(manual)) => Some(manual),
            _ => self.live,
        };
        chosen.ok_or_else(|| Error::InvalidInput("underlying price not resolved".into()))
    }
}

/// Everything needed to price one strike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRequest {
    /// Underlying symbol, e.g. `NIFTY`.
    pub symbol: String,
    /// Expiry label as shown to the user.
    pub expiry: String,
    /// Underlying price sources.
    pub underlying: UnderlyingPrice,
    /// Market data for the chosen strike.
    pub quote: MarketQuote,
    /// Model and parameters.
    pub model: ModelParameters,
}

/// Theoretical prices alongside the market prices they are compared with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotedPricing {
    /// Underlying symbol.
    pub symbol: String,
    /// Expiry label.
    pub expiry: String,
    /// Engine output.
    pub result: PricingResult,
    /// Quoted call price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ce_market_price: Option<Price>,
    /// Quoted put price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pe_market_price: Option<Price>,
}

impl PricingRequest {
    /// Resolve the underlying and combine it with the quote.
    pub fn market_inputs(&self) -> Result<MarketInputs> {
        let spot = self.underlying.resolve()?;
        Ok(MarketInputs {
            spot,
            strike: self.quote.strike,
            time_to_expiry: self.quote.time_to_expiry,
            risk_free_rate: self.quote.risk_free_rate,
            ce_iv: self.quote.ce_iv,
            pe_iv: self.quote.pe_iv,
        })
    }

    /// Price the request with `dispatcher`.
    pub fn price(&self, dispatcher: &PricingDispatcher) -> Result<QuotedPricing> {
        let inputs = self.market_inputs()?;
        let result = dispatcher.price(&inputs, &self.model)?;
        info!(
            symbol = %self.symbol,
            expiry = %self.expiry,
            strike = inputs.strike,
            model = self.model.name(),
            ce_price = result.ce_price,
            pe_price = result.pe_price,
            "priced request"
        );
        Ok(QuotedPricing {
            symbol: self.symbol.clone(),
            expiry: self.expiry.clone(),
            result,
            ce_market_price: self.quote.ce_market_price,
            pe_market_price: self.quote.pe_market_price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_override_wins_only_when_selected() {
        let both = UnderlyingPrice {
            live: Some(22_000.0),
            manual: Some(22_150.0),
            use_manual: false,
        };
        assert_eq!(both.resolve(), Ok(22_000.0));
        assert_eq!(UnderlyingPrice { use_manual: true, ..both }.resolve(), Ok(22_150.0));
    }

    #[test]
    fn selected_but_missing_manual_falls_back_to_live() {
        let p = UnderlyingPrice {
            live: Some(22_000.0),
            manual: None,
            use_manual: true,
        };
        assert_eq!(p.resolve(), Ok(22_000.0));
        assert_eq!(UnderlyingPrice::manual(21_000.0).resolve(), Ok(21_000.0));
    }

    #[test]
    fn unresolved_underlying_is_invalid_input() {
        let err = UnderlyingPrice::default().resolve().unwrap_err();
        assert_eq!(err, Error::InvalidInput("underlying price not resolved".into()));
        let manual_unselected = UnderlyingPrice {
            manual: Some(1.0),
            ..UnderlyingPrice::default()
        };
        assert!(manual_unselected.resolve().is_err());
    }
}
