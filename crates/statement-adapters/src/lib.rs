//! Statement adapters
//!
//! Convert raw provider payloads into the provider-neutral
//! [`AdaptedStatements`] shape: four years of newest-first statements plus
//! the overview scalars the growth engine needs.

pub mod alpha_vantage;
pub mod coerce;
mod statements;
pub mod yahoo;

pub use alpha_vantage::AlphaVantagePayload;
pub use yahoo::{QuoteSummary, YahooPayload};

use growth_core::{AdaptedStatements, GrowthError, Provider};
use serde::{Deserialize, Serialize};

/// An already-fetched payload, tagged by the provider it came from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum ProviderPayload {
    AlphaVantage(AlphaVantagePayload),
    Yahoo(YahooPayload),
}

impl ProviderPayload {
    pub fn provider(&self) -> Provider {
        match self {
            ProviderPayload::AlphaVantage(_) => Provider::AlphaVantage,
            ProviderPayload::Yahoo(_) => Provider::Yahoo,
        }
    }

    /// Fails with [`GrowthError::InsufficientHistory`] when fewer than four
    /// annual income or cash-flow statements are present.
    pub fn adapt(&self, ticker: &str) -> Result<AdaptedStatements, GrowthError> {
        match self {
            ProviderPayload::AlphaVantage(payload) => payload.adapt(ticker),
            ProviderPayload::Yahoo(payload) => payload.adapt(ticker),
        }
    }
}

impl From<AlphaVantagePayload> for ProviderPayload {
    fn from(payload: AlphaVantagePayload) -> Self {
        ProviderPayload::AlphaVantage(payload)
    }
}

impl From<YahooPayload> for ProviderPayload {
    fn from(payload: YahooPayload) -> Self {
        ProviderPayload::Yahoo(payload)
    }
}
