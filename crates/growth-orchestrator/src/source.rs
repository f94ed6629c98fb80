use std::collections::HashMap;

use async_trait::async_trait;
use growth_core::GrowthError;
use statement_adapters::ProviderPayload;

/// Supplies already-fetched provider payloads.
///
/// Fetching, caching, retries and provider throttling live behind this trait.
#[async_trait]
pub trait StatementSource: Send + Sync {
    async fn fetch(&self, ticker: &str) -> Result<ProviderPayload, GrowthError>;
}

/// Payloads held in memory, keyed by ticker
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    payloads: HashMap<String, ProviderPayload>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ticker: impl Into<String>, payload: impl Into<ProviderPayload>) {
        self.payloads.insert(ticker.into(), payload.into());
    }

    pub fn with_payload(mut self, ticker: impl Into<String>, payload: impl Into<ProviderPayload>) -> Self {
        self.insert(ticker, payload);
        self
    }
}

#[async_trait]
impl StatementSource for InMemorySource {
    async fn fetch(&self, ticker: &str) -> Result<ProviderPayload, GrowthError> {
        self.payloads
            .get(ticker)
            .cloned()
            .ok_or_else(|| GrowthError::Source(format!("no statements loaded for {}", ticker)))
    }
}
