use std::path::PathBuf;

use async_trait::async_trait;
use growth_core::{GrowthError, Provider};
use growth_orchestrator::StatementSource;
use statement_adapters::ProviderPayload;

/// Reads `<dir>/<TICKER>.json` payloads written by the fetch layer
pub struct FileSource {
    dir: PathBuf,
    expected: Provider,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>, expected: Provider) -> Self {
        Self {
            dir: dir.into(),
            expected,
        }
    }

    fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{}.json", ticker))
    }
}

#[async_trait]
impl StatementSource for FileSource {
    async fn fetch(&self, ticker: &str) -> Result<ProviderPayload, GrowthError> {
        let path = self.path_for(ticker);
        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| GrowthError::Source(format!("{}: {}", path.display(), e)))?;

        let payload: ProviderPayload = serde_json::from_str(&contents)
            .map_err(|e| GrowthError::InvalidPayload(format!("{}: {}", path.display(), e)))?;

        if payload.provider() != self.expected {
            tracing::warn!(
                "{} holds {} data, expected {}",
                path.display(),
                payload.provider(),
                self.expected
            );
        }
        Ok(payload)
    }
}
