use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GrowthError {
    /// Fewer than four annual income statements or cash-flow statements.
    #[error("Insufficient history for {ticker}: {years_available} of 4 annual reports available")]
    InsufficientHistory { ticker: String, years_available: usize },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Source error: {0}")]
    Source(String),

    #[error("Batch failed: {0}")]
    BatchFailed(String),
}

impl GrowthError {
    pub fn insufficient_history(ticker: &str, years_available: usize) -> Self {
        GrowthError::InsufficientHistory {
            ticker: ticker.to_string(),
            years_available,
        }
    }
}
