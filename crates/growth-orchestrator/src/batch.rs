use std::sync::Arc;

use growth_core::{
    BatchEntry, BatchResult, CompanyResult, ExecutionMode, GrowthError, TickerFailure, Weights,
};
use growth_engine::GrowthIndexEngine;
use tokio::task::JoinSet;

use crate::source::StatementSource;

/// Runs the growth index pipeline for a batch of tickers.
///
/// Each ticker is independent: a failure is recorded for that ticker and the
/// rest of the batch carries on. Results keep the input order whichever
/// execution mode is used.
pub struct BatchOrchestrator<S> {
    source: Arc<S>,
    engine: Arc<GrowthIndexEngine>,
    weights: Weights,
    mode: ExecutionMode,
}

impl<S: StatementSource + 'static> BatchOrchestrator<S> {
    pub fn new(source: S) -> Self {
        Self::from_arc(Arc::new(source))
    }

    pub fn from_arc(source: Arc<S>) -> Self {
        Self {
            source,
            engine: Arc::new(GrowthIndexEngine::new()),
            weights: Weights::DEFAULT,
            mode: ExecutionMode::Concurrent,
        }
    }

    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_engine(mut self, engine: GrowthIndexEngine) -> Self {
        self.engine = Arc::new(engine);
        self
    }

    /// Evaluate at most `max_count` tickers; anything beyond is dropped silently.
    pub async fn run(&self, tickers: &[String], max_count: usize) -> BatchResult {
        let selected: Vec<String> = tickers.iter().take(max_count).cloned().collect();
        if tickers.len() > selected.len() {
            tracing::info!(
                "Batch limited to {} of {} tickers",
                selected.len(),
                tickers.len()
            );
        }

        tracing::info!("📊 Starting growth index batch of {} tickers ({:?})", selected.len(), self.mode);

        let entries = match self.mode {
            ExecutionMode::Sequential => self.run_sequential(&selected).await,
            ExecutionMode::Concurrent => self.run_concurrent(&selected).await,
        };
        let batch = BatchResult::new(entries);

        tracing::info!(
            "✅ Batch complete: {}/{} tickers scored",
            batch.successes().count(),
            batch.entries.len()
        );

        batch
    }

    async fn run_sequential(&self, tickers: &[String]) -> Vec<BatchEntry> {
        let mut entries = Vec::with_capacity(tickers.len());
        for ticker in tickers {
            entries.push(process(self.source.as_ref(), &self.engine, &self.weights, ticker).await);
        }
        entries
    }

    async fn run_concurrent(&self, tickers: &[String]) -> Vec<BatchEntry> {
        let mut tasks = JoinSet::new();

        for (index, ticker) in tickers.iter().enumerate() {
            let source = Arc::clone(&self.source);
            let engine = Arc::clone(&self.engine);
            let weights = self.weights;
            let ticker = ticker.clone();
            tasks.spawn(async move {
                let entry = process(source.as_ref(), &engine, &weights, &ticker).await;
                (index, entry)
            });
        }

        let mut slots: Vec<Option<BatchEntry>> = vec![None; tickers.len()];
        while let Some(result) = tasks.join_next().await {
            match result {
                Ok((index, entry)) => slots[index] = Some(entry),
                Err(e) => tracing::error!("Task error: {}", e),
            }
        }

        slots
            .into_iter()
            .zip(tickers)
            .map(|(slot, ticker)| {
                slot.unwrap_or_else(|| {
                    BatchEntry::Failure(TickerFailure {
                        ticker: ticker.clone(),
                        reason: "analysis task aborted".to_string(),
                    })
                })
            })
            .collect()
    }
}

async fn process<S: StatementSource + ?Sized>(
    source: &S,
    engine: &GrowthIndexEngine,
    weights: &Weights,
    ticker: &str,
) -> BatchEntry {
    match evaluate_ticker(source, engine, weights, ticker).await {
        Ok(company) => BatchEntry::Success(company),
        Err(e) => {
            tracing::warn!("Failed to score {}: {}", ticker, e);
            BatchEntry::Failure(TickerFailure {
                ticker: ticker.to_string(),
                reason: e.to_string(),
            })
        }
    }
}

async fn evaluate_ticker<S: StatementSource + ?Sized>(
    source: &S,
    engine: &GrowthIndexEngine,
    weights: &Weights,
    ticker: &str,
) -> Result<CompanyResult, GrowthError> {
    let payload = source.fetch(ticker).await?;
    let statements = payload.adapt(ticker)?;
    engine.evaluate(&statements, weights)
}
