//! Growth Index engine
//!
//! Pure calculation pipeline: adapted statements -> growth metrics ->
//! composite growth index -> interpretation. No I/O and no shared state,
//! so pipelines for different tickers can run in any order or in parallel.

pub mod calculator;
pub mod factors;
pub mod growth;
pub mod interpreter;
pub mod metrics;

pub use calculator::{calculate_growth_index, GrowthIndexCalculator};
pub use factors::{ConsistencyFactor, QualityFactor};
pub use growth::{cagr, round_to, year_over_year};
pub use interpreter::interpret_growth_index;
pub use metrics::MetricsDeriver;

use growth_core::{AdaptedStatements, CompanyResult, GrowthError, Weights};

/// Runs the full calculation for one company
#[derive(Debug, Clone, Default)]
pub struct GrowthIndexEngine {
    deriver: MetricsDeriver,
    calculator: GrowthIndexCalculator,
}

impl GrowthIndexEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_calculator(calculator: GrowthIndexCalculator) -> Self {
        Self {
            deriver: MetricsDeriver::new(),
            calculator,
        }
    }

    pub fn evaluate(
        &self,
        statements: &AdaptedStatements,
        weights: &Weights,
    ) -> Result<CompanyResult, GrowthError> {
        let metrics = self.deriver.derive(statements)?;
        let result = self.calculator.calculate(&metrics, weights);
        let interpretation = interpret_growth_index(result.growth_index);

        tracing::debug!(
            "{}: growth index {:.2} (base {:.2}, cf {:.3}, qf {:.3})",
            statements.ticker,
            result.growth_index,
            result.base_score,
            result.consistency_factor,
            result.quality_factor
        );

        Ok(CompanyResult {
            ticker: statements.ticker.clone(),
            name: statements.name.clone(),
            result,
            metrics,
            interpretation,
        })
    }
}
