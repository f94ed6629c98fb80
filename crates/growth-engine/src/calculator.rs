use growth_core::{GrowthComponents, GrowthIndexResult, GrowthMetrics, Weights};

use crate::factors::{ConsistencyFactor, QualityFactor};
use crate::growth::round_to;

/// Combines weighted growth metrics with the consistency and quality factors.
///
/// Pure and deterministic: rounding happens once, when the result is built.
#[derive(Debug, Clone, Default)]
pub struct GrowthIndexCalculator {
    consistency: ConsistencyFactor,
    quality: QualityFactor,
}

impl GrowthIndexCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_factors(consistency: ConsistencyFactor, quality: QualityFactor) -> Self {
        Self { consistency, quality }
    }

    pub fn calculate(&self, metrics: &GrowthMetrics, weights: &Weights) -> GrowthIndexResult {
        let revenue = weights.revenue * metrics.revenue_cagr;
        let eps = weights.eps * metrics.eps_cagr;
        let fcf = weights.fcf * metrics.fcf_cagr;
        let margin = weights.margin * metrics.margin_delta;
        let base_score = revenue + eps + fcf + margin;

        let consistency_factor = self.consistency.compute(&metrics.annual_revenue_growth);
        let quality_factor = self.quality.compute(metrics.roic, metrics.wacc);
        let growth_index = base_score * consistency_factor * quality_factor;

        GrowthIndexResult {
            growth_index: round_to(growth_index, 2),
            base_score: round_to(base_score, 2),
            consistency_factor: round_to(consistency_factor, 3),
            quality_factor: round_to(quality_factor, 3),
            components: GrowthComponents {
                revenue: round_to(revenue, 2),
                eps: round_to(eps, 2),
                fcf: round_to(fcf, 2),
                margin: round_to(margin, 2),
            },
        }
    }
}

/// Growth index with the default factor bounds; `None` selects [`Weights::DEFAULT`].
pub fn calculate_growth_index(metrics: &GrowthMetrics, weights: Option<Weights>) -> GrowthIndexResult {
    GrowthIndexCalculator::new().calculate(metrics, &weights.unwrap_or_default())
}
