use growth_core::{
    AdaptedStatements, GrowthError, GrowthMetrics, OverviewScalars, RawYearlyFinancials,
    REQUIRED_YEARS,
};

use crate::growth::{cagr, round_to, year_over_year};

/// Derives growth metrics from four years of newest-first statements.
///
/// The cost of capital is a CAPM estimate with fixed market assumptions.
/// ROIC is approximated by return on equity because the providers do not
/// expose invested capital consistently.
#[derive(Debug, Clone, Default)]
pub struct MetricsDeriver;

impl MetricsDeriver {
    pub const RISK_FREE_RATE: f64 = 4.5;
    pub const MARKET_RISK_PREMIUM: f64 = 5.5;
    pub const MIN_BETA: f64 = 0.5;
    pub const MAX_BETA: f64 = 2.5;
    /// Lookback between the oldest and newest of the four years
    pub const CAGR_YEARS: f64 = 3.0;

    pub fn new() -> Self {
        Self
    }

    pub fn derive(&self, statements: &AdaptedStatements) -> Result<GrowthMetrics, GrowthError> {
        let years: &[RawYearlyFinancials; REQUIRED_YEARS] = statements
            .years
            .get(..REQUIRED_YEARS)
            .and_then(|slice| slice.try_into().ok())
            .ok_or_else(|| {
                GrowthError::insufficient_history(&statements.ticker, statements.years.len())
            })?;
        Ok(self.derive_years(years, &statements.overview))
    }

    pub fn derive_years(
        &self,
        years: &[RawYearlyFinancials; REQUIRED_YEARS],
        overview: &OverviewScalars,
    ) -> GrowthMetrics {
        let newest = &years[0];
        let oldest = &years[REQUIRED_YEARS - 1];

        let revenue_cagr = cagr(oldest.total_revenue, newest.total_revenue, Self::CAGR_YEARS);
        let eps_cagr = cagr(oldest.earnings, newest.earnings, Self::CAGR_YEARS);
        let fcf_cagr = cagr(oldest.free_cash_flow(), newest.free_cash_flow(), Self::CAGR_YEARS);
        let margin_delta = newest.operating_margin() - oldest.operating_margin();

        // oldest pair first
        let annual_revenue_growth = (1..REQUIRED_YEARS)
            .rev()
            .map(|i| year_over_year(years[i].total_revenue, years[i - 1].total_revenue))
            .map(|g| round_to(g, 1))
            .collect();

        GrowthMetrics {
            revenue_cagr: round_to(revenue_cagr, 1),
            eps_cagr: round_to(eps_cagr, 1),
            fcf_cagr: round_to(fcf_cagr, 1),
            margin_delta: round_to(margin_delta, 1),
            annual_revenue_growth,
            roic: round_to(Self::roic(overview), 1),
            wacc: round_to(Self::wacc(overview.beta), 1),
        }
    }

    pub fn wacc(beta: f64) -> f64 {
        Self::RISK_FREE_RATE + beta.clamp(Self::MIN_BETA, Self::MAX_BETA) * Self::MARKET_RISK_PREMIUM
    }

    pub fn roic(overview: &OverviewScalars) -> f64 {
        overview.return_on_equity * 100.0
    }
}
