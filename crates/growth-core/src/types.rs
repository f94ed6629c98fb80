use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::GrowthError;

/// Number of annual reports every growth calculation needs.
pub const REQUIRED_YEARS: usize = 4;

/// Data provider a payload came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    AlphaVantage,
    Yahoo,
}

/// How a batch schedules its per-ticker pipelines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    Concurrent,
    Sequential,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::AlphaVantage => "alpha_vantage",
            Provider::Yahoo => "yahoo",
        }
    }

    /// Largest batch the provider tolerates per request.
    /// Alpha Vantage free keys allow 5 calls/min, so its ceiling is stricter.
    pub fn max_tickers(&self) -> usize {
        match self {
            Provider::AlphaVantage => 5,
            Provider::Yahoo => 10,
        }
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        match self {
            Provider::AlphaVantage => ExecutionMode::Sequential,
            Provider::Yahoo => ExecutionMode::Concurrent,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = GrowthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alpha_vantage" | "alphavantage" | "alpha-vantage" => Ok(Provider::AlphaVantage),
            "yahoo" | "yahoo_finance" => Ok(Provider::Yahoo),
            other => Err(GrowthError::InvalidPayload(format!("unknown provider '{}'", other))),
        }
    }
}

impl FromStr for ExecutionMode {
    type Err = GrowthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "concurrent" | "parallel" => Ok(ExecutionMode::Concurrent),
            "sequential" => Ok(ExecutionMode::Sequential),
            other => Err(GrowthError::InvalidPayload(format!("unknown execution mode '{}'", other))),
        }
    }
}

/// One fiscal year of provider-neutral statement data, newest-first in any sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawYearlyFinancials {
    pub fiscal_year_end: Option<NaiveDate>,
    pub total_revenue: f64,
    pub operating_income: f64,
    /// Reported EPS when the provider has it for every year, net income otherwise
    pub earnings: f64,
    pub operating_cash_flow: f64,
    pub capital_expenditures: f64,
}

impl RawYearlyFinancials {
    /// Capex sign differs between providers, so its magnitude is always subtracted.
    pub fn free_cash_flow(&self) -> f64 {
        self.operating_cash_flow - self.capital_expenditures.abs()
    }

    /// Operating margin in percent, 0 when revenue is not positive
    pub fn operating_margin(&self) -> f64 {
        if self.total_revenue > 0.0 {
            self.operating_income / self.total_revenue * 100.0
        } else {
            0.0
        }
    }
}

/// Scalar company overview values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewScalars {
    pub beta: f64,
    /// Fraction, e.g. 0.15 for 15%
    pub return_on_equity: f64,
}

impl OverviewScalars {
    pub const DEFAULT_BETA: f64 = 1.0;
    pub const DEFAULT_RETURN_ON_EQUITY: f64 = 0.15;

    /// Missing, zero or non-finite values fall back to the defaults.
    pub fn from_raw(beta: Option<f64>, return_on_equity: Option<f64>) -> Self {
        Self {
            beta: usable(beta).unwrap_or(Self::DEFAULT_BETA),
            return_on_equity: usable(return_on_equity).unwrap_or(Self::DEFAULT_RETURN_ON_EQUITY),
        }
    }
}

impl Default for OverviewScalars {
    fn default() -> Self {
        Self {
            beta: Self::DEFAULT_BETA,
            return_on_equity: Self::DEFAULT_RETURN_ON_EQUITY,
        }
    }
}

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v != 0.0)
}

/// Adapter output for one ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptedStatements {
    pub ticker: String,
    pub name: String,
    pub provider: Provider,
    /// Exactly [`REQUIRED_YEARS`] entries, newest first
    pub years: Vec<RawYearlyFinancials>,
    pub overview: OverviewScalars,
}

/// Derived growth metrics, all in percent and rounded to one decimal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthMetrics {
    pub revenue_cagr: f64,
    pub eps_cagr: f64,
    pub fcf_cagr: f64,
    pub margin_delta: f64,
    /// Year-over-year revenue growth, oldest pair first
    pub annual_revenue_growth: Vec<f64>,
    pub roic: f64,
    pub wacc: f64,
}

/// Factor weights for the base score. They are used as given, never renormalised.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub revenue: f64,
    pub eps: f64,
    pub fcf: f64,
    pub margin: f64,
}

impl Weights {
    pub const DEFAULT: Weights = Weights {
        revenue: 0.35,
        eps: 0.30,
        fcf: 0.20,
        margin: 0.15,
    };

    /// Preset used by the breakdown display
    pub const DISPLAY: Weights = Weights {
        revenue: 0.30,
        eps: 0.25,
        fcf: 0.25,
        margin: 0.20,
    };
}

impl Default for Weights {
    fn default() -> Self {
        Weights::DEFAULT
    }
}

impl FromStr for Weights {
    type Err = GrowthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Weights::DEFAULT),
            "display" => Ok(Weights::DISPLAY),
            other => Err(GrowthError::InvalidPayload(format!("unknown weight preset '{}'", other))),
        }
    }
}

/// Weighted contribution of each factor to the base score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthComponents {
    pub revenue: f64,
    pub eps: f64,
    pub fcf: f64,
    pub margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthIndexResult {
    pub growth_index: f64,
    pub base_score: f64,
    pub consistency_factor: f64,
    pub quality_factor: f64,
    pub components: GrowthComponents,
}

/// Discrete growth tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthTier {
    Exceptional,
    Strong,
    Moderate,
    Low,
    Declining,
}

impl GrowthTier {
    /// Lower bounds are inclusive; the bands cover the whole real line.
    pub fn from_score(growth_index: f64) -> Self {
        match growth_index {
            s if s >= 40.0 => GrowthTier::Exceptional,
            s if s >= 25.0 => GrowthTier::Strong,
            s if s >= 15.0 => GrowthTier::Moderate,
            s if s >= 5.0 => GrowthTier::Low,
            _ => GrowthTier::Declining,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GrowthTier::Exceptional => "Exceptional Growth",
            GrowthTier::Strong => "Strong Growth",
            GrowthTier::Moderate => "Moderate Growth",
            GrowthTier::Low => "Low Growth",
            GrowthTier::Declining => "Declining/Stagnant",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GrowthTier::Exceptional => {
                "Rapid, steady compounding backed by efficient use of capital"
            }
            GrowthTier::Strong => "Well above average growth with solid fundamentals",
            GrowthTier::Moderate => "Healthy growth in line with a maturing business",
            GrowthTier::Low => "Modest growth, roughly tracking the broader economy",
            GrowthTier::Declining => "Flat or shrinking fundamentals over the period",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpretation {
    pub label: String,
    pub description: String,
}

impl From<GrowthTier> for Interpretation {
    fn from(tier: GrowthTier) -> Self {
        Self {
            label: tier.label().to_string(),
            description: tier.description().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResult {
    pub ticker: String,
    pub name: String,
    pub result: GrowthIndexResult,
    pub metrics: GrowthMetrics,
    pub interpretation: Interpretation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerFailure {
    pub ticker: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchEntry {
    Success(CompanyResult),
    Failure(TickerFailure),
}

impl BatchEntry {
    pub fn ticker(&self) -> &str {
        match self {
            BatchEntry::Success(company) => &company.ticker,
            BatchEntry::Failure(failure) => &failure.ticker,
        }
    }
}

/// Per-ticker outcomes of one batch, in input order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub entries: Vec<BatchEntry>,
}

impl BatchResult {
    pub fn new(entries: Vec<BatchEntry>) -> Self {
        Self { entries }
    }

    /// True when at least one ticker succeeded
    pub fn is_success(&self) -> bool {
        self.successes().next().is_some()
    }

    pub fn successes(&self) -> impl Iterator<Item = &CompanyResult> {
        self.entries.iter().filter_map(|entry| match entry {
            BatchEntry::Success(company) => Some(company),
            BatchEntry::Failure(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &TickerFailure> {
        self.entries.iter().filter_map(|entry| match entry {
            BatchEntry::Failure(failure) => Some(failure),
            BatchEntry::Success(_) => None,
        })
    }

    /// Aggregated failure message, present only when nothing succeeded
    pub fn error_message(&self) -> Option<String> {
        if self.is_success() {
            return None;
        }
        let reasons = self
            .failures()
            .map(|f| format!("{}: {}", f.ticker, f.reason))
            .collect::<Vec<_>>();
        if reasons.is_empty() {
            Some("No tickers to analyze".to_string())
        } else {
            Some(reasons.join("; "))
        }
    }

    /// Successes ordered by growth index, highest first
    pub fn ranked(&self) -> Vec<CompanyResult> {
        let mut ranked: Vec<CompanyResult> = self.successes().cloned().collect();
        ranked.sort_by(|a, b| {
            b.result
                .growth_index
                .partial_cmp(&a.result.growth_index)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }

    pub fn into_result(self) -> Result<Vec<CompanyResult>, GrowthError> {
        if let Some(message) = self.error_message() {
            return Err(GrowthError::BatchFailed(message));
        }
        Ok(self
            .entries
            .into_iter()
            .filter_map(|entry| match entry {
                BatchEntry::Success(company) => Some(company),
                BatchEntry::Failure(_) => None,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company(ticker: &str, growth_index: f64) -> CompanyResult {
        CompanyResult {
            ticker: ticker.to_string(),
            name: format!("{} Inc", ticker),
            result: GrowthIndexResult {
                growth_index,
                base_score: growth_index,
                consistency_factor: 1.0,
                quality_factor: 1.0,
                components: GrowthComponents {
                    revenue: 0.0,
                    eps: 0.0,
                    fcf: 0.0,
                    margin: 0.0,
                },
            },
            metrics: GrowthMetrics {
                revenue_cagr: 0.0,
                eps_cagr: 0.0,
                fcf_cagr: 0.0,
                margin_delta: 0.0,
                annual_revenue_growth: vec![],
                roic: 15.0,
                wacc: 10.0,
            },
            interpretation: GrowthTier::from_score(growth_index).into(),
        }
    }

    fn failure(ticker: &str, reason: &str) -> BatchEntry {
        BatchEntry::Failure(TickerFailure {
            ticker: ticker.to_string(),
            reason: reason.to_string(),
        })
    }

    #[test]
    fn test_free_cash_flow_uses_capex_magnitude() {
        let mut year = RawYearlyFinancials {
            fiscal_year_end: None,
            total_revenue: 100.0,
            operating_income: 20.0,
            earnings: 10.0,
            operating_cash_flow: 50.0,
            capital_expenditures: -15.0,
        };
        assert_eq!(year.free_cash_flow(), 35.0);
        year.capital_expenditures = 15.0;
        assert_eq!(year.free_cash_flow(), 35.0);
    }

    #[test]
    fn test_operating_margin_guards_revenue() {
        let year = RawYearlyFinancials {
            fiscal_year_end: None,
            total_revenue: 0.0,
            operating_income: 20.0,
            earnings: 0.0,
            operating_cash_flow: 0.0,
            capital_expenditures: 0.0,
        };
        assert_eq!(year.operating_margin(), 0.0);
    }

    #[test]
    fn test_overview_defaults() {
        let overview = OverviewScalars::from_raw(None, Some(f64::NAN));
        assert_eq!(overview, OverviewScalars::default());

        let overview = OverviewScalars::from_raw(Some(1.3), Some(0.42));
        assert_eq!(overview.beta, 1.3);
        assert_eq!(overview.return_on_equity, 0.42);
    }

    #[test]
    fn test_weight_presets() {
        assert_eq!("display".parse::<Weights>().unwrap(), Weights::DISPLAY);
        assert_eq!(Weights::default(), Weights::DEFAULT);
        assert!("balanced".parse::<Weights>().is_err());
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(GrowthTier::from_score(40.0), GrowthTier::Exceptional);
        assert_eq!(GrowthTier::from_score(39.99), GrowthTier::Strong);
        assert_eq!(GrowthTier::from_score(25.0), GrowthTier::Strong);
        assert_eq!(GrowthTier::from_score(15.0), GrowthTier::Moderate);
        assert_eq!(GrowthTier::from_score(5.0), GrowthTier::Low);
        assert_eq!(GrowthTier::from_score(4.99), GrowthTier::Declining);
        assert_eq!(GrowthTier::from_score(-1.0), GrowthTier::Declining);
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!("alphavantage".parse::<Provider>().unwrap(), Provider::AlphaVantage);
        assert_eq!("Yahoo".parse::<Provider>().unwrap(), Provider::Yahoo);
        assert!(Provider::AlphaVantage.max_tickers() < Provider::Yahoo.max_tickers());
    }

    #[test]
    fn test_batch_mixed_results() {
        let batch = BatchResult::new(vec![
            BatchEntry::Success(company("AAPL", 12.0)),
            failure("XYZ", "no data"),
            BatchEntry::Success(company("NVDA", 55.0)),
        ]);

        assert!(batch.is_success());
        assert!(batch.error_message().is_none());
        assert_eq!(batch.failures().count(), 1);

        let ranked = batch.ranked();
        assert_eq!(ranked[0].ticker, "NVDA");
        assert_eq!(ranked[1].ticker, "AAPL");
        // ranking leaves the batch order alone
        assert_eq!(batch.entries[0].ticker(), "AAPL");
    }

    #[test]
    fn test_batch_total_failure_aggregates_reasons() {
        let batch = BatchResult::new(vec![failure("AAA", "first"), failure("BBB", "second")]);

        assert!(!batch.is_success());
        let message = batch.error_message().unwrap();
        assert!(message.contains("first"));
        assert!(message.contains("second"));

        match batch.into_result() {
            Err(GrowthError::BatchFailed(msg)) => assert!(msg.contains("BBB")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
