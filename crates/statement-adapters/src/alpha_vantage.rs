use std::collections::HashMap;

use chrono::Datelike;
use growth_core::{AdaptedStatements, GrowthError, OverviewScalars, Provider};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce;
use crate::statements::{self, CashFlowRow, IncomeRow};

/// Raw Alpha Vantage responses for one ticker, exactly as the API returned them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlphaVantagePayload {
    /// `function=INCOME_STATEMENT`
    #[serde(default)]
    pub income_statement: Value,
    /// `function=CASH_FLOW`
    #[serde(default)]
    pub cash_flow: Value,
    /// `function=EARNINGS`
    #[serde(default)]
    pub earnings: Option<Value>,
    /// `function=OVERVIEW`
    #[serde(default)]
    pub overview: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnualIncomeReport {
    #[serde(default)]
    fiscal_date_ending: Value,
    #[serde(default)]
    total_revenue: Value,
    #[serde(default)]
    operating_income: Value,
    #[serde(default)]
    net_income: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnualCashFlowReport {
    #[serde(default)]
    fiscal_date_ending: Value,
    #[serde(default)]
    operating_cashflow: Value,
    #[serde(default)]
    capital_expenditures: Value,
}

#[derive(Debug, Deserialize)]
struct AnnualEarnings {
    #[serde(rename = "fiscalDateEnding", default)]
    fiscal_date_ending: Value,
    #[serde(rename = "reportedEPS", default)]
    reported_eps: Value,
}

#[derive(Debug, Default, Deserialize)]
struct CompanyOverview {
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Beta", default)]
    beta: Value,
    #[serde(rename = "ReturnOnEquityTTM", default)]
    return_on_equity: Value,
}

impl AlphaVantagePayload {
    pub fn adapt(&self, ticker: &str) -> Result<AdaptedStatements, GrowthError> {
        check_response(&self.income_statement)?;
        check_response(&self.cash_flow)?;

        let eps_by_year = match &self.earnings {
            // Earnings only refine the EPS proxy; net income still covers a failed call
            Some(earnings) => match check_response(earnings)
                .and_then(|_| reports::<AnnualEarnings>(earnings, "annualEarnings"))
            {
                Ok(annual) => annual
                    .into_iter()
                    .filter_map(|e| {
                        let year = coerce::date(&e.fiscal_date_ending)?.year();
                        Some((year, coerce::number(&e.reported_eps)?))
                    })
                    .collect::<HashMap<i32, f64>>(),
                Err(e) => {
                    tracing::debug!("{}: earnings unavailable ({}), using net income", ticker, e);
                    HashMap::new()
                }
            },
            None => HashMap::new(),
        };

        let income = reports::<AnnualIncomeReport>(&self.income_statement, "annualReports")?
            .into_iter()
            .map(|r| {
                let fiscal_year_end = coerce::date(&r.fiscal_date_ending);
                IncomeRow {
                    eps: fiscal_year_end.and_then(|d| eps_by_year.get(&d.year()).copied()),
                    fiscal_year_end,
                    total_revenue: coerce::number_or_zero(&r.total_revenue),
                    operating_income: coerce::number_or_zero(&r.operating_income),
                    net_income: coerce::number_or_zero(&r.net_income),
                }
            })
            .collect();

        let cash_flow = reports::<AnnualCashFlowReport>(&self.cash_flow, "annualReports")?
            .into_iter()
            .map(|r| CashFlowRow {
                fiscal_year_end: coerce::date(&r.fiscal_date_ending),
                operating_cash_flow: coerce::number_or_zero(&r.operating_cashflow),
                capital_expenditures: coerce::number_or_zero(&r.capital_expenditures),
            })
            .collect();

        let years = statements::assemble(ticker, income, cash_flow)?;

        // A broken overview degrades to defaults rather than failing the ticker
        let overview = self
            .overview
            .as_ref()
            .and_then(|v| serde_json::from_value::<CompanyOverview>(v.clone()).ok())
            .unwrap_or_default();
        let beta = coerce::number(&overview.beta);
        let roe = coerce::number(&overview.return_on_equity);
        if beta.is_none() || roe.is_none() {
            tracing::debug!("{}: overview incomplete (beta={:?}, roe={:?}), using defaults", ticker, beta, roe);
        }

        Ok(AdaptedStatements {
            ticker: ticker.to_string(),
            name: overview
                .name
                .filter(|n| !n.trim().is_empty() && n != "None")
                .unwrap_or_else(|| ticker.to_string()),
            provider: Provider::AlphaVantage,
            years,
            overview: OverviewScalars::from_raw(beta, roe),
        })
    }
}

/// Alpha Vantage reports failures inside a 200 response body.
fn check_response(json: &Value) -> Result<(), GrowthError> {
    if let Some(error) = json.get("Error Message") {
        return Err(GrowthError::Provider(format!("Alpha Vantage error: {}", error)));
    }
    if let Some(note) = json.get("Note") {
        return Err(GrowthError::Provider(format!("Alpha Vantage rate limit: {}", note)));
    }
    if let Some(info) = json.get("Information") {
        return Err(GrowthError::Provider(format!("Alpha Vantage: {}", info)));
    }
    Ok(())
}

fn reports<T: DeserializeOwned>(json: &Value, key: &str) -> Result<Vec<T>, GrowthError> {
    match json.get(key) {
        Some(list @ Value::Array(_)) => serde_json::from_value(list.clone())
            .map_err(|e| GrowthError::InvalidPayload(format!("Alpha Vantage {}: {}", key, e))),
        // absent, null or a placeholder such as "None": no reports
        Some(other) => {
            if !other.is_null() {
                tracing::debug!("Alpha Vantage {} is not a list: {}", key, other);
            }
            Ok(Vec::new())
        }
        None => Ok(Vec::new()),
    }
}
