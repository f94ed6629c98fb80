use growth_core::{AdaptedStatements, GrowthError, OverviewScalars, Provider};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce;
use crate::statements::{self, CashFlowRow, IncomeRow};

/// Raw Yahoo Finance `quoteSummary` response requesting the
/// `incomeStatementHistory`, `cashflowStatementHistory`, `defaultKeyStatistics`,
/// `financialData` and `price` modules
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooPayload {
    #[serde(default)]
    pub quote_summary: QuoteSummary,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteSummary {
    #[serde(default)]
    pub result: Option<Vec<Value>>,
    #[serde(default)]
    pub error: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryModules {
    #[serde(default)]
    income_statement_history: Option<IncomeStatementHistory>,
    #[serde(default)]
    cashflow_statement_history: Option<CashflowStatementHistory>,
    #[serde(default)]
    default_key_statistics: Option<KeyStatistics>,
    #[serde(default)]
    summary_detail: Option<KeyStatistics>,
    #[serde(default)]
    financial_data: Option<FinancialData>,
    #[serde(default)]
    price: Option<PriceModule>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncomeStatementHistory {
    #[serde(default)]
    income_statement_history: Vec<IncomeStatement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncomeStatement {
    #[serde(default)]
    end_date: Value,
    #[serde(default)]
    total_revenue: Value,
    #[serde(default)]
    operating_income: Value,
    #[serde(default)]
    net_income: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CashflowStatementHistory {
    #[serde(default)]
    cashflow_statements: Vec<CashflowStatement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CashflowStatement {
    #[serde(default)]
    end_date: Value,
    #[serde(default)]
    total_cash_from_operating_activities: Value,
    #[serde(default)]
    capital_expenditures: Value,
}

#[derive(Debug, Default, Deserialize)]
struct KeyStatistics {
    #[serde(default)]
    beta: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinancialData {
    #[serde(default)]
    return_on_equity: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    long_name: Option<String>,
    short_name: Option<String>,
}

impl YahooPayload {
    pub fn adapt(&self, ticker: &str) -> Result<AdaptedStatements, GrowthError> {
        if let Some(error) = self.quote_summary.error.as_ref().filter(|e| !e.is_null()) {
            let description = error
                .get("description")
                .and_then(|d| d.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(GrowthError::Provider(format!("Yahoo Finance error: {}", description)));
        }

        let modules: SummaryModules = match self
            .quote_summary
            .result
            .as_ref()
            .and_then(|results| results.first())
        {
            Some(first) => serde_json::from_value(first.clone())
                .map_err(|e| GrowthError::InvalidPayload(format!("Yahoo quoteSummary: {}", e)))?,
            None => SummaryModules::default(),
        };

        // Yahoo has no per-share history in these modules, so net income is the proxy
        let income = modules
            .income_statement_history
            .unwrap_or_default()
            .income_statement_history
            .into_iter()
            .map(|s| IncomeRow {
                fiscal_year_end: coerce::date(&s.end_date),
                total_revenue: coerce::number_or_zero(&s.total_revenue),
                operating_income: coerce::number_or_zero(&s.operating_income),
                net_income: coerce::number_or_zero(&s.net_income),
                eps: None,
            })
            .collect();

        let cash_flow = modules
            .cashflow_statement_history
            .unwrap_or_default()
            .cashflow_statements
            .into_iter()
            .map(|s| CashFlowRow {
                fiscal_year_end: coerce::date(&s.end_date),
                operating_cash_flow: coerce::number_or_zero(&s.total_cash_from_operating_activities),
                capital_expenditures: coerce::number_or_zero(&s.capital_expenditures),
            })
            .collect();

        let years = statements::assemble(ticker, income, cash_flow)?;

        let beta = modules
            .default_key_statistics
            .as_ref()
            .and_then(|k| coerce::number(&k.beta))
            .or_else(|| modules.summary_detail.as_ref().and_then(|s| coerce::number(&s.beta)));
        let roe = modules
            .financial_data
            .as_ref()
            .and_then(|f| coerce::number(&f.return_on_equity));
        if beta.is_none() || roe.is_none() {
            tracing::debug!("{}: overview incomplete (beta={:?}, roe={:?}), using defaults", ticker, beta, roe);
        }

        let name = modules
            .price
            .and_then(|p| p.long_name.or(p.short_name))
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| ticker.to_string());

        Ok(AdaptedStatements {
            ticker: ticker.to_string(),
            name,
            provider: Provider::Yahoo,
            years,
            overview: OverviewScalars::from_raw(beta, roe),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn statement(end: &str, revenue: f64) -> Value {
        json!({
            "endDate": { "raw": 0, "fmt": end },
            "totalRevenue": { "raw": revenue, "fmt": "x" },
            "operatingIncome": { "raw": revenue * 0.3 },
            "netIncome": { "raw": revenue * 0.2 },
        })
    }

    fn cashflow(end: &str, capex: f64) -> Value {
        json!({
            "endDate": { "raw": 0, "fmt": end },
            "totalCashFromOperatingActivities": { "raw": 1000.0 },
            "capitalExpenditures": { "raw": capex },
        })
    }

    fn payload(statement_count: usize) -> YahooPayload {
        let ends = ["2023-12-31", "2022-12-31", "2021-12-31", "2020-12-31"];
        let income: Vec<Value> = ends
            .iter()
            .take(statement_count)
            .enumerate()
            .map(|(i, end)| statement(end, 4000.0 - i as f64 * 500.0))
            .collect();
        let cash: Vec<Value> = ends.iter().map(|end| cashflow(end, -250.0)).collect();

        let json = json!({
            "quoteSummary": {
                "result": [{
                    "incomeStatementHistory": { "incomeStatementHistory": income },
                    "cashflowStatementHistory": { "cashflowStatements": cash },
                    "defaultKeyStatistics": { "beta": { "raw": 1.8 } },
                    "financialData": { "returnOnEquity": { "raw": 0.27, "fmt": "27.00%" } },
                    "price": { "longName": "NVIDIA Corporation", "shortName": "NVIDIA" },
                }],
                "error": null
            }
        });
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_adapts_quote_summary() {
        let adapted = payload(4).adapt("NVDA").unwrap();

        assert_eq!(adapted.name, "NVIDIA Corporation");
        assert_eq!(adapted.provider, Provider::Yahoo);
        assert_eq!(adapted.years[0].total_revenue, 4000.0);
        assert_eq!(adapted.years[3].total_revenue, 2500.0);
        assert_relative_eq!(adapted.years[0].earnings, 800.0);
        assert_eq!(adapted.years[1].free_cash_flow(), 750.0);
        assert_relative_eq!(adapted.overview.beta, 1.8);
        assert_relative_eq!(adapted.overview.return_on_equity, 0.27);
    }

    #[test]
    fn test_insufficient_income_history() {
        let err = payload(3).adapt("NVDA").unwrap_err();
        assert_eq!(err, GrowthError::insufficient_history("NVDA", 3));
    }

    #[test]
    fn test_error_body_is_provider_error() {
        let p: YahooPayload = serde_json::from_value(json!({
            "quoteSummary": {
                "result": null,
                "error": { "code": "Not Found", "description": "Quote not found for ticker symbol: ZZZZ" }
            }
        }))
        .unwrap();

        match p.adapt("ZZZZ") {
            Err(GrowthError::Provider(msg)) => assert!(msg.contains("Quote not found")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_modules_fall_back() {
        let mut p = payload(4);
        if let Some(results) = p.quote_summary.result.as_mut() {
            let first = &mut results[0];
            if let Some(obj) = first.as_object_mut() {
                obj.remove("defaultKeyStatistics");
                obj.remove("financialData");
                obj.remove("price");
            }
        }

        let adapted = p.adapt("NVDA").unwrap();
        assert_eq!(adapted.name, "NVDA");
        assert_eq!(adapted.overview, OverviewScalars::default());
    }
}
