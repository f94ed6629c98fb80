//! Provider-neutral statement rows and the assembly step shared by every adapter.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use growth_core::{GrowthError, RawYearlyFinancials, REQUIRED_YEARS};

/// One annual income statement after coercion
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct IncomeRow {
    pub fiscal_year_end: Option<NaiveDate>,
    pub total_revenue: f64,
    pub operating_income: f64,
    pub net_income: f64,
    pub eps: Option<f64>,
}

/// One annual cash-flow statement after coercion
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CashFlowRow {
    pub fiscal_year_end: Option<NaiveDate>,
    pub operating_cash_flow: f64,
    pub capital_expenditures: f64,
}

/// Pair the newest four income and cash-flow statements.
///
/// Rows are sorted newest-first by fiscal year end; undated rows keep the
/// provider's order and sort after dated ones. When every row is dated the two
/// statements are joined on fiscal year, and years present on only one side are
/// dropped; otherwise they are paired by position. Per-share earnings are used
/// only when all four years carry them so a series never mixes EPS and net income.
pub(crate) fn assemble(
    ticker: &str,
    mut income: Vec<IncomeRow>,
    mut cash_flow: Vec<CashFlowRow>,
) -> Result<Vec<RawYearlyFinancials>, GrowthError> {
    if income.len() < REQUIRED_YEARS || cash_flow.len() < REQUIRED_YEARS {
        return Err(GrowthError::insufficient_history(
            ticker,
            income.len().min(cash_flow.len()),
        ));
    }

    income.sort_by(|a, b| b.fiscal_year_end.cmp(&a.fiscal_year_end));
    cash_flow.sort_by(|a, b| b.fiscal_year_end.cmp(&a.fiscal_year_end));

    let all_dated = income.iter().all(|row| row.fiscal_year_end.is_some())
        && cash_flow.iter().all(|row| row.fiscal_year_end.is_some());

    let mut pairs = if all_dated {
        pair_by_year(ticker, income, cash_flow)
    } else {
        income.into_iter().zip(cash_flow).collect::<Vec<_>>()
    };

    if pairs.len() < REQUIRED_YEARS {
        return Err(GrowthError::insufficient_history(ticker, pairs.len()));
    }
    pairs.truncate(REQUIRED_YEARS);

    let use_eps = pairs.iter().all(|(inc, _)| inc.eps.is_some());
    if !use_eps {
        tracing::debug!("{}: per-share earnings incomplete, using net income", ticker);
    }

    Ok(pairs
        .into_iter()
        .map(|(inc, cf)| RawYearlyFinancials {
            fiscal_year_end: inc.fiscal_year_end.or(cf.fiscal_year_end),
            total_revenue: inc.total_revenue,
            operating_income: inc.operating_income,
            earnings: match (use_eps, inc.eps) {
                (true, Some(eps)) => eps,
                _ => inc.net_income,
            },
            operating_cash_flow: cf.operating_cash_flow,
            capital_expenditures: cf.capital_expenditures,
        })
        .collect())
}

/// Join newest-first rows on fiscal year; the newest cash-flow row wins a duplicated year.
fn pair_by_year(
    ticker: &str,
    income: Vec<IncomeRow>,
    cash_flow: Vec<CashFlowRow>,
) -> Vec<(IncomeRow, CashFlowRow)> {
    let mut cash_by_year: HashMap<i32, CashFlowRow> = HashMap::new();
    for row in cash_flow {
        if let Some(date) = row.fiscal_year_end {
            cash_by_year.entry(date.year()).or_insert(row);
        }
    }

    let mut unmatched = Vec::new();
    let pairs: Vec<(IncomeRow, CashFlowRow)> = income
        .into_iter()
        .filter_map(|inc| {
            let year = inc.fiscal_year_end?.year();
            match cash_by_year.remove(&year) {
                Some(cf) => Some((inc, cf)),
                None => {
                    unmatched.push(year);
                    None
                }
            }
        })
        .collect();

    if !unmatched.is_empty() {
        tracing::warn!(
            "{}: no cash-flow statement for fiscal years {:?}, skipping them",
            ticker,
            unmatched
        );
    }
    pairs
}
