//! growth-cli: score a batch of tickers from already-fetched statement payloads.
//!
//! Each ticker is read from `<data dir>/<TICKER>.json`, a provider-tagged
//! payload (`"provider": "alpha_vantage"` or `"provider": "yahoo"`).
//!
//! Usage:
//!   growth-cli AAPL MSFT NVDA
//!   growth-cli --provider alpha_vantage --preset display --dir ./statements IBM
//!   growth-cli --max 3 --sequential AAPL MSFT NVDA GOOGL

mod config;
mod file_source;

use anyhow::{anyhow, Result};
use config::GrowthConfig;
use file_source::FileSource;
use growth_core::{CompanyResult, TickerFailure};
use growth_orchestrator::BatchOrchestrator;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchReport<'a> {
    success: bool,
    provider: String,
    weight_preset: &'a str,
    /// Highest growth index first
    results: Vec<CompanyResult>,
    failures: Vec<&'a TickerFailure>,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "growth_cli=info,growth_orchestrator=info".into());

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // Logs go to stderr so stdout stays valid JSON
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let mut config = GrowthConfig::from_env()?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    let tickers = config.apply_args(&args)?;
    if tickers.is_empty() {
        return Err(anyhow!("no tickers given; usage: growth-cli [--dir DIR] [--provider NAME] [--preset NAME] [--max N] TICKER..."));
    }

    tracing::debug!("Configuration: {:?}", config);

    let source = FileSource::new(&config.data_dir, config.provider);
    let orchestrator = BatchOrchestrator::new(source)
        .with_weights(config.weights)
        .with_execution_mode(config.execution_mode);

    let batch = orchestrator.run(&tickers, config.max_tickers).await;

    let report = BatchReport {
        success: batch.is_success(),
        provider: config.provider.to_string(),
        weight_preset: &config.weight_preset,
        results: batch.ranked(),
        failures: batch.failures().collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    match batch.error_message() {
        Some(message) => Err(anyhow!(message)),
        None => Ok(()),
    }
}
