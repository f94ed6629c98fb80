use anyhow::{bail, Context, Result};
use growth_core::{ExecutionMode, Provider, Weights};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct GrowthConfig {
    pub provider: Provider,
    pub weight_preset: String,
    pub weights: Weights,
    pub max_tickers: usize,
    pub execution_mode: ExecutionMode,
    pub data_dir: PathBuf,
    /// Set explicitly through the environment, so a provider switch keeps them
    max_pinned: bool,
    mode_pinned: bool,
}

impl GrowthConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let provider: Provider = lookup("GROWTH_PROVIDER")
            .unwrap_or_else(|| "yahoo".to_string())
            .parse()
            .context("GROWTH_PROVIDER")?;

        let weight_preset = lookup("GROWTH_WEIGHT_PRESET").unwrap_or_else(|| "default".to_string());
        let weights = weight_preset.parse().context("GROWTH_WEIGHT_PRESET")?;

        let max_env = lookup("GROWTH_MAX_TICKERS");
        let max_pinned = max_env.is_some();
        let max_tickers = match max_env {
            Some(v) => v.parse().context("GROWTH_MAX_TICKERS must be a positive integer")?,
            None => provider.max_tickers(),
        };

        let mode_env = lookup("GROWTH_EXECUTION");
        let mode_pinned = mode_env.is_some();
        let execution_mode = match mode_env {
            Some(v) => v.parse().context("GROWTH_EXECUTION")?,
            None => provider.execution_mode(),
        };

        let config = Self {
            provider,
            weight_preset,
            weights,
            max_tickers,
            execution_mode,
            data_dir: PathBuf::from(lookup("GROWTH_DATA_DIR").unwrap_or_else(|| "data".to_string())),
            max_pinned,
            mode_pinned,
        };
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides and return the positional tickers.
    pub fn apply_args(&mut self, args: &[String]) -> Result<Vec<String>> {
        let mut tickers = Vec::new();
        let mut iter = args.iter();
        let mut provider_overridden = false;
        let mut max_overridden = false;
        let mut mode_overridden = false;

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--dir" => self.data_dir = PathBuf::from(value(&mut iter, arg)?),
                "--provider" => {
                    self.provider = value(&mut iter, arg)?.parse()?;
                    provider_overridden = true;
                }
                "--preset" => {
                    let preset = value(&mut iter, arg)?;
                    self.weights = preset.parse()?;
                    self.weight_preset = preset.to_string();
                }
                "--max" => {
                    self.max_tickers = value(&mut iter, arg)?
                        .parse()
                        .context("--max must be a positive integer")?;
                    max_overridden = true;
                }
                "--sequential" => {
                    self.execution_mode = ExecutionMode::Sequential;
                    mode_overridden = true;
                }
                "--concurrent" => {
                    self.execution_mode = ExecutionMode::Concurrent;
                    mode_overridden = true;
                }
                flag if flag.starts_with("--") => bail!("unknown option {}", flag),
                ticker => tickers.push(ticker.trim().to_uppercase()),
            }
        }

        // A provider switch brings that provider's defaults unless they were set explicitly
        if provider_overridden {
            if !max_overridden && !self.max_pinned {
                self.max_tickers = self.provider.max_tickers();
            }
            if !mode_overridden && !self.mode_pinned {
                self.execution_mode = self.provider.execution_mode();
            }
        }

        self.validate()?;
        Ok(tickers)
    }

    fn validate(&self) -> Result<()> {
        if self.max_tickers == 0 {
            bail!("max tickers must be at least 1");
        }
        Ok(())
    }
}

fn value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<&'a str> {
    iter.next()
        .map(|s| s.as_str())
        .with_context(|| format!("{} needs a value", flag))
}
