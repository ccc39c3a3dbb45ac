use crate::error::ConfigError;
use core_types::{CompletenessPolicy, FirstPeriodPolicy, Granularity, StrategyId};
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section falls back to its `Default`, so a config file only needs
/// to name the values it changes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataSettings,
    pub backtest: Backtest,
    pub strategies: Strategies,
    pub logging: Logging,
}

/// Where the loader finds the price files.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Folder holding one parquet file per asset.
    pub folder: PathBuf,
    /// Only files whose name contains this pattern are loaded (e.g. "USDT").
    pub symbol_pattern: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            folder: PathBuf::from("data/raw_data"),
            symbol_pattern: "USDT".to_string(),
        }
    }
}

/// Contains parameters for a single backtest run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Backtest {
    /// The weighting strategy to rebalance with.
    pub strategy: StrategyId,
    /// The rebalancing interval.
    pub granularity: Granularity,
    /// How assets with gaps inside a period are filtered.
    pub completeness: CompletenessPolicy,
    /// What look-back strategies do for the very first period.
    pub first_period: FirstPeriodPolicy,
    /// Observations per year used to annualize metrics (252 for daily data).
    pub annualization_factor: f64,
    /// Weight periods on the rayon thread pool.
    pub parallel: bool,
    /// Draw a progress bar while weighting periods.
    pub show_progress: bool,
}

impl Default for Backtest {
    fn default() -> Self {
        Self {
            strategy: StrategyId::EqualWeight,
            granularity: Granularity::Monthly,
            completeness: CompletenessPolicy::DropIfAnyMissing,
            first_period: FirstPeriodPolicy::Skip,
            annualization_factor: 252.0,
            parallel: false,
            show_progress: true,
        }
    }
}

/// Contains the parameter sets for all available strategies.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Strategies {
    pub momentum: MomentumParams,
    pub reversal: ReversalParams,
}

/// Parameters for the top-quantile Momentum strategy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MomentumParams {
    /// Fraction of the cross-section to hold, e.g. 0.2 for the top 20%.
    pub top_quantile: f64,
}

impl Default for MomentumParams {
    fn default() -> Self {
        Self { top_quantile: 0.2 }
    }
}

/// Parameters for the bottom-quantile Reversal strategy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReversalParams {
    pub bottom_quantile: f64,
}

impl Default for ReversalParams {
    fn default() -> Self {
        Self { bottom_quantile: 0.2 }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Logging {
    /// Default filter directive, overridden by `RUST_LOG` when set.
    pub level: String,
    /// When set, logs are also written to a daily-rolling file in this folder.
    pub directory: Option<PathBuf>,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl Config {
    /// Rejects parameter combinations that cannot produce a meaningful backtest.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_quantile("strategies.momentum.top_quantile", self.strategies.momentum.top_quantile)?;
        validate_quantile(
            "strategies.reversal.bottom_quantile",
            self.strategies.reversal.bottom_quantile,
        )?;

        let factor = self.backtest.annualization_factor;
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "backtest.annualization_factor must be positive, got {}",
                factor
            )));
        }

        if self.data.symbol_pattern.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "data.symbol_pattern must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_quantile(name: &str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "{} must be in (0, 1], got {}",
            name, value
        )))
    }
}
