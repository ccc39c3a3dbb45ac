use serde::{Deserialize, Serialize};

/// The standard risk/return metrics of a portfolio return series.
///
/// Derived and read-only; recomputed on demand from the series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// `prod(1 + r) - 1` over the whole series.
    pub cumulative_return: f64,
    /// `(1 + mean(r))^freq - 1`.
    pub annualized_return: f64,
    /// Sample standard deviation scaled by `sqrt(freq)`.
    pub annualized_volatility: f64,
    /// Zero when volatility is zero.
    pub sharpe_ratio: f64,
    /// Worst peak-to-trough decline of wealth; always `<= 0`.
    pub max_drawdown: f64,
    /// None when there is no drawdown.
    pub calmar_ratio: Option<f64>,
}
