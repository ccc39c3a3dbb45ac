use crate::error::AnalyticsError;
use crate::report::PerformanceReport;
use core_types::PortfolioReturnSeries;
use statrs::statistics::Statistics;

/// Trading days per year, the default annualization factor for daily data.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Volatilities at or below this are treated as zero.
const ZERO_VOLATILITY: f64 = 1e-12;

/// A stateless calculator for deriving performance metrics from a portfolio return series.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsEngine {
    annualization_factor: f64,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new(TRADING_DAYS_PER_YEAR)
    }
}

impl AnalyticsEngine {
    /// `annualization_factor` is the number of observations per year (252 for daily data).
    pub fn new(annualization_factor: f64) -> Self {
        Self {
            annualization_factor,
        }
    }

    /// The main entry point for calculating performance metrics.
    ///
    /// # Arguments
    ///
    /// * `series` - The chronologically sorted daily portfolio returns.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `PerformanceReport`, or
    /// `AnalyticsError::NotEnoughData` if the series is empty.
    pub fn calculate(
        &self,
        series: &PortfolioReturnSeries,
    ) -> Result<PerformanceReport, AnalyticsError> {
        if series.is_empty() {
            return Err(AnalyticsError::NotEnoughData(
                "portfolio return series has no entries".to_string(),
            ));
        }
        if !(self.annualization_factor.is_finite() && self.annualization_factor > 0.0) {
            return Err(AnalyticsError::Calculation(format!(
                "annualization factor must be positive, got {}",
                self.annualization_factor
            )));
        }

        let returns = series.returns();
        if let Some(bad) = returns.iter().find(|r| !r.is_finite()) {
            return Err(AnalyticsError::Calculation(format!(
                "portfolio return series contains a non-finite value ({})",
                bad
            )));
        }

        let (cumulative_return, annualized_return, annualized_volatility) =
            self.calculate_returns(&returns);
        let max_drawdown = self.calculate_drawdown(series);
        let (sharpe_ratio, calmar_ratio) =
            self.calculate_ratios(annualized_return, annualized_volatility, max_drawdown);

        let report = PerformanceReport {
            cumulative_return,
            annualized_return,
            annualized_volatility,
            sharpe_ratio,
            max_drawdown,
            calmar_ratio,
        };
        tracing::debug!(?report, observations = returns.len(), "performance evaluated");
        Ok(report)
    }

    /// Cumulative return, annualized return and annualized volatility.
    fn calculate_returns(&self, returns: &[f64]) -> (f64, f64, f64) {
        let cumulative = returns.iter().map(|r| 1.0 + r).product::<f64>() - 1.0;

        let mean = returns.iter().mean();
        let annualized_return = (1.0 + mean).powf(self.annualization_factor) - 1.0;

        // A single observation has no sample deviation; report it as flat.
        let std_dev = returns.iter().std_dev();
        let std_dev = if std_dev.is_finite() { std_dev } else { 0.0 };
        let annualized_volatility = std_dev * self.annualization_factor.sqrt();

        (cumulative, annualized_return, annualized_volatility)
    }

    /// Minimum of `(wealth - peak) / peak` over the series.
    fn calculate_drawdown(&self, series: &PortfolioReturnSeries) -> f64 {
        series
            .drawdown_curve()
            .iter()
            .map(|p| p.value)
            .fold(0.0, f64::min)
    }

    /// Sharpe (risk-free rate of zero) and Calmar ratios.
    fn calculate_ratios(
        &self,
        annualized_return: f64,
        annualized_volatility: f64,
        max_drawdown: f64,
    ) -> (f64, Option<f64>) {
        let sharpe = if annualized_volatility > ZERO_VOLATILITY {
            annualized_return / annualized_volatility
        } else {
            0.0
        };

        let calmar = if max_drawdown < 0.0 {
            Some(annualized_return / max_drawdown.abs())
        } else {
            None
        };

        (sharpe, calmar)
    }
}
