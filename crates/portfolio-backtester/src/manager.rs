use crate::composer::{compose, PeriodOutcome, PortfolioComposer};
use crate::error::PortfolioError;
use crate::partitioner::partition;
use crate::returns::compute_returns;
use analytics::{AnalyticsEngine, AnalyticsError, PerformanceReport};
use configuration::Config;
use core_types::{PortfolioReturnSeries, PriceTable, ReturnTable, StrategyId};
use indicatif::{ProgressBar, ProgressStyle};
use strategies::{create_strategy, WeightingStrategy};
use uuid::Uuid;

/// Everything one backtest run produced.
#[derive(Debug)]
pub struct BacktestOutcome {
    pub run_id: Uuid,
    pub strategy: StrategyId,
    pub periods: Vec<PeriodOutcome>,
    pub series: PortfolioReturnSeries,
    /// Kept separate from the series so a failed evaluation never discards it.
    pub report: Result<PerformanceReport, AnalyticsError>,
}

impl BacktestOutcome {
    /// The performance report, or the error that prevented it.
    pub fn report(&self) -> Result<&PerformanceReport, PortfolioError> {
        self.report.as_ref().map_err(|e| PortfolioError::Analytics(e.clone()))
    }

    pub fn skipped_periods(&self) -> impl Iterator<Item = &PeriodOutcome> {
        self.periods.iter().filter(|p| p.is_skipped())
    }
}

/// Runs the full rebalancing pipeline:
/// prices -> returns -> periods -> weights -> portfolio series -> report.
pub struct PortfolioManager {
    config: Config,
    strategy: Box<dyn WeightingStrategy>,
    composer: PortfolioComposer,
    analytics_engine: AnalyticsEngine,
}

impl PortfolioManager {
    pub fn new(
        config: Config,
        strategy: Box<dyn WeightingStrategy>,
        analytics_engine: AnalyticsEngine,
    ) -> Self {
        let composer = PortfolioComposer::new(config.backtest.first_period, config.backtest.parallel);
        Self {
            config,
            strategy,
            composer,
            analytics_engine,
        }
    }

    /// Builds a manager for the strategy named in `config.backtest.strategy`.
    pub fn from_config(config: &Config) -> Result<Self, PortfolioError> {
        Self::for_strategy(config.backtest.strategy, config)
    }

    /// Builds a manager for `id`, taking every other setting from `config`.
    pub fn for_strategy(id: StrategyId, config: &Config) -> Result<Self, PortfolioError> {
        config
            .validate()
            .map_err(|e| PortfolioError::Configuration(e.to_string()))?;
        let strategy = create_strategy(id, config)?;
        let analytics_engine = AnalyticsEngine::new(config.backtest.annualization_factor);
        Ok(Self::new(config.clone(), strategy, analytics_engine))
    }

    pub fn strategy_id(&self) -> StrategyId {
        self.strategy.id()
    }

    /// Runs a backtest starting from daily prices.
    ///
    /// Errors computing returns or partitioning abort the run.
    pub fn run(&self, prices: &PriceTable) -> Result<BacktestOutcome, PortfolioError> {
        let returns = compute_returns(prices)?;
        tracing::info!(
            dates = returns.n_rows(),
            assets = returns.n_assets(),
            "returns computed"
        );
        self.run_on_returns(&returns)
    }

    /// Runs a backtest on an already computed return table.
    pub fn run_on_returns(&self, returns: &ReturnTable) -> Result<BacktestOutcome, PortfolioError> {
        let run_id = Uuid::new_v4();
        let settings = &self.config.backtest;
        tracing::info!(%run_id, strategy = %self.strategy.id(), "starting backtest");

        let periods = partition(returns, settings.granularity, settings.completeness)?;

        let progress_bar = progress_bar(periods.len() as u64, settings.show_progress);
        let outcomes = self
            .composer
            .walk_forward(&periods, self.strategy.as_ref(), &progress_bar);
        progress_bar.finish_with_message("Rebalancing complete.");

        let series = compose(&outcomes)?;
        let skipped = outcomes.iter().filter(|o| o.is_skipped()).count();
        tracing::info!(
            %run_id,
            periods = outcomes.len(),
            skipped,
            days = series.len(),
            "portfolio series composed"
        );

        let report = self.analytics_engine.calculate(&series);
        if let Err(e) = &report {
            tracing::warn!(%run_id, error = %e, "no performance report for this run");
        }

        Ok(BacktestOutcome {
            run_id,
            strategy: self.strategy.id(),
            periods: outcomes,
            series,
            report,
        })
    }
}

fn progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len);
    match ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} periods ({eta})")
    {
        Ok(style) => bar.set_style(style.progress_chars("=>-")),
        Err(e) => tracing::debug!(error = %e, "falling back to the default progress style"),
    }
    bar
}
