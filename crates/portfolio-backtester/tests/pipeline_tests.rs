//! End-to-end checks of the rebalancing pipeline across strategies.

use analytics::AnalyticsEngine;
use approx::assert_relative_eq;
use chrono::{Days, NaiveDate};
use configuration::Config;
use core_types::{
    CompletenessPolicy, FirstPeriodPolicy, Granularity, PriceTable, StrategyId, WeightVector,
};
use portfolio_backtester::{apply_weights, compute_returns, partition, PortfolioManager};
use rstest::{fixture, rstest};
use strategies::create_strategy;

const ASSETS: usize = 10;

fn config(strategy: StrategyId) -> Config {
    let mut config = Config::default();
    config.backtest.strategy = strategy;
    config.backtest.show_progress = false;
    config.backtest.first_period = FirstPeriodPolicy::EqualWeight;
    config
}

/// Ten assets over five months of daily prices with deterministic wiggles.
/// Asset 9 only starts trading in mid-February; asset 0 never moves.
#[fixture]
fn universe() -> PriceTable {
    let start = NaiveDate::from_ymd_opt(2023, 11, 1).unwrap();
    let days = 150;
    let dates: Vec<NaiveDate> = (0..days).map(|i| start + Days::new(i)).collect();
    let assets = (0..ASSETS).map(|a| format!("COIN{}USDT", a)).collect();

    let mut levels = vec![100.0; ASSETS];
    let rows = (0..days)
        .map(|day| {
            (0..ASSETS)
                .map(|a| {
                    if a > 0 {
                        let drift = 0.0005 * a as f64 - 0.002;
                        let wiggle = 0.02 * ((day as f64) * (0.3 + 0.11 * a as f64)).sin();
                        levels[a] *= 1.0 + drift + wiggle;
                    }
                    if a == 9 && day < 105 { None } else { Some(levels[a]) }
                })
                .collect()
        })
        .collect();

    PriceTable::new(dates, assets, rows).unwrap()
}

#[rstest]
#[case(StrategyId::EqualWeight)]
#[case(StrategyId::VolatilityScaled)]
#[case(StrategyId::Momentum)]
#[case(StrategyId::Reversal)]
fn weights_sum_to_one_in_every_period(universe: PriceTable, #[case] strategy: StrategyId) {
    let outcome = PortfolioManager::from_config(&config(strategy))
        .unwrap()
        .run(&universe)
        .unwrap();

    assert_eq!(outcome.skipped_periods().count(), 0);
    for period in &outcome.periods {
        let weights = period.weights.as_ref().unwrap();
        assert_relative_eq!(weights.sum(), 1.0, epsilon = 1e-9);
        assert!(weights.iter().all(|(_, w)| *w >= 0.0));
    }
}

#[rstest]
#[case(StrategyId::EqualWeight)]
#[case(StrategyId::VolatilityScaled)]
#[case(StrategyId::Momentum)]
#[case(StrategyId::Reversal)]
fn composed_series_is_strictly_increasing(universe: PriceTable, #[case] strategy: StrategyId) {
    let outcome = PortfolioManager::from_config(&config(strategy))
        .unwrap()
        .run(&universe)
        .unwrap();

    let dates = outcome.series.dates();
    assert!(dates.windows(2).all(|w| w[0] < w[1]));
    // every return date is covered because no period was skipped
    assert_eq!(dates.len(), compute_returns(&universe).unwrap().n_rows());
    assert!(outcome.report().is_ok());
}

#[rstest]
fn equal_weight_tracks_the_cross_sectional_mean(universe: PriceTable) {
    let returns = compute_returns(&universe).unwrap();
    let periods = partition(&returns, Granularity::Monthly, CompletenessPolicy::DropIfAnyMissing)
        .unwrap();
    let strategy = create_strategy(StrategyId::EqualWeight, &Config::default()).unwrap();

    for period in &periods {
        let weights = strategy.compute_weights(&period.table).unwrap();
        let n = period.table.n_assets() as f64;
        for (point, row) in apply_weights(&period.table, &weights).iter().zip(period.table.rows()) {
            let mean = row.iter().flatten().sum::<f64>() / n;
            assert_relative_eq!(point.value, mean, epsilon = 1e-12);
        }
    }
}

#[rstest]
fn volatility_scaling_ignores_the_flat_asset(universe: PriceTable) {
    let outcome = PortfolioManager::from_config(&config(StrategyId::VolatilityScaled))
        .unwrap()
        .run(&universe)
        .unwrap();

    for period in outcome.periods.iter().skip(1) {
        assert_eq!(period.weights.as_ref().unwrap().get("COIN0USDT"), 0.0);
    }
}

#[rstest]
fn late_listing_enters_once_it_has_a_full_month(universe: PriceTable) {
    let returns = compute_returns(&universe).unwrap();
    let periods = partition(&returns, Granularity::Monthly, CompletenessPolicy::DropIfAnyMissing)
        .unwrap();

    let has_late_coin = |label: &str| {
        periods
            .iter()
            .find(|p| p.period.label() == label)
            .map(|p| p.table.asset_index("COIN9USDT").is_some())
            .unwrap()
    };
    assert!(!has_late_coin("2024-01"));
    assert!(!has_late_coin("2024-02"));
    assert!(has_late_coin("2024-03"));
}

#[rstest]
fn every_strategy_runs_on_quarterly_periods(universe: PriceTable) {
    for id in StrategyId::ALL {
        let mut config = config(id);
        config.backtest.granularity = Granularity::Quarterly;
        config.backtest.parallel = true;
        let outcome = PortfolioManager::from_config(&config).unwrap().run(&universe).unwrap();
        assert!(outcome.periods.len() >= 2, "{} produced too few periods", id);
        assert!(!outcome.series.is_empty());
    }
}

#[test]
fn evaluation_matches_hand_computed_metrics() {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let points = [0.01, -0.02, 0.03]
        .iter()
        .enumerate()
        .map(|(i, r)| core_types::SeriesPoint::new(start + Days::new(i as u64), *r))
        .collect();
    let series = core_types::PortfolioReturnSeries::from_points(points).unwrap();

    let report = AnalyticsEngine::new(252.0).calculate(&series).unwrap();

    assert_relative_eq!(report.cumulative_return, 1.01 * 0.98 * 1.03 - 1.0, epsilon = 1e-12);
    assert_relative_eq!(report.annualized_return, (1.0f64 + 0.02 / 3.0).powf(252.0) - 1.0, epsilon = 1e-9);
    assert_relative_eq!(report.max_drawdown, -0.02, epsilon = 1e-12);
    assert!(report.calmar_ratio.unwrap() > 0.0);
}

#[test]
fn weight_vectors_are_reusable_across_periods() {
    // weights chosen on one period may name assets another period lacks
    let weights: WeightVector = [("COIN3USDT".to_string(), 1.0)].into_iter().collect();
    let table = core_types::AssetTable::new(
        vec![NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()],
        vec!["COIN1USDT".to_string()],
        vec![vec![Some(0.05)]],
    )
    .unwrap();
    assert_eq!(apply_weights(&table, &weights)[0].value, 0.0);
}
