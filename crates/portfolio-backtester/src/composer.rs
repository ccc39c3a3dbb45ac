use core_types::{
    AssetTable, CoreError, FirstPeriodPolicy, Lookback, Period, PeriodTable,
    PortfolioReturnSeries, SeriesPoint, WeightVector,
};
use indicatif::ProgressBar;
use rayon::prelude::*;
use strategies::{EqualWeight, WeightingStrategy};

/// The result of weighting and applying one period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodOutcome {
    pub period: Period,
    /// The weights held through this period, if it could be weighted.
    pub weights: Option<WeightVector>,
    /// Daily portfolio returns realized in this period.
    pub returns: Vec<SeriesPoint>,
    /// Why the period contributes no dates, when it doesn't.
    pub skipped: Option<String>,
}

impl PeriodOutcome {
    fn skipped(period: Period, reason: impl Into<String>) -> Self {
        Self {
            period,
            weights: None,
            returns: Vec::new(),
            skipped: Some(reason.into()),
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped.is_some()
    }
}

/// Turns a weight vector into per-period portfolio returns and stitches
/// periods into one continuous series.
///
/// It also owns the walk-forward discipline: for period `t`, a look-back
/// strategy is weighted on period `t - 1`'s table and those weights are
/// applied to period `t`'s returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortfolioComposer {
    first_period: FirstPeriodPolicy,
    parallel: bool,
}

impl PortfolioComposer {
    pub fn new(first_period: FirstPeriodPolicy, parallel: bool) -> Self {
        Self {
            first_period,
            parallel,
        }
    }

    /// Weights every period and applies the weights, in period order.
    ///
    /// A strategy error in one period is logged and recorded on that
    /// period's outcome; the remaining periods still run.
    pub fn walk_forward(
        &self,
        periods: &[PeriodTable],
        strategy: &dyn WeightingStrategy,
        progress: &ProgressBar,
    ) -> Vec<PeriodOutcome> {
        let step = |t: usize| {
            let outcome = self.run_period(periods, t, strategy);
            progress.inc(1);
            outcome
        };

        if self.parallel {
            (0..periods.len()).into_par_iter().map(step).collect()
        } else {
            (0..periods.len()).map(step).collect()
        }
    }

    fn run_period(
        &self,
        periods: &[PeriodTable],
        t: usize,
        strategy: &dyn WeightingStrategy,
    ) -> PeriodOutcome {
        let current = &periods[t];
        let period = current.period;

        if current.is_zero_width() {
            return PeriodOutcome::skipped(period, "no asset passed the completeness policy");
        }

        let weights = match (strategy.lookback(), t.checked_sub(1)) {
            (Lookback::Current, _) => strategy.compute_weights(&current.table),
            (Lookback::Previous, Some(prev)) => strategy.compute_weights(&periods[prev].table),
            (Lookback::Previous, None) => match self.first_period {
                FirstPeriodPolicy::Skip => {
                    tracing::debug!(%period, "first period has no look-back data");
                    return PeriodOutcome::skipped(period, "first period has no look-back data");
                }
                FirstPeriodPolicy::EqualWeight => EqualWeight::new().compute_weights(&current.table),
            },
        };

        let weights = match weights {
            Ok(w) if w.is_empty() => {
                return PeriodOutcome::skipped(period, "strategy returned an empty weight vector");
            }
            Ok(w) => w,
            Err(e) => {
                tracing::warn!(%period, strategy = %strategy.id(), error = %e, "skipping unweightable period");
                return PeriodOutcome::skipped(period, e.to_string());
            }
        };

        if weights.support().next().is_none() {
            tracing::debug!(%period, strategy = %strategy.id(), "no asset qualified");
            return PeriodOutcome::skipped(period, "no asset qualified for weighting");
        }
        if reconcile(&weights, &current.table).iter().all(|w| *w == 0.0) {
            tracing::debug!(%period, "no weighted asset is present in this period");
            return PeriodOutcome::skipped(period, "no weighted asset is present in this period");
        }

        let returns = apply_weights(&current.table, &weights);
        tracing::debug!(%period, days = returns.len(), held = weights.support().count(), "period composed");

        PeriodOutcome {
            period,
            weights: Some(weights),
            returns,
            skipped: None,
        }
    }
}

/// Aligns a weight vector onto a table's columns.
///
/// Columns outside the vector get weight 0. Weighted assets that are not
/// columns of this table are dropped; they contribute nothing.
pub fn reconcile(weights: &WeightVector, table: &AssetTable) -> Vec<f64> {
    for asset in weights.support() {
        if table.asset_index(asset).is_none() {
            tracing::debug!(%asset, "weighted asset absent from period, contributes nothing");
        }
    }
    table.assets().iter().map(|asset| weights.get(asset)).collect()
}

/// Daily portfolio returns: the dot product of each day's asset returns with
/// the aligned weights. A missing return cell contributes zero.
pub fn apply_weights(table: &AssetTable, weights: &WeightVector) -> Vec<SeriesPoint> {
    let aligned = reconcile(weights, table);
    table
        .dates()
        .iter()
        .zip(table.rows())
        .map(|(date, row)| {
            let value = row
                .iter()
                .zip(&aligned)
                .map(|(r, w)| r.unwrap_or(0.0) * w)
                .sum();
            SeriesPoint::new(*date, value)
        })
        .collect()
}

/// Concatenates every period's returns and sorts them into one series.
///
/// Skipped periods contribute no dates. Overlapping periods would produce
/// duplicate dates and are rejected with `CoreError::Data`.
pub fn compose(outcomes: &[PeriodOutcome]) -> Result<PortfolioReturnSeries, CoreError> {
    let points = outcomes
        .iter()
        .filter(|o| o.weights.is_some())
        .flat_map(|o| o.returns.iter().copied())
        .collect();
    PortfolioReturnSeries::from_points(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use core_types::{Granularity, StrategyId};
    use strategies::{StrategyError, VolatilityScaled};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn table(dates: Vec<NaiveDate>, assets: &[&str], rows: Vec<Vec<f64>>) -> AssetTable {
        AssetTable::new(
            dates,
            assets.iter().map(|a| a.to_string()).collect(),
            rows.into_iter().map(|r| r.into_iter().map(Some).collect()).collect(),
        )
        .unwrap()
    }

    fn period_table(dates: Vec<NaiveDate>, assets: &[&str], rows: Vec<Vec<f64>>) -> PeriodTable {
        let period = Granularity::Monthly.period_of(dates[0]);
        PeriodTable::new(period, table(dates, assets, rows))
    }

    #[test]
    fn equal_weights_give_the_cross_sectional_mean() {
        let t = table(
            vec![date(1, 2), date(1, 3)],
            &["A", "B", "C"],
            vec![vec![0.03, 0.00, -0.03], vec![0.01, 0.02, 0.06]],
        );
        let returns = apply_weights(&t, &WeightVector::equal(t.assets()));

        assert_relative_eq!(returns[0].value, 0.0, epsilon = 1e-12);
        assert_relative_eq!(returns[1].value, 0.03, epsilon = 1e-12);
    }

    #[test]
    fn unknown_and_missing_assets_align_to_zero() {
        let t = table(vec![date(1, 2)], &["A", "B"], vec![vec![0.10, 0.20]]);
        let weights: WeightVector =
            [("A".to_string(), 0.5), ("GONE".to_string(), 0.5)].into_iter().collect();

        assert_eq!(reconcile(&weights, &t), vec![0.5, 0.0]);
        let returns = apply_weights(&t, &weights);
        assert_relative_eq!(returns[0].value, 0.05, epsilon = 1e-12);
    }

    #[test]
    fn scaled_weights_scale_returns_linearly() {
        let t = table(
            vec![date(1, 2), date(1, 3)],
            &["A", "B"],
            vec![vec![0.02, -0.01], vec![0.04, 0.03]],
        );
        let weights: WeightVector =
            [("A".to_string(), 0.25), ("B".to_string(), 0.75)].into_iter().collect();

        let base = apply_weights(&t, &weights);
        let doubled = apply_weights(&t, &weights.scaled(2.0));
        for (b, d) in base.iter().zip(&doubled) {
            assert_relative_eq!(d.value / 2.0, b.value, epsilon = 1e-12);
        }
    }

    #[test]
    fn compose_sorts_and_skips_gaps() {
        let feb = PeriodOutcome {
            period: Granularity::Monthly.period_of(date(2, 1)),
            weights: Some(WeightVector::default()),
            returns: vec![SeriesPoint::new(date(2, 1), 0.02), SeriesPoint::new(date(2, 2), 0.03)],
            skipped: None,
        };
        let jan = PeriodOutcome {
            period: Granularity::Monthly.period_of(date(1, 31)),
            weights: Some(WeightVector::default()),
            returns: vec![SeriesPoint::new(date(1, 31), 0.01)],
            skipped: None,
        };
        let mar = PeriodOutcome::skipped(Granularity::Monthly.period_of(date(3, 1)), "gap");

        let series = compose(&[feb, mar, jan]).unwrap();
        assert_eq!(series.dates(), vec![date(1, 31), date(2, 1), date(2, 2)]);
        assert!(series.dates().windows(2).all(|w| w[0] < w[1]));
    }

    /// A look-back strategy that records which table it was handed by
    /// putting all weight on that table's first asset.
    struct FirstAsset;

    impl WeightingStrategy for FirstAsset {
        fn id(&self) -> StrategyId {
            StrategyId::Momentum
        }
        fn lookback(&self) -> Lookback {
            Lookback::Previous
        }
        fn compute_weights(&self, table: &AssetTable) -> Result<WeightVector, StrategyError> {
            let first = table
                .assets()
                .first()
                .ok_or_else(|| StrategyError::InsufficientData("no columns".to_string()))?;
            Ok([(first.clone(), 1.0)].into_iter().collect())
        }
    }

    fn three_months() -> Vec<PeriodTable> {
        vec![
            period_table(vec![date(1, 2)], &["A", "B"], vec![vec![0.01, 0.02]]),
            period_table(vec![date(2, 1)], &["B", "C"], vec![vec![0.03, 0.04]]),
            period_table(vec![date(3, 1)], &["C"], vec![vec![0.05]]),
        ]
    }

    fn overlapping_months() -> Vec<PeriodTable> {
        vec![
            period_table(vec![date(1, 2)], &["A", "B"], vec![vec![0.01, 0.02]]),
            period_table(vec![date(2, 1)], &["A", "C"], vec![vec![0.03, 0.04]]),
            period_table(vec![date(3, 1)], &["A", "C"], vec![vec![0.05, 0.06]]),
        ]
    }

    #[test]
    fn look_back_weights_come_from_the_previous_period() {
        let composer = PortfolioComposer::new(FirstPeriodPolicy::Skip, false);
        let outcomes =
            composer.walk_forward(&overlapping_months(), &FirstAsset, &ProgressBar::hidden());

        assert!(outcomes[0].is_skipped());
        // February and March both hold the previous month's first asset, A
        assert_eq!(outcomes[1].weights.as_ref().unwrap().get("A"), 1.0);
        assert_relative_eq!(outcomes[1].returns[0].value, 0.03, epsilon = 1e-12);
        assert_relative_eq!(outcomes[2].returns[0].value, 0.05, epsilon = 1e-12);

        let series = compose(&outcomes).unwrap();
        assert_eq!(series.dates(), vec![date(2, 1), date(3, 1)]);
    }

    #[test]
    fn weights_on_assets_absent_from_the_period_leave_a_gap() {
        let composer = PortfolioComposer::new(FirstPeriodPolicy::Skip, false);
        let outcomes = composer.walk_forward(&three_months(), &FirstAsset, &ProgressBar::hidden());

        // February would hold A and March would hold B; neither trades then
        assert!(outcomes[1].is_skipped());
        assert!(outcomes[2].is_skipped());
        assert!(outcomes[1].returns.is_empty());
        assert!(compose(&outcomes).unwrap().is_empty());
    }

    #[test]
    fn no_qualifying_asset_leaves_a_gap_not_zero_returns() {
        // two flat assets in January give VolatilityScaled nothing to weight
        let periods = vec![
            period_table(vec![date(1, 2), date(1, 3)], &["A", "B"], vec![vec![0.0, 0.0], vec![0.0, 0.0]]),
            period_table(vec![date(2, 1), date(2, 2)], &["A", "B"], vec![vec![0.01, 0.02], vec![-0.01, 0.03]]),
        ];
        let composer = PortfolioComposer::new(FirstPeriodPolicy::Skip, false);
        let outcomes = composer.walk_forward(&periods, &VolatilityScaled::new(), &ProgressBar::hidden());

        assert!(outcomes[1].is_skipped());
        assert!(outcomes[1].skipped.as_ref().unwrap().contains("no asset qualified"));
        assert!(compose(&outcomes).unwrap().is_empty());
    }

    #[test]
    fn missing_cells_contribute_zero() {
        let t = AssetTable::new(
            vec![date(1, 2), date(1, 3)],
            vec!["A".to_string(), "B".to_string()],
            vec![vec![Some(0.04), None], vec![None, Some(-0.02)]],
        )
        .unwrap();
        let returns = apply_weights(&t, &WeightVector::equal(t.assets()));

        assert_relative_eq!(returns[0].value, 0.02, epsilon = 1e-12);
        assert_relative_eq!(returns[1].value, -0.01, epsilon = 1e-12);
    }

    #[test]
    fn first_period_can_fall_back_to_equal_weight() {
        let composer = PortfolioComposer::new(FirstPeriodPolicy::EqualWeight, false);
        let outcomes = composer.walk_forward(&three_months(), &FirstAsset, &ProgressBar::hidden());

        let first = &outcomes[0];
        assert!(!first.is_skipped());
        assert_relative_eq!(first.returns[0].value, 0.015, epsilon = 1e-12);
    }

    #[test]
    fn strategy_errors_skip_only_that_period() {
        let mut periods = three_months();
        // February loses every column, so March's look-back input is empty
        periods[1] = PeriodTable::new(periods[1].period, AssetTable::empty(Vec::new()));

        let composer = PortfolioComposer::new(FirstPeriodPolicy::EqualWeight, false);
        let outcomes = composer.walk_forward(&periods, &FirstAsset, &ProgressBar::hidden());

        assert!(!outcomes[0].is_skipped());
        assert!(outcomes[1].is_skipped());
        assert!(outcomes[2].is_skipped());
        assert!(outcomes[2].skipped.as_ref().unwrap().contains("no columns"));
        assert_eq!(compose(&outcomes).unwrap().len(), 1);
    }

    #[test]
    fn parallel_and_sequential_runs_agree() {
        let periods = three_months();
        let sequential = PortfolioComposer::new(FirstPeriodPolicy::EqualWeight, false)
            .walk_forward(&periods, &FirstAsset, &ProgressBar::hidden());
        let parallel = PortfolioComposer::new(FirstPeriodPolicy::EqualWeight, true)
            .walk_forward(&periods, &FirstAsset, &ProgressBar::hidden());
        assert_eq!(sequential, parallel);
    }
}
