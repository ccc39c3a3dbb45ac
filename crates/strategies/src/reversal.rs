use crate::error::StrategyError;
use crate::quantile::{select_tail, Tail};
use crate::{ensure_columns, equal_over_selected, WeightingStrategy};
use configuration::ReversalParams;
use core_types::{AssetTable, Lookback, StrategyId, WeightVector};

/// Short-term reversal: equal-weights the previous period's losers.
///
/// The mirror of `Momentum`; assets at or below the `q`-quantile of
/// compounded return are selected, ties included.
#[derive(Debug, Clone)]
pub struct Reversal {
    bottom_quantile: f64,
}

impl Reversal {
    pub fn new(params: ReversalParams) -> Result<Self, StrategyError> {
        if !(params.bottom_quantile > 0.0 && params.bottom_quantile <= 1.0) {
            return Err(StrategyError::InvalidParameters(format!(
                "bottom_quantile must be in (0, 1], got {}",
                params.bottom_quantile
            )));
        }
        Ok(Self {
            bottom_quantile: params.bottom_quantile,
        })
    }
}

impl WeightingStrategy for Reversal {
    fn id(&self) -> StrategyId {
        StrategyId::Reversal
    }

    fn lookback(&self) -> Lookback {
        Lookback::Previous
    }

    fn compute_weights(&self, table: &AssetTable) -> Result<WeightVector, StrategyError> {
        ensure_columns(self.id(), table)?;
        let selected = select_tail(table, self.bottom_quantile, Tail::Bottom);
        tracing::debug!(selected = selected.len(), of = table.n_assets(), "reversal selection");
        Ok(equal_over_selected(table, &selected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{full, table};

    #[test]
    fn bottom_quintile_of_ten_selects_the_two_worst() {
        let columns: Vec<(String, Vec<Option<f64>>)> = (0..10)
            .map(|i| (format!("A{}", i), full(&[0.02 - 0.01 * i as f64])))
            .collect();
        let columns: Vec<(&str, Vec<Option<f64>>)> =
            columns.iter().map(|(n, v)| (n.as_str(), v.clone())).collect();
        let t = table(&columns);

        let weights = Reversal::new(ReversalParams::default())
            .unwrap()
            .compute_weights(&t)
            .unwrap();

        let support: Vec<_> = weights.support().cloned().collect();
        assert_eq!(support, vec!["A8".to_string(), "A9".to_string()]);
        assert_eq!(weights.get("A8"), 0.5);
        assert_eq!(weights.get("A9"), 0.5);
        assert_eq!(weights.get("A0"), 0.0);
    }

    #[test]
    fn no_columns_is_insufficient() {
        let err = Reversal::new(ReversalParams::default())
            .unwrap()
            .compute_weights(&AssetTable::empty(Vec::new()))
            .unwrap_err();
        assert!(matches!(err, StrategyError::InsufficientData(_)));
    }
}
