use crate::error::StrategyError;
use crate::quantile::{select_tail, Tail};
use crate::{ensure_columns, equal_over_selected, WeightingStrategy};
use configuration::MomentumParams;
use core_types::{AssetTable, Lookback, StrategyId, WeightVector};

/// Cross-sectional momentum: equal-weights the previous period's winners.
///
/// Assets whose compounded return is at or above the `(1 - q)`-quantile are
/// selected. Ties at the cutoff are all included.
#[derive(Debug, Clone)]
pub struct Momentum {
    top_quantile: f64,
}

impl Momentum {
    /// Creates a new `Momentum` instance, validating that `top_quantile` is in `(0, 1]`.
    pub fn new(params: MomentumParams) -> Result<Self, StrategyError> {
        if !(params.top_quantile > 0.0 && params.top_quantile <= 1.0) {
            return Err(StrategyError::InvalidParameters(format!(
                "top_quantile must be in (0, 1], got {}",
                params.top_quantile
            )));
        }
        Ok(Self {
            top_quantile: params.top_quantile,
        })
    }
}

impl WeightingStrategy for Momentum {
    fn id(&self) -> StrategyId {
        StrategyId::Momentum
    }

    fn lookback(&self) -> Lookback {
        Lookback::Previous
    }

    fn compute_weights(&self, table: &AssetTable) -> Result<WeightVector, StrategyError> {
        ensure_columns(self.id(), table)?;
        let selected = select_tail(table, self.top_quantile, Tail::Top);
        tracing::debug!(selected = selected.len(), of = table.n_assets(), "momentum selection");
        Ok(equal_over_selected(table, &selected))
    }
}
