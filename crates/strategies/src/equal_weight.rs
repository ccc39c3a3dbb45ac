use crate::error::StrategyError;
use crate::{ensure_columns, WeightingStrategy};
use core_types::{AssetTable, Lookback, StrategyId, WeightVector};

/// Holds every asset of the current period at `1/N`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualWeight;

impl EqualWeight {
    pub fn new() -> Self {
        Self
    }
}

impl WeightingStrategy for EqualWeight {
    fn id(&self) -> StrategyId {
        StrategyId::EqualWeight
    }

    fn lookback(&self) -> Lookback {
        Lookback::Current
    }

    fn compute_weights(&self, table: &AssetTable) -> Result<WeightVector, StrategyError> {
        ensure_columns(self.id(), table)?;
        Ok(WeightVector::equal(table.assets()))
    }
}
