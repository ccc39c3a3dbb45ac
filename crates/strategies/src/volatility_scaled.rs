use crate::error::StrategyError;
use crate::{ensure_columns, WeightingStrategy};
use core_types::{AssetTable, Lookback, StrategyId, WeightVector};
use statrs::statistics::Statistics;

/// Volatilities at or below this are treated as zero.
pub const ZERO_VOLATILITY: f64 = 1e-12;

/// Inverse-volatility weighting on the previous period's returns.
///
/// Each asset's weight is proportional to `1 / sigma`, where `sigma` is the
/// sample standard deviation of its daily returns. Assets with zero or
/// undefined volatility (fewer than two observations) get no weight.
#[derive(Debug, Clone, Copy, Default)]
pub struct VolatilityScaled;

impl VolatilityScaled {
    pub fn new() -> Self {
        Self
    }
}

impl WeightingStrategy for VolatilityScaled {
    fn id(&self) -> StrategyId {
        StrategyId::VolatilityScaled
    }

    fn lookback(&self) -> Lookback {
        Lookback::Previous
    }

    fn compute_weights(&self, table: &AssetTable) -> Result<WeightVector, StrategyError> {
        ensure_columns(self.id(), table)?;

        let inverse_vols: Vec<Option<f64>> = (0..table.n_assets())
            .map(|col| {
                let values = table.defined_values(col);
                let vol = values.iter().std_dev();
                if vol.is_finite() && vol > ZERO_VOLATILITY {
                    Some(1.0 / vol)
                } else {
                    tracing::debug!(asset = %table.assets()[col], vol, "excluded: zero or undefined volatility");
                    None
                }
            })
            .collect();

        let total: f64 = inverse_vols.iter().flatten().sum();
        if total <= 0.0 {
            return Ok(WeightVector::zeros(table.assets()));
        }

        Ok(table
            .assets()
            .iter()
            .zip(inverse_vols)
            .map(|(asset, inv)| (asset.clone(), inv.map_or(0.0, |v| v / total)))
            .collect())
    }
}
