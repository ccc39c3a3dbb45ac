//! # Rebalancer Strategy Library
//!
//! This crate contains the weighting logic of the rebalancer. It defines a
//! universal `WeightingStrategy` trait and provides four implementations.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** Strategies see one period's return table and nothing
//!   else. Which table that is (the current period or the previous one) is
//!   decided by the caller from `WeightingStrategy::lookback`.
//! - **Uniform Contract:** every strategy returns weights whose support is a
//!   subset of the input's columns and which sum to 1.0, or an all-zero
//!   vector when no asset qualifies. The only error is a table with no
//!   columns at all.
//! - **Extensibility:** Adding a new strategy involves creating a new module, implementing
//!   the trait, and adding it to the `StrategyId` enum and `factory`.

pub mod equal_weight;
pub mod error;
pub mod factory;
pub mod momentum;
mod quantile;
pub mod reversal;
pub mod volatility_scaled;

// Re-export the key components to create a clean, public-facing API.
pub use equal_weight::EqualWeight;
pub use error::StrategyError;
pub use factory::create_strategy;
pub use momentum::Momentum;
pub use reversal::Reversal;
pub use volatility_scaled::VolatilityScaled;

pub use core_types::enums::StrategyId;

use core_types::{AssetTable, Lookback, WeightVector};

/// The core trait that all weighting strategies implement.
///
/// Strategies are stateless; `Send + Sync` lets periods be weighted on
/// several threads at once.
pub trait WeightingStrategy: Send + Sync {
    fn id(&self) -> StrategyId;

    /// Whether this strategy reads the current period's table or the previous one's.
    fn lookback(&self) -> Lookback;

    /// Derives a weight vector from one period's daily returns.
    ///
    /// # Returns
    ///
    /// * `Ok(WeightVector)` - weights summing to 1.0, or all zeros if no asset qualifies.
    /// * `Err(StrategyError::InsufficientData)` - if `table` has no asset columns.
    fn compute_weights(&self, table: &AssetTable) -> Result<WeightVector, StrategyError>;
}

/// Fails when there is no asset to weight.
pub(crate) fn ensure_columns(id: StrategyId, table: &AssetTable) -> Result<(), StrategyError> {
    if table.n_assets() == 0 {
        return Err(StrategyError::InsufficientData(format!(
            "{} received a table with no asset columns",
            id
        )));
    }
    Ok(())
}

/// Equal weights on the `selected` column indices, explicit zeros elsewhere.
pub(crate) fn equal_over_selected(table: &AssetTable, selected: &[usize]) -> WeightVector {
    if selected.is_empty() {
        return WeightVector::zeros(table.assets());
    }
    let w = 1.0 / selected.len() as f64;
    table
        .assets()
        .iter()
        .enumerate()
        .map(|(i, asset)| {
            let weight = if selected.contains(&i) { w } else { 0.0 };
            (asset.clone(), weight)
        })
        .collect()
}
