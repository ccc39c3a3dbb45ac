use serde::{Deserialize, Serialize};

/// Identifies which weighting strategy to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum StrategyId {
    EqualWeight,
    VolatilityScaled,
    Momentum,
    Reversal,
}

impl StrategyId {
    pub const ALL: [StrategyId; 4] = [
        StrategyId::EqualWeight,
        StrategyId::VolatilityScaled,
        StrategyId::Momentum,
        StrategyId::Reversal,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StrategyId::EqualWeight => "equal_weight",
            StrategyId::VolatilityScaled => "volatility_scaled",
            StrategyId::Momentum => "momentum",
            StrategyId::Reversal => "reversal",
        }
    }
}

impl std::fmt::Display for StrategyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which table a strategy reads when weighting period `t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookback {
    /// Period `t`'s own returns.
    Current,
    /// Period `t - 1`'s returns (walk-forward).
    Previous,
}

/// The calendar bucket used as the rebalancing interval.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Granularity {
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

/// Rule for excluding assets with missing data inside a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum CompletenessPolicy {
    /// Drop an asset with at least one missing value in the period.
    #[default]
    DropIfAnyMissing,
    /// Drop an asset only when every value in the period is missing.
    DropIfAllMissing,
}

impl CompletenessPolicy {
    /// Returns true when a column with `missing` gaps out of `total` cells is kept.
    pub fn keeps(&self, missing: usize, total: usize) -> bool {
        match self {
            CompletenessPolicy::DropIfAnyMissing => missing == 0,
            CompletenessPolicy::DropIfAllMissing => missing < total,
        }
    }
}

/// What a look-back strategy does for the first period, which has no predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum FirstPeriodPolicy {
    /// The first period gets no weights and contributes no dates.
    #[default]
    Skip,
    /// The first period is weighted 1/N over its own columns.
    EqualWeight,
}
