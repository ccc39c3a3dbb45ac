//! # Rebalancer Core Types
//!
//! The shared data model of the rebalancing backtester: date-indexed asset
//! tables, calendar periods, weight vectors, and the portfolio return series.
//!
//! This is the Layer 0 crate. It has no knowledge of files, strategies or
//! metrics; every other crate in the workspace builds on these types.

pub mod enums;
pub mod error;
pub mod period;
pub mod series;
pub mod table;
pub mod weights;

// Re-export the core types to provide a clean public API.
pub use enums::{CompletenessPolicy, FirstPeriodPolicy, Granularity, Lookback, StrategyId};
pub use error::CoreError;
pub use period::{Period, PeriodReturnTable, PeriodTable};
pub use series::{PortfolioReturnSeries, SeriesPoint};
pub use table::{AssetId, AssetTable, PriceTable, ReturnTable};
pub use weights::WeightVector;
