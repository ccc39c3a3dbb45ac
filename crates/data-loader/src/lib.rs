//! # Rebalancer Data Loader
//!
//! The file-facing edge of the rebalancer. It discovers per-asset parquet
//! kline files, outer-joins their daily closes into a `PriceTable`, and
//! persists derived artifacts (per-period tables, the portfolio series) as
//! JSON. The rebalancing core never touches the filesystem itself.

pub mod error;
pub mod export;
pub mod parquet;

pub use error::LoaderError;
pub use export::{export_period_tables, export_series, SeriesExport};
pub use parquet::{discover_files, load_prices, read_closes};
