//! # Rebalancer Portfolio Backtester
//!
//! This crate runs calendar-rebalanced portfolio backtests. Daily prices are
//! turned into returns, split into periods, weighted period by period under
//! a walk-forward discipline, and stitched back into one continuous
//! portfolio return series for the analytics engine.

pub mod composer;
pub mod error;
pub mod manager;
pub mod partitioner;
pub mod returns;

pub use composer::{apply_weights, compose, reconcile, PeriodOutcome, PortfolioComposer};
pub use error::PortfolioError;
pub use manager::{BacktestOutcome, PortfolioManager};
pub use partitioner::partition;
pub use returns::compute_returns;
