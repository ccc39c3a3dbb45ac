//! # Rebalancer Analytics Engine
//!
//! This crate evaluates a rebalanced portfolio's daily return series. It acts
//! as the "unbiased judge" of every weighting strategy.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** It depends only on `core-types` and has no knowledge of
//!   files, strategies or periods.
//! - **Stateless Calculation:** The `AnalyticsEngine` takes a
//!   `PortfolioReturnSeries` and produces a `PerformanceReport`. A failure
//!   never touches the series it was given.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: The main struct that contains the calculation logic.
//! - `PerformanceReport`: cumulative and annualized return, annualized
//!   volatility, Sharpe, max drawdown and Calmar.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{AnalyticsEngine, TRADING_DAYS_PER_YEAR};
pub use error::AnalyticsError;
pub use report::PerformanceReport;
