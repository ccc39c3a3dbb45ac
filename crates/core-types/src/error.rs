use thiserror::Error;

/// The shared error taxonomy for every stage of a rebalancing backtest.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Malformed or empty input table.
    #[error("Data error: {0}")]
    Data(String),

    /// A stage has zero usable rows or columns to act on.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// A weight vector's support could not be reconciled with a period's columns.
    /// Alignment currently always degrades to zero-fill, so this is never raised.
    #[error("Alignment error: {0}")]
    Alignment(String),
}
