use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error(transparent)]
    Core(#[from] core_types::CoreError),

    #[error("Strategy error: {0}")]
    Strategy(#[from] strategies::StrategyError),

    #[error("Analytics error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}
