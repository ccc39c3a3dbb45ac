//! # Rebalancer Configuration
//!
//! Strongly-typed settings for a rebalancing backtest, loaded from a TOML
//! file layered with `REBALANCER__SECTION__KEY` environment variables, plus
//! the tracing setup shared by every binary.

use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use logging::init_tracing;
pub use settings::{
    Backtest, Config, DataSettings, Logging, MomentumParams, ReversalParams, Strategies,
};

/// Loads the application configuration from `path`.
///
/// The file must exist. Environment variables such as
/// `REBALANCER__BACKTEST__STRATEGY=momentum` override file values. The
/// result is validated before it is returned.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path.as_ref()).required(true))
        .add_source(
            config::Environment::with_prefix("REBALANCER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}
