use crate::equal_weight::EqualWeight;
use crate::error::StrategyError;
use crate::momentum::Momentum;
use crate::reversal::Reversal;
use crate::volatility_scaled::VolatilityScaled;
use crate::WeightingStrategy;
use configuration::Config;
use core_types::enums::StrategyId;

/// Creates a new strategy instance based on the provided ID and configuration.
///
/// The match is exhaustive, so adding a `StrategyId` without wiring it here
/// is a compile error.
pub fn create_strategy(
    id: StrategyId,
    config: &Config,
) -> Result<Box<dyn WeightingStrategy>, StrategyError> {
    match id {
        StrategyId::EqualWeight => Ok(Box::new(EqualWeight::new())),
        StrategyId::VolatilityScaled => Ok(Box::new(VolatilityScaled::new())),
        StrategyId::Momentum => {
            let params = config.strategies.momentum.clone();
            Ok(Box::new(Momentum::new(params)?))
        }
        StrategyId::Reversal => {
            let params = config.strategies.reversal.clone();
            Ok(Box::new(Reversal::new(params)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Lookback;

    #[test]
    fn builds_every_strategy() {
        let config = Config::default();
        for id in StrategyId::ALL {
            let strategy = create_strategy(id, &config).unwrap();
            assert_eq!(strategy.id(), id);
        }
    }

    #[test]
    fn only_equal_weight_uses_the_current_period() {
        let config = Config::default();
        for id in StrategyId::ALL {
            let expected = if id == StrategyId::EqualWeight {
                Lookback::Current
            } else {
                Lookback::Previous
            };
            assert_eq!(create_strategy(id, &config).unwrap().lookback(), expected);
        }
    }

    #[test]
    fn propagates_invalid_parameters() {
        let mut config = Config::default();
        config.strategies.momentum.top_quantile = 3.0;
        assert!(create_strategy(StrategyId::Momentum, &config).is_err());
    }
}
