//! Forecasting models implementing the `ForecastModel` capability.

pub mod additive;

pub use additive::{AdditiveFit, AdditiveSeasonalModel, MIN_SEASONAL_SPAN_DAYS};

use demand_forecast_core::ModelConfig;

impl From<&ModelConfig> for AdditiveSeasonalModel {
    fn from(config: &ModelConfig) -> Self {
        Self::new(config.weekly_seasonality)
    }
}
