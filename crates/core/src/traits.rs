use crate::diagnostics::Diagnostics;
use crate::error::ForecastError;
use crate::outcome::{Decision, ForecastPoint};
use crate::series::{ProductSeries, SeriesPoint};

/// Produces the cleaned series for one product.
pub trait SeriesPreparer: Send + Sync {
    fn prepare(
        &self,
        product_id: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<ProductSeries, ForecastError>;
}

/// Forecasting capability: fits a fresh model per series.
pub trait ForecastModel: Send + Sync {
    fn fit(&self, series: &[SeriesPoint]) -> Result<Box<dyn FittedModel>, ForecastError>;
    fn name(&self) -> &str;
}

/// A model fitted to one series.
pub trait FittedModel: Send {
    /// Predicts `horizon` consecutive days after the last fitted date.
    fn predict(&self, horizon: usize) -> Result<Vec<ForecastPoint>, ForecastError>;
}

/// Turns the recent/forecast means into a trend, recommendation, and discount.
pub trait DiscountPolicy: Send + Sync {
    fn decide(&self, recent_mean: f64, forecast_mean: f64, category: &str) -> Decision;
    fn name(&self) -> &str;
}
