use crate::config::{DEFAULT_HORIZON_DAYS, DEFAULT_MAX_HORIZON_DAYS};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::ForecastError;
use crate::outcome::{ForecastOutcome, ForecastResult};
use crate::series::ProductSeries;
use crate::stats;
use crate::traits::{DiscountPolicy, ForecastModel, SeriesPreparer};
use std::sync::Arc;

/// Result of one pipeline call: the two-shape outcome plus any advisories.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRun {
    pub outcome: ForecastOutcome,
    pub diagnostics: Vec<Diagnostic>,
}

/// Fits `model` on `series`, predicts `horizon_days` ahead, and lets `policy`
/// decide on a discount from the recent and forecast means.
///
/// # Errors
///
/// Returns an error if the horizon is zero or above `max_horizon_days`, the
/// series is empty, the model fails to fit or predict, or the means are not
/// finite.
pub fn forecast_and_decide(
    series: &ProductSeries,
    model: &dyn ForecastModel,
    policy: &dyn DiscountPolicy,
    horizon_days: usize,
    max_horizon_days: usize,
) -> Result<ForecastResult, ForecastError> {
    if horizon_days == 0 {
        return Err(ForecastError::computation(
            "forecast horizon must be at least one day",
        ));
    }
    if horizon_days > max_horizon_days {
        return Err(ForecastError::computation(format!(
            "forecast horizon of {horizon_days} days exceeds the maximum of {max_horizon_days}"
        )));
    }
    if series.is_empty() {
        return Err(ForecastError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }

    let fitted = model.fit(&series.points)?;
    let predicted = fitted.predict(horizon_days)?;
    let start = predicted.len().saturating_sub(horizon_days);
    let window = predicted[start..].to_vec();

    let predicted_values: Vec<f64> = window.iter().map(|p| p.predicted_sales).collect();
    let forecast_mean = stats::mean(&predicted_values)
        .ok_or_else(|| ForecastError::computation("model returned no predictions"))?;
    let recent_mean = stats::mean(&series.tail_values(horizon_days))
        .ok_or_else(|| ForecastError::computation("no recent observations"))?;

    if !forecast_mean.is_finite() || !recent_mean.is_finite() {
        return Err(ForecastError::computation(format!(
            "non-finite means (recent {recent_mean}, forecast {forecast_mean})"
        )));
    }

    let decision = policy.decide(recent_mean, forecast_mean, &series.cat_id);
    tracing::info!(
        product_id = %series.product_id,
        model = model.name(),
        policy = policy.name(),
        recent_mean,
        forecast_mean,
        trend = %decision.trend,
        discount = %decision.suggested_discount,
        "Forecast decided"
    );

    Ok(ForecastResult {
        product_id: series.product_id.clone(),
        cat_id: series.cat_id.clone(),
        forecast: window,
        trend: decision.trend,
        recommendation: decision.recommendation,
        suggested_discount: decision.suggested_discount,
    })
}

/// Wires a preparer, model, and policy into the end-to-end pipeline.
pub struct ForecastEngine<P>
where
    P: SeriesPreparer,
{
    preparer: P,
    model: Arc<dyn ForecastModel>,
    policy: Arc<dyn DiscountPolicy>,
    horizon_days: usize,
    max_horizon_days: usize,
}

impl<P> ForecastEngine<P>
where
    P: SeriesPreparer,
{
    pub fn new(preparer: P, model: Arc<dyn ForecastModel>, policy: Arc<dyn DiscountPolicy>) -> Self {
        Self {
            preparer,
            model,
            policy,
            horizon_days: DEFAULT_HORIZON_DAYS,
            max_horizon_days: DEFAULT_MAX_HORIZON_DAYS,
        }
    }

    #[must_use]
    pub fn with_horizon(mut self, horizon_days: usize) -> Self {
        self.horizon_days = horizon_days;
        self
    }

    #[must_use]
    pub fn with_max_horizon(mut self, max_horizon_days: usize) -> Self {
        self.max_horizon_days = max_horizon_days;
        self
    }

    #[must_use]
    pub const fn horizon_days(&self) -> usize {
        self.horizon_days
    }

    /// Runs the pipeline for one product.
    ///
    /// Never fails: every error is folded into [`ForecastOutcome::Error`].
    pub fn run(&self, product_id: &str) -> ForecastRun {
        let mut diagnostics = Diagnostics::new();
        let result = self.try_run(product_id, &mut diagnostics);
        if let Err(e) = &result {
            tracing::error!(product_id, kind = ?e.kind(), "Forecast failed: {}", e);
        }

        ForecastRun {
            outcome: result.into(),
            diagnostics: diagnostics.into_vec(),
        }
    }

    fn try_run(
        &self,
        product_id: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<ForecastResult, ForecastError> {
        let series = self.preparer.prepare(product_id, diagnostics)?;
        tracing::debug!(
            product_id,
            rows = series.len(),
            stats = ?series.stats,
            "Series prepared"
        );
        forecast_and_decide(
            &series,
            self.model.as_ref(),
            self.policy.as_ref(),
            self.horizon_days,
            self.max_horizon_days,
        )
    }
}
