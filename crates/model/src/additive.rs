//! Additive trend + weekday seasonality model for daily sales.
//!
//! `y(t) = intercept + slope * t + weekday_effect[dow(t)]`
//!
//! - `t` is the day offset from the first observation, so gaps in the series
//!   keep their calendar spacing.
//! - The trend is an ordinary least squares line.
//! - Weekday effects are the mean detrended residual per day of week,
//!   centered to zero mean. They are only estimated when the series spans at
//!   least two full weeks.

use chrono::{Datelike, Days, NaiveDate};
use demand_forecast_core::{FittedModel, ForecastError, ForecastModel, ForecastPoint, SeriesPoint};
use serde::{Deserialize, Serialize};

/// Minimum span, in days, before weekday effects are estimated.
pub const MIN_SEASONAL_SPAN_DAYS: i64 = 14;

/// Unfitted model configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditiveSeasonalModel {
    weekly_seasonality: bool,
}

impl Default for AdditiveSeasonalModel {
    fn default() -> Self {
        Self::new(true)
    }
}

impl AdditiveSeasonalModel {
    #[must_use]
    pub const fn new(weekly_seasonality: bool) -> Self {
        Self { weekly_seasonality }
    }

    /// Fits the model, returning the concrete fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::InsufficientData`] for fewer than two points and
    /// [`ForecastError::Computation`] for non-finite values.
    pub fn fit_series(&self, series: &[SeriesPoint]) -> Result<AdditiveFit, ForecastError> {
        if series.len() < 2 {
            return Err(ForecastError::InsufficientData {
                required: 2,
                actual: series.len(),
            });
        }
        if let Some(bad) = series.iter().find(|p| !p.y.is_finite()) {
            return Err(ForecastError::computation(format!(
                "non-finite value {} on {}",
                bad.y, bad.ds
            )));
        }

        let origin = series.iter().map(|p| p.ds).min().unwrap_or(series[0].ds);
        let last = series.iter().map(|p| p.ds).max().unwrap_or(series[0].ds);

        #[allow(clippy::cast_precision_loss)]
        let t: Vec<f64> = series
            .iter()
            .map(|p| (p.ds - origin).num_days() as f64)
            .collect();
        let y: Vec<f64> = series.iter().map(|p| p.y).collect();

        let (intercept, slope) = least_squares(&t, &y);

        let span_days = (last - origin).num_days();
        let weekday_effects = if self.weekly_seasonality && span_days >= MIN_SEASONAL_SPAN_DAYS {
            weekday_effects(series, &t, intercept, slope)
        } else {
            [0.0; 7]
        };

        tracing::debug!(
            intercept,
            slope,
            span_days,
            seasonal = span_days >= MIN_SEASONAL_SPAN_DAYS && self.weekly_seasonality,
            "Additive model fitted"
        );

        Ok(AdditiveFit {
            origin,
            last,
            intercept,
            slope,
            weekday_effects,
        })
    }
}

impl ForecastModel for AdditiveSeasonalModel {
    fn fit(&self, series: &[SeriesPoint]) -> Result<Box<dyn FittedModel>, ForecastError> {
        Ok(Box::new(self.fit_series(series)?))
    }

    fn name(&self) -> &'static str {
        "additive-seasonal"
    }
}

/// Fitted parameters of an [`AdditiveSeasonalModel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditiveFit {
    origin: NaiveDate,
    last: NaiveDate,
    intercept: f64,
    slope: f64,
    /// Indexed by days from Monday.
    weekday_effects: [f64; 7],
}

impl AdditiveFit {
    #[must_use]
    pub const fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Trend per day.
    #[must_use]
    pub const fn slope(&self) -> f64 {
        self.slope
    }

    #[must_use]
    pub const fn weekday_effects(&self) -> &[f64; 7] {
        &self.weekday_effects
    }

    #[must_use]
    pub const fn last_date(&self) -> NaiveDate {
        self.last
    }

    /// Model value on `date`.
    #[must_use]
    pub fn value_at(&self, date: NaiveDate) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let t = (date - self.origin).num_days() as f64;
        let dow = date.weekday().num_days_from_monday() as usize;
        self.intercept + self.slope * t + self.weekday_effects[dow]
    }
}

impl FittedModel for AdditiveFit {
    fn predict(&self, horizon: usize) -> Result<Vec<ForecastPoint>, ForecastError> {
        (1..=horizon as u64)
            .map(|d| -> Result<ForecastPoint, ForecastError> {
                let date = self
                    .last
                    .checked_add_days(Days::new(d))
                    .ok_or_else(|| ForecastError::computation("forecast date out of range"))?;
                Ok(ForecastPoint {
                    date,
                    predicted_sales: self.value_at(date),
                })
            })
            .collect()
    }
}

/// Returns `(intercept, slope)` of the OLS line through `(x, y)`.
///
/// A degenerate `x` (all equal) yields a flat line at the mean of `y`.
fn least_squares(x: &[f64], y: &[f64]) -> (f64, f64) {
    #[allow(clippy::cast_precision_loss)]
    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        sxx += dx * dx;
        sxy += dx * (yi - y_mean);
    }

    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
    (y_mean - slope * x_mean, slope)
}

fn weekday_effects(series: &[SeriesPoint], t: &[f64], intercept: f64, slope: f64) -> [f64; 7] {
    let mut sums = [0.0; 7];
    let mut counts = [0usize; 7];
    for (point, ti) in series.iter().zip(t) {
        let dow = point.ds.weekday().num_days_from_monday() as usize;
        sums[dow] += point.y - (intercept + slope * ti);
        counts[dow] += 1;
    }

    let mut effects = [0.0; 7];
    for dow in 0..7 {
        if counts[dow] > 0 {
            #[allow(clippy::cast_precision_loss)]
            let count = counts[dow] as f64;
            effects[dow] = sums[dow] / count;
        }
    }

    let center = effects.iter().sum::<f64>() / 7.0;
    for effect in &mut effects {
        *effect -= center;
    }
    effects
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monday() -> NaiveDate {
        // 2016-02-01 was a Monday
        NaiveDate::from_ymd_opt(2016, 2, 1).unwrap()
    }

    fn daily(values: &[f64]) -> Vec<SeriesPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &y)| SeriesPoint::new(monday() + Days::new(i as u64), y))
            .collect()
    }

    // ============================================
    // Fit Tests
    // ============================================

    #[test]
    fn constant_series_predicts_the_constant_exactly() {
        let fit = AdditiveSeasonalModel::default()
            .fit_series(&daily(&[5.0; 90]))
            .unwrap();
        let forecast = fit.predict(14).unwrap();
        assert_eq!(forecast.len(), 14);
        assert!(forecast.iter().all(|p| p.predicted_sales == 5.0));
    }

    #[test]
    fn linear_trend_is_extrapolated() {
        let values: Vec<f64> = (0..10).map(|i| 2.0 + 0.5 * f64::from(i)).collect();
        let fit = AdditiveSeasonalModel::new(false).fit_series(&daily(&values)).unwrap();
        assert!((fit.slope() - 0.5).abs() < 1e-9);
        assert!((fit.intercept() - 2.0).abs() < 1e-9);

        let forecast = fit.predict(2).unwrap();
        assert!((forecast[0].predicted_sales - 7.0).abs() < 1e-9);
        assert!((forecast[1].predicted_sales - 7.5).abs() < 1e-9);
    }

    #[test]
    fn weekend_uplift_is_recovered() {
        let values: Vec<f64> = (0..56)
            .map(|i| if i % 7 >= 5 { 14.0 } else { 10.0 })
            .collect();
        let fit = AdditiveSeasonalModel::default().fit_series(&daily(&values)).unwrap();

        let effects = fit.weekday_effects();
        assert!(effects.iter().sum::<f64>().abs() < 1e-9);
        let uplift = effects[5] - effects[2];
        assert!((uplift - 4.0).abs() < 0.5, "uplift was {uplift}");
    }

    #[test]
    fn short_series_skips_seasonality() {
        let fit = AdditiveSeasonalModel::default()
            .fit_series(&daily(&[1.0, 9.0, 1.0, 9.0, 1.0]))
            .unwrap();
        assert_eq!(fit.weekday_effects(), &[0.0; 7]);
    }

    #[test]
    fn gaps_keep_calendar_spacing() {
        let points = vec![
            SeriesPoint::new(monday(), 1.0),
            SeriesPoint::new(monday() + Days::new(10), 11.0),
        ];
        let fit = AdditiveSeasonalModel::new(false).fit_series(&points).unwrap();
        assert!((fit.slope() - 1.0).abs() < 1e-9);
        assert_eq!(fit.last_date(), monday() + Days::new(10));
    }

    #[test]
    fn single_point_is_insufficient() {
        let err = AdditiveSeasonalModel::default()
            .fit_series(&daily(&[3.0]))
            .unwrap_err();
        assert_eq!(
            err,
            ForecastError::InsufficientData {
                required: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let err = AdditiveSeasonalModel::default()
            .fit_series(&daily(&[3.0, f64::INFINITY, 4.0]))
            .unwrap_err();
        assert!(matches!(err, ForecastError::Computation { .. }));
    }

    // ============================================
    // Predict Tests
    // ============================================

    #[test]
    fn predictions_are_consecutive_days_after_last() {
        let fit = AdditiveSeasonalModel::default()
            .fit_series(&daily(&[2.0; 20]))
            .unwrap();
        let forecast = fit.predict(14).unwrap();
        for (i, point) in forecast.iter().enumerate() {
            assert_eq!(point.date, fit.last_date() + Days::new(i as u64 + 1));
        }
    }

    #[test]
    fn boxed_model_matches_concrete_fit() {
        let points = daily(&[3.0, 4.0, 5.0, 6.0]);
        let model = AdditiveSeasonalModel::default();
        let boxed = ForecastModel::fit(&model, &points).unwrap().predict(3).unwrap();
        let concrete = model.fit_series(&points).unwrap().predict(3).unwrap();
        assert_eq!(boxed, concrete);
    }
}
