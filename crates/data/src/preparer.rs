//! Turns raw sales rows for one product into a cleaned forecasting series.
//!
//! Steps, in order:
//! 1. keep the rows for the product, remembering the first row's category
//! 2. sort by date and keep the most recent `lookback_rows`
//! 3. raise a low-data diagnostic below `min_rows` (non-fatal)
//! 4. drop non-positive or missing sales
//! 5. drop IQR outliers, but only if at least `min_rows` remain afterwards

use crate::dataset::SalesDataset;
use demand_forecast_core::stats::{self, IqrBounds};
use demand_forecast_core::{
    CleaningStats, Diagnostic, Diagnostics, ForecastConfig, ForecastError, ProductSeries,
    SalesRecord, SeriesPoint, SeriesPreparer,
};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrepareSettings {
    pub lookback_rows: usize,
    pub min_rows: usize,
    pub iqr_multiplier: f64,
}

impl Default for PrepareSettings {
    fn default() -> Self {
        Self::from(&ForecastConfig::default())
    }
}

impl From<&ForecastConfig> for PrepareSettings {
    fn from(config: &ForecastConfig) -> Self {
        Self {
            lookback_rows: config.lookback_rows,
            min_rows: config.min_rows,
            iqr_multiplier: config.iqr_multiplier,
        }
    }
}

/// Loads `dataset_path` and prepares the series for `product_id`.
///
/// # Errors
///
/// Returns an error if the dataset is missing or malformed, or the product
/// does not appear in it.
pub fn prepare(
    dataset_path: impl AsRef<Path>,
    product_id: &str,
    settings: &PrepareSettings,
    diagnostics: &mut Diagnostics,
) -> Result<ProductSeries, ForecastError> {
    let dataset = SalesDataset::load(dataset_path)?;
    let records = dataset.records_for(product_id)?;
    prepare_records(records, product_id, settings, diagnostics)
}

/// Cleans already-filtered `records` for `product_id`.
///
/// # Errors
///
/// Returns [`ForecastError::ProductNotFound`] if `records` is empty.
pub fn prepare_records(
    mut records: Vec<SalesRecord>,
    product_id: &str,
    settings: &PrepareSettings,
    diagnostics: &mut Diagnostics,
) -> Result<ProductSeries, ForecastError> {
    let cat_id = records
        .first()
        .map(|r| r.cat_id.clone())
        .ok_or_else(|| ForecastError::ProductNotFound {
            product_id: product_id.to_string(),
        })?;

    records.sort_by_key(|r| r.date);
    let start = records.len().saturating_sub(settings.lookback_rows);
    let window = &records[start..];

    if window.len() < settings.min_rows {
        diagnostics.push(Diagnostic::LowData {
            product_id: product_id.to_string(),
            rows: window.len(),
            minimum: settings.min_rows,
        });
    }

    // NaN fails the comparison, so missing sales go too.
    let positive: Vec<SeriesPoint> = window
        .iter()
        .filter(|r| r.sales > 0.0)
        .map(|r| SeriesPoint::new(r.date, r.sales))
        .collect();

    let cleaned = stats::iqr_filter(&positive, settings.iqr_multiplier, |p| p.y);
    let outliers_flagged = positive.len() - cleaned.len();
    let outlier_filter_applied = cleaned.len() >= settings.min_rows;

    if let Some(bounds) = IqrBounds::from_values(
        &positive.iter().map(|p| p.y).collect::<Vec<_>>(),
        settings.iqr_multiplier,
    ) {
        tracing::debug!(
            product_id,
            q1 = bounds.q1,
            q3 = bounds.q3,
            outliers_flagged,
            outlier_filter_applied,
            "IQR cleaning"
        );
    }

    let stats = CleaningStats {
        window_rows: window.len(),
        positive_rows: positive.len(),
        outliers_flagged,
        outlier_filter_applied,
    };
    let points = if outlier_filter_applied {
        cleaned
    } else {
        positive
    };

    Ok(ProductSeries {
        product_id: product_id.to_string(),
        cat_id,
        points,
        stats,
    })
}

/// [`SeriesPreparer`] that re-reads a CSV dataset on every call.
#[derive(Debug, Clone)]
pub struct CsvSeriesPreparer {
    path: PathBuf,
    settings: PrepareSettings,
}

impl CsvSeriesPreparer {
    pub fn new(path: impl Into<PathBuf>, settings: PrepareSettings) -> Self {
        Self {
            path: path.into(),
            settings,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SeriesPreparer for CsvSeriesPreparer {
    fn prepare(
        &self,
        product_id: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<ProductSeries, ForecastError> {
        prepare(&self.path, product_id, &self.settings, diagnostics)
    }
}
