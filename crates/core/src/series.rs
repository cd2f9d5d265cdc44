use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the sales dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub item_id: String,
    pub date: NaiveDate,
    pub sales: f64,
    pub cat_id: String,
}

/// A single observation in the shape the forecasting model consumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub ds: NaiveDate,
    pub y: f64,
}

impl SeriesPoint {
    #[must_use]
    pub const fn new(ds: NaiveDate, y: f64) -> Self {
        Self { ds, y }
    }
}

/// Row counts recorded while a product series was cleaned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningStats {
    /// Rows in the most-recent window, before any cleaning.
    pub window_rows: usize,
    /// Rows left after dropping non-positive sales.
    pub positive_rows: usize,
    /// Rows the IQR filter flagged as outliers.
    pub outliers_flagged: usize,
    /// Whether the IQR-filtered set replaced the positive-only set.
    pub outlier_filter_applied: bool,
}

/// Date-ordered, cleaned observations for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSeries {
    pub product_id: String,
    pub cat_id: String,
    pub points: Vec<SeriesPoint>,
    pub stats: CleaningStats,
}

impl ProductSeries {
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Observed values in date order.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    #[must_use]
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.ds)
    }

    /// The last `n` observed values (all of them when fewer exist).
    #[must_use]
    pub fn tail_values(&self, n: usize) -> Vec<f64> {
        let start = self.points.len().saturating_sub(n);
        self.points[start..].iter().map(|p| p.y).collect()
    }
}
