//! Result shapes returned to callers of the forecast pipeline.

use crate::error::{ErrorKind, ForecastError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A predicted value for one future day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_sales: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
}

impl Trend {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Apply discount")]
    ApplyDiscount,
    #[serde(rename = "No discount needed")]
    NoDiscountNeeded,
}

impl Recommendation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApplyDiscount => "Apply discount",
            Self::NoDiscountNeeded => "No discount needed",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of a [`crate::traits::DiscountPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub trend: Trend,
    pub recommendation: Recommendation,
    /// Percentage string, always ending in `%`.
    pub suggested_discount: String,
}

impl Decision {
    /// The decision for a flat or rising forecast.
    #[must_use]
    pub fn no_discount() -> Self {
        Self {
            trend: Trend::Increasing,
            recommendation: Recommendation::NoDiscountNeeded,
            suggested_discount: "0%".to_string(),
        }
    }

    /// The decision for a declining forecast.
    #[must_use]
    pub fn discount(suggested_discount: String) -> Self {
        Self {
            trend: Trend::Decreasing,
            recommendation: Recommendation::ApplyDiscount,
            suggested_discount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub product_id: String,
    pub cat_id: String,
    pub forecast: Vec<ForecastPoint>,
    pub trend: Trend,
    pub recommendation: Recommendation,
    pub suggested_discount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub error: String,
    /// Not part of the wire shape; kept so hosts can map it to a status.
    #[serde(skip)]
    pub kind: Option<ErrorKind>,
}

impl From<ForecastError> for ErrorResult {
    fn from(err: ForecastError) -> Self {
        Self {
            error: err.to_string(),
            kind: Some(err.kind()),
        }
    }
}

/// Either a [`ForecastResult`] or an [`ErrorResult`], never anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ForecastOutcome {
    Forecast(ForecastResult),
    Error(ErrorResult),
}

impl ForecastOutcome {
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    #[must_use]
    pub const fn as_forecast(&self) -> Option<&ForecastResult> {
        match self {
            Self::Forecast(result) => Some(result),
            Self::Error(_) => None,
        }
    }

    #[must_use]
    pub const fn as_error(&self) -> Option<&ErrorResult> {
        match self {
            Self::Forecast(_) => None,
            Self::Error(err) => Some(err),
        }
    }
}

impl From<Result<ForecastResult, ForecastError>> for ForecastOutcome {
    fn from(result: Result<ForecastResult, ForecastError>) -> Self {
        match result {
            Ok(forecast) => Self::Forecast(forecast),
            Err(err) => Self::Error(err.into()),
        }
    }
}
