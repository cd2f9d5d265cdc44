//! Error taxonomy for the forecasting pipeline.
//!
//! Internal steps fail with a specific [`ForecastError`]. The public
//! boundary ([`crate::engine::ForecastEngine::run`]) normalizes every error
//! into an [`crate::outcome::ErrorResult`] so callers always receive one of
//! the two result shapes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a [`ForecastError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Dataset file missing, or requested product absent.
    NotFound,
    /// Dataset lacks a required column or holds an unreadable cell.
    Schema,
    /// Cleaning, fitting, or prediction failed.
    ComputationFault,
}

/// Errors raised while preparing, fitting, or deciding on a forecast.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    /// The dataset path does not resolve to a readable file.
    #[error("Dataset not found at {path}")]
    DatasetNotFound {
        /// Path that was requested.
        path: String,
    },

    /// A required column is missing from the dataset header.
    #[error("CSV must contain '{column}' column.")]
    MissingColumn {
        /// Name of the absent column.
        column: String,
    },

    /// A row could not be parsed.
    #[error("Invalid record on line {line}: {reason}")]
    InvalidRecord {
        /// 1-based line number in the source file.
        line: u64,
        /// Parser message.
        reason: String,
    },

    /// No row matches the requested product.
    #[error("Product ID '{product_id}' not found.")]
    ProductNotFound {
        /// Product identifier that was requested.
        product_id: String,
    },

    /// Too few observations to run a computation.
    #[error("Insufficient data: {actual} rows available, at least {required} required")]
    InsufficientData {
        /// Minimum number of rows needed.
        required: usize,
        /// Number of rows present.
        actual: usize,
    },

    /// Any other failure during cleaning, fitting, or prediction.
    #[error("Computation failed: {reason}")]
    Computation {
        /// Description of the failure.
        reason: String,
    },
}

impl ForecastError {
    /// Returns the taxonomy bucket this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DatasetNotFound { .. } | Self::ProductNotFound { .. } => ErrorKind::NotFound,
            Self::MissingColumn { .. } | Self::InvalidRecord { .. } => ErrorKind::Schema,
            Self::InsufficientData { .. } | Self::Computation { .. } => {
                ErrorKind::ComputationFault
            }
        }
    }

    /// Shorthand for a [`ForecastError::Computation`].
    pub fn computation(reason: impl Into<String>) -> Self {
        Self::Computation {
            reason: reason.into(),
        }
    }
}
