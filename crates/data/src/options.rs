//! Selectable (product, category) pairs for a UI's two-step selector.

use crate::dataset::read_rows;
use demand_forecast_core::ForecastError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductOption {
    pub item_id: String,
    pub cat_id: String,
}

/// Reads every unique `(item_id, cat_id)` pair, in first-occurrence order.
///
/// # Errors
///
/// Returns an error if the dataset is missing, lacks `item_id` or `cat_id`,
/// or holds a malformed row.
pub fn list_options(dataset_path: impl AsRef<Path>) -> Result<Vec<ProductOption>, ForecastError> {
    let rows = read_rows::<ProductOption>(dataset_path.as_ref(), &["item_id", "cat_id"])?;

    let mut seen = HashSet::new();
    let options: Vec<ProductOption> = rows
        .into_iter()
        .map(|(_, option)| option)
        .filter(|option| seen.insert(option.clone()))
        .collect();

    tracing::debug!(count = options.len(), "Options listed");
    Ok(options)
}

/// Sorted distinct categories.
#[must_use]
pub fn categories(options: &[ProductOption]) -> Vec<String> {
    options
        .iter()
        .map(|o| o.cat_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted distinct product ids within `cat_id`.
#[must_use]
pub fn products_in_category(options: &[ProductOption], cat_id: &str) -> Vec<String> {
    options
        .iter()
        .filter(|o| o.cat_id == cat_id)
        .map(|o| o.item_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
