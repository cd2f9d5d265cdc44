//! Non-fatal advisories raised during a forecast request.
//!
//! Diagnostics never change the returned result. They are collected per call
//! and also emitted through `tracing` so hosts can choose how to surface them.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The product window holds fewer rows than the reliability threshold.
    LowData {
        product_id: String,
        rows: usize,
        minimum: usize,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LowData {
                product_id,
                rows,
                minimum,
            } => write!(
                f,
                "Only {rows} rows for {product_id} (fewer than {minimum}). Forecast may be unreliable."
            ),
        }
    }
}

/// Collector handed to each pipeline call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic and logs it at `warn`.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{diagnostic}");
        self.items.push(diagnostic);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_data_message_mentions_row_count() {
        let d = Diagnostic::LowData {
            product_id: "FOODS_1_001".to_string(),
            rows: 9,
            minimum: 14,
        };
        let text = d.to_string();
        assert!(text.contains("Only 9 rows"));
        assert!(text.contains("unreliable"));
    }

    #[test]
    fn push_collects_in_order() {
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());
        diagnostics.push(Diagnostic::LowData {
            product_id: "A".to_string(),
            rows: 1,
            minimum: 14,
        });
        diagnostics.push(Diagnostic::LowData {
            product_id: "B".to_string(),
            rows: 2,
            minimum: 14,
        });
        let ids: Vec<_> = diagnostics
            .iter()
            .map(|Diagnostic::LowData { product_id, .. }| product_id.as_str())
            .collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert_eq!(diagnostics.len(), 2);
    }
}
