use demand_forecast_core::{Decision, DiscountPolicy};
use std::collections::HashMap;

/// Fixed discount per category, applied on any forecast decline.
///
/// Category matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTableDiscountPolicy {
    rates: HashMap<String, u32>,
    default_pct: u32,
}

impl Default for CategoryTableDiscountPolicy {
    fn default() -> Self {
        Self::new(5)
            .with_rate("FOODS", 10)
            .with_rate("HOBBIES", 13)
            .with_rate("HOUSEHOLD", 20)
    }
}

impl CategoryTableDiscountPolicy {
    /// An empty table where every category gets `default_pct`.
    #[must_use]
    pub fn new(default_pct: u32) -> Self {
        Self {
            rates: HashMap::new(),
            default_pct,
        }
    }

    #[must_use]
    pub fn with_rate(mut self, category: &str, pct: u32) -> Self {
        self.rates.insert(category.to_uppercase(), pct);
        self
    }

    #[must_use]
    pub fn rate_for(&self, category: &str) -> u32 {
        self.rates
            .get(&category.to_uppercase())
            .copied()
            .unwrap_or(self.default_pct)
    }
}

impl DiscountPolicy for CategoryTableDiscountPolicy {
    fn decide(&self, recent_mean: f64, forecast_mean: f64, category: &str) -> Decision {
        if forecast_mean < recent_mean {
            let pct = self.rate_for(category);
            tracing::debug!(category, pct, "Category table applied discount");
            Decision::discount(format!("{pct}%"))
        } else {
            Decision::no_discount()
        }
    }

    fn name(&self) -> &'static str {
        "category-table"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use demand_forecast_core::Trend;

    #[test]
    fn foods_in_any_casing_gets_ten_percent() {
        let policy = CategoryTableDiscountPolicy::default();
        for category in ["FOODS", "foods", "Foods", "fOoDs"] {
            let decision = policy.decide(8.0, 6.0, category);
            assert_eq!(decision.suggested_discount, "10%", "{category}");
            assert_eq!(decision.trend, Trend::Decreasing);
        }
    }

    #[test]
    fn known_categories_use_their_rates() {
        let policy = CategoryTableDiscountPolicy::default();
        assert_eq!(policy.decide(8.0, 6.0, "HOBBIES").suggested_discount, "13%");
        assert_eq!(policy.decide(8.0, 6.0, "household").suggested_discount, "20%");
    }

    #[test]
    fn unknown_category_gets_default() {
        let policy = CategoryTableDiscountPolicy::default();
        assert_eq!(policy.decide(8.0, 6.0, "GARDEN").suggested_discount, "5%");
        assert_eq!(policy.decide(8.0, 6.0, "").suggested_discount, "5%");
    }

    #[test]
    fn no_decline_means_zero() {
        let policy = CategoryTableDiscountPolicy::default();
        assert_eq!(policy.decide(6.0, 6.0, "FOODS"), Decision::no_discount());
        assert_eq!(policy.decide(6.0, 7.0, "FOODS"), Decision::no_discount());
    }

    #[test]
    fn decline_from_non_positive_recent_mean_still_discounts() {
        let policy = CategoryTableDiscountPolicy::default();
        assert_eq!(policy.decide(0.0, -1.0, "HOBBIES").suggested_discount, "13%");
    }

    #[test]
    fn custom_rates_override_defaults() {
        let policy = CategoryTableDiscountPolicy::default().with_rate("foods", 12);
        assert_eq!(policy.rate_for("FOODS"), 12);
    }
}
