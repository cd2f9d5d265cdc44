use demand_forecast_core::{Decision, DiscountPolicy};

/// Discount proportional to the forecast decline.
///
/// `discount = clamp((recent - forecast) / recent * 100, min_pct, max_pct)`,
/// rendered with one decimal place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioDiscountPolicy {
    min_pct: f64,
    max_pct: f64,
}

impl Default for RatioDiscountPolicy {
    fn default() -> Self {
        Self::new(1.0, 25.0)
    }
}

impl RatioDiscountPolicy {
    #[must_use]
    pub const fn new(min_pct: f64, max_pct: f64) -> Self {
        Self { min_pct, max_pct }
    }

    /// Decline percentage clamped into the configured band.
    #[must_use]
    pub fn discount_pct(&self, recent_mean: f64, forecast_mean: f64) -> f64 {
        let decline_ratio = (recent_mean - forecast_mean) / recent_mean;
        (decline_ratio * 100.0).max(self.min_pct).min(self.max_pct)
    }
}

impl DiscountPolicy for RatioDiscountPolicy {
    fn decide(&self, recent_mean: f64, forecast_mean: f64, _category: &str) -> Decision {
        if forecast_mean < recent_mean && recent_mean > 0.0 {
            let pct = self.discount_pct(recent_mean, forecast_mean);
            tracing::debug!(recent_mean, forecast_mean, pct, "Ratio policy applied discount");
            Decision::discount(format!("{pct:.1}%"))
        } else {
            Decision::no_discount()
        }
    }

    fn name(&self) -> &'static str {
        "ratio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use demand_forecast_core::{Recommendation, Trend};

    fn decide(recent: f64, forecast: f64) -> Decision {
        RatioDiscountPolicy::default().decide(recent, forecast, "FOODS")
    }

    #[test]
    fn moderate_decline_uses_ratio() {
        // (10 - 9) / 10 = 10%
        let decision = decide(10.0, 9.0);
        assert_eq!(decision.suggested_discount, "10.0%");
        assert_eq!(decision.trend, Trend::Decreasing);
        assert_eq!(decision.recommendation, Recommendation::ApplyDiscount);
    }

    #[test]
    fn tiny_decline_is_raised_to_floor() {
        assert_eq!(decide(100.0, 99.9).suggested_discount, "1.0%");
    }

    #[test]
    fn steep_decline_is_capped() {
        assert_eq!(decide(10.0, 1.0).suggested_discount, "25.0%");
        // Negative forecasts still cap at 25%
        assert_eq!(decide(10.0, -40.0).suggested_discount, "25.0%");
    }

    #[test]
    fn equal_means_mean_no_discount() {
        let decision = decide(5.0, 5.0);
        assert_eq!(decision, Decision::no_discount());
    }

    #[test]
    fn rising_forecast_means_no_discount() {
        assert_eq!(decide(5.0, 6.0).suggested_discount, "0%");
    }

    #[test]
    fn non_positive_recent_mean_never_discounts() {
        assert_eq!(decide(0.0, -1.0), Decision::no_discount());
        assert_eq!(decide(-2.0, -3.0), Decision::no_discount());
    }

    #[test]
    fn applied_discount_always_within_band_with_one_decimal() {
        let policy = RatioDiscountPolicy::default();
        for recent in [0.5, 1.0, 3.7, 12.0, 250.0] {
            for step in 1..=40 {
                let forecast = recent - recent * f64::from(step) / 20.0;
                let decision = policy.decide(recent, forecast, "HOBBIES");
                let text = decision.suggested_discount;
                let number = text.strip_suffix('%').unwrap();
                let (_, decimals) = number.split_once('.').unwrap();
                assert_eq!(decimals.len(), 1, "{text}");
                let pct: f64 = number.parse().unwrap();
                assert!((1.0..=25.0).contains(&pct), "{text}");
            }
        }
    }
}
