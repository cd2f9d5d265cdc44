pub mod category_table;
pub mod ratio;

pub use category_table::CategoryTableDiscountPolicy;
pub use ratio::RatioDiscountPolicy;

use demand_forecast_core::{DiscountPolicy, PolicyKind};
use std::sync::Arc;

/// Builds the default-configured policy for `kind`.
#[must_use]
pub fn policy_for(kind: PolicyKind) -> Arc<dyn DiscountPolicy> {
    match kind {
        PolicyKind::Ratio => Arc::new(RatioDiscountPolicy::default()),
        PolicyKind::CategoryTable => Arc::new(CategoryTableDiscountPolicy::default()),
    }
}
