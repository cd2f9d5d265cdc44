//! Descriptive statistics used by series cleaning and the decision step.

/// Arithmetic mean. Returns `None` for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f64;
    Some(values.iter().sum::<f64>() / n)
}

/// Quantile with linear interpolation between closest ranks.
///
/// For sorted values `x[0..n]` the position is `q * (n - 1)`; the result
/// interpolates between the two neighbouring ranks. Returns `None` for an
/// empty slice or `q` outside `[0, 1]`.
#[must_use]
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    #[allow(clippy::cast_precision_loss)]
    let pos = q * (sorted.len() - 1) as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lower = pos.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let frac = pos - pos.floor();

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Tukey fences `[Q1 - k*IQR, Q3 + k*IQR]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrBounds {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrBounds {
    /// Computes the fences from the 25th/75th percentiles of `values`.
    #[must_use]
    pub fn from_values(values: &[f64], multiplier: f64) -> Option<Self> {
        let q1 = quantile(values, 0.25)?;
        let q3 = quantile(values, 0.75)?;
        let iqr = q3 - q1;
        Some(Self {
            q1,
            q3,
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        })
    }

    #[must_use]
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Inclusive on both fences.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Keeps the items whose key falls inside the IQR fences of all keys.
///
/// Order is preserved. An empty input yields an empty output.
pub fn iqr_filter<T: Clone>(items: &[T], multiplier: f64, key: impl Fn(&T) -> f64) -> Vec<T> {
    let values: Vec<f64> = items.iter().map(&key).collect();
    let Some(bounds) = IqrBounds::from_values(&values, multiplier) else {
        return Vec::new();
    };
    items
        .iter()
        .filter(|item| bounds.contains(key(*item)))
        .cloned()
        .collect()
}
