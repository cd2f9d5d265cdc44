use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_DATASET_PATH: &str = "sales_CA1_sample.csv";
pub const DEFAULT_HORIZON_DAYS: usize = 14;
pub const DEFAULT_MAX_HORIZON_DAYS: usize = 365;
pub const DEFAULT_LOOKBACK_ROWS: usize = 90;
pub const DEFAULT_MIN_ROWS: usize = 14;
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub dataset: DatasetConfig,
    pub forecast: ForecastConfig,
    pub model: ModelConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_DATASET_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub horizon_days: usize,
    /// Upper bound on any requested horizon, including per-request overrides.
    pub max_horizon_days: usize,
    /// Most recent rows kept per product before cleaning.
    pub lookback_rows: usize,
    /// Below this many rows a low-data diagnostic is raised and the
    /// outlier-filtered set is rejected.
    pub min_rows: usize,
    pub iqr_multiplier: f64,
    pub policy: PolicyKind,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            max_horizon_days: DEFAULT_MAX_HORIZON_DAYS,
            lookback_rows: DEFAULT_LOOKBACK_ROWS,
            min_rows: DEFAULT_MIN_ROWS,
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
            policy: PolicyKind::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub weekly_seasonality: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            weekly_seasonality: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Named discount policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    /// Discount proportional to the forecast decline, clamped to 1-25%.
    #[default]
    Ratio,
    /// Fixed discount per product category.
    CategoryTable,
}

impl PolicyKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ratio => "ratio",
            Self::CategoryTable => "category-table",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "ratio" => Ok(Self::Ratio),
            "category-table" | "category" => Ok(Self::CategoryTable),
            other => Err(format!(
                "unknown policy '{other}', expected 'ratio' or 'category-table'"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pipeline_constants() {
        let config = AppConfig::default();
        assert_eq!(config.dataset.path, "sales_CA1_sample.csv");
        assert_eq!(config.forecast.horizon_days, 14);
        assert_eq!(config.forecast.max_horizon_days, 365);
        assert_eq!(config.forecast.lookback_rows, 90);
        assert_eq!(config.forecast.min_rows, 14);
        assert_eq!(config.forecast.policy, PolicyKind::Ratio);
        assert_eq!(config.server.addr(), "0.0.0.0:8080");
    }

    #[test]
    fn policy_kind_parses_loosely() {
        assert_eq!("ratio".parse::<PolicyKind>(), Ok(PolicyKind::Ratio));
        assert_eq!(
            "Category_Table".parse::<PolicyKind>(),
            Ok(PolicyKind::CategoryTable)
        );
        assert!("median".parse::<PolicyKind>().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"forecast": {"policy": "category-table"}}"#).unwrap();
        assert_eq!(config.forecast.policy, PolicyKind::CategoryTable);
        assert_eq!(config.forecast.horizon_days, 14);
        assert_eq!(config.dataset.path, DEFAULT_DATASET_PATH);
    }
}
