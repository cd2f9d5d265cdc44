pub mod config;
pub mod config_loader;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod outcome;
pub mod report_formatter;
pub mod series;
pub mod stats;
pub mod traits;

pub use config::{
    AppConfig, DatasetConfig, ForecastConfig, ModelConfig, PolicyKind, ServerConfig,
    DEFAULT_DATASET_PATH, DEFAULT_HORIZON_DAYS, DEFAULT_MAX_HORIZON_DAYS,
};
pub use config_loader::ConfigLoader;
pub use diagnostics::{Diagnostic, Diagnostics};
pub use engine::{forecast_and_decide, ForecastEngine, ForecastRun};
pub use error::{ErrorKind, ForecastError};
pub use outcome::{
    Decision, ErrorResult, ForecastOutcome, ForecastPoint, ForecastResult, Recommendation, Trend,
};
pub use report_formatter::ReportFormatter;
pub use series::{CleaningStats, ProductSeries, SalesRecord, SeriesPoint};
pub use traits::{DiscountPolicy, FittedModel, ForecastModel, SeriesPreparer};
