//! Sales data access for the demand forecasting pipeline.
//!
//! This crate provides:
//! - CSV dataset loading with required-column validation
//! - The series preparer (windowing, positive filter, IQR cleaning)
//! - The option lister feeding category/product selectors

pub mod csv_storage;
pub mod dataset;
pub mod options;
pub mod preparer;

pub use csv_storage::CsvStorage;
pub use dataset::{parse_date, SalesDataset, REQUIRED_COLUMNS};
pub use options::{categories, list_options, products_in_category, ProductOption};
pub use preparer::{prepare, prepare_records, CsvSeriesPreparer, PrepareSettings};
