//! Loading and validating the tabular sales dataset.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use demand_forecast_core::{ForecastError, SalesRecord};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::path::Path;

/// Columns every forecasting dataset must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = ["item_id", "date", "sales", "cat_id"];

/// A dataset row as it appears on disk, before date parsing.
#[derive(Debug, Clone, Deserialize)]
struct RawSalesRow {
    item_id: String,
    date: String,
    /// Empty cells load as missing and are later dropped with the non-positive rows.
    #[serde(deserialize_with = "deserialize_sales")]
    sales: Option<f64>,
    cat_id: String,
}

/// Cell values treated as a missing sales figure.
const MISSING_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn deserialize_sales<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(cell) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let cell = cell.trim();
    if cell.is_empty() || MISSING_MARKERS.contains(&cell) {
        return Ok(None);
    }
    cell.parse::<f64>()
        .map(Some)
        .map_err(|_| de::Error::custom(format!("invalid sales value '{cell}'")))
}

#[derive(Debug, Clone)]
struct SalesRow {
    line: u64,
    raw: RawSalesRow,
}

/// The rows of one dataset file, with their source line numbers.
#[derive(Debug, Clone)]
pub struct SalesDataset {
    rows: Vec<SalesRow>,
}

impl SalesDataset {
    /// Reads the dataset at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::DatasetNotFound`] if the file is missing or
    /// unreadable, [`ForecastError::MissingColumn`] if a required column is
    /// absent, and [`ForecastError::InvalidRecord`] if a row does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ForecastError> {
        let rows = read_rows::<RawSalesRow>(path.as_ref(), &REQUIRED_COLUMNS)?
            .into_iter()
            .map(|(line, raw)| SalesRow { line, raw })
            .collect::<Vec<_>>();

        tracing::debug!(path = %path.as_ref().display(), rows = rows.len(), "Dataset loaded");
        Ok(Self { rows })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows for `product_id` in file order, with parsed dates.
    ///
    /// Only the matching rows have their dates parsed.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::InvalidRecord`] if a matching row carries an
    /// unparseable date.
    pub fn records_for(&self, product_id: &str) -> Result<Vec<SalesRecord>, ForecastError> {
        self.rows
            .iter()
            .filter(|row| row.raw.item_id == product_id)
            .map(SalesRow::to_record)
            .collect()
    }

    /// Every row with parsed dates, in file order.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::InvalidRecord`] on the first unparseable date.
    pub fn records(&self) -> Result<Vec<SalesRecord>, ForecastError> {
        self.rows.iter().map(SalesRow::to_record).collect()
    }
}

impl SalesRow {
    fn to_record(&self) -> Result<SalesRecord, ForecastError> {
        let date = parse_date(&self.raw.date).ok_or_else(|| ForecastError::InvalidRecord {
            line: self.line,
            reason: format!("unrecognised date '{}'", self.raw.date),
        })?;

        Ok(SalesRecord {
            item_id: self.raw.item_id.clone(),
            date,
            sales: self.raw.sales.unwrap_or(f64::NAN),
            cat_id: self.raw.cat_id.clone(),
        })
    }
}

/// Parses the date formats commonly found in sales exports.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Opens `path`, checks that `required` columns exist, and deserializes every row.
///
/// Returns `(line, row)` pairs.
pub(crate) fn read_rows<T: DeserializeOwned>(
    path: &Path,
    required: &[&str],
) -> Result<Vec<(u64, T)>, ForecastError> {
    let not_found = || ForecastError::DatasetNotFound {
        path: path.display().to_string(),
    };

    if !path.is_file() {
        return Err(not_found());
    }
    let file = File::open(path).map_err(|_| not_found())?;
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| ForecastError::InvalidRecord {
            line: 1,
            reason: e.to_string(),
        })?
        .clone();

    if let Some(missing) = required
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(ForecastError::MissingColumn {
            column: (*missing).to_string(),
        });
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let fallback_line = idx as u64 + 2;
        let invalid = |e: csv::Error| ForecastError::InvalidRecord {
            line: e.position().map_or(fallback_line, csv::Position::line),
            reason: e.to_string(),
        };
        let record = result.map_err(invalid)?;
        let line = record.position().map_or(fallback_line, csv::Position::line);
        let row = record.deserialize::<T>(Some(&headers)).map_err(invalid)?;
        rows.push((line, row));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    // ============================================
    // load Tests
    // ============================================

    #[test]
    fn missing_file_is_not_found() {
        let err = SalesDataset::load("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, ForecastError::DatasetNotFound { .. }));
        assert!(err.to_string().contains("does/not/exist.csv"));
    }

    #[test]
    fn directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = SalesDataset::load(dir.path()).unwrap_err();
        assert!(matches!(err, ForecastError::DatasetNotFound { .. }));
    }

    #[test]
    fn missing_cat_id_column_is_named() {
        let file = write_csv("item_id,date,sales\nA,2016-01-01,3\n");
        let err = SalesDataset::load(file.path()).unwrap_err();
        assert_eq!(
            err,
            ForecastError::MissingColumn {
                column: "cat_id".to_string()
            }
        );
    }

    #[test]
    fn extra_columns_and_order_are_ignored() {
        let file = write_csv(
            "store_id,cat_id,sales,date,item_id\nCA_1,FOODS,3,2016-01-01,FOODS_1_001\n",
        );
        let dataset = SalesDataset::load(file.path()).unwrap();
        let records = dataset.records_for("FOODS_1_001").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].cat_id, "FOODS");
        assert!((records[0].sales - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_sales_cell_loads_as_nan() {
        let file = write_csv("item_id,date,sales,cat_id\nA,2016-01-01,,FOODS\n");
        let dataset = SalesDataset::load(file.path()).unwrap();
        let records = dataset.records().unwrap();
        assert!(records[0].sales.is_nan());
    }

    #[test]
    fn missing_value_markers_load_as_nan() {
        let file = write_csv(
            "item_id,date,sales,cat_id\n\
             A,2016-01-01,NA,FOODS\n\
             A,2016-01-02,N/A,FOODS\n\
             A,2016-01-03,null,FOODS\n\
             A,2016-01-04,4,FOODS\n",
        );
        let records = SalesDataset::load(file.path()).unwrap().records().unwrap();
        assert_eq!(records.len(), 4);
        assert!(records[..3].iter().all(|r| r.sales.is_nan()));
        assert!((records[3].sales - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn non_numeric_sales_is_invalid_record() {
        let file = write_csv(
            "item_id,date,sales,cat_id\nA,2016-01-01,3,FOODS\nA,2016-01-02,lots,FOODS\n",
        );
        let err = SalesDataset::load(file.path()).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidRecord { .. }), "{err:?}");
    }

    #[test]
    fn bad_date_only_fails_for_requested_product() {
        let file = write_csv(
            "item_id,date,sales,cat_id\nA,2016-01-01,1,FOODS\nB,yesterday,1,HOBBIES\n",
        );
        let dataset = SalesDataset::load(file.path()).unwrap();
        assert_eq!(dataset.records_for("A").unwrap().len(), 1);
        let err = dataset.records_for("B").unwrap_err();
        assert_eq!(
            err,
            ForecastError::InvalidRecord {
                line: 3,
                reason: "unrecognised date 'yesterday'".to_string()
            }
        );
    }

    // ============================================
    // parse_date Tests
    // ============================================

    #[test]
    fn parse_date_accepts_common_formats() {
        let expected = NaiveDate::from_ymd_opt(2016, 4, 24);
        assert_eq!(parse_date("2016-04-24"), expected);
        assert_eq!(parse_date("2016/04/24"), expected);
        assert_eq!(parse_date("04/24/2016"), expected);
        assert_eq!(parse_date("2016-04-24 00:00:00"), expected);
        assert_eq!(parse_date("2016-04-24T10:30:00Z"), expected);
        assert_eq!(parse_date("not a date"), None);
    }
}
