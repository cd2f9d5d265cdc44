use demand_forecast_core::SalesRecord;
use std::fs::File;
use std::io;
use std::path::Path;
use csv::Writer;

pub struct CsvStorage;

impl CsvStorage {
    /// Writes sales records to a CSV file readable by [`crate::SalesDataset`].
    ///
    /// Format: item_id,date,sales,cat_id
    ///
    /// # Errors
    /// Returns error if file cannot be created or writing fails
    pub fn write_sales(path: impl AsRef<Path>, records: &[SalesRecord]) -> io::Result<()> {
        let file = File::create(path)?;
        let mut writer = Writer::from_writer(file);

        writer.write_record(["item_id", "date", "sales", "cat_id"])?;

        for record in records {
            let sales = if record.sales.is_nan() {
                String::new()
            } else {
                record.sales.to_string()
            };
            let date = record.date.format("%Y-%m-%d").to_string();
            writer.write_record([
                record.item_id.as_str(),
                date.as_str(),
                sales.as_str(),
                record.cat_id.as_str(),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }
}
