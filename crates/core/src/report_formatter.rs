#![allow(clippy::format_push_string)]

use crate::diagnostics::Diagnostic;
use crate::outcome::{ForecastOutcome, ForecastResult};

pub struct ReportFormatter;

impl ReportFormatter {
    /// Renders an outcome and its diagnostics as terminal text.
    #[must_use]
    pub fn format(outcome: &ForecastOutcome, diagnostics: &[Diagnostic]) -> String {
        let mut output = match outcome {
            ForecastOutcome::Forecast(result) => Self::format_result(result),
            ForecastOutcome::Error(err) => format!("\n❌ {}\n", err.error),
        };

        for diagnostic in diagnostics {
            output.push_str(&format!("\n⚠️  {diagnostic}\n"));
        }

        output
    }

    #[must_use]
    pub fn format_result(result: &ForecastResult) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                    DEMAND FORECAST                            \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str(&format!("Product:               {}\n", result.product_id));
        output.push_str(&format!("Category:              {}\n", result.cat_id));
        output.push_str(&format!("Trend:                 {}\n", result.trend));
        output.push_str(&format!("Recommendation:        {}\n", result.recommendation));
        output.push_str(&format!(
            "Suggested Discount:    {}\n",
            result.suggested_discount
        ));
        output.push('\n');

        output.push_str(&format!("Next {} Days Forecast\n", result.forecast.len()));
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str("Date          Predicted Sales\n");
        for point in &result.forecast {
            output.push_str(&format!(
                "{}    {:>15.2}\n",
                point.date.format("%Y-%m-%d"),
                point.predicted_sales
            ));
        }

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::{ErrorResult, ForecastPoint, Recommendation, Trend};
    use chrono::NaiveDate;

    #[test]
    fn result_report_lists_every_forecast_day() {
        let result = ForecastResult {
            product_id: "HOUSEHOLD_1_004".to_string(),
            cat_id: "HOUSEHOLD".to_string(),
            forecast: (1..=3)
                .map(|d| ForecastPoint {
                    date: NaiveDate::from_ymd_opt(2016, 6, d).unwrap(),
                    predicted_sales: 2.5,
                })
                .collect(),
            trend: Trend::Decreasing,
            recommendation: Recommendation::ApplyDiscount,
            suggested_discount: "20%".to_string(),
        };
        let text = ReportFormatter::format_result(&result);
        assert!(text.contains("HOUSEHOLD_1_004"));
        assert!(text.contains("Next 3 Days Forecast"));
        assert!(text.contains("2016-06-03"));
        assert!(text.contains("Apply discount"));
        assert!(text.contains("20%"));
    }

    #[test]
    fn error_report_shows_message_and_warnings() {
        let outcome = ForecastOutcome::Error(ErrorResult {
            error: "Product ID 'X' not found.".to_string(),
            kind: None,
        });
        let diagnostics = vec![Diagnostic::LowData {
            product_id: "X".to_string(),
            rows: 3,
            minimum: 14,
        }];
        let text = ReportFormatter::format(&outcome, &diagnostics);
        assert!(text.contains("Product ID 'X' not found."));
        assert!(text.contains("Only 3 rows"));
    }
}
