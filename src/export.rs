use crate::{QueryResult, Result};
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use tracing::info;

/// Column names of the CSV report, in order.
pub const CSV_HEADER: [&str; 6] = [
    "query",
    "timestamp",
    "company_mentioned",
    "products_mentioned",
    "url_mentioned",
    "full_response",
];

/// The report file name for `date`, e.g. `llmo_monitoring_20240501.csv`.
pub fn report_file_name(date: NaiveDate) -> String {
    format!("llmo_monitoring_{}.csv", date.format("%Y%m%d"))
}

/// The CSV fields of one result, in `CSV_HEADER` order.
fn record(result: &QueryResult) -> [String; 6] {
    [
        result.query.clone(),
        result.timestamp_rfc3339(),
        result.company_mentioned.to_string(),
        result.products_display(),
        result.url_mentioned.to_string(),
        result.full_response.clone(),
    ]
}

/// Writes `results` to `path` as CSV, replacing any existing file.
///
/// # Returns
///
/// A `Result` that is an error if the file cannot be created or a row cannot be written.
pub fn write_csv(results: &[QueryResult], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(CSV_HEADER)?;
    for result in results {
        writer.write_record(record(result))?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes today's report into `dir` and prints where it went.
///
/// # Arguments
///
/// * `results` - The recorded query results.
/// * `dir` - The output directory.
///
/// # Returns
///
/// The path of the written file.
pub fn export_results(results: &[QueryResult], dir: &Path) -> Result<PathBuf> {
    let path = dir.join(report_file_name(Local::now().date_naive()));

    write_csv(results, &path)?;

    info!(rows = results.len(), "Wrote {}", path.display());
    println!("Results saved to {}", path.display());
    Ok(path)
}
