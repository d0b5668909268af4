// CSV export of page tables
use crate::domain::error::{DashboardError, Result};

pub const DEFAULT_EXPORT_FILENAME: &str = "export.csv";
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Rows may have different lengths (header cells spanning columns)
pub fn rows_to_csv(rows: &[Vec<String>]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    for row in rows {
        writer
            .write_record(row)
            .map_err(|e| DashboardError::Export(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| DashboardError::Export(e.to_string()))
}
