use crate::error::{EtlError, Result};
use crate::types::EtlReport;
use polars::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes the cleaned table and the run report.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    date_format: String,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_DATE_FORMAT)
    }
}

impl ReportGenerator {
    /// Create a generator that writes dates with `date_format`.
    pub fn new(date_format: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
        }
    }

    /// Write `df` as comma-delimited CSV with a header row.
    ///
    /// Dates are written in the configured format so the file loads back
    /// through the same cleaning stages.
    pub fn write_cleaned_csv(&self, df: &mut DataFrame, path: &Path) -> Result<PathBuf> {
        ensure_parent_dir(path)?;
        let mut file = File::create(path)
            .map_err(|e| EtlError::Io(e).with_context(path.display().to_string()))?;

        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .with_date_format(Some(self.date_format.clone()))
            .finish(df)?;

        info!("Cleaned dataset saved: {} ({} rows)", path.display(), df.height());
        Ok(path.to_path_buf())
    }

    /// Write the run report as pretty-printed JSON.
    pub fn write_json_report(&self, report: &EtlReport, path: &Path) -> Result<PathBuf> {
        ensure_parent_dir(path)?;
        let mut file = File::create(path)
            .map_err(|e| EtlError::Io(e).with_context(path.display().to_string()))?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", path.display());
        Ok(path.to_path_buf())
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::QualityAssessor;
    use crate::types::CleaningReport;

    fn dated_frame() -> DataFrame {
        let dates = Series::new("Host Since".into(), &[Some(13953i32), None])
            .cast(&DataType::Date)
            .unwrap();
        let mut df = df![
            "Host Id" => [1i64, 2],
            "Neighbourhood" => ["Chelsea", "Soho, North"],
        ]
        .unwrap();
        df.with_column(dates).unwrap();
        df
    }

    #[test]
    fn test_write_cleaned_csv_uses_date_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("clean.csv");
        let mut df = dated_frame();

        ReportGenerator::default()
            .write_cleaned_csv(&mut df, &path)
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Host Id,Neighbourhood,Host Since");
        // 13953 days after the epoch is 15 March 2008.
        assert_eq!(lines[1], "1,Chelsea,15/03/2008");
        assert_eq!(lines[2], "2,\"Soho, North\",");
    }

    #[test]
    fn test_write_json_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let metrics = QualityAssessor::assess(&dated_frame(), "listings").unwrap();
        let report = EtlReport {
            source: "listings.csv".to_string(),
            output: "listings_clean.csv".to_string(),
            cleaning: CleaningReport::default(),
            metrics_before: metrics.clone(),
            metrics_after: metrics,
        };

        ReportGenerator::default()
            .write_json_report(&report, &path)
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["source"], "listings.csv");
        assert_eq!(value["metrics_before"]["total_rows"], 2);
    }
}
