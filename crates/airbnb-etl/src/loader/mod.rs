//! Source loading.
//!
//! A [`DatasetContext`] owns the data directory and the datasets loaded from
//! it. CSV files go through polars' reader; `.xlsx` and `.xls` workbooks are
//! read from their first worksheet.

mod context;
mod csv;
mod spreadsheet;

pub use context::{DatasetContext, dataset_name};

use serde::Serialize;
use std::path::Path;

/// Source file formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Spreadsheet,
}

impl SourceFormat {
    /// Format of a file, judged by its extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" => Some(Self::Spreadsheet),
            _ => None,
        }
    }
}

/// Result of loading one file during a directory sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadOutcome {
    Loaded {
        file: String,
        dataset: String,
        rows: usize,
        columns: usize,
    },
    Failed {
        file: String,
        message: String,
    },
}

impl LoadOutcome {
    pub fn file(&self) -> &str {
        match self {
            Self::Loaded { file, .. } | Self::Failed { file, .. } => file,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_format_from_extension() {
        assert_eq!(SourceFormat::from_path(Path::new("a.csv")), Some(SourceFormat::Csv));
        assert_eq!(
            SourceFormat::from_path(Path::new("Datasource/airbnb.XLSX")),
            Some(SourceFormat::Spreadsheet)
        );
        assert_eq!(SourceFormat::from_path(Path::new("old.xls")), Some(SourceFormat::Spreadsheet));
        assert_eq!(SourceFormat::from_path(Path::new("data.parquet")), None);
        assert_eq!(SourceFormat::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_load_outcome_serializes_with_status() {
        let outcome = LoadOutcome::Failed {
            file: "bad.xlsx".to_string(),
            message: "boom".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["file"], "bad.xlsx");
    }
}
