use crate::error::Result;
use crate::types::{ColumnMissing, QualityLevel, QualityMetrics};
use crate::utils::{DtypeCategory, get_dtype_category, total_null_count};
use polars::prelude::*;
use tracing::debug;

/// Weight of completeness in the overall score.
pub const COMPLETENESS_WEIGHT: f64 = 0.6;
/// Weight of uniqueness in the overall score.
pub const UNIQUENESS_WEIGHT: f64 = 0.4;

/// Computes data-quality metrics for arbitrary tables.
pub struct QualityAssessor;

impl QualityAssessor {
    /// Assess a table.
    ///
    /// A table with no rows or no columns has nothing to score: every ratio
    /// and every score is zero.
    pub fn assess(df: &DataFrame, name: &str) -> Result<QualityMetrics> {
        let total_rows = df.height();
        let total_columns = df.width();
        let total_cells = total_rows * total_columns;

        let (numeric_columns, text_columns, datetime_columns) = Self::tally_column_types(df);

        if total_cells == 0 {
            debug!("'{}' is empty ({} x {}), scoring as zero", name, total_rows, total_columns);
            return Ok(QualityMetrics {
                dataset_name: name.to_string(),
                total_rows,
                total_columns,
                missing_cells: 0,
                missing_ratio: 0.0,
                completeness_score: 0.0,
                duplicate_rows: 0,
                duplicate_ratio: 0.0,
                uniqueness_score: 0.0,
                numeric_columns,
                text_columns,
                datetime_columns,
                overall_quality_score: 0.0,
                missing_by_column: Vec::new(),
            });
        }

        let missing_cells = total_null_count(df);
        let missing_ratio = missing_cells as f64 / total_cells as f64;
        let completeness_score = (1.0 - missing_ratio) * 100.0;

        let duplicate_rows = Self::count_duplicate_rows(df)?;
        let duplicate_ratio = duplicate_rows as f64 / total_rows as f64;
        let uniqueness_score = (1.0 - duplicate_ratio) * 100.0;

        let overall_quality_score =
            completeness_score * COMPLETENESS_WEIGHT + uniqueness_score * UNIQUENESS_WEIGHT;

        debug!(
            "'{}': completeness {:.1}%, uniqueness {:.1}%, overall {:.1}%",
            name, completeness_score, uniqueness_score, overall_quality_score
        );

        Ok(QualityMetrics {
            dataset_name: name.to_string(),
            total_rows,
            total_columns,
            missing_cells,
            missing_ratio,
            completeness_score,
            duplicate_rows,
            duplicate_ratio,
            uniqueness_score,
            numeric_columns,
            text_columns,
            datetime_columns,
            overall_quality_score,
            missing_by_column: Self::missing_by_column(df),
        })
    }

    /// Band an overall quality score.
    pub fn classify(score: f64) -> QualityLevel {
        QualityLevel::from_score(score)
    }

    /// Columns with at least one null, most-missing first.
    pub fn missing_by_column(df: &DataFrame) -> Vec<ColumnMissing> {
        let height = df.height();
        let mut missing: Vec<ColumnMissing> = df
            .get_columns()
            .iter()
            .filter(|col| col.null_count() > 0)
            .map(|col| ColumnMissing {
                column: col.name().to_string(),
                missing: col.null_count(),
                percentage: (col.null_count() as f64 / height as f64) * 100.0,
            })
            .collect();

        missing.sort_by(|a, b| b.missing.cmp(&a.missing));
        missing
    }

    /// Fully duplicated rows, not counting the first occurrence of each set.
    fn count_duplicate_rows(df: &DataFrame) -> Result<usize> {
        let unique = df.unique::<&str, &str>(None, UniqueKeepStrategy::First, None)?;
        Ok(df.height().saturating_sub(unique.height()))
    }

    fn tally_column_types(df: &DataFrame) -> (usize, usize, usize) {
        let mut numeric = 0;
        let mut text = 0;
        let mut datetime = 0;

        for col in df.get_columns() {
            match get_dtype_category(col.dtype()) {
                DtypeCategory::Numeric => numeric += 1,
                DtypeCategory::Text => text += 1,
                DtypeCategory::Datetime => datetime += 1,
                DtypeCategory::Boolean | DtypeCategory::Other => {}
            }
        }

        (numeric, text, datetime)
    }
}
