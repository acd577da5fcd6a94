use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Quality metrics
// ============================================================================

/// Data-quality summary of one table at one point in time.
///
/// Built fresh by [`crate::QualityAssessor::assess`] and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub dataset_name: String,
    pub total_rows: usize,
    pub total_columns: usize,
    pub missing_cells: usize,
    /// Fraction of null cells (0.0 - 1.0).
    pub missing_ratio: f64,
    /// Percentage of non-null cells (0 - 100).
    pub completeness_score: f64,
    /// Fully duplicated rows, first occurrences excluded.
    pub duplicate_rows: usize,
    /// Fraction of duplicated rows (0.0 - 1.0).
    pub duplicate_ratio: f64,
    /// Percentage of non-duplicated rows (0 - 100).
    pub uniqueness_score: f64,
    pub numeric_columns: usize,
    pub text_columns: usize,
    pub datetime_columns: usize,
    /// `0.6 * completeness + 0.4 * uniqueness`.
    pub overall_quality_score: f64,
    /// Columns with at least one null, most-missing first.
    #[serde(default)]
    pub missing_by_column: Vec<ColumnMissing>,
}

impl QualityMetrics {
    /// Quality band of the overall score.
    pub fn quality_level(&self) -> QualityLevel {
        QualityLevel::from_score(self.overall_quality_score)
    }
}

/// Banded overall quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QualityLevel {
    /// Below 60
    Poor,
    /// 60 up to 75
    Fair,
    /// 75 up to 90
    Good,
    /// 90 and above
    Excellent,
}

impl QualityLevel {
    /// Classify an overall quality score. Lower bounds are inclusive.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 90.0 => Self::Excellent,
            s if s >= 75.0 => Self::Good,
            s if s >= 60.0 => Self::Fair,
            _ => Self::Poor,
        }
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excellent => write!(f, "Excellent"),
            Self::Good => write!(f, "Good"),
            Self::Fair => write!(f, "Fair"),
            Self::Poor => write!(f, "Poor"),
        }
    }
}

/// Null count of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing: usize,
    /// Percentage of the column's rows that are null (0 - 100).
    pub percentage: f64,
}

// ============================================================================
// Cleaning report
// ============================================================================

/// Stages of the cleaning pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningStage {
    HeaderNormalization,
    Deduplication,
    DateNormalization,
    ColumnPruning,
    NumericCoercion,
    PriceImputation,
    RatingFilter,
    RecordCountFilter,
    RequiredFieldFilter,
    CategoricalTagging,
    ColumnReordering,
}

impl CleaningStage {
    /// All stages in execution order.
    pub const ALL: [CleaningStage; 11] = [
        Self::HeaderNormalization,
        Self::Deduplication,
        Self::DateNormalization,
        Self::ColumnPruning,
        Self::NumericCoercion,
        Self::PriceImputation,
        Self::RatingFilter,
        Self::RecordCountFilter,
        Self::RequiredFieldFilter,
        Self::CategoricalTagging,
        Self::ColumnReordering,
    ];

    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::HeaderNormalization => "Header normalization",
            Self::Deduplication => "De-duplication",
            Self::DateNormalization => "Date normalization",
            Self::ColumnPruning => "Column pruning",
            Self::NumericCoercion => "Numeric coercion",
            Self::PriceImputation => "Price imputation",
            Self::RatingFilter => "Rating-range filter",
            Self::RecordCountFilter => "Record-count filter",
            Self::RequiredFieldFilter => "Required-field filter",
            Self::CategoricalTagging => "Categorical tagging",
            Self::ColumnReordering => "Column reordering",
        }
    }
}

/// What one stage did to the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageOutcome {
    pub stage: CleaningStage,
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns_before: usize,
    pub columns_after: usize,
    pub details: Vec<String>,
}

impl StageOutcome {
    pub fn rows_removed(&self) -> usize {
        self.rows_before.saturating_sub(self.rows_after)
    }
}

/// Diagnostic output of one cleaning run. Not a correctness gate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns_before: usize,
    pub columns_after: usize,
    /// Null cells left in the cleaned table.
    pub remaining_nulls: usize,
    pub stages: Vec<StageOutcome>,
}

impl CleaningReport {
    pub fn rows_removed(&self) -> usize {
        self.rows_before.saturating_sub(self.rows_after)
    }

    /// Percentage of input rows dropped.
    pub fn rows_removed_percentage(&self) -> f64 {
        if self.rows_before == 0 {
            0.0
        } else {
            (self.rows_removed() as f64 / self.rows_before as f64) * 100.0
        }
    }

    /// Outcome of a given stage, if it ran.
    pub fn stage(&self, stage: CleaningStage) -> Option<&StageOutcome> {
        self.stages.iter().find(|s| s.stage == stage)
    }
}

/// Everything one ETL run produced, as persisted to the JSON report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtlReport {
    pub source: String,
    pub output: String,
    pub cleaning: CleaningReport,
    pub metrics_before: QualityMetrics,
    pub metrics_after: QualityMetrics,
}
