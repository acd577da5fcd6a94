//! Airbnb Listings ETL Library
//!
//! Cleans a raw Airbnb listings table into a fixed canonical schema and
//! scores the data quality of any table before and after.
//!
//! # Overview
//!
//! - **Quality Assessment**: completeness, uniqueness and a weighted overall
//!   score, banded into a quality level
//! - **Cleaning Pipeline**: header normalization, de-duplication, strict date
//!   parsing, numeric coercion, two-level grouped median price imputation,
//!   range filters and categorical tagging
//! - **Loading**: CSV and first-sheet spreadsheet sources through an explicit
//!   [`DatasetContext`]
//! - **Reporting**: cleaned CSV output, JSON run reports and text summaries
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use airbnb_etl::{EtlConfig, EtlPipeline, render_quality_summary};
//!
//! let config = EtlConfig::builder()
//!     .data_dir("Datasource")
//!     .input_file("airbnb.xlsx")
//!     .output_file("airbnb_clean.csv")
//!     .build()?;
//!
//! let outcome = EtlPipeline::new(config).run()?;
//! println!("{}", render_quality_summary(&outcome.metrics_before));
//! println!("{}", render_quality_summary(&outcome.metrics_after));
//! ```
//!
//! The core stages can also be used on an in-memory table:
//!
//! ```rust,ignore
//! use airbnb_etl::{ListingCleaner, QualityAssessor};
//!
//! let (cleaned, report) = ListingCleaner::default().clean(raw)?;
//! let metrics = QualityAssessor::assess(&cleaned, "airbnb_clean")?;
//! println!("{} rows kept, level {}", report.rows_after, metrics.quality_level());
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod loader;
pub mod pipeline;
pub mod quality;
pub mod reporting;
pub mod schema;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::ListingCleaner;
pub use config::{ConfigValidationError, EtlConfig, EtlConfigBuilder};
pub use error::{EtlError, Result as EtlResult, ResultExt};
pub use imputers::{GroupedMedianImputer, ImputationOutcome};
pub use loader::{DatasetContext, LoadOutcome, SourceFormat};
pub use pipeline::{DirectoryEvaluation, EtlOutcome, EtlPipeline};
pub use quality::QualityAssessor;
pub use reporting::{
    ReportGenerator, render_cleaning_summary, render_load_summary, render_quality_summary,
};
pub use types::{
    CleaningReport, CleaningStage, ColumnMissing, EtlReport, QualityLevel, QualityMetrics,
    StageOutcome,
};
pub use utils::{
    DtypeCategory, clean_numeric_string, get_dtype_category, is_error_marker, is_numeric_dtype,
    parse_numeric_string,
};
