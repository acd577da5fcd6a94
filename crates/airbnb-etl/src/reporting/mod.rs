//! Report generation module.
//!
//! Persists the cleaned table and the JSON run report, and renders
//! human-readable summaries of quality metrics and cleaning runs.
//!
//! # Example
//!
//! ```rust,ignore
//! use airbnb_etl::reporting::{ReportGenerator, render_quality_summary};
//!
//! let generator = ReportGenerator::new("%d/%m/%Y");
//! generator.write_cleaned_csv(&mut cleaned, Path::new("Datasource/airbnb_clean.csv"))?;
//! println!("{}", render_quality_summary(&metrics));
//! ```

mod generator;
mod summary;

pub use generator::ReportGenerator;
pub use summary::{render_cleaning_summary, render_load_summary, render_quality_summary};
