//! End-to-end ETL run.
//!
//! Load the configured source, assess it, clean it, assess the result and
//! persist the cleaned table (and optionally the JSON report). Nothing is
//! written unless every earlier step succeeded.

use crate::cleaner::ListingCleaner;
use crate::config::EtlConfig;
use crate::error::{EtlError, Result, ResultExt};
use crate::loader::{DatasetContext, LoadOutcome};
use crate::quality::QualityAssessor;
use crate::reporting::ReportGenerator;
use crate::types::{CleaningReport, EtlReport, QualityMetrics};
use polars::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Runs the listings ETL for one configuration.
///
/// # Example
///
/// ```rust,ignore
/// use airbnb_etl::{EtlConfig, EtlPipeline};
///
/// let config = EtlConfig::builder()
///     .data_dir("Datasource")
///     .input_file("airbnb.xlsx")
///     .build()?;
/// let outcome = EtlPipeline::new(config).run()?;
/// println!("{} rows written to {}", outcome.cleaned.height(), outcome.output_path.display());
/// ```
#[derive(Debug, Clone)]
pub struct EtlPipeline {
    config: EtlConfig,
}

static_assertions::assert_impl_all!(EtlPipeline: Send, Sync);

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct EtlOutcome {
    pub cleaned: DataFrame,
    pub report: CleaningReport,
    pub metrics_before: QualityMetrics,
    pub metrics_after: QualityMetrics,
    pub source_path: PathBuf,
    pub output_path: PathBuf,
    pub report_path: Option<PathBuf>,
}

impl EtlOutcome {
    /// The serializable part of the outcome.
    pub fn to_etl_report(&self) -> EtlReport {
        EtlReport {
            source: self.source_path.display().to_string(),
            output: self.output_path.display().to_string(),
            cleaning: self.report.clone(),
            metrics_before: self.metrics_before.clone(),
            metrics_after: self.metrics_after.clone(),
        }
    }
}

/// Result of a directory-wide quality sweep.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryEvaluation {
    pub data_dir: PathBuf,
    /// One entry per candidate file, in file-name order.
    pub files: Vec<LoadOutcome>,
    /// One entry per loaded dataset, in dataset-name order.
    pub metrics: Vec<QualityMetrics>,
}

impl DirectoryEvaluation {
    pub fn loaded_count(&self) -> usize {
        self.files.iter().filter(|f| f.is_loaded()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &LoadOutcome> {
        self.files.iter().filter(|f| !f.is_loaded())
    }
}

impl EtlPipeline {
    pub fn new(config: EtlConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EtlConfig {
        &self.config
    }

    /// Run load, assess, clean, assess and write.
    ///
    /// A cleaning failure carries the source path and the failing stage.
    pub fn run(&self) -> Result<EtlOutcome> {
        self.config
            .validate()
            .map_err(|e| EtlError::InvalidConfig(e.to_string()))?;

        let source_path = self.config.input_path();
        info!("Starting ETL run for {}", source_path.display());

        let mut ctx = DatasetContext::new(&self.config.data_dir);
        let dataset = ctx.load_file(&self.config.input_file)?;
        let raw = ctx
            .take(&dataset)
            .ok_or_else(|| EtlError::SourceNotFound(source_path.display().to_string()))?;

        let metrics_before = QualityAssessor::assess(&raw, &dataset)?;

        let (mut cleaned, report) = ListingCleaner::from_config(&self.config)
            .clean(raw)
            .context(source_path.display().to_string())?;

        let metrics_after = QualityAssessor::assess(&cleaned, &format!("{}_clean", dataset))?;

        let generator = ReportGenerator::new(self.config.date_format.as_str());
        let output_path = generator.write_cleaned_csv(&mut cleaned, &self.config.output_path())?;

        let mut outcome = EtlOutcome {
            cleaned,
            report,
            metrics_before,
            metrics_after,
            source_path,
            output_path,
            report_path: None,
        };

        if let Some(path) = self.config.report_path() {
            outcome.report_path = Some(generator.write_json_report(&outcome.to_etl_report(), &path)?);
        }

        info!(
            "ETL run complete: quality {:.1}% -> {:.1}%",
            outcome.metrics_before.overall_quality_score,
            outcome.metrics_after.overall_quality_score
        );
        Ok(outcome)
    }

    /// Assess every dataset in the data directory, in file-name order.
    /// Files that fail to load are listed with their error and skipped.
    pub fn evaluate_directory(&self) -> Result<DirectoryEvaluation> {
        let mut ctx = DatasetContext::new(&self.config.data_dir);
        let files = ctx.load_directory()?;

        let metrics = ctx
            .datasets()
            .map(|(name, df)| QualityAssessor::assess(df, name))
            .collect::<Result<Vec<_>>>()?;

        Ok(DirectoryEvaluation {
            data_dir: self.config.data_dir.clone(),
            files,
            metrics,
        })
    }
}
