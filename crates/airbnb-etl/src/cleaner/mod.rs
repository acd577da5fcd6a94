//! Data cleaning module for the listings table.
//!
//! [`ListingCleaner::clean`] runs a fixed sequence of stages, each feeding the
//! next:
//! 1. Header normalization (and the required-column check)
//! 2. De-duplication on (host id, host-since)
//! 3. Strict date normalization
//! 4. Auxiliary column pruning
//! 5. Numeric coercion (zipcodes stay text)
//! 6. Two-level price imputation
//! 7. Rating-range filter
//! 8. Record-count filter
//! 9. Required-field filter
//! 10. Categorical tagging
//! 11. Canonical column projection
//!
//! Only stage 1 (missing columns) and stage 3 (malformed date) can fail on
//! data. Every other condition is coerced to null and filtered.

mod converters;
mod filters;

use crate::config::EtlConfig;
use crate::error::{EtlError, Result, ResultExt};
use crate::imputers::GroupedMedianImputer;
use crate::schema::{
    AUXILIARY_COLUMNS, CANONICAL_COLUMNS, CATEGORICAL_COLUMNS, HOST_ID, HOST_SINCE,
    NUMBER_OF_RECORDS, NUMERIC_COLUMNS, PRICE, PRICE_FALLBACK_GROUPS, REQUIRED_COLUMNS,
    REVIEW_SCORES_RATING, TEXT_COLUMNS,
};
use crate::types::{CleaningReport, CleaningStage, StageOutcome};
use crate::utils::total_null_count;
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Temporary column holding the normalized host-since date during
/// de-duplication.
const HOST_SINCE_KEY: &str = "__host_since_key";

/// Cleans a raw listings table into the canonical schema.
#[derive(Debug, Clone)]
pub struct ListingCleaner {
    date_format: String,
    rating_min: f64,
    rating_max: f64,
    min_record_count: f64,
}

impl Default for ListingCleaner {
    fn default() -> Self {
        Self::from_config(&EtlConfig::default())
    }
}

impl ListingCleaner {
    /// Take the cleaning policies from a run configuration.
    pub fn from_config(config: &EtlConfig) -> Self {
        Self {
            date_format: config.date_format.clone(),
            rating_min: config.rating_min,
            rating_max: config.rating_max,
            min_record_count: config.min_record_count,
        }
    }

    /// Run every cleaning stage in order.
    ///
    /// Errors carry the name of the stage that raised them.
    pub fn clean(&self, df: DataFrame) -> Result<(DataFrame, CleaningReport)> {
        let mut report = CleaningReport {
            rows_before: df.height(),
            columns_before: df.width(),
            ..Default::default()
        };

        info!(
            "Cleaning listings table ({} rows x {} columns)...",
            df.height(),
            df.width()
        );

        let df = Self::run_stage(
            &mut report,
            CleaningStage::HeaderNormalization,
            df,
            Self::normalize_headers,
        )?;
        let df = Self::run_stage(&mut report, CleaningStage::Deduplication, df, |df| {
            self.deduplicate(df)
        })?;
        let df = Self::run_stage(&mut report, CleaningStage::DateNormalization, df, |df| {
            self.normalize_dates(df)
        })?;
        let df = Self::run_stage(
            &mut report,
            CleaningStage::ColumnPruning,
            df,
            Self::prune_auxiliary,
        )?;
        let df = Self::run_stage(
            &mut report,
            CleaningStage::NumericCoercion,
            df,
            Self::coerce_numeric,
        )?;
        let df = Self::run_stage(
            &mut report,
            CleaningStage::PriceImputation,
            df,
            Self::impute_price,
        )?;
        let df = Self::run_stage(&mut report, CleaningStage::RatingFilter, df, |df| {
            let df =
                filters::keep_in_range(df, REVIEW_SCORES_RATING, self.rating_min, self.rating_max)?;
            let detail = format!(
                "Kept ratings in [{}, {}]",
                self.rating_min, self.rating_max
            );
            Ok((df, vec![detail]))
        })?;
        let df = Self::run_stage(&mut report, CleaningStage::RecordCountFilter, df, |df| {
            let df = filters::keep_at_least(df, NUMBER_OF_RECORDS, self.min_record_count)?;
            Ok((df, vec![format!("Kept record counts >= {}", self.min_record_count)]))
        })?;
        let df = Self::run_stage(&mut report, CleaningStage::RequiredFieldFilter, df, |df| {
            let df = filters::drop_null_rows(df, &REQUIRED_COLUMNS)?;
            Ok((df, vec![format!("Required non-null: {:?}", REQUIRED_COLUMNS)]))
        })?;
        let df = Self::run_stage(&mut report, CleaningStage::CategoricalTagging, df, |mut df| {
            let tagged = filters::tag_categorical(&mut df, &CATEGORICAL_COLUMNS)?;
            let details = if tagged.is_empty() {
                vec!["All label columns already categorical".to_string()]
            } else {
                vec![format!("Tagged as categorical: {:?}", tagged)]
            };
            Ok((df, details))
        })?;
        let df = Self::run_stage(&mut report, CleaningStage::ColumnReordering, df, |df| {
            let dropped: Vec<String> = df
                .get_column_names()
                .into_iter()
                .filter(|name| !CANONICAL_COLUMNS.contains(&name.as_str()))
                .map(|name| name.to_string())
                .collect();
            let df = df.select(CANONICAL_COLUMNS)?;
            let details = if dropped.is_empty() {
                Vec::new()
            } else {
                vec![format!("Dropped non-canonical columns: {:?}", dropped)]
            };
            Ok((df, details))
        })?;

        report.rows_after = df.height();
        report.columns_after = df.width();
        report.remaining_nulls = total_null_count(&df);

        info!(
            "Cleaning complete: {} -> {} rows ({:.1}% removed), {} null cells remaining",
            report.rows_before,
            report.rows_after,
            report.rows_removed_percentage(),
            report.remaining_nulls
        );

        Ok((df, report))
    }

    fn run_stage<F>(
        report: &mut CleaningReport,
        stage: CleaningStage,
        df: DataFrame,
        apply: F,
    ) -> Result<DataFrame>
    where
        F: FnOnce(DataFrame) -> Result<(DataFrame, Vec<String>)>,
    {
        let rows_before = df.height();
        let columns_before = df.width();

        let (df, details) =
            apply(df).context(format!("stage '{}'", stage.display_name()))?;

        info!(
            "{}: {} -> {} rows",
            stage.display_name(),
            rows_before,
            df.height()
        );
        for detail in &details {
            debug!("  {}", detail);
        }

        report.stages.push(StageOutcome {
            stage,
            rows_before,
            rows_after: df.height(),
            columns_before,
            columns_after: df.width(),
            details,
        });
        Ok(df)
    }

    fn normalize_headers(mut df: DataFrame) -> Result<(DataFrame, Vec<String>)> {
        let original: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        let trimmed: Vec<String> = original.iter().map(|name| name.trim().to_string()).collect();

        let mut details = Vec::new();
        let renamed = original.iter().zip(&trimmed).filter(|(a, b)| a != b).count();
        if renamed > 0 {
            df.set_column_names(trimmed.iter().map(String::as_str))?;
            details.push(format!("Trimmed whitespace from {} column names", renamed));
        }

        let missing: Vec<String> = CANONICAL_COLUMNS
            .iter()
            .filter(|col| !trimmed.iter().any(|name| name.as_str() == **col))
            .map(|col| col.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(EtlError::MissingColumns(missing));
        }

        Ok((df, details))
    }

    /// Keys on the parsed calendar date, so spellings of one day collapse.
    /// Unparseable dates are left for the date stage to reject.
    fn deduplicate(&self, mut df: DataFrame) -> Result<(DataFrame, Vec<String>)> {
        let before = df.height();
        let keys = converters::date_keys(
            df.column(HOST_SINCE)?.as_materialized_series(),
            &self.date_format,
        )?
        .with_name(HOST_SINCE_KEY.into());
        df.with_column(keys)?;

        let df = filters::drop_duplicate_keys(df, &[HOST_ID, HOST_SINCE_KEY])?.drop(HOST_SINCE_KEY)?;
        let removed = before - df.height();
        Ok((df, vec![format!("Removed {} duplicate (host, host-since) rows", removed)]))
    }

    fn normalize_dates(&self, mut df: DataFrame) -> Result<(DataFrame, Vec<String>)> {
        let (dates, parsed) = converters::to_date_series(
            df.column(HOST_SINCE)?.as_materialized_series(),
            &self.date_format,
        )?;
        df.replace(HOST_SINCE, dates)?;
        Ok((
            df,
            vec![format!("Parsed {} '{}' values with '{}'", parsed, HOST_SINCE, self.date_format)],
        ))
    }

    fn prune_auxiliary(mut df: DataFrame) -> Result<(DataFrame, Vec<String>)> {
        let mut details = Vec::new();
        for col in AUXILIARY_COLUMNS {
            if df.get_column_index(col).is_some() {
                df = df.drop(col)?;
                details.push(format!("Dropped '{}'", col));
            }
        }
        Ok((df, details))
    }

    fn coerce_numeric(mut df: DataFrame) -> Result<(DataFrame, Vec<String>)> {
        let mut details = Vec::new();
        for col in NUMERIC_COLUMNS {
            let series = df.column(col)?.as_materialized_series();
            let nulls_before = series.null_count();
            let coerced = converters::to_float_series(series)?;
            let invalid = coerced.null_count().saturating_sub(nulls_before);
            df.replace(col, coerced)?;

            if invalid > 0 {
                details.push(format!("'{}': {} unparseable values set to null", col, invalid));
            }
        }

        for col in TEXT_COLUMNS {
            let series = df.column(col)?.as_materialized_series();
            if series.dtype() != &DataType::String {
                let text = series.cast(&DataType::String)?;
                df.replace(col, text)?;
                details.push(format!("'{}' stored as text", col));
            }
        }
        Ok((df, details))
    }

    fn impute_price(mut df: DataFrame) -> Result<(DataFrame, Vec<String>)> {
        let imputer = GroupedMedianImputer::new(PRICE, PRICE_FALLBACK_GROUPS);
        let outcome = imputer.impute(&mut df)?;

        let mut details: Vec<String> = outcome
            .filled
            .iter()
            .map(|(group, filled)| format!("Filled {} prices from '{}' medians", filled, group))
            .collect();

        if outcome.unresolved > 0 {
            warn!(
                "{} listings have no price and no usable group median; dropping them",
                outcome.unresolved
            );
            df = filters::drop_null_rows(df, &[PRICE])?;
            details.push(format!("Dropped {} rows with unresolved price", outcome.unresolved));
        }

        Ok((df, details))
    }
}
