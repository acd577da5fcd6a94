//! Configuration types for the listings ETL run.
//!
//! The run is parameterized by path conventions (data directory, input and
//! output file names) and a handful of cleaning policies. Everything has a
//! default matching the conventional `Datasource/` layout.

use crate::error::{EtlError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Day-month-year, the format hosts' registration dates arrive in.
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Configuration for one ETL run.
///
/// Use [`EtlConfig::builder()`] to create a configuration with a fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use airbnb_etl::config::EtlConfig;
///
/// let config = EtlConfig::builder()
///     .data_dir("Datasource")
///     .input_file("airbnb.csv")
///     .rating_range(1.0, 100.0)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtlConfig {
    /// Directory holding the source datasets and receiving the output.
    /// Default: "Datasource"
    pub data_dir: PathBuf,

    /// Raw listings file, relative to `data_dir`.
    /// Default: "airbnb.xlsx"
    pub input_file: String,

    /// Cleaned CSV file, relative to `data_dir`.
    /// Default: "airbnb_clean.csv"
    pub output_file: String,

    /// Optional JSON report file, relative to `data_dir`.
    /// Default: None
    pub report_file: Option<String>,

    /// chrono format of the host-registration date.
    /// Default: "%d/%m/%Y"
    pub date_format: String,

    /// Lowest accepted review score rating (inclusive).
    /// Default: 1.0
    pub rating_min: f64,

    /// Highest accepted review score rating (inclusive).
    /// Default: 100.0
    pub rating_max: f64,

    /// Lowest accepted record count (inclusive).
    /// Default: 1.0
    pub min_record_count: f64,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("Datasource"),
            input_file: "airbnb.xlsx".to_string(),
            output_file: "airbnb_clean.csv".to_string(),
            report_file: None,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            rating_min: 1.0,
            rating_max: 100.0,
            min_record_count: 1.0,
        }
    }
}

impl EtlConfig {
    /// Create a new configuration builder.
    pub fn builder() -> EtlConfigBuilder {
        EtlConfigBuilder::default()
    }

    /// Load a configuration from a JSON file. Missing fields are an error;
    /// the file is validated like a built configuration.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| EtlError::Io(e).with_context(path.display().to_string()))?;
        let config: EtlConfig = serde_json::from_str(&content)?;
        config
            .validate()
            .map_err(|e| EtlError::InvalidConfig(e.to_string()))?;
        Ok(config)
    }

    /// Full path of the raw input file.
    pub fn input_path(&self) -> PathBuf {
        self.data_dir.join(&self.input_file)
    }

    /// Full path of the cleaned output file.
    pub fn output_path(&self) -> PathBuf {
        self.data_dir.join(&self.output_file)
    }

    /// Full path of the JSON report, if one is configured.
    pub fn report_path(&self) -> Option<PathBuf> {
        self.report_file.as_ref().map(|name| self.data_dir.join(name))
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> std::result::Result<(), ConfigValidationError> {
        if !self.rating_min.is_finite() || !self.rating_max.is_finite() {
            return Err(ConfigValidationError::NonFinite("rating range".to_string()));
        }

        if self.rating_min > self.rating_max {
            return Err(ConfigValidationError::InvalidRatingRange {
                min: self.rating_min,
                max: self.rating_max,
            });
        }

        if !self.min_record_count.is_finite() || self.min_record_count < 0.0 {
            return Err(ConfigValidationError::InvalidRecordCount(
                self.min_record_count,
            ));
        }

        if self.date_format.trim().is_empty() {
            return Err(ConfigValidationError::EmptyField("date_format".to_string()));
        }

        if self.input_file.trim().is_empty() {
            return Err(ConfigValidationError::EmptyField("input_file".to_string()));
        }

        if self.output_file.trim().is_empty() {
            return Err(ConfigValidationError::EmptyField("output_file".to_string()));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid rating range: min {min} is greater than max {max}")]
    InvalidRatingRange { min: f64, max: f64 },

    #[error("Invalid minimum record count: {0} (must be a non-negative number)")]
    InvalidRecordCount(f64),

    #[error("Non-finite value for {0}")]
    NonFinite(String),

    #[error("'{0}' must not be empty")]
    EmptyField(String),
}

/// Builder for [`EtlConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct EtlConfigBuilder {
    data_dir: Option<PathBuf>,
    input_file: Option<String>,
    output_file: Option<String>,
    report_file: Option<String>,
    date_format: Option<String>,
    rating_range: Option<(f64, f64)>,
    min_record_count: Option<f64>,
}

impl EtlConfigBuilder {
    /// Set the data directory.
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    /// Set the raw input file name (relative to the data directory).
    pub fn input_file(mut self, name: impl Into<String>) -> Self {
        self.input_file = Some(name.into());
        self
    }

    /// Set the cleaned output file name (relative to the data directory).
    pub fn output_file(mut self, name: impl Into<String>) -> Self {
        self.output_file = Some(name.into());
        self
    }

    /// Write a JSON report next to the cleaned output.
    pub fn report_file(mut self, name: impl Into<String>) -> Self {
        self.report_file = Some(name.into());
        self
    }

    /// Set the chrono format used to parse host-registration dates.
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }

    /// Set the inclusive accepted range for review score ratings.
    pub fn rating_range(mut self, min: f64, max: f64) -> Self {
        self.rating_range = Some((min, max));
        self
    }

    /// Set the lowest accepted record count.
    pub fn min_record_count(mut self, min: f64) -> Self {
        self.min_record_count = Some(min);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `EtlConfig` or an error if validation fails.
    pub fn build(self) -> std::result::Result<EtlConfig, ConfigValidationError> {
        let defaults = EtlConfig::default();
        let (rating_min, rating_max) = self
            .rating_range
            .unwrap_or((defaults.rating_min, defaults.rating_max));

        let config = EtlConfig {
            data_dir: self.data_dir.unwrap_or(defaults.data_dir),
            input_file: self.input_file.unwrap_or(defaults.input_file),
            output_file: self.output_file.unwrap_or(defaults.output_file),
            report_file: self.report_file,
            date_format: self.date_format.unwrap_or(defaults.date_format),
            rating_min,
            rating_max,
            min_record_count: self.min_record_count.unwrap_or(defaults.min_record_count),
        };

        config.validate()?;
        Ok(config)
    }
}
