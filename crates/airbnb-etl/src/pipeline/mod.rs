//! Pipeline module.
//!
//! This module provides the end-to-end ETL run and the directory-wide
//! quality sweep.

mod etl;

pub use etl::{DirectoryEvaluation, EtlOutcome, EtlPipeline};
