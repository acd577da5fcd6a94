//! Data quality assessment module.
//!
//! Scores any table on completeness and uniqueness and bands the composite
//! score into a [`crate::types::QualityLevel`].

mod assessor;

pub use assessor::QualityAssessor;
