//! Imputation module for handling missing values.
//!
//! Listings only impute the nightly price, from the medians of progressively
//! coarser location groups.

mod grouped;

pub use grouped::{GroupedMedianImputer, ImputationOutcome};
