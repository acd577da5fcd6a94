//! Group-median imputation with ordered fallback levels.
//!
//! Each level groups rows by one key column and fills a null target with the
//! median of the non-null targets sharing that key. Levels run in order, so a
//! later level only sees the nulls the earlier ones could not resolve.

use crate::error::Result;
use polars::prelude::*;
use tracing::debug;

const ROW: &str = "__row";
const KEY: &str = "__group_key";
const MEDIAN: &str = "__group_median";

/// Fills nulls in a numeric target column from group medians.
#[derive(Debug, Clone)]
pub struct GroupedMedianImputer {
    target: String,
    groups: Vec<String>,
}

/// What a [`GroupedMedianImputer`] run filled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImputationOutcome {
    /// Values filled per fallback level, in level order.
    pub filled: Vec<(String, usize)>,
    /// Nulls that no level could resolve.
    pub unresolved: usize,
}

impl ImputationOutcome {
    pub fn total_filled(&self) -> usize {
        self.filled.iter().map(|(_, n)| n).sum()
    }
}

impl GroupedMedianImputer {
    /// Create an imputer for `target`, trying `groups` in order.
    pub fn new<S: Into<String>>(target: impl Into<String>, groups: impl IntoIterator<Item = S>) -> Self {
        Self {
            target: target.into(),
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }

    /// Fill nulls in the target column in place. The column is rewritten as
    /// `Float64`.
    ///
    /// Medians for a level are computed once, from the target as it stands
    /// when that level starts. Rows with a null group key are never filled at
    /// that level.
    pub fn impute(&self, df: &mut DataFrame) -> Result<ImputationOutcome> {
        let mut values = df
            .column(&self.target)?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        let mut outcome = ImputationOutcome::default();

        for group in &self.groups {
            let nulls_before = values.null_count();
            let keys = df
                .column(group)?
                .as_materialized_series()
                .cast(&DataType::String)?
                .with_name(KEY.into());

            values = self.fill_level(keys, values)?;

            let filled = nulls_before - values.null_count();
            debug!(
                "Filled {} '{}' values from '{}' medians",
                filled, self.target, group
            );
            outcome.filled.push((group.clone(), filled));
        }

        outcome.unresolved = values.null_count();
        df.replace(&self.target, values)?;

        Ok(outcome)
    }

    /// One fallback level: median per key, left-joined back onto the rows and
    /// used where the target is null.
    fn fill_level(&self, keys: Series, values: Series) -> Result<Series> {
        let target = self.target.as_str();
        let frame = DataFrame::new(vec![keys.into_column(), values.into_column()])?
            .with_row_index(ROW.into(), None)?;

        let medians = frame
            .clone()
            .lazy()
            .filter(col(KEY).is_not_null())
            .group_by([col(KEY)])
            .agg([col(target).median().alias(MEDIAN)]);

        let filled = frame
            .lazy()
            .left_join(medians, col(KEY), col(KEY))
            .sort([ROW], SortMultipleOptions::default())
            .select([col(target).fill_null(col(MEDIAN))])
            .collect()?;

        Ok(filled.column(target)?.as_materialized_series().clone())
    }
}
