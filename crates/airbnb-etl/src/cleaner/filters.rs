//! Row filters and column-shaping stages.

use crate::error::Result;
use polars::prelude::*;

/// Keep the first row of each distinct key, preserving row order. Nulls
/// compare equal.
pub(crate) fn drop_duplicate_keys(df: DataFrame, key: &[&str]) -> Result<DataFrame> {
    let subset: Vec<String> = key.iter().map(|name| name.to_string()).collect();
    Ok(df.unique_stable(Some(subset.as_slice()), UniqueKeepStrategy::First, None)?)
}

fn float_column(df: &DataFrame, column: &str) -> Result<Series> {
    Ok(df
        .column(column)?
        .as_materialized_series()
        .cast(&DataType::Float64)?)
}

/// Keep rows whose value lies in `[min, max]`. Nulls are dropped.
pub(crate) fn keep_in_range(df: DataFrame, column: &str, min: f64, max: f64) -> Result<DataFrame> {
    let values = float_column(&df, column)?;
    let mask = values.gt_eq(min)? & values.lt_eq(max)?;
    Ok(df.filter(&mask)?)
}

/// Keep rows whose value is at least `min`. Nulls are dropped.
pub(crate) fn keep_at_least(df: DataFrame, column: &str, min: f64) -> Result<DataFrame> {
    let mask = float_column(&df, column)?.gt_eq(min)?;
    Ok(df.filter(&mask)?)
}

/// Drop rows with a null in any of `columns`.
pub(crate) fn drop_null_rows(df: DataFrame, columns: &[&str]) -> Result<DataFrame> {
    let mut mask = BooleanChunked::full("keep".into(), true, df.height());
    for name in columns {
        mask = &mask & &df.column(name)?.is_not_null();
    }
    Ok(df.filter(&mask)?)
}

/// Store `columns` as categorical labels. Values are rendered as text first,
/// so a numeric bed count becomes the label `"2"`. Returns the columns that
/// were converted.
pub(crate) fn tag_categorical(df: &mut DataFrame, columns: &[&str]) -> Result<Vec<String>> {
    let mut tagged = Vec::new();
    for name in columns {
        let series = df.column(name)?.as_materialized_series();
        if matches!(series.dtype(), DataType::Categorical(..)) {
            continue;
        }
        let categorical = series
            .cast(&DataType::String)?
            .cast(&DataType::from_categories(Categories::global()))?;
        df.replace(name, categorical)?;
        tagged.push(name.to_string());
    }
    Ok(tagged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::string_keys;

    #[test]
    fn test_drop_duplicate_keys_keeps_first() {
        let df = df![
            "id" => [1i64, 1, 2, 1],
            "since" => ["a", "a", "a", "b"],
            "price" => [10.0, 20.0, 30.0, 40.0],
        ]
        .unwrap();
        let out = drop_duplicate_keys(df, &["id", "since"]).unwrap();

        let prices: Vec<Option<f64>> = out.column("price").unwrap().as_materialized_series().f64().unwrap().into_iter().collect();
        assert_eq!(prices, vec![Some(10.0), Some(30.0), Some(40.0)]);
    }

    #[test]
    fn test_drop_duplicate_keys_keeps_row_order() {
        let df = df![
            "id" => [9i64, 3, 9, 1, 3, 7],
            "since" => ["x"; 6],
        ]
        .unwrap();
        let out = drop_duplicate_keys(df, &["id", "since"]).unwrap();

        let ids: Vec<Option<i64>> = out.column("id").unwrap().as_materialized_series().i64().unwrap().into_iter().collect();
        assert_eq!(ids, vec![Some(9), Some(3), Some(1), Some(7)]);
    }

    #[test]
    fn test_drop_duplicate_keys_null_keys_collide() {
        let df = df![
            "id" => [Some(1i64), Some(1)],
            "since" => [Option::<&str>::None, None],
        ]
        .unwrap();
        let out = drop_duplicate_keys(df, &["id", "since"]).unwrap();
        assert_eq!(out.height(), 1);
    }

    #[test]
    fn test_keep_in_range_is_inclusive_and_drops_nulls() {
        let df = df![
            "rating" => [Some(0.0), Some(1.0), Some(50.0), Some(100.0), Some(101.0), None],
        ]
        .unwrap();
        let out = keep_in_range(df, "rating", 1.0, 100.0).unwrap();

        let kept: Vec<Option<f64>> = out.column("rating").unwrap().as_materialized_series().f64().unwrap().into_iter().collect();
        assert_eq!(kept, vec![Some(1.0), Some(50.0), Some(100.0)]);
    }

    #[test]
    fn test_keep_at_least() {
        let df = df![
            "records" => [Some(0.0), Some(1.0), Some(-2.0), Some(3.0), None],
        ]
        .unwrap();
        let out = keep_at_least(df, "records", 1.0).unwrap();
        assert_eq!(out.height(), 2);
    }

    #[test]
    fn test_drop_null_rows_any_column() {
        let df = df![
            "a" => [Some(1i64), None, Some(3), Some(4)],
            "b" => [Some("x"), Some("y"), None, Some("z")],
            "c" => [Option::<f64>::None, None, None, None],
        ]
        .unwrap();
        let out = drop_null_rows(df, &["a", "b"]).unwrap();
        assert_eq!(out.height(), 2);
    }

    #[test]
    fn test_tag_categorical_converts_and_is_idempotent() {
        let mut df = df![
            "room" => ["Private room", "Entire home/apt"],
            "beds" => [1i64, 2],
        ]
        .unwrap();

        let tagged = tag_categorical(&mut df, &["room", "beds"]).unwrap();
        assert_eq!(tagged, vec!["room".to_string(), "beds".to_string()]);
        assert!(matches!(
            df.column("beds").unwrap().dtype(),
            DataType::Categorical(..)
        ));

        let beds = string_keys(df.column("beds").unwrap().as_materialized_series()).unwrap();
        assert_eq!(beds, vec![Some("1".to_string()), Some("2".to_string())]);

        let again = tag_categorical(&mut df, &["room", "beds"]).unwrap();
        assert!(again.is_empty());
    }
}
