//! Type conversion functions for the date and numeric stages.

use crate::error::{EtlError, Result};
use crate::utils::{f64_values, is_numeric_dtype, parse_numeric_string, string_keys};
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// Parse a date strictly against `format`. A trailing `%H:%M:%S` time is
/// accepted and discarded.
pub(crate) fn parse_date_strict(value: &str, format: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, format).ok().or_else(|| {
        NaiveDateTime::parse_from_str(trimmed, &format!("{format} %H:%M:%S"))
            .ok()
            .map(|dt| dt.date())
    })
}

fn days_since_epoch(date: NaiveDate) -> Option<i32> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
    i32::try_from(date.signed_duration_since(epoch).num_days()).ok()
}

/// Convert a column to `Date`.
///
/// `Date` columns pass through, `Datetime` columns are truncated, anything
/// else is rendered as text and parsed with `format`. The first value that
/// fails to parse aborts the conversion. Returns the converted series and
/// how many values were parsed from text.
pub(crate) fn to_date_series(series: &Series, format: &str) -> Result<(Series, usize)> {
    match series.dtype() {
        DataType::Date => Ok((series.clone(), 0)),
        DataType::Datetime(_, _) => Ok((series.cast(&DataType::Date)?, 0)),
        _ => {
            let raw = string_keys(series)?;
            let mut days: Vec<Option<i32>> = Vec::with_capacity(raw.len());
            let mut parsed = 0;

            for (row, value) in raw.iter().enumerate() {
                match value.as_deref().map(str::trim) {
                    None | Some("") => days.push(None),
                    Some(text) => {
                        let day = parse_date_strict(text, format)
                            .and_then(days_since_epoch)
                            .ok_or_else(|| EtlError::MalformedDate {
                                column: series.name().to_string(),
                                row,
                                value: text.to_string(),
                                expected_format: format.to_string(),
                            })?;
                        days.push(Some(day));
                        parsed += 1;
                    }
                }
            }

            let out = Series::new(series.name().clone(), days).cast(&DataType::Date)?;
            Ok((out, parsed))
        }
    }
}

/// Calendar-date keys for a host-since column, as `YYYY-MM-DD` text.
///
/// Spellings that parse to the same date share a key, and `Date` or
/// `Datetime` storage keys on the date alone. Text that does not parse keys
/// on its trimmed self; rejecting it is the date stage's job.
pub(crate) fn date_keys(series: &Series, format: &str) -> Result<Series> {
    let keys: Vec<Option<String>> = match series.dtype() {
        DataType::Date | DataType::Datetime(_, _) => {
            string_keys(&series.cast(&DataType::Date)?)?
        }
        _ => string_keys(series)?
            .into_iter()
            .map(|value| {
                let text = value?.trim().to_string();
                if text.is_empty() {
                    return None;
                }
                Some(match parse_date_strict(&text, format) {
                    Some(date) => date.format("%Y-%m-%d").to_string(),
                    None => text,
                })
            })
            .collect(),
    };
    Ok(Series::new(series.name().clone(), keys))
}

/// Convert a column to `Float64`. Values that cannot be read as a finite
/// number become null.
pub(crate) fn to_float_series(series: &Series) -> Result<Series> {
    let values: Vec<Option<f64>> = if is_numeric_dtype(series.dtype()) {
        f64_values(series)?
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect()
    } else {
        string_keys(series)?
            .into_iter()
            .map(|v| v.as_deref().and_then(parse_numeric_string))
            .collect()
    };

    Ok(Series::new(series.name().clone(), values))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_strict_day_month_year() {
        assert_eq!(parse_date_strict("15/03/2008", "%d/%m/%Y"), Some(date(2008, 3, 15)));
        assert_eq!(parse_date_strict(" 01/12/2010 ", "%d/%m/%Y"), Some(date(2010, 12, 1)));
    }

    #[test]
    fn test_parse_date_strict_discards_time() {
        assert_eq!(
            parse_date_strict("15/03/2008 13:45:00", "%d/%m/%Y"),
            Some(date(2008, 3, 15))
        );
    }

    #[test]
    fn test_parse_date_strict_rejects_other_formats() {
        assert_eq!(parse_date_strict("2008-03-15", "%d/%m/%Y"), None);
        assert_eq!(parse_date_strict("03/15/2008", "%d/%m/%Y"), None);
        assert_eq!(parse_date_strict("soon", "%d/%m/%Y"), None);
    }

    #[test]
    fn test_to_date_series_from_strings() {
        let s = Series::new("Host Since".into(), &[Some("15/03/2008"), None, Some("")]);
        let (out, parsed) = to_date_series(&s, "%d/%m/%Y").unwrap();

        assert_eq!(out.dtype(), &DataType::Date);
        assert_eq!(parsed, 1);
        assert_eq!(out.null_count(), 2);
    }

    #[test]
    fn test_to_date_series_malformed_is_fatal() {
        let s = Series::new("Host Since".into(), &["15/03/2008", "2008-03-16"]);
        let err = to_date_series(&s, "%d/%m/%Y").unwrap_err();

        match err {
            EtlError::MalformedDate { column, row, value, .. } => {
                assert_eq!(column, "Host Since");
                assert_eq!(row, 1);
                assert_eq!(value, "2008-03-16");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_to_date_series_truncates_datetime() {
        let ms_per_day = 86_400_000i64;
        let s = Series::new("Host Since".into(), &[ms_per_day + 3_600_000])
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            .unwrap();
        let (out, parsed) = to_date_series(&s, "%d/%m/%Y").unwrap();

        assert_eq!(parsed, 0);
        assert_eq!(out.dtype(), &DataType::Date);
        let as_days = out.cast(&DataType::Int32).unwrap();
        assert_eq!(as_days.i32().unwrap().get(0), Some(1));
    }

    #[test]
    fn test_date_keys_unify_spellings() {
        let s = Series::new(
            "Host Since".into(),
            &[
                Some("15/03/2008"),
                Some("15/3/2008"),
                Some(" 15/03/2008 00:00:00"),
                Some("2008-03-15?"),
                Some(""),
                None,
            ],
        );
        let keys = string_keys(&date_keys(&s, "%d/%m/%Y").unwrap()).unwrap();

        assert_eq!(
            keys,
            vec![
                Some("2008-03-15".to_string()),
                Some("2008-03-15".to_string()),
                Some("2008-03-15".to_string()),
                Some("2008-03-15?".to_string()),
                None,
                None,
            ]
        );
    }

    #[test]
    fn test_date_keys_match_across_storage() {
        let text = Series::new("Host Since".into(), &["15/03/2008"]);
        let (dates, _) = to_date_series(&text, "%d/%m/%Y").unwrap();
        let noon = dates
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            .unwrap()
            .cast(&DataType::Int64)
            .unwrap()
            .i64()
            .unwrap()
            .get(0)
            .unwrap()
            + 43_200_000;
        let datetimes = Series::new("Host Since".into(), &[noon])
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            .unwrap();

        let from_text = string_keys(&date_keys(&text, "%d/%m/%Y").unwrap()).unwrap();
        let from_dates = string_keys(&date_keys(&dates, "%d/%m/%Y").unwrap()).unwrap();
        let from_datetimes = string_keys(&date_keys(&datetimes, "%d/%m/%Y").unwrap()).unwrap();
        assert_eq!(from_text, from_dates);
        assert_eq!(from_text, from_datetimes);
    }

    #[test]
    fn test_to_float_series_from_strings() {
        let s = Series::new("Price".into(), &[Some("145"), Some("$1,200"), Some("call"), None]);
        let out = to_float_series(&s).unwrap();
        let values: Vec<Option<f64>> = out.f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(145.0), Some(1200.0), None, None]);
    }

    #[test]
    fn test_to_float_series_from_numbers_drops_nan() {
        let s = Series::new("Review Scores Rating".into(), &[Some(95i64), None]);
        let out = to_float_series(&s).unwrap();
        assert_eq!(out.dtype(), &DataType::Float64);
        assert_eq!(out.f64().unwrap().get(0), Some(95.0));

        let s = Series::new("Price".into(), &[f64::NAN, 10.0]);
        let out = to_float_series(&s).unwrap();
        assert_eq!(out.null_count(), 1);
    }
}
