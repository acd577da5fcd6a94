use crate::loader::LoadOutcome;
use crate::types::{CleaningReport, QualityMetrics};
use std::fmt::Write;

/// Columns listed under "Columns with missing data".
pub const MISSING_COLUMNS_SHOWN: usize = 5;

/// Human-readable quality block for one table.
pub fn render_quality_summary(metrics: &QualityMetrics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "DATA QUALITY METRICS: {}", metrics.dataset_name);
    let _ = writeln!(
        out,
        "  Shape: {} rows x {} columns",
        group_thousands(metrics.total_rows),
        metrics.total_columns
    );
    let _ = writeln!(out, "  Completeness Score: {:.1}%", metrics.completeness_score);
    let _ = writeln!(out, "  Uniqueness Score: {:.1}%", metrics.uniqueness_score);
    let _ = writeln!(
        out,
        "  Overall Quality Score: {:.1}%",
        metrics.overall_quality_score
    );
    if metrics.duplicate_rows > 0 {
        let _ = writeln!(
            out,
            "  Warning: {} duplicate rows",
            group_thousands(metrics.duplicate_rows)
        );
    }
    if !metrics.missing_by_column.is_empty() {
        let _ = writeln!(out, "  Columns with missing data:");
        for col in metrics.missing_by_column.iter().take(MISSING_COLUMNS_SHOWN) {
            let _ = writeln!(
                out,
                "    {}: {} ({:.1}%)",
                col.column,
                group_thousands(col.missing),
                col.percentage
            );
        }
        let hidden = metrics.missing_by_column.len().saturating_sub(MISSING_COLUMNS_SHOWN);
        if hidden > 0 {
            let _ = writeln!(out, "    ... and {} more", hidden);
        }
    }
    let _ = write!(out, "  Quality Level: {}", metrics.quality_level());
    out
}

/// One line per file of a directory sweep, failures included.
pub fn render_load_summary(outcomes: &[LoadOutcome]) -> String {
    let loaded = outcomes.iter().filter(|o| o.is_loaded()).count();
    let mut out = String::new();
    let _ = write!(out, "DATASETS: loaded {} of {} files", loaded, outcomes.len());
    for outcome in outcomes {
        let _ = match outcome {
            LoadOutcome::Loaded {
                file, rows, columns, ..
            } => write!(
                out,
                "\n  {}: {} rows x {} columns",
                file,
                group_thousands(*rows),
                columns
            ),
            LoadOutcome::Failed { file, message } => {
                write!(out, "\n  FAILED {}: {}", file, message)
            }
        };
    }
    out
}

/// Row counts and per-stage effects of a cleaning run.
pub fn render_cleaning_summary(report: &CleaningReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "CLEANING SUMMARY");
    let _ = writeln!(
        out,
        "  Rows: {} -> {} ({:.1}% removed)",
        group_thousands(report.rows_before),
        group_thousands(report.rows_after),
        report.rows_removed_percentage()
    );
    let _ = writeln!(
        out,
        "  Columns: {} -> {}",
        report.columns_before, report.columns_after
    );
    for stage in &report.stages {
        if stage.rows_removed() > 0 {
            let _ = writeln!(
                out,
                "  {}: removed {} rows",
                stage.stage.display_name(),
                group_thousands(stage.rows_removed())
            );
        }
    }
    let _ = write!(out, "  Remaining null cells: {}", report.remaining_nulls);
    out
}

fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CleaningStage, ColumnMissing, StageOutcome};
    use pretty_assertions::assert_eq;

    fn metrics(duplicates: usize, overall: f64) -> QualityMetrics {
        QualityMetrics {
            dataset_name: "airbnb".to_string(),
            total_rows: 30478,
            total_columns: 13,
            missing_cells: 0,
            missing_ratio: 0.0,
            completeness_score: 97.26,
            duplicate_rows: duplicates,
            duplicate_ratio: 0.0,
            uniqueness_score: 99.96,
            numeric_columns: 7,
            text_columns: 5,
            datetime_columns: 1,
            overall_quality_score: overall,
            missing_by_column: Vec::new(),
        }
    }

    fn missing(column: &str, count: usize) -> ColumnMissing {
        ColumnMissing {
            column: column.to_string(),
            missing: count,
            percentage: count as f64 / 30478.0 * 100.0,
        }
    }

    #[test]
    fn test_render_quality_summary() {
        let text = render_quality_summary(&metrics(1200, 98.33));
        assert_eq!(
            text,
            "DATA QUALITY METRICS: airbnb\n\
             \x20 Shape: 30,478 rows x 13 columns\n\
             \x20 Completeness Score: 97.3%\n\
             \x20 Uniqueness Score: 100.0%\n\
             \x20 Overall Quality Score: 98.3%\n\
             \x20 Warning: 1,200 duplicate rows\n\
             \x20 Quality Level: Excellent"
        );
    }

    #[test]
    fn test_render_quality_summary_omits_zero_duplicates() {
        let text = render_quality_summary(&metrics(0, 70.0));
        assert!(!text.contains("duplicate"));
        assert!(text.ends_with("Quality Level: Fair"));
    }

    #[test]
    fn test_render_quality_summary_lists_missing_columns() {
        let mut m = metrics(0, 98.33);
        m.missing_by_column = vec![
            missing("Price", 3048),
            missing("Zipcode", 134),
            missing("Review Scores Rating", 8323),
        ];

        let text = render_quality_summary(&m);
        assert!(text.contains(
            "  Columns with missing data:\n\
             \x20   Price: 3,048 (10.0%)\n\
             \x20   Zipcode: 134 (0.4%)\n\
             \x20   Review Scores Rating: 8,323 (27.3%)\n\
             \x20 Quality Level: Excellent"
        ));
    }

    #[test]
    fn test_render_quality_summary_caps_missing_columns() {
        let mut m = metrics(0, 98.33);
        m.missing_by_column = (0..7).map(|i| missing(&format!("col{}", i), 10 - i)).collect();

        let text = render_quality_summary(&m);
        assert!(text.contains("    col4: 6"));
        assert!(!text.contains("col5"));
        assert!(text.contains("    ... and 2 more"));
    }

    #[test]
    fn test_render_quality_summary_without_missing_columns() {
        let text = render_quality_summary(&metrics(0, 100.0));
        assert!(!text.contains("Columns with missing data"));
    }

    #[test]
    fn test_render_load_summary_reports_failures() {
        let outcomes = vec![
            LoadOutcome::Failed {
                file: "broken.xlsx".to_string(),
                message: "Cannot read workbook".to_string(),
            },
            LoadOutcome::Loaded {
                file: "listings.csv".to_string(),
                dataset: "listings".to_string(),
                rows: 1200,
                columns: 13,
            },
        ];

        assert_eq!(
            render_load_summary(&outcomes),
            "DATASETS: loaded 1 of 2 files\n\
             \x20 FAILED broken.xlsx: Cannot read workbook\n\
             \x20 listings.csv: 1,200 rows x 13 columns"
        );
    }

    #[test]
    fn test_render_cleaning_summary_lists_dropping_stages() {
        let report = CleaningReport {
            rows_before: 1000,
            rows_after: 900,
            columns_before: 13,
            columns_after: 11,
            remaining_nulls: 4,
            stages: vec![
                StageOutcome {
                    stage: CleaningStage::Deduplication,
                    rows_before: 1000,
                    rows_after: 900,
                    columns_before: 13,
                    columns_after: 13,
                    details: Vec::new(),
                },
                StageOutcome {
                    stage: CleaningStage::ColumnPruning,
                    rows_before: 900,
                    rows_after: 900,
                    columns_before: 13,
                    columns_after: 12,
                    details: Vec::new(),
                },
            ],
        };

        let text = render_cleaning_summary(&report);
        assert!(text.contains("Rows: 1,000 -> 900 (10.0% removed)"));
        assert!(text.contains("De-duplication: removed 100 rows"));
        assert!(!text.contains("Column pruning"));
        assert!(text.ends_with("Remaining null cells: 4"));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }
}
