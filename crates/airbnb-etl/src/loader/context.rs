use super::{LoadOutcome, SourceFormat, csv, spreadsheet};
use crate::error::{EtlError, Result};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// The data directory and every dataset loaded from it, keyed by file stem.
#[derive(Debug, Clone)]
pub struct DatasetContext {
    data_dir: PathBuf,
    datasets: BTreeMap<String, DataFrame>,
}

impl DatasetContext {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            datasets: BTreeMap::new(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load one file from the data directory and register it under its file
    /// stem, replacing any dataset of the same name. Returns the name.
    pub fn load_file(&mut self, file_name: &str) -> Result<String> {
        let path = self.data_dir.join(file_name);
        if !path.is_file() {
            return Err(EtlError::SourceNotFound(path.display().to_string()));
        }

        let format = SourceFormat::from_path(&path)
            .ok_or_else(|| EtlError::UnsupportedFormat(path.display().to_string()))?;

        let df = match format {
            SourceFormat::Csv => csv::read_csv(&path)?,
            SourceFormat::Spreadsheet => spreadsheet::read_first_sheet(&path)?,
        };

        let name = dataset_name(&path);
        info!(
            "Loaded '{}' from {} ({} rows x {} columns)",
            name,
            path.display(),
            df.height(),
            df.width()
        );
        self.datasets.insert(name.clone(), df);
        Ok(name)
    }

    /// Load every supported file in the data directory, in file-name order.
    ///
    /// Hidden files and office lock files are skipped. A file that fails to
    /// load is reported in its outcome and does not stop the sweep.
    pub fn load_directory(&mut self) -> Result<Vec<LoadOutcome>> {
        let entries = std::fs::read_dir(&self.data_dir)
            .map_err(|e| EtlError::Io(e).with_context(self.data_dir.display().to_string()))?;

        let mut files: Vec<String> = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        files.sort();

        let mut outcomes = Vec::new();
        for file in files {
            if file.starts_with('.') || file.starts_with("~$") {
                debug!("Skipping {}", file);
                continue;
            }
            if SourceFormat::from_path(Path::new(&file)).is_none() {
                debug!("Skipping unsupported file {}", file);
                continue;
            }

            match self.load_file(&file) {
                Ok(dataset) => {
                    let (rows, columns) = self
                        .datasets
                        .get(&dataset)
                        .map(|df| df.shape())
                        .unwrap_or_default();
                    outcomes.push(LoadOutcome::Loaded {
                        file,
                        dataset,
                        rows,
                        columns,
                    });
                }
                Err(e) => {
                    warn!("Failed to load {}: {}", file, e);
                    outcomes.push(LoadOutcome::Failed {
                        file,
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Loaded {} of {} datasets from {}",
            self.datasets.len(),
            outcomes.len(),
            self.data_dir.display()
        );
        Ok(outcomes)
    }

    pub fn get(&self, name: &str) -> Option<&DataFrame> {
        self.datasets.get(name)
    }

    /// Remove a dataset from the context and hand it over.
    pub fn take(&mut self, name: &str) -> Option<DataFrame> {
        self.datasets.remove(name)
    }

    /// Loaded datasets in name order.
    pub fn datasets(&self) -> impl Iterator<Item = (&str, &DataFrame)> {
        self.datasets.iter().map(|(name, df)| (name.as_str(), df))
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

/// Dataset name of a source file: its file stem.
pub fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_load_file_registers_by_stem() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "listings.csv", "a,b\n1,x\n2,y\n");

        let mut ctx = DatasetContext::new(dir.path());
        let name = ctx.load_file("listings.csv").unwrap();

        assert_eq!(name, "listings");
        assert_eq!(ctx.get("listings").unwrap().shape(), (2, 2));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_load_file_missing_and_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "notes.txt", "hello");
        let mut ctx = DatasetContext::new(dir.path());

        let err = ctx.load_file("absent.csv").unwrap_err();
        assert_eq!(err.error_code(), "SOURCE_NOT_FOUND");

        let err = ctx.load_file("notes.txt").unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_load_directory_sweeps_in_order_and_skips() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b_reviews.csv", "id,score\n1,90\n");
        write(dir.path(), "a_hosts.csv", "id,name\n1,Ann\n2,Bob\n");
        write(dir.path(), ".hidden.csv", "x\n1\n");
        write(dir.path(), "~$a_hosts.xlsx", "lock");
        write(dir.path(), "readme.md", "# data");
        write(dir.path(), "c_broken.xlsx", "not a workbook");

        let mut ctx = DatasetContext::new(dir.path());
        let outcomes = ctx.load_directory().unwrap();

        assert_eq!(outcomes.len(), 3);
        assert_eq!(
            outcomes[0],
            LoadOutcome::Loaded {
                file: "a_hosts.csv".to_string(),
                dataset: "a_hosts".to_string(),
                rows: 2,
                columns: 2,
            }
        );
        assert_eq!(outcomes[1].file(), "b_reviews.csv");
        assert!(!outcomes[2].is_loaded());

        let names: Vec<&str> = ctx.datasets().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a_hosts", "b_reviews"]);
    }

    #[test]
    fn test_take_removes_dataset() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "listings.csv", "a\n1\n");
        let mut ctx = DatasetContext::new(dir.path());
        ctx.load_file("listings.csv").unwrap();

        assert!(ctx.take("listings").is_some());
        assert!(ctx.get("listings").is_none());
    }

    #[test]
    fn test_dataset_name_is_stem() {
        assert_eq!(dataset_name(Path::new("Datasource/airbnb.xlsx")), "airbnb");
    }
}
