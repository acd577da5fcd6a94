use crate::error::{EtlError, Result};
use crate::schema::TEXT_COLUMNS;
use polars::prelude::*;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Read a CSV file with a header row, inferring the schema from every row.
/// Text-only columns (zipcodes) are read as strings whatever they look like.
///
/// Quote handling is tried first; a file that fails to parse with it is
/// retried without.
pub(crate) fn read_csv(path: &Path) -> Result<DataFrame> {
    match read_with_quote(path, Some(b'"')) {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Quoted CSV read of {} failed: {}", path.display(), e);
        }
    }

    read_with_quote(path, None)
        .map_err(|e| EtlError::Polars(e).with_context(path.display().to_string()))
}

fn read_with_quote(path: &Path, quote: Option<u8>) -> PolarsResult<DataFrame> {
    let parse_options = || CsvParseOptions::default().with_quote_char(quote);

    let header = CsvReadOptions::default()
        .with_has_header(true)
        .with_n_rows(Some(0))
        .with_parse_options(parse_options())
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    CsvReadOptions::default()
        .with_infer_schema_length(None)
        .with_has_header(true)
        .with_schema_overwrite(text_overrides(&header))
        .with_parse_options(parse_options())
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
}

/// String overrides for text-only columns, matched on the trimmed header.
fn text_overrides(header: &DataFrame) -> Option<SchemaRef> {
    let fields: Vec<Field> = header
        .get_column_names()
        .into_iter()
        .filter(|name| TEXT_COLUMNS.contains(&name.trim()))
        .map(|name| Field::new(name.clone(), DataType::String))
        .collect();

    if fields.is_empty() {
        None
    } else {
        Some(Arc::new(Schema::from_iter(fields)))
    }
}
