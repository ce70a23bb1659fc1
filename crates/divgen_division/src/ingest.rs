//! Registration CSV ingest.

use std::io::ErrorKind;
use std::path::Path;

use polars::prelude::*;

use crate::error::{DivisionError, Result};
use crate::frame::has_column;
use crate::spec::SpecDivisionLayout;

/// Read a header-row registration export into a DataFrame.
///
/// Fails when the file is missing or unparseable, or when the header lacks
/// the belt column or either gender indicator column. Every other column is
/// optional. Column dtypes are inferred from every row, so a late fractional
/// weight widens the column instead of failing the parse.
pub fn read_registrations(path: &Path, layout: &SpecDivisionLayout) -> Result<DataFrame> {
    match std::fs::metadata(path) {
        Ok(_) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(DivisionError::SourceNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(err) => {
            return Err(DivisionError::SourceRead {
                path: path.to_path_buf(),
                source: err,
            });
        }
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| DivisionError::SourceParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| DivisionError::SourceParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    for c_required in [
        &layout.col_belt,
        &layout.col_gender_male,
        &layout.col_gender_female,
    ] {
        if !has_column(&df, c_required) {
            return Err(DivisionError::MissingColumn {
                column: c_required.clone(),
                path: path.to_path_buf(),
            });
        }
    }

    tracing::info!(
        path = %path.display(),
        rows = df.height(),
        cols = df.width(),
        "registrations read"
    );
    Ok(df)
}
